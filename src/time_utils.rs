// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and calendar bucketing.
//!
//! All calendar math is done in UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Midnight UTC on January 1st of `year`.
pub fn year_start(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Half-open `[start, end)` range covering a calendar year.
///
/// `None` when either bound falls outside what chrono can represent.
pub fn year_range(year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
    let end = Utc
        .with_ymd_and_hms(year.checked_add(1)?, 1, 1, 0, 0, 0)
        .single()?;
    Some((start, end))
}

/// Half-open `[start, end)` range covering a calendar month (1-based).
pub fn month_range(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((
        start.and_hms_opt(0, 0, 0)?.and_utc(),
        end.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}

/// Sunday-based week number within the year (1..=54).
///
/// `ceil((days_since_jan1 + jan1_weekday + 1) / 7)` where the weekday of
/// January 1st counts from Sunday = 0. `days_since_jan1` counts whole UTC
/// days, so the time of day never moves an activity into the next week.
pub fn week_of_year(date: DateTime<Utc>) -> u32 {
    let days_since_jan1 = date.ordinal0();
    let jan1_weekday = year_start(date.year()).weekday().num_days_from_sunday();
    (days_since_jan1 + jan1_weekday + 1).div_ceil(7)
}

/// Week bucket in `YYYYWW` form (e.g. 202405).
pub fn consistency_week(date: DateTime<Utc>) -> u32 {
    let year = u32::try_from(date.year()).unwrap_or(0);
    year * 100 + week_of_year(date)
}

/// Start of the trailing window of `days` days ending at `now`.
pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}
