// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregation queries over a user's activities.
//!
//! Every function here is a pure computation over a slice of activities that
//! the caller has already scoped to one user (and usually to a date window).
//! Functions that depend on the current time take it as `now`.

pub mod comparisons;
pub mod consistency;
pub mod heart_rate;
pub mod kudos;
pub mod locations;
pub mod pace;
pub mod records;
pub mod rolling;
pub mod summary;
pub mod training_load;
pub mod trends;

use crate::models::Activity;
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

/// Arithmetic mean, `None` for an empty input.
pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Round to `places` decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// First activity with the strictly greatest key.
pub(crate) fn max_by_key<'a, F>(activities: &'a [Activity], key: F) -> Option<&'a Activity>
where
    F: Fn(&Activity) -> f64,
{
    activities.iter().fold(None, |best: Option<&Activity>, a| match best {
        Some(b) if key(b) >= key(a) => Some(b),
        _ => Some(a),
    })
}

/// Fastest running activity (lowest positive pace).
pub(crate) fn fastest_run(activities: &[Activity]) -> Option<&Activity> {
    activities
        .iter()
        .filter(|a| a.is_run())
        .filter_map(|a| a.pace.filter(|p| *p > 0.0).map(|p| (a, p)))
        .fold(None, |best: Option<(&Activity, f64)>, (a, p)| match best {
            Some((_, best_pace)) if best_pace <= p => best,
            _ => Some((a, p)),
        })
        .map(|(a, _)| a)
}

/// Calendar month of an activity's UTC start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(activity: &Activity) -> Self {
        Self {
            year: activity.start_date.year(),
            month: activity.start_date.month(),
        }
    }
}

/// Group activities by calendar month, in chronological order.
pub(crate) fn by_month(activities: &[Activity]) -> BTreeMap<MonthKey, Vec<&Activity>> {
    let mut months: BTreeMap<MonthKey, Vec<&Activity>> = BTreeMap::new();
    for activity in activities {
        months.entry(MonthKey::of(activity)).or_default().push(activity);
    }
    months
}

/// Per-sport count, distance and moving time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SportBreakdown {
    pub sport_type: String,
    pub count: usize,
    pub distance: f64,
    pub time: u64,
}

/// Per-sport totals in name order; callers sort as they need.
pub(crate) fn sport_breakdown(activities: &[Activity]) -> Vec<SportBreakdown> {
    let mut sports: BTreeMap<&str, SportBreakdown> = BTreeMap::new();
    for activity in activities {
        let entry = sports
            .entry(activity.sport_type.as_str())
            .or_insert_with(|| SportBreakdown {
                sport_type: activity.sport_type.clone(),
                count: 0,
                distance: 0.0,
                time: 0,
            });
        entry.count += 1;
        entry.distance += activity.distance;
        entry.time += activity.moving_time;
    }
    sports.into_values().collect()
}
