// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly consistency score and streaks for the current year.

use crate::models::Activity;
use crate::time_utils::{consistency_week, year_start};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const SECONDS_PER_WEEK: i64 = 7 * 24 * 60 * 60;
/// How far back the current streak is followed.
const MAX_STREAK_LOOKBACK: u32 = 52;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekActivity {
    pub week: u32,
    pub activities: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Consistency {
    pub consistency_score: u32,
    pub weeks_with_activity: usize,
    pub weeks_so_far: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub weekly_breakdown: Vec<WeekActivity>,
}

/// Whole weeks (rounded up) between January 1st of `now`'s year and `now`; at least 1.
pub fn weeks_elapsed(now: DateTime<Utc>) -> u32 {
    let seconds = (now - year_start(now.year())).num_seconds();
    let weeks = (seconds + SECONDS_PER_WEEK - 1).div_euclid(SECONDS_PER_WEEK);
    u32::try_from(weeks).unwrap_or(0).max(1)
}

/// Percentage of elapsed weeks with at least one activity, capped at 100.
pub fn consistency_score(weeks_with_activity: usize, weeks_elapsed: u32) -> u32 {
    if weeks_elapsed == 0 {
        return 0;
    }
    let score = (weeks_with_activity as f64 / f64::from(weeks_elapsed) * 100.0).round();
    score.min(100.0) as u32
}

/// Consecutive active weeks ending at `current_week`.
fn current_streak(active: &BTreeMap<u32, WeekActivity>, current_week: u32) -> u32 {
    (0..=MAX_STREAK_LOOKBACK)
        .take_while(|&back| {
            current_week
                .checked_sub(back)
                .is_some_and(|week| active.contains_key(&week))
        })
        .count() as u32
}

/// Longest run of consecutive bucket numbers. Buckets do not wrap across years.
fn longest_streak(active: &BTreeMap<u32, WeekActivity>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<u32> = None;
    for &week in active.keys() {
        run = match previous {
            Some(p) if week == p + 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(week);
    }
    longest
}

/// Consistency over activities that started this calendar year.
pub fn consistency(activities: &[Activity], now: DateTime<Utc>) -> Consistency {
    let since = year_start(now.year());
    let mut weeks: BTreeMap<u32, WeekActivity> = BTreeMap::new();
    for activity in activities.iter().filter(|a| a.start_date >= since) {
        let entry = weeks
            .entry(activity.consistency_week)
            .or_insert_with(|| WeekActivity {
                week: activity.consistency_week,
                activities: 0,
                distance: 0.0,
            });
        entry.activities += 1;
        entry.distance += activity.distance;
    }

    let elapsed = weeks_elapsed(now);
    Consistency {
        consistency_score: consistency_score(weeks.len(), elapsed),
        weeks_with_activity: weeks.len(),
        weeks_so_far: elapsed,
        current_streak: current_streak(&weeks, consistency_week(now)),
        longest_streak: longest_streak(&weeks),
        weekly_breakdown: weeks.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::test_support::{activity, at};
    use chrono::Duration;

    #[test]
    fn test_half_the_weeks_scores_fifty() {
        assert_eq!(consistency_score(10, 20), 50);
        assert_eq!(consistency_score(0, 20), 0);
        assert_eq!(consistency_score(30, 20), 100);
        assert_eq!(consistency_score(1, 3), 33);
    }

    #[test]
    fn test_weeks_elapsed() {
        // 08:00 on Jan 1 is already inside week 1.
        assert_eq!(weeks_elapsed(at(2024, 1, 1)), 1);
        assert_eq!(weeks_elapsed(at(2024, 1, 8)), 2);
        assert_eq!(weeks_elapsed(year_start(2024)), 1);
    }

    #[test]
    fn test_streaks() {
        // 2024-01-01 is a Monday, so Sundays start new weeks.
        let now = at(2024, 2, 14);
        let mut activities = Vec::new();
        // Weeks 1 and 2
        activities.push(activity(1, "Run", at(2024, 1, 2), 5000.0, 1500));
        activities.push(activity(2, "Run", at(2024, 1, 9), 5000.0, 1500));
        // Weeks 5, 6 and 7 (the current week)
        for (i, day) in [(3, at(2024, 1, 30)), (4, at(2024, 2, 6)), (5, at(2024, 2, 13))] {
            activities.push(activity(i, "Run", day, 4000.0, 1200));
        }
        activities.push(activity(6, "Run", at(2024, 2, 14), 4000.0, 1200));
        // Last year's activities do not count.
        activities.push(activity(7, "Run", at(2023, 12, 30), 4000.0, 1200));

        let result = consistency(&activities, now);

        assert_eq!(consistency_week(now), 202407);
        assert_eq!(result.weeks_with_activity, 5);
        assert_eq!(result.current_streak, 3);
        assert_eq!(result.longest_streak, 3);
        assert_eq!(result.weekly_breakdown[0].week, 202401);
        let current = result.weekly_breakdown.last().unwrap();
        assert_eq!(current.week, 202407);
        assert_eq!(current.activities, 2);
        assert_eq!(current.distance, 8000.0);
    }

    #[test]
    fn test_no_current_streak_when_this_week_is_empty() {
        let now = at(2024, 3, 1);
        let activities = vec![activity(1, "Run", now - Duration::days(14), 5000.0, 1500)];

        let result = consistency(&activities, now);
        assert_eq!(result.current_streak, 0);
        assert_eq!(result.longest_streak, 1);
    }

    #[test]
    fn test_empty_year() {
        let result = consistency(&[], at(2024, 3, 1));
        assert_eq!(result.consistency_score, 0);
        assert_eq!(result.longest_streak, 0);
        assert!(result.weekly_breakdown.is_empty());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["weeksSoFar"], 9);
    }
}
