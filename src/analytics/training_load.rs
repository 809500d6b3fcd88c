// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Acute:chronic workload ratio (ACWR).

use super::round_to;
use crate::models::Activity;
use crate::time_utils::days_ago;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub const ACUTE_WINDOW_DAYS: i64 = 7;
pub const CHRONIC_WINDOW_DAYS: i64 = 28;
/// History needed for the weekly load chart.
pub const WEEKLY_WINDOW_DAYS: i64 = 56;
const WEEKLY_LOAD_WEEKS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    Undertrained,
    Optimal,
    Elevated,
    HighRisk,
}

/// Classify an ACWR value.
pub fn classify_acwr(acwr: f64) -> TrainingStatus {
    if acwr < 0.8 {
        TrainingStatus::Undertrained
    } else if acwr > 1.5 {
        TrainingStatus::HighRisk
    } else if acwr > 1.3 {
        TrainingStatus::Elevated
    } else {
        TrainingStatus::Optimal
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyLoad {
    pub week: u32,
    pub total_load: u64,
    pub total_distance: f64,
    pub total_time: u64,
    pub activities: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingLoad {
    pub acute_load: u64,
    /// Average weekly load over the chronic window, rounded
    pub chronic_load: u64,
    pub acwr: f64,
    pub training_status: TrainingStatus,
    /// Oldest first
    pub weekly_loads: Vec<WeeklyLoad>,
}

fn load_since(activities: &[Activity], since: DateTime<Utc>) -> u64 {
    activities
        .iter()
        .filter(|a| a.start_date >= since)
        .map(|a| u64::from(a.training_load_score))
        .sum()
}

pub fn training_load(activities: &[Activity], now: DateTime<Utc>) -> TrainingLoad {
    let acute = load_since(activities, days_ago(now, ACUTE_WINDOW_DAYS));
    let chronic = load_since(activities, days_ago(now, CHRONIC_WINDOW_DAYS)) as f64 / 4.0;
    let acwr = if chronic > 0.0 {
        round_to(acute as f64 / chronic, 2)
    } else {
        0.0
    };

    let weekly_since = days_ago(now, WEEKLY_WINDOW_DAYS);
    let mut weeks: BTreeMap<u32, WeeklyLoad> = BTreeMap::new();
    for activity in activities.iter().filter(|a| a.start_date >= weekly_since) {
        let entry = weeks
            .entry(activity.consistency_week)
            .or_insert_with(|| WeeklyLoad {
                week: activity.consistency_week,
                total_load: 0,
                total_distance: 0.0,
                total_time: 0,
                activities: 0,
            });
        entry.total_load += u64::from(activity.training_load_score);
        entry.total_distance += activity.distance;
        entry.total_time += activity.moving_time;
        entry.activities += 1;
    }
    let skip = weeks.len().saturating_sub(WEEKLY_LOAD_WEEKS);
    let weekly_loads = weeks.into_values().skip(skip).collect();

    TrainingLoad {
        acute_load: acute,
        chronic_load: chronic.round() as u64,
        acwr,
        training_status: classify_acwr(acwr),
        weekly_loads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::test_support::{activity, at};
    use chrono::Duration;

    #[test]
    fn test_classify_acwr() {
        assert_eq!(classify_acwr(0.79), TrainingStatus::Undertrained);
        assert_eq!(classify_acwr(1.0), TrainingStatus::Optimal);
        assert_eq!(classify_acwr(0.8), TrainingStatus::Optimal);
        assert_eq!(classify_acwr(1.3), TrainingStatus::Optimal);
        assert_eq!(classify_acwr(1.35), TrainingStatus::Elevated);
        assert_eq!(classify_acwr(1.5), TrainingStatus::Elevated);
        assert_eq!(classify_acwr(1.6), TrainingStatus::HighRisk);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(TrainingStatus::HighRisk).unwrap(),
            "high_risk"
        );
    }

    #[test]
    fn test_acwr_from_windows() {
        let now = at(2024, 6, 30);
        // 60 min without heart rate -> load 42 each.
        let activities = vec![
            activity(1, "Run", now - Duration::days(1), 10_000.0, 3600),
            activity(2, "Run", now - Duration::days(10), 10_000.0, 3600),
            activity(3, "Run", now - Duration::days(20), 10_000.0, 3600),
            activity(4, "Run", now - Duration::days(40), 10_000.0, 3600),
        ];

        let load = training_load(&activities, now);

        assert_eq!(load.acute_load, 42);
        // 126 / 4 = 31.5
        assert_eq!(load.chronic_load, 32);
        // 42 / 31.5 = 1.333...
        assert_eq!(load.acwr, 1.33);
        assert_eq!(load.training_status, TrainingStatus::Elevated);
        assert_eq!(load.weekly_loads.len(), 4);
        assert!(load.weekly_loads.windows(2).all(|w| w[0].week < w[1].week));
    }

    #[test]
    fn test_no_history_is_undertrained() {
        let load = training_load(&[], at(2024, 6, 30));
        assert_eq!(load.acwr, 0.0);
        assert_eq!(load.training_status, TrainingStatus::Undertrained);
        assert!(load.weekly_loads.is_empty());
    }

    #[test]
    fn test_weekly_loads_capped_at_eight() {
        let now = at(2024, 6, 30);
        let activities: Vec<Activity> = (0..11)
            .map(|i| activity(i, "Run", now - Duration::days(i as i64 * 5), 5000.0, 1800))
            .collect();

        let load = training_load(&activities, now);
        assert_eq!(load.weekly_loads.len(), 8);
        assert_eq!(load.weekly_loads.last().unwrap().week, 202427);
    }
}
