// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trailing 7/30/90 day windows.

use super::mean;
use crate::models::Activity;
use crate::time_utils::days_ago;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Longest window; callers fetch at least this many days of history.
pub const LONGEST_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindowStats {
    pub total_distance: f64,
    pub total_time: u64,
    pub total_elevation: f64,
    pub total_activities: usize,
    pub avg_pace: Option<f64>,
    pub avg_heartrate: Option<f64>,
    pub total_kudos: u64,
    pub total_training_load: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollingStats {
    pub rolling_7_days: WindowStats,
    pub rolling_30_days: WindowStats,
    pub rolling_90_days: WindowStats,
}

/// Stats for activities starting at or after `now - days`.
pub fn window_stats(activities: &[Activity], now: DateTime<Utc>, days: i64) -> WindowStats {
    let since = days_ago(now, days);
    let window: Vec<&Activity> = activities.iter().filter(|a| a.start_date >= since).collect();

    WindowStats {
        total_distance: window.iter().map(|a| a.distance).sum(),
        total_time: window.iter().map(|a| a.moving_time).sum(),
        total_elevation: window.iter().map(|a| a.total_elevation_gain).sum(),
        total_activities: window.len(),
        avg_pace: mean(window.iter().filter_map(|a| a.pace)),
        avg_heartrate: mean(window.iter().filter_map(|a| a.average_heartrate)),
        total_kudos: window.iter().map(|a| u64::from(a.kudos_count)).sum(),
        total_training_load: window
            .iter()
            .map(|a| u64::from(a.training_load_score))
            .sum(),
    }
}

pub fn rolling_stats(activities: &[Activity], now: DateTime<Utc>) -> RollingStats {
    RollingStats {
        rolling_7_days: window_stats(activities, now, 7),
        rolling_30_days: window_stats(activities, now, 30),
        rolling_90_days: window_stats(activities, now, LONGEST_WINDOW_DAYS),
    }
}
