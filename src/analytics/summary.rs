// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Totals, averages and per-sport breakdown over a period.

use super::{mean, sport_breakdown, SportBreakdown};
use crate::models::Activity;
use crate::time_utils::{days_ago, year_range};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Period selector for the summary query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// A calendar year
    Year,
    #[default]
    All,
}

/// Date bounds for a summary request: `(start, end)`, either open.
///
/// `None` when the requested year has no representable range.
pub fn summary_window(
    period: SummaryPeriod,
    year: Option<i32>,
    now: DateTime<Utc>,
) -> Option<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    match period {
        SummaryPeriod::Week => Some((Some(days_ago(now, 7)), None)),
        SummaryPeriod::Month => Some((Some(days_ago(now, 30)), None)),
        SummaryPeriod::All if year.is_none() => Some((None, None)),
        SummaryPeriod::Year | SummaryPeriod::All => {
            let (start, end) = year_range(year.unwrap_or_else(|| now.year()))?;
            Some((Some(start), Some(end)))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_distance: f64,
    pub total_time: u64,
    pub total_elevation: f64,
    pub total_activities: usize,
    pub avg_distance: Option<f64>,
    pub avg_time: Option<f64>,
    pub avg_speed: Option<f64>,
    pub avg_heartrate: Option<f64>,
    pub max_distance: Option<f64>,
    pub max_speed: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub summary: SummaryStats,
    pub sport_breakdown: Vec<SportBreakdown>,
}

/// Summarize the given activities.
pub fn summarize(activities: &[Activity]) -> Summary {
    let stats = SummaryStats {
        total_distance: activities.iter().map(|a| a.distance).sum(),
        total_time: activities.iter().map(|a| a.moving_time).sum(),
        total_elevation: activities.iter().map(|a| a.total_elevation_gain).sum(),
        total_activities: activities.len(),
        avg_distance: mean(activities.iter().map(|a| a.distance)),
        avg_time: mean(activities.iter().map(|a| a.moving_time as f64)),
        avg_speed: mean(activities.iter().filter_map(|a| a.average_speed)),
        avg_heartrate: mean(activities.iter().filter_map(|a| a.average_heartrate)),
        max_distance: activities.iter().map(|a| a.distance).reduce(f64::max),
        max_speed: activities.iter().filter_map(|a| a.max_speed).reduce(f64::max),
    };

    let mut breakdown = sport_breakdown(activities);
    breakdown.sort_by(|a, b| b.count.cmp(&a.count));

    Summary {
        summary: stats,
        sport_breakdown: breakdown,
    }
}
