// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Year-over-year comparison.

use super::mean;
use crate::models::Activity;
use chrono::Datelike;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearStats {
    pub total_distance: f64,
    pub total_time: u64,
    pub total_elevation: f64,
    pub total_activities: usize,
    pub total_kudos: u64,
    pub avg_pace: Option<f64>,
}

impl YearStats {
    fn of<'a>(activities: impl Iterator<Item = &'a Activity> + Clone) -> Self {
        Self {
            total_distance: activities.clone().map(|a| a.distance).sum(),
            total_time: activities.clone().map(|a| a.moving_time).sum(),
            total_elevation: activities.clone().map(|a| a.total_elevation_gain).sum(),
            total_activities: activities.clone().count(),
            total_kudos: activities.clone().map(|a| u64::from(a.kudos_count)).sum(),
            avg_pace: mean(activities.filter_map(|a| a.pace)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub current: f64,
    pub previous: f64,
    /// Percent, rounded
    pub change: i64,
}

impl Change {
    fn new(current: f64, previous: f64) -> Self {
        Self {
            current,
            previous,
            change: percent_change(current, previous),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonTable {
    pub distance: Change,
    pub time: Change,
    pub activities: Change,
    pub elevation: Change,
    pub kudos: Change,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparisons {
    pub current_year: i32,
    pub previous_year: i32,
    pub this_year: YearStats,
    pub last_year: YearStats,
    pub comparison: ComparisonTable,
}

/// Rounded percentage change; a zero baseline yields 100 for growth and 0 otherwise.
pub fn percent_change(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        return if current > 0.0 { 100 } else { 0 };
    }
    ((current - previous) / previous * 100.0).round() as i64
}

/// Compare `current_year` with the year before. Activities outside those two
/// years are ignored.
pub fn comparisons(activities: &[Activity], current_year: i32) -> Comparisons {
    let previous_year = current_year - 1;
    let in_year = |year: i32| {
        activities
            .iter()
            .filter(move |a| a.start_date.year() == year)
    };
    let this_year = YearStats::of(in_year(current_year));
    let last_year = YearStats::of(in_year(previous_year));

    let comparison = ComparisonTable {
        distance: Change::new(this_year.total_distance, last_year.total_distance),
        time: Change::new(this_year.total_time as f64, last_year.total_time as f64),
        activities: Change::new(
            this_year.total_activities as f64,
            last_year.total_activities as f64,
        ),
        elevation: Change::new(this_year.total_elevation, last_year.total_elevation),
        kudos: Change::new(this_year.total_kudos as f64, last_year.total_kudos as f64),
    };

    Comparisons {
        current_year,
        previous_year,
        this_year,
        last_year,
        comparison,
    }
}
