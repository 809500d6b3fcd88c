// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Distance/time/pace trends grouped by month or week.

use super::mean;
use crate::models::Activity;
use crate::time_utils::week_of_year;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    Week,
    #[default]
    Month,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    /// Sunday-based week of the year from [`week_of_year`]. Starts at 1,
    /// with days before the first Sunday in week 1, the same numbering as
    /// the stored consistency week.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    pub distance: f64,
    pub time: u64,
    pub activities: usize,
    pub avg_pace: Option<f64>,
    pub avg_heartrate: Option<f64>,
}

/// Group activities into chronological buckets.
pub fn trends(activities: &[Activity], period: TrendPeriod) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<(i32, u32), Vec<&Activity>> = BTreeMap::new();
    for activity in activities {
        let sub = match period {
            TrendPeriod::Month => activity.start_date.month(),
            TrendPeriod::Week => week_of_year(activity.start_date),
        };
        buckets
            .entry((activity.start_date.year(), sub))
            .or_default()
            .push(activity);
    }

    buckets
        .into_iter()
        .map(|((year, sub), group)| TrendPoint {
            year,
            month: (period == TrendPeriod::Month).then_some(sub),
            week: (period == TrendPeriod::Week).then_some(sub),
            distance: group.iter().map(|a| a.distance).sum(),
            time: group.iter().map(|a| a.moving_time).sum(),
            activities: group.len(),
            avg_pace: mean(group.iter().filter_map(|a| a.pace)),
            avg_heartrate: mean(group.iter().filter_map(|a| a.average_heartrate)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::test_support::{activity, at};

    #[test]
    fn test_monthly_trends_sorted() {
        // Input is newest first, as the store returns it.
        let activities = vec![
            activity(3, "Run", at(2024, 2, 5), 6000.0, 1800),
            activity(2, "Run", at(2024, 1, 20), 5000.0, 1500),
            activity(1, "Ride", at(2023, 12, 30), 20000.0, 3600),
        ];

        let points = trends(&activities, TrendPeriod::Month);
        let keys: Vec<(i32, Option<u32>)> = points.iter().map(|p| (p.year, p.month)).collect();
        assert_eq!(keys, vec![(2023, Some(12)), (2024, Some(1)), (2024, Some(2))]);
        assert_eq!(points[0].avg_pace, None);
        assert!((points[1].avg_pace.unwrap() - 5.0).abs() < 1e-9);
        assert!(points.iter().all(|p| p.week.is_none()));
    }

    #[test]
    fn test_weekly_trends() {
        // 2024-01-01 is a Monday: Jan 1-6 are week 1, Sunday Jan 7 starts week 2.
        let activities = vec![
            activity(1, "Run", at(2024, 1, 2), 5000.0, 1500),
            activity(2, "Run", at(2024, 1, 6), 5000.0, 1500),
            activity(3, "Run", at(2024, 1, 7), 5000.0, 1500),
        ];

        let points = trends(&activities, TrendPeriod::Week);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].week, Some(1));
        assert_eq!(points[0].activities, 2);
        assert_eq!(points[0].distance, 10000.0);
        assert_eq!(points[1].week, Some(2));
        assert!(points[0].month.is_none());
    }
}
