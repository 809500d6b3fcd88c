// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Running pace distribution and trend.

use super::{by_month, fastest_run, mean};
use crate::models::Activity;
use serde::Serialize;

/// Lower bounds (min/km) of the pace buckets; paces at or above the last
/// bound fall into the overflow bucket.
pub const PACE_BOUNDARIES: [f64; 14] = [
    0.0, 4.0, 4.5, 5.0, 5.5, 6.0, 6.5, 7.0, 7.5, 8.0, 9.0, 10.0, 12.0, 15.0,
];
pub const OVERFLOW_LABEL: &str = "15+";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceBucket {
    pub label: String,
    pub min: f64,
    /// Exclusive; absent for the overflow bucket
    pub max: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceTrendPoint {
    pub year: i32,
    pub month: u32,
    pub avg_pace: f64,
    pub best_pace: f64,
    pub activities: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaceAverages {
    pub avg_pace: Option<f64>,
    pub median_pace: Option<f64>,
    pub total_runs: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaceAnalysis {
    /// Non-empty buckets only, fastest first
    pub distribution: Vec<PaceBucket>,
    pub trend: Vec<PaceTrendPoint>,
    pub best_pace: Option<Activity>,
    pub average_stats: PaceAverages,
}

/// Index into [`PACE_BOUNDARIES`], or `None` for the overflow bucket.
fn bucket_index(pace: f64) -> Option<usize> {
    PACE_BOUNDARIES
        .windows(2)
        .position(|w| pace >= w[0] && pace < w[1])
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

/// Analyse running activities with a positive pace; other activities are ignored.
pub fn pace_analysis(activities: &[Activity]) -> PaceAnalysis {
    let runs: Vec<Activity> = activities
        .iter()
        .filter(|a| a.is_run() && a.pace.is_some_and(|p| p > 0.0))
        .cloned()
        .collect();
    let paces: Vec<f64> = runs.iter().filter_map(|a| a.pace).collect();

    let bucket_count = PACE_BOUNDARIES.len();
    let mut counts = vec![0usize; bucket_count];
    for &pace in &paces {
        let index = bucket_index(pace).unwrap_or(bucket_count - 1);
        counts[index] += 1;
    }

    let distribution = counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(i, &count)| {
            let min = PACE_BOUNDARIES[i];
            let max = PACE_BOUNDARIES.get(i + 1).copied();
            let label = match max {
                Some(max) => format!("{}-{}", format_bound(min), format_bound(max)),
                None => OVERFLOW_LABEL.to_string(),
            };
            PaceBucket {
                label,
                min,
                max,
                count,
            }
        })
        .collect();

    let trend = by_month(&runs)
        .into_iter()
        .map(|(key, group)| {
            let month_paces: Vec<f64> = group.iter().filter_map(|a| a.pace).collect();
            PaceTrendPoint {
                year: key.year,
                month: key.month,
                avg_pace: mean(month_paces.iter().copied()).unwrap_or(0.0),
                best_pace: month_paces.iter().copied().fold(f64::INFINITY, f64::min),
                activities: group.len(),
            }
        })
        .collect();

    let mut sorted = paces.clone();
    sorted.sort_by(f64::total_cmp);

    PaceAnalysis {
        distribution,
        trend,
        best_pace: fastest_run(&runs).cloned(),
        average_stats: PaceAverages {
            avg_pace: mean(paces.iter().copied()),
            median_pace: median(&sorted),
            total_runs: runs.len(),
        },
    }
}
