// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Where activities start: grid cells, timezones, heatmap.

use super::round_to;
use crate::models::{Activity, LatLng};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

const TOP_TIMEZONES: usize = 10;
const HEATMAP_LIMIT: usize = 1000;
const TOP_STARTS: usize = 5;
/// Distance (meters) at which a heatmap point reaches full weight.
const HEATMAP_FULL_WEIGHT_METERS: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimezoneCount {
    pub timezone: String,
    pub count: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapPoint {
    pub lat: f64,
    pub lng: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartPoint {
    pub lat: f64,
    pub lng: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Locations {
    pub total_activities_with_location: usize,
    pub unique_locations: usize,
    pub timezones: Vec<TimezoneCount>,
    pub heatmap_data: Vec<HeatmapPoint>,
    pub most_frequent_starts: Vec<StartPoint>,
}

/// Roughly 1 km grid cell.
fn grid_cell(point: &LatLng) -> (i64, i64) {
    (
        (point.lat * 100.0).round() as i64,
        (point.lng * 100.0).round() as i64,
    )
}

pub fn locations(activities: &[Activity]) -> Locations {
    let located: Vec<(&Activity, LatLng)> = activities
        .iter()
        .filter_map(|a| a.start_latlng.map(|p| (a, p)))
        .collect();

    let unique_locations = located
        .iter()
        .map(|(_, p)| grid_cell(p))
        .collect::<HashSet<_>>()
        .len();

    let mut zones: BTreeMap<&str, TimezoneCount> = BTreeMap::new();
    for (activity, _) in &located {
        if let Some(tz) = activity.timezone.as_deref() {
            let entry = zones.entry(tz).or_insert_with(|| TimezoneCount {
                timezone: tz.to_string(),
                count: 0,
                distance: 0.0,
            });
            entry.count += 1;
            entry.distance += activity.distance;
        }
    }
    let mut timezones: Vec<TimezoneCount> = zones.into_values().collect();
    timezones.sort_by(|a, b| b.count.cmp(&a.count));
    timezones.truncate(TOP_TIMEZONES);

    let heatmap_data = located
        .iter()
        .take(HEATMAP_LIMIT)
        .map(|(a, p)| HeatmapPoint {
            lat: p.lat,
            lng: p.lng,
            weight: (a.distance / HEATMAP_FULL_WEIGHT_METERS).min(1.0),
        })
        .collect();

    // Counted at 3 decimal places; ties keep first-seen order.
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut starts: Vec<StartPoint> = Vec::new();
    for (_, p) in &located {
        let key = format!("{:.3},{:.3}", p.lat, p.lng);
        match index.get(&key) {
            Some(&i) => starts[i].count += 1,
            None => {
                index.insert(key, starts.len());
                starts.push(StartPoint {
                    lat: round_to(p.lat, 3),
                    lng: round_to(p.lng, 3),
                    count: 1,
                });
            }
        }
    }
    starts.sort_by(|a, b| b.count.cmp(&a.count));
    starts.truncate(TOP_STARTS);

    Locations {
        total_activities_with_location: located.len(),
        unique_locations,
        timezones,
        heatmap_data,
        most_frequent_starts: starts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::test_support::{activity, at};

    fn located(id: u64, lat: f64, lng: f64, tz: Option<&str>, distance: f64) -> Activity {
        let mut a = activity(id, "Run", at(2024, 4, 1), distance, 1800);
        a.start_latlng = Some(LatLng { lat, lng });
        a.timezone = tz.map(str::to_string);
        a
    }

    #[test]
    fn test_locations() {
        let pacific = Some("(GMT-08:00) America/Los_Angeles");
        let activities = vec![
            located(1, 37.4001, -122.1001, pacific, 5_000.0),
            located(2, 37.4002, -122.1002, pacific, 20_000.0),
            located(3, 37.5000, -122.3000, pacific, 8_000.0),
            located(4, 48.8566, 2.3522, Some("(GMT+01:00) Europe/Paris"), 10_000.0),
            activity(5, "Run", at(2024, 4, 2), 5_000.0, 1500),
        ];

        let result = locations(&activities);

        assert_eq!(result.total_activities_with_location, 4);
        assert_eq!(result.unique_locations, 3);

        assert_eq!(result.timezones[0].timezone, "(GMT-08:00) America/Los_Angeles");
        assert_eq!(result.timezones[0].count, 3);
        assert_eq!(result.timezones[0].distance, 33_000.0);
        assert_eq!(result.timezones.len(), 2);

        let weights: Vec<f64> = result.heatmap_data.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![0.5, 1.0, 0.8, 1.0]);

        assert_eq!(
            result.most_frequent_starts[0],
            StartPoint {
                lat: 37.4,
                lng: -122.1,
                count: 2
            }
        );
        assert_eq!(result.most_frequent_starts[1].lat, 37.5);
        assert_eq!(result.most_frequent_starts.len(), 3);
    }

    #[test]
    fn test_heatmap_limit() {
        let activities: Vec<Activity> = (0..1200)
            .map(|i| located(i, 10.0 + i as f64 * 0.001, 20.0, None, 1_000.0))
            .collect();

        let result = locations(&activities);
        assert_eq!(result.heatmap_data.len(), HEATMAP_LIMIT);
        assert_eq!(result.most_frequent_starts.len(), TOP_STARTS);
        assert!(result.timezones.is_empty());
    }
}
