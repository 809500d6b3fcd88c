// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Heart-rate zone distribution.
//!
//! Activities are placed in a zone by their average heart rate, so the time
//! in zone is an approximation: the whole moving time counts toward one zone.

use super::{by_month, mean};
use crate::models::Activity;
use serde::Serialize;

const HR_PACE_SAMPLE_LIMIT: usize = 100;

/// Zone name and its band as fractions of max heart rate.
pub const ZONES: [(&str, f64, f64); 5] = [
    ("Zone 1 (Recovery)", 0.0, 0.6),
    ("Zone 2 (Aerobic)", 0.6, 0.7),
    ("Zone 3 (Tempo)", 0.7, 0.8),
    ("Zone 4 (Threshold)", 0.8, 0.9),
    ("Zone 5 (Max)", 0.9, 1.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStats {
    pub zone: u8,
    pub name: String,
    #[serde(rename = "minHR")]
    pub min_hr: u32,
    #[serde(rename = "maxHR")]
    pub max_hr: u32,
    pub total_time: u64,
    pub activities: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HrTrendPoint {
    pub year: i32,
    pub month: u32,
    pub avg_hr: Option<f64>,
    pub max_hr: Option<f64>,
    pub avg_pace: Option<f64>,
    pub activities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HrPacePoint {
    pub average_heartrate: f64,
    pub pace: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateZones {
    pub zones: Vec<ZoneStats>,
    #[serde(rename = "totalActivitiesWithHR")]
    pub total_activities_with_hr: usize,
    pub hr_trend: Vec<HrTrendPoint>,
    pub hr_pace_correlation: Vec<HrPacePoint>,
    #[serde(rename = "maxHRUsed")]
    pub max_hr_used: u32,
}

/// Zone distribution for activities with a positive average heart rate.
/// `max_hr` must be positive; callers validate it.
pub fn heart_rate_zones(activities: &[Activity], max_hr: u32) -> HeartRateZones {
    let with_hr: Vec<Activity> = activities
        .iter()
        .filter(|a| a.average_heartrate.is_some_and(|hr| hr > 0.0))
        .cloned()
        .collect();
    let max = f64::from(max_hr);

    let mut zones: Vec<ZoneStats> = ZONES
        .iter()
        .enumerate()
        .map(|(i, &(name, low, high))| {
            let (min_hr, max_hr) = (low * max, high * max);
            let in_zone: Vec<&Activity> = with_hr
                .iter()
                .filter(|a| {
                    a.average_heartrate
                        .is_some_and(|hr| hr >= min_hr && hr < max_hr)
                })
                .collect();
            ZoneStats {
                zone: i as u8 + 1,
                name: name.to_string(),
                min_hr: min_hr.round() as u32,
                max_hr: max_hr.round() as u32,
                total_time: in_zone.iter().map(|a| a.moving_time).sum(),
                activities: in_zone.len(),
                percentage: 0,
            }
        })
        .collect();

    let total_zone_time: u64 = zones.iter().map(|z| z.total_time).sum();
    if total_zone_time > 0 {
        for zone in &mut zones {
            zone.percentage =
                (zone.total_time as f64 / total_zone_time as f64 * 100.0).round() as u32;
        }
    }

    let hr_trend = by_month(&with_hr)
        .into_iter()
        .map(|(key, group)| HrTrendPoint {
            year: key.year,
            month: key.month,
            avg_hr: mean(group.iter().filter_map(|a| a.average_heartrate)),
            max_hr: group.iter().filter_map(|a| a.max_heartrate).reduce(f64::max),
            avg_pace: mean(group.iter().filter_map(|a| a.pace)),
            activities: group.len(),
        })
        .collect();

    let hr_pace_correlation = with_hr
        .iter()
        .filter_map(|a| match (a.average_heartrate, a.pace) {
            (Some(hr), Some(pace)) if pace > 0.0 => Some(HrPacePoint {
                average_heartrate: hr,
                pace,
            }),
            _ => None,
        })
        .take(HR_PACE_SAMPLE_LIMIT)
        .collect();

    HeartRateZones {
        zones,
        total_activities_with_hr: with_hr.len(),
        hr_trend,
        hr_pace_correlation,
        max_hr_used: max_hr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::test_support::{activity, at};

    fn with_hr(id: u64, hr: f64, moving: u64) -> Activity {
        let mut a = activity(id, "Run", at(2024, 5, id as u32), 10_000.0, moving);
        a.average_heartrate = Some(hr);
        a.max_heartrate = Some(hr + 20.0);
        a.has_heartrate = true;
        a.apply_derived_fields();
        a
    }

    #[test]
    fn test_zone_boundaries() {
        // max 200: zone 2 is [120, 140), zone 5 is [180, 200)
        let activities = vec![
            with_hr(1, 119.0, 1000),
            with_hr(2, 120.0, 1000),
            with_hr(3, 139.9, 2000),
            with_hr(4, 180.0, 1000),
            with_hr(5, 200.0, 5000),
        ];

        let result = heart_rate_zones(&activities, 200);
        let counts: Vec<usize> = result.zones.iter().map(|z| z.activities).collect();

        assert_eq!(counts, vec![1, 2, 0, 0, 1]);
        assert_eq!(result.zones[1].min_hr, 120);
        assert_eq!(result.zones[1].max_hr, 140);
        assert_eq!(result.zones[1].total_time, 3000);
        // Time at or above max HR falls outside every zone.
        assert_eq!(result.zones.iter().map(|z| z.total_time).sum::<u64>(), 5000);
        assert_eq!(result.zones[1].percentage, 60);
        assert_eq!(result.total_activities_with_hr, 5);
        assert_eq!(result.max_hr_used, 200);
    }

    #[test]
    fn test_trend_and_correlation() {
        let mut ride = activity(9, "Ride", at(2024, 6, 1), 30_000.0, 3600);
        ride.average_heartrate = Some(130.0);
        let no_hr = activity(10, "Run", at(2024, 6, 2), 5_000.0, 1500);
        let activities = vec![with_hr(1, 150.0, 3000), with_hr(2, 160.0, 3000), ride, no_hr];

        let result = heart_rate_zones(&activities, 190);

        assert_eq!(result.total_activities_with_hr, 3);
        assert_eq!(result.hr_trend.len(), 2);
        assert_eq!(result.hr_trend[0].avg_hr, Some(155.0));
        assert_eq!(result.hr_trend[0].max_hr, Some(180.0));
        assert_eq!(result.hr_trend[1].avg_pace, None);
        // The ride has no pace.
        assert_eq!(result.hr_pace_correlation.len(), 2);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(heart_rate_zones(&[], 190)).unwrap();
        assert_eq!(json["maxHRUsed"], 190);
        assert_eq!(json["totalActivitiesWithHR"], 0);
        assert_eq!(json["zones"][0]["minHR"], 0);
        assert_eq!(json["zones"][0]["maxHR"], 114);
        assert_eq!(json["zones"][4]["name"], "Zone 5 (Max)");
        assert_eq!(json["zones"][4]["percentage"], 0);
    }
}
