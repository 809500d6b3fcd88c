// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity model for storage and API.
//!
//! Derived fields (pace, week bucket, training load) are recomputed by
//! [`Activity::apply_derived_fields`] every time the store writes a record.

use crate::time_utils::consistency_week;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Heart rate used as the reference for the training-load factor.
const TRAINING_LOAD_REFERENCE_HR: f64 = 180.0;
/// Training-load factor when the activity has no heart rate data.
pub const DEFAULT_HR_FACTOR: f64 = 0.7;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Build from Strava's `[lat, lng]` array, which is empty for indoor activities.
    pub fn from_slice(coords: &[f64]) -> Option<Self> {
        match coords {
            [lat, lng] => Some(Self {
                lat: *lat,
                lng: *lng,
            }),
            _ => None,
        }
    }
}

/// Stored activity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    /// Strava activity ID (also used as document ID)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub strava_activity_id: u64,
    /// Owning user
    pub user_id: String,
    /// Sport type (Ride, Run, TrailRun, Hike, etc.)
    pub sport_type: String,
    /// Activity name/title
    pub name: String,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub moving_time: u64,
    /// Elapsed time in seconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub elapsed_time: u64,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    pub start_date: DateTime<Utc>,
    /// Wall-clock start time at the activity location (Strava marks it `Z`)
    pub start_date_local: DateTime<Utc>,
    pub timezone: Option<String>,

    // ─── Speed & Pace ────────────────────────────────────────────
    /// m/s
    pub average_speed: Option<f64>,
    /// m/s
    pub max_speed: Option<f64>,
    /// Minutes per kilometer (running activities only)
    pub pace: Option<f64>,

    // ─── Heart Rate & Cadence ────────────────────────────────────
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    #[serde(default)]
    pub has_heartrate: bool,
    pub average_cadence: Option<f64>,

    // ─── Effort ──────────────────────────────────────────────────
    /// Strava's relative effort
    pub suffer_score: Option<f64>,
    pub calories: Option<f64>,

    // ─── Social ──────────────────────────────────────────────────
    #[serde(default)]
    pub kudos_count: u32,
    #[serde(default)]
    pub achievement_count: u32,

    /// Strava gear ID (e.g. "g1234567")
    pub gear_id: Option<String>,

    pub start_latlng: Option<LatLng>,
    pub end_latlng: Option<LatLng>,

    /// Manual entry rather than GPS recording
    #[serde(default)]
    pub manual: bool,
    /// everyone, followers_only, only_me
    pub visibility: String,

    // ─── Derived ─────────────────────────────────────────────────
    /// Week bucket in YYYYWW form
    #[serde(default)]
    pub consistency_week: u32,
    #[serde(default)]
    pub training_load_score: u32,

    /// When this record was first stored (ISO 8601)
    pub created_at: String,
    /// When this record was last written (ISO 8601)
    pub updated_at: String,
}

impl Activity {
    /// Recompute pace, week bucket and training load from the raw fields.
    pub fn apply_derived_fields(&mut self) {
        self.pace = compute_pace(&self.sport_type, self.distance, self.moving_time);
        self.consistency_week = consistency_week(self.start_date);
        self.training_load_score = training_load_score(self.moving_time, self.average_heartrate);
    }

    /// Whether the sport type is a running variant (Run, TrailRun, VirtualRun).
    pub fn is_run(&self) -> bool {
        is_running_sport(&self.sport_type)
    }

    /// Moving time in minutes.
    pub fn moving_minutes(&self) -> f64 {
        self.moving_time as f64 / 60.0
    }
}

/// Whether a sport type name denotes running.
pub fn is_running_sport(sport_type: &str) -> bool {
    sport_type.to_lowercase().contains("run")
}

/// Pace in minutes per kilometer, for running activities with a distance.
pub fn compute_pace(sport_type: &str, distance_meters: f64, moving_time_secs: u64) -> Option<f64> {
    if !is_running_sport(sport_type) || distance_meters <= 0.0 {
        return None;
    }
    Some((moving_time_secs as f64 / 60.0) / (distance_meters / 1000.0))
}

/// Heart-rate weighted training load (a simplified TRIMP).
pub fn training_load_score(moving_time_secs: u64, average_heartrate: Option<f64>) -> u32 {
    let hr_factor = average_heartrate
        .filter(|hr| *hr > 0.0)
        .map(|hr| hr / TRAINING_LOAD_REFERENCE_HR)
        .unwrap_or(DEFAULT_HR_FACTOR);
    let minutes = moving_time_secs as f64 / 60.0;
    (minutes * hr_factor).round() as u32
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::TimeZone;

    /// Minimal activity for analytics tests; derived fields already applied.
    pub fn activity(id: u64, sport: &str, start: DateTime<Utc>, distance: f64, moving: u64) -> Activity {
        let mut activity = Activity {
            strava_activity_id: id,
            user_id: "user-1".to_string(),
            sport_type: sport.to_string(),
            name: format!("Activity {}", id),
            distance,
            moving_time: moving,
            elapsed_time: moving,
            total_elevation_gain: 0.0,
            start_date: start,
            start_date_local: start,
            timezone: None,
            average_speed: None,
            max_speed: None,
            pace: None,
            average_heartrate: None,
            max_heartrate: None,
            has_heartrate: false,
            average_cadence: None,
            suffer_score: None,
            calories: None,
            kudos_count: 0,
            achievement_count: 0,
            gear_id: None,
            start_latlng: None,
            end_latlng: None,
            manual: false,
            visibility: "everyone".to_string(),
            consistency_week: 0,
            training_load_score: 0,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        };
        activity.apply_derived_fields();
        activity
    }

    pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 8, 0, 0).unwrap()
    }
}
