// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gear (shoes, bikes) with cumulative usage and replacement alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum GearType {
    Bike,
    Shoes,
    #[default]
    Other,
}

impl GearType {
    /// Strava prefixes bike IDs with `b` and shoe IDs with `g`.
    pub fn from_strava_id(gear_id: &str) -> Self {
        match gear_id.chars().next() {
            Some('b') => GearType::Bike,
            Some('g') => GearType::Shoes,
            _ => GearType::Other,
        }
    }
}

/// Stored gear record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Gear {
    /// Document ID: `{user_id}_{strava_gear_id}`
    pub id: String,
    pub user_id: String,
    pub strava_gear_id: String,
    pub name: String,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    #[serde(default)]
    pub gear_type: GearType,
    /// Cumulative distance in meters
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub retired: bool,

    // ─── Usage (recomputed from activities) ──────────────────────
    #[serde(default)]
    pub total_activities: u32,
    /// Total moving time in seconds
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_time: u64,
    /// Average pace over running activities (min/km)
    pub average_pace: Option<f64>,
    pub first_activity_date: Option<DateTime<Utc>>,
    pub last_activity_date: Option<DateTime<Utc>>,

    // ─── Alerts ──────────────────────────────────────────────────
    /// Alert when cumulative distance reaches this many meters
    pub distance_alert_threshold: Option<f64>,
    #[serde(default)]
    pub needs_replacement: bool,

    pub created_at: String,
    pub updated_at: String,
}

impl Gear {
    /// Document ID for a user's gear. Strava gear IDs are only unique per athlete.
    pub fn document_id(user_id: &str, strava_gear_id: &str) -> String {
        format!("{}_{}", user_id, urlencoding::encode(strava_gear_id))
    }

    /// Flag the gear for replacement once it reaches its alert threshold.
    ///
    /// The flag is never cleared here: a gear that dropped back below the
    /// threshold keeps its previous value.
    pub fn check_replacement(&mut self) {
        if let Some(threshold) = self.distance_alert_threshold {
            if threshold > 0.0 && self.distance >= threshold {
                self.needs_replacement = true;
            }
        }
    }

    /// Distance in whole kilometers.
    pub fn distance_km(&self) -> f64 {
        (self.distance / 1000.0).round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shoes(distance: f64, threshold: Option<f64>) -> Gear {
        Gear {
            id: Gear::document_id("user-1", "g123"),
            user_id: "user-1".to_string(),
            strava_gear_id: "g123".to_string(),
            name: "Gear g123".to_string(),
            brand_name: None,
            model_name: None,
            gear_type: GearType::Shoes,
            distance,
            retired: false,
            total_activities: 0,
            total_time: 0,
            average_pace: None,
            first_activity_date: None,
            last_activity_date: None,
            distance_alert_threshold: threshold,
            needs_replacement: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_gear_type_from_strava_id() {
        assert_eq!(GearType::from_strava_id("b1234"), GearType::Bike);
        assert_eq!(GearType::from_strava_id("g1234"), GearType::Shoes);
        assert_eq!(GearType::from_strava_id("x1"), GearType::Other);
        assert_eq!(GearType::from_strava_id(""), GearType::Other);
    }

    #[test]
    fn test_replacement_flag_set_at_threshold() {
        let mut gear = shoes(799_999.0, Some(800_000.0));
        gear.check_replacement();
        assert!(!gear.needs_replacement);

        gear.distance = 800_000.0;
        gear.check_replacement();
        assert!(gear.needs_replacement);
    }

    #[test]
    fn test_replacement_flag_not_reset() {
        let mut gear = shoes(900_000.0, Some(800_000.0));
        gear.check_replacement();
        assert!(gear.needs_replacement);

        gear.distance = 100.0;
        gear.check_replacement();
        assert!(gear.needs_replacement);
    }

    #[test]
    fn test_no_threshold_never_flags() {
        let mut gear = shoes(5_000_000.0, None);
        gear.check_replacement();
        assert!(!gear.needs_replacement);
    }
}
