// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gear recalculation, stats and user edits.

use crate::db::{ActivityFilter, Db};
use crate::error::{AppError, Result};
use crate::models::{Activity, Gear, GearType, User};
use crate::services::strava::{StravaGear, StravaService};
use crate::time_utils::format_utc_rfc3339;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use validator::Validate;

/// Concurrent gear detail lookups against Strava.
const MAX_CONCURRENT_GEAR_FETCHES: usize = 4;

/// Summary over a user's active (non-retired) gear.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GearStats {
    pub total_gear: usize,
    pub shoes_count: usize,
    pub bikes_count: usize,
    pub needing_replacement: usize,
    pub most_used: Option<MostUsedGear>,
    #[serde(rename = "totalDistance_km")]
    pub total_distance_km: f64,
    pub gear: Vec<Gear>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MostUsedGear {
    pub name: String,
    pub distance_km: f64,
}

/// Fields a user may edit on a gear record.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GearUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// Meters
    #[validate(range(min = 0.0))]
    pub distance_alert_threshold: Option<f64>,
    pub retired: Option<bool>,
}

/// Gear operations for a user.
#[derive(Clone)]
pub struct GearService {
    db: Db,
    strava: StravaService,
    default_alert_threshold: f64,
}

impl GearService {
    pub fn new(db: Db, strava: StravaService, default_alert_threshold: f64) -> Self {
        Self {
            db,
            strava,
            default_alert_threshold,
        }
    }

    /// Rebuild gear usage from the user's stored activities.
    ///
    /// Name, alert threshold, retired flag and replacement flag already on a
    /// record are kept. Names, brands and models are fetched from Strava when
    /// the user is connected; lookup failures only drop those details.
    pub async fn sync_user(&self, user: &User) -> Result<Vec<Gear>> {
        let activities = self
            .db
            .query_activities(&user.id, &ActivityFilter::default())
            .await?;

        let mut by_gear: BTreeMap<&str, Vec<&Activity>> = BTreeMap::new();
        for activity in &activities {
            if let Some(gear_id) = activity.gear_id.as_deref() {
                by_gear.entry(gear_id).or_default().push(activity);
            }
        }

        let gear_ids: Vec<String> = by_gear.keys().map(|id| id.to_string()).collect();
        let details = self.fetch_details(user, &gear_ids).await;
        let now = format_utc_rfc3339(chrono::Utc::now());

        for (gear_id, used) in &by_gear {
            let existing = self.db.get_gear(&user.id, gear_id).await?;
            let gear = merge_usage(
                existing,
                &user.id,
                gear_id,
                used,
                details.get(*gear_id),
                self.default_alert_threshold,
                &now,
            );
            self.db.upsert_gear(&gear).await?;
        }

        tracing::info!(user_id = %user.id, gear = by_gear.len(), "Gear sync complete");

        self.db.list_gear(&user.id).await
    }

    /// Best-effort lookup of gear details.
    async fn fetch_details(&self, user: &User, gear_ids: &[String]) -> HashMap<String, StravaGear> {
        if gear_ids.is_empty() || !user.is_strava_connected() {
            return HashMap::new();
        }

        let access_token = match self.strava.get_valid_access_token(user).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Skipping gear details, no token");
                return HashMap::new();
            }
        };

        let client = self.strava.client().clone();

        // Each lookup owns its inputs so the stream stays `Send` for the handler.
        stream::iter(gear_ids.to_vec())
            .map(|gear_id| {
                let client = client.clone();
                let access_token = access_token.clone();
                async move {
                    match client.get_gear(&access_token, &gear_id).await {
                        Ok(details) => Some((gear_id, details)),
                        Err(e) => {
                            tracing::warn!(gear_id = %gear_id, error = %e, "Failed to fetch gear details");
                            None
                        }
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_GEAR_FETCHES)
            .filter_map(|entry| async move { entry })
            .collect()
            .await
    }

    /// Stats over the user's non-retired gear.
    pub async fn stats(&self, user_id: &str) -> Result<GearStats> {
        let gear = self.db.list_gear(user_id).await?;
        Ok(gear_stats(gear.into_iter().filter(|g| !g.retired).collect()))
    }

    /// Apply a user edit to one of their gear records.
    pub async fn update(&self, user_id: &str, gear_id: &str, update: GearUpdate) -> Result<Gear> {
        update
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let mut gear = self
            .db
            .get_gear(user_id, gear_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Gear {}", gear_id)))?;

        if let Some(name) = update.name {
            gear.name = name;
        }
        if let Some(threshold) = update.distance_alert_threshold {
            gear.distance_alert_threshold = Some(threshold);
        }
        if let Some(retired) = update.retired {
            gear.retired = retired;
        }
        gear.updated_at = format_utc_rfc3339(chrono::Utc::now());

        tracing::info!(user_id, gear_id, "Gear updated");
        self.db.upsert_gear(&gear).await
    }
}

/// Placeholder name for gear Strava has not described.
fn placeholder_name(gear_id: &str) -> String {
    format!("Gear {}", gear_id)
}

/// Build the new gear record from its activities, keeping user-edited fields
/// from `existing`.
fn merge_usage(
    existing: Option<Gear>,
    user_id: &str,
    gear_id: &str,
    used: &[&Activity],
    details: Option<&StravaGear>,
    default_alert_threshold: f64,
    now: &str,
) -> Gear {
    let mut gear = existing.unwrap_or_else(|| Gear {
        id: Gear::document_id(user_id, gear_id),
        user_id: user_id.to_string(),
        strava_gear_id: gear_id.to_string(),
        name: placeholder_name(gear_id),
        brand_name: None,
        model_name: None,
        gear_type: GearType::from_strava_id(gear_id),
        distance: 0.0,
        retired: false,
        total_activities: 0,
        total_time: 0,
        average_pace: None,
        first_activity_date: None,
        last_activity_date: None,
        distance_alert_threshold: Some(default_alert_threshold),
        needs_replacement: false,
        created_at: now.to_string(),
        updated_at: now.to_string(),
    });

    if let Some(details) = details {
        if gear.name == placeholder_name(gear_id) {
            if let Some(name) = details.name.as_ref().filter(|n| !n.is_empty()) {
                gear.name = name.clone();
            }
        }
        gear.brand_name = details.brand_name.clone().or(gear.brand_name.take());
        gear.model_name = details.model_name.clone().or(gear.model_name.take());
    }

    let paces: Vec<f64> = used.iter().filter_map(|a| a.pace).collect();

    gear.gear_type = GearType::from_strava_id(gear_id);
    gear.distance = used.iter().map(|a| a.distance).sum();
    gear.total_activities = used.len() as u32;
    gear.total_time = used.iter().map(|a| a.moving_time).sum();
    gear.average_pace = if paces.is_empty() {
        None
    } else {
        Some(paces.iter().sum::<f64>() / paces.len() as f64)
    };
    gear.first_activity_date = used.iter().map(|a| a.start_date).min();
    gear.last_activity_date = used.iter().map(|a| a.start_date).max();
    gear.updated_at = now.to_string();
    gear
}

/// Counts and totals over a set of gear.
pub fn gear_stats(gear: Vec<Gear>) -> GearStats {
    let most_used = gear
        .iter()
        .fold(None::<&Gear>, |best, g| match best {
            Some(b) if b.distance >= g.distance => Some(b),
            _ => Some(g),
        })
        .map(|g| MostUsedGear {
            name: g.name.clone(),
            distance_km: g.distance_km(),
        });
    let total_distance: f64 = gear.iter().map(|g| g.distance).sum();

    GearStats {
        total_gear: gear.len(),
        shoes_count: gear.iter().filter(|g| g.gear_type == GearType::Shoes).count(),
        bikes_count: gear.iter().filter(|g| g.gear_type == GearType::Bike).count(),
        needing_replacement: gear.iter().filter(|g| g.needs_replacement).count(),
        most_used,
        total_distance_km: (total_distance / 1000.0).round(),
        gear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::test_support::{activity, at};

    fn gear_with(id: &str, gear_type: GearType, distance: f64) -> Gear {
        let mut gear = merge_usage(None, "user-1", id, &[], None, 800_000.0, "now");
        gear.gear_type = gear_type;
        gear.distance = distance;
        gear
    }

    #[test]
    fn test_merge_usage_new_gear() {
        let mut run1 = activity(1, "Run", at(2024, 1, 10), 10_000.0, 3000);
        let mut run2 = activity(2, "Run", at(2024, 2, 10), 5_000.0, 1800);
        let mut ride = activity(3, "Ride", at(2024, 3, 10), 30_000.0, 3600);
        for a in [&mut run1, &mut run2, &mut ride] {
            a.gear_id = Some("g7".to_string());
        }

        let gear = merge_usage(None, "user-1", "g7", &[&run1, &run2, &ride], None, 800_000.0, "now");

        assert_eq!(gear.id, "user-1_g7");
        assert_eq!(gear.name, "Gear g7");
        assert_eq!(gear.gear_type, GearType::Shoes);
        assert_eq!(gear.distance, 45_000.0);
        assert_eq!(gear.total_activities, 3);
        assert_eq!(gear.total_time, 8400);
        // Average over runs only: (5.0 + 6.0) / 2
        assert!((gear.average_pace.unwrap() - 5.5).abs() < 1e-9);
        assert_eq!(gear.first_activity_date, Some(at(2024, 1, 10)));
        assert_eq!(gear.last_activity_date, Some(at(2024, 3, 10)));
        assert_eq!(gear.distance_alert_threshold, Some(800_000.0));
    }

    #[test]
    fn test_merge_usage_keeps_user_edits() {
        let mut previous = merge_usage(None, "user-1", "b3", &[], None, 800_000.0, "then");
        previous.name = "Commuter".to_string();
        previous.retired = true;
        previous.distance_alert_threshold = Some(5_000_000.0);
        previous.needs_replacement = true;

        let details = StravaGear {
            id: "b3".to_string(),
            name: Some("Strava Name".to_string()),
            brand_name: Some("Brand".to_string()),
            model_name: None,
        };
        let ride = activity(9, "Ride", at(2024, 5, 1), 20_000.0, 3600);

        let gear = merge_usage(Some(previous), "user-1", "b3", &[&ride], Some(&details), 800_000.0, "now");

        assert_eq!(gear.name, "Commuter");
        assert_eq!(gear.brand_name.as_deref(), Some("Brand"));
        assert!(gear.retired);
        assert!(gear.needs_replacement);
        assert_eq!(gear.distance_alert_threshold, Some(5_000_000.0));
        assert_eq!(gear.gear_type, GearType::Bike);
        assert_eq!(gear.created_at, "then");
    }

    #[test]
    fn test_placeholder_replaced_by_strava_name() {
        let details = StravaGear {
            id: "g1".to_string(),
            name: Some("Pegasus 40".to_string()),
            brand_name: Some("Nike".to_string()),
            model_name: Some("Pegasus".to_string()),
        };
        let gear = merge_usage(None, "user-1", "g1", &[], Some(&details), 800_000.0, "now");
        assert_eq!(gear.name, "Pegasus 40");
        assert_eq!(gear.model_name.as_deref(), Some("Pegasus"));
    }

    #[test]
    fn test_gear_stats() {
        let mut worn = gear_with("g1", GearType::Shoes, 850_000.0);
        worn.needs_replacement = true;
        let stats = gear_stats(vec![
            worn,
            gear_with("g2", GearType::Shoes, 120_400.0),
            gear_with("b1", GearType::Bike, 2_000_000.0),
        ]);

        assert_eq!(stats.total_gear, 3);
        assert_eq!(stats.shoes_count, 2);
        assert_eq!(stats.bikes_count, 1);
        assert_eq!(stats.needing_replacement, 1);
        let most_used = stats.most_used.unwrap();
        assert_eq!(most_used.name, "Gear b1");
        assert_eq!(most_used.distance_km, 2000.0);
        assert_eq!(stats.total_distance_km, 2970.0);
    }

    #[test]
    fn test_gear_stats_empty() {
        let stats = gear_stats(vec![]);
        assert_eq!(stats.total_gear, 0);
        assert!(stats.most_used.is_none());

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["mostUsed"].is_null());
        assert_eq!(json["totalDistance_km"], 0.0);
    }

    #[test]
    fn test_gear_update_validation() {
        let update = GearUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = GearUpdate {
            distance_alert_threshold: Some(-1.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = GearUpdate {
            name: Some("Race flats".to_string()),
            distance_alert_threshold: Some(500_000.0),
            retired: Some(false),
        };
        assert!(update.validate().is_ok());
    }
}
