// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity import from Strava.
//!
//! Pages through `/athlete/activities` sequentially and upserts each record
//! by its Strava ID as soon as its page arrives, so a failure part-way through
//! keeps everything stored before it.

use crate::config::SyncConfig;
use crate::db::{Db, UpsertOutcome};
use crate::error::Result;
use crate::models::{Activity, LatLng, User};
use crate::services::strava::{StravaActivitySummary, StravaService};
use crate::time_utils::format_utc_rfc3339;
use serde::Serialize;

/// Result of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    /// Records created by this run
    pub synced: usize,
    /// Records that already existed and were replaced
    pub updated: usize,
    /// Activities fetched from Strava
    pub total: usize,
}

/// Imports a user's activity history.
pub struct ActivitySync {
    strava: StravaService,
    db: Db,
    config: SyncConfig,
}

impl ActivitySync {
    pub fn new(strava: StravaService, db: Db, config: SyncConfig) -> Self {
        Self { strava, db, config }
    }

    /// Import activities for a connected user.
    pub async fn sync_user(&self, user: &User) -> Result<SyncResult> {
        let access_token = self.strava.get_valid_access_token(user).await?;
        let per_page = self.config.page_size.max(1);
        let now = format_utc_rfc3339(chrono::Utc::now());

        let mut result = SyncResult::default();
        let mut page = 1u32;

        tracing::info!(user_id = %user.id, per_page, max = self.config.max_activities, "Starting activity sync");

        while result.total < self.config.max_activities {
            let activities = self
                .strava
                .client()
                .list_activities(&access_token, page, per_page)
                .await?;

            if activities.is_empty() {
                break;
            }

            let remaining = self.config.max_activities - result.total;
            for summary in activities.into_iter().take(remaining) {
                let activity = to_activity(summary, &user.id, &now);
                match self.db.upsert_activity(&activity).await? {
                    UpsertOutcome::Created => result.synced += 1,
                    UpsertOutcome::Updated => result.updated += 1,
                }
                result.total += 1;
            }

            tracing::debug!(user_id = %user.id, page, fetched = result.total, "Synced page");
            page += 1;
        }

        tracing::info!(
            user_id = %user.id,
            synced = result.synced,
            updated = result.updated,
            total = result.total,
            "Activity sync complete"
        );

        Ok(result)
    }
}

/// Map a Strava summary onto a stored activity owned by `user_id`.
pub fn to_activity(summary: StravaActivitySummary, user_id: &str, now: &str) -> Activity {
    let sport_type = summary
        .sport_type
        .or(summary.activity_type)
        .unwrap_or_else(|| "Workout".to_string());

    let mut activity = Activity {
        strava_activity_id: summary.id,
        user_id: user_id.to_string(),
        sport_type,
        name: summary.name,
        distance: summary.distance,
        moving_time: summary.moving_time,
        elapsed_time: summary.elapsed_time,
        total_elevation_gain: summary.total_elevation_gain,
        start_date: summary.start_date,
        start_date_local: summary.start_date_local.unwrap_or(summary.start_date),
        timezone: summary.timezone,
        average_speed: summary.average_speed,
        max_speed: summary.max_speed,
        pace: None,
        average_heartrate: summary.average_heartrate,
        max_heartrate: summary.max_heartrate,
        has_heartrate: summary.has_heartrate,
        average_cadence: summary.average_cadence,
        suffer_score: summary.suffer_score,
        calories: summary.calories,
        kudos_count: summary.kudos_count,
        achievement_count: summary.achievement_count,
        gear_id: summary.gear_id.filter(|g| !g.is_empty()),
        start_latlng: summary.start_latlng.as_deref().and_then(LatLng::from_slice),
        end_latlng: summary.end_latlng.as_deref().and_then(LatLng::from_slice),
        manual: summary.manual,
        visibility: summary
            .visibility
            .unwrap_or_else(|| "everyone".to_string()),
        consistency_week: 0,
        training_load_score: 0,
        created_at: now.to_string(),
        updated_at: now.to_string(),
    };
    activity.apply_derived_fields();
    activity
}
