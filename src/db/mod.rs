// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Db`] is the handle the rest of the crate uses. It dispatches to
//! Firestore in production or to a process-local store for development and
//! tests, and applies the write hooks (derived activity fields, gear
//! replacement check) so every write path gets them.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreDb;
pub use self::memory::MemoryDb;

use crate::error::AppError;
use crate::models::{Activity, Gear, User};
use chrono::{DateTime, Utc};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ACTIVITIES: &str = "activities";
    pub const GEAR: &str = "gear";
}

/// Filter applied to a user's activities.
///
/// Date bounds are half-open: `start <= start_date < end`.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub sport_type: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub gear_id: Option<String>,
}

impl ActivityFilter {
    /// Restrict to one sport type; an empty name means no restriction.
    pub fn sport_type(mut self, sport_type: Option<String>) -> Self {
        self.sport_type = sport_type.filter(|s| !s.is_empty());
        self
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn since(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn gear(mut self, gear_id: &str) -> Self {
        self.gear_id = Some(gear_id.to_string());
        self
    }

    /// Evaluate the filter against an activity (used by the in-memory store).
    pub fn matches(&self, activity: &Activity) -> bool {
        if let Some(sport) = &self.sport_type {
            if &activity.sport_type != sport {
                return false;
            }
        }
        if let Some(start) = self.start {
            if activity.start_date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if activity.start_date >= end {
                return false;
            }
        }
        if let Some(gear_id) = &self.gear_id {
            if activity.gear_id.as_deref() != Some(gear_id.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Whether an upsert created a new document or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Document store handle.
#[derive(Clone)]
pub enum Db {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl Db {
    /// Fresh, empty in-memory store.
    pub fn memory() -> Self {
        Db::Memory(MemoryDb::default())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match self {
            Db::Firestore(db) => db.get_user(user_id).await,
            Db::Memory(db) => Ok(db.get_user(user_id)),
        }
    }

    /// Find the user connected to a Strava athlete.
    pub async fn find_user_by_athlete_id(&self, athlete_id: u64) -> Result<Option<User>, AppError> {
        match self {
            Db::Firestore(db) => db.find_user_by_athlete_id(athlete_id).await,
            Db::Memory(db) => Ok(db.find_user_by_athlete_id(athlete_id)),
        }
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Db::Firestore(db) => db.upsert_user(user).await,
            Db::Memory(db) => {
                db.upsert_user(user);
                Ok(())
            }
        }
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Get an activity by Strava ID.
    pub async fn get_activity(&self, activity_id: u64) -> Result<Option<Activity>, AppError> {
        match self {
            Db::Firestore(db) => db.get_activity(activity_id).await,
            Db::Memory(db) => Ok(db.get_activity(activity_id)),
        }
    }

    /// Insert or replace an activity keyed by its Strava ID.
    ///
    /// Derived fields are recomputed and the original `created_at` is kept.
    pub async fn upsert_activity(&self, activity: &Activity) -> Result<UpsertOutcome, AppError> {
        let mut activity = activity.clone();
        let existing = self.get_activity(activity.strava_activity_id).await?;

        let outcome = match existing {
            Some(previous) => {
                activity.created_at = previous.created_at;
                UpsertOutcome::Updated
            }
            None => UpsertOutcome::Created,
        };
        activity.apply_derived_fields();

        match self {
            Db::Firestore(db) => db.set_activity(&activity).await?,
            Db::Memory(db) => db.set_activity(activity),
        }
        Ok(outcome)
    }

    /// Get a user's activities matching `filter`, newest first.
    pub async fn query_activities(
        &self,
        user_id: &str,
        filter: &ActivityFilter,
    ) -> Result<Vec<Activity>, AppError> {
        let mut activities = match self {
            Db::Firestore(db) => db.query_activities(user_id, filter).await?,
            Db::Memory(db) => db.query_activities(user_id, filter),
        };
        activities.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(activities)
    }

    // ─── Gear Operations ─────────────────────────────────────────

    /// Get all gear for a user, most used first.
    pub async fn list_gear(&self, user_id: &str) -> Result<Vec<Gear>, AppError> {
        let mut gear = match self {
            Db::Firestore(db) => db.list_gear(user_id).await?,
            Db::Memory(db) => db.list_gear(user_id),
        };
        gear.sort_by(|a, b| b.distance.total_cmp(&a.distance));
        Ok(gear)
    }

    /// Get the record for Strava gear `gear_id` owned by `user_id`.
    pub async fn get_gear(&self, user_id: &str, gear_id: &str) -> Result<Option<Gear>, AppError> {
        let doc_id = Gear::document_id(user_id, gear_id);
        let gear = match self {
            Db::Firestore(db) => db.get_gear(&doc_id).await?,
            Db::Memory(db) => db.get_gear(&doc_id),
        };
        Ok(gear.filter(|g| g.user_id == user_id))
    }

    /// Create or update a gear record, re-running the replacement check.
    pub async fn upsert_gear(&self, gear: &Gear) -> Result<Gear, AppError> {
        let mut gear = gear.clone();
        gear.check_replacement();

        match self {
            Db::Firestore(db) => db.set_gear(&gear).await?,
            Db::Memory(db) => db.set_gear(gear.clone()),
        }
        Ok(gear)
    }
}
