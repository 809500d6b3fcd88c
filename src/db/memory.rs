// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local document store for development and tests.

use crate::db::ActivityFilter;
use crate::models::{Activity, Gear, User};
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory store. Clones share the same maps.
#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<String, User>>,
    activities: Arc<DashMap<u64, Activity>>,
    gear: Arc<DashMap<String, Gear>>,
}

impl MemoryDb {
    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|u| u.value().clone())
    }

    pub fn find_user_by_athlete_id(&self, athlete_id: u64) -> Option<User> {
        self.users
            .iter()
            .find(|u| u.strava_athlete_id == Some(athlete_id))
            .map(|u| u.value().clone())
    }

    pub fn upsert_user(&self, user: &User) {
        self.users.insert(user.id.clone(), user.clone());
    }

    pub fn get_activity(&self, activity_id: u64) -> Option<Activity> {
        self.activities.get(&activity_id).map(|a| a.value().clone())
    }

    pub fn set_activity(&self, activity: Activity) {
        self.activities.insert(activity.strava_activity_id, activity);
    }

    pub fn query_activities(&self, user_id: &str, filter: &ActivityFilter) -> Vec<Activity> {
        self.activities
            .iter()
            .filter(|a| a.user_id == user_id && filter.matches(a.value()))
            .map(|a| a.value().clone())
            .collect()
    }

    pub fn list_gear(&self, user_id: &str) -> Vec<Gear> {
        self.gear
            .iter()
            .filter(|g| g.user_id == user_id)
            .map(|g| g.value().clone())
            .collect()
    }

    pub fn get_gear(&self, gear_id: &str) -> Option<Gear> {
        self.gear.get(gear_id).map(|g| g.value().clone())
    }

    pub fn set_gear(&self, gear: Gear) {
        self.gear.insert(gear.id.clone(), gear);
    }
}
