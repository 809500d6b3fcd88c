// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! TrackMyRun: fitness analytics on top of Strava.
//!
//! This crate provides the backend API that imports a user's Strava
//! activities and gear, and serves training analytics over them.

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::{ActivitySync, GearService, StravaClient, StravaService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub strava_service: StravaService,
    pub activity_sync: ActivitySync,
    pub gear_service: GearService,
}

impl AppState {
    /// Wire up the services over an already-opened store.
    pub fn new(config: Config, db: Db) -> Self {
        let strava_service = StravaService::new(StravaClient::from_config(&config), db.clone());
        let activity_sync =
            ActivitySync::new(strava_service.clone(), db.clone(), config.sync.clone());
        let gear_service = GearService::new(
            db.clone(),
            strava_service.clone(),
            config.gear_alert_threshold_meters,
        );

        Self {
            config,
            db,
            strava_service,
            activity_sync,
            gear_service,
        }
    }
}
