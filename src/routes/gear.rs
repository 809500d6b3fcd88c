// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gear routes.

use super::current_user;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Gear;
use crate::services::{GearStats, GearUpdate};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/gear", get(list_gear))
        .route("/api/gear/sync", post(sync_gear))
        .route("/api/gear/stats", get(gear_stats))
        .route("/api/gear/{id}", patch(update_gear))
}

#[derive(Serialize)]
pub struct GearListResponse {
    pub gear: Vec<Gear>,
}

/// All gear, most used first.
async fn list_gear(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<GearListResponse>> {
    let gear = state.db.list_gear(&auth.user_id).await?;
    Ok(Json(GearListResponse { gear }))
}

#[derive(Serialize)]
pub struct GearSyncResponse {
    pub message: String,
    pub gear: Vec<Gear>,
    pub count: usize,
}

async fn sync_gear(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<GearSyncResponse>> {
    let user = current_user(&state, &auth).await?;
    let gear = state.gear_service.sync_user(&user).await?;
    Ok(Json(GearSyncResponse {
        message: "Gear synced successfully".to_string(),
        count: gear.len(),
        gear,
    }))
}

async fn gear_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<GearStats>> {
    state.gear_service.stats(&auth.user_id).await.map(Json)
}

#[derive(Serialize)]
pub struct GearUpdateResponse {
    pub gear: Gear,
}

/// `id` is the Strava gear ID.
async fn update_gear(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<String>, AppError>,
    WithRejection(Json(update), _): WithRejection<Json<GearUpdate>, AppError>,
) -> Result<Json<GearUpdateResponse>> {
    let gear = state
        .gear_service
        .update(&auth.user_id, &id, update)
        .await?;
    Ok(Json(GearUpdateResponse { gear }))
}
