// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava connection management for signed-in users.

use super::{current_user, SyncResponse};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::OAuthIntent;
use crate::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/strava/connect", get(connect))
        .route("/api/strava/disconnect", post(disconnect))
        .route("/api/strava/status", get(status))
        .route("/api/strava/sync", post(sync))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub auth_url: String,
}

/// Authorization URL that attaches Strava to the signed-in user.
async fn connect(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    headers: HeaderMap,
) -> Result<Json<ConnectResponse>> {
    let intent = OAuthIntent::Connect {
        user_id: auth.user_id,
    };
    let auth_url = super::auth::authorization_url(&state, &headers, &intent)?;
    Ok(Json(ConnectResponse { auth_url }))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

async fn disconnect(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MessageResponse>> {
    let user = current_user(&state, &auth).await?;
    state.strava_service.disconnect(&user).await?;
    Ok(Json(MessageResponse {
        message: "Strava disconnected successfully".to_string(),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub connected: bool,
    pub athlete_id: Option<u64>,
}

async fn status(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<StatusResponse>> {
    let user = current_user(&state, &auth).await?;
    Ok(Json(StatusResponse {
        connected: user.is_strava_connected(),
        athlete_id: user.strava_athlete_id,
    }))
}

/// Same import as `/api/activities/sync`.
async fn sync(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<SyncResponse>> {
    super::run_activity_sync(&state, &auth).await.map(Json)
}
