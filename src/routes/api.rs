// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes for authenticated users.

use super::current_user;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}

/// Current user response. Tokens are never included.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub profile_picture: Option<String>,
    pub created_at: String,
    pub strava_connected: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub strava_athlete_id: Option<u64>,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let user = current_user(&state, &auth).await?;

    Ok(Json(UserResponse {
        strava_connected: user.is_strava_connected(),
        id: user.id,
        firstname: user.firstname,
        lastname: user.lastname,
        profile_picture: user.profile_picture,
        created_at: user.created_at,
        strava_athlete_id: user.strava_athlete_id,
    }))
}
