// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use trackmyrun::config::Config;
use trackmyrun::db::{Db, FirestoreDb};
use trackmyrun::models::{Activity, User, UserTokens};
use trackmyrun::routes::create_router;
use trackmyrun::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app over a fresh in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default())
}

/// Same as [`create_test_app`] with a caller-supplied config.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, Db::memory()));
    (create_router(state.clone()), state)
}

/// Config whose Strava API and OAuth endpoints point at a mock server.
#[allow(dead_code)]
pub fn config_for_mock_strava(base_url: &str) -> Config {
    let mut config = Config::test_default();
    config.strava_api_url = base_url.to_string();
    config.strava_oauth_url = base_url.to_string();
    config
}

/// Create a session JWT for `user_id`.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 86400,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

/// Store a user without a Strava connection.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState) -> User {
    let user = User::new(
        "Ada".to_string(),
        "Runner".to_string(),
        "2024-01-01T00:00:00Z",
    );
    state.db.upsert_user(&user).await.unwrap();
    user
}

/// Store a user connected to athlete 4242 whose access token expires at
/// `expires_at` (Unix seconds).
#[allow(dead_code)]
pub async fn seed_connected_user(state: &AppState, expires_at: i64) -> User {
    let mut user = User::new(
        "Ada".to_string(),
        "Runner".to_string(),
        "2024-01-01T00:00:00Z",
    );
    user.connect_strava(
        4242,
        UserTokens {
            access_token: "access-old".to_string(),
            refresh_token: "refresh-old".to_string(),
            expires_at,
            scopes: vec!["read".to_string(), "activity:read_all".to_string()],
        },
    );
    state.db.upsert_user(&user).await.unwrap();
    user
}

/// 08:00 UTC on the given day.
#[allow(dead_code)]
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 8, 0, 0).unwrap()
}

/// Minimal stored activity owned by `user_id`.
#[allow(dead_code)]
pub fn activity(
    user_id: &str,
    id: u64,
    sport: &str,
    start: DateTime<Utc>,
    distance: f64,
    moving_time: u64,
) -> Activity {
    Activity {
        strava_activity_id: id,
        user_id: user_id.to_string(),
        sport_type: sport.to_string(),
        name: format!("Activity {}", id),
        distance,
        moving_time,
        elapsed_time: moving_time,
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
    }
}

/// Request carrying a bearer token.
#[allow(dead_code)]
pub fn authed(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Request carrying a bearer token and a JSON body.
#[allow(dead_code)]
pub fn authed_json(method: Method, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
