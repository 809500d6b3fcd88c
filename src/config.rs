// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup; a `.env` file is honoured for local development.

use std::env;
use std::str::FromStr;

/// Default Strava REST API base URL.
pub const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
/// Default Strava OAuth base URL (authorize / token endpoints live below it).
pub const DEFAULT_STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth";

/// Which document store backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    /// Google Cloud Firestore (or the Firestore emulator).
    Firestore,
    /// Process-local store, for local development and tests.
    Memory,
}

impl FromStr for DatabaseBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::Invalid("DATABASE_BACKEND", s.to_string())),
        }
    }
}

/// Limits applied while importing activities from Strava.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Page size requested from `/athlete/activities`.
    pub page_size: u32,
    /// Stop paginating once this many activities have been fetched.
    pub max_activities: usize,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Registered OAuth callback URL. Derived from the request host when unset.
    pub strava_callback_url: Option<String>,
    /// Frontend URL for OAuth redirects and CORS
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Document store backend
    pub database_backend: DatabaseBackend,
    /// Strava REST API base URL
    pub strava_api_url: String,
    /// Strava OAuth base URL
    pub strava_oauth_url: String,
    /// Activity import limits
    pub sync: SyncConfig,
    /// Max heart rate used for zone analysis when the client gives none
    pub default_max_heart_rate: u32,
    /// Replacement alert threshold for newly discovered gear (meters)
    pub gear_alert_threshold_meters: f64,

    // --- Secrets ---
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for the OAuth `state` parameter
    pub oauth_state_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .into_bytes();
        let oauth_state_key = env::var("OAUTH_STATE_KEY")
            .map(|v| v.trim().as_bytes().to_vec())
            .unwrap_or_else(|_| jwt_signing_key.clone());

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_callback_url: env::var("STRAVA_CALLBACK_URL").ok(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: parse_or("PORT", 8080)?,
            database_backend: env::var("DATABASE_BACKEND")
                .map(|v| v.parse::<DatabaseBackend>())
                .unwrap_or(Ok(DatabaseBackend::Firestore))?,
            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| DEFAULT_STRAVA_API_URL.to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|_| DEFAULT_STRAVA_OAUTH_URL.to_string()),
            sync: SyncConfig {
                page_size: parse_or("SYNC_PAGE_SIZE", 100)?,
                max_activities: parse_or("SYNC_MAX_ACTIVITIES", 1000)?,
            },
            default_max_heart_rate: parse_or("DEFAULT_MAX_HEART_RATE", 190)?,
            gear_alert_threshold_meters: parse_or("GEAR_ALERT_THRESHOLD_METERS", 800_000.0)?,

            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            jwt_signing_key,
            oauth_state_key,
        })
    }

    /// Config for tests: in-memory store, local Strava URLs, fixed keys.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_callback_url: None,
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            database_backend: DatabaseBackend::Memory,
            strava_api_url: DEFAULT_STRAVA_API_URL.to_string(),
            strava_oauth_url: DEFAULT_STRAVA_OAUTH_URL.to_string(),
            sync: SyncConfig {
                page_size: 100,
                max_activities: 1000,
            },
            default_max_heart_rate: 190,
            gear_alert_threshold_meters: 800_000.0,
            strava_client_secret: "test_secret".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            oauth_state_key: b"test_oauth_state_key".to_vec(),
        }
    }
}

/// Read an optional variable, falling back to `default` when unset.
fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
