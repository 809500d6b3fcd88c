// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client and token management.
//!
//! Handles:
//! - Authorization URL generation and code exchange
//! - Token refresh when the access token is about to expire
//! - Activity listing and gear lookup
//! - Rate limit and credential error detection

use crate::config::Config;
use crate::db::Db;
use crate::error::AppError;
use crate::models::{User, UserTokens};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Scopes requested during authorization.
pub const STRAVA_SCOPES: &str = "read,activity:read_all";

/// Refresh the access token when it expires within this margin (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials and base URLs.
    pub fn new(
        client_id: String,
        client_secret: String,
        api_url: String,
        oauth_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            oauth_url: oauth_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
            config.strava_api_url.clone(),
            config.strava_oauth_url.clone(),
        )
    }

    /// Build the URL the browser is sent to for authorization.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/authorize?client_id={}&redirect_uri={}&response_type=code&approval_prompt=auto&scope={}&state={}",
            self.oauth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(STRAVA_SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for tokens and the athlete profile.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token exchange failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// List the athlete's activities, newest first (paginated).
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.api_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Get gear details (name, brand, model).
    pub async fn get_gear(&self, access_token: &str, gear_id: &str) -> Result<StravaGear, AppError> {
        let url = format!("{}/gear/{}", self.api_url, urlencoding::encode(gear_id));
        self.get_json(&url, access_token).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
            }

            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Token exchange response from Strava OAuth (includes athlete info).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub athlete: StravaAthlete,
}

/// Athlete info from OAuth token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaAthlete {
    pub id: u64,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
}

/// Summary activity from `/athlete/activities`.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivitySummary {
    pub id: u64,
    pub name: String,
    /// Newer field; older payloads only carry `type`.
    #[serde(default)]
    pub sport_type: Option<String>,
    #[serde(rename = "type", default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub moving_time: u64,
    #[serde(default)]
    pub elapsed_time: u64,
    #[serde(default)]
    pub total_elevation_gain: f64,
    pub start_date: DateTime<Utc>,
    pub start_date_local: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    #[serde(default)]
    pub has_heartrate: bool,
    pub average_cadence: Option<f64>,
    pub suffer_score: Option<f64>,
    pub calories: Option<f64>,
    #[serde(default)]
    pub kudos_count: u32,
    #[serde(default)]
    pub achievement_count: u32,
    pub gear_id: Option<String>,
    #[serde(default)]
    pub start_latlng: Option<Vec<f64>>,
    #[serde(default)]
    pub end_latlng: Option<Vec<f64>>,
    #[serde(default)]
    pub manual: bool,
    pub visibility: Option<String>,
}

/// Gear details from `/gear/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaGear {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - High-level service with token management
// ─────────────────────────────────────────────────────────────────────────────

/// Which flow an authorization callback completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthIntent {
    /// Unauthenticated sign-in: find or create the user by athlete ID.
    Login,
    /// Attach Strava to an already signed-in user.
    Connect { user_id: String },
}

/// High-level Strava service that manages the token lifecycle and API calls.
///
/// Tokens live on the user record; a refresh rewrites the record in place.
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    db: Db,
}

impl StravaService {
    pub fn new(client: StravaClient, db: Db) -> Self {
        Self { client, db }
    }

    pub fn client(&self) -> &StravaClient {
        &self.client
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Get a usable access token for `user`, refreshing it first when it
    /// expires within five minutes.
    ///
    /// The refreshed pair is persisted before the new token is returned. A
    /// failed refresh propagates and the stored tokens are left untouched.
    pub async fn get_valid_access_token(&self, user: &User) -> Result<String, AppError> {
        let tokens = match (&user.strava_tokens, user.strava_connected) {
            (Some(tokens), true) => tokens,
            _ => return Err(AppError::StravaNotConnected),
        };

        let now = Utc::now().timestamp();
        if !tokens.expires_within(now, TOKEN_REFRESH_MARGIN_SECS) {
            return Ok(tokens.access_token.clone());
        }

        tracing::info!(user_id = %user.id, expires_at = tokens.expires_at, "Access token expiring, refreshing");

        let refreshed = self.client.refresh_token(&tokens.refresh_token).await?;

        let mut updated = user.clone();
        updated.strava_tokens = Some(UserTokens {
            access_token: refreshed.access_token.clone(),
            refresh_token: refreshed.refresh_token,
            expires_at: refreshed.expires_at,
            scopes: tokens.scopes.clone(),
        });
        self.db.upsert_user(&updated).await?;

        tracing::info!(user_id = %user.id, "Token refreshed and stored");
        Ok(refreshed.access_token)
    }

    // ─── OAuth Callback Handling ─────────────────────────────────────────────

    /// Exchange the authorization code and store the connection on a user.
    ///
    /// Returns the user the connection was attached to.
    pub async fn handle_oauth_callback(
        &self,
        code: &str,
        intent: &OAuthIntent,
    ) -> Result<User, AppError> {
        let exchange = self.client.exchange_code(code).await?;
        let now = format_utc_rfc3339(Utc::now());
        let athlete_id = exchange.athlete.id;

        let tokens = UserTokens {
            access_token: exchange.access_token,
            refresh_token: exchange.refresh_token,
            expires_at: exchange.expires_at,
            scopes: STRAVA_SCOPES.split(',').map(str::to_string).collect(),
        };

        let mut user = match intent {
            OAuthIntent::Login => match self.db.find_user_by_athlete_id(athlete_id).await? {
                Some(existing) => existing,
                None => {
                    let mut user = User::new(
                        exchange
                            .athlete
                            .firstname
                            .clone()
                            .unwrap_or_else(|| "Strava".to_string()),
                        exchange
                            .athlete
                            .lastname
                            .clone()
                            .unwrap_or_else(|| "User".to_string()),
                        &now,
                    );
                    user.profile_picture = exchange.athlete.profile.clone();
                    tracing::info!(user_id = %user.id, athlete_id, "Creating user from Strava login");
                    user
                }
            },
            OAuthIntent::Connect { user_id } => self
                .db
                .get_user(user_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?,
        };

        user.connect_strava(athlete_id, tokens);
        user.last_active = now;
        self.db.upsert_user(&user).await?;

        tracing::info!(
            user_id = %user.id,
            athlete_id,
            intent = ?intent,
            "OAuth callback handled, tokens stored"
        );

        Ok(user)
    }

    /// Remove the Strava connection from a user.
    pub async fn disconnect(&self, user: &User) -> Result<(), AppError> {
        let mut updated = user.clone();
        updated.disconnect_strava();
        self.db.upsert_user(&updated).await?;
        tracing::info!(user_id = %user.id, "Strava disconnected");
        Ok(())
    }
}
