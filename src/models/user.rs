// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User model for storage and API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User account stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Generated user ID (also used as document ID)
    pub id: String,
    /// First name
    pub firstname: String,
    /// Last name
    pub lastname: String,
    /// Profile picture URL
    pub profile_picture: Option<String>,
    /// When the account was created
    pub created_at: String,
    /// Last login timestamp
    pub last_active: String,

    // ─── Strava connection ───────────────────────────────────────
    /// Strava athlete ID, set while connected
    #[serde(default)]
    pub strava_athlete_id: Option<u64>,
    /// OAuth tokens, refreshed in place
    #[serde(default)]
    pub strava_tokens: Option<UserTokens>,
    #[serde(default)]
    pub strava_connected: bool,
}

impl User {
    /// Create a new account with a fresh ID.
    pub fn new(firstname: String, lastname: String, now: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            firstname,
            lastname,
            profile_picture: None,
            created_at: now.to_string(),
            last_active: now.to_string(),
            strava_athlete_id: None,
            strava_tokens: None,
            strava_connected: false,
        }
    }

    /// Whether the user has a usable Strava connection.
    pub fn is_strava_connected(&self) -> bool {
        self.strava_connected && self.strava_tokens.is_some()
    }

    /// Attach a Strava connection.
    pub fn connect_strava(&mut self, athlete_id: u64, tokens: UserTokens) {
        self.strava_athlete_id = Some(athlete_id);
        self.strava_tokens = Some(tokens);
        self.strava_connected = true;
    }

    /// Drop the Strava connection and its tokens.
    pub fn disconnect_strava(&mut self) {
        self.strava_athlete_id = None;
        self.strava_tokens = None;
        self.strava_connected = false;
    }
}

/// User's Strava OAuth tokens.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// When the access token expires (Unix timestamp, seconds)
    pub expires_at: i64,
    /// Granted OAuth scopes
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl UserTokens {
    /// Whether the access token is expired or expires within `margin_secs`.
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        now >= self.expires_at - margin_secs
    }
}

// Tokens must never end up in logs.
impl fmt::Debug for UserTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}
