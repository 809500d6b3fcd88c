// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth routes: sign-in redirect and the shared callback.
//!
//! The `state` parameter carries the flow (`login` or `connect:<user id>`)
//! plus an issue timestamp, signed with HMAC-SHA256:
//! `base64url(payload|timestamp_hex|signature_hex)`.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::Redirect,
    routing::get,
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::services::OAuthIntent;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// How long a signed state stays valid.
pub const STATE_MAX_AGE_MS: u128 = 10 * 60 * 1000;
const CALLBACK_PATH: &str = "/api/strava/callback";
const CONNECT_PREFIX: &str = "connect:";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/strava/login", get(login_start))
        .route(CALLBACK_PATH, get(oauth_callback))
}

fn now_millis() -> Result<u128> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis())
}

fn intent_payload(intent: &OAuthIntent) -> String {
    match intent {
        OAuthIntent::Login => "login".to_string(),
        OAuthIntent::Connect { user_id } => format!("{}{}", CONNECT_PREFIX, user_id),
    }
}

fn signature(payload: &str, secret: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Build a signed OAuth `state` for `intent`, issued at `now_ms`.
pub fn sign_state(intent: &OAuthIntent, secret: &[u8], now_ms: u128) -> Result<String> {
    let payload = format!("{}|{:x}", intent_payload(intent), now_ms);
    let signed = format!("{}|{}", payload, signature(&payload, secret)?);
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify a signed OAuth `state` and recover its intent.
///
/// Returns `None` when the state is malformed, tampered with, signed with
/// another key, or older than [`STATE_MAX_AGE_MS`].
pub fn verify_state(state: &str, secret: &[u8], now_ms: u128) -> Option<OAuthIntent> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "payload|timestamp_hex|signature_hex"
    let mut parts = state_str.rsplitn(3, '|');
    let signature_hex = parts.next()?;
    let timestamp_hex = parts.next()?;
    let intent = parts.next()?;

    let payload = format!("{}|{}", intent, timestamp_hex);
    let expected = signature(&payload, secret).ok()?;
    if !bool::from(expected.as_bytes().ct_eq(signature_hex.as_bytes())) {
        tracing::warn!("OAuth state signature mismatch");
        return None;
    }

    let issued_at = u128::from_str_radix(timestamp_hex, 16).ok()?;
    if issued_at > now_ms || now_ms - issued_at > STATE_MAX_AGE_MS {
        tracing::warn!(issued_at = %issued_at, "OAuth state expired");
        return None;
    }

    match intent {
        "login" => Some(OAuthIntent::Login),
        other => other
            .strip_prefix(CONNECT_PREFIX)
            .filter(|id| !id.is_empty())
            .map(|id| OAuthIntent::Connect {
                user_id: id.to_string(),
            }),
    }
}

/// Redirect URI registered with Strava; derived from the request host when
/// not configured.
pub fn callback_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.config.strava_callback_url {
        return url.clone();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:8080");
    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };
    format!("{}://{}{}", scheme, host, CALLBACK_PATH)
}

/// Authorization URL for `intent`, with a freshly signed state.
pub fn authorization_url(
    state: &AppState,
    headers: &HeaderMap,
    intent: &OAuthIntent,
) -> Result<String> {
    let oauth_state = sign_state(intent, &state.config.oauth_state_key, now_millis()?)?;
    Ok(state
        .strava_service
        .client()
        .authorization_url(&callback_url(state, headers), &oauth_state))
}

/// Start the sign-in flow: redirect to Strava.
async fn login_start(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Redirect> {
    let auth_url = authorization_url(&state, &headers, &OAuthIntent::Login)?;

    tracing::info!(
        client_id = %state.config.strava_client_id,
        "Starting Strava login, redirecting"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn frontend_redirect(frontend_url: &str, path_and_query: &str) -> Redirect {
    Redirect::temporary(&format!(
        "{}{}",
        frontend_url.trim_end_matches('/'),
        path_and_query
    ))
}

/// OAuth callback for both flows. Always redirects to the frontend.
async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let frontend = state.config.frontend_url.as_str();

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Strava");
        return frontend_redirect(
            frontend,
            &format!("/login?strava=error&reason={}", urlencoding::encode(&error)),
        );
    }

    let (Some(code), Some(raw_state)) = (params.code, params.state) else {
        return frontend_redirect(frontend, "/login?strava=error&reason=missing_params");
    };

    let now = match now_millis() {
        Ok(now) => now,
        Err(_) => return frontend_redirect(frontend, "/login?strava=error&reason=exchange_failed"),
    };
    let Some(intent) = verify_state(&raw_state, &state.config.oauth_state_key, now) else {
        return frontend_redirect(frontend, "/dashboard?strava=error&reason=invalid_state");
    };

    let user = match state.strava_service.handle_oauth_callback(&code, &intent).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, intent = ?intent, "OAuth code exchange failed");
            return frontend_redirect(frontend, "/login?strava=error&reason=exchange_failed");
        }
    };

    match intent {
        OAuthIntent::Login => match create_jwt(&user.id, &state.config.jwt_signing_key) {
            Ok(jwt) => frontend_redirect(frontend, &format!("/auth/callback?token={}", jwt)),
            Err(e) => {
                tracing::error!(error = %e, user_id = %user.id, "JWT creation failed");
                frontend_redirect(frontend, "/login?strava=error&reason=exchange_failed")
            }
        },
        OAuthIntent::Connect { .. } => frontend_redirect(frontend, "/dashboard?strava=success"),
    }
}
