// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity listing, import and analytics routes.
//!
//! Each analytics handler loads the user's activities for the window the
//! computation needs and hands them to the pure functions in
//! [`crate::analytics`].

use super::SyncResponse;
use crate::analytics::{
    comparisons::{comparisons, Comparisons},
    consistency::{consistency, Consistency},
    heart_rate::{heart_rate_zones, HeartRateZones},
    kudos::{kudos_analysis, KudosAnalysis},
    locations::{locations, Locations},
    pace::{pace_analysis, PaceAnalysis},
    records::{personal_bests, year_in_sport, PersonalBests, YearInSport},
    rolling::{rolling_stats, RollingStats, LONGEST_WINDOW_DAYS},
    summary::{summarize, summary_window, Summary, SummaryPeriod},
    training_load::{training_load, TrainingLoad, WEEKLY_WINDOW_DAYS},
    trends::{trends, TrendPeriod, TrendPoint},
};
use crate::db::ActivityFilter;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Activity;
use crate::time_utils::{days_ago, month_range, year_range, year_start};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities))
        .route("/api/activities/sync", post(sync_activities))
        .route("/api/activities/summary", get(get_summary))
        .route("/api/activities/trends", get(get_trends))
        .route("/api/activities/personal-bests", get(get_personal_bests))
        .route("/api/activities/year-in-sport", get(get_current_year_in_sport))
        .route("/api/activities/year-in-sport/{year}", get(get_year_in_sport))
        .route("/api/activities/rolling-stats", get(get_rolling_stats))
        .route("/api/activities/pace-analysis", get(get_pace_analysis))
        .route("/api/activities/consistency", get(get_consistency))
        .route("/api/activities/training-load", get(get_training_load))
        .route("/api/activities/kudos-analysis", get(get_kudos_analysis))
        .route("/api/activities/hr-zones", get(get_hr_zones))
        .route("/api/activities/locations", get(get_locations))
        .route("/api/activities/comparisons", get(get_comparisons))
}

async fn load(state: &AppState, auth: &AuthUser, filter: ActivityFilter) -> Result<Vec<Activity>> {
    state.db.query_activities(&auth.user_id, &filter).await
}

fn checked_year_range(year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    year_range(year).ok_or_else(|| AppError::BadRequest(format!("Invalid year: {}", year)))
}

fn year_filter(year: Option<i32>) -> Result<ActivityFilter> {
    match year {
        Some(year) => {
            let (start, end) = checked_year_range(year)?;
            Ok(ActivityFilter::default().between(start, end))
        }
        None => Ok(ActivityFilter::default()),
    }
}

/// Optional calendar-year restriction shared by several analytics.
#[derive(Debug, Default, Deserialize)]
struct YearQuery {
    year: Option<i32>,
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    sport_type: Option<String>,
    year: Option<i32>,
    /// 1-12; only applied together with `year`
    month: Option<u32>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub pages: usize,
}

#[derive(Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<Activity>,
    pub pagination: Pagination,
}

/// Validate paging parameters, applying defaults.
fn page_params(page: Option<u32>, limit: Option<u32>) -> Result<(u32, u32)> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if page == 0 {
        return Err(AppError::BadRequest("page must be at least 1".to_string()));
    }
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }
    Ok((page, limit))
}

/// Slice one page out of the full newest-first result.
fn paginate(mut activities: Vec<Activity>, page: u32, limit: u32) -> ActivitiesResponse {
    let total = activities.len();
    let start = ((page - 1) as usize).saturating_mul(limit as usize).min(total);
    let end = start.saturating_add(limit as usize).min(total);
    let page_items = activities.drain(start..end).collect();

    ActivitiesResponse {
        activities: page_items,
        pagination: Pagination {
            page,
            limit,
            total,
            pages: total.div_ceil(limit as usize),
        },
    }
}

async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<ListQuery>, AppError>,
) -> Result<Json<ActivitiesResponse>> {
    let (page, limit) = page_params(query.page, query.limit)?;

    let mut filter = ActivityFilter::default().sport_type(query.sport_type);
    match (query.year, query.month) {
        (Some(year), Some(month)) => {
            let (start, end) = month_range(year, month).ok_or_else(|| {
                AppError::BadRequest(format!("Invalid month: {}-{}", year, month))
            })?;
            filter = filter.between(start, end);
        }
        (Some(year), None) => {
            let (start, end) = checked_year_range(year)?;
            filter = filter.between(start, end);
        }
        (None, _) => {}
    }

    let activities = load(&state, &auth, filter).await?;
    Ok(Json(paginate(activities, page, limit)))
}

async fn sync_activities(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<SyncResponse>> {
    super::run_activity_sync(&state, &auth).await.map(Json)
}

// ─── Overview ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    #[serde(default)]
    period: SummaryPeriod,
    year: Option<i32>,
    sport_type: Option<String>,
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<SummaryQuery>, AppError>,
) -> Result<Json<Summary>> {
    let mut filter = ActivityFilter::default().sport_type(query.sport_type);
    let window = summary_window(query.period, query.year, Utc::now()).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid year: {}", query.year.unwrap_or_default()))
    })?;
    match window {
        (Some(start), Some(end)) => filter = filter.between(start, end),
        (Some(start), None) => filter = filter.since(start),
        _ => {}
    }

    let activities = load(&state, &auth, filter).await?;
    Ok(Json(summarize(&activities)))
}

#[derive(Debug, Deserialize)]
struct TrendsQuery {
    #[serde(default)]
    period: TrendPeriod,
    sport_type: Option<String>,
}

#[derive(Serialize)]
pub struct TrendsResponse {
    pub trends: Vec<TrendPoint>,
}

async fn get_trends(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<TrendsQuery>, AppError>,
) -> Result<Json<TrendsResponse>> {
    let filter = ActivityFilter::default().sport_type(query.sport_type);
    let activities = load(&state, &auth, filter).await?;
    Ok(Json(TrendsResponse {
        trends: trends(&activities, query.period),
    }))
}

#[derive(Debug, Deserialize)]
struct SportQuery {
    sport_type: Option<String>,
}

async fn get_personal_bests(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<SportQuery>, AppError>,
) -> Result<Json<PersonalBests>> {
    let filter = ActivityFilter::default().sport_type(query.sport_type);
    let activities = load(&state, &auth, filter).await?;
    Ok(Json(personal_bests(&activities)))
}

async fn year_in_sport_for(state: &AppState, auth: &AuthUser, year: i32) -> Result<YearInSport> {
    let activities = load(state, auth, year_filter(Some(year))?).await?;
    Ok(year_in_sport(year, &activities))
}

async fn get_current_year_in_sport(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<YearInSport>> {
    year_in_sport_for(&state, &auth, Utc::now().year())
        .await
        .map(Json)
}

async fn get_year_in_sport(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Path(year), _): WithRejection<Path<i32>, AppError>,
) -> Result<Json<YearInSport>> {
    year_in_sport_for(&state, &auth, year).await.map(Json)
}

async fn get_rolling_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<RollingStats>> {
    let now = Utc::now();
    let filter = ActivityFilter::default().since(days_ago(now, LONGEST_WINDOW_DAYS));
    let activities = load(&state, &auth, filter).await?;
    Ok(Json(rolling_stats(&activities, now)))
}

// ─── Training ────────────────────────────────────────────────

async fn get_pace_analysis(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<YearQuery>, AppError>,
) -> Result<Json<PaceAnalysis>> {
    let activities = load(&state, &auth, year_filter(query.year)?).await?;
    Ok(Json(pace_analysis(&activities)))
}

async fn get_consistency(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Consistency>> {
    let now = Utc::now();
    let filter = ActivityFilter::default().since(year_start(now.year()));
    let activities = load(&state, &auth, filter).await?;
    Ok(Json(consistency(&activities, now)))
}

async fn get_training_load(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<TrainingLoad>> {
    let now = Utc::now();
    let filter = ActivityFilter::default().since(days_ago(now, WEEKLY_WINDOW_DAYS));
    let activities = load(&state, &auth, filter).await?;
    Ok(Json(training_load(&activities, now)))
}

#[derive(Debug, Deserialize)]
struct HrZonesQuery {
    year: Option<i32>,
    #[serde(rename = "maxHR")]
    max_hr: Option<u32>,
}

async fn get_hr_zones(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<HrZonesQuery>, AppError>,
) -> Result<Json<HeartRateZones>> {
    let max_hr = query.max_hr.unwrap_or(state.config.default_max_heart_rate);
    if max_hr == 0 {
        return Err(AppError::BadRequest("maxHR must be positive".to_string()));
    }

    let activities = load(&state, &auth, year_filter(query.year)?).await?;
    Ok(Json(heart_rate_zones(&activities, max_hr)))
}

// ─── Social & places ─────────────────────────────────────────

async fn get_kudos_analysis(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<YearQuery>, AppError>,
) -> Result<Json<KudosAnalysis>> {
    let activities = load(&state, &auth, year_filter(query.year)?).await?;
    Ok(Json(kudos_analysis(&activities)))
}

async fn get_locations(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<YearQuery>, AppError>,
) -> Result<Json<Locations>> {
    let activities = load(&state, &auth, year_filter(query.year)?).await?;
    Ok(Json(locations(&activities)))
}

async fn get_comparisons(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Comparisons>> {
    let current_year = Utc::now().year();
    let filter = ActivityFilter::default()
        .between(year_start(current_year - 1), year_start(current_year + 1));
    let activities = load(&state, &auth, filter).await?;
    Ok(Json(comparisons(&activities, current_year)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::test_support::{activity, at};

    fn activities(n: u64) -> Vec<Activity> {
        (0..n)
            .map(|i| activity(i, "Run", at(2024, 1, 1), 5000.0, 1500))
            .collect()
    }

    #[test]
    fn test_page_params() {
        assert_eq!(page_params(None, None).unwrap(), (1, DEFAULT_LIMIT));
        assert_eq!(page_params(Some(3), Some(100)).unwrap(), (3, 100));
        assert!(matches!(page_params(Some(0), None), Err(AppError::BadRequest(_))));
        assert!(matches!(page_params(None, Some(0)), Err(AppError::BadRequest(_))));
        assert!(matches!(page_params(None, Some(101)), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_paginate() {
        let response = paginate(activities(45), 3, 20);
        assert_eq!(response.activities.len(), 5);
        assert_eq!(response.activities[0].strava_activity_id, 40);
        assert_eq!(
            response.pagination,
            Pagination {
                page: 3,
                limit: 20,
                total: 45,
                pages: 3
            }
        );
    }

    #[test]
    fn test_paginate_past_end() {
        let response = paginate(activities(5), 4, 20);
        assert!(response.activities.is_empty());
        assert_eq!(response.pagination.total, 5);
        assert_eq!(response.pagination.pages, 1);

        let empty = paginate(Vec::new(), 1, 20);
        assert_eq!(empty.pagination.pages, 0);
    }
}
