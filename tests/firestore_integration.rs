// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! Run with: FIRESTORE_EMULATOR_HOST=localhost:8081 cargo test --test firestore_integration

mod common;

use chrono::Utc;
use trackmyrun::db::{ActivityFilter, Db, UpsertOutcome};
use trackmyrun::models::{User, UserTokens};
use trackmyrun::time_utils::year_range;

/// Activity IDs unique to this run so reruns against one emulator don't collide.
fn unique_id(offset: u64) -> u64 {
    Utc::now().timestamp_millis() as u64 * 10 + offset
}

#[tokio::test]
async fn test_user_roundtrip_and_athlete_lookup() {
    require_emulator!();

    let db = Db::Firestore(common::test_db().await);
    let athlete_id = unique_id(0);

    let mut user = User::new("Ada".into(), "Runner".into(), "2024-01-01T00:00:00Z");
    user.connect_strava(
        athlete_id,
        UserTokens {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: 1_700_000_000,
            scopes: vec!["read".to_string()],
        },
    );
    db.upsert_user(&user).await.expect("Failed to store user");

    let loaded = db.get_user(&user.id).await.unwrap().expect("User missing");
    assert_eq!(loaded.firstname, "Ada");
    assert_eq!(loaded.strava_tokens.unwrap().refresh_token, "refresh");

    let found = db
        .find_user_by_athlete_id(athlete_id)
        .await
        .unwrap()
        .expect("Lookup by athlete failed");
    assert_eq!(found.id, user.id);

    assert!(db.get_user("does-not-exist").await.unwrap().is_none());
}

#[tokio::test]
async fn test_activity_upsert_and_query() {
    require_emulator!();

    let db = Db::Firestore(common::test_db().await);
    let user_id = uuid::Uuid::new_v4().to_string();

    let first = unique_id(1);
    let second = unique_id(2);
    let run = common::activity(&user_id, first, "Run", common::at(2024, 3, 3), 10_000.0, 3_000);
    let ride = common::activity(&user_id, second, "Ride", common::at(2024, 6, 1), 40_000.0, 5_400);

    assert_eq!(db.upsert_activity(&run).await.unwrap(), UpsertOutcome::Created);
    assert_eq!(db.upsert_activity(&ride).await.unwrap(), UpsertOutcome::Created);
    assert_eq!(db.upsert_activity(&run).await.unwrap(), UpsertOutcome::Updated);

    let stored = db.get_activity(first).await.unwrap().unwrap();
    assert!((stored.pace.unwrap() - 5.0).abs() < 1e-9);

    let all = db
        .query_activities(&user_id, &ActivityFilter::default())
        .await
        .unwrap();
    let ids: Vec<u64> = all.iter().map(|a| a.strava_activity_id).collect();
    assert_eq!(ids, vec![second, first]);

    let (start, end) = year_range(2024).unwrap();
    let runs = db
        .query_activities(
            &user_id,
            &ActivityFilter::default()
                .sport_type(Some("Run".to_string()))
                .between(start, end),
        )
        .await
        .unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].strava_activity_id, first);
}
