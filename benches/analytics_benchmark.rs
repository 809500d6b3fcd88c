use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use trackmyrun::analytics::{
    heart_rate::heart_rate_zones, locations::locations, pace::pace_analysis,
    summary::summarize, training_load::training_load,
};
use trackmyrun::models::{Activity, LatLng};

/// Several years of mixed activities, roughly one a day.
fn history(count: usize) -> Vec<Activity> {
    let start = Utc.with_ymd_and_hms(2021, 1, 1, 7, 0, 0).unwrap();
    let sports = ["Run", "Ride", "Run", "TrailRun", "Walk"];

    (0..count)
        .map(|i| {
            let sport = sports[i % sports.len()];
            let distance = 3_000.0 + (i % 17) as f64 * 1_000.0;
            let moving_time = (distance / 1000.0 * (270.0 + (i % 9) as f64 * 15.0)) as u64;
            let start_date = start + Duration::hours(i as i64 * 22);
            let mut activity = Activity {
                strava_activity_id: i as u64,
                user_id: "bench-user".to_string(),
                sport_type: sport.to_string(),
                name: format!("Activity {}", i),
                distance,
                moving_time,
                elapsed_time: moving_time + 60,
                total_elevation_gain: (i % 13) as f64 * 10.0,
                start_date,
                start_date_local: start_date,
                timezone: Some("(GMT+00:00) Europe/London".to_string()),
                average_speed: Some(distance / moving_time as f64),
                max_speed: None,
                pace: None,
                average_heartrate: (i % 3 != 0).then(|| 130.0 + (i % 40) as f64),
                max_heartrate: None,
                has_heartrate: i % 3 != 0,
                average_cadence: None,
                suffer_score: None,
                calories: None,
                kudos_count: (i % 11) as u32,
                achievement_count: 0,
                gear_id: Some(format!("g{}", i % 4)),
                start_latlng: Some(LatLng {
                    lat: 51.5 + (i % 50) as f64 * 0.001,
                    lng: -0.12 + (i % 30) as f64 * 0.001,
                }),
                end_latlng: None,
                manual: false,
                visibility: "everyone".to_string(),
                consistency_week: 0,
                training_load_score: 0,
                created_at: String::new(),
                updated_at: String::new(),
            };
            activity.apply_derived_fields();
            activity
        })
        .collect()
}

fn benchmark_analytics(c: &mut Criterion) {
    let activities = history(2_000);
    let now = activities
        .last()
        .map(|a| a.start_date)
        .unwrap_or_else(Utc::now);

    let mut group = c.benchmark_group("analytics");

    group.bench_function("summary", |b| b.iter(|| summarize(black_box(&activities))));
    group.bench_function("pace_analysis", |b| {
        b.iter(|| pace_analysis(black_box(&activities)))
    });
    group.bench_function("hr_zones", |b| {
        b.iter(|| heart_rate_zones(black_box(&activities), 190))
    });
    group.bench_function("training_load", |b| {
        b.iter(|| training_load(black_box(&activities), now))
    });
    group.bench_function("locations", |b| b.iter(|| locations(black_box(&activities))));

    group.finish();
}

criterion_group!(benches, benchmark_analytics);
criterion_main!(benches);
