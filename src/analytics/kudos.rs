// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{by_month, mean};
use crate::models::Activity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const TOP_ACTIVITIES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KudosOverall {
    pub total_kudos: u64,
    pub avg_kudos: f64,
    pub max_kudos: u32,
    pub total_activities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SportKudos {
    pub sport_type: String,
    pub total_kudos: u64,
    pub avg_kudos: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyKudos {
    pub year: i32,
    pub month: u32,
    pub total_kudos: u64,
    pub activities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopActivity {
    pub id: u64,
    pub name: String,
    pub kudos_count: u32,
    pub distance: f64,
    pub start_date: DateTime<Utc>,
    pub sport_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Engagement {
    pub kudos_per_km: f64,
    pub kudos_per_hour: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KudosAnalysis {
    pub overall: KudosOverall,
    pub by_sport: Vec<SportKudos>,
    pub trend: Vec<MonthlyKudos>,
    pub top_activities: Vec<TopActivity>,
    pub engagement: Engagement,
}

fn total_kudos<'a>(activities: impl IntoIterator<Item = &'a Activity>) -> u64 {
    activities
        .into_iter()
        .map(|a| u64::from(a.kudos_count))
        .sum()
}

pub fn kudos_analysis(activities: &[Activity]) -> KudosAnalysis {
    let overall = KudosOverall {
        total_kudos: total_kudos(activities),
        avg_kudos: mean(activities.iter().map(|a| f64::from(a.kudos_count))).unwrap_or(0.0),
        max_kudos: activities.iter().map(|a| a.kudos_count).max().unwrap_or(0),
        total_activities: activities.len(),
    };

    let mut sports: BTreeMap<&str, Vec<&Activity>> = BTreeMap::new();
    for activity in activities {
        sports
            .entry(activity.sport_type.as_str())
            .or_default()
            .push(activity);
    }
    let mut by_sport: Vec<SportKudos> = sports
        .into_iter()
        .map(|(sport, group)| SportKudos {
            sport_type: sport.to_string(),
            total_kudos: total_kudos(group.iter().copied()),
            avg_kudos: mean(group.iter().map(|a| f64::from(a.kudos_count))).unwrap_or(0.0),
            count: group.len(),
        })
        .collect();
    by_sport.sort_by(|a, b| b.total_kudos.cmp(&a.total_kudos));

    let trend = by_month(activities)
        .into_iter()
        .map(|(key, group)| MonthlyKudos {
            year: key.year,
            month: key.month,
            total_kudos: total_kudos(group.iter().copied()),
            activities: group.len(),
        })
        .collect();

    let mut ranked: Vec<&Activity> = activities.iter().collect();
    ranked.sort_by(|a, b| b.kudos_count.cmp(&a.kudos_count));
    let top_activities = ranked
        .into_iter()
        .take(TOP_ACTIVITIES)
        .map(|a| TopActivity {
            id: a.strava_activity_id,
            name: a.name.clone(),
            kudos_count: a.kudos_count,
            distance: a.distance,
            start_date: a.start_date,
            sport_type: a.sport_type.clone(),
        })
        .collect();

    // Per-activity rates, averaged over activities that have a distance.
    let with_distance: Vec<&Activity> = activities.iter().filter(|a| a.distance > 0.0).collect();
    let engagement = Engagement {
        kudos_per_km: mean(
            with_distance
                .iter()
                .map(|a| f64::from(a.kudos_count) / (a.distance / 1000.0)),
        )
        .unwrap_or(0.0),
        kudos_per_hour: mean(
            with_distance
                .iter()
                .filter(|a| a.moving_time > 0)
                .map(|a| f64::from(a.kudos_count) / (a.moving_time as f64 / 3600.0)),
        )
        .unwrap_or(0.0),
    };

    KudosAnalysis {
        overall,
        by_sport,
        trend,
        top_activities,
        engagement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::test_support::{activity, at};

    fn with_kudos(mut activity: Activity, kudos: u32) -> Activity {
        activity.kudos_count = kudos;
        activity
    }

    #[test]
    fn test_kudos_analysis() {
        let activities = vec![
            with_kudos(activity(1, "Run", at(2024, 1, 5), 10_000.0, 3600), 10),
            with_kudos(activity(2, "Ride", at(2024, 1, 20), 40_000.0, 7200), 4),
            with_kudos(activity(3, "Run", at(2024, 2, 2), 5_000.0, 1800), 6),
            with_kudos(activity(4, "Yoga", at(2024, 2, 3), 0.0, 3600), 0),
        ];

        let analysis = kudos_analysis(&activities);

        assert_eq!(analysis.overall.total_kudos, 20);
        assert_eq!(analysis.overall.max_kudos, 10);
        assert_eq!(analysis.overall.avg_kudos, 5.0);
        assert_eq!(analysis.overall.total_activities, 4);

        assert_eq!(analysis.by_sport[0].sport_type, "Run");
        assert_eq!(analysis.by_sport[0].total_kudos, 16);
        assert_eq!(analysis.by_sport[0].avg_kudos, 8.0);

        assert_eq!(analysis.trend.len(), 2);
        assert_eq!(analysis.trend[0].total_kudos, 14);
        assert_eq!(analysis.trend[1].month, 2);

        let top: Vec<u64> = analysis.top_activities.iter().map(|a| a.id).collect();
        assert_eq!(top, vec![1, 3, 2, 4]);

        // Per km: 1.0, 0.1, 1.2 -> 0.7666...; per hour: 10, 2, 12 -> 8
        assert!((analysis.engagement.kudos_per_km - 2.3 / 3.0).abs() < 1e-9);
        assert!((analysis.engagement.kudos_per_hour - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty() {
        let analysis = kudos_analysis(&[]);
        assert_eq!(analysis.overall, KudosOverall::default());
        assert_eq!(analysis.engagement, Engagement::default());
        assert!(analysis.top_activities.is_empty());

        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json["bySport"].as_array().unwrap().is_empty());
        assert!(json["topActivities"].as_array().unwrap().is_empty());
    }
}
