// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Personal bests and the "Year in Sport" recap.

use super::{by_month, fastest_run, max_by_key, sport_breakdown, SportBreakdown};
use crate::models::Activity;
use chrono::Datelike;
use serde::Serialize;

const MARATHON_KM: f64 = 42.195;
const TRACK_TRIP_KM: f64 = 10.0;
const HOURS_PER_DAY: f64 = 24.0;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBests {
    pub longest_distance: Option<Activity>,
    pub longest_time: Option<Activity>,
    /// Running only
    pub fastest_pace: Option<Activity>,
    pub highest_elevation: Option<Activity>,
    pub most_kudos: Option<Activity>,
}

pub fn personal_bests(activities: &[Activity]) -> PersonalBests {
    PersonalBests {
        longest_distance: max_by_key(activities, |a| a.distance).cloned(),
        longest_time: max_by_key(activities, |a| a.moving_time as f64).cloned(),
        fastest_pace: fastest_run(activities).cloned(),
        highest_elevation: max_by_key(activities, |a| a.total_elevation_gain).cloned(),
        most_kudos: max_by_key(activities, |a| a.kudos_count as f64).cloned(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearTotals {
    pub total_distance: f64,
    pub total_time: u64,
    pub total_elevation: f64,
    pub total_activities: usize,
    pub total_kudos: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveMonth {
    pub month: u32,
    pub activities: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearInSport {
    pub year: i32,
    pub overall: YearTotals,
    pub most_active_month: Option<ActiveMonth>,
    pub favorite_day: Option<String>,
    pub sport_breakdown: Vec<SportBreakdown>,
    pub longest_activity: Option<Activity>,
    pub fastest_pace: Option<Activity>,
    pub fun_insights: Vec<String>,
}

/// Recap of one calendar year. `activities` must already be limited to it.
pub fn year_in_sport(year: i32, activities: &[Activity]) -> YearInSport {
    let overall = YearTotals {
        total_distance: activities.iter().map(|a| a.distance).sum(),
        total_time: activities.iter().map(|a| a.moving_time).sum(),
        total_elevation: activities.iter().map(|a| a.total_elevation_gain).sum(),
        total_activities: activities.len(),
        total_kudos: activities.iter().map(|a| u64::from(a.kudos_count)).sum(),
    };

    // Earliest month wins a tie.
    let most_active_month = by_month(activities)
        .into_iter()
        .fold(None::<ActiveMonth>, |best, (key, group)| match best {
            Some(b) if b.activities >= group.len() => Some(b),
            _ => Some(ActiveMonth {
                month: key.month,
                activities: group.len(),
                distance: group.iter().map(|a| a.distance).sum(),
            }),
        });

    let mut day_counts = [0usize; 7];
    for activity in activities {
        day_counts[activity.start_date.weekday().num_days_from_sunday() as usize] += 1;
    }
    let favorite_day = day_counts
        .iter()
        .enumerate()
        .fold(None::<(usize, usize)>, |best, (day, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ if count > 0 => Some((day, count)),
            _ => best,
        })
        .map(|(day, _)| DAY_NAMES[day].to_string());

    let mut breakdown = sport_breakdown(activities);
    breakdown.sort_by(|a, b| b.distance.total_cmp(&a.distance));

    YearInSport {
        year,
        fun_insights: fun_insights(overall.total_distance, overall.total_time),
        overall,
        most_active_month,
        favorite_day,
        sport_breakdown: breakdown,
        longest_activity: max_by_key(activities, |a| a.distance).cloned(),
        fastest_pace: fastest_run(activities).cloned(),
    }
}

/// Playful comparisons for the recap.
pub fn fun_insights(total_distance_m: f64, total_time_s: u64) -> Vec<String> {
    let total_km = total_distance_m / 1000.0;
    let mut insights = Vec::new();
    if total_km <= 0.0 {
        return insights;
    }

    if total_km >= MARATHON_KM {
        let marathons = (total_km / MARATHON_KM).floor() as u64;
        let plural = if marathons > 1 { "s" } else { "" };
        insights.push(format!(
            "You ran the equivalent of {} marathon{}! 🏃",
            marathons, plural
        ));
    }
    if total_km >= TRACK_TRIP_KM {
        insights.push(format!(
            "That's {} trips around a running track! 🏟️",
            (total_km / TRACK_TRIP_KM).floor() as u64
        ));
    }

    let total_hours = total_time_s as f64 / 3600.0;
    if total_hours >= HOURS_PER_DAY {
        insights.push(format!(
            "You spent {} full days exercising! ⏱️",
            (total_hours / HOURS_PER_DAY).floor() as u64
        ));
    }
    insights
}
