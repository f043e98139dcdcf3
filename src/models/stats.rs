//! Dashboard aggregates computed from a user's records.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::profile::DEFAULT_CALORIE_GOAL;
use crate::models::{DietEntry, Goal, Measurement, Profile, Workout};
use crate::time_utils::{calendar_day, parse_client_date};

/// Summary shown on the dashboard.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    // ─── Workouts ────────────────────────────────────────────────
    pub total_workouts: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_calories_burned: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_minutes: u64,
    /// Workouts in the trailing 7 days
    pub workouts_this_week: u32,
    /// Consecutive days with a workout, ending today (or yesterday)
    pub streak: u32,
    /// Workout count per category
    pub workouts_by_type: BTreeMap<String, u32>,

    // ─── Body & Diet ─────────────────────────────────────────────
    pub latest_weight: Option<f64>,
    pub today_calories_consumed: f64,
    pub calorie_goal: f64,

    // ─── Goals ───────────────────────────────────────────────────
    pub active_goals: u32,
}

impl DashboardSummary {
    /// Aggregate a user's records as of `now`.
    pub fn build(
        workouts: &[Workout],
        measurements: &[Measurement],
        diet: &[DietEntry],
        goals: &[Goal],
        profile: Option<&Profile>,
        now: DateTime<Utc>,
    ) -> Self {
        let today = now.date_naive();
        let week_start = now - Duration::days(7);

        let mut workouts_by_type = BTreeMap::new();
        for workout in workouts {
            *workouts_by_type
                .entry(workout.workout_type.to_string())
                .or_insert(0) += 1;
        }

        let workouts_this_week = workouts
            .iter()
            .filter_map(|w| parse_client_date(&w.date))
            .filter(|d| *d >= week_start && *d <= now)
            .count() as u32;

        let streak = workout_streak(workouts.iter().filter_map(|w| calendar_day(&w.date)), today);

        let latest_weight = measurements
            .iter()
            .filter_map(|m| m.weight.map(|w| (m.date.as_str(), w)))
            .max_by(|a, b| a.0.cmp(b.0))
            .map(|(_, w)| w);

        let today_calories_consumed = diet
            .iter()
            .filter(|d| calendar_day(&d.date) == Some(today))
            .map(|d| d.calories)
            .sum();

        Self {
            total_workouts: workouts.len() as u32,
            total_calories_burned: workouts.iter().map(|w| u64::from(w.calories_burned)).sum(),
            total_minutes: workouts.iter().map(|w| u64::from(w.duration)).sum(),
            workouts_this_week,
            streak,
            workouts_by_type,
            latest_weight,
            today_calories_consumed,
            calorie_goal: profile.map_or(DEFAULT_CALORIE_GOAL, |p| p.calorie_goal),
            active_goals: goals.iter().filter(|g| g.active).count() as u32,
        }
    }
}

/// Count consecutive calendar days with activity, ending at `today`.
///
/// A day with nothing logged yet does not break the streak: when `today` is
/// empty the count starts from yesterday.
pub fn workout_streak(days: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = days.into_iter().collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}
