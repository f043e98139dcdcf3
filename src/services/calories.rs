// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calorie-burn estimation for workouts.
//!
//! Per exercise: `intensity x body_weight_kg x (minutes / 60)`, summed and
//! rounded to the nearest calorie.

use crate::models::{Exercise, WorkoutType};

/// Assumed minutes per set when an exercise has no explicit duration.
pub const MINUTES_PER_SET: f64 = 0.5;

/// Default intensity factor for a workout category.
pub const fn category_intensity(workout_type: WorkoutType) -> f64 {
    match workout_type {
        WorkoutType::Cardio => 7.0,
        WorkoutType::Strength => 5.0,
        WorkoutType::Yoga => 3.0,
        WorkoutType::Group => 6.0,
    }
}

/// Minutes attributed to one exercise: its own duration, else sets x 0.5,
/// else the whole session.
pub fn effective_minutes(exercise: &Exercise, session_minutes: f64) -> f64 {
    if let Some(minutes) = exercise.duration_minutes.filter(|m| *m > 0.0) {
        return minutes;
    }
    if let Some(sets) = exercise.sets.filter(|s| *s > 0) {
        return f64::from(sets) * MINUTES_PER_SET;
    }
    session_minutes
}

/// Estimate calories burned for a workout.
pub fn estimate_burn(
    workout_type: WorkoutType,
    exercises: &[Exercise],
    session_minutes: f64,
    body_weight_kg: f64,
) -> u32 {
    let base_intensity = category_intensity(workout_type);

    let total: f64 = exercises
        .iter()
        .map(|exercise| {
            let intensity = exercise
                .intensity
                .filter(|i| i.is_finite() && *i > 0.0)
                .unwrap_or(base_intensity);
            intensity * body_weight_kg * (effective_minutes(exercise, session_minutes) / 60.0)
        })
        .sum();

    if total.is_finite() && total > 0.0 {
        total.round() as u32
    } else {
        0
    }
}

/// Whole minutes for an elapsed session, never less than one.
pub fn session_minutes(elapsed_seconds: u64) -> u32 {
    let minutes = (elapsed_seconds as f64 / 60.0).round() as u32;
    minutes.max(1)
}
