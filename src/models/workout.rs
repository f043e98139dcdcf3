// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout and workout-template models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Workout category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Cardio,
    Strength,
    Yoga,
    Group,
}

impl WorkoutType {
    pub const ALL: [WorkoutType; 4] = [
        WorkoutType::Cardio,
        WorkoutType::Strength,
        WorkoutType::Yoga,
        WorkoutType::Group,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Cardio => "cardio",
            WorkoutType::Strength => "strength",
            WorkoutType::Yoga => "yoga",
            WorkoutType::Group => "group",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cardio" => Ok(WorkoutType::Cardio),
            "strength" => Ok(WorkoutType::Strength),
            "yoga" => Ok(WorkoutType::Yoga),
            "group" => Ok(WorkoutType::Group),
            other => Err(format!("Unknown workout type: {other}")),
        }
    }
}

/// One exercise inside a workout or template. Every metric is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    /// Load in kg
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    /// Per-exercise intensity override for burn estimates
    #[serde(default)]
    pub intensity: Option<f64>,
}

impl Exercise {
    /// sets x reps x weight, treating missing values as zero.
    pub fn volume(&self) -> f64 {
        f64::from(self.sets.unwrap_or(0))
            * f64::from(self.reps.unwrap_or(0))
            * self.weight.unwrap_or(0.0)
    }
}

/// A performed workout session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub workout_type: WorkoutType,
    /// Minutes
    pub duration: u32,
    pub calories_burned: u32,
    /// RFC3339 UTC
    pub date: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub created_at: String,
}

/// A reusable exercise plan without performance data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplate {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub workout_type: Option<WorkoutType>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub created_at: String,
}
