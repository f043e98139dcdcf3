// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Built-in exercise catalog and workout library.

use serde::Serialize;

use crate::models::{Exercise, WorkoutType};

/// One exercise offered for a category, with suggested defaults.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExercise {
    pub name: &'static str,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub duration_minutes: Option<f64>,
}

impl CatalogExercise {
    const fn sets_reps(name: &'static str, sets: u32, reps: u32) -> Self {
        Self {
            name,
            sets: Some(sets),
            reps: Some(reps),
            duration_minutes: None,
        }
    }

    const fn timed(name: &'static str, minutes: f64) -> Self {
        Self {
            name,
            sets: None,
            reps: None,
            duration_minutes: Some(minutes),
        }
    }

    pub fn to_exercise(&self) -> Exercise {
        Exercise {
            name: self.name.to_string(),
            sets: self.sets,
            reps: self.reps,
            weight: None,
            duration_minutes: self.duration_minutes,
            intensity: None,
        }
    }
}

const CARDIO: &[CatalogExercise] = &[
    CatalogExercise::timed("Running", 20.0),
    CatalogExercise::timed("Cycling", 30.0),
    CatalogExercise::timed("Rowing", 15.0),
    CatalogExercise::timed("Jump Rope", 10.0),
    CatalogExercise::sets_reps("Burpees", 3, 15),
];

const STRENGTH: &[CatalogExercise] = &[
    CatalogExercise::sets_reps("Bench Press", 4, 8),
    CatalogExercise::sets_reps("Squat", 4, 8),
    CatalogExercise::sets_reps("Deadlift", 3, 5),
    CatalogExercise::sets_reps("Overhead Press", 3, 10),
    CatalogExercise::sets_reps("Pull-ups", 3, 8),
    CatalogExercise::sets_reps("Bicep Curls", 3, 12),
];

const YOGA: &[CatalogExercise] = &[
    CatalogExercise::timed("Sun Salutation", 10.0),
    CatalogExercise::timed("Warrior Flow", 10.0),
    CatalogExercise::timed("Balance Poses", 8.0),
    CatalogExercise::timed("Savasana", 5.0),
];

const GROUP: &[CatalogExercise] = &[
    CatalogExercise::timed("Spin Class", 45.0),
    CatalogExercise::timed("HIIT Circuit", 30.0),
    CatalogExercise::timed("Zumba", 45.0),
    CatalogExercise::timed("Bootcamp", 40.0),
];

/// Exercises offered for a category.
pub fn exercises_for(workout_type: WorkoutType) -> &'static [CatalogExercise] {
    match workout_type {
        WorkoutType::Cardio => CARDIO,
        WorkoutType::Strength => STRENGTH,
        WorkoutType::Yoga => YOGA,
        WorkoutType::Group => GROUP,
    }
}

/// Find a catalog exercise by name within a category.
pub fn find_exercise(workout_type: WorkoutType, name: &str) -> Option<&'static CatalogExercise> {
    exercises_for(workout_type).iter().find(|e| e.name == name)
}

/// A ready-made workout offered on the selection screen.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryWorkout {
    pub name: &'static str,
    pub workout_type: WorkoutType,
    pub exercises: &'static [CatalogExercise],
}

pub const LIBRARY: &[LibraryWorkout] = &[
    LibraryWorkout {
        name: "Full Body Strength",
        workout_type: WorkoutType::Strength,
        exercises: &[
            CatalogExercise::sets_reps("Squat", 4, 8),
            CatalogExercise::sets_reps("Bench Press", 4, 8),
            CatalogExercise::sets_reps("Deadlift", 3, 5),
        ],
    },
    LibraryWorkout {
        name: "Quick Cardio Burn",
        workout_type: WorkoutType::Cardio,
        exercises: &[
            CatalogExercise::timed("Jump Rope", 10.0),
            CatalogExercise::sets_reps("Burpees", 3, 15),
            CatalogExercise::timed("Running", 15.0),
        ],
    },
    LibraryWorkout {
        name: "Morning Yoga",
        workout_type: WorkoutType::Yoga,
        exercises: &[
            CatalogExercise::timed("Sun Salutation", 10.0),
            CatalogExercise::timed("Warrior Flow", 10.0),
            CatalogExercise::timed("Savasana", 5.0),
        ],
    },
];

/// Catalog payload for the selection and exercise screens.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub categories: Vec<CatalogCategory>,
    pub library: &'static [LibraryWorkout],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCategory {
    pub workout_type: WorkoutType,
    pub exercises: &'static [CatalogExercise],
}

/// The full static catalog.
pub fn catalog() -> Catalog {
    Catalog {
        categories: WorkoutType::ALL
            .iter()
            .map(|t| CatalogCategory {
                workout_type: *t,
                exercises: exercises_for(*t),
            })
            .collect(),
        library: LIBRARY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_exercises() {
        for t in WorkoutType::ALL {
            assert!(!exercises_for(t).is_empty(), "{t} has no exercises");
        }
    }

    #[test]
    fn test_library_exercises_exist_in_catalog() {
        for workout in LIBRARY {
            for exercise in workout.exercises {
                assert!(
                    find_exercise(workout.workout_type, exercise.name).is_some(),
                    "{} missing from {} catalog",
                    exercise.name,
                    workout.workout_type
                );
            }
        }
    }
}
