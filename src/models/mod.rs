// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod diet;
pub mod friendship;
pub mod goal;
pub mod measurement;
pub mod profile;
pub mod stats;
pub mod user;
pub mod workout;

pub use diet::{DietEntry, MealType};
pub use friendship::{Friendship, FriendshipStatus, Relationships};
pub use goal::{Goal, GoalType};
pub use measurement::Measurement;
pub use profile::Profile;
pub use stats::DashboardSummary;
pub use user::{PublicProfile, Role, User};
pub use workout::{Exercise, Workout, WorkoutTemplate, WorkoutType};
