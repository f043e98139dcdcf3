// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin-only aggregate routes. Gated by `require_admin` in routes/mod.rs.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::models::{DietEntry, Measurement, Role, User, Workout};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/stats", get(admin_stats))
        .route("/api/admin/users", get(admin_users))
}

#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u32,
    pub admin_users: u32,
    pub total_workouts: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_calories_burned: u64,
    pub total_measurements: u32,
    pub total_diet_entries: u32,
    pub workouts_by_type: BTreeMap<String, u32>,
}

impl AdminStats {
    fn build(
        users: &[User],
        workouts: &[Workout],
        measurements: &[Measurement],
        diet: &[DietEntry],
    ) -> Self {
        let mut workouts_by_type = BTreeMap::new();
        for workout in workouts {
            *workouts_by_type
                .entry(workout.workout_type.to_string())
                .or_insert(0) += 1;
        }

        Self {
            total_users: users.len() as u32,
            admin_users: users.iter().filter(|u| u.role == Role::Admin).count() as u32,
            total_workouts: workouts.len() as u32,
            total_calories_burned: workouts.iter().map(|w| u64::from(w.calories_burned)).sum(),
            total_measurements: measurements.len() as u32,
            total_diet_entries: diet.len() as u32,
            workouts_by_type,
        }
    }
}

async fn admin_stats(State(state): State<Arc<AppState>>) -> Result<Json<AdminStats>> {
    let (users, workouts, measurements, diet) = tokio::try_join!(
        state.db.list_users(),
        state.db.list_all_records::<Workout>(),
        state.db.list_all_records::<Measurement>(),
        state.db.list_all_records::<DietEntry>(),
    )?;

    Ok(Json(AdminStats::build(&users, &workouts, &measurements, &diet)))
}

/// One row of the admin user list. Never includes credentials.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: String,
}

async fn admin_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<AdminUserRow>>> {
    let users = state.db.list_users().await?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| AdminUserRow {
                id: u.id,
                email: u.email,
                name: u.name,
                role: u.role,
                created_at: u.created_at,
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutType;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            password_hash: Some("hash".to_string()),
            name: id.to_string(),
            avatar_url: None,
            role,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn workout(workout_type: WorkoutType, calories: u32) -> Workout {
        Workout {
            id: "w".to_string(),
            user_id: "a".to_string(),
            name: "w".to_string(),
            workout_type,
            duration: 30,
            calories_burned: calories,
            date: "2024-01-02T00:00:00Z".to_string(),
            exercises: vec![],
            created_at: "2024-01-02T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_admin_stats_aggregates() {
        let users = vec![user("a", Role::Admin), user("b", Role::User)];
        let workouts = vec![
            workout(WorkoutType::Cardio, 200),
            workout(WorkoutType::Cardio, 100),
            workout(WorkoutType::Yoga, 50),
        ];

        let stats = AdminStats::build(&users, &workouts, &[], &[]);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.admin_users, 1);
        assert_eq!(stats.total_workouts, 3);
        assert_eq!(stats.total_calories_burned, 350);
        assert_eq!(stats.workouts_by_type.get("cardio"), Some(&2));
        assert_eq!(stats.workouts_by_type.get("yoga"), Some(&1));
    }
}
