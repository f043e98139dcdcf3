// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes (one profile per user, upsert on POST).

use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Profile;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/profile", get(get_profile).post(upsert_profile))
}

/// Fields a user may set. Omitted fields keep their current value.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[validate(range(min = 1, max = 130))]
    pub age: Option<u32>,
    #[validate(length(max = 50))]
    pub gender: Option<String>,
    #[validate(range(min = 50.0, max = 300.0))]
    pub height_cm: Option<f64>,
    #[validate(length(max = 50))]
    pub activity_level: Option<String>,
    #[validate(range(min = 500.0, max = 10000.0))]
    pub calorie_goal: Option<f64>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub protein_goal: Option<f64>,
    #[validate(range(min = 0.0, max = 2000.0))]
    pub carb_goal: Option<f64>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub fat_goal: Option<f64>,
}

impl ProfileInput {
    fn apply(self, profile: &mut Profile) {
        if self.age.is_some() {
            profile.age = self.age;
        }
        if let Some(gender) = self.gender {
            profile.gender = Some(gender).filter(|g| !g.trim().is_empty());
        }
        if self.height_cm.is_some() {
            profile.height_cm = self.height_cm;
        }
        if let Some(level) = self.activity_level {
            profile.activity_level = Some(level).filter(|l| !l.trim().is_empty());
        }
        if let Some(goal) = self.calorie_goal {
            profile.calorie_goal = goal;
        }
        if let Some(goal) = self.protein_goal {
            profile.protein_goal = goal;
        }
        if let Some(goal) = self.carb_goal {
            profile.carb_goal = goal;
        }
        if let Some(goal) = self.fat_goal {
            profile.fat_goal = goal;
        }
    }
}

/// The caller's profile; defaults when none has been saved.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Profile>> {
    let profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .unwrap_or_else(|| Profile::new(&user.user_id));
    Ok(Json(profile))
}

async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<ProfileInput>,
) -> Result<Json<Profile>> {
    input.validate()?;

    let mut profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .unwrap_or_else(|| Profile::new(&user.user_id));
    input.apply(&mut profile);
    profile.updated_at = now_rfc3339();

    state.db.upsert_profile(&profile).await?;
    tracing::info!(user_id = %user.user_id, "Profile saved");
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut profile = Profile::new("u1");
        profile.age = Some(30);

        let input: ProfileInput = serde_json::from_value(serde_json::json!({
            "calorieGoal": 2200,
            "heightCm": 180
        }))
        .unwrap();
        assert!(input.validate().is_ok());
        input.apply(&mut profile);

        assert_eq!(profile.age, Some(30));
        assert_eq!(profile.calorie_goal, 2200.0);
        assert_eq!(profile.height_cm, Some(180.0));
        assert_eq!(profile.protein_goal, 150.0);
    }

    #[test]
    fn test_out_of_range_goal_rejected() {
        let input: ProfileInput =
            serde_json::from_value(serde_json::json!({"calorieGoal": 50})).unwrap();
        assert!(input.validate().is_err());
    }
}
