// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI-backed routes. These never fail on the AI side: when no model
//! answers, locally computed content is returned with `source: "fallback"`.

use axum::{extract::State, routing::post, Extension, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Workout;
use crate::services::ai::{MealSuggestion, SuggestionRequest};
use crate::services::NutritionEstimate;
use crate::AppState;

/// Recent workouts included in a report.
const REPORT_RECENT_WORKOUTS: u32 = 5;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/diet/suggestions", post(meal_suggestions))
        .route("/api/diet/calculate-calories", post(calculate_calories))
        .route("/api/generate-report", post(generate_report))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<MealSuggestion>,
    /// Model name, or "fallback"
    pub source: String,
}

async fn meal_suggestions(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuggestionRequest>,
) -> Json<SuggestionsResponse> {
    let resolved = state.ai.meal_suggestions(&req).await;
    Json(SuggestionsResponse {
        suggestions: resolved.value,
        source: resolved.source,
    })
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CalculateCaloriesRequest {
    #[validate(length(min = 1, max = 200))]
    pub food_name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub portion_size: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalculateCaloriesResponse {
    #[serde(flatten)]
    pub estimate: NutritionEstimate,
    pub source: String,
}

async fn calculate_calories(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalculateCaloriesRequest>,
) -> Result<Json<CalculateCaloriesResponse>> {
    req.validate()?;
    let resolved = state
        .ai
        .calculate_calories(req.food_name.trim(), req.portion_size.trim())
        .await;

    Ok(Json(CalculateCaloriesResponse {
        estimate: resolved.value,
        source: resolved.source,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ReportResponse {
    /// Markdown
    pub report: String,
    pub source: String,
}

/// Progress report over the caller's records.
async fn generate_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ReportResponse>> {
    let summary = super::dashboard::load_summary(&state, &user.user_id, Utc::now()).await?;
    let recent: Vec<Workout> = state
        .db
        .list_recent_records(&user.user_id, REPORT_RECENT_WORKOUTS)
        .await?;

    let resolved = state.ai.progress_report(&summary, &recent).await;
    Ok(Json(ReportResponse {
        report: resolved.value,
        source: resolved.source,
    }))
}
