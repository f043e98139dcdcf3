// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard summary and exercise catalog routes.

use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{DashboardSummary, DietEntry, Goal, Measurement, Workout};
use crate::services::catalog::{self, Catalog};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard-summary", get(dashboard_summary))
        .route("/api/catalog", get(get_catalog))
}

/// Load every record the summary needs and aggregate as of `now`.
pub(crate) async fn load_summary(
    state: &AppState,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<DashboardSummary> {
    let (workouts, measurements, diet, goals, profile) = tokio::try_join!(
        state.db.list_records::<Workout>(user_id),
        state.db.list_records::<Measurement>(user_id),
        state.db.list_records::<DietEntry>(user_id),
        state.db.list_records::<Goal>(user_id),
        state.db.get_profile(user_id),
    )?;

    Ok(DashboardSummary::build(
        &workouts,
        &measurements,
        &diet,
        &goals,
        profile.as_ref(),
        now,
    ))
}

async fn dashboard_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardSummary>> {
    let summary = load_summary(&state, &user.user_id, Utc::now()).await?;
    tracing::debug!(
        user_id = %user.user_id,
        total_workouts = summary.total_workouts,
        streak = summary.streak,
        "Dashboard summary"
    );
    Ok(Json(summary))
}

async fn get_catalog() -> Json<Catalog> {
    Json(catalog::catalog())
}
