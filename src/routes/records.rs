// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Owned-record CRUD routes and workout session finalize.
//!
//! Workouts, measurements, diet entries, goals and templates share one set
//! of generic handlers. Every read and write is scoped to the caller; a
//! record owned by someone else answers 404.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::OwnedRecord;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::goal::body_weight_from_goals;
use crate::models::profile::DEFAULT_CALORIE_GOAL;
use crate::models::{
    DietEntry, Exercise, Goal, GoalType, MealType, Measurement, Workout, WorkoutTemplate,
    WorkoutType,
};
use crate::services::calories::estimate_burn;
use crate::services::session::{self, SessionExercise, SessionSummary, SessionWorkout};
use crate::time_utils::{normalize_client_date, now_rfc3339};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(crud::<WorkoutInput>("/api/workouts"))
        .merge(crud::<MeasurementInput>("/api/measurements"))
        .merge(crud::<DietInput>("/api/diet"))
        .merge(crud::<GoalInput>("/api/goals"))
        .merge(crud::<TemplateInput>("/api/templates"))
        .route("/api/workouts/session", post(finish_session))
}

fn crud<I: RecordInput>(base: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(base, get(list::<I>).post(create::<I>))
        .route(
            &format!("{base}/{{id}}"),
            get(get_one::<I>).put(update::<I>).delete(remove::<I>),
        )
}

// ─── Input plumbing ──────────────────────────────────────────

/// Server-assigned fields of a record.
pub struct RecordMeta {
    pub id: String,
    pub user_id: String,
    pub created_at: String,
    /// Body weight for burn estimates (kg)
    pub body_weight_kg: f64,
}

/// A validated request body that becomes an owned record.
pub trait RecordInput: DeserializeOwned + Validate + Send + Sync + 'static {
    type Record: OwnedRecord;

    /// Whether building the record needs the caller's body weight.
    fn needs_body_weight(&self) -> bool {
        false
    }

    fn into_record(self, meta: RecordMeta) -> Result<Self::Record>;
}

/// Normalize an optional client date, defaulting to now.
fn record_date(raw: Option<&str>) -> Result<String> {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => normalize_client_date(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid date: {raw}"))),
        None => Ok(now_rfc3339()),
    }
}

/// Body weight from the caller's active weight goal, else the configured default.
pub(crate) async fn body_weight_for(state: &AppState, user_id: &str) -> Result<f64> {
    let goals: Vec<Goal> = state.db.list_records(user_id).await?;
    Ok(body_weight_from_goals(&goals).unwrap_or(state.config.default_body_weight_kg))
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(max = 100))]
    pub sets: Option<u32>,
    #[validate(range(max = 1000))]
    pub reps: Option<u32>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0, max = 1440.0))]
    pub duration_minutes: Option<f64>,
    #[validate(range(min = 0.0, max = 30.0))]
    pub intensity: Option<f64>,
}

impl From<ExerciseInput> for Exercise {
    fn from(input: ExerciseInput) -> Self {
        Exercise {
            name: input.name.trim().to_string(),
            sets: input.sets,
            reps: input.reps,
            weight: input.weight,
            duration_minutes: input.duration_minutes,
            intensity: input.intensity,
        }
    }
}

// ─── Workouts ────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub workout_type: WorkoutType,
    /// Minutes
    #[validate(range(min = 1, max = 1440))]
    pub duration: u32,
    /// Estimated from the exercises when omitted
    #[validate(range(max = 20000))]
    pub calories_burned: Option<u32>,
    pub date: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub exercises: Vec<ExerciseInput>,
}

impl RecordInput for WorkoutInput {
    type Record = Workout;

    fn needs_body_weight(&self) -> bool {
        self.calories_burned.is_none()
    }

    fn into_record(self, meta: RecordMeta) -> Result<Workout> {
        let exercises: Vec<Exercise> = self.exercises.into_iter().map(Exercise::from).collect();
        let calories_burned = self.calories_burned.unwrap_or_else(|| {
            estimate_burn(
                self.workout_type,
                &exercises,
                f64::from(self.duration),
                meta.body_weight_kg,
            )
        });

        Ok(Workout {
            id: meta.id,
            user_id: meta.user_id,
            name: self.name.trim().to_string(),
            workout_type: self.workout_type,
            duration: self.duration,
            calories_burned,
            date: record_date(self.date.as_deref())?,
            exercises,
            created_at: meta.created_at,
        })
    }
}

// ─── Measurements ────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementInput {
    pub date: Option<String>,
    #[validate(range(min = 0.0, max = 500.0))]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub body_fat: Option<f64>,
    #[validate(range(min = 0.0, max = 300.0))]
    pub waist: Option<f64>,
    #[validate(range(min = 0.0, max = 300.0))]
    pub chest: Option<f64>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl RecordInput for MeasurementInput {
    type Record = Measurement;

    fn into_record(self, meta: RecordMeta) -> Result<Measurement> {
        Ok(Measurement {
            id: meta.id,
            user_id: meta.user_id,
            date: record_date(self.date.as_deref())?,
            weight: self.weight,
            body_fat: self.body_fat,
            waist: self.waist,
            chest: self.chest,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            created_at: meta.created_at,
        })
    }
}

// ─── Diet ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DietInput {
    pub date: Option<String>,
    pub meal_type: MealType,
    #[validate(length(min = 1, max = 200))]
    pub food_name: String,
    #[validate(length(max = 100))]
    pub portion_size: Option<String>,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub calories: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub protein: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub carbs: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub fat: f64,
}

impl RecordInput for DietInput {
    type Record = DietEntry;

    fn into_record(self, meta: RecordMeta) -> Result<DietEntry> {
        Ok(DietEntry {
            id: meta.id,
            user_id: meta.user_id,
            date: record_date(self.date.as_deref())?,
            meal_type: self.meal_type,
            food_name: self.food_name.trim().to_string(),
            portion_size: self.portion_size.filter(|p| !p.trim().is_empty()),
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            created_at: meta.created_at,
        })
    }
}

// ─── Goals ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    pub goal_type: GoalType,
    #[validate(range(min = 0.0))]
    pub start_value: Option<f64>,
    #[validate(range(min = 0.0))]
    pub target_value: Option<f64>,
    pub target_date: Option<String>,
    pub active: Option<bool>,
}

impl RecordInput for GoalInput {
    type Record = Goal;

    fn into_record(self, meta: RecordMeta) -> Result<Goal> {
        let target_date = match self.target_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                normalize_client_date(raw)
                    .ok_or_else(|| AppError::BadRequest(format!("Invalid date: {raw}")))?,
            ),
            _ => None,
        };

        Ok(Goal {
            id: meta.id,
            user_id: meta.user_id,
            goal_type: self.goal_type,
            start_value: self.start_value,
            target_value: self.target_value,
            target_date,
            active: self.active.unwrap_or(true),
            created_at: meta.created_at,
        })
    }
}

// ─── Templates ───────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub workout_type: Option<WorkoutType>,
    #[serde(default)]
    #[validate(nested)]
    pub exercises: Vec<ExerciseInput>,
}

impl RecordInput for TemplateInput {
    type Record = WorkoutTemplate;

    fn into_record(self, meta: RecordMeta) -> Result<WorkoutTemplate> {
        Ok(WorkoutTemplate {
            id: meta.id,
            user_id: meta.user_id,
            name: self.name.trim().to_string(),
            workout_type: self.workout_type,
            exercises: self.exercises.into_iter().map(Exercise::from).collect(),
            created_at: meta.created_at,
        })
    }
}

// ─── Generic handlers ────────────────────────────────────────

async fn list<I: RecordInput>(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<I::Record>>> {
    let records = state.db.list_records::<I::Record>(&user.user_id).await?;
    Ok(Json(records))
}

async fn get_one<I: RecordInput>(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<I::Record>> {
    let record = state
        .db
        .get_record::<I::Record>(&id, &user.user_id)
        .await?
        .ok_or_else(|| not_found::<I::Record>())?;
    Ok(Json(record))
}

async fn create<I: RecordInput>(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<I>,
) -> Result<(StatusCode, Json<I::Record>)> {
    input.validate()?;

    let meta = RecordMeta {
        id: uuid::Uuid::new_v4().to_string(),
        body_weight_kg: resolve_body_weight(&state, &user.user_id, &input).await?,
        user_id: user.user_id,
        created_at: now_rfc3339(),
    };
    let record = input.into_record(meta)?;
    state.db.put_record(&record).await?;

    tracing::info!(
        user_id = %record.user_id(),
        id = %record.id(),
        kind = <I::Record as OwnedRecord>::KIND,
        "Record created"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update<I: RecordInput>(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(input): Json<I>,
) -> Result<Json<I::Record>> {
    input.validate()?;

    let existing = state
        .db
        .get_record::<I::Record>(&id, &user.user_id)
        .await?
        .ok_or_else(|| not_found::<I::Record>())?;

    let meta = RecordMeta {
        body_weight_kg: resolve_body_weight(&state, &user.user_id, &input).await?,
        id,
        user_id: user.user_id,
        created_at: existing.created_at().to_string(),
    };
    let record = input.into_record(meta)?;
    state.db.put_record(&record).await?;

    tracing::info!(
        id = %record.id(),
        kind = <I::Record as OwnedRecord>::KIND,
        "Record updated"
    );
    Ok(Json(record))
}

async fn remove<I: RecordInput>(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state
        .db
        .delete_record::<I::Record>(&id, &user.user_id)
        .await?
    {
        return Err(not_found::<I::Record>());
    }

    tracing::info!(id = %id, kind = <I::Record as OwnedRecord>::KIND, "Record deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn resolve_body_weight<I: RecordInput>(
    state: &AppState,
    user_id: &str,
    input: &I,
) -> Result<f64> {
    if input.needs_body_weight() {
        body_weight_for(state, user_id).await
    } else {
        Ok(state.config.default_body_weight_kg)
    }
}

fn not_found<R: OwnedRecord>() -> AppError {
    AppError::NotFound(format!("{} not found", R::KIND))
}

// ─── Workout session finalize ────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionExerciseInput {
    #[serde(flatten)]
    #[validate(nested)]
    pub exercise: ExerciseInput,
    #[serde(default)]
    pub completed: Vec<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FinishSessionRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub workout_type: WorkoutType,
    #[validate(nested)]
    pub exercises: Vec<SessionExerciseInput>,
    /// Wall-clock seconds the session ran, excluding pauses
    #[validate(range(max = 86400))]
    pub elapsed_seconds: u64,
    pub date: Option<String>,
}

impl FinishSessionRequest {
    /// Field rules plus at least one exercise.
    fn check(&self) -> Result<()> {
        self.validate()?;
        if self.exercises.is_empty() {
            return Err(AppError::BadRequest(
                "a session needs at least one exercise".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct FinishSessionResponse {
    pub workout: Workout,
    pub summary: SessionSummary,
}

/// Persist a finished wizard session.
async fn finish_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<FinishSessionRequest>,
) -> Result<(StatusCode, Json<FinishSessionResponse>)> {
    req.check()?;

    let performed = SessionWorkout {
        name: req.name.trim().to_string(),
        workout_type: req.workout_type,
        exercises: req
            .exercises
            .into_iter()
            .map(|e| SessionExercise::with_completed(e.exercise.into(), e.completed))
            .collect(),
    };

    let date = record_date(req.date.as_deref())?;
    let (body_weight_kg, profile) = tokio::try_join!(
        body_weight_for(&state, &user.user_id),
        state.db.get_profile(&user.user_id),
    )?;

    let draft = session::finalize(&performed, req.elapsed_seconds, body_weight_kg, &date);
    let workout = draft.into_workout(
        uuid::Uuid::new_v4().to_string(),
        user.user_id.clone(),
        now_rfc3339(),
    );
    state.db.put_record(&workout).await?;

    let calorie_goal = profile.map_or(DEFAULT_CALORIE_GOAL, |p| p.calorie_goal);
    let summary = SessionSummary::new(&performed, &workout, Some(calorie_goal));

    tracing::info!(
        user_id = %user.user_id,
        workout_id = %workout.id,
        duration = workout.duration,
        calories = workout.calories_burned,
        completed_sets = summary.completed_sets,
        total_sets = summary.total_sets,
        "Workout session saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(FinishSessionResponse { workout, summary }),
    ))
}
