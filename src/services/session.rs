// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout session wizard.
//!
//! The wizard is a pure reducer: `reduce(state, event)` returns the next
//! state plus an optional side effect for the caller to run (persisting the
//! finished workout, refreshing data). Nothing here performs I/O, so every
//! transition can be exercised without a UI or a database.
//!
//! ```text
//! Selection ──template/library──────────────► Detail
//!     │ create new                              ▲
//!     ▼                                         │ create workout
//! TypeSelection ─► ExerciseSelection ───────────┘
//!
//! Detail ─start─► Active ─finish─► (persist) ─saved─► Summary ─done─► Selection
//!                   ▲                  │
//!                   └──── save failed ─┘
//!
//! Selection ─manual log─► ManualLog ─saved/cancel─► Selection
//! ```

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Exercise, Workout, WorkoutTemplate, WorkoutType};
use crate::services::calories::{estimate_burn, session_minutes};
use crate::services::catalog::{self, LIBRARY};

/// Category used when a template does not record one.
const TEMPLATE_DEFAULT_TYPE: WorkoutType = WorkoutType::Strength;

/// An exercise being performed, with one completion flag per set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SessionExercise {
    #[serde(flatten)]
    pub exercise: Exercise,
    #[serde(default)]
    pub completed: Vec<bool>,
}

impl SessionExercise {
    /// Annotate an exercise with all sets incomplete.
    ///
    /// Exercises without a set count (timed work) get a single toggle.
    pub fn new(exercise: Exercise) -> Self {
        let sets = exercise.sets.unwrap_or(1) as usize;
        Self {
            exercise,
            completed: vec![false; sets],
        }
    }

    /// Annotate with client-reported flags, padded or truncated to the set count.
    pub fn with_completed(exercise: Exercise, completed: Vec<bool>) -> Self {
        let mut annotated = Self {
            exercise,
            completed,
        };
        annotated.resize_sets();
        annotated
    }

    fn resize_sets(&mut self) {
        let sets = self.exercise.sets.unwrap_or(1) as usize;
        self.completed.resize(sets, false);
    }
}

/// The workout composed in the wizard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionWorkout {
    pub name: String,
    pub workout_type: WorkoutType,
    pub exercises: Vec<SessionExercise>,
}

impl SessionWorkout {
    fn from_exercises(name: String, workout_type: WorkoutType, exercises: Vec<Exercise>) -> Self {
        Self {
            name,
            workout_type,
            exercises: exercises.into_iter().map(SessionExercise::new).collect(),
        }
    }

    /// Materialize a saved template.
    pub fn from_template(template: &WorkoutTemplate) -> Self {
        Self::from_exercises(
            template.name.clone(),
            template.workout_type.unwrap_or(TEMPLATE_DEFAULT_TYPE),
            template.exercises.clone(),
        )
    }

    /// (completed, total) set counts.
    pub fn set_progress(&self) -> (u32, u32) {
        self.exercises.iter().fold((0, 0), |(done, total), e| {
            let completed = e.completed.iter().filter(|c| **c).count() as u32;
            (done + completed, total + e.completed.len() as u32)
        })
    }
}

/// Inline edits allowed on the detail screen. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEdit {
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub duration_minutes: Option<f64>,
}

/// Inputs needed to finalize a session.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishContext {
    pub body_weight_kg: f64,
    /// Daily calorie target, for the summary's progress figure
    pub calorie_goal: Option<f64>,
    /// Workout date, RFC3339
    pub now: String,
}

/// A finished workout ready to persist. Completion flags are stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub name: String,
    pub workout_type: WorkoutType,
    pub duration: u32,
    pub calories_burned: u32,
    pub date: String,
    pub exercises: Vec<Exercise>,
}

impl WorkoutDraft {
    pub fn into_workout(self, id: String, user_id: String, created_at: String) -> Workout {
        Workout {
            id,
            user_id,
            name: self.name,
            workout_type: self.workout_type,
            duration: self.duration,
            calories_burned: self.calories_burned,
            date: self.date,
            exercises: self.exercises,
            created_at,
        }
    }
}

/// Turn a performed session into a persistable workout.
pub fn finalize(
    workout: &SessionWorkout,
    elapsed_seconds: u64,
    body_weight_kg: f64,
    date: &str,
) -> WorkoutDraft {
    let duration = session_minutes(elapsed_seconds);
    let exercises: Vec<Exercise> = workout
        .exercises
        .iter()
        .map(|e| e.exercise.clone())
        .collect();
    let calories_burned = estimate_burn(
        workout.workout_type,
        &exercises,
        f64::from(duration),
        body_weight_kg,
    );

    WorkoutDraft {
        name: workout.name.clone(),
        workout_type: workout.workout_type,
        duration,
        calories_burned,
        date: date.to_string(),
        exercises,
    }
}

/// Figures shown after a session.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Sum of sets x reps x weight
    pub total_volume: f64,
    pub completed_sets: u32,
    pub total_sets: u32,
    /// completed / total, 0 when there are no sets
    pub completion_ratio: f64,
    pub duration_minutes: u32,
    pub calories_burned: u32,
    /// calories burned / daily calorie goal
    pub calorie_goal_progress: Option<f64>,
}

impl SessionSummary {
    pub fn new(session: &SessionWorkout, saved: &Workout, calorie_goal: Option<f64>) -> Self {
        let (completed_sets, total_sets) = session.set_progress();
        let completion_ratio = if total_sets == 0 {
            0.0
        } else {
            f64::from(completed_sets) / f64::from(total_sets)
        };

        Self {
            total_volume: saved.exercises.iter().map(Exercise::volume).sum(),
            completed_sets,
            total_sets,
            completion_ratio,
            duration_minutes: saved.duration,
            calories_burned: saved.calories_burned,
            calorie_goal_progress: calorie_goal
                .filter(|g| *g > 0.0)
                .map(|g| f64::from(saved.calories_burned) / g),
        }
    }
}

/// Wizard states.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    Selection,
    ManualLog,
    TypeSelection,
    ExerciseSelection {
        workout_type: WorkoutType,
        /// Selected exercise names, in selection order
        selected: Vec<String>,
    },
    Detail {
        workout: SessionWorkout,
    },
    Active {
        workout: SessionWorkout,
        elapsed_seconds: u64,
        running: bool,
        /// Set while the finished workout is being persisted
        finishing: Option<FinishContext>,
        /// Last persist failure, shown for retry
        error: Option<String>,
    },
    Summary {
        workout: Workout,
        summary: SessionSummary,
    },
}

impl WizardState {
    pub const fn name(&self) -> &'static str {
        match self {
            WizardState::Selection => "selection",
            WizardState::ManualLog => "manual_log",
            WizardState::TypeSelection => "type",
            WizardState::ExerciseSelection { .. } => "exercises",
            WizardState::Detail { .. } => "detail",
            WizardState::Active { .. } => "active",
            WizardState::Summary { .. } => "summary",
        }
    }
}

/// User and system events.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    ChooseTemplate(WorkoutTemplate),
    /// Index into the built-in library
    ChooseLibrary(usize),
    CreateNew,
    OpenManualLog,
    /// Manual entry persisted, or abandoned
    CloseManualLog,
    SelectType(WorkoutType),
    ToggleExercise(String),
    CreateWorkout,
    EditExercise { index: usize, edit: ExerciseEdit },
    Start,
    /// One second of wall-clock time
    Tick,
    Pause,
    Resume,
    ToggleSet { exercise: usize, set: usize },
    Finish(FinishContext),
    Saved(Workout),
    SaveFailed(String),
    Done,
}

impl WizardEvent {
    const fn name(&self) -> &'static str {
        match self {
            WizardEvent::ChooseTemplate(_) => "choose_template",
            WizardEvent::ChooseLibrary(_) => "choose_library",
            WizardEvent::CreateNew => "create_new",
            WizardEvent::OpenManualLog => "open_manual_log",
            WizardEvent::CloseManualLog => "close_manual_log",
            WizardEvent::SelectType(_) => "select_type",
            WizardEvent::ToggleExercise(_) => "toggle_exercise",
            WizardEvent::CreateWorkout => "create_workout",
            WizardEvent::EditExercise { .. } => "edit_exercise",
            WizardEvent::Start => "start",
            WizardEvent::Tick => "tick",
            WizardEvent::Pause => "pause",
            WizardEvent::Resume => "resume",
            WizardEvent::ToggleSet { .. } => "toggle_set",
            WizardEvent::Finish(_) => "finish",
            WizardEvent::Saved(_) => "saved",
            WizardEvent::SaveFailed(_) => "save_failed",
            WizardEvent::Done => "done",
        }
    }
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Persist this workout, then send `Saved` or `SaveFailed`
    Persist(WorkoutDraft),
    /// Re-fetch templates and workouts
    Refresh,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: WizardState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn to(state: WizardState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error("'{event}' is not allowed in state '{state}'")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    #[error("Select at least one exercise")]
    EmptySelection,

    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    #[error("Unknown library workout: {0}")]
    UnknownLibraryWorkout(usize),

    #[error("No exercise or set at that position")]
    OutOfRange,

    #[error("Workout is already being saved")]
    SaveInProgress,
}

/// Apply one event.
pub fn reduce(state: WizardState, event: WizardEvent) -> Result<Transition, WizardError> {
    let invalid = |state: &WizardState, event: &WizardEvent| WizardError::InvalidTransition {
        state: state.name(),
        event: event.name(),
    };

    match (state, event) {
        // ─── Selection ───────────────────────────────────────────
        (WizardState::Selection, WizardEvent::ChooseTemplate(template)) => {
            Ok(Transition::to(WizardState::Detail {
                workout: SessionWorkout::from_template(&template),
            }))
        }
        (WizardState::Selection, WizardEvent::ChooseLibrary(index)) => {
            let entry = LIBRARY
                .get(index)
                .ok_or(WizardError::UnknownLibraryWorkout(index))?;
            Ok(Transition::to(WizardState::Detail {
                workout: SessionWorkout::from_exercises(
                    entry.name.to_string(),
                    entry.workout_type,
                    entry.exercises.iter().map(|e| e.to_exercise()).collect(),
                ),
            }))
        }
        (WizardState::Selection, WizardEvent::CreateNew) => {
            Ok(Transition::to(WizardState::TypeSelection))
        }
        (WizardState::Selection, WizardEvent::OpenManualLog) => {
            Ok(Transition::to(WizardState::ManualLog))
        }
        (WizardState::ManualLog, WizardEvent::CloseManualLog) => Ok(Transition {
            state: WizardState::Selection,
            effect: Some(Effect::Refresh),
        }),

        // ─── Type & exercises ────────────────────────────────────
        (WizardState::TypeSelection, WizardEvent::SelectType(workout_type)) => {
            Ok(Transition::to(WizardState::ExerciseSelection {
                workout_type,
                selected: Vec::new(),
            }))
        }
        (
            WizardState::ExerciseSelection {
                workout_type,
                mut selected,
            },
            WizardEvent::ToggleExercise(name),
        ) => {
            if catalog::find_exercise(workout_type, &name).is_none() {
                return Err(WizardError::UnknownExercise(name));
            }
            if let Some(pos) = selected.iter().position(|s| *s == name) {
                selected.remove(pos);
            } else {
                selected.push(name);
            }
            Ok(Transition::to(WizardState::ExerciseSelection {
                workout_type,
                selected,
            }))
        }
        (
            WizardState::ExerciseSelection {
                workout_type,
                selected,
            },
            WizardEvent::CreateWorkout,
        ) => {
            if selected.is_empty() {
                return Err(WizardError::EmptySelection);
            }
            let exercises = selected
                .iter()
                .map(|name| {
                    catalog::find_exercise(workout_type, name)
                        .map(|e| e.to_exercise())
                        .ok_or_else(|| WizardError::UnknownExercise(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Transition::to(WizardState::Detail {
                workout: SessionWorkout::from_exercises(
                    default_workout_name(workout_type),
                    workout_type,
                    exercises,
                ),
            }))
        }

        // ─── Detail ──────────────────────────────────────────────
        (WizardState::Detail { mut workout }, WizardEvent::EditExercise { index, edit }) => {
            let target = workout
                .exercises
                .get_mut(index)
                .ok_or(WizardError::OutOfRange)?;
            apply_edit(target, edit);
            Ok(Transition::to(WizardState::Detail { workout }))
        }
        (WizardState::Detail { workout }, WizardEvent::Start) => {
            Ok(Transition::to(WizardState::Active {
                workout,
                elapsed_seconds: 0,
                running: true,
                finishing: None,
                error: None,
            }))
        }

        // ─── Active ──────────────────────────────────────────────
        (
            WizardState::Active {
                workout,
                elapsed_seconds,
                running,
                finishing,
                error,
            },
            WizardEvent::Tick,
        ) => {
            // Ticks delivered while paused or saving are dropped.
            let elapsed_seconds = if running && finishing.is_none() {
                elapsed_seconds + 1
            } else {
                elapsed_seconds
            };
            Ok(Transition::to(WizardState::Active {
                workout,
                elapsed_seconds,
                running,
                finishing,
                error,
            }))
        }
        (
            WizardState::Active {
                finishing: Some(_), ..
            },
            WizardEvent::Pause | WizardEvent::Resume | WizardEvent::Finish(_),
        ) => Err(WizardError::SaveInProgress),
        (
            WizardState::Active {
                workout,
                elapsed_seconds,
                finishing,
                error,
                ..
            },
            WizardEvent::Pause,
        ) => Ok(Transition::to(WizardState::Active {
            workout,
            elapsed_seconds,
            running: false,
            finishing,
            error,
        })),
        (
            WizardState::Active {
                workout,
                elapsed_seconds,
                finishing,
                error,
                ..
            },
            WizardEvent::Resume,
        ) => Ok(Transition::to(WizardState::Active {
            workout,
            elapsed_seconds,
            running: true,
            finishing,
            error,
        })),
        (
            WizardState::Active {
                mut workout,
                elapsed_seconds,
                running,
                finishing,
                error,
            },
            WizardEvent::ToggleSet { exercise, set },
        ) => {
            let flag = workout
                .exercises
                .get_mut(exercise)
                .and_then(|e| e.completed.get_mut(set))
                .ok_or(WizardError::OutOfRange)?;
            *flag = !*flag;
            Ok(Transition::to(WizardState::Active {
                workout,
                elapsed_seconds,
                running,
                finishing,
                error,
            }))
        }
        (
            WizardState::Active {
                workout,
                elapsed_seconds,
                ..
            },
            WizardEvent::Finish(context),
        ) => {
            let draft = finalize(&workout, elapsed_seconds, context.body_weight_kg, &context.now);
            Ok(Transition {
                state: WizardState::Active {
                    workout,
                    elapsed_seconds,
                    running: false,
                    finishing: Some(context),
                    error: None,
                },
                effect: Some(Effect::Persist(draft)),
            })
        }
        (
            WizardState::Active {
                workout,
                finishing: Some(context),
                ..
            },
            WizardEvent::Saved(saved),
        ) => {
            let summary = SessionSummary::new(&workout, &saved, context.calorie_goal);
            Ok(Transition::to(WizardState::Summary {
                workout: saved,
                summary,
            }))
        }
        (
            WizardState::Active {
                workout,
                elapsed_seconds,
                finishing: Some(_),
                ..
            },
            WizardEvent::SaveFailed(message),
        ) => Ok(Transition::to(WizardState::Active {
            workout,
            elapsed_seconds,
            running: false,
            finishing: None,
            error: Some(message),
        })),

        // ─── Summary ─────────────────────────────────────────────
        (WizardState::Summary { .. }, WizardEvent::Done) => Ok(Transition {
            state: WizardState::Selection,
            effect: Some(Effect::Refresh),
        }),

        (state, event) => Err(invalid(&state, &event)),
    }
}

fn apply_edit(target: &mut SessionExercise, edit: ExerciseEdit) {
    if let Some(sets) = edit.sets {
        target.exercise.sets = Some(sets);
    }
    if let Some(reps) = edit.reps {
        target.exercise.reps = Some(reps);
    }
    if let Some(weight) = edit.weight {
        target.exercise.weight = Some(weight);
    }
    if let Some(minutes) = edit.duration_minutes {
        target.exercise.duration_minutes = Some(minutes);
    }
    target.resize_sets();
}

fn default_workout_name(workout_type: WorkoutType) -> String {
    let label = workout_type.as_str();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => format!("{}{} Workout", first.to_uppercase(), chars.as_str()),
        None => "Workout".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(state: WizardState, event: WizardEvent) -> WizardState {
        reduce(state, event).expect("transition should be valid").state
    }

    fn strength_detail() -> WizardState {
        let state = step(WizardState::Selection, WizardEvent::CreateNew);
        let state = step(state, WizardEvent::SelectType(WorkoutType::Strength));
        let state = step(state, WizardEvent::ToggleExercise("Bench Press".to_string()));
        let state = step(state, WizardEvent::ToggleExercise("Squat".to_string()));
        step(state, WizardEvent::CreateWorkout)
    }

    fn finish_context() -> FinishContext {
        FinishContext {
            body_weight_kg: 70.0,
            calorie_goal: Some(500.0),
            now: "2024-05-10T18:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let start = WizardState::ExerciseSelection {
            workout_type: WorkoutType::Strength,
            selected: vec!["Squat".to_string()],
        };
        let once = step(start.clone(), WizardEvent::ToggleExercise("Deadlift".to_string()));
        let twice = step(once, WizardEvent::ToggleExercise("Deadlift".to_string()));
        assert_eq!(twice, start);
    }

    #[test]
    fn test_create_workout_requires_selection() {
        let state = WizardState::ExerciseSelection {
            workout_type: WorkoutType::Cardio,
            selected: vec![],
        };
        assert_eq!(
            reduce(state, WizardEvent::CreateWorkout),
            Err(WizardError::EmptySelection)
        );
    }

    #[test]
    fn test_unknown_exercise_rejected() {
        let state = WizardState::ExerciseSelection {
            workout_type: WorkoutType::Yoga,
            selected: vec![],
        };
        assert!(matches!(
            reduce(state, WizardEvent::ToggleExercise("Deadlift".to_string())),
            Err(WizardError::UnknownExercise(_))
        ));
    }

    #[test]
    fn test_created_workout_has_completion_flags_per_set() {
        let WizardState::Detail { workout } = strength_detail() else {
            panic!("expected detail state");
        };
        assert_eq!(workout.name, "Strength Workout");
        assert_eq!(workout.exercises.len(), 2);
        assert_eq!(workout.exercises[0].exercise.name, "Bench Press");
        assert_eq!(workout.exercises[0].completed, vec![false; 4]);
    }

    #[test]
    fn test_template_goes_straight_to_detail() {
        let template = WorkoutTemplate {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            name: "Leg Day".to_string(),
            workout_type: None,
            exercises: vec![Exercise {
                name: "Lunges".to_string(),
                sets: Some(3),
                ..Default::default()
            }],
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };
        let WizardState::Detail { workout } =
            step(WizardState::Selection, WizardEvent::ChooseTemplate(template))
        else {
            panic!("expected detail state");
        };
        assert_eq!(workout.name, "Leg Day");
        assert_eq!(workout.workout_type, WorkoutType::Strength);
        assert_eq!(workout.exercises[0].completed.len(), 3);
    }

    #[test]
    fn test_library_choice() {
        let state = step(WizardState::Selection, WizardEvent::ChooseLibrary(1));
        assert_eq!(state.name(), "detail");
        assert_eq!(
            reduce(WizardState::Selection, WizardEvent::ChooseLibrary(99)),
            Err(WizardError::UnknownLibraryWorkout(99))
        );
    }

    #[test]
    fn test_edit_resizes_set_flags() {
        let state = step(
            strength_detail(),
            WizardEvent::EditExercise {
                index: 0,
                edit: ExerciseEdit {
                    sets: Some(2),
                    weight: Some(60.0),
                    ..Default::default()
                },
            },
        );
        let WizardState::Detail { workout } = state else {
            panic!("expected detail state");
        };
        assert_eq!(workout.exercises[0].completed.len(), 2);
        assert_eq!(workout.exercises[0].exercise.weight, Some(60.0));
    }

    #[test]
    fn test_clock_pauses_and_resumes() {
        let mut state = step(strength_detail(), WizardEvent::Start);
        state = step(state, WizardEvent::Tick);
        state = step(state, WizardEvent::Tick);
        state = step(state, WizardEvent::Pause);
        state = step(state, WizardEvent::Tick);
        state = step(state, WizardEvent::Resume);
        state = step(state, WizardEvent::Tick);

        let WizardState::Active {
            elapsed_seconds,
            running,
            ..
        } = state
        else {
            panic!("expected active state");
        };
        assert_eq!(elapsed_seconds, 3);
        assert!(running);
    }

    #[test]
    fn test_set_toggles_are_independent() {
        let mut state = step(strength_detail(), WizardEvent::Start);
        state = step(state, WizardEvent::ToggleSet { exercise: 0, set: 1 });
        state = step(state, WizardEvent::ToggleSet { exercise: 1, set: 0 });
        state = step(state, WizardEvent::ToggleSet { exercise: 1, set: 0 });

        let WizardState::Active { workout, .. } = &state else {
            panic!("expected active state");
        };
        assert_eq!(workout.exercises[0].completed, vec![false, true, false, false]);
        assert_eq!(workout.exercises[1].completed, vec![false; 4]);

        assert_eq!(
            reduce(state, WizardEvent::ToggleSet { exercise: 0, set: 9 }),
            Err(WizardError::OutOfRange)
        );
    }

    #[test]
    fn test_finish_then_save_reaches_summary() {
        let mut state = step(strength_detail(), WizardEvent::Start);
        for _ in 0..90 {
            state = step(state, WizardEvent::Tick);
        }
        state = step(state, WizardEvent::ToggleSet { exercise: 0, set: 0 });

        let transition = reduce(state, WizardEvent::Finish(finish_context())).unwrap();
        let Some(Effect::Persist(draft)) = transition.effect.clone() else {
            panic!("finish should request persistence");
        };
        assert_eq!(transition.state.name(), "active");
        assert_eq!(draft.duration, 2);
        // Two 4-set strength exercises: 2 * (5 * 70 * 2/60)
        assert_eq!(draft.calories_burned, 23);

        let saved = draft.into_workout(
            "w1".to_string(),
            "u1".to_string(),
            "2024-05-10T18:00:00Z".to_string(),
        );
        let WizardState::Summary { summary, .. } =
            step(transition.state, WizardEvent::Saved(saved))
        else {
            panic!("expected summary state");
        };
        assert_eq!(summary.completed_sets, 1);
        assert_eq!(summary.total_sets, 8);
        assert_eq!(summary.completion_ratio, 0.125);
        assert_eq!(summary.calorie_goal_progress, Some(23.0 / 500.0));
    }

    #[test]
    fn test_save_failure_stays_active_for_retry() {
        let state = step(strength_detail(), WizardEvent::Start);
        let state = step(state, WizardEvent::Finish(finish_context()));
        assert_eq!(
            reduce(state.clone(), WizardEvent::Pause),
            Err(WizardError::SaveInProgress)
        );

        let state = step(state, WizardEvent::SaveFailed("network down".to_string()));
        let WizardState::Active {
            error, finishing, ..
        } = &state
        else {
            panic!("expected active state");
        };
        assert_eq!(error.as_deref(), Some("network down"));
        assert!(finishing.is_none());

        // Retry is allowed.
        let retry = reduce(state, WizardEvent::Finish(finish_context())).unwrap();
        assert!(matches!(retry.effect, Some(Effect::Persist(_))));
    }

    #[test]
    fn test_done_resets_to_selection() {
        let state = step(strength_detail(), WizardEvent::Start);
        let transition = reduce(state, WizardEvent::Finish(finish_context())).unwrap();
        let Some(Effect::Persist(draft)) = transition.effect else {
            panic!("finish should request persistence");
        };
        let saved = draft.into_workout("w1".into(), "u1".into(), "now".into());
        let state = step(transition.state, WizardEvent::Saved(saved));

        let done = reduce(state, WizardEvent::Done).unwrap();
        assert_eq!(done.state, WizardState::Selection);
        assert_eq!(done.effect, Some(Effect::Refresh));
    }

    #[test]
    fn test_manual_log_path() {
        let state = step(WizardState::Selection, WizardEvent::OpenManualLog);
        let transition = reduce(state, WizardEvent::CloseManualLog).unwrap();
        assert_eq!(transition.state, WizardState::Selection);
    }

    #[test]
    fn test_invalid_transition_reports_names() {
        assert_eq!(
            reduce(WizardState::Selection, WizardEvent::Start),
            Err(WizardError::InvalidTransition {
                state: "selection",
                event: "start"
            })
        );
    }
}
