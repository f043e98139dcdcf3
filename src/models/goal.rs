// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness goal model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// What a goal tracks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Body weight in kg
    Weight,
    /// Workouts per week
    WorkoutFrequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub goal_type: GoalType,
    #[serde(default)]
    pub start_value: Option<f64>,
    #[serde(default)]
    pub target_value: Option<f64>,
    /// RFC3339 UTC
    #[serde(default)]
    pub target_date: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: String,
}

fn default_active() -> bool {
    true
}

impl Goal {
    /// Body weight implied by a weight goal: the starting weight, else the target.
    pub fn body_weight_kg(&self) -> Option<f64> {
        if self.goal_type != GoalType::Weight {
            return None;
        }
        self.start_value
            .or(self.target_value)
            .filter(|kg| kg.is_finite() && *kg > 0.0)
    }
}

/// Body weight from the newest active weight goal among `goals`.
pub fn body_weight_from_goals(goals: &[Goal]) -> Option<f64> {
    goals
        .iter()
        .filter(|g| g.active)
        .filter_map(|g| g.body_weight_kg().map(|kg| (g.created_at.as_str(), kg)))
        .max_by(|a, b| a.0.cmp(b.0))
        .map(|(_, kg)| kg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(goal_type: GoalType, start: Option<f64>, target: Option<f64>, created: &str) -> Goal {
        Goal {
            id: created.to_string(),
            user_id: "u1".to_string(),
            goal_type,
            start_value: start,
            target_value: target,
            target_date: None,
            active: true,
            created_at: created.to_string(),
        }
    }

    #[test]
    fn test_body_weight_prefers_start_value() {
        let g = goal(GoalType::Weight, Some(82.0), Some(75.0), "2024-01-01T00:00:00Z");
        assert_eq!(g.body_weight_kg(), Some(82.0));
    }

    #[test]
    fn test_frequency_goal_has_no_weight() {
        let g = goal(GoalType::WorkoutFrequency, Some(3.0), Some(5.0), "2024-01-01T00:00:00Z");
        assert_eq!(g.body_weight_kg(), None);
    }

    #[test]
    fn test_newest_active_weight_goal_wins() {
        let mut old = goal(GoalType::Weight, Some(90.0), None, "2024-01-01T00:00:00Z");
        let newer = goal(GoalType::Weight, None, Some(80.0), "2024-06-01T00:00:00Z");
        let mut newest_inactive = goal(GoalType::Weight, Some(60.0), None, "2024-09-01T00:00:00Z");
        newest_inactive.active = false;
        assert_eq!(
            body_weight_from_goals(&[old.clone(), newer, newest_inactive]),
            Some(80.0)
        );

        old.active = false;
        assert_eq!(body_weight_from_goals(&[old]), None);
    }
}
