//! Per-user profile: demographics and nutrition targets.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;
pub const DEFAULT_PROTEIN_GOAL: f64 = 150.0;
pub const DEFAULT_CARB_GOAL: f64 = 250.0;
pub const DEFAULT_FAT_GOAL: f64 = 65.0;

/// Stored at `profiles/{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default = "default_calorie_goal")]
    pub calorie_goal: f64,
    #[serde(default = "default_protein_goal")]
    pub protein_goal: f64,
    #[serde(default = "default_carb_goal")]
    pub carb_goal: f64,
    #[serde(default = "default_fat_goal")]
    pub fat_goal: f64,
    #[serde(default)]
    pub updated_at: String,
}

impl Profile {
    /// Profile with default nutrition targets.
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            age: None,
            gender: None,
            height_cm: None,
            activity_level: None,
            calorie_goal: DEFAULT_CALORIE_GOAL,
            protein_goal: DEFAULT_PROTEIN_GOAL,
            carb_goal: DEFAULT_CARB_GOAL,
            fat_goal: DEFAULT_FAT_GOAL,
            updated_at: String::new(),
        }
    }
}

fn default_calorie_goal() -> f64 {
    DEFAULT_CALORIE_GOAL
}
fn default_protein_goal() -> f64 {
    DEFAULT_PROTEIN_GOAL
}
fn default_carb_goal() -> f64 {
    DEFAULT_CARB_GOAL
}
fn default_fat_goal() -> f64 {
    DEFAULT_FAT_GOAL
}
