// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Body measurement model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Point-in-time body metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: String,
    pub user_id: String,
    /// RFC3339 UTC
    pub date: String,
    /// kg
    #[serde(default)]
    pub weight: Option<f64>,
    /// Percent
    #[serde(default)]
    pub body_fat: Option<f64>,
    /// cm
    #[serde(default)]
    pub waist: Option<f64>,
    /// cm
    #[serde(default)]
    pub chest: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
}
