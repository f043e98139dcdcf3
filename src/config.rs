// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Models tried in order when no `AI_MODELS` override is set.
pub const DEFAULT_AI_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.0-flash",
    "gemini-1.5-flash",
];

/// Body weight used for burn estimates when the user has no weight goal.
pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;

/// Per-request limit for completion calls.
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(20);

const DEFAULT_AI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (CORS origin, cookie security)
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Completion API key. `None` selects the local fallbacks directly.
    pub ai_api_key: Option<String>,
    /// Completion API base URL
    pub ai_api_base_url: String,
    /// Model identifiers, tried in order
    pub ai_models: Vec<String>,
    /// Upper bound on one completion request, connect included
    pub ai_timeout: Duration,
    /// Fallback body weight for calorie-burn estimates
    pub default_body_weight_kg: f64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            ai_api_key: None,
            ai_api_base_url: DEFAULT_AI_API_BASE_URL.to_string(),
            ai_models: DEFAULT_AI_MODELS.iter().map(|m| m.to_string()).collect(),
            ai_timeout: DEFAULT_AI_TIMEOUT,
            default_body_weight_kg: DEFAULT_BODY_WEIGHT_KG,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let default_body_weight_kg = match env::var("DEFAULT_BODY_WEIGHT_KG") {
            Ok(raw) => {
                let kg: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("DEFAULT_BODY_WEIGHT_KG"))?;
                if !(kg.is_finite() && kg > 0.0) {
                    return Err(ConfigError::Invalid("DEFAULT_BODY_WEIGHT_KG"));
                }
                kg
            }
            Err(_) => DEFAULT_BODY_WEIGHT_KG,
        };

        let ai_timeout = match env::var("AI_TIMEOUT_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::Invalid("AI_TIMEOUT_SECS")),
            },
            Err(_) => DEFAULT_AI_TIMEOUT,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            ai_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            ai_api_base_url: env::var("AI_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_AI_API_BASE_URL.to_string()),
            ai_models: env::var("AI_MODELS")
                .map(|raw| parse_model_list(&raw))
                .ok()
                .filter(|models| !models.is_empty())
                .unwrap_or_else(|| DEFAULT_AI_MODELS.iter().map(|m| m.to_string()).collect()),
            ai_timeout,
            default_body_weight_kg,
        })
    }

    /// Whether cookies must carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

/// Split a comma-separated model list, dropping blanks.
fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
