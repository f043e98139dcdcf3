// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI suggestion gateway.
//!
//! Each request is tried against an ordered list of models; the first
//! response that yields usable output wins. When no provider is configured,
//! or every model fails, a locally computed fallback is returned instead.
//! Callers never see an error from this module.

use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::config::Config;
use crate::models::{DashboardSummary, MealType, Workout};
use crate::services::nutrition::{self, NutritionEstimate};

/// Connect limit, capped by the overall request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Source label for fallback content.
pub const FALLBACK_SOURCE: &str = "fallback";

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Completion API returned no text")]
    EmptyResponse,
}

/// A text-completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, AiError>;
}

// ─── Gemini ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Client whose requests give up after `timeout`, connect included.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, AiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AiError::Api { status, message });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text.filter(|t| !t.trim().is_empty()))
            .ok_or(AiError::EmptyResponse)
    }
}

// ─── JSON extraction ─────────────────────────────────────────────

static JSON_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)```").ok());

static ANY_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z]*\s*([\s\S]*?)```").ok());

/// Pull a JSON value out of free-form model output.
///
/// Tried in order: the whole text, a ```json fence, any fence, the first
/// array that parses, the first object that parses. Text after the value is
/// ignored.
pub fn extract_json(text: &str) -> Option<serde_json::Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let fenced = [&JSON_FENCE, &ANY_FENCE].into_iter().find_map(|pattern| {
        let captures = pattern.as_ref()?.captures(trimmed)?;
        serde_json::from_str(captures.get(1)?.as_str().trim()).ok()
    });
    if fenced.is_some() {
        return fenced;
    }

    ['[', '{']
        .into_iter()
        .find_map(|open| leading_value(trimmed, open))
}

/// First JSON value starting at an `open` delimiter in `text`.
fn leading_value(text: &str, open: char) -> Option<serde_json::Value> {
    text.match_indices(open).find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<serde_json::Value>()
            .next()?
            .ok()
    })
}

/// Deserialize the JSON value embedded in `text`.
fn parse_json<T: DeserializeOwned>(text: &str) -> Option<T> {
    extract_json(text).and_then(|v| serde_json::from_value(v).ok())
}

// ─── Candidate combinator ────────────────────────────────────────

/// Run `attempt` over `candidates` in order and return the first success,
/// tagged with the candidate that produced it.
pub async fn first_success<C, T, E, F, Fut>(
    candidates: impl IntoIterator<Item = C>,
    mut attempt: F,
) -> Option<(C, T)>
where
    C: Clone + Display,
    E: Display,
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    for candidate in candidates {
        match attempt(candidate.clone()).await {
            Ok(value) => return Some((candidate, value)),
            Err(e) => tracing::warn!(candidate = %candidate, error = %e, "Candidate failed"),
        }
    }
    None
}

/// Output plus the model (or `"fallback"`) that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: String,
}

impl<T> Resolved<T> {
    pub fn is_fallback(&self) -> bool {
        self.source == FALLBACK_SOURCE
    }
}

#[derive(Debug, thiserror::Error)]
enum AttemptError {
    #[error(transparent)]
    Provider(#[from] AiError),
    #[error("response had no usable content")]
    Unusable,
}

// ─── Domain payloads ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub meal_type: Option<MealType>,
    /// Calories left in today's budget
    pub remaining_calories: Option<f64>,
    pub preferences: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MealSuggestion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

impl MealSuggestion {
    fn canned(name: &str, description: &str, macros: [f64; 4]) -> Self {
        let [calories, protein, carbs, fat] = macros;
        Self {
            name: name.to_string(),
            description: description.to_string(),
            calories,
            protein,
            carbs,
            fat,
        }
    }
}

/// Suggestions offered when no model answers.
pub fn fallback_suggestions() -> Vec<MealSuggestion> {
    vec![
        MealSuggestion::canned(
            "Grilled Chicken Salad",
            "Mixed greens with grilled chicken breast, cherry tomatoes and olive oil dressing",
            [350.0, 35.0, 12.0, 18.0],
        ),
        MealSuggestion::canned(
            "Greek Yogurt Parfait",
            "Greek yogurt layered with berries, oats and a drizzle of honey",
            [280.0, 20.0, 38.0, 5.0],
        ),
        MealSuggestion::canned(
            "Dal with Brown Rice",
            "Yellow lentil dal served with a cup of brown rice and sauteed vegetables",
            [420.0, 18.0, 70.0, 7.0],
        ),
    ]
}

/// Markdown progress report built from the dashboard figures.
pub fn fallback_report(summary: &DashboardSummary, recent: &[Workout]) -> String {
    let mut report = String::from("# Your Fitness Progress Report\n\n## Summary\n\n");
    report.push_str(&format!(
        "- **Total workouts:** {}\n- **Calories burned:** {}\n",
        summary.total_workouts, summary.total_calories_burned,
    ));
    report.push_str(&format!(
        "- **Workouts this week:** {}\n- **Current streak:** {} day(s)\n",
        summary.workouts_this_week, summary.streak,
    ));
    if let Some(weight) = summary.latest_weight {
        report.push_str(&format!("- **Latest weight:** {weight:.1} kg\n"));
    }
    report.push_str(&format!(
        "- **Calories consumed today:** {:.0} / {:.0}\n",
        summary.today_calories_consumed, summary.calorie_goal
    ));

    if !recent.is_empty() {
        report.push_str("\n## Recent Workouts\n\n");
        for workout in recent {
            report.push_str(&format!(
                "- {} ({}): {} min, {} kcal\n",
                workout.name, workout.workout_type, workout.duration, workout.calories_burned
            ));
        }
    }

    report.push_str("\n## Recommendations\n\n");
    if summary.workouts_this_week < 3 {
        report.push_str("- Aim for at least three workouts this week.\n");
    } else {
        report.push_str("- Great consistency this week. Keep it up.\n");
    }
    if summary.today_calories_consumed > summary.calorie_goal {
        report.push_str("- Today's intake is above your calorie goal.\n");
    }
    report.push_str("- Stay hydrated and get enough sleep to support recovery.\n");
    report
}

fn plausible_estimate(estimate: &NutritionEstimate) -> bool {
    [
        estimate.calories,
        estimate.protein,
        estimate.carbs,
        estimate.fat,
    ]
    .iter()
    .all(|v| v.is_finite() && *v >= 0.0)
}

// ─── Gateway ─────────────────────────────────────────────────────

/// Ordered models plus a terminal fallback.
#[derive(Clone)]
pub struct AiGateway {
    provider: Option<Arc<dyn CompletionProvider>>,
    models: Vec<String>,
}

impl AiGateway {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>, models: Vec<String>) -> Self {
        Self { provider, models }
    }

    /// Gemini when a key is configured, otherwise fallback-only.
    pub fn from_config(config: &Config) -> Result<Self, AiError> {
        let provider = match &config.ai_api_key {
            Some(key) => Some(Arc::new(GeminiClient::new(
                key.clone(),
                config.ai_api_base_url.clone(),
                config.ai_timeout,
            )?) as Arc<dyn CompletionProvider>),
            None => {
                tracing::info!("No AI API key configured; using local fallbacks");
                None
            }
        };
        Ok(Self::new(provider, config.ai_models.clone()))
    }

    /// Gateway that always answers from fallbacks.
    pub fn offline() -> Self {
        Self::new(None, Vec::new())
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some() && !self.models.is_empty()
    }

    /// Try each model until `parse` accepts a response, else use `fallback`.
    pub async fn generate<T>(
        &self,
        purpose: &str,
        prompt: &str,
        parse: impl Fn(&str) -> Option<T>,
        fallback: impl FnOnce() -> T,
    ) -> Resolved<T> {
        if let Some(provider) = &self.provider {
            let parse = &parse;
            let resolved = first_success(self.models.iter().cloned(), |model| {
                let provider = Arc::clone(provider);
                async move {
                    let text = provider.complete(&model, prompt).await?;
                    parse(&text).ok_or(AttemptError::Unusable)
                }
            })
            .await;

            if let Some((model, value)) = resolved {
                tracing::debug!(purpose, model = %model, "AI response accepted");
                return Resolved {
                    value,
                    source: model,
                };
            }
        }

        tracing::info!(purpose, "Using fallback content");
        Resolved {
            value: fallback(),
            source: FALLBACK_SOURCE.to_string(),
        }
    }

    /// Free text; any non-blank response is accepted.
    pub async fn generate_text(
        &self,
        purpose: &str,
        prompt: &str,
        fallback: impl FnOnce() -> String,
    ) -> Resolved<String> {
        self.generate(
            purpose,
            prompt,
            |text| {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            },
            fallback,
        )
        .await
    }

    pub async fn meal_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> Resolved<Vec<MealSuggestion>> {
        let mut prompt = String::from(
            "Suggest 3 healthy meals. Respond with only a JSON array of objects with keys \
             name, description, calories, protein, carbs, fat (numbers in kcal and grams).",
        );
        if let Some(meal_type) = request.meal_type {
            prompt.push_str(&format!(" Meal: {meal_type}."));
        }
        if let Some(remaining) = request.remaining_calories {
            prompt.push_str(&format!(" Remaining calorie budget: {remaining:.0} kcal."));
        }
        if let Some(preferences) = request.preferences.as_deref().filter(|p| !p.trim().is_empty()) {
            prompt.push_str(&format!(" Preferences: {}.", preferences.trim()));
        }

        self.generate(
            "meal_suggestions",
            &prompt,
            |text| parse_json::<Vec<MealSuggestion>>(text).filter(|list| !list.is_empty()),
            fallback_suggestions,
        )
        .await
    }

    pub async fn calculate_calories(
        &self,
        food_name: &str,
        portion_size: &str,
    ) -> Resolved<NutritionEstimate> {
        let prompt = format!(
            "Estimate the nutrition of \"{food_name}\" (portion: \"{portion_size}\"). \
             Respond with only a JSON object with numeric keys calories, protein, carbs, fat \
             (kcal and grams)."
        );

        self.generate(
            "calculate_calories",
            &prompt,
            |text| {
                parse_json::<NutritionEstimate>(text).filter(plausible_estimate)
            },
            || nutrition::estimate(food_name, portion_size),
        )
        .await
    }

    pub async fn progress_report(
        &self,
        summary: &DashboardSummary,
        recent: &[Workout],
    ) -> Resolved<String> {
        let stats = serde_json::to_string(summary).unwrap_or_default();
        let workouts: Vec<String> = recent
            .iter()
            .map(|w| {
                format!(
                    "{} ({}, {} min, {} kcal)",
                    w.name, w.workout_type, w.duration, w.calories_burned
                )
            })
            .collect();
        let prompt = format!(
            "Write a short, encouraging fitness progress report in Markdown with sections \
             Summary, Highlights and Recommendations.\nStats: {stats}\nRecent workouts: {}",
            workouts.join("; ")
        );

        self.generate_text("progress_report", &prompt, || fallback_report(summary, recent))
            .await
    }
}
