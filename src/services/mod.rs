// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod ai;
pub mod calories;
pub mod catalog;
pub mod friends;
pub mod nutrition;
pub mod session;

pub use ai::{AiGateway, CompletionProvider, GeminiClient, Resolved};
pub use friends::{FriendError, FriendService};
pub use nutrition::NutritionEstimate;
pub use session::{WizardError, WizardEvent, WizardState};
