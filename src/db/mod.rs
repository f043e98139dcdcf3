//! Database layer (Firestore).

pub mod firestore;

pub use firestore::{EdgeWrite, FirestoreDb};

use crate::models::{DietEntry, Goal, Measurement, Workout, WorkoutTemplate};
use serde::{de::DeserializeOwned, Serialize};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// One document per registered email, keyed by `email_key`
    pub const EMAILS: &str = "emails";
    pub const PROFILES: &str = "profiles";
    pub const WORKOUTS: &str = "workouts";
    pub const TEMPLATES: &str = "workout_templates";
    pub const MEASUREMENTS: &str = "measurements";
    pub const DIET_ENTRIES: &str = "diet_entries";
    pub const GOALS: &str = "goals";
    /// Friend relationship edges (keyed by the unordered user pair)
    pub const FRIENDSHIPS: &str = "friendships";
}

/// A document that belongs to exactly one user.
///
/// Every read and write of these goes through the owner's id; a document
/// whose `userId` differs from the caller is treated as missing.
pub trait OwnedRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Field used for ordering listings
    const ORDER_FIELD: &'static str;
    /// Default listing order
    const NEWEST_FIRST: bool;
    /// Human-readable kind, used in error messages
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn user_id(&self) -> &str;
    /// Kept unchanged across updates
    fn created_at(&self) -> &str;
}

impl OwnedRecord for Workout {
    const COLLECTION: &'static str = collections::WORKOUTS;
    const ORDER_FIELD: &'static str = "date";
    const NEWEST_FIRST: bool = true;
    const KIND: &'static str = "Workout";

    fn id(&self) -> &str {
        &self.id
    }
    fn user_id(&self) -> &str {
        &self.user_id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl OwnedRecord for WorkoutTemplate {
    const COLLECTION: &'static str = collections::TEMPLATES;
    const ORDER_FIELD: &'static str = "createdAt";
    const NEWEST_FIRST: bool = true;
    const KIND: &'static str = "Template";

    fn id(&self) -> &str {
        &self.id
    }
    fn user_id(&self) -> &str {
        &self.user_id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl OwnedRecord for Measurement {
    const COLLECTION: &'static str = collections::MEASUREMENTS;
    const ORDER_FIELD: &'static str = "date";
    // Oldest first: feeds trend charts directly
    const NEWEST_FIRST: bool = false;
    const KIND: &'static str = "Measurement";

    fn id(&self) -> &str {
        &self.id
    }
    fn user_id(&self) -> &str {
        &self.user_id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl OwnedRecord for DietEntry {
    const COLLECTION: &'static str = collections::DIET_ENTRIES;
    const ORDER_FIELD: &'static str = "date";
    const NEWEST_FIRST: bool = true;
    const KIND: &'static str = "Diet entry";

    fn id(&self) -> &str {
        &self.id
    }
    fn user_id(&self) -> &str {
        &self.user_id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl OwnedRecord for Goal {
    const COLLECTION: &'static str = collections::GOALS;
    const ORDER_FIELD: &'static str = "createdAt";
    const NEWEST_FIRST: bool = true;
    const KIND: &'static str = "Goal";

    fn id(&self) -> &str {
        &self.id
    }
    fn user_id(&self) -> &str {
        &self.user_id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}
