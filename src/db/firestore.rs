// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users and profiles
//! - Owned records (workouts, templates, measurements, diet, goals)
//! - Friendship edges

use crate::db::{collections, OwnedRecord};
use crate::error::AppError;
use crate::models::{
    DietEntry, Friendship, Goal, Measurement, Profile, User, Workout, WorkoutTemplate,
};
use firestore::errors::FirestoreError;
use firestore::{FirestoreConsistencySelector, FirestoreQueryDirection, FirestoreWritePrecondition};
use serde::{Deserialize, Serialize};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Change to a friendship edge, committed only if the edge is still as read.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeWrite {
    /// Create the edge; fails if one exists
    Create(Friendship),
    /// Overwrite the existing edge
    Replace(Friendship),
    /// Delete the existing edge by id
    Delete(String),
}

/// Claims an email for one user; created together with the user document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailReservation {
    user_id: String,
}

/// Document id for an email reservation.
///
/// Emails are compared lower-cased. `/` is not allowed in document ids.
pub fn email_key(email: &str) -> String {
    email
        .trim()
        .to_lowercase()
        .replace('%', "%25")
        .replace('/', "%2F")
}

/// Map a failed commit: contention and failed preconditions become a conflict.
fn commit_error(err: FirestoreError, conflict: &str) -> AppError {
    match err {
        FirestoreError::DataConflictError(_) | FirestoreError::DataNotFoundError(_) => {
            AppError::Conflict(conflict.to_string())
        }
        FirestoreError::DatabaseError(ref db_err)
            if db_err.retry_possible || db_err.public.code == "FailedPrecondition" =>
        {
            AppError::Conflict(conflict.to_string())
        }
        other => AppError::Database(format!("Failed to commit transaction: {}", other)),
    }
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by (lower-cased) email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.trim().to_lowercase();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.field("email").eq(email.as_str()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.into_iter().next())
    }

    /// Create a user and reserve their email in one transaction.
    ///
    /// Fails with `Conflict` if the email is already reserved, so two
    /// registrations racing for one address cannot both succeed.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let client = self.get_client()?;
        let reservation = EmailReservation {
            user_id: user.id.clone(),
        };

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::EMAILS)
            .precondition(FirestoreWritePrecondition::Exists(false))
            .document_id(email_key(&user.email))
            .object(&reservation)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(e.to_string()))?;

        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .precondition(FirestoreWritePrecondition::Exists(false))
            .document_id(&user.id)
            .object(user)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(e.to_string()))?;

        transaction
            .commit()
            .await
            .map_err(|e| commit_error(e, "Email already registered"))?;
        Ok(())
    }

    /// All users, newest first (admin view).
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .order_by([("createdAt", FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Profile Operations ──────────────────────────────────────

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .document_id(&profile.user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Owned Record Operations ─────────────────────────────────

    /// List a user's records in the type's default order.
    pub async fn list_records<T: OwnedRecord>(&self, user_id: &str) -> Result<Vec<T>, AppError> {
        self.query_records(user_id, T::NEWEST_FIRST, None).await
    }

    /// The `limit` most recent records of a user.
    pub async fn list_recent_records<T: OwnedRecord>(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<T>, AppError> {
        self.query_records(user_id, true, Some(limit)).await
    }

    async fn query_records<T: OwnedRecord>(
        &self,
        user_id: &str,
        newest_first: bool,
        limit: Option<u32>,
    ) -> Result<Vec<T>, AppError> {
        let direction = if newest_first {
            FirestoreQueryDirection::Descending
        } else {
            FirestoreQueryDirection::Ascending
        };

        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(T::COLLECTION)
            .filter(|q| q.field("userId").eq(user_id))
            .order_by([(T::ORDER_FIELD, direction)]);

        let query = if let Some(limit) = limit {
            query.limit(limit)
        } else {
            query
        };

        query
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a record by id, scoped to its owner.
    ///
    /// Returns `None` both when the document is missing and when it belongs
    /// to someone else, so ids of other users' records are not disclosed.
    pub async fn get_record<T: OwnedRecord>(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<T>, AppError> {
        let record: Option<T> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(T::COLLECTION)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(record.filter(|r| r.user_id() == user_id))
    }

    /// Create or replace a record.
    pub async fn put_record<T: OwnedRecord>(&self, record: &T) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(T::COLLECTION)
            .document_id(record.id())
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a record owned by `user_id`. Returns `false` if there was nothing to delete.
    pub async fn delete_record<T: OwnedRecord>(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        if self.get_record::<T>(id, user_id).await?.is_none() {
            return Ok(false);
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(T::COLLECTION)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
    }

    /// Every record of a type across all users (admin aggregates).
    pub async fn list_all_records<T: OwnedRecord>(&self) -> Result<Vec<T>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(T::COLLECTION)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Friendship Operations ───────────────────────────────────

    /// Get the edge for the unordered pair `{a, b}`.
    pub async fn get_friendship(&self, a: &str, b: &str) -> Result<Option<Friendship>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FRIENDSHIPS)
            .obj()
            .one(&Friendship::key(a, b))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All edges involving `user_id`.
    pub async fn list_friendships(&self, user_id: &str) -> Result<Vec<Friendship>, AppError> {
        let client = self.get_client()?;

        let as_low: Vec<Friendship> = client
            .fluent()
            .select()
            .from(collections::FRIENDSHIPS)
            .filter(|q| q.field("userLow").eq(user_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let as_high: Vec<Friendship> = client
            .fluent()
            .select()
            .from(collections::FRIENDSHIPS)
            .filter(|q| q.field("userHigh").eq(user_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut edges = as_low;
        edges.extend(as_high);
        edges.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(edges)
    }

    /// Read the edge for `{a, b}`, plan a change from it and commit the
    /// change, all in one transaction.
    ///
    /// `plan` sees the edge as read (`None` = no relationship). A planning
    /// error rolls the transaction back and is returned as is. If the edge
    /// changed after the read, the commit fails and `Conflict` is returned.
    pub async fn transition_friendship<T, E, F>(
        &self,
        a: &str,
        b: &str,
        plan: F,
    ) -> Result<T, AppError>
    where
        F: FnOnce(Option<&Friendship>) -> Result<(EdgeWrite, T), E>,
        AppError: From<E>,
    {
        let client = self.get_client()?;
        let key = Friendship::key(a, b);

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;
        let reader = client.clone_with_consistency_selector(
            FirestoreConsistencySelector::Transaction(transaction.transaction_id().clone()),
        );

        let read: Result<Option<Friendship>, FirestoreError> = reader
            .fluent()
            .select()
            .by_id_in(collections::FRIENDSHIPS)
            .obj()
            .one(&key)
            .await;
        let planned = match read {
            Ok(existing) => plan(existing.as_ref()).map_err(AppError::from),
            Err(e) => Err(AppError::Database(e.to_string())),
        };
        let (write, outcome) = match planned {
            Ok(planned) => planned,
            Err(err) => {
                if let Err(e) = transaction.rollback().await {
                    tracing::warn!(edge_id = %key, error = %e, "Failed to roll back transaction");
                }
                return Err(err);
            }
        };

        let staged = match &write {
            EdgeWrite::Create(edge) | EdgeWrite::Replace(edge) => client
                .fluent()
                .update()
                .in_col(collections::FRIENDSHIPS)
                .precondition(FirestoreWritePrecondition::Exists(matches!(
                    &write,
                    EdgeWrite::Replace(_)
                )))
                .document_id(&edge.id)
                .object(edge)
                .add_to_transaction(&mut transaction)
                .map(|_| ()),
            EdgeWrite::Delete(edge_id) => client
                .fluent()
                .delete()
                .from(collections::FRIENDSHIPS)
                .precondition(FirestoreWritePrecondition::Exists(true))
                .document_id(edge_id)
                .add_to_transaction(&mut transaction)
                .map(|_| ()),
        };
        staged.map_err(|e| AppError::Database(e.to_string()))?;

        transaction
            .commit()
            .await
            .map_err(|e| commit_error(e, "Friendship changed concurrently; try again"))?;

        tracing::debug!(edge_id = %key, write = ?write, "Friendship transition committed");
        Ok(outcome)
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete(&self, collection: &str, ids: &[String]) -> Result<(), AppError> {
        let client = self.get_client()?;

        for chunk in ids.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for doc_id in chunk {
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    async fn delete_owned<T: OwnedRecord>(&self, user_id: &str) -> Result<usize, AppError> {
        let records: Vec<T> = self.list_records(user_id).await?;
        let ids: Vec<String> = records.iter().map(|r| r.id().to_string()).collect();
        self.batch_delete(T::COLLECTION, &ids).await?;
        tracing::debug!(user_id, collection = T::COLLECTION, count = ids.len(), "Deleted records");
        Ok(ids.len())
    }

    // ─── Account Deletion ─────────────────────────────────────────

    /// Delete a user and everything they own.
    ///
    /// Removes workouts, templates, measurements, diet entries, goals, the
    /// profile, every friendship edge involving the user, and finally the
    /// user document together with its email reservation. Returns the number
    /// of documents deleted, not counting the reservation.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let email = self.get_user(user_id).await?.map(|u| u.email);
        let mut deleted_count = 0;

        deleted_count += self.delete_owned::<Workout>(user_id).await?;
        deleted_count += self.delete_owned::<WorkoutTemplate>(user_id).await?;
        deleted_count += self.delete_owned::<Measurement>(user_id).await?;
        deleted_count += self.delete_owned::<DietEntry>(user_id).await?;
        deleted_count += self.delete_owned::<Goal>(user_id).await?;

        let edges = self.list_friendships(user_id).await?;
        let edge_ids: Vec<String> = edges.into_iter().map(|e| e.id).collect();
        self.batch_delete(collections::FRIENDSHIPS, &edge_ids).await?;
        deleted_count += edge_ids.len();
        tracing::debug!(user_id, count = edge_ids.len(), "Deleted friendship edges");

        self.batch_delete(
            collections::PROFILES,
            std::slice::from_ref(&user_id.to_string()),
        )
        .await?;
        self.batch_delete(collections::USERS, std::slice::from_ref(&user_id.to_string()))
            .await?;
        deleted_count += 2;

        if let Some(email) = email {
            self.batch_delete(collections::EMAILS, &[email_key(&email)])
                .await?;
        }

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_key_normalizes_and_escapes() {
        assert_eq!(email_key(" Ann@Example.COM "), "ann@example.com");
        assert_eq!(email_key("a/b%c@example.com"), "a%2Fb%25c@example.com");
        assert_ne!(email_key("a/b@x.io"), email_key("a%2Fb@x.io"));
    }
}
