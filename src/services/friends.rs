// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Friend relationship manager.
//!
//! Each transition is planned by a pure function over the current edge
//! (`None` = no relationship). The read, the plan and the resulting write or
//! delete run in one transaction, so a transition never applies to an edge
//! that changed underneath it. The relationship lists and the leaderboard
//! are derived from the edges at read time.

use chrono::{DateTime, Duration, Utc};
use futures_util::future::try_join_all;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::{EdgeWrite, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{
    DietEntry, Friendship, FriendshipStatus, Measurement, PublicProfile, Relationships, Workout,
};
use crate::time_utils::{now_rfc3339, parse_client_date};

/// Number of records returned by the friend progress view.
pub const PROGRESS_LIMIT: u32 = 10;

/// Ways a friend action can be refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FriendError {
    #[error("No user with that email")]
    UserNotFound,

    #[error("You cannot send a friend request to yourself")]
    SelfReferential,

    #[error("Already friends")]
    AlreadyFriends,

    #[error("Friend request already sent")]
    AlreadyRequested,

    #[error("This user has already sent you a request; accept it instead")]
    IncomingRequestPending,

    #[error("No pending friend request")]
    RequestNotFound,

    #[error("Not friends with this user")]
    NotFriends,

    #[error("Only friends can view progress")]
    NotPermitted,
}

impl From<FriendError> for AppError {
    fn from(err: FriendError) -> Self {
        let msg = err.to_string();
        match err {
            FriendError::UserNotFound | FriendError::RequestNotFound | FriendError::NotFriends => {
                AppError::NotFound(msg)
            }
            FriendError::SelfReferential => AppError::BadRequest(msg),
            FriendError::AlreadyFriends
            | FriendError::AlreadyRequested
            | FriendError::IncomingRequestPending => AppError::Conflict(msg),
            FriendError::NotPermitted => AppError::Forbidden(msg),
        }
    }
}

// ─── Transition planning ─────────────────────────────────────────

/// New pending edge for `requester_id` → `recipient_id`.
pub fn plan_request(
    requester_id: &str,
    recipient_id: &str,
    existing: Option<&Friendship>,
    now: &str,
) -> std::result::Result<Friendship, FriendError> {
    if requester_id == recipient_id {
        return Err(FriendError::SelfReferential);
    }

    match existing {
        None => Ok(Friendship::pending(requester_id, recipient_id, now)),
        Some(edge) if edge.is_accepted() => Err(FriendError::AlreadyFriends),
        Some(edge) if edge.requester_id == requester_id => Err(FriendError::AlreadyRequested),
        Some(_) => Err(FriendError::IncomingRequestPending),
    }
}

/// `self_id` accepts the request sent by `requester_id`.
pub fn plan_accept(
    self_id: &str,
    requester_id: &str,
    existing: Option<&Friendship>,
    now: &str,
) -> std::result::Result<Friendship, FriendError> {
    let edge = pending_from(existing, requester_id, self_id)?;

    let mut accepted = edge.clone();
    accepted.status = FriendshipStatus::Accepted;
    accepted.version += 1;
    accepted.updated_at = now.to_string();
    Ok(accepted)
}

/// `self_id` declines the request sent by `requester_id`. Returns the edge to delete.
pub fn plan_decline(
    self_id: &str,
    requester_id: &str,
    existing: Option<&Friendship>,
) -> std::result::Result<String, FriendError> {
    pending_from(existing, requester_id, self_id).map(|edge| edge.id.clone())
}

/// `self_id` withdraws their request to `recipient_id`. Returns the edge to delete.
pub fn plan_cancel(
    self_id: &str,
    recipient_id: &str,
    existing: Option<&Friendship>,
) -> std::result::Result<String, FriendError> {
    pending_from(existing, self_id, recipient_id).map(|edge| edge.id.clone())
}

/// Unfriend. Returns the accepted edge to delete.
pub fn plan_remove(existing: Option<&Friendship>) -> std::result::Result<String, FriendError> {
    match existing {
        Some(edge) if edge.is_accepted() => Ok(edge.id.clone()),
        _ => Err(FriendError::NotFriends),
    }
}

/// Require an accepted edge (progress view access check).
pub fn ensure_friends(existing: Option<&Friendship>) -> std::result::Result<(), FriendError> {
    match existing {
        Some(edge) if edge.is_accepted() => Ok(()),
        _ => Err(FriendError::NotPermitted),
    }
}

fn pending_from<'a>(
    existing: Option<&'a Friendship>,
    requester_id: &str,
    recipient_id: &str,
) -> std::result::Result<&'a Friendship, FriendError> {
    existing
        .filter(|edge| {
            edge.status == FriendshipStatus::Pending
                && edge.requester_id == requester_id
                && edge.recipient_id() == recipient_id
        })
        .ok_or(FriendError::RequestNotFound)
}

// ─── Views ───────────────────────────────────────────────────────

/// Relationship lists resolved to public profiles.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct FriendsView {
    pub friends: Vec<PublicProfile>,
    pub requests_received: Vec<PublicProfile>,
    pub requests_sent: Vec<PublicProfile>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user: PublicProfile,
    pub total_workouts: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_calories: u64,
    /// Workouts in the trailing 7 days
    pub workouts_this_week: u32,
    pub is_self: bool,
}

/// Rank members by total workout count, descending. Ties keep input order.
pub fn build_leaderboard(
    self_id: &str,
    members: Vec<(PublicProfile, Vec<Workout>)>,
    now: DateTime<Utc>,
) -> Vec<LeaderboardEntry> {
    let week_start = now - Duration::days(7);

    let mut entries: Vec<LeaderboardEntry> = members
        .into_iter()
        .map(|(user, workouts)| {
            let workouts_this_week = workouts
                .iter()
                .filter_map(|w| parse_client_date(&w.date))
                .filter(|d| *d >= week_start && *d <= now)
                .count() as u32;

            LeaderboardEntry {
                is_self: user.id == self_id,
                total_workouts: workouts.len() as u32,
                total_calories: workouts.iter().map(|w| u64::from(w.calories_burned)).sum(),
                workouts_this_week,
                user,
            }
        })
        .collect();

    // sort_by is stable
    entries.sort_by(|a, b| b.total_workouts.cmp(&a.total_workouts));
    entries
}

/// A friend's recent activity, newest first.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct FriendProgress {
    pub friend: PublicProfile,
    pub workouts: Vec<Workout>,
    pub measurements: Vec<Measurement>,
    pub diet_entries: Vec<DietEntry>,
}

// ─── Service ─────────────────────────────────────────────────────

/// Applies friend actions against the store.
#[derive(Clone)]
pub struct FriendService {
    db: FirestoreDb,
}

impl FriendService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Send a request to the user registered under `recipient_email`.
    pub async fn request(&self, requester_id: &str, recipient_email: &str) -> Result<Friendship> {
        let recipient = self
            .db
            .find_user_by_email(recipient_email)
            .await?
            .ok_or(FriendError::UserNotFound)?;

        let now = now_rfc3339();
        let edge = self
            .db
            .transition_friendship(requester_id, &recipient.id, |existing| {
                plan_request(requester_id, &recipient.id, existing, &now)
                    .map(|edge| (EdgeWrite::Create(edge.clone()), edge))
            })
            .await?;

        tracing::info!(
            requester_id,
            recipient_id = %recipient.id,
            "Friend request sent"
        );
        Ok(edge)
    }

    pub async fn accept(&self, self_id: &str, requester_id: &str) -> Result<Friendship> {
        let now = now_rfc3339();
        let edge = self
            .db
            .transition_friendship(self_id, requester_id, |existing| {
                plan_accept(self_id, requester_id, existing, &now)
                    .map(|edge| (EdgeWrite::Replace(edge.clone()), edge))
            })
            .await?;

        tracing::info!(self_id, requester_id, version = edge.version, "Friend request accepted");
        Ok(edge)
    }

    pub async fn decline(&self, self_id: &str, requester_id: &str) -> Result<()> {
        self.db
            .transition_friendship(self_id, requester_id, |existing| {
                plan_decline(self_id, requester_id, existing)
                    .map(|id| (EdgeWrite::Delete(id), ()))
            })
            .await?;

        tracing::info!(self_id, requester_id, "Friend request declined");
        Ok(())
    }

    pub async fn cancel(&self, self_id: &str, recipient_id: &str) -> Result<()> {
        self.db
            .transition_friendship(self_id, recipient_id, |existing| {
                plan_cancel(self_id, recipient_id, existing)
                    .map(|id| (EdgeWrite::Delete(id), ()))
            })
            .await?;

        tracing::info!(self_id, recipient_id, "Friend request cancelled");
        Ok(())
    }

    pub async fn remove(&self, self_id: &str, friend_id: &str) -> Result<()> {
        self.db
            .transition_friendship(self_id, friend_id, |existing| {
                plan_remove(existing).map(|id| (EdgeWrite::Delete(id), ()))
            })
            .await?;

        tracing::info!(self_id, friend_id, "Friend removed");
        Ok(())
    }

    /// Relationship lists for `self_id`.
    pub async fn relationships(&self, self_id: &str) -> Result<Relationships> {
        let edges = self.db.list_friendships(self_id).await?;
        Ok(Relationships::for_user(self_id, &edges))
    }

    /// Relationship lists with each id resolved to a public profile.
    ///
    /// Ids whose user no longer exists are dropped.
    pub async fn list_view(&self, self_id: &str) -> Result<FriendsView> {
        let lists = self.relationships(self_id).await?;

        let (friends, requests_received, requests_sent) = tokio::try_join!(
            self.resolve_profiles(&lists.friends),
            self.resolve_profiles(&lists.friend_requests_received),
            self.resolve_profiles(&lists.friend_requests_sent),
        )?;

        Ok(FriendsView {
            friends,
            requests_received,
            requests_sent,
        })
    }

    async fn resolve_profiles(&self, ids: &[String]) -> Result<Vec<PublicProfile>> {
        let users = try_join_all(ids.iter().map(|id| self.db.get_user(id))).await?;
        Ok(users
            .into_iter()
            .flatten()
            .map(|u| u.public_profile())
            .collect())
    }

    /// Leaderboard over `self_id` and their confirmed friends.
    pub async fn leaderboard(&self, self_id: &str) -> Result<Vec<LeaderboardEntry>> {
        let lists = self.relationships(self_id).await?;

        let mut member_ids = Vec::with_capacity(lists.friends.len() + 1);
        member_ids.push(self_id.to_string());
        member_ids.extend(lists.friends);

        let members = try_join_all(member_ids.iter().map(|id| async move {
            let user = self.db.get_user(id).await?;
            let workouts: Vec<Workout> = self.db.list_records(id).await?;
            Ok::<_, AppError>(user.map(|u| (u.public_profile(), workouts)))
        }))
        .await?;

        let members: Vec<_> = members.into_iter().flatten().collect();
        tracing::debug!(self_id, members = members.len(), "Built leaderboard");
        Ok(build_leaderboard(self_id, members, Utc::now()))
    }

    /// A confirmed friend's most recent workouts, measurements and diet entries.
    pub async fn friend_progress(&self, self_id: &str, friend_id: &str) -> Result<FriendProgress> {
        let existing = self.db.get_friendship(self_id, friend_id).await?;
        ensure_friends(existing.as_ref())?;

        let friend = self
            .db
            .get_user(friend_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let (workouts, measurements, diet_entries) = tokio::try_join!(
            self.db.list_recent_records::<Workout>(friend_id, PROGRESS_LIMIT),
            self.db.list_recent_records::<Measurement>(friend_id, PROGRESS_LIMIT),
            self.db.list_recent_records::<DietEntry>(friend_id, PROGRESS_LIMIT),
        )?;

        Ok(FriendProgress {
            friend: friend.public_profile(),
            workouts,
            measurements,
            diet_entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutType;

    const NOW: &str = "2024-06-01T12:00:00Z";

    fn profile(id: &str) -> PublicProfile {
        PublicProfile {
            id: id.to_string(),
            name: id.to_uppercase(),
            email: format!("{id}@example.com"),
            avatar_url: None,
        }
    }

    fn workouts(count: usize, date: &str) -> Vec<Workout> {
        (0..count)
            .map(|i| Workout {
                id: format!("w{i}"),
                user_id: "x".to_string(),
                name: "Run".to_string(),
                workout_type: WorkoutType::Cardio,
                duration: 30,
                calories_burned: 100,
                date: date.to_string(),
                exercises: vec![],
                created_at: date.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_request_then_accept() {
        let edge = plan_request("alice", "bob", None, NOW).unwrap();
        let alice = Relationships::for_user("alice", std::slice::from_ref(&edge));
        let bob = Relationships::for_user("bob", std::slice::from_ref(&edge));
        assert_eq!(alice.friend_requests_sent, vec!["bob"]);
        assert_eq!(bob.friend_requests_received, vec!["alice"]);
        assert!(alice.friends.is_empty() && bob.friends.is_empty());

        let accepted = plan_accept("bob", "alice", Some(&edge), NOW).unwrap();
        assert_eq!(accepted.version, 2);
        let alice = Relationships::for_user("alice", std::slice::from_ref(&accepted));
        let bob = Relationships::for_user("bob", std::slice::from_ref(&accepted));
        assert_eq!(alice.friends, vec!["bob"]);
        assert_eq!(bob.friends, vec!["alice"]);
        assert!(alice.friend_requests_sent.is_empty());
        assert!(bob.friend_requests_received.is_empty());
    }

    #[test]
    fn test_request_guards() {
        assert_eq!(
            plan_request("alice", "alice", None, NOW),
            Err(FriendError::SelfReferential)
        );

        let pending = Friendship::pending("alice", "bob", NOW);
        assert_eq!(
            plan_request("alice", "bob", Some(&pending), NOW),
            Err(FriendError::AlreadyRequested)
        );
        assert_eq!(
            plan_request("bob", "alice", Some(&pending), NOW),
            Err(FriendError::IncomingRequestPending)
        );

        let accepted = plan_accept("bob", "alice", Some(&pending), NOW).unwrap();
        assert_eq!(
            plan_request("bob", "alice", Some(&accepted), NOW),
            Err(FriendError::AlreadyFriends)
        );
    }

    #[test]
    fn test_requester_cannot_accept_own_request() {
        let pending = Friendship::pending("alice", "bob", NOW);
        assert_eq!(
            plan_accept("alice", "bob", Some(&pending), NOW),
            Err(FriendError::RequestNotFound)
        );
        assert_eq!(
            plan_accept("bob", "alice", None, NOW),
            Err(FriendError::RequestNotFound)
        );
    }

    #[test]
    fn test_decline_and_cancel_sides() {
        let pending = Friendship::pending("alice", "bob", NOW);
        assert_eq!(
            plan_decline("bob", "alice", Some(&pending)),
            Ok("alice_bob".to_string())
        );
        assert_eq!(
            plan_decline("alice", "bob", Some(&pending)),
            Err(FriendError::RequestNotFound)
        );
        assert_eq!(
            plan_cancel("alice", "bob", Some(&pending)),
            Ok("alice_bob".to_string())
        );
        assert_eq!(
            plan_cancel("bob", "alice", Some(&pending)),
            Err(FriendError::RequestNotFound)
        );
    }

    #[test]
    fn test_second_remove_is_not_found() {
        let pending = Friendship::pending("alice", "bob", NOW);
        let accepted = plan_accept("bob", "alice", Some(&pending), NOW).unwrap();
        assert_eq!(plan_remove(Some(&accepted)), Ok("alice_bob".to_string()));

        // Edge deleted by the first removal.
        assert_eq!(plan_remove(None), Err(FriendError::NotFriends));
        assert_eq!(plan_remove(Some(&pending)), Err(FriendError::NotFriends));
    }

    #[test]
    fn test_progress_requires_friendship() {
        let pending = Friendship::pending("alice", "bob", NOW);
        assert_eq!(ensure_friends(Some(&pending)), Err(FriendError::NotPermitted));
        assert_eq!(ensure_friends(None), Err(FriendError::NotPermitted));
        let accepted = plan_accept("bob", "alice", Some(&pending), NOW).unwrap();
        assert!(ensure_friends(Some(&accepted)).is_ok());
    }

    #[test]
    fn test_error_status_mapping() {
        assert!(matches!(
            AppError::from(FriendError::NotPermitted),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            AppError::from(FriendError::NotFriends),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(FriendError::AlreadyRequested),
            AppError::Conflict(_)
        ));
    }

    #[test]
    fn test_leaderboard_orders_by_workout_count() {
        let now = parse_client_date(NOW).unwrap();
        let date = "2024-05-30T08:00:00Z";
        let board = build_leaderboard(
            "me",
            vec![
                (profile("me"), workouts(5, date)),
                (profile("a"), workouts(3, date)),
                (profile("b"), workouts(8, date)),
            ],
            now,
        );

        let counts: Vec<u32> = board.iter().map(|e| e.total_workouts).collect();
        assert_eq!(counts, vec![8, 5, 3]);
        assert!(board[1].is_self);
        assert_eq!(board[0].total_calories, 800);
        assert_eq!(board[0].workouts_this_week, 8);
    }

    #[test]
    fn test_leaderboard_ties_keep_input_order() {
        let now = parse_client_date(NOW).unwrap();
        let date = "2024-01-01T08:00:00Z";
        let board = build_leaderboard(
            "me",
            vec![
                (profile("me"), workouts(2, date)),
                (profile("a"), workouts(2, date)),
                (profile("b"), workouts(2, date)),
            ],
            now,
        );

        let ids: Vec<&str> = board.iter().map(|e| e.user.id.as_str()).collect();
        assert_eq!(ids, vec!["me", "a", "b"]);
        assert_eq!(board[0].workouts_this_week, 0);
    }
}
