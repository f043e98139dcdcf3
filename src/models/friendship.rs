// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Friend relationship edge.
//!
//! A relationship between two users is a single document keyed by the
//! unordered pair, so every transition is one atomic write (or delete).
//! No document means "no relationship".

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Status of an existing edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    /// `requester_id` asked the other member
    Pending,
    /// Symmetric, confirmed friendship
    Accepted,
}

/// Stored at `friendships/{low}_{high}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    pub id: String,
    /// Lexically smaller member id
    pub user_low: String,
    /// Lexically larger member id
    pub user_high: String,
    pub requester_id: String,
    pub status: FriendshipStatus,
    /// Incremented on every write
    pub version: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl Friendship {
    /// Document ID for the unordered pair `{a, b}`.
    pub fn key(a: &str, b: &str) -> String {
        let (low, high) = ordered(a, b);
        format!("{}_{}", low, high)
    }

    /// A fresh pending request from `requester_id` to `recipient_id`.
    pub fn pending(requester_id: &str, recipient_id: &str, now: &str) -> Self {
        let (low, high) = ordered(requester_id, recipient_id);
        Self {
            id: Self::key(requester_id, recipient_id),
            user_low: low.to_string(),
            user_high: high.to_string(),
            requester_id: requester_id.to_string(),
            status: FriendshipStatus::Pending,
            version: 1,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.user_low == user_id || self.user_high == user_id
    }

    /// The member that is not `user_id`.
    pub fn other(&self, user_id: &str) -> Option<&str> {
        if self.user_low == user_id {
            Some(&self.user_high)
        } else if self.user_high == user_id {
            Some(&self.user_low)
        } else {
            None
        }
    }

    /// The member that did not send the request.
    pub fn recipient_id(&self) -> &str {
        if self.requester_id == self.user_low {
            &self.user_high
        } else {
            &self.user_low
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == FriendshipStatus::Accepted
    }
}

fn ordered<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// One user's relationship lists, derived from the edges that involve them.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Relationships {
    pub friends: Vec<String>,
    pub friend_requests_sent: Vec<String>,
    pub friend_requests_received: Vec<String>,
}

impl Relationships {
    /// Derive the three lists for `user_id`. Edges not involving the user are ignored.
    pub fn for_user(user_id: &str, edges: &[Friendship]) -> Self {
        let mut view = Self::default();
        for edge in edges {
            let Some(other) = edge.other(user_id) else {
                continue;
            };
            let other = other.to_string();
            match edge.status {
                FriendshipStatus::Accepted => view.friends.push(other),
                FriendshipStatus::Pending if edge.requester_id == user_id => {
                    view.friend_requests_sent.push(other)
                }
                FriendshipStatus::Pending => view.friend_requests_received.push(other),
            }
        }
        view
    }
}
