// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Friend routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Friendship;
use crate::services::friends::{FriendProgress, FriendsView, LeaderboardEntry};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/friends", get(list_friends))
        .route("/api/friends/request", post(send_request))
        .route("/api/friends/requests/{id}/accept", post(accept_request))
        .route("/api/friends/requests/{id}/decline", post(decline_request))
        .route("/api/friends/cancel/{id}", delete(cancel_request))
        .route("/api/friends/remove/{id}", delete(remove_friend))
        .route("/api/friends/leaderboard", get(leaderboard))
        .route("/api/friends/{id}/progress", get(friend_progress))
}

#[derive(Debug, Deserialize, Validate)]
pub struct FriendRequestBody {
    #[validate(email)]
    pub email: String,
}

/// State of the relationship after a write.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub user_id: String,
    pub status: String,
}

impl FriendshipResponse {
    fn from_edge(self_id: &str, edge: &Friendship) -> Self {
        Self {
            user_id: edge.other(self_id).unwrap_or_default().to_string(),
            status: if edge.is_accepted() {
                "accepted".to_string()
            } else {
                "pending".to_string()
            },
        }
    }
}

async fn list_friends(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<FriendsView>> {
    Ok(Json(state.friends.list_view(&user.user_id).await?))
}

async fn send_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<FriendRequestBody>,
) -> Result<(StatusCode, Json<FriendshipResponse>)> {
    body.validate()?;
    let email = body.email.trim().to_lowercase();
    let edge = state.friends.request(&user.user_id, &email).await?;
    Ok((
        StatusCode::CREATED,
        Json(FriendshipResponse::from_edge(&user.user_id, &edge)),
    ))
}

async fn accept_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(requester_id): Path<String>,
) -> Result<Json<FriendshipResponse>> {
    let edge = state.friends.accept(&user.user_id, &requester_id).await?;
    Ok(Json(FriendshipResponse::from_edge(&user.user_id, &edge)))
}

async fn decline_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(requester_id): Path<String>,
) -> Result<StatusCode> {
    state.friends.decline(&user.user_id, &requester_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn cancel_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(recipient_id): Path<String>,
) -> Result<StatusCode> {
    state.friends.cancel(&user.user_id, &recipient_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_friend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(friend_id): Path<String>,
) -> Result<StatusCode> {
    state.friends.remove(&user.user_id, &friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
    Ok(Json(state.friends.leaderboard(&user.user_id).await?))
}

async fn friend_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(friend_id): Path<String>,
) -> Result<Json<FriendProgress>> {
    Ok(Json(
        state
            .friends
            .friend_progress(&user.user_id, &friend_id)
            .await?,
    ))
}
