// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Racing writes against the Firestore emulator.
//!
//! Friend transitions and registrations must stay consistent when two
//! requests touch the same documents at once.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use fittrack::db::EdgeWrite;
use fittrack::error::AppError;
use fittrack::models::{Friendship, FriendshipStatus, Role, User};
use fittrack::time_utils::now_rfc3339;
use serde_json::json;
use tower::ServiceExt;

mod common;

async fn create_user(state: &fittrack::AppState, prefix: &str) -> User {
    let id = format!("{prefix}-{}", common::unique_suffix());
    let user = User {
        id: id.clone(),
        email: format!("{id}@example.com"),
        password_hash: None,
        name: prefix.to_string(),
        avatar_url: None,
        role: Role::User,
        created_at: now_rfc3339(),
    };
    state.db.create_user(&user).await.unwrap();
    user
}

#[tokio::test]
async fn test_write_over_changed_edge_conflicts() {
    require_emulator!();
    let (_, state) = common::create_emulator_app().await;
    let a = create_user(&state, "edge-a").await;
    let b = create_user(&state, "edge-b").await;

    // Accept planned against a pending edge that has since been cancelled
    let mut accepted = Friendship::pending(&a.id, &b.id, &now_rfc3339());
    accepted.status = FriendshipStatus::Accepted;
    accepted.version = 2;
    let result = state
        .db
        .transition_friendship(&a.id, &b.id, |_| {
            Ok::<_, AppError>((EdgeWrite::Replace(accepted.clone()), ()))
        })
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))), "{result:?}");
    assert!(state.db.get_friendship(&a.id, &b.id).await.unwrap().is_none());

    // Request planned before the other side's request landed
    state.friends.request(&b.id, &a.email).await.unwrap();
    let result = state
        .db
        .transition_friendship(&a.id, &b.id, |_| {
            let edge = Friendship::pending(&a.id, &b.id, &now_rfc3339());
            Ok::<_, AppError>((EdgeWrite::Create(edge), ()))
        })
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))), "{result:?}");

    let edge = state.db.get_friendship(&a.id, &b.id).await.unwrap().unwrap();
    assert_eq!(edge.requester_id, b.id);
    assert_eq!(edge.status, FriendshipStatus::Pending);
}

#[tokio::test]
async fn test_accept_and_cancel_race() {
    require_emulator!();
    let (_, state) = common::create_emulator_app().await;
    let a = create_user(&state, "race-a").await;
    let b = create_user(&state, "race-b").await;
    state.friends.request(&a.id, &b.email).await.unwrap();

    let (accepted, cancelled) = tokio::join!(
        state.friends.accept(&b.id, &a.id),
        state.friends.cancel(&a.id, &b.id),
    );

    let edge = state.db.get_friendship(&a.id, &b.id).await.unwrap();
    match (accepted, cancelled) {
        (Ok(_), Err(_)) => {
            assert_eq!(edge.map(|e| e.status), Some(FriendshipStatus::Accepted));
        }
        (Err(_), Ok(())) => assert!(edge.is_none()),
        other => panic!("exactly one transition should win: {other:?}"),
    }
}

#[tokio::test]
async fn test_opposite_requests_race() {
    require_emulator!();
    let (_, state) = common::create_emulator_app().await;
    let a = create_user(&state, "opp-a").await;
    let b = create_user(&state, "opp-b").await;

    let (from_a, from_b) = tokio::join!(
        state.friends.request(&a.id, &b.email),
        state.friends.request(&b.id, &a.email),
    );

    let winner = match (from_a, from_b) {
        (Ok(edge), Err(AppError::Conflict(_))) | (Err(AppError::Conflict(_)), Ok(edge)) => edge,
        other => panic!("exactly one request should win: {other:?}"),
    };
    let stored = state.db.get_friendship(&a.id, &b.id).await.unwrap().unwrap();
    assert_eq!(stored, winner);
}

#[tokio::test]
async fn test_concurrent_registration_same_email() {
    require_emulator!();
    let (app, _) = common::create_emulator_app().await;
    let email = format!("twin-{}@example.com", common::unique_suffix());

    let register = |name: &str| {
        app.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": email, "password": "correct-horse", "name": name})
                        .to_string(),
                ))
                .unwrap(),
        )
    };

    let (first, second) = tokio::join!(register("One"), register("Two"));
    let mut statuses = vec![first.unwrap().status(), second.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);
}
