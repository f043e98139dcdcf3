// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use fittrack::config::Config;
use fittrack::db::FirestoreDb;
use fittrack::middleware::auth::create_jwt;
use fittrack::models::Role;
use fittrack::routes::create_router;
use fittrack::services::AiGateway;
use fittrack::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

fn build_app(db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::default(), db, AiGateway::offline()));
    (create_router(state.clone()), state)
}

/// Create a test app with an offline store and no completion provider.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    build_app(FirestoreDb::new_mock())
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    build_app(test_db().await)
}

/// Session token for `user_id` signed with the test key.
#[allow(dead_code)]
pub fn token_for(state: &AppState, user_id: &str, role: Role) -> String {
    create_jwt(user_id, role, &state.config.jwt_signing_key).unwrap()
}

/// Unique id suffix for test isolation.
#[allow(dead_code)]
pub fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Authenticated JSON request.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Authenticated request without a body.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON; an empty body reads as `null`.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
