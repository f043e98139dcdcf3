// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use fittrack::middleware::auth::SESSION_COOKIE;
use fittrack::models::Role;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_cookie_authenticates() {
    let (app, state) = common::create_test_app();
    let token = common::token_for(&state, "u1", Role::User);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/catalog")
                .header(header::COOKIE, format!("{SESSION_COOKIE}={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cookie_preferred_over_header() {
    let (app, state) = common::create_test_app();
    let token = common::token_for(&state, "u1", Role::User);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/catalog")
                .header(header::COOKIE, format!("{SESSION_COOKIE}=garbage"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // A present cookie is authoritative even when invalid.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    for method in ["GET", "POST"] {
        let (app, _) = common::create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/auth/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("logout sets a cookie")
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=;")));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        // Local frontend is plain http
        assert!(!cookie.contains("Secure"));
    }
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let (app, state) = common::create_test_app();
    let token = common::token_for(&state, "u1", Role::User);

    let response = app
        .oneshot(common::empty_request("GET", "/api/catalog", &token))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
}
