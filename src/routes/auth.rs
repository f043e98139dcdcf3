// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, removal_cookie, session_cookie};
use crate::models::{Role, User};
use crate::routes::api::MeResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout).post(logout))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Returned by register and login. The token is also set as a cookie.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub user: MeResponse,
    pub token: String,
}

/// Create an account and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    req.validate()?;
    let email = req.email.trim().to_lowercase();

    // Fast path; `create_user` enforces uniqueness
    if state.db.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(req.password).await?;
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email,
        password_hash: Some(password_hash),
        name: req.name.trim().to_string(),
        avatar_url: None,
        role: Role::User,
        created_at: now_rfc3339(),
    };
    state.db.create_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");
    start_session(&state, jar, &user)
}

/// Verify credentials and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    req.validate()?;
    let email = req.email.trim().to_lowercase();

    let user = state
        .db
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Accounts without a password hash cannot log in with a password.
    let stored_hash = user.password_hash.clone().ok_or(AppError::Unauthorized)?;
    if !verify_password(req.password, stored_hash).await? {
        tracing::info!(user_id = %user.id, "Login failed: wrong password");
        return Err(AppError::Unauthorized);
    }

    tracing::info!(user_id = %user.id, "User logged in");
    start_session(&state, jar, &user)
}

/// Clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.add(removal_cookie(state.config.secure_cookies()));
    (jar, StatusCode::NO_CONTENT)
}

fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let token = create_jwt(&user.id, user.role, &state.config.jwt_signing_key)?;
    let jar = jar.add(session_cookie(token.clone(), state.config.secure_cookies()));

    Ok((
        jar,
        Json(AuthResponse {
            user: MeResponse::from(user),
            token,
        }),
    ))
}

// ─── Password hashing ────────────────────────────────────────

/// Argon2id hash in PHC string form. Runs on the blocking pool.
async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?
}

/// Check `password` against a stored PHC hash.
async fn verify_password(password: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Corrupt password hash: {}", e)))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::Internal(anyhow::anyhow!(
                "Password verification failed: {}",
                e
            ))),
        }
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("correct horse".to_string()).await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong horse".to_string(), hash)
            .await
            .unwrap());
    }

    #[test]
    fn test_register_validation() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            name: String::new(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("name"));
    }
}
