// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FitTrack: personal fitness tracking backend
//!
//! This crate provides the REST API for logging workouts, body measurements
//! and meals, tracking goals, connecting with friends, and generating
//! AI-assisted suggestions with deterministic local fallbacks.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{AiGateway, FriendService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub friends: FriendService,
    pub ai: AiGateway,
}

impl AppState {
    pub fn new(config: Config, db: FirestoreDb, ai: AiGateway) -> Self {
        Self {
            friends: FriendService::new(db.clone()),
            config,
            db,
            ai,
        }
    }
}
