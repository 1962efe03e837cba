// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides an in-memory database, the full admin router and fixture inserts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life
#![allow(
    dead_code,
    clippy::wildcard_in_or_patterns,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]
//! Shared test utilities for `fluent_admin_api`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::sync::{Arc, Once};

use anyhow::Result;
use axum::Router;
use fluent_admin_api::{
    config::{AuthConfig, AuthMode, ServerConfig},
    database::Database,
    routes::build_router,
};
use serde_json::Value;
use uuid::Uuid;

/// Token accepted by routers built with [`test_config`]
pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

/// HS256 secret for JWT-mode routers
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level, default is quiet
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Arc::new(Database::new("sqlite::memory:").await?);
    Ok(database)
}

/// Server configuration using static token auth
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: "sqlite::memory:".to_owned(),
        auth: AuthConfig {
            mode: AuthMode::Static,
            static_token: TEST_ADMIN_TOKEN.to_owned(),
            jwt_secret: None,
        },
        ..ServerConfig::default()
    }
}

/// Server configuration using JWT auth
pub fn test_jwt_config() -> ServerConfig {
    ServerConfig {
        auth: AuthConfig {
            mode: AuthMode::Jwt,
            static_token: String::new(),
            jwt_secret: Some(TEST_JWT_SECRET.to_owned()),
        },
        ..test_config()
    }
}

/// Full application router over a fresh database
pub async fn create_test_router() -> Result<(Router, Arc<Database>)> {
    create_test_router_with(&test_config()).await
}

/// Full application router over a fresh database with a custom configuration
pub async fn create_test_router_with(config: &ServerConfig) -> Result<(Router, Arc<Database>)> {
    let database = create_test_database().await?;
    let router = build_router(database.clone(), config)?;
    Ok((router, database))
}

/// `Authorization` header value for the static test token
pub fn auth_header() -> String {
    format!("Bearer {TEST_ADMIN_TOKEN}")
}

/// Insert an app user and return its id
pub async fn insert_user(database: &Database, username: &str, role: &str) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO users (id, username, role) VALUES (?1, ?2, ?3)")
        .bind(&id)
        .bind(username)
        .bind(role)
        .execute(database.pool())
        .await?;
    Ok(id)
}

/// Insert a training record with the given type and JSON payload
pub async fn insert_training_record(
    database: &Database,
    user_id: &str,
    record_type: &str,
    data: &Value,
    created_at: &str,
) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r"
        INSERT INTO training_records (id, user_id, type, data, duration, created_at)
        VALUES (?1, ?2, ?3, ?4, 120, ?5)
        ",
    )
    .bind(&id)
    .bind(user_id)
    .bind(record_type)
    .bind(data.to_string())
    .bind(created_at)
    .execute(database.pool())
    .await?;
    Ok(id)
}

/// Insert a community post with an optional attachment
pub async fn insert_post(
    database: &Database,
    user_id: &str,
    content: &str,
    image: Option<&str>,
    created_at: &str,
) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO posts (id, user_id, content, image, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(content)
    .bind(image)
    .bind(created_at)
    .execute(database.pool())
    .await?;
    Ok(id)
}
