// ABOUTME: Main library entry point for the Fluent Life admin back office
// ABOUTME: HTTP API for roles, menus, exposure training content, voices, AI personas and videos
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

#![deny(unsafe_code)]

//! # Fluent Admin API
//!
//! Administrative back-office HTTP API for the Fluent Life speech fluency
//! app. Operators use it to manage:
//!
//! - roles with permission flags and the two-level navigation menu
//! - exposure training modules and their ordered steps
//! - text-to-speech voice types and AI simulation personas
//! - videos uploaded through training records and community posts
//! - generic app settings, with an audit trail of admin operations
//!
//! ## Architecture
//!
//! - **routes**: thin axum handlers wrapping results in `{ success, message, data }`
//! - **database**: `SQLite` storage through sqlx, one file per resource
//! - **models**: entities and request payloads with their validation
//! - **middleware**: bearer-token admin authentication and CORS
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use fluent_admin_api::config::ServerConfig;
//! use fluent_admin_api::database::Database;
//! use fluent_admin_api::routes::build_router;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! let database = Arc::new(Database::new(&config.database_url).await?);
//! let router = build_router(database, &config)?;
//! # let _ = router;
//! # Ok(())
//! # }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by binary crates (src/bin/) and integration tests (tests/).

/// Environment-driven server configuration
pub mod config;

/// Application constants
pub mod constants;

/// `SQLite` storage for every admin resource
pub mod database;

/// Unified error handling with HTTP status mapping
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware for admin authentication and CORS
pub mod middleware;

/// Domain models and request payloads
pub mod models;

/// Offset pagination parameters
pub mod pagination;

/// `HTTP` routes for the admin API
pub mod routes;

/// Default data for a fresh installation
pub mod seed;
