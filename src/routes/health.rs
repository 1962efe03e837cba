// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Unauthenticated liveness endpoint that also pings the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! Health check route

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::constants::service_names;
use crate::database::Database;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes(database: Arc<Database>) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .with_state(database)
    }
}

async fn health_handler(State(database): State<Arc<Database>>) -> (StatusCode, Json<Value>) {
    let database_ok = database.ping().await.is_ok();
    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(json!({
            "status": if database_ok { "healthy" } else { "degraded" },
            "service": service_names::FLUENT_ADMIN_API,
            "version": env!("CARGO_PKG_VERSION"),
            "database": if database_ok { "ok" } else { "unavailable" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
