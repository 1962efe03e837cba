// ABOUTME: Route module organization for the admin HTTP server
// ABOUTME: Assembles health and admin routes and applies the tower-http middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! HTTP routes
//!
//! - `health`: unauthenticated liveness probe
//! - `admin`: every back-office screen, behind the admin auth middleware

/// Admin back-office routes
pub mod admin;
/// Health check routes
pub mod health;

pub use admin::{AdminApiContext, AdminResponse, AdminRoutes};
pub use health::HealthRoutes;

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::HeaderName,
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};

use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::middleware::{setup_cors, AdminAuth};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the complete application router
///
/// # Errors
///
/// Returns a config error when the admin auth strategy cannot be built
pub fn build_router(database: Arc<Database>, config: &ServerConfig) -> AppResult<Router> {
    let auth = AdminAuth::from_config(&config.auth)?;
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let router = Router::new()
        .merge(HealthRoutes::routes(database.clone()))
        .merge(AdminRoutes::routes(AdminApiContext::new(database), auth))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
                .layer(setup_cors(config)),
        );

    Ok(router)
}

/// Render a handler panic as the 500 error envelope
#[allow(clippy::needless_pass_by_value)] // signature fixed by `CatchPanicLayer::custom`
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Request handler panicked");
    AppError::internal("Internal server error").into_response()
}
