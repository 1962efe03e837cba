// ABOUTME: Admin API route wiring for the back-office screens
// ABOUTME: Groups handlers per resource and protects every route with the admin auth middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! Admin routes
//!
//! All handlers are thin: parse the request, call one or a few `Database`
//! methods, wrap the result in [`AdminResponse`]. Mutations of roles, menus,
//! voice types, personas and settings append an operation log entry.

mod ai_roles;
mod app_settings;
mod exposure;
mod menus;
mod operation_logs;
mod roles;
pub mod types;
mod videos;
mod voice_types;

pub use types::{AdminResponse, BatchDeleteResult, ReorderResult};

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tracing::{info, warn};

use crate::{
    database::Database,
    middleware::{admin_auth_middleware, AdminAuth, AdminPrincipal},
    models::NewOperationLog,
};

/// Admin API context shared across all endpoints
#[derive(Clone)]
pub struct AdminApiContext {
    /// Database connection for persistence operations
    pub database: Arc<Database>,
}

impl AdminApiContext {
    /// Creates a new admin API context
    #[must_use]
    pub fn new(database: Arc<Database>) -> Self {
        info!("AdminApiContext initialized");
        Self { database }
    }
}

/// Append an operation log entry attributed to `principal`
///
/// Failures are logged and swallowed; the main request has already succeeded.
pub(crate) async fn record_operation(
    context: &AdminApiContext,
    principal: &AdminPrincipal,
    entry: NewOperationLog,
) {
    let entry = entry.by(
        principal.user_id.clone(),
        &principal.username,
        &principal.role,
    );
    if let Err(e) = context.database.record_operation(&entry).await {
        warn!(
            action = %entry.action,
            resource = %entry.resource,
            error = %e,
            "Failed to record operation log"
        );
    }
}

/// Admin routes implementation (Axum)
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin routes behind the admin auth middleware
    pub fn routes(context: AdminApiContext, auth: AdminAuth) -> Router {
        let context = Arc::new(context);

        Router::new()
            .merge(Self::permission_routes(context.clone()))
            .merge(Self::exposure_routes(context.clone()))
            .merge(Self::voice_routes(context.clone()))
            .merge(Self::video_routes(context.clone()))
            .merge(Self::system_routes(context))
            .layer(middleware::from_fn_with_state(auth, admin_auth_middleware))
    }

    /// Role and menu routes
    fn permission_routes(context: Arc<AdminApiContext>) -> Router {
        Router::new()
            .route(
                "/admin/roles",
                get(roles::handle_list_roles).post(roles::handle_create_role),
            )
            .route(
                "/admin/roles/:id",
                get(roles::handle_get_role)
                    .put(roles::handle_update_role)
                    .delete(roles::handle_delete_role),
            )
            .route(
                "/admin/menus",
                get(menus::handle_list_menus).post(menus::handle_create_menu),
            )
            .route(
                "/admin/menus/:id",
                get(menus::handle_get_menu)
                    .put(menus::handle_update_menu)
                    .delete(menus::handle_delete_menu),
            )
            .with_state(context)
    }

    /// Exposure module and step routes
    fn exposure_routes(context: Arc<AdminApiContext>) -> Router {
        Router::new()
            .route(
                "/admin/exposure/modules",
                get(exposure::handle_list_modules).post(exposure::handle_create_module),
            )
            .route(
                "/admin/exposure/modules/order",
                put(exposure::handle_reorder_modules),
            )
            .route(
                "/admin/exposure/modules/:id",
                get(exposure::handle_get_module)
                    .put(exposure::handle_update_module)
                    .delete(exposure::handle_delete_module),
            )
            .route(
                "/admin/exposure/modules/:id/steps",
                get(exposure::handle_list_steps).post(exposure::handle_create_step),
            )
            .route(
                "/admin/exposure/modules/:id/steps/order",
                put(exposure::handle_reorder_steps),
            )
            .route(
                "/admin/exposure/modules/:id/steps/:step_id",
                put(exposure::handle_update_module_step)
                    .delete(exposure::handle_delete_module_step),
            )
            .route(
                "/admin/exposure/steps/:step_id",
                put(exposure::handle_update_step).delete(exposure::handle_delete_step),
            )
            .with_state(context)
    }

    /// Voice type and AI persona routes
    fn voice_routes(context: Arc<AdminApiContext>) -> Router {
        Router::new()
            .route(
                "/admin/voice-types",
                get(voice_types::handle_list_voice_types)
                    .post(voice_types::handle_create_voice_type),
            )
            .route(
                "/admin/voice-types/enabled",
                get(voice_types::handle_list_enabled_voice_types),
            )
            .route(
                "/admin/voice-types/:id",
                get(voice_types::handle_get_voice_type)
                    .put(voice_types::handle_update_voice_type)
                    .delete(voice_types::handle_delete_voice_type),
            )
            .route(
                "/admin/ai-roles",
                get(ai_roles::handle_list_ai_roles).post(ai_roles::handle_create_ai_role),
            )
            .route(
                "/admin/ai-roles/init-from-config",
                post(ai_roles::handle_init_ai_roles_from_config),
            )
            .route(
                "/admin/ai-roles/:id",
                get(ai_roles::handle_get_ai_role)
                    .put(ai_roles::handle_update_ai_role)
                    .delete(ai_roles::handle_delete_ai_role),
            )
            .with_state(context)
    }

    /// Video aggregator routes
    fn video_routes(context: Arc<AdminApiContext>) -> Router {
        Router::new()
            .route("/admin/videos", get(videos::handle_list_videos))
            .route(
                "/admin/videos/batch-delete",
                post(videos::handle_batch_delete_videos),
            )
            .route(
                "/admin/videos/:id",
                get(videos::handle_get_video).delete(videos::handle_delete_video),
            )
            .with_state(context)
    }

    /// App setting and operation log routes
    fn system_routes(context: Arc<AdminApiContext>) -> Router {
        Router::new()
            .route(
                "/admin/app-settings",
                get(app_settings::handle_list_app_settings),
            )
            .route(
                "/admin/app-settings/:key",
                get(app_settings::handle_get_app_setting)
                    .put(app_settings::handle_upsert_app_setting)
                    .delete(app_settings::handle_delete_app_setting),
            )
            .route(
                "/admin/operation-logs",
                get(operation_logs::handle_list_operation_logs),
            )
            .with_state(context)
    }
}
