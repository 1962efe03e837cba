// ABOUTME: Application setting route handlers
// ABOUTME: Key/value settings listing, lookup, upsert and delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::info;

use crate::{
    constants::{
        operation_log::{ACTION_DELETE, ACTION_UPDATE},
        setting_keys,
    },
    errors::{AppError, AppResult},
    middleware::AdminPrincipal,
    models::{NewOperationLog, UpsertAppSettingRequest},
};

use super::types::{AdminResponse, ApiJson, ApiPath};
use super::{record_operation, AdminApiContext};

const RESOURCE: &str = "app_setting";

/// Keys owned by another resource; they are readable here but never written
const MANAGED_KEYS: &[(&str, &str)] = &[(setting_keys::AI_SIMULATION_ROLES, "/admin/ai-roles")];

fn ensure_writable(key: &str) -> AppResult<()> {
    match MANAGED_KEYS.iter().find(|(managed, _)| *managed == key) {
        Some((_, owner)) => Err(AppError::in_use(format!(
            "Setting {key} is managed by {owner}"
        ))),
        None => Ok(()),
    }
}

/// Handle listing settings by key
pub(super) async fn handle_list_app_settings(
    State(context): State<Arc<AdminApiContext>>,
) -> AppResult<Json<AdminResponse>> {
    let settings = context.database.list_app_settings().await?;
    AdminResponse::keyed("Settings retrieved", "settings", settings)
}

/// Handle getting one setting
pub(super) async fn handle_get_app_setting(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(key): ApiPath<String>,
) -> AppResult<Json<AdminResponse>> {
    let setting = context
        .database
        .get_app_setting(&key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Setting not found: {key}")))?;
    AdminResponse::ok("Setting retrieved", setting)
}

/// Handle inserting or replacing a setting value
pub(super) async fn handle_upsert_app_setting(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiPath(key): ApiPath<String>,
    ApiJson(request): ApiJson<UpsertAppSettingRequest>,
) -> AppResult<Json<AdminResponse>> {
    ensure_writable(&key)?;
    let value = request
        .value
        .ok_or_else(|| AppError::missing_field("value is required"))?;

    let setting = context
        .database
        .set_app_setting(&key, &value, request.description.as_deref())
        .await?;

    info!(key = %key, "App setting saved");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_UPDATE, RESOURCE, key),
    )
    .await;

    AdminResponse::ok("Setting saved", setting)
}

/// Handle deleting a setting
pub(super) async fn handle_delete_app_setting(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiPath(key): ApiPath<String>,
) -> AppResult<Json<AdminResponse>> {
    ensure_writable(&key)?;
    if !context.database.delete_app_setting(&key).await? {
        return Err(AppError::not_found(format!("Setting not found: {key}")));
    }

    info!(key = %key, "App setting deleted");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_DELETE, RESOURCE, key),
    )
    .await;

    Ok(AdminResponse::done("Setting deleted"))
}
