// ABOUTME: Role management route handlers
// ABOUTME: Paginated listing, CRUD with unique role codes, and delete protection while users hold the role
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::info;
use uuid::Uuid;

use crate::{
    constants::operation_log::{ACTION_CREATE, ACTION_DELETE, ACTION_UPDATE},
    errors::{AppError, AppResult},
    middleware::AdminPrincipal,
    models::{NewOperationLog, NewRole, RolePatch},
};

use super::types::{AdminResponse, ApiJson, ApiPath, ApiQuery, ListQuery};
use super::{record_operation, AdminApiContext};

const RESOURCE: &str = "role";

/// Handle listing roles, newest first
pub(super) async fn handle_list_roles(
    State(context): State<Arc<AdminApiContext>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> AppResult<Json<AdminResponse>> {
    let page = context.database.list_roles(query.params()).await?;
    AdminResponse::paged("Roles retrieved", "roles", page)
}

/// Handle getting a single role
pub(super) async fn handle_get_role(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<AdminResponse>> {
    let role = context
        .database
        .get_role(id)
        .await?
        .ok_or_else(|| AppError::not_found("Role not found"))?;
    AdminResponse::ok("Role retrieved", role)
}

/// Handle creating a role
pub(super) async fn handle_create_role(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiJson(request): ApiJson<NewRole>,
) -> AppResult<Json<AdminResponse>> {
    let request = request.validated()?;

    if context.database.role_code_taken(&request.code, None).await? {
        return Err(AppError::already_exists("Role code already exists"));
    }

    let role = context.database.create_role(&request).await?;

    info!(role_id = %role.id, code = %role.code, "Role created");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_CREATE, RESOURCE, role.id.to_string())
            .with_details(format!("code={}", role.code)),
    )
    .await;

    AdminResponse::ok("Role created", role)
}

/// Handle a partial role update
pub(super) async fn handle_update_role(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<RolePatch>,
) -> AppResult<Json<AdminResponse>> {
    let patch = patch.normalized();
    let mut role = context
        .database
        .get_role(id)
        .await?
        .ok_or_else(|| AppError::not_found("Role not found"))?;

    if let Some(code) = patch.code.as_deref() {
        if code != role.code && context.database.role_code_taken(code, Some(id)).await? {
            return Err(AppError::already_exists("Role code already exists"));
        }
    }

    role.apply(patch);
    let role = context.database.update_role(&role).await?;

    info!(role_id = %role.id, "Role updated");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_UPDATE, RESOURCE, role.id.to_string()),
    )
    .await;

    AdminResponse::ok("Role updated", role)
}

/// Handle deleting a role that no user holds
pub(super) async fn handle_delete_role(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<AdminResponse>> {
    let role = context
        .database
        .get_role(id)
        .await?
        .ok_or_else(|| AppError::not_found("Role not found"))?;

    let holders = context.database.count_users_with_role(&role.code).await?;
    if holders > 0 {
        return Err(AppError::in_use(format!(
            "Role is assigned to {holders} user(s) and cannot be deleted"
        )));
    }

    if !context.database.delete_role(id).await? {
        return Err(AppError::not_found("Role not found"));
    }

    info!(role_id = %id, code = %role.code, "Role deleted");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_DELETE, RESOURCE, id.to_string())
            .with_details(format!("code={}", role.code)),
    )
    .await;

    Ok(AdminResponse::done("Role deleted"))
}
