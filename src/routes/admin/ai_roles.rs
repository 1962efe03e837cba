// ABOUTME: AI simulation persona route handlers
// ABOUTME: Persona CRUD with voice type validation, optimistic versioning, and reset to the built-in personas
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::info;

use crate::{
    constants::{
        defaults,
        operation_log::{ACTION_CREATE, ACTION_DELETE, ACTION_RESET, ACTION_UPDATE},
    },
    errors::{AppError, AppResult},
    middleware::AdminPrincipal,
    models::{default_personas, AiRoleRequest, NewOperationLog},
};

use super::types::{AdminResponse, ApiJson, ApiPath};
use super::{record_operation, AdminApiContext};

const RESOURCE: &str = "ai_role";

/// Reject a named voice type that does not exist or is disabled
async fn ensure_voice_type_enabled(context: &AdminApiContext, voice_type: &str) -> AppResult<()> {
    if context.database.voice_type_enabled(voice_type).await? {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "Voice type does not exist or is disabled: {voice_type}"
        )))
    }
}

/// Voice type for a new persona: the requested one, else the first enabled one, else the default
async fn resolve_voice_type(context: &AdminApiContext, requested: &str) -> AppResult<String> {
    if !requested.is_empty() {
        ensure_voice_type_enabled(context, requested).await?;
        return Ok(requested.to_owned());
    }
    Ok(context
        .database
        .first_enabled_voice_type()
        .await?
        .unwrap_or_else(|| defaults::VOICE_TYPE.to_owned()))
}

/// Handle listing personas
pub(super) async fn handle_list_ai_roles(
    State(context): State<Arc<AdminApiContext>>,
) -> AppResult<Json<AdminResponse>> {
    let roles = context.database.list_ai_roles().await?;
    AdminResponse::keyed("AI roles retrieved", "roles", roles)
}

/// Handle getting a persona
pub(super) async fn handle_get_ai_role(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Json<AdminResponse>> {
    let role = context
        .database
        .get_ai_role(&id)
        .await?
        .ok_or_else(|| AppError::not_found("AI role not found"))?;
    AdminResponse::ok("AI role retrieved", role)
}

/// Handle creating a persona
pub(super) async fn handle_create_ai_role(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiJson(request): ApiJson<AiRoleRequest>,
) -> AppResult<Json<AdminResponse>> {
    let mut draft = request.into_new_draft()?;

    if context.database.get_ai_role(&draft.id).await?.is_some() {
        return Err(AppError::already_exists(format!(
            "AI role already exists: {}",
            draft.id
        )));
    }
    draft.voice_type = resolve_voice_type(&context, &draft.voice_type).await?;

    let role = context.database.create_ai_role(&draft).await?;

    info!(ai_role_id = %role.id, voice_type = %role.voice_type, "AI role created");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_CREATE, RESOURCE, role.id.clone()),
    )
    .await;

    AdminResponse::ok("AI role created", role)
}

/// Handle replacing every field of a persona except its id
pub(super) async fn handle_update_ai_role(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiPath(id): ApiPath<String>,
    ApiJson(request): ApiJson<AiRoleRequest>,
) -> AppResult<Json<AdminResponse>> {
    let (draft, expected_version) = request.into_update_draft(&id);
    if !draft.voice_type.is_empty() {
        ensure_voice_type_enabled(&context, &draft.voice_type).await?;
    }

    let role = context
        .database
        .update_ai_role(&draft, expected_version)
        .await?
        .ok_or_else(|| AppError::not_found("AI role not found"))?;

    info!(ai_role_id = %role.id, version = role.version, "AI role updated");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_UPDATE, RESOURCE, role.id.clone())
            .with_details(format!("version={}", role.version)),
    )
    .await;

    AdminResponse::ok("AI role updated", role)
}

/// Handle deleting a persona
pub(super) async fn handle_delete_ai_role(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Json<AdminResponse>> {
    if !context.database.delete_ai_role(&id).await? {
        return Err(AppError::not_found("AI role not found"));
    }

    info!(ai_role_id = %id, "AI role deleted");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_DELETE, RESOURCE, id),
    )
    .await;

    Ok(AdminResponse::done("AI role deleted"))
}

/// Handle resetting the persona collection to the built-in personas
pub(super) async fn handle_init_ai_roles_from_config(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
) -> AppResult<Json<AdminResponse>> {
    let roles = context
        .database
        .replace_ai_roles(&default_personas())
        .await?;

    info!(count = roles.len(), "AI roles reset to defaults");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_RESET, RESOURCE, "*")
            .with_details(format!("count={}", roles.len())),
    )
    .await;

    AdminResponse::keyed("AI roles initialized", "roles", roles)
}
