// ABOUTME: Voice type route handlers
// ABOUTME: CRUD over TTS voices with unique technical codes and an enabled-only dropdown listing
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
    models::{NewOperationLog, NewVoiceType, VoiceTypeOption},
};

use super::types::{AdminResponse, ApiJson, ApiPath};
use super::{record_operation, AdminApiContext};

const RESOURCE: &str = "voice_type";

fn parse_voice_type_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::invalid_format("Invalid voice type id"))
}

/// Handle listing all voice types, newest first
pub(super) async fn handle_list_voice_types(
    State(context): State<Arc<AdminApiContext>>,
) -> AppResult<Json<AdminResponse>> {
    let voice_types = context.database.list_voice_types().await?;
    AdminResponse::keyed("Voice types retrieved", "voice_types", voice_types)
}

/// Handle listing enabled voice types as dropdown options
pub(super) async fn handle_list_enabled_voice_types(
    State(context): State<Arc<AdminApiContext>>,
) -> AppResult<Json<AdminResponse>> {
    let options: Vec<VoiceTypeOption> = context
        .database
        .list_enabled_voice_types()
        .await?
        .into_iter()
        .map(VoiceTypeOption::from)
        .collect();
    AdminResponse::keyed("Voice types retrieved", "voice_types", options)
}

/// Handle getting a voice type
pub(super) async fn handle_get_voice_type(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Json<AdminResponse>> {
    let id = parse_voice_type_id(&id)?;
    let voice = context
        .database
        .get_voice_type(id)
        .await?
        .ok_or_else(|| AppError::not_found("Voice type not found"))?;
    AdminResponse::ok("Voice type retrieved", voice)
}

/// Handle creating a voice type
pub(super) async fn handle_create_voice_type(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiJson(request): ApiJson<NewVoiceType>,
) -> AppResult<Json<AdminResponse>> {
    let request = request.validated()?;

    if context
        .database
        .voice_type_code_taken(&request.voice_type, None)
        .await?
    {
        return Err(AppError::already_exists("Voice type already exists"));
    }

    let voice = context.database.create_voice_type(&request).await?;

    info!(voice_type_id = %voice.id, code = %voice.voice_type, "Voice type created");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_CREATE, RESOURCE, voice.id.to_string())
            .with_details(format!("type={}", voice.voice_type)),
    )
    .await;

    AdminResponse::ok("Voice type created", voice)
}

/// Handle a full voice type update
pub(super) async fn handle_update_voice_type(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiPath(id): ApiPath<String>,
    ApiJson(request): ApiJson<NewVoiceType>,
) -> AppResult<Json<AdminResponse>> {
    let id = parse_voice_type_id(&id)?;
    let mut voice = context
        .database
        .get_voice_type(id)
        .await?
        .ok_or_else(|| AppError::not_found("Voice type not found"))?;

    let request = request.validated()?;
    if request.voice_type != voice.voice_type
        && context
            .database
            .voice_type_code_taken(&request.voice_type, Some(id))
            .await?
    {
        return Err(AppError::already_exists("Voice type already exists"));
    }

    voice.name = request.name;
    voice.voice_type = request.voice_type;
    voice.description = request.description;
    if let Some(enabled) = request.enabled {
        voice.enabled = enabled;
    }
    let voice = context.database.update_voice_type(&voice).await?;

    info!(voice_type_id = %voice.id, "Voice type updated");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_UPDATE, RESOURCE, voice.id.to_string())
            .with_details(format!("type={}", voice.voice_type)),
    )
    .await;

    AdminResponse::ok("Voice type updated", voice)
}

/// Handle deleting a voice type
pub(super) async fn handle_delete_voice_type(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Json<AdminResponse>> {
    let id = parse_voice_type_id(&id)?;
    if !context.database.delete_voice_type(id).await? {
        return Err(AppError::not_found("Voice type not found"));
    }

    info!(voice_type_id = %id, "Voice type deleted");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_DELETE, RESOURCE, id.to_string()),
    )
    .await;

    Ok(AdminResponse::done("Voice type deleted"))
}
