// ABOUTME: Exposure training module and step route handlers
// ABOUTME: Module CRUD with eager steps, nested and flat step routes, and transactional batch reordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::{
        ExposureModule, ModulePatch, NewExposureModule, NewExposureStep, ReorderModulesRequest,
        ReorderStepsRequest, StepPatch,
    },
};

use super::types::{AdminResponse, ApiJson, ApiPath, ApiQuery, ModuleListQuery, ReorderResult};
use super::AdminApiContext;

fn parse_step_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::invalid_format("Invalid step id"))
}

async fn module_or_404(context: &AdminApiContext, id: &str) -> AppResult<ExposureModule> {
    context
        .database
        .get_exposure_module(id)
        .await?
        .ok_or_else(|| AppError::not_found("Module not found"))
}

/// Handle listing modules with their steps
pub(super) async fn handle_list_modules(
    State(context): State<Arc<AdminApiContext>>,
    ApiQuery(query): ApiQuery<ModuleListQuery>,
) -> AppResult<Json<AdminResponse>> {
    let page = context
        .database
        .list_exposure_modules(query.keyword.as_deref(), query.params())
        .await?;
    AdminResponse::paged("Modules retrieved", "modules", page)
}

/// Handle getting a module with its steps
pub(super) async fn handle_get_module(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Json<AdminResponse>> {
    let module = module_or_404(&context, &id).await?;
    AdminResponse::keyed("Module retrieved", "module", module)
}

/// Handle creating a module with a caller-supplied id
pub(super) async fn handle_create_module(
    State(context): State<Arc<AdminApiContext>>,
    ApiJson(request): ApiJson<NewExposureModule>,
) -> AppResult<Json<AdminResponse>> {
    let request = request.validated()?;

    if context.database.exposure_module_exists(&request.id).await? {
        return Err(AppError::already_exists(format!(
            "Module already exists: {}",
            request.id
        )));
    }

    let module = context.database.create_exposure_module(&request).await?;
    info!(module_id = %module.id, "Exposure module created");
    AdminResponse::keyed("Module created", "module", module)
}

/// Handle a sparse module update
pub(super) async fn handle_update_module(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(patch): ApiJson<ModulePatch>,
) -> AppResult<Json<AdminResponse>> {
    let patch = patch.normalized();
    if !context.database.update_exposure_module(&id, &patch).await? {
        return Err(AppError::not_found("Module not found"));
    }

    info!(module_id = %id, "Exposure module updated");
    let module = module_or_404(&context, &id).await?;
    AdminResponse::keyed("Module updated", "module", module)
}

/// Handle deleting a module and its steps
pub(super) async fn handle_delete_module(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Json<AdminResponse>> {
    if !context.database.delete_exposure_module(&id).await? {
        return Err(AppError::not_found("Module not found"));
    }
    info!(module_id = %id, "Exposure module deleted");
    Ok(AdminResponse::done("Module deleted"))
}

/// Handle listing the steps of a module
pub(super) async fn handle_list_steps(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(module_id): ApiPath<String>,
) -> AppResult<Json<AdminResponse>> {
    let steps = context.database.list_exposure_steps(&module_id).await?;
    AdminResponse::keyed("Steps retrieved", "steps", steps)
}

/// Handle creating a step under an existing module
pub(super) async fn handle_create_step(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(module_id): ApiPath<String>,
    ApiJson(request): ApiJson<NewExposureStep>,
) -> AppResult<Json<AdminResponse>> {
    if !context.database.exposure_module_exists(&module_id).await? {
        return Err(AppError::not_found("Module not found"));
    }

    let draft = request.validated()?;
    let step = context
        .database
        .create_exposure_step(&module_id, &draft)
        .await?;

    info!(module_id = %module_id, step_id = %step.id, "Exposure step created");
    AdminResponse::keyed("Step created", "step", step)
}

async fn update_step(
    context: &AdminApiContext,
    module_id: Option<&str>,
    step_id: &str,
    body: &Value,
) -> AppResult<Json<AdminResponse>> {
    let step_id = parse_step_id(step_id)?;
    let patch = StepPatch::from_json(body)?;

    if !context
        .database
        .update_exposure_step(step_id, module_id, &patch)
        .await?
    {
        return Err(AppError::not_found("Step not found"));
    }

    let step = context
        .database
        .get_exposure_step(step_id)
        .await?
        .ok_or_else(|| AppError::not_found("Step not found"))?;

    info!(step_id = %step_id, "Exposure step updated");
    AdminResponse::keyed("Step updated", "step", step)
}

async fn delete_step(
    context: &AdminApiContext,
    module_id: Option<&str>,
    step_id: &str,
) -> AppResult<Json<AdminResponse>> {
    let step_id = parse_step_id(step_id)?;
    if !context
        .database
        .delete_exposure_step(step_id, module_id)
        .await?
    {
        return Err(AppError::not_found("Step not found"));
    }
    info!(step_id = %step_id, "Exposure step deleted");
    Ok(AdminResponse::done("Step deleted"))
}

/// Handle `PUT /admin/exposure/modules/:id/steps/:step_id`
pub(super) async fn handle_update_module_step(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath((module_id, step_id)): ApiPath<(String, String)>,
    ApiJson(body): ApiJson<Value>,
) -> AppResult<Json<AdminResponse>> {
    update_step(&context, Some(&module_id), &step_id, &body).await
}

/// Handle `PUT /admin/exposure/steps/:step_id`
pub(super) async fn handle_update_step(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(step_id): ApiPath<String>,
    ApiJson(body): ApiJson<Value>,
) -> AppResult<Json<AdminResponse>> {
    update_step(&context, None, &step_id, &body).await
}

/// Handle `DELETE /admin/exposure/modules/:id/steps/:step_id`
pub(super) async fn handle_delete_module_step(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath((module_id, step_id)): ApiPath<(String, String)>,
) -> AppResult<Json<AdminResponse>> {
    delete_step(&context, Some(&module_id), &step_id).await
}

/// Handle `DELETE /admin/exposure/steps/:step_id`
pub(super) async fn handle_delete_step(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(step_id): ApiPath<String>,
) -> AppResult<Json<AdminResponse>> {
    delete_step(&context, None, &step_id).await
}

/// Handle a batch step reorder inside one transaction
pub(super) async fn handle_reorder_steps(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(module_id): ApiPath<String>,
    ApiJson(request): ApiJson<ReorderStepsRequest>,
) -> AppResult<Json<AdminResponse>> {
    let updated = context
        .database
        .reorder_exposure_steps(&module_id, &request.steps)
        .await?;
    AdminResponse::ok("Step order updated", ReorderResult { updated })
}

/// Handle a batch module reorder inside one transaction
pub(super) async fn handle_reorder_modules(
    State(context): State<Arc<AdminApiContext>>,
    ApiJson(request): ApiJson<ReorderModulesRequest>,
) -> AppResult<Json<AdminResponse>> {
    context
        .database
        .reorder_exposure_modules(&request.modules)
        .await?;
    Ok(AdminResponse::done("Module order updated"))
}
