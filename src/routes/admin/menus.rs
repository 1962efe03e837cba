// ABOUTME: Menu tree route handlers
// ABOUTME: Lists root menus with their direct children and guards deletion of menus that still have children
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
    models::{MenuPatch, NewMenu, NewOperationLog},
};

use super::types::{AdminResponse, ApiJson, ApiPath, ApiQuery, ListQuery};
use super::{record_operation, AdminApiContext};

const RESOURCE: &str = "menu";

/// Handle listing root menus with their children
pub(super) async fn handle_list_menus(
    State(context): State<Arc<AdminApiContext>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> AppResult<Json<AdminResponse>> {
    let page = context.database.list_menu_tree(query.params()).await?;
    AdminResponse::paged("Menus retrieved", "menus", page)
}

/// Handle getting a menu with its direct children
pub(super) async fn handle_get_menu(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<AdminResponse>> {
    let node = context
        .database
        .get_menu_node(id)
        .await?
        .ok_or_else(|| AppError::not_found("Menu not found"))?;
    AdminResponse::ok("Menu retrieved", node)
}

/// Handle creating a menu
pub(super) async fn handle_create_menu(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiJson(request): ApiJson<NewMenu>,
) -> AppResult<Json<AdminResponse>> {
    let request = request.validated()?;
    let menu = context.database.create_menu(&request).await?;

    info!(menu_id = %menu.id, parent_id = ?menu.parent_id, "Menu created");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_CREATE, RESOURCE, menu.id.to_string())
            .with_details(format!("name={}", menu.name)),
    )
    .await;

    AdminResponse::ok("Menu created", menu)
}

/// Handle a partial menu update
pub(super) async fn handle_update_menu(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<MenuPatch>,
) -> AppResult<Json<AdminResponse>> {
    let mut menu = context
        .database
        .get_menu(id)
        .await?
        .ok_or_else(|| AppError::not_found("Menu not found"))?;

    if let Some(Some(parent_id)) = patch.parent_id {
        if parent_id != id && menu.parent_id != Some(parent_id) {
            ensure_valid_parent(&context, id, parent_id).await?;
        }
    }

    menu.apply(patch)?;
    context.database.update_menu(&menu).await?;

    let menu = context
        .database
        .get_menu(id)
        .await?
        .ok_or_else(|| AppError::not_found("Menu not found"))?;

    info!(menu_id = %id, "Menu updated");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_UPDATE, RESOURCE, id.to_string()),
    )
    .await;

    AdminResponse::ok("Menu updated", menu)
}

/// The tree is two levels deep: a new parent must be a root, and a menu that
/// still has children cannot become a child itself
async fn ensure_valid_parent(
    context: &AdminApiContext,
    id: Uuid,
    parent_id: Uuid,
) -> AppResult<()> {
    let parent = context
        .database
        .get_menu(parent_id)
        .await?
        .ok_or_else(|| AppError::invalid_input(format!("Parent menu not found: {parent_id}")))?;

    if parent.parent_id.is_some() {
        return Err(AppError::invalid_input(
            "Parent menu must be a top-level menu",
        ));
    }
    if context.database.count_child_menus(id).await? > 0 {
        return Err(AppError::invalid_input(
            "A menu with child menus cannot be moved under another menu",
        ));
    }
    Ok(())
}

/// Handle deleting a leaf menu
pub(super) async fn handle_delete_menu(
    State(context): State<Arc<AdminApiContext>>,
    Extension(principal): Extension<AdminPrincipal>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<AdminResponse>> {
    if context.database.get_menu(id).await?.is_none() {
        return Err(AppError::not_found("Menu not found"));
    }

    if context.database.count_child_menus(id).await? > 0 {
        return Err(AppError::in_use(
            "Menu has child menus; delete the children first",
        ));
    }

    if !context.database.delete_menu(id).await? {
        return Err(AppError::not_found("Menu not found"));
    }

    info!(menu_id = %id, "Menu deleted");
    record_operation(
        &context,
        &principal,
        NewOperationLog::success(ACTION_DELETE, RESOURCE, id.to_string()),
    )
    .await;

    Ok(AdminResponse::done("Menu deleted"))
}
