// ABOUTME: Operation log route handler
// ABOUTME: Paginated audit trail of admin mutations, newest first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::errors::AppResult;
use crate::pagination::{PageParams, PageQuery};

use super::types::{AdminResponse, ApiQuery, OperationLogQuery};
use super::AdminApiContext;

/// Handle listing operation log entries
pub(super) async fn handle_list_operation_logs(
    State(context): State<Arc<AdminApiContext>>,
    ApiQuery(query): ApiQuery<OperationLogQuery>,
) -> AppResult<Json<AdminResponse>> {
    let params = PageParams::from(PageQuery {
        page: query.page,
        page_size: query.page_size,
    });
    let resource = query.resource.as_deref().map(str::trim).filter(|r| !r.is_empty());

    let page = context
        .database
        .list_operation_logs(resource, params)
        .await?;
    AdminResponse::paged("Operation logs retrieved", "logs", page)
}
