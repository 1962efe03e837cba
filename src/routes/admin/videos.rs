// ABOUTME: Video aggregator route handlers
// ABOUTME: Unified list, detail and delete over exposure training records and community posts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::{
    errors::{AppError, AppResult},
    models::{VideoFilter, VideoSource},
    pagination::{PageParams, PageQuery},
};

use super::types::{
    AdminResponse, ApiJson, ApiPath, ApiQuery, BatchDeleteResult, BatchDeleteVideosRequest,
    VideoListQuery, VideoSourceQuery,
};
use super::AdminApiContext;

/// Handle listing videos across sources
pub(super) async fn handle_list_videos(
    State(context): State<Arc<AdminApiContext>>,
    ApiQuery(query): ApiQuery<VideoListQuery>,
) -> AppResult<Json<AdminResponse>> {
    let filter = VideoFilter::from_query(
        query.source.as_deref(),
        query.user_id.as_deref(),
        query.module_id.as_deref(),
    )?;
    let params = PageParams::from(PageQuery {
        page: query.page,
        page_size: query.page_size,
    });

    let page = context.database.list_videos(&filter, params).await?;
    AdminResponse::paged("Videos retrieved", "videos", page)
}

/// Handle getting one video, probing sources when none is given
pub(super) async fn handle_get_video(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(query): ApiQuery<VideoSourceQuery>,
) -> AppResult<Json<AdminResponse>> {
    let source = VideoSource::parse_filter(query.source.as_deref())?;
    let video = context
        .database
        .find_video(&id, source)
        .await?
        .ok_or_else(|| AppError::not_found("Video not found"))?;
    AdminResponse::keyed("Video retrieved", "video", video)
}

/// Handle deleting one video, probing sources when none is given
pub(super) async fn handle_delete_video(
    State(context): State<Arc<AdminApiContext>>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(query): ApiQuery<VideoSourceQuery>,
) -> AppResult<Json<AdminResponse>> {
    let source = VideoSource::parse_filter(query.source.as_deref())?;
    if context.database.clear_video(&id, source).await?.is_none() {
        return Err(AppError::not_found("Video not found"));
    }
    Ok(AdminResponse::done("Video deleted"))
}

/// Handle deleting several videos; each item must name its source
pub(super) async fn handle_batch_delete_videos(
    State(context): State<Arc<AdminApiContext>>,
    ApiJson(request): ApiJson<BatchDeleteVideosRequest>,
) -> AppResult<Json<AdminResponse>> {
    let mut result = BatchDeleteResult {
        success_count: 0,
        fail_count: 0,
    };

    for item in &request.video_ids {
        let Ok(source) = item.source.trim().parse::<VideoSource>() else {
            warn!(video_id = %item.id, source = %item.source, "Batch delete item without a valid source");
            result.fail_count += 1;
            continue;
        };

        match context.database.clear_video(&item.id, Some(source)).await {
            Ok(Some(_)) => result.success_count += 1,
            Ok(None) => result.fail_count += 1,
            Err(e) => {
                warn!(video_id = %item.id, error = %e, "Batch delete item failed");
                result.fail_count += 1;
            }
        }
    }

    info!(
        success_count = result.success_count,
        fail_count = result.fail_count,
        "Batch video delete finished"
    );
    let message = format!(
        "Batch delete finished: {} succeeded, {} failed",
        result.success_count, result.fail_count
    );
    AdminResponse::ok(&message, result)
}
