// ABOUTME: Read paths projecting videos out of training records and community posts
// ABOUTME: Deleting a video clears the source field and keeps the rest of the row
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite};
use tracing::info;

use super::{column, timestamp_column, Database};
use crate::constants::video_sources::{
    COMMUNITY_POST_DETAIL, EXPOSURE_MODULE_DETAIL, EXPOSURE_RECORD_TYPE,
};
use crate::errors::{AppError, AppResult};
use crate::models::video::{is_video_attachment, post_title};
use crate::models::{Video, VideoFilter, VideoOrigin, VideoSource};
use crate::pagination::{Page, PageParams};

/// Text value at `path` inside a JSON column, NULL for invalid JSON or non-text values
fn json_text(column: &str, path: &str) -> String {
    format!(
        "(CASE WHEN json_valid({column}) THEN \
           CASE WHEN json_type({column}, '{path}') = 'text' THEN json_extract({column}, '{path}') END \
         END)"
    )
}

fn exposure_select() -> String {
    let video_url = json_text("tr.data", "$.video_url");
    let module_id = json_text("tr.data", "$.module_id");
    let step_title = json_text("tr.data", "$.step_title");
    format!(
        r"
        SELECT tr.id, tr.user_id, tr.duration, tr.created_at,
               {video_url} AS video_url,
               {module_id} AS module_id,
               COALESCE(m.title, {step_title}) AS module_title,
               COALESCE(u.username, '') AS username
        FROM training_records tr
        LEFT JOIN users u ON u.id = tr.user_id
        LEFT JOIN exposure_modules m ON m.id = {module_id}
        "
    )
}

fn exposure_condition() -> String {
    format!(
        "tr.type = '{EXPOSURE_RECORD_TYPE}' AND COALESCE({}, '') != ''",
        json_text("tr.data", "$.video_url")
    )
}

const POST_SELECT: &str = r"
    SELECT p.id, p.user_id, p.image, p.content, p.created_at,
           COALESCE(u.username, '') AS username
    FROM posts p
    LEFT JOIN users u ON u.id = p.user_id
    ";

const POST_VIDEO_CONDITION: &str =
    "p.image IS NOT NULL AND p.image != '' AND (p.image LIKE '%.webm%' OR p.image LIKE '%.mp4%')";

fn push_exposure_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &VideoFilter) {
    builder.push(" WHERE ").push(exposure_condition());
    if let Some(user_id) = filter.user_id {
        builder.push(" AND tr.user_id = ").push_bind(user_id.to_string());
    }
    if let Some(module_id) = &filter.module_id {
        builder
            .push(format!(" AND {} = ", json_text("tr.data", "$.module_id")))
            .push_bind(module_id.clone());
    }
}

fn push_post_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &VideoFilter) {
    builder.push(" WHERE ").push(POST_VIDEO_CONDITION);
    if let Some(user_id) = filter.user_id {
        builder.push(" AND p.user_id = ").push_bind(user_id.to_string());
    }
}

fn row_to_exposure_video(row: &SqliteRow) -> AppResult<Video> {
    let module_id: Option<String> = column(row, "module_id")?;
    Ok(Video {
        id: column(row, "id")?,
        video_url: column(row, "video_url")?,
        user_id: column(row, "user_id")?,
        username: column(row, "username")?,
        source_detail: EXPOSURE_MODULE_DETAIL.to_owned(),
        created_at: timestamp_column(row, "created_at")?,
        origin: VideoOrigin::ExposureModule {
            module_id: module_id.filter(|id| !id.is_empty()),
            module_title: column(row, "module_title")?,
            duration: column(row, "duration")?,
        },
    })
}

fn row_to_post_video(row: &SqliteRow) -> AppResult<Video> {
    let id: String = column(row, "id")?;
    let content: String = column(row, "content")?;
    Ok(Video {
        video_url: column(row, "image")?,
        user_id: column(row, "user_id")?,
        username: column(row, "username")?,
        source_detail: COMMUNITY_POST_DETAIL.to_owned(),
        created_at: timestamp_column(row, "created_at")?,
        origin: VideoOrigin::CommunityPost {
            post_id: id.clone(),
            post_title: post_title(&content),
        },
        id,
    })
}

impl Database {
    /// List videos from the selected sources
    ///
    /// Each source is paginated on its own and the pages are concatenated,
    /// exposure videos first. `total` is the sum of the per-source counts.
    pub async fn list_videos(
        &self,
        filter: &VideoFilter,
        params: PageParams,
    ) -> AppResult<Page<Video>> {
        let mut videos = Vec::new();
        let mut total = 0;

        for source in VideoSource::selected(filter.source) {
            let (count, page) = match source {
                VideoSource::ExposureModule => (
                    self.count_exposure_videos(filter).await?,
                    self.page_exposure_videos(filter, params).await?,
                ),
                VideoSource::CommunityPost => (
                    self.count_post_videos(filter).await?,
                    self.page_post_videos(filter, params).await?,
                ),
            };
            total += count;
            videos.extend(page);
        }

        Ok(Page::new(videos, total, params))
    }

    async fn count_exposure_videos(&self, filter: &VideoFilter) -> AppResult<i64> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM training_records tr");
        push_exposure_filters(&mut builder, filter);
        builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count exposure videos: {e}")))
    }

    async fn page_exposure_videos(
        &self,
        filter: &VideoFilter,
        params: PageParams,
    ) -> AppResult<Vec<Video>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(exposure_select());
        push_exposure_filters(&mut builder, filter);
        builder
            .push(" ORDER BY tr.created_at DESC LIMIT ")
            .push_bind(params.limit())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list exposure videos: {e}")))?;
        rows.iter().map(row_to_exposure_video).collect()
    }

    async fn count_post_videos(&self, filter: &VideoFilter) -> AppResult<i64> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM posts p");
        push_post_filters(&mut builder, filter);
        builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count post videos: {e}")))
    }

    async fn page_post_videos(
        &self,
        filter: &VideoFilter,
        params: PageParams,
    ) -> AppResult<Vec<Video>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(POST_SELECT);
        push_post_filters(&mut builder, filter);
        builder
            .push(" ORDER BY p.created_at DESC LIMIT ")
            .push_bind(params.limit())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list post videos: {e}")))?;
        rows.iter().map(row_to_post_video).collect()
    }

    /// Find a video by row id, probing sources in order when none is given
    pub async fn find_video(&self, id: &str, source: Option<VideoSource>) -> AppResult<Option<Video>> {
        for source in VideoSource::selected(source) {
            let found = match source {
                VideoSource::ExposureModule => self.find_exposure_video(id).await?,
                VideoSource::CommunityPost => self.find_post_video(id).await?,
            };
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    async fn find_exposure_video(&self, id: &str) -> AppResult<Option<Video>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(exposure_select());
        builder
            .push(" WHERE ")
            .push(exposure_condition())
            .push(" AND tr.id = ")
            .push_bind(id.to_owned());

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get exposure video: {e}")))?;
        row.as_ref().map(row_to_exposure_video).transpose()
    }

    async fn find_post_video(&self, id: &str) -> AppResult<Option<Video>> {
        let row = sqlx::query(&format!("{POST_SELECT} WHERE p.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get post video: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let image: Option<String> = column(&row, "image")?;
        if !image.as_deref().is_some_and(is_video_attachment) {
            return Ok(None);
        }
        row_to_post_video(&row).map(Some)
    }

    /// Clear a video, probing sources in order when none is given
    ///
    /// Returns the source that was cleared, or `None` when no row carried a
    /// video for `id`.
    pub async fn clear_video(
        &self,
        id: &str,
        source: Option<VideoSource>,
    ) -> AppResult<Option<VideoSource>> {
        for source in VideoSource::selected(source) {
            let cleared = match source {
                VideoSource::ExposureModule => self.clear_exposure_video(id).await?,
                VideoSource::CommunityPost => self.clear_post_video(id).await?,
            };
            if cleared {
                info!(video_id = id, source = %source, "Video cleared");
                return Ok(Some(source));
            }
        }
        Ok(None)
    }

    /// Remove `video_url` from an exposure record's JSON payload
    async fn clear_exposure_video(&self, id: &str) -> AppResult<bool> {
        let sql = format!(
            r"
            UPDATE training_records
            SET data = json_remove(data, '$.video_url')
            WHERE id = ?1 AND type = '{EXPOSURE_RECORD_TYPE}' AND COALESCE({}, '') != ''
            ",
            json_text("data", "$.video_url")
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete exposure video: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Blank a post's attachment when it is a video
    async fn clear_post_video(&self, id: &str) -> AppResult<bool> {
        if self.find_post_video(id).await?.is_none() {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE posts SET image = '' WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete post video: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}
