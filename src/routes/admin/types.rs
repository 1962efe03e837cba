// ABOUTME: Envelope, extractors and query types shared by admin route handlers
// ABOUTME: Every success is wrapped in { success, message, data }; extractor failures map to the error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! Admin request and response types

use axum::{
    extract::{FromRequest, FromRequestParts},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{AppError, AppResult};
use crate::pagination::{Page, PageParams, PageQuery};

/// Uniform success envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminResponse {
    /// Whether the operation succeeded
    pub success: bool,
    /// Response message
    pub message: String,
    /// Payload, `null` for operations that return nothing
    pub data: Option<Value>,
}

impl AdminResponse {
    /// Successful response carrying `data`
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `data` cannot be encoded
    pub fn ok<T: Serialize>(message: &str, data: T) -> AppResult<Json<Self>> {
        Ok(Json(Self {
            success: true,
            message: message.to_owned(),
            data: Some(serde_json::to_value(data)?),
        }))
    }

    /// Successful response with `data: null`
    #[must_use]
    pub fn done(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_owned(),
            data: None,
        })
    }

    /// Successful response wrapping `data` in a single-key object
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `data` cannot be encoded
    pub fn keyed<T: Serialize>(message: &str, key: &str, data: T) -> AppResult<Json<Self>> {
        let mut object = Map::new();
        object.insert(key.to_owned(), serde_json::to_value(data)?);
        Self::ok(message, Value::Object(object))
    }

    /// Successful paginated response: `{ <key>: [...], total, page, page_size }`
    ///
    /// # Errors
    ///
    /// Returns a serialization error if an item cannot be encoded
    pub fn paged<T: Serialize>(message: &str, key: &str, page: Page<T>) -> AppResult<Json<Self>> {
        let mut object = Map::new();
        object.insert(key.to_owned(), serde_json::to_value(page.items)?);
        object.insert("total".to_owned(), Value::from(page.total));
        object.insert("page".to_owned(), Value::from(page.params.page));
        object.insert("page_size".to_owned(), Value::from(page.params.page_size));
        Self::ok(message, Value::Object(object))
    }
}

/// JSON body extractor that reports malformed bodies with the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor that reports bad parameters with the error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path extractor that reports bad parameters with the error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Plain `page` / `page_size` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Requested page
    pub page: Option<i64>,
    /// Requested page size
    pub page_size: Option<i64>,
}

impl ListQuery {
    /// Normalized page parameters
    #[must_use]
    pub fn params(&self) -> PageParams {
        PageParams::from(PageQuery {
            page: self.page,
            page_size: self.page_size,
        })
    }
}

/// `GET /admin/exposure/modules` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleListQuery {
    /// Requested page
    pub page: Option<i64>,
    /// Requested page size
    pub page_size: Option<i64>,
    /// Substring matched against title and description
    pub keyword: Option<String>,
}

impl ModuleListQuery {
    /// Normalized page parameters
    #[must_use]
    pub fn params(&self) -> PageParams {
        PageParams::from(PageQuery {
            page: self.page,
            page_size: self.page_size,
        })
    }
}

/// `GET /admin/videos` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListQuery {
    /// Requested page
    pub page: Option<i64>,
    /// Requested page size
    pub page_size: Option<i64>,
    /// `exposure_module` or `community_post`
    pub source: Option<String>,
    /// Owner filter, ignored when malformed
    pub user_id: Option<String>,
    /// Exposure module filter
    pub module_id: Option<String>,
}

/// Optional `source` query used by video detail and delete
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoSourceQuery {
    /// Source to look in; all sources are probed when absent
    pub source: Option<String>,
}

/// `GET /admin/operation-logs` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationLogQuery {
    /// Requested page
    pub page: Option<i64>,
    /// Requested page size
    pub page_size: Option<i64>,
    /// Resource kind filter
    pub resource: Option<String>,
}

/// One item of a video batch delete
#[derive(Debug, Clone, Deserialize)]
pub struct VideoRef {
    /// Row id
    pub id: String,
    /// Source tag, required
    #[serde(default)]
    pub source: String,
}

/// `POST /admin/videos/batch-delete` body
#[derive(Debug, Clone, Deserialize)]
pub struct BatchDeleteVideosRequest {
    /// Videos to delete
    pub video_ids: Vec<VideoRef>,
}

/// Result of a batch delete
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchDeleteResult {
    /// Items whose video was cleared
    pub success_count: u32,
    /// Items that failed or matched nothing
    pub fail_count: u32,
}

/// Result of a step reorder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderResult {
    /// Steps whose order was written
    pub updated: u64,
}
