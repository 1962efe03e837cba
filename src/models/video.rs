// ABOUTME: Unified video view over exposure training records and community posts
// ABOUTME: A tagged origin carries the source-specific metadata of each video
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::video_sources::{COMMUNITY_POST, EXPOSURE_MODULE, POST_TITLE_CHARS};
use crate::errors::{AppError, AppResult};

/// Table a video is projected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSource {
    /// `training_records.data.video_url` of exposure records
    ExposureModule,
    /// `posts.image` holding a video file
    CommunityPost,
}

impl VideoSource {
    /// Probe order used when the caller names no source
    pub const PROBE_ORDER: [Self; 2] = [Self::ExposureModule, Self::CommunityPost];

    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExposureModule => EXPOSURE_MODULE,
            Self::CommunityPost => COMMUNITY_POST,
        }
    }

    /// Parse an optional `source` query value; empty means "all sources"
    pub fn parse_filter(value: Option<&str>) -> AppResult<Option<Self>> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => text.parse().map(Some),
        }
    }

    /// Sources selected by an optional filter, in probe order
    #[must_use]
    pub fn selected(filter: Option<Self>) -> Vec<Self> {
        filter.map_or_else(|| Self::PROBE_ORDER.to_vec(), |source| vec![source])
    }
}

impl fmt::Display for VideoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            EXPOSURE_MODULE => Ok(Self::ExposureModule),
            COMMUNITY_POST => Ok(Self::CommunityPost),
            other => Err(AppError::invalid_input(format!("Invalid video source: {other}"))),
        }
    }
}

/// Source-specific metadata, serialized with a `source` tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum VideoOrigin {
    /// Video recorded during an exposure exercise
    ExposureModule {
        /// Module the exercise belongs to, if recorded
        module_id: Option<String>,
        /// Module title, or the recorded step title when the module is gone
        module_title: Option<String>,
        /// Exercise duration in seconds
        duration: i64,
    },
    /// Video attached to a community post
    CommunityPost {
        /// Post identifier
        post_id: String,
        /// Leading part of the post content
        post_title: String,
    },
}

impl VideoOrigin {
    /// Tag of this origin
    #[must_use]
    pub const fn source(&self) -> VideoSource {
        match self {
            Self::ExposureModule { .. } => VideoSource::ExposureModule,
            Self::CommunityPost { .. } => VideoSource::CommunityPost,
        }
    }
}

/// A video as shown in the admin UI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    /// Identifier of the underlying row
    pub id: String,
    /// Media URL
    pub video_url: String,
    /// Owner
    pub user_id: String,
    /// Owner name, empty when the user row is gone
    pub username: String,
    /// Human readable origin label
    pub source_detail: String,
    /// Creation time of the underlying row
    pub created_at: DateTime<Utc>,
    /// Where the video comes from
    #[serde(flatten)]
    pub origin: VideoOrigin,
}

/// Filters accepted by `GET /admin/videos`
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    /// Restrict to one source
    pub source: Option<VideoSource>,
    /// Restrict to one owner
    pub user_id: Option<Uuid>,
    /// Restrict exposure videos to one module
    pub module_id: Option<String>,
}

impl VideoFilter {
    /// Build a filter from raw query values
    ///
    /// An unknown source is rejected; a malformed `user_id` is ignored.
    pub fn from_query(
        source: Option<&str>,
        user_id: Option<&str>,
        module_id: Option<&str>,
    ) -> AppResult<Self> {
        Ok(Self {
            source: VideoSource::parse_filter(source)?,
            user_id: user_id.and_then(|id| Uuid::parse_str(id.trim()).ok()),
            module_id: module_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_owned),
        })
    }
}

/// Whether a post attachment URL points to a video file
#[must_use]
pub fn is_video_attachment(url: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)\.(webm|mp4)").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(url))
}

/// Title derived from post content: the first characters, with `...` when cut
#[must_use]
pub fn post_title(content: &str) -> String {
    if content.chars().count() > POST_TITLE_CHARS {
        let head: String = content.chars().take(POST_TITLE_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_owned()
    }
}
