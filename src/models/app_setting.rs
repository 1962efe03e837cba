// ABOUTME: Generic key/value application setting and its upsert payload
// ABOUTME: Values are opaque text owned by whichever feature reads them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored application setting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppSetting {
    /// Unique key
    pub key: String,
    /// Opaque value
    pub value: String,
    /// What the setting controls
    pub description: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Body of `PUT /admin/app-settings/:key`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpsertAppSettingRequest {
    /// New value
    pub value: Option<String>,
    /// New description; keeps the stored one when omitted
    pub description: Option<String>,
}
