// ABOUTME: Audit trail entry written by mutating admin operations
// ABOUTME: Entries are append-only and listed newest first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::operation_log::STATUS_SUCCESS;

/// A recorded admin operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationLog {
    /// Generated identifier
    pub id: Uuid,
    /// Acting user, absent for the static token
    pub user_id: Option<String>,
    /// Acting user name
    pub username: String,
    /// Acting user role
    pub user_role: String,
    /// What was done (`create`, `update`, ...)
    pub action: String,
    /// Kind of resource touched
    pub resource: String,
    /// Identifier of the touched resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Free-form details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Outcome
    pub status: String,
    /// When it happened
    pub created_at: DateTime<Utc>,
}

/// Entry to append
#[derive(Debug, Clone)]
pub struct NewOperationLog {
    /// Acting user
    pub user_id: Option<String>,
    /// Acting user name
    pub username: String,
    /// Acting user role
    pub user_role: String,
    /// Action
    pub action: String,
    /// Resource kind
    pub resource: String,
    /// Resource identifier
    pub resource_id: Option<String>,
    /// Details
    pub details: Option<String>,
    /// Outcome
    pub status: String,
}

impl NewOperationLog {
    /// Successful operation on `resource`
    #[must_use]
    pub fn success(action: &str, resource: &str, resource_id: impl Into<String>) -> Self {
        Self {
            user_id: None,
            username: String::new(),
            user_role: String::new(),
            action: action.to_owned(),
            resource: resource.to_owned(),
            resource_id: Some(resource_id.into()),
            details: None,
            status: STATUS_SUCCESS.to_owned(),
        }
    }

    /// Attach free-form details
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Record who performed the operation
    #[must_use]
    pub fn by(mut self, user_id: Option<String>, username: &str, user_role: &str) -> Self {
        self.user_id = user_id;
        self.username = username.to_owned();
        self.user_role = user_role.to_owned();
        self
    }
}
