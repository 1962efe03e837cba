// ABOUTME: Role model with its permission-flag map and create/update payloads
// ABOUTME: Converts the permission list sent by the admin UI into the stored flag map
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{non_empty, require_text};
use crate::errors::AppResult;

/// Permission flags keyed by permission name
pub type PermissionFlags = BTreeMap<String, bool>;

/// Administrative role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Generated identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Technical code referenced by `users.role`
    pub code: String,
    /// Free-form description
    pub description: String,
    /// Permission flags, `"*"` grants everything
    pub permissions: PermissionFlags,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Apply a validated patch in place
    pub fn apply(&mut self, patch: RolePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(permissions) = patch.permissions {
            self.permissions = permissions_to_flags(&permissions);
        }
    }
}

/// Build the stored flag map from the permission list sent by clients
#[must_use]
pub fn permissions_to_flags(permissions: &[String]) -> PermissionFlags {
    permissions
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| (p.to_owned(), true))
        .collect()
}

/// Body of `POST /admin/roles`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewRole {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Technical code
    #[serde(default)]
    pub code: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Granted permissions
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl NewRole {
    /// Check required fields and normalize text
    pub fn validated(self) -> AppResult<Self> {
        Ok(Self {
            name: require_text(&self.name, "name")?,
            code: require_text(&self.code, "code")?,
            description: self.description,
            permissions: self.permissions,
        })
    }
}

/// Body of `PUT /admin/roles/:id`; every field is optional
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RolePatch {
    /// New display name
    pub name: Option<String>,
    /// New technical code
    pub code: Option<String>,
    /// New description
    pub description: Option<String>,
    /// Replacement permission list
    pub permissions: Option<Vec<String>>,
}

impl RolePatch {
    /// Drop empty name/code values so they never blank a stored role
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: non_empty(self.name),
            code: non_empty(self.code),
            description: self.description,
            permissions: self.permissions,
        }
    }
}
