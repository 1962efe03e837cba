// ABOUTME: Navigation menu model and the two-level tree node returned by list and get
// ABOUTME: Parent links are identifiers; children are attached by lookup, never by reference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{double_option, require_text};
use crate::errors::{AppError, AppResult};

/// A single menu entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Menu {
    /// Generated identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Front-end route
    pub path: String,
    /// Icon name
    pub icon: String,
    /// Parent menu, `None` for roots
    pub parent_id: Option<Uuid>,
    /// Ascending sort key
    pub sort: i32,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// A menu together with its direct children
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuNode {
    /// The menu itself
    #[serde(flatten)]
    pub menu: Menu,
    /// Direct children, ordered by `sort` then creation time
    pub children: Vec<Menu>,
}

impl MenuNode {
    /// Attach children to their roots by `parent_id`
    ///
    /// `children` must already be ordered; the order is preserved per root.
    #[must_use]
    pub fn assemble(roots: Vec<Menu>, children: Vec<Menu>) -> Vec<Self> {
        let mut by_parent: HashMap<Uuid, Vec<Menu>> = HashMap::new();
        for child in children {
            if let Some(parent_id) = child.parent_id {
                by_parent.entry(parent_id).or_default().push(child);
            }
        }

        roots
            .into_iter()
            .map(|menu| {
                let children = by_parent.remove(&menu.id).unwrap_or_default();
                Self { menu, children }
            })
            .collect()
    }
}

/// Body of `POST /admin/menus`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewMenu {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Front-end route
    #[serde(default)]
    pub path: String,
    /// Icon name
    #[serde(default)]
    pub icon: String,
    /// Optional parent
    pub parent_id: Option<Uuid>,
    /// Sort key
    #[serde(default)]
    pub sort: i32,
}

impl NewMenu {
    /// Check required fields
    pub fn validated(self) -> AppResult<Self> {
        Ok(Self {
            name: require_text(&self.name, "name")?,
            ..self
        })
    }
}

/// Body of `PUT /admin/menus/:id`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MenuPatch {
    /// New display name
    pub name: Option<String>,
    /// New route
    pub path: Option<String>,
    /// New icon
    pub icon: Option<String>,
    /// `null` moves the menu to the root level, absent leaves it unchanged
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
    /// New sort key
    pub sort: Option<i32>,
}

impl Menu {
    /// Apply a patch, rejecting a self-parent link
    pub fn apply(&mut self, patch: MenuPatch) -> AppResult<()> {
        if let Some(Some(parent_id)) = patch.parent_id {
            if parent_id == self.id {
                return Err(AppError::invalid_input("A menu cannot be its own parent"));
            }
        }
        if let Some(name) = patch.name.filter(|n| !n.trim().is_empty()) {
            self.name = name;
        }
        if let Some(path) = patch.path {
            self.path = path;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(parent_id) = patch.parent_id {
            self.parent_id = parent_id;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(name: &str, parent_id: Option<Uuid>, sort: i32) -> Menu {
        let now = Utc::now();
        Menu {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            path: format!("/{name}"),
            icon: String::new(),
            parent_id,
            sort,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_assemble_groups_children_by_parent() {
        let dashboard = menu("dashboard", None, 1);
        let users = menu("users", None, 2);
        let list = menu("user-list", Some(users.id), 1);
        let roles = menu("user-roles", Some(users.id), 2);
        let orphan = menu("orphan", Some(Uuid::new_v4()), 1);

        let tree = MenuNode::assemble(
            vec![dashboard.clone(), users.clone()],
            vec![list.clone(), roles.clone(), orphan],
        );

        assert_eq!(tree.len(), 2);
        assert!(tree[0].children.is_empty());
        assert_eq!(tree[1].menu.id, users.id);
        assert_eq!(tree[1].children, vec![list, roles]);
    }

    #[test]
    fn test_patch_rejects_self_parent() {
        let mut m = menu("settings", None, 1);
        let patch = MenuPatch {
            parent_id: Some(Some(m.id)),
            ..MenuPatch::default()
        };
        let err = m.apply(patch).unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!(m.parent_id.is_none());
    }

    #[test]
    fn test_patch_null_parent_detaches() {
        let parent = Uuid::new_v4();
        let mut m = menu("child", Some(parent), 1);

        m.apply(MenuPatch::default()).unwrap();
        assert_eq!(m.parent_id, Some(parent));

        let detach: MenuPatch = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        m.apply(detach).unwrap();
        assert!(m.parent_id.is_none());
    }
}
