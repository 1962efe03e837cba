// ABOUTME: Menu storage: root pagination with one level of children, and child counting
// ABOUTME: Children of a page of roots are fetched in a single IN query and grouped by parent id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

use super::{column, now_timestamp, timestamp_column, uuid_column, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{Menu, MenuNode, NewMenu};
use crate::pagination::{Page, PageParams};

const MENU_COLUMNS: &str = "id, name, path, icon, parent_id, sort, created_at, updated_at";

fn row_to_menu(row: &SqliteRow) -> AppResult<Menu> {
    let parent_id: Option<String> = column(row, "parent_id")?;
    let parent_id = parent_id
        .filter(|p| !p.is_empty())
        .map(|p| Uuid::parse_str(&p))
        .transpose()
        .map_err(|e| AppError::database(format!("Invalid parent_id: {e}")))?;

    Ok(Menu {
        id: uuid_column(row, "id")?,
        name: column(row, "name")?,
        path: column(row, "path")?,
        icon: column(row, "icon")?,
        parent_id,
        sort: column(row, "sort")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

impl Database {
    /// List root menus with their direct children
    pub async fn list_menu_tree(&self, params: PageParams) -> AppResult<Page<MenuNode>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menus WHERE parent_id IS NULL")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count menus: {e}")))?;

        let rows = sqlx::query(&format!(
            r"
            SELECT {MENU_COLUMNS} FROM menus
            WHERE parent_id IS NULL
            ORDER BY sort ASC, created_at ASC
            LIMIT ?1 OFFSET ?2
            "
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list menus: {e}")))?;

        let roots = rows.iter().map(row_to_menu).collect::<AppResult<Vec<_>>>()?;
        let root_ids: Vec<Uuid> = roots.iter().map(|m| m.id).collect();
        let children = self.children_of(&root_ids).await?;

        Ok(Page::new(MenuNode::assemble(roots, children), total, params))
    }

    /// Direct children of the given parents, ordered by sort then creation
    async fn children_of(&self, parent_ids: &[Uuid]) -> AppResult<Vec<Menu>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {MENU_COLUMNS} FROM menus WHERE parent_id IN ("));
        let mut separated = builder.separated(", ");
        for id in parent_ids {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(") ORDER BY sort ASC, created_at ASC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load child menus: {e}")))?;

        rows.iter().map(row_to_menu).collect()
    }

    /// Get one menu without children
    pub async fn get_menu(&self, id: Uuid) -> AppResult<Option<Menu>> {
        let row = sqlx::query(&format!("SELECT {MENU_COLUMNS} FROM menus WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get menu: {e}")))?;

        row.as_ref().map(row_to_menu).transpose()
    }

    /// Find a menu by name under `parent_id` (`None` for roots)
    pub async fn find_menu(&self, name: &str, parent_id: Option<Uuid>) -> AppResult<Option<Menu>> {
        let row = sqlx::query(&format!(
            r"
            SELECT {MENU_COLUMNS} FROM menus
            WHERE name = ?1 AND ((?2 IS NULL AND parent_id IS NULL) OR parent_id = ?2)
            LIMIT 1
            "
        ))
        .bind(name)
        .bind(parent_id.map(|id| id.to_string()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find menu: {e}")))?;

        row.as_ref().map(row_to_menu).transpose()
    }

    /// Get one menu with its direct children
    pub async fn get_menu_node(&self, id: Uuid) -> AppResult<Option<MenuNode>> {
        let Some(menu) = self.get_menu(id).await? else {
            return Ok(None);
        };
        let children = self.children_of(&[id]).await?;
        Ok(Some(MenuNode { menu, children }))
    }

    /// Insert a validated menu
    pub async fn create_menu(&self, menu: &NewMenu) -> AppResult<Menu> {
        let id = Uuid::new_v4();
        let now = now_timestamp();

        sqlx::query(
            r"
            INSERT INTO menus (id, name, path, icon, parent_id, sort, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ",
        )
        .bind(id.to_string())
        .bind(&menu.name)
        .bind(&menu.path)
        .bind(&menu.icon)
        .bind(menu.parent_id.map(|p| p.to_string()))
        .bind(menu.sort)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from(e).context("Failed to create menu"))?;

        self.get_menu(id)
            .await?
            .ok_or_else(|| AppError::internal("Menu disappeared after insert"))
    }

    /// Persist every mutable field of `menu`
    pub async fn update_menu(&self, menu: &Menu) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE menus
            SET name = ?2, path = ?3, icon = ?4, parent_id = ?5, sort = ?6, updated_at = ?7
            WHERE id = ?1
            ",
        )
        .bind(menu.id.to_string())
        .bind(&menu.name)
        .bind(&menu.path)
        .bind(&menu.icon)
        .bind(menu.parent_id.map(|p| p.to_string()))
        .bind(menu.sort)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from(e).context("Failed to update menu"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Menu not found"));
        }
        Ok(())
    }

    /// Number of menus whose parent is `id`
    pub async fn count_child_menus(&self, id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM menus WHERE parent_id = ?1")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count child menus: {e}")))
    }

    /// Delete a menu; returns whether a row was removed
    pub async fn delete_menu(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM menus WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from(e).context("Failed to delete menu"))?;
        Ok(result.rows_affected() > 0)
    }
}
