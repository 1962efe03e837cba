// ABOUTME: Role storage: paginated listing, code uniqueness checks and usage counting
// ABOUTME: Permission flags are persisted as a JSON object in a text column
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use super::{column, now_timestamp, timestamp_column, uuid_column, Database};
use crate::errors::{AppError, AppResult};
use crate::models::role::{permissions_to_flags, PermissionFlags};
use crate::models::{NewRole, Role};
use crate::pagination::{Page, PageParams};

const ROLE_COLUMNS: &str = "id, name, code, description, permissions, created_at, updated_at";

fn row_to_role(row: &SqliteRow) -> AppResult<Role> {
    let permissions_json: String = column(row, "permissions")?;
    let permissions: PermissionFlags = serde_json::from_str(&permissions_json)
        .map_err(|e| AppError::serialization(format!("Invalid stored permissions: {e}")))?;

    Ok(Role {
        id: uuid_column(row, "id")?,
        name: column(row, "name")?,
        code: column(row, "code")?,
        description: column(row, "description")?,
        permissions,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

impl Database {
    /// List roles newest first
    pub async fn list_roles(&self, params: PageParams) -> AppResult<Page<Role>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count roles: {e}")))?;

        let rows = sqlx::query(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list roles: {e}")))?;

        let roles = rows.iter().map(row_to_role).collect::<AppResult<Vec<_>>>()?;
        Ok(Page::new(roles, total, params))
    }

    /// Get a role by id
    pub async fn get_role(&self, id: Uuid) -> AppResult<Option<Role>> {
        let row = sqlx::query(&format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get role: {e}")))?;

        row.as_ref().map(row_to_role).transpose()
    }

    /// Whether `code` is used by a role other than `exclude`
    pub async fn role_code_taken(&self, code: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM roles WHERE code = ?1 AND id != ?2")
                .bind(code)
                .bind(exclude.map(|id| id.to_string()).unwrap_or_default())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check role code: {e}")))?;
        Ok(count > 0)
    }

    /// Insert a validated role
    pub async fn create_role(&self, role: &NewRole) -> AppResult<Role> {
        let id = Uuid::new_v4();
        let now = now_timestamp();
        let permissions = serde_json::to_string(&permissions_to_flags(&role.permissions))?;

        sqlx::query(
            r"
            INSERT INTO roles (id, name, code, description, permissions, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ",
        )
        .bind(id.to_string())
        .bind(&role.name)
        .bind(&role.code)
        .bind(&role.description)
        .bind(permissions)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from(e).context("Failed to create role"))?;

        self.get_role(id)
            .await?
            .ok_or_else(|| AppError::internal("Role disappeared after insert"))
    }

    /// Persist every mutable field of `role`
    pub async fn update_role(&self, role: &Role) -> AppResult<Role> {
        let permissions = serde_json::to_string(&role.permissions)?;

        let result = sqlx::query(
            r"
            UPDATE roles
            SET name = ?2, code = ?3, description = ?4, permissions = ?5, updated_at = ?6
            WHERE id = ?1
            ",
        )
        .bind(role.id.to_string())
        .bind(&role.name)
        .bind(&role.code)
        .bind(&role.description)
        .bind(permissions)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from(e).context("Failed to update role"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Role not found"));
        }
        self.get_role(role.id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))
    }

    /// Number of users whose `role` column equals `code`
    pub async fn count_users_with_role(&self, code: &str) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?1")
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count role users: {e}")))
    }

    /// Delete a role; returns whether a row was removed
    pub async fn delete_role(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete role: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}
