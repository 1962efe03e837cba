// ABOUTME: Generic key/value application settings storage
// ABOUTME: Get, list, upsert and delete by key; values are opaque text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Sqlite};

use super::{column, now_timestamp, timestamp_column, Database};
use crate::errors::{AppError, AppResult};
use crate::models::AppSetting;

fn row_to_setting(row: &SqliteRow) -> AppResult<AppSetting> {
    Ok(AppSetting {
        key: column(row, "key")?,
        value: column(row, "value")?,
        description: column(row, "description")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

/// Insert or update a setting on any executor, keeping the stored
/// description when `description` is `None`
pub(super) async fn upsert_setting<'e, E>(
    executor: E,
    key: &str,
    value: &str,
    description: Option<&str>,
) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r"
        INSERT INTO app_settings (key, value, description, created_at, updated_at)
        VALUES (?1, ?2, COALESCE(?3, ''), ?4, ?4)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            description = COALESCE(?3, app_settings.description),
            updated_at = excluded.updated_at
        ",
    )
    .bind(key)
    .bind(value)
    .bind(description)
    .bind(now_timestamp())
    .execute(executor)
    .await
    .map_err(|e| AppError::database(format!("Failed to save setting '{key}': {e}")))?;
    Ok(())
}

impl Database {
    /// All settings ordered by key
    pub async fn list_app_settings(&self) -> AppResult<Vec<AppSetting>> {
        let rows = sqlx::query(
            "SELECT key, value, description, created_at, updated_at FROM app_settings ORDER BY key ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list settings: {e}")))?;

        rows.iter().map(row_to_setting).collect()
    }

    /// Get a setting by key
    pub async fn get_app_setting(&self, key: &str) -> AppResult<Option<AppSetting>> {
        let row = sqlx::query(
            r"
            SELECT key, value, description, created_at, updated_at
            FROM app_settings
            WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get setting: {e}")))?;

        row.as_ref().map(row_to_setting).transpose()
    }

    /// Insert or update a setting and return the stored row
    pub async fn set_app_setting(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> AppResult<AppSetting> {
        upsert_setting(&self.pool, key, value, description).await?;
        self.get_app_setting(key)
            .await?
            .ok_or_else(|| AppError::internal("Setting disappeared after upsert"))
    }

    /// Delete a setting; returns whether a row was removed
    pub async fn delete_app_setting(&self, key: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM app_settings WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete setting: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}
