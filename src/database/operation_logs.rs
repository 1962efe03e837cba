// ABOUTME: Append-only audit trail of admin operations
// ABOUTME: Supports paginated listing filtered by resource kind
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use super::{column, now_timestamp, timestamp_column, uuid_column, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{NewOperationLog, OperationLog};
use crate::pagination::{Page, PageParams};

fn row_to_log(row: &SqliteRow) -> AppResult<OperationLog> {
    Ok(OperationLog {
        id: uuid_column(row, "id")?,
        user_id: column(row, "user_id")?,
        username: column(row, "username")?,
        user_role: column(row, "user_role")?,
        action: column(row, "action")?,
        resource: column(row, "resource")?,
        resource_id: column(row, "resource_id")?,
        details: column(row, "details")?,
        status: column(row, "status")?,
        created_at: timestamp_column(row, "created_at")?,
    })
}

impl Database {
    /// Append an entry
    pub async fn record_operation(&self, entry: &NewOperationLog) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO operation_logs
                (id, user_id, username, user_role, action, resource, resource_id, details, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.user_id)
        .bind(&entry.username)
        .bind(&entry.user_role)
        .bind(&entry.action)
        .bind(&entry.resource)
        .bind(&entry.resource_id)
        .bind(&entry.details)
        .bind(&entry.status)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to record operation: {e}")))?;
        Ok(())
    }

    /// List entries newest first, optionally for one resource kind
    pub async fn list_operation_logs(
        &self,
        resource: Option<&str>,
        params: PageParams,
    ) -> AppResult<Page<OperationLog>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM operation_logs WHERE ?1 IS NULL OR resource = ?1")
                .bind(resource)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to count operation logs: {e}")))?;

        let rows = sqlx::query(
            r"
            SELECT id, user_id, username, user_role, action, resource, resource_id, details,
                   status, created_at
            FROM operation_logs
            WHERE ?1 IS NULL OR resource = ?1
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2 OFFSET ?3
            ",
        )
        .bind(resource)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list operation logs: {e}")))?;

        let logs = rows.iter().map(row_to_log).collect::<AppResult<Vec<_>>>()?;
        Ok(Page::new(logs, total, params))
    }
}
