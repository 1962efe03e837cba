// ABOUTME: AI persona storage, one row per persona with an optimistic-lock version column
// ABOUTME: Every write republishes the persona list to the `ai_simulation_roles` setting in the same transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use sqlx::sqlite::SqliteRow;
use sqlx::SqliteConnection;
use tracing::{info, warn};

use super::app_settings::upsert_setting;
use super::{column, now_timestamp, timestamp_column, Database};
use crate::constants::setting_keys::AI_SIMULATION_ROLES;
use crate::errors::{AppError, AppResult};
use crate::models::{AiRole, AiRoleDraft};

const AI_ROLE_COLUMNS: &str =
    "id, name, description, system_prompt, voice_type, enabled, version, created_at, updated_at";

const SNAPSHOT_DESCRIPTION: &str = "AI simulation persona configuration";

fn row_to_ai_role(row: &SqliteRow) -> AppResult<AiRole> {
    Ok(AiRole {
        id: column(row, "id")?,
        name: column(row, "name")?,
        description: column(row, "description")?,
        system_prompt: column(row, "system_prompt")?,
        voice_type: column(row, "voice_type")?,
        enabled: column(row, "enabled")?,
        version: column(row, "version")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

async fn fetch_ai_roles(conn: &mut SqliteConnection) -> AppResult<Vec<AiRole>> {
    let rows = sqlx::query(&format!(
        "SELECT {AI_ROLE_COLUMNS} FROM ai_roles ORDER BY created_at ASC, id ASC"
    ))
    .fetch_all(conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to list AI roles: {e}")))?;

    rows.iter().map(row_to_ai_role).collect()
}

async fn insert_ai_role(conn: &mut SqliteConnection, draft: &AiRoleDraft) -> AppResult<()> {
    let now = now_timestamp();
    sqlx::query(
        r"
        INSERT INTO ai_roles
            (id, name, description, system_prompt, voice_type, enabled, version, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)
        ",
    )
    .bind(&draft.id)
    .bind(&draft.name)
    .bind(&draft.description)
    .bind(&draft.system_prompt)
    .bind(&draft.voice_type)
    .bind(draft.enabled)
    .bind(&now)
    .execute(conn)
    .await
    .map_err(|e| AppError::from(e).context("Failed to save AI role"))?;
    Ok(())
}

/// Write the current persona list to the settings row read by the mobile app
async fn publish_snapshot(conn: &mut SqliteConnection) -> AppResult<()> {
    let roles = fetch_ai_roles(&mut *conn).await?;
    let drafts: Vec<AiRoleDraft> = roles.iter().map(AiRoleDraft::from).collect();
    let json = serde_json::to_string(&drafts)?;
    upsert_setting(conn, AI_SIMULATION_ROLES, &json, Some(SNAPSHOT_DESCRIPTION)).await
}

impl Database {
    /// All personas in creation order
    pub async fn list_ai_roles(&self) -> AppResult<Vec<AiRole>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        fetch_ai_roles(&mut conn).await
    }

    /// Get a persona by id
    pub async fn get_ai_role(&self, id: &str) -> AppResult<Option<AiRole>> {
        let row = sqlx::query(&format!("SELECT {AI_ROLE_COLUMNS} FROM ai_roles WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get AI role: {e}")))?;

        row.as_ref().map(row_to_ai_role).transpose()
    }

    /// Insert a persona; a duplicate id fails with `ResourceAlreadyExists`
    pub async fn create_ai_role(&self, draft: &AiRoleDraft) -> AppResult<AiRole> {
        let mut guard = self.begin().await?;
        insert_ai_role(guard.executor()?, draft).await?;
        publish_snapshot(guard.executor()?).await?;
        guard.commit().await?;

        self.get_ai_role(&draft.id)
            .await?
            .ok_or_else(|| AppError::internal("AI role disappeared after insert"))
    }

    /// Replace every field of a persona except its id
    ///
    /// With `expected_version` the write only happens when the stored version
    /// matches; otherwise `VersionConflict` is returned and nothing changes.
    /// Returns `None` when the persona does not exist.
    pub async fn update_ai_role(
        &self,
        draft: &AiRoleDraft,
        expected_version: Option<i64>,
    ) -> AppResult<Option<AiRole>> {
        let mut guard = self.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE ai_roles
            SET name = ?2, description = ?3, system_prompt = ?4, voice_type = ?5,
                enabled = ?6, version = version + 1, updated_at = ?7
            WHERE id = ?1 AND (?8 IS NULL OR version = ?8)
            ",
        )
        .bind(&draft.id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.system_prompt)
        .bind(&draft.voice_type)
        .bind(draft.enabled)
        .bind(now_timestamp())
        .bind(expected_version)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to update AI role: {e}")))?;

        if result.rows_affected() == 0 {
            let stored: Option<i64> = sqlx::query_scalar("SELECT version FROM ai_roles WHERE id = ?1")
                .bind(&draft.id)
                .fetch_optional(guard.executor()?)
                .await
                .map_err(|e| AppError::database(format!("Failed to get AI role: {e}")))?;

            return match (stored, expected_version) {
                (Some(stored), Some(expected)) => Err(AppError::version_conflict(format!(
                    "AI role {} was modified concurrently: expected version {expected}, found {stored}",
                    draft.id
                ))),
                _ => Ok(None),
            };
        }

        publish_snapshot(guard.executor()?).await?;
        guard.commit().await?;
        self.get_ai_role(&draft.id).await
    }

    /// Delete a persona; returns whether a row was removed
    pub async fn delete_ai_role(&self, id: &str) -> AppResult<bool> {
        let mut guard = self.begin().await?;

        let result = sqlx::query("DELETE FROM ai_roles WHERE id = ?1")
            .bind(id)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete AI role: {e}")))?;

        if result.rows_affected() == 0 {
            guard.rollback().await?;
            return Ok(false);
        }

        publish_snapshot(guard.executor()?).await?;
        guard.commit().await?;
        Ok(true)
    }

    /// Replace the whole persona collection atomically
    pub async fn replace_ai_roles(&self, drafts: &[AiRoleDraft]) -> AppResult<Vec<AiRole>> {
        let mut guard = self.begin().await?;

        sqlx::query("DELETE FROM ai_roles")
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear AI roles: {e}")))?;

        for draft in drafts {
            insert_ai_role(guard.executor()?, draft).await?;
        }

        publish_snapshot(guard.executor()?).await?;
        let roles = fetch_ai_roles(guard.executor()?).await?;
        guard.commit().await?;

        info!(count = roles.len(), "AI roles reset");
        Ok(roles)
    }

    /// Import personas from the legacy `ai_simulation_roles` setting
    ///
    /// Runs only while the table is empty. A missing setting means there is
    /// nothing to import; a malformed one is an error. Returns the number of
    /// personas imported.
    pub async fn import_legacy_ai_roles(&self) -> AppResult<usize> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ai_roles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count AI roles: {e}")))?;
        if existing > 0 {
            return Ok(0);
        }

        let Some(setting) = self.get_app_setting(AI_SIMULATION_ROLES).await? else {
            return Ok(0);
        };
        if setting.value.trim().is_empty() {
            return Ok(0);
        }

        let drafts: Vec<AiRoleDraft> = serde_json::from_str(&setting.value).map_err(|e| {
            AppError::serialization(format!("Failed to parse stored AI role configuration: {e}"))
        })?;

        let mut guard = self.begin().await?;
        let mut imported = 0;
        for draft in drafts {
            if draft.id.trim().is_empty() {
                warn!(name = %draft.name, "Skipping legacy AI role without id");
                continue;
            }
            insert_ai_role(guard.executor()?, &draft).await?;
            imported += 1;
        }
        guard.commit().await?;

        info!(imported, "Imported legacy AI roles");
        Ok(imported)
    }
}
