// ABOUTME: Voice type storage with lookups by technical code for persona validation
// ABOUTME: Also replaces the whole catalogue when the seeder is asked to reset it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use super::{column, now_timestamp, timestamp_column, uuid_column, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{NewVoiceType, VoiceType};

const VOICE_COLUMNS: &str = "id, name, type, description, enabled, created_at, updated_at";

fn row_to_voice_type(row: &SqliteRow) -> AppResult<VoiceType> {
    Ok(VoiceType {
        id: uuid_column(row, "id")?,
        name: column(row, "name")?,
        voice_type: column(row, "type")?,
        description: column(row, "description")?,
        enabled: column(row, "enabled")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

impl Database {
    /// All voice types, newest first
    pub async fn list_voice_types(&self) -> AppResult<Vec<VoiceType>> {
        let rows = sqlx::query(&format!(
            "SELECT {VOICE_COLUMNS} FROM voice_types ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list voice types: {e}")))?;

        rows.iter().map(row_to_voice_type).collect()
    }

    /// Enabled voice types ordered by name
    pub async fn list_enabled_voice_types(&self) -> AppResult<Vec<VoiceType>> {
        let rows = sqlx::query(&format!(
            "SELECT {VOICE_COLUMNS} FROM voice_types WHERE enabled = 1 ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list enabled voice types: {e}")))?;

        rows.iter().map(row_to_voice_type).collect()
    }

    /// Get a voice type by id
    pub async fn get_voice_type(&self, id: Uuid) -> AppResult<Option<VoiceType>> {
        let row = sqlx::query(&format!("SELECT {VOICE_COLUMNS} FROM voice_types WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get voice type: {e}")))?;

        row.as_ref().map(row_to_voice_type).transpose()
    }

    /// Whether `code` is used by a voice type other than `exclude`
    pub async fn voice_type_code_taken(&self, code: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM voice_types WHERE type = ?1 AND id != ?2")
                .bind(code)
                .bind(exclude.map(|id| id.to_string()).unwrap_or_default())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check voice type: {e}")))?;
        Ok(count > 0)
    }

    /// Whether an enabled voice type with `code` exists
    pub async fn voice_type_enabled(&self, code: &str) -> AppResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM voice_types WHERE type = ?1 AND enabled = 1")
                .bind(code)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to validate voice type: {e}")))?;
        Ok(count > 0)
    }

    /// Code of the oldest enabled voice type
    pub async fn first_enabled_voice_type(&self) -> AppResult<Option<String>> {
        sqlx::query_scalar(
            "SELECT type FROM voice_types WHERE enabled = 1 ORDER BY created_at ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load default voice type: {e}")))
    }

    /// Insert a validated voice type
    pub async fn create_voice_type(&self, voice: &NewVoiceType) -> AppResult<VoiceType> {
        let id = Uuid::new_v4();
        let now = now_timestamp();

        sqlx::query(
            r"
            INSERT INTO voice_types (id, name, type, description, enabled, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ",
        )
        .bind(id.to_string())
        .bind(&voice.name)
        .bind(&voice.voice_type)
        .bind(&voice.description)
        .bind(voice.enabled.unwrap_or(true))
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from(e).context("Failed to create voice type"))?;

        self.get_voice_type(id)
            .await?
            .ok_or_else(|| AppError::internal("Voice type disappeared after insert"))
    }

    /// Persist every mutable field of `voice`
    pub async fn update_voice_type(&self, voice: &VoiceType) -> AppResult<VoiceType> {
        let result = sqlx::query(
            r"
            UPDATE voice_types
            SET name = ?2, type = ?3, description = ?4, enabled = ?5, updated_at = ?6
            WHERE id = ?1
            ",
        )
        .bind(voice.id.to_string())
        .bind(&voice.name)
        .bind(&voice.voice_type)
        .bind(&voice.description)
        .bind(voice.enabled)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from(e).context("Failed to update voice type"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Voice type not found"));
        }
        self.get_voice_type(voice.id)
            .await?
            .ok_or_else(|| AppError::not_found("Voice type not found"))
    }

    /// Delete a voice type; returns whether a row was removed
    pub async fn delete_voice_type(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM voice_types WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete voice type: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert voice types whose code is not present yet; returns how many were added
    pub async fn ensure_voice_types(&self, voices: &[NewVoiceType]) -> AppResult<usize> {
        let mut added = 0;
        for voice in voices {
            if self.voice_type_code_taken(&voice.voice_type, None).await? {
                continue;
            }
            self.create_voice_type(voice).await?;
            added += 1;
        }
        Ok(added)
    }

    /// Replace the whole catalogue in one transaction
    pub async fn replace_voice_types(&self, voices: &[NewVoiceType]) -> AppResult<()> {
        let mut guard = self.begin().await?;

        sqlx::query("DELETE FROM voice_types")
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear voice types: {e}")))?;

        for voice in voices {
            let now = now_timestamp();
            sqlx::query(
                r"
                INSERT INTO voice_types (id, name, type, description, enabled, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&voice.name)
            .bind(&voice.voice_type)
            .bind(&voice.description)
            .bind(voice.enabled.unwrap_or(true))
            .bind(&now)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::from(e).context("Failed to insert voice type"))?;
        }

        guard.commit().await
    }
}
