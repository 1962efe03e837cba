// ABOUTME: SQLite database handle, schema migrations and row decoding helpers
// ABOUTME: Each domain adds its queries in its own `impl Database` block
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! # Database Management
//!
//! A single [`Database`] wraps the sqlx `SQLite` pool. Queries are grouped by
//! domain in the submodules, each contributing an `impl Database` block.
//!
//! Timestamps are stored as RFC 3339 text with microsecond precision in UTC,
//! which keeps `ORDER BY created_at` correct with plain text comparison.
//! Identifiers are stored as hyphenated UUID text.

mod ai_roles;
mod app_settings;
mod exposure;
mod menus;
mod operation_logs;
mod roles;
pub mod transactions;
mod videos;
mod voice_types;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Decode, Row, Sqlite, SqlitePool, Type};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

pub use transactions::TransactionGuard;

/// Database manager shared by every handler
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database at `database_url` and run migrations
    ///
    /// In-memory databases are pinned to one long-lived connection, otherwise
    /// every pooled connection would see its own empty database.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL '{database_url}': {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let in_memory = is_in_memory(database_url);
        if !in_memory {
            ensure_parent_dir(options.get_filename())?;
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(in_memory, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check that a connection can run a trivial query
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Begin a transaction wrapped in a rollback-on-drop guard
    pub async fn begin(&self) -> AppResult<TransactionGuard<'static>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        Ok(TransactionGuard::new(tx))
    }

    /// Run database migrations
    pub async fn migrate(&self) -> AppResult<()> {
        // Roles and navigation
        self.migrate_permissions().await?;

        // Training content
        self.migrate_exposure().await?;

        // Voices and personas
        self.migrate_voices_and_personas().await?;

        // Settings and audit trail
        self.migrate_settings().await?;

        // Tables owned by the mobile app
        self.migrate_app_tables().await?;

        debug!("Database migrations complete");
        Ok(())
    }

    async fn run_statements(&self, statements: &[&str]) -> AppResult<()> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }

    async fn migrate_permissions(&self) -> AppResult<()> {
        self.run_statements(&[
            r"
            CREATE TABLE IF NOT EXISTS roles (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                code TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                permissions TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS menus (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                path TEXT NOT NULL DEFAULT '',
                icon TEXT NOT NULL DEFAULT '',
                parent_id TEXT REFERENCES menus(id),
                sort INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_menus_parent_id ON menus(parent_id)",
        ])
        .await
    }

    async fn migrate_exposure(&self) -> AppResult<()> {
        self.run_statements(&[
            r"
            CREATE TABLE IF NOT EXISTS exposure_modules (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                icon TEXT NOT NULL,
                color TEXT NOT NULL,
                display_order INTEGER NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT true,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS exposure_steps (
                id TEXT PRIMARY KEY,
                module_id TEXT NOT NULL REFERENCES exposure_modules(id) ON DELETE CASCADE,
                step_order INTEGER NOT NULL,
                step_type TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                guide_content TEXT NOT NULL DEFAULT '',
                scenario_list_title TEXT NOT NULL DEFAULT '',
                scenario_list_content TEXT NOT NULL DEFAULT '',
                popup_configs TEXT,
                icon TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_exposure_steps_module_id ON exposure_steps(module_id)",
        ])
        .await
    }

    async fn migrate_voices_and_personas(&self) -> AppResult<()> {
        self.run_statements(&[
            r"
            CREATE TABLE IF NOT EXISTS voice_types (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                enabled BOOLEAN NOT NULL DEFAULT true,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS ai_roles (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                system_prompt TEXT NOT NULL,
                voice_type TEXT NOT NULL DEFAULT '',
                enabled BOOLEAN NOT NULL DEFAULT true,
                version INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        ])
        .await
    }

    async fn migrate_settings(&self) -> AppResult<()> {
        self.run_statements(&[
            r"
            CREATE TABLE IF NOT EXISTS app_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS operation_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT,
                username TEXT NOT NULL,
                user_role TEXT NOT NULL,
                action TEXT NOT NULL,
                resource TEXT NOT NULL,
                resource_id TEXT,
                details TEXT,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_operation_logs_created_at ON operation_logs(created_at)",
        ])
        .await
    }

    async fn migrate_app_tables(&self) -> AppResult<()> {
        self.run_statements(&[
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS training_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                type TEXT NOT NULL,
                data TEXT,
                duration INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                content TEXT NOT NULL DEFAULT '',
                image TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_training_records_user_id ON training_records(user_id)",
            "CREATE INDEX IF NOT EXISTS idx_posts_user_id ON posts(user_id)",
        ])
        .await
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| {
                AppError::config(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            }),
        _ => Ok(()),
    }
}

/// Current time in the stored text format
pub(crate) fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Stored text format for a timestamp
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
///
/// Accepts RFC 3339 as written by this service and the naive
/// `YYYY-MM-DD HH:MM:SS` form produced by `CURRENT_TIMESTAMP`.
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::database(format!("Invalid stored timestamp: {value}")))
}

/// Decode a column, naming it in the error
pub(crate) fn column<'r, T>(row: &'r SqliteRow, name: &str) -> AppResult<T>
where
    T: Decode<'r, Sqlite> + Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| AppError::database(format!("Failed to read column '{name}': {e}")))
}

/// Decode a UUID stored as text
pub(crate) fn uuid_column(row: &SqliteRow, name: &str) -> AppResult<Uuid> {
    let text: String = column(row, name)?;
    Uuid::parse_str(&text)
        .map_err(|e| AppError::database(format!("Invalid UUID in column '{name}': {e}")))
}

/// Decode a timestamp stored as text
pub(crate) fn timestamp_column(row: &SqliteRow, name: &str) -> AppResult<DateTime<Utc>> {
    let text: String = column(row, name)?;
    parse_timestamp(&text)
}
