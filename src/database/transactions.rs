// ABOUTME: RAII transaction guard for multi-statement writes
// ABOUTME: Dropping an uncommitted guard rolls the transaction back, including on unwinding panics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! Transaction management for the batch reorder and persona reset operations
//!
//! ```text
//! let mut guard = db.begin().await?;
//! sqlx::query("UPDATE exposure_steps ...").execute(guard.executor()?).await?;
//! sqlx::query("UPDATE exposure_steps ...").execute(guard.executor()?).await?;
//! guard.commit().await?; // any early `?` return drops the guard and rolls back
//! ```
//!
//! Storage errors are terminal for the request; nothing here retries.

use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// RAII guard for a `SQLite` transaction
///
/// The guard rolls back when dropped without [`TransactionGuard::commit`].
/// Because sqlx rolls back on drop, this also holds when a panic unwinds
/// through the handler.
pub struct TransactionGuard<'c> {
    transaction: Option<Transaction<'c, Sqlite>>,
}

impl<'c> TransactionGuard<'c> {
    /// Wrap a transaction obtained from `pool.begin()`
    #[must_use]
    pub fn new(transaction: Transaction<'c, Sqlite>) -> Self {
        debug!("TransactionGuard created");
        Self {
            transaction: Some(transaction),
        }
    }

    /// Commit and consume the guard
    pub async fn commit(mut self) -> AppResult<()> {
        match self.transaction.take() {
            Some(tx) => {
                tx.commit()
                    .await
                    .map_err(|e| AppError::database(format!("Transaction commit failed: {e}")))?;
                debug!("TransactionGuard committed");
                Ok(())
            }
            None => Err(AppError::internal(
                "Transaction already consumed - cannot commit",
            )),
        }
    }

    /// Roll back explicitly and consume the guard
    pub async fn rollback(mut self) -> AppResult<()> {
        match self.transaction.take() {
            Some(tx) => {
                tx.rollback()
                    .await
                    .map_err(|e| AppError::database(format!("Transaction rollback failed: {e}")))?;
                debug!("TransactionGuard rolled back explicitly");
                Ok(())
            }
            None => Err(AppError::internal(
                "Transaction already consumed - cannot rollback",
            )),
        }
    }

    /// Connection to run queries on inside the transaction
    pub fn executor(&mut self) -> AppResult<&mut SqliteConnection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit/rollback")
        })
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            warn!("TransactionGuard dropped without commit - transaction will be rolled back");
        }
    }
}
