//! Database transaction utilities
//!
//! Multi-statement writes (profile updates that check master data first) run
//! inside a guard that rolls back unless explicitly committed.

use anyhow::Context;
use skillreport_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};
use std::ops::{Deref, DerefMut};

/// A database transaction wrapper that rolls back on drop unless committed
///
/// # Example
///
/// ```ignore
/// use skillreport_db::db::transaction::TransactionGuard;
///
/// async fn example(pool: &sqlx::PgPool) -> Result<(), skillreport_core::AppError> {
///     let mut tx = TransactionGuard::begin(pool).await?;
///     sqlx::query("UPDATE employees SET ...").execute(&mut **tx).await?;
///     tx.commit().await
/// }
/// ```
pub struct TransactionGuard<'a> {
    transaction: Transaction<'a, Postgres>,
}

impl<'a> TransactionGuard<'a> {
    pub async fn begin(pool: &'a PgPool) -> Result<Self, AppError> {
        let transaction = pool
            .begin()
            .await
            .context("Failed to begin database transaction")?;
        Ok(Self { transaction })
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.transaction
            .commit()
            .await
            .context("Failed to commit database transaction")?;
        Ok(())
    }
}

impl<'a> Deref for TransactionGuard<'a> {
    type Target = Transaction<'a, Postgres>;

    fn deref(&self) -> &Self::Target {
        &self.transaction
    }
}

impl<'a> DerefMut for TransactionGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.transaction
    }
}
