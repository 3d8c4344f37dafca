//! Quota ledger for CloudVault.
//!
//! Maintains the invariant that a user's `storage_used` counter equals the
//! summed size of their stored files. Credit and debit run inside the same
//! transaction as the file mutation they account for.

use sqlx::SqliteConnection;
use tracing::warn;

use crate::{Result, VaultError};

/// Default per-user storage quota (10 GiB).
pub const DEFAULT_STORAGE_LIMIT: i64 = 10_737_418_240;

/// A user's storage accounting snapshot.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageUsage {
    /// Bytes currently in use.
    pub used: i64,
    /// Quota in bytes.
    pub limit: i64,
    /// Percentage of the quota in use, rounded to 2 decimal places.
    pub percentage: f64,
}

/// Compute the used percentage, rounded to 2 decimal places.
///
/// A zero or negative limit falls back to the default quota so the rollup
/// never divides by zero.
pub fn percentage_used(used: i64, limit: i64) -> f64 {
    let limit = if limit > 0 { limit } else { DEFAULT_STORAGE_LIMIT };
    let pct = used as f64 / limit as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Ledger operations over the `users.storage_used` counter.
pub struct QuotaLedger;

impl QuotaLedger {
    /// Increase a user's storage usage by `delta` bytes.
    pub async fn credit(conn: &mut SqliteConnection, user_id: i64, delta: i64) -> Result<()> {
        let result = sqlx::query("UPDATE users SET storage_used = storage_used + ? WHERE id = ?")
            .bind(delta)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(VaultError::NotFound("user".to_string()));
        }
        Ok(())
    }

    /// Decrease a user's storage usage by `delta` bytes.
    ///
    /// Never drives the counter below zero: if the requested debit exceeds
    /// the current usage the counter is clamped to zero and a warning is
    /// logged, so the surrounding delete still succeeds.
    pub async fn debit(conn: &mut SqliteConnection, user_id: i64, delta: i64) -> Result<()> {
        let used: Option<i64> = sqlx::query_scalar("SELECT storage_used FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;

        let used = used.ok_or_else(|| VaultError::NotFound("user".to_string()))?;

        if delta > used {
            warn!(
                user_id,
                used, delta, "storage debit exceeds tracked usage, clamping to zero"
            );
        }

        sqlx::query("UPDATE users SET storage_used = MAX(0, storage_used - ?) WHERE id = ?")
            .bind(delta)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Read a user's storage usage snapshot.
    ///
    /// An unknown user degrades to zero usage against the default quota
    /// rather than failing, so read-only rollups never error on it.
    pub async fn usage(conn: &mut SqliteConnection, user_id: i64) -> Result<StorageUsage> {
        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT storage_used, storage_limit FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&mut *conn)
                .await?;

        let (used, limit) = row.unwrap_or((0, DEFAULT_STORAGE_LIMIT));
        let limit = if limit > 0 { limit } else { DEFAULT_STORAGE_LIMIT };

        Ok(StorageUsage {
            used,
            limit,
            percentage: percentage_used(used, limit),
        })
    }
}
