//! Database module for CloudVault.
//!
//! Provides SQLite connectivity via sqlx and migration management.

mod schema;
mod user;

pub use schema::MIGRATIONS;
pub use user::{NewUser, User, UserProfile, UserRepository};

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::Result;

/// Database wrapper for managing the SQLite pool and migrations.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a database at the specified path.
    ///
    /// The database file is created if it does not exist and migrations
    /// are applied automatically.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_pool_size(path, 5).await
    }

    /// Open a database with an explicit pool size.
    pub async fn open_with_pool_size(path: impl AsRef<Path>, max_connections: u32) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening database at {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(sqlx::Error::from)?
            .foreign_keys(true);

        // A single connection keeps every caller on the same in-memory
        // database instance.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a transaction that is going to write.
    ///
    /// SQLite starts transactions deferred: a transaction whose first
    /// statement is a read takes a snapshot, and once another writer
    /// commits, that snapshot can no longer be upgraded to a write lock.
    /// The eventual write then fails with SQLITE_BUSY without consulting
    /// the busy timeout. The no-op write below takes the write lock while
    /// the transaction is still fresh, so concurrent writers queue on the
    /// busy timeout instead.
    pub async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE schema_version SET version = version WHERE version = 0")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Get the current schema version.
    pub async fn schema_version(&self) -> Result<i64> {
        let table_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        )
        .fetch_one(&self.pool)
        .await?;

        if !table_exists {
            return Ok(0);
        }

        let version: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
                .fetch_one(&self.pool)
                .await?;

        Ok(version)
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        let current_version = self.schema_version().await?;
        let migrations = MIGRATIONS;

        if current_version as usize >= migrations.len() {
            debug!("Database is up to date (version {})", current_version);
            return Ok(());
        }

        info!(
            "Migrating database from version {} to {}",
            current_version,
            migrations.len()
        );

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version     INTEGER PRIMARY KEY,
                applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .execute(&self.pool)
        .await?;

        for (i, migration) in migrations.iter().enumerate().skip(current_version as usize) {
            let version = (i + 1) as i64;
            info!("Applying migration v{}", version);

            let mut tx = self.pool.begin().await?;
            sqlx::raw_sql(migration).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
                .bind(version)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            debug!("Migration v{} applied successfully", version);
        }

        info!(
            "Database migration complete (now at version {})",
            migrations.len()
        );
        Ok(())
    }

    /// Check if a table exists.
    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?)",
        )
        .bind(table_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(db.schema_version().await.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_migrations_applied() {
        let db = Database::open_in_memory().await.unwrap();
        let version = db.schema_version().await.unwrap();
        assert_eq!(version as usize, MIGRATIONS.len());
    }

    #[tokio::test]
    async fn test_core_tables_exist() {
        let db = Database::open_in_memory().await.unwrap();

        for table in ["users", "folders", "files", "file_shares", "activity_logs"] {
            assert!(db.table_exists(table).await.unwrap(), "missing {table}");
        }
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = Database::open_in_memory().await.unwrap();

        let fk_enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(fk_enabled, 1);
    }

    #[tokio::test]
    async fn test_open_file_database() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let db = Database::open(&db_path).await.unwrap();
            assert!(db.table_exists("users").await.unwrap());
        }

        // Reopen: migrations are not reapplied
        {
            let db = Database::open(&db_path).await.unwrap();
            assert_eq!(db.schema_version().await.unwrap() as usize, MIGRATIONS.len());
        }
    }

    #[tokio::test]
    async fn test_share_unique_constraint() {
        let db = Database::open_in_memory().await.unwrap();

        sqlx::query("INSERT INTO users (name, email, password) VALUES ('A', 'a@x', 'h'), ('B', 'b@x', 'h')")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO files (filename, file_size, user_id) VALUES ('f.txt', 10, 1)")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO file_shares (file_id, shared_by_user_id, shared_with_user_id) VALUES (1, 1, 2)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        // Duplicate (file, recipient) pair is rejected by the unique index
        let dup = sqlx::query(
            "INSERT INTO file_shares (file_id, shared_by_user_id, shared_with_user_id) VALUES (1, 1, 2)",
        )
        .execute(db.pool())
        .await;
        assert!(dup.is_err());
    }
}
