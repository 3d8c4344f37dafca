//! File sharing registry for CloudVault.
//!
//! Grants read ("view") or write ("edit") access on a single file to
//! another user. At most one grant exists per (file, recipient) pair;
//! re-sharing updates the permission in place.

use chrono::NaiveDateTime;
use sqlx::SqliteConnection;

use crate::activity::{ActivityAction, ActivityRepository, NewActivity, ResourceType};
use crate::db::UserRepository;
use crate::hierarchy::FileRepository;
use crate::{Database, Result, VaultError};

/// Access level of a share grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read-only access.
    View,
    /// Read and modify access.
    Edit,
}

impl Permission {
    /// String form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::View => "view",
            Permission::Edit => "edit",
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "view" => Ok(Permission::View),
            "edit" => Ok(Permission::Edit),
            _ => Err(VaultError::Validation(format!("unknown permission: {s}"))),
        }
    }
}

impl TryFrom<String> for Permission {
    type Error = VaultError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// A share grant row.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    /// Unique share ID.
    pub id: i64,
    /// The shared file.
    pub file_id: i64,
    /// The granting owner.
    pub owner_id: i64,
    /// The recipient.
    pub shared_with_user_id: i64,
    /// Access level granted.
    #[sqlx(try_from = "String")]
    pub permission: Permission,
    /// When the grant was created.
    pub created_at: NaiveDateTime,
}

/// A share joined with file metadata and the counterpart user.
///
/// For "shared with me" listings the counterpart is the owner; for
/// "shared by me" it is the recipient.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedFile {
    /// The share grant ID.
    pub share_id: i64,
    /// The shared file.
    pub file_id: i64,
    /// File name.
    pub filename: String,
    /// MIME type.
    pub file_type: String,
    /// Size in bytes.
    pub file_size: i64,
    /// Access level granted.
    #[sqlx(try_from = "String")]
    pub permission: Permission,
    /// Display name of the user on the other side of the grant.
    pub counterpart_name: String,
    /// Email of the user on the other side of the grant.
    pub counterpart_email: String,
    /// When the grant was created.
    pub shared_at: NaiveDateTime,
}

/// Repository for share grant rows.
pub struct ShareRepository;

impl ShareRepository {
    /// Insert or update a grant for (file, recipient).
    ///
    /// Relies on the UNIQUE(file_id, shared_with_user_id) constraint: a
    /// second share of the same file to the same user overwrites the
    /// permission instead of adding a row.
    pub async fn upsert(
        conn: &mut SqliteConnection,
        file_id: i64,
        owner_id: i64,
        shared_with_user_id: i64,
        permission: Permission,
    ) -> Result<Share> {
        let share = sqlx::query_as::<_, Share>(
            "INSERT INTO file_shares (file_id, shared_by_user_id, shared_with_user_id, permission)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(file_id, shared_with_user_id)
             DO UPDATE SET permission = excluded.permission
             RETURNING id, file_id, shared_by_user_id AS owner_id, shared_with_user_id, permission, created_at",
        )
        .bind(file_id)
        .bind(owner_id)
        .bind(shared_with_user_id)
        .bind(permission.as_str())
        .fetch_one(&mut *conn)
        .await?;

        Ok(share)
    }

    /// Get a grant by ID.
    pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Share>> {
        let share = sqlx::query_as::<_, Share>(
            "SELECT id, file_id, shared_by_user_id AS owner_id, shared_with_user_id, permission, created_at
             FROM file_shares WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(share)
    }

    /// Delete a grant. Returns false when no row matched.
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM file_shares WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Files shared with `user_id`, newest grant first. The counterpart
    /// columns carry the owner.
    pub async fn shared_with(
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<Vec<SharedFile>> {
        let shares = sqlx::query_as::<_, SharedFile>(
            "SELECT s.id AS share_id, f.id AS file_id, f.filename, f.file_type, f.file_size,
                    s.permission, u.name AS counterpart_name, u.email AS counterpart_email,
                    s.created_at AS shared_at
             FROM file_shares s
             JOIN files f ON f.id = s.file_id
             JOIN users u ON u.id = s.shared_by_user_id
             WHERE s.shared_with_user_id = ?
             ORDER BY s.created_at DESC, s.id DESC",
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(shares)
    }

    /// Files `user_id` has shared out, newest grant first. The counterpart
    /// columns carry the recipient.
    pub async fn shared_by(conn: &mut SqliteConnection, user_id: i64) -> Result<Vec<SharedFile>> {
        let shares = sqlx::query_as::<_, SharedFile>(
            "SELECT s.id AS share_id, f.id AS file_id, f.filename, f.file_type, f.file_size,
                    s.permission, u.name AS counterpart_name, u.email AS counterpart_email,
                    s.created_at AS shared_at
             FROM file_shares s
             JOIN files f ON f.id = s.file_id
             JOIN users u ON u.id = s.shared_with_user_id
             WHERE s.shared_by_user_id = ?
             ORDER BY s.created_at DESC, s.id DESC",
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(shares)
    }

    /// Whether `user_id` holds a grant on `file_id`.
    pub async fn has_grant(
        conn: &mut SqliteConnection,
        file_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM file_shares WHERE file_id = ? AND shared_with_user_id = ?)",
        )
        .bind(file_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(exists)
    }

    /// Count distinct files shared with `user_id`.
    pub async fn count_shared_with(conn: &mut SqliteConnection, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT file_id) FROM file_shares WHERE shared_with_user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count)
    }
}

/// High-level sharing operations.
pub struct SharingService<'a> {
    db: &'a Database,
}

impl<'a> SharingService<'a> {
    /// Create a new SharingService.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Share a file owned by `actor` with another user.
    ///
    /// Sharing with oneself or with an unknown user is rejected; only the
    /// file's owner may grant access. Re-sharing updates the existing grant.
    pub async fn share_file(
        &self,
        actor: i64,
        file_id: i64,
        shared_with_user_id: i64,
        permission: Permission,
    ) -> Result<Share> {
        if shared_with_user_id == actor {
            return Err(VaultError::Validation(
                "cannot share a file with yourself".to_string(),
            ));
        }

        let mut tx = self.db.begin_write().await?;

        let file = FileRepository::get_by_id(&mut tx, file_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("file".to_string()))?;
        if file.user_id != actor {
            return Err(VaultError::Permission("not the file owner".to_string()));
        }

        if !UserRepository::exists(&mut tx, shared_with_user_id).await? {
            return Err(VaultError::NotFound("user".to_string()));
        }

        let share =
            ShareRepository::upsert(&mut tx, file_id, actor, shared_with_user_id, permission)
                .await?;

        ActivityRepository::append(
            &mut tx,
            &NewActivity::new(
                actor,
                ActivityAction::Shared,
                ResourceType::File,
                file_id,
                &file.filename,
            )
            .with_details(format!("Shared with user {shared_with_user_id}")),
        )
        .await?;

        tx.commit().await?;
        Ok(share)
    }

    /// Revoke a grant. Only the granting owner may revoke it.
    pub async fn unshare_file(&self, actor: i64, share_id: i64) -> Result<()> {
        let mut tx = self.db.begin_write().await?;

        let share = ShareRepository::get_by_id(&mut tx, share_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("share".to_string()))?;
        if share.owner_id != actor {
            return Err(VaultError::Permission("not the share owner".to_string()));
        }

        ShareRepository::delete(&mut tx, share_id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Whether `user_id` holds a grant on `file_id`.
    pub async fn has_grant(&self, file_id: i64, user_id: i64) -> Result<bool> {
        let mut conn = self.db.pool().acquire().await?;
        ShareRepository::has_grant(&mut conn, file_id, user_id).await
    }

    /// Files other users have shared with `user_id`.
    pub async fn shared_with_me(&self, user_id: i64) -> Result<Vec<SharedFile>> {
        let mut conn = self.db.pool().acquire().await?;
        ShareRepository::shared_with(&mut conn, user_id).await
    }

    /// Files `user_id` has shared out.
    pub async fn shared_by_me(&self, user_id: i64) -> Result<Vec<SharedFile>> {
        let mut conn = self.db.pool().acquire().await?;
        ShareRepository::shared_by(&mut conn, user_id).await
    }
}
