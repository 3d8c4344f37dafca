//! Folder types and repository for CloudVault.

use chrono::NaiveDateTime;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::Result;

/// Default folder color.
pub const DEFAULT_FOLDER_COLOR: &str = "#4f46e5";

/// A folder in a user's hierarchy.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder ID.
    pub id: i64,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root folders).
    pub parent_folder_id: Option<i64>,
    /// Owning user ID.
    pub user_id: i64,
    /// Display color (cosmetic).
    pub color: String,
    /// When the folder was created.
    pub created_at: NaiveDateTime,
}

/// Data for creating a new folder.
#[derive(Debug, Clone)]
pub struct NewFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root folders).
    pub parent_folder_id: Option<i64>,
    /// Owning user ID.
    pub user_id: i64,
    /// Display color.
    pub color: String,
}

impl NewFolder {
    /// Create a new NewFolder with the default color.
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_folder_id: None,
            user_id,
            color: DEFAULT_FOLDER_COLOR.to_string(),
        }
    }

    /// Set the parent folder.
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_folder_id = Some(parent_id);
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Builder for updating a folder.
///
/// Parents are fixed at creation time, which keeps the forest acyclic
/// without a reachability check.
#[derive(Debug, Clone, Default)]
pub struct FolderUpdate {
    /// New folder name.
    pub name: Option<String>,
    /// New color.
    pub color: Option<String>,
}

impl FolderUpdate {
    /// Create a new FolderUpdate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the color.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

/// Aggregate over the files contained in a folder subtree.
#[derive(Debug, Clone, Copy)]
pub struct SubtreeFileStats {
    /// Number of files in the subtree.
    pub file_count: i64,
    /// Total bytes of those files.
    pub total_size: i64,
}

/// Repository for folder operations.
pub struct FolderRepository;

impl FolderRepository {
    /// Create a new folder.
    pub async fn create(conn: &mut SqliteConnection, folder: &NewFolder) -> Result<Folder> {
        let result = sqlx::query(
            "INSERT INTO folders (name, parent_folder_id, user_id, color) VALUES (?, ?, ?, ?)",
        )
        .bind(&folder.name)
        .bind(folder.parent_folder_id)
        .bind(folder.user_id)
        .bind(&folder.color)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        Self::get_by_id(conn, id)
            .await?
            .ok_or_else(|| crate::VaultError::NotFound("folder".to_string()))
    }

    /// Get a folder by ID.
    pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(
            "SELECT id, name, parent_folder_id, user_id, color, created_at
             FROM folders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(folder)
    }

    /// List a user's folders under a parent (None for root), name ascending.
    pub async fn list(
        conn: &mut SqliteConnection,
        user_id: i64,
        parent_id: Option<i64>,
    ) -> Result<Vec<Folder>> {
        let folders = match parent_id {
            Some(parent_id) => {
                sqlx::query_as::<_, Folder>(
                    "SELECT id, name, parent_folder_id, user_id, color, created_at
                     FROM folders WHERE user_id = ? AND parent_folder_id = ? ORDER BY name",
                )
                .bind(user_id)
                .bind(parent_id)
                .fetch_all(&mut *conn)
                .await?
            }
            None => {
                sqlx::query_as::<_, Folder>(
                    "SELECT id, name, parent_folder_id, user_id, color, created_at
                     FROM folders WHERE user_id = ? AND parent_folder_id IS NULL ORDER BY name",
                )
                .bind(user_id)
                .fetch_all(&mut *conn)
                .await?
            }
        };

        Ok(folders)
    }

    /// List immediate subfolders of a folder, name ascending.
    pub async fn list_children(conn: &mut SqliteConnection, folder_id: i64) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(
            "SELECT id, name, parent_folder_id, user_id, color, created_at
             FROM folders WHERE parent_folder_id = ? ORDER BY name",
        )
        .bind(folder_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(folders)
    }

    /// Update a folder.
    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        update: &FolderUpdate,
    ) -> Result<Option<Folder>> {
        if update.is_empty() {
            return Self::get_by_id(conn, id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE folders SET ");
        let mut separated = query.separated(", ");

        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }

        if let Some(ref color) = update.color {
            separated.push("color = ");
            separated.push_bind_unseparated(color);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(&mut *conn).await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::get_by_id(conn, id).await
    }

    /// Delete a folder row. Descendant folders go with it via the
    /// parent-reference cascade; contained files must be handled by the
    /// caller first so the quota stays accounted.
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Aggregate count and total size of all files in a folder's subtree.
    pub async fn subtree_file_stats(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<SubtreeFileStats> {
        let (file_count, total_size): (i64, i64) = sqlx::query_as(
            "WITH RECURSIVE subtree(id) AS (
                 SELECT id FROM folders WHERE id = ?
                 UNION ALL
                 SELECT f.id FROM folders f JOIN subtree s ON f.parent_folder_id = s.id
             )
             SELECT COUNT(*), COALESCE(SUM(file_size), 0)
             FROM files WHERE folder_id IN (SELECT id FROM subtree)",
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(SubtreeFileStats {
            file_count,
            total_size,
        })
    }

    /// Delete every file contained in a folder's subtree. Returns the number
    /// of rows removed.
    pub async fn delete_subtree_files(conn: &mut SqliteConnection, id: i64) -> Result<u64> {
        let result = sqlx::query(
            "WITH RECURSIVE subtree(id) AS (
                 SELECT id FROM folders WHERE id = ?
                 UNION ALL
                 SELECT f.id FROM folders f JOIN subtree s ON f.parent_folder_id = s.id
             )
             DELETE FROM files WHERE folder_id IN (SELECT id FROM subtree)",
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }
}
