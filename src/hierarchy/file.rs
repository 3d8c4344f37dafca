//! File metadata types and repository for CloudVault.
//!
//! Only metadata is stored; the size and MIME-like type are supplied by the
//! caller and no file bytes ever pass through this system.

use chrono::NaiveDateTime;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::Result;

/// A file record owned by a user.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Unique file ID.
    pub id: i64,
    /// Display filename.
    pub filename: String,
    /// Size in bytes (always positive).
    pub file_size: i64,
    /// MIME-like type string.
    pub file_type: String,
    /// Containing folder (None for root level).
    pub folder_id: Option<i64>,
    /// Owning user ID.
    pub user_id: i64,
    /// Favorite flag.
    pub is_favorite: bool,
    /// Optional description.
    pub description: Option<String>,
    /// When the record was created (immutable).
    pub upload_date: NaiveDateTime,
}

/// File record joined with owner and folder context.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetails {
    /// The file record fields.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub file: FileRecord,
    /// Owner display name.
    pub owner_name: String,
    /// Owner email.
    pub owner_email: String,
    /// Containing folder name, if any.
    pub folder_name: Option<String>,
}

/// Data for creating a new file record.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Display filename.
    pub filename: String,
    /// Size in bytes.
    pub file_size: i64,
    /// MIME-like type string.
    pub file_type: String,
    /// Containing folder (None for root level).
    pub folder_id: Option<i64>,
    /// Owning user ID.
    pub user_id: i64,
    /// Optional description.
    pub description: Option<String>,
}

impl NewFile {
    /// Create a new NewFile with the generic content type.
    pub fn new(user_id: i64, filename: impl Into<String>, file_size: i64) -> Self {
        Self {
            filename: filename.into(),
            file_size,
            file_type: "application/octet-stream".to_string(),
            folder_id: None,
            user_id,
            description: None,
        }
    }

    /// Set the file type.
    pub fn with_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = file_type.into();
        self
    }

    /// Set the containing folder.
    pub fn with_folder(mut self, folder_id: i64) -> Self {
        self.folder_id = Some(folder_id);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Builder for partially updating a file record.
///
/// `description` and `folder_id` use a nested Option so a field can be
/// cleared (Some(None)) or left untouched (None).
#[derive(Debug, Clone, Default)]
pub struct FileUpdate {
    /// New filename.
    pub filename: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New containing folder.
    pub folder_id: Option<Option<i64>>,
    /// New favorite flag.
    pub is_favorite: Option<bool>,
}

impl FileUpdate {
    /// Create a new FileUpdate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filename.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(|s| s.into()));
        self
    }

    /// Set the containing folder.
    pub fn folder_id(mut self, folder_id: Option<i64>) -> Self {
        self.folder_id = Some(folder_id);
        self
    }

    /// Set the favorite flag.
    pub fn is_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = Some(is_favorite);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.filename.is_none()
            && self.description.is_none()
            && self.folder_id.is_none()
            && self.is_favorite.is_none()
    }
}

/// Filter for listing a user's files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFilter {
    /// Restrict to a folder.
    pub folder_id: Option<i64>,
    /// Restrict to favorites.
    pub favorites_only: bool,
}

const FILE_COLUMNS: &str =
    "id, filename, file_size, file_type, folder_id, user_id, is_favorite, description, upload_date";

/// Escape LIKE wildcards in a search term.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Repository for file metadata operations.
pub struct FileRepository;

impl FileRepository {
    /// Create a new file record.
    pub async fn create(conn: &mut SqliteConnection, file: &NewFile) -> Result<FileRecord> {
        let result = sqlx::query(
            "INSERT INTO files (filename, file_size, file_type, folder_id, user_id, description)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&file.filename)
        .bind(file.file_size)
        .bind(&file.file_type)
        .bind(file.folder_id)
        .bind(file.user_id)
        .bind(&file.description)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        Self::get_by_id(conn, id)
            .await?
            .ok_or_else(|| crate::VaultError::NotFound("file".to_string()))
    }

    /// Get a file by ID.
    pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(file)
    }

    /// Get a file joined with its owner and folder name.
    pub async fn get_details(conn: &mut SqliteConnection, id: i64) -> Result<Option<FileDetails>> {
        let details = sqlx::query_as::<_, FileDetails>(
            "SELECT f.id, f.filename, f.file_size, f.file_type, f.folder_id, f.user_id,
                    f.is_favorite, f.description, f.upload_date,
                    u.name AS owner_name, u.email AS owner_email, fo.name AS folder_name
             FROM files f
             JOIN users u ON f.user_id = u.id
             LEFT JOIN folders fo ON f.folder_id = fo.id
             WHERE f.id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(details)
    }

    /// List a user's files, newest first, with optional filters.
    pub async fn list(
        conn: &mut SqliteConnection,
        user_id: i64,
        filter: FileFilter,
    ) -> Result<Vec<FileRecord>> {
        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE user_id = "
        ));
        query.push_bind(user_id);

        if let Some(folder_id) = filter.folder_id {
            query.push(" AND folder_id = ");
            query.push_bind(folder_id);
        }
        if filter.favorites_only {
            query.push(" AND is_favorite = 1");
        }

        query.push(" ORDER BY upload_date DESC, id DESC");

        let files = query.build_query_as::<FileRecord>().fetch_all(&mut *conn).await?;
        Ok(files)
    }

    /// List files directly inside a folder, filename ascending.
    pub async fn list_by_folder(
        conn: &mut SqliteConnection,
        folder_id: i64,
    ) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE folder_id = ? ORDER BY filename"
        ))
        .bind(folder_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(files)
    }

    /// Case-insensitive substring search over filename and description,
    /// scoped to one user, newest first.
    pub async fn search(
        conn: &mut SqliteConnection,
        user_id: i64,
        term: &str,
    ) -> Result<Vec<FileRecord>> {
        let pattern = format!("%{}%", escape_like(term));

        let files = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files
             WHERE user_id = ?
               AND (filename LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\')
             ORDER BY upload_date DESC, id DESC"
        ))
        .bind(user_id)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&mut *conn)
        .await?;

        Ok(files)
    }

    /// Update a file record.
    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        update: &FileUpdate,
    ) -> Result<Option<FileRecord>> {
        if update.is_empty() {
            return Self::get_by_id(conn, id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE files SET ");
        let mut separated = query.separated(", ");

        if let Some(ref filename) = update.filename {
            separated.push("filename = ");
            separated.push_bind_unseparated(filename);
        }

        if let Some(ref description) = update.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description.clone());
        }

        if let Some(folder_id) = update.folder_id {
            separated.push("folder_id = ");
            separated.push_bind_unseparated(folder_id);
        }

        if let Some(is_favorite) = update.is_favorite {
            separated.push("is_favorite = ");
            separated.push_bind_unseparated(is_favorite);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(&mut *conn).await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::get_by_id(conn, id).await
    }

    /// Delete a file by ID.
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// The most recently uploaded files for a user.
    pub async fn recent(
        conn: &mut SqliteConnection,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE user_id = ?
             ORDER BY upload_date DESC, id DESC LIMIT ?"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

        Ok(files)
    }

    /// Count a user's files.
    pub async fn count_by_user(conn: &mut SqliteConnection, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}
