//! Hierarchy service for CloudVault.
//!
//! High-level folder/file operations. Every mutation runs the ownership
//! check, record change, quota adjustment and activity append inside one
//! transaction, so the storage counter can never drift from the file set.

use sqlx::SqliteConnection;

use crate::activity::{ActivityAction, ActivityRepository, NewActivity, ResourceType};
use crate::quota::QuotaLedger;
use crate::{Database, Result, VaultError};

use super::file::{FileDetails, FileFilter, FileRecord, FileRepository, FileUpdate, NewFile};
use super::folder::{Folder, FolderRepository, FolderUpdate, NewFolder};

/// A folder together with its immediate contents.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FolderContents {
    /// The folder itself.
    pub folder: Folder,
    /// Immediate subfolders, name ascending.
    pub subfolders: Vec<Folder>,
    /// Files directly inside, filename ascending.
    pub files: Vec<FileRecord>,
}

/// High-level folder and file operations.
pub struct HierarchyService<'a> {
    db: &'a Database,
}

impl<'a> HierarchyService<'a> {
    /// Create a new HierarchyService.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List a user's folders under a parent (None for root).
    pub async fn list_folders(
        &self,
        user_id: i64,
        parent_id: Option<i64>,
    ) -> Result<Vec<Folder>> {
        let mut conn = self.db.pool().acquire().await?;
        FolderRepository::list(&mut conn, user_id, parent_id).await
    }

    /// Get a folder with its immediate subfolders and files.
    pub async fn get_folder(&self, folder_id: i64) -> Result<FolderContents> {
        let mut conn = self.db.pool().acquire().await?;

        let folder = FolderRepository::get_by_id(&mut conn, folder_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("folder".to_string()))?;
        let subfolders = FolderRepository::list_children(&mut conn, folder_id).await?;
        let files = FileRepository::list_by_folder(&mut conn, folder_id).await?;

        Ok(FolderContents {
            folder,
            subfolders,
            files,
        })
    }

    /// Create a folder for `actor`.
    ///
    /// The parent, when given, must exist and belong to the actor; the check
    /// runs in the same transaction as the insert.
    pub async fn create_folder(&self, actor: i64, folder: &NewFolder) -> Result<Folder> {
        if folder.name.trim().is_empty() {
            return Err(VaultError::Validation("folder name is required".to_string()));
        }
        debug_assert_eq!(folder.user_id, actor);

        let mut tx = self.db.begin_write().await?;

        if let Some(parent_id) = folder.parent_folder_id {
            require_owned_folder(&mut tx, parent_id, actor).await?;
        }

        let created = FolderRepository::create(&mut tx, folder).await?;

        ActivityRepository::append(
            &mut tx,
            &NewActivity::new(
                actor,
                ActivityAction::Created,
                ResourceType::Folder,
                created.id,
                &created.name,
            ),
        )
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Partially update a folder owned by `actor`.
    pub async fn update_folder(
        &self,
        actor: i64,
        folder_id: i64,
        update: &FolderUpdate,
    ) -> Result<Folder> {
        if update.is_empty() {
            return Err(VaultError::Validation("no fields to update".to_string()));
        }

        let mut tx = self.db.begin_write().await?;

        let folder = FolderRepository::get_by_id(&mut tx, folder_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("folder".to_string()))?;
        if folder.user_id != actor {
            return Err(VaultError::Permission("not the folder owner".to_string()));
        }

        let updated = FolderRepository::update(&mut tx, folder_id, update)
            .await?
            .ok_or_else(|| VaultError::NotFound("folder".to_string()))?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a folder owned by `actor`, cascading over the whole subtree.
    ///
    /// Contained files are removed and their summed size debited from the
    /// owner's quota in the same transaction.
    pub async fn delete_folder(&self, actor: i64, folder_id: i64) -> Result<()> {
        let mut tx = self.db.begin_write().await?;

        let folder = FolderRepository::get_by_id(&mut tx, folder_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("folder".to_string()))?;
        if folder.user_id != actor {
            return Err(VaultError::Permission("not the folder owner".to_string()));
        }

        let stats = FolderRepository::subtree_file_stats(&mut tx, folder_id).await?;
        if stats.file_count > 0 {
            FolderRepository::delete_subtree_files(&mut tx, folder_id).await?;
            QuotaLedger::debit(&mut tx, actor, stats.total_size).await?;
        }
        FolderRepository::delete(&mut tx, folder_id).await?;

        let mut entry = NewActivity::new(
            actor,
            ActivityAction::Deleted,
            ResourceType::Folder,
            folder_id,
            &folder.name,
        );
        if stats.file_count > 0 {
            entry = entry.with_details(format!("Removed {} contained file(s)", stats.file_count));
        }
        ActivityRepository::append(&mut tx, &entry).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Create a file record for `actor`, crediting the quota.
    pub async fn create_file(&self, actor: i64, file: &NewFile) -> Result<FileRecord> {
        if file.filename.trim().is_empty() {
            return Err(VaultError::Validation(
                "filename and file size are required".to_string(),
            ));
        }
        if file.file_size <= 0 {
            return Err(VaultError::Validation(
                "file size must be positive".to_string(),
            ));
        }
        debug_assert_eq!(file.user_id, actor);

        let mut tx = self.db.begin_write().await?;

        if let Some(folder_id) = file.folder_id {
            require_owned_folder(&mut tx, folder_id, actor).await?;
        }

        let created = FileRepository::create(&mut tx, file).await?;
        QuotaLedger::credit(&mut tx, actor, created.file_size).await?;

        let size_mb = created.file_size as f64 / 1024.0 / 1024.0;
        ActivityRepository::append(
            &mut tx,
            &NewActivity::new(
                actor,
                ActivityAction::Uploaded,
                ResourceType::File,
                created.id,
                &created.filename,
            )
            .with_details(format!("Uploaded {size_mb:.2} MB")),
        )
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Partially update a file owned by `actor`.
    ///
    /// A new containing folder must belong to the same owner. Moving a file
    /// never changes the quota.
    pub async fn update_file(
        &self,
        actor: i64,
        file_id: i64,
        update: &FileUpdate,
    ) -> Result<FileRecord> {
        if update.is_empty() {
            return Err(VaultError::Validation("no fields to update".to_string()));
        }

        let mut tx = self.db.begin_write().await?;

        let file = FileRepository::get_by_id(&mut tx, file_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("file".to_string()))?;
        if file.user_id != actor {
            return Err(VaultError::Permission("not the file owner".to_string()));
        }

        if let Some(Some(folder_id)) = update.folder_id {
            require_owned_folder(&mut tx, folder_id, actor).await?;
        }

        let updated = FileRepository::update(&mut tx, file_id, update)
            .await?
            .ok_or_else(|| VaultError::NotFound("file".to_string()))?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a file owned by `actor`, debiting its recorded size.
    pub async fn delete_file(&self, actor: i64, file_id: i64) -> Result<()> {
        let mut tx = self.db.begin_write().await?;

        // The size has to be read before the row goes away so the debit
        // amount is still known.
        let file = FileRepository::get_by_id(&mut tx, file_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("file".to_string()))?;
        if file.user_id != actor {
            return Err(VaultError::Permission("not the file owner".to_string()));
        }

        FileRepository::delete(&mut tx, file_id).await?;
        QuotaLedger::debit(&mut tx, actor, file.file_size).await?;

        ActivityRepository::append(
            &mut tx,
            &NewActivity::new(
                actor,
                ActivityAction::Deleted,
                ResourceType::File,
                file_id,
                &file.filename,
            ),
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// List a user's files, newest first, with optional filters.
    pub async fn list_files(&self, user_id: i64, filter: FileFilter) -> Result<Vec<FileRecord>> {
        let mut conn = self.db.pool().acquire().await?;
        FileRepository::list(&mut conn, user_id, filter).await
    }

    /// Get a file joined with its owner and folder context.
    pub async fn get_file(&self, file_id: i64) -> Result<FileDetails> {
        let mut conn = self.db.pool().acquire().await?;
        FileRepository::get_details(&mut conn, file_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("file".to_string()))
    }

    /// Search a user's files by case-insensitive substring.
    pub async fn search_files(&self, user_id: i64, query: &str) -> Result<Vec<FileRecord>> {
        if query.trim().is_empty() {
            return Err(VaultError::Validation("search query is required".to_string()));
        }

        let mut conn = self.db.pool().acquire().await?;
        FileRepository::search(&mut conn, user_id, query).await
    }
}

/// Resolve a folder and check it belongs to `actor`.
async fn require_owned_folder(
    conn: &mut SqliteConnection,
    folder_id: i64,
    actor: i64,
) -> Result<Folder> {
    let folder = FolderRepository::get_by_id(conn, folder_id)
        .await?
        .ok_or_else(|| VaultError::NotFound("folder".to_string()))?;
    if folder.user_id != actor {
        return Err(VaultError::Permission("not the folder owner".to_string()));
    }
    Ok(folder)
}
