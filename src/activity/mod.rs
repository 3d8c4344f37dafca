//! Activity log for CloudVault.
//!
//! Every mutating operation appends exactly one entry; entries are never
//! updated or deleted, and resource names are snapshotted so the trail
//! survives resource deletion.

use chrono::NaiveDateTime;
use sqlx::SqliteConnection;

use crate::{Result, VaultError};

/// Kind of action recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    /// A folder was created.
    Created,
    /// A file record was uploaded.
    Uploaded,
    /// A file was shared with another user.
    Shared,
    /// A file or folder was deleted.
    Deleted,
}

impl ActivityAction {
    /// String form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Created => "created",
            ActivityAction::Uploaded => "uploaded",
            ActivityAction::Shared => "shared",
            ActivityAction::Deleted => "deleted",
        }
    }
}

impl std::str::FromStr for ActivityAction {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "created" => Ok(ActivityAction::Created),
            "uploaded" => Ok(ActivityAction::Uploaded),
            "shared" => Ok(ActivityAction::Shared),
            "deleted" => Ok(ActivityAction::Deleted),
            _ => Err(VaultError::Validation(format!("unknown action: {s}"))),
        }
    }
}

impl TryFrom<String> for ActivityAction {
    type Error = VaultError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Kind of resource an activity entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// A file record.
    File,
    /// A folder.
    Folder,
}

impl ResourceType {
    /// String form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::File => "file",
            ResourceType::Folder => "folder",
        }
    }
}

impl std::str::FromStr for ResourceType {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "file" => Ok(ResourceType::File),
            "folder" => Ok(ResourceType::Folder),
            _ => Err(VaultError::Validation(format!("unknown resource type: {s}"))),
        }
    }
}

impl TryFrom<String> for ResourceType {
    type Error = VaultError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// One entry in the audit trail.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// Unique entry ID.
    pub id: i64,
    /// The acting user.
    pub user_id: i64,
    /// What happened.
    #[sqlx(try_from = "String")]
    pub action: ActivityAction,
    /// Kind of resource acted on.
    #[sqlx(try_from = "String")]
    pub resource_type: ResourceType,
    /// ID of the resource at the time of the action.
    pub resource_id: i64,
    /// Name snapshot taken when the entry was written.
    pub resource_name: String,
    /// Optional free-text detail.
    pub details: Option<String>,
    /// When the entry was recorded.
    pub created_at: NaiveDateTime,
}

/// Data for appending a new activity entry.
#[derive(Debug, Clone)]
pub struct NewActivity {
    /// The acting user.
    pub user_id: i64,
    /// What happened.
    pub action: ActivityAction,
    /// Kind of resource acted on.
    pub resource_type: ResourceType,
    /// ID of the resource.
    pub resource_id: i64,
    /// Name snapshot.
    pub resource_name: String,
    /// Optional free-text detail.
    pub details: Option<String>,
}

impl NewActivity {
    /// Create a new activity entry.
    pub fn new(
        user_id: i64,
        action: ActivityAction,
        resource_type: ResourceType,
        resource_id: i64,
        resource_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            action,
            resource_type,
            resource_id,
            resource_name: resource_name.into(),
            details: None,
        }
    }

    /// Set the detail text.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Repository for the append-only activity log.
pub struct ActivityRepository;

impl ActivityRepository {
    /// Append an entry. Called by the mutating services, inside their
    /// transaction.
    pub async fn append(conn: &mut SqliteConnection, entry: &NewActivity) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO activity_logs (user_id, action, resource_type, resource_id, resource_name, details)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.user_id)
        .bind(entry.action.as_str())
        .bind(entry.resource_type.as_str())
        .bind(entry.resource_id)
        .bind(&entry.resource_name)
        .bind(&entry.details)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// List the most recent entries for a user, newest first.
    pub async fn recent(
        conn: &mut SqliteConnection,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<ActivityEntry>> {
        let entries = sqlx::query_as::<_, ActivityEntry>(
            "SELECT id, user_id, action, resource_type, resource_id, resource_name, details, created_at
             FROM activity_logs WHERE user_id = ?
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

        Ok(entries)
    }
}
