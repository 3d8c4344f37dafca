//! Request DTOs for the Web API.
//!
//! Required fields are declared as Options and validated in the handlers
//! so a missing field yields a consistent 400 instead of a body
//! deserialization rejection.

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "null".
///
/// Wrap the field type in a double Option and mark it
/// `#[serde(default, deserialize_with = "double_option")]`: the outer
/// Option is None when the field is absent, `Some(None)` when it is
/// explicitly null.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Create folder request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: Option<String>,
    /// Parent folder; absent or null means root level.
    pub parent_folder_id: Option<i64>,
    /// Display color.
    pub color: Option<String>,
}

/// Update folder request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    /// New name.
    pub name: Option<String>,
    /// New display color.
    pub color: Option<String>,
}

/// Create file request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    /// File name.
    pub filename: Option<String>,
    /// Size in bytes.
    pub file_size: Option<i64>,
    /// MIME type.
    pub file_type: Option<String>,
    /// Containing folder; absent or null means root level.
    pub folder_id: Option<i64>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Update file request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    /// New name.
    pub filename: Option<String>,
    /// New description; explicit null clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// New containing folder; explicit null moves to root level.
    #[serde(default, deserialize_with = "double_option")]
    pub folder_id: Option<Option<i64>>,
    /// Favorite flag.
    pub is_favorite: Option<bool>,
}

/// Share file request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    /// The file to share.
    pub file_id: Option<i64>,
    /// The recipient.
    pub shared_with_user_id: Option<i64>,
    /// Access level; defaults to "view".
    pub permission: Option<String>,
}

/// Query parameters for listing folders.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderListQuery {
    /// Parent folder; absent means root level.
    pub parent_id: Option<i64>,
}

/// Query parameters for listing files.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListQuery {
    /// Restrict to a folder.
    pub folder_id: Option<i64>,
    /// Restrict to favorites.
    pub favorite: Option<bool>,
}

/// Query parameters for file search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search term.
    pub query: Option<String>,
}

/// Query parameters for the activity feed.
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// Maximum entries to return.
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_file_absent_vs_null() {
        let absent: UpdateFileRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.description.is_none());
        assert!(absent.folder_id.is_none());

        let null: UpdateFileRequest =
            serde_json::from_str(r#"{"description": null, "folderId": null}"#).unwrap();
        assert_eq!(null.description, Some(None));
        assert_eq!(null.folder_id, Some(None));

        let set: UpdateFileRequest =
            serde_json::from_str(r#"{"description": "notes", "folderId": 3}"#).unwrap();
        assert_eq!(set.description, Some(Some("notes".to_string())));
        assert_eq!(set.folder_id, Some(Some(3)));
    }

    #[test]
    fn test_create_file_missing_fields_deserialize() {
        // Missing required fields still parse; the handler rejects them
        let req: CreateFileRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(req.filename.is_none());
        assert!(req.file_size.is_none());
    }
}
