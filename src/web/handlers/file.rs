//! File handlers for the Web API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::hierarchy::{
    FileDetails, FileFilter, FileRecord, FileUpdate, HierarchyService, NewFile,
};
use crate::share::SharingService;
use crate::web::dto::{
    ApiResponse, CreateFileRequest, FileListQuery, SearchQuery, UpdateFileRequest,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /api/files - List the caller's files, newest first.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<FileListQuery>,
) -> Result<Json<ApiResponse<Vec<FileRecord>>>, ApiError> {
    let filter = FileFilter {
        folder_id: query.folder_id,
        favorites_only: query.favorite.unwrap_or(false),
    };
    let files = HierarchyService::new(&state.db)
        .list_files(user_id, filter)
        .await?;

    Ok(Json(ApiResponse::new(files)))
}

/// POST /api/files - Record an uploaded file.
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateFileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FileRecord>>), ApiError> {
    let (Some(filename), Some(file_size)) = (req.filename, req.file_size) else {
        return Err(ApiError::bad_request("filename and file size are required"));
    };

    let mut file = NewFile::new(user_id, filename, file_size);
    if let Some(file_type) = req.file_type {
        file = file.with_type(file_type);
    }
    if let Some(folder_id) = req.folder_id {
        file = file.with_folder(folder_id);
    }
    if let Some(description) = req.description {
        file = file.with_description(description);
    }

    let created = HierarchyService::new(&state.db)
        .create_file(user_id, &file)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(created))))
}

/// GET /api/files/search - Search the caller's files by name or description.
pub async fn search_files(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<FileRecord>>>, ApiError> {
    let term = query.query.unwrap_or_default();
    let files = HierarchyService::new(&state.db)
        .search_files(user_id, &term)
        .await?;

    Ok(Json(ApiResponse::new(files)))
}

/// GET /api/files/:id - Get a file with its owner and folder context.
///
/// Accessible to the owner and to users the file is shared with.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<FileDetails>>, ApiError> {
    let details = HierarchyService::new(&state.db).get_file(file_id).await?;

    if details.file.user_id != user_id {
        let shared = SharingService::new(&state.db)
            .has_grant(file_id, user_id)
            .await?;
        if !shared {
            return Err(ApiError::forbidden("no access to this file"));
        }
    }

    Ok(Json(ApiResponse::new(details)))
}

/// PUT /api/files/:id - Update file metadata.
pub async fn update_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(file_id): Path<i64>,
    Json(req): Json<UpdateFileRequest>,
) -> Result<Json<ApiResponse<FileRecord>>, ApiError> {
    let mut update = FileUpdate::new();
    if let Some(filename) = req.filename {
        update = update.filename(filename);
    }
    if let Some(description) = req.description {
        update = update.description(description);
    }
    if let Some(folder_id) = req.folder_id {
        update = update.folder_id(folder_id);
    }
    if let Some(is_favorite) = req.is_favorite {
        update = update.is_favorite(is_favorite);
    }

    let updated = HierarchyService::new(&state.db)
        .update_file(user_id, file_id, &update)
        .await?;

    Ok(Json(ApiResponse::new(updated)))
}

/// DELETE /api/files/:id - Delete a file record.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    HierarchyService::new(&state.db)
        .delete_file(user_id, file_id)
        .await?;

    Ok(Json(ApiResponse::new(serde_json::json!({
        "message": "File deleted successfully"
    }))))
}
