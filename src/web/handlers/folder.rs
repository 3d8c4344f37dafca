//! Folder handlers for the Web API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::hierarchy::{Folder, FolderContents, FolderUpdate, HierarchyService, NewFolder};
use crate::web::dto::{
    ApiResponse, CreateFolderRequest, FolderListQuery, UpdateFolderRequest,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /api/folders - List the caller's folders at a level.
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<FolderListQuery>,
) -> Result<Json<ApiResponse<Vec<Folder>>>, ApiError> {
    let folders = HierarchyService::new(&state.db)
        .list_folders(user_id, query.parent_id)
        .await?;

    Ok(Json(ApiResponse::new(folders)))
}

/// POST /api/folders - Create a folder.
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Folder>>), ApiError> {
    let name = req
        .name
        .ok_or_else(|| ApiError::bad_request("folder name is required"))?;

    let mut folder = NewFolder::new(user_id, name);
    if let Some(parent_id) = req.parent_folder_id {
        folder = folder.with_parent(parent_id);
    }
    if let Some(color) = req.color {
        folder = folder.with_color(color);
    }

    let created = HierarchyService::new(&state.db)
        .create_folder(user_id, &folder)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(created))))
}

/// GET /api/folders/:id - Get a folder with its contents.
pub async fn get_folder(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(folder_id): Path<i64>,
) -> Result<Json<ApiResponse<FolderContents>>, ApiError> {
    let contents = HierarchyService::new(&state.db).get_folder(folder_id).await?;
    if contents.folder.user_id != user_id {
        return Err(ApiError::forbidden("not the folder owner"));
    }

    Ok(Json(ApiResponse::new(contents)))
}

/// PUT /api/folders/:id - Rename or recolor a folder.
pub async fn update_folder(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(folder_id): Path<i64>,
    Json(req): Json<UpdateFolderRequest>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    let mut update = FolderUpdate::new();
    if let Some(name) = req.name {
        update = update.name(name);
    }
    if let Some(color) = req.color {
        update = update.color(color);
    }

    let updated = HierarchyService::new(&state.db)
        .update_folder(user_id, folder_id, &update)
        .await?;

    Ok(Json(ApiResponse::new(updated)))
}

/// DELETE /api/folders/:id - Delete a folder and its subtree.
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(folder_id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    HierarchyService::new(&state.db)
        .delete_folder(user_id, folder_id)
        .await?;

    Ok(Json(ApiResponse::new(serde_json::json!({
        "message": "Folder deleted successfully"
    }))))
}
