//! Share handlers for the Web API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::share::{Permission, Share, SharedFile, SharingService};
use crate::web::dto::{ApiResponse, ShareRequest};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/shares - Share a file with another user.
pub async fn share_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<ShareRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Share>>), ApiError> {
    let (Some(file_id), Some(shared_with)) = (req.file_id, req.shared_with_user_id) else {
        return Err(ApiError::bad_request("fileId and sharedWithUserId are required"));
    };
    let permission = match req.permission.as_deref() {
        Some(raw) => raw.parse::<Permission>()?,
        None => Permission::View,
    };

    let share = SharingService::new(&state.db)
        .share_file(user_id, file_id, shared_with, permission)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(share))))
}

/// DELETE /api/shares/:id - Revoke a share grant.
pub async fn unshare_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(share_id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    SharingService::new(&state.db)
        .unshare_file(user_id, share_id)
        .await?;

    Ok(Json(ApiResponse::new(serde_json::json!({
        "message": "Share removed successfully"
    }))))
}

/// GET /api/shares/with-me - Files other users shared with the caller.
pub async fn shared_with_me(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<Vec<SharedFile>>>, ApiError> {
    let shares = SharingService::new(&state.db).shared_with_me(user_id).await?;

    Ok(Json(ApiResponse::new(shares)))
}

/// GET /api/shares/by-me - Files the caller has shared out.
pub async fn shared_by_me(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<Vec<SharedFile>>>, ApiError> {
    let shares = SharingService::new(&state.db).shared_by_me(user_id).await?;

    Ok(Json(ApiResponse::new(shares)))
}
