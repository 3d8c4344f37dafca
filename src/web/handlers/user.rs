//! User handlers for the Web API.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::{UserProfile, UserRepository};
use crate::quota::{QuotaLedger, StorageUsage};
use crate::web::dto::ApiResponse;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;
use crate::VaultError;

/// GET /api/users/me - The caller's profile with resource counts.
pub async fn my_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let mut conn = state.db.pool().acquire().await.map_err(VaultError::from)?;
    let profile = UserRepository::profile(&mut conn, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(ApiResponse::new(profile)))
}

/// GET /api/users/me/storage - The caller's quota snapshot.
pub async fn my_storage(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<StorageUsage>>, ApiError> {
    let mut conn = state.db.pool().acquire().await.map_err(VaultError::from)?;
    let usage = QuotaLedger::usage(&mut conn, user_id).await?;

    Ok(Json(ApiResponse::new(usage)))
}
