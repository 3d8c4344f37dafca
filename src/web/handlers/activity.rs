//! Activity and dashboard handlers for the Web API.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::activity::{ActivityEntry, ActivityRepository};
use crate::stats::{DashboardStats, StatsService};
use crate::web::dto::{ActivityQuery, ApiResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;
use crate::VaultError;

/// Default number of activity entries returned.
const DEFAULT_ACTIVITY_LIMIT: i64 = 20;
/// Upper bound on requested entries.
const MAX_ACTIVITY_LIMIT: i64 = 100;

/// GET /api/activity - The caller's recent activity, newest first.
pub async fn recent_activity(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<ApiResponse<Vec<ActivityEntry>>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, MAX_ACTIVITY_LIMIT);

    let mut conn = state.db.pool().acquire().await.map_err(VaultError::from)?;
    let entries = ActivityRepository::recent(&mut conn, user_id, limit).await?;

    Ok(Json(ApiResponse::new(entries)))
}

/// GET /api/stats - Dashboard rollup for the caller.
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError> {
    let stats = StatsService::new(&state.db).dashboard(user_id).await?;

    Ok(Json(ApiResponse::new(stats)))
}
