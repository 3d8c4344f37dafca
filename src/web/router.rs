//! Router configuration for the Web API.

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_file, create_folder, dashboard_stats, delete_file, delete_folder, get_file,
    get_folder, list_files, list_folders, my_profile, my_storage, recent_activity,
    search_files, share_file, shared_by_me, shared_with_me, unshare_file, update_file,
    update_folder, AppState,
};
use super::middleware::create_cors_layer;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let folder_routes = Router::new()
        .route("/", get(list_folders).post(create_folder))
        .route(
            "/:id",
            get(get_folder).put(update_folder).delete(delete_folder),
        );

    let file_routes = Router::new()
        .route("/", get(list_files).post(create_file))
        .route("/search", get(search_files))
        .route("/:id", get(get_file).put(update_file).delete(delete_file));

    let share_routes = Router::new()
        .route("/", post(share_file))
        .route("/with-me", get(shared_with_me))
        .route("/by-me", get(shared_by_me))
        .route("/:id", delete(unshare_file));

    let user_routes = Router::new()
        .route("/me", get(my_profile))
        .route("/me/storage", get(my_storage));

    let api_routes = Router::new()
        .nest("/folders", folder_routes)
        .nest("/files", file_routes)
        .nest("/shares", share_routes)
        .nest("/users", user_routes)
        .route("/activity", get(recent_activity))
        .route("/stats", get(dashboard_stats));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
