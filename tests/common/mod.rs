//! Shared helpers for integration tests.

use axum_test::TestServer;
use cloudvault::db::{NewUser, UserRepository};
use cloudvault::web::handlers::AppState;
use cloudvault::web::router::{create_health_router, create_router};
use cloudvault::Database;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Create a test server with an in-memory database.
///
/// The returned pool shares the server's database so tests can seed and
/// inspect state directly.
pub async fn create_test_server() -> (TestServer, SqlitePool) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let pool = db.pool().clone();

    let app_state = Arc::new(AppState::new(db));
    let router = create_router(app_state, &[]).merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");
    (server, pool)
}

/// Create a user directly in the database, returning its ID.
pub async fn create_user(pool: &SqlitePool, name: &str, email: &str) -> i64 {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    UserRepository::create(&mut conn, &NewUser::new(name, email, "hashed"))
        .await
        .expect("Failed to create test user")
        .id
}

/// Read a user's storage counter.
pub async fn storage_used(pool: &SqlitePool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT storage_used FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read storage_used")
}

/// Sum the recorded sizes of a user's files.
pub async fn sum_file_sizes(pool: &SqlitePool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COALESCE(SUM(file_size), 0) FROM files WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to sum file sizes")
}
