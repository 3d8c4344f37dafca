//! User types and repository for CloudVault.

use chrono::NaiveDateTime;
use sqlx::SqliteConnection;

use crate::Result;

/// A user account.
///
/// `password` holds the opaque credential hash managed by the external auth
/// layer; this core never interprets it.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address (unique).
    pub email: String,
    /// Credential hash (opaque).
    #[serde(skip_serializing)]
    pub password: String,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Bytes currently accounted against the quota.
    pub storage_used: i64,
    /// Storage quota in bytes.
    pub storage_limit: i64,
    /// Last login timestamp.
    pub last_login: Option<NaiveDateTime>,
    /// When the account was created.
    pub created_at: NaiveDateTime,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Credential hash supplied by the auth layer.
    pub password: String,
}

impl NewUser {
    /// Create a new NewUser.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// User row enriched with file and folder counts.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The user record.
    #[serde(flatten)]
    pub user: User,
    /// Number of files owned.
    pub file_count: i64,
    /// Number of folders owned.
    pub folder_count: i64,
}

/// Repository for user operations.
pub struct UserRepository;

impl UserRepository {
    /// Create a new user.
    pub async fn create(conn: &mut SqliteConnection, user: &NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (name, email, password) VALUES (?, ?, ?)")
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password)
            .execute(&mut *conn)
            .await?;

        let id = result.last_insert_rowid();
        Self::get_by_id(conn, id)
            .await?
            .ok_or_else(|| crate::VaultError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, avatar_url, storage_used, storage_limit,
                    last_login, created_at
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    /// Get a user by email address.
    pub async fn get_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, avatar_url, storage_used, storage_limit,
                    last_login, created_at
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    /// Check whether a user exists.
    pub async fn exists(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(exists)
    }

    /// Get a user profile with file and folder counts.
    pub async fn profile(conn: &mut SqliteConnection, id: i64) -> Result<Option<UserProfile>> {
        let Some(user) = Self::get_by_id(conn, id).await? else {
            return Ok(None);
        };

        let file_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE user_id = ?")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        let folder_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE user_id = ?")
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(Some(UserProfile {
            user,
            file_count,
            folder_count,
        }))
    }

    /// Delete a user by ID. Owned folders, files, shares and activity rows
    /// are removed by the foreign key cascade.
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_user() {
        let db = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let user = UserRepository::create(&mut conn, &NewUser::new("Alice", "alice@example.com", "hash"))
            .await
            .unwrap();

        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.storage_used, 0);
        assert_eq!(user.storage_limit, 10_737_418_240);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        UserRepository::create(&mut conn, &NewUser::new("Alice", "a@example.com", "hash"))
            .await
            .unwrap();
        let dup =
            UserRepository::create(&mut conn, &NewUser::new("Other", "a@example.com", "hash")).await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let db = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        UserRepository::create(&mut conn, &NewUser::new("Bob", "bob@example.com", "hash"))
            .await
            .unwrap();

        let found = UserRepository::get_by_email(&mut conn, "bob@example.com")
            .await
            .unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "Bob");

        let missing = UserRepository::get_by_email(&mut conn, "nobody@example.com")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_profile_counts() {
        let db = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let user = UserRepository::create(&mut conn, &NewUser::new("Carol", "c@example.com", "hash"))
            .await
            .unwrap();

        sqlx::query("INSERT INTO folders (name, user_id) VALUES ('Docs', ?)")
            .bind(user.id)
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("INSERT INTO files (filename, file_size, user_id) VALUES ('a.txt', 5, ?)")
            .bind(user.id)
            .execute(&mut *conn)
            .await
            .unwrap();

        let profile = UserRepository::profile(&mut conn, user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.file_count, 1);
        assert_eq!(profile.folder_count, 1);
    }

    #[tokio::test]
    async fn test_profile_not_found() {
        let db = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let profile = UserRepository::profile(&mut conn, 9999).await.unwrap();
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let db = setup_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let user = UserRepository::create(&mut conn, &NewUser::new("Dave", "d@example.com", "hash"))
            .await
            .unwrap();

        assert!(UserRepository::delete(&mut conn, user.id).await.unwrap());
        assert!(!UserRepository::delete(&mut conn, user.id).await.unwrap());
    }
}
