//! Database schema and migrations for CloudVault.
//!
//! Migrations are applied sequentially when the database is opened.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: users table
    r#"
-- Users table. Credential hashing and token issuance live in the external
-- auth layer; this core only reads identity and maintains the quota columns.
CREATE TABLE users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    password        TEXT NOT NULL,
    avatar_url      TEXT,
    storage_used    INTEGER NOT NULL DEFAULT 0 CHECK (storage_used >= 0),
    storage_limit   INTEGER NOT NULL DEFAULT 10737418240,
    last_login      TEXT,
    created_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_email ON users(email);
"#,
    // v2: folders table
    r#"
-- Folders form a forest per user; parent_folder_id NULL means root level.
CREATE TABLE folders (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT NOT NULL,
    parent_folder_id  INTEGER REFERENCES folders(id) ON DELETE CASCADE,
    user_id           INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    color             TEXT NOT NULL DEFAULT '#4f46e5',
    created_at        TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_folders_user_id ON folders(user_id);
CREATE INDEX idx_folders_parent ON folders(parent_folder_id);
"#,
    // v3: files table
    r#"
-- File metadata records. No file bytes are stored; size and type are
-- supplied metadata.
CREATE TABLE files (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    filename     TEXT NOT NULL,
    file_size    INTEGER NOT NULL CHECK (file_size > 0),
    file_type    TEXT NOT NULL DEFAULT 'application/octet-stream',
    folder_id    INTEGER REFERENCES folders(id) ON DELETE CASCADE,
    user_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    is_favorite  INTEGER NOT NULL DEFAULT 0,
    description  TEXT,
    upload_date  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_user_id ON files(user_id);
CREATE INDEX idx_files_folder_id ON files(folder_id);
CREATE INDEX idx_files_upload_date ON files(upload_date);
"#,
    // v4: file_shares table
    r#"
-- Cross-user share grants. One row per (file, recipient); a repeat grant
-- overwrites the permission.
CREATE TABLE file_shares (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id              INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    shared_by_user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    shared_with_user_id  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    permission           TEXT NOT NULL DEFAULT 'view',  -- 'view' or 'edit'
    created_at           TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(file_id, shared_with_user_id)
);

CREATE INDEX idx_file_shares_with ON file_shares(shared_with_user_id);
CREATE INDEX idx_file_shares_by ON file_shares(shared_by_user_id);
"#,
    // v5: activity_logs table
    r#"
-- Append-only audit trail. resource_name is a denormalized snapshot so
-- entries survive resource deletion.
CREATE TABLE activity_logs (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id        INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    action         TEXT NOT NULL,         -- 'created', 'uploaded', 'shared', 'deleted'
    resource_type  TEXT NOT NULL,         -- 'file' or 'folder'
    resource_id    INTEGER NOT NULL,
    resource_name  TEXT NOT NULL,
    details        TEXT,
    created_at     TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_activity_user_created ON activity_logs(user_id, created_at);
"#,
];
