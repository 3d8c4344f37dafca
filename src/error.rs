//! Error types for CloudVault.

use thiserror::Error;

/// Common error type for CloudVault.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Database error.
    ///
    /// Wraps errors from the underlying store. The full text is meant for
    /// server-side logs; the web layer returns a sanitized message instead.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for VaultError {
    fn from(e: sqlx::Error) -> Self {
        VaultError::Database(e.to_string())
    }
}

/// Result type alias for CloudVault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
