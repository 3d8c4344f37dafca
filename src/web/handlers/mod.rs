//! API handlers for the Web API.

pub mod activity;
pub mod file;
pub mod folder;
pub mod share;
pub mod user;

pub use activity::*;
pub use file::*;
pub use folder::*;
pub use share::*;
pub use user::*;

use crate::Database;

/// Shared application state.
pub struct AppState {
    /// Database handle.
    pub db: Database,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}
