//! CloudVault - multi-tenant file and folder management core.
//!
//! Stores file and folder metadata per user, keeps each user's storage
//! quota consistent with their file set, supports cross-user file
//! sharing, and records an append-only activity trail. File bytes are
//! handled elsewhere; this core manages the records and the accounting.

pub mod activity;
pub mod config;
pub mod db;
pub mod error;
pub mod hierarchy;
pub mod logging;
pub mod quota;
pub mod share;
pub mod stats;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{Result, VaultError};

pub use activity::{ActivityAction, ActivityEntry, ResourceType};
pub use hierarchy::{FileRecord, Folder, HierarchyService};
pub use quota::{QuotaLedger, StorageUsage, DEFAULT_STORAGE_LIMIT};
pub use share::{Permission, SharingService};
pub use stats::{DashboardStats, StatsService};
pub use web::WebServer;
