//! Dashboard statistics for CloudVault.
//!
//! Read-only rollups over the file, folder, share and quota tables. The
//! dashboard is advisory: sub-queries that find nothing degrade to zeroes
//! and empty lists instead of failing the whole rollup.

use sqlx::SqliteConnection;

use crate::hierarchy::{FileRecord, FileRepository};
use crate::quota::{QuotaLedger, StorageUsage};
use crate::share::ShareRepository;
use crate::{Database, Result};

/// How many recent files the dashboard shows.
const RECENT_FILES: i64 = 5;

/// Broad category a MIME type falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Images,
    Videos,
    Audio,
    Documents,
    Spreadsheets,
    Presentations,
    Other,
}

impl FileCategory {
    /// String form used in API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Images => "images",
            FileCategory::Videos => "videos",
            FileCategory::Audio => "audio",
            FileCategory::Documents => "documents",
            FileCategory::Spreadsheets => "spreadsheets",
            FileCategory::Presentations => "presentations",
            FileCategory::Other => "other",
        }
    }
}

/// All categories in presentation order.
const CATEGORIES: &[FileCategory] = &[
    FileCategory::Images,
    FileCategory::Videos,
    FileCategory::Audio,
    FileCategory::Documents,
    FileCategory::Spreadsheets,
    FileCategory::Presentations,
    FileCategory::Other,
];

/// Substring rules mapping MIME types to categories, checked in order.
/// "sheet" and "presentation" come before "document" because OOXML types
/// all contain "officedocument".
const CATEGORY_RULES: &[(&str, FileCategory)] = &[
    ("image/", FileCategory::Images),
    ("video/", FileCategory::Videos),
    ("audio/", FileCategory::Audio),
    ("pdf", FileCategory::Documents),
    ("sheet", FileCategory::Spreadsheets),
    ("excel", FileCategory::Spreadsheets),
    ("presentation", FileCategory::Presentations),
    ("powerpoint", FileCategory::Presentations),
    ("word", FileCategory::Documents),
    ("document", FileCategory::Documents),
];

/// Categorize a MIME type by case-insensitive substring match.
pub fn categorize(file_type: &str) -> FileCategory {
    let lower = file_type.to_ascii_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, category)| *category)
        .unwrap_or(FileCategory::Other)
}

/// Per-category file rollup.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    /// The category.
    pub category: FileCategory,
    /// Number of files in it.
    pub count: i64,
    /// Summed size in bytes.
    pub total_size: i64,
}

/// Resource counts shown on the dashboard.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCounts {
    /// Files owned by the user.
    pub files: i64,
    /// Folders owned by the user.
    pub folders: i64,
    /// Distinct files shared with the user.
    pub shared_with_me: i64,
}

/// The full dashboard payload for one user.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Quota snapshot.
    pub storage: StorageUsage,
    /// Owned resource counts.
    pub counts: ResourceCounts,
    /// Non-empty categories in presentation order.
    pub by_category: Vec<CategoryBreakdown>,
    /// Most recently uploaded files.
    pub recent_files: Vec<FileRecord>,
}

/// Read-only statistics rollups.
pub struct StatsService<'a> {
    db: &'a Database,
}

impl<'a> StatsService<'a> {
    /// Create a new StatsService.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Build the dashboard payload for a user.
    pub async fn dashboard(&self, user_id: i64) -> Result<DashboardStats> {
        let mut conn = self.db.pool().acquire().await?;

        let storage = QuotaLedger::usage(&mut conn, user_id).await?;
        let files = FileRepository::count_by_user(&mut conn, user_id).await?;
        let folders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;
        let shared_with_me = ShareRepository::count_shared_with(&mut conn, user_id).await?;
        let by_category = category_breakdown(&mut conn, user_id).await?;
        let recent_files = FileRepository::recent(&mut conn, user_id, RECENT_FILES).await?;

        Ok(DashboardStats {
            storage,
            counts: ResourceCounts {
                files,
                folders,
                shared_with_me,
            },
            by_category,
            recent_files,
        })
    }
}

/// Group a user's files into categories, dropping empty ones.
///
/// Categorization is done in Rust rather than SQL so the rules stay in one
/// place.
async fn category_breakdown(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<CategoryBreakdown>> {
    let rows: Vec<(String, i64, i64)> = sqlx::query_as(
        "SELECT file_type, COUNT(*), COALESCE(SUM(file_size), 0)
         FROM files WHERE user_id = ? GROUP BY file_type",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut totals: std::collections::HashMap<FileCategory, (i64, i64)> =
        std::collections::HashMap::new();
    for (file_type, count, size) in rows {
        let entry = totals.entry(categorize(&file_type)).or_default();
        entry.0 += count;
        entry.1 += size;
    }

    Ok(CATEGORIES
        .iter()
        .filter_map(|category| {
            totals.get(category).map(|(count, total_size)| CategoryBreakdown {
                category: *category,
                count: *count,
                total_size: *total_size,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::hierarchy::{HierarchyService, NewFile, NewFolder};
    use crate::share::{Permission, SharingService};

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("image/png"), FileCategory::Images);
        assert_eq!(categorize("IMAGE/JPEG"), FileCategory::Images);
        assert_eq!(categorize("video/mp4"), FileCategory::Videos);
        assert_eq!(categorize("audio/mpeg"), FileCategory::Audio);
        assert_eq!(categorize("application/pdf"), FileCategory::Documents);
        assert_eq!(
            categorize("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
            FileCategory::Documents
        );
        assert_eq!(
            categorize("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            FileCategory::Spreadsheets
        );
        assert_eq!(categorize("application/vnd.ms-excel"), FileCategory::Spreadsheets);
        assert_eq!(
            categorize("application/vnd.ms-powerpoint"),
            FileCategory::Presentations
        );
        assert_eq!(categorize("application/zip"), FileCategory::Other);
        assert_eq!(categorize(""), FileCategory::Other);
    }

    #[test]
    fn test_categorize_first_rule_wins() {
        // The pptx MIME type contains both "officedocument" and
        // "presentation"; the more specific rule is checked first.
        assert_eq!(
            categorize(
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            ),
            FileCategory::Presentations
        );
    }

    async fn setup() -> (Database, i64, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        let alice = UserRepository::create(&mut conn, &NewUser::new("Alice", "a@example.com", "h"))
            .await
            .unwrap();
        let bob = UserRepository::create(&mut conn, &NewUser::new("Bob", "b@example.com", "h"))
            .await
            .unwrap();
        let (a, b) = (alice.id, bob.id);
        drop(conn);
        (db, a, b)
    }

    #[tokio::test]
    async fn test_dashboard_empty_user() {
        let (db, alice, _) = setup().await;

        let stats = StatsService::new(&db).dashboard(alice).await.unwrap();
        assert_eq!(stats.storage.used, 0);
        assert_eq!(stats.counts.files, 0);
        assert_eq!(stats.counts.folders, 0);
        assert_eq!(stats.counts.shared_with_me, 0);
        assert!(stats.by_category.is_empty());
        assert!(stats.recent_files.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_rollup() {
        let (db, alice, bob) = setup().await;
        let hierarchy = HierarchyService::new(&db);

        hierarchy
            .create_folder(alice, &NewFolder::new(alice, "Docs"))
            .await
            .unwrap();
        hierarchy
            .create_file(alice, &NewFile::new(alice, "a.png", 100).with_type("image/png"))
            .await
            .unwrap();
        hierarchy
            .create_file(alice, &NewFile::new(alice, "b.jpg", 200).with_type("image/jpeg"))
            .await
            .unwrap();
        hierarchy
            .create_file(alice, &NewFile::new(alice, "c.pdf", 50).with_type("application/pdf"))
            .await
            .unwrap();

        let theirs = hierarchy
            .create_file(bob, &NewFile::new(bob, "d.txt", 10))
            .await
            .unwrap();
        SharingService::new(&db)
            .share_file(bob, theirs.id, alice, Permission::View)
            .await
            .unwrap();

        let stats = StatsService::new(&db).dashboard(alice).await.unwrap();
        assert_eq!(stats.storage.used, 350);
        assert_eq!(stats.counts.files, 3);
        assert_eq!(stats.counts.folders, 1);
        assert_eq!(stats.counts.shared_with_me, 1);
        assert_eq!(stats.recent_files.len(), 3);

        // Categories come out in presentation order, empty ones dropped
        assert_eq!(stats.by_category.len(), 2);
        assert_eq!(stats.by_category[0].category, FileCategory::Images);
        assert_eq!(stats.by_category[0].count, 2);
        assert_eq!(stats.by_category[0].total_size, 300);
        assert_eq!(stats.by_category[1].category, FileCategory::Documents);
        assert_eq!(stats.by_category[1].count, 1);
    }

    #[tokio::test]
    async fn test_dashboard_unknown_user_degrades() {
        let (db, _, _) = setup().await;

        let stats = StatsService::new(&db).dashboard(9999).await.unwrap();
        assert_eq!(stats.storage.used, 0);
        assert!(stats.by_category.is_empty());
    }

    #[tokio::test]
    async fn test_recent_files_capped_at_five() {
        let (db, alice, _) = setup().await;
        let hierarchy = HierarchyService::new(&db);

        for i in 0..7 {
            hierarchy
                .create_file(alice, &NewFile::new(alice, format!("f{i}.txt"), 10))
                .await
                .unwrap();
        }

        let stats = StatsService::new(&db).dashboard(alice).await.unwrap();
        assert_eq!(stats.recent_files.len(), 5);
        // Newest first
        assert_eq!(stats.recent_files[0].filename, "f6.txt");
    }
}
