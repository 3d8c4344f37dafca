//! Folder tree and file records.

pub mod file;
pub mod folder;
pub mod service;

pub use file::{
    FileDetails, FileFilter, FileRecord, FileRepository, FileUpdate, NewFile,
};
pub use folder::{
    Folder, FolderRepository, FolderUpdate, NewFolder, SubtreeFileStats, DEFAULT_FOLDER_COLOR,
};
pub use service::{FolderContents, HierarchyService};
