use std::path::PathBuf;

/// Per-user storage locations for the catalog database and captured media.
///
/// The default root lives in the user's data directory:
/// - Linux: ~/.local/share/photo-timeline
/// - macOS: ~/Library/Application Support/photo-timeline
/// - Windows: %APPDATA%\photo-timeline
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Resolve the default per-user storage root
    pub fn new() -> Self {
        let mut root = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");
        root.push("photo-timeline");
        StoragePaths { root }
    }

    /// Use an explicit root instead of the user data directory.
    /// Handy for tests and throwaway sessions.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        StoragePaths { root: root.into() }
    }

    /// Path of the catalog database file
    pub fn db_path(&self) -> PathBuf {
        self.root.join("photos.db")
    }

    /// Directory where captured media files are written
    pub fn media_dir(&self) -> PathBuf {
        self.root.join("media")
    }
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new()
    }
}
