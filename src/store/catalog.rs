use log::{debug, info, warn};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

use super::data::Photo;

/// The Catalog manages the SQLite database of logged photos.
/// It stores one row per capture: the media file path and the capture time.
pub struct Catalog {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl Catalog {
    /// Open (or create) the catalog database at the given path and
    /// initialize the schema.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path).map_err(StoreError::Open)?;

        let catalog = Catalog {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        catalog.init_schema()?;

        info!("Catalog initialized at {}", db_path.display());
        Ok(catalog)
    }

    /// Open the catalog, falling back to a fresh database when the existing
    /// file is corrupt or unreadable.
    ///
    /// The unreadable file is moved aside to `<db>.corrupt` so nothing is
    /// silently destroyed, and the app starts from an empty collection.
    pub fn open_or_recover(db_path: &Path) -> Result<Self, StoreError> {
        match Self::open(db_path) {
            Ok(catalog) => Ok(catalog),
            Err(err) if db_path.exists() => {
                let quarantine = db_path.with_extension("db.corrupt");
                warn!(
                    "Catalog at {} is unreadable ({}), moving aside to {} and starting fresh",
                    db_path.display(),
                    err,
                    quarantine.display()
                );
                fs::rename(db_path, &quarantine)?;
                Self::open(db_path)
            }
            Err(err) => Err(err),
        }
    }

    /// Open an in-memory catalog (tests, throwaway sessions)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Open)?;
        let catalog = Catalog {
            conn,
            db_path: None,
        };
        catalog.init_schema()?;
        Ok(catalog)
    }

    /// Initialize the database schema.
    ///
    /// AUTOINCREMENT keeps ids unique across the catalog's whole lifetime:
    /// SQLite will not hand out a deleted row's id again.
    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS photos (
                    id              INTEGER PRIMARY KEY AUTOINCREMENT,
                    media_path      TEXT NOT NULL,
                    created_at      INTEGER NOT NULL
                )",
                [],
            )
            .map_err(StoreError::Open)?;

        self.conn
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_photos_created_at
                 ON photos(created_at DESC)",
                [],
            )
            .map_err(StoreError::Open)?;

        Ok(())
    }

    /// Path of the database file, if this catalog is file-backed
    pub fn path(&self) -> Option<&PathBuf> {
        self.db_path.as_ref()
    }

    /// Number of photos in the catalog
    pub fn count(&self) -> Result<i64, StoreError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))
            .map_err(StoreError::Read)
    }

    /// Append a new photo record and return it with its allocated id.
    ///
    /// The insert is a single transactional statement: after a crash the
    /// catalog holds either the full row or no row, never a torn one.
    pub fn add(&self, media_path: &str, created_at: i64) -> Result<Photo, StoreError> {
        self.conn
            .execute(
                "INSERT INTO photos (media_path, created_at) VALUES (?1, ?2)",
                rusqlite::params![media_path, created_at],
            )
            .map_err(StoreError::Write)?;

        let photo = Photo {
            id: self.conn.last_insert_rowid(),
            media_path: media_path.to_string(),
            created_at,
        };
        debug!("Logged photo #{} at {}", photo.id, photo.media_path);
        Ok(photo)
    }

    /// All photos, newest first.
    ///
    /// Ordered by capture time descending; captures within the same second
    /// fall back to insertion order descending. Always a fresh read — the
    /// collection is a personal log, not a high-volume table.
    pub fn photos(&self) -> Result<Vec<Photo>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, media_path, created_at FROM photos
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(StoreError::Read)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Photo {
                    id: row.get(0)?,
                    media_path: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })
            .map_err(StoreError::Read)?;

        let mut photos = Vec::new();
        for photo in rows {
            photos.push(photo.map_err(StoreError::Read)?);
        }
        Ok(photos)
    }

    /// Delete the photo with the given id.
    ///
    /// Returns `Ok(false)` when no such record exists. The backing media
    /// file is removed best-effort: a file that cannot be deleted is logged
    /// and left behind, the metadata row goes away regardless.
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let media_path: Option<String> = self
            .conn
            .query_row(
                "SELECT media_path FROM photos WHERE id = ?1",
                rusqlite::params![id],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(StoreError::Read(other)),
            })?;

        let Some(media_path) = media_path else {
            return Ok(false);
        };

        self.conn
            .execute("DELETE FROM photos WHERE id = ?1", rusqlite::params![id])
            .map_err(StoreError::Write)?;

        match fs::remove_file(&media_path) {
            Ok(()) => debug!("Removed media file {}", media_path),
            Err(e) => warn!("Could not remove media file {}: {}", media_path, e),
        }

        info!("Deleted photo #{}", id);
        Ok(true)
    }

    /// Ids of photos whose media file no longer exists on disk.
    ///
    /// The metadata and the media directory drift apart when files are
    /// cleaned up externally; presenters use this to skip or flag dead rows.
    pub fn missing_media(&self) -> Result<Vec<i64>, StoreError> {
        let missing: Vec<i64> = self
            .photos()?
            .into_iter()
            .filter(|p| !Path::new(&p.media_path).exists())
            .map(|p| p.id)
            .collect();

        if !missing.is_empty() {
            warn!("{} photo(s) have missing media files", missing.len());
        }
        Ok(missing)
    }

    /// Export the whole catalog as pretty-printed JSON.
    ///
    /// Written to a temp file first and renamed into place, so a crash
    /// mid-export never leaves a half-written file at the target path.
    pub fn export_json(&self, path: &Path) -> Result<(), StoreError> {
        let photos = self.photos()?;
        let json = serde_json::to_string_pretty(&photos)
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;

        info!("Exported {} photo(s) to {}", photos.len(), path.display());
        Ok(())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Fresh scratch directory under the system temp dir
    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "photo-timeline-catalog-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_list_is_newest_first() {
        let catalog = Catalog::open_in_memory().unwrap();
        catalog.add("/tmp/a.jpg", 10).unwrap();
        catalog.add("/tmp/b.jpg", 30).unwrap();
        catalog.add("/tmp/c.jpg", 20).unwrap();

        let photos = catalog.photos().unwrap();
        let order: Vec<i64> = photos.iter().map(|p| p.created_at).collect();
        assert_eq!(order, vec![30, 20, 10]);

        // ids were assigned in insertion order 1,2,3 -> listed as 2,3,1
        let ids: Vec<i64> = photos.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_same_second_ties_break_by_insertion_order() {
        let catalog = Catalog::open_in_memory().unwrap();
        let first = catalog.add("/tmp/a.jpg", 100).unwrap();
        let second = catalog.add("/tmp/b.jpg", 100).unwrap();

        let photos = catalog.photos().unwrap();
        assert_eq!(photos[0].id, second.id);
        assert_eq!(photos[1].id, first.id);
    }

    #[test]
    fn test_ids_never_reused_after_delete() {
        let catalog = Catalog::open_in_memory().unwrap();
        let a = catalog.add("/tmp/a.jpg", 1).unwrap();
        let b = catalog.add("/tmp/b.jpg", 2).unwrap();
        assert!(catalog.delete(b.id).unwrap());

        let c = catalog.add("/tmp/c.jpg", 3).unwrap();
        assert!(c.id > b.id, "deleted id must not come back");
        assert_ne!(c.id, a.id);
    }

    #[test]
    fn test_delete_removes_record_and_reports_not_found_after() {
        let catalog = Catalog::open_in_memory().unwrap();
        let photo = catalog.add("/tmp/a.jpg", 1).unwrap();

        assert!(catalog.delete(photo.id).unwrap());
        assert!(catalog.photos().unwrap().is_empty());
        // Second delete of the same id is a no-op, not an error
        assert!(!catalog.delete(photo.id).unwrap());
    }

    #[test]
    fn test_delete_succeeds_when_media_file_is_already_gone() {
        let catalog = Catalog::open_in_memory().unwrap();
        let photo = catalog.add("/definitely/not/there.jpg", 1).unwrap();

        assert!(catalog.delete(photo.id).unwrap());
        assert!(catalog.photos().unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_media_file() {
        let dir = scratch("delete-media");
        let media = dir.join("img.jpg");
        fs::write(&media, b"jpeg bytes").unwrap();

        let catalog = Catalog::open_in_memory().unwrap();
        let photo = catalog.add(media.to_str().unwrap(), 1).unwrap();

        assert!(catalog.delete(photo.id).unwrap());
        assert!(!media.exists());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = scratch("reopen");
        let db = dir.join("photos.db");

        {
            let catalog = Catalog::open(&db).unwrap();
            catalog.add("/tmp/a.jpg", 10).unwrap();
        }

        let catalog = Catalog::open(&db).unwrap();
        assert_eq!(catalog.count().unwrap(), 1);
        assert_eq!(catalog.photos().unwrap()[0].media_path, "/tmp/a.jpg");
    }

    #[test]
    fn test_corrupt_database_recovers_empty() {
        let dir = scratch("corrupt");
        let db = dir.join("photos.db");
        fs::write(&db, b"this is not a sqlite database, not even close").unwrap();

        let catalog = Catalog::open_or_recover(&db).unwrap();
        assert_eq!(catalog.count().unwrap(), 0);
        // The broken file was moved aside, not destroyed
        assert!(db.with_extension("db.corrupt").exists());

        // And the recovered catalog is writable
        catalog.add("/tmp/a.jpg", 1).unwrap();
        assert_eq!(catalog.count().unwrap(), 1);
    }

    #[test]
    fn test_missing_media_lists_dead_rows_only() {
        let dir = scratch("missing-media");
        let live = dir.join("live.jpg");
        fs::write(&live, b"jpeg bytes").unwrap();

        let catalog = Catalog::open_in_memory().unwrap();
        let kept = catalog.add(live.to_str().unwrap(), 1).unwrap();
        let dead = catalog.add("/definitely/not/there.jpg", 2).unwrap();

        let missing = catalog.missing_media().unwrap();
        assert_eq!(missing, vec![dead.id]);
        assert!(!missing.contains(&kept.id));
    }

    #[test]
    fn test_export_json_round_trips() {
        let dir = scratch("export");
        let out = dir.join("timeline.json");

        let catalog = Catalog::open_in_memory().unwrap();
        catalog.add("/tmp/a.jpg", 10).unwrap();
        catalog.add("/tmp/b.jpg", 30).unwrap();

        catalog.export_json(&out).unwrap();

        let json = fs::read_to_string(&out).unwrap();
        let photos: Vec<Photo> = serde_json::from_str(&json).unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].media_path, "/tmp/b.jpg");
        // No stray temp file left behind
        assert!(!out.with_extension("json.tmp").exists());
    }
}
