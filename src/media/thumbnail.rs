use image::imageops::FilterType;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task;

/// Size of generated thumbnails (square)
const THUMBNAIL_SIZE: u32 = 256;

/// Get the thumbnail cache directory
/// Returns ~/.cache/photo-timeline/thumbnails on Linux
pub fn get_thumbnail_cache_dir() -> PathBuf {
    let mut path = dirs_next::cache_dir()
        .or_else(dirs_next::home_dir)
        .expect("Could not determine cache directory");

    path.push("photo-timeline");
    path.push("thumbnails");

    // Ensure the directory exists
    fs::create_dir_all(&path).expect("Failed to create thumbnail cache directory");

    path
}

/// Generate a thumbnail for a captured photo
/// Returns the path to the saved thumbnail, or None if generation failed
pub fn generate_thumbnail(media_path: &Path, photo_id: i64) -> Option<PathBuf> {
    generate_thumbnail_in(media_path, photo_id, &get_thumbnail_cache_dir())
}

/// Generate a thumbnail into an explicit cache directory
pub fn generate_thumbnail_in(media_path: &Path, photo_id: i64, cache_dir: &Path) -> Option<PathBuf> {
    let img = match image::open(media_path) {
        Ok(img) => img,
        Err(e) => {
            warn!("Could not decode {} for thumbnailing: {}", media_path.display(), e);
            return None;
        }
    };

    let thumbnail = img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);
    let thumbnail_path = cache_dir.join(format!("{}.jpg", photo_id));

    if let Err(e) = thumbnail.save(&thumbnail_path) {
        warn!("Could not save thumbnail {}: {}", thumbnail_path.display(), e);
        return None;
    }

    debug!("Generated thumbnail: {}", thumbnail_path.display());
    Some(thumbnail_path)
}

/// Generate a thumbnail without blocking the caller's thread.
///
/// Decoding and resizing are CPU-bound, so the work runs on the blocking
/// pool the same way the catalog's other background jobs do.
pub async fn generate_thumbnail_async(media_path: PathBuf, photo_id: i64) -> Option<PathBuf> {
    task::spawn_blocking(move || generate_thumbnail(&media_path, photo_id))
        .await
        .unwrap_or_else(|e| {
            warn!("Thumbnail task for photo #{} failed to join: {}", photo_id, e);
            None
        })
}

/// Get the thumbnail path for a photo id (doesn't generate, just returns the expected path)
pub fn get_thumbnail_path(photo_id: i64) -> PathBuf {
    get_thumbnail_cache_dir().join(format!("{}.jpg", photo_id))
}

/// Check if a thumbnail exists for a photo id
pub fn thumbnail_exists(photo_id: i64) -> bool {
    get_thumbnail_path(photo_id).exists()
}

/// Drop the cached thumbnail for a deleted photo, if any
pub fn remove_thumbnail(photo_id: i64) {
    let path = get_thumbnail_path(photo_id);
    if path.exists() {
        if let Err(e) = fs::remove_file(&path) {
            warn!("Could not remove thumbnail {}: {}", path.display(), e);
        }
    }
}
