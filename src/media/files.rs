use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Ensure the media directory exists and return it
pub fn ensure_media_dir(media_dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(media_dir)?;
    Ok(media_dir.to_path_buf())
}

/// Allocate a destination path for a capture request.
///
/// The name embeds both the capture time and the request token
/// (`photo_20260807_140251_17.jpg`). The token alone guarantees
/// uniqueness — two requests issued within the same second get
/// different tokens; the timestamp is there for humans browsing the
/// media directory.
pub fn allocate_media_path(media_dir: &Path, token: u64, at: DateTime<Utc>) -> PathBuf {
    let stamp = at.format("%Y%m%d_%H%M%S");
    media_dir.join(format!("photo_{}_{}.jpg", stamp, token))
}

/// Whether the file exists with non-zero size.
///
/// Capture providers may report success before the image is fully
/// flushed; the record lifecycle trusts this check, not the provider.
pub fn file_is_nonempty(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}
