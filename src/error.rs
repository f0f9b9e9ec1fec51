/// Error types for the photo timeline core
///
/// Every fallible operation at the storage or capture boundary returns one
/// of these kinds; raw rusqlite/io/image errors never cross the module
/// boundaries.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the durable photo catalog.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The catalog database could not be opened or its schema initialized
    #[error("could not open catalog database: {0}")]
    Open(#[source] rusqlite::Error),

    /// A read from the catalog failed
    #[error("catalog read failed: {0}")]
    Read(#[source] rusqlite::Error),

    /// A write to the catalog failed (insert or delete)
    #[error("catalog write failed: {0}")]
    Write(#[source] rusqlite::Error),

    /// The filesystem around the catalog is unavailable
    /// (data directory, export target)
    #[error("catalog storage unavailable: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a capture request did not produce a record.
///
/// Cancellation is deliberately not in here: the user backing out of the
/// camera UI is an informational outcome, not a failure (see
/// [`CaptureEvent::Cancelled`](crate::capture::types::CaptureEvent)).
#[derive(Error, Debug)]
pub enum CaptureFailure {
    /// Camera or storage permission was not granted; no capture was started
    #[error("camera or storage permission denied")]
    PermissionDenied,

    /// The capture provider reported an error or could not be launched
    #[error("capture provider error: {0}")]
    Provider(String),

    /// The provider signalled success but the file is missing or empty.
    /// Some providers report success before the image is flushed; a capture
    /// counts only once the file exists with non-zero size.
    #[error("captured file is missing or empty: {}", .0.display())]
    EmptyResult(PathBuf),

    /// An in-memory frame payload could not be encoded to disk
    #[error("could not encode captured frame: {0}")]
    Encode(#[from] image::ImageError),

    /// No result arrived within the coordinator's timeout
    #[error("capture timed out waiting for a result")]
    TimedOut,

    /// The capture succeeded but the record could not be persisted.
    /// The media file is left on disk untouched.
    #[error(transparent)]
    Store(#[from] StoreError),
}
