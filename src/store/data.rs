/// Shared data structures for the photo catalog
///
/// These structs represent the data model that flows between
/// the database layer and whatever presents the timeline.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single logged photo
///
/// Created only by the capture coordinator once its media file is
/// confirmed on disk; immutable afterwards until deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Unique catalog id, never reused even after deletes
    pub id: i64,
    /// Absolute path to the image file on durable storage
    pub media_path: String,
    /// Capture time as UTC epoch seconds
    pub created_at: i64,
}

impl Photo {
    /// Capture time as a UTC datetime
    pub fn created_at_utc(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.created_at, 0)
            .single()
            .unwrap_or_default()
    }

    /// Capture time formatted in the local timezone, e.g. "2026-08-07 14:02:51"
    pub fn timestamp_label(&self) -> String {
        self.created_at_utc()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }

    /// Whole minutes elapsed between capture and `now` (epoch seconds).
    /// Clamped at zero for clock skew.
    pub fn age_minutes(&self, now: i64) -> i64 {
        (now - self.created_at).max(0) / 60
    }
}
