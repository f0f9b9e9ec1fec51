use image::DynamicImage;
use std::fmt;
use std::path::PathBuf;

use crate::error::CaptureFailure;
use crate::store::data::Photo;

/// One issued capture request, handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTicket {
    /// Correlates the provider's eventual result with this request
    pub token: u64,
    /// Pre-allocated destination for providers that write straight to disk
    pub output_path: PathBuf,
}

impl fmt::Display for CaptureTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "capture #{} -> {}", self.token, self.output_path.display())
    }
}

/// The image a provider produced.
#[derive(Debug)]
pub enum ProviderPayload {
    /// The image was written to a file, usually the ticket's output path
    File(PathBuf),
    /// The image arrived in memory and still needs encoding to disk
    Frame(DynamicImage),
}

/// What the provider delivered for a request.
#[derive(Debug)]
pub enum ProviderOutcome {
    Captured(ProviderPayload),
    Cancelled,
    Failed(String),
}

/// Outcome events pushed to the coordinator's injected sink.
#[derive(Debug)]
pub enum CaptureEvent {
    /// Capture confirmed on disk and logged to the catalog
    Saved(Photo),
    /// The user abandoned the capture UI; nothing was logged
    Cancelled,
    /// The request ended without a record
    Failed(CaptureFailure),
}
