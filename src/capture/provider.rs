/// The provider boundary
///
/// The platform owns the camera UI and delivers its result asynchronously.
/// The coordinator depends only on these traits; the platform glue
/// (camera intent, webcam worker thread, test fake) lives behind them and
/// reports back through `Coordinator::resolve` with the ticket's token.

use super::types::CaptureTicket;

/// An external facility that can produce one photograph per request.
pub trait CaptureProvider: Send + Sync {
    /// Kick off a capture for the given ticket and return immediately.
    ///
    /// Providers that write straight to a file should target
    /// `ticket.output_path`; providers that only deliver an in-memory
    /// frame may ignore it. An `Err` means the capture UI could not be
    /// launched at all.
    fn begin_capture(&self, ticket: &CaptureTicket) -> Result<(), String>;
}

/// Answers whether the platform has granted the accesses a capture needs.
pub trait PermissionProbe: Send + Sync {
    fn camera_granted(&self) -> bool;
    fn storage_granted(&self) -> bool;
}

/// Probe for platforms without a runtime permission model (desktop).
pub struct GrantAll;

impl PermissionProbe for GrantAll {
    fn camera_granted(&self) -> bool {
        true
    }

    fn storage_granted(&self) -> bool {
        true
    }
}
