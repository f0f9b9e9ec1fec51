use chrono::Utc;
use crossbeam_channel::Sender;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::error::CaptureFailure;
use crate::media::files;
use crate::store::catalog::Catalog;
use crate::store::data::Photo;

use super::provider::{CaptureProvider, PermissionProbe};
use super::types::{CaptureEvent, CaptureTicket, ProviderOutcome, ProviderPayload};

/// How long a request may sit unanswered before it is expired with a
/// timeout failure and the slot freed for the next capture.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The single in-flight request slot
struct PendingCapture {
    token: u64,
    output_path: PathBuf,
}

/// State the watchdog timers share with the coordinator
struct Shared {
    pending: Mutex<Option<PendingCapture>>,
    events: Sender<CaptureEvent>,
}

impl Shared {
    fn slot(&self) -> MutexGuard<'_, Option<PendingCapture>> {
        // A panic while holding the slot leaves plain data behind;
        // keep going rather than poisoning every later capture
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Free the slot if it still carries this token
    fn clear_if_current(&self, token: u64) -> bool {
        let mut slot = self.slot();
        match slot.as_ref() {
            Some(p) if p.token == token => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    fn emit(&self, event: CaptureEvent) {
        if self.events.send(event).is_err() {
            warn!("Capture event dropped: sink disconnected");
        }
    }

    fn expire(&self, token: u64) {
        if self.clear_if_current(token) {
            warn!("Capture #{} timed out with no provider result", token);
            self.emit(CaptureEvent::Failed(CaptureFailure::TimedOut));
        }
    }
}

/// Drives the external capture provider and turns its results into
/// catalog records.
///
/// At most one request is in flight; a second `request_capture` replaces
/// the pending one and any late result for the old token is discarded.
/// Every delivery path ends back in the idle state — a failed capture
/// never wedges the next one.
pub struct Coordinator {
    provider: Box<dyn CaptureProvider>,
    permissions: Box<dyn PermissionProbe>,
    catalog: Arc<Mutex<Catalog>>,
    media_dir: PathBuf,
    timeout: Duration,
    next_token: AtomicU64,
    shared: Arc<Shared>,
}

impl Coordinator {
    pub fn new(
        provider: Box<dyn CaptureProvider>,
        permissions: Box<dyn PermissionProbe>,
        catalog: Arc<Mutex<Catalog>>,
        events: Sender<CaptureEvent>,
        media_dir: PathBuf,
    ) -> Self {
        if let Err(e) = files::ensure_media_dir(&media_dir) {
            // Captures will fail their post-condition later; the app
            // stays usable for browsing and deleting
            warn!(
                "Could not create media directory {}: {}",
                media_dir.display(),
                e
            );
        }

        Coordinator {
            provider,
            permissions,
            catalog,
            media_dir,
            timeout: DEFAULT_TIMEOUT,
            next_token: AtomicU64::new(0),
            shared: Arc::new(Shared {
                pending: Mutex::new(None),
                events,
            }),
        }
    }

    /// Override the capture timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// True when no capture request is awaiting a result
    pub fn is_idle(&self) -> bool {
        self.shared.slot().is_none()
    }

    /// Ask the provider for a photograph. Returns the request token
    /// immediately; the outcome arrives later on the event sink.
    ///
    /// A request issued while another is pending supersedes it: the old
    /// token goes stale and its eventual result will be ignored.
    pub fn request_capture(&self) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed) + 1;

        if !self.permissions.camera_granted() || !self.permissions.storage_granted() {
            warn!("Capture #{} refused: permission not granted", token);
            self.shared
                .emit(CaptureEvent::Failed(CaptureFailure::PermissionDenied));
            return token;
        }

        let output_path = files::allocate_media_path(&self.media_dir, token, Utc::now());
        let ticket = CaptureTicket {
            token,
            output_path: output_path.clone(),
        };

        {
            let mut slot = self.shared.slot();
            if let Some(old) = slot.replace(PendingCapture { token, output_path }) {
                warn!(
                    "Capture #{} superseded by #{} before it resolved",
                    old.token, token
                );
            }
        }

        if let Err(e) = self.provider.begin_capture(&ticket) {
            self.shared.clear_if_current(token);
            warn!("Capture #{} could not be launched: {}", token, e);
            self.shared
                .emit(CaptureEvent::Failed(CaptureFailure::Provider(e)));
            return token;
        }

        debug!("Requested {}", ticket);
        self.spawn_watchdog(token);
        token
    }

    /// Deliver the provider's result for a request.
    ///
    /// This is the platform callback entry point, possibly invoked from a
    /// different thread than `request_capture`. The token check and the
    /// transition back to idle happen under one lock, so a result can
    /// never be matched against a newer request's slot.
    pub fn resolve(&self, token: u64, outcome: ProviderOutcome) {
        let pending = {
            let mut slot = self.shared.slot();
            match slot.take() {
                Some(p) if p.token == token => p,
                other => {
                    // Not ours: put the current request back untouched
                    *slot = other;
                    debug!("Discarding result for stale capture token {}", token);
                    return;
                }
            }
        };

        match outcome {
            ProviderOutcome::Cancelled => {
                info!("Capture #{} cancelled", token);
                self.shared.emit(CaptureEvent::Cancelled);
            }
            ProviderOutcome::Failed(reason) => {
                warn!("Capture #{} failed in provider: {}", token, reason);
                self.shared
                    .emit(CaptureEvent::Failed(CaptureFailure::Provider(reason)));
            }
            ProviderOutcome::Captured(payload) => match self.persist(pending, payload) {
                Ok(photo) => {
                    info!("Capture #{} logged as photo #{}", token, photo.id);
                    self.shared.emit(CaptureEvent::Saved(photo));
                }
                Err(failure) => {
                    warn!("Capture #{} produced no record: {}", token, failure);
                    self.shared.emit(CaptureEvent::Failed(failure));
                }
            },
        }
    }

    /// Turn a delivered payload into a catalog record.
    ///
    /// The capture counts only once its file is confirmed non-empty on
    /// disk; a store failure leaves the media file in place so nothing
    /// already captured is lost.
    fn persist(
        &self,
        pending: PendingCapture,
        payload: ProviderPayload,
    ) -> Result<Photo, CaptureFailure> {
        let path = match payload {
            ProviderPayload::File(path) => path,
            ProviderPayload::Frame(frame) => {
                // In-memory delivery: encode to the pre-allocated destination
                let path = pending.output_path;
                frame.save(&path)?;
                path
            }
        };

        if !files::file_is_nonempty(&path) {
            return Err(CaptureFailure::EmptyResult(path));
        }

        let catalog = lock_recovering(&self.catalog);
        let photo = catalog.add(&path.to_string_lossy(), Utc::now().timestamp())?;
        Ok(photo)
    }

    fn spawn_watchdog(&self, token: u64) {
        let shared = Arc::downgrade(&self.shared);
        let timeout = self.timeout;
        thread::spawn(move || {
            thread::sleep(timeout);
            if let Some(shared) = shared.upgrade() {
                shared.expire(token);
            }
        });
    }
}

fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
