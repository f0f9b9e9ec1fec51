//! Photo timeline core: capture a photo through a platform-owned camera,
//! log it to a durable catalog, browse and delete the records.
//!
//! The crate is the headless heart of the app — the capture coordinator
//! and the record catalog. Rendering the timeline is the embedder's job:
//! it consumes [`Catalog::photos`](store::catalog::Catalog::photos) and
//! the [`CaptureEvent`](capture::types::CaptureEvent) stream, and calls
//! [`Catalog::delete`](store::catalog::Catalog::delete).

pub mod capture;
pub mod error;
pub mod media;
pub mod paths;
pub mod store;

pub use capture::coordinator::Coordinator;
pub use capture::provider::{CaptureProvider, GrantAll, PermissionProbe};
pub use capture::types::{CaptureEvent, CaptureTicket, ProviderOutcome, ProviderPayload};
pub use error::{CaptureFailure, StoreError};
pub use paths::StoragePaths;
pub use store::catalog::Catalog;
pub use store::data::Photo;
