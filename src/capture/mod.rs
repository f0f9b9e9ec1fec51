/// Capture lifecycle module
///
/// This module handles:
/// - The single-slot capture request state machine (coordinator.rs)
/// - The provider/permission boundary traits (provider.rs)
/// - Tickets, provider outcomes and sink events (types.rs)

pub mod coordinator;
pub mod provider;
pub mod types;
