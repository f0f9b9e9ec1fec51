/// Record store module
///
/// This module owns the durable photo collection:
/// - Database connection and queries (catalog.rs)
/// - Shared data structures (data.rs)

pub mod catalog;
pub mod data;
