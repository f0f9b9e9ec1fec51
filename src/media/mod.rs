/// Media file handling module
///
/// This module handles:
/// - Allocating collision-free destination paths for captures
/// - Verifying that delivered capture files are actually on disk
/// - Generating and caching list thumbnails

pub mod files;
pub mod thumbnail;
