//! Storage module for persisting downloaded assets
//!
//! This module handles all filesystem writes for book assets:
//! - Filesystem-safe names for folders, titles and image files
//! - Text downloads (append or overwrite, per run configuration)
//! - Cover image downloads (always overwritten)

mod downloader;
mod sanitize;

pub use downloader::Downloader;
pub use sanitize::{sanitize_filename, sanitize_path};
