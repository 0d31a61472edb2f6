//! Output module for the run's results
//!
//! This module handles:
//! - Writing the metadata document (one JSON array of book records)
//! - Recording and printing run statistics

mod json;
pub mod stats;

pub use json::{read_collection, write_collection};
pub use stats::{print_statistics, CrawlStatistics};
