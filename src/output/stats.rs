//! Run statistics
//!
//! Counters collected by the coordinator while it walks the page range,
//! printed once the metadata document has been written.

use crate::state::BookState;
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Catalog pages listed successfully
    pub pages_listed: u64,

    /// Catalog pages that could not be fetched
    pub pages_failed: u64,

    /// Catalog entries processed
    pub books_seen: u64,

    /// Text files written
    pub texts_saved: u64,

    /// Cover images written
    pub images_saved: u64,

    /// Books skipped because the site reported them missing (redirect)
    pub books_not_found: u64,

    /// Final state of every processed book
    pub books_by_state: HashMap<BookState, u64>,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a book that reached `state`
    pub fn record_book(&mut self, state: BookState) {
        self.books_seen += 1;
        *self.books_by_state.entry(state).or_insert(0) += 1;
    }

    pub fn books_recorded(&self) -> u64 {
        self.books_by_state
            .get(&BookState::Recorded)
            .copied()
            .unwrap_or(0)
    }

    pub fn books_failed(&self) -> u64 {
        self.books_by_state
            .get(&BookState::Failed)
            .copied()
            .unwrap_or(0)
    }

    /// Returns the share of processed books that were recorded, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.books_seen == 0 {
            return 0.0;
        }
        (self.books_recorded() as f64 / self.books_seen as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Catalog:");
    println!("  Pages listed: {}", stats.pages_listed);
    println!("  Pages failed: {}", stats.pages_failed);
    println!();

    println!("Books:");
    println!("  Processed: {}", stats.books_seen);
    println!("  Recorded: {}", stats.books_recorded());
    println!("  Failed: {}", stats.books_failed());
    println!("  Not found on site: {}", stats.books_not_found);
    println!();

    println!("Downloads:");
    println!("  Texts saved: {}", stats.texts_saved);
    println!("  Images saved: {}", stats.images_saved);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} books recorded)",
        stats.success_rate(),
        stats.books_recorded(),
        stats.books_seen
    );
}
