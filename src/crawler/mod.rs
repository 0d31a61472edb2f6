//! Crawler module for catalog walking and asset downloads
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with redirect-as-not-found classification
//! - Catalog listing and page count discovery
//! - Detail page extraction into book records
//! - Text export resolution and cover downloads
//! - Overall crawl coordination

mod assets;
mod catalog;
mod coordinator;
mod details;
mod fetcher;
mod parser;

pub use assets::{fetch_cover, resolve_text_asset};
pub use catalog::{discover_page_count, list_books};
pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use details::{extract_details, extract_from_page, fetch_detail_page};
pub use fetcher::{build_http_client, check_for_redirect, FetchedPage, Fetcher};
pub use parser::{
    image_name_from_src, parse_book_details, parse_catalog_page, parse_page_count,
    split_title_author, BookLink, BookPage, BookRecord, Selectors, TITLE_SEPARATOR,
};

use crate::config::{RunConfig, SiteConfig};
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Determine the page range
/// 3. List, extract and download every book in range
/// 4. Write the metadata document
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed (individual books may have failed)
/// * `Err(HarvestError)` - Crawl could not run or its output could not be written
pub async fn crawl(site: SiteConfig, run: RunConfig) -> Result<CrawlOutcome, HarvestError> {
    run_crawl(site, run).await
}
