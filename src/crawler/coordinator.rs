//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the page-range loop that ties the crawl together:
//! - Determining the page range (explicit or discovered)
//! - Listing the books on each catalog page
//! - Extracting details and downloading assets per book
//! - Isolating per-book failures so one broken entry never aborts the run
//! - Writing the metadata document once the range is done

use crate::config::{validate, validate_run, RunConfig, SiteConfig};
use crate::crawler::assets::{fetch_cover, resolve_text_asset};
use crate::crawler::catalog::{discover_page_count, list_books};
use crate::crawler::details::{extract_from_page, fetch_detail_page};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{BookLink, BookPage, BookRecord, Selectors};
use crate::output::{write_collection, CrawlStatistics};
use crate::state::{BookProgress, BookState};
use crate::storage::Downloader;
use crate::url::SiteUrls;
use crate::HarvestError;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Recorded books in processing order
    pub records: Vec<BookRecord>,
    pub stats: CrawlStatistics,
    /// Where the metadata document was written
    pub output_path: PathBuf,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    run: RunConfig,
    urls: SiteUrls,
    selectors: Selectors,
    fetcher: Fetcher,
    downloader: Downloader,
    records: Vec<BookRecord>,
    stats: CrawlStatistics,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `site` - The upstream site contract
    /// * `run` - Settings for this run
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration valid and HTTP client built
    /// * `Err(HarvestError)` - Invalid configuration or client setup failure
    pub fn new(site: SiteConfig, run: RunConfig) -> Result<Self, HarvestError> {
        validate(&site)?;
        validate_run(&run)?;

        let urls = SiteUrls::from_config(&site)?;
        let selectors = Selectors::compile(&site.selectors)?;
        let fetcher = Fetcher::new(&site.http)?;
        let downloader = Downloader::new(&run);

        Ok(Self {
            run,
            urls,
            selectors,
            fetcher,
            downloader,
            records: Vec::new(),
            stats: CrawlStatistics::new(),
        })
    }

    /// Runs the crawl over the whole page range
    ///
    /// Per-book and per-page failures are logged and skipped. The only
    /// errors returned are the ones that prevent writing the metadata
    /// document.
    pub async fn run(&mut self) -> Result<CrawlOutcome, HarvestError> {
        if self.run.find_out_directory {
            self.log_directories();
        }

        let pages = self.page_range().await;
        tracing::info!("Crawling catalog pages {}..={}", pages.start(), pages.end());

        for page in pages.clone() {
            let links = match list_books(&self.fetcher, &self.urls, &self.selectors, page).await {
                Ok(links) => {
                    self.stats.pages_listed += 1;
                    links
                }
                Err(e) => {
                    tracing::error!("Failed to list catalog page {}: {}", page, e);
                    self.stats.pages_failed += 1;
                    continue;
                }
            };

            for link in &links {
                self.process_link(link).await;
            }

            tracing::info!(
                "Page {}/{} done: {} books recorded, {} failed",
                page,
                pages.end(),
                self.stats.books_recorded(),
                self.stats.books_failed()
            );
        }

        let output_path = self.run.output_file();
        write_collection(&self.records, &output_path)?;

        Ok(CrawlOutcome {
            records: std::mem::take(&mut self.records),
            stats: std::mem::take(&mut self.stats),
            output_path,
        })
    }

    /// Determines the inclusive page range for this run
    ///
    /// Without an explicit end page the catalog is probed for its page
    /// count. If probing fails only the start page is crawled.
    pub async fn page_range(&self) -> RangeInclusive<u32> {
        let start = self.run.start_page;

        let end = match self.run.end_page {
            Some(end) => end,
            None => match discover_page_count(&self.fetcher, &self.urls, &self.selectors).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::error!(
                        "Could not discover the catalog page count: {}; crawling page {} only",
                        e,
                        start
                    );
                    start
                }
            },
        };

        if end < start {
            tracing::warn!(
                "Catalog has {} pages, nothing to crawl from page {}",
                end,
                start
            );
        }

        start..=end
    }

    /// Processes one catalog entry, containing any failure to that book
    async fn process_link(&mut self, link: &BookLink) {
        let mut progress = BookProgress::new(link.detail_url.as_str());

        match self.process_book(link, &mut progress).await {
            Ok(record) => self.records.push(record),
            Err(e) => {
                progress.fail();
                if e.is_not_found() {
                    self.stats.books_not_found += 1;
                    tracing::error!("{}: no such book on the site ({})", progress.url(), e);
                } else {
                    tracing::error!("{}: skipping book: {}", progress.url(), e);
                }
            }
        }

        self.stats.record_book(progress.state());
    }

    async fn process_book(
        &mut self,
        link: &BookLink,
        progress: &mut BookProgress,
    ) -> Result<BookRecord, HarvestError> {
        let page = fetch_detail_page(&self.fetcher, link).await?;
        progress.advance(BookState::Fetched)?;

        let BookPage { record, cover_url } =
            extract_from_page(&page, &self.urls, &self.selectors)?;
        progress.advance(BookState::Extracted)?;

        if !self.run.skip_txt {
            let text = resolve_text_asset(&self.fetcher, &self.urls, link).await?;
            self.downloader.save_text(&record, &text)?;
            self.stats.texts_saved += 1;
            progress.advance(BookState::TextSaved)?;
        }

        if !self.run.skip_imgs {
            let bytes = fetch_cover(&self.fetcher, &cover_url).await?;
            self.downloader.save_image(&record, &bytes)?;
            self.stats.images_saved += 1;
            progress.advance(BookState::ImageSaved)?;
        }

        progress.advance(BookState::Recorded)?;
        tracing::debug!("Recorded '{}' by {}", record.filename, record.author);
        Ok(record)
    }

    fn log_directories(&self) {
        let cwd = match std::env::current_dir() {
            Ok(cwd) => cwd,
            Err(e) => {
                tracing::warn!("Cannot resolve the working directory: {}", e);
                return;
            }
        };

        tracing::info!("Working directory: {}", cwd.display());
        tracing::info!(
            "Books folder: {}",
            cwd.join(self.downloader.books_dir()).display()
        );
        tracing::info!(
            "Images folder: {}",
            cwd.join(self.downloader.images_dir()).display()
        );
        tracing::info!(
            "Metadata file: {}",
            cwd.join(self.run.output_file()).display()
        );
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use book_harvest::config::{RunConfig, SiteConfig};
/// use book_harvest::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let run = RunConfig { start_page: 1, end_page: Some(2), ..RunConfig::default() };
/// let outcome = run_crawl(SiteConfig::default(), run).await?;
/// println!("{} books recorded", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(site: SiteConfig, run: RunConfig) -> Result<CrawlOutcome, HarvestError> {
    let mut coordinator = Coordinator::new(site, run)?;
    coordinator.run().await
}
