//! Catalog lister: book links per catalog page and the total page count

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{parse_catalog_page, parse_page_count, BookLink, Selectors};
use crate::url::SiteUrls;
use crate::HarvestError;

/// Lists the books on catalog page `page`
///
/// A page whose structure yields no cards returns an empty list, not an error.
pub async fn list_books(
    fetcher: &Fetcher,
    urls: &SiteUrls,
    selectors: &Selectors,
    page: u32,
) -> Result<Vec<BookLink>, HarvestError> {
    let url = urls.catalog_page(page)?;
    let fetched = fetcher.fetch(&url).await?;
    let links = parse_catalog_page(&fetched.text, selectors, urls);

    tracing::debug!("Catalog page {}: {} books", page, links.len());
    Ok(links)
}

/// Probes catalog page 1 for the highest page number in its pagination control
///
/// A catalog without pagination has exactly one page.
pub async fn discover_page_count(
    fetcher: &Fetcher,
    urls: &SiteUrls,
    selectors: &Selectors,
) -> Result<u32, HarvestError> {
    let url = urls.catalog_page(1)?;
    let fetched = fetcher.fetch(&url).await?;

    let count = parse_page_count(&fetched.text, selectors).unwrap_or(1).max(1);
    tracing::info!("Catalog has {} pages", count);
    Ok(count)
}
