//! Book detail extractor

use crate::crawler::fetcher::{FetchedPage, Fetcher};
use crate::crawler::parser::{parse_book_details, BookLink, BookPage, Selectors};
use crate::url::SiteUrls;
use crate::HarvestError;

/// Fetches a book's detail page
pub async fn fetch_detail_page(
    fetcher: &Fetcher,
    link: &BookLink,
) -> Result<FetchedPage, HarvestError> {
    fetcher.fetch(&link.detail_url).await
}

/// Turns a fetched detail page into a book record
pub fn extract_from_page(
    page: &FetchedPage,
    urls: &SiteUrls,
    selectors: &Selectors,
) -> Result<BookPage, HarvestError> {
    parse_book_details(&page.text, selectors, urls).map_err(|source| {
        HarvestError::MalformedRecord {
            url: page.url.to_string(),
            source,
        }
    })
}

/// Fetches and parses a book's detail page in one step
///
/// # Returns
///
/// * `Ok(BookPage)` - The extracted record and its cover URL
/// * `Err(HarvestError::Redirect)` - The book does not exist on the site
/// * `Err(HarvestError::MalformedRecord)` - A field is missing or the title lacks "::"
pub async fn extract_details(
    fetcher: &Fetcher,
    urls: &SiteUrls,
    selectors: &Selectors,
    link: &BookLink,
) -> Result<BookPage, HarvestError> {
    let page = fetch_detail_page(fetcher, link).await?;
    extract_from_page(&page, urls, selectors)
}
