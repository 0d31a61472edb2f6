//! HTML parser for catalog and detail pages
//!
//! This module extracts:
//! - Book links from catalog cards
//! - The highest page number from the catalog pagination control
//! - Title, author, genre and cover reference from a detail page
//!
//! Everything here is pure: documents come in as strings, records come out.

use crate::config::SelectorConfig;
use crate::url::{raw_id_from_url, SiteUrls};
use crate::{ConfigError, RecordError};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Separator between title and author in the detail page heading
pub const TITLE_SEPARATOR: &str = "::";

/// A book's catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookLink {
    /// Absolute URL of the detail page
    pub detail_url: Url,
    /// Identifier taken from the link path (marker + digits)
    pub raw_id: String,
}

/// Metadata recorded for one book in the output document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Book title, also the base of the text file name
    pub filename: String,
    pub author: String,
    /// Local file name of the cover image
    pub image_name: String,
    pub genres: Vec<String>,
}

/// A parsed detail page: the record plus where its cover lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPage {
    pub record: BookRecord,
    pub cover_url: Url,
}

/// Compiled selectors for every extracted field
#[derive(Debug, Clone)]
pub struct Selectors {
    card: Selector,
    card_link: Selector,
    title: Selector,
    cover: Selector,
    genre: Selector,
    pagination: Selector,
}

impl Selectors {
    /// Compiles the configured selector strings
    ///
    /// # Returns
    ///
    /// * `Ok(Selectors)` - All selectors compiled
    /// * `Err(ConfigError::InvalidSelector)` - Names the first selector that failed
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            card: compile_one("card", &config.card)?,
            card_link: compile_one("card-link", &config.card_link)?,
            title: compile_one("title", &config.title)?,
            cover: compile_one("cover", &config.cover)?,
            genre: compile_one("genre", &config.genre)?,
            pagination: compile_one("pagination", &config.pagination)?,
        })
    }
}

fn compile_one(name: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("{} selector '{}': {:?}", name, selector, e))
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts the book links from a catalog page
///
/// Cards without an anchor, or whose anchor does not resolve to a path with
/// an id segment, are skipped. A page with no cards yields an empty list.
pub fn parse_catalog_page(html: &str, selectors: &Selectors, urls: &SiteUrls) -> Vec<BookLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for card in document.select(&selectors.card) {
        let Some(href) = card
            .select(&selectors.card_link)
            .find_map(|anchor| anchor.value().attr("href"))
        else {
            tracing::debug!("Catalog card without a link, skipping");
            continue;
        };

        let Some(detail_url) = urls.resolve(href) else {
            tracing::debug!("Unresolvable catalog link {:?}, skipping", href);
            continue;
        };

        let Some(raw_id) = raw_id_from_url(&detail_url) else {
            tracing::debug!("Catalog link {} carries no id, skipping", detail_url);
            continue;
        };

        links.push(BookLink { detail_url, raw_id });
    }

    links
}

/// Extracts the highest page number from the pagination control
///
/// Markers that are not numbers (e.g. "next", "...") are ignored. Returns
/// None if the control is missing or holds no numbers.
pub fn parse_page_count(html: &str, selectors: &Selectors) -> Option<u32> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.pagination)
        .filter_map(|marker| element_text(marker).parse::<u32>().ok())
        .max()
}

/// Splits a "Title :: Author" heading into its trimmed halves
///
/// Only the first separator splits; anything after it belongs to the author.
///
/// # Examples
///
/// ```
/// use book_harvest::crawler::split_title_author;
///
/// let (title, author) = split_title_author("Solaris  ::  Stanislaw Lem").unwrap();
/// assert_eq!(title, "Solaris");
/// assert_eq!(author, "Stanislaw Lem");
/// ```
pub fn split_title_author(heading: &str) -> Result<(String, String), RecordError> {
    heading
        .split_once(TITLE_SEPARATOR)
        .map(|(title, author)| (title.trim().to_string(), author.trim().to_string()))
        .ok_or_else(|| RecordError::MissingSeparator(heading.trim().to_string()))
}

/// Derives the local image file name from a cover reference
///
/// Keeps only the final path segment and drops any query string or
/// fragment. Applying it to an already bare file name returns it unchanged.
pub fn image_name_from_src(src: &str) -> Result<String, RecordError> {
    let path = src
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default()
        .trim();

    let name = path.rsplit('/').next().unwrap_or_default();

    if name.is_empty() {
        return Err(RecordError::EmptyImageName(src.to_string()));
    }

    Ok(name.to_string())
}

/// Extracts the book record from a detail page
///
/// # Arguments
///
/// * `html` - The detail page content
/// * `selectors` - Compiled field selectors
/// * `urls` - Site URL builder, used to resolve the cover reference
///
/// # Returns
///
/// * `Ok(BookPage)` - Record and absolute cover URL
/// * `Err(RecordError)` - A field is missing or the title lacks "::"
pub fn parse_book_details(
    html: &str,
    selectors: &Selectors,
    urls: &SiteUrls,
) -> Result<BookPage, RecordError> {
    let document = Html::parse_document(html);

    let heading = document
        .select(&selectors.title)
        .next()
        .map(element_text)
        .ok_or(RecordError::MissingElement("title"))?;
    let (filename, author) = split_title_author(&heading)?;

    let src = document
        .select(&selectors.cover)
        .next()
        .and_then(|img| img.value().attr("src"))
        .ok_or(RecordError::MissingElement("cover"))?;
    let image_name = image_name_from_src(src)?;
    let cover_url = urls
        .resolve(src)
        .ok_or_else(|| RecordError::EmptyImageName(src.to_string()))?;

    let genre = document
        .select(&selectors.genre)
        .next()
        .map(element_text)
        .ok_or(RecordError::MissingElement("genre"))?;

    Ok(BookPage {
        record: BookRecord {
            filename,
            author,
            image_name,
            genres: vec![genre],
        },
        cover_url,
    })
}
