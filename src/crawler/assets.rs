//! Asset resolver: text export and cover image downloads

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::BookLink;
use crate::url::{book_id_from_raw, SiteUrls};
use crate::HarvestError;
use url::Url;

/// Resolves and downloads the plain-text asset for a catalog entry
///
/// The numeric id comes from the entry's raw id. The export endpoint
/// redirects to the real file on success, so its own redirects are
/// followed. The landing URL is then fetched through `Fetcher::fetch`,
/// which refuses any further redirect. A chain that lands on the homepage
/// means the book has no text.
pub async fn resolve_text_asset(
    fetcher: &Fetcher,
    urls: &SiteUrls,
    link: &BookLink,
) -> Result<String, HarvestError> {
    let book_id = book_id_from_raw(&link.raw_id, urls.id_marker()).map_err(|source| {
        HarvestError::MalformedRecord {
            url: link.detail_url.to_string(),
            source,
        }
    })?;
    let export_url = urls.text_export(&book_id);

    let landing = fetcher.resolve_redirects(&export_url).await?;
    if urls.is_site_root(&landing) {
        return Err(HarvestError::Redirect {
            url: export_url.to_string(),
            location: landing.to_string(),
        });
    }

    Ok(fetcher.fetch(&landing).await?.text)
}

/// Downloads a cover image
pub async fn fetch_cover(fetcher: &Fetcher, cover_url: &Url) -> Result<Vec<u8>, HarvestError> {
    fetcher.fetch_bytes(cover_url).await
}
