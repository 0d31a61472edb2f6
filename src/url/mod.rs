//! URL handling module for Book-Harvest
//!
//! This module builds every URL the crawler requests from the site contract:
//! catalog pages, detail links resolved against the site root, and the text
//! export endpoint. It also extracts book identifiers from link paths.

mod ids;

use crate::config::SiteConfig;
use crate::ConfigError;
use url::Url;

pub use ids::{book_id_from_raw, raw_id_from_url};

/// Query parameter carrying the numeric id on the text export endpoint
const EXPORT_ID_PARAM: &str = "id";

/// URL builder for one upstream site
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
    catalog_path: String,
    export: Url,
    id_marker: char,
}

impl SiteUrls {
    /// Builds the URL set from a site configuration
    ///
    /// The base URL always gets a trailing slash so that relative joins
    /// extend it instead of replacing its last segment.
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        let mut base = Url::parse(&config.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let export = base
            .join(config.text_export_path.trim_start_matches('/'))
            .map_err(|e| {
                ConfigError::InvalidUrl(format!("{}: {}", config.text_export_path, e))
            })?;

        let id_marker = config.id_marker.chars().next().ok_or_else(|| {
            ConfigError::Validation("id_marker cannot be empty".to_string())
        })?;

        Ok(Self {
            base,
            catalog_path: config.catalog_path.trim_matches('/').to_string(),
            export,
            id_marker,
        })
    }

    /// The site root
    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn id_marker(&self) -> char {
        self.id_marker
    }

    /// URL of catalog page `page`
    ///
    /// # Examples
    ///
    /// ```
    /// use book_harvest::config::SiteConfig;
    /// use book_harvest::url::SiteUrls;
    ///
    /// let urls = SiteUrls::from_config(&SiteConfig::default()).unwrap();
    /// assert_eq!(urls.catalog_page(3).unwrap().as_str(), "https://tululu.org/l55/3/");
    /// ```
    pub fn catalog_page(&self, page: u32) -> Result<Url, url::ParseError> {
        self.base.join(&format!("{}/{}/", self.catalog_path, page))
    }

    /// Resolves an href found on a site page against the site root
    ///
    /// Returns None for empty hrefs, fragments, non-HTTP schemes and
    /// anything that fails to parse.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let href = href.trim();

        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        if href.starts_with("javascript:") || href.starts_with("mailto:") || href.starts_with("data:")
        {
            return None;
        }

        match self.base.join(href) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
            _ => None,
        }
    }

    /// Text export request for a numeric book id
    pub fn text_export(&self, book_id: &str) -> Url {
        let mut url = self.export.clone();
        url.query_pairs_mut().append_pair(EXPORT_ID_PARAM, book_id);
        url
    }

    /// Returns true if `url` is the site's homepage
    ///
    /// Requests for missing content end up here.
    pub fn is_site_root(&self, url: &Url) -> bool {
        url.origin() == self.base.origin()
            && url.path() == self.base.path()
            && url.query().map_or(true, str::is_empty)
    }
}
