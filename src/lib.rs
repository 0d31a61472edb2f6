//! Book-Harvest: a catalog crawler for an online library
//!
//! This crate walks a range of catalog pages, extracts per-book metadata
//! (title, author, genre, cover), downloads the text and cover assets to
//! local folders and records everything it extracted in one JSON document.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Book-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("{url} redirected to {location}")]
    Redirect { url: String, location: String },

    #[error("Too many redirects from {url}")]
    RedirectLimit { url: String },

    #[error("Redirect loop detected at {url}")]
    RedirectLoop { url: String },

    #[error("Malformed book record at {url}: {source}")]
    MalformedRecord { url: String, source: RecordError },

    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::BookState,
        to: state::BookState,
    },
}

impl HarvestError {
    /// Returns true if the error is the site's "not found" signal
    ///
    /// The site answers requests for missing books with a redirect to its
    /// homepage instead of a 404, so every redirect flavour counts.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Redirect { .. } | Self::RedirectLimit { .. } | Self::RedirectLoop { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Reasons a detail page or catalog link cannot become a book record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("title {0:?} has no '::' separator")]
    MissingSeparator(String),

    #[error("page has no {0} element")]
    MissingElement(&'static str),

    #[error("cover reference {0:?} has no file name")]
    EmptyImageName(String),

    #[error("raw id {0:?} is not a marker followed by digits")]
    BadRawId(String),
}

/// Result type alias for Book-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{RunConfig, SiteConfig, TextWriteMode};
pub use crawler::{BookLink, BookRecord, Coordinator, CrawlOutcome};
pub use state::BookState;
