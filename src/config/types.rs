use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Name of the metadata document written at the end of a run
pub const OUTPUT_FILE_NAME: &str = "book_page_information.json";

/// Upstream site contract: where things live and how to find them
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root of the site; relative links are resolved against it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Genre listing path; page N lives at `<base>/<catalog-path>/<N>/`
    #[serde(rename = "catalog-path")]
    pub catalog_path: String,

    /// Endpoint converting a numeric id into a plain-text download
    #[serde(rename = "text-export-path")]
    pub text_export_path: String,

    /// One-character prefix in front of the numeric id in book links
    #[serde(rename = "id-marker")]
    pub id_marker: String,

    pub selectors: SelectorConfig,

    pub http: HttpConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tululu.org/".to_string(),
            catalog_path: "l55".to_string(),
            text_export_path: "txt.php".to_string(),
            id_marker: "b".to_string(),
            selectors: SelectorConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

/// CSS selectors for the fields extracted from catalog and detail pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One node per book on a catalog page
    pub card: String,

    /// Anchor inside a card pointing at the detail page
    #[serde(rename = "card-link")]
    pub card_link: String,

    /// Detail page heading holding "Title :: Author"
    pub title: String,

    /// Cover image element on the detail page
    pub cover: String,

    /// Genre link on the detail page
    pub genre: String,

    /// Page markers in the catalog pagination control
    pub pagination: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            card: "table.d_book".to_string(),
            card_link: "a".to_string(),
            title: "table.tabs td.ow_px_td h1".to_string(),
            cover: "table.tabs td.ow_px_td table img".to_string(),
            genre: "table.tabs span.d_book a".to_string(),
            pagination: "a.npage".to_string(),
        }
    }
}

/// HTTP client behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification (the site's certificate does not verify)
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Hop limit when resolving the text export redirect chain
    #[serde(rename = "max-redirects")]
    pub max_redirects: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            accept_invalid_certs: true,
            user_agent: format!("book-harvest/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

/// How downloaded text is written when the target file already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextWriteMode {
    /// Append to the existing file; repeated runs accumulate content
    #[default]
    Append,
    /// Replace the existing file
    Overwrite,
}

impl FromStr for TextWriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(format!(
                "unknown text write mode '{}', expected 'append' or 'overwrite'",
                other
            )),
        }
    }
}

impl fmt::Display for TextWriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append => write!(f, "append"),
            Self::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Settings for one crawl run, fixed for its whole duration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// First catalog page to crawl
    pub start_page: u32,

    /// Last catalog page to crawl (inclusive); discovered from page 1 when absent
    pub end_page: Option<u32>,

    pub skip_txt: bool,

    pub skip_imgs: bool,

    /// Destination folder for book texts
    pub folder_books: PathBuf,

    /// Destination folder for cover images
    pub folder_img: PathBuf,

    /// Log the resolved absolute destination paths
    pub find_out_directory: bool,

    /// Directory receiving the metadata document
    pub json_path: PathBuf,

    pub txt_mode: TextWriteMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            start_page: 1,
            end_page: None,
            skip_txt: false,
            skip_imgs: false,
            folder_books: PathBuf::from("books"),
            folder_img: PathBuf::from("img"),
            find_out_directory: false,
            json_path: PathBuf::from("."),
            txt_mode: TextWriteMode::Append,
        }
    }
}

impl RunConfig {
    /// Path of the metadata document for this run
    pub fn output_file(&self) -> PathBuf {
        self.json_path.join(OUTPUT_FILE_NAME)
    }
}
