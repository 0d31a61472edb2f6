//! Configuration module for Book-Harvest
//!
//! Two layers of configuration exist:
//! - `SiteConfig`: the upstream site contract (URLs, selectors, HTTP policy),
//!   loaded from an optional TOML file and defaulting to the live site
//! - `RunConfig`: the per-run settings built from command-line arguments
//!
//! # Example
//!
//! ```no_run
//! use book_harvest::config::load_site_config;
//! use std::path::Path;
//!
//! let site = load_site_config(Path::new("site.toml")).unwrap();
//! println!("Crawling catalog: {}", site.catalog_path);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    HttpConfig, RunConfig, SelectorConfig, SiteConfig, TextWriteMode, OUTPUT_FILE_NAME,
};

pub use parser::{load_site_config, parse_site_config};
pub use validation::{validate, validate_run};
