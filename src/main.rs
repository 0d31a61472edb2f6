//! Book-Harvest main entry point
//!
//! This is the command-line interface for the Book-Harvest catalog crawler.

use anyhow::Context;
use book_harvest::config::{load_site_config, RunConfig, SiteConfig, TextWriteMode};
use book_harvest::crawler::crawl;
use book_harvest::output::print_statistics;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Book-Harvest: download books and their metadata from an online library
///
/// Walks a range of catalog pages, saves each book's text and cover, and
/// writes the collected metadata to book_page_information.json.
#[derive(Parser, Debug)]
#[command(name = "book-harvest")]
#[command(version)]
#[command(about = "Download books and their metadata from an online library", long_about = None)]
struct Cli {
    /// First catalog page to crawl
    #[arg(value_name = "START_PAGE")]
    start_page: u32,

    /// Last catalog page to crawl (inclusive); defaults to the catalog's page count
    #[arg(long = "end_page")]
    end_page: Option<u32>,

    /// Do not download book texts
    #[arg(long = "skip_txt")]
    skip_txt: bool,

    /// Do not download cover images
    #[arg(long = "skip_imgs")]
    skip_imgs: bool,

    /// Folder for downloaded texts
    #[arg(long = "folder_books", default_value = "books")]
    folder_books: PathBuf,

    /// Folder for downloaded cover images
    #[arg(long = "folder_img", default_value = "img")]
    folder_img: PathBuf,

    /// Log the absolute paths of the destination folders
    #[arg(long = "find_out_directory")]
    find_out_directory: bool,

    /// Directory for book_page_information.json
    #[arg(long = "json_path", default_value = ".")]
    json_path: PathBuf,

    /// How to write a text file that already exists: append or overwrite
    #[arg(long = "txt_mode", default_value = "append")]
    txt_mode: TextWriteMode,

    /// Path to a TOML file overriding the site settings
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            start_page: self.start_page,
            end_page: self.end_page,
            skip_txt: self.skip_txt,
            skip_imgs: self.skip_imgs,
            folder_books: self.folder_books.clone(),
            folder_img: self.folder_img.clone(),
            find_out_directory: self.find_out_directory,
            json_path: self.json_path.clone(),
            txt_mode: self.txt_mode,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let site = match &cli.config {
        Some(path) => {
            tracing::info!("Loading site configuration from: {}", path.display());
            load_site_config(path)
                .with_context(|| format!("load site configuration {}", path.display()))?
        }
        None => SiteConfig::default(),
    };

    let run = cli.run_config();
    tracing::info!(
        "Starting crawl of {} from page {} (text: {}, images: {}, text mode: {})",
        site.base_url,
        run.start_page,
        if run.skip_txt { "skipped" } else { "saved" },
        if run.skip_imgs { "skipped" } else { "saved" },
        run.txt_mode
    );

    let outcome = crawl(site, run).await.context("crawl failed")?;

    if !cli.quiet {
        print_statistics(&outcome.stats);
    }
    tracing::info!("Metadata written to {}", outcome.output_path.display());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("book_harvest=info,warn"),
                1 => EnvFilter::new("book_harvest=debug,info"),
                2 => EnvFilter::new("book_harvest=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
