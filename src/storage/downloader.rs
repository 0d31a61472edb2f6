//! Downloader: persists fetched text and cover images

use crate::config::{RunConfig, TextWriteMode};
use crate::crawler::BookRecord;
use crate::storage::sanitize::{sanitize_filename, sanitize_path};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes book assets under the run's destination folders
#[derive(Debug, Clone)]
pub struct Downloader {
    books_dir: PathBuf,
    images_dir: PathBuf,
    txt_mode: TextWriteMode,
}

impl Downloader {
    /// Creates a downloader for the folders named in `run`
    ///
    /// Folder names are sanitized here; directories are only created when
    /// the first file is written to them.
    pub fn new(run: &RunConfig) -> Self {
        Self {
            books_dir: sanitize_path(&run.folder_books),
            images_dir: sanitize_path(&run.folder_img),
            txt_mode: run.txt_mode,
        }
    }

    pub fn books_dir(&self) -> &Path {
        &self.books_dir
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Target path of a record's text file
    pub fn text_path(&self, record: &BookRecord) -> PathBuf {
        self.books_dir
            .join(format!("{}.txt", sanitize_filename(&record.filename)))
    }

    /// Target path of a record's cover image
    pub fn image_path(&self, record: &BookRecord) -> PathBuf {
        self.images_dir.join(sanitize_filename(&record.image_name))
    }

    /// Writes the text content for a record
    ///
    /// In `Append` mode an existing file grows; repeated runs over the same
    /// book accumulate duplicate content. `Overwrite` replaces it.
    pub fn save_text(&self, record: &BookRecord, content: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.books_dir)?;
        let path = self.text_path(record);

        let mut options = OpenOptions::new();
        options.create(true);
        match self.txt_mode {
            TextWriteMode::Append => options.append(true),
            TextWriteMode::Overwrite => options.write(true).truncate(true),
        };

        let mut file = options.open(&path)?;
        file.write_all(content.as_bytes())?;

        tracing::debug!("Saved text to {}", path.display());
        Ok(path)
    }

    /// Writes a record's cover image, replacing any existing file
    pub fn save_image(&self, record: &BookRecord, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.images_dir)?;
        let path = self.image_path(record);

        fs::write(&path, bytes)?;

        tracing::debug!("Saved image to {}", path.display());
        Ok(path)
    }
}
