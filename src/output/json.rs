//! Metadata document output

use crate::crawler::BookRecord;
use crate::HarvestError;
use std::fs;
use std::path::Path;

/// Writes the collected records as one pretty-printed JSON array
///
/// The parent directory is created if needed. Non-ASCII text is written
/// literally, not escaped.
///
/// # Arguments
///
/// * `records` - Records in the order they were processed
/// * `output_path` - Path of the JSON document
pub fn write_collection(records: &[BookRecord], output_path: &Path) -> Result<(), HarvestError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(records)?;
    fs::write(output_path, json)?;

    tracing::info!(
        "Wrote {} records to {}",
        records.len(),
        output_path.display()
    );
    Ok(())
}

/// Reads a metadata document back into records
pub fn read_collection(path: &Path) -> Result<Vec<BookRecord>, HarvestError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
