use crate::RecordError;
use url::Url;

/// Extracts the raw book id from a detail page URL
///
/// The raw id is the last non-empty path segment, so `/b1234/` and `/b1234`
/// both yield `b1234`.
///
/// # Examples
///
/// ```
/// use book_harvest::url::raw_id_from_url;
/// use url::Url;
///
/// let url = Url::parse("https://tululu.org/b239/").unwrap();
/// assert_eq!(raw_id_from_url(&url), Some("b239".to_string()));
/// ```
pub fn raw_id_from_url(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

/// Strips the one-character marker from a raw id, leaving the numeric id
///
/// # Arguments
///
/// * `raw_id` - The raw id taken from a catalog link (e.g. `b239`)
/// * `marker` - The marker character in front of the digits
///
/// # Returns
///
/// * `Ok(String)` - The numeric id (e.g. `239`)
/// * `Err(RecordError::BadRawId)` - Marker missing or remainder not numeric
pub fn book_id_from_raw(raw_id: &str, marker: char) -> Result<String, RecordError> {
    match raw_id.strip_prefix(marker) {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            Ok(digits.to_string())
        }
        _ => Err(RecordError::BadRawId(raw_id.to_string())),
    }
}
