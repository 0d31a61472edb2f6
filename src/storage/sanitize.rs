use std::path::{Component, Path, PathBuf};

/// Characters rejected in file names on at least one common platform
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Device names Windows refuses as file stems
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Byte budget for a sanitized name; leaves room for an extension under 255
const MAX_NAME_BYTES: usize = 250;

/// Replacement for names that sanitize down to nothing
const EMPTY_NAME: &str = "_";

/// Turns an arbitrary string into a single filesystem-safe path component
///
/// Removes path separators, reserved punctuation and control characters,
/// trims surrounding whitespace and trailing dots, caps the length and
/// defuses reserved device names. Non-ASCII text is kept as is.
///
/// # Examples
///
/// ```
/// use book_harvest::storage::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Who? What: Why/How"), "Who What WhyHow");
/// assert_eq!(sanitize_filename("Пикник на обочине"), "Пикник на обочине");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !INVALID_CHARS.contains(c))
        .collect();

    let mut result = truncate_to_bytes(
        cleaned.trim().trim_end_matches(|c: char| c == '.' || c.is_whitespace()),
        MAX_NAME_BYTES,
    )
    .to_string();

    if result.is_empty() {
        return EMPTY_NAME.to_string();
    }

    let stem = result.split('.').next().unwrap_or_default().to_ascii_uppercase();
    if RESERVED_NAMES.contains(&stem.as_str()) {
        result.insert(0, '_');
    }

    result
}

/// Sanitizes every named component of a folder path
///
/// Root, prefix and `.`/`..` components are kept so that absolute and
/// relative destinations keep pointing where the caller meant.
pub fn sanitize_path(path: &Path) -> PathBuf {
    path.components()
        .map(|component| match component {
            Component::Normal(name) => PathBuf::from(sanitize_filename(&name.to_string_lossy())),
            other => PathBuf::from(other.as_os_str()),
        })
        .collect()
}

fn truncate_to_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }

    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
