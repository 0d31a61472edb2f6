use crate::config::types::{HttpConfig, RunConfig, SelectorConfig, SiteConfig};
use crate::crawler::Selectors;
use crate::ConfigError;
use url::Url;

/// Validates the entire site configuration
pub fn validate(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_base_url(&config.base_url)?;
    validate_paths(config)?;
    validate_id_marker(&config.id_marker)?;
    validate_selectors(&config.selectors)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates run settings that cannot be expressed in the CLI parser
pub fn validate_run(run: &RunConfig) -> Result<(), ConfigError> {
    if run.start_page < 1 {
        return Err(ConfigError::Validation(
            "start_page must be >= 1".to_string(),
        ));
    }

    if let Some(end_page) = run.end_page {
        if end_page < run.start_page {
            return Err(ConfigError::Validation(format!(
                "end_page ({}) must not be lower than start_page ({})",
                end_page, run.start_page
            )));
        }
    }

    if run.folder_books.as_os_str().is_empty() || run.folder_img.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "destination folders cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the site root URL
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use HTTP or HTTPS",
            base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            base_url
        )));
    }

    Ok(())
}

fn validate_paths(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.catalog_path.trim_matches('/').is_empty() {
        return Err(ConfigError::Validation(
            "catalog_path cannot be empty".to_string(),
        ));
    }

    if config.text_export_path.trim_matches('/').is_empty() {
        return Err(ConfigError::Validation(
            "text_export_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// The marker is stripped as exactly one character from raw ids
fn validate_id_marker(marker: &str) -> Result<(), ConfigError> {
    let mut chars = marker.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_ascii_digit() && c != '/' => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "id_marker must be a single non-digit character, got '{}'",
            marker
        ))),
    }
}

fn validate_selectors(selectors: &SelectorConfig) -> Result<(), ConfigError> {
    Selectors::compile(selectors).map(|_| ())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_redirects == 0 {
        return Err(ConfigError::Validation(
            "max_redirects must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
