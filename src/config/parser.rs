use crate::config::types::SiteConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a site configuration file from the given path
///
/// Missing keys fall back to the defaults for the live site, so a file only
/// needs to name what differs.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(SiteConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_site_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_site_config(&content)
}

/// Parses and validates a site configuration from TOML text
pub fn parse_site_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}
