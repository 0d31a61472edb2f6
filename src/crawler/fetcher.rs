//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client (timeouts, TLS policy, user agent)
//! - GET requests returning decoded page text or raw bytes
//! - Treating any redirect as the site's "not found" signal
//! - Walking the text export redirect chain to its landing URL
//! - Error classification

use crate::config::HttpConfig;
use crate::HarvestError;
use reqwest::{header::LOCATION, redirect::Policy, Client, Response};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Successfully fetched text content
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL the content was served from
    pub url: Url,
    /// Body decoded with the charset declared in `Content-Type` (UTF-8 if none)
    pub text: String,
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are never followed by the client itself: `Fetcher::fetch`
/// reports them as failures and `Fetcher::resolve_redirects` walks them
/// hop by hop.
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    if config.accept_invalid_certs {
        tracing::debug!("TLS certificate verification disabled");
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fails if the response is a redirect
///
/// The site answers requests for missing books with a redirect to its
/// homepage, so a redirect anywhere in a fetch means the content is absent.
pub fn check_for_redirect(url: &Url, response: &Response) -> Result<(), HarvestError> {
    if response.status().is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("<no location>")
            .to_string();

        return Err(HarvestError::Redirect {
            url: url.to_string(),
            location,
        });
    }

    Ok(())
}

/// Fails if the response status is not 2xx
fn check_status(url: &Url, response: &Response) -> Result<(), HarvestError> {
    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(())
}

/// Resolves the Location header of a redirect response against the current URL
fn redirect_target(url: &Url, response: &Response) -> Result<Url, HarvestError> {
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| HarvestError::Http {
            url: url.to_string(),
            status: response.status().as_u16(),
        })?;

    Ok(url.join(location)?)
}

/// Sequential HTTP fetcher shared by every crawl component
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_redirects: u32,
}

impl Fetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, HarvestError> {
        Ok(Self {
            client: build_http_client(config)?,
            max_redirects: config.max_redirects,
        })
    }

    async fn send(&self, url: &Url) -> Result<Response, HarvestError> {
        self.client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| HarvestError::Transport {
                url: url.to_string(),
                source,
            })
    }

    /// Sends a GET and accepts only a direct 2xx response
    async fn checked_response(&self, url: &Url) -> Result<Response, HarvestError> {
        let response = self.send(url).await?;
        tracing::debug!("GET {} -> {}", url, response.status().as_u16());

        // Redirect check runs first: a 3xx would otherwise surface as a plain HTTP failure
        check_for_redirect(url, &response)?;
        check_status(url, &response)?;

        Ok(response)
    }

    /// Fetches a URL as text, refusing redirected and non-2xx responses
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - The page was served directly with a 2xx status
    /// * `Err(HarvestError::Redirect)` - The server redirected (content missing)
    /// * `Err(HarvestError::Http)` - Non-success status
    /// * `Err(HarvestError::Transport)` - Connection, TLS or timeout failure
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, HarvestError> {
        let response = self.checked_response(url).await?;
        let final_url = response.url().clone();

        let text = response
            .text()
            .await
            .map_err(|source| HarvestError::Transport {
                url: url.to_string(),
                source,
            })?;

        Ok(FetchedPage {
            url: final_url,
            text,
        })
    }

    /// Fetches a URL as raw bytes under the same rules as `fetch`
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, HarvestError> {
        let response = self.checked_response(url).await?;

        let body = response
            .bytes()
            .await
            .map_err(|source| HarvestError::Transport {
                url: url.to_string(),
                source,
            })?;

        Ok(body.to_vec())
    }

    /// Follows a redirect chain and returns the URL it lands on
    ///
    /// Unlike `fetch`, redirects are expected here. The chain is capped at
    /// the configured hop limit and a URL seen twice is reported as a loop.
    pub async fn resolve_redirects(&self, url: &Url) -> Result<Url, HarvestError> {
        let mut current = url.clone();
        let mut visited = HashSet::new();
        visited.insert(current.to_string());

        for _ in 0..=self.max_redirects {
            let response = self.send(&current).await?;

            if !response.status().is_redirection() {
                check_status(&current, &response)?;
                return Ok(current);
            }

            let next = redirect_target(&current, &response)?;
            tracing::debug!("{} redirects to {}", current, next);

            if !visited.insert(next.to_string()) {
                return Err(HarvestError::RedirectLoop {
                    url: next.to_string(),
                });
            }
            current = next;
        }

        Err(HarvestError::RedirectLimit {
            url: url.to_string(),
        })
    }
}
