//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the HTTP client with the configured timeouts and user agent
//! - GET requests for listings pages
//! - Classifying transport and status failures as [`FetchError`]
//!
//! There is no retry logic; a failed request is reported to the caller as-is.

use crate::config::{Config, HttpConfig};
use crate::crawler::parser::{parse_listing_page, ListingSelectors};
use crate::state::PageResult;
use crate::{FetchError, SweepError};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// A source of listings pages
///
/// [`PageFetcher`] is the HTTP implementation; the traverser only depends on
/// this trait.
pub trait PageSource {
    /// Retrieves and parses the page at `url`
    ///
    /// Fails with [`SweepError::Fetch`] when the URL is malformed or the page
    /// cannot be retrieved, and
    /// with [`SweepError::Parse`] when it lacks the expected listing markers.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<PageResult, SweepError>> + Send;
}

/// Builds an HTTP client with the configured timeouts
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Example
///
/// ```
/// use event_sweep::config::HttpConfig;
/// use event_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, FetchError> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true);

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }

    builder.build().map_err(FetchError::Client)
}

/// Fetches listings pages over HTTP and parses them
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    selectors: ListingSelectors,
}

impl PageFetcher {
    /// Creates a fetcher from an existing client and compiled selectors
    pub fn new(client: Client, selectors: ListingSelectors) -> Self {
        Self { client, selectors }
    }

    /// Creates a fetcher from the HTTP and selector configuration
    pub fn from_config(config: &Config) -> Result<Self, SweepError> {
        let client = build_http_client(&config.http)?;
        let selectors = ListingSelectors::compile(&config.selectors)?;
        Ok(Self::new(client, selectors))
    }

    /// Sends a GET request and returns the body of a successful response
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The response body
    /// * `Err(FetchError::Status)` - The server answered with a non-2xx status
    /// * `Err(FetchError::Transport)` - Connection, timeout, or body read failure
    pub async fn get_body(&self, url: &Url) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);

        // Send request
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        // Check status
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Read body
        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<PageResult, SweepError> {
        let page_url = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let body = self.get_body(&page_url).await?;
        let page = parse_listing_page(&body, &page_url, &self.selectors)?;

        if page.has_next() {
            tracing::debug!("Parsed {} listings from {}", page.records.len(), page_url);
        } else {
            tracing::debug!(
                "Parsed {} listings from {} (last page)",
                page.records.len(),
                page_url
            );
        }

        Ok(page)
    }
}
