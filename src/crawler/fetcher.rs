//! HTTP fetcher implementation
//!
//! This module handles the network side of the crawl:
//! - The `PageFetcher` seam the controller fetches through
//! - Building the HTTP client with an identifying user agent
//! - Classifying failures into `FetchError` kinds
//!
//! A fetcher performs exactly one round trip per call. Retries and the pause
//! between requests are the controller's business.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;

/// Retrieves the text content of a page by absolute URL
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`, returning the whole body or a [`FetchError`]
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Formats the user agent: `CrawlerName/Version (+ContactURL)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Crawler configuration supplying the request timeout
///
/// # Example
///
/// ```no_run
/// use vacancy_sieve::config::{CrawlerConfig, UserAgentConfig};
/// use vacancy_sieve::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(crawler.request_timeout_secs);

    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` backed by a reqwest client, issuing plain GET requests
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration and wraps it
    pub fn from_config(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, crawler)?))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::trace!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))
    }
}
