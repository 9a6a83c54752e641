//! Crawler module for listing traversal and vacancy extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` seam
//! - Listing and detail page extraction
//! - Retry backoff and request pacing
//! - Pagination control and progress reporting

mod controller;
mod detail;
mod fetcher;
mod html;
mod listing;
mod progress;
mod retry;

pub use controller::{Controller, CrawlOutcome, CrawlSettings};
pub use detail::parse_detail;
pub use fetcher::{build_http_client, user_agent_string, HttpFetcher, PageFetcher};
pub use listing::{parse_listing, total_page_count, ListingPage};
pub use progress::{NoProgress, ProgressReporter};
pub use retry::RetryPolicy;

use crate::config::Config;
use crate::filter::FilterConfig;
use crate::SieveError;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the user agent and crawler settings
/// 2. Walk the listing from `start_url` until no next page is offered
/// 3. Filter, enrich and deduplicate the candidates
/// 4. Return the records sorted by closing date
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `filter` - Criteria applied to every candidate
/// * `start_url` - First listing page
/// * `progress` - Receives page progress
/// * `cancel` - Cancelling it ends the crawl with the records collected so far
pub async fn crawl(
    config: &Config,
    filter: FilterConfig,
    start_url: &Url,
    progress: &dyn ProgressReporter,
    cancel: CancellationToken,
) -> Result<CrawlOutcome, SieveError> {
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
    let settings = CrawlSettings::from_config(&config.crawler);

    let mut controller = Controller::new(fetcher, filter, settings).with_cancellation(cancel);
    controller.run(start_url, progress).await
}
