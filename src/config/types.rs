use crate::filter::FilterConfig;
use serde::Deserialize;

/// Main configuration structure for Vacancy Sieve
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub listing: ListingConfig,
    pub filter: FilterSection,
}

/// Crawler pacing and retry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pause after every fetch, listing or detail (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Additional attempts for a transient fetch failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base of the exponential retry backoff (milliseconds)
    #[serde(rename = "retry-base-delay-ms")]
    pub retry_base_delay_ms: u64,

    /// Maximum number of detail pages fetched at once
    #[serde(rename = "max-concurrent-details")]
    pub max_concurrent_details: u32,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1000,
            max_retries: 2,
            retry_base_delay_ms: 500,
            max_concurrent_details: 1,
            request_timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "VacancySieve".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/vacancy-sieve/vacancy-sieve".to_string(),
        }
    }
}

/// Listing service location and search parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Origin of the listing service
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Complete first listing URL; when set the search parameters are ignored
    #[serde(rename = "start-url")]
    pub start_url: Option<String>,

    pub region: String,

    #[serde(rename = "sectors-and-roles")]
    pub sectors_and_roles: String,

    #[serde(rename = "learning-area")]
    pub learning_area: String,

    #[serde(rename = "position-type")]
    pub position_type: String,

    pub sort: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gazette.education.govt.nz".to_string(),
            start_url: None,
            region: "new-zealand-nation-wide".to_string(),
            sectors_and_roles: "secondary-wharekura".to_string(),
            learning_area: "the-new-zealand-curriculum".to_string(),
            position_type: "full-time".to_string(),
            sort: "closing".to_string(),
        }
    }
}

/// Filter criteria as written in the configuration file
///
/// Keywords are kept raw here; [`FilterSection::to_filter_config`] normalizes them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterSection {
    #[serde(rename = "beginning-teacher-only")]
    pub beginning_teacher_only: bool,

    #[serde(rename = "permanent-only")]
    pub permanent_only: bool,

    pub keywords: Vec<String>,
}

impl FilterSection {
    /// Builds the immutable filter used by a crawl
    pub fn to_filter_config(&self) -> FilterConfig {
        FilterConfig::new(
            self.beginning_teacher_only,
            self.permanent_only,
            &self.keywords,
        )
    }
}
