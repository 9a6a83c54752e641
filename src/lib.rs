//! Vacancy Sieve: a polite vacancy listing crawler
//!
//! This crate walks a paginated vacancy listing, filters candidates against a
//! [`FilterConfig`], enriches survivors from their detail pages, drops duplicate
//! detail URLs and returns the records sorted by closing date.

pub mod config;
pub mod crawler;
pub mod filter;
pub mod output;
pub mod record;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Vacancy Sieve operations
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {source}")]
    Fetch { url: String, source: FetchError },

    #[error("Failed to parse {url}: {source}")]
    Parse { url: String, source: ParseError },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid crawl phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Transport-level failure of a single page retrieval
///
/// A fetch either yields the whole body or one of these; partial content is
/// never returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Classifies a reqwest error into a fetch error kind
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if let Some(status) = error.status() {
            Self::HttpStatus(status.as_u16())
        } else {
            Self::Network(error.to_string())
        }
    }

    /// Returns true if a later attempt at the same URL may succeed
    ///
    /// Timeouts, network failures, HTTP 429 and 5xx are transient; every other
    /// status is treated as permanent.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) => true,
            Self::HttpStatus(code) => *code == 429 || (500..600).contains(code),
        }
    }
}

/// Page structure errors raised while extracting a listing or detail page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("page contains no vacancy detail fields")]
    NotAVacancyPage,
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for Vacancy Sieve operations
pub type Result<T> = std::result::Result<T, SieveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Controller, CrawlOutcome, CrawlSettings};
pub use filter::FilterConfig;
pub use record::{CalendarDate, CandidateSummary, VacancyRecord};
pub use state::{CrawlPhase, CrawlState};
