use crate::config::types::{Config, CrawlerConfig, ListingConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on in-flight detail fetches; the origin is a small public service
const MAX_CONCURRENT_DETAILS: u32 = 16;

/// Upper bound on retries for one URL
const MAX_RETRIES: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_listing_config(&config.listing)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_details < 1 || config.max_concurrent_details > MAX_CONCURRENT_DETAILS
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_details must be between 1 and {}, got {}",
            MAX_CONCURRENT_DETAILS, config.max_concurrent_details
        )));
    }

    if config.max_retries > MAX_RETRIES {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= {}, got {}",
            MAX_RETRIES, config.max_retries
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates listing configuration
fn validate_listing_config(config: &ListingConfig) -> Result<(), ConfigError> {
    validate_http_url("base_url", &config.base_url)?;

    if let Some(start_url) = &config.start_url {
        validate_http_url("start_url", start_url)?;
    }

    for (name, value) in [
        ("region", &config.region),
        ("sectors_and_roles", &config.sectors_and_roles),
        ("learning_area", &config.learning_area),
        ("position_type", &config.position_type),
        ("sort", &config.sort),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "listing {} cannot be empty",
                name
            )));
        }
    }

    Ok(())
}

/// Validates that a URL parses and uses HTTP or HTTPS
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use HTTP or HTTPS",
            name, value
        )));
    }

    Ok(())
}
