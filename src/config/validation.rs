use crate::config::types::{Config, HttpConfig, ScrapeConfig, SelectorConfig};
use crate::crawler::ListingSelectors;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scrape_config(&config.scrape)?;
    validate_http_config(&config.http)?;
    validate_selector_config(&config.selectors)?;
    Ok(())
}

/// Validates traversal configuration
fn validate_scrape_config(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if let Some(start_url) = &config.start_url {
        validate_start_url(start_url)?;
    }
    Ok(())
}

/// Validates that a start URL is an absolute HTTP(S) URL
pub fn validate_start_url(start_url: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' must use HTTP or HTTPS",
            start_url
        )));
    }

    Ok(url)
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if let Some(user_agent) = &config.user_agent {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agent cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates selector configuration by compiling it
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    let fields = [
        ("listing", &config.listing),
        ("title", &config.title),
        ("venue_marker", &config.venue_marker),
        ("date", &config.date),
        ("date_attribute", &config.date_attribute),
        ("attending", &config.attending),
        ("next", &config.next),
    ];

    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector {} cannot be empty",
                name
            )));
        }
    }

    if config.venue_marker.contains('"') {
        return Err(ConfigError::Validation(format!(
            "venue_marker cannot contain quotes, got '{}'",
            config.venue_marker
        )));
    }

    ListingSelectors::compile(config).map(|_| ())
}
