//! Event-Sweep: a paginated event listings scraper
//!
//! This crate walks the pages of an HTML event listings site, following the
//! "next page" link until it runs out or a record limit is reached, and turns
//! every listing it finds into an [`EventRecord`].

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Event-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Errors raised while retrieving a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid page URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: ::url::ParseError,
    },

    #[error("HTTP error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Errors raised when a page lacks the expected listing structure
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No event listings found on {url}")]
    NoListings { url: String },

    #[error("Listing {index} on {url} has no {field}")]
    MissingField {
        url: String,
        index: usize,
        field: &'static str,
    },

    #[error("Listing {index} on {url} has a non-numeric attendee count: {text:?}")]
    InvalidAttendeeCount {
        url: String,
        index: usize,
        text: String,
    },

    #[error("Next page link {href:?} on {url} cannot be resolved")]
    InvalidNextLink { url: String, href: String },
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

    #[error("Invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for Event-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{PageFetcher, PageSource, PaginationTraverser, PartialTraversal};
pub use state::{EventRecord, PageResult, TraversalState};
