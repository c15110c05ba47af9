use crate::output::OutputFormat;
use serde::Deserialize;

/// Main configuration structure for Event-Sweep
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the defaults for the Resident Advisor listings layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scrape: ScrapeConfig,
    pub http: HttpConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
}

/// Traversal configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// URL of the first listings page
    #[serde(rename = "start-url")]
    pub start_url: Option<String>,

    /// Soft record limit, checked before each page after the first; 0 means none
    pub limit: Option<usize>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent sent with every request; reqwest's default when unset
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// CSS selectors describing the listings page layout
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One element per event listing
    pub listing: String,

    /// Title link inside a listing
    pub title: String,

    /// Token that venue link targets contain (e.g. "/club.aspx?id=")
    #[serde(rename = "venue-marker")]
    pub venue_marker: String,

    /// Time element inside a listing
    pub date: String,

    /// Attribute of the time element holding the machine-readable date
    #[serde(rename = "date-attribute")]
    pub date_attribute: String,

    /// Optional attendee count element inside a listing
    pub attending: String,

    /// Page-level "next page" link
    pub next: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing: ".event-item".to_string(),
            title: ".event-title a".to_string(),
            venue_marker: "club".to_string(),
            date: r#"time[itemprop="startDate"]"#.to_string(),
            date_attribute: "datetime".to_string(),
            attending: ".attending span".to_string(),
            next: "#liNext a".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Rendering of the scraped records
    pub format: OutputFormat,

    /// File to write to; stdout when unset
    pub path: Option<String>,
}
