//! Crawler module for listings page fetching and traversal
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching of listings pages
//! - HTML parsing into event records and next-page links
//! - Pagination traversal with a soft record limit
//! - Progress observation

mod fetcher;
mod observer;
mod parser;
mod traverser;

pub use fetcher::{build_http_client, PageFetcher, PageSource};
pub use observer::{NullObserver, TracingObserver, TraversalObserver};
pub use parser::{extract_event, parse_listing_page, ListingSelectors};
pub use traverser::{PaginationTraverser, PartialTraversal};

use crate::config::Config;
use crate::state::TraversalState;
use crate::SweepError;

/// Runs a complete scrape with the given configuration
///
/// This is the main entry point for a one-shot scrape. It will:
/// 1. Build the HTTP client and compile the selectors
/// 2. Traverse the page chain from `start_url`, logging progress via `tracing`
/// 3. Return the accumulated records and final position
///
/// # Arguments
///
/// * `config` - The scraper configuration (HTTP and selector sections)
/// * `start_url` - URL of the first listings page
/// * `limit` - Soft record limit
pub async fn scrape(
    config: &Config,
    start_url: &str,
    limit: Option<usize>,
) -> Result<TraversalState, SweepError> {
    let fetcher = PageFetcher::from_config(config)?;
    PaginationTraverser::new(fetcher)
        .with_observer(TracingObserver)
        .traverse(start_url, limit)
        .await
}
