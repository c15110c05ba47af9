//! Progress notifications for pagination traversals
//!
//! The traverser reports what it is doing through a [`TraversalObserver`]
//! instead of writing to any particular output channel. Frontends pick the
//! implementation: [`TracingObserver`] for log output, [`NullObserver`] to stay
//! silent, or their own.

use crate::state::TraversalState;

/// Receives progress notices from a traversal
///
/// Every method has a no-op default, so implementors only override what they
/// care about.
pub trait TraversalObserver: Send + Sync {
    /// Called before a page is requested
    fn page_requested(&self, _url: &str) {}

    /// Called after a page has been fetched and parsed
    fn page_parsed(&self, _url: &str, _records_found: usize) {}

    /// Called when the soft record limit stops the traversal
    fn limit_reached(&self, _offset: usize, _limit: usize) {}

    /// Called once when a traversal completes without error
    fn finished(&self, _state: &TraversalState) {}
}

/// Observer that ignores every notice
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl TraversalObserver for NullObserver {}

/// Observer that forwards notices to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TraversalObserver for TracingObserver {
    fn page_requested(&self, url: &str) {
        tracing::info!("Scraping {}...", url);
    }

    fn page_parsed(&self, url: &str, records_found: usize) {
        tracing::info!("Found {} events on {}", records_found, url);
    }

    fn limit_reached(&self, offset: usize, limit: usize) {
        tracing::warn!(
            "Stopping: {} events collected, past the limit of {}",
            offset,
            limit
        );
    }

    fn finished(&self, state: &TraversalState) {
        tracing::info!(
            "Traversal finished: {} events across {} pages",
            state.offset(),
            state.pages_fetched
        );
    }
}
