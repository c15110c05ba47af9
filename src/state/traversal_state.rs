//! Progress of a pagination traversal
//!
//! The traverser owns this while a traversal runs and hands it to the caller
//! once the traversal completes.

use crate::state::{EventRecord, PageResult};

/// Records and position accumulated across the pages of one traversal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalState {
    /// Records from every fetched page, in fetch order
    pub accumulated: Vec<EventRecord>,

    /// The URL most recently fetched
    pub current_url: String,

    /// The URL to fetch next; `None` once pagination is exhausted
    pub next_url: Option<String>,

    /// Number of successfully fetched pages
    pub pages_fetched: usize,
}

impl TraversalState {
    /// Builds the state after the first page of a traversal
    pub fn from_first_page(url: &str, page: PageResult) -> Self {
        let mut state = Self::default();
        state.record_page(url, page);
        state
    }

    /// Appends a fetched page and advances the position to it
    ///
    /// Records are appended as-is, with no deduplication against what is
    /// already accumulated.
    pub fn record_page(&mut self, url: &str, page: PageResult) {
        self.accumulated.extend(page.records);
        self.pages_fetched += 1;
        self.current_url = url.to_string();
        self.next_url = page.next_url;
    }

    /// Number of records accumulated so far
    pub fn offset(&self) -> usize {
        self.accumulated.len()
    }

    /// Returns true if the soft limit has been passed
    ///
    /// The check is strictly greater-than: reaching the limit exactly still
    /// allows another page to be fetched. The traverser never passes a zero
    /// limit here; it treats zero as no limit.
    pub fn exceeds(&self, limit: usize) -> bool {
        self.offset() > limit
    }

    /// Returns true if there is no further page to fetch
    pub fn is_exhausted(&self) -> bool {
        self.next_url.is_none()
    }

    /// Consumes the state, returning the accumulated records
    pub fn into_records(self) -> Vec<EventRecord> {
        self.accumulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(count: usize, next: Option<&str>) -> PageResult {
        PageResult {
            records: (0..count)
                .map(|i| EventRecord {
                    name: format!("Event {}", i),
                    venue: "Venue".to_string(),
                    date: "2019-03-01".to_string(),
                    attendee_count: None,
                })
                .collect(),
            next_url: next.map(str::to_string),
        }
    }

    #[test]
    fn test_from_first_page() {
        let state = TraversalState::from_first_page("https://a/1", page(3, Some("https://a/2")));
        assert_eq!(state.offset(), 3);
        assert_eq!(state.pages_fetched, 1);
        assert_eq!(state.current_url, "https://a/1");
        assert_eq!(state.next_url.as_deref(), Some("https://a/2"));
        assert!(!state.is_exhausted());
    }

    #[test]
    fn test_record_page_appends_and_advances() {
        let mut state = TraversalState::from_first_page("https://a/1", page(2, Some("https://a/2")));
        state.record_page("https://a/2", page(4, None));

        assert_eq!(state.offset(), 6);
        assert_eq!(state.pages_fetched, 2);
        assert_eq!(state.current_url, "https://a/2");
        assert!(state.is_exhausted());
    }

    #[test]
    fn test_exceeds_is_strict() {
        let state = TraversalState::from_first_page("https://a/1", page(5, None));
        assert!(!state.exceeds(5));
        assert!(!state.exceeds(6));
        assert!(state.exceeds(4));
        assert!(state.exceeds(0));
    }

    #[test]
    fn test_into_records_preserves_order() {
        let mut state = TraversalState::from_first_page("https://a/1", page(1, Some("https://a/2")));
        state.record_page("https://a/2", page(2, None));

        let names: Vec<_> = state.into_records().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Event 0", "Event 0", "Event 1"]);
    }
}
