//! Pagination traversal - the main scrape loop
//!
//! The traverser fetches a start page, then follows each page's "next" link
//! until there is none or the soft record limit has been passed, appending
//! every page's records in fetch order.

use crate::crawler::fetcher::PageSource;
use crate::crawler::observer::{NullObserver, TraversalObserver};
use crate::state::{PageResult, TraversalState};
use crate::SweepError;
use thiserror::Error;

/// A traversal that failed part-way, with the records gathered before the
/// failure
#[derive(Debug, Error)]
#[error(
    "traversal aborted after {} pages ({} events kept): {error}",
    .state.pages_fetched,
    .state.offset()
)]
pub struct PartialTraversal {
    /// State as of the last successful page
    pub state: TraversalState,

    /// The failure that stopped the traversal
    #[source]
    pub error: SweepError,
}

/// Drives a [`PageSource`] across a chain of listings pages
pub struct PaginationTraverser<S> {
    source: S,
    observer: Box<dyn TraversalObserver>,
}

impl<S: PageSource> PaginationTraverser<S> {
    /// Creates a traverser that reports nothing
    pub fn new(source: S) -> Self {
        Self {
            source,
            observer: Box::new(NullObserver),
        }
    }

    /// Replaces the progress observer
    pub fn with_observer(mut self, observer: impl TraversalObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Returns the underlying page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Traverses the page chain starting at `start_url`
    ///
    /// The start page is always fetched. Before each following page, the
    /// traversal stops if more than `limit` records have been accumulated.
    /// Because the check is strictly greater-than and happens between pages,
    /// the result can hold more than `limit` records. A limit of zero counts
    /// as no limit.
    ///
    /// Any failure aborts the traversal and only the error is returned; use
    /// [`traverse_partial`](Self::traverse_partial) to keep the records
    /// gathered before it.
    ///
    /// # Returns
    ///
    /// * `Ok(TraversalState)` - All accumulated records and the final position
    /// * `Err(SweepError)` - The first fetch or parse failure
    pub async fn traverse(
        &self,
        start_url: &str,
        limit: Option<usize>,
    ) -> Result<TraversalState, SweepError> {
        let page = self.fetch_page(start_url).await?;
        let mut state = TraversalState::from_first_page(start_url, page);
        self.follow(&mut state, limit).await?;

        self.observer.finished(&state);
        Ok(state)
    }

    /// Like [`traverse`](Self::traverse), but a failure carries the records
    /// gathered before it
    pub async fn traverse_partial(
        &self,
        start_url: &str,
        limit: Option<usize>,
    ) -> Result<TraversalState, PartialTraversal> {
        let mut state = match self.fetch_page(start_url).await {
            Ok(page) => TraversalState::from_first_page(start_url, page),
            Err(error) => {
                return Err(PartialTraversal {
                    state: TraversalState::default(),
                    error,
                })
            }
        };

        match self.follow(&mut state, limit).await {
            Ok(()) => {
                self.observer.finished(&state);
                Ok(state)
            }
            Err(error) => Err(PartialTraversal { state, error }),
        }
    }

    /// Continues an earlier traversal
    ///
    /// When `from` is given, it replaces whatever next page `state` was
    /// pointing at. The limit is checked before the first fetch as well.
    /// Records are appended to `state` with no deduplication, so restarting
    /// from an already visited page collects its listings again.
    ///
    /// On failure `state` keeps every page appended before the error.
    pub async fn resume(
        &self,
        state: &mut TraversalState,
        from: Option<&str>,
        limit: Option<usize>,
    ) -> Result<(), SweepError> {
        if let Some(url) = from {
            state.next_url = Some(url.to_string());
        }

        self.follow(state, limit).await?;

        self.observer.finished(state);
        Ok(())
    }

    /// Follows next links from the current position
    async fn follow(
        &self,
        state: &mut TraversalState,
        limit: Option<usize>,
    ) -> Result<(), SweepError> {
        // Zero disables the limit
        let limit = limit.filter(|limit| *limit > 0);

        while !state.is_exhausted() {
            if let Some(limit) = limit {
                if state.exceeds(limit) {
                    self.observer.limit_reached(state.offset(), limit);
                    break;
                }
            }

            let Some(next_url) = state.next_url.clone() else {
                break;
            };
            let page = self.fetch_page(&next_url).await?;
            state.record_page(&next_url, page);
        }

        Ok(())
    }

    /// Fetches one page, reporting progress to the observer
    async fn fetch_page(&self, url: &str) -> Result<PageResult, SweepError> {
        self.observer.page_requested(url);

        let page = self.source.fetch(url).await?;
        self.observer.page_parsed(url, page.records.len());

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;
    use crate::crawler::parser::{parse_listing_page, ListingSelectors};
    use crate::{FetchError, ParseError};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use url::Url;

    const BASE: &str = "https://listings.test/events/page/";

    /// Serves canned HTML pages, answering 404 for anything else
    struct StaticSource {
        pages: HashMap<String, String>,
        selectors: ListingSelectors,
        requested: Mutex<Vec<String>>,
    }

    impl StaticSource {
        fn new(pages: HashMap<String, String>) -> Self {
            Self {
                pages,
                selectors: ListingSelectors::compile(&SelectorConfig::default()).unwrap(),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl PageSource for StaticSource {
        async fn fetch(&self, url: &str) -> Result<PageResult, SweepError> {
            self.requested.lock().unwrap().push(url.to_string());

            let page_url = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
                url: url.to_string(),
                source,
            })?;
            let html = self.pages.get(url).ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })?;
            Ok(parse_listing_page(html, &page_url, &self.selectors)?)
        }
    }

    #[derive(Clone, Default)]
    struct RecordingObserver {
        notices: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingObserver {
        fn notices(&self) -> Vec<String> {
            self.notices.lock().unwrap().clone()
        }
    }

    impl TraversalObserver for RecordingObserver {
        fn page_requested(&self, url: &str) {
            self.notices.lock().unwrap().push(format!("requested {}", url));
        }

        fn page_parsed(&self, url: &str, records_found: usize) {
            self.notices
                .lock()
                .unwrap()
                .push(format!("parsed {} ({})", url, records_found));
        }

        fn limit_reached(&self, offset: usize, limit: usize) {
            self.notices
                .lock()
                .unwrap()
                .push(format!("limit {}/{}", offset, limit));
        }

        fn finished(&self, state: &TraversalState) {
            self.notices
                .lock()
                .unwrap()
                .push(format!("finished {}", state.offset()));
        }
    }

    fn page_url(number: usize) -> String {
        format!("{}{}", BASE, number)
    }

    /// A listings page with `count` events; the next link is relative
    fn listings_page(number: usize, count: usize, has_next: bool) -> String {
        let listings: String = (0..count)
            .map(|i| {
                format!(
                    r#"<li class="event-item">
                        <h1 class="event-title"><a href="/events/{number}-{i}">P{number} Event {i}</a></h1>
                        <a href="/club.aspx?id={i}">Club {i}</a>
                        <time itemprop="startDate" datetime="2019-03-0{number}T22:00">Night</time>
                    </li>"#
                )
            })
            .collect();
        let next = if has_next {
            format!(r#"<li id="liNext"><a href="/events/page/{}">Next</a></li>"#, number + 1)
        } else {
            r#"<li id="liNext"><a>Next</a></li>"#.to_string()
        };
        format!("<html><body><ul>{}</ul><ul>{}</ul></body></html>", listings, next)
    }

    /// page1 -> page2 -> page3 -> none, five events each
    fn three_page_chain() -> HashMap<String, String> {
        HashMap::from([
            (page_url(1), listings_page(1, 5, true)),
            (page_url(2), listings_page(2, 5, true)),
            (page_url(3), listings_page(3, 5, false)),
        ])
    }

    fn names(state: &TraversalState) -> Vec<&str> {
        state.accumulated.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_traverse_full_chain() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));

        let state = traverser.traverse(&page_url(1), None).await.unwrap();

        assert_eq!(state.offset(), 15);
        assert_eq!(state.pages_fetched, 3);
        assert_eq!(state.current_url, page_url(3));
        assert!(state.is_exhausted());
        assert_eq!(names(&state)[0], "P1 Event 0");
        assert_eq!(names(&state)[14], "P3 Event 4");
        assert_eq!(
            traverser.source().requested(),
            vec![page_url(1), page_url(2), page_url(3)]
        );
    }

    #[tokio::test]
    async fn test_limit_overshoots() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));

        let state = traverser.traverse(&page_url(1), Some(7)).await.unwrap();

        assert_eq!(state.offset(), 10);
        assert_eq!(state.pages_fetched, 2);
        assert_eq!(state.next_url, Some(page_url(3)));
        assert_eq!(traverser.source().requested(), vec![page_url(1), page_url(2)]);
    }

    #[tokio::test]
    async fn test_limit_equal_to_offset_keeps_going() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));

        let state = traverser.traverse(&page_url(1), Some(10)).await.unwrap();

        assert_eq!(state.offset(), 15);
        assert_eq!(state.pages_fetched, 3);
    }

    #[tokio::test]
    async fn test_limit_below_first_page() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));

        let state = traverser.traverse(&page_url(1), Some(4)).await.unwrap();

        assert_eq!(state.offset(), 5);
        assert_eq!(state.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_zero_limit_follows_every_page() {
        let observer = RecordingObserver::default();
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()))
            .with_observer(observer.clone());

        let state = traverser.traverse(&page_url(1), Some(0)).await.unwrap();

        assert_eq!(state.offset(), 15);
        assert_eq!(state.pages_fetched, 3);
        assert!(!observer.notices().iter().any(|n| n.starts_with("limit")));
    }

    #[tokio::test]
    async fn test_resume_with_zero_limit_is_unlimited() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));
        let mut state = traverser.traverse(&page_url(1), None).await.unwrap();

        traverser
            .resume(&mut state, Some(&page_url(3)), Some(0))
            .await
            .unwrap();

        assert_eq!(state.offset(), 20);
    }

    #[tokio::test]
    async fn test_traverse_from_mid_chain() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));

        let state = traverser.traverse(&page_url(2), None).await.unwrap();

        assert_eq!(state.offset(), 10);
        assert_eq!(state.pages_fetched, 2);
        assert!(names(&state).iter().all(|name| !name.starts_with("P1")));
    }

    #[tokio::test]
    async fn test_resume_from_explicit_url_does_not_deduplicate() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));
        let mut state = traverser.traverse(&page_url(1), None).await.unwrap();

        traverser
            .resume(&mut state, Some(&page_url(2)), None)
            .await
            .unwrap();

        assert_eq!(state.offset(), 25);
        assert_eq!(state.pages_fetched, 5);
        let p2_first = names(&state)
            .iter()
            .filter(|name| **name == "P2 Event 0")
            .count();
        assert_eq!(p2_first, 2);
    }

    #[tokio::test]
    async fn test_resume_discards_previous_next_pointer() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));
        let mut state = traverser.traverse(&page_url(1), Some(4)).await.unwrap();
        assert_eq!(state.next_url, Some(page_url(2)));

        traverser
            .resume(&mut state, Some(&page_url(3)), None)
            .await
            .unwrap();

        assert_eq!(state.offset(), 10);
        assert_eq!(
            traverser.source().requested(),
            vec![page_url(1), page_url(3)]
        );
    }

    #[tokio::test]
    async fn test_resume_checks_limit_before_first_fetch() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));
        let mut state = traverser.traverse(&page_url(1), None).await.unwrap();

        traverser
            .resume(&mut state, Some(&page_url(1)), Some(7))
            .await
            .unwrap();

        assert_eq!(state.offset(), 15);
        assert_eq!(traverser.source().requested().len(), 3);
    }

    #[tokio::test]
    async fn test_resume_exhausted_state_fetches_nothing() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));
        let mut state = traverser.traverse(&page_url(1), None).await.unwrap();

        traverser.resume(&mut state, None, None).await.unwrap();

        assert_eq!(state.offset(), 15);
        assert_eq!(traverser.source().requested().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts() {
        let mut pages = three_page_chain();
        pages.remove(&page_url(3));
        let traverser = PaginationTraverser::new(StaticSource::new(pages));

        let result = traverser.traverse(&page_url(1), None).await;

        assert!(matches!(
            result,
            Err(SweepError::Fetch(FetchError::Status { status: 404, .. }))
        ));
    }

    #[tokio::test]
    async fn test_resume_from_malformed_url_is_fetch_error() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));
        let mut state = traverser.traverse(&page_url(1), Some(4)).await.unwrap();

        let result = traverser.resume(&mut state, Some("not a url"), None).await;

        assert!(matches!(
            result,
            Err(SweepError::Fetch(FetchError::InvalidUrl { ref url, .. })) if url == "not a url"
        ));
        assert_eq!(state.offset(), 5);
        assert_eq!(state.next_url.as_deref(), Some("not a url"));
    }

    #[tokio::test]
    async fn test_parse_failure_aborts() {
        let mut pages = three_page_chain();
        pages.insert(page_url(2), "<html><body>Maintenance</body></html>".to_string());
        let traverser = PaginationTraverser::new(StaticSource::new(pages));

        let result = traverser.traverse(&page_url(1), None).await;

        assert!(matches!(
            result,
            Err(SweepError::Parse(ParseError::NoListings { .. }))
        ));
        assert_eq!(traverser.source().requested(), vec![page_url(1), page_url(2)]);
    }

    #[tokio::test]
    async fn test_traverse_partial_keeps_records_before_failure() {
        let mut pages = three_page_chain();
        pages.remove(&page_url(3));
        let traverser = PaginationTraverser::new(StaticSource::new(pages));

        let partial = traverser
            .traverse_partial(&page_url(1), None)
            .await
            .unwrap_err();

        assert_eq!(partial.state.offset(), 10);
        assert_eq!(partial.state.pages_fetched, 2);
        assert_eq!(partial.state.current_url, page_url(2));
        assert!(matches!(partial.error, SweepError::Fetch(_)));
        assert!(partial.to_string().contains("after 2 pages"));
    }

    #[tokio::test]
    async fn test_traverse_partial_first_page_failure() {
        let traverser = PaginationTraverser::new(StaticSource::new(HashMap::new()));

        let partial = traverser
            .traverse_partial(&page_url(1), None)
            .await
            .unwrap_err();

        assert_eq!(partial.state.offset(), 0);
        assert_eq!(partial.state.pages_fetched, 0);
    }

    #[tokio::test]
    async fn test_traverse_partial_success_matches_traverse() {
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()));

        let partial = traverser.traverse_partial(&page_url(1), Some(7)).await.unwrap();
        let strict = traverser.traverse(&page_url(1), Some(7)).await.unwrap();

        assert_eq!(partial, strict);
    }

    #[tokio::test]
    async fn test_observer_notices() {
        let observer = RecordingObserver::default();
        let traverser = PaginationTraverser::new(StaticSource::new(three_page_chain()))
            .with_observer(observer.clone());

        traverser.traverse(&page_url(1), Some(7)).await.unwrap();

        assert_eq!(
            observer.notices(),
            vec![
                format!("requested {}", page_url(1)),
                format!("parsed {} (5)", page_url(1)),
                format!("requested {}", page_url(2)),
                format!("parsed {} (5)", page_url(2)),
                "limit 10/7".to_string(),
                "finished 10".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_observer_not_finished_on_failure() {
        let observer = RecordingObserver::default();
        let traverser =
            PaginationTraverser::new(StaticSource::new(HashMap::new())).with_observer(observer.clone());

        assert!(traverser.traverse(&page_url(1), None).await.is_err());
        assert_eq!(observer.notices(), vec![format!("requested {}", page_url(1))]);
    }
}
