//! HTML parser for event listings pages
//!
//! This module turns one listings page into a [`PageResult`]:
//! - One [`EventRecord`] per listing element, in document order
//! - The absolute URL of the next page, if the page links to one

use crate::config::SelectorConfig;
use crate::state::{EventRecord, PageResult};
use crate::{ConfigError, ParseError};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled selectors for a listings page layout
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    listing: Selector,
    title: Selector,
    venue: Selector,
    date: Selector,
    date_attribute: String,
    attending: Selector,
    next: Selector,
}

impl ListingSelectors {
    /// Compiles the configured selectors
    ///
    /// The venue marker is turned into an `[href*="..."]` attribute selector,
    /// matching the first element whose link target contains it.
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            listing: compile_selector(&config.listing)?,
            title: compile_selector(&config.title)?,
            venue: compile_selector(&format!(r#"[href*="{}"]"#, config.venue_marker))?,
            date: compile_selector(&config.date)?,
            date_attribute: config.date_attribute.clone(),
            attending: compile_selector(&config.attending)?,
            next: compile_selector(&config.next)?,
        })
    }
}

fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Parses a listings page
///
/// # Arguments
///
/// * `html` - The page body
/// * `page_url` - The URL the page was requested from; relative next links
///   are resolved against it
/// * `selectors` - The page layout
///
/// # Returns
///
/// * `Ok(PageResult)` - The page's records and next link
/// * `Err(ParseError)` - The page has no listings, or a listing is missing a
///   required field
///
/// # Example
///
/// ```
/// use event_sweep::config::SelectorConfig;
/// use event_sweep::crawler::{parse_listing_page, ListingSelectors};
/// use url::Url;
///
/// let html = r#"<ul>
///   <li class="event-item">
///     <h1 class="event-title"><a href="/events/1">Night One</a></h1>
///     <a href="/club.aspx?id=7">Flash</a>
///     <time itemprop="startDate" datetime="2019-03-01T22:00">Fri</time>
///   </li>
/// </ul>
/// <li id="liNext"><a href="?page=2">Next</a></li>"#;
///
/// let url = Url::parse("https://example.com/events").unwrap();
/// let selectors = ListingSelectors::compile(&SelectorConfig::default()).unwrap();
/// let page = parse_listing_page(html, &url, &selectors).unwrap();
/// assert_eq!(page.records[0].venue, "Flash");
/// assert_eq!(page.next_url.as_deref(), Some("https://example.com/events?page=2"));
/// ```
pub fn parse_listing_page(
    html: &str,
    page_url: &Url,
    selectors: &ListingSelectors,
) -> Result<PageResult, ParseError> {
    let document = Html::parse_document(html);

    let records = document
        .select(&selectors.listing)
        .enumerate()
        .map(|(index, listing)| extract_event(listing, index, page_url, selectors))
        .collect::<Result<Vec<_>, _>>()?;

    if records.is_empty() {
        return Err(ParseError::NoListings {
            url: page_url.to_string(),
        });
    }

    let next_url = extract_next_url(&document, page_url, selectors)?;

    Ok(PageResult { records, next_url })
}

/// Extracts one event from a listing element
pub fn extract_event(
    listing: ElementRef<'_>,
    index: usize,
    page_url: &Url,
    selectors: &ListingSelectors,
) -> Result<EventRecord, ParseError> {
    let missing = |field: &'static str| ParseError::MissingField {
        url: page_url.to_string(),
        index,
        field,
    };

    let name = listing
        .select(&selectors.title)
        .next()
        .map(element_text)
        .ok_or_else(|| missing("name"))?;

    let venue = listing
        .select(&selectors.venue)
        .next()
        .map(element_text)
        .ok_or_else(|| missing("venue"))?;

    let date = listing
        .select(&selectors.date)
        .next()
        .and_then(|time| time.value().attr(&selectors.date_attribute))
        .map(|value| value.trim().to_string())
        .ok_or_else(|| missing("date"))?;

    let attendee_count = match listing.select(&selectors.attending).next() {
        Some(attending) => {
            let text = element_text(attending);
            Some(parse_count(&text).ok_or_else(|| ParseError::InvalidAttendeeCount {
                url: page_url.to_string(),
                index,
                text,
            })?)
        }
        None => None,
    };

    Ok(EventRecord {
        name,
        venue,
        date,
        attendee_count,
    })
}

/// Resolves the next-page link, if the page has one
///
/// A missing element, a missing `href`, or a blank `href` all end pagination.
fn extract_next_url(
    document: &Html,
    page_url: &Url,
    selectors: &ListingSelectors,
) -> Result<Option<String>, ParseError> {
    let href = match document
        .select(&selectors.next)
        .next()
        .and_then(|next| next.value().attr("href"))
        .map(str::trim)
    {
        Some(href) if !href.is_empty() => href,
        _ => return Ok(None),
    };

    page_url
        .join(href)
        .map(|url| Some(url.to_string()))
        .map_err(|_| ParseError::InvalidNextLink {
            url: page_url.to_string(),
            href: href.to_string(),
        })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses literal digit text; no sign, separators, or words
fn parse_count(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
