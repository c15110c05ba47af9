//! Event listing records produced by the page parser

use serde::Serialize;
use std::fmt;

/// A single event listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Event name, from the listing's title link
    pub name: String,

    /// Venue name, from the first venue link in the listing
    pub venue: String,

    /// Start date as published by the site (ISO-8601-like)
    pub date: String,

    /// Number of attendees, when the listing shows one
    pub attendee_count: Option<u32>,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} ({})", self.name, self.venue, self.date)?;
        if let Some(count) = self.attendee_count {
            write!(f, " [{} attending]", count)?;
        }
        Ok(())
    }
}

/// Everything extracted from one fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Listings in document order
    pub records: Vec<EventRecord>,

    /// Absolute URL of the next page; `None` ends pagination
    pub next_url: Option<String>,
}

impl PageResult {
    /// Returns true if this page links to another one
    pub fn has_next(&self) -> bool {
        self.next_url.is_some()
    }
}
