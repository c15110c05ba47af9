//! State module for scraped listings and traversal progress
//!
//! # Components
//!
//! - `EventRecord`: One event listing extracted from a page
//! - `PageResult`: The records and next-page link of a single fetched page
//! - `TraversalState`: Records and position accumulated across a traversal

mod record;
mod traversal_state;

// Re-export main types
pub use record::{EventRecord, PageResult};
pub use traversal_state::TraversalState;
