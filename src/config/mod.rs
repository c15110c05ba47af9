//! Configuration module for Event-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use event_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Listings selector: {}", config.selectors.listing);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, OutputConfig, ScrapeConfig, SelectorConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};

pub use validation::{validate, validate_start_url};
