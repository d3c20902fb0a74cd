//! Configuration module for Ticket-Link
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and the key/value updates the host applies before each lookup.
//!
//! # Example
//!
//! ```no_run
//! use ticket_link::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ticket-link.toml")).unwrap();
//! println!("Tracker schema: {}", config.tracker.schema);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, TrackerConfig, DEFAULT_TRACKER_URL};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
