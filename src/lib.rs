//! Ticket-Link: osTicket links at the cursor
//!
//! This crate logs into an osTicket installation, fetches the page of a single
//! ticket, scrapes its label and title, and inserts a link to it into a host
//! document editor.

pub mod config;
pub mod editor;
pub mod link;
pub mod tracker;

use thiserror::Error;

/// Errors raised while talking to the tracker
///
/// The display text is meant to be shown to the user verbatim.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Transport failure reaching or reading the remote site
    #[error("Page {url} is unreachable ({reason}). Please check the URL in the tracker settings.")]
    Unreachable { url: String, reason: String },

    /// The tracker still shows its login form after credentials were posted
    #[error("Login name or password is incorrect. Please check the tracker settings.")]
    InvalidCredentials,

    /// The site answered, but the page lacks the elements the schema expects
    #[error("Unexpected page at {url}: {message}")]
    UnexpectedPage { url: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for tracker requests
pub type RequestResult<T> = std::result::Result<T, RequestError>;

// Re-export commonly used types
pub use config::{Config, TrackerConfig};
pub use editor::{Editor, LinkFormat, TextBuffer};
pub use link::{insert_ticket_link, LinkOutcome};
pub use tracker::{BugTracker, TicketData, TrackerSchema};
