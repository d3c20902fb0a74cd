//! osTicket page schemas
//!
//! The two osTicket layouts we know of differ in how login works and where
//! the ticket heading lives. Everything schema-specific sits here so the
//! fetch flow stays generic.

use crate::config::TrackerConfig;
use crate::tracker::page::Page;
use crate::tracker::session::FormData;
use crate::tracker::TicketData;
use crate::{ConfigError, RequestError, RequestResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// Hidden login form field carrying the anti-forgery token
const CSRF_FIELD: &str = "__CSRFToken__";

/// Page layout served by the tracker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerSchema {
    /// Older layout: plain username/password login, `h2` headings
    Legacy,

    /// Staff control panel layout: CSRF-protected login, `h2`/`h3` headings
    #[default]
    Scp,
}

impl TrackerSchema {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerSchema::Legacy => "legacy",
            TrackerSchema::Scp => "scp",
        }
    }

    /// Path of the login form, relative to the base URL
    pub fn login_path(&self) -> &'static str {
        "login.php"
    }

    /// Path of a ticket page, relative to the base URL
    ///
    /// The identifier is form-encoded so that it stays a single query value:
    /// the path embeds the encoded form of the ID exactly once, which equals
    /// the ID itself when it contains only URL-safe characters.
    pub fn ticket_path(&self, ticket_id: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(ticket_id.as_bytes()).collect();
        format!("tickets.php?id={}", encoded)
    }

    /// Whether the login POST needs a token read from the login form first
    pub fn needs_login_token(&self) -> bool {
        matches!(self, TrackerSchema::Scp)
    }

    /// Returns false if the page is a login prompt rather than content
    pub fn is_login_valid(&self, page: &Page) -> bool {
        match self {
            TrackerSchema::Legacy => !page.contains("input[type=password]"),
            TrackerSchema::Scp => !page.contains("input[name=passwd]"),
        }
    }

    /// Builds the login form
    ///
    /// # Arguments
    ///
    /// * `config` - Credentials to post
    /// * `login_page` - The fetched login form; required when
    ///   [`needs_login_token`](Self::needs_login_token) is true
    /// * `login_url` - Used for error reporting
    pub fn login_form(
        &self,
        config: &TrackerConfig,
        login_page: Option<&Page>,
        login_url: &str,
    ) -> RequestResult<FormData> {
        match self {
            TrackerSchema::Legacy => Ok(vec![
                ("username", config.user.clone()),
                ("password", config.password.clone()),
            ]),
            TrackerSchema::Scp => {
                let token = login_page
                    .and_then(|page| page.attr(&format!("input[name={}]", CSRF_FIELD), "value"))
                    .ok_or_else(|| RequestError::UnexpectedPage {
                        url: login_url.to_string(),
                        message: format!("login form has no {} field", CSRF_FIELD),
                    })?;

                Ok(vec![
                    ("do", "scplogin".to_string()),
                    ("username", config.user.clone()),
                    ("userid", config.user.clone()),
                    ("passwd", config.password.clone()),
                    (CSRF_FIELD, token),
                ])
            }
        }
    }

    /// Extracts label and title from a ticket page
    ///
    /// The first heading inside `#content` is the ticket label
    /// (e.g. `Ticket #123456`), the second one is the subject.
    pub fn parse_ticket_page(
        &self,
        page: &Page,
        url: &str,
        ticket_id: &str,
    ) -> RequestResult<TicketData> {
        let selector = match self {
            TrackerSchema::Legacy => "#content h2",
            TrackerSchema::Scp => "#content h2, #content h3",
        };

        let mut headings = page.texts(selector).into_iter();
        let (Some(ticket_label), Some(title)) = (headings.next(), headings.next()) else {
            return Err(RequestError::UnexpectedPage {
                url: url.to_string(),
                message: format!(
                    "no label and title headings found for ticket {} ({} schema)",
                    ticket_id, self
                ),
            });
        };

        if ticket_label.is_empty() {
            return Err(RequestError::UnexpectedPage {
                url: url.to_string(),
                message: format!("ticket {} has an empty label heading", ticket_id),
            });
        }

        Ok(TicketData {
            ticket_label,
            title,
            url: url.to_string(),
        })
    }
}

impl fmt::Display for TrackerSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackerSchema {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "legacy" => Ok(TrackerSchema::Legacy),
            "scp" => Ok(TrackerSchema::Scp),
            other => Err(ConfigError::Validation(format!(
                "unknown tracker schema '{}', expected 'legacy' or 'scp'",
                other
            ))),
        }
    }
}
