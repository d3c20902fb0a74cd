//! Tracker client
//!
//! This module contains the session-aware client for an osTicket tracker:
//! - Lazy login on first use
//! - Ticket page fetching with a single relogin-and-retry when the session expired
//! - Schema-specific login forms and page parsing

mod page;
mod schema;
mod session;

pub use page::Page;
pub use schema::TrackerSchema;
pub use session::{build_http_client, FormData, Session};

use crate::config::{Config, HttpConfig, TrackerConfig};
use crate::{ConfigError, RequestError, RequestResult};

/// A ticket as it is linked into the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketData {
    /// Visible link text, e.g. `Ticket #123456`
    pub ticket_label: String,

    /// Ticket subject
    pub title: String,

    /// Canonical ticket page URL
    pub url: String,
}

/// Client for one tracker
///
/// Owns at most one session. The session is created by the first login and
/// replaced by every later one; it lives as long as the tracker.
pub struct BugTracker {
    config: TrackerConfig,
    http: HttpConfig,
    session: Option<Session>,
}

impl BugTracker {
    /// Creates a tracker client; the schema is fixed from here on
    pub fn new(config: TrackerConfig, http: HttpConfig) -> Self {
        Self {
            config,
            http,
            session: None,
        }
    }

    /// Creates a tracker client from a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tracker.clone(), config.http.clone())
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn schema(&self) -> TrackerSchema {
        self.config.schema
    }

    /// Returns true once a session has been opened
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Applies preference updates before a lookup
    ///
    /// Any change to url or credentials drops the current session, so the
    /// next lookup logs in with the new values. The schema cannot be changed
    /// on an existing tracker.
    pub fn set_config<I, K, V>(&mut self, items: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut updated = self.config.clone();
        let mut changed = false;

        for (key, value) in items {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key == "schema" && value.parse::<TrackerSchema>()? != self.config.schema {
                return Err(ConfigError::Validation(format!(
                    "tracker schema is fixed to '{}' once the tracker is created",
                    self.config.schema
                )));
            }
            changed |= updated.set(key, value)?;
        }

        if changed {
            tracing::debug!("tracker settings changed, dropping session");
            self.config = updated;
            self.session = None;
        }

        Ok(())
    }

    /// Full URL of the ticket page
    pub fn ticket_url(&self, ticket_id: &str) -> String {
        format!(
            "{}{}",
            self.config.base_url(),
            self.schema().ticket_path(ticket_id)
        )
    }

    /// Full URL of the login form
    pub fn login_url(&self) -> String {
        format!("{}{}", self.config.base_url(), self.schema().login_path())
    }

    /// Logs in unless a session already exists
    pub async fn ensure_session(&mut self) -> RequestResult<()> {
        let session = self.take_session().await?;
        self.session = Some(session);
        Ok(())
    }

    /// Opens a fresh session and logs in with the current credentials
    ///
    /// The previous session is dropped first. The new one is kept only if the
    /// tracker accepts the credentials, so a failed login leaves no session.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The tracker accepted the credentials
    /// * `Err(RequestError::InvalidCredentials)` - The login form came back
    /// * `Err(RequestError)` - The tracker could not be reached or the login
    ///   form lacks its token
    pub async fn login(&mut self) -> RequestResult<()> {
        self.session = None;
        let session = self.authenticate().await?;
        self.session = Some(session);
        Ok(())
    }

    /// Fetches and parses a ticket page
    ///
    /// # Request Flow
    ///
    /// 1. Log in if no session exists yet
    /// 2. Fetch the ticket page
    /// 3. If the tracker answered with its login form, the session expired:
    ///    log in again and fetch the page once more. There is no further retry.
    /// 4. Parse label and title from the page
    pub async fn get_ticket_data(&mut self, ticket_id: &str) -> RequestResult<TicketData> {
        let ticket_url = self.ticket_url(ticket_id);
        let schema = self.schema();

        let session = self.take_session().await?;
        let mut page = self.fetch(session, &ticket_url).await?;

        if !schema.is_login_valid(&page) {
            tracing::warn!(url = %ticket_url, "session expired, logging in again");
            self.session = None;
            let session = self.authenticate().await?;
            page = self.fetch(session, &ticket_url).await?;

            if !schema.is_login_valid(&page) {
                self.session = None;
                return Err(RequestError::InvalidCredentials);
            }
        }

        let data = schema.parse_ticket_page(&page, &ticket_url, ticket_id)?;
        tracing::debug!(label = %data.ticket_label, title = %data.title, "parsed ticket page");
        Ok(data)
    }

    /// Takes the current session out of the tracker, logging in if there is none
    async fn take_session(&mut self) -> RequestResult<Session> {
        match self.session.take() {
            Some(session) => Ok(session),
            None => self.authenticate().await,
        }
    }

    /// Opens a new session and posts the login form through it
    async fn authenticate(&self) -> RequestResult<Session> {
        let login_url = self.login_url();
        let schema = self.schema();
        let session = Session::open(&self.http, &login_url)?;

        let login_page = if schema.needs_login_token() {
            Some(session.request(&login_url, &[]).await?)
        } else {
            None
        };

        let form = schema.login_form(&self.config, login_page.as_ref(), &login_url)?;

        tracing::info!(url = %login_url, user = %self.config.user, "logging in");
        let response = session.request(&login_url, &form).await?;

        if !schema.is_login_valid(&response) {
            tracing::warn!(url = %login_url, user = %self.config.user, "login rejected");
            return Err(RequestError::InvalidCredentials);
        }

        Ok(session)
    }

    /// Requests `url` over a logged-in session and stores the session back
    async fn fetch(&mut self, session: Session, url: &str) -> RequestResult<Page> {
        let page = session.request(url, &[]).await;
        self.session = Some(session);
        page
    }
}
