//! HTTP session with the tracker
//!
//! A session is one cookie-bearing HTTP client. Every request is a form POST,
//! which is what the osTicket pages accept for both login and ticket views.

use crate::config::HttpConfig;
use crate::tracker::page::Page;
use crate::{RequestError, RequestResult};
use reqwest::Client;
use std::time::Duration;

/// Form fields posted to the tracker
pub type FormData = Vec<(&'static str, String)>;

/// Builds an HTTP client with a cookie store
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .cookie_store(true)
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// A cookie-persisting connection to the tracker
pub struct Session {
    client: Client,
}

impl Session {
    /// Opens a new session with an empty cookie jar
    ///
    /// `origin` is only used to describe the failure if the client cannot be built.
    pub fn open(config: &HttpConfig, origin: &str) -> RequestResult<Self> {
        let client = build_http_client(config).map_err(|e| RequestError::Unreachable {
            url: origin.to_string(),
            reason: format!("failed to build HTTP client: {}", e),
        })?;

        Ok(Self { client })
    }

    /// POSTs the form to `url` and parses the response body
    ///
    /// The status code is not interpreted: osTicket answers error and login
    /// pages with regular HTML, so classification is left to the schema.
    pub async fn request(&self, url: &str, form: &[(&'static str, String)]) -> RequestResult<Page> {
        tracing::debug!(url, fields = form.len(), "POST");

        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| unreachable(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "tracker answered with error status");
        }

        let body = response.text().await.map_err(|e| unreachable(url, &e))?;
        Ok(Page::parse(&body))
    }
}

/// Classifies a transport error into a user-facing reason
fn unreachable(url: &str, error: &reqwest::Error) -> RequestError {
    let reason = if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        "connection refused".to_string()
    } else if error.is_body() || error.is_decode() {
        "failed to read response body".to_string()
    } else {
        error.to_string()
    };

    RequestError::Unreachable {
        url: url.to_string(),
        reason,
    }
}
