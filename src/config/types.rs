use crate::config::validation::validate_base_url;
use crate::tracker::TrackerSchema;
use crate::ConfigError;
use serde::Deserialize;
use std::fmt;

/// Base URL used until the user configures their own tracker
pub const DEFAULT_TRACKER_URL: &str = "http://www.ostickethacks.com/demo/scp/";

/// Main configuration structure for Ticket-Link
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub http: HttpConfig,
}

/// Tracker location, credentials and page schema
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Base URL of the tracker, e.g. `https://support.example.com/scp/`
    pub url: String,

    /// Login name
    pub user: String,

    /// Login password
    pub password: String,

    /// Which osTicket page layout the tracker serves
    pub schema: TrackerSchema,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_TRACKER_URL.to_string(),
            user: String::new(),
            password: String::new(),
            schema: TrackerSchema::default(),
        }
    }
}

impl TrackerConfig {
    /// Returns the base URL, guaranteed to end with a `/`
    ///
    /// Tracker paths are appended to this verbatim.
    pub fn base_url(&self) -> String {
        let trimmed = self.url.trim();
        if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{}/", trimmed)
        }
    }

    /// Updates a single setting by its preference key
    ///
    /// Recognised keys are `url`, `user`, `password` and `schema`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The value changed
    /// * `Ok(false)` - The value was already set to `value`
    /// * `Err(ConfigError)` - Unknown key or invalid value
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool, ConfigError> {
        match key {
            "url" => {
                validate_base_url(value)?;
                Ok(replace(&mut self.url, value))
            }
            "user" => Ok(replace(&mut self.user, value)),
            "password" => Ok(replace(&mut self.password, value)),
            "schema" => {
                let schema = value.parse::<TrackerSchema>()?;
                let changed = self.schema != schema;
                self.schema = schema;
                Ok(changed)
            }
            other => Err(ConfigError::Validation(format!(
                "unknown tracker setting '{}'",
                other
            ))),
        }
    }
}

fn replace(target: &mut String, value: &str) -> bool {
    if target == value {
        return false;
    }
    *target = value.to_string();
    true
}

impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"***")
            .field("schema", &self.schema)
            .finish()
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds; the transport default applies when unset
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("ticket-link/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
        }
    }
}
