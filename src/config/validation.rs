use crate::config::types::{Config, HttpConfig, TrackerConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_tracker_config(&config.tracker)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates tracker configuration
///
/// Credentials may be empty here; the host fills them in before the first request.
fn validate_tracker_config(config: &TrackerConfig) -> Result<(), ConfigError> {
    validate_base_url(&config.url)
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates a tracker base URL: it must parse and use HTTP(S)
pub(crate) fn validate_base_url(value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid tracker url '{}': {}", value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Tracker url '{}' must use http or https",
            value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Tracker url '{}' has no host",
            value
        )));
    }

    Ok(())
}
