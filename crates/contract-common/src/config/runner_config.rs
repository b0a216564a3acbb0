//! Runner configuration
//!
//! The base URL of the backend under test is the only value read from the
//! environment. It is resolved once when the run starts and never changes.

use std::env;
use std::time::Duration;

use url::Url;

/// Backend address used when `BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Environment variable holding the backend address
const BASE_URL_VAR: &str = "BASE_URL";

/// Read-only configuration for one contract run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Root address of the backend, without a trailing slash
    pub base_url: String,
    /// Timeout for `GET /health`
    pub health_timeout: Duration,
    /// Timeout for a chat exchange that may reach the language-model provider
    pub chat_timeout: Duration,
    /// Timeout for the input-validation request
    pub validation_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            health_timeout: default_health_timeout(),
            chat_timeout: default_chat_timeout(),
            validation_timeout: default_validation_timeout(),
        }
    }
}

// Default value functions
fn default_health_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_chat_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_validation_timeout() -> Duration {
    Duration::from_secs(10)
}

impl RunnerConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is honoured if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_base_url(env::var(BASE_URL_VAR).ok())
    }

    /// Build a configuration from an optional base URL override
    ///
    /// `None` or a blank value falls back to [`DEFAULT_BASE_URL`].
    pub fn from_base_url(base_url: Option<String>) -> Result<Self, ConfigError> {
        let base_url = match base_url {
            Some(raw) if !raw.trim().is_empty() => normalize_base_url(&raw)?,
            _ => DEFAULT_BASE_URL.to_string(),
        };

        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    /// Join a request path onto the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue(BASE_URL_VAR, format!("{raw:?} {reason}"));

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&format!("is not a valid URL ({e})")))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(invalid("must use http or https")),
    }
    if !matches!(url.host_str(), Some(host) if !host.is_empty()) {
        return Err(invalid("has no host"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("must not carry credentials"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a query or fragment"));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
