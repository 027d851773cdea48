//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MINIE_API_URL` - Backend base URL (default: `http://localhost:8000`)
//! - `MINIE_SEARCH_DEBOUNCE_MS` - Search quiescence window (default: 500)
//! - `MINIE_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `MINIE_SESSION_FILE` - Where the CLI keeps the bearer token (default: `.minie-session`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default backend location.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default search quiescence window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

const DEFAULT_TIMEOUT_SECS: &str = "30";
const DEFAULT_SESSION_FILE: &str = ".minie-session";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API settings
    pub api: ApiConfig,
    /// Quiescence window before a search query fires
    pub search_debounce: Duration,
    /// Token file used by the CLI's session store
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Backend API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; always ends with `/` so endpoint paths join beneath it.
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Build API settings for `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("MINIE_API_URL", base_url)?,
            timeout: Duration::from_secs(30),
        })
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(
            "MINIE_API_URL",
            &get_env_or_default("MINIE_API_URL", DEFAULT_API_URL),
        )?;
        let timeout_secs = parse_env::<u64>("MINIE_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let debounce_ms = parse_env::<u64>("MINIE_SEARCH_DEBOUNCE_MS", "500")?;
        let session_file =
            PathBuf::from(get_env_or_default("MINIE_SESSION_FILE", DEFAULT_SESSION_FILE));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            search_debounce: Duration::from_millis(debounce_ms),
            session_file,
            sentry_dsn,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a base URL, forcing a trailing slash so relative joins keep the path.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("MINIE_API_URL", "http://shop.local:8000/api").unwrap();
        assert_eq!(url.as_str(), "http://shop.local:8000/api/");
        assert_eq!(
            url.join("products").unwrap().as_str(),
            "http://shop.local:8000/api/products"
        );
    }

    #[test]
    fn test_base_url_rejects_garbage() {
        assert!(matches!(
            parse_base_url("MINIE_API_URL", "not a url"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_base_url("MINIE_API_URL", "mailto:shop@example.com").is_err());
    }

    #[test]
    fn test_api_config_defaults() {
        let config = ApiConfig::new(DEFAULT_API_URL).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
