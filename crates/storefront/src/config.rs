//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `CAMPUS_EATS_HOST` - Bind address (default: 127.0.0.1)
//! - `CAMPUS_EATS_PORT` - Listen port (default: 3000)
//! - `CAMPUS_EATS_API_URL` - Backend REST base URL (default: <http://localhost:8080/api>)
//! - `CAMPUS_EATS_API_TIMEOUT_SECS` - Per-request backend timeout (default: 5)
//! - `CAMPUS_EATS_DATA_DIR` - Directory for persisted cart/session snapshots (default: .campus-eats)
//! - `CAMPUS_EATS_CURRENCY` - Display currency code (default: INR)
//! - `CAMPUS_EATS_STATUS_DWELL_SECS` - Seconds between simulated status steps (default: 5)
//! - `CAMPUS_EATS_LOG_FALLBACKS` - Log fallback substitutions at warn level (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use campus_eats_core::{CurrencyCode, Fees};
use thiserror::Error;
use url::Url;

use crate::api::FallbackPolicy;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Remote backend settings
    pub api: ApiConfig,
    /// Directory holding persisted snapshots
    pub data_dir: PathBuf,
    /// Currency prices are displayed in
    pub currency: CurrencyCode,
    /// Fees charged on carts and on orders placed from them
    pub fees: Fees,
    /// Time spent in each auto-advanced order status
    pub status_dwell: Duration,
    /// How loudly fallback substitutions are logged
    pub fallback_policy: FallbackPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Remote backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            api: ApiConfig::default(),
            data_dir: PathBuf::from(".campus-eats"),
            currency: CurrencyCode::INR,
            fees: Fees::standard(),
            status_dwell: Duration::from_secs(5),
            fallback_policy: FallbackPolicy::Quiet,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_parsed_env::<IpAddr>("CAMPUS_EATS_HOST", "127.0.0.1")?;
        let port = get_parsed_env::<u16>("CAMPUS_EATS_PORT", "3000")?;

        let base_url = normalize_api_url(&get_env_or_default("CAMPUS_EATS_API_URL", DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("CAMPUS_EATS_API_URL".to_string(), e))?;
        let timeout_secs = get_parsed_env::<u64>("CAMPUS_EATS_API_TIMEOUT_SECS", "5")?;

        let data_dir = PathBuf::from(get_env_or_default("CAMPUS_EATS_DATA_DIR", ".campus-eats"));
        let currency = get_parsed_env::<CurrencyCode>("CAMPUS_EATS_CURRENCY", "INR")?;
        let dwell_secs = get_parsed_env::<u64>("CAMPUS_EATS_STATUS_DWELL_SECS", "5")?;

        let log_fallbacks = parse_bool(&get_env_or_default("CAMPUS_EATS_LOG_FALLBACKS", "false"))
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "CAMPUS_EATS_LOG_FALLBACKS".to_string(),
                    "expected true or false".to_string(),
                )
            })?;

        Ok(Self {
            host,
            port,
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            data_dir,
            currency,
            fees: Fees::standard(),
            status_dwell: Duration::from_secs(dwell_secs),
            fallback_policy: if log_fallbacks {
                FallbackPolicy::Loud
            } else {
                FallbackPolicy::Quiet
            },
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_parsed_env::<f32>("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: get_parsed_env::<f32>("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed into `T`, with a default.
fn get_parsed_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate a backend URL and strip any trailing slash.
fn normalize_api_url(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_api_url_strips_trailing_slash() {
        assert_eq!(
            normalize_api_url("http://localhost:8080/api/").unwrap(),
            "http://localhost:8080/api"
        );
    }

    #[test]
    fn test_normalize_api_url_rejects_garbage() {
        assert!(normalize_api_url("not a url").is_err());
        assert!(normalize_api_url("ftp://example.com/api").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool(""), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.status_dwell, Duration::from_secs(5));
        assert_eq!(config.currency, CurrencyCode::INR);
        assert_eq!(config.fallback_policy, FallbackPolicy::Quiet);
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            port: 4000,
            ..StorefrontConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 4000);
    }
}
