//! Restaurateur configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `YANDEX_GEO_API_KEY` - Yandex Geocoder API key
//!
//! ## Optional
//! - `RESTAURATEUR_HOST` - Bind address (default: 127.0.0.1)
//! - `RESTAURATEUR_PORT` - Listen port (default: 3002)
//! - `GEOCODER_BASE_URL` - Geocoder endpoint (default: <https://geocode-maps.yandex.ru/1.x>)
//! - `GEOCODER_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `GEOCODER_MAX_CONCURRENCY` - Parallel geocoder calls (default: 4)
//! - `GEOCODE_MEMORY_CAPACITY` - In-process coordinate cache size (default: 10000)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_GEOCODER_URL: &str = "https://geocode-maps.yandex.ru/1.x";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Restaurateur application configuration.
#[derive(Debug, Clone)]
pub struct RestaurateurConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Geocoder client and cache settings
    pub geocoder: GeocoderConfig,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

/// Geocoder configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeocoderConfig {
    /// Yandex Geocoder API key
    pub api_key: SecretString,
    /// Endpoint queried with `geocode`, `apikey` and `format` parameters
    pub base_url: Url,
    /// Upper bound on a single geocoder call
    pub timeout: Duration,
    /// Maximum geocoder calls in flight at once
    pub max_concurrency: usize,
    /// Entries kept in the in-process coordinate cache
    pub memory_capacity: u64,
}

impl std::fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("max_concurrency", &self.max_concurrency)
            .field("memory_capacity", &self.memory_capacity)
            .finish()
    }
}

impl GeocoderConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = required(lookup, "YANDEX_GEO_API_KEY")?;
        validate_not_placeholder(&api_key, "YANDEX_GEO_API_KEY")?;

        let base_url = or_default(lookup, "GEOCODER_BASE_URL", DEFAULT_GEOCODER_URL);
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("GEOCODER_BASE_URL".to_string(), e.to_string())
        })?;

        let timeout_secs: u64 = parse_positive(lookup, "GEOCODER_TIMEOUT_SECS", 10)?;
        let max_concurrency: usize = parse_positive(lookup, "GEOCODER_MAX_CONCURRENCY", 4)?;
        let memory_capacity: u64 = parse_positive(lookup, "GEOCODE_MEMORY_CAPACITY", 10_000)?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            max_concurrency,
            memory_capacity,
        })
    }
}

impl RestaurateurConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`RestaurateurConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = SecretString::from(required(&lookup, "DATABASE_URL")?);
        let host = or_default(&lookup, "RESTAURATEUR_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("RESTAURATEUR_HOST".to_string(), e.to_string())
            })?;
        let port = parse_positive(&lookup, "RESTAURATEUR_PORT", 3002)?;
        let geocoder = GeocoderConfig::from_lookup(&lookup)?;
        let json_logs =
            lookup("LOG_FORMAT").is_some_and(|format| format.eq_ignore_ascii_case("json"));
        let sentry_sample_rate = lookup("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            geocoder,
            json_logs,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
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

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

fn or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse a numeric variable that must be greater than zero.
fn parse_positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if value == T::default() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

/// Reject values copied verbatim from sample `.env` files.
fn validate_not_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/star_burger"),
        ("YANDEX_GEO_API_KEY", "3f9a6c1e-72d4-4b8e-a5f0-9c2d7e81b346"),
    ];

    #[test]
    fn test_defaults() {
        let config = RestaurateurConfig::from_lookup(lookup(MINIMAL)).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3002");
        assert_eq!(config.geocoder.base_url.as_str(), "https://geocode-maps.yandex.ru/1.x");
        assert_eq!(config.geocoder.timeout, Duration::from_secs(10));
        assert_eq!(config.geocoder.max_concurrency, 4);
        assert_eq!(config.geocoder.memory_capacity, 10_000);
        assert!(!config.json_logs);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_api_key() {
        let err = RestaurateurConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "YANDEX_GEO_API_KEY"));
    }

    #[test]
    fn test_placeholder_api_key_rejected() {
        let err = RestaurateurConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("YANDEX_GEO_API_KEY", "your-api-key"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("GEOCODER_MAX_CONCURRENCY", "0"));
        let err = RestaurateurConfig::from_lookup(lookup(&vars)).unwrap_err();
        let ConfigError::InvalidEnvVar(key, _) = err else {
            panic!("expected InvalidEnvVar, got {err:?}");
        };
        assert_eq!(key, "GEOCODER_MAX_CONCURRENCY");
    }

    #[test]
    fn test_overrides() {
        let mut vars = MINIMAL.to_vec();
        vars.extend([
            ("RESTAURATEUR_PORT", "8080"),
            ("GEOCODER_TIMEOUT_SECS", "3"),
            ("GEOCODER_BASE_URL", "http://127.0.0.1:9000/geo"),
            ("LOG_FORMAT", "JSON"),
        ]);
        let config = RestaurateurConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.geocoder.timeout, Duration::from_secs(3));
        assert_eq!(config.geocoder.base_url.as_str(), "http://127.0.0.1:9000/geo");
        assert!(config.json_logs);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = RestaurateurConfig::from_lookup(lookup(MINIMAL)).unwrap();
        let debug = format!("{:?}", config.geocoder);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("3f9a6c1e"));
    }
}
