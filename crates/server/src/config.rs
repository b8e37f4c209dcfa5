//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `USER_DIRECTORY_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `USER_DIRECTORY_HOST` - Bind address (default: 127.0.0.1)
//! - `USER_DIRECTORY_PORT` - Listen port (default: 8080)
//! - `USER_DIRECTORY_IMPORT_URL` - Upstream user feed (default: <https://dummyjson.com/users>)
//! - `USER_DIRECTORY_IMPORT_TIMEOUT_SECS` - Import request timeout (default: 30)
//! - `USER_DIRECTORY_CORS_ORIGINS` - Comma-separated browser origins (default: <http://localhost:3000>)
//! - `LOG_FORMAT` - `json` for JSON log lines, anything else for human-readable
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default upstream feed for `POST /api/users/import`.
pub const DEFAULT_IMPORT_URL: &str = "https://dummyjson.com/users";

const DEFAULT_IMPORT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// User directory server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Upstream import feed configuration
    pub import: ImportConfig,
    /// Origins allowed to call the API from a browser
    pub cors_origins: Vec<String>,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Upstream import feed configuration.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// URL returning `{ "users": [...] }`
    pub url: Url,
    /// Whole-request timeout for the fetch
    pub timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = var("USER_DIRECTORY_DATABASE_URL")
            .or_else(|| var("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("USER_DIRECTORY_DATABASE_URL".to_string()))?;

        let host = parse_var(&var, "USER_DIRECTORY_HOST", "127.0.0.1")?;
        let port = parse_var(&var, "USER_DIRECTORY_PORT", "8080")?;
        let import = ImportConfig::from_vars(&var)?;

        let cors_origins = var("USER_DIRECTORY_CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let json_logs = var("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

        Ok(Self {
            database_url,
            host,
            port,
            import,
            cors_origins,
            json_logs,
            sentry_dsn: var("SENTRY_DSN"),
            sentry_environment: var("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ImportConfig {
    fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = var("USER_DIRECTORY_IMPORT_URL").unwrap_or_else(|| DEFAULT_IMPORT_URL.to_string());
        let url = Url::parse(&url).map_err(|e| {
            ConfigError::InvalidEnvVar("USER_DIRECTORY_IMPORT_URL".to_string(), e.to_string())
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "USER_DIRECTORY_IMPORT_URL".to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        let timeout_secs: u64 = parse_var(
            var,
            "USER_DIRECTORY_IMPORT_TIMEOUT_SECS",
            &DEFAULT_IMPORT_TIMEOUT_SECS.to_string(),
        )?;

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to a default when it is unset.
fn parse_var<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    var(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
