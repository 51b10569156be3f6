//! Checkout service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CHECKOUT_HOST` - Bind address (default: 127.0.0.1)
//! - `CHECKOUT_PORT` - Listen port (default: 3000)
//! - `CHECKOUT_RULES_PATH` - YAML file with category rules and product catalog
//!   (default: built-in subscription rules, empty catalog)
//! - `CHECKOUT_FIELD_PROFILE` - `always_show_civic` or `conditional`, overrides
//!   the rules file
//! - `CHECKOUT_SECURE_COOKIES` - Mark the session cookie `Secure` (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use crate::services::{FieldProfile, RulesError, RulesFile};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid rules: {0}")]
    Rules(#[from] RulesError),
}

/// Checkout service configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Path of the rules file, if any
    pub rules_path: Option<PathBuf>,
    /// Field profile override
    pub field_profile: Option<FieldProfile>,
    /// Whether the session cookie requires HTTPS
    pub secure_cookies: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            rules_path: None,
            field_profile: None,
            secure_cookies: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl CheckoutConfig {
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

        let host = parse_env("CHECKOUT_HOST", "127.0.0.1")?;
        let port = parse_env("CHECKOUT_PORT", "3000")?;
        let secure_cookies = parse_env("CHECKOUT_SECURE_COOKIES", "false")?;
        let rules_path = get_optional_env("CHECKOUT_RULES_PATH").map(PathBuf::from);
        let field_profile = get_optional_env("CHECKOUT_FIELD_PROFILE")
            .map(|value| {
                value.parse::<FieldProfile>().map_err(|e| {
                    ConfigError::InvalidEnvVar("CHECKOUT_FIELD_PROFILE".to_string(), e)
                })
            })
            .transpose()?;

        Ok(Self {
            host,
            port,
            rules_path,
            field_profile,
            secure_cookies,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Load the rules file, or the built-in rules if none is configured, and
    /// apply the field profile override.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Rules` if the file cannot be read or is invalid.
    pub fn load_rules(&self) -> Result<RulesFile, ConfigError> {
        let mut file = match &self.rules_path {
            Some(path) => RulesFile::from_path(path)?,
            None => RulesFile::default(),
        };

        if let Some(profile) = self.field_profile {
            file.checkout.field_profile = profile;
        }

        Ok(file)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
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
