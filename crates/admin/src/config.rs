//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required for logging in
//! - `ECOBLOOM_ADMIN_USERNAME` - Admin username
//! - `ECOBLOOM_ADMIN_PASSWORD` - Admin password
//!
//! Both must be set together. Without them the admin context still loads
//! read-only views, but every login attempt fails.
//!
//! ## Optional
//! - `ECOBLOOM_DATA_DIR` - Directory holding the durable store (default: ./data)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Directory the file-backed store lives in
    pub data_dir: PathBuf,
    /// The fixed admin credential pair, if configured
    pub credentials: Option<AdminCredentials>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// The admin username and password.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AdminCredentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Exact comparison of both fields.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password.expose_secret() == password
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let username = lookup("ECOBLOOM_ADMIN_USERNAME").filter(|v| !v.is_empty());
        let password = lookup("ECOBLOOM_ADMIN_PASSWORD").filter(|v| !v.is_empty());

        match (username, password) {
            (Some(username), Some(password)) => Ok(Some(Self::new(username, password))),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "ECOBLOOM_ADMIN_*".to_string(),
                "Both ECOBLOOM_ADMIN_USERNAME and ECOBLOOM_ADMIN_PASSWORD must be set together"
                    .to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if only one half of the credential pair is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if only one half of the credential pair is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            data_dir: PathBuf::from(
                lookup("ECOBLOOM_DATA_DIR").unwrap_or_else(|| "data".to_string()),
            ),
            credentials: AdminCredentials::from_lookup(&lookup)?,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.trim().is_empty()),
        })
    }

    /// The credential pair, for operations that must log in.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no credentials are configured.
    pub fn require_credentials(&self) -> Result<&AdminCredentials, ConfigError> {
        self.credentials
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("ECOBLOOM_ADMIN_USERNAME".to_string()))
    }
}
