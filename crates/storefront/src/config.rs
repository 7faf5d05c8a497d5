//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ECOBLOOM_DATA_DIR` - Directory holding the durable store (default: ./data)
//! - `ECOBLOOM_WHATSAPP_NUMBER` - Purchase contact number, digits only
//!   (default: 94775577148)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use thiserror::Error;

/// Default WhatsApp number purchase links point at.
pub const DEFAULT_WHATSAPP_NUMBER: &str = "94775577148";

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory the file-backed store lives in
    pub data_dir: PathBuf,
    /// International number without `+` or separators
    pub whatsapp_number: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(get_env_or_default(&lookup, "ECOBLOOM_DATA_DIR", "data"));
        let whatsapp_number = get_env_or_default(
            &lookup,
            "ECOBLOOM_WHATSAPP_NUMBER",
            DEFAULT_WHATSAPP_NUMBER,
        );
        validate_phone_number(&whatsapp_number, "ECOBLOOM_WHATSAPP_NUMBER")?;
        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.trim().is_empty());

        Ok(Self {
            data_dir,
            whatsapp_number,
            sentry_dsn,
        })
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            sentry_dsn: None,
        }
    }
}

/// Get a variable with a default value.
fn get_env_or_default(lookup: impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// WhatsApp click-to-chat numbers are bare digits in international form.
fn validate_phone_number(number: &str, var_name: &str) -> Result<(), ConfigError> {
    if !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must contain digits only (no '+', spaces or dashes)".to_string(),
        ));
    }
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&number.len()) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!(
                "must be {MIN_PHONE_DIGITS}-{MAX_PHONE_DIGITS} digits (got {})",
                number.len()
            ),
        ));
    }
    Ok(())
}
