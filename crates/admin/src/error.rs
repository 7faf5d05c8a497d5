//! Unified error handling for admin.
//!
//! Admin operations return `Result<T, AppError>`. [`AppError::notification`]
//! captures storage and internal failures to Sentry and produces the toast
//! shown to the admin.

use ecobloom_catalog::{CatalogError, Notification, StoreError};
use ecobloom_core::ValidationError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::images::ImageError;

/// Message shown when an anonymous session tries a gated action.
pub const LOGIN_REQUIRED: &str = "Please log in";

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Durable storage failed outside a catalog mutation.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Form input was rejected.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Image intake failed.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Authentication failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// No valid admin session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for the login-required error.
    #[must_use]
    pub fn login_required() -> Self {
        Self::Unauthorized(LOGIN_REQUIRED.to_string())
    }

    /// Whether this failure is ours rather than the admin's.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Config(_)
                | Self::Internal(_)
                | Self::Catalog(CatalogError::Storage(_))
        )
    }

    /// Report the error and turn it into a notification.
    #[must_use]
    pub fn notification(&self) -> Notification {
        // Log internal errors with Sentry
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin error"
            );
        } else {
            tracing::debug!(error = %self, "rejected admin action");
        }

        let message = match self {
            Self::Catalog(CatalogError::Storage(_)) | Self::Storage(_) => {
                "Could not save changes; they will be lost on reload".to_string()
            }
            Self::Config(_) | Self::Internal(_) => "Something went wrong".to_string(),
            Self::Catalog(CatalogError::MalformedImport(_)) => "Invalid backup file".to_string(),
            Self::Catalog(CatalogError::ProductNotFound(_)) | Self::NotFound(_) => {
                "Product not found".to_string()
            }
            Self::Catalog(CatalogError::Validation(err)) | Self::Validation(err) => err.to_string(),
            Self::Image(err) => err.to_string(),
            Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_string(),
            Self::Auth(AuthError::NotConfigured) => "Admin login is not configured".to_string(),
            Self::Unauthorized(message) => message.clone(),
        };

        Notification::error(message)
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context to the logged-in admin.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
