//! Unified error handling with Sentry integration.
//!
//! Context operations return `Result<T, AppError>`. Before an error reaches
//! the user as a toast, [`AppError::notification`] captures storage and
//! internal failures to Sentry.

use ecobloom_catalog::{CatalogError, Notification, StoreError};
use ecobloom_core::ValidationError;
use thiserror::Error;

use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Durable storage failed outside the catalog (wishlist, preferences).
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// User input was rejected.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this failure is ours rather than the user's.
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

    /// Report the error and turn it into a user-facing notification.
    #[must_use]
    pub fn notification(&self) -> Notification {
        // Capture internal errors to Sentry
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "rejected user action");
        }

        // Don't expose storage details to shoppers
        let message = match self {
            Self::Catalog(CatalogError::Storage(_)) | Self::Storage(_) => {
                "Could not save your changes".to_string()
            }
            Self::Config(_) | Self::Internal(_) => "Something went wrong".to_string(),
            Self::Catalog(CatalogError::Validation(err)) | Self::Validation(err) => err.to_string(),
            Self::Catalog(CatalogError::ProductNotFound(_)) | Self::NotFound(_) => {
                "Product not found".to_string()
            }
            Self::Catalog(CatalogError::MalformedImport(_)) => "Invalid backup file".to_string(),
        };

        Notification::error(message)
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
