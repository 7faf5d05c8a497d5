//! Command implementations.

pub mod admin;
pub mod storefront;

use std::path::PathBuf;

use ecobloom_catalog::{SharedStore, StoreError};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The store could not be opened or read.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Storefront configuration is invalid.
    #[error("Configuration error: {0}")]
    StorefrontConfig(#[from] ecobloom_storefront::ConfigError),

    /// Admin configuration is invalid or incomplete.
    #[error("Configuration error: {0}")]
    AdminConfig(#[from] ecobloom_admin::ConfigError),

    /// An admin operation failed.
    #[error(transparent)]
    Admin(#[from] ecobloom_admin::AppError),

    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Open the directory store, preferring the command-line override.
fn open_store(override_dir: Option<PathBuf>, configured: PathBuf) -> Result<SharedStore, CommandError> {
    let dir = override_dir.unwrap_or(configured);
    info!(dir = %dir.display(), "Opening store");
    Ok(SharedStore::open_dir(dir)?)
}
