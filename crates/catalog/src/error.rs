//! Error types for storage and catalog operations.

use ecobloom_core::{ProductId, ValidationError};
use thiserror::Error;

/// Errors raised by the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A value could not be serialized for storage.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value is not valid JSON for the expected type.
    #[error("corrupt value under {key}: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The write would exceed the store's capacity.
    #[error("storage quota exceeded (needs {needed} bytes, quota {quota})")]
    QuotaExceeded { needed: u64, quota: u64 },

    /// The backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by catalog repository operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Submitted data failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persisting failed. In-memory state stays authoritative for this
    /// context but will not survive a reload.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// A backup document could not be parsed; nothing was changed.
    #[error("invalid backup file: {0}")]
    MalformedImport(#[source] serde_json::Error),

    /// No product with this ID exists.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
}
