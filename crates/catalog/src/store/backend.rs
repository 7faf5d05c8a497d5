//! Durable backend trait and the in-memory implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::error::StoreError;

/// Raw key-value persistence behind a [`SharedStore`](super::SharedStore).
///
/// Values are opaque JSON text. Implementations must be synchronous: a
/// `set` that returns `Ok` is visible to every later `get`.
pub trait DurableBackend: Send + Sync + fmt::Debug {
    /// Read the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written or is full.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Total bytes held.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be inspected.
    fn usage_bytes(&self) -> Result<u64, StoreError>;
}

/// Process-local backend, optionally capped at a byte quota.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<u64>,
}

impl MemoryBackend {
    /// An unbounded backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that refuses writes pushing usage above `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: u64) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(quota),
        }
    }
}

fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

impl DurableBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(quota) = self.quota {
            let others: u64 = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            let needed = others + entry_size(key, value);
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }

        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn usage_bytes(&self) -> Result<u64, StoreError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.iter().map(|(k, v)| entry_size(k, v)).sum())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_usage() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get("k").unwrap(), None);
        backend.set("k", "[1,2]").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(backend.usage_bytes().unwrap(), 6);
    }

    #[test]
    fn test_quota_counts_replacement_not_addition() {
        let backend = MemoryBackend::with_quota(10);
        backend.set("k", "12345678").unwrap();
        // replacing the same key frees the old value first
        backend.set("k", "87654321").unwrap();
        assert!(matches!(
            backend.set("other", "x"),
            Err(StoreError::QuotaExceeded { needed: 15, quota: 10 })
        ));
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("87654321"));
    }
}
