//! Durable and ephemeral storage for catalog contexts.
//!
//! # Layout
//!
//! - [`SharedStore`] wraps one [`DurableBackend`] plus a broadcast channel.
//!   Every context that should see the same data is minted from the same
//!   `SharedStore`.
//! - [`ContextStore`] is one context's handle: typed reads and writes of the
//!   durable keys, a private ephemeral (session-scoped) map, and
//!   subscriptions to other contexts' writes.
//!
//! # Change notifications
//!
//! After a durable write completes, a [`ChangeEvent`] carrying the key and
//! the new raw value is broadcast. A [`Subscription`] never yields events
//! written by its own context: a writer does not observe its own write.
//!
//! # Keys
//!
//! ```text
//! ecobloom_products     → Vec<Product>
//! ecobloom_categories   → Vec<Category>
//! ecobloom_reviews      → Vec<Review>
//! ecobloom_wishlist     → Vec<ProductId>
//! ecobloom_darkmode     → bool
//! ```

mod backend;
mod file;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use ecobloom_core::ContextId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, warn};

pub use backend::{DurableBackend, MemoryBackend};
pub use file::FileBackend;

use crate::error::StoreError;

/// Durable store keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Products,
    Categories,
    Reviews,
    Wishlist,
    DarkMode,
}

impl StoreKey {
    /// Every durable key.
    pub const ALL: [Self; 5] = [
        Self::Products,
        Self::Categories,
        Self::Reviews,
        Self::Wishlist,
        Self::DarkMode,
    ];

    /// The stable storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "ecobloom_products",
            Self::Categories => "ecobloom_categories",
            Self::Reviews => "ecobloom_reviews",
            Self::Wishlist => "ecobloom_wishlist",
            Self::DarkMode => "ecobloom_darkmode",
        }
    }

    /// Look up a key by its storage name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }
}

/// A durable write made by some context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The context that wrote.
    pub origin: ContextId,
    pub key: StoreKey,
    /// The serialized value as written.
    pub new_value: String,
}

/// Store shared by every context that should see the same data.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone, Debug)]
pub struct SharedStore {
    inner: Arc<SharedInner>,
}

#[derive(Debug)]
struct SharedInner {
    backend: Arc<dyn DurableBackend>,
    events: broadcast::Sender<ChangeEvent>,
}

impl SharedStore {
    /// Buffered notifications per subscriber before it is considered lagging.
    pub const EVENT_CAPACITY: usize = 64;

    /// Share an existing backend.
    #[must_use]
    pub fn new(backend: Arc<dyn DurableBackend>) -> Self {
        let (events, _) = broadcast::channel(Self::EVENT_CAPACITY);
        Self {
            inner: Arc::new(SharedInner { backend, events }),
        }
    }

    /// A fresh, empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// A store persisted as JSON files under `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::new(Arc::new(FileBackend::open(dir)?)))
    }

    /// The underlying backend.
    #[must_use]
    pub fn backend(&self) -> &dyn DurableBackend {
        self.inner.backend.as_ref()
    }

    /// Open a new context with its own identity and ephemeral storage.
    #[must_use]
    pub fn context(&self) -> ContextStore {
        ContextStore {
            shared: self.clone(),
            id: ContextId::random(),
            ephemeral: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// One context's view of the store.
///
/// Clones share the same context identity and ephemeral map.
#[derive(Clone, Debug)]
pub struct ContextStore {
    shared: SharedStore,
    id: ContextId,
    ephemeral: Arc<Mutex<HashMap<String, String>>>,
}

impl ContextStore {
    /// This context's identity.
    #[must_use]
    pub const fn context_id(&self) -> ContextId {
        self.id
    }

    /// The shared store this context belongs to.
    #[must_use]
    pub const fn shared(&self) -> &SharedStore {
        &self.shared
    }

    /// Read and decode a durable value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the stored text does not decode as
    /// `T`, or a backend error if the read itself fails.
    pub fn read<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.shared.backend().get(key.as_str())? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.as_str(),
                source,
            })
    }

    /// Encode and write a durable value, then notify other contexts.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if `value` cannot be encoded, or
    /// a backend error (quota, I/O) if the write fails. No notification is
    /// sent for a failed write.
    pub fn write<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.shared.backend().set(key.as_str(), &raw)?;

        let event = ChangeEvent {
            origin: self.id,
            key,
            new_value: raw,
        };
        // No subscribers is not an error
        let receivers = self.shared.inner.events.send(event).unwrap_or(0);
        debug!(key = key.as_str(), context = %self.id, receivers, "durable write");
        Ok(())
    }

    /// Read a session-scoped value.
    #[must_use]
    pub fn read_ephemeral(&self, key: &str) -> Option<String> {
        self.ephemeral
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Write a session-scoped value. Never broadcast.
    pub fn write_ephemeral(&self, key: &str, value: impl Into<String>) {
        self.ephemeral
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.into());
    }

    /// Remove a session-scoped value.
    pub fn clear_ephemeral(&self, key: &str) {
        self.ephemeral
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Listen for durable writes made by other contexts.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            context: self.id,
            receiver: self.shared.inner.events.subscribe(),
        }
    }

    /// Bytes currently used by the durable store.
    ///
    /// # Errors
    ///
    /// Returns a backend error if usage cannot be measured.
    pub fn usage_bytes(&self) -> Result<u64, StoreError> {
        self.shared.backend().usage_bytes()
    }
}

/// What a [`Subscription`] hands out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Another context wrote this value.
    Changed(ChangeEvent),
    /// The subscriber fell behind and this many notifications were dropped.
    /// Anything may have changed; reload everything.
    Missed(u64),
}

/// A stream of other contexts' durable writes.
#[derive(Debug)]
pub struct Subscription {
    context: ContextId,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Wait for the next write made by another context.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn recv(&mut self) -> Option<Delivery> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.origin == self.context => {}
                Ok(event) => return Some(Delivery::Changed(event)),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(context = %self.context, missed, "change notifications dropped");
                    return Some(Delivery::Missed(missed));
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
