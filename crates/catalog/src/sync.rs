//! Cross-context synchronization.
//!
//! A [`Synchronizer`] waits for another context's write to a watched key and
//! asks its [`SyncTarget`] to reload. The target reloads from the durable
//! store, never from the notification payload, so it always sees one
//! complete list as of the latest write. Notifications are not coalesced;
//! each logical save produces one.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::store::{ContextStore, Delivery, StoreKey, Subscription};

/// A context that can rebuild its view from the durable store.
pub trait SyncTarget: Send {
    /// Reload the repository and re-render with the active query.
    fn resync(&mut self, key: StoreKey);
}

/// Turns other contexts' writes into reload triggers.
#[derive(Debug)]
pub struct Synchronizer {
    subscription: Subscription,
    watched: Vec<StoreKey>,
}

impl Synchronizer {
    /// Watch the product collection of `store`'s shared store.
    ///
    /// Subscribes immediately; writes made after this call are observed.
    #[must_use]
    pub fn new(store: &ContextStore) -> Self {
        Self {
            subscription: store.subscribe(),
            watched: vec![StoreKey::Products],
        }
    }

    /// Also trigger on writes to `key`.
    #[must_use]
    pub fn watching(mut self, key: StoreKey) -> Self {
        if !self.watched.contains(&key) {
            self.watched.push(key);
        }
        self
    }

    /// Wait for the next change that should trigger a reload.
    ///
    /// Dropped notifications trigger a product reload. Returns `None` once
    /// the store is gone.
    pub async fn next_trigger(&mut self) -> Option<StoreKey> {
        loop {
            match self.subscription.recv().await? {
                Delivery::Changed(event) if self.watched.contains(&event.key) => {
                    debug!(key = event.key.as_str(), origin = %event.origin, "remote change");
                    return Some(event.key);
                }
                Delivery::Changed(event) => {
                    trace!(key = event.key.as_str(), "ignoring unwatched change");
                }
                Delivery::Missed(_) => return Some(StoreKey::Products),
            }
        }
    }

    /// Drive `target` from this synchronizer on the current runtime.
    ///
    /// The task holds only a weak reference. It stops at the first trigger
    /// after the last strong reference to `target` is dropped, or as soon as
    /// every handle to the store is gone.
    pub fn spawn<T>(mut self, target: &Arc<Mutex<T>>) -> JoinHandle<()>
    where
        T: SyncTarget + 'static,
    {
        let target = Arc::downgrade(target);
        tokio::spawn(async move {
            while let Some(key) = self.next_trigger().await {
                let Some(target) = target.upgrade() else {
                    info!("sync target dropped, synchronizer stopping");
                    return;
                };
                target.lock().await.resync(key);
            }
            info!("change feed closed, synchronizer stopping");
        })
    }
}
