//! Integration tests for Eco Bloom.
//!
//! Each test wires real storefront and admin contexts to one shared store,
//! the way two open tabs share browser storage, and drives them with a
//! manual clock.
//!
//! # Test Categories
//!
//! - `cross_context_sync` - Writes in one context reaching another
//! - `backup` - Export and restore through directory-backed stores
//! - `admin_session` - Login, gating and expiry
//! - `bootstrap` - First-run seeding

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use ecobloom_admin::{AdminConfig, AdminContext, AdminCredentials};
use ecobloom_catalog::{RecordingSurface, SharedStore, StoreError};
use ecobloom_core::{Clock, ManualClock};
use ecobloom_storefront::{StorefrontConfig, StorefrontContext};
use tokio::sync::Mutex;

/// Admin username every test context is configured with.
pub const ADMIN_USERNAME: &str = "owner@ecobloom";
/// Admin password every test context is configured with.
pub const ADMIN_PASSWORD: &str = "integration-test-password";

/// A shared store plus the clock all contexts on it read.
#[derive(Debug, Clone)]
pub struct TestContext {
    pub shared: SharedStore,
    pub clock: Arc<ManualClock>,
}

impl TestContext {
    /// Midday, 1 June 2024 UTC.
    #[must_use]
    pub fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    /// A fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_store(SharedStore::in_memory())
    }

    /// A store persisted under `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn on_disk(dir: &Path) -> Result<Self, StoreError> {
        Ok(Self::with_store(SharedStore::open_dir(dir)?))
    }

    fn with_store(shared: SharedStore) -> Self {
        Self {
            shared,
            clock: Arc::new(ManualClock::new(Self::start_time())),
        }
    }

    /// The clock as the trait object contexts take.
    #[must_use]
    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// Open a storefront context.
    #[must_use]
    pub fn storefront(&self) -> StorefrontContext<RecordingSurface> {
        StorefrontContext::start(
            self.shared.context(),
            self.clock(),
            &StorefrontConfig::default(),
            RecordingSurface::new(),
        )
    }

    /// Open an admin context (not logged in).
    #[must_use]
    pub fn admin(&self) -> AdminContext<RecordingSurface> {
        let config = AdminConfig {
            data_dir: "data".into(),
            credentials: Some(AdminCredentials::new(ADMIN_USERNAME, ADMIN_PASSWORD)),
            sentry_dsn: None,
        };
        AdminContext::start(
            self.shared.context(),
            self.clock(),
            &config,
            RecordingSurface::new(),
        )
    }
}

/// Poll `target` until `check` holds, for up to about a second.
///
/// Synchronizers run on spawned tasks, so a remote write is observed some
/// time after it returns.
pub async fn eventually<T, F>(target: &Mutex<T>, check: F) -> bool
where
    F: Fn(&T) -> bool,
{
    for _ in 0..100 {
        if check(&*target.lock().await) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
