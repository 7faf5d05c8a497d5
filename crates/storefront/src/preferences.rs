//! Display preferences persisted across visits.

use ecobloom_catalog::{ContextStore, StoreError, StoreKey};
use tracing::warn;

/// Per-visitor display settings.
#[derive(Debug, Clone)]
pub struct Preferences {
    store: ContextStore,
    dark_mode: bool,
}

impl Preferences {
    /// Load stored preferences. Missing or unreadable values mean light mode.
    #[must_use]
    pub fn load(store: ContextStore) -> Self {
        let mut prefs = Self {
            store,
            dark_mode: false,
        };
        prefs.reload();
        prefs
    }

    /// Re-read the stored preference.
    pub fn reload(&mut self) {
        self.dark_mode = match self.store.read::<bool>(StoreKey::DarkMode) {
            Ok(value) => value.unwrap_or(false),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable dark mode preference");
                false
            }
        };
    }

    #[must_use]
    pub const fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Flip dark mode and persist it. Returns the new setting.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails; the new setting still
    /// applies to this context.
    pub fn toggle_dark_mode(&mut self) -> Result<bool, StoreError> {
        self.dark_mode = !self.dark_mode;
        self.store.write(StoreKey::DarkMode, &self.dark_mode)?;
        Ok(self.dark_mode)
    }
}
