//! Admin session guard.
//!
//! Two states, anonymous and authenticated. Logging in with the configured
//! credential pair stamps a login time; the session then lasts at most
//! [`SESSION_TTL_HOURS`] from that instant. Activity never extends it.
//!
//! The guard gates what the admin context offers. It does not protect the
//! catalog itself: a repository handle can still be mutated directly.

mod error;

pub use error::AuthError;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use ecobloom_catalog::ContextStore;
use ecobloom_core::Clock;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::config::AdminCredentials;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::session::{SessionState, keys};

/// Hours a session lasts after login.
pub const SESSION_TTL_HOURS: i64 = 2;

/// How often [`SessionGuard::spawn_liveness_check`] runs by default.
pub const LIVENESS_INTERVAL: StdDuration = StdDuration::from_secs(5 * 60);

/// Tracks the admin session in a context's ephemeral store.
///
/// Clones share the same session.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    store: ContextStore,
    clock: Arc<dyn Clock>,
    credentials: Option<AdminCredentials>,
}

impl SessionGuard {
    #[must_use]
    pub fn new(
        store: ContextStore,
        clock: Arc<dyn Clock>,
        credentials: Option<AdminCredentials>,
    ) -> Self {
        Self {
            store,
            clock,
            credentials,
        }
    }

    /// Authenticate against the configured pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on any mismatch, or
    /// `AuthError::NotConfigured` without a configured pair. The session is
    /// left as it was.
    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let credentials = self.credentials.as_ref().ok_or(AuthError::NotConfigured)?;
        if !credentials.matches(username, password) {
            warn!("admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let now = self.clock.now();
        self.store.write_ephemeral(keys::ADMIN_AUTH, "true");
        self.store.write_ephemeral(keys::ADMIN_USER, username);
        self.store.write_ephemeral(keys::LOGIN_TIME, now.to_rfc3339());
        set_sentry_user(username);
        info!("admin logged in");
        Ok(())
    }

    /// End the session.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        for key in keys::ALL {
            self.store.clear_ephemeral(key);
        }
        clear_sentry_user();
        info!("admin logged out");
    }

    /// The stored session, ignoring expiry.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.store.read_ephemeral(keys::ADMIN_AUTH).as_deref() != Some("true") {
            return SessionState::Anonymous;
        }
        let login_time = self
            .store
            .read_ephemeral(keys::LOGIN_TIME)
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|t| t.with_timezone(&Utc));
        match login_time {
            Some(login_time) => SessionState::Authenticated {
                username: self
                    .store
                    .read_ephemeral(keys::ADMIN_USER)
                    .unwrap_or_default(),
                login_time,
            },
            None => SessionState::Anonymous,
        }
    }

    /// Whether a session exists and has not yet expired.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        match self.state() {
            SessionState::Authenticated { login_time, .. } => !self.expired(login_time),
            SessionState::Anonymous => false,
        }
    }

    fn expired(&self, login_time: DateTime<Utc>) -> bool {
        self.clock.now() - login_time > Duration::hours(SESSION_TTL_HOURS)
    }

    /// Log out if the session has outlived its ceiling. Returns whether the
    /// session is still valid.
    #[instrument(skip(self))]
    pub fn check_liveness(&self) -> bool {
        match self.state() {
            SessionState::Authenticated { login_time, .. } if self.expired(login_time) => {
                info!(%login_time, "admin session expired");
                self.logout();
                false
            }
            SessionState::Authenticated { .. } => true,
            SessionState::Anonymous => false,
        }
    }

    /// Run [`check_liveness`](Self::check_liveness) every `every` until the
    /// returned task is aborted.
    pub fn spawn_liveness_check(&self, every: StdDuration) -> JoinHandle<()> {
        let guard = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                guard.check_liveness();
            }
        })
    }
}
