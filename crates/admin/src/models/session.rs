//! Session-related types for admin authentication.
//!
//! The session lives in the context's ephemeral store under the keys in
//! [`keys`], so it ends with the context.

use chrono::{DateTime, Utc};

/// Admin authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated {
        username: String,
        login_time: DateTime<Utc>,
    },
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The logged-in username, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { username, .. } => Some(username),
        }
    }
}

/// Ephemeral store keys for admin authentication data.
pub mod keys {
    /// `"true"` while logged in.
    pub const ADMIN_AUTH: &str = "adminAuth";

    /// The logged-in username.
    pub const ADMIN_USER: &str = "adminUser";

    /// Login instant, RFC 3339.
    pub const LOGIN_TIME: &str = "loginTime";

    /// Every session key, cleared together on logout.
    pub const ALL: [&str; 3] = [ADMIN_AUTH, ADMIN_USER, LOGIN_TIME];
}
