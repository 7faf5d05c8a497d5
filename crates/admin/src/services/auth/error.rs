//! Admin authentication error types.

use thiserror::Error;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No credential pair is configured, so nobody can log in.
    #[error("admin login is not configured")]
    NotConfigured,
}
