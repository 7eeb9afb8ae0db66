//! Authentication types for the domain layer.
//!
//! These types describe the outcome of validating a connection credential.
//! They have no provider dependencies; any token scheme can populate them
//! via the `SessionValidator` port.

use thiserror::Error;

/// Authentication errors that can occur during connection admission.
///
/// These errors are domain-centric - they describe what went wrong from the
/// application's perspective, not the token library's. A failed admission
/// never touches the connection registry or the event queue.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// No token was presented with the connection request.
    #[error("Missing credentials")]
    MissingCredentials,

    /// The token is malformed, has an invalid signature, or carries an
    /// unusable subject claim.
    #[error("Invalid token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,
}

impl AuthError {
    /// Returns true if this error indicates the client should obtain a fresh
    /// token before reconnecting.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
