//! SessionValidator port - credential validation for connection admission.
//!
//! The hub never mints or interprets identities itself; it hands the raw
//! token from the connection request to this port and either gets back the
//! owning user or rejects the connection before the WebSocket upgrade.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, UserId};

/// Validates a connection credential and resolves the owning user.
///
/// # Contract
///
/// Implementations must:
/// - Return the user ID carried by a valid, unexpired token
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::InvalidToken` for anything else that fails to verify
///
/// A failed validation must be side-effect free: no registry entry, no
/// queued event, nothing to clean up.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token string and return the authenticated user ID.
    async fn validate(&self, token: &str) -> Result<UserId, AuthError>;
}
