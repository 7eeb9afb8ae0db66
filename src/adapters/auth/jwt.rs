//! HMAC JWT adapter for connection admission.
//!
//! Implements the `SessionValidator` port for HS256 tokens signed with a
//! shared secret, the scheme the rest of the notes backend issues tokens
//! with. Validation checks the signature and the `exp` claim, then resolves
//! the `sub` claim to the owning user.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, UserId};
use crate::ports::SessionValidator;

/// Claims we read from a token. Everything else is ignored.
#[derive(Debug, Deserialize)]
struct Claims {
    /// Subject - the user ID.
    sub: String,

    /// Expiry timestamp (Unix epoch seconds). Required; tokens without an
    /// expiry are rejected.
    #[allow(dead_code)]
    exp: i64,
}

/// Validates HS256 JWTs against a shared secret.
pub struct HmacSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl HmacSessionValidator {
    /// Create a validator for the given shared secret.
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl SessionValidator for HmacSessionValidator {
    async fn validate(&self, token: &str) -> Result<UserId, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            },
        )?;

        // A subject that is not a UUID cannot own notes in this system.
        data.claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::InvalidToken)
    }
}
