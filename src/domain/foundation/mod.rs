//! Foundation value objects shared across the domain.

mod auth;
mod ids;

pub use auth::AuthError;
pub use ids::{NoteId, UserId};
