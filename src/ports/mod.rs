//! Ports - interfaces to external collaborators.
//!
//! The hub consumes exactly one collaborator: the identity check that turns
//! a presented credential into a user ID before a connection is admitted.

mod session_validator;

pub use session_validator::SessionValidator;
