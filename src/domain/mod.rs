//! Domain types for the note update hub.
//!
//! The hub itself lives in `adapters::websocket`; this module holds the
//! transport-independent values that flow through it: identifiers, the note
//! model, and the mutation events.

pub mod events;
pub mod foundation;
pub mod note;

pub use events::NoteEvent;
pub use foundation::{AuthError, NoteId, UserId};
pub use note::{Note, NoteSummary};
