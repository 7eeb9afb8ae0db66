//! Note mutation events.
//!
//! An event is an immutable value submitted once by the CRUD layer after a
//! durable write, routed by the dispatcher to the connections of exactly one
//! user. Events are transient: once delivered (or dropped because the user
//! has no open connections) they are discarded; no log is kept.

use super::foundation::{NoteId, UserId};
use super::note::{Note, NoteSummary};

/// A note mutation destined for one user's connections.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteEvent {
    /// A note was created or updated.
    NoteChanged { principal: UserId, note: Note },

    /// A note was deleted.
    NoteDeleted { principal: UserId, note_id: NoteId },

    /// The user's full note list, sent after every mutation so clients can
    /// refresh without a round trip.
    NoteListSnapshot {
        principal: UserId,
        items: Vec<NoteSummary>,
    },
}

impl NoteEvent {
    /// The user whose connections this event targets.
    pub fn principal(&self) -> UserId {
        match self {
            NoteEvent::NoteChanged { principal, .. }
            | NoteEvent::NoteDeleted { principal, .. }
            | NoteEvent::NoteListSnapshot { principal, .. } => *principal,
        }
    }

    /// Short name of the event variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            NoteEvent::NoteChanged { .. } => "noteUpdate",
            NoteEvent::NoteDeleted { .. } => "noteDelete",
            NoteEvent::NoteListSnapshot { .. } => "noteList",
        }
    }
}
