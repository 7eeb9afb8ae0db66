//! Wire protocol between the hub and connected clients.
//!
//! Every server-to-client unit is an envelope `{"type": ..., "data": ...}`
//! with `type` one of `noteList`, `noteUpdate`, `noteDelete`. The tagged enum
//! makes the schema a compile-time fact instead of a naming convention.
//!
//! The channel is push-only: clients send nothing the hub interprets, so
//! there is no client message type here.

use serde::Serialize;

use crate::domain::events::NoteEvent;
use crate::domain::foundation::NoteId;
use crate::domain::note::{Note, NoteSummary};

/// A message sent from the hub to a client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    /// Ordered list of the user's notes, sent after every mutation.
    #[serde(rename = "noteList")]
    NoteList(Vec<NoteSummary>),

    /// A note was created or updated; carries the full note.
    #[serde(rename = "noteUpdate")]
    NoteUpdate(Note),

    /// A note was deleted; carries the bare identifier.
    #[serde(rename = "noteDelete")]
    NoteDelete(NoteId),
}

impl From<NoteEvent> for ServerMessage {
    fn from(event: NoteEvent) -> Self {
        match event {
            NoteEvent::NoteChanged { note, .. } => ServerMessage::NoteUpdate(note),
            NoteEvent::NoteDeleted { note_id, .. } => ServerMessage::NoteDelete(note_id),
            NoteEvent::NoteListSnapshot { items, .. } => ServerMessage::NoteList(items),
        }
    }
}
