//! The note model as it appears on the wire.
//!
//! Persistence is owned by the CRUD layer; the hub only ever sees fully
//! materialized notes that were already committed. Field names mirror the
//! JSON the frontend consumes (`ID`, `dashboard_path`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::foundation::{NoteId, UserId};

/// A fully materialized note, as sent in `noteUpdate` payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "ID")]
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Path of the attached dashboard image, empty when no file was uploaded.
    pub dashboard_path: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub last_changed: DateTime<Utc>,
}

impl Note {
    /// Creates a new note owned by `user_id`.
    pub fn new(user_id: UserId, title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: NoteId::new(),
            title: title.into(),
            content: content.into(),
            dashboard_path: String::new(),
            user_id,
            created_at: now,
            last_changed: now,
        }
    }

    /// Projects this note to the summary shape used in list snapshots.
    pub fn summary(&self) -> NoteSummary {
        NoteSummary {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            dashboard_path: self.dashboard_path.clone(),
        }
    }
}

/// The minimal projection of a note used in `noteList` payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSummary {
    #[serde(rename = "ID")]
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub dashboard_path: String,
}
