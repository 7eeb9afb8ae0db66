//! The note hub: the explicitly owned entry point into the real-time core.
//!
//! Constructed once at startup, the hub owns the producer side of the event
//! queue and a handle to the connection registry. The CRUD layer submits
//! events through it after each durable write; the connection handler reaches
//! the registry through it. There is no ambient global state: drop every hub
//! clone and the dispatcher drains and stops.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::events::NoteEvent;
use crate::domain::foundation::{NoteId, UserId};
use crate::domain::note::{Note, NoteSummary};

use super::dispatcher::EventDispatcher;
use super::registry::ConnectionRegistry;

/// Errors visible to event producers.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The dispatcher is gone (shutdown); the event was not submitted.
    #[error("Event queue is closed")]
    QueueClosed,
}

/// Shared handle for submitting events and admitting connections.
///
/// Cheap to clone; every clone feeds the same queue and registry.
#[derive(Clone)]
pub struct NoteHub {
    registry: Arc<ConnectionRegistry>,
    events: mpsc::Sender<NoteEvent>,
}

impl NoteHub {
    /// Build a hub and its dispatcher.
    ///
    /// The caller spawns the dispatcher (`tokio::spawn(dispatcher.run())`);
    /// keeping construction and spawning separate lets tests drive the
    /// dispatcher on their own runtime.
    ///
    /// `queue_capacity` bounds the hand-off between producers and the
    /// dispatcher; when the queue is full, `publish` waits for space rather
    /// than dropping events.
    pub fn new(queue_capacity: usize) -> (Self, EventDispatcher) {
        let registry = Arc::new(ConnectionRegistry::new());
        let (tx, rx) = mpsc::channel(queue_capacity);
        let hub = Self {
            registry: Arc::clone(&registry),
            events: tx,
        };
        (hub, EventDispatcher::new(registry, rx))
    }

    /// The connection registry backing this hub.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Submit one event for delivery.
    ///
    /// Returns as soon as the event is queued; delivery happens on the
    /// dispatcher task, in submission order.
    pub async fn publish(&self, event: NoteEvent) -> Result<(), PublishError> {
        self.events
            .send(event)
            .await
            .map_err(|_| PublishError::QueueClosed)
    }

    /// Called by the CRUD layer after a note create or update commits.
    ///
    /// Submits the changed note followed by the caller's fresh list snapshot,
    /// so every connection of the owner sees the mutation and then the new
    /// list, in that order.
    pub async fn note_mutated(
        &self,
        principal: UserId,
        note: Note,
        items: Vec<NoteSummary>,
    ) -> Result<(), PublishError> {
        self.publish(NoteEvent::NoteChanged { principal, note }).await?;
        self.publish(NoteEvent::NoteListSnapshot { principal, items })
            .await
    }

    /// Called by the CRUD layer after a note delete commits.
    pub async fn note_deleted(
        &self,
        principal: UserId,
        note_id: NoteId,
        items: Vec<NoteSummary>,
    ) -> Result<(), PublishError> {
        self.publish(NoteEvent::NoteDeleted { principal, note_id })
            .await?;
        self.publish(NoteEvent::NoteListSnapshot { principal, items })
            .await
    }

    /// Close every registered connection.
    ///
    /// Each unregistered connection's writer task observes its closed channel
    /// and releases the socket. Once every hub clone is dropped as well, the
    /// dispatcher drains the remaining events and stops.
    pub async fn shutdown(&self) {
        let connections = self.registry.all_connections().await;
        tracing::info!(count = connections.len(), "closing all connections");
        for connection in connections {
            self.registry.unregister(&connection.id).await;
        }
    }
}
