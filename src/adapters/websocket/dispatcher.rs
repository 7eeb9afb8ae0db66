//! Event dispatcher: the single consumer of the event queue.
//!
//! Exactly one dispatcher runs for the lifetime of the process. It drains
//! events strictly in submission order, which is what gives the system its
//! global FIFO delivery guarantee; the fan-out to the target user's
//! connections happens inside one processing step, so both connections of a
//! user see a given event before the next event is touched.
//!
//! Delivery is at-most-once and best-effort. A failed write drops that one
//! connection from the registry and moves on; it never aborts the rest of
//! the fan-out, and nothing is retried or re-queued.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::events::NoteEvent;

use super::messages::ServerMessage;
use super::registry::ConnectionRegistry;

/// Single consumer that drains the event queue and fans events out to the
/// target user's connections.
pub struct EventDispatcher {
    registry: Arc<ConnectionRegistry>,
    events: mpsc::Receiver<NoteEvent>,
}

impl EventDispatcher {
    pub(crate) fn new(registry: Arc<ConnectionRegistry>, events: mpsc::Receiver<NoteEvent>) -> Self {
        Self { registry, events }
    }

    /// Run until every producer handle is dropped, processing each event to
    /// completion before taking the next.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            self.dispatch(event).await;
        }
        tracing::info!("event dispatcher stopped");
    }

    async fn dispatch(&self, event: NoteEvent) {
        let principal = event.principal();
        let kind = event.kind();

        // Snapshot before I/O: connections appearing after this point catch
        // up on the next event, connections vanishing fail their write.
        let targets = self.registry.connections_for(&principal).await;
        if targets.is_empty() {
            // No offline buffering: events for absent users are dropped.
            tracing::trace!(%principal, event = kind, "no connections, event dropped");
            return;
        }

        let message = ServerMessage::from(event);
        for connection in targets {
            if let Err(err) = connection.sender.try_send(message.clone()) {
                tracing::debug!(
                    connection_id = %connection.id,
                    %principal,
                    event = kind,
                    "delivery failed, dropping connection: {err}"
                );
                // Removing the entry drops the registry's copy of the sender;
                // the connection's writer task observes the closed channel
                // and releases the socket.
                self.registry.unregister(&connection.id).await;
            }
        }
    }
}
