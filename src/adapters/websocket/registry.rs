//! Connection registry: which live connections belong to which user.
//!
//! The registry is the only state shared between the per-connection tasks
//! and the dispatcher. An entry exists exactly as long as its connection is
//! open and admitted; the registry tracks membership only and never owns the
//! socket itself.
//!
//! # Thread Safety
//!
//! Uses `RwLock` around the map since delivery lookups vastly outnumber
//! registrations. The lock is held only for the map operation; callers get a
//! point-in-time copy of the matching entries and perform I/O after the lock
//! is released, so a slow client write can never block registration.

use std::collections::HashMap;
use std::fmt;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::domain::foundation::UserId;

use super::messages::ServerMessage;

/// Unique identifier for a WebSocket connection.
///
/// Generated server-side when a client connects; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Create a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered connection: its identity, owner, and outbound channel.
///
/// The sender feeds the connection's writer task; dropping every clone of it
/// (by unregistering) is what tells that task to close the socket.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub principal: UserId,
    pub sender: mpsc::Sender<ServerMessage>,
}

/// Concurrency-safe store of live connections keyed by connection identity.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Add a connection. Idempotent: registering the same connection ID again
    /// replaces the previous entry rather than duplicating it.
    pub async fn register(&self, handle: ConnectionHandle) {
        self.connections.write().await.insert(handle.id, handle);
    }

    /// Remove a connection. A no-op if the entry is already gone, so the
    /// handler's cleanup and the dispatcher's failure path can both call this
    /// without coordinating.
    pub async fn unregister(&self, id: &ConnectionId) {
        self.connections.write().await.remove(id);
    }

    /// Point-in-time copy of the connections owned by `principal`.
    ///
    /// Never a live view: registrations racing with the caller's subsequent
    /// per-connection I/O cannot corrupt the map or invalidate the snapshot.
    pub async fn connections_for(&self, principal: &UserId) -> Vec<ConnectionHandle> {
        self.connections
            .read()
            .await
            .values()
            .filter(|handle| handle.principal == *principal)
            .cloned()
            .collect()
    }

    /// Point-in-time copy of every registered connection.
    pub async fn all_connections(&self) -> Vec<ConnectionHandle> {
        self.connections.read().await.values().cloned().collect()
    }

    /// Number of connections currently registered for `principal`.
    pub async fn connection_count(&self, principal: &UserId) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|handle| handle.principal == *principal)
            .count()
    }

    /// Total number of registered connections across all users.
    pub async fn total_connections(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
