//! WebSocket adapters: the real-time update hub.
//!
//! This module keeps track of which live connections belong to which user
//! and fans note mutation events out to exactly the connections of the
//! affected user.
//!
//! # Architecture
//!
//! ```text
//! CRUD handlers (after durable write)
//!          │ NoteHub::publish / note_mutated / note_deleted
//!          ▼
//! ┌─────────────────────┐
//! │     EventQueue      │  bounded mpsc, producers wait when full
//! └─────────────────────┘
//!          │ strict submission order
//!          ▼
//! ┌─────────────────────┐      ┌──────────────────────┐
//! │   EventDispatcher   │─────▶│  ConnectionRegistry  │
//! │  (single consumer)  │      │  user → connections  │
//! └─────────────────────┘      └──────────────────────┘
//!          │ per-connection channel
//!          ▼
//! ┌─────────────────────┐
//! │  connection writer  │  one task per socket, plus a liveness reader
//! └─────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - wire protocol types (`noteList` / `noteUpdate` / `noteDelete`)
//! - [`registry`] - connection membership, keyed by connection identity
//! - [`dispatcher`] - the single queue consumer performing fan-out
//! - [`hub`] - the owned entry point producers and handlers share
//! - [`handler`] - axum upgrade handler and per-connection lifecycle

pub mod dispatcher;
pub mod handler;
pub mod hub;
pub mod messages;
pub mod registry;

pub use dispatcher::EventDispatcher;
pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use hub::{NoteHub, PublishError};
pub use messages::ServerMessage;
pub use registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};
