//! note-relay - Real-time update hub for the notes backend
//!
//! This crate keeps track of which live WebSocket connections belong to which
//! authenticated user and fans out note mutation events (created, updated,
//! deleted, list snapshot) to exactly the connections owned by the affected
//! user.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
