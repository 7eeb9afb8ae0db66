//! Adapters - concrete implementations at the edges of the system.

pub mod auth;
pub mod websocket;
