//! WebSocket hub configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the connection registry, event queue, and per-connection
/// channels.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketConfig {
    /// Capacity of the event queue between CRUD producers and the dispatcher.
    /// Producers wait for space when the queue is full.
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,

    /// Buffer size of each connection's outbound channel. A connection whose
    /// buffer is full at delivery time is treated as failed and dropped.
    #[serde(default = "default_connection_buffer")]
    pub connection_buffer: usize,

    /// Seconds between server-initiated WebSocket pings. Bounds how long a
    /// half-open connection can stay registered.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_secs: u64,
}

impl WebSocketConfig {
    /// Get the ping interval as a Duration
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    /// Validate WebSocket configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.event_queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        if self.connection_buffer == 0 {
            return Err(ValidationError::InvalidConnectionBuffer);
        }
        if self.ping_interval_secs == 0 {
            return Err(ValidationError::InvalidPingInterval);
        }
        Ok(())
    }
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            event_queue_capacity: default_event_queue_capacity(),
            connection_buffer: default_connection_buffer(),
            ping_interval_secs: default_ping_interval(),
        }
    }
}

fn default_event_queue_capacity() -> usize {
    256
}

fn default_connection_buffer() -> usize {
    32
}

fn default_ping_interval() -> u64 {
    30
}
