//! WebSocket upgrade handler and per-connection lifecycle.
//!
//! Each accepted connection goes through:
//! 1. Credential extraction (Authorization header or `token` query parameter)
//! 2. Validation through the `SessionValidator` port - failure is a 401
//!    before the upgrade, and nothing is registered
//! 3. Registration in the connection registry under the resolved user
//! 4. A writer task pumping queued messages and periodic pings to the socket,
//!    and a reader task watching for disconnect
//! 5. Unregistration and socket release when either task ends
//!
//! The reader deliberately discards inbound payloads: the channel is
//! push-only from server to client, and an inbound frame only proves the
//! connection is still alive.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::config::WebSocketConfig;
use crate::domain::foundation::{AuthError, UserId};
use crate::ports::SessionValidator;

use super::hub::NoteHub;
use super::messages::ServerMessage;
use super::registry::{ConnectionHandle, ConnectionId};

/// State required for WebSocket handling, extracted from the application
/// state.
#[derive(Clone)]
pub struct WebSocketState {
    pub hub: NoteHub,
    pub validator: Arc<dyn SessionValidator>,
    pub settings: WebSocketConfig,
}

impl WebSocketState {
    /// Create a new WebSocket state.
    pub fn new(hub: NoteHub, validator: Arc<dyn SessionValidator>, settings: WebSocketConfig) -> Self {
        Self {
            hub,
            validator,
            settings,
        }
    }
}

/// Query parameters accepted on the upgrade request.
///
/// Browser WebSocket clients cannot set headers, so the token may arrive as
/// `?token=...` instead of an Authorization header.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
///
/// The credential is validated before the upgrade completes; an invalid or
/// missing token yields `401 Unauthorized` and no registry entry.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    State(state): State<WebSocketState>,
) -> Response {
    let validated = match credential(&headers, &query) {
        Ok(token) => state.validator.validate(token).await,
        Err(err) => Err(err),
    };

    match validated {
        Ok(principal) => ws.on_upgrade(move |socket| handle_socket(socket, principal, state)),
        Err(err) => {
            tracing::debug!("connection rejected: {err}");
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}

/// Extract the connection credential from the Authorization header or the
/// `token` query parameter, preferring the header.
fn credential<'a>(headers: &'a HeaderMap, query: &'a WsQuery) -> Result<&'a str, AuthError> {
    bearer_token(headers)
        .or(query.token.as_deref())
        .ok_or(AuthError::MissingCredentials)
}

/// Extract a bearer token from the Authorization header, if present.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Run an established connection until disconnect.
async fn handle_socket(socket: WebSocket, principal: UserId, state: WebSocketState) {
    let (sender, mut receiver) = socket.split();

    let connection_id = ConnectionId::new();
    let (tx, rx) = mpsc::channel(state.settings.connection_buffer);
    let registry = Arc::clone(state.hub.registry());

    registry
        .register(ConnectionHandle {
            id: connection_id,
            principal,
            sender: tx,
        })
        .await;
    tracing::debug!(connection_id = %connection_id, %principal, "connection registered");

    let ping_interval = state.settings.ping_interval();
    let mut write_task = tokio::spawn(write_loop(sender, rx, ping_interval));

    // Liveness-only read loop: payloads are ignored, errors and close frames
    // end the connection.
    let mut read_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!("read failed: {err}");
                    break;
                }
            }
        }
    });

    // Whichever side finishes first tears down the other.
    tokio::select! {
        _ = &mut write_task => read_task.abort(),
        _ = &mut read_task => write_task.abort(),
    }

    // Idempotent: the dispatcher may already have removed a failed connection.
    registry.unregister(&connection_id).await;
    tracing::debug!(connection_id = %connection_id, %principal, "connection closed");
}

/// Pump queued messages and periodic pings to the socket until the channel
/// closes or a write fails.
async fn write_loop(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<ServerMessage>,
    ping_interval: std::time::Duration,
) {
    let mut ping = tokio::time::interval(ping_interval);
    ping.tick().await; // The first tick completes immediately.

    loop {
        tokio::select! {
            outbound = rx.recv() => match outbound {
                Some(message) => {
                    if send_message(&mut sender, &message).await.is_err() {
                        break;
                    }
                }
                // Channel closed: the connection was unregistered (failed
                // delivery or shutdown). Say goodbye and release the socket.
                None => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            },
            _ = ping.tick() => {
                if sender.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(message).expect("ServerMessage serialization should not fail");
    sender.send(Message::Text(json)).await
}

/// Create the axum router for the WebSocket endpoint.
///
/// # Example
///
/// ```ignore
/// let app = websocket_router().with_state(ws_state);
/// ```
pub fn websocket_router() -> Router<WebSocketState> {
    Router::new().route("/ws", get(ws_handler))
}
