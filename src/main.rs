//! note-relay server binary.
//!
//! Wires configuration, logging, the note hub with its dispatcher task, and
//! the axum router, then serves until interrupted. On shutdown the hub closes
//! every registered connection and the dispatcher drains the queue.

use std::error::Error;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use note_relay::adapters::auth::HmacSessionValidator;
use note_relay::adapters::websocket::{websocket_router, NoteHub, WebSocketState};
use note_relay::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.server.log_level)?)
        .init();

    let (hub, dispatcher) = NoteHub::new(config.websocket.event_queue_capacity);
    let dispatcher_task = tokio::spawn(dispatcher.run());

    let validator = Arc::new(HmacSessionValidator::new(&config.auth.jwt_secret));
    let state = WebSocketState::new(hub.clone(), validator, config.websocket.clone());

    let app = Router::new()
        .route("/healthz", get(healthz))
        .merge(websocket_router())
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "note-relay listening");

    // Closing the registered connections inside the shutdown future lets the
    // server finish draining; open WebSockets would otherwise hold graceful
    // shutdown forever.
    let shutdown_hub = hub.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("shutdown signal received");
            shutdown_hub.shutdown().await;
        })
        .await?;

    // Dropping the last producer handle lets the dispatcher drain and stop.
    drop(hub);
    dispatcher_task.await?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
