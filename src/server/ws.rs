//! axum router, WebSocket upgrade and listener.
//!
//! Each upgraded socket is split: a sender task serialises outbound
//! envelopes onto the sink, the read loop forwards text frames to a
//! [`SessionHandler`] task.  Closing the socket closes the inbound channel,
//! which ends the session, which in turn closes the outbound channel and
//! stops the sender task.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::ServerConfig;
use crate::pipeline::JudgePipeline;
use crate::server::messages::ServerMessage;
use crate::server::session::SessionHandler;

/// Inbound frames buffered per connection before the read loop waits.
const INBOUND_CAPACITY: usize = 16;

/// Outbound envelopes buffered per connection.
const OUTBOUND_CAPACITY: usize = 16;

/// Build the application router.
///
/// * `GET /` and `GET /ws` — WebSocket upgrade.
/// * `GET /health` — liveness probe.
pub fn router(pipeline: Arc<JudgePipeline>) -> Router {
    Router::new()
        .route("/", get(ws_upgrade))
        .route("/ws", get(ws_upgrade))
        .route("/health", get(health))
        .with_state(pipeline)
}

/// Bind `config.bind_addr()` and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, pipeline: Arc<JudgePipeline>) -> Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install Ctrl-C handler: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "Server running" }))
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(pipeline): State<Arc<JudgePipeline>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, pipeline))
}

async fn handle_socket(socket: WebSocket, pipeline: Arc<JudgePipeline>) {
    let connection_id = uuid::Uuid::new_v4().to_string();
    let (ws_sink, mut ws_stream) = socket.split();
    let (out_tx, out_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_CAPACITY);
    let (in_tx, in_rx) = mpsc::channel::<String>(INBOUND_CAPACITY);

    let sender_handle = tokio::spawn(async move {
        let mut sink = ws_sink;
        let mut rx = out_rx;
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(j) => j,
                Err(e) => {
                    log::error!("Failed to serialise envelope: {e}");
                    continue;
                }
            };
            if sink.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let session = tokio::spawn(SessionHandler::new(connection_id.clone(), pipeline, out_tx).run(in_rx));

    while let Some(frame) = ws_stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // ping/pong handled by axum
            Err(e) => {
                log::debug!("session[{connection_id}]: socket error: {e}");
                break;
            }
        };
        if in_tx.send(text).await.is_err() {
            break;
        }
    }

    drop(in_tx);
    if let Err(e) = session.await {
        log::error!("session[{connection_id}]: handler task failed: {e}");
    }
    let _ = sender_handle.await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
