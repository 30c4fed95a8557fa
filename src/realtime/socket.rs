//! Realtime WebSocket endpoint
//!
//! Each accepted socket gets a fresh connection id and a bounded
//! outbound queue registered with the hub. Inbound text frames are
//! parsed and dispatched; malformed frames are logged and dropped
//! without disturbing the connection or its peers.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::events::{ClientEvent, ServerEvent};
use super::handlers;
use super::hub::RealtimeHub;
use crate::api::server::AppState;

/// WebSocket handler for the realtime layer
pub async fn realtime_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| handle_realtime_ws(socket, hub))
}

/// Drive one realtime connection until either side closes
async fn handle_realtime_ws(socket: WebSocket, hub: Arc<RealtimeHub>) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(hub.config().buffer_size);

    if let Err(e) = hub.on_connect(connection_id, tx) {
        warn!(connection_id = %connection_id, "Rejected realtime connection: {}", e);
        return;
    }
    info!(connection_id = %connection_id, "Realtime client connected");

    // Forward hub events to the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize realtime event: {}", e);
                }
            }
        }
    });

    // Parse and dispatch inbound frames
    let dispatch_hub = hub.clone();
    let mut receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => {
                        if let Err(e) = handlers::dispatch(&dispatch_hub, connection_id, event) {
                            warn!(
                                connection_id = %connection_id,
                                "Dropped realtime event: {}", e
                            );
                        }
                    }
                    Err(e) => {
                        warn!(
                            connection_id = %connection_id,
                            "Dropped unparseable frame: {}", e
                        );
                    }
                },
                Ok(Message::Close(_)) => {
                    debug!(connection_id = %connection_id, "Realtime socket received close");
                    break;
                }
                Ok(Message::Ping(_)) => {
                    debug!(connection_id = %connection_id, "Realtime socket ping received");
                    // Pong is handled automatically by axum
                }
                Err(e) => {
                    debug!(connection_id = %connection_id, "Realtime socket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {}
        _ = &mut receive_task => {}
    }

    send_task.abort();
    receive_task.abort();
    let _ = tokio::join!(send_task, receive_task);

    hub.on_disconnect(connection_id);
    info!(connection_id = %connection_id, "Realtime client disconnected");
}
