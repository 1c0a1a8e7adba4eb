//! WebSocket handler for client connections
//!
//! Handles WebSocket upgrade, connection lifecycle, and message forwarding.

use axum::extract::ws::{Message, WebSocket};
use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::Response,
};
use chrono::Utc;
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::connection::ConnectionManager;
use super::messages::WsMessage;
use crate::gateway::state::AppState;

/// WebSocket connection query parameters
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub user_id: u64,
}

/// WebSocket upgrade handler
///
/// Endpoint: GET /ws?user_id=1001
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let manager = state.ws_manager.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, params.user_id, manager))
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Handle WebSocket connection lifecycle
async fn handle_socket(socket: WebSocket, user_id: u64, manager: Arc<ConnectionManager>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    let conn_id = manager.add_connection(user_id, tx.clone());

    // Send welcome message
    let welcome = WsMessage::Connected { user_id };
    if let Ok(json) = serde_json::to_string(&welcome) {
        let _ = sender.send(Message::Text(json.into())).await;
    }

    // Forward messages from channel to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages (ping/pong, notification relay, close)
    let tx_for_recv = tx.clone();
    let manager_for_recv = manager.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    let parsed: Result<WsMessage, _> = serde_json::from_str(&text);
                    match parsed {
                        Ok(WsMessage::Ping { message, .. }) => {
                            let _ = tx_for_recv.send(WsMessage::Pong {
                                message,
                                timestamp: now_ms(),
                            });
                        }
                        Ok(WsMessage::Notification { data, .. }) => {
                            manager_for_recv.broadcast(&WsMessage::Notification {
                                from: user_id,
                                data,
                                timestamp: now_ms(),
                            });
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::debug!(user_id, error = %e, "Ignoring unparseable ws message");
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    manager.remove_connection(user_id, conn_id);
}
