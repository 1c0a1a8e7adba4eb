//! WebSocket connection manager
//!
//! Manages active WebSocket connections using DashMap for concurrent access.
//! Supports multiple connections per user (e.g., mobile + web).

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

use super::messages::WsMessage;

/// WebSocket sender channel type
pub type WsSender = mpsc::UnboundedSender<WsMessage>;

/// Unique connection identifier
pub type ConnectionId = u64;

/// Thread-safe connection registry that maps user_id to their active
/// WebSocket connections. Uses DashMap for lock-free concurrent access.
pub struct ConnectionManager {
    /// user_id -> list of (connection_id, sender)
    connections: DashMap<u64, Vec<(ConnectionId, WsSender)>>,
    next_conn_id: AtomicU64,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            next_conn_id: AtomicU64::new(1),
        }
    }

    /// Add a new WebSocket connection for a user
    ///
    /// Returns the unique connection ID for this connection.
    pub fn add_connection(&self, user_id: u64, tx: WsSender) -> ConnectionId {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);

        self.connections
            .entry(user_id)
            .or_insert_with(Vec::new)
            .push((conn_id, tx));

        tracing::info!(
            user_id,
            conn_id,
            total_connections = self.connections.get(&user_id).map(|v| v.len()).unwrap_or(0),
            "WebSocket connection added"
        );

        conn_id
    }

    /// Remove a WebSocket connection by ID
    ///
    /// Called when a connection is closed. Cleans up empty user entries.
    pub fn remove_connection(&self, user_id: u64, conn_id: ConnectionId) {
        if let Some(mut senders) = self.connections.get_mut(&user_id) {
            senders.retain(|(id, _)| *id != conn_id);

            if senders.is_empty() {
                drop(senders); // Release the lock
                self.connections.remove(&user_id);
                tracing::info!(user_id, conn_id, "All WebSocket connections closed");
            } else {
                tracing::info!(
                    user_id,
                    conn_id,
                    remaining_connections = senders.len(),
                    "WebSocket connection removed"
                );
            }
        }
    }

    /// Send a message to all connections of a specific user
    pub fn send_to_user(&self, user_id: u64, message: WsMessage) {
        if let Some(senders) = self.connections.get(&user_id) {
            for (_, tx) in senders.iter() {
                if tx.send(message.clone()).is_err() {
                    tracing::warn!(user_id, "Failed to send - client disconnected");
                    // Note: removal handled by ws handler when connection closes
                }
            }
        }
    }

    /// Broadcast a message to every connected client
    pub fn broadcast(&self, message: &WsMessage) {
        let mut recipients = 0usize;
        for entry in self.connections.iter() {
            for (_, tx) in entry.value().iter() {
                if tx.send(message.clone()).is_ok() {
                    recipients += 1;
                }
            }
        }
        tracing::debug!(recipients, "Broadcast message sent");
    }

    /// Get connection statistics
    ///
    /// Returns (number of users, total connections)
    pub fn stats(&self) -> (usize, usize) {
        let users = self.connections.len();
        let total_connections: usize = self
            .connections
            .iter()
            .map(|entry| entry.value().len())
            .sum();
        (users, total_connections)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
