//! WebSocket message types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages exchanged over the notification socket, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Sent once after a successful upgrade
    Connected { user_id: u64 },
    /// Client liveness probe; echoed back as `pong`
    Ping {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },
    /// Echo of a `ping`, stamped with the server receive time
    Pong { message: String, timestamp: u64 },
    /// Relayed to every connected client
    Notification {
        from: u64,
        data: Value,
        timestamp: u64,
    },
}
