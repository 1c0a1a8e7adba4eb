//! WebSocket module for real-time notifications
//!
//! Provides a ping/pong liveness channel and fan-out of client-submitted
//! notifications to every connected client.

pub mod connection;
pub mod handler;
pub mod messages;

pub use connection::ConnectionManager;
pub use handler::ws_handler;
pub use messages::WsMessage;
