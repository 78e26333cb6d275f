//! Unified error type for the server layer.

use scrawl_protocol::ProtocolError;
use scrawl_room::RoomError;

/// Top-level error for binding, accepting, and handling connections.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Socket-level failure (bind, accept).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// WebSocket handshake or stream failure.
    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Wire encode/decode failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Registry or room failure.
    #[error(transparent)]
    Room(#[from] RoomError),
}
