//! Error types for the room layer.

/// Errors that can occur during registry and room operations.
///
/// Validation failures (bad size, duplicate name or username) are
/// surfaced to clients as structured negative responses; they are not
/// faults. `Unavailable` means a room's mailbox is gone — the room was
/// destroyed while the caller held a stale handle.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// A room with this name is already registered.
    #[error("room {0} already exists")]
    RoomExists(String),

    /// No room with this name is registered.
    #[error("room {0} not found")]
    RoomNotFound(String),

    /// The room's roster is at capacity.
    #[error("room {0} is already full")]
    RoomFull(String),

    /// Another roster member already uses this username.
    #[error("username {0} is already taken")]
    UsernameTaken(String),

    /// The requested capacity is outside the allowed bounds.
    #[error("room size must be between {min} and {max} players")]
    InvalidRoomSize { min: usize, max: usize },

    /// The room's command channel is closed — the room no longer exists.
    #[error("room {0} is unavailable")]
    Unavailable(String),
}
