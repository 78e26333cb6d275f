//! Wire protocol for Scrawl.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`Frame`] and its message bodies) — every recognized
//!   message shape, tagged by a `type` discriminator field.
//! - **Codec** ([`JsonCodec`]) — conversion between frames and JSON text.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing so.
//!
//! The protocol layer knows nothing about rooms, rosters, or timers —
//! it is the shared vocabulary the other crates build on.

mod codec;
mod error;
mod types;

pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Announcement, AnnouncementKind, ApiResponse, ChatMessage, ChosenWord,
    ClientId, CreateRoom, DrawData, Frame, GameError, GameErrorKind,
    GameState, JoinCheck, JoinRoomHandshake, ListRooms, NewWords, Phase,
    PhaseChange, PlayerData, PlayersList, RoomList, RoomListing,
    RoundDrawInfo,
};
