//! Room session coordination for Scrawl.
//!
//! This crate is the core of the game server: each room is an isolated
//! Tokio task (actor model) owning its phase state machine, roster, turn
//! rotation, scoring, and reconnection-grace bookkeeping, driven by both
//! external player actions and its own phase timer.
//!
//! # Key types
//!
//! - [`Registry`] — process-wide room/player lookup, join/leave
//!   orchestration, room creation and listing
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomSummary`] — read-only room metadata snapshot
//! - [`RoomConfig`] — timings, scoring constants, size bounds
//! - [`WordSource`] / [`WordList`] — the guessable-word supply

mod config;
mod error;
mod heartbeat;
mod phase;
mod player;
mod registry;
mod room;
mod timer;
mod words;

pub use config::RoomConfig;
pub use error::RoomError;
pub use player::PlayerSender;
pub use registry::Registry;
pub use room::{RoomHandle, RoomSummary};
pub use words::{WordList, WordSource, mask_word};
