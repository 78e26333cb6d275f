//! Core wire types for Scrawl's message protocol.
//!
//! Every payload on the wire is a single JSON object whose `type` field
//! identifies its shape. [`Frame`] is the full set of recognized shapes —
//! both directions share one namespace, because some messages (chat, the
//! revealed word) are relayed back out exactly as they came in.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A client's stable identity, assigned at session establishment.
///
/// Unlike a connection, a `ClientId` survives reconnects: the same id
/// presented within the grace window resumes the same player. Serialized
/// as a plain string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// A room's stage in the round lifecycle.
///
/// Wire representation matches the client protocol: screaming snake case
/// (`"GAME_RUNNING"` etc.). The transition rules live with the room state
/// machine; this type is only the shared vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    WaitingForPlayers,
    WaitingForStart,
    NewRound,
    GameRunning,
    ShowWord,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WaitingForPlayers => "WAITING_FOR_PLAYERS",
            Self::WaitingForStart => "WAITING_FOR_START",
            Self::NewRound => "NEW_ROUND",
            Self::GameRunning => "GAME_RUNNING",
            Self::ShowWord => "SHOW_WORD",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Message bodies
// ---------------------------------------------------------------------------

/// Client → Server: request to enter a room, carrying the stable identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomHandshake {
    pub username: String,
    pub room_name: String,
    pub client_id: ClientId,
}

/// One stroke segment. Opaque to the server beyond room routing and
/// phase gating; coordinates are in the client's canvas space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawData {
    pub room_name: String,
    pub color: i32,
    pub thickness: f32,
    pub from_x: f32,
    pub from_y: f32,
    pub to_x: f32,
    pub to_y: f32,
    pub motion_event: i32,
}

/// The drawer's word selection (inbound), and the round's revealed word
/// (outbound, broadcast on `SHOW_WORD`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChosenWord {
    pub chosen_word: String,
    pub room_name: String,
}

/// A chat line. Evaluated as a guess before being relayed as plain chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub from: String,
    pub room_name: String,
    pub message: String,
    pub timestamp: u64,
}

/// Server → Client: phase and countdown update.
///
/// `phase` is `null` on every tick after the first — "same phase, updated
/// time only". The first tick of a phase carries the phase name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseChange {
    pub phase: Option<Phase>,
    pub time_remaining_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_player_username: Option<String>,
}

/// Server → Client: who is drawing and the word as this recipient may
/// see it (masked for guessers, full for the drawer and during reveal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub drawing_player_username: String,
    pub word: String,
}

/// One row of the standings broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub username: String,
    pub is_drawing: bool,
    pub score: i32,
    pub rank: u32,
}

/// Server → Client: full standings, ordered by rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayersList {
    pub players: Vec<PlayerData>,
}

/// What kind of event an [`Announcement`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnouncementKind {
    Guessed,
    Joined,
    Left,
    EveryoneGuessed,
}

/// Server → Client: a human-readable room event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub message: String,
    pub timestamp: u64,
    pub announcement_type: AnnouncementKind,
}

/// Server → Drawer: the candidate words for the upcoming round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWords {
    pub new_words: Vec<String>,
}

/// Server → Client: the round's accumulated drawing actions, replayed to
/// a player joining mid-round. Each entry is a serialized `draw_data`
/// frame, stored and forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDrawInfo {
    pub data: Vec<String>,
}

/// Error codes surfaced to clients through [`GameError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameErrorKind {
    RoomNotFound,
}

/// Server → Client: a game-level failure the client should display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameError {
    pub error_type: GameErrorKind,
}

/// Client → Server: create a room with the given player capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    pub name: String,
    pub max_players: usize,
}

/// Client → Server: list rooms, optionally filtered by a name substring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRooms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

/// Client → Server: would this username be admitted to this room?
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinCheck {
    pub username: String,
    pub room_name: String,
}

/// Server → Client: outcome of a registry request (create / join check).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub successful: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One entry of a room listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomListing {
    pub name: String,
    pub max_players: usize,
    pub player_count: usize,
}

/// Server → Client: rooms matching a listing request, sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomList {
    pub rooms: Vec<RoomListing>,
}

// ---------------------------------------------------------------------------
// Frame — the tagged envelope
// ---------------------------------------------------------------------------

/// The top-level wire message. The `type` field is the discriminator.
///
/// `ping`/`pong` are the heartbeat probe and acknowledgment; they carry
/// no body. Unknown `type` values fail to decode and the frame is
/// dropped by the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    JoinRoomHandshake(JoinRoomHandshake),
    DrawData(DrawData),
    ChosenWord(ChosenWord),
    ChatMessage(ChatMessage),
    PhaseChange(PhaseChange),
    GameState(GameState),
    PlayersList(PlayersList),
    Announcement(Announcement),
    NewWords(NewWords),
    RoundDrawInfo(RoundDrawInfo),
    GameError(GameError),
    CreateRoom(CreateRoom),
    ListRooms(ListRooms),
    JoinCheck(JoinCheck),
    ApiResponse(ApiResponse),
    RoomList(RoomList),
    Ping,
    Pong,
}

// =========================================================================
// Tests
// =========================================================================
