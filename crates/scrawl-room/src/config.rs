//! Room configuration: every timing and scoring tunable in one place.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration shared by every room a registry spawns.
///
/// Defaults reproduce the live game's tuning; tests shrink the timings
/// or stretch the heartbeat as needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Minimum players a room may be created for.
    pub min_players: usize,

    /// Maximum players a room may be created for.
    pub max_room_size: usize,

    /// Interval between "time remaining" broadcasts while a phase timer
    /// runs.
    pub tick_interval: Duration,

    /// How long a disconnected player may reconnect before being
    /// permanently removed.
    pub grace_window: Duration,

    /// Interval between heartbeat probes; an acknowledgment staler than
    /// this marks the player dead.
    pub heartbeat_interval: Duration,

    /// `WAITING_FOR_START` phase duration.
    pub waiting_for_start_delay: Duration,

    /// `NEW_ROUND` phase duration (word-choosing window).
    pub new_round_delay: Duration,

    /// `GAME_RUNNING` phase duration (drawing and guessing window).
    pub game_running_delay: Duration,

    /// `SHOW_WORD` phase duration (reveal window).
    pub show_word_delay: Duration,

    /// Flat score for any correct guess.
    pub guess_score_base: i32,

    /// Additional score scaled by the fraction of round time remaining.
    pub guess_score_multiplier: i32,

    /// Score pool the drawer earns a `1/rosterSize` share of per correct
    /// guess.
    pub drawer_guess_score: i32,

    /// Score deducted from the drawer when a round ends with no correct
    /// guess.
    pub no_guess_penalty: i32,

    /// Candidate words offered to the drawer each round.
    pub candidate_words: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_room_size: 8,
            tick_interval: Duration::from_millis(1000),
            grace_window: Duration::from_secs(60),
            heartbeat_interval: Duration::from_secs(3),
            waiting_for_start_delay: Duration::from_secs(10),
            new_round_delay: Duration::from_secs(20),
            game_running_delay: Duration::from_secs(60),
            show_word_delay: Duration::from_secs(10),
            guess_score_base: 50,
            guess_score_multiplier: 50,
            drawer_guess_score: 50,
            no_guess_penalty: 50,
            candidate_words: 3,
        }
    }
}
