//! Phase progression rules.
//!
//! The [`Phase`] type itself lives in the protocol crate (it travels on
//! the wire); the rules for how phases follow each other and how long
//! each one runs live here, next to the state machine that applies them.

use std::time::Duration;

use scrawl_protocol::Phase;

use crate::RoomConfig;

/// The phase a room moves to when the current phase's timer expires.
///
/// `WAITING_FOR_PLAYERS` has no timer; it only ends when the roster
/// grows, so expiry maps it onto itself.
pub(crate) fn next_on_expiry(phase: Phase) -> Phase {
    match phase {
        Phase::WaitingForPlayers => Phase::WaitingForPlayers,
        Phase::WaitingForStart => Phase::NewRound,
        Phase::NewRound => Phase::GameRunning,
        Phase::GameRunning => Phase::ShowWord,
        Phase::ShowWord => Phase::NewRound,
    }
}

/// The configured duration of a phase's timer. Zero for the untimed
/// `WAITING_FOR_PLAYERS`.
pub(crate) fn duration_of(phase: Phase, config: &RoomConfig) -> Duration {
    match phase {
        Phase::WaitingForPlayers => Duration::ZERO,
        Phase::WaitingForStart => config.waiting_for_start_delay,
        Phase::NewRound => config.new_round_delay,
        Phase::GameRunning => config.game_running_delay,
        Phase::ShowWord => config.show_word_delay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_on_expiry_cycles_through_rounds() {
        assert_eq!(next_on_expiry(Phase::WaitingForStart), Phase::NewRound);
        assert_eq!(next_on_expiry(Phase::NewRound), Phase::GameRunning);
        assert_eq!(next_on_expiry(Phase::GameRunning), Phase::ShowWord);
        assert_eq!(next_on_expiry(Phase::ShowWord), Phase::NewRound);
    }

    #[test]
    fn test_waiting_for_players_is_a_fixed_point() {
        assert_eq!(
            next_on_expiry(Phase::WaitingForPlayers),
            Phase::WaitingForPlayers
        );
    }

    #[test]
    fn test_duration_of_uses_configured_delays() {
        let config = RoomConfig::default();
        assert_eq!(
            duration_of(Phase::WaitingForStart, &config),
            config.waiting_for_start_delay
        );
        assert_eq!(
            duration_of(Phase::GameRunning, &config),
            config.game_running_delay
        );
        assert_eq!(duration_of(Phase::WaitingForPlayers, &config), Duration::ZERO);
    }
}
