//! The per-room phase timer.
//!
//! One [`PhaseTimer`] lives inside each room actor and drives the timed
//! broadcast cycle: while a phase runs, it fires once per tick interval
//! so the room can broadcast the remaining time, and after the full
//! duration it fires expiry so the room can transition.
//!
//! The at-most-one-active-timer invariant is structural: the timer holds
//! a single optional run, and [`schedule`](PhaseTimer::schedule) replaces
//! it. There is no task to cancel — the actor polls
//! [`next_event`](PhaseTimer::next_event) in its `tokio::select!` loop,
//! and a timer with no active run pends forever, letting the other
//! branches proceed.

use std::time::Duration;

use tokio::time::{self, Instant as TokioInstant};

/// What a firing of the phase timer means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerEvent {
    /// A "time remaining" tick. `first` is set only on the tick that
    /// opens a phase — the broadcast for it carries the phase name,
    /// later ones null it out.
    Tick { first: bool, time_left: Duration },

    /// The phase's full duration has elapsed.
    Expired,
}

struct TimerRun {
    started: TokioInstant,
    next_fire: TokioInstant,
    ticks_left: u32,
    time_left: Duration,
    first_sent: bool,
}

/// Countdown state for the room's current phase.
pub(crate) struct PhaseTimer {
    tick_interval: Duration,
    run: Option<TimerRun>,
}

impl PhaseTimer {
    pub(crate) fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            run: None,
        }
    }

    /// Starts a countdown for `duration`, replacing any running one.
    ///
    /// The first tick fires immediately (it announces the phase), then
    /// one tick per interval until `duration` is consumed, then expiry.
    pub(crate) fn schedule(&mut self, duration: Duration) {
        let ticks = (duration.as_millis() / self.tick_interval.as_millis().max(1)) as u32;
        self.run = Some(TimerRun {
            started: TokioInstant::now(),
            next_fire: TokioInstant::now(),
            ticks_left: ticks,
            time_left: duration,
            first_sent: false,
        });
    }

    /// Stops the countdown. Idempotent.
    pub(crate) fn cancel(&mut self) {
        self.run = None;
    }

    /// Time since the current phase's countdown began.
    pub(crate) fn phase_elapsed(&self) -> Option<Duration> {
        self.run.as_ref().map(|run| run.started.elapsed())
    }

    /// Remaining time on the current countdown.
    pub(crate) fn time_left(&self) -> Option<Duration> {
        self.run.as_ref().map(|run| run.time_left)
    }

    /// Waits for the next tick or expiry.
    ///
    /// Pends forever while no countdown is running — safe to poll from a
    /// `select!` branch unconditionally. Cancel-safe: state only advances
    /// once a fire deadline has actually been reached.
    pub(crate) async fn next_event(&mut self) -> TimerEvent {
        let Some(run) = self.run.as_mut() else {
            return std::future::pending().await;
        };

        time::sleep_until(run.next_fire).await;

        if run.ticks_left == 0 {
            self.run = None;
            return TimerEvent::Expired;
        }

        let first = !run.first_sent;
        run.first_sent = true;
        let time_left = run.time_left;
        run.ticks_left -= 1;
        run.time_left = run.time_left.saturating_sub(self.tick_interval);
        run.next_fire += self.tick_interval;

        TimerEvent::Tick { first, time_left }
    }
}

// =========================================================================
// Tests
// =========================================================================
