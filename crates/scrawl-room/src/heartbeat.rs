//! Per-player heartbeat monitor.
//!
//! Each connected player runs one independent liveness loop: send a
//! probe, wait one interval, then check that an acknowledgment arrived
//! since the probe. A player whose acknowledgment is missing or stale is
//! marked offline and torn down through the registry's immediate
//! disconnect path — no grace window, the connection is known dead.
//!
//! The loop is a supervised task: [`HeartbeatMonitor::stop`] aborts it,
//! and every disconnect path (explicit, grace, or the monitor's own
//! timeout) does so.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use scrawl_protocol::{ClientId, Frame, JsonCodec};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::player::PlayerSender;
use crate::registry::Registry;

/// Probe/acknowledgment bookkeeping, shared between the monitor task and
/// the registry (which records acknowledgments as `pong` frames arrive).
///
/// Timestamps are stored as milliseconds since the monitor started, so
/// the whole record is lock-free.
struct HeartbeatState {
    started: Instant,
    last_probe_ms: AtomicU64,
    last_ack_ms: AtomicU64,
    online: AtomicBool,
}

impl HeartbeatState {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            last_probe_ms: AtomicU64::new(0),
            last_ack_ms: AtomicU64::new(0),
            online: AtomicBool::new(true),
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn record_probe(&self) {
        self.last_probe_ms.store(self.now_ms(), Ordering::Relaxed);
    }

    fn record_ack(&self) {
        self.last_ack_ms.store(self.now_ms(), Ordering::Relaxed);
        self.online.store(true, Ordering::Relaxed);
    }

    /// The last probe went unanswered for longer than one interval.
    fn ack_overdue(&self, interval: Duration) -> bool {
        let probe = self.last_probe_ms.load(Ordering::Relaxed);
        let ack = self.last_ack_ms.load(Ordering::Relaxed);
        probe.saturating_sub(ack) > interval.as_millis() as u64
    }
}

/// A running liveness loop for one player.
pub(crate) struct HeartbeatMonitor {
    state: Arc<HeartbeatState>,
    task: JoinHandle<()>,
}

impl HeartbeatMonitor {
    /// Starts probing the given connection. The monitor owns its sender
    /// clone; replacing a player's connection means spawning a fresh
    /// monitor and stopping the old one.
    pub(crate) fn spawn(
        client_id: ClientId,
        sender: PlayerSender,
        registry: Registry,
        interval: Duration,
    ) -> Self {
        let state = Arc::new(HeartbeatState::new());
        let task = tokio::spawn(run_monitor(
            client_id,
            sender,
            registry,
            interval,
            Arc::clone(&state),
        ));
        Self { state, task }
    }

    /// Records a `pong` from the player and marks it online.
    pub(crate) fn record_ack(&self) {
        self.state.record_ack();
    }

    /// Whether the player is considered reachable.
    pub(crate) fn is_online(&self) -> bool {
        self.state.online.load(Ordering::Relaxed)
    }

    /// Cancels the liveness loop. Idempotent; aborting a finished task
    /// is a no-op.
    pub(crate) fn stop(&self) {
        self.task.abort();
    }
}

async fn run_monitor(
    client_id: ClientId,
    sender: PlayerSender,
    registry: Registry,
    interval: Duration,
    state: Arc<HeartbeatState>,
) {
    let Ok(probe) = JsonCodec.encode(&Frame::Ping) else {
        return;
    };

    loop {
        state.record_probe();
        let _ = sender.send(probe.clone());

        tokio::time::sleep(interval).await;

        if state.ack_overdue(interval) {
            state.online.store(false, Ordering::Relaxed);
            tracing::info!(
                client_id = %client_id,
                "heartbeat timed out, disconnecting player"
            );
            registry.player_left(&client_id, true).await;
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_is_online_and_not_overdue() {
        let state = HeartbeatState::new();
        assert!(state.online.load(Ordering::Relaxed));
        assert!(!state.ack_overdue(Duration::from_secs(3)));
    }

    #[test]
    fn test_ack_overdue_compares_probe_against_ack() {
        let state = HeartbeatState::new();
        state.last_probe_ms.store(10_000, Ordering::Relaxed);
        state.last_ack_ms.store(2_000, Ordering::Relaxed);

        assert!(state.ack_overdue(Duration::from_secs(3)));
        assert!(!state.ack_overdue(Duration::from_secs(10)));
    }

    #[test]
    fn test_record_ack_restores_online() {
        let state = HeartbeatState::new();
        state.online.store(false, Ordering::Relaxed);

        state.record_ack();

        assert!(state.online.load(Ordering::Relaxed));
    }
}
