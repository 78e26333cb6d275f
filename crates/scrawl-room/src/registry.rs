//! The session registry: process-wide lookup of rooms and players.
//!
//! The registry owns two concurrent maps — room name → room handle and
//! client id → connected player — and orchestrates join/leave across
//! them. Room creation, listing, and join validation live here too:
//! they are served from room summaries without mutating any room.
//!
//! Locking discipline: neither map's lock is ever held across an await
//! into a room's mailbox. Handles are cloned out under the lock and the
//! lock released before any room call, so a room actor calling back into
//! the registry (to unregister a player or remove itself) can never
//! deadlock against a caller going the other way.

use std::collections::HashMap;
use std::sync::Arc;

use scrawl_protocol::{ClientId, RoomListing};
use tokio::sync::Mutex;

use crate::heartbeat::HeartbeatMonitor;
use crate::player::PlayerSender;
use crate::room::{RoomHandle, spawn_room};
use crate::words::WordSource;
use crate::{RoomConfig, RoomError};

/// A registered player: its identity plus the heartbeat monitor watching
/// its current connection.
struct ConnectedPlayer {
    username: String,
    monitor: HeartbeatMonitor,
}

struct RegistryInner {
    config: RoomConfig,
    words: Arc<dyn WordSource>,
    rooms: Mutex<HashMap<String, RoomHandle>>,
    players: Mutex<HashMap<ClientId, ConnectedPlayer>>,
}

/// Process-wide room and player registry. Cheap to clone; all clones
/// share the same maps.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    /// Creates an empty registry. `words` supplies every room spawned
    /// through this registry.
    pub fn new(config: RoomConfig, words: Arc<dyn WordSource>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                config,
                words,
                rooms: Mutex::new(HashMap::new()),
                players: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Creates a room with the given capacity.
    ///
    /// # Errors
    /// [`RoomError::InvalidRoomSize`] for a capacity outside the
    /// configured bounds, [`RoomError::RoomExists`] for a duplicate name.
    pub async fn create_room(
        &self,
        name: &str,
        max_players: usize,
    ) -> Result<(), RoomError> {
        let config = &self.inner.config;
        if max_players < config.min_players || max_players > config.max_room_size
        {
            return Err(RoomError::InvalidRoomSize {
                min: config.min_players,
                max: config.max_room_size,
            });
        }

        let mut rooms = self.inner.rooms.lock().await;
        if rooms.contains_key(name) {
            return Err(RoomError::RoomExists(name.to_string()));
        }
        let handle = spawn_room(
            name.to_string(),
            max_players,
            config.clone(),
            Arc::clone(&self.inner.words),
            self.clone(),
        );
        rooms.insert(name.to_string(), handle);
        tracing::info!(room = %name, max_players, "room created");
        Ok(())
    }

    /// Looks up a room by name.
    pub async fn room(&self, name: &str) -> Option<RoomHandle> {
        self.inner.rooms.lock().await.get(name).cloned()
    }

    /// Lists rooms whose name contains `query` (case-insensitive; no
    /// query matches everything), sorted by name.
    pub async fn list_rooms(&self, query: Option<&str>) -> Vec<RoomListing> {
        let handles: Vec<RoomHandle> =
            self.inner.rooms.lock().await.values().cloned().collect();
        let needle = query.unwrap_or("").to_lowercase();

        let mut listings = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(summary) = handle.summary().await {
                if needle.is_empty()
                    || summary.name.to_lowercase().contains(&needle)
                {
                    listings.push(RoomListing {
                        name: summary.name,
                        max_players: summary.max_players,
                        player_count: summary.player_count,
                    });
                }
            }
        }
        listings.sort_by(|a, b| a.name.cmp(&b.name));
        listings
    }

    /// Validates that `username` could join `room_name` right now.
    ///
    /// # Errors
    /// [`RoomError::RoomNotFound`], [`RoomError::UsernameTaken`], or
    /// [`RoomError::RoomFull`] — all structured negatives, not faults.
    pub async fn check_join(
        &self,
        username: &str,
        room_name: &str,
    ) -> Result<(), RoomError> {
        let room = self
            .room(room_name)
            .await
            .ok_or_else(|| RoomError::RoomNotFound(room_name.to_string()))?;
        let summary = room.summary().await?;
        if summary.contains_player(username) {
            return Err(RoomError::UsernameTaken(username.to_string()));
        }
        if summary.is_full() {
            return Err(RoomError::RoomFull(room_name.to_string()));
        }
        Ok(())
    }

    /// Adds a player to a room and registers it for heartbeat
    /// monitoring. A client id already registered (a reconnection) gets
    /// its connection handle and monitor replaced — there is never more
    /// than one live connection per client.
    pub async fn join_room(
        &self,
        room_name: &str,
        client_id: ClientId,
        username: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let room = self
            .room(room_name)
            .await
            .ok_or_else(|| RoomError::RoomNotFound(room_name.to_string()))?;

        room.join(client_id.clone(), username.clone(), sender.clone())
            .await?;

        let monitor = HeartbeatMonitor::spawn(
            client_id.clone(),
            sender,
            self.clone(),
            self.inner.config.heartbeat_interval,
        );
        let mut players = self.inner.players.lock().await;
        if let Some(old) = players
            .insert(client_id.clone(), ConnectedPlayer { username, monitor })
        {
            old.monitor.stop();
        }
        drop(players);

        tracing::info!(client_id = %client_id, room = %room_name, "player registered");
        Ok(())
    }

    /// Records a heartbeat acknowledgment from a player.
    pub async fn heartbeat_ack(&self, client_id: &ClientId) {
        if let Some(player) = self.inner.players.lock().await.get(client_id) {
            player.monitor.record_ack();
        }
    }

    /// Whether the player's connection currently counts as reachable.
    pub async fn is_online(&self, client_id: &ClientId) -> bool {
        match self.inner.players.lock().await.get(client_id) {
            Some(player) => player.monitor.is_online(),
            None => false,
        }
    }

    /// Handles a player leaving, delegating to the room that holds it.
    ///
    /// `immediate` distinguishes a confirmed-dead or policy disconnect
    /// (player is removed and unregistered on the spot) from an ordinary
    /// connection loss (the room stages the player for its grace window;
    /// the registry keeps the record but stops probing the dead
    /// connection).
    pub async fn player_left(&self, client_id: &ClientId, immediate: bool) {
        let room = self.room_of(client_id).await;
        if let Some(room) = &room {
            let _ = room.leave(client_id.clone(), immediate).await;
        }

        if immediate {
            let removed = self.inner.players.lock().await.remove(client_id);
            if let Some(player) = removed {
                tracing::info!(
                    client_id = %client_id,
                    username = %player.username,
                    "closing connection to player"
                );
                player.monitor.stop();
            }
        } else if let Some(player) =
            self.inner.players.lock().await.get(client_id)
        {
            player.monitor.stop();
        }
    }

    /// Finds the room whose roster currently holds this client by
    /// scanning room summaries. Linear in the number of rooms, which is
    /// fine at the cardinalities this server runs at.
    pub async fn room_of(&self, client_id: &ClientId) -> Option<RoomHandle> {
        let handles: Vec<RoomHandle> =
            self.inner.rooms.lock().await.values().cloned().collect();
        for handle in handles {
            if let Ok(summary) = handle.summary().await {
                if summary.contains_client(client_id) {
                    return Some(handle);
                }
            }
        }
        None
    }

    /// Number of registered players. Mostly useful to tests and stats.
    pub async fn player_count(&self) -> usize {
        self.inner.players.lock().await.len()
    }

    /// Drops a player's registration and stops its monitor. Called by
    /// rooms when a grace window elapses or the room is destroyed.
    pub(crate) async fn unregister(&self, client_id: &ClientId) {
        if let Some(player) =
            self.inner.players.lock().await.remove(client_id)
        {
            player.monitor.stop();
            tracing::debug!(client_id = %client_id, "player unregistered");
        }
    }

    /// Drops a room from the registry. Called by the room itself once
    /// its roster empties.
    pub(crate) async fn remove_room(&self, name: &str) {
        self.inner.rooms.lock().await.remove(name);
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::WordList;
    use scrawl_protocol::{Frame, JsonCodec};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn test_words() -> Arc<dyn WordSource> {
        Arc::new(WordList::from_words(
            ["cat", "dog", "fish", "bird"].map(String::from),
        ))
    }

    /// Registry whose heartbeats effectively never fire, so tests on the
    /// paused clock aren't disturbed by liveness timeouts.
    fn quiet_registry() -> Registry {
        let config = RoomConfig {
            heartbeat_interval: Duration::from_secs(3600),
            ..RoomConfig::default()
        };
        Registry::new(config, test_words())
    }

    fn client(id: &str) -> ClientId {
        ClientId::from(id)
    }

    async fn join(
        registry: &Registry,
        room: &str,
        id: &str,
        name: &str,
    ) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        registry
            .join_room(room, client(id), name.to_string(), tx)
            .await
            .expect("join should succeed");
        rx
    }

    // =====================================================================
    // create_room
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_create_room_duplicate_name_fails() {
        let registry = quiet_registry();
        registry.create_room("den", 4).await.unwrap();

        let result = registry.create_room("den", 4).await;

        assert!(matches!(result, Err(RoomError::RoomExists(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_room_rejects_out_of_bounds_sizes() {
        let registry = quiet_registry();

        assert!(matches!(
            registry.create_room("tiny", 1).await,
            Err(RoomError::InvalidRoomSize { min: 2, max: 8 })
        ));
        assert!(matches!(
            registry.create_room("huge", 9).await,
            Err(RoomError::InvalidRoomSize { min: 2, max: 8 })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_room_accepts_bounds_inclusive() {
        let registry = quiet_registry();
        registry.create_room("two", 2).await.unwrap();
        registry.create_room("eight", 8).await.unwrap();
    }

    // =====================================================================
    // list_rooms
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_list_rooms_filters_case_insensitively_and_sorts() {
        let registry = quiet_registry();
        registry.create_room("Beta Den", 4).await.unwrap();
        registry.create_room("alpha den", 4).await.unwrap();
        registry.create_room("other", 4).await.unwrap();

        let listings = registry.list_rooms(Some("DEN")).await;

        let names: Vec<&str> =
            listings.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Beta Den", "alpha den"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_rooms_without_query_lists_everything() {
        let registry = quiet_registry();
        registry.create_room("a", 4).await.unwrap();
        registry.create_room("b", 4).await.unwrap();

        assert_eq!(registry.list_rooms(None).await.len(), 2);
    }

    // =====================================================================
    // check_join
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_check_join_unknown_room_fails() {
        let registry = quiet_registry();

        let result = registry.check_join("ada", "nowhere").await;

        assert!(matches!(result, Err(RoomError::RoomNotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_join_duplicate_username_fails() {
        let registry = quiet_registry();
        registry.create_room("den", 4).await.unwrap();
        let _rx = join(&registry, "den", "c1", "ada").await;

        let result = registry.check_join("ada", "den").await;

        assert!(matches!(result, Err(RoomError::UsernameTaken(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_join_full_room_fails() {
        let registry = quiet_registry();
        registry.create_room("den", 2).await.unwrap();
        let _rx1 = join(&registry, "den", "c1", "ada").await;
        let _rx2 = join(&registry, "den", "c2", "grace").await;

        let result = registry.check_join("hopper", "den").await;

        assert!(matches!(result, Err(RoomError::RoomFull(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_join_open_room_succeeds() {
        let registry = quiet_registry();
        registry.create_room("den", 4).await.unwrap();
        let _rx = join(&registry, "den", "c1", "ada").await;

        assert!(registry.check_join("grace", "den").await.is_ok());
    }

    // =====================================================================
    // join / resolution / leave
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_room_of_resolves_by_roster_scan() {
        let registry = quiet_registry();
        registry.create_room("den", 4).await.unwrap();
        registry.create_room("attic", 4).await.unwrap();
        let _rx = join(&registry, "attic", "c9", "ada").await;

        let found = registry.room_of(&client("c9")).await;

        assert_eq!(found.map(|r| r.name().to_string()), Some("attic".into()));
        assert!(registry.room_of(&client("missing")).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_unknown_room_fails() {
        let registry = quiet_registry();
        let (tx, _rx) = mpsc::unbounded_channel();

        let result = registry
            .join_room("nowhere", client("c1"), "ada".into(), tx)
            .await;

        assert!(matches!(result, Err(RoomError::RoomNotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_duplicate_username_fails() {
        let registry = quiet_registry();
        registry.create_room("den", 4).await.unwrap();
        let _rx = join(&registry, "den", "c1", "ada").await;

        let (tx, _rx2) = mpsc::unbounded_channel();
        let result = registry
            .join_room("den", client("c2"), "ada".into(), tx)
            .await;

        assert!(matches!(result, Err(RoomError::UsernameTaken(_))));
        assert_eq!(registry.player_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_room_destroys_itself_and_unregisters() {
        let registry = quiet_registry();
        registry.create_room("den", 4).await.unwrap();
        let _rx = join(&registry, "den", "c1", "ada").await;

        registry.player_left(&client("c1"), true).await;

        // The room actor removes itself from the registry; give its
        // mailbox a moment to drain.
        let gone = async {
            while registry.room("den").await.is_some() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), gone)
            .await
            .expect("empty room should be destroyed");
        assert_eq!(registry.player_count().await, 0);
    }

    // =====================================================================
    // Heartbeat
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_probes_reach_the_connection() {
        let registry = quiet_registry();
        registry.create_room("den", 4).await.unwrap();
        let mut rx = join(&registry, "den", "c1", "ada").await;

        // The monitor probes once immediately on spawn.
        let first_ping = async {
            while let Some(text) = rx.recv().await {
                if matches!(JsonCodec.decode(&text), Ok(Frame::Ping)) {
                    return true;
                }
            }
            false
        };
        let saw_ping = tokio::time::timeout(Duration::from_secs(5), first_ping)
            .await
            .unwrap_or(false);
        assert!(saw_ping, "a heartbeat probe should have been sent");
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_timeout_disconnects_immediately() {
        let config = RoomConfig {
            heartbeat_interval: Duration::from_secs(1),
            ..RoomConfig::default()
        };
        let registry = Registry::new(config, test_words());
        registry.create_room("den", 4).await.unwrap();
        let _rx = join(&registry, "den", "c1", "solo").await;

        // Never acknowledge; the monitor declares the player dead and the
        // now-empty room destroys itself.
        let gone = async {
            while registry.room("den").await.is_some() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(60), gone)
            .await
            .expect("heartbeat timeout should tear the room down");
        assert_eq!(registry.player_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_acknowledgments_keep_the_player_alive() {
        let config = RoomConfig {
            heartbeat_interval: Duration::from_secs(1),
            ..RoomConfig::default()
        };
        let registry = Registry::new(config, test_words());
        registry.create_room("den", 4).await.unwrap();
        let mut rx = join(&registry, "den", "c1", "solo").await;

        // Answer every probe.
        let acker = registry.clone();
        tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                if matches!(JsonCodec.decode(&text), Ok(Frame::Ping)) {
                    acker.heartbeat_ack(&client("c1")).await;
                }
            }
        });

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(registry.room("den").await.is_some());
        assert!(registry.is_online(&client("c1")).await);
    }
}
