//! Room actor: an isolated Tokio task that owns one game session.
//!
//! Each room runs in its own task and owns every piece of mutable room
//! state — roster, phase, round data, grace staging. The outside world
//! (connection handlers, the registry, heartbeat monitors) reaches it
//! only through its mpsc mailbox, and the phase timer re-enters the
//! state machine through the same `select!` loop. That single loop is
//! the serialization point that upholds the two hard invariants:
//! at most one active phase timer per room, and exactly one entry-action
//! execution per phase change.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use rand::seq::{IndexedRandom, SliceRandom};
use scrawl_protocol::{
    Announcement, AnnouncementKind, ChatMessage, ChosenWord, ClientId, Frame,
    GameState, JsonCodec, NewWords, Phase, PhaseChange, PlayersList,
    RoundDrawInfo,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::phase;
use crate::player::{Player, PlayerSender, standings};
use crate::registry::Registry;
use crate::timer::{PhaseTimer, TimerEvent};
use crate::words::{WordSource, mask_word};
use crate::{RoomConfig, RoomError};

/// Commands sent to a room actor through its mailbox.
pub(crate) enum RoomCommand {
    /// Add a player (fresh join or grace-window reconnection).
    Join {
        client_id: ClientId,
        username: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Remove a player. `immediate` skips the grace window.
    Leave { client_id: ClientId, immediate: bool },

    /// A chat line, evaluated as a guess before being relayed.
    Chat { message: ChatMessage },

    /// The drawer picked the round's word.
    ChosenWord { word: String },

    /// A serialized `draw_data` frame to accumulate and relay.
    Draw { client_id: ClientId, raw: String },

    /// A staged player's delayed permanent removal came due.
    GraceExpired { client_id: ClientId },

    /// Request a read-only snapshot of room metadata.
    Summary {
        reply: oneshot::Sender<RoomSummary>,
    },
}

/// A read-only snapshot of a room, served without mutating it.
///
/// `player_names` and `client_ids` are in roster (turn) order; grace-staged
/// players are not included.
#[derive(Debug, Clone)]
pub struct RoomSummary {
    pub name: String,
    pub max_players: usize,
    pub player_count: usize,
    pub player_names: Vec<String>,
    pub client_ids: Vec<ClientId>,
}

impl RoomSummary {
    /// Whether a roster member already uses this username.
    pub fn contains_player(&self, username: &str) -> bool {
        self.player_names.iter().any(|n| n == username)
    }

    /// Whether this client is currently on the roster.
    pub fn contains_client(&self, client_id: &ClientId) -> bool {
        self.client_ids.contains(client_id)
    }

    /// Whether the roster is at capacity.
    pub fn is_full(&self) -> bool {
        self.player_count >= self.max_players
    }
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    name: String,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.name.clone())
    }

    /// Adds a player and waits for the room's verdict.
    pub async fn join(
        &self,
        client_id: ClientId,
        username: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                client_id,
                username,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Removes a player; `immediate` skips the grace window.
    pub async fn leave(
        &self,
        client_id: ClientId,
        immediate: bool,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Leave {
                client_id,
                immediate,
            })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Delivers a chat line for guess evaluation and relay.
    pub async fn chat(&self, message: ChatMessage) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Chat { message })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Delivers the drawer's word selection.
    pub async fn chosen_word(&self, word: String) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::ChosenWord { word })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Delivers one serialized draw action for relay.
    pub async fn draw(
        &self,
        client_id: ClientId,
        raw: String,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Draw { client_id, raw })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Fetches a metadata snapshot.
    pub async fn summary(&self) -> Result<RoomSummary, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Summary { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }
}

/// Mailbox capacity per room. Bounded so a stalled room applies
/// backpressure to callers instead of buffering without limit.
const MAILBOX_SIZE: usize = 64;

/// Spawns a room actor task and returns a handle to it.
pub(crate) fn spawn_room(
    name: String,
    max_players: usize,
    config: RoomConfig,
    words: Arc<dyn WordSource>,
    registry: Registry,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(MAILBOX_SIZE);
    let tick_interval = config.tick_interval;

    let actor = RoomActor {
        name: name.clone(),
        max_players,
        config,
        words,
        registry,
        phase: Phase::WaitingForPlayers,
        players: Vec::new(),
        drawing_player: None,
        drawing_player_index: 0,
        guessed: HashSet::new(),
        secret_word: None,
        candidates: Vec::new(),
        round_draw_data: Vec::new(),
        grace: HashMap::new(),
        grace_tasks: HashMap::new(),
        receiver: rx,
        self_sender: tx.clone(),
        timer: PhaseTimer::new(tick_interval),
        destroyed: false,
    };

    tokio::spawn(actor.run());

    RoomHandle { name, sender: tx }
}

struct RoomActor {
    name: String,
    max_players: usize,
    config: RoomConfig,
    words: Arc<dyn WordSource>,
    registry: Registry,

    phase: Phase,
    /// Roster in turn order. Membership and order change only by
    /// replacing the whole vector, never by editing it in place.
    players: Vec<Player>,

    drawing_player: Option<ClientId>,
    drawing_player_index: usize,
    guessed: HashSet<String>,
    secret_word: Option<String>,
    candidates: Vec<String>,
    round_draw_data: Vec<String>,

    /// Players inside their disconnect grace window: snapshot plus the
    /// roster index they left from.
    grace: HashMap<ClientId, (Player, usize)>,
    /// Pending delayed-removal tasks, aborted on reconnect or room death.
    grace_tasks: HashMap<ClientId, JoinHandle<()>>,

    receiver: mpsc::Receiver<RoomCommand>,
    self_sender: mpsc::Sender<RoomCommand>,
    timer: PhaseTimer,
    destroyed: bool,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room = %self.name, "room started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
                event = self.timer.next_event() => self.handle_timer_event(event),
            }
            if self.destroyed {
                break;
            }
        }

        tracing::info!(room = %self.name, "room stopped");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                client_id,
                username,
                sender,
                reply,
            } => {
                let result = self.handle_join(client_id, username, sender);
                let _ = reply.send(result);
            }
            RoomCommand::Leave {
                client_id,
                immediate,
            } => self.handle_leave(client_id, immediate).await,
            RoomCommand::Chat { message } => self.handle_chat(message),
            RoomCommand::ChosenWord { word } => self.handle_chosen_word(word),
            RoomCommand::Draw { client_id, raw } => {
                self.handle_draw(&client_id, raw)
            }
            RoomCommand::GraceExpired { client_id } => {
                self.handle_grace_expired(client_id).await
            }
            RoomCommand::Summary { reply } => {
                let _ = reply.send(self.summary());
            }
        }
    }

    // -- Player lifecycle --------------------------------------------------

    fn handle_join(
        &mut self,
        client_id: ClientId,
        username: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let staged = self.grace.remove(&client_id);
        if staged.is_none() {
            if self.players.iter().any(|p| p.username == username) {
                return Err(RoomError::UsernameTaken(username));
            }
            if self.players.len() >= self.max_players {
                return Err(RoomError::RoomFull(self.name.clone()));
            }
        }

        let (player, index) = match staged {
            Some((mut player, index)) => {
                // Reconnection: reuse the staged record, swap in the new
                // connection, and call off the pending removal.
                if let Some(job) = self.grace_tasks.remove(&client_id) {
                    job.abort();
                }
                player.sender = sender;
                player.is_drawing =
                    self.drawing_player.as_ref() == Some(&client_id);
                tracing::info!(
                    room = %self.name,
                    client_id = %client_id,
                    "player reconnected within grace window"
                );
                (player, index)
            }
            None => (
                Player::new(username, client_id.clone(), sender),
                self.players.len(),
            ),
        };

        let index = index.min(self.players.len());
        let username = player.username.clone();
        let joined_sender = player.sender.clone();

        let mut roster = std::mem::take(&mut self.players);
        roster.insert(index, player);
        self.players = roster;

        if self.players.len() == 1 {
            self.transition(Phase::WaitingForPlayers);
        } else if self.players.len() == 2 && self.phase == Phase::WaitingForPlayers
        {
            self.transition(Phase::WaitingForStart);
            let mut roster = std::mem::take(&mut self.players);
            roster.shuffle(&mut rand::rng());
            self.players = roster;
        } else if self.phase == Phase::WaitingForStart
            && self.players.len() == self.max_players
        {
            self.transition(Phase::NewRound);
        }

        if let Some(joined) =
            self.players.iter().find(|p| p.client_id == client_id)
        {
            self.send_word_to(joined);
        }
        self.broadcast_player_states();
        if matches!(self.phase, Phase::GameRunning | Phase::ShowWord) {
            send_frame(
                &joined_sender,
                &Frame::RoundDrawInfo(RoundDrawInfo {
                    data: self.round_draw_data.clone(),
                }),
            );
        }
        self.broadcast(&Frame::Announcement(Announcement {
            message: format!("{username} joined the party"),
            timestamp: now_millis(),
            announcement_type: AnnouncementKind::Joined,
        }));

        tracing::info!(
            room = %self.name,
            client_id = %client_id,
            players = self.players.len(),
            "player joined"
        );
        Ok(())
    }

    async fn handle_leave(&mut self, client_id: ClientId, immediate: bool) {
        // An immediate disconnect may land while the player is already in
        // the grace window; that discards the staged entry for good.
        if immediate && self.grace.remove(&client_id).is_some() {
            if let Some(job) = self.grace_tasks.remove(&client_id) {
                job.abort();
            }
            tracing::debug!(
                room = %self.name,
                client_id = %client_id,
                "staged player discarded on immediate disconnect"
            );
            return;
        }

        let Some(position) =
            self.players.iter().position(|p| p.client_id == client_id)
        else {
            return;
        };

        let mut roster = std::mem::take(&mut self.players);
        let player = roster.remove(position);
        self.players = roster;
        let username = player.username.clone();

        if immediate {
            tracing::info!(
                room = %self.name,
                client_id = %client_id,
                "player removed without grace"
            );
        } else {
            self.grace.insert(client_id.clone(), (player, position));
            let grace_window = self.config.grace_window;
            let mailbox = self.self_sender.clone();
            let expired = client_id.clone();
            let job = tokio::spawn(async move {
                tokio::time::sleep(grace_window).await;
                let _ = mailbox
                    .send(RoomCommand::GraceExpired { client_id: expired })
                    .await;
            });
            self.grace_tasks.insert(client_id.clone(), job);
            tracing::info!(
                room = %self.name,
                client_id = %client_id,
                "player left, grace window started"
            );
        }

        self.broadcast_player_states();
        self.broadcast(&Frame::Announcement(Announcement {
            message: format!("Player {username} left the party"),
            timestamp: now_millis(),
            announcement_type: AnnouncementKind::Left,
        }));

        if self.players.len() == 1 {
            self.transition(Phase::WaitingForPlayers);
        } else if self.players.is_empty() {
            self.destroy().await;
        }
    }

    async fn handle_grace_expired(&mut self, client_id: ClientId) {
        self.grace_tasks.remove(&client_id);
        if self.grace.remove(&client_id).is_some() {
            self.registry.unregister(&client_id).await;
            tracing::info!(
                room = %self.name,
                client_id = %client_id,
                "grace window elapsed, player permanently removed"
            );
        }
    }

    async fn destroy(&mut self) {
        self.destroyed = true;
        self.timer.cancel();
        for (_, job) in self.grace_tasks.drain() {
            job.abort();
        }
        let staged: Vec<ClientId> = self.grace.keys().cloned().collect();
        self.grace.clear();
        for client_id in staged {
            self.registry.unregister(&client_id).await;
        }
        self.registry.remove_room(&self.name).await;
        tracing::info!(room = %self.name, "room destroyed");
    }

    // -- Guessing and relays -----------------------------------------------

    fn handle_chat(&mut self, message: ChatMessage) {
        let correct = is_correct_guess(
            &message,
            self.phase,
            self.secret_word.as_deref(),
            &self.guessed,
            self.drawer_username().as_deref(),
        );
        if !correct {
            self.broadcast(&Frame::ChatMessage(message));
            return;
        }

        let elapsed = self.timer.phase_elapsed().unwrap_or_default();
        let reward = guess_reward(
            elapsed,
            self.config.game_running_delay,
            self.config.guess_score_base,
            self.config.guess_score_multiplier,
        );
        if let Some(guesser) = self
            .players
            .iter_mut()
            .find(|p| p.username == message.from)
        {
            guesser.score += reward;
        }
        if !self.players.is_empty() {
            let share =
                self.config.drawer_guess_score / self.players.len() as i32;
            if let Some(id) = self.drawing_player.clone() {
                if let Some(drawer) =
                    self.players.iter_mut().find(|p| p.client_id == id)
                {
                    drawer.score += share;
                }
            }
        }

        self.broadcast_player_states();
        self.broadcast(&Frame::Announcement(Announcement {
            message: format!("{} has guessed it", message.from),
            timestamp: now_millis(),
            announcement_type: AnnouncementKind::Guessed,
        }));

        self.guessed.insert(message.from.clone());
        if self.players.len() >= 2 && self.guessed.len() == self.players.len() - 1
        {
            // Everyone but the drawer got it; the round ends early and the
            // running timer dies with the transition.
            self.transition(Phase::NewRound);
            self.broadcast(&Frame::Announcement(Announcement {
                message: "Everybody has guessed it - new round will start soon"
                    .into(),
                timestamp: now_millis(),
                announcement_type: AnnouncementKind::EveryoneGuessed,
            }));
        }
    }

    fn handle_chosen_word(&mut self, word: String) {
        if self.phase != Phase::NewRound {
            tracing::debug!(
                room = %self.name,
                phase = %self.phase,
                "ignoring chosen word outside NEW_ROUND"
            );
            return;
        }
        self.secret_word = Some(word);
        self.transition(Phase::GameRunning);
    }

    fn handle_draw(&mut self, client_id: &ClientId, raw: String) {
        if self.phase != Phase::GameRunning {
            return;
        }
        self.broadcast_raw(&raw, Some(client_id));
        self.round_draw_data.push(raw);
    }

    // -- Phase state machine ----------------------------------------------

    /// Moves the room to `next` and runs that phase's entry action.
    ///
    /// Assigning the current phase again is a no-op: entry actions run
    /// exactly once per change, never on re-entry with the same value.
    fn transition(&mut self, next: Phase) {
        if self.phase == next {
            return;
        }
        self.phase = next;
        tracing::debug!(room = %self.name, phase = %next, "phase change");
        match next {
            Phase::WaitingForPlayers => self.enter_waiting_for_players(),
            Phase::WaitingForStart => self.enter_waiting_for_start(),
            Phase::NewRound => self.enter_new_round(),
            Phase::GameRunning => self.enter_game_running(),
            Phase::ShowWord => self.enter_show_word(),
        }
    }

    fn handle_timer_event(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Tick { first, time_left } => {
                self.broadcast(&Frame::PhaseChange(PhaseChange {
                    phase: first.then_some(self.phase),
                    time_remaining_ms: time_left.as_millis() as u64,
                    drawing_player_username: self.drawer_username(),
                }));
            }
            TimerEvent::Expired => {
                self.transition(phase::next_on_expiry(self.phase));
            }
        }
    }

    fn enter_waiting_for_players(&mut self) {
        self.timer.cancel();
        self.broadcast(&Frame::PhaseChange(PhaseChange {
            phase: Some(Phase::WaitingForPlayers),
            time_remaining_ms: 0,
            drawing_player_username: None,
        }));
    }

    fn enter_waiting_for_start(&mut self) {
        self.timer
            .schedule(phase::duration_of(Phase::WaitingForStart, &self.config));
    }

    fn enter_new_round(&mut self) {
        self.secret_word = None;
        self.guessed.clear();
        self.round_draw_data = Vec::new();
        self.candidates = self.words.random_words(self.config.candidate_words);
        self.next_drawing_player();

        self.broadcast_player_states();
        if let Some(drawer) = self.drawer() {
            send_frame(
                &drawer.sender,
                &Frame::NewWords(NewWords {
                    new_words: self.candidates.clone(),
                }),
            );
        }
        self.timer
            .schedule(phase::duration_of(Phase::NewRound, &self.config));
    }

    fn enter_game_running(&mut self) {
        // Word priority: what the drawer picked this round, else one of
        // the round's candidates, else anything from the word source.
        let word = self
            .secret_word
            .clone()
            .or_else(|| self.candidates.choose(&mut rand::rng()).cloned())
            .or_else(|| self.words.random_word());

        let duration = phase::duration_of(Phase::GameRunning, &self.config);
        let Some(word) = word else {
            tracing::warn!(room = %self.name, "word source is empty, nothing to guess this round");
            self.timer.schedule(duration);
            return;
        };
        self.secret_word = Some(word.clone());

        let Some(drawer) = self.drawer() else {
            tracing::warn!(room = %self.name, "no drawing player for the round");
            self.timer.schedule(duration);
            return;
        };
        let drawer_name = drawer.username.clone();
        let drawer_id = drawer.client_id.clone();
        let drawer_sender = drawer.sender.clone();

        self.broadcast_except(
            &Frame::GameState(GameState {
                drawing_player_username: drawer_name.clone(),
                word: mask_word(&word),
            }),
            &drawer_id,
        );
        send_frame(
            &drawer_sender,
            &Frame::GameState(GameState {
                drawing_player_username: drawer_name,
                word,
            }),
        );
        self.timer.schedule(duration);
    }

    fn enter_show_word(&mut self) {
        if self.guessed.is_empty() {
            let penalty = self.config.no_guess_penalty;
            if let Some(id) = self.drawing_player.clone() {
                if let Some(drawer) =
                    self.players.iter_mut().find(|p| p.client_id == id)
                {
                    drawer.score -= penalty;
                }
            }
        }
        self.broadcast_player_states();
        if let Some(word) = self.secret_word.clone() {
            self.broadcast(&Frame::ChosenWord(ChosenWord {
                chosen_word: word,
                room_name: self.name.clone(),
            }));
        }
        self.timer
            .schedule(phase::duration_of(Phase::ShowWord, &self.config));
    }

    // -- Turn rotation -----------------------------------------------------

    fn next_drawing_player(&mut self) {
        for p in &mut self.players {
            p.is_drawing = false;
        }
        self.drawing_player = None;

        let Some((selected, next)) =
            rotation_step(self.drawing_player_index, self.players.len())
        else {
            return;
        };
        self.players[selected].is_drawing = true;
        self.drawing_player = Some(self.players[selected].client_id.clone());
        self.drawing_player_index = next;
    }

    // -- Outbound ----------------------------------------------------------

    /// Sends a joining player its view of the round: the word as it may
    /// see it, and the current phase with the real remaining time.
    fn send_word_to(&self, player: &Player) {
        if let (Some(word), Some(drawer)) =
            (self.secret_word.as_deref(), self.drawer_username())
        {
            let view = if player.is_drawing || self.phase == Phase::ShowWord {
                word.to_string()
            } else {
                mask_word(word)
            };
            send_frame(
                &player.sender,
                &Frame::GameState(GameState {
                    drawing_player_username: drawer,
                    word: view,
                }),
            );
        }
        let time_left = self
            .timer
            .time_left()
            .unwrap_or_else(|| phase::duration_of(self.phase, &self.config));
        send_frame(
            &player.sender,
            &Frame::PhaseChange(PhaseChange {
                phase: Some(self.phase),
                time_remaining_ms: time_left.as_millis() as u64,
                drawing_player_username: self.drawer_username(),
            }),
        );
    }

    fn broadcast_player_states(&self) {
        self.broadcast(&Frame::PlayersList(PlayersList {
            players: standings(&self.players),
        }));
    }

    fn broadcast(&self, frame: &Frame) {
        if let Some(text) = encode(frame) {
            self.broadcast_raw(&text, None);
        }
    }

    fn broadcast_except(&self, frame: &Frame, excluded: &ClientId) {
        if let Some(text) = encode(frame) {
            self.broadcast_raw(&text, Some(excluded));
        }
    }

    /// Best-effort fan-out: a connection that can't take the message is
    /// skipped, the rest still get it.
    fn broadcast_raw(&self, text: &str, excluded: Option<&ClientId>) {
        for player in &self.players {
            if excluded == Some(&player.client_id) {
                continue;
            }
            let _ = player.sender.send(text.to_string());
        }
    }

    fn drawer(&self) -> Option<&Player> {
        let id = self.drawing_player.as_ref()?;
        self.players.iter().find(|p| &p.client_id == id)
    }

    fn drawer_username(&self) -> Option<String> {
        self.drawer().map(|p| p.username.clone())
    }

    fn summary(&self) -> RoomSummary {
        RoomSummary {
            name: self.name.clone(),
            max_players: self.max_players,
            player_count: self.players.len(),
            player_names: self
                .players
                .iter()
                .map(|p| p.username.clone())
                .collect(),
            client_ids: self
                .players
                .iter()
                .map(|p| p.client_id.clone())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Sequential-wraparound drawer rotation: select `index` clamped into the
/// roster, advance by one, wrap to the front past the end. `None` on an
/// empty roster.
fn rotation_step(index: usize, len: usize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let selected = index.min(len - 1);
    let next = if selected + 1 >= len { 0 } else { selected + 1 };
    Some((selected, next))
}

/// Whether a chat line is a correct guess: right phase, case- and
/// whitespace-insensitive match, sender hasn't scored this round, sender
/// isn't drawing. No secret word means no guess can be correct.
fn is_correct_guess(
    message: &ChatMessage,
    current_phase: Phase,
    secret_word: Option<&str>,
    guessed: &HashSet<String>,
    drawer: Option<&str>,
) -> bool {
    let Some(word) = secret_word else {
        return false;
    };
    current_phase == Phase::GameRunning
        && message.message.trim().to_lowercase() == word.trim().to_lowercase()
        && !guessed.contains(&message.from)
        && drawer != Some(message.from.as_str())
}

/// Score for a correct guess: the flat base plus the multiplier scaled by
/// the fraction of round time still remaining, truncated to an integer.
fn guess_reward(
    elapsed: Duration,
    round_duration: Duration,
    base: i32,
    multiplier: i32,
) -> i32 {
    let remaining = if round_duration.is_zero() {
        0.0
    } else {
        (1.0 - elapsed.as_secs_f64() / round_duration.as_secs_f64()).max(0.0)
    };
    base + (f64::from(multiplier) * remaining) as i32
}

fn send_frame(sender: &PlayerSender, frame: &Frame) {
    if let Some(text) = encode(frame) {
        let _ = sender.send(text);
    }
}

fn encode(frame: &Frame) -> Option<String> {
    match JsonCodec.encode(frame) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(error = %e, "dropping unencodable frame");
            None
        }
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

// =========================================================================
// Tests
// =========================================================================
