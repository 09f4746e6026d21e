//! The session hub: one actor owning every room.
//!
//! The hub runs in its own Tokio task and communicates with the outside
//! world through an mpsc command channel. Connection handlers register a
//! per-client outbound sender, then feed decoded client events in; the hub
//! routes session-scoped events itself and delegates game-scoped events to
//! the room's match engine, pushing resulting state back through the
//! registered senders.
//!
//! One mailbox serializes everything: each command is handled to completion
//! before the next, so no two operations interleave mid-mutation on any
//! room. Deferred work (start countdown, teardown grace) re-enters the hub
//! as a command carrying a generation number; a fire that no longer matches
//! the room's pending generation is stale and dropped.

use std::collections::HashMap;

use kondeck_engine::Game;
use kondeck_protocol::{
    ActionStatusPayload, ChatPayload, ClientEvent, ClientId, DebugPayload,
    ErrorPayload, GameOverPayload, NoticePayload, PlayCardsRequest,
    PlayerStatusPayload, RoomId, RoomJoinedPayload, RoomLeftPayload,
    RoomSummary, SendMessageRequest, ServerEvent, ShootResultPayload,
    ToggleReadyRequest, TriggerRequest, UserInfoPayload, VerifyRequest,
    VerifyResultsPayload,
};
use kondeck_timer::Deferred;
use tokio::sync::mpsc;

use crate::room::{PendingTimer, Room};
use crate::{HubConfig, SessionError};

/// Channel sender for delivering server events to one client's connection
/// handler.
pub type ClientSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to the hub actor through its channel.
pub(crate) enum HubCommand {
    /// A connection came up: register its outbound sender.
    Register {
        client: ClientId,
        sender: ClientSender,
    },

    /// A connection went away. Equivalent to leaving whatever room the
    /// client was in.
    Disconnect { client: ClientId },

    /// A decoded client request.
    Request {
        client: ClientId,
        event: ClientEvent,
    },

    /// A start countdown elapsed.
    StartTimerFired { room: RoomId, generation: u64 },

    /// A teardown grace period elapsed.
    TeardownTimerFired { room: RoomId, generation: u64 },

    /// Stop the hub.
    Shutdown,
}

/// Handle to the running hub actor. Cheap to clone.
#[derive(Clone)]
pub struct HubHandle {
    sender: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Registers a client's outbound event channel.
    pub async fn register(
        &self,
        client: ClientId,
        sender: ClientSender,
    ) -> Result<(), SessionError> {
        self.sender
            .send(HubCommand::Register { client, sender })
            .await
            .map_err(|_| SessionError::Unavailable)
    }

    /// Reports a closed connection; the hub treats it as a leave.
    pub async fn disconnect(&self, client: ClientId) -> Result<(), SessionError> {
        self.sender
            .send(HubCommand::Disconnect { client })
            .await
            .map_err(|_| SessionError::Unavailable)
    }

    /// Feeds one decoded client request into the hub.
    pub async fn request(
        &self,
        client: ClientId,
        event: ClientEvent,
    ) -> Result<(), SessionError> {
        self.sender
            .send(HubCommand::Request { client, event })
            .await
            .map_err(|_| SessionError::Unavailable)
    }

    /// Stops the hub actor.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.sender
            .send(HubCommand::Shutdown)
            .await
            .map_err(|_| SessionError::Unavailable)
    }
}

/// Spawns the hub actor task and returns a handle to it.
pub fn spawn_hub(config: HubConfig) -> HubHandle {
    let config = config.validated();
    let (tx, rx) = mpsc::channel(config.channel_size);

    let actor = HubActor {
        config,
        rooms: HashMap::new(),
        room_order: Vec::new(),
        clients: HashMap::new(),
        client_rooms: HashMap::new(),
        rooms_created: 0,
        generations: 0,
        sender: tx.clone(),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    HubHandle { sender: tx }
}

/// The hub actor state. Lives inside one Tokio task.
struct HubActor {
    config: HubConfig,
    /// Every live room, keyed by name.
    rooms: HashMap<RoomId, Room>,
    /// Room names in creation order — the stable scan order for
    /// matchmaking.
    room_order: Vec<RoomId>,
    /// Outbound channel per connected client.
    clients: HashMap<ClientId, ClientSender>,
    /// Which room each client is in. A client is in at most one room.
    client_rooms: HashMap<ClientId, RoomId>,
    /// Monotonic counter naming matchmade rooms (`room0`, `room1`, ...).
    rooms_created: u64,
    /// Hub-wide source of deferral generations. One counter for every room
    /// so a room destroyed and re-created under the same name can never
    /// match a stale fire from its previous incarnation.
    generations: u64,
    /// Clone handed to deferrals so fires re-enter the mailbox.
    sender: mpsc::Sender<HubCommand>,
    receiver: mpsc::Receiver<HubCommand>,
}

impl HubActor {
    async fn run(mut self) {
        tracing::info!("session hub started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                HubCommand::Register { client, sender } => {
                    self.clients.insert(client, sender);
                    tracing::debug!(client = %client, "client registered");
                }
                HubCommand::Disconnect { client } => {
                    self.handle_disconnect(client);
                }
                HubCommand::Request { client, event } => {
                    if let Err(e) = self.handle_request(client, event) {
                        tracing::debug!(
                            client = %client,
                            error = %e,
                            "request rejected"
                        );
                        self.push(
                            client,
                            ServerEvent::Error(ErrorPayload {
                                message: e.to_string(),
                            }),
                        );
                    }
                }
                HubCommand::StartTimerFired { room, generation } => {
                    self.handle_start_fired(room, generation);
                }
                HubCommand::TeardownTimerFired { room, generation } => {
                    self.handle_teardown_fired(room, generation);
                }
                HubCommand::Shutdown => {
                    tracing::info!("session hub shutting down");
                    break;
                }
            }
        }

        tracing::info!("session hub stopped");
    }

    fn handle_request(
        &mut self,
        client: ClientId,
        event: ClientEvent,
    ) -> Result<(), SessionError> {
        match event {
            ClientEvent::JoinRoom(req) => self.join_room(client, req.room_name),
            ClientEvent::LeaveRoom(req) => {
                self.leave_room(client, req.room_name)
            }
            ClientEvent::SendMessage(req) => self.send_message(client, req),
            ClientEvent::GetRooms => {
                self.get_rooms();
                Ok(())
            }
            ClientEvent::ToggleReady(req) => self.toggle_ready(client, req),
            ClientEvent::QuickGame => self.quick_game(client),
            ClientEvent::PlayCards(req) => self.play_cards(client, req),
            ClientEvent::VerifyPlayedCards(req) => self.verify(client, req),
            ClientEvent::PullTheTrigger(req) => self.pull_trigger(client, req),
        }
    }

    // -- Membership --------------------------------------------------------

    /// Adds the client to the named room, creating the room on first join.
    fn join_room(
        &mut self,
        client: ClientId,
        room_name: RoomId,
    ) -> Result<(), SessionError> {
        if let Some(existing) = self.client_rooms.get(&client) {
            return Err(SessionError::AlreadyInRoom(client, existing.clone()));
        }

        if !self.rooms.contains_key(&room_name) {
            self.create_room(room_name.clone());
        }
        let room = self
            .rooms
            .get_mut(&room_name)
            .expect("room ensured above");

        if room.game.is_some() {
            return Err(SessionError::MatchInProgress(room_name));
        }
        if room.member_count() >= self.config.max_members {
            return Err(SessionError::RoomFull(room_name));
        }

        room.add_member(client);
        let infos = room.member_infos();
        let members = room.member_ids();
        self.client_rooms.insert(client, room_name.clone());
        tracing::info!(
            room = %room_name,
            client = %client,
            members = members.len(),
            "client joined room"
        );

        self.push(
            client,
            ServerEvent::UserInfo(UserInfoPayload {
                room_name: room_name.clone(),
                id: client,
                ready: false,
            }),
        );
        self.send_to_many(
            &members,
            ServerEvent::RoomJoined(RoomJoinedPayload {
                room_name: room_name.clone(),
                message: format!("{client} joined {room_name}"),
                clients: infos.clone(),
            }),
        );
        self.send_to_many(
            &members,
            ServerEvent::Debug(DebugPayload {
                room_name,
                client,
                clients: infos,
            }),
        );
        Ok(())
    }

    fn leave_room(
        &mut self,
        client: ClientId,
        room_name: RoomId,
    ) -> Result<(), SessionError> {
        let room = self
            .rooms
            .get_mut(&room_name)
            .ok_or_else(|| SessionError::RoomNotFound(room_name.clone()))?;
        if !room.is_member(client) {
            return Err(SessionError::NotInRoom(client, room_name));
        }

        // A departing player forfeits immediately; the match roster
        // degrades before the room membership does. Only the removal that
        // ends the match announces it.
        let mut match_over = false;
        if let Some(game) = room.game.as_mut() {
            if game.contains(client) {
                let was_over = game.is_over();
                let _ = game.remove_player(client);
                match_over = !was_over && game.is_over();
            }
        }

        room.remove_member(client);
        self.client_rooms.remove(&client);

        // The roster changed; a pending start countdown is void.
        let aborted = match room.pending_start.take() {
            Some(pending) => {
                pending.deferred.cancel();
                true
            }
            None => false,
        };

        let infos = room.member_infos();
        let members = room.member_ids();
        let empty = room.is_empty();
        tracing::info!(
            room = %room_name,
            client = %client,
            members = members.len(),
            "client left room"
        );

        self.send_to_many(
            &members,
            ServerEvent::RoomLeft(RoomLeftPayload { clients: infos }),
        );
        if aborted && !empty {
            self.send_to_many(
                &members,
                ServerEvent::AbortTimer(NoticePayload {
                    message: "start countdown cancelled".into(),
                }),
            );
        }
        if match_over && !empty {
            self.send_to_many(
                &members,
                ServerEvent::GameOver(GameOverPayload { game_over: true }),
            );
            self.schedule_teardown(&room_name);
        }
        if empty {
            self.destroy_room(&room_name);
        }
        Ok(())
    }

    /// Disconnect maps to a leave of whatever room the client was in.
    fn handle_disconnect(&mut self, client: ClientId) {
        if let Some(room_name) = self.client_rooms.get(&client).cloned() {
            let _ = self.leave_room(client, room_name);
        }
        self.clients.remove(&client);
        tracing::debug!(client = %client, "client deregistered");
    }

    // -- Lobby -------------------------------------------------------------

    fn send_message(
        &mut self,
        client: ClientId,
        req: SendMessageRequest,
    ) -> Result<(), SessionError> {
        let room = self
            .rooms
            .get(&req.room_name)
            .ok_or_else(|| SessionError::RoomNotFound(req.room_name.clone()))?;
        if !room.is_member(client) {
            return Err(SessionError::NotInRoom(client, req.room_name));
        }

        let members = room.member_ids();
        self.send_to_many(
            &members,
            ServerEvent::Message(ChatPayload {
                sender: req.username,
                message: req.message,
            }),
        );
        Ok(())
    }

    fn get_rooms(&self) {
        let rooms: Vec<RoomSummary> = self
            .room_order
            .iter()
            .filter_map(|name| self.rooms.get(name))
            .map(|room| RoomSummary {
                room_name: room.name.clone(),
                has_password: room.has_password(),
            })
            .collect();
        self.broadcast_all(ServerEvent::AvailableRooms(rooms));
    }

    /// Places the client in the first room with a free seat, no running
    /// match, and no pending start countdown — or a fresh room if none
    /// qualifies. Capacity is re-validated by the join itself.
    fn quick_game(&mut self, client: ClientId) -> Result<(), SessionError> {
        if let Some(existing) = self.client_rooms.get(&client) {
            return Err(SessionError::AlreadyInRoom(client, existing.clone()));
        }

        let target = self
            .room_order
            .iter()
            .find(|name| {
                self.rooms.get(*name).is_some_and(|room| {
                    room.member_count() < self.config.max_members
                        && room.game.is_none()
                        && room.pending_start.is_none()
                })
            })
            .cloned();

        let room_name = match target {
            Some(name) => name,
            None => self.fresh_room_name(),
        };
        tracing::debug!(client = %client, room = %room_name, "quick join");
        self.join_room(client, room_name)
    }

    // -- Readiness ---------------------------------------------------------

    fn toggle_ready(
        &mut self,
        client: ClientId,
        req: ToggleReadyRequest,
    ) -> Result<(), SessionError> {
        let room_name = req.room_name;
        let room = self
            .rooms
            .get_mut(&room_name)
            .ok_or_else(|| SessionError::RoomNotFound(room_name.clone()))?;
        if !room.set_ready(client, req.ready) {
            return Err(SessionError::NotInRoom(client, room_name));
        }

        let members = room.member_ids();
        let all_ready = room.all_ready();
        let has_game = room.game.is_some();
        let had_pending = room.pending_start.is_some();

        self.send_to_many(
            &members,
            ServerEvent::PlayerStatus(PlayerStatusPayload {
                user_id: client,
                ready: req.ready,
            }),
        );

        if all_ready && !has_game {
            // Re-arming while a countdown is pending supersedes it; at most
            // one start timer exists per room.
            self.schedule_start(&room_name);
            self.send_to_room(
                &room_name,
                ServerEvent::Timer(NoticePayload {
                    message: format!(
                        "all ready — match starts in {}s",
                        self.config.start_delay.as_secs()
                    ),
                }),
            );
        } else if !all_ready && had_pending {
            if let Some(room) = self.rooms.get_mut(&room_name) {
                if let Some(pending) = room.pending_start.take() {
                    pending.deferred.cancel();
                }
            }
            self.send_to_room(
                &room_name,
                ServerEvent::AbortTimer(NoticePayload {
                    message: "start countdown cancelled".into(),
                }),
            );
        }
        Ok(())
    }

    fn handle_start_fired(&mut self, room_name: RoomId, generation: u64) {
        let Some(room) = self.rooms.get_mut(&room_name) else {
            return;
        };
        match &room.pending_start {
            Some(pending) if pending.matches(generation) => {}
            _ => {
                tracing::trace!(room = %room_name, "stale start fire ignored");
                return;
            }
        }
        room.pending_start = None;

        // Re-validate: the debounce exists precisely so a roster or
        // readiness change in the window wins over the countdown.
        if !room.all_ready() || room.game.is_some() {
            return;
        }

        let ids = room.member_ids();
        match Game::start(room_name.clone(), &ids) {
            Ok(game) => room.game = Some(game),
            Err(e) => {
                tracing::warn!(room = %room_name, error = %e, "match start failed");
                return;
            }
        }

        self.send_to_many(
            &ids,
            ServerEvent::GameReady(NoticePayload {
                message: "All players are ready!".into(),
            }),
        );
        self.push_game_state(&room_name);
    }

    // -- Game actions ------------------------------------------------------

    fn play_cards(
        &mut self,
        client: ClientId,
        req: PlayCardsRequest,
    ) -> Result<(), SessionError> {
        if req.player_id != client {
            return Err(SessionError::IdentityMismatch);
        }
        let card_ids: Vec<String> =
            req.cards.iter().map(|c| c.id.clone()).collect();

        {
            let room = self.rooms.get_mut(&req.room_name).ok_or_else(|| {
                SessionError::RoomNotFound(req.room_name.clone())
            })?;
            let game = room.game.as_mut().ok_or_else(|| {
                SessionError::NoMatchInProgress(req.room_name.clone())
            })?;
            game.play_cards(client, &card_ids)?;
        }

        self.push_game_state(&req.room_name);
        Ok(())
    }

    fn verify(
        &mut self,
        client: ClientId,
        req: VerifyRequest,
    ) -> Result<(), SessionError> {
        if req.player_id != client {
            return Err(SessionError::IdentityMismatch);
        }
        let room = self
            .rooms
            .get(&req.room_name)
            .ok_or_else(|| SessionError::RoomNotFound(req.room_name.clone()))?;
        let game = room.game.as_ref().ok_or_else(|| {
            SessionError::NoMatchInProgress(req.room_name.clone())
        })?;

        let result = game.verify(client, req.action, &req.card_id)?;
        // Correct call: the player who made the play draws. Wrong call: the
        // caller drew wrong and draws themselves.
        let shooter = if result {
            game.previous_player().unwrap_or(client)
        } else {
            client
        };

        let members = room.member_ids();
        self.send_to_many(
            &members,
            ServerEvent::VerifyResults(VerifyResultsPayload { result }),
        );
        self.send_to_many(
            &members,
            ServerEvent::ActionStatus(ActionStatusPayload {
                user_id: shooter,
                have_to_shoot: true,
            }),
        );
        Ok(())
    }

    fn pull_trigger(
        &mut self,
        client: ClientId,
        req: TriggerRequest,
    ) -> Result<(), SessionError> {
        if req.player_id != client {
            return Err(SessionError::IdentityMismatch);
        }

        let (outcome, over, members) = {
            let room = self.rooms.get_mut(&req.room_name).ok_or_else(|| {
                SessionError::RoomNotFound(req.room_name.clone())
            })?;
            let game = room.game.as_mut().ok_or_else(|| {
                SessionError::NoMatchInProgress(req.room_name.clone())
            })?;
            let outcome = game.pull_trigger(client)?;
            (outcome, game.is_over(), room.member_ids())
        };

        self.send_to_many(
            &members,
            ServerEvent::ShootResult(ShootResultPayload {
                survived: outcome.survived,
            }),
        );

        if over {
            self.send_to_many(
                &members,
                ServerEvent::GameOver(GameOverPayload { game_over: true }),
            );
            self.schedule_teardown(&req.room_name);
        } else {
            self.send_to_many(&members, ServerEvent::NewRound);
            self.push_game_state(&req.room_name);
        }
        Ok(())
    }

    // -- Timers ------------------------------------------------------------

    fn schedule_start(&mut self, room_name: &RoomId) {
        if !self.rooms.contains_key(room_name) {
            return;
        }
        self.generations += 1;
        let generation = self.generations;
        let sender = self.sender.clone();
        let name = room_name.clone();
        let deferred = Deferred::spawn(self.config.start_delay, async move {
            let _ = sender
                .send(HubCommand::StartTimerFired {
                    room: name,
                    generation,
                })
                .await;
        });
        let room = self.rooms.get_mut(room_name).expect("presence checked above");
        room.pending_start = Some(PendingTimer {
            deferred,
            generation,
        });
        tracing::debug!(room = %room_name, generation, "start countdown armed");
    }

    fn schedule_teardown(&mut self, room_name: &RoomId) {
        if !self.rooms.contains_key(room_name) {
            return;
        }
        self.generations += 1;
        let generation = self.generations;
        let sender = self.sender.clone();
        let name = room_name.clone();
        let deferred =
            Deferred::spawn(self.config.teardown_delay, async move {
                let _ = sender
                    .send(HubCommand::TeardownTimerFired {
                        room: name,
                        generation,
                    })
                    .await;
            });
        let room = self.rooms.get_mut(room_name).expect("presence checked above");
        room.pending_teardown = Some(PendingTimer {
            deferred,
            generation,
        });
        tracing::debug!(room = %room_name, generation, "teardown scheduled");
    }

    fn handle_teardown_fired(&mut self, room_name: RoomId, generation: u64) {
        let Some(room) = self.rooms.get_mut(&room_name) else {
            return;
        };
        match &room.pending_teardown {
            Some(pending) if pending.matches(generation) => {}
            _ => {
                tracing::trace!(room = %room_name, "stale teardown fire ignored");
                return;
            }
        }
        room.pending_teardown = None;
        room.game = None;
        // A rematch takes a fresh readiness vote.
        room.reset_ready();
        tracing::info!(room = %room_name, "match removed after grace period");
    }

    // -- Registry ----------------------------------------------------------

    fn create_room(&mut self, name: RoomId) {
        tracing::info!(room = %name, "room created");
        self.room_order.push(name.clone());
        self.rooms.insert(name.clone(), Room::new(name));
    }

    fn destroy_room(&mut self, name: &RoomId) {
        // Dropping the room drops its deferrals, aborting any pending
        // start or teardown for this name.
        self.rooms.remove(name);
        self.room_order.retain(|n| n != name);
        tracing::info!(room = %name, "room destroyed");
    }

    fn fresh_room_name(&mut self) -> RoomId {
        loop {
            let name = RoomId::new(format!("room{}", self.rooms_created));
            self.rooms_created += 1;
            if !self.rooms.contains_key(&name) {
                return name;
            }
        }
    }

    // -- Outbound ----------------------------------------------------------

    /// Sends to a single client. Silently drops if the receiver is gone.
    fn push(&self, client: ClientId, event: ServerEvent) {
        if let Some(sender) = self.clients.get(&client) {
            let _ = sender.send(event);
        }
    }

    fn send_to_many(&self, clients: &[ClientId], event: ServerEvent) {
        for client in clients {
            self.push(*client, event.clone());
        }
    }

    fn send_to_room(&self, room_name: &RoomId, event: ServerEvent) {
        if let Some(room) = self.rooms.get(room_name) {
            self.send_to_many(&room.member_ids(), event);
        }
    }

    fn broadcast_all(&self, event: ServerEvent) {
        for sender in self.clients.values() {
            let _ = sender.send(event.clone());
        }
    }

    /// Pushes the room-wide snapshot plus each live player's private hand.
    fn push_game_state(&self, room_name: &RoomId) {
        let Some(room) = self.rooms.get(room_name) else {
            return;
        };
        let Some(game) = room.game.as_ref() else {
            return;
        };

        for member in room.members() {
            if let Ok(hand) = game.hand(member.id) {
                self.push(member.id, ServerEvent::Hand(hand.to_vec()));
            }
        }
        self.send_to_room(room_name, ServerEvent::GameState(game.state()));
    }
}
