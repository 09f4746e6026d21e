//! The event surface: every message a client can send and every message the
//! server pushes back.
//!
//! Both enums are adjacently tagged — `{"event": "playCards", "data": {...}}`
//! — which matches how the browser client names its messages. Each event
//! carries an explicit payload struct; there are no free-form maps, so a
//! request is either fully valid after decoding or never reaches the hub.

use serde::{Deserialize, Serialize};

use crate::types::{
    Card, ClientId, GameStatePayload, MemberInfo, RoomId, RoomSummary,
};

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Requests a client may send. `playerId` fields are cross-checked against
/// the sending connection's identity by the hub — they exist on the wire for
/// client-side symmetry, not as a source of trust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinRoom(JoinRoomRequest),
    LeaveRoom(LeaveRoomRequest),
    SendMessage(SendMessageRequest),
    GetRooms,
    ToggleReady(ToggleReadyRequest),
    QuickGame,
    PlayCards(PlayCardsRequest),
    VerifyPlayedCards(VerifyRequest),
    PullTheTrigger(TriggerRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub room_name: RoomId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRoomRequest {
    pub room_name: RoomId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub room_name: RoomId,
    pub message: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReadyRequest {
    pub room_name: RoomId,
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCardsRequest {
    pub room_name: RoomId,
    pub player_id: ClientId,
    pub cards: Vec<Card>,
}

/// `action` is the caller's claim: `true` = "the shown card is truthful"
/// (matches the target rank), `false` = "it's a bluff".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub room_name: RoomId,
    pub player_id: ClientId,
    pub action: bool,
    pub card_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRequest {
    pub room_name: RoomId,
    pub player_id: ClientId,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Pushes the server emits. Some are addressed to one client (`userInfo`,
/// `hand`, `error`), the rest are room broadcasts; `availableRooms` goes to
/// every connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    UserInfo(UserInfoPayload),
    RoomJoined(RoomJoinedPayload),
    RoomLeft(RoomLeftPayload),
    Debug(DebugPayload),
    Message(ChatPayload),
    AvailableRooms(Vec<RoomSummary>),
    PlayerStatus(PlayerStatusPayload),
    Timer(NoticePayload),
    AbortTimer(NoticePayload),
    GameReady(NoticePayload),
    GameState(GameStatePayload),
    Hand(Vec<Card>),
    VerifyResults(VerifyResultsPayload),
    ActionStatus(ActionStatusPayload),
    ShootResult(ShootResultPayload),
    NewRound,
    GameOver(GameOverPayload),
    Error(ErrorPayload),
}

/// Sent to a client right after it joins a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoPayload {
    pub room_name: RoomId,
    pub id: ClientId,
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomJoinedPayload {
    pub room_name: RoomId,
    pub message: String,
    pub clients: Vec<MemberInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLeftPayload {
    pub clients: Vec<MemberInfo>,
}

/// Diagnostic broadcast mirroring the room roster after a join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugPayload {
    pub room_name: RoomId,
    pub client: ClientId,
    pub clients: Vec<MemberInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub sender: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatusPayload {
    pub user_id: ClientId,
    pub ready: bool,
}

/// Human-readable notice attached to `timer`/`abortTimer`/`gameReady`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticePayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResultsPayload {
    pub result: bool,
}

/// Names the player who must now draw from their chamber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStatusPayload {
    pub user_id: ClientId,
    pub have_to_shoot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShootResultPayload {
    pub survived: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverPayload {
    pub game_over: bool,
}

/// Request-local rejection. Never broadcast; addressed only to the client
/// whose request failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

// =========================================================================
// Tests
// =========================================================================
