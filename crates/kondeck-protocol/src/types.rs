//! Core wire values: identities, cards, and shared payload structs.
//!
//! Everything here is a plain serializable value. Payload field names are
//! part of the wire contract and use camelCase (`konCard`, `cardsInHand`),
//! so each struct pins them down with serde attributes rather than leaving
//! the shape to convention.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected client.
///
/// Assigned by the server when a connection is accepted; clients never pick
/// their own. Serializes as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c-{}", self.0)
    }
}

/// A room name. Rooms are addressed by name on the wire (`roomName`), so
/// the identifier is a string rather than a numeric handle.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// A card rank. The joker is a wild rank: it counts as a match against any
/// target rank, and is never itself a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    J,
    Q,
    K,
    A,
    #[serde(rename = "JOKER")]
    Joker,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::J => "J",
            Rank::Q => "Q",
            Rank::K => "K",
            Rank::A => "A",
            Rank::Joker => "JOKER",
        };
        f.write_str(s)
    }
}

/// An immutable card value. The `id` is unique within the deck (`"Q-3"`,
/// `"JOKER-1"`) and is what clients reference when playing or verifying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub rank: Rank,
}

impl Card {
    pub fn new(id: impl Into<String>, rank: Rank) -> Self {
        Self {
            id: id.into(),
            rank,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared payload structs
// ---------------------------------------------------------------------------

/// A room member and their ready flag, as sent in `roomJoined`/`roomLeft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub id: ClientId,
    pub ready: bool,
}

/// One room in the `availableRooms` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_name: RoomId,
    pub has_password: bool,
}

/// The public view of a player inside `gameState` — hand size only, never
/// the cards themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: ClientId,
    pub name: Option<String>,
    pub cards_in_hand: usize,
}

/// The room-wide `gameState` snapshot pushed after every accepted action.
///
/// Private hands are deliberately absent; they travel in per-client `hand`
/// events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatePayload {
    pub players: Vec<PlayerSummary>,
    pub kon_card: Rank,
    pub current_player_id: Option<ClientId>,
    pub table_cards: Vec<Card>,
    pub is_all_actions: bool,
    pub previous_player: Option<ClientId>,
}

// =========================================================================
// Tests
// =========================================================================
