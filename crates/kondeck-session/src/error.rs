//! Error types for the session layer.

use kondeck_engine::GameError;
use kondeck_protocol::{ClientId, RoomId};

/// Rejections raised while routing a client request.
///
/// Engine-level failures pass through as [`SessionError::Game`]. All
/// variants are request-local: they are reported to the originating client
/// only and never broadcast.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The named room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The room has no free seat.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The client is already a member of a room.
    #[error("client {0} is already in room {1}")]
    AlreadyInRoom(ClientId, RoomId),

    /// The client is not a member of the named room.
    #[error("client {0} is not in room {1}")]
    NotInRoom(ClientId, RoomId),

    /// Joins are closed while a match is running.
    #[error("a match is in progress in room {0}")]
    MatchInProgress(RoomId),

    /// A game action arrived for a room with no running match.
    #[error("no match is running in room {0}")]
    NoMatchInProgress(RoomId),

    /// The `playerId` in the payload is not the sending connection.
    #[error("player id does not match the sending connection")]
    IdentityMismatch,

    /// A rule violation reported by the game engine.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The hub task is gone.
    #[error("session hub is unavailable")]
    Unavailable,
}
