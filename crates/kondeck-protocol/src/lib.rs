//! Wire protocol for kondeck.
//!
//! Defines the "language" clients and the server speak:
//!
//! - **Types** ([`Card`], [`Rank`], [`ClientId`], [`RoomId`], payload
//!   structs) — the values that travel on the wire.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — the tagged request and
//!   response surface, one explicit payload struct per event.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are converted
//!   to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! The protocol layer sits between transport (raw frames) and the session
//! hub (rooms, matches). It knows nothing about connections or game rules —
//! only shapes. Every payload is validated at this boundary by construction:
//! a frame either deserializes into one of the explicit event structs or is
//! rejected with a decode error.

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{
    ActionStatusPayload, ChatPayload, ClientEvent, DebugPayload,
    ErrorPayload, GameOverPayload, JoinRoomRequest, LeaveRoomRequest,
    NoticePayload, PlayCardsRequest, PlayerStatusPayload, RoomJoinedPayload,
    RoomLeftPayload, SendMessageRequest, ServerEvent, ShootResultPayload,
    ToggleReadyRequest, TriggerRequest, UserInfoPayload, VerifyRequest,
    VerifyResultsPayload,
};
pub use types::{
    Card, ClientId, GameStatePayload, MemberInfo, PlayerSummary, Rank,
    RoomId, RoomSummary,
};
