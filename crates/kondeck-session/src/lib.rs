//! Session orchestration for kondeck.
//!
//! One hub actor owns every room: membership, readiness voting with a
//! debounced start countdown, quick-join matchmaking, and the lifecycle of
//! the match engine instances the rooms own.
//!
//! # Key types
//!
//! - [`HubHandle`] — send client registrations, disconnects, and requests
//!   to the running hub
//! - [`spawn_hub`] — start the hub actor task
//! - [`HubConfig`] — member cap, start/teardown delays
//! - [`SessionError`] — room-level rejections (game-level ones pass through
//!   from the engine)
//!
//! Every command is handled to completion before the next one, so no two
//! operations ever interleave mid-mutation on the same room — the
//! concurrency contract the rest of the system leans on.

mod config;
mod error;
mod hub;
mod room;

pub use config::HubConfig;
pub use error::SessionError;
pub use hub::{ClientSender, HubHandle, spawn_hub};
