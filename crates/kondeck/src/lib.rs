//! # kondeck
//!
//! Authoritative server for a turn-based bluffing card game with a
//! roulette elimination penalty. Clients connect over WebSocket, gather in
//! rooms, vote ready, and the server runs the whole match: dealing, turn
//! order, bluff verification, and elimination.
//!
//! This crate wires the layers together: transport → protocol → session
//! hub → game engine. The rules live in `kondeck-engine`; the room and
//! match lifecycle in `kondeck-session`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use kondeck::ServerBuilder;
//!
//! # async fn run() -> Result<(), kondeck::ServerError> {
//! let server = ServerBuilder::new().bind("0.0.0.0:8080").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::ServerError;
pub use server::{Server, ServerBuilder};
