//! Game engine for kondeck: the authoritative rules of a liar's-card round
//! with a roulette elimination penalty.
//!
//! # Key types
//!
//! - [`Game`] — one match: roster, elimination tracking, round-to-round
//!   reset, game-over detection
//! - [`Round`] — one deal-to-shoot cycle: deck remainder, table, target
//!   rank, turn pointer, play/verify legality
//! - [`Chamber`] — a player's six elimination draws, exactly one of them
//!   lethal per life
//! - [`GameError`] — request-local validation failures; every operation
//!   fails fast and leaves state untouched
//!
//! The engine is synchronous and knows nothing about rooms or sockets. The
//! session hub owns a `Game` per room and drives it one event at a time.

mod chamber;
mod deck;
mod error;
mod game;
mod player;
mod round;

pub use chamber::{CHAMBER_SIZE, Chamber};
pub use deck::{
    DECK_SIZE, HAND_SIZE, MAX_PLAYERS, MIN_PLAYERS, TARGET_RANKS, build_deck,
    shuffle,
};
pub use error::GameError;
pub use game::{Game, ShootOutcome};
pub use player::Player;
pub use round::{Round, choose_first_turn, choose_target_rank, deal_hands};
