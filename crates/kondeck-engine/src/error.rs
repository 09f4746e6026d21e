//! Error types for the game engine.

use kondeck_protocol::ClientId;

/// Validation failures raised by round and match operations.
///
/// All of these are request-local: they reject a single malformed or
/// out-of-turn action and never represent engine corruption. Operations
/// that return one of these are guaranteed not to have mutated any state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The actor is not the current turn holder.
    #[error("it is not your turn")]
    NotYourTurn,

    /// Plays are locked until the pending bluff chain resolves through a
    /// trigger pull.
    #[error("actions are restricted until the trigger is pulled")]
    ActionsRestricted,

    /// A played card id is not in the actor's hand.
    #[error("card {0} is not in your hand")]
    CardNotInHand(String),

    /// The referenced card is not among the cards on the table.
    #[error("card {0} is not on the table")]
    CardNotOnTable(String),

    /// There is no play on the table to verify.
    #[error("no cards on the table to verify")]
    NothingToVerify,

    /// More players than a match supports.
    #[error("a match holds at most {0} players")]
    RoomFull(usize),

    /// Fewer players than a match needs.
    #[error("a match needs at least {0} players")]
    NotEnoughPlayers(usize),

    /// The player is not part of the live roster.
    #[error("player {0} not found")]
    PlayerNotFound(ClientId),

    /// The deck cannot cover a full deal for this roster.
    #[error("not enough cards to deal: need {needed}, deck holds {available}")]
    InsufficientCards { needed: usize, available: usize },

    /// A chamber may be armed only once per life.
    #[error("chamber is already loaded")]
    ChamberAlreadyLoaded,

    /// The chamber has no draws left; the player cannot shoot.
    #[error("chamber is exhausted")]
    ChamberExhausted,
}
