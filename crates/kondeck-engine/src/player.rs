//! A seated player: identity, hand, and elimination chamber.

use kondeck_protocol::{Card, ClientId, PlayerSummary};

use crate::Chamber;

/// One live roster entry. The hand is ordered (cards are played by id, in
/// the order the actor names them); the chamber persists across rounds
/// within a life.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: ClientId,
    pub name: Option<String>,
    pub hand: Vec<Card>,
    pub chamber: Chamber,
}

impl Player {
    /// Seats a player with an empty hand and a freshly armed chamber.
    pub fn new(id: ClientId) -> Self {
        Self {
            id,
            name: None,
            hand: Vec::new(),
            chamber: Chamber::loaded(),
        }
    }

    /// The public view: hand size only, never the cards.
    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            id: self.id,
            name: self.name.clone(),
            cards_in_hand: self.hand.len(),
        }
    }
}
