//! One deal-to-shoot cycle: dealing, turn progression, plays, and bluff
//! verification.

use kondeck_protocol::{Card, ClientId, Rank};
use rand::Rng;

use crate::deck::{HAND_SIZE, TARGET_RANKS, build_deck, shuffle};
use crate::{GameError, Player};

/// Uniform pick of a round's target rank. Never the joker.
pub fn choose_target_rank() -> Rank {
    TARGET_RANKS[rand::rng().random_range(0..TARGET_RANKS.len())]
}

/// Uniform pick of the first turn among `player_count` seats.
pub fn choose_first_turn(player_count: usize) -> usize {
    rand::rng().random_range(0..player_count)
}

/// Deals `HAND_SIZE` cards to every player by round-robin single-card draws
/// from the back of the deck.
///
/// Fails with [`GameError::InsufficientCards`] — before touching any hand —
/// if the deck cannot cover the full deal. The canonical deck always covers
/// four players, but the contract holds for any roster.
pub fn deal_hands(players: &mut [Player], deck: &mut Vec<Card>) -> Result<(), GameError> {
    let needed = HAND_SIZE * players.len();
    if deck.len() < needed {
        return Err(GameError::InsufficientCards {
            needed,
            available: deck.len(),
        });
    }
    for _ in 0..HAND_SIZE {
        for player in players.iter_mut() {
            let card = deck.pop().expect("deck size checked before dealing");
            player.hand.push(card);
        }
    }
    Ok(())
}

/// Mutable state of one round.
///
/// `turn_index` always indexes the live roster the owning match passes in;
/// the match keeps it valid across eliminations via [`Round::seat_removed`].
#[derive(Debug, Clone)]
pub struct Round {
    /// Draw pile remainder; the back is the top.
    deck: Vec<Card>,
    /// The last play, replaced wholesale on every accepted play.
    table_cards: Vec<Card>,
    target_rank: Rank,
    turn_index: usize,
    /// Set when a hand empties; forbids further plays until the pending
    /// bluff chain resolves through a trigger pull.
    actions_locked: bool,
    last_actor: Option<ClientId>,
}

impl Round {
    /// Builds a dealt round: fresh shuffled deck, full hands, re-rolled
    /// target rank and first turn. Hands must be empty on entry.
    pub fn deal(players: &mut [Player]) -> Result<Self, GameError> {
        if players.is_empty() {
            return Err(GameError::NotEnoughPlayers(crate::MIN_PLAYERS));
        }
        let mut deck = build_deck();
        shuffle(&mut deck);
        deal_hands(players, &mut deck)?;
        Ok(Self {
            deck,
            table_cards: Vec::new(),
            target_rank: choose_target_rank(),
            turn_index: choose_first_turn(players.len()),
            actions_locked: false,
            last_actor: None,
        })
    }

    pub fn target_rank(&self) -> Rank {
        self.target_rank
    }

    pub fn table_cards(&self) -> &[Card] {
        &self.table_cards
    }

    pub fn actions_locked(&self) -> bool {
        self.actions_locked
    }

    pub fn last_actor(&self) -> Option<ClientId> {
        self.last_actor
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    /// The id holding the turn, given the live roster.
    pub fn current_player(&self, players: &[Player]) -> Option<ClientId> {
        players.get(self.turn_index).map(|p| p.id)
    }

    /// Plays `card_ids` from the actor's hand onto the table.
    ///
    /// All ids are validated (with multiplicity) before any card moves, so
    /// a rejection leaves the hand and table untouched. Emptying the hand
    /// locks further plays; the turn then passes to the verifier.
    pub fn play(
        &mut self,
        players: &mut [Player],
        actor: ClientId,
        card_ids: &[String],
    ) -> Result<(), GameError> {
        if self.current_player(players) != Some(actor) {
            return Err(GameError::NotYourTurn);
        }
        if self.actions_locked {
            return Err(GameError::ActionsRestricted);
        }

        let player = &mut players[self.turn_index];

        // Validate every id against a scratch copy of the hand first; a
        // duplicate id must not pass by matching the same card twice.
        let mut unclaimed: Vec<&str> =
            player.hand.iter().map(|c| c.id.as_str()).collect();
        for id in card_ids {
            match unclaimed.iter().position(|held| *held == id.as_str()) {
                Some(pos) => {
                    unclaimed.swap_remove(pos);
                }
                None => return Err(GameError::CardNotInHand(id.clone())),
            }
        }

        let mut played = Vec::with_capacity(card_ids.len());
        for id in card_ids {
            let pos = player
                .hand
                .iter()
                .position(|c| &c.id == id)
                .expect("ids validated against the hand above");
            played.push(player.hand.remove(pos));
        }
        self.table_cards = played;
        self.last_actor = Some(actor);

        if player.hand.is_empty() {
            self.actions_locked = true;
        }

        self.advance_turn(players.len());
        Ok(())
    }

    /// Checks the caller's claim against one card of the last play.
    ///
    /// A joker counts as a match against any target rank. Pure: turn order,
    /// table, and lock state are untouched — the caller decides who draws
    /// from their chamber based on the returned bool.
    pub fn verify(
        &self,
        players: &[Player],
        caller: ClientId,
        claimed_truth: bool,
        card_id: &str,
    ) -> Result<bool, GameError> {
        if self.current_player(players) != Some(caller) {
            return Err(GameError::NotYourTurn);
        }
        if self.table_cards.is_empty() {
            return Err(GameError::NothingToVerify);
        }
        let card = self
            .table_cards
            .iter()
            .find(|c| c.id == card_id)
            .ok_or_else(|| GameError::CardNotOnTable(card_id.to_string()))?;

        let actual_match =
            card.rank == self.target_rank || card.rank == Rank::Joker;
        Ok(claimed_truth == actual_match)
    }

    /// Wraps the turn to the next live seat.
    pub fn advance_turn(&mut self, live_count: usize) {
        self.turn_index = (self.turn_index + 1) % live_count;
    }

    /// Stages a known target/turn/table for deterministic tests.
    #[cfg(test)]
    pub(crate) fn stage(&mut self, target: Rank, turn_index: usize, table: Vec<Card>) {
        self.target_rank = target;
        self.turn_index = turn_index;
        self.table_cards = table;
    }

    /// Ids still in the draw pile. Test-only.
    #[cfg(test)]
    pub(crate) fn deck_ids(&self) -> Vec<String> {
        self.deck.iter().map(|c| c.id.clone()).collect()
    }

    /// Re-anchors the turn pointer after the seat at `removed_idx` left a
    /// roster that now holds `remaining` players. If the leaver held the
    /// turn, it passes to the next live player (same index, post-removal).
    pub fn seat_removed(&mut self, removed_idx: usize, remaining: usize) {
        if remaining == 0 {
            self.turn_index = 0;
            return;
        }
        if removed_idx < self.turn_index {
            self.turn_index -= 1;
        }
        self.turn_index %= remaining;
    }
}
