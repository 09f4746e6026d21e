//! The match engine: a roster of players playing rounds until one survivor
//! remains.

use std::collections::HashSet;

use kondeck_protocol::{Card, ClientId, GameStatePayload, RoomId};

use crate::deck::{MAX_PLAYERS, MIN_PLAYERS};
use crate::{GameError, Player, Round};

/// Result of one trigger pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShootOutcome {
    /// The drawn slot was empty.
    pub survived: bool,
    /// The drawn slot was live; the shooter left the roster.
    pub eliminated: bool,
}

/// One match: the live roster, elimination tracking, and the current round.
///
/// Owns exactly one round at a time; every trigger pull that doesn't end
/// the match replaces it wholesale (hands cleared, deck rebuilt, target and
/// first player re-rolled).
#[derive(Debug, Clone)]
pub struct Game {
    room: RoomId,
    /// Live roster only; eliminated and departed players are removed.
    players: Vec<Player>,
    eliminated: HashSet<ClientId>,
    round: Round,
    round_id: u64,
    over: bool,
}

impl Game {
    /// Seats the given players, arms their chambers, and deals the first
    /// round. Rejects rosters outside `2..=4`.
    pub fn start(room: RoomId, ids: &[ClientId]) -> Result<Self, GameError> {
        if ids.len() > MAX_PLAYERS {
            return Err(GameError::RoomFull(MAX_PLAYERS));
        }
        if ids.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers(MIN_PLAYERS));
        }

        let mut players: Vec<Player> =
            ids.iter().map(|&id| Player::new(id)).collect();
        let round = Round::deal(&mut players)?;

        tracing::info!(room = %room, players = players.len(), "match started");

        Ok(Self {
            room,
            players,
            eliminated: HashSet::new(),
            round,
            round_id: 1,
            over: false,
        })
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    /// Players eliminated by a chamber draw (departures are not recorded
    /// here).
    pub fn eliminated(&self) -> &HashSet<ClientId> {
        &self.eliminated
    }

    pub fn current_turn_player(&self) -> Option<ClientId> {
        self.round.current_player(&self.players)
    }

    /// Who last played — the player on the hook if a verify call lands.
    pub fn previous_player(&self) -> Option<ClientId> {
        self.round.last_actor()
    }

    /// The private hand of a live player.
    pub fn hand(&self, id: ClientId) -> Result<&[Card], GameError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.hand.as_slice())
            .ok_or(GameError::PlayerNotFound(id))
    }

    /// The room-wide snapshot pushed after every accepted action.
    pub fn state(&self) -> GameStatePayload {
        GameStatePayload {
            players: self.players.iter().map(Player::summary).collect(),
            kon_card: self.round.target_rank(),
            current_player_id: self.current_turn_player(),
            table_cards: self.round.table_cards().to_vec(),
            is_all_actions: !self.round.actions_locked(),
            previous_player: self.previous_player(),
        }
    }

    /// Delegates a play to the current round over the live roster.
    pub fn play_cards(
        &mut self,
        actor: ClientId,
        card_ids: &[String],
    ) -> Result<(), GameError> {
        if self.over {
            return Err(GameError::ActionsRestricted);
        }
        self.round.play(&mut self.players, actor, card_ids)
    }

    /// Delegates a verify call to the current round. Pure — the session
    /// layer uses the result to name who must shoot.
    pub fn verify(
        &self,
        caller: ClientId,
        claimed_truth: bool,
        card_id: &str,
    ) -> Result<bool, GameError> {
        self.round.verify(&self.players, caller, claimed_truth, card_id)
    }

    /// Draws the shooter's next chamber slot.
    ///
    /// A live slot eliminates the shooter; with one player left the match
    /// is over. Every pull that doesn't end the match starts a brand-new
    /// round, so the action lock never outlives the chain that set it.
    pub fn pull_trigger(
        &mut self,
        shooter: ClientId,
    ) -> Result<ShootOutcome, GameError> {
        if self.over {
            return Err(GameError::ActionsRestricted);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == shooter)
            .ok_or(GameError::PlayerNotFound(shooter))?;

        let fatal = self.players[idx]
            .chamber
            .fire()
            .ok_or(GameError::ChamberExhausted)?;

        if fatal {
            self.players.remove(idx);
            self.eliminated.insert(shooter);
            self.round.seat_removed(idx, self.players.len());
            tracing::info!(
                room = %self.room,
                player = %shooter,
                remaining = self.players.len(),
                "player eliminated"
            );
            if self.players.len() == 1 {
                self.over = true;
                tracing::info!(room = %self.room, "match over");
                return Ok(ShootOutcome {
                    survived: false,
                    eliminated: true,
                });
            }
        }

        self.next_round()?;
        Ok(ShootOutcome {
            survived: !fatal,
            eliminated: fatal,
        })
    }

    /// Drops a departed player immediately: roster removal, turn pointer
    /// re-anchored; if they held the turn it passes to the next live
    /// player. A roster of one (or none) ends the match on the spot.
    pub fn remove_player(&mut self, id: ClientId) -> Result<(), GameError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GameError::PlayerNotFound(id))?;

        self.players.remove(idx);
        self.round.seat_removed(idx, self.players.len());
        tracing::info!(
            room = %self.room,
            player = %id,
            remaining = self.players.len(),
            "player removed from match"
        );

        if self.players.len() <= 1 {
            self.over = true;
        }
        Ok(())
    }

    /// Replaces the round wholesale; chambers persist, everything else is
    /// re-rolled.
    fn next_round(&mut self) -> Result<(), GameError> {
        for player in &mut self.players {
            player.hand.clear();
        }
        self.round = Round::deal(&mut self.players)?;
        self.round_id += 1;
        tracing::debug!(
            room = %self.room,
            round = self.round_id,
            kon = %self.round.target_rank(),
            "new round dealt"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{DECK_SIZE, HAND_SIZE, build_deck};
    use crate::{CHAMBER_SIZE, Chamber};
    use kondeck_protocol::{Card, Rank};

    fn ids(n: u64) -> Vec<ClientId> {
        (1..=n).map(ClientId).collect()
    }

    fn game(n: u64) -> Game {
        Game::start(RoomId::from("room0"), &ids(n)).unwrap()
    }

    /// Fixes a player's next chamber draw: fatal or not.
    fn rig_chamber(game: &mut Game, who: ClientId, fatal: bool) {
        let player = game.players.iter_mut().find(|p| p.id == who).unwrap();
        player.chamber = if fatal {
            // fire() consumes from the back, so the last slot is drawn first
            Chamber::armed_at(CHAMBER_SIZE - 1)
        } else {
            Chamber::dud()
        };
    }

    /// The degenerate §-style scenario: seat 0 holds five queens, seat 1
    /// five jacks, target Q, seat 0 to act.
    fn rigged_two_player() -> Game {
        let mut game = game(2);
        game.players[0].hand =
            (1..=5).map(|n| Card::new(format!("Q-{n}"), Rank::Q)).collect();
        game.players[1].hand =
            (1..=5).map(|n| Card::new(format!("J-{n}"), Rank::J)).collect();
        game.round.stage(Rank::Q, 0, Vec::new());
        game
    }

    // =====================================================================
    // start
    // =====================================================================

    #[test]
    fn test_start_deals_five_cards_each() {
        let game = game(4);
        assert!(!game.is_over());
        assert_eq!(game.round_id(), 1);
        assert_eq!(game.player_count(), 4);
        for id in ids(4) {
            assert_eq!(game.hand(id).unwrap().len(), HAND_SIZE);
        }
    }

    #[test]
    fn test_start_rejects_lone_player() {
        let err = Game::start(RoomId::from("r"), &ids(1)).unwrap_err();
        assert_eq!(err, GameError::NotEnoughPlayers(MIN_PLAYERS));
    }

    #[test]
    fn test_start_rejects_five_players() {
        let err = Game::start(RoomId::from("r"), &ids(5)).unwrap_err();
        assert_eq!(err, GameError::RoomFull(MAX_PLAYERS));
    }

    // =====================================================================
    // Bluff chain: play → verify → shoot
    // =====================================================================

    #[test]
    fn test_truthful_play_caught_by_correct_call() {
        let mut game = rigged_two_player();
        let (a, b) = (ClientId(1), ClientId(2));

        game.play_cards(a, &["Q-1".to_string()]).unwrap();
        assert_eq!(game.current_turn_player(), Some(b));
        assert_eq!(game.previous_player(), Some(a));

        // B claims the card is truthful; it is, so the call is correct and
        // the shoot lands on the previous player (A).
        assert_eq!(game.verify(b, true, "Q-1"), Ok(true));
    }

    #[test]
    fn test_wrong_call_returns_false() {
        let mut game = rigged_two_player();
        let (a, b) = (ClientId(1), ClientId(2));

        game.play_cards(a, &["Q-2".to_string()]).unwrap();
        assert_eq!(game.verify(b, false, "Q-2"), Ok(false));
    }

    #[test]
    fn test_survived_shoot_resets_the_round() {
        let mut game = rigged_two_player();
        let (a, b) = (ClientId(1), ClientId(2));

        game.play_cards(a, &["Q-1".to_string()]).unwrap();
        game.verify(b, true, "Q-1").unwrap();
        rig_chamber(&mut game, a, false);

        let outcome = game.pull_trigger(a).unwrap();
        assert!(outcome.survived);
        assert!(!outcome.eliminated);
        assert!(!game.is_over());

        // Fresh round: everyone back to five cards, lock cleared, valid
        // target and turn.
        assert_eq!(game.round_id(), 2);
        let state = game.state();
        assert!(state.is_all_actions);
        assert!(state.table_cards.is_empty());
        assert_ne!(state.kon_card, Rank::Joker);
        assert!(state.current_player_id.is_some());
        for id in [a, b] {
            assert_eq!(game.hand(id).unwrap().len(), HAND_SIZE);
        }
    }

    #[test]
    fn test_fatal_shoot_with_two_players_ends_the_match() {
        let mut game = rigged_two_player();
        let a = ClientId(1);
        rig_chamber(&mut game, a, true);

        let outcome = game.pull_trigger(a).unwrap();
        assert!(outcome.eliminated);
        assert!(game.is_over());
        assert_eq!(game.player_count(), 1);
        assert!(game.eliminated().contains(&a));
        // No further round is dealt once the match is over.
        assert_eq!(game.round_id(), 1);
        assert_eq!(game.hand(a), Err(GameError::PlayerNotFound(a)));
    }

    #[test]
    fn test_fatal_shoot_with_three_players_continues() {
        let mut game = game(3);
        let shooter = ClientId(2);
        rig_chamber(&mut game, shooter, true);

        let outcome = game.pull_trigger(shooter).unwrap();
        assert!(outcome.eliminated);
        assert!(!game.is_over());
        assert_eq!(game.player_count(), 2);
        assert_eq!(game.round_id(), 2);
        assert!(!game.contains(shooter));
        // Survivors were re-dealt full hands.
        for player in &game.players {
            assert_eq!(player.hand.len(), HAND_SIZE);
        }
    }

    #[test]
    fn test_emptied_hand_locks_until_the_shoot() {
        let mut game = rigged_two_player();
        let (a, b) = (ClientId(1), ClientId(2));

        let all: Vec<String> = (1..=5).map(|n| format!("Q-{n}")).collect();
        game.play_cards(a, &all).unwrap();
        assert!(!game.state().is_all_actions);

        // The chain collapses straight to the shoot: no interleaved plays.
        assert_eq!(
            game.play_cards(b, &["J-1".to_string()]),
            Err(GameError::ActionsRestricted)
        );
        assert_eq!(game.verify(b, true, "Q-3"), Ok(true));

        rig_chamber(&mut game, a, false);
        game.pull_trigger(a).unwrap();
        assert!(game.state().is_all_actions);
    }

    #[test]
    fn test_pull_trigger_requires_a_seated_player() {
        let mut game = game(2);
        assert_eq!(
            game.pull_trigger(ClientId(99)),
            Err(GameError::PlayerNotFound(ClientId(99)))
        );
    }

    #[test]
    fn test_exhausted_chamber_rejects_the_shoot() {
        let mut game = game(2);
        let a = ClientId(1);
        game.players[0].chamber = Chamber::dud();
        for _ in 0..CHAMBER_SIZE {
            game.pull_trigger(a).unwrap();
        }
        assert_eq!(game.pull_trigger(a), Err(GameError::ChamberExhausted));
    }

    #[test]
    fn test_actions_rejected_after_match_over() {
        let mut game = rigged_two_player();
        let a = ClientId(1);
        rig_chamber(&mut game, a, true);
        game.pull_trigger(a).unwrap();

        assert_eq!(
            game.play_cards(ClientId(2), &["J-1".to_string()]),
            Err(GameError::ActionsRestricted)
        );
        assert_eq!(game.pull_trigger(ClientId(2)), Err(GameError::ActionsRestricted));
    }

    // =====================================================================
    // Disconnect handling
    // =====================================================================

    #[test]
    fn test_remove_player_passes_turn_to_next() {
        let mut game = game(3);
        game.round.stage(Rank::K, 1, Vec::new());
        let leaver = ClientId(2);

        game.remove_player(leaver).unwrap();
        assert!(!game.is_over());
        assert_eq!(game.player_count(), 2);
        // Seat 1 left while holding the turn; the next live player (old
        // seat 2) now holds it.
        assert_eq!(game.current_turn_player(), Some(ClientId(3)));
    }

    #[test]
    fn test_remove_player_down_to_one_ends_match() {
        let mut game = game(2);
        game.remove_player(ClientId(1)).unwrap();
        assert!(game.is_over());
        assert_eq!(game.player_count(), 1);
    }

    #[test]
    fn test_remove_unknown_player_is_rejected() {
        let mut game = game(2);
        assert_eq!(
            game.remove_player(ClientId(7)),
            Err(GameError::PlayerNotFound(ClientId(7)))
        );
    }

    // =====================================================================
    // Conservation
    // =====================================================================

    #[test]
    fn test_cards_in_flight_stay_a_submultiset_of_the_deck() {
        let mut game = game(4);

        // Walk a few turns, then audit every card in flight.
        for _ in 0..3 {
            let actor = game.current_turn_player().unwrap();
            let card_id = game.hand(actor).unwrap()[0].id.clone();
            game.play_cards(actor, &[card_id]).unwrap();
        }

        let mut in_flight: Vec<String> = game
            .players
            .iter()
            .flat_map(|p| p.hand.iter().map(|c| c.id.clone()))
            .chain(game.state().table_cards.iter().map(|c| c.id.clone()))
            .collect();
        let unique: std::collections::HashSet<&String> =
            in_flight.iter().collect();
        assert_eq!(unique.len(), in_flight.len(), "duplicate card ids");

        let canonical: std::collections::HashSet<String> =
            build_deck().into_iter().map(|c| c.id).collect();
        in_flight.retain(|id| !canonical.contains(id));
        assert!(in_flight.is_empty(), "foreign cards: {in_flight:?}");

        // Deck remainder + hands + table never exceed the canonical 28.
        let total = game.round.deck_len()
            + game.players.iter().map(|p| p.hand.len()).sum::<usize>()
            + game.state().table_cards.len();
        assert!(total <= DECK_SIZE);
    }

    #[test]
    fn test_full_deal_collects_back_to_the_canonical_multiset() {
        let game = game(4);

        let mut collected: Vec<String> = game
            .players
            .iter()
            .flat_map(|p| p.hand.iter().map(|c| c.id.clone()))
            .collect();
        collected.extend(game.round.deck_ids());

        let mut canonical: Vec<String> =
            build_deck().into_iter().map(|c| c.id).collect();
        collected.sort();
        canonical.sort();
        assert_eq!(collected, canonical);
    }
}
