//! The canonical deck: a fixed 28-card multiset.

use kondeck_protocol::{Card, Rank};
use rand::seq::SliceRandom;

/// Copies of each natural rank in the deck.
const NATURALS_PER_RANK: usize = 6;
/// Jokers in the deck.
const JOKER_COUNT: usize = 4;

/// Total deck size: 6×J + 6×Q + 6×K + 6×A + 4×JOKER.
pub const DECK_SIZE: usize = 28;

/// Cards dealt to each player at the start of a round.
pub const HAND_SIZE: usize = 5;

/// Roster bounds for a match.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Ranks eligible to be a round's target ("kon"). Never the joker.
pub const TARGET_RANKS: [Rank; 4] = [Rank::J, Rank::Q, Rank::K, Rank::A];

/// Builds the canonical deck in a fixed order. Ids are unique
/// (`"J-1"`..`"A-6"`, `"JOKER-1"`..`"JOKER-4"`); callers must [`shuffle`]
/// before dealing.
pub fn build_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for rank in TARGET_RANKS {
        for n in 1..=NATURALS_PER_RANK {
            deck.push(Card::new(format!("{rank}-{n}"), rank));
        }
    }
    for n in 1..=JOKER_COUNT {
        deck.push(Card::new(format!("JOKER-{n}"), Rank::Joker));
    }
    deck
}

/// Fisher–Yates shuffle with a uniform source; every permutation is equally
/// likely.
pub fn shuffle(deck: &mut [Card]) {
    deck.shuffle(&mut rand::rng());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_build_deck_has_28_cards() {
        assert_eq!(build_deck().len(), DECK_SIZE);
    }

    #[test]
    fn test_build_deck_rank_counts() {
        let deck = build_deck();
        for rank in TARGET_RANKS {
            let count = deck.iter().filter(|c| c.rank == rank).count();
            assert_eq!(count, NATURALS_PER_RANK, "rank {rank}");
        }
        let jokers = deck.iter().filter(|c| c.rank == Rank::Joker).count();
        assert_eq!(jokers, JOKER_COUNT);
    }

    #[test]
    fn test_build_deck_ids_are_unique() {
        let deck = build_deck();
        let ids: HashSet<&str> = deck.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), DECK_SIZE);
    }

    #[test]
    fn test_shuffle_preserves_the_multiset() {
        let mut deck = build_deck();
        shuffle(&mut deck);

        let mut original: Vec<String> =
            build_deck().into_iter().map(|c| c.id).collect();
        let mut shuffled: Vec<String> =
            deck.into_iter().map(|c| c.id).collect();
        original.sort();
        shuffled.sort();
        assert_eq!(original, shuffled);
    }

    #[test]
    fn test_shuffle_reaches_many_permutations() {
        // Not a strict uniformity proof — a frequency sanity check that the
        // first position is not biased toward a handful of cards. Over 1000
        // shuffles each of the 28 cards should land in front at least once
        // with overwhelming probability.
        let mut seen_first: HashSet<String> = HashSet::new();
        for _ in 0..1000 {
            let mut deck = build_deck();
            shuffle(&mut deck);
            seen_first.insert(deck[0].id.clone());
        }
        assert!(
            seen_first.len() >= 25,
            "only {} distinct cards ever led the deck",
            seen_first.len()
        );
    }
}
