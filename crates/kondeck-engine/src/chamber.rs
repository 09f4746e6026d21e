//! The elimination chamber: six draws per life, exactly one of them lethal.

use rand::Rng;

use crate::GameError;

/// Slots in a chamber.
pub const CHAMBER_SIZE: usize = 6;

/// A counted-draw chamber. Armed with exactly one live slot per life,
/// consumed from the back one draw at a time, never reloaded mid-life.
///
/// The structure enforces the lifecycle: [`Chamber::load`] rejects a second
/// arming, and [`Chamber::fire`] runs dry after six draws instead of
/// wrapping around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chamber {
    slots: [bool; CHAMBER_SIZE],
    /// Draws left; `fire` consumes `slots[remaining - 1]`.
    remaining: usize,
    armed: bool,
}

impl Chamber {
    /// An unarmed chamber: six empty slots.
    pub fn new() -> Self {
        Self {
            slots: [false; CHAMBER_SIZE],
            remaining: CHAMBER_SIZE,
            armed: false,
        }
    }

    /// A freshly armed chamber, live slot chosen uniformly.
    pub fn loaded() -> Self {
        let mut chamber = Self::new();
        chamber.slots[rand::rng().random_range(0..CHAMBER_SIZE)] = true;
        chamber.armed = true;
        chamber
    }

    /// Arms one uniformly random slot. Rejects a second load within the
    /// same life.
    pub fn load(&mut self) -> Result<(), GameError> {
        if self.armed {
            return Err(GameError::ChamberAlreadyLoaded);
        }
        self.slots[rand::rng().random_range(0..CHAMBER_SIZE)] = true;
        self.armed = true;
        Ok(())
    }

    /// Draws the next slot. `Some(true)` is fatal; `None` means the chamber
    /// is exhausted. Irreversible — the consumption order is fixed at load
    /// time.
    pub fn fire(&mut self) -> Option<bool> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.slots[self.remaining])
    }

    /// Draws left in this life.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// A chamber with the live slot at a known position. Test-only: real
    /// chambers are always armed uniformly.
    #[cfg(test)]
    pub(crate) fn armed_at(pos: usize) -> Self {
        let mut chamber = Self::new();
        chamber.slots[pos] = true;
        chamber.armed = true;
        chamber
    }

    /// An armed chamber that never fires fatally. Test-only.
    #[cfg(test)]
    pub(crate) fn dud() -> Self {
        let mut chamber = Self::new();
        chamber.armed = true;
        chamber
    }
}

impl Default for Chamber {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chamber_is_unarmed_and_full() {
        let chamber = Chamber::new();
        assert_eq!(chamber.remaining(), CHAMBER_SIZE);
        assert!(!chamber.is_exhausted());
    }

    #[test]
    fn test_loaded_chamber_has_exactly_one_live_slot() {
        for _ in 0..100 {
            let mut chamber = Chamber::loaded();
            let mut live = 0;
            while let Some(fatal) = chamber.fire() {
                if fatal {
                    live += 1;
                }
            }
            assert_eq!(live, 1);
        }
    }

    #[test]
    fn test_load_twice_is_rejected() {
        let mut chamber = Chamber::loaded();
        assert_eq!(chamber.load(), Err(GameError::ChamberAlreadyLoaded));
    }

    #[test]
    fn test_load_arms_an_unarmed_chamber() {
        let mut chamber = Chamber::new();
        chamber.load().unwrap();
        let fatal_draws: usize = std::iter::from_fn(|| chamber.fire())
            .filter(|&f| f)
            .count();
        assert_eq!(fatal_draws, 1);
    }

    #[test]
    fn test_fire_consumes_from_the_back() {
        let mut chamber = Chamber::armed_at(CHAMBER_SIZE - 1);
        // Live slot is the last one, which is the first draw.
        assert_eq!(chamber.fire(), Some(true));
        assert_eq!(chamber.remaining(), CHAMBER_SIZE - 1);
    }

    #[test]
    fn test_fire_after_exhaustion_returns_none() {
        let mut chamber = Chamber::dud();
        for _ in 0..CHAMBER_SIZE {
            assert!(chamber.fire().is_some());
        }
        assert!(chamber.is_exhausted());
        assert_eq!(chamber.fire(), None);
    }

    #[test]
    fn test_live_slot_position_varies() {
        // The armed position must not be constant. Six positions, 60
        // samples: all-identical is (1/6)^59 — effectively impossible.
        let positions: std::collections::HashSet<usize> = (0..60)
            .map(|_| {
                let mut chamber = Chamber::loaded();
                let mut draw = 0;
                loop {
                    match chamber.fire() {
                        Some(true) => break draw,
                        Some(false) => draw += 1,
                        None => unreachable!("armed chamber ran dry"),
                    }
                }
            })
            .collect();
        assert!(positions.len() > 1);
    }
}
