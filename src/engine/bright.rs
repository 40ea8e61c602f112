//! Bright: the cycling resource that feeds Kōzan.
//!
//! A cycle starts at potency 0 with count 3. Count ticks down once per
//! turn; the cycle ends when potency hits the cap or count hits zero.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::rules::{CYCLE_LENGTH, EGO_GAIN, MAX_POTENCY};
use crate::core::Card;

/// Bright potency, turn count and the matching streak.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrightState {
    /// Accumulated potency, `0..=MAX_POTENCY`.
    pub potency: u8,
    /// Turns left in the cycle, `0..=CYCLE_LENGTH`.
    pub count: u8,
    /// The previous turn of this cycle resolved as a Match.
    pub streak: bool,
}

impl Default for BrightState {
    fn default() -> Self {
        Self {
            potency: 0,
            count: CYCLE_LENGTH,
            streak: false,
        }
    }
}

impl BrightState {
    /// Create a state with the given potency and count, no streak.
    #[must_use]
    pub fn new(potency: u8, count: u8) -> Self {
        Self {
            potency,
            count,
            streak: false,
        }
    }

    /// Add potency, saturating at the cap. Returns the amount actually added.
    pub fn gain(&mut self, amount: u8) -> u8 {
        let before = self.potency;
        self.potency = self.potency.saturating_add(amount).min(MAX_POTENCY);
        self.potency - before
    }

    /// Count down one turn, flooring at zero.
    pub fn tick(&mut self) {
        self.count = self.count.saturating_sub(1);
    }

    /// Has the cycle run out?
    #[must_use]
    pub fn cycle_ended(&self) -> bool {
        self.potency >= MAX_POTENCY || self.count == 0
    }

    /// Start a fresh cycle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check the range invariants.
    #[must_use]
    pub fn in_range(&self) -> bool {
        self.potency <= MAX_POTENCY && self.count <= CYCLE_LENGTH
    }
}

/// One source of Bright gain on a resolved action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrightBonus {
    /// Played card matched the suit.
    Match,
    /// Matched again right after a Match in the same cycle.
    Streak,
    /// S3 was played, match or not.
    Sapphire,
    /// Defend's counter coin succeeded.
    Counter,
    /// EGO.
    Ego,
}

impl BrightBonus {
    /// Potency this bonus requests before the cap is applied.
    #[must_use]
    pub const fn amount(self) -> u8 {
        match self {
            BrightBonus::Match
            | BrightBonus::Streak
            | BrightBonus::Sapphire
            | BrightBonus::Counter => 1,
            BrightBonus::Ego => EGO_GAIN,
        }
    }
}

/// Bonuses earned by playing `card`.
#[must_use]
pub fn attack_bonuses(card: Card, matched: bool, streak: bool) -> SmallVec<[BrightBonus; 3]> {
    let mut bonuses = SmallVec::new();
    if matched {
        bonuses.push(BrightBonus::Match);
        if streak {
            bonuses.push(BrightBonus::Streak);
        }
    }
    if card == Card::S3 {
        bonuses.push(BrightBonus::Sapphire);
    }
    bonuses
}

/// Sum of requested potency across `bonuses`.
#[must_use]
pub fn total_gain(bonuses: &[BrightBonus]) -> u8 {
    bonuses
        .iter()
        .fold(0u8, |acc, bonus| acc.saturating_add(bonus.amount()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cycle() {
        let bright = BrightState::default();
        assert_eq!(bright.potency, 0);
        assert_eq!(bright.count, CYCLE_LENGTH);
        assert!(!bright.streak);
        assert!(!bright.cycle_ended());
    }

    #[test]
    fn test_gain_saturates() {
        let mut bright = BrightState::new(4, 3);
        assert_eq!(bright.gain(2), 1);
        assert_eq!(bright.potency, MAX_POTENCY);
        assert_eq!(bright.gain(1), 0);
        assert!(bright.cycle_ended());
    }

    #[test]
    fn test_tick_floors_at_zero() {
        let mut bright = BrightState::new(0, 1);
        bright.tick();
        assert_eq!(bright.count, 0);
        assert!(bright.cycle_ended());
        bright.tick();
        assert_eq!(bright.count, 0);
    }

    #[test]
    fn test_reset_clears_streak() {
        let mut bright = BrightState::new(5, 1);
        bright.streak = true;
        bright.reset();
        assert_eq!(bright, BrightState::default());
    }

    #[test]
    fn test_attack_bonuses() {
        assert!(attack_bonuses(Card::S1, false, true).is_empty());
        assert_eq!(attack_bonuses(Card::S1, true, false).as_slice(), &[BrightBonus::Match]);
        assert_eq!(
            attack_bonuses(Card::S2, true, true).as_slice(),
            &[BrightBonus::Match, BrightBonus::Streak]
        );
        assert_eq!(attack_bonuses(Card::S3, false, false).as_slice(), &[BrightBonus::Sapphire]);
        assert_eq!(
            attack_bonuses(Card::S3, true, true).as_slice(),
            &[BrightBonus::Match, BrightBonus::Streak, BrightBonus::Sapphire]
        );
    }

    #[test]
    fn test_total_gain() {
        assert_eq!(total_gain(&[]), 0);
        assert_eq!(total_gain(&[BrightBonus::Match, BrightBonus::Sapphire]), 2);
        assert_eq!(total_gain(&[BrightBonus::Ego]), 2);
    }

    #[test]
    fn test_in_range() {
        assert!(BrightState::new(5, 3).in_range());
        assert!(!BrightState::new(6, 3).in_range());
        assert!(!BrightState::new(0, 4).in_range());
    }
}
