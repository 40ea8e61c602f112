//! Action policies.
//!
//! A policy looks at the turn snapshot and picks one of its available
//! actions. Policies never touch the engine directly.

use crate::core::{Action, Card, GameRng, RandomSource};
use crate::engine::TurnSnapshot;

/// Picks an action for a turn.
pub trait ActionPolicy {
    /// Choose an action. Must be one of `snapshot.available_actions`.
    fn choose(&mut self, snapshot: &TurnSnapshot) -> Action;

    /// Short name for logs and reports.
    fn name(&self) -> &'static str;
}

/// Play the first card; Defend when the offer is empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstCardPolicy;

impl ActionPolicy for FirstCardPolicy {
    fn choose(&mut self, snapshot: &TurnSnapshot) -> Action {
        if snapshot.offer.is_empty() {
            Action::Defend
        } else {
            Action::UseFirst
        }
    }

    fn name(&self) -> &'static str {
        "first"
    }
}

/// Chase matches.
///
/// Plays an offered card of the current suit (preferring S3), otherwise
/// EGO to keep a live streak, otherwise S3 for its flat bonus, otherwise
/// the first card. With an empty offer it uses EGO.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchSeekingPolicy;

impl MatchSeekingPolicy {
    fn slot_action(slot: usize) -> Action {
        if slot == 0 {
            Action::UseFirst
        } else {
            Action::UseSecond
        }
    }
}

impl ActionPolicy for MatchSeekingPolicy {
    fn choose(&mut self, snapshot: &TurnSnapshot) -> Action {
        let offer = &snapshot.offer;
        if offer.is_empty() {
            return Action::Ego;
        }

        let matching = offer
            .iter()
            .enumerate()
            .filter(|(_, card)| card.suit() == snapshot.suit)
            .max_by_key(|&(slot, card)| (*card == Card::S3, std::cmp::Reverse(slot)));
        if let Some((slot, _)) = matching {
            return Self::slot_action(slot);
        }

        if snapshot.streak {
            return Action::Ego;
        }

        let sapphire = offer.iter().position(|card| *card == Card::S3);
        Self::slot_action(sapphire.unwrap_or(0))
    }

    fn name(&self) -> &'static str {
        "match"
    }
}

/// Uniform pick among the available actions.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    rng: GameRng,
}

impl RandomPolicy {
    /// Create a policy with its own seeded RNG.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl ActionPolicy for RandomPolicy {
    fn choose(&mut self, snapshot: &TurnSnapshot) -> Action {
        let actions = &snapshot.available_actions;
        self.rng
            .choose_index(actions.len())
            .ok()
            .and_then(|idx| actions.get(idx).copied())
            .unwrap_or(Action::Defend)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
