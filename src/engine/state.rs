//! Engine state and checkpoints.
//!
//! `EngineState` is everything the rules read or write. Callers may build
//! one explicitly to start the engine mid-scenario; it is validated when
//! the engine is built.

use serde::{Deserialize, Serialize};

use super::bright::BrightState;
use super::deck::{Deck, DiscardPile};
use super::offer::Offer;
use crate::core::{Card, EngineError, GameRngState, Suit, TurnPhase};

/// Complete rules state of one simulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    /// Current suit.
    pub suit: Suit,
    /// Bright potency, count and streak.
    pub bright: BrightState,
    /// Draw pile.
    pub deck: Deck,
    /// Persistent offer.
    pub offer: Offer,
    /// Discarded cards.
    pub discard: DiscardPile,
    /// Defend asked for a suit redraw at the next `start_turn`.
    pub pending_suit_shuffle: bool,
    /// Turns started so far.
    pub turn: u32,
}

impl EngineState {
    /// Fresh battle state: empty deck, empty offer, new cycle.
    #[must_use]
    pub fn new(suit: Suit) -> Self {
        Self {
            suit,
            bright: BrightState::default(),
            deck: Deck::new(),
            offer: Offer::new(),
            discard: DiscardPile::new(),
            pending_suit_shuffle: false,
            turn: 0,
        }
    }

    /// Set potency and count.
    #[must_use]
    pub fn with_bright(mut self, potency: u8, count: u8) -> Self {
        self.bright.potency = potency;
        self.bright.count = count;
        self
    }

    /// Set the streak flag.
    #[must_use]
    pub fn with_streak(mut self, streak: bool) -> Self {
        self.bright.streak = streak;
        self
    }

    /// Set the draw pile, front first.
    #[must_use]
    pub fn with_deck(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.deck = Deck::from_cards(cards);
        self
    }

    /// Set the offer.
    #[must_use]
    pub fn with_offer(mut self, offer: Offer) -> Self {
        self.offer = offer;
        self
    }

    /// Queue a suit redraw for the next `start_turn`.
    #[must_use]
    pub fn with_pending_suit_shuffle(mut self) -> Self {
        self.pending_suit_shuffle = true;
        self
    }

    /// Check range invariants.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.bright.in_range() {
            return Err(EngineError::InvalidState(format!(
                "bright potency {} / count {} out of range",
                self.bright.potency, self.bright.count
            )));
        }
        if !self.offer.is_compact() {
            return Err(EngineError::InvalidState(
                "offer has an empty slot before a filled one".to_string(),
            ));
        }
        Ok(())
    }
}

/// Serializable snapshot of a `GameRng`-driven engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineCheckpoint {
    /// Rules state.
    pub state: EngineState,
    /// RNG position.
    pub rng: GameRngState,
    /// Turn-loop phase.
    pub phase: TurnPhase,
    /// Match outcome of a resolved but not yet ended turn.
    pub resolved_match: Option<bool>,
}

impl EngineCheckpoint {
    /// Encode to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bytes produced by [`EngineCheckpoint::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
