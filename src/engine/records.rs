//! Records returned by the turn operations.
//!
//! These are plain data for a presentation layer to render. They carry no
//! references back into the engine.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::bright::BrightBonus;
use super::finisher::FinisherResult;
use super::offer::OfferEvent;
use super::rules::OFFER_SIZE;
use crate::core::{Action, Card, Suit};

/// State visible at the start of a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// Turn number, starting at 1.
    pub turn: u32,
    /// Current suit.
    pub suit: Suit,
    /// This `start_turn` applied a deferred suit shuffle.
    pub suit_changed: bool,
    /// Bright potency.
    pub potency: u8,
    /// Turns left in the cycle.
    pub count: u8,
    /// Streak flag carried from the previous turn.
    pub streak: bool,
    /// Offer, slot order.
    pub offer: SmallVec<[Card; OFFER_SIZE]>,
    /// Actions `resolve` will accept.
    pub available_actions: SmallVec<[Action; 4]>,
}

/// Outcome of `resolve`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Action taken.
    pub action: Action,
    /// Card played, for attacks.
    pub used_card: Option<Card>,
    /// Whether the action counted as a Match.
    pub matched: bool,
    /// Sources of Bright gain, before the cap.
    pub bonuses: SmallVec<[BrightBonus; 3]>,
    /// Potency actually added after the cap.
    pub bright_delta: u8,
    /// Potency after the action.
    pub potency: u8,
    /// Count after the action. It only changes at `end_turn`.
    pub count: u8,
    /// Offer after the action.
    pub offer: SmallVec<[Card; OFFER_SIZE]>,
    /// Offer changes, in order.
    pub offer_log: SmallVec<[OfferEvent; 2]>,
    /// The suit will be redrawn at the next `start_turn`.
    pub suit_shuffle_pending: bool,
}

/// Outcome of `end_turn`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndOfTurn {
    /// Potency after the end-of-turn step (0 after a reset).
    pub potency: u8,
    /// Count after the end-of-turn step (3 after a reset).
    pub count: u8,
    /// The Bright cycle ended and was reset.
    pub cycle_reset: bool,
    /// The suit will be redrawn at the next `start_turn`.
    pub suit_shuffle_pending: bool,
    /// Suit drawn by the reset.
    pub new_suit: Option<Suit>,
    /// Kōzan result, if the cycle ended at or above the threshold.
    pub finisher: Option<FinisherResult>,
}
