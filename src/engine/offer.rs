//! The two-slot card offer.
//!
//! The offer persists across turns. Removing a card leaves a hole that
//! [`Offer::compact`] closes by shifting the survivor into slot 0; every
//! public engine operation ends with a compacted offer, so outside the
//! engine slot 0 is always filled whenever the offer is non-empty.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::rules::OFFER_SIZE;
use crate::core::Card;

/// Offer slots. `None` marks an empty slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offer {
    slots: [Option<Card>; OFFER_SIZE],
}

impl Offer {
    /// Create an empty offer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an offer from up to [`OFFER_SIZE`] cards, first card in slot 0.
    ///
    /// Returns `None` if more cards are given than the offer can hold.
    #[must_use]
    pub fn from_cards(cards: &[Card]) -> Option<Self> {
        if cards.len() > OFFER_SIZE {
            return None;
        }
        let mut offer = Self::new();
        for &card in cards {
            offer.push(card);
        }
        Some(offer)
    }

    /// Number of cards held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Check if the offer holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if every slot is filled.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() == OFFER_SIZE
    }

    /// Card in a slot.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<Card> {
        self.slots.get(slot).copied().flatten()
    }

    /// Card in slot 0.
    #[must_use]
    pub fn first(&self) -> Option<Card> {
        self.get(0)
    }

    /// Held cards in slot order.
    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Held cards in slot order, as an owned list.
    #[must_use]
    pub fn cards(&self) -> SmallVec<[Card; OFFER_SIZE]> {
        self.iter().collect()
    }

    /// Check that no empty slot precedes a filled one.
    #[must_use]
    pub fn is_compact(&self) -> bool {
        let mut seen_hole = false;
        for slot in &self.slots {
            match slot {
                None => seen_hole = true,
                Some(_) if seen_hole => return false,
                Some(_) => {}
            }
        }
        true
    }

    /// Append a card to the first empty slot after the held cards.
    ///
    /// Returns `false` (and drops nothing) if the offer is already full.
    pub(crate) fn push(&mut self, card: Card) -> bool {
        self.compact();
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(card);
                true
            }
            None => false,
        }
    }

    /// Remove the card in `slot`, leaving a hole.
    pub(crate) fn take(&mut self, slot: usize) -> Option<Card> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Empty every slot, returning the cards that were held.
    pub(crate) fn clear(&mut self) -> SmallVec<[Card; OFFER_SIZE]> {
        let cards = self.cards();
        self.slots = [None; OFFER_SIZE];
        cards
    }

    /// Shift held cards left so they occupy the lowest slots.
    ///
    /// Returns `true` if anything moved. Compacting a compact offer is a no-op.
    pub(crate) fn compact(&mut self) -> bool {
        if self.is_compact() {
            return false;
        }
        let cards = self.clear();
        for (slot, card) in self.slots.iter_mut().zip(cards) {
            *slot = Some(card);
        }
        true
    }
}

/// One change to the offer made while resolving an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferEvent {
    /// A card was played from `slot` and discarded.
    Used {
        /// Played card.
        card: Card,
        /// Slot it was played from.
        slot: usize,
    },
    /// The lone remaining card shared the played card's color and stays.
    KeptSameColor {
        /// Kept card.
        card: Card,
    },
    /// The lone remaining card had a different color and was discarded.
    DiscardedOffColor {
        /// Discarded card.
        card: Card,
    },
    /// Defend or EGO discarded the card in slot 0.
    DiscardedFirst {
        /// Discarded card.
        card: Card,
    },
}
