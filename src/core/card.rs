//! Suits and cards.
//!
//! Cards are interchangeable tokens: a deck may hold several copies of the
//! same `Card` value. Each card has a fixed suit color.

use serde::{Deserialize, Serialize};

/// Suit color. The current suit decides whether a played card matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    /// Red (S1).
    Red,
    /// Yellow (S2).
    Yellow,
    /// Blue (S3).
    Blue,
}

impl Suit {
    /// All suits in canonical order. Random suit draws index into this.
    pub const ALL: [Suit; 3] = [Suit::Red, Suit::Yellow, Suit::Blue];

    /// Position of this suit in [`Suit::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Suit::Red => 0,
            Suit::Yellow => 1,
            Suit::Blue => 2,
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Suit::Red => "Red",
            Suit::Yellow => "Yellow",
            Suit::Blue => "Blue",
        };
        f.write_str(name)
    }
}

/// Skill card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Card {
    /// Red skill.
    S1,
    /// Yellow skill.
    S2,
    /// Blue skill. Always grants +1 Bright when played.
    S3,
}

impl Card {
    /// All card values in canonical order.
    pub const ALL: [Card; 3] = [Card::S1, Card::S2, Card::S3];

    /// The card's fixed suit color.
    #[must_use]
    pub const fn suit(self) -> Suit {
        match self {
            Card::S1 => Suit::Red,
            Card::S2 => Suit::Yellow,
            Card::S3 => Suit::Blue,
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Card::S1 => "S1",
            Card::S2 => "S2",
            Card::S3 => "S3",
        };
        f.write_str(name)
    }
}

/// Cards the deck is rebuilt from whenever it runs dry.
pub const DECK_TEMPLATE: [Card; 6] = [Card::S1, Card::S1, Card::S1, Card::S2, Card::S2, Card::S3];
