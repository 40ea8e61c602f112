//! Draw deck and discard pile.
//!
//! The deck is rebuilt from [`DECK_TEMPLATE`] whenever a draw finds it
//! empty. Discarded cards are only tracked; they never return to the deck.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Card, RandomSource, RngError, DECK_TEMPLATE};

/// Ordered draw pile, consumed from the front.
///
/// Backed by `im::Vector` so cloning an engine for a forked simulation
/// is O(1).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
    reshuffles: u32,
}

impl Deck {
    /// Create an empty deck. The first draw rebuilds it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deck holding `cards`, front first.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
            reshuffles: 0,
        }
    }

    /// Cards left to draw.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the deck is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Remaining cards, front first.
    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied()
    }

    /// How many times the deck has been rebuilt from the template.
    #[must_use]
    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    /// Draw the front card, rebuilding from the shuffled template first if
    /// the deck is empty.
    pub fn draw<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<Card, RngError> {
        let card = match self.cards.pop_front() {
            Some(card) => card,
            None => self.rebuild(rng)?,
        };
        trace!(?card, remaining = self.cards.len(), "card drawn");
        Ok(card)
    }

    /// Refill from the shuffled template and hand back its front card.
    fn rebuild<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<Card, RngError> {
        let mut cards = DECK_TEMPLATE;
        rng.shuffle_cards(&mut cards)?;
        let [front, rest @ ..] = cards;
        self.cards = rest.into_iter().collect();
        self.reshuffles = self.reshuffles.saturating_add(1);
        trace!(reshuffles = self.reshuffles, order = ?cards, "deck rebuilt from template");
        Ok(front)
    }
}

/// Unordered bag of discarded cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardPile {
    counts: FxHashMap<Card, u32>,
}

impl DiscardPile {
    /// Create an empty pile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card.
    pub fn add(&mut self, card: Card) {
        *self.counts.entry(card).or_insert(0) += 1;
    }

    /// Copies of `card` in the pile.
    #[must_use]
    pub fn count(&self, card: Card) -> u32 {
        self.counts.get(&card).copied().unwrap_or(0)
    }

    /// Total cards in the pile.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Check if the pile is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (card, count) pairs in canonical card order, skipping absent cards.
    pub fn iter(&self) -> impl Iterator<Item = (Card, u32)> + '_ {
        Card::ALL
            .into_iter()
            .map(|card| (card, self.count(card)))
            .filter(|&(_, n)| n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, ScriptedRng};

    #[test]
    fn test_empty_deck_rebuilds_on_draw() {
        let mut deck = Deck::new();
        let mut rng = ScriptedRng::new();

        assert_eq!(deck.draw(&mut rng).unwrap(), Card::S1);
        assert_eq!(deck.len(), DECK_TEMPLATE.len() - 1);
        assert_eq!(deck.reshuffles(), 1);
    }

    #[test]
    fn test_draw_consumes_front() {
        let mut deck = Deck::from_cards([Card::S3, Card::S2]);
        let mut rng = ScriptedRng::new();

        assert_eq!(deck.draw(&mut rng).unwrap(), Card::S3);
        assert_eq!(deck.draw(&mut rng).unwrap(), Card::S2);
        assert!(deck.is_empty());
        assert_eq!(deck.reshuffles(), 0);
    }

    #[test]
    fn test_rebuild_uses_scripted_order() {
        let order = [Card::S3, Card::S1, Card::S2, Card::S1, Card::S2, Card::S1];
        let mut deck = Deck::new();
        let mut rng = ScriptedRng::new().with_deck_order(order);

        let drawn: Vec<_> = (0..6).map(|_| deck.draw(&mut rng).unwrap()).collect();
        assert_eq!(drawn, order);
    }

    #[test]
    fn test_rebuild_hands_out_its_front_card() {
        let order = [Card::S2, Card::S1, Card::S3, Card::S1, Card::S2, Card::S1];
        let mut deck = Deck::new();
        let mut rng = ScriptedRng::new().with_deck_order(order);

        assert_eq!(deck.draw(&mut rng).unwrap(), Card::S2);
        assert_eq!(deck.iter().collect::<Vec<_>>(), order[1..].to_vec());

        // Six more draws: five from this deck, one from a second rebuild.
        for _ in 0..6 {
            deck.draw(&mut rng).unwrap();
        }
        assert_eq!(deck.reshuffles(), 2);
        assert_eq!(deck.len(), DECK_TEMPLATE.len() - 1);
    }

    #[test]
    fn test_full_cycle_matches_template_counts() {
        let mut deck = Deck::new();
        let mut rng = GameRng::new(9);

        let mut drawn: Vec<_> = (0..6).map(|_| deck.draw(&mut rng).unwrap()).collect();
        drawn.sort_unstable();
        assert_eq!(drawn, DECK_TEMPLATE);
    }

    #[test]
    fn test_rebuild_propagates_rng_failure() {
        let mut deck = Deck::new();
        let mut rng = ScriptedRng::new().with_deck_order([Card::S1]);

        assert!(matches!(deck.draw(&mut rng), Err(RngError::InvalidScript(_))));
        assert!(deck.is_empty());
        assert_eq!(deck.reshuffles(), 0);
    }

    #[test]
    fn test_discard_counts() {
        let mut pile = DiscardPile::new();
        assert!(pile.is_empty());

        pile.add(Card::S2);
        pile.add(Card::S1);
        pile.add(Card::S2);

        assert_eq!(pile.count(Card::S2), 2);
        assert_eq!(pile.count(Card::S3), 0);
        assert_eq!(pile.len(), 3);
        assert_eq!(
            pile.iter().collect::<Vec<_>>(),
            vec![(Card::S1, 1), (Card::S2, 2)]
        );
    }
}
