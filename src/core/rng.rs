//! Injectable random sources.
//!
//! Every random decision the engine makes goes through [`RandomSource`]:
//! suit picks, Bernoulli trials (Defend counter, Kōzan coins) and deck
//! shuffles. Two implementations ship with the crate:
//!
//! - [`GameRng`]: deterministic ChaCha8 generator, forkable and checkpointable.
//! - [`ScriptedRng`]: queue-backed stand-in for tests and scenario replays.
//!
//! ```
//! use jeong_sim::core::{GameRng, RandomSource};
//!
//! let mut rng = GameRng::new(42);
//! let mut branch = rng.fork();
//!
//! // Same seed and fork counter give the same branch.
//! let mut rng2 = GameRng::new(42);
//! let mut branch2 = rng2.fork();
//! assert_eq!(branch.choose_index(3).unwrap(), branch2.choose_index(3).unwrap());
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::card::{Card, Suit};
use super::error::RngError;

/// Source of randomness consumed by the engine.
pub trait RandomSource {
    /// Uniform index in `0..len`.
    fn choose_index(&mut self, len: usize) -> Result<usize, RngError>;

    /// Bernoulli trial succeeding with `probability`.
    fn coin(&mut self, probability: f64) -> Result<bool, RngError>;

    /// Permute a freshly rebuilt deck in place.
    fn shuffle_cards(&mut self, cards: &mut [Card]) -> Result<(), RngError>;

    /// Uniform suit pick.
    fn choose_suit(&mut self) -> Result<Suit, RngError> {
        let idx = self.choose_index(Suit::ALL.len())?;
        Suit::ALL
            .get(idx)
            .copied()
            .ok_or_else(|| RngError::InvalidScript(format!("suit index {idx} out of range")))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn choose_index(&mut self, len: usize) -> Result<usize, RngError> {
        (**self).choose_index(len)
    }

    fn coin(&mut self, probability: f64) -> Result<bool, RngError> {
        (**self).coin(probability)
    }

    fn shuffle_cards(&mut self, cards: &mut [Card]) -> Result<(), RngError> {
        (**self).shuffle_cards(cards)
    }
}

/// Deterministic RNG with forking for independent simulations.
///
/// Uses ChaCha8 for speed while keeping a reproducible stream per seed.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

impl RandomSource for GameRng {
    fn choose_index(&mut self, len: usize) -> Result<usize, RngError> {
        if len == 0 {
            return Err(RngError::EmptyChoice);
        }
        Ok(self.inner.gen_range(0..len))
    }

    fn coin(&mut self, probability: f64) -> Result<bool, RngError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(RngError::InvalidProbability(probability));
        }
        Ok(self.inner.gen_bool(probability))
    }

    fn shuffle_cards(&mut self, cards: &mut [Card]) -> Result<(), RngError> {
        use rand::seq::SliceRandom;
        cards.shuffle(&mut self.inner);
        Ok(())
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Seed the stream started from
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}

/// Scripted random source.
///
/// Values are consumed front to back from three independent queues:
/// - indices (suit picks), error when exhausted
/// - coin outcomes (Defend counter, Kōzan flips), error when exhausted
/// - deck orders; when none is queued the deck keeps template order
///
/// ```
/// use jeong_sim::core::{RandomSource, ScriptedRng, Suit};
///
/// let mut rng = ScriptedRng::new().with_suits([Suit::Blue]).with_coins([true]);
/// assert_eq!(rng.choose_suit().unwrap(), Suit::Blue);
/// assert!(rng.coin(0.5).unwrap());
/// assert!(rng.coin(0.5).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    indices: VecDeque<usize>,
    coins: VecDeque<bool>,
    deck_orders: VecDeque<Vec<Card>>,
}

impl ScriptedRng {
    /// Create an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw uniform indices.
    #[must_use]
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    /// Queue suit picks (stored as indices into [`Suit::ALL`]).
    #[must_use]
    pub fn with_suits(mut self, suits: impl IntoIterator<Item = Suit>) -> Self {
        self.indices.extend(suits.into_iter().map(Suit::index));
        self
    }

    /// Queue Bernoulli outcomes. The requested probability is ignored.
    #[must_use]
    pub fn with_coins(mut self, coins: impl IntoIterator<Item = bool>) -> Self {
        self.coins.extend(coins);
        self
    }

    /// Queue the order the next deck rebuild should take.
    #[must_use]
    pub fn with_deck_order(mut self, order: impl IntoIterator<Item = Card>) -> Self {
        self.deck_orders.push_back(order.into_iter().collect());
        self
    }

    /// Values left in each queue: (indices, coins, deck orders).
    #[must_use]
    pub fn remaining(&self) -> (usize, usize, usize) {
        (self.indices.len(), self.coins.len(), self.deck_orders.len())
    }
}

impl RandomSource for ScriptedRng {
    fn choose_index(&mut self, len: usize) -> Result<usize, RngError> {
        let idx = self
            .indices
            .pop_front()
            .ok_or(RngError::Exhausted { stream: "index" })?;
        if idx >= len {
            return Err(RngError::InvalidScript(format!(
                "index {idx} out of range 0..{len}"
            )));
        }
        Ok(idx)
    }

    fn coin(&mut self, _probability: f64) -> Result<bool, RngError> {
        self.coins.pop_front().ok_or(RngError::Exhausted { stream: "coin" })
    }

    fn shuffle_cards(&mut self, cards: &mut [Card]) -> Result<(), RngError> {
        let Some(order) = self.deck_orders.pop_front() else {
            return Ok(());
        };

        let mut expected = cards.to_vec();
        let mut given = order.clone();
        expected.sort_unstable();
        given.sort_unstable();
        if expected != given {
            return Err(RngError::InvalidScript(format!(
                "deck order {order:?} is not a permutation of {cards:?}"
            )));
        }

        cards.copy_from_slice(&order);
        Ok(())
    }
}
