//! Kōzan, the end-of-cycle finisher.
//!
//! Flips one weighted coin per point of potency, left to right, with no
//! early stop. The result is reported to the caller and never feeds back
//! into engine state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::rules::{FINISHER_THRESHOLD, HEADS_CHANCE, MAX_POTENCY};
use crate::core::{RandomSource, RngError};

/// One Kōzan coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coin {
    /// Hit.
    Heads,
    /// Miss.
    Tails,
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Coin::Heads => "H",
            Coin::Tails => "T",
        })
    }
}

/// Outcome of one Kōzan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinisherResult {
    /// Coins in flip order.
    pub flips: SmallVec<[Coin; MAX_POTENCY as usize]>,
    /// Number of heads.
    pub hits: u8,
    /// Potency the cycle ended with.
    pub potency_before: u8,
}

/// Run Kōzan for a cycle that ended at `potency`.
///
/// Returns `Ok(None)` below [`FINISHER_THRESHOLD`]; no coins are drawn then.
pub fn run_finisher<R: RandomSource + ?Sized>(
    potency: u8,
    rng: &mut R,
) -> Result<Option<FinisherResult>, RngError> {
    if potency < FINISHER_THRESHOLD {
        return Ok(None);
    }

    let mut flips = SmallVec::new();
    let mut hits = 0u8;
    for _ in 0..potency.min(MAX_POTENCY) {
        if rng.coin(HEADS_CHANCE)? {
            flips.push(Coin::Heads);
            hits += 1;
        } else {
            flips.push(Coin::Tails);
        }
    }

    Ok(Some(FinisherResult {
        flips,
        hits,
        potency_before: potency,
    }))
}
