//! Running policies against the engine and tallying results.

use serde::{Deserialize, Serialize};

use super::policies::ActionPolicy;
use crate::core::{EngineError, GameRng, RandomSource};
use crate::engine::{EndOfTurn, JeongEngine, Resolution};

/// Totals collected over one or more episodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Turns played.
    pub turns: u32,
    /// Turns whose action matched.
    pub matches: u32,
    /// Bright cycles completed.
    pub cycles: u32,
    /// Cycles that fired Kōzan.
    pub finishers: u32,
    /// Kōzan coins flipped.
    pub flips: u32,
    /// Kōzan heads.
    pub hits: u32,
}

impl EpisodeSummary {
    /// Create empty totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished turn into the totals.
    pub fn record(&mut self, resolution: &Resolution, end: &EndOfTurn) {
        self.turns = self.turns.saturating_add(1);
        if resolution.matched {
            self.matches = self.matches.saturating_add(1);
        }
        if end.cycle_reset {
            self.cycles = self.cycles.saturating_add(1);
        }
        if let Some(finisher) = &end.finisher {
            self.finishers = self.finishers.saturating_add(1);
            self.flips = self.flips.saturating_add(finisher.flips.len() as u32);
            self.hits = self.hits.saturating_add(u32::from(finisher.hits));
        }
    }

    /// Add another summary's totals.
    pub fn merge(&mut self, other: &EpisodeSummary) {
        self.turns = self.turns.saturating_add(other.turns);
        self.matches = self.matches.saturating_add(other.matches);
        self.cycles = self.cycles.saturating_add(other.cycles);
        self.finishers = self.finishers.saturating_add(other.finishers);
        self.flips = self.flips.saturating_add(other.flips);
        self.hits = self.hits.saturating_add(other.hits);
    }

    /// Kōzan hits per turn played.
    #[must_use]
    pub fn hits_per_turn(&self) -> f64 {
        if self.turns == 0 {
            0.0
        } else {
            self.hits as f64 / self.turns as f64
        }
    }

    /// Fraction of turns that matched.
    #[must_use]
    pub fn match_rate(&self) -> f64 {
        if self.turns == 0 {
            0.0
        } else {
            self.matches as f64 / self.turns as f64
        }
    }
}

/// Play `turns` full turns with `policy`.
pub fn run_episode<R, P>(
    engine: &mut JeongEngine<R>,
    policy: &mut P,
    turns: u32,
) -> Result<EpisodeSummary, EngineError>
where
    R: RandomSource,
    P: ActionPolicy + ?Sized,
{
    let mut summary = EpisodeSummary::new();
    for _ in 0..turns {
        let snapshot = engine.start_turn()?;
        let action = policy.choose(&snapshot);
        let resolution = engine.resolve(action)?;
        let end = engine.end_turn()?;
        summary.record(&resolution, &end);
    }
    Ok(summary)
}

/// Play `episodes` independent battles of `turns` turns each.
///
/// Every battle runs on its own engine seeded from a fork of one root RNG,
/// so the batch is reproducible from `seed` alone.
pub fn run_batch<P, F>(
    seed: u64,
    episodes: u32,
    turns: u32,
    mut make_policy: F,
) -> Result<EpisodeSummary, EngineError>
where
    P: ActionPolicy,
    F: FnMut(u32) -> P,
{
    let mut root = GameRng::new(seed);
    let mut total = EpisodeSummary::new();
    for episode in 0..episodes {
        let mut engine = JeongEngine::new(root.fork())?;
        let mut policy = make_policy(episode);
        let summary = run_episode(&mut engine, &mut policy, turns)?;
        total.merge(&summary);
    }
    Ok(total)
}
