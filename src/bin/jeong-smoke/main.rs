//! Non-interactive smoke run.
//!
//! Plays a short battle with a fixed policy and logs every turn record.
//! Usage: `JEONG_TURNS=9 JEONG_POLICY=match cargo run --bin jeong-smoke`

mod config;

use tracing::info;
use tracing_subscriber::EnvFilter;

use jeong_sim::{EpisodeSummary, JeongEngine};

use crate::config::SmokeConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = SmokeConfig::from_env()?;
    info!(seed = config.seed, turns = config.turns, policy = ?config.policy, "smoke run starting");

    let mut engine = JeongEngine::seeded(config.seed)?;
    let mut policy = config.policy.build(config.seed);
    let mut summary = EpisodeSummary::new();

    for _ in 0..config.turns {
        let snapshot = engine.start_turn()?;
        info!(
            turn = snapshot.turn,
            suit = %snapshot.suit,
            potency = snapshot.potency,
            count = snapshot.count,
            offer = ?snapshot.offer,
            "turn"
        );

        let action = policy.choose(&snapshot);
        let resolution = engine.resolve(action)?;
        info!(
            %action,
            matched = resolution.matched,
            bonuses = ?resolution.bonuses,
            bright_delta = resolution.bright_delta,
            offer_log = ?resolution.offer_log,
            "resolved"
        );

        let end = engine.end_turn()?;
        if let Some(finisher) = &end.finisher {
            let flips: Vec<String> = finisher.flips.iter().map(ToString::to_string).collect();
            info!(flips = %flips.join(", "), hits = finisher.hits, "kozan");
        }
        info!(
            potency = end.potency,
            count = end.count,
            cycle_reset = end.cycle_reset,
            new_suit = ?end.new_suit,
            suit_shuffle_pending = end.suit_shuffle_pending,
            "end of turn"
        );

        summary.record(&resolution, &end);
    }

    info!(
        turns = summary.turns,
        cycles = summary.cycles,
        finishers = summary.finishers,
        hits = summary.hits,
        policy = policy.name(),
        "smoke run complete"
    );
    println!("JeongSimulator smoke run complete.");
    Ok(())
}
