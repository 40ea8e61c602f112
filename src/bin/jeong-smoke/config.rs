//! Smoke-run configuration.
//!
//! All configuration is loaded from environment variables.

use std::str::FromStr;

use jeong_sim::{ActionPolicy, FirstCardPolicy, MatchSeekingPolicy, RandomPolicy};

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Parse failure.
        reason: String,
    },
}

/// Which policy drives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Play the first card, Defend on an empty offer.
    First,
    /// Chase suit matches.
    Match,
    /// Uniform random legal action.
    Random,
}

impl PolicyKind {
    /// Instantiate the policy. `seed` only matters for `Random`.
    pub fn build(self, seed: u64) -> Box<dyn ActionPolicy> {
        match self {
            PolicyKind::First => Box::new(FirstCardPolicy),
            PolicyKind::Match => Box::new(MatchSeekingPolicy),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(PolicyKind::First),
            "match" => Ok(PolicyKind::Match),
            "random" => Ok(PolicyKind::Random),
            other => Err(format!("unknown policy `{other}` (expected first, match or random)")),
        }
    }
}

/// Complete smoke-run configuration.
#[derive(Debug, Clone)]
pub struct SmokeConfig {
    /// Engine seed.
    pub seed: u64,
    /// Turns to play.
    pub turns: u32,
    /// Policy choosing each action.
    pub policy: PolicyKind,
}

impl SmokeConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `JEONG_SEED` -- engine seed (default 42)
    /// - `JEONG_TURNS` -- turns to play (default 2)
    /// - `JEONG_POLICY` -- `first`, `match` or `random` (default `first`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            seed: env_or("JEONG_SEED", 42)?,
            turns: env_or("JEONG_TURNS", 2)?,
            policy: env_or("JEONG_POLICY", PolicyKind::First)?,
        })
    }
}

fn env_or<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
