//! Policies and batch runs for comparing play strategies.
//!
//! - `ActionPolicy`: picks an action from a turn snapshot
//! - `run_episode`: drives one engine for N turns
//! - `run_batch`: many independent engines from one seed

pub mod policies;
pub mod episode;

pub use policies::{ActionPolicy, FirstCardPolicy, MatchSeekingPolicy, RandomPolicy};
pub use episode::{run_batch, run_episode, EpisodeSummary};
