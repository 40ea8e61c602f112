//! Core vocabulary: suits, cards, actions, turn phases, errors, RNG.
//!
//! Everything here is rule-agnostic plumbing shared by the engine and the
//! policies. Rule logic lives in `engine`.

pub mod card;
pub mod action;
pub mod error;
pub mod rng;

pub use card::{Card, Suit, DECK_TEMPLATE};
pub use action::{Action, Operation, TurnPhase};
pub use error::{EngineError, RngError};
pub use rng::{GameRng, GameRngState, RandomSource, ScriptedRng};
