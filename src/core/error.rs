//! Error types for the simulator.
//!
//! Engine operations return [`EngineError`]; random sources return
//! [`RngError`], which the engine propagates unchanged.

use super::action::{Action, Operation, TurnPhase};

/// Failures reported by a [`RandomSource`](super::rng::RandomSource).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RngError {
    /// A uniform pick was requested from an empty range.
    #[error("cannot choose from an empty range")]
    EmptyChoice,

    /// A Bernoulli probability outside `[0, 1]`.
    #[error("probability {0} outside [0, 1]")]
    InvalidProbability(f64),

    /// A scripted stream ran out of values.
    #[error("scripted {stream} stream exhausted")]
    Exhausted {
        /// Which stream ran dry (`index` or `coin`).
        stream: &'static str,
    },

    /// A scripted value cannot satisfy the request.
    #[error("invalid scripted value: {0}")]
    InvalidScript(String),
}

/// Errors returned by the simulation engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The action names an offer slot that is empty.
    #[error("{action} needs offer slot {slot} but the offer holds {offer_len} card(s)")]
    InvalidAction {
        /// The rejected action.
        action: Action,
        /// Slot the action tried to play.
        slot: usize,
        /// Cards in the offer when it was rejected.
        offer_len: usize,
    },

    /// An operation was called out of turn order.
    #[error("{operation} called while {phase}")]
    Sequence {
        /// The rejected operation.
        operation: Operation,
        /// Phase the engine was in.
        phase: TurnPhase,
    },

    /// An explicit initial state is out of range.
    #[error("invalid initial state: {0}")]
    InvalidState(String),

    /// The random source failed.
    #[error(transparent)]
    Rng(#[from] RngError),

    /// A checkpoint could not be encoded or decoded.
    #[error("checkpoint codec error: {0}")]
    Checkpoint(#[from] bincode::Error),
}
