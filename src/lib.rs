//! # jeong-sim
//!
//! Turn-loop simulator for a single combat mechanic: a rotating suit, the
//! Bright resource that cycles and triggers the Kōzan finisher, and a
//! persistent two-slot card offer drawn from a small shuffled deck.
//!
//! ## Design Principles
//!
//! 1. **One owned state object**: every rule runs as a transition on a
//!    `JeongEngine`. There is no global state, so independent simulations
//!    run side by side.
//!
//! 2. **Injected randomness**: suit picks, coin flips and shuffles all go
//!    through `RandomSource`. Seed a `GameRng` for reproducible runs or
//!    script exact outcomes with `ScriptedRng`.
//!
//! 3. **Closed action set**: `Action` is an enum; invalid slots and
//!    out-of-order calls come back as typed errors.
//!
//! ## Modules
//!
//! - `core`: suits, cards, actions, errors, RNG
//! - `engine`: state, offer/deck rules, Bright cycle, Kōzan, turn loop
//! - `policy`: action policies and batch runs

pub mod core;
pub mod engine;
pub mod policy;

// Re-export commonly used types
pub use crate::core::{
    Action, Card, Suit, DECK_TEMPLATE, TurnPhase, Operation,
    EngineError, RngError,
    GameRng, GameRngState, RandomSource, ScriptedRng,
};

pub use crate::engine::{
    JeongEngine, JeongEngineBuilder, EngineState, EngineCheckpoint,
    TurnSnapshot, Resolution, EndOfTurn, FinisherResult, Coin,
    BrightState, BrightBonus, Offer, OfferEvent, Deck, DiscardPile,
};

pub use crate::policy::{
    ActionPolicy, FirstCardPolicy, MatchSeekingPolicy, RandomPolicy,
    EpisodeSummary, run_episode, run_batch,
};
