//! The simulation engine.
//!
//! One [`JeongEngine`] owns a battle's suit, Bright cycle, deck, offer and
//! discard pile, and exposes the turn loop:
//!
//! ```
//! use jeong_sim::core::Action;
//! use jeong_sim::engine::JeongEngine;
//!
//! let mut engine = JeongEngine::seeded(42).unwrap();
//! let snapshot = engine.start_turn().unwrap();
//! assert_eq!(snapshot.offer.len(), 2);
//!
//! engine.resolve(Action::UseFirst).unwrap();
//! let end = engine.end_turn().unwrap();
//! assert!(end.potency <= 5);
//! ```

pub mod rules;
pub mod offer;
pub mod deck;
pub mod bright;
pub mod finisher;
pub mod records;
pub mod state;
pub mod simulation;

pub use bright::{BrightBonus, BrightState};
pub use deck::{Deck, DiscardPile};
pub use finisher::{Coin, FinisherResult};
pub use offer::{Offer, OfferEvent};
pub use records::{EndOfTurn, Resolution, TurnSnapshot};
pub use state::{EngineCheckpoint, EngineState};
pub use simulation::{JeongEngine, JeongEngineBuilder};
