//! The turn loop.
//!
//! `start_turn` → `resolve` → `end_turn`, repeated until the caller stops.
//! Each operation stages its changes on a copy of the state and commits only
//! after every random draw succeeds, so a failing random source leaves the
//! engine where it was.

use smallvec::SmallVec;
use tracing::{debug, info};

use super::bright::{attack_bonuses, total_gain, BrightBonus, BrightState};
use super::deck::{Deck, DiscardPile};
use super::finisher::run_finisher;
use super::offer::{Offer, OfferEvent};
use super::records::{EndOfTurn, Resolution, TurnSnapshot};
use super::rules::COUNTER_CHANCE;
use super::state::{EngineCheckpoint, EngineState};
use crate::core::{Action, Card, EngineError, GameRng, Operation, RandomSource, Suit, TurnPhase};

/// Builder for [`JeongEngine`].
///
/// The only knobs are the random source and an optional starting state.
#[derive(Clone, Debug, Default)]
pub struct JeongEngineBuilder {
    initial_state: Option<EngineState>,
}

impl JeongEngineBuilder {
    /// Create a builder for a fresh battle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an explicit state instead of a fresh battle.
    #[must_use]
    pub fn initial_state(mut self, state: EngineState) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Build the engine around `rng`.
    ///
    /// A fresh battle draws its opening suit from `rng`.
    pub fn build<R: RandomSource>(self, mut rng: R) -> Result<JeongEngine<R>, EngineError> {
        let state = match self.initial_state {
            Some(state) => {
                state.validate()?;
                state
            }
            None => EngineState::new(rng.choose_suit()?),
        };
        debug!(suit = %state.suit, potency = state.bright.potency, count = state.bright.count, "engine built");

        Ok(JeongEngine {
            state,
            rng,
            phase: TurnPhase::AwaitingTurnStart,
            resolved_match: None,
        })
    }

    /// Build the engine around a seeded [`GameRng`].
    pub fn build_seeded(self, seed: u64) -> Result<JeongEngine<GameRng>, EngineError> {
        self.build(GameRng::new(seed))
    }
}

/// The simulation engine.
///
/// Owns all rules state and its random source. Independent instances share
/// nothing and can run side by side.
#[derive(Clone, Debug)]
pub struct JeongEngine<R = GameRng> {
    state: EngineState,
    rng: R,
    phase: TurnPhase,
    resolved_match: Option<bool>,
}

impl<R: RandomSource> JeongEngine<R> {
    /// Start a fresh battle.
    pub fn new(rng: R) -> Result<Self, EngineError> {
        JeongEngineBuilder::new().build(rng)
    }

    /// Start from an explicit state.
    pub fn with_state(rng: R, state: EngineState) -> Result<Self, EngineError> {
        JeongEngineBuilder::new().initial_state(state).build(rng)
    }

    // === Introspection ===

    /// Full rules state.
    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Current suit.
    #[must_use]
    pub fn suit(&self) -> Suit {
        self.state.suit
    }

    /// Bright potency, count and streak.
    #[must_use]
    pub fn bright(&self) -> BrightState {
        self.state.bright
    }

    /// Current offer.
    #[must_use]
    pub fn offer(&self) -> &Offer {
        &self.state.offer
    }

    /// Draw pile.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.state.deck
    }

    /// Discard pile.
    #[must_use]
    pub fn discard(&self) -> &DiscardPile {
        &self.state.discard
    }

    /// Turn-loop phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// The random source.
    #[must_use]
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Snapshot of the current state, without advancing anything.
    #[must_use]
    pub fn snapshot(&self) -> TurnSnapshot {
        self.snapshot_with(false)
    }

    fn snapshot_with(&self, suit_changed: bool) -> TurnSnapshot {
        let offer_len = self.state.offer.len();
        TurnSnapshot {
            turn: self.state.turn,
            suit: self.state.suit,
            suit_changed,
            potency: self.state.bright.potency,
            count: self.state.bright.count,
            streak: self.state.bright.streak,
            offer: self.state.offer.cards(),
            available_actions: Action::ALL
                .into_iter()
                .filter(|action| action.is_available(offer_len))
                .collect(),
        }
    }

    fn expect_phase(&self, operation: Operation, allowed: &[TurnPhase]) -> Result<(), EngineError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(EngineError::Sequence {
                operation,
                phase: self.phase,
            })
        }
    }

    // === Turn operations ===

    /// Begin a turn: apply a deferred suit shuffle, then refill the offer.
    ///
    /// Calling it again before `resolve` only re-snapshots; the offer is
    /// already full and the deferred shuffle already consumed.
    pub fn start_turn(&mut self) -> Result<TurnSnapshot, EngineError> {
        self.expect_phase(
            Operation::StartTurn,
            &[TurnPhase::AwaitingTurnStart, TurnPhase::AwaitingAction],
        )?;

        let mut suit = self.state.suit;
        let suit_changed = self.state.pending_suit_shuffle;
        if suit_changed {
            suit = self.rng.choose_suit()?;
        }

        let mut deck = self.state.deck.clone();
        let mut offer = self.state.offer;
        while !offer.is_full() {
            let card = deck.draw(&mut self.rng)?;
            offer.push(card);
        }

        self.state.suit = suit;
        self.state.pending_suit_shuffle = false;
        self.state.deck = deck;
        self.state.offer = offer;
        if self.phase == TurnPhase::AwaitingTurnStart {
            self.state.turn = self.state.turn.saturating_add(1);
            self.phase = TurnPhase::AwaitingAction;
        }

        let snapshot = self.snapshot_with(suit_changed);
        debug!(
            turn = snapshot.turn,
            suit = %snapshot.suit,
            suit_changed,
            potency = snapshot.potency,
            count = snapshot.count,
            offer = ?snapshot.offer,
            "turn started"
        );
        Ok(snapshot)
    }

    /// Resolve the player's action.
    pub fn resolve(&mut self, action: Action) -> Result<Resolution, EngineError> {
        self.expect_phase(Operation::Resolve, &[TurnPhase::AwaitingAction])?;

        let resolution = match action {
            Action::UseFirst | Action::UseSecond => self.attack(action)?,
            Action::Defend => self.defend()?,
            Action::Ego => self.ego(),
        };

        self.phase = TurnPhase::Resolved;
        self.resolved_match = Some(resolution.matched);
        debug!(
            %action,
            used_card = ?resolution.used_card,
            matched = resolution.matched,
            bright_delta = resolution.bright_delta,
            potency = resolution.potency,
            offer = ?resolution.offer,
            "action resolved"
        );
        Ok(resolution)
    }

    fn attack(&mut self, action: Action) -> Result<Resolution, EngineError> {
        let offer_len = self.state.offer.len();
        let slot = action.slot().unwrap_or(0);
        let card = self
            .state
            .offer
            .take(slot)
            .ok_or(EngineError::InvalidAction {
                action,
                slot,
                offer_len,
            })?;

        let used_suit = card.suit();
        let matched = used_suit == self.state.suit;
        let bonuses = attack_bonuses(card, matched, self.state.bright.streak);
        let bright_delta = self.state.bright.gain(total_gain(&bonuses));

        let mut offer_log = SmallVec::new();
        self.state.discard.add(card);
        offer_log.push(OfferEvent::Used { card, slot });

        if self.state.offer.len() == 1 {
            let follow = self.state.offer.iter().next();
            if let Some(follow) = follow {
                if follow.suit() == used_suit {
                    offer_log.push(OfferEvent::KeptSameColor { card: follow });
                } else {
                    self.state.offer.clear();
                    self.state.discard.add(follow);
                    offer_log.push(OfferEvent::DiscardedOffColor { card: follow });
                }
            }
        }
        self.state.offer.compact();

        Ok(self.resolution(action, Some(card), matched, bonuses, bright_delta, offer_log))
    }

    fn defend(&mut self) -> Result<Resolution, EngineError> {
        let countered = self.rng.coin(COUNTER_CHANCE)?;

        let offer_log = self.discard_first();
        let mut bonuses = SmallVec::new();
        if countered {
            bonuses.push(BrightBonus::Counter);
        }
        let bright_delta = self.state.bright.gain(total_gain(&bonuses));
        self.state.pending_suit_shuffle = true;

        Ok(self.resolution(Action::Defend, None, false, bonuses, bright_delta, offer_log))
    }

    fn ego(&mut self) -> Resolution {
        let offer_log = self.discard_first();
        let mut bonuses = SmallVec::new();
        bonuses.push(BrightBonus::Ego);
        let bright_delta = self.state.bright.gain(total_gain(&bonuses));

        self.resolution(Action::Ego, None, true, bonuses, bright_delta, offer_log)
    }

    fn discard_first(&mut self) -> SmallVec<[OfferEvent; 2]> {
        let mut offer_log = SmallVec::new();
        if let Some(card) = self.state.offer.take(0) {
            self.state.discard.add(card);
            offer_log.push(OfferEvent::DiscardedFirst { card });
        }
        self.state.offer.compact();
        offer_log
    }

    fn resolution(
        &self,
        action: Action,
        used_card: Option<Card>,
        matched: bool,
        bonuses: SmallVec<[BrightBonus; 3]>,
        bright_delta: u8,
        offer_log: SmallVec<[OfferEvent; 2]>,
    ) -> Resolution {
        Resolution {
            action,
            used_card,
            matched,
            bonuses,
            bright_delta,
            potency: self.state.bright.potency,
            count: self.state.bright.count,
            offer: self.state.offer.cards(),
            offer_log,
            suit_shuffle_pending: self.state.pending_suit_shuffle,
        }
    }

    /// Finish the turn: tick the count, then end and reset the cycle if
    /// potency is capped or the count ran out, firing Kōzan at potency 3+.
    pub fn end_turn(&mut self) -> Result<EndOfTurn, EngineError> {
        self.expect_phase(Operation::EndTurn, &[TurnPhase::Resolved])?;

        let matched = self.resolved_match.unwrap_or(false);
        let mut bright = self.state.bright;
        bright.tick();

        if !bright.cycle_ended() {
            bright.streak = matched;
            self.state.bright = bright;
            self.finish_turn();
            return Ok(EndOfTurn {
                potency: bright.potency,
                count: bright.count,
                cycle_reset: false,
                suit_shuffle_pending: self.state.pending_suit_shuffle,
                new_suit: None,
                finisher: None,
            });
        }

        let potency_before = bright.potency;
        let finisher = run_finisher(potency_before, &mut self.rng)?;
        let new_suit = self.rng.choose_suit()?;

        bright.reset();
        self.state.bright = bright;
        self.state.suit = new_suit;
        self.state.pending_suit_shuffle = false;
        self.finish_turn();

        info!(
            potency_before,
            hits = finisher.as_ref().map(|f| f.hits),
            flips = ?finisher.as_ref().map(|f| f.flips.clone()),
            %new_suit,
            "bright cycle reset"
        );

        Ok(EndOfTurn {
            potency: bright.potency,
            count: bright.count,
            cycle_reset: true,
            suit_shuffle_pending: false,
            new_suit: Some(new_suit),
            finisher,
        })
    }

    fn finish_turn(&mut self) {
        self.phase = TurnPhase::AwaitingTurnStart;
        self.resolved_match = None;
    }
}

impl JeongEngine<GameRng> {
    /// Start a fresh battle from a seed.
    pub fn seeded(seed: u64) -> Result<Self, EngineError> {
        JeongEngineBuilder::new().build_seeded(seed)
    }

    /// Branch an independent copy of this simulation.
    ///
    /// The copy shares no state with `self` and draws from a forked RNG, so
    /// both can continue on their own.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        Self {
            state: self.state.clone(),
            rng: self.rng.fork(),
            phase: self.phase,
            resolved_match: self.resolved_match,
        }
    }

    /// Capture state, phase and RNG position.
    #[must_use]
    pub fn checkpoint(&self) -> EngineCheckpoint {
        EngineCheckpoint {
            state: self.state.clone(),
            rng: self.rng.state(),
            phase: self.phase,
            resolved_match: self.resolved_match,
        }
    }

    /// Rebuild an engine from a checkpoint.
    pub fn restore(checkpoint: &EngineCheckpoint) -> Result<Self, EngineError> {
        checkpoint.state.validate()?;
        Ok(Self {
            state: checkpoint.state.clone(),
            rng: GameRng::from_state(&checkpoint.rng),
            phase: checkpoint.phase,
            resolved_match: checkpoint.resolved_match,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RngError, ScriptedRng};

    fn engine_with(
        suit: Suit,
        offer: &[Card],
        rng: ScriptedRng,
    ) -> JeongEngine<ScriptedRng> {
        let state = EngineState::new(suit).with_offer(Offer::from_cards(offer).unwrap());
        JeongEngine::with_state(rng, state).unwrap()
    }

    #[test]
    fn test_fresh_engine_draws_opening_suit() {
        let engine = JeongEngine::new(ScriptedRng::new().with_suits([Suit::Blue])).unwrap();
        assert_eq!(engine.suit(), Suit::Blue);
        assert_eq!(engine.phase(), TurnPhase::AwaitingTurnStart);
        assert!(engine.deck().is_empty());
        assert!(engine.offer().is_empty());
    }

    #[test]
    fn test_builder_rejects_invalid_state() {
        let state = EngineState::new(Suit::Red).with_bright(7, 1);
        let result = JeongEngine::with_state(ScriptedRng::new(), state);
        assert!(matches!(result, Err(EngineError::InvalidState(_))));
    }

    #[test]
    fn test_start_turn_fills_offer_from_template() {
        let mut engine = JeongEngine::new(ScriptedRng::new().with_suits([Suit::Red])).unwrap();

        let snapshot = engine.start_turn().unwrap();

        assert_eq!(snapshot.turn, 1);
        assert_eq!(snapshot.offer.as_slice(), &[Card::S1, Card::S1]);
        assert_eq!(engine.deck().len(), 4);
        assert_eq!(
            snapshot.available_actions.as_slice(),
            &[Action::UseFirst, Action::UseSecond, Action::Defend, Action::Ego]
        );
    }

    #[test]
    fn test_second_start_turn_is_harmless() {
        let mut engine = JeongEngine::new(ScriptedRng::new().with_suits([Suit::Red])).unwrap();
        let first = engine.start_turn().unwrap();
        let second = engine.start_turn().unwrap();

        assert_eq!(first, second);
        assert_eq!(engine.deck().len(), 4);
    }

    #[test]
    fn test_attack_discards_off_color_follow_up() {
        let mut engine = engine_with(Suit::Red, &[Card::S1, Card::S2], ScriptedRng::new());
        engine.start_turn().unwrap();

        let resolution = engine.resolve(Action::UseFirst).unwrap();

        assert_eq!(resolution.used_card, Some(Card::S1));
        assert!(resolution.matched);
        assert_eq!(resolution.bright_delta, 1);
        assert!(resolution.offer.is_empty());
        assert_eq!(
            resolution.offer_log.as_slice(),
            &[
                OfferEvent::Used { card: Card::S1, slot: 0 },
                OfferEvent::DiscardedOffColor { card: Card::S2 },
            ]
        );
        assert_eq!(engine.discard().count(Card::S1), 1);
        assert_eq!(engine.discard().count(Card::S2), 1);
    }

    #[test]
    fn test_attack_keeps_same_color_follow_up() {
        let mut engine = engine_with(Suit::Red, &[Card::S1, Card::S1], ScriptedRng::new());
        engine.start_turn().unwrap();

        let resolution = engine.resolve(Action::UseFirst).unwrap();

        assert_eq!(resolution.offer.as_slice(), &[Card::S1]);
        assert_eq!(engine.discard().len(), 1);
        assert!(engine.offer().is_compact());
    }

    #[test]
    fn test_use_second_shifts_survivor_into_first_slot() {
        let mut engine = engine_with(Suit::Blue, &[Card::S3, Card::S3], ScriptedRng::new());
        engine.start_turn().unwrap();

        let resolution = engine.resolve(Action::UseSecond).unwrap();

        assert_eq!(engine.offer().first(), Some(Card::S3));
        assert_eq!(resolution.bright_delta, 2);
    }

    #[test]
    fn test_use_second_needs_two_cards() {
        let mut engine = engine_with(Suit::Red, &[Card::S1], ScriptedRng::new());
        // Skip the refill by moving straight to the action phase.
        engine.phase = TurnPhase::AwaitingAction;

        let err = engine.resolve(Action::UseSecond).unwrap_err();

        assert!(matches!(
            err,
            EngineError::InvalidAction { action: Action::UseSecond, slot: 1, offer_len: 1 }
        ));
        assert_eq!(engine.phase(), TurnPhase::AwaitingAction);
        assert_eq!(engine.offer().len(), 1);
    }

    #[test]
    fn test_use_first_needs_a_card() {
        let mut engine = engine_with(Suit::Red, &[], ScriptedRng::new());
        engine.phase = TurnPhase::AwaitingAction;

        assert!(matches!(
            engine.resolve(Action::UseFirst),
            Err(EngineError::InvalidAction { slot: 0, offer_len: 0, .. })
        ));
    }

    #[test]
    fn test_defend_discards_first_regardless_of_color() {
        let rng = ScriptedRng::new().with_coins([true]);
        let mut engine = engine_with(Suit::Red, &[Card::S1, Card::S1], rng);
        engine.start_turn().unwrap();

        let resolution = engine.resolve(Action::Defend).unwrap();

        assert!(!resolution.matched);
        assert_eq!(resolution.bonuses.as_slice(), &[BrightBonus::Counter]);
        assert_eq!(resolution.bright_delta, 1);
        assert_eq!(resolution.offer.as_slice(), &[Card::S1]);
        assert!(resolution.suit_shuffle_pending);
        assert_eq!(engine.suit(), Suit::Red);
    }

    #[test]
    fn test_defend_failed_counter() {
        let rng = ScriptedRng::new().with_coins([false]);
        let mut engine = engine_with(Suit::Red, &[Card::S2, Card::S3], rng);
        engine.start_turn().unwrap();

        let resolution = engine.resolve(Action::Defend).unwrap();

        assert!(resolution.bonuses.is_empty());
        assert_eq!(resolution.bright_delta, 0);
        assert_eq!(resolution.offer.as_slice(), &[Card::S3]);
    }

    #[test]
    fn test_defend_rng_failure_leaves_offer() {
        let mut engine = engine_with(Suit::Red, &[Card::S2, Card::S3], ScriptedRng::new());
        engine.start_turn().unwrap();

        assert!(matches!(
            engine.resolve(Action::Defend),
            Err(EngineError::Rng(RngError::Exhausted { stream: "coin" }))
        ));
        assert_eq!(engine.offer().len(), 2);
        assert_eq!(engine.phase(), TurnPhase::AwaitingAction);
    }

    #[test]
    fn test_ego_always_matches() {
        let state = EngineState::new(Suit::Yellow)
            .with_offer(Offer::from_cards(&[Card::S1, Card::S2]).unwrap())
            .with_streak(true);
        let mut engine = JeongEngine::with_state(ScriptedRng::new(), state).unwrap();
        engine.start_turn().unwrap();

        let resolution = engine.resolve(Action::Ego).unwrap();

        assert!(resolution.matched);
        assert_eq!(resolution.bright_delta, 2);
        assert_eq!(resolution.offer.as_slice(), &[Card::S2]);
        assert_eq!(
            resolution.offer_log.as_slice(),
            &[OfferEvent::DiscardedFirst { card: Card::S1 }]
        );
    }

    #[test]
    fn test_sequence_errors() {
        let mut engine = engine_with(Suit::Red, &[Card::S1, Card::S1], ScriptedRng::new());

        assert!(matches!(
            engine.resolve(Action::Ego),
            Err(EngineError::Sequence { operation: Operation::Resolve, phase: TurnPhase::AwaitingTurnStart })
        ));
        assert!(matches!(
            engine.end_turn(),
            Err(EngineError::Sequence { operation: Operation::EndTurn, .. })
        ));

        engine.start_turn().unwrap();
        assert!(matches!(
            engine.end_turn(),
            Err(EngineError::Sequence { phase: TurnPhase::AwaitingAction, .. })
        ));

        engine.resolve(Action::Ego).unwrap();
        assert!(matches!(
            engine.start_turn(),
            Err(EngineError::Sequence { operation: Operation::StartTurn, phase: TurnPhase::Resolved })
        ));
        assert!(matches!(
            engine.resolve(Action::Ego),
            Err(EngineError::Sequence { phase: TurnPhase::Resolved, .. })
        ));

        engine.end_turn().unwrap();
        assert_eq!(engine.phase(), TurnPhase::AwaitingTurnStart);
    }

    #[test]
    fn test_end_turn_rng_failure_is_atomic() {
        let state = EngineState::new(Suit::Red)
            .with_offer(Offer::from_cards(&[Card::S1, Card::S1]).unwrap())
            .with_bright(4, 3);
        let mut engine = JeongEngine::with_state(ScriptedRng::new(), state).unwrap();
        engine.start_turn().unwrap();
        engine.resolve(Action::UseFirst).unwrap();

        assert!(matches!(engine.end_turn(), Err(EngineError::Rng(_))));
        assert_eq!(engine.bright().potency, 5);
        assert_eq!(engine.bright().count, 3);
        assert_eq!(engine.phase(), TurnPhase::Resolved);
    }

    #[test]
    fn test_fork_is_independent() {
        let mut engine = JeongEngine::seeded(11).unwrap();
        engine.start_turn().unwrap();
        let mut branch = engine.fork();

        branch.resolve(Action::Ego).unwrap();
        branch.end_turn().unwrap();

        assert_eq!(engine.phase(), TurnPhase::AwaitingAction);
        assert_eq!(engine.bright().potency, 0);
        assert_eq!(branch.bright().potency, 2);
    }

    #[test]
    fn test_checkpoint_restore_continues_identically() {
        let mut engine = JeongEngine::seeded(5).unwrap();
        engine.start_turn().unwrap();
        engine.resolve(Action::Defend).unwrap();

        let bytes = engine.checkpoint().to_bytes().unwrap();
        let mut restored =
            JeongEngine::restore(&EngineCheckpoint::from_bytes(&bytes).unwrap()).unwrap();

        assert_eq!(engine.end_turn().unwrap(), restored.end_turn().unwrap());
        assert_eq!(engine.start_turn().unwrap(), restored.start_turn().unwrap());
        assert_eq!(engine.state(), restored.state());
    }

    #[test]
    fn test_turn_counter_saturates() {
        let mut state = EngineState::new(Suit::Red);
        state.turn = u32::MAX;
        let mut engine = JeongEngine::with_state(ScriptedRng::new(), state).unwrap();

        assert_eq!(engine.start_turn().unwrap().turn, u32::MAX);
    }
}
