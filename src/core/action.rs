//! Player actions and turn phases.
//!
//! Actions form a closed set. Attacks name an offer slot; Defend and EGO
//! consume the first slot (if any) without playing it.

use serde::{Deserialize, Serialize};

/// An action the player can take on their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Play the card in offer slot 0.
    UseFirst,
    /// Play the card in offer slot 1.
    UseSecond,
    /// Counter: discard slot 0, maybe gain Bright, reshuffle the suit next turn.
    Defend,
    /// EGO: always matches, +2 Bright.
    Ego,
}

impl Action {
    /// All actions in menu order.
    pub const ALL: [Action; 4] = [Action::UseFirst, Action::UseSecond, Action::Defend, Action::Ego];

    /// Offer slot this action plays, if it is an attack.
    #[must_use]
    pub const fn slot(self) -> Option<usize> {
        match self {
            Action::UseFirst => Some(0),
            Action::UseSecond => Some(1),
            Action::Defend | Action::Ego => None,
        }
    }

    /// Is this action legal with an offer of `offer_len` cards?
    #[must_use]
    pub const fn is_available(self, offer_len: usize) -> bool {
        match self.slot() {
            Some(slot) => slot < offer_len,
            None => true,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::UseFirst => "use_first",
            Action::UseSecond => "use_second",
            Action::Defend => "defend",
            Action::Ego => "ego",
        };
        f.write_str(name)
    }
}

/// Where the engine is inside the turn loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for `start_turn`.
    #[default]
    AwaitingTurnStart,
    /// Offer dealt, waiting for `resolve`.
    AwaitingAction,
    /// Action resolved, waiting for `end_turn`.
    Resolved,
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TurnPhase::AwaitingTurnStart => "awaiting turn start",
            TurnPhase::AwaitingAction => "awaiting action",
            TurnPhase::Resolved => "resolved",
        };
        f.write_str(name)
    }
}

/// Engine operation, used when reporting sequencing errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// `start_turn`
    StartTurn,
    /// `resolve`
    Resolve,
    /// `end_turn`
    EndTurn,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::StartTurn => "start_turn",
            Operation::Resolve => "resolve",
            Operation::EndTurn => "end_turn",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_slots() {
        assert_eq!(Action::UseFirst.slot(), Some(0));
        assert_eq!(Action::UseSecond.slot(), Some(1));
        assert_eq!(Action::Defend.slot(), None);
        assert_eq!(Action::Ego.slot(), None);
    }

    #[test]
    fn test_availability() {
        assert!(!Action::UseFirst.is_available(0));
        assert!(Action::UseFirst.is_available(1));
        assert!(!Action::UseSecond.is_available(1));
        assert!(Action::UseSecond.is_available(2));
        assert!(Action::Defend.is_available(0));
        assert!(Action::Ego.is_available(0));
    }

    #[test]
    fn test_action_serialization() {
        for action in Action::ALL {
            let json = serde_json::to_string(&action).unwrap();
            let back: Action = serde_json::from_str(&json).unwrap();
            assert_eq!(action, back);
        }
    }

    #[test]
    fn test_default_phase() {
        assert_eq!(TurnPhase::default(), TurnPhase::AwaitingTurnStart);
        assert_eq!(format!("{}", Operation::EndTurn), "end_turn");
    }
}
