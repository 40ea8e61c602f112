//! Fixed rule constants.

/// Bright potency cap. Reaching it ends the cycle.
pub const MAX_POTENCY: u8 = 5;

/// Turns per Bright cycle. `count` starts here and ticks down once per turn.
pub const CYCLE_LENGTH: u8 = 3;

/// Minimum potency at cycle end for Kōzan to fire.
pub const FINISHER_THRESHOLD: u8 = 3;

/// Chance that Defend (Counter) gains one Bright.
pub const COUNTER_CHANCE: f64 = 0.5;

/// Chance that each Kōzan coin lands heads.
pub const HEADS_CHANCE: f64 = 0.95;

/// Offer capacity.
pub const OFFER_SIZE: usize = 2;

/// Bright granted by EGO.
pub const EGO_GAIN: u8 = 2;
