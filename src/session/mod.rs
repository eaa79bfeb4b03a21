//! Session Layer
//!
//! Everything around a single match: the real-time runner that drives
//! ticks from frames, and the profile that carries gear, stash and rank
//! from one match to the next. Unlike `game/`, this layer may read the
//! clock; nothing it does feeds back into the simulation except inputs.

pub mod runner;
pub mod progress;

pub use runner::{FixedStepClock, MatchObserver, MatchRunner, NullObserver};
pub use progress::{OutcomeSummary, PlayerProfile};
