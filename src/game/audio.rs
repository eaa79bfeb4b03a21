//! Audio Seam
//!
//! The simulation never plays sound. The runner maps events to cues and
//! hands them to an injected `AudioService`.

use serde::{Serialize, Deserialize};

/// Named sound effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Ground or wall jump
    Jump,
    /// Air jump
    DoubleJump,
    /// Damage landed
    Hit,
    /// Arrow released
    Shoot,
    /// Touchdown
    Land,
    /// Item pickup
    Collect,
    /// Dash
    Dash,
    /// Player melee swing
    Attack,
    /// Enemy melee strike
    EnemyAttack,
}

/// Sound output used by the runner.
pub trait AudioService {
    /// Prepare the output device. Called once before the first tick.
    fn init(&mut self) {}

    /// Resume after a suspend (e.g. first user gesture on some platforms).
    fn resume(&mut self) {}

    /// Play a cue. Must not block.
    fn play(&mut self, cue: SoundCue);
}

/// Discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioService for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Records cues in order, for tests and headless logging.
#[derive(Clone, Debug, Default)]
pub struct RecordingAudio {
    /// Cues played so far
    pub played: Vec<SoundCue>,
    /// Whether `init` ran
    pub initialized: bool,
}

impl AudioService for RecordingAudio {
    fn init(&mut self) {
        self.initialized = true;
    }

    fn play(&mut self, cue: SoundCue) {
        self.played.push(cue);
    }
}
