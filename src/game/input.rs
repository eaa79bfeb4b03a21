//! Input Capture and Recording
//!
//! One `InputFrame` of key levels per tick. Edge detection (fresh jump
//! presses, bow release) happens inside the simulation, so a frame only
//! carries which keys are held.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};

// =============================================================================
// KEYS
// =============================================================================

/// Logical keys the simulation reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Key {
    /// Move left
    Left = 0,
    /// Move right
    Right = 1,
    /// Drop off a wall
    Down = 2,
    /// Jump, double jump, wall jump
    Jump = 3,
    /// Attack or draw the bow
    Action = 4,
    /// Dash
    Dash = 5,
    /// Switch to the primary weapon
    SelectPrimary = 6,
    /// Switch to the secondary weapon
    SelectSecondary = 7,
}

impl Key {
    /// All keys in bit order.
    pub const ALL: [Key; 8] = [
        Key::Left,
        Key::Right,
        Key::Down,
        Key::Jump,
        Key::Action,
        Key::Dash,
        Key::SelectPrimary,
        Key::SelectSecondary,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Held keys for a single tick, packed one bit per key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputFrame {
    keys: u8,
}

impl InputFrame {
    /// Nothing held.
    pub const fn new() -> Self {
        Self { keys: 0 }
    }

    /// Frame from raw bits.
    pub const fn from_bits(keys: u8) -> Self {
        Self { keys }
    }

    /// Frame holding every listed key.
    pub fn from_keys(keys: &[Key]) -> Self {
        keys.iter().fold(Self::new(), |frame, key| frame.with(*key))
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(&self) -> u8 {
        self.keys
    }

    /// Copy with `key` held.
    #[inline]
    pub const fn with(self, key: Key) -> Self {
        Self { keys: self.keys | key.bit() }
    }

    /// Whether `key` is held.
    #[inline]
    pub const fn is_down(&self, key: Key) -> bool {
        self.keys & key.bit() != 0
    }

    /// Set or clear a key.
    #[inline]
    pub fn set(&mut self, key: Key, down: bool) {
        if down {
            self.keys |= key.bit();
        } else {
            self.keys &= !key.bit();
        }
    }

    /// Check if this is an idle frame (no input).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.keys == 0
    }
}

/// Delta-compressed input: the frame that starts at `tick`.
///
/// Only stored when input changes, not every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

impl InputDelta {
    /// Create new delta entry.
    pub fn new(tick: u32, frame: InputFrame) -> Self {
        Self { tick, frame }
    }
}

// =============================================================================
// INPUT BUFFER
// =============================================================================

/// Complete input recording for one match.
///
/// Used for replay and for checking that a replay reaches the same hash.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerInputBuffer {
    /// Match identifier
    pub match_id: [u8; 16],

    /// RNG seed used for this match
    pub rng_seed: u64,

    /// Starting tick (usually 0)
    pub start_tick: u32,

    /// Last recorded tick
    pub end_tick: u32,

    /// Ticks recorded so far
    recorded_ticks: u32,

    /// Only ticks where input CHANGED.
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_frame: InputFrame,
}

impl PlayerInputBuffer {
    /// Create a new input buffer.
    pub fn new(match_id: [u8; 16], rng_seed: u64) -> Self {
        Self {
            match_id,
            rng_seed,
            start_tick: 0,
            end_tick: 0,
            recorded_ticks: 0,
            deltas: Vec::with_capacity(512),
            last_frame: InputFrame::new(),
        }
    }

    /// Record input for a tick.
    ///
    /// Only stores if input changed from previous frame.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        self.end_tick = tick;
        self.recorded_ticks += 1;

        if frame != self.last_frame {
            self.deltas.push(InputDelta::new(tick, frame));
            self.last_frame = frame;
        }
    }

    /// Get input at a specific tick.
    pub fn get_input_at(&self, tick: u32) -> InputFrame {
        // Last delta at or before this tick
        let idx = self.deltas.partition_point(|d| d.tick <= tick);

        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Number of delta entries.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Number of ticks covered by the recording.
    pub fn tick_count(&self) -> u32 {
        self.recorded_ticks
    }

    /// Finalize the buffer (call at match end).
    pub fn finalize(&mut self, end_tick: u32) {
        self.end_tick = end_tick;
    }

    /// Hash of the recording, for pairing a replay file with its result.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_recording();
        hasher.update_uuid(&self.match_id);
        hasher.update_u64(self.rng_seed);
        hasher.update_u32(self.start_tick);
        hasher.update_u32(self.end_tick);
        hasher.update_u32(self.recorded_ticks);
        for delta in &self.deltas {
            hasher.update_u32(delta.tick);
            hasher.update_u8(delta.frame.bits());
        }
        hasher.finalize()
    }

    /// Create iterator over all inputs for replay.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            buffer: self,
            current_tick: self.start_tick,
            delta_idx: 0,
            current_frame: InputFrame::new(),
        }
    }
}

/// Iterator for replaying inputs tick-by-tick.
pub struct ReplayIterator<'a> {
    buffer: &'a PlayerInputBuffer,
    current_tick: u32,
    delta_idx: usize,
    current_frame: InputFrame,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick > self.buffer.end_tick {
            return None;
        }

        while let Some(delta) = self.buffer.deltas.get(self.delta_idx) {
            if delta.tick > self.current_tick {
                break;
            }
            self.current_frame = delta.frame;
            self.delta_idx += 1;
        }

        let result = (self.current_tick, self.current_frame);
        self.current_tick += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================
