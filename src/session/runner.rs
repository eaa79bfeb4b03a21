//! Fixed-Timestep Match Runner
//!
//! Drives the deterministic tick from a variable-rate frame loop. Real
//! elapsed time feeds an accumulator that is drained in whole ticks, so
//! the simulation advances at the same rate whatever the frame rate.
//!
//! The runner owns everything a live match needs around the world: the
//! clock, the audio seam, an input recording for replay checks and the
//! observer that receives HUD snapshots and the outcome.

use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::core::fixed::to_float;
use crate::core::hash::{hash_with_domain, StateHash};
use crate::game::audio::AudioService;
use crate::game::config::MatchConfig;
use crate::game::events::GameEvent;
use crate::game::input::{InputFrame, PlayerInputBuffer};
use crate::game::item::Loadout;
use crate::game::state::WorldState;
use crate::game::tick::{tick, replay_match, HudSnapshot, MatchOutcome};

// =============================================================================
// CLOCK
// =============================================================================

/// Converts wall-clock frame deltas into a number of simulation ticks.
///
/// Frame deltas above `max_frame` are clamped, so a stalled frame (tab in
/// the background, debugger pause) costs at most a handful of ticks
/// instead of a catch-up spiral. The dropped time is never replayed.
#[derive(Clone, Copy, Debug)]
pub struct FixedStepClock {
    step: Duration,
    max_frame: Duration,
    accumulator: Duration,
}

impl FixedStepClock {
    /// Create a clock. A zero `step` is bumped to one nanosecond.
    pub fn new(step: Duration, max_frame: Duration) -> Self {
        Self {
            step: step.max(Duration::from_nanos(1)),
            max_frame,
            accumulator: Duration::ZERO,
        }
    }

    /// Clock matching a match configuration.
    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.step(), config.max_frame())
    }

    /// Add one frame's elapsed time and return how many ticks are due.
    pub fn advance(&mut self, frame_delta: Duration) -> u32 {
        let delta = if frame_delta > self.max_frame {
            warn!(
                frame_ms = frame_delta.as_millis() as u64,
                cap_ms = self.max_frame.as_millis() as u64,
                "Frame delta clamped"
            );
            self.max_frame
        } else {
            frame_delta
        };

        self.accumulator += delta;
        let mut due = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            due += 1;
        }
        due
    }

    /// Length of one tick.
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Time banked toward the next tick.
    pub fn pending(&self) -> Duration {
        self.accumulator
    }
}

// =============================================================================
// OBSERVER
// =============================================================================

/// Receives what a presentation layer needs after each tick.
pub trait MatchObserver {
    /// Events generated by one tick.
    fn on_events(&mut self, _events: &[GameEvent]) {}

    /// HUD values after one tick.
    fn on_hud(&mut self, _hud: &HudSnapshot) {}

    /// Called exactly once, on the tick the match ends.
    fn on_outcome(&mut self, outcome: &MatchOutcome);
}

/// Ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl MatchObserver for NullObserver {
    fn on_outcome(&mut self, _outcome: &MatchOutcome) {}
}

// =============================================================================
// RUNNER
// =============================================================================

/// A live match.
pub struct MatchRunner<A: AudioService, O: MatchObserver> {
    world: WorldState,
    config: MatchConfig,
    loadout: Loadout,
    clock: FixedStepClock,
    audio: A,
    audio_resumed: bool,
    observer: O,
    recording: PlayerInputBuffer,
    outcome: Option<MatchOutcome>,
}

impl<A: AudioService, O: MatchObserver> MatchRunner<A, O> {
    /// Set up a match and initialize audio.
    pub fn new(seed: u64, loadout: Loadout, config: MatchConfig, mut audio: A, observer: O) -> Self {
        let world = WorldState::new(seed, loadout.clone(), &config);
        let clock = FixedStepClock::from_config(&config);
        let mut match_id = [0u8; 16];
        match_id.copy_from_slice(&hash_with_domain(b"STICKMAN_EXTRACTION_MATCH_ID", &seed.to_le_bytes())[..16]);
        audio.init();

        info!(
            seed,
            gear_score = to_float(world.player.loadout.gear_score()),
            enemies = world.enemies.len(),
            "Match started"
        );

        Self {
            world,
            config,
            loadout,
            clock,
            audio,
            audio_resumed: false,
            observer,
            recording: PlayerInputBuffer::new(match_id, seed),
            outcome: None,
        }
    }

    /// Feed one rendered frame: run every tick that is due with the key
    /// levels sampled this frame. Returns the number of ticks run.
    pub fn frame(&mut self, frame_delta: Duration, input: InputFrame) -> u32 {
        if self.outcome.is_some() {
            return 0;
        }
        if !self.audio_resumed && !input.is_idle() {
            self.audio.resume();
            self.audio_resumed = true;
        }

        let due = self.clock.advance(frame_delta);
        let mut ran = 0;
        for _ in 0..due {
            ran += 1;
            if self.step(input).is_some() {
                break;
            }
        }
        ran
    }

    /// Run exactly one tick, bypassing the clock.
    pub fn step(&mut self, input: InputFrame) -> Option<&MatchOutcome> {
        if self.outcome.is_some() {
            return None;
        }

        self.recording.record(self.world.game_time, input);
        let result = tick(&mut self.world, input, &self.config);

        for cue in result.events.iter().filter_map(GameEvent::sound_cue) {
            self.audio.play(cue);
        }
        self.observer.on_events(&result.events);
        self.observer.on_hud(&result.hud);

        if let Some(outcome) = result.outcome {
            self.recording.finalize(self.world.game_time.saturating_sub(1));
            self.observer.on_outcome(&outcome);
            self.outcome = Some(outcome);
        }
        self.outcome.as_ref()
    }

    /// Tick as fast as possible, asking `input` for each tick's keys,
    /// until the match ends or `max_ticks` have run.
    pub fn run_headless<F>(&mut self, mut input: F, max_ticks: u32) -> Option<&MatchOutcome>
    where
        F: FnMut(&WorldState) -> InputFrame,
    {
        for _ in 0..max_ticks {
            let frame = input(&self.world);
            if self.step(frame).is_some() {
                break;
            }
        }
        self.outcome.as_ref()
    }

    /// Tick in real time on the tokio timer until the match ends or the
    /// world reaches `max_ticks`. Keys are sampled once per frame.
    pub async fn run_realtime<F>(&mut self, mut input: F, max_ticks: u32) -> Option<&MatchOutcome>
    where
        F: FnMut(&WorldState) -> InputFrame,
    {
        let mut frames = interval(self.clock.step());
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last = Instant::now();

        while self.outcome.is_none() && self.world.game_time < max_ticks {
            frames.tick().await;
            let now = Instant::now();
            let frame = input(&self.world);
            self.frame(now - last, frame);
            last = now;
        }
        self.outcome.as_ref()
    }

    /// Re-run the recording from scratch and compare state hashes.
    pub fn verify_replay(&self) -> bool {
        let replayed = replay_match(self.world.seed, self.loadout.clone(), &self.config, &self.recording);
        let ok = replayed.compute_hash() == self.world.compute_hash();
        debug!(
            ticks = self.recording.tick_count(),
            deltas = self.recording.delta_count(),
            ok,
            "Replay verified"
        );
        ok
    }

    /// Current state hash.
    pub fn state_hash(&self) -> StateHash {
        self.world.compute_hash()
    }

    /// The world, for rendering.
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// The configuration the match runs with.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Inputs recorded so far.
    pub fn recording(&self) -> &PlayerInputBuffer {
        &self.recording
    }

    /// The outcome, once the match has ended.
    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    /// The audio service.
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// The observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }
}

// =============================================================================
// TESTS
// =============================================================================
