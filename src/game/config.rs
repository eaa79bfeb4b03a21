//! Match Configuration
//!
//! Every tunable of a match in one serde struct. Missing JSON fields fall
//! back to the defaults below.

use std::path::Path;
use std::time::Duration;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::fixed::{
    Fixed, from_int, MAP_MAX_X, MAP_MIN_X, SUDDEN_DEATH_WALL_SPEED,
};
use crate::{MATCH_DURATION_TICKS, TICK_RATE};

/// Errors loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Not valid JSON for the schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parsed but out of range
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Enemy tuning preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Desktop tuning
    #[default]
    Standard,
    /// Slower acceleration and longer cooldowns (touch devices)
    Relaxed,
}

impl Difficulty {
    /// Enemy acceleration as a fraction of move speed.
    pub fn enemy_acceleration(self) -> Fixed {
        match self {
            // 0.35
            Difficulty::Standard => 22937,
            // 0.18
            Difficulty::Relaxed => 11796,
        }
    }

    /// Enemy base attack cooldown in ticks.
    pub fn enemy_base_cooldown(self) -> u32 {
        match self {
            Difficulty::Standard => 90,
            Difficulty::Relaxed => 150,
        }
    }
}

/// Tunables for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seconds before sudden death begins
    pub match_duration_seconds: u32,
    /// Pixels each wall advances per tick during sudden death
    pub sudden_death_wall_speed: Fixed,
    /// Left map bound
    pub map_min_x: Fixed,
    /// Right map bound
    pub map_max_x: Fixed,
    /// Enemy spawn chance per tick, in per-mille
    pub enemy_spawn_permille: u32,
    /// Spawning pauses at this many live enemies
    pub max_live_enemies: usize,
    /// Enemy tuning preset
    pub difficulty: Difficulty,
    /// Place the warden at match start
    pub spawn_warden: bool,
    /// Let enemy arrows damage the player
    pub enemy_projectiles_hit_player: bool,
    /// Camera viewport width
    pub viewport_width: Fixed,
    /// Camera viewport height
    pub viewport_height: Fixed,
    /// Real-time ticks per second
    pub tick_rate_hz: u32,
    /// Largest frame delta fed to the accumulator
    pub max_frame_millis: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_duration_seconds: MATCH_DURATION_TICKS / TICK_RATE,
            sudden_death_wall_speed: SUDDEN_DEATH_WALL_SPEED,
            map_min_x: MAP_MIN_X,
            map_max_x: MAP_MAX_X,
            enemy_spawn_permille: 5,
            max_live_enemies: 1,
            difficulty: Difficulty::Standard,
            spawn_warden: true,
            enemy_projectiles_hit_player: false,
            viewport_width: from_int(1024),
            viewport_height: from_int(768),
            tick_rate_hz: TICK_RATE,
            max_frame_millis: 200,
        }
    }
}

impl MatchConfig {
    /// Parse and validate JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_max_x <= self.map_min_x {
            return Err(ConfigError::Invalid {
                field: "map_max_x",
                reason: "must be greater than map_min_x",
            });
        }
        if self.sudden_death_wall_speed <= 0 {
            return Err(ConfigError::Invalid {
                field: "sudden_death_wall_speed",
                reason: "must be positive",
            });
        }
        if self.enemy_spawn_permille > 1000 {
            return Err(ConfigError::Invalid {
                field: "enemy_spawn_permille",
                reason: "must be at most 1000",
            });
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid { field: "tick_rate_hz", reason: "must be non-zero" });
        }
        if self.match_duration_seconds.checked_mul(TICK_RATE).is_none() {
            return Err(ConfigError::Invalid {
                field: "match_duration_seconds",
                reason: "too long to count in ticks",
            });
        }
        let frame_steps = self.max_frame_millis.checked_mul(self.tick_rate_hz);
        if self.max_frame_millis == 0 || frame_steps.is_some_and(|steps| steps < 1000) {
            return Err(ConfigError::Invalid {
                field: "max_frame_millis",
                reason: "must cover at least one step",
            });
        }
        if self.viewport_width <= 0 || self.viewport_height <= 0 {
            return Err(ConfigError::Invalid { field: "viewport", reason: "must be positive" });
        }
        Ok(())
    }

    /// Ticks before sudden death.
    pub fn match_duration_ticks(&self) -> u32 {
        self.match_duration_seconds.saturating_mul(TICK_RATE)
    }

    /// Real-time length of one tick.
    pub fn step(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }

    /// Largest frame delta the scheduler accepts.
    pub fn max_frame(&self) -> Duration {
        Duration::from_millis(self.max_frame_millis as u64)
    }
}

// =============================================================================
// TESTS
// =============================================================================
