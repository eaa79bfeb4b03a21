//! Game Logic Module
//!
//! All match simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `input`: Key levels, input recording and replay
//! - `state`: World, player, enemies and level objects
//! - `item`: Items, loadouts and derived stats
//! - `loot`: Item generation and ground pickups
//! - `collision`: Axis-aligned box predicates
//! - `physics`: Gravity, friction and platform resolution
//! - `player`: Player control
//! - `enemy`: Enemy AI and reinforcement spawning
//! - `combat`: Hits, projectiles, deaths and drops
//! - `effects`: Cosmetic particles
//! - `events`: Game events for audio, observers and replay checks
//! - `audio`: Sound cue seam
//! - `map`: Arena geometry and spawn anchors
//! - `config`: Match tunables
//! - `tick`: Authoritative simulation loop

pub mod input;
pub mod state;
pub mod item;
pub mod loot;
pub mod collision;
pub mod physics;
pub mod player;
pub mod enemy;
pub mod combat;
pub mod effects;
pub mod events;
pub mod audio;
pub mod map;
pub mod config;
pub mod tick;

// Re-export key types
pub use input::{InputFrame, InputDelta, Key, PlayerInputBuffer};
pub use state::{Body, Enemy, EnemyId, Archetype, MatchPhase, Player, WorldState};
pub use item::{Item, ItemCategory, Loadout, LoadoutError, LoadoutSlot, Rarity, Stats, WeaponSlot};
pub use config::{ConfigError, Difficulty, MatchConfig};
pub use audio::{AudioService, NullAudio, SoundCue};
pub use tick::{tick, replay_match, HudSnapshot, MatchOutcome, TickResult};
pub use events::{GameEvent, GameEventData};
