//! # Stickman Extraction
//!
//! Deterministic simulation core for a 2D side-scrolling extraction
//! brawler: one player, AI enemies, gear with rarity-scaled stats, and a
//! match that ends when the first enemy falls or the player does.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   STICKMAN EXTRACTION                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - 2D vector with fixed-point                │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Match simulation (deterministic)          │
//! │  ├── state.rs    - World, player, enemies, level objects     │
//! │  ├── item.rs     - Items, loadouts, stat aggregation         │
//! │  ├── loot.rs     - Loot generation and pickups               │
//! │  ├── physics.rs  - Gravity, friction, platform resolution    │
//! │  ├── player.rs   - Player control                            │
//! │  ├── enemy.rs    - Enemy AI and spawning                     │
//! │  ├── combat.rs   - Hits, arrows, deaths, drops               │
//! │  └── tick.rs     - Authoritative simulation loop             │
//! │                                                              │
//! │  session/        - Around the match (may read the clock)     │
//! │  ├── runner.rs   - Fixed-timestep runner, replay checks      │
//! │  └── progress.rs - Stash, streak, rank between matches       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No floating-point arithmetic in game logic
//! - No HashMap iteration
//! - No system time dependencies
//! - All randomness from one seeded Xorshift128+ owned by the world
//!
//! Given the same seed, loadout, config and input recording, a match
//! reaches a bit-identical state hash on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod session;

// Re-export commonly used types
pub use core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use core::vec2::FixedVec2;
pub use core::rng::DeterministicRng;
pub use game::input::{InputFrame, InputDelta, Key, PlayerInputBuffer};
pub use game::state::WorldState;
pub use game::config::MatchConfig;
pub use game::tick::{tick, replay_match, MatchOutcome, TickResult};
pub use session::{MatchRunner, PlayerProfile};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Default time before sudden death, in ticks (60 seconds * 60 Hz)
pub const MATCH_DURATION_TICKS: u32 = 3600;
