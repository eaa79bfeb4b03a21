//! Authoritative Simulation Tick
//!
//! The match loop. One call advances the world by exactly one fixed step;
//! the same world, input frame and config always produce the same result.

use serde::{Serialize, Deserialize};
use tracing::info;
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::fixed::Fixed;
use crate::game::combat::resolve_combat;
use crate::game::config::MatchConfig;
use crate::game::effects;
use crate::game::enemy::{spawn_enemies, update_enemies};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::{InputFrame, PlayerInputBuffer};
use crate::game::item::{Item, Loadout};
use crate::game::loot::collect_items;
use crate::game::physics::apply_physics;
use crate::game::player::update_player;
use crate::game::state::{Body, MatchPhase, WorldState};
use crate::TICK_RATE;

/// How a match finished.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// An enemy died on solid ground; carries everything it dropped
    Won {
        /// Victory loot
        loot: Vec<Item>,
    },
    /// The player's health ran out
    Lost,
}

impl MatchOutcome {
    /// Whether the player won.
    pub fn is_win(&self) -> bool {
        matches!(self, MatchOutcome::Won { .. })
    }
}

/// Values the HUD shows after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Player health
    pub health: Fixed,
    /// Player health cap
    pub max_health: Fixed,
    /// Whole seconds elapsed
    pub elapsed_seconds: u32,
    /// Whole seconds until sudden death, rounded up; 0 once it started
    pub countdown_seconds: u32,
    /// Ticks until the dash is ready
    pub dash_cooldown: u32,
}

impl HudSnapshot {
    /// Read the HUD values out of a world.
    pub fn capture(world: &WorldState, config: &MatchConfig) -> Self {
        let remaining = remaining_ticks(world, config);
        Self {
            health: world.player.body.health,
            max_health: world.player.body.max_health,
            elapsed_seconds: world.game_time / TICK_RATE,
            countdown_seconds: remaining.div_ceil(TICK_RATE),
            dash_cooldown: world.player.dash.cooldown,
        }
    }
}

/// Result of a tick.
#[derive(Clone, Debug)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Set on the single tick the match ends
    pub outcome: Option<MatchOutcome>,
    /// HUD values after the tick
    pub hud: HudSnapshot,
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `world` - The match state (will be mutated)
/// * `input` - Key levels for this tick
/// * `config` - Match configuration
///
/// # Determinism
///
/// All arithmetic is fixed-point and every random draw comes from
/// `world.rng`, in the same order on every run. Nothing here reads the
/// clock or the environment.
///
/// Once an outcome has been reported the world is frozen: later calls
/// return an empty result and change nothing.
pub fn tick(world: &mut WorldState, input: InputFrame, config: &MatchConfig) -> TickResult {
    if world.phase == MatchPhase::Ended {
        return TickResult {
            events: Vec::new(),
            outcome: None,
            hud: HudSnapshot::capture(world, config),
        };
    }

    // 0. Advance tick counter
    world.game_time += 1;

    // 1. Player control
    update_player(world, input);

    // 2. Enemy control and enemy physics
    update_enemies(world, config);

    // 3. Reinforcements
    spawn_enemies(world, config);

    // 4. Camera
    let focus = world.player.body.center();
    world.camera.follow(focus);

    // 5. Sudden death walls
    advance_sudden_death(world, config);

    // 6. Dash trail
    if world.player.dash.is_active() {
        effects::dash_trail(&mut world.particles, &mut world.rng, &world.player.body);
    }

    // 7. Player physics
    let was_grounded = world.player.body.grounded;
    apply_physics(
        &mut world.player.body,
        Some(&mut world.player.wall_slide),
        &world.platforms,
    );
    if world.player.body.grounded && !was_grounded {
        let tick = world.game_time;
        world.push_event(GameEvent::new(tick, GameEventData::Landed));
    }

    // 8. Ground pickups
    collect_items(world);

    // 9. Combat, then outcome
    let outcome = match resolve_combat(world, config) {
        Some(loot) => Some(MatchOutcome::Won { loot }),
        None if world.player.body.is_dead() => Some(MatchOutcome::Lost),
        None => None,
    };
    if let Some(outcome) = &outcome {
        end_match(world, outcome);
    } else {
        // 10. Particles
        effects::age_particles(&mut world.particles);
    }

    #[cfg(feature = "debug-tracing")]
    trace!(
        tick = world.game_time,
        player_x = world.player.body.pos.x,
        player_y = world.player.body.pos.y,
        health = world.player.body.health,
        enemies = world.enemies.len(),
        projectiles = world.projectiles.len(),
        "tick"
    );

    TickResult {
        events: world.take_events(),
        outcome,
        hud: HudSnapshot::capture(world, config),
    }
}

fn remaining_ticks(world: &WorldState, config: &MatchConfig) -> u32 {
    config.match_duration_ticks().saturating_sub(world.game_time)
}

/// Close the walls once time is up and kill every body caught outside.
fn advance_sudden_death(world: &mut WorldState, config: &MatchConfig) {
    if remaining_ticks(world, config) > 0 {
        return;
    }

    if world.sudden_death_offset == 0 {
        let tick = world.game_time;
        info!(tick, "Sudden death");
        world.push_event(GameEvent::new(tick, GameEventData::SuddenDeathStarted));
    }
    world.sudden_death_offset += config.sudden_death_wall_speed;

    let left = config.map_min_x + world.sudden_death_offset;
    let right = config.map_max_x - world.sudden_death_offset;
    let crushed = |body: &Body| body.pos.x < left || body.pos.x + body.width > right;

    if crushed(&world.player.body) {
        world.player.body.health = 0;
    }
    for enemy in world.enemies.iter_mut() {
        if crushed(&enemy.body) {
            enemy.body.health = 0;
        }
    }
}

fn end_match(world: &mut WorldState, outcome: &MatchOutcome) {
    world.phase = MatchPhase::Ended;
    let tick = world.game_time;

    match outcome {
        MatchOutcome::Won { loot } => {
            info!(tick, loot = loot.len(), seconds = tick / TICK_RATE, "Match won");
        }
        MatchOutcome::Lost => {
            info!(tick, seconds = tick / TICK_RATE, "Match lost");
        }
    }
    world.push_event(GameEvent::match_ended(tick, outcome.is_win()));
}

/// Replay a recorded match.
///
/// Rebuilds the opening state from `seed` and `loadout`, then feeds the
/// recording tick by tick until it runs out or the match ends. Comparing
/// `compute_hash()` of the result with the live world verifies the run.
pub fn replay_match(
    seed: u64,
    loadout: Loadout,
    config: &MatchConfig,
    inputs: &PlayerInputBuffer,
) -> WorldState {
    let mut world = WorldState::new(seed, loadout, config);

    for (_, input) in inputs.replay_iter().take(inputs.tick_count() as usize) {
        let result = tick(&mut world, input, config);
        if result.outcome.is_some() {
            break;
        }
    }

    world
}

// =============================================================================
// TESTS
// =============================================================================
