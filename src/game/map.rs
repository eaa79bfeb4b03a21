//! Arena Geometry
//!
//! The single side-scrolling arena: floor with a pit, a climbing wall,
//! pillars and floating ledges, plus spawn anchors.

use crate::core::fixed::{from_int, from_ratio};
use crate::core::vec2::FixedVec2;
use crate::game::item::{Loadout, Stats};
use crate::game::state::{
    Archetype, AttackState, Body, Enemy, EnemyId, JumpState, Platform, WallSlide,
};

/// Player start (top-left).
pub const PLAYER_SPAWN: FixedVec2 = FixedVec2::from_ints(100, 300);

/// Warden start (top-left).
pub const WARDEN_SPAWN: FixedVec2 = FixedVec2::from_ints(800, 400);

/// Height at which reinforcements drop in.
pub const ENEMY_SPAWN_Y: i32 = 400;

/// Left reinforcement entry, just off the map edge.
pub const LEFT_ENTRY_X: i32 = -50;

/// Right reinforcement entry, on the map edge.
pub const RIGHT_ENTRY_X: i32 = 3000;

/// Level geometry. The floor gap between x = 1500 and 1700 is the pit.
pub fn arena_platforms() -> Vec<Platform> {
    vec![
        // Floor
        Platform::solid(0, 600, 1500, 100),
        Platform::solid(1700, 600, 1300, 100),
        Platform::solid(300, 450, 200, 20),
        // Climbing wall
        Platform::solid(600, 200, 40, 400),
        Platform::solid(800, 350, 150, 20),
        Platform::solid(1200, 450, 200, 20),
        // Pillar
        Platform::solid(1500, 300, 20, 200),
        Platform::solid(1700, 200, 200, 20),
        Platform::solid(2100, 400, 200, 20),
        Platform::solid(2500, 300, 300, 20),
    ]
}

/// Entry point for a reinforcement, and whether it faces right.
pub fn enemy_entry(from_left: bool) -> (FixedVec2, bool) {
    if from_left {
        (FixedVec2::from_ints(LEFT_ENTRY_X, ENEMY_SPAWN_Y), true)
    } else {
        (FixedVec2::from_ints(RIGHT_ENTRY_X, ENEMY_SPAWN_Y), false)
    }
}

/// The gearless chaser guarding the first ledge.
pub fn warden(id: EnemyId) -> Enemy {
    let health = from_int(120);
    let stats = Stats {
        health,
        damage: from_int(12),
        // 90 % of base speed
        move_speed: from_ratio(36, 10),
        ..Stats::BASE
    };

    Enemy {
        id,
        archetype: Archetype::Chaser,
        body: Body::character(WARDEN_SPAWN, health, false),
        detection_range: from_int(600),
        stats,
        attack: AttackState::default(),
        loadout: Loadout::new(),
        jump: JumpState::default(),
        wall_slide: WallSlide::default(),
        gear_tier: 1,
    }
}
