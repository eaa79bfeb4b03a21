//! Enemy AI and Spawning
//!
//! Enemies steer by accelerating toward (or away from) the player, hop
//! over walls and gaps using two sensors, and start attacks when in
//! range. Each enemy runs its own physics step at the end of its update,
//! so every enemy has moved before the player does.

use tracing::debug;

use crate::core::fixed::{
    Fixed, from_int, from_ratio, fixed_mul, fixed_round, fixed_abs, JUMP_VELOCITY,
};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::FixedVec2;
use crate::game::collision::{Aabb, aabb_overlap};
use crate::game::config::MatchConfig;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::item::{
    Item, ItemCategory, Loadout, LoadoutSlot, Rarity, Stats, WeaponType,
};
use crate::game::loot::generate_specific_loot;
use crate::game::map;
use crate::game::physics::apply_physics;
use crate::game::state::{
    Archetype, AttackState, AttackTiming, Body, Enemy, EnemyId, JumpState, Platform, Player,
    WallSlide, WorldState,
};

/// Chasers stop pushing inside this horizontal gap.
const CHASE_DEADZONE: Fixed = from_int(40);

/// Chaser swing range.
const MELEE_RANGE: Fixed = from_int(75);

/// Ranger preferred stand-off distance.
const RANGER_IDEAL: Fixed = from_int(400);

/// Slack either side of the stand-off distance.
const RANGER_TOLERANCE: Fixed = from_int(50);

/// Ranger firing range.
const RANGER_FIRE_RANGE: Fixed = from_int(600);

/// Horizontal damping while a ranger holds position.
const RANGER_HOLD_DAMPING: Fixed = from_ratio(8, 10);

/// Below this horizontal speed an enemy counts as standing still.
const MOVING_THRESHOLD: Fixed = from_ratio(1, 10);

/// Forward wall sensor size.
const WALL_SENSOR_WIDTH: Fixed = from_int(60);
const WALL_SENSOR_HEIGHT: Fixed = from_int(40);

/// Wall sensor offset below the head.
const WALL_SENSOR_DROP: Fixed = from_int(10);

/// Ledge probe distance ahead of the leading edge.
const LEDGE_LOOK_AHEAD: Fixed = from_int(40);

/// Ledge probe depth below the feet.
const LEDGE_PROBE_DEPTH: Fixed = from_int(5);

/// Jump to reach a player this far above...
const CLIMB_HEIGHT: Fixed = from_int(60);

/// ...and this close horizontally.
const CLIMB_REACH: Fixed = from_int(150);

/// Double jump when the player is this far above.
const DOUBLE_JUMP_HEIGHT: Fixed = from_int(100);

/// Wall-jump push as a multiple of move speed.
const WALL_JUMP_FACTOR: Fixed = from_ratio(3, 2);

/// Chance (per-mille) that a ranger spawns instead of a chaser.
const RANGER_PERMILLE: u32 = 300;

/// Chance (per-mille) each armor piece is worn.
const ARMOR_PERMILLE: u32 = 700;

/// Chance (per-mille) of a weapon when the player has none.
const SURPRISE_WEAPON_PERMILLE: u32 = 100;

/// Armor slots enemies may fill.
const ENEMY_ARMOR: [(LoadoutSlot, ItemCategory); 4] = [
    (LoadoutSlot::Helmet, ItemCategory::Helmet),
    (LoadoutSlot::Chest, ItemCategory::Chest),
    (LoadoutSlot::Leggings, ItemCategory::Leggings),
    (LoadoutSlot::Boots, ItemCategory::Boots),
];

// =============================================================================
// CONTROL
// =============================================================================

/// Run AI and physics for every live enemy, in spawn order.
pub fn update_enemies(world: &mut WorldState, config: &MatchConfig) {
    let tick = world.game_time;
    let WorldState { player, enemies, platforms, pending_events, .. } = world;

    for enemy in enemies.iter_mut() {
        think(enemy, player, platforms, config, tick, pending_events);
        apply_physics(&mut enemy.body, Some(&mut enemy.wall_slide), platforms);
    }
}

fn think(
    enemy: &mut Enemy,
    player: &Player,
    platforms: &[Platform],
    config: &MatchConfig,
    tick: u32,
    events: &mut Vec<GameEvent>,
) {
    let id = enemy.id;
    let jumped = |events: &mut Vec<GameEvent>| {
        events.push(GameEvent::new(tick, GameEventData::EnemyJumped { enemy_id: id }));
    };

    let dx = player.body.pos.x - enemy.body.pos.x;
    let dy = player.body.pos.y - enemy.body.pos.y;
    let to_player = player.body.pos;
    let dist_sq = enemy.body.pos.distance_squared_wide(to_player);
    let acceleration = fixed_mul(enemy.stats.move_speed, config.difficulty.enemy_acceleration());
    let base_cooldown = config.difficulty.enemy_base_cooldown();

    if dist_sq < squared(enemy.detection_range) {
        match enemy.archetype {
            Archetype::Ranger => {
                let too_close = dist_sq < squared(RANGER_IDEAL - RANGER_TOLERANCE);
                let too_far = dist_sq > squared(RANGER_IDEAL + RANGER_TOLERANCE);
                let toward = if dx > 0 { acceleration } else { -acceleration };
                if too_close {
                    enemy.body.vel.x -= toward;
                } else if too_far {
                    enemy.body.vel.x += toward;
                } else {
                    enemy.body.vel.x = fixed_mul(enemy.body.vel.x, RANGER_HOLD_DAMPING);
                }
                enemy.body.facing_right = dx > 0;
            }
            Archetype::Chaser => {
                if dx > CHASE_DEADZONE {
                    enemy.body.vel.x += acceleration;
                    enemy.body.facing_right = true;
                } else if dx < -CHASE_DEADZONE {
                    enemy.body.vel.x -= acceleration;
                    enemy.body.facing_right = false;
                }
            }
        }

        if enemy.body.grounded && fixed_abs(enemy.body.vel.x) > MOVING_THRESHOLD {
            let player_above = dy < -CLIMB_HEIGHT && fixed_abs(dx) < CLIMB_REACH;
            if wall_ahead(&enemy.body, platforms) || !ground_ahead(&enemy.body, platforms) || player_above {
                enemy.body.vel.y = JUMP_VELOCITY;
                enemy.body.grounded = false;
                jumped(events);
            }
        }

        if enemy.attack.ready() {
            let timing = match enemy.archetype {
                Archetype::Ranger if dist_sq < squared(RANGER_FIRE_RANGE) => {
                    Some(AttackTiming::ranger(base_cooldown))
                }
                Archetype::Chaser if dist_sq < squared(MELEE_RANGE) => {
                    Some(AttackTiming::chaser(base_cooldown))
                }
                _ => None,
            };
            if let Some(timing) = timing {
                enemy.attack.start(timing);
                events.push(GameEvent::enemy_attacked(tick, id, enemy.archetype));
            }
        }
    }

    enemy.attack.advance();

    if enemy.wall_slide.active {
        let push = fixed_mul(enemy.stats.move_speed, WALL_JUMP_FACTOR);
        enemy.body.vel = FixedVec2::new(-enemy.wall_slide.side * push, JUMP_VELOCITY);
        enemy.wall_slide.release();
        enemy.jump.can_double_jump = true;
        jumped(events);
    }

    if !enemy.body.grounded
        && enemy.jump.can_double_jump
        && enemy.body.vel.y > 0
        && player.body.pos.y < enemy.body.pos.y - DOUBLE_JUMP_HEIGHT
    {
        enemy.body.vel.y = JUMP_VELOCITY;
        enemy.jump.can_double_jump = false;
        enemy.body.vel.x = if player.body.pos.x > enemy.body.pos.x {
            enemy.stats.move_speed
        } else {
            -enemy.stats.move_speed
        };
        jumped(events);
    }

    if enemy.body.grounded {
        enemy.jump.can_double_jump = true;
        enemy.wall_slide.release();
    }
}

#[inline]
fn squared(distance: Fixed) -> i64 {
    let d = distance as i64;
    d * d
}

/// Solid geometry in a 60×40 box in front of the head.
fn wall_ahead(body: &Body, platforms: &[Platform]) -> bool {
    let x = if body.facing_right { body.pos.x + body.width } else { body.pos.x - WALL_SENSOR_WIDTH };
    let sensor = Aabb::new(
        FixedVec2::new(x, body.pos.y + WALL_SENSOR_DROP),
        WALL_SENSOR_WIDTH,
        WALL_SENSOR_HEIGHT,
    );
    platforms.iter().filter(|p| p.is_solid()).any(|p| aabb_overlap(&sensor, p))
}

/// Solid ground under a point just past the leading foot.
fn ground_ahead(body: &Body, platforms: &[Platform]) -> bool {
    let x = if body.facing_right {
        body.pos.x + body.width + LEDGE_LOOK_AHEAD
    } else {
        body.pos.x - LEDGE_LOOK_AHEAD
    };
    let probe = FixedVec2::new(x, body.pos.y + body.height + LEDGE_PROBE_DEPTH);
    platforms.iter().filter(|p| p.is_solid()).any(|p| p.rect.contains_point(probe))
}

// =============================================================================
// SPAWNING
// =============================================================================

/// Maybe bring in a reinforcement matched to the player's gear.
pub fn spawn_enemies(world: &mut WorldState, config: &MatchConfig) {
    if world.enemies.len() >= config.max_live_enemies {
        return;
    }
    if !world.rng.chance_permille(config.enemy_spawn_permille) {
        return;
    }

    let from_left = world.rng.coin_flip();
    let id = world.allocate_enemy_id();
    let enemy = roll_enemy(id, from_left, &world.player.loadout, &mut world.rng);

    debug!(
        enemy_id = id.0,
        archetype = ?enemy.archetype,
        tier = enemy.gear_tier,
        health = enemy.body.health >> 16,
        tick = world.game_time,
        "Enemy spawned"
    );

    world.push_event(GameEvent::new(
        world.game_time,
        GameEventData::EnemySpawned { enemy_id: id, archetype: enemy.archetype, tier: enemy.gear_tier },
    ));
    world.enemies.push(enemy);
}

/// Gear tier near the player's: round(score + U(-1, 1)) clamped to 1..=5.
pub fn roll_gear_tier(player_loadout: &Loadout, rng: &mut DeterministicRng) -> u8 {
    let jitter = rng.next_signed_unit();
    fixed_round(player_loadout.gear_score() + jitter).clamp(1, 5) as u8
}

/// Build a fresh enemy at a map edge.
pub fn roll_enemy(
    id: EnemyId,
    from_left: bool,
    player_loadout: &Loadout,
    rng: &mut DeterministicRng,
) -> Enemy {
    let tier = roll_gear_tier(player_loadout, rng);
    let rarity = Rarity::from_tier(tier as i32);
    let archetype = if rng.chance_permille(RANGER_PERMILLE) {
        Archetype::Ranger
    } else {
        Archetype::Chaser
    };

    let mut loadout = Loadout::new();
    for (slot, category) in ENEMY_ARMOR {
        if rng.chance_permille(ARMOR_PERMILLE) {
            wear(&mut loadout, slot, generate_specific_loot(category, rarity, None, rng));
        }
    }

    if player_loadout.has_weapon() || rng.chance_permille(SURPRISE_WEAPON_PERMILLE) {
        let kind = match archetype {
            Archetype::Ranger => WeaponType::Bow,
            Archetype::Chaser => WeaponType::Sword,
        };
        let weapon = generate_specific_loot(ItemCategory::Weapon, rarity, Some(kind), rng);
        wear(&mut loadout, LoadoutSlot::PrimaryWeapon, weapon);
    }

    let stats = Stats::from_items(loadout.items());
    let (pos, facing_right) = map::enemy_entry(from_left);

    Enemy {
        id,
        archetype,
        body: Body::character(pos, stats.health, facing_right),
        detection_range: archetype.detection_range(),
        stats,
        attack: AttackState::default(),
        loadout,
        jump: JumpState::default(),
        wall_slide: WallSlide::default(),
        gear_tier: tier,
    }
}

fn wear(loadout: &mut Loadout, slot: LoadoutSlot, item: Item) {
    if let Err(err) = loadout.equip(slot, item) {
        debug_assert!(false, "rolled item does not fit its slot: {err}");
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::item::MIN_ATTACK_SPEED;
    use proptest::prelude::*;

    fn quiet_config() -> MatchConfig {
        MatchConfig { spawn_warden: false, enemy_spawn_permille: 0, ..MatchConfig::default() }
    }

    fn world_with_enemy(archetype: Archetype, enemy_pos: FixedVec2) -> WorldState {
        let config = quiet_config();
        let mut world = WorldState::new(11, Loadout::new(), &config);
        let mut rng = DeterministicRng::new(3);
        let id = world.allocate_enemy_id();
        let mut enemy = roll_enemy(id, true, &Loadout::new(), &mut rng);
        enemy.archetype = archetype;
        enemy.detection_range = archetype.detection_range();
        enemy.loadout = Loadout::new();
        enemy.stats = Stats::BASE;
        enemy.body = Body::character(enemy_pos, from_int(100), true);
        world.enemies.push(enemy);
        world
    }

    fn events(world: &mut WorldState) -> Vec<GameEventData> {
        world.take_events().into_iter().map(|e| e.data).collect()
    }

    #[test]
    fn test_chaser_accelerates_toward_player() {
        let mut world = world_with_enemy(Archetype::Chaser, FixedVec2::from_ints(400, 200));
        world.player.body.pos = FixedVec2::from_ints(100, 200);
        update_enemies(&mut world, &quiet_config());

        let enemy = &world.enemies[0];
        assert!(!enemy.body.facing_right);
        assert!(enemy.body.vel.x < 0);
    }

    #[test]
    fn test_chaser_deadzone() {
        let mut world = world_with_enemy(Archetype::Chaser, FixedVec2::from_ints(120, 200));
        world.player.body.pos = FixedVec2::from_ints(100, 200);
        update_enemies(&mut world, &quiet_config());
        assert_eq!(world.enemies[0].body.vel.x, 0);
    }

    #[test]
    fn test_chaser_attacks_in_range() {
        let mut world = world_with_enemy(Archetype::Chaser, FixedVec2::from_ints(150, 200));
        world.player.body.pos = FixedVec2::from_ints(100, 200);
        update_enemies(&mut world, &quiet_config());

        let enemy = &world.enemies[0];
        assert!(enemy.attack.is_attacking);
        assert_eq!(enemy.attack.cooldown, 89);
        assert!(events(&mut world).contains(&GameEventData::EnemyAttacked {
            enemy_id: EnemyId(0),
            archetype: Archetype::Chaser,
        }));
    }

    #[test]
    fn test_no_reaction_outside_detection() {
        let mut world = world_with_enemy(Archetype::Chaser, FixedVec2::from_ints(2500, 100));
        world.player.body.pos = FixedVec2::from_ints(100, 100);
        update_enemies(&mut world, &quiet_config());
        assert_eq!(world.enemies[0].body.vel.x, 0);
        assert!(events(&mut world).is_empty());
    }

    #[test]
    fn test_ranger_keeps_distance() {
        let accel = fixed_mul(from_int(4), 22937);

        // Too close: back away, still facing the player
        let mut world = world_with_enemy(Archetype::Ranger, FixedVec2::from_ints(300, 100));
        world.player.body.pos = FixedVec2::from_ints(100, 100);
        world.platforms.clear();
        update_enemies(&mut world, &quiet_config());
        let enemy = &world.enemies[0];
        assert!(!enemy.body.facing_right);
        assert_eq!(enemy.body.vel.x, fixed_mul(accel, crate::core::fixed::FRICTION));

        // Too far: close in
        let mut world = world_with_enemy(Archetype::Ranger, FixedVec2::from_ints(1000, 100));
        world.player.body.pos = FixedVec2::from_ints(100, 100);
        world.platforms.clear();
        update_enemies(&mut world, &quiet_config());
        assert!(world.enemies[0].body.vel.x < 0);
    }

    #[test]
    fn test_ranger_holds_inside_band() {
        let mut world = world_with_enemy(Archetype::Ranger, FixedVec2::from_ints(500, 100));
        world.player.body.pos = FixedVec2::from_ints(100, 100);
        world.platforms.clear();
        world.enemies[0].body.vel.x = from_int(5);
        update_enemies(&mut world, &quiet_config());

        let enemy = &world.enemies[0];
        assert!(!enemy.body.facing_right);
        let held = fixed_mul(from_int(5), RANGER_HOLD_DAMPING);
        assert_eq!(enemy.body.vel.x, fixed_mul(held, crate::core::fixed::FRICTION));
        // In firing range: volley started
        assert_eq!(enemy.attack.cooldown_max, 135);
    }

    #[test]
    fn test_relaxed_difficulty_slows_cadence() {
        let config = MatchConfig { difficulty: crate::game::config::Difficulty::Relaxed, ..quiet_config() };
        let mut world = world_with_enemy(Archetype::Chaser, FixedVec2::from_ints(150, 200));
        world.player.body.pos = FixedVec2::from_ints(100, 200);
        update_enemies(&mut world, &config);
        assert_eq!(world.enemies[0].attack.cooldown_max, 150);
    }

    #[test]
    fn test_jumps_at_ledge() {
        // Standing near the right end of a short platform, heading right
        let mut world = world_with_enemy(Archetype::Chaser, FixedVec2::from_ints(460, 390));
        world.platforms = vec![Platform::solid(300, 450, 200, 20)];
        world.player.body.pos = FixedVec2::from_ints(900, 390);
        world.enemies[0].body.grounded = true;
        world.enemies[0].body.vel.x = from_int(2);
        update_enemies(&mut world, &quiet_config());

        assert!(events(&mut world).contains(&GameEventData::EnemyJumped { enemy_id: EnemyId(0) }));
        assert!(world.enemies[0].body.vel.y < 0);
    }

    #[test]
    fn test_jumps_at_wall() {
        let mut world = world_with_enemy(Archetype::Chaser, FixedVec2::from_ints(500, 540));
        world.platforms = vec![Platform::solid(0, 600, 1500, 100), Platform::solid(560, 400, 40, 200)];
        world.player.body.pos = FixedVec2::from_ints(900, 540);
        world.enemies[0].body.grounded = true;
        world.enemies[0].body.vel.x = from_int(2);
        update_enemies(&mut world, &quiet_config());

        assert!(events(&mut world).contains(&GameEventData::EnemyJumped { enemy_id: EnemyId(0) }));
    }

    #[test]
    fn test_walks_on_open_floor() {
        let mut world = world_with_enemy(Archetype::Chaser, FixedVec2::from_ints(500, 540));
        world.platforms = vec![Platform::solid(0, 600, 1500, 100)];
        world.player.body.pos = FixedVec2::from_ints(900, 540);
        world.enemies[0].body.grounded = true;
        world.enemies[0].body.vel.x = from_int(2);
        update_enemies(&mut world, &quiet_config());

        assert!(events(&mut world).is_empty());
        assert!(world.enemies[0].body.grounded);
    }

    #[test]
    fn test_wall_slide_kicks_off_immediately() {
        let mut world = world_with_enemy(Archetype::Chaser, FixedVec2::from_ints(300, 100));
        world.platforms.clear();
        world.enemies[0].wall_slide.start(1, 120);
        world.enemies[0].jump.can_double_jump = false;
        update_enemies(&mut world, &quiet_config());

        let enemy = &world.enemies[0];
        assert!(!enemy.wall_slide.active);
        assert!(enemy.jump.can_double_jump);
        assert!(enemy.body.vel.x < 0);
        assert!(enemy.body.vel.y < 0);
    }

    #[test]
    fn test_double_jump_toward_high_player() {
        let mut world = world_with_enemy(Archetype::Chaser, FixedVec2::from_ints(300, 500));
        world.platforms.clear();
        world.player.body.pos = FixedVec2::from_ints(900, 200);
        world.enemies[0].body.vel.y = from_int(2);
        update_enemies(&mut world, &quiet_config());

        let enemy = &world.enemies[0];
        assert!(!enemy.jump.can_double_jump);
        assert_eq!(enemy.body.vel.y, JUMP_VELOCITY + crate::core::fixed::GRAVITY);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let config = MatchConfig { enemy_spawn_permille: 1000, ..MatchConfig::default() };
        let mut world = WorldState::new(5, Loadout::new(), &config);
        assert_eq!(world.enemies.len(), 1);
        spawn_enemies(&mut world, &config);
        assert_eq!(world.enemies.len(), 1);

        world.enemies.clear();
        spawn_enemies(&mut world, &config);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.enemies[0].id, EnemyId(1));
        let spawned = events(&mut world);
        assert!(matches!(spawned[0], GameEventData::EnemySpawned { enemy_id: EnemyId(1), .. }));
    }

    #[test]
    fn test_spawned_enemy_faces_arena() {
        let mut rng = DeterministicRng::new(8);
        let left = roll_enemy(EnemyId(0), true, &Loadout::new(), &mut rng);
        let right = roll_enemy(EnemyId(1), false, &Loadout::new(), &mut rng);
        assert_eq!(left.body.pos, FixedVec2::from_ints(-50, 400));
        assert!(left.body.facing_right);
        assert_eq!(right.body.pos, FixedVec2::from_ints(3000, 400));
        assert!(!right.body.facing_right);
    }

    #[test]
    fn test_reinforcements_face_arena_center() {
        let config = MatchConfig { spawn_warden: false, enemy_spawn_permille: 1000, ..MatchConfig::default() };
        let center = (config.map_min_x + config.map_max_x) / 2;
        let mut sides = [false; 2];

        for seed in 0..32 {
            let mut world = WorldState::new(seed, Loadout::new(), &config);
            spawn_enemies(&mut world, &config);
            let enemy = &world.enemies[0];
            let from_left = enemy.body.pos.x < center;
            assert_eq!(enemy.body.facing_right, from_left);
            sides[from_left as usize] = true;
        }
        assert_eq!(sides, [true, true]);
    }

    #[test]
    fn test_armed_player_means_armed_enemies() {
        let mut rng = DeterministicRng::new(21);
        let mut armed = Loadout::new();
        let sword = generate_specific_loot(ItemCategory::Weapon, Rarity::Common, Some(WeaponType::Sword), &mut rng);
        armed.equip(LoadoutSlot::PrimaryWeapon, sword).unwrap();

        for i in 0..50 {
            let enemy = roll_enemy(EnemyId(i), true, &armed, &mut rng);
            let weapon = enemy.loadout.get(LoadoutSlot::PrimaryWeapon).expect("armed");
            let expected = match enemy.archetype {
                Archetype::Ranger => WeaponType::Bow,
                Archetype::Chaser => WeaponType::Sword,
            };
            assert_eq!(weapon.weapon_type, Some(expected));
            assert!(enemy.loadout.get(LoadoutSlot::Gloves).is_none());
            assert!(enemy.loadout.get(LoadoutSlot::Ring).is_none());
        }
    }

    #[test]
    fn test_gear_tier_bounds_for_empty_loadout() {
        let mut rng = DeterministicRng::new(4);
        for _ in 0..500 {
            let tier = roll_gear_tier(&Loadout::new(), &mut rng);
            assert!((1..=2).contains(&tier));
        }
    }

    proptest! {
        #[test]
        fn test_rolled_enemies_are_sane(seed in any::<u64>()) {
            let mut rng = DeterministicRng::new(seed);
            let enemy = roll_enemy(EnemyId(0), rng.coin_flip(), &Loadout::new(), &mut rng);
            prop_assert!((1..=5).contains(&enemy.gear_tier));
            prop_assert!(enemy.stats.attack_speed >= MIN_ATTACK_SPEED);
            prop_assert_eq!(enemy.body.health, enemy.stats.health);
            prop_assert!(enemy.stats.health >= from_int(100));
            for item in enemy.loadout.items() {
                prop_assert_eq!(item.rarity, Rarity::from_tier(enemy.gear_tier as i32));
            }
        }
    }
}
