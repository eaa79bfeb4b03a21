//! Combat Resolution
//!
//! Runs once per tick after every body has moved: spawns queued shots,
//! lands melee strikes on their hit frame, flies arrows and removes the
//! dead. Returns the victory loot when at least one enemy died on solid
//! ground this tick.

use tracing::debug;

use crate::core::fixed::{
    Fixed, FIXED_ONE, from_int, from_ratio, fixed_mul, ARROW_GRAVITY, ARROW_SPEED, VOID_LOOT_Y,
};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::FixedVec2;
use crate::game::collision::{Aabb, Bounded, aabb_overlap};
use crate::game::config::MatchConfig;
use crate::game::effects;
use crate::game::events::{GameEvent, GameEventData, HitTarget};
use crate::game::item::{Item, ItemId};
use crate::game::loot::generate_random_loot;
use crate::game::state::{
    Archetype, Body, Enemy, Owner, Particle, ParticleColor, Platform, Player, Projectile,
    WorldState,
};

/// Reach of a standard swing.
pub const ATTACK_RANGE: Fixed = from_int(60);

/// Arrow hitbox width.
pub const ARROW_WIDTH: Fixed = from_int(25);
/// Arrow hitbox height.
pub const ARROW_HEIGHT: Fixed = from_int(5);

/// Ticks an arrow flies before expiring.
pub const ARROW_LIFE: u32 = 180;

/// Ranger arrows fly at 80 % of the player's base arrow speed.
const ENEMY_ARROW_SPEED: Fixed = from_int(16);

/// Ticks of player movement a ranger leads its aim by.
const AIM_LEAD_TICKS: i32 = 10;

/// Drop scatter either side of the corpse.
const LOOT_SCATTER: Fixed = from_int(20);

/// Shape and feel of a melee swing.
struct Swing {
    range: Fixed,
    height_factor: i32,
    lift: Fixed,
    knockback: FixedVec2,
    color: ParticleColor,
    sparks: u32,
}

const STANDARD_SWING: Swing = Swing {
    range: ATTACK_RANGE,
    height_factor: 1,
    lift: 0,
    knockback: FixedVec2::from_ints(7, -5),
    color: ParticleColor::Red,
    sparks: 8,
};

const CLEAVER_SWING: Swing = Swing {
    range: from_int(150),
    height_factor: 2,
    lift: from_int(20),
    knockback: FixedVec2::from_ints(15, -8),
    color: ParticleColor::Orange,
    sparks: 20,
};

/// Knockback a chaser's swing puts on the player.
const CHASER_KNOCKBACK: FixedVec2 = FixedVec2::from_ints(10, -6);

/// Knockback of an arrow hit.
const ARROW_KNOCKBACK: FixedVec2 = FixedVec2::from_ints(5, -3);

/// Particle and event sinks shared by every combat step.
struct Impacts<'a> {
    tick: u32,
    rng: &'a mut DeterministicRng,
    particles: &'a mut Vec<Particle>,
    events: &'a mut Vec<GameEvent>,
}

impl Impacts<'_> {
    fn hit(&mut self, target: HitTarget, at: FixedVec2, color: ParticleColor, sparks: u32) {
        effects::burst(self.particles, self.rng, at, color, sparks);
        self.events.push(GameEvent::hit(self.tick, target));
    }

    fn emit(&mut self, data: GameEventData) {
        self.events.push(GameEvent::new(self.tick, data));
    }
}

/// Resolve this tick's combat. `Some(loot)` means the player won.
pub fn resolve_combat(world: &mut WorldState, config: &MatchConfig) -> Option<Vec<Item>> {
    let WorldState {
        game_time,
        player,
        enemies,
        projectiles,
        platforms,
        particles,
        rng,
        pending_events,
        ..
    } = world;
    let mut fx = Impacts { tick: *game_time, rng, particles, events: pending_events };

    fire_player_shot(player, projectiles);
    player_melee(player, enemies, &mut fx);
    enemy_attacks(player, enemies, projectiles, &mut fx);
    fly_projectiles(projectiles, player, enemies, platforms, config, &mut fx);
    remove_dead(enemies, &mut fx)
}

// =============================================================================
// PLAYER
// =============================================================================

fn fire_player_shot(player: &mut Player, projectiles: &mut Vec<Projectile>) {
    if !player.bow.shoot_requested {
        return;
    }

    let dir = player.body.facing_sign();
    let power = player.bow.shot_power;

    // damage x (0.1 + 2.9 p^2), speed x (0.8 + 0.4 p)
    let damage_scale = from_ratio(1, 10) + fixed_mul(fixed_mul(power, power), from_ratio(29, 10));
    let speed = fixed_mul(ARROW_SPEED, from_ratio(8, 10) + fixed_mul(power, from_ratio(4, 10)));
    let lift = FIXED_ONE + fixed_mul(power, from_ratio(3, 2));

    projectiles.push(Projectile {
        pos: FixedVec2::new(
            player.body.pos.x + player.body.width / 2,
            player.body.pos.y + player.body.height / 2,
        ),
        vel: FixedVec2::new(dir * speed, -lift),
        width: ARROW_WIDTH,
        height: ARROW_HEIGHT,
        damage: fixed_mul(player.stats.damage, damage_scale),
        life: ARROW_LIFE,
        owner: Owner::Player,
    });

    player.bow.shoot_requested = false;
    player.bow.shot_power = 0;
    player.body.vel.x = -dir * (from_int(3) + 4 * power);
}

fn player_melee(player: &Player, enemies: &mut [Enemy], fx: &mut Impacts<'_>) {
    if player.has_bow_active() || !player.attack.is_strike_tick() {
        return;
    }

    let cleaver = player.active_weapon().is_some_and(Item::is_cleaver);
    let swing = if cleaver { &CLEAVER_SWING } else { &STANDARD_SWING };
    let hitbox = swing_hitbox(&player.body, swing.range, player.body.height * swing.height_factor, swing.lift);
    let dir = player.body.facing_sign();

    for enemy in enemies.iter_mut() {
        if !aabb_overlap(&hitbox, &enemy.body) {
            continue;
        }
        enemy.body.health -= player.stats.damage;
        enemy.body.vel = FixedVec2::new(dir * swing.knockback.x, swing.knockback.y);
        fx.hit(HitTarget::Enemy(enemy.id), enemy.body.center(), swing.color, swing.sparks);
    }

    if cleaver {
        let smash = FixedVec2::new(
            player.body.pos.x + dir * from_int(50),
            player.body.pos.y + player.body.height,
        );
        effects::ground_smash(fx.particles, fx.rng, smash);
    }
}

/// Box in front of `body`, `range` wide, raised by `lift`.
fn swing_hitbox(body: &Body, range: Fixed, height: Fixed, lift: Fixed) -> Aabb {
    let x = if body.facing_right { body.pos.x + body.width } else { body.pos.x - range };
    Aabb::new(FixedVec2::new(x, body.pos.y - lift), range, height)
}

// =============================================================================
// ENEMIES
// =============================================================================

fn enemy_attacks(
    player: &mut Player,
    enemies: &[Enemy],
    projectiles: &mut Vec<Projectile>,
    fx: &mut Impacts<'_>,
) {
    for enemy in enemies.iter().filter(|e| e.attack.is_strike_tick()) {
        match enemy.archetype {
            Archetype::Ranger => {
                projectiles.push(aimed_arrow(enemy, &player.body));
                fx.emit(GameEventData::EnemyFired { enemy_id: enemy.id });
            }
            Archetype::Chaser => {
                let hitbox = swing_hitbox(&enemy.body, ATTACK_RANGE, enemy.body.height, 0);
                if aabb_overlap(&hitbox, &player.body) {
                    player.body.health -= enemy.stats.damage;
                    player.body.vel = FixedVec2::new(
                        enemy.body.facing_sign() * CHASER_KNOCKBACK.x,
                        CHASER_KNOCKBACK.y,
                    );
                    fx.hit(HitTarget::Player, player.body.center(), ParticleColor::Blue, 12);
                }
            }
        }
    }
}

/// Ranger arrow aimed where the player will be in a few ticks.
fn aimed_arrow(enemy: &Enemy, target: &Body) -> Projectile {
    let lead = target.pos + target.vel.scale_int(AIM_LEAD_TICKS);
    let eye = enemy.body.pos + FixedVec2::from_ints(15, 20);
    let muzzle_x = if enemy.body.facing_right { enemy.body.pos.x + enemy.body.width } else { enemy.body.pos.x };

    Projectile {
        pos: FixedVec2::new(muzzle_x, enemy.body.pos.y + from_int(20)),
        vel: (lead - eye).with_length(ENEMY_ARROW_SPEED),
        width: ARROW_WIDTH,
        height: ARROW_HEIGHT,
        damage: enemy.stats.damage,
        life: ARROW_LIFE,
        owner: Owner::Enemy(enemy.id),
    }
}

// =============================================================================
// PROJECTILES
// =============================================================================

fn fly_projectiles(
    projectiles: &mut Vec<Projectile>,
    player: &mut Player,
    enemies: &mut [Enemy],
    platforms: &[Platform],
    config: &MatchConfig,
    fx: &mut Impacts<'_>,
) {
    projectiles.retain_mut(|arrow| {
        arrow.pos = arrow.pos + arrow.vel;
        arrow.vel.y += ARROW_GRAVITY;
        arrow.life = arrow.life.saturating_sub(1);
        if arrow.life == 0 {
            return false;
        }

        let bounds = arrow.bounds();
        if platforms.iter().filter(|p| p.is_solid()).any(|p| aabb_overlap(&bounds, p)) {
            effects::burst(fx.particles, fx.rng, arrow.pos, ParticleColor::Gray, 3);
            return false;
        }

        let dir = if arrow.vel.x > 0 { 1 } else { -1 };
        let knockback = FixedVec2::new(dir * ARROW_KNOCKBACK.x, ARROW_KNOCKBACK.y);

        match arrow.owner {
            Owner::Player => {
                if let Some(enemy) = enemies.iter_mut().find(|e| aabb_overlap(&bounds, &e.body)) {
                    enemy.body.health -= arrow.damage;
                    enemy.body.vel = knockback;
                    fx.hit(HitTarget::Enemy(enemy.id), arrow.pos, ParticleColor::Red, 12);
                    return false;
                }
            }
            Owner::Enemy(_) if config.enemy_projectiles_hit_player => {
                if aabb_overlap(&bounds, &player.body) {
                    player.body.health -= arrow.damage;
                    player.body.vel = knockback;
                    fx.hit(HitTarget::Player, arrow.pos, ParticleColor::Blue, 12);
                    return false;
                }
            }
            Owner::Enemy(_) => {}
        }
        true
    });
}

// =============================================================================
// DEATHS
// =============================================================================

fn remove_dead(enemies: &mut Vec<Enemy>, fx: &mut Impacts<'_>) -> Option<Vec<Item>> {
    if !enemies.iter().any(|e| e.body.is_dead()) {
        return None;
    }

    let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
        std::mem::take(enemies).into_iter().partition(|e| e.body.is_dead());
    *enemies = alive;

    let mut victory: Option<Vec<Item>> = None;
    for enemy in dead {
        let in_void = enemy.body.pos.y > VOID_LOOT_Y;
        let drops = if in_void {
            Vec::new()
        } else {
            effects::burst(fx.particles, fx.rng, enemy.body.pos, ParticleColor::Orange, 25);
            drop_loot(&enemy, fx.rng)
        };

        debug!(
            enemy_id = enemy.id.0,
            archetype = ?enemy.archetype,
            in_void,
            drops = drops.len(),
            tick = fx.tick,
            "Enemy defeated"
        );
        fx.events.push(GameEvent::enemy_defeated(fx.tick, enemy.id, drops.len()));

        if !drops.is_empty() {
            victory.get_or_insert_with(Vec::new).extend(drops);
        }
    }
    victory
}

/// Everything the enemy wore, scattered around the corpse with fresh ids,
/// or one random item when it wore nothing.
pub fn drop_loot(enemy: &Enemy, rng: &mut DeterministicRng) -> Vec<Item> {
    let origin = enemy.body.pos;
    if enemy.loadout.is_empty() {
        return vec![generate_random_loot(origin, rng)];
    }

    enemy
        .loadout
        .items()
        .map(|worn| {
            let mut drop = worn.clone();
            drop.position = FixedVec2::new(
                origin.x + rng.next_fixed_range(-LOOT_SCATTER, LOOT_SCATTER),
                origin.y,
            );
            drop.collected = true;
            drop.id = ItemId::new(rng.next_uuid_bytes());
            drop
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::item::{ItemCategory, Loadout, LoadoutSlot, Rarity, WeaponType};
    use crate::game::loot::generate_specific_loot;
    use crate::game::map;
    use crate::game::state::{AttackTiming, EnemyId};

    fn arena(loadout: Loadout) -> WorldState {
        let config = MatchConfig { spawn_warden: false, ..MatchConfig::default() };
        let mut world = WorldState::new(17, loadout, &config);
        world.platforms.clear();
        world.player.body.pos = FixedVec2::from_ints(100, 540);
        world
    }

    fn add_enemy(world: &mut WorldState, archetype: Archetype, x: i32, y: i32, facing_right: bool) -> EnemyId {
        let id = world.allocate_enemy_id();
        let mut enemy = map::warden(id);
        enemy.archetype = archetype;
        enemy.body = Body::character(FixedVec2::from_ints(x, y), from_int(120), facing_right);
        world.enemies.push(enemy);
        id
    }

    fn close(a: Fixed, b: Fixed) -> bool {
        (a - b).abs() < FIXED_ONE / 100
    }

    fn run(world: &mut WorldState) -> (Option<Vec<Item>>, Vec<GameEventData>) {
        let loot = resolve_combat(world, &MatchConfig::default());
        let events = world.take_events().into_iter().map(|e| e.data).collect();
        (loot, events)
    }

    fn swing_to_strike(attack: &mut crate::game::state::AttackState, timing: AttackTiming) {
        attack.start(timing);
        while !attack.is_strike_tick() {
            attack.advance();
        }
    }

    #[test]
    fn test_full_power_shot() {
        let mut world = arena(Loadout::new());
        world.player.bow.shoot_requested = true;
        world.player.bow.shot_power = FIXED_ONE;
        run(&mut world);

        assert_eq!(world.projectiles.len(), 1);
        let arrow = &world.projectiles[0];
        assert!(close(arrow.damage, from_int(30)));
        // Moved one tick already
        assert!(close(arrow.vel.x, from_int(24)));
        assert_eq!(arrow.life, ARROW_LIFE - 1);
        assert_eq!(world.player.body.vel.x, from_int(-7));
        assert!(!world.player.bow.shoot_requested);
        assert_eq!(world.player.bow.shot_power, 0);
    }

    #[test]
    fn test_weak_shot_is_weak() {
        let mut world = arena(Loadout::new());
        world.player.body.facing_right = false;
        world.player.bow.shoot_requested = true;
        world.player.bow.shot_power = FIXED_ONE / 4;
        run(&mut world);

        let arrow = &world.projectiles[0];
        // 10 x (0.1 + 2.9 / 16)
        assert!(close(arrow.damage, from_ratio(28125, 10_000)));
        assert!(arrow.vel.x < 0);
    }

    #[test]
    fn test_melee_hits_on_strike_frame_only() {
        let mut world = arena(Loadout::new());
        let front = add_enemy(&mut world, Archetype::Chaser, 150, 540, false);
        add_enemy(&mut world, Archetype::Chaser, 40, 540, true);

        world.player.attack.start(AttackTiming::player_melee(FIXED_ONE));
        world.player.attack.advance();
        let (_, events) = run(&mut world);
        assert!(events.is_empty());

        while !world.player.attack.is_strike_tick() {
            world.player.attack.advance();
        }
        let (loot, events) = run(&mut world);
        assert!(loot.is_none());
        assert_eq!(events, vec![GameEventData::Hit { target: HitTarget::Enemy(front) }]);
        assert_eq!(world.enemies[0].body.health, from_int(110));
        assert_eq!(world.enemies[0].body.vel, FixedVec2::from_ints(7, -5));
        // Behind the player: untouched
        assert_eq!(world.enemies[1].body.health, from_int(120));
    }

    #[test]
    fn test_cleaver_reaches_further() {
        let mut rng = DeterministicRng::new(2);
        let cleaver = generate_specific_loot(ItemCategory::Weapon, Rarity::Legendary, Some(WeaponType::Sword), &mut rng);
        let mut loadout = Loadout::new();
        loadout.equip(LoadoutSlot::PrimaryWeapon, cleaver).unwrap();
        let mut world = arena(loadout);
        add_enemy(&mut world, Archetype::Chaser, 250, 480, false);
        world.enemies[0].body.health = from_int(1000);

        let speed = world.player.stats.attack_speed;
        swing_to_strike(&mut world.player.attack, AttackTiming::player_melee(speed));
        run(&mut world);

        let enemy = &world.enemies[0];
        assert_eq!(enemy.body.health, from_int(1000) - world.player.stats.damage);
        assert_eq!(enemy.body.vel, FixedVec2::from_ints(15, -8));
        assert!(world.particles.iter().any(|p| p.color == ParticleColor::Dirt));
    }

    #[test]
    fn test_bow_wielder_never_melees() {
        let mut rng = DeterministicRng::new(2);
        let bow = generate_specific_loot(ItemCategory::Weapon, Rarity::Common, Some(WeaponType::Bow), &mut rng);
        let mut loadout = Loadout::new();
        loadout.equip(LoadoutSlot::PrimaryWeapon, bow).unwrap();
        let mut world = arena(loadout);
        add_enemy(&mut world, Archetype::Chaser, 150, 540, false);

        swing_to_strike(&mut world.player.attack, AttackTiming::player_melee(FIXED_ONE));
        run(&mut world);
        assert_eq!(world.enemies[0].body.health, from_int(120));
    }

    #[test]
    fn test_chaser_strike_hits_player() {
        let mut world = arena(Loadout::new());
        add_enemy(&mut world, Archetype::Chaser, 140, 540, false);
        swing_to_strike(&mut world.enemies[0].attack, AttackTiming::chaser(90));
        assert_eq!(world.enemies[0].attack.cooldown, 84);

        let (_, events) = run(&mut world);
        assert_eq!(world.player.body.health, from_int(88));
        assert_eq!(world.player.body.vel, FixedVec2::from_ints(-10, -6));
        assert_eq!(events, vec![GameEventData::Hit { target: HitTarget::Player }]);
    }

    #[test]
    fn test_ranger_volley_leads_target() {
        let mut world = arena(Loadout::new());
        let id = add_enemy(&mut world, Archetype::Ranger, 500, 540, false);
        swing_to_strike(&mut world.enemies[0].attack, AttackTiming::ranger(90));
        assert_eq!(world.enemies[0].attack.cooldown, 125);

        let (_, events) = run(&mut world);
        assert_eq!(events, vec![GameEventData::EnemyFired { enemy_id: id }]);
        assert_eq!(world.projectiles.len(), 1);
        let arrow = &world.projectiles[0];
        assert_eq!(arrow.owner, Owner::Enemy(id));
        assert!(arrow.vel.x < 0);
        assert_eq!(arrow.damage, from_int(12));
    }

    fn enemy_arrow_at_player(world: &mut WorldState) {
        world.projectiles.push(Projectile {
            pos: FixedVec2::from_ints(110, 560),
            vel: FixedVec2::ZERO,
            width: ARROW_WIDTH,
            height: ARROW_HEIGHT,
            damage: from_int(12),
            life: ARROW_LIFE,
            owner: Owner::Enemy(EnemyId(9)),
        });
    }

    #[test]
    fn test_enemy_arrows_pass_through_player_by_default() {
        let mut world = arena(Loadout::new());
        enemy_arrow_at_player(&mut world);
        run(&mut world);
        assert_eq!(world.player.body.health, from_int(100));
        assert_eq!(world.projectiles.len(), 1);
    }

    #[test]
    fn test_enemy_arrows_hit_when_enabled() {
        let config = MatchConfig { enemy_projectiles_hit_player: true, ..MatchConfig::default() };
        let mut world = arena(Loadout::new());
        enemy_arrow_at_player(&mut world);
        resolve_combat(&mut world, &config);
        assert_eq!(world.player.body.health, from_int(88));
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_player_arrow_hits_first_enemy_once() {
        let mut world = arena(Loadout::new());
        let first = add_enemy(&mut world, Archetype::Chaser, 300, 540, true);
        add_enemy(&mut world, Archetype::Chaser, 300, 540, true);
        world.projectiles.push(Projectile {
            pos: FixedVec2::from_ints(280, 560),
            vel: FixedVec2::from_ints(10, 0),
            width: ARROW_WIDTH,
            height: ARROW_HEIGHT,
            damage: from_int(20),
            life: ARROW_LIFE,
            owner: Owner::Player,
        });

        let (_, events) = run(&mut world);
        assert!(world.projectiles.is_empty());
        assert_eq!(world.enemies[0].body.health, from_int(100));
        assert_eq!(world.enemies[0].body.vel, FixedVec2::from_ints(5, -3));
        assert_eq!(world.enemies[1].body.health, from_int(120));
        assert_eq!(events, vec![GameEventData::Hit { target: HitTarget::Enemy(first) }]);
    }

    #[test]
    fn test_arrow_breaks_on_platform() {
        let mut world = arena(Loadout::new());
        world.platforms = vec![Platform::solid(300, 500, 100, 100)];
        world.projectiles.push(Projectile {
            pos: FixedVec2::from_ints(280, 520),
            vel: FixedVec2::from_ints(10, 0),
            width: ARROW_WIDTH,
            height: ARROW_HEIGHT,
            damage: from_int(20),
            life: ARROW_LIFE,
            owner: Owner::Player,
        });
        run(&mut world);
        assert!(world.projectiles.is_empty());
        assert_eq!(world.particles.len(), 3);
        assert!(world.particles.iter().all(|p| p.color == ParticleColor::Gray));
    }

    #[test]
    fn test_arrow_expires() {
        let mut world = arena(Loadout::new());
        world.projectiles.push(Projectile {
            pos: FixedVec2::from_ints(1000, 100),
            vel: FixedVec2::from_ints(10, 0),
            width: ARROW_WIDTH,
            height: ARROW_HEIGHT,
            damage: from_int(20),
            life: 1,
            owner: Owner::Player,
        });
        run(&mut world);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_gearless_enemy_drops_one_random_item() {
        let mut world = arena(Loadout::new());
        let id = add_enemy(&mut world, Archetype::Chaser, 700, 540, true);
        world.enemies[0].body.health = 0;

        let (loot, events) = run(&mut world);
        let loot = loot.expect("victory");
        assert_eq!(loot.len(), 1);
        assert!(loot[0].collected);
        assert_eq!(loot[0].position, FixedVec2::from_ints(700, 540));
        assert!(world.enemies.is_empty());
        assert!(events.contains(&GameEventData::EnemyDefeated { enemy_id: id, drops: 1 }));
    }

    #[test]
    fn test_geared_enemy_drops_everything() {
        let mut world = arena(Loadout::new());
        add_enemy(&mut world, Archetype::Chaser, 700, 540, true);
        let mut rng = DeterministicRng::new(40);
        let helmet = generate_specific_loot(ItemCategory::Helmet, Rarity::Rare, None, &mut rng);
        let sword = generate_specific_loot(ItemCategory::Weapon, Rarity::Rare, Some(WeaponType::Sword), &mut rng);
        let worn_ids = [helmet.id, sword.id];
        world.enemies[0].loadout.equip(LoadoutSlot::Helmet, helmet).unwrap();
        world.enemies[0].loadout.equip(LoadoutSlot::PrimaryWeapon, sword).unwrap();
        world.enemies[0].body.health = -from_int(5);

        let (loot, _) = run(&mut world);
        let loot = loot.expect("victory");
        assert_eq!(loot.len(), 2);
        for drop in &loot {
            assert!(!worn_ids.contains(&drop.id));
            assert!(drop.collected);
            assert_eq!(drop.position.y, from_int(540));
            assert!((drop.position.x - from_int(700)).abs() <= LOOT_SCATTER);
        }
        assert_ne!(loot[0].id, loot[1].id);
    }

    #[test]
    fn test_void_death_awards_nothing() {
        let mut world = arena(Loadout::new());
        let id = add_enemy(&mut world, Archetype::Chaser, 700, 900, true);
        world.enemies[0].body.health = 0;

        let (loot, events) = run(&mut world);
        assert!(loot.is_none());
        assert!(world.enemies.is_empty());
        assert_eq!(events, vec![GameEventData::EnemyDefeated { enemy_id: id, drops: 0 }]);
    }

    #[test]
    fn test_same_tick_deaths_pool_loot() {
        let mut world = arena(Loadout::new());
        add_enemy(&mut world, Archetype::Chaser, 700, 540, true);
        add_enemy(&mut world, Archetype::Ranger, 900, 540, true);
        add_enemy(&mut world, Archetype::Ranger, 1100, 540, true);
        world.enemies[0].body.health = 0;
        world.enemies[1].body.health = 0;

        let (loot, _) = run(&mut world);
        assert_eq!(loot.map(|l| l.len()), Some(2));
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.enemies[0].body.pos.x, from_int(1100));
    }
}
