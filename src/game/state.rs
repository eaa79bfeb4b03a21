//! World State Definitions
//!
//! All state types for match simulation. A single `WorldState` is owned
//! and mutated by the tick function; renderers and HUDs read snapshots
//! of it between ticks.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{
    Fixed,
    from_int, fixed_lerp,
    ATTACK_COOLDOWN, ATTACK_DURATION, ATTACK_STRIKE_DELAY, MAX_BOW_CHARGE, CAMERA_LERP,
};
use crate::core::vec2::FixedVec2;
use crate::core::rng::DeterministicRng;
use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::game::collision::{Aabb, Bounded};
use crate::game::config::MatchConfig;
use crate::game::events::GameEvent;
use crate::game::item::{Item, Loadout, Stats, WeaponSlot};
use crate::game::map;

/// Character width in pixels.
pub const CHARACTER_WIDTH: Fixed = from_int(30);

/// Character height in pixels.
pub const CHARACTER_HEIGHT: Fixed = from_int(60);

// =============================================================================
// BODY
// =============================================================================

/// Physical state shared by the player and enemies.
///
/// Health is not clamped here; consumers treat `health <= 0` as dead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: FixedVec2,
    /// Velocity in px/tick
    pub vel: FixedVec2,
    /// Width
    pub width: Fixed,
    /// Height
    pub height: Fixed,
    /// Resting on a platform after the last physics pass
    pub grounded: bool,
    /// Current health
    pub health: Fixed,
    /// Health cap
    pub max_health: Fixed,
    /// Facing direction
    pub facing_right: bool,
}

impl Body {
    /// Character-sized body at rest.
    pub fn character(pos: FixedVec2, health: Fixed, facing_right: bool) -> Self {
        Self {
            pos,
            vel: FixedVec2::ZERO,
            width: CHARACTER_WIDTH,
            height: CHARACTER_HEIGHT,
            grounded: false,
            health,
            max_health: health,
            facing_right,
        }
    }

    /// +1 when facing right, -1 when facing left.
    #[inline]
    pub fn facing_sign(&self) -> i32 {
        if self.facing_right { 1 } else { -1 }
    }

    /// Geometric center.
    #[inline]
    pub fn center(&self) -> FixedVec2 {
        self.bounds().center()
    }

    /// Whether health is exhausted.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Add to a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_vec2(self.pos);
        hasher.update_vec2(self.vel);
        hasher.update_bool(self.grounded);
        hasher.update_fixed(self.health);
        hasher.update_fixed(self.max_health);
        hasher.update_bool(self.facing_right);
    }
}

impl Bounded for Body {
    #[inline]
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.width, self.height)
    }
}

// =============================================================================
// MOVEMENT STATE
// =============================================================================

/// Wall-slide capability. Side is +1 for a wall on the right, -1 on the left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallSlide {
    /// Currently stuck to a wall
    pub active: bool,
    /// Which side the wall is on
    pub side: i32,
    /// Ticks left before the slide ends on its own
    pub timer: u32,
}

impl WallSlide {
    /// Begin sliding against a wall on `side`.
    pub fn start(&mut self, side: i32, ticks: u32) {
        self.active = true;
        self.side = side;
        self.timer = ticks;
    }

    /// Let go of the wall.
    pub fn release(&mut self) {
        self.active = false;
    }
}

/// Jump bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpState {
    /// Second jump still available this airtime
    pub can_double_jump: bool,
    /// Jump key level on the previous tick (rising-edge detector)
    pub jump_was_down: bool,
    /// Lockout after a ground jump before the double jump may fire
    pub double_jump_cooldown: u32,
}

impl Default for JumpState {
    fn default() -> Self {
        Self { can_double_jump: true, jump_was_down: false, double_jump_cooldown: 0 }
    }
}

/// Dash timers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashState {
    /// Ticks until the next dash is allowed
    pub cooldown: u32,
    /// Ticks left in the current dash
    pub timer: u32,
}

impl DashState {
    /// Whether a dash is in progress.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.timer > 0
    }
}

/// Bow draw state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowCharge {
    /// Accumulated draw, in ticks scaled by attack speed; uncapped while held
    pub charge_time: Fixed,
    /// Normalized power of the pending shot (0.25..=1.0)
    pub shot_power: Fixed,
    /// One-shot flag consumed by combat resolution
    pub shoot_requested: bool,
}

impl BowCharge {
    /// Charge needed to fire (25 % of max).
    pub const MIN_CHARGE: Fixed = from_int(MAX_BOW_CHARGE as i32 / 4);

    /// Charge at full power.
    pub const MAX_CHARGE: Fixed = from_int(MAX_BOW_CHARGE as i32);

    /// Whether a draw is in progress.
    #[inline]
    pub fn is_charging(&self) -> bool {
        self.charge_time > 0
    }
}

/// Cooldown-gated attack with a trailing "is attacking" window.
///
/// A swing arms with `cooldown = cooldown_max`. `is_attacking` holds while
/// the cooldown is within `window` ticks of its start, and the hit lands
/// on the tick the cooldown reads `strike_at`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackState {
    /// Attack intent flag
    pub is_attacking: bool,
    /// Ticks until the next attack may start
    pub cooldown: u32,
    /// Cooldown the current swing started from
    pub cooldown_max: u32,
    /// Length of the attacking window
    pub window: u32,
    /// Cooldown value on which the hit resolves
    pub strike_at: u32,
}

/// Timing of one attack, derived from a cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackTiming {
    /// Full cooldown
    pub cooldown: u32,
    /// Attacking window
    pub window: u32,
    /// Cooldown value of the hit frame
    pub strike_at: u32,
}

impl AttackTiming {
    /// Player melee timing for an attack-speed multiplier.
    ///
    /// Cooldown is `round(30 / speed)` but never shorter than the swing
    /// itself plus one tick, so the swing window always fits.
    pub fn player_melee(attack_speed: Fixed) -> Self {
        let speed = attack_speed.max(1) as i64;
        // round(base / speed) on whole ticks
        let scaled = |base: u32| {
            let quotient = ((base as i64) << 32) / speed;
            ((quotient + (1 << 15)) >> 16).min(u32::MAX as i64) as u32
        };
        let cooldown = scaled(ATTACK_COOLDOWN).max(ATTACK_DURATION + 1);
        let delay = scaled(ATTACK_STRIKE_DELAY).clamp(1, ATTACK_DURATION);
        Self { cooldown, window: ATTACK_DURATION, strike_at: cooldown - delay }
    }

    /// Chaser swing: hits on the sixth tick.
    pub fn chaser(base_cooldown: u32) -> Self {
        Self {
            cooldown: base_cooldown,
            window: ATTACK_DURATION,
            strike_at: base_cooldown.saturating_sub(6),
        }
    }

    /// Ranger volley: half again as slow, fires ten ticks in, and stays
    /// "attacking" until the cooldown drops below `base - 15`.
    pub fn ranger(base_cooldown: u32) -> Self {
        let cooldown = base_cooldown * 3 / 2;
        Self {
            cooldown,
            window: cooldown - base_cooldown.saturating_sub(ATTACK_DURATION),
            strike_at: cooldown.saturating_sub(10),
        }
    }
}

impl AttackState {
    /// Whether a new attack may start.
    #[inline]
    pub fn ready(&self) -> bool {
        self.cooldown == 0
    }

    /// Arm a new attack.
    pub fn start(&mut self, timing: AttackTiming) {
        self.is_attacking = true;
        self.cooldown = timing.cooldown;
        self.cooldown_max = timing.cooldown;
        self.window = timing.window;
        self.strike_at = timing.strike_at;
    }

    /// Advance one tick: count down and close the attacking window.
    ///
    /// A spent cooldown always clears the flag, which also drops a stale
    /// bow draw after switching to a melee weapon.
    pub fn advance(&mut self) {
        if self.cooldown > 0 {
            self.cooldown -= 1;
        }
        if self.cooldown == 0 || self.cooldown + self.window < self.cooldown_max {
            self.is_attacking = false;
        }
    }

    /// Whether this tick is the hit frame.
    #[inline]
    pub fn is_strike_tick(&self) -> bool {
        self.is_attacking && self.cooldown == self.strike_at
    }

    fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_bool(self.is_attacking);
        hasher.update_u32(self.cooldown);
        hasher.update_u32(self.cooldown_max);
        hasher.update_u32(self.strike_at);
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// The controlled character.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Physical body
    pub body: Body,
    /// Display name
    pub name: String,
    /// Melee swing state
    pub attack: AttackState,
    /// Items picked up this match (append-only)
    pub inventory: Vec<Item>,
    /// Stats from armor only, cached at match start
    pub base_stats: Stats,
    /// Base stats plus the active weapon
    pub stats: Stats,
    /// Equipped gear
    pub loadout: Loadout,
    /// Active weapon selector
    pub active_slot: Option<WeaponSlot>,
    /// Bow draw
    pub bow: BowCharge,
    /// Jump bookkeeping
    pub jump: JumpState,
    /// Wall-slide state
    pub wall_slide: WallSlide,
    /// Dash timers
    pub dash: DashState,
}

impl Player {
    /// Create a player wearing `loadout` at `pos`.
    pub fn new(name: impl Into<String>, loadout: Loadout, pos: FixedVec2) -> Self {
        let base_stats = Stats::from_armor(&loadout);
        let active_slot = loadout.default_active_slot();
        let stats = base_stats.with_weapon(active_slot.and_then(|s| loadout.weapon(s)));

        Self {
            body: Body::character(pos, base_stats.health, true),
            name: name.into(),
            attack: AttackState::default(),
            inventory: Vec::new(),
            base_stats,
            stats,
            loadout,
            active_slot,
            bow: BowCharge::default(),
            jump: JumpState::default(),
            wall_slide: WallSlide::default(),
            dash: DashState::default(),
        }
    }

    /// The weapon in the active slot.
    pub fn active_weapon(&self) -> Option<&Item> {
        self.active_slot.and_then(|slot| self.loadout.weapon(slot))
    }

    /// Whether the active weapon is a bow.
    pub fn has_bow_active(&self) -> bool {
        self.active_weapon().is_some_and(Item::is_bow)
    }

    /// Recompute current stats from cached base stats and the active weapon.
    pub fn recalculate_stats(&mut self) {
        self.stats = self.base_stats.with_weapon(self.active_weapon());
    }

    fn hash_into(&self, hasher: &mut StateHasher) {
        self.body.hash_into(hasher);
        self.attack.hash_into(hasher);
        self.stats.hash_into(hasher);
        self.loadout.hash_into(hasher);
        hasher.update_u8(self.active_slot.map_or(0xFF, |s| s as u8));
        hasher.update_fixed(self.bow.charge_time);
        hasher.update_bool(self.bow.shoot_requested);
        hasher.update_bool(self.jump.can_double_jump);
        hasher.update_bool(self.jump.jump_was_down);
        hasher.update_u32(self.jump.double_jump_cooldown);
        hasher.update_bool(self.wall_slide.active);
        hasher.update_i32(self.wall_slide.side);
        hasher.update_u32(self.wall_slide.timer);
        hasher.update_u32(self.dash.cooldown);
        hasher.update_u32(self.dash.timer);
        hasher.update_u32(self.inventory.len() as u32);
        for item in &self.inventory {
            item.hash_into(hasher);
        }
    }
}

// =============================================================================
// ENEMIES
// =============================================================================

/// Enemy identifier, monotonic within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Enemy behavior archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Archetype {
    /// Closes to melee range
    Chaser = 0,
    /// Holds a stand-off distance and shoots
    Ranger = 1,
}

impl Archetype {
    /// Default detection range.
    pub fn detection_range(self) -> Fixed {
        match self {
            Archetype::Chaser => from_int(1000),
            Archetype::Ranger => from_int(1200),
        }
    }
}

/// An AI opponent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Enemy {
    /// Identifier
    pub id: EnemyId,
    /// Behavior
    pub archetype: Archetype,
    /// Physical body
    pub body: Body,
    /// Distance at which the player is noticed
    pub detection_range: Fixed,
    /// Effective stats (defaults plus all gear)
    pub stats: Stats,
    /// Attack cadence
    pub attack: AttackState,
    /// Armor and primary weapon; enemies never switch weapons
    pub loadout: Loadout,
    /// Jump bookkeeping
    pub jump: JumpState,
    /// Wall-slide state
    pub wall_slide: WallSlide,
    /// Rarity tier the gear was rolled at (1..=5)
    pub gear_tier: u8,
}

impl Enemy {
    fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id.0);
        hasher.update_u8(self.archetype as u8);
        self.body.hash_into(hasher);
        self.stats.hash_into(hasher);
        self.attack.hash_into(hasher);
        self.loadout.hash_into(hasher);
        hasher.update_bool(self.jump.can_double_jump);
        hasher.update_bool(self.wall_slide.active);
    }
}

// =============================================================================
// WORLD OBJECTS
// =============================================================================

/// Platform collision behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Blocks from every side
    Solid,
    /// Declared but never collides
    OneWay,
}

/// Static level geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Extent
    pub rect: Aabb,
    /// Collision behavior
    pub kind: PlatformKind,
}

impl Platform {
    /// Solid platform from integer pixel coordinates.
    pub const fn solid(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            rect: Aabb::new(FixedVec2::from_ints(x, y), from_int(width), from_int(height)),
            kind: PlatformKind::Solid,
        }
    }

    /// Whether bodies collide with it.
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.kind == PlatformKind::Solid
    }
}

impl Bounded for Platform {
    #[inline]
    fn bounds(&self) -> Aabb {
        self.rect
    }
}

/// Who fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    /// The player's bow
    Player,
    /// An enemy ranger
    Enemy(EnemyId),
}

/// An arrow in flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    /// Top-left corner
    pub pos: FixedVec2,
    /// Velocity in px/tick
    pub vel: FixedVec2,
    /// Width
    pub width: Fixed,
    /// Height
    pub height: Fixed,
    /// Damage on hit
    pub damage: Fixed,
    /// Ticks left before it expires
    pub life: u32,
    /// Shooter
    pub owner: Owner,
}

impl Bounded for Projectile {
    #[inline]
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.width, self.height)
    }
}

/// Cosmetic particle palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Jump dust and arrows
    White,
    /// Standard hits
    Red,
    /// Cleaver hits and deaths
    Orange,
    /// Player hurt
    Blue,
    /// Arrow impacts
    Gray,
    /// Pickups
    Yellow,
    /// Ground smash
    Dirt,
    /// Translucent dash trail
    Trail,
}

/// Purely visual particle. Never affects gameplay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Particle {
    /// Position
    pub pos: FixedVec2,
    /// Velocity
    pub vel: FixedVec2,
    /// Ticks left
    pub life: u32,
    /// Color
    pub color: ParticleColor,
    /// Size in pixels
    pub size: Fixed,
}

/// Inert extraction point kept for the renderer; placed off-map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionZone {
    /// Extent
    pub rect: Aabb,
    /// Never activated by the current ruleset
    pub active: bool,
    /// Unused countdown
    pub timer: u32,
}

impl Default for ExtractionZone {
    fn default() -> Self {
        Self {
            rect: Aabb::new(FixedVec2::from_ints(-1000, -1000), from_int(100), from_int(200)),
            active: false,
            timer: 0,
        }
    }
}

/// Camera offset that trails the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left of the view in world space
    pub pos: FixedVec2,
    /// Viewport width
    pub viewport_width: Fixed,
    /// Viewport height
    pub viewport_height: Fixed,
}

impl Camera {
    /// Camera at the origin with the given viewport.
    pub fn new(viewport_width: Fixed, viewport_height: Fixed) -> Self {
        Self { pos: FixedVec2::ZERO, viewport_width, viewport_height }
    }

    /// Ease 10 % of the way toward centering the viewport on `target`.
    pub fn follow(&mut self, target: FixedVec2) {
        let goal = FixedVec2::new(
            target.x - self.viewport_width / 2,
            target.y - self.viewport_height / 2,
        );
        self.pos = FixedVec2::new(
            fixed_lerp(self.pos.x, goal.x, CAMERA_LERP),
            fixed_lerp(self.pos.y, goal.y, CAMERA_LERP),
        );
    }
}

// =============================================================================
// MATCH PHASE
// =============================================================================

/// Current phase of the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Ticking
    #[default]
    Playing,
    /// An outcome was reported; no further ticks run
    Ended,
}

// =============================================================================
// WORLD STATE
// =============================================================================

/// Complete state of a match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldState {
    /// RNG seed (for verification)
    pub seed: u64,
    /// Ticks elapsed
    pub game_time: u32,
    /// Current phase
    pub phase: MatchPhase,
    /// Deterministic RNG state
    #[serde(skip)]
    pub rng: DeterministicRng,
    /// The player
    pub player: Player,
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    /// Ground drops
    pub items: Vec<Item>,
    /// Level geometry
    pub platforms: Vec<Platform>,
    /// Cosmetic particles
    pub particles: Vec<Particle>,
    /// Arrows in flight
    pub projectiles: Vec<Projectile>,
    /// Inert extraction zone
    pub extraction_zone: ExtractionZone,
    /// View offset
    pub camera: Camera,
    /// How far each sudden-death wall has advanced
    pub sudden_death_offset: Fixed,
    /// Next enemy id (monotonic counter)
    pub next_enemy_id: u32,
    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl WorldState {
    /// Build the opening state of a match.
    pub fn new(seed: u64, loadout: Loadout, config: &MatchConfig) -> Self {
        let mut world = Self {
            seed,
            game_time: 0,
            phase: MatchPhase::Playing,
            rng: DeterministicRng::new(seed),
            player: Player::new("Hero", loadout, map::PLAYER_SPAWN),
            enemies: Vec::new(),
            items: Vec::new(),
            platforms: map::arena_platforms(),
            particles: Vec::new(),
            projectiles: Vec::new(),
            extraction_zone: ExtractionZone::default(),
            camera: Camera::new(config.viewport_width, config.viewport_height),
            sudden_death_offset: 0,
            next_enemy_id: 0,
            pending_events: Vec::new(),
        };

        if config.spawn_warden {
            let id = world.allocate_enemy_id();
            world.enemies.push(map::warden(id));
        }

        world
    }

    /// Reserve the next enemy id.
    pub fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        id
    }

    /// Check if match has ended.
    pub fn is_ended(&self) -> bool {
        self.phase == MatchPhase::Ended
    }

    /// Look up a live enemy.
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Compute hash of current state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.game_time, self.seed, |hasher| {
            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
            hasher.update_bool(self.is_ended());

            self.player.hash_into(hasher);

            hasher.update_u32(self.enemies.len() as u32);
            for enemy in &self.enemies {
                enemy.hash_into(hasher);
            }

            hasher.update_u32(self.items.len() as u32);
            for item in &self.items {
                item.hash_into(hasher);
            }

            hasher.update_u32(self.projectiles.len() as u32);
            for projectile in &self.projectiles {
                hasher.update_vec2(projectile.pos);
                hasher.update_vec2(projectile.vel);
                hasher.update_fixed(projectile.damage);
                hasher.update_u32(projectile.life);
            }

            hasher.update_u32(self.particles.len() as u32);
            hasher.update_vec2(self.camera.pos);
            hasher.update_fixed(self.sudden_death_offset);
            hasher.update_u32(self.next_enemy_id);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::FIXED_ONE;
    use proptest::prelude::*;

    #[test]
    fn test_new_world_layout() {
        let config = MatchConfig::default();
        let world = WorldState::new(1, Loadout::new(), &config);

        assert_eq!(world.player.body.pos, FixedVec2::from_ints(100, 300));
        assert_eq!(world.player.body.health, from_int(100));
        assert_eq!(world.player.active_slot, None);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.enemies[0].body.health, from_int(120));
        assert_eq!(world.platforms.len(), 10);
        assert_eq!(world.phase, MatchPhase::Playing);
    }

    #[test]
    fn test_world_without_warden() {
        let config = MatchConfig { spawn_warden: false, ..MatchConfig::default() };
        let world = WorldState::new(1, Loadout::new(), &config);
        assert!(world.enemies.is_empty());
        assert_eq!(world.next_enemy_id, 0);
    }

    #[test]
    fn test_match_state_determinism() {
        let config = MatchConfig::default();
        let a = WorldState::new(42, Loadout::new(), &config);
        let b = WorldState::new(42, Loadout::new(), &config);
        let c = WorldState::new(43, Loadout::new(), &config);

        assert_eq!(a.compute_hash(), b.compute_hash());
        assert_ne!(a.compute_hash(), c.compute_hash());
    }

    #[test]
    fn test_camera_eases_toward_player() {
        let mut camera = Camera::new(from_int(1000), from_int(800));
        camera.follow(FixedVec2::from_ints(1500, 400));
        // Goal (1000, 0), 10 % of the way
        assert!((camera.pos.x - from_int(100)).abs() < FIXED_ONE / 10);
        assert_eq!(camera.pos.y, 0);
    }

    #[test]
    fn test_player_melee_timing_at_base_speed() {
        let timing = AttackTiming::player_melee(FIXED_ONE);
        assert_eq!(timing.cooldown, 30);
        assert_eq!(timing.window, 15);
        assert_eq!(timing.strike_at, 25);
    }

    #[test]
    fn test_player_melee_timing_slow_and_fast() {
        // Cleaver wielder at 0.5: 60 tick cooldown, strike 10 in
        let slow = AttackTiming::player_melee(FIXED_ONE / 2);
        assert_eq!(slow.cooldown, 60);
        assert_eq!(slow.strike_at, 50);

        // Very fast cadence cannot shrink below the swing
        let fast = AttackTiming::player_melee(from_int(4));
        assert_eq!(fast.cooldown, ATTACK_DURATION + 1);
        assert_eq!(fast.strike_at, fast.cooldown - 1);
    }

    #[test]
    fn test_enemy_timings() {
        let chaser = AttackTiming::chaser(90);
        assert_eq!((chaser.cooldown, chaser.window, chaser.strike_at), (90, 15, 84));

        let ranger = AttackTiming::ranger(90);
        assert_eq!((ranger.cooldown, ranger.strike_at), (135, 125));

        // Attacking while cooldown >= 75
        let mut attack = AttackState::default();
        attack.start(ranger);
        let mut last_attacking = 0;
        for _ in 0..135 {
            attack.advance();
            if attack.is_attacking {
                last_attacking = attack.cooldown;
            }
        }
        assert_eq!(last_attacking, 75);

        let relaxed = AttackTiming::ranger(150);
        assert_eq!((relaxed.cooldown, relaxed.strike_at), (225, 215));
        assert_eq!(relaxed.cooldown - relaxed.window, 135);
    }

    #[test]
    fn test_spent_cooldown_clears_stale_flag() {
        let mut attack = AttackState { is_attacking: true, ..AttackState::default() };
        attack.advance();
        assert!(!attack.is_attacking);
        assert!(!attack.is_strike_tick());
    }

    proptest! {
        #[test]
        fn test_swing_window_is_exactly_fifteen_ticks(speed in 13107i32..400_000) {
            let timing = AttackTiming::player_melee(speed);
            let mut attack = AttackState::default();
            attack.start(timing);
            attack.advance();

            let mut attacking_ticks = 1;
            let mut strikes = u32::from(attack.is_strike_tick());
            let mut ended = false;
            for _ in 0..timing.cooldown + 5 {
                attack.advance();
                if attack.is_attacking {
                    prop_assert!(!ended, "window must be contiguous");
                    attacking_ticks += 1;
                } else {
                    ended = true;
                }
                strikes += u32::from(attack.is_strike_tick());
            }
            prop_assert_eq!(attacking_ticks, ATTACK_DURATION);
            prop_assert_eq!(strikes, 1);
            prop_assert!(attack.ready());
        }
    }
}
