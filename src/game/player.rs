//! Player Control
//!
//! Reads one input frame and updates the player's velocity, facing and
//! attack intent. Positions are left to the physics pass.
//!
//! States short-circuit in priority order: active dash, dash trigger,
//! wall slide, then normal movement and actions. A melee swing keeps
//! counting down through every state, so its hit frame comes exactly once.

use crate::core::fixed::{
    FIXED_ONE, fixed_div, fixed_mul,
    BOW_DRAW_SLOWDOWN, DASH_COOLDOWN, DASH_DURATION, DASH_SPEED, DOUBLE_JUMP_DELAY,
    JUMP_VELOCITY, WALL_JUMP_PUSH,
};
use crate::core::vec2::FixedVec2;
use crate::game::effects;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::{InputFrame, Key};
use crate::game::item::WeaponSlot;
use crate::game::state::{AttackTiming, BowCharge, Player, WorldState};

/// Run player control for the current tick.
pub fn update_player(world: &mut WorldState, input: InputFrame) {
    let tick = world.game_time;
    let WorldState { player, rng, particles, pending_events, .. } = world;
    let mut emit = |data: GameEventData| pending_events.push(GameEvent::new(tick, data));

    // Dash
    player.dash.cooldown = player.dash.cooldown.saturating_sub(1);
    if player.dash.is_active() {
        player.dash.timer -= 1;
        player.body.vel = FixedVec2::new(DASH_SPEED * player.body.facing_sign(), 0);
        advance_melee(player);
        return;
    }

    if input.is_down(Key::Dash) && player.dash.cooldown == 0 && !player.wall_slide.active {
        player.dash.timer = DASH_DURATION;
        player.dash.cooldown = DASH_COOLDOWN;
        emit(GameEventData::Dashed);
        advance_melee(player);
        return;
    }

    let jump_down = input.is_down(Key::Jump);
    let fresh_jump = jump_down && !player.jump.jump_was_down;

    // Wall slide
    if player.wall_slide.active {
        player.wall_slide.timer = player.wall_slide.timer.saturating_sub(1);
        player.body.vel = FixedVec2::ZERO;

        if fresh_jump {
            let side = player.wall_slide.side;
            player.wall_slide.release();
            player.body.vel = FixedVec2::new(-side * WALL_JUMP_PUSH, JUMP_VELOCITY);
            player.body.facing_right = side < 0;
            player.jump.jump_was_down = true;
            effects::jump_dust(particles, rng, &player.body);
            emit(GameEventData::WallJumped);
            advance_melee(player);
            return;
        }

        if player.wall_slide.timer == 0 || input.is_down(Key::Down) {
            player.wall_slide.release();
        }
        player.jump.jump_was_down = jump_down;
        advance_melee(player);
        return;
    }

    // Horizontal movement
    let mut speed = player.stats.move_speed;
    if player.has_bow_active() && player.bow.is_charging() {
        speed = fixed_mul(speed, BOW_DRAW_SLOWDOWN);
    }
    if input.is_down(Key::Right) {
        player.body.vel.x += speed;
        player.body.facing_right = true;
    }
    if input.is_down(Key::Left) {
        player.body.vel.x -= speed;
        player.body.facing_right = false;
    }

    // Jumps
    player.jump.double_jump_cooldown = player.jump.double_jump_cooldown.saturating_sub(1);
    if player.body.grounded {
        player.jump.can_double_jump = true;
    }
    if fresh_jump {
        if player.body.grounded {
            player.body.vel.y = JUMP_VELOCITY;
            player.body.grounded = false;
            player.jump.double_jump_cooldown = DOUBLE_JUMP_DELAY;
            effects::jump_dust(particles, rng, &player.body);
            emit(GameEventData::Jumped);
        } else if player.jump.can_double_jump && player.jump.double_jump_cooldown == 0 {
            player.body.vel.y = JUMP_VELOCITY;
            player.jump.can_double_jump = false;
            effects::jump_dust(particles, rng, &player.body);
            emit(GameEventData::DoubleJumped);
        }
    }
    player.jump.jump_was_down = jump_down;

    // Weapon switching
    for (key, slot) in [
        (Key::SelectPrimary, WeaponSlot::Primary),
        (Key::SelectSecondary, WeaponSlot::Secondary),
    ] {
        if input.is_down(key)
            && player.loadout.weapon(slot).is_some()
            && player.active_slot != Some(slot)
        {
            player.active_slot = Some(slot);
            player.bow.charge_time = 0;
            player.recalculate_stats();
        }
    }

    // Actions
    let action = input.is_down(Key::Action);
    if player.has_bow_active() {
        if action {
            player.attack.is_attacking = true;
            player.bow.charge_time += fixed_div(FIXED_ONE, player.stats.attack_speed);
        } else {
            if player.bow.charge_time >= BowCharge::MIN_CHARGE {
                player.bow.shot_power =
                    fixed_div(player.bow.charge_time, BowCharge::MAX_CHARGE).min(FIXED_ONE);
                player.bow.shoot_requested = true;
                emit(GameEventData::Shot);
            }
            player.bow.charge_time = 0;
            player.attack.is_attacking = false;
        }
    } else {
        if action && player.attack.ready() {
            player.attack.start(AttackTiming::player_melee(player.stats.attack_speed));
            emit(GameEventData::MeleeSwing);
        }
        player.attack.advance();
    }
}

/// Count a melee swing down on ticks where movement took over.
fn advance_melee(player: &mut Player) {
    if !player.has_bow_active() {
        player.attack.advance();
    }
}

// =============================================================================
// TESTS
// =============================================================================
