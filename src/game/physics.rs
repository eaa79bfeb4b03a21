//! Physics Kernel
//!
//! One fixed step for one body: gravity, friction, speed clamps, then
//! axis-separated movement and platform resolution. The horizontal pass
//! finishes before the vertical pass starts, so at a corner the
//! horizontal axis wins.

use crate::core::fixed::{
    fixed_mul, GRAVITY, FRICTION, MAX_SPEED_X, MAX_SPEED_Y, VOID_DEATH_Y, WALL_SLIDE_TICKS,
};
use crate::game::collision::aabb_overlap;
use crate::game::state::{Body, Platform, WallSlide};

/// Advance `body` one tick against `platforms`.
///
/// Bodies that can cling to walls pass their `WallSlide`; hitting a wall
/// while airborne (as of the previous tick) starts a slide.
pub fn apply_physics(body: &mut Body, mut wall_slide: Option<&mut WallSlide>, platforms: &[Platform]) {
    let sliding = wall_slide.as_deref().is_some_and(|slide| slide.active);
    if !sliding {
        body.vel.y += GRAVITY;
    }

    body.vel.x = fixed_mul(body.vel.x, FRICTION);
    body.vel.x = body.vel.x.clamp(-MAX_SPEED_X, MAX_SPEED_X);
    body.vel.y = body.vel.y.clamp(-MAX_SPEED_Y, MAX_SPEED_Y);

    body.pos.x += body.vel.x;
    resolve_horizontal(body, wall_slide.as_deref_mut(), platforms);

    body.grounded = false;
    body.pos.y += body.vel.y;
    resolve_vertical(body, wall_slide, platforms);

    if body.pos.y > VOID_DEATH_Y {
        body.health = 0;
    }
}

fn resolve_horizontal(body: &mut Body, mut wall_slide: Option<&mut WallSlide>, platforms: &[Platform]) {
    for platform in platforms.iter().filter(|p| p.is_solid()) {
        if !aabb_overlap(body, platform) {
            continue;
        }

        let side = if body.vel.x > 0 {
            body.pos.x = platform.rect.pos.x - body.width;
            1
        } else if body.vel.x < 0 {
            body.pos.x = platform.rect.right();
            -1
        } else {
            0
        };

        if side != 0 && !body.grounded {
            if let Some(slide) = wall_slide.as_deref_mut() {
                if !slide.active {
                    slide.start(side, WALL_SLIDE_TICKS);
                    body.vel.y = 0;
                }
            }
        }
        body.vel.x = 0;
    }
}

fn resolve_vertical(body: &mut Body, mut wall_slide: Option<&mut WallSlide>, platforms: &[Platform]) {
    for platform in platforms.iter().filter(|p| p.is_solid()) {
        if !aabb_overlap(body, platform) {
            continue;
        }

        if body.vel.y > 0 {
            body.pos.y = platform.rect.pos.y - body.height;
            body.grounded = true;
            body.vel.y = 0;
            if let Some(slide) = wall_slide.as_deref_mut() {
                slide.release();
            }
        } else if body.vel.y < 0 {
            body.pos.y = platform.rect.bottom();
            body.vel.y = 0;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
