//! Particle Effects
//!
//! Cosmetic only. Particles draw from the match RNG so a replay renders
//! the same sparks, but nothing in the simulation reads them back.

use crate::core::fixed::{Fixed, FIXED_HALF, FIXED_ONE, from_int, from_ratio, fixed_mul};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::FixedVec2;
use crate::game::state::{Body, Particle, ParticleColor};

/// Dash trail inherits this fraction of the body's velocity, reversed.
const TRAIL_DRAG: Fixed = from_ratio(1, 5);

/// Spray `count` particles from `origin` with velocity components in
/// (-speed/2, speed/2) and a life of 30..50 ticks.
pub fn spray(
    particles: &mut Vec<Particle>,
    rng: &mut DeterministicRng,
    origin: FixedVec2,
    color: ParticleColor,
    count: u32,
    speed: Fixed,
) {
    let half = speed / 2;
    for _ in 0..count {
        let vel = FixedVec2::new(
            rng.next_fixed_range(-half, half),
            rng.next_fixed_range(-half, half),
        );
        particles.push(Particle {
            pos: origin,
            vel,
            life: 30 + rng.next_int(20),
            color,
            size: FIXED_ONE + rng.next_fixed(from_int(3)),
        });
    }
}

/// Hit and death sparks.
pub fn burst(
    particles: &mut Vec<Particle>,
    rng: &mut DeterministicRng,
    origin: FixedVec2,
    color: ParticleColor,
    count: u32,
) {
    spray(particles, rng, origin, color, count, from_int(8));
}

/// Six puffs of dust under a jumping body.
pub fn jump_dust(particles: &mut Vec<Particle>, rng: &mut DeterministicRng, body: &Body) {
    let center_x = body.pos.x + body.width / 2;
    let feet = body.pos.y + body.height;
    for _ in 0..6 {
        let x = center_x + fixed_mul(rng.next_unit() - FIXED_HALF, body.width);
        let vx = rng.next_fixed_range(-from_int(2), from_int(2));
        let vy = -FIXED_ONE - rng.next_fixed(from_int(2));
        particles.push(Particle {
            pos: FixedVec2::new(x, feet),
            vel: FixedVec2::new(vx, vy),
            life: 10,
            color: ParticleColor::White,
            size: FIXED_ONE + rng.next_fixed(from_int(2)),
        });
    }
}

/// One trail puff behind a dashing body.
pub fn dash_trail(particles: &mut Vec<Particle>, rng: &mut DeterministicRng, body: &Body) {
    let pos = FixedVec2::new(
        body.pos.x + body.width / 2,
        body.pos.y + rng.next_fixed(body.height),
    );
    let vel = FixedVec2::new(-fixed_mul(body.vel.x, TRAIL_DRAG), rng.next_signed_unit());
    particles.push(Particle {
        pos,
        vel,
        life: 20,
        color: ParticleColor::Trail,
        size: from_int(2) + rng.next_fixed(from_int(4)),
    });
}

/// Ten dirt clods kicked up in front of a heavy swing.
pub fn ground_smash(particles: &mut Vec<Particle>, rng: &mut DeterministicRng, at: FixedVec2) {
    for _ in 0..10 {
        let x = at.x + rng.next_fixed_range(-from_int(10), from_int(10));
        let vx = rng.next_fixed_range(-from_ratio(5, 2), from_ratio(5, 2));
        let vy = -from_int(2) - rng.next_fixed(from_int(5));
        particles.push(Particle {
            pos: FixedVec2::new(x, at.y),
            vel: FixedVec2::new(vx, vy),
            life: 30,
            color: ParticleColor::Dirt,
            size: FIXED_ONE + rng.next_fixed(from_int(3)),
        });
    }
}

/// Move every particle and drop the expired ones.
pub fn age_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos = particle.pos + particle.vel;
        particle.life = particle.life.saturating_sub(1);
    }
    particles.retain(|p| p.life > 0);
}
