//! Q16.16 Fixed-Point Arithmetic
//!
//! Deterministic fixed-point math for the simulation.
//! All operations use integer arithmetic only - no floats in gameplay logic.
//!
//! ## Format: Q16.16
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bit Layout: Q16.16 (32-bit signed integer)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  [S][IIIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]                    │
//! │   │  └──── 16 bits ────┘└──── 16 bits ────┘                 │
//! │   └─ Sign bit                                               │
//! │                                                             │
//! │  Range: -32768.0 to +32767.99998 (approx)                   │
//! │  Precision: 1/65536 ≈ 0.000015 pixels                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! World units are pixels with +Y pointing down. The arena is 3000 px
//! wide and bodies die below y = 1000, so every position fits with room
//! to spare. Squared distances do not: use the `*_wide` helpers in
//! [`crate::core::vec2`] for anything longer than ~180 px.

/// Q16.16 fixed-point number stored as i32.
/// 16 bits integer, 16 bits fractional.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE; // 65536

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1; // 32768

// =============================================================================
// KINEMATIC CONSTANTS (integer literals, per tick at 60 Hz)
// =============================================================================

/// Downward acceleration: 0.6 px/tick² = floor(0.6 * 65536)
pub const GRAVITY: Fixed = 39321;

/// Horizontal velocity retained each tick: 0.85
pub const FRICTION: Fixed = 55705;

/// Horizontal speed cap: 18 px/tick
pub const MAX_SPEED_X: Fixed = 18 * FIXED_ONE;

/// Vertical speed cap: 36 px/tick (twice the horizontal cap)
pub const MAX_SPEED_Y: Fixed = 36 * FIXED_ONE;

/// Jump impulse: -17 px/tick (negative is up)
pub const JUMP_VELOCITY: Fixed = -17 * FIXED_ONE;

/// Unmodified character move speed: 4.0
pub const BASE_MOVE_SPEED: Fixed = 4 * FIXED_ONE;

/// Horizontal speed locked in while dashing: 25 px/tick
pub const DASH_SPEED: Fixed = 25 * FIXED_ONE;

/// Horizontal push-off of a player wall jump: 10 px/tick
pub const WALL_JUMP_PUSH: Fixed = 10 * FIXED_ONE;

/// Move speed factor while a bow is drawn: 0.4
pub const BOW_DRAW_SLOWDOWN: Fixed = 26214;

/// Base arrow speed: 20 px/tick
pub const ARROW_SPEED: Fixed = 20 * FIXED_ONE;

/// Downward acceleration applied to arrows: 0.25
pub const ARROW_GRAVITY: Fixed = 16384;

/// Bodies whose top edge passes this depth die: y = 1000
pub const VOID_DEATH_Y: Fixed = 1000 * FIXED_ONE;

/// Enemies dying below this depth drop nothing: y = 800
pub const VOID_LOOT_Y: Fixed = 800 * FIXED_ONE;

/// Left edge of the arena
pub const MAP_MIN_X: Fixed = 0;

/// Right edge of the arena: 3000 px
pub const MAP_MAX_X: Fixed = 3000 * FIXED_ONE;

/// Sudden-death wall advance per tick: 2.0 px
pub const SUDDEN_DEATH_WALL_SPEED: Fixed = 2 * FIXED_ONE;

/// Camera smoothing factor per tick: 0.1
pub const CAMERA_LERP: Fixed = 6553;

// =============================================================================
// TIMING CONSTANTS (ticks)
// =============================================================================

/// Ticks a melee swing stays active
pub const ATTACK_DURATION: u32 = 15;

/// Melee cooldown at attack speed 1.0
pub const ATTACK_COOLDOWN: u32 = 30;

/// Strike frame offset into a swing at attack speed 1.0
pub const ATTACK_STRIKE_DELAY: u32 = 5;

/// Bow charge at full power
pub const MAX_BOW_CHARGE: u32 = 120;

/// Lockout after a ground jump before the double jump is allowed
pub const DOUBLE_JUMP_DELAY: u32 = 15;

/// Length of a dash
pub const DASH_DURATION: u32 = 10;

/// Cooldown between dashes
pub const DASH_COOLDOWN: u32 = 180;

/// Maximum wall-slide length
pub const WALL_SLIDE_TICKS: u32 = 120;

// =============================================================================
// CORE OPERATIONS (All deterministic, wrapping semantics)
// =============================================================================

/// Convert a compile-time float to fixed-point.
///
/// # Warning
/// Only use at compile-time or initialization. NEVER in tick loop.
///
/// # Example
/// ```
/// use stickman_extraction::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i32 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert fixed-point to float for display/rendering.
///
/// # Warning
/// Only use for visual output. NEVER use result in game logic.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Build a fixed-point value from a whole number.
#[inline]
pub const fn from_int(i: i32) -> Fixed {
    i << FIXED_SCALE
}

/// Build a fixed-point value from a ratio of integers (`num / den`).
///
/// Returns 0 when `den` is zero.
#[inline]
pub const fn from_ratio(num: i32, den: i32) -> Fixed {
    if den == 0 {
        return 0;
    }
    (((num as i64) << FIXED_SCALE) / den as i64) as Fixed
}

/// Multiply two fixed-point numbers.
///
/// Uses i64 intermediate to prevent overflow, then truncates.
#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    let wide = (a as i64) * (b as i64);
    (wide >> FIXED_SCALE) as Fixed
}

/// Divide two fixed-point numbers.
///
/// Pre-shifts numerator to maintain precision.
/// Divide-by-zero returns 0 (not panic).
#[inline]
pub fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    if b == 0 {
        return 0;
    }
    let wide = (a as i64) << FIXED_SCALE;
    (wide / b as i64) as Fixed
}

/// Integer square root of a u64, rounded down.
///
/// Newton iteration on integers; terminates for every input.
pub fn isqrt_u64(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x >> 1) + (x & 1);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Absolute value of a fixed-point number.
#[inline]
pub fn fixed_abs(x: Fixed) -> Fixed {
    if x < 0 { x.wrapping_neg() } else { x }
}

/// Linear interpolation: a + (b - a) * t
/// where t is in fixed-point (0.0 = 0, 1.0 = FIXED_ONE)
#[inline]
pub fn fixed_lerp(a: Fixed, b: Fixed, t: Fixed) -> Fixed {
    let diff = b.wrapping_sub(a);
    a.wrapping_add(fixed_mul(diff, t))
}

/// Round down to a whole number.
#[inline]
pub fn fixed_floor(x: Fixed) -> i32 {
    x >> FIXED_SCALE
}

/// Round half away from zero to a whole number.
#[inline]
pub fn fixed_round(x: Fixed) -> i32 {
    if x >= 0 {
        (x + FIXED_HALF) >> FIXED_SCALE
    } else {
        -((-x + FIXED_HALF) >> FIXED_SCALE)
    }
}

/// Round up to a whole number.
#[inline]
pub fn fixed_ceil(x: Fixed) -> i32 {
    (x + FIXED_ONE - 1) >> FIXED_SCALE
}

// =============================================================================
// TESTS
// =============================================================================
