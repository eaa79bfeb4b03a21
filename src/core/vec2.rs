//! Fixed-Point 2D Vector
//!
//! Deterministic 2D vector operations for game physics.
//! All operations use fixed-point arithmetic.

use std::fmt;
use std::ops::{Add, Sub, Neg};
use serde::{Serialize, Deserialize};

use super::fixed::{
    Fixed, FIXED_ONE, FIXED_SCALE,
    fixed_mul, fixed_lerp, isqrt_u64,
};

/// 2D vector with fixed-point components. +Y points down.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FixedVec2 {
    /// X component (Q16.16 fixed-point)
    pub x: Fixed,
    /// Y component (Q16.16 fixed-point)
    pub y: Fixed,
}

impl FixedVec2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new vector from fixed-point components.
    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Create a vector from integer components.
    #[inline]
    pub const fn from_ints(x: i32, y: i32) -> Self {
        Self {
            x: x << FIXED_SCALE,
            y: y << FIXED_SCALE,
        }
    }

    /// Add another vector.
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_add(other.x),
            y: self.y.wrapping_add(other.y),
        }
    }

    /// Subtract another vector.
    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_sub(other.x),
            y: self.y.wrapping_sub(other.y),
        }
    }

    /// Scale by a fixed-point scalar.
    #[inline]
    pub fn scale(self, scalar: Fixed) -> Self {
        Self {
            x: fixed_mul(self.x, scalar),
            y: fixed_mul(self.y, scalar),
        }
    }

    /// Scale by an integer scalar (faster than fixed multiply).
    #[inline]
    pub fn scale_int(self, scalar: i32) -> Self {
        Self {
            x: self.x.wrapping_mul(scalar),
            y: self.y.wrapping_mul(scalar),
        }
    }

    /// Squared distance to another point in Q32.32.
    ///
    /// Arena-scale distances overflow Q16.16 once squared, so this widens
    /// to i64 before multiplying.
    #[inline]
    pub fn distance_squared_wide(self, other: Self) -> i64 {
        let dx = (self.x as i64) - (other.x as i64);
        let dy = (self.y as i64) - (other.y as i64);
        dx * dx + dy * dy
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> Fixed {
        isqrt_u64(self.distance_squared_wide(other) as u64) as Fixed
    }

    /// True when `other` lies strictly closer than `radius`.
    #[inline]
    pub fn within(self, other: Self, radius: Fixed) -> bool {
        let r = radius as i64;
        self.distance_squared_wide(other) < r * r
    }

    /// Length (magnitude).
    #[inline]
    pub fn length(self) -> Fixed {
        self.distance(Self::ZERO)
    }

    /// Rescale to the given length.
    /// Returns ZERO if the vector has no length.
    pub fn with_length(self, length: Fixed) -> Self {
        let len = self.length() as i64;
        if len == 0 {
            return Self::ZERO;
        }
        Self {
            x: ((self.x as i64 * length as i64) / len) as Fixed,
            y: ((self.y as i64 * length as i64) / len) as Fixed,
        }
    }

    /// Linear interpolation between two vectors.
    /// t = 0 returns self, t = FIXED_ONE returns other.
    #[inline]
    pub fn lerp(self, other: Self, t: Fixed) -> Self {
        Self {
            x: fixed_lerp(self.x, other.x, t),
            y: fixed_lerp(self.y, other.y, t),
        }
    }

    /// Negate both components.
    #[inline]
    pub fn negate(self) -> Self {
        Self {
            x: self.x.wrapping_neg(),
            y: self.y.wrapping_neg(),
        }
    }

    /// Convert to float tuple for rendering.
    #[inline]
    pub fn to_floats(self) -> (f32, f32) {
        (
            self.x as f32 / FIXED_ONE as f32,
            self.y as f32 / FIXED_ONE as f32,
        )
    }
}

// Operator overloads for ergonomics
impl Add for FixedVec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        FixedVec2::add(self, rhs)
    }
}

impl Sub for FixedVec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        FixedVec2::sub(self, rhs)
    }
}

impl Neg for FixedVec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.negate()
    }
}

impl fmt::Debug for FixedVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fx, fy) = self.to_floats();
        write!(f, "Vec2({:.3}, {:.3})", fx, fy)
    }
}

impl fmt::Display for FixedVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fx, fy) = self.to_floats();
        write!(f, "({:.3}, {:.3})", fx, fy)
    }
}

// =============================================================================
// TESTS
// =============================================================================
