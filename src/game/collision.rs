//! Collision Detection
//!
//! Axis-aligned rectangle predicates shared by physics, AI sensors,
//! hitboxes, projectiles and pickups. Positions are top-left corners
//! with +Y pointing down.

use serde::{Serialize, Deserialize};

use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub pos: FixedVec2,
    /// Width
    pub width: Fixed,
    /// Height
    pub height: Fixed,
}

impl Aabb {
    /// Build a box from its top-left corner and size.
    #[inline]
    pub const fn new(pos: FixedVec2, width: Fixed, height: Fixed) -> Self {
        Self { pos, width, height }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> Fixed {
        self.pos.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> Fixed {
        self.pos.y + self.height
    }

    /// Geometric center.
    #[inline]
    pub fn center(&self) -> FixedVec2 {
        FixedVec2::new(self.pos.x + self.width / 2, self.pos.y + self.height / 2)
    }

    /// Strict overlap test; touching edges do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }

    /// Inclusive point containment (edges count as inside).
    #[inline]
    pub fn contains_point(&self, point: FixedVec2) -> bool {
        point.x >= self.pos.x
            && point.x <= self.right()
            && point.y >= self.pos.y
            && point.y <= self.bottom()
    }
}

/// Anything with a rectangular footprint.
pub trait Bounded {
    /// Current bounding box.
    fn bounds(&self) -> Aabb;
}

impl Bounded for Aabb {
    #[inline]
    fn bounds(&self) -> Aabb {
        *self
    }
}

/// Strict overlap between two bounded things.
#[inline]
pub fn aabb_overlap<A: Bounded + ?Sized, B: Bounded + ?Sized>(a: &A, b: &B) -> bool {
    a.bounds().overlaps(&b.bounds())
}

// =============================================================================
// TESTS
// =============================================================================
