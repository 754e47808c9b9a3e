// vgfx/geometry/src/line_segment.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A line segment, and its fixed-point GPU-ready encoding.

use crate::vector::Vector2F;
use pathfinder_simd::default::F32x4;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct LineSegment2F(pub F32x4);

impl LineSegment2F {
    #[inline]
    pub fn new(from: Vector2F, to: Vector2F) -> LineSegment2F {
        LineSegment2F(F32x4::new(from.x(), from.y(), to.x(), to.y()))
    }

    #[inline]
    pub fn from(self) -> Vector2F {
        Vector2F::new(self.0[0], self.0[1])
    }

    #[inline]
    pub fn to(self) -> Vector2F {
        Vector2F::new(self.0[2], self.0[3])
    }

    #[inline]
    pub fn vector(self) -> Vector2F {
        self.to() - self.from()
    }

    #[inline]
    pub fn midpoint(self) -> Vector2F {
        self.from().lerp(self.to(), 0.5)
    }

    #[inline]
    pub fn reversed(self) -> LineSegment2F {
        LineSegment2F::new(self.to(), self.from())
    }

    #[inline]
    pub fn sample(self, t: f32) -> Vector2F {
        self.from().lerp(self.to(), t)
    }

    /// Intersects this line, extended to infinity, with `other`, also extended to infinity.
    #[inline]
    pub fn intersection_t(self, other: LineSegment2F) -> Option<f32> {
        let d1 = self.vector();
        let d2 = other.vector();
        let denom = d1.cross(d2);
        if denom.abs() <= 1e-12 {
            return None;
        }
        let diff = other.from() - self.from();
        Some(diff.cross(d2) / denom)
    }

    #[inline]
    pub fn intersection_point(self, other: LineSegment2F) -> Option<Vector2F> {
        self.intersection_t(other).map(|t| self.sample(t))
    }
}

/// A line segment packed into 8.8 fixed-point tile-local coordinates, ready for the GPU.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[repr(C)]
pub struct LineSegmentU16 {
    pub from_x: u16,
    pub from_y: u16,
    pub to_x: u16,
    pub to_y: u16,
}
