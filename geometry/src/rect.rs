// vgfx/geometry/src/rect.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Axis-aligned rectangles, in both float and integer pixel space.

use crate::vector::{Vector2F, Vector2I};

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct RectF {
    origin: Vector2F,
    lower_right: Vector2F,
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct RectI {
    origin: Vector2I,
    lower_right: Vector2I,
}

impl RectF {
    #[inline]
    pub fn new(origin: Vector2F, size: Vector2F) -> RectF {
        RectF { origin, lower_right: origin + size }
    }

    #[inline]
    pub fn from_points(min: Vector2F, max: Vector2F) -> RectF {
        RectF { origin: min, lower_right: max }
    }

    /// An empty (degenerate, single-point-at-origin) rect, used as a fold starting value.
    #[inline]
    pub fn empty() -> RectF {
        RectF::default()
    }

    #[inline]
    pub fn from_vectors(points: &[Vector2F]) -> RectF {
        if points.is_empty() {
            return RectF::empty();
        }
        let mut min = points[0];
        let mut max = points[0];
        for &p in &points[1..] {
            min = min.min(p);
            max = max.max(p);
        }
        RectF::from_points(min, max)
    }

    #[inline]
    pub fn origin(self) -> Vector2F {
        self.origin
    }

    #[inline]
    pub fn size(self) -> Vector2F {
        self.lower_right - self.origin
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.lower_right.x() - self.origin.x()
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.lower_right.y() - self.origin.y()
    }

    #[inline]
    pub fn min_x(self) -> f32 {
        self.origin.x()
    }

    #[inline]
    pub fn min_y(self) -> f32 {
        self.origin.y()
    }

    #[inline]
    pub fn max_x(self) -> f32 {
        self.lower_right.x()
    }

    #[inline]
    pub fn max_y(self) -> f32 {
        self.lower_right.y()
    }

    #[inline]
    pub fn upper_right(self) -> Vector2F {
        Vector2F::new(self.max_x(), self.min_y())
    }

    #[inline]
    pub fn lower_right(self) -> Vector2F {
        self.lower_right
    }

    #[inline]
    pub fn lower_left(self) -> Vector2F {
        Vector2F::new(self.min_x(), self.max_y())
    }

    #[inline]
    pub fn center(self) -> Vector2F {
        self.origin + self.size().scale(0.5)
    }

    #[inline]
    pub fn contains_point(self, point: Vector2F) -> bool {
        point.x() >= self.min_x() && point.x() <= self.max_x() &&
            point.y() >= self.min_y() && point.y() <= self.max_y()
    }

    #[inline]
    pub fn contains_rect(self, other: RectF) -> bool {
        other.min_x() >= self.min_x() && other.max_x() <= self.max_x() &&
            other.min_y() >= self.min_y() && other.max_y() <= self.max_y()
    }

    #[inline]
    pub fn intersects(self, other: RectF) -> bool {
        self.min_x() < other.max_x() && self.max_x() > other.min_x() &&
            self.min_y() < other.max_y() && self.max_y() > other.min_y()
    }

    #[inline]
    pub fn intersection(self, other: RectF) -> Option<RectF> {
        if !self.intersects(other) {
            return None;
        }
        Some(RectF::from_points(self.origin.max(other.origin),
                                self.lower_right.min(other.lower_right)))
    }

    #[inline]
    pub fn union(self, other: RectF) -> RectF {
        if self.size() == Vector2F::zero() {
            return other;
        }
        if other.size() == Vector2F::zero() {
            return self;
        }
        RectF::from_points(self.origin.min(other.origin), self.lower_right.max(other.lower_right))
    }

    #[inline]
    pub fn from_rects(a: RectF, b: RectF) -> RectF {
        a.union(b)
    }

    #[inline]
    pub fn union_point(self, point: Vector2F) -> RectF {
        RectF::from_points(self.origin.min(point), self.lower_right.max(point))
    }

    #[inline]
    pub fn dilate(self, amount: Vector2F) -> RectF {
        RectF::from_points(self.origin - amount, self.lower_right + amount)
    }

    #[inline]
    pub fn contract(self, amount: Vector2F) -> RectF {
        self.dilate(-amount)
    }

    #[inline]
    pub fn scale(self, factor: f32) -> RectF {
        RectF::from_points(self.origin.scale(factor), self.lower_right.scale(factor))
    }

    #[inline]
    pub fn round_out(self) -> RectI {
        RectI::from_points(Vector2I::new(self.min_x().floor() as i32, self.min_y().floor() as i32),
                           Vector2I::new(self.max_x().ceil() as i32, self.max_y().ceil() as i32))
    }

    #[inline]
    pub fn to_i32(self) -> RectI {
        RectI::from_points(self.origin.to_i32(), self.lower_right.to_i32())
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

impl RectI {
    #[inline]
    pub fn new(origin: Vector2I, size: Vector2I) -> RectI {
        RectI { origin, lower_right: origin + size }
    }

    #[inline]
    pub fn from_points(min: Vector2I, max: Vector2I) -> RectI {
        RectI { origin: min, lower_right: max }
    }

    #[inline]
    pub fn origin(self) -> Vector2I {
        self.origin
    }

    #[inline]
    pub fn size(self) -> Vector2I {
        self.lower_right - self.origin
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.lower_right.x() - self.origin.x()
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.lower_right.y() - self.origin.y()
    }

    #[inline]
    pub fn min_x(self) -> i32 {
        self.origin.x()
    }

    #[inline]
    pub fn min_y(self) -> i32 {
        self.origin.y()
    }

    #[inline]
    pub fn max_x(self) -> i32 {
        self.lower_right.x()
    }

    #[inline]
    pub fn max_y(self) -> i32 {
        self.lower_right.y()
    }

    #[inline]
    pub fn area(self) -> i32 {
        self.width() * self.height()
    }

    #[inline]
    pub fn contains_point(self, point: Vector2I) -> bool {
        point.x() >= self.min_x() && point.x() < self.max_x() &&
            point.y() >= self.min_y() && point.y() < self.max_y()
    }

    #[inline]
    pub fn to_f32(self) -> RectF {
        RectF::from_points(self.origin.to_f32(), self.lower_right.to_f32())
    }
}
