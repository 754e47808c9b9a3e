// vgfx/content/src/quad_path.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `QuadraticPath` (§3): a flat point array where even indices are vertices and odd
//! indices are quadratic controls, emitted by the cubic→quadratic conversion (§4.3) and
//! the stroker's outer/inner outlines (§4.4).

use crate::curve::QuadraticCurve;
use vgfx_geometry::rect::RectF;
use vgfx_geometry::transform2d::Transform2F;
use vgfx_geometry::vector::Vector2F;

#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadraticPath {
    points: Vec<Vector2F>,
}

impl QuadraticPath {
    pub fn new() -> QuadraticPath {
        QuadraticPath { points: Vec::new() }
    }

    /// Starts the path at `p0`; every subsequent `push_curve` call adds one quadratic.
    pub fn move_to(&mut self, p0: Vector2F) {
        debug_assert!(self.points.is_empty());
        self.points.push(p0);
    }

    /// Appends one quadratic curve whose start is the path's current last vertex.
    pub fn push_curve(&mut self, control: Vector2F, to: Vector2F) {
        debug_assert!(!self.points.is_empty(), "push_curve requires move_to first");
        self.points.push(control);
        self.points.push(to);
    }

    /// A Line is represented as a quadratic whose control equals its endpoint (§3).
    pub fn push_line(&mut self, to: Vector2F) {
        self.push_curve(to, to);
    }

    #[inline]
    pub fn points(&self) -> &[Vector2F] {
        &self.points
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 3
    }

    /// Overwrites the path's current last point, used by the cubic→quadratic conversion
    /// (§4.3) to midpoint-average consecutive emissions and smooth the seam between them.
    pub fn set_last_point(&mut self, p: Vector2F) {
        if let Some(last) = self.points.last_mut() {
            *last = p;
        }
    }

    /// Number of curves: `(n - 1) / 2` where `n` is the point count (§3).
    #[inline]
    pub fn curve_count(&self) -> usize {
        if self.points.len() < 3 {
            0
        } else {
            (self.points.len() - 1) / 2
        }
    }

    pub fn curve(&self, index: usize) -> QuadraticCurve {
        let p0 = self.points[index * 2];
        let p1 = self.points[index * 2 + 1];
        let p2 = self.points[index * 2 + 2];
        QuadraticCurve::new(p0, p1, p2)
    }

    pub fn curves(&self) -> impl Iterator<Item = QuadraticCurve> + '_ {
        (0..self.curve_count()).map(move |i| self.curve(i))
    }

    pub fn bounding_rect(&self) -> RectF {
        self.curves().fold(RectF::empty(), |acc, curve| acc.union(curve.bounding_rect()))
    }

    pub fn transformed(&self, transform: Transform2F) -> QuadraticPath {
        QuadraticPath { points: self.points.iter().map(|&p| transform * p).collect() }
    }

    pub fn append(&mut self, other: &QuadraticPath) {
        if other.points.is_empty() {
            return;
        }
        if self.points.is_empty() {
            self.points = other.points.clone();
            return;
        }
        self.points.extend_from_slice(&other.points[1..]);
    }

    /// Reverses curve order and each curve's direction, used to build the inner offset of
    /// a stroke so outer+inner trace a single closed contour (§4.4).
    pub fn reversed(&self) -> QuadraticPath {
        let mut out = QuadraticPath::new();
        if self.points.is_empty() {
            return out;
        }
        out.move_to(*self.points.last().unwrap());
        for curve in self.points[..self.points.len() - 1].chunks(2).rev() {
            out.push_curve(curve[1], curve[0]);
        }
        out
    }

    /// Signed crossing-count winding number at `point` (§4.2): each curve contributes ±1
    /// using the monotonic-in-y approximation rather than an exact quadratic solve.
    pub fn winding_of(&self, point: Vector2F) -> i32 {
        let mut winding = 0;
        for curve in self.curves() {
            winding += winding_contribution(curve.p0, curve.p2, |t| curve.sample(t), point);
        }
        winding
    }
}

/// Shared monotonic-in-y crossing test for a single curve (§4.2 `winding_of`): a curve
/// contributes +1 if it runs upward (`p0.y < p1.y`) and its x at the test point's y
/// exceeds `point.x`, else -1 symmetrically; horizontal curves never contribute (§4.8).
pub(crate) fn winding_contribution(
    from: Vector2F,
    to: Vector2F,
    sample_x_at: impl Fn(f32) -> Vector2F,
    point: Vector2F,
) -> i32 {
    if from.y() == to.y() {
        return 0;
    }

    let (lower, upper, upward) =
        if from.y() < to.y() { (from, to, true) } else { (to, from, false) };

    if point.y() < lower.y() || point.y() >= upper.y() {
        return 0;
    }

    let t = if (to.y() - from.y()).abs() < 1e-12 {
        0.0
    } else {
        (point.y() - from.y()) / (to.y() - from.y())
    };
    let x_at_y = sample_x_at(t.max(0.0).min(1.0)).x();

    if x_at_y > point.x() {
        if upward {
            1
        } else {
            -1
        }
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_count_matches_point_layout() {
        let mut path = QuadraticPath::new();
        path.move_to(Vector2F::zero());
        path.push_curve(Vector2F::new(1.0, 1.0), Vector2F::new(2.0, 0.0));
        path.push_curve(Vector2F::new(3.0, 1.0), Vector2F::new(4.0, 0.0));
        assert_eq!(path.curve_count(), 2);
        assert_eq!(path.points().len(), 5);
    }

    #[test]
    fn reversed_preserves_endpoints() {
        let mut path = QuadraticPath::new();
        path.move_to(Vector2F::zero());
        path.push_curve(Vector2F::new(1.0, 1.0), Vector2F::new(2.0, 0.0));
        let rev = path.reversed();
        assert_eq!(rev.points()[0], Vector2F::new(2.0, 0.0));
        assert_eq!(*rev.points().last().unwrap(), Vector2F::zero());
    }
}
