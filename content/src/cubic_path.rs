// vgfx/content/src/cubic_path.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `CubicPath` and `CubicMultipath` (§3): the three-controls-per-curve analogue of
//! `QuadraticPath`, plus a secondary `starts` array for disjoint-fill inputs such as a
//! stroke's outer+inner outline.

use crate::curve::CubicCurve;
use crate::quad_path::winding_contribution;
use vgfx_geometry::rect::RectF;
use vgfx_geometry::transform2d::Transform2F;
use vgfx_geometry::vector::Vector2F;

#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicPath {
    points: Vec<Vector2F>,
}

impl CubicPath {
    pub fn new() -> CubicPath {
        CubicPath { points: Vec::new() }
    }

    pub fn move_to(&mut self, p0: Vector2F) {
        debug_assert!(self.points.is_empty());
        self.points.push(p0);
    }

    pub fn push_curve(&mut self, c1: Vector2F, c2: Vector2F, to: Vector2F) {
        debug_assert!(!self.points.is_empty(), "push_curve requires move_to first");
        self.points.push(c1);
        self.points.push(c2);
        self.points.push(to);
    }

    pub fn push_line(&mut self, to: Vector2F) {
        let from = *self.points.last().unwrap();
        self.push_curve(from.lerp(to, 1.0 / 3.0), from.lerp(to, 2.0 / 3.0), to);
    }

    #[inline]
    pub fn points(&self) -> &[Vector2F] {
        &self.points
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 4
    }

    /// Number of curves: `(n - 1) / 3` where `n` is the point count.
    #[inline]
    pub fn curve_count(&self) -> usize {
        if self.points.len() < 4 {
            0
        } else {
            (self.points.len() - 1) / 3
        }
    }

    pub fn curve(&self, index: usize) -> CubicCurve {
        let base = index * 3;
        CubicCurve::new(self.points[base], self.points[base + 1], self.points[base + 2], self.points[base + 3])
    }

    pub fn curves(&self) -> impl Iterator<Item = CubicCurve> + '_ {
        (0..self.curve_count()).map(move |i| self.curve(i))
    }

    pub fn bounding_rect(&self) -> RectF {
        self.curves().fold(RectF::empty(), |acc, curve| acc.union(curve.bounding_rect()))
    }

    pub fn transformed(&self, transform: Transform2F) -> CubicPath {
        CubicPath { points: self.points.iter().map(|&p| transform * p).collect() }
    }

    pub fn append(&mut self, other: &CubicPath) {
        if other.points.is_empty() {
            return;
        }
        if self.points.is_empty() {
            self.points = other.points.clone();
            return;
        }
        self.points.extend_from_slice(&other.points[1..]);
    }

    /// Signed crossing-count winding number (§4.2), same monotonic-in-y approximation as
    /// `QuadraticPath::winding_of`.
    pub fn winding_of(&self, point: Vector2F) -> i32 {
        let mut winding = 0;
        for curve in self.curves() {
            winding += winding_contribution(curve.p0, curve.p3, |t| curve.sample(t), point);
        }
        winding
    }
}

/// A secondary array listing where each sub-contour begins in `points`, for disjoint-fill
/// inputs (§3) such as a stroke's outer+inner outline, which the tile classifier (§4.8)
/// must process per-sub-contour.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicMultipath {
    points: Vec<Vector2F>,
    starts: Vec<usize>,
}

impl CubicMultipath {
    pub fn new() -> CubicMultipath {
        CubicMultipath { points: Vec::new(), starts: Vec::new() }
    }

    /// Appends `sub_path` as a new sub-contour, recording its start offset.
    pub fn push_subpath(&mut self, sub_path: &CubicPath) {
        if sub_path.is_empty() {
            return;
        }
        self.starts.push(self.points.len());
        self.points.extend_from_slice(sub_path.points());
    }

    #[inline]
    pub fn points(&self) -> &[Vector2F] {
        &self.points
    }

    #[inline]
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    #[inline]
    pub fn subpath_count(&self) -> usize {
        self.starts.len()
    }

    /// Iterates the point slice owned by each sub-contour.
    pub fn subpaths(&self) -> impl Iterator<Item = &[Vector2F]> + '_ {
        (0..self.starts.len()).map(move |i| {
            let start = self.starts[i];
            let end = self.starts.get(i + 1).copied().unwrap_or(self.points.len());
            &self.points[start..end]
        })
    }

    pub fn bounding_rect(&self) -> RectF {
        let mut rect = RectF::empty();
        for sub in self.subpaths() {
            let count = if sub.len() < 4 { 0 } else { (sub.len() - 1) / 3 };
            for i in 0..count {
                let base = i * 3;
                let curve = CubicCurve::new(sub[base], sub[base + 1], sub[base + 2], sub[base + 3]);
                rect = rect.union(curve.bounding_rect());
            }
        }
        rect
    }

    /// Winding number summed across every sub-contour (§4.2), so an outer CW contour and
    /// an inner CW "hole" contour combine per the active fill rule.
    pub fn winding_of(&self, point: Vector2F) -> i32 {
        let mut winding = 0;
        for sub in self.subpaths() {
            let count = if sub.len() < 4 { 0 } else { (sub.len() - 1) / 3 };
            for i in 0..count {
                let base = i * 3;
                let curve = CubicCurve::new(sub[base], sub[base + 1], sub[base + 2], sub[base + 3]);
                winding += winding_contribution(curve.p0, curve.p3, |t| curve.sample(t), point);
            }
        }
        winding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_squares_even_odd() {
        let mut outer = CubicPath::new();
        outer.move_to(Vector2F::new(0.0, 0.0));
        outer.push_line(Vector2F::new(0.0, 10.0));
        outer.push_line(Vector2F::new(10.0, 10.0));
        outer.push_line(Vector2F::new(10.0, 0.0));
        outer.push_line(Vector2F::new(0.0, 0.0));

        let mut inner = CubicPath::new();
        inner.move_to(Vector2F::new(2.0, 2.0));
        inner.push_line(Vector2F::new(2.0, 8.0));
        inner.push_line(Vector2F::new(8.0, 8.0));
        inner.push_line(Vector2F::new(8.0, 2.0));
        inner.push_line(Vector2F::new(2.0, 2.0));

        let mut multi = CubicMultipath::new();
        multi.push_subpath(&outer);
        multi.push_subpath(&inner);

        assert_eq!(multi.winding_of(Vector2F::new(5.0, 5.0)).rem_euclid(2), 0);
        assert_eq!(multi.winding_of(Vector2F::new(1.0, 1.0)).rem_euclid(2), 1);
    }
}
