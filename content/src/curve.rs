// vgfx/content/src/curve.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Quadratic and cubic Bézier algebra, instantiated once at 32-bit precision (geometry
//! storage) and once at 64-bit precision (the numerically careful paths: cubic→quadratic
//! conversion, offsetting, fitting), exactly as the source instantiates its curve
//! templates once per scalar width rather than keeping one generic implementation.

use crate::util::{self, Solutions};

macro_rules! define_curve_algebra {
    ($modname:ident, $scalar:ty, $vec:ty, $quad:ident, $cubic:ident) => {
        pub mod $modname {
            use super::*;
            use std::ops::{Add, Mul, Sub};

            #[derive(Clone, Copy, PartialEq, Debug)]
            pub struct $quad {
                pub p0: $vec,
                pub p1: $vec,
                pub p2: $vec,
            }

            #[derive(Clone, Copy, PartialEq, Debug)]
            pub struct $cubic {
                pub p0: $vec,
                pub p1: $vec,
                pub p2: $vec,
                pub p3: $vec,
            }

            impl $quad {
                #[inline]
                pub fn new(p0: $vec, p1: $vec, p2: $vec) -> $quad {
                    $quad { p0, p1, p2 }
                }

                /// Power-basis coefficients `{a, b, c}` such that `sample(t) = a*t^2 + b*t + c`.
                #[inline]
                pub fn coefficients(&self) -> ($vec, $vec, $vec) {
                    let a = self.p0 - self.p1 * 2.0 as $scalar + self.p2;
                    let b = (self.p1 - self.p0) * 2.0 as $scalar;
                    let c = self.p0;
                    (a, b, c)
                }

                #[inline]
                pub fn from_coefficients(a: $vec, b: $vec, c: $vec) -> $quad {
                    let p0 = c;
                    let p1 = b * (0.5 as $scalar) + c;
                    let p2 = a + b + c;
                    $quad::new(p0, p1, p2)
                }

                #[inline]
                pub fn sample(&self, t: $scalar) -> $vec {
                    let (a, b, c) = self.coefficients();
                    a * (t * t) + b * t + c
                }

                #[inline]
                pub fn derivative(&self, t: $scalar) -> $vec {
                    let (a, b, _c) = self.coefficients();
                    a * (2.0 as $scalar * t) + b
                }

                #[inline]
                pub fn second_derivative(&self) -> $vec {
                    let (a, _b, _c) = self.coefficients();
                    a * (2.0 as $scalar)
                }

                pub fn split(&self, t: $scalar) -> [$quad; 2] {
                    let q = lerp(self.p0, self.p1, t);
                    let r = lerp(self.p1, self.p2, t);
                    let p = lerp(q, r, t);
                    [$quad::new(self.p0, q, p), $quad::new(p, r, self.p2)]
                }

                /// De Casteljau extraction between `t1` and `t2` (§4.2 `extract`).
                pub fn extract(&self, t1: $scalar, t2: $scalar) -> $quad {
                    let q1 = lerp(self.p0, self.p1, t1);
                    let q2 = lerp(self.p0, self.p1, t2);
                    let r1 = lerp(self.p1, self.p2, t1);
                    let r2 = lerp(self.p1, self.p2, t2);
                    let p1 = lerp(q1, r1, t1);
                    let p2 = lerp(q2, r2, t2);
                    let q = lerp(q2, r2, t1);
                    $quad::new(p1, q, p2)
                }

                pub fn approx_bounding_rect_points(&self) -> [$vec; 3] {
                    [self.p0, self.p1, self.p2]
                }

                pub fn is_line(&self, tolerance: $scalar) -> bool {
                    let direct = self.p2 - self.p0;
                    let via_control = self.p1 - self.p0;
                    cross2(direct, via_control).abs() <= tolerance
                }
            }

            impl $cubic {
                #[inline]
                pub fn new(p0: $vec, p1: $vec, p2: $vec, p3: $vec) -> $cubic {
                    $cubic { p0, p1, p2, p3 }
                }

                /// Power-basis coefficients `{a, b, c, d}`, `sample(t) = a*t^3 + b*t^2 + c*t + d`.
                #[inline]
                pub fn coefficients(&self) -> ($vec, $vec, $vec, $vec) {
                    let a = self.p3 - self.p2 * (3.0 as $scalar) + self.p1 * (3.0 as $scalar) - self.p0;
                    let b = (self.p2 - self.p1 * (2.0 as $scalar) + self.p0) * (3.0 as $scalar);
                    let c = (self.p1 - self.p0) * (3.0 as $scalar);
                    let d = self.p0;
                    (a, b, c, d)
                }

                #[inline]
                pub fn from_coefficients(a: $vec, b: $vec, c: $vec, d: $vec) -> $cubic {
                    let p0 = d;
                    let p1 = c * (1.0 as $scalar / 3.0 as $scalar) + d;
                    let p2 = b * (1.0 as $scalar / 3.0 as $scalar) + c * (2.0 as $scalar / 3.0 as $scalar) + p1;
                    let p3 = a + b + c + d;
                    $cubic::new(p0, p1, p2, p3)
                }

                #[inline]
                pub fn sample(&self, t: $scalar) -> $vec {
                    let (a, b, c, d) = self.coefficients();
                    let t2 = t * t;
                    a * (t2 * t) + b * t2 + c * t + d
                }

                #[inline]
                pub fn derivative(&self, t: $scalar) -> $vec {
                    let (a, b, c, _d) = self.coefficients();
                    a * (3.0 as $scalar * t * t) + b * (2.0 as $scalar * t) + c
                }

                #[inline]
                pub fn second_derivative(&self, t: $scalar) -> $vec {
                    let (a, b, _c, _d) = self.coefficients();
                    a * (6.0 as $scalar * t) + b * (2.0 as $scalar)
                }

                pub fn split(&self, t: $scalar) -> [$cubic; 2] {
                    let q = lerp(self.p0, self.p1, t);
                    let r = lerp(self.p1, self.p2, t);
                    let s = lerp(self.p2, self.p3, t);
                    let qr = lerp(q, r, t);
                    let rs = lerp(r, s, t);
                    let p = lerp(qr, rs, t);
                    [$cubic::new(self.p0, q, qr, p), $cubic::new(p, rs, s, self.p3)]
                }

                pub fn split2(&self, t1: $scalar, t2: $scalar) -> [$cubic; 3] {
                    let q1 = lerp(self.p0, self.p1, t1);
                    let q2 = lerp(self.p0, self.p1, t2);
                    let r1 = lerp(self.p1, self.p2, t1);
                    let r2 = lerp(self.p1, self.p2, t2);
                    let s1 = lerp(self.p2, self.p3, t1);
                    let s2 = lerp(self.p2, self.p3, t2);
                    let qr1 = lerp(q1, r1, t1);
                    let qr2 = lerp(q2, r2, t2);
                    let rs1 = lerp(r1, s1, t1);
                    let rs2 = lerp(r2, s2, t2);
                    let p1 = lerp(qr1, rs1, t1);
                    let p2 = lerp(qr2, rs2, t2);
                    let q = lerp(qr1, rs1, t2);
                    let r = lerp(qr2, rs2, t1);
                    [
                        $cubic::new(self.p0, q1, qr1, p1),
                        $cubic::new(p1, q, r, p2),
                        $cubic::new(p2, rs2, s2, self.p3),
                    ]
                }

                pub fn extract(&self, t1: $scalar, t2: $scalar) -> $cubic {
                    let q1 = lerp(self.p0, self.p1, t1);
                    let q2 = lerp(self.p0, self.p1, t2);
                    let r1 = lerp(self.p1, self.p2, t1);
                    let r2 = lerp(self.p1, self.p2, t2);
                    let s1 = lerp(self.p2, self.p3, t1);
                    let s2 = lerp(self.p2, self.p3, t2);
                    let qr1 = lerp(q1, r1, t1);
                    let qr2 = lerp(q2, r2, t2);
                    let rs1 = lerp(r1, s1, t1);
                    let rs2 = lerp(r2, s2, t2);
                    let p1 = lerp(qr1, rs1, t1);
                    let p2 = lerp(qr2, rs2, t2);
                    let q = lerp(qr1, rs1, t2);
                    let r = lerp(qr2, rs2, t1);
                    $cubic::new(p1, q, r, p2)
                }

                /// `inflections()` — §4.2: solves the quadratic on the cross-product terms.
                pub fn inflections(&self) -> Solutions {
                    let ax = (self.p1.x() - self.p0.x()) as f64;
                    let ay = (self.p1.y() - self.p0.y()) as f64;
                    let bx = (self.p2.x() - 2.0 * self.p1.x() + self.p0.x()) as f64;
                    let by = (self.p2.y() - 2.0 * self.p1.y() + self.p0.y()) as f64;
                    let cx = (self.p3.x() + 3.0 * (self.p1.x() - self.p2.x()) - self.p0.x()) as f64;
                    let cy = (self.p3.y() + 3.0 * (self.p1.y() - self.p2.y()) - self.p0.y()) as f64;

                    util::solve_quadratic(bx * cy - by * cx, ax * cy - ay * cx, ax * by - ay * bx)
                }

                /// `max_curvature()` — §4.2: cubic derived from the numerator of dκ/dt.
                pub fn max_curvature(&self) -> Solutions {
                    let ax = (self.p1.x() - self.p0.x()) as f64;
                    let bx = (self.p2.x() - 2.0 * self.p1.x() + self.p0.x()) as f64;
                    let cx = (self.p3.x() + 3.0 * (self.p1.x() - self.p2.x()) - self.p0.x()) as f64;

                    let ay = (self.p1.y() - self.p0.y()) as f64;
                    let by = (self.p2.y() - 2.0 * self.p1.y() + self.p0.y()) as f64;
                    let cy = (self.p3.y() + 3.0 * (self.p1.y() - self.p2.y()) - self.p0.y()) as f64;

                    let cox0 = cx * cx;
                    let cox1 = 3.0 * bx * cx;
                    let cox2 = 2.0 * bx * bx + cx * ax;
                    let cox3 = ax * bx;

                    let coy0 = cy * cy;
                    let coy1 = 3.0 * by * cy;
                    let coy2 = 2.0 * by * by + cy * ay;
                    let coy3 = ay * by;

                    util::solve_cubic(cox0 + coy0, cox1 + coy1, cox2 + coy2, cox3 + coy3)
                }

                pub fn is_point(&self, tolerance: $scalar) -> bool {
                    is_close(self.p0, self.p3, tolerance)
                        && is_close(self.p0, self.p1, tolerance)
                        && is_close(self.p0, self.p2, tolerance)
                }

                pub fn is_line(&self, tolerance: $scalar) -> bool {
                    is_close(self.p1, self.p2, tolerance) && is_close(self.p1, self.p3, tolerance)
                }
            }

            #[inline]
            fn lerp(a: $vec, b: $vec, t: $scalar) -> $vec {
                a + (b - a) * t
            }

            #[inline]
            fn cross2(a: $vec, b: $vec) -> $scalar {
                a.x() * b.y() - a.y() * b.x()
            }

            #[inline]
            fn is_close(a: $vec, b: $vec, tolerance: $scalar) -> bool {
                (a.x() - b.x()).abs() <= tolerance && (a.y() - b.y()).abs() <= tolerance
            }
        }
    };
}

define_curve_algebra!(precision32, f32, vgfx_geometry::vector::Vector2F, QuadraticCurve, CubicCurve);
define_curve_algebra!(precision64, f64, vgfx_geometry::vector::Vector2D, QuadraticCurveD, CubicCurveD);

pub use precision32::{CubicCurve, QuadraticCurve};
pub use precision64::{CubicCurveD, QuadraticCurveD};

impl CubicCurve {
    pub fn to_f64(&self) -> CubicCurveD {
        CubicCurveD::new(self.p0.to_f64(), self.p1.to_f64(), self.p2.to_f64(), self.p3.to_f64())
    }
}

impl CubicCurveD {
    pub fn to_f32(&self) -> CubicCurve {
        CubicCurve::new(self.p0.to_f32(), self.p1.to_f32(), self.p2.to_f32(), self.p3.to_f32())
    }
}

impl QuadraticCurve {
    pub fn to_f64(&self) -> QuadraticCurveD {
        QuadraticCurveD::new(self.p0.to_f64(), self.p1.to_f64(), self.p2.to_f64())
    }
}

impl QuadraticCurveD {
    pub fn to_f32(&self) -> QuadraticCurve {
        QuadraticCurve::new(self.p0.to_f32(), self.p1.to_f32(), self.p2.to_f32())
    }
}

use vgfx_geometry::rect::RectF;
use vgfx_geometry::vector::Vector2F;

impl QuadraticCurve {
    /// Exact axis-aligned bounds, solving the (linear) derivative root per axis (§4.2).
    pub fn bounding_rect(&self) -> RectF {
        let mut min = self.p0.min(self.p2);
        let mut max = self.p0.max(self.p2);
        let (a, b, _c) = self.coefficients();

        for axis in 0..2 {
            let (a_axis, b_axis) = if axis == 0 { (a.x(), b.x()) } else { (a.y(), b.y()) };
            if a_axis.abs() < 1e-7 {
                continue;
            }
            let t = -b_axis / (2.0 * a_axis);
            if t > 0.0 && t < 1.0 {
                let p = self.sample(t);
                min = min.min(p);
                max = max.max(p);
            }
        }

        RectF::from_points(min, max)
    }

    pub fn approx_bounding_rect(&self) -> RectF {
        RectF::from_points(self.p0.min(self.p1).min(self.p2), self.p0.max(self.p1).max(self.p2))
    }
}

impl CubicCurve {
    /// Exact axis-aligned bounds, solving the (quadratic) derivative roots per axis (§4.2).
    pub fn bounding_rect(&self) -> RectF {
        let mut min = self.p0.min(self.p3);
        let mut max = self.p0.max(self.p3);
        let (a, b, c, _d) = self.coefficients();

        for axis in 0..2 {
            let (a_axis, b_axis, c_axis) = if axis == 0 {
                (a.x() as f64, b.x() as f64, c.x() as f64)
            } else {
                (a.y() as f64, b.y() as f64, c.y() as f64)
            };

            let roots = util::solve_quadratic(3.0 * a_axis, 2.0 * b_axis, c_axis);
            for i in 0..roots.count as usize {
                let t = roots.solutions[i] as f32;
                if t > 0.0 && t < 1.0 {
                    let p = self.sample(t);
                    min = min.min(p);
                    max = max.max(p);
                }
            }
        }

        RectF::from_points(min, max)
    }

    pub fn approx_bounding_rect(&self) -> RectF {
        let min = self.p0.min(self.p1).min(self.p2).min(self.p3);
        let max = self.p0.max(self.p1).max(self.p2).max(self.p3);
        RectF::from_points(min, max)
    }

    /// Infinite-line tangent at the start, degenerating to the chord when the control
    /// point coincides with the endpoint (mirrors `start_tangent` in the source).
    pub fn start_tangent(&self) -> (Vector2F, Vector2F) {
        if is_almost_equal(self.p0, self.p1) {
            if is_almost_equal(self.p0, self.p2) {
                return (self.p0, self.p3);
            }
            return (self.p0, self.p2);
        }
        (self.p0, self.p1)
    }

    pub fn end_tangent(&self) -> (Vector2F, Vector2F) {
        if is_almost_equal(self.p2, self.p3) {
            if is_almost_equal(self.p1, self.p2) {
                return (self.p3, self.p0);
            }
            return (self.p3, self.p1);
        }
        (self.p3, self.p2)
    }
}

#[inline]
fn is_almost_equal(a: Vector2F, b: Vector2F) -> bool {
    (a.x() - b.x()).abs() < 1e-6 && (a.y() - b.y()).abs() < 1e-6
}

use vgfx_geometry::line_segment::LineSegment2F;

/// Sorted, de-duplicated t-values at which `line`, extended to infinity, crosses the four
/// sides of `rect` while the other coordinate stays within the rect's bounds (§4.2).
pub fn line_rect_intersections(line: LineSegment2F, rect: RectF) -> Vec<f64> {
    let p0 = line.from();
    let p1 = line.to();
    let mut hits = Vec::new();

    let push_if_bounded = |hits: &mut Vec<f64>, t: f64, sample: Vector2F, rect: RectF| {
        if util::is_normalized(t, true) && rect_contains_with_epsilon(rect, sample) {
            hits.push(t.max(0.0).min(1.0));
        }
    };

    for (axis, target) in [(0usize, rect.min_x()), (0, rect.max_x()), (1, rect.min_y()), (1, rect.max_y())] {
        let (from, to) = if axis == 0 { (p0.x(), p1.x()) } else { (p0.y(), p1.y()) };
        let denom = (to - from) as f64;
        if denom.abs() < util::EPSILON {
            continue;
        }
        let t = (target as f64 - from as f64) / denom;
        let sample = p0.lerp(p1, t.max(0.0).min(1.0) as f32);
        push_if_bounded(&mut hits, t, sample, rect);
    }

    dedupe_sorted(hits)
}

#[inline]
fn rect_contains_with_epsilon(rect: RectF, point: Vector2F) -> bool {
    const EPS: f32 = 1e-4;
    point.x() >= rect.min_x() - EPS && point.x() <= rect.max_x() + EPS &&
        point.y() >= rect.min_y() - EPS && point.y() <= rect.max_y() + EPS
}

fn dedupe_sorted(mut ts: Vec<f64>) -> Vec<f64> {
    ts.sort_by(|a, b| a.partial_cmp(b).unwrap());
    ts.dedup_by(|a, b| (*a - *b).abs() < 1e-6);
    ts
}

impl QuadraticCurve {
    /// Sorted, de-duplicated t-values at which this curve crosses the boundary of `rect`
    /// (§4.2), found by solving the per-axis quadratic against each of the rect's 4 sides.
    pub fn rect_intersections(&self, rect: RectF) -> Vec<f64> {
        let (a, b, c) = self.coefficients();
        let mut hits = Vec::new();

        for (axis, target) in [(0usize, rect.min_x()), (0, rect.max_x()), (1, rect.min_y()), (1, rect.max_y())] {
            let (a_axis, b_axis, c_axis) = if axis == 0 {
                (a.x() as f64, b.x() as f64, c.x() as f64)
            } else {
                (a.y() as f64, b.y() as f64, c.y() as f64)
            };

            let roots = util::solve_quadratic(a_axis, b_axis, c_axis - target as f64);
            for i in 0..roots.count as usize {
                let t = roots.solutions[i];
                let sample = self.sample(t.max(0.0).min(1.0) as f32);
                if rect_contains_with_epsilon(rect, sample) {
                    hits.push(t);
                }
            }
        }

        dedupe_sorted(hits)
    }
}

impl CubicCurve {
    /// Sorted, de-duplicated t-values at which this curve crosses the boundary of `rect`
    /// (§4.2), found by solving the per-axis cubic against each of the rect's 4 sides.
    pub fn rect_intersections(&self, rect: RectF) -> Vec<f64> {
        let (a, b, c, d) = self.coefficients();
        let mut hits = Vec::new();

        for (axis, target) in [(0usize, rect.min_x()), (0, rect.max_x()), (1, rect.min_y()), (1, rect.max_y())] {
            let (a_axis, b_axis, c_axis, d_axis) = if axis == 0 {
                (a.x() as f64, b.x() as f64, c.x() as f64, d.x() as f64)
            } else {
                (a.y() as f64, b.y() as f64, c.y() as f64, d.y() as f64)
            };

            let roots = util::solve_cubic(a_axis, b_axis, c_axis, d_axis - target as f64);
            for i in 0..roots.count as usize {
                let t = roots.solutions[i];
                let sample = self.sample(t.max(0.0).min(1.0) as f32);
                if rect_contains_with_epsilon(rect, sample) {
                    hits.push(t);
                }
            }
        }

        dedupe_sorted(hits)
    }
}

/// Newton-Raphson closest-parameter search, 8 seeds uniform in `(0,1)`, 3 iterations each
/// (§4.2). Works in 64-bit regardless of the curve's storage precision.
pub fn closest_parameter_cubic(curve: &CubicCurveD, point: vgfx_geometry::vector::Vector2D) -> f64 {
    let mut best_t = 0.0;
    let mut best_dist = f64::INFINITY;

    for seed in 1..=8 {
        let mut t = seed as f64 / 9.0;
        for _ in 0..3 {
            let p = curve.sample(t);
            let d1 = curve.derivative(t);
            let d2 = curve.second_derivative(t);
            let diff = p - point;
            let denom = d1.square_length() + diff.dot(d2);
            if denom.abs() < 1e-12 {
                break;
            }
            t -= diff.dot(d1) / denom;
            t = t.max(0.0).min(1.0);
        }

        let dist = (curve.sample(t) - point).square_length();
        if dist < best_dist {
            best_dist = dist;
            best_t = t;
        }
    }

    best_t
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgfx_geometry::vector::Vector2F;

    #[test]
    fn line_crosses_rect_twice() {
        let rect = RectF::from_points(Vector2F::new(0.0, 0.0), Vector2F::new(10.0, 10.0));
        let line = LineSegment2F::new(Vector2F::new(-5.0, 5.0), Vector2F::new(15.0, 5.0));
        let hits = line_rect_intersections(line, rect);
        assert_eq!(hits.len(), 2);
        assert!((hits[0] - 0.25).abs() < 1e-4);
        assert!((hits[1] - 0.75).abs() < 1e-4);
    }

    #[test]
    fn line_missing_rect_has_no_hits() {
        let rect = RectF::from_points(Vector2F::new(0.0, 0.0), Vector2F::new(10.0, 10.0));
        let line = LineSegment2F::new(Vector2F::new(-5.0, 50.0), Vector2F::new(15.0, 50.0));
        assert!(line_rect_intersections(line, rect).is_empty());
    }

    #[test]
    fn cubic_crossing_rect_side_is_found() {
        let curve = CubicCurve::new(
            Vector2F::new(-5.0, 5.0),
            Vector2F::new(0.0, 5.0),
            Vector2F::new(5.0, 5.0),
            Vector2F::new(15.0, 5.0),
        );
        let rect = RectF::from_points(Vector2F::new(0.0, 0.0), Vector2F::new(10.0, 10.0));
        let hits = curve.rect_intersections(rect);
        assert_eq!(hits.len(), 2);
        for &t in &hits {
            assert!(t > 0.0 && t < 1.0);
        }
    }

    #[test]
    fn quadratic_entirely_inside_rect_has_no_boundary_crossings() {
        let curve = QuadraticCurve::new(
            Vector2F::new(2.0, 2.0),
            Vector2F::new(5.0, 3.0),
            Vector2F::new(8.0, 2.0),
        );
        let rect = RectF::from_points(Vector2F::new(0.0, 0.0), Vector2F::new(10.0, 10.0));
        assert!(curve.rect_intersections(rect).is_empty());
    }
}
