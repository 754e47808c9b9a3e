// vgfx/content/src/fit.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The cubic fitter (§4.7): chord-length parameterization, a Cramer's-rule least-squares
//! solve for the interior control magnitudes, and up to 8 rounds of Newton-Raphson
//! reparameterization. Grounded on `wasm-src/algorithms/fit.cpp`'s B-spline least-squares
//! fit, reused by `Path::remove`'s `keep_shape` resampling (§4.1).

use crate::curve::CubicCurve;
use vgfx_geometry::vector::Vector2F;

/// Chord-length parameterizes `points`, normalizing to `[0, 1]` (§4.7 step 1).
fn chord_length_parameterize(points: &[Vector2F]) -> Vec<f32> {
    let mut u = Vec::with_capacity(points.len());
    u.push(0.0);
    for i in 1..points.len() {
        let prev = *u.last().unwrap();
        u.push(prev + (points[i] - points[i - 1]).length());
    }
    let total = *u.last().unwrap();
    if total > 0.0 {
        for value in &mut u {
            *value /= total;
        }
    }
    u
}

/// Estimates a unit tangent at the start of `points` from the first difference, falling
/// back to the chord direction when the immediate neighbors coincide.
fn start_tangent(points: &[Vector2F]) -> Vector2F {
    for window in points.windows(2) {
        let d = window[1] - window[0];
        if d.square_length() > 1e-12 {
            return d.normalize();
        }
    }
    Vector2F::zero()
}

fn end_tangent(points: &[Vector2F]) -> Vector2F {
    for window in points.windows(2).rev() {
        let d = window[0] - window[1];
        if d.square_length() > 1e-12 {
            return d.normalize();
        }
    }
    Vector2F::zero()
}

fn bezier(curve: &CubicCurve, t: f32) -> Vector2F {
    curve.sample(t)
}

fn bezier_derivative(curve: &CubicCurve, t: f32) -> Vector2F {
    curve.derivative(t)
}

fn bezier_second_derivative(curve: &CubicCurve, t: f32) -> Vector2F {
    curve.second_derivative(t)
}

/// Solves the 2x2 least-squares system for the interior control-point magnitudes
/// `(alpha_l, alpha_r)` via Cramer's rule (§4.7 step 3), falling back to `chord / 3` when
/// the system is degenerate or either alpha collapses below `1e-6 * chord_length`.
fn generate_bezier(
    points: &[Vector2F],
    u: &[f32],
    t_hat_1: Vector2F,
    t_hat_2: Vector2F,
) -> CubicCurve {
    let first = points[0];
    let last = *points.last().unwrap();
    let chord_length = (last - first).length();

    let fallback = || {
        let alpha = chord_length / 3.0;
        CubicCurve::new(first, first + t_hat_1 * alpha, last + t_hat_2 * alpha, last)
    };

    if points.len() < 2 {
        return fallback();
    }

    let mut c00 = 0.0f32;
    let mut c01 = 0.0f32;
    let mut c11 = 0.0f32;
    let mut x0 = 0.0f32;
    let mut x1 = 0.0f32;

    for (i, &point) in points.iter().enumerate() {
        let t = u[i];
        let omt = 1.0 - t;
        let b0 = omt * omt * omt;
        let b1 = 3.0 * t * omt * omt;
        let b2 = 3.0 * t * t * omt;
        let b3 = t * t * t;

        let a1 = t_hat_1 * b1;
        let a2 = t_hat_2 * b2;

        c00 += a1.dot(a1);
        c01 += a1.dot(a2);
        c11 += a2.dot(a2);

        let shortfall = point - (first * (b0 + b1) + last * (b2 + b3));
        x0 += a1.dot(shortfall);
        x1 += a2.dot(shortfall);
    }

    let det_c0_c1 = c00 * c11 - c01 * c01;
    let det_c0_x = c00 * x1 - c01 * x0;
    let det_x_c1 = x0 * c11 - x1 * c01;

    let (alpha_l, alpha_r) = if det_c0_c1.abs() < 1e-12 {
        let alpha = chord_length / 3.0;
        (alpha, alpha)
    } else {
        (det_x_c1 / det_c0_c1, det_c0_x / det_c0_c1)
    };

    let min_alpha = 1e-6 * chord_length.max(1e-6);
    if alpha_l < min_alpha || alpha_r < min_alpha {
        return fallback();
    }

    CubicCurve::new(first, first + t_hat_1 * alpha_l, last + t_hat_2 * alpha_r, last)
}

/// Newton-Raphson reparameterization of a single `u` value against `curve` (§4.7 step 5).
fn reparameterize(curve: &CubicCurve, point: Vector2F, t: f32) -> f32 {
    let q = bezier(curve, t);
    let q1 = bezier_derivative(curve, t);
    let q2 = bezier_second_derivative(curve, t);

    let diff = q - point;
    let numerator = diff.dot(q1);
    let denominator = q1.square_length() + diff.dot(q2);

    if denominator.abs() < 1e-12 {
        t
    } else {
        (t - numerator / denominator).max(0.0).min(1.0)
    }
}

fn max_error(curve: &CubicCurve, points: &[Vector2F], u: &[f32]) -> f32 {
    let mut worst = 0.0f32;
    for (i, &point) in points.iter().enumerate() {
        let err = (bezier(curve, u[i]) - point).square_length();
        if err > worst {
            worst = err;
        }
    }
    worst
}

/// Fits a single cubic through `points` (§4.7). Returns `None` only when `points` has
/// fewer than 3 entries (callers decide whether to subdivide, per §4.7 step 5).
pub fn fit_cubic(points: &[Vector2F], tolerance: f32) -> Option<CubicCurve> {
    if points.len() < 3 {
        return None;
    }

    let mut u = chord_length_parameterize(points);
    let t_hat_1 = start_tangent(points);
    let t_hat_2 = end_tangent(points);

    let mut curve = generate_bezier(points, &u, t_hat_1, t_hat_2);
    let tolerance_sq = tolerance * tolerance;

    if max_error(&curve, points, &u) < tolerance_sq {
        return Some(curve);
    }

    for _ in 0..8 {
        let reparameterized: Vec<f32> =
            points.iter().zip(u.iter()).map(|(&p, &t)| reparameterize(&curve, p, t)).collect();
        curve = generate_bezier(points, &reparameterized, t_hat_1, t_hat_2);
        u = reparameterized;

        if max_error(&curve, points, &u) < tolerance_sq {
            return Some(curve);
        }
    }

    Some(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_points_on_a_line() {
        let points: Vec<Vector2F> =
            (0..10).map(|i| Vector2F::new(i as f32, 0.0)).collect();
        let curve = fit_cubic(&points, 1e-3).unwrap();
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let p = curve.sample(t);
            assert!(p.y().abs() < 1e-2);
        }
    }

    #[test]
    fn too_few_points_returns_none() {
        let points = [Vector2F::zero(), Vector2F::new(1.0, 1.0)];
        assert!(fit_cubic(&points, 1e-3).is_none());
    }
}
