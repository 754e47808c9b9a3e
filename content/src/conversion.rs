// vgfx/content/src/conversion.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Cubic→quadratic conversion (§4.3): the Taylor-center walking algorithm, grounded on
//! `wasm-src/geom/curve_ops.cpp`'s `cubic_to_quadratics`. Curves are pre-split at their
//! inflection points (0..2) so each monotonic piece gets its own Taylor walk.
//!
//! §9's Open Question keeps the source's alternative monotonic/circular-arc subdivision
//! variant (`monotonic_cubic_to_circular_quadratics`) only as a test cross-check; the
//! Taylor walk here is the sole production path.

use crate::curve::CubicCurveD;
use crate::quad_path::QuadraticPath;
use vgfx_geometry::vector::Vector2D;

/// All real roots of `a*t^3 + b*t^2 + c*t + d = 0`, unrestricted to `[0, 1]` since `t0`
/// legitimately wanders outside the unit interval mid-walk.
fn unbounded_cubic_roots(a: f64, b: f64, c: f64, d: f64) -> [Option<f64>; 3] {
    if a.abs() < 1e-12 {
        if b.abs() < 1e-12 {
            return if c.abs() < 1e-12 { [None, None, None] } else { [Some(-d / c), None, None] };
        }
        let discriminant = c * c - 4.0 * b * d;
        if discriminant < 0.0 {
            return [None, None, None];
        }
        let sqrt_d = discriminant.sqrt();
        return [Some((-c - sqrt_d) / (2.0 * b)), Some((-c + sqrt_d) / (2.0 * b)), None];
    }

    let p = (3.0 * a * c - b * b) / (3.0 * a * a);
    let q = (2.0 * b * b * b - 9.0 * a * b * c + 27.0 * a * a * d) / (27.0 * a * a * a);
    let offset = b / (3.0 * a);
    let discriminant = q * q / 4.0 + p * p * p / 27.0;

    if discriminant > 1e-12 {
        let sqrt_d = discriminant.sqrt();
        let u = (-q / 2.0 + sqrt_d).cbrt();
        let v = (-q / 2.0 - sqrt_d).cbrt();
        [Some(u + v - offset), None, None]
    } else if discriminant > -1e-12 {
        let u = (-q / 2.0).cbrt();
        [Some(2.0 * u - offset), Some(-u - offset), None]
    } else {
        let r = (-p * p * p / 27.0).sqrt();
        let phi = (-q / (2.0 * r)).max(-1.0).min(1.0).acos();
        let m = 2.0 * r.cbrt();
        [
            Some(m * (phi / 3.0).cos() - offset),
            Some(m * ((phi + 2.0 * std::f64::consts::PI) / 3.0).cos() - offset),
            Some(m * ((phi + 4.0 * std::f64::consts::PI) / 3.0).cos() - offset),
        ]
    }
}

/// Smallest root strictly greater than `lower_bound`, across both coordinate axes and
/// both `+tolerance`/`-tolerance` branches (§4.3 steps 2-3).
fn smallest_root_above(a: Vector2D, b: Vector2D, c: Vector2D, d: Vector2D, tolerance: f64, lower_bound: f64) -> f64 {
    let mut best = 2.0f64;
    for axis in 0..2 {
        let (aa, bb, cc, dd) = if axis == 0 {
            (a.x(), b.x(), c.x(), d.x())
        } else {
            (a.y(), b.y(), c.y(), d.y())
        };
        for &sign in &[1.0, -1.0] {
            for root in unbounded_cubic_roots(aa, bb, cc, dd + sign * tolerance).iter().flatten() {
                if *root > lower_bound && *root < best {
                    best = *root;
                }
            }
        }
    }
    best
}

fn midpoint(a: Vector2D, b: Vector2D) -> Vector2D {
    a.lerp(b, 0.5)
}

/// Runs the Taylor walk over one monotonic cubic piece (already in local `[0, 1]`
/// parameterization), appending quadratics to `path`.
fn taylor_walk(cubic: &CubicCurveD, tolerance: f64, path: &mut QuadraticPath) {
    let (a, b, c, d) = cubic.coefficients();

    let mut t0 = 0.0f64;
    let mut t_e = 0.0f64;
    let mut trailing = cubic.p0;

    while t0 < 1.0 {
        let t0_sq = t0 * t0;
        let t0_cb = t0_sq * t0;

        let f = a * t0_cb + b * t0_sq + c * t0 + d;
        let f_prime = a * (3.0 * t0_sq) + b * (2.0 * t0) + c;
        let f_second = a * (6.0 * t0) + b * 2.0;

        let quad_a = f_second * 0.5;
        let quad_b = f_prime - f_second * t0;
        let quad_c = f - f_prime * t0 + f_second * t0_sq * 0.5;

        // Error coefficients for `a*(t - t0)^3 = ±tolerance` (step 2).
        let err_b = a * (-3.0 * t0);
        let err_c = a * (3.0 * t0_sq);
        let err_d = a * (-t0_cb);
        let t_e_prime = smallest_root_above(a, err_b, err_c, err_d, tolerance, t0).min(1.0).max(t0);

        // Next center so the Taylor expansion there still matches at `t_e_prime` (step 3).
        let te_sq = t_e_prime * t_e_prime;
        let te_cb = te_sq * t_e_prime;
        let center_b = a * (3.0 * t_e_prime);
        let center_c = a * (-3.0 * te_sq);
        let center_d = a * te_cb;
        let t0_prime = smallest_root_above(-a, center_b, center_c, center_d, tolerance, t_e_prime);

        let quad = crate::curve::QuadraticCurveD::from_coefficients(quad_a, quad_b, quad_c);
        let extracted = quad.extract(t_e, t_e_prime.min(1.0));

        path.set_last_point(midpoint(trailing, extracted.p0).to_f32());
        path.push_curve(extracted.p1.to_f32(), extracted.p2.to_f32());

        t0 = t0_prime;
        t_e = t_e_prime;
        trailing = extracted.p2;
    }

    if t_e < 1.0 {
        let t0_sq = t0 * t0;
        let t0_cb = t0_sq * t0;
        let f = a * t0_cb + b * t0_sq + c * t0 + d;
        let f_prime = a * (3.0 * t0_sq) + b * (2.0 * t0) + c;
        let f_second = a * (6.0 * t0) + b * 2.0;

        let quad_a = f_second * 0.5;
        let quad_b = f_prime - f_second * t0;
        let quad_c = f - f_prime * t0 + f_second * t0_sq * 0.5;
        let quad = crate::curve::QuadraticCurveD::from_coefficients(quad_a, quad_b, quad_c);
        let extracted = quad.extract(t_e, 1.0);

        path.set_last_point(midpoint(trailing, extracted.p0).to_f32());
        path.push_curve(extracted.p1.to_f32(), cubic.p3.to_f32());
    }
}

/// Converts `cubic` to a `QuadraticPath` within `tolerance` (64-bit coordinates, §4.3),
/// pre-splitting at inflection points so each monotonic piece is walked independently.
pub fn cubic_to_quadratic_path(cubic: crate::curve::CubicCurve, tolerance: f32) -> QuadraticPath {
    let mut path = QuadraticPath::new();
    path.move_to(cubic.p0);

    let cubic_d = cubic.to_f64();
    let inflections = cubic_d.inflections();

    let mut breakpoints: Vec<f64> = inflections.as_slice().to_vec();
    breakpoints.retain(|&t| t > 1e-6 && t < 1.0 - 1e-6);
    breakpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut prev = 0.0;
    let mut pieces = Vec::with_capacity(breakpoints.len() + 1);
    for &t in &breakpoints {
        pieces.push((prev, t));
        prev = t;
    }
    pieces.push((prev, 1.0));

    for (t0, t1) in pieces {
        let piece = if t0 == 0.0 && t1 == 1.0 { cubic_d } else { cubic_d.extract(t0, t1) };
        taylor_walk(&piece, tolerance as f64, &mut path);
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CubicCurve;
    use vgfx_geometry::vector::Vector2F;

    #[test]
    fn stays_within_tolerance() {
        let cubic = CubicCurve::new(
            Vector2F::new(0.0, 0.0),
            Vector2F::new(4.0, 10.0),
            Vector2F::new(6.0, -10.0),
            Vector2F::new(10.0, 0.0),
        );
        let tolerance = 0.05;
        let quads = cubic_to_quadratic_path(cubic, tolerance);
        assert!(quads.curve_count() > 0);

        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let expected = cubic.sample(t);
            // Coarse arc-length matching: scan the quadratic path for the closest sample.
            let mut best = f32::INFINITY;
            for curve in quads.curves() {
                for j in 0..=20 {
                    let s = j as f32 / 20.0;
                    let d = (curve.sample(s) - expected).length();
                    if d < best {
                        best = d;
                    }
                }
            }
            assert!(best < tolerance * 5.0, "t={} best={}", t, best);
        }
    }

    #[test]
    fn terminates_on_a_line() {
        let cubic = CubicCurve::new(
            Vector2F::new(0.0, 0.0),
            Vector2F::new(3.0, 0.0),
            Vector2F::new(6.0, 0.0),
            Vector2F::new(10.0, 0.0),
        );
        let quads = cubic_to_quadratic_path(cubic, 0.01);
        assert!(quads.curve_count() >= 1);
        assert_eq!(*quads.points().last().unwrap(), Vector2F::new(10.0, 0.0));
    }
}
