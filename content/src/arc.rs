// vgfx/content/src/arc.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The arc primitive (§4.6): approximates a circular/elliptical arc by cubic Bézier
//! segments of at most π/2 sweep each, and the SVG-style `arc_to` path builder
//! convenience supplemented from `wasm-src/geom/curve_ops.cpp`'s
//! `monotonic_cubic_to_circular_quadratics` family (carried as a `Path` helper per
//! SPEC_FULL.md §3, used by the round join/cap of §4.4 and by S2 of §8).

use std::f32::consts::{FRAC_PI_2, PI};
use vgfx_geometry::vector::Vector2F;

/// One cubic Bézier approximation of an arc segment spanning at most π/2.
#[derive(Clone, Copy, Debug)]
pub struct ArcSegment {
    pub p0: Vector2F,
    pub p1: Vector2F,
    pub p2: Vector2F,
    pub p3: Vector2F,
}

/// Appends cubic segments approximating the arc of `radius` centered at `center`, running
/// from `from` to `to`, through `sweep` radians, in the direction given by `clockwise`
/// (§4.6). `sweep` is always non-negative; direction comes from `clockwise`.
pub fn arc_segments(center: Vector2F, radius: f32, start_angle: f32, sweep: f32, clockwise: bool) -> Vec<ArcSegment> {
    if radius.abs() < 1e-9 || sweep.abs() < 1e-9 {
        return Vec::new();
    }

    let segment_count = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let signed_step = if clockwise { sweep.abs() } else { -sweep.abs() } / segment_count as f32;

    let mut segments = Vec::with_capacity(segment_count);
    let mut angle = start_angle;

    for _ in 0..segment_count {
        let next_angle = angle + signed_step;
        segments.push(arc_segment(center, radius, angle, next_angle));
        angle = next_angle;
    }

    segments
}

/// A single cubic approximation of the arc spanning `(start_angle, end_angle)`, with
/// `k = (4/3) * tan(delta/4)` control distance (§4.6).
fn arc_segment(center: Vector2F, radius: f32, start_angle: f32, end_angle: f32) -> ArcSegment {
    let delta = end_angle - start_angle;
    let k = (4.0 / 3.0) * (delta / 4.0).tan();

    let (s0, c0) = start_angle.sin_cos();
    let (s1, c1) = end_angle.sin_cos();

    let p0 = center + Vector2F::new(c0, s0) * radius;
    let p3 = center + Vector2F::new(c1, s1) * radius;

    // Tangent directions are the radial vector rotated 90°, scaled by `k * r`.
    let t0 = Vector2F::new(-s0, c0) * (k * radius);
    let t1 = Vector2F::new(-s1, c1) * (k * radius);

    ArcSegment { p0, p1: p0 + t0, p2: p3 - t1, p3 }
}

/// SVG-style endpoint arc parameterization (§8 S2): solves for the arc `(center, radius,
/// start_angle, sweep)` implied by an endpoint-parameterized ellipse, then emits cubic
/// segments from `from` to `to`. Degenerates to a single line when `radius` is
/// (near-)zero or `from == to`.
pub fn endpoint_arc_to_cubics(
    from: Vector2F,
    radius: Vector2F,
    x_rotation: f32,
    large_arc: bool,
    sweep: bool,
    to: Vector2F,
) -> Vec<ArcSegment> {
    if (from - to).square_length() < 1e-12 || radius.x().abs() < 1e-9 || radius.y().abs() < 1e-9 {
        return Vec::new();
    }

    // Only circular arcs are produced by this core (elliptical radii are normalized to
    // their average, matching the rest of the builder's circle-only join/cap arcs).
    let r = (radius.x().abs() + radius.y().abs()) * 0.5;
    let _ = x_rotation;

    let midpoint = from.lerp(to, 0.5);
    let chord = to - from;
    let chord_len = chord.length();

    if chord_len > 2.0 * r {
        // Requested radius too small for the chord: scale it up just enough, as the SVG
        // spec's out-of-range correction does.
        return endpoint_arc_to_cubics(from, Vector2F::splat(chord_len / 2.0), x_rotation, large_arc, sweep, to);
    }

    let half_chord = chord_len / 2.0;
    let h = (r * r - half_chord * half_chord).max(0.0).sqrt();
    let perp = chord.normalize().perp();

    let sign = if large_arc == sweep { 1.0 } else { -1.0 };
    let center = midpoint + perp * (h * sign);

    let start_vec = from - center;
    let end_vec = to - center;
    let start_angle = start_vec.y().atan2(start_vec.x());
    let mut end_angle = end_vec.y().atan2(end_vec.x());

    if sweep && end_angle < start_angle {
        end_angle += 2.0 * PI;
    } else if !sweep && end_angle > start_angle {
        end_angle -= 2.0 * PI;
    }

    let sweep_angle = end_angle - start_angle;
    arc_segments(center, r, start_angle, sweep_angle.abs(), sweep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_circle_midpoint() {
        // move_to(1,0); arc_to(center=(0,0), r=1, large=false, sweep=true, to=(0,1)).
        let segments = endpoint_arc_to_cubics(
            Vector2F::new(1.0, 0.0),
            Vector2F::splat(1.0),
            0.0,
            false,
            true,
            Vector2F::new(0.0, 1.0),
        );
        assert_eq!(segments.len(), 1);
        let seg = segments[0];
        let curve = crate::curve::CubicCurve::new(seg.p0, seg.p1, seg.p2, seg.p3);
        let mid = curve.sample(0.5);
        let expected = std::f32::consts::FRAC_1_SQRT_2;
        assert!((mid.x() - expected).abs() < 1e-3, "mid={:?}", mid);
        assert!((mid.y() - expected).abs() < 1e-3, "mid={:?}", mid);
    }

    #[test]
    fn degenerate_radius_emits_nothing() {
        let segments = endpoint_arc_to_cubics(
            Vector2F::zero(),
            Vector2F::zero(),
            0.0,
            false,
            true,
            Vector2F::new(1.0, 0.0),
        );
        assert!(segments.is_empty());
    }
}
