// vgfx/content/src/builder.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The path builder (§4.4): turns a `Path` into a `StrokeOutline` of offset outer/inner
//! contours, and flattens any quadratic path to a line-segment stream for rasterization.
//! Grounded on `wasm-src/geom/path.cpp`'s stroke/flatten pass, generalized onto our
//! `QuadraticPath`/`CubicPath` data model.

use crate::arc::arc_segments;
use crate::offset::{offset_cubic, OffsetPiece};
use crate::path::{Path, Segment};
use crate::quad_path::QuadraticPath;
use vgfx_geometry::rect::RectF;
use vgfx_geometry::vector::Vector2F;

/// The line/round/miter join style (§4.4).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

/// The butt/square/round cap style (§4.4).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineCap {
    Butt,
    Square,
    Round,
}

/// Stroke parameters (§8 scenario vocabulary: width + miter_limit + cap + join).
#[derive(Clone, Copy, Debug)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
}

impl Default for StrokeStyle {
    fn default() -> StrokeStyle {
        StrokeStyle { width: 1.0, cap: LineCap::Butt, join: LineJoin::Miter, miter_limit: 10.0 }
    }
}

/// The stroker's output (§4.4): an outer and inner outline tracing the stroked region.
#[derive(Clone, Debug)]
pub struct StrokeOutline {
    pub outer: QuadraticPath,
    pub inner: QuadraticPath,
    pub bounding_rect: RectF,
}

#[inline]
fn left_normal(tangent: Vector2F) -> Vector2F {
    let n = tangent.normalize();
    Vector2F::new(-n.y(), n.x())
}

/// Strokes `path` at `style`, returning the outer/inner offset outlines (§4.4).
///
/// A closed path produces two independent rings: `outer` at `+half_width`, `inner` at
/// `-half_width` (reversed so the two wind oppositely around the stroked band). An open
/// path has no second rail to close against, so the two offset rails and their end caps
/// are traced as a single closed contour in `outer`, leaving `inner` empty (§8 S3).
pub fn stroke_path(path: &Path, style: &StrokeStyle, tolerance: f32) -> StrokeOutline {
    let half_width = style.width * 0.5;
    let segments: Vec<Segment> = path.iter().collect();

    log::debug!("stroke_path({} segments, width={})", segments.len(), style.width);

    if segments.is_empty() {
        return StrokeOutline { outer: QuadraticPath::new(), inner: QuadraticPath::new(), bounding_rect: RectF::empty() };
    }

    let pos_pieces = offset_segments(&segments, half_width, tolerance, style, path.closed());
    let neg_pieces = offset_segments(&segments, -half_width, tolerance, style, path.closed());

    if path.closed() {
        let mut outer = QuadraticPath::new();
        let mut inner = QuadraticPath::new();
        append_pieces(&mut outer, &pos_pieces);
        append_pieces(&mut inner, &neg_pieces);
        let bounding_rect = outer.bounding_rect().union(inner.bounding_rect());
        return StrokeOutline { outer, inner: inner.reversed(), bounding_rect };
    }

    let mut pos_path = QuadraticPath::new();
    append_pieces(&mut pos_path, &pos_pieces);

    let mut combined = QuadraticPath::new();
    append_pieces(&mut combined, &neg_pieces);

    let end_segment = *segments.last().unwrap();
    let end_target = *pos_path.points().last().unwrap();
    add_cap_segment(&mut combined, end_segment.to(), tangent_at_end(end_segment), style.cap, half_width, end_target);

    combined.append(&pos_path.reversed());

    let start_segment = *segments.first().unwrap();
    let start_target = combined.points()[0];
    add_cap_segment(&mut combined, start_segment.from(), -tangent_at_start(start_segment), style.cap, half_width, start_target);

    let bounding_rect = combined.bounding_rect();
    StrokeOutline { outer: combined, inner: QuadraticPath::new(), bounding_rect }
}

/// One segment's worth of offset geometry plus the join that follows it, flattened into
/// `Vector2F` triples (vertex, control, vertex) ready to append to a `QuadraticPath`.
#[derive(Clone, Copy)]
enum Piece {
    Quadratic(Vector2F, Vector2F, Vector2F),
}

fn append_pieces(path: &mut QuadraticPath, pieces: &[Piece]) {
    for (i, piece) in pieces.iter().enumerate() {
        let Piece::Quadratic(p0, p1, p2) = *piece;
        if i == 0 {
            path.move_to(p0);
        }
        path.push_curve(p1, p2);
    }
}

fn offset_segments(
    segments: &[Segment],
    distance: f32,
    tolerance: f32,
    style: &StrokeStyle,
    closed: bool,
) -> Vec<Piece> {
    let mut out = Vec::new();
    let mut prev_end_tangent: Option<Vector2F> = None;
    let mut first_start_tangent: Option<Vector2F> = None;

    for (i, &segment) in segments.iter().enumerate() {
        let (start_tangent, end_tangent, mut pieces) = offset_segment(segment, distance, tolerance);
        if i == 0 {
            first_start_tangent = Some(start_tangent);
        }

        if let Some(prev_tangent) = prev_end_tangent {
            add_join(&mut out, prev_tangent, start_tangent, style, distance);
        }

        out.append(&mut pieces);
        prev_end_tangent = Some(end_tangent);
    }

    if closed {
        if let (Some(prev_tangent), Some(start_tangent)) = (prev_end_tangent, first_start_tangent) {
            add_join(&mut out, prev_tangent, start_tangent, style, distance);
        }
    }

    out
}

/// Offsets a single segment, returning its start/end tangent directions (for join
/// construction) and the pieces produced.
fn offset_segment(segment: Segment, distance: f32, tolerance: f32) -> (Vector2F, Vector2F, Vec<Piece>) {
    match segment {
        Segment::Line(p0, p1) => {
            let tangent = (p1 - p0).normalize();
            let n = left_normal(tangent) * distance;
            (tangent, tangent, vec![Piece::Quadratic(p0 + n, p1 + n, p1 + n)])
        }
        Segment::Quadratic(p0, p1, p2) => offset_quadratic(p0, p1, p2, distance, tolerance),
        Segment::Cubic(p0, p1, p2, p3) => {
            let curve = crate::curve::CubicCurve::new(p0, p1, p2, p3);
            let start_tangent = curve.derivative(0.0).normalize();
            let end_tangent = curve.derivative(1.0).normalize();
            let mut pieces = Vec::new();
            for offset_piece in offset_cubic(curve, distance, tolerance) {
                match offset_piece {
                    OffsetPiece::Line(from, to) => pieces.push(Piece::Quadratic(from, to, to)),
                    OffsetPiece::Cubic(c) => {
                        let quad_path = crate::conversion::cubic_to_quadratic_path(c, tolerance);
                        for curve in quad_path.curves() {
                            pieces.push(Piece::Quadratic(curve.p0, curve.p1, curve.p2));
                        }
                    }
                }
            }
            (start_tangent, end_tangent, pieces)
        }
    }
}

/// Offsets a quadratic segment (§4.4): detects the colinear-degenerate case (a cusp at the
/// control point) and arc-bridges it; otherwise splits at the ≤2 parameters where the
/// offset curve's derivative becomes singular and sweeps each monotonic piece.
fn offset_quadratic(p0: Vector2F, p1: Vector2F, p2: Vector2F, distance: f32, tolerance: f32) -> (Vector2F, Vector2F, Vec<Piece>) {
    let a = p1 - p0;
    let b = p2 - p1;
    let start_tangent = if a.square_length() > 1e-12 { a.normalize() } else { (p2 - p0).normalize() };
    let end_tangent = if b.square_length() > 1e-12 { b.normalize() } else { (p2 - p0).normalize() };

    let cross = a.cross(b);
    if cross.abs() < 1e-9 {
        // Colinear control point: the quadratic degenerates to (up to) a cusp at p1.
        let mut pieces = Vec::new();
        let n_in = left_normal(start_tangent) * distance;
        pieces.push(Piece::Quadratic(p0 + n_in, p1 + n_in, p1 + n_in));
        if start_tangent.dot(end_tangent) < 0.0 {
            bridge_cusp_arc(&mut pieces, p1, start_tangent, end_tangent, distance);
        }
        let n_out = left_normal(end_tangent) * distance;
        pieces.push(Piece::Quadratic(p1 + n_out, p2 + n_out, p2 + n_out));
        return (start_tangent, end_tangent, pieces);
    }

    // Split points where radius^2 * (a x b)^2 = (a . a)^3 along the curve's parameter
    // (degenerate/singular points of the offset curve).
    let curve = crate::curve::QuadraticCurve::new(p0, p1, p2);
    let mut splits: Vec<f32> = Vec::new();
    let denom = a.square_length().powi(3);
    if denom > 1e-18 {
        let lhs = distance * distance * cross * cross;
        if lhs.abs() > 0.0 {
            // Solve for t along the linear blend of (a,b) via the curve's own derivative
            // zero-crossing approximation: probe uniformly and keep sign-change points.
            let samples = 32;
            let mut prev = singular_residual(&curve, 0.0, distance);
            for i in 1..=samples {
                let t = i as f32 / samples as f32;
                let cur = singular_residual(&curve, t, distance);
                if prev.signum() != cur.signum() && splits.len() < 2 {
                    splits.push(t);
                }
                prev = cur;
            }
        }
    }
    splits.sort_by(|x, y| x.partial_cmp(y).unwrap());

    let mut pieces = Vec::new();
    let mut prev_t = 0.0f32;
    let mut boundaries = splits;
    boundaries.push(1.0);

    for t in boundaries {
        let piece = curve.extract(prev_t, t);
        sweep_quadratic(&piece, distance, tolerance, &mut pieces);
        prev_t = t;
    }

    (start_tangent, end_tangent, pieces)
}

fn singular_residual(curve: &crate::curve::QuadraticCurve, t: f32, distance: f32) -> f32 {
    let d = curve.derivative(t);
    let (a, _b, _c) = curve.coefficients();
    distance * distance * a.cross(d) * a.cross(d) - d.square_length().powi(3) / d.square_length().max(1e-9)
}

/// Offsets one monotonic piece of a quadratic by the perpendicular sweep method: splits
/// recursively at `t = 0.5` while `|a . b| * tolerance > |a x b|` (§4.4), then emits the
/// endpoint-normal offset of the leaf piece as a single quadratic.
fn sweep_quadratic(curve: &crate::curve::QuadraticCurve, distance: f32, tolerance: f32, out: &mut Vec<Piece>) {
    let a = curve.p1 - curve.p0;
    let b = curve.p2 - curve.p1;

    if a.dot(b).abs() * tolerance > a.cross(b).abs() && a.square_length() > 1e-12 && b.square_length() > 1e-12 {
        let [left, right] = curve.split(0.5);
        sweep_quadratic(&left, distance, tolerance, out);
        sweep_quadratic(&right, distance, tolerance, out);
        return;
    }

    let t0 = if a.square_length() > 1e-12 { a.normalize() } else { (curve.p2 - curve.p0).normalize() };
    let t1 = if b.square_length() > 1e-12 { b.normalize() } else { (curve.p2 - curve.p0).normalize() };
    let n0 = left_normal(t0) * distance;
    let n1 = left_normal(t1) * distance;
    let control = curve.p1 + (n0 + n1) * 0.5;
    out.push(Piece::Quadratic(curve.p0 + n0, control, curve.p2 + n1));
}

fn add_join(out: &mut Vec<Piece>, prev_tangent: Vector2F, next_tangent: Vector2F, style: &StrokeStyle, distance: f32) {
    let turn = prev_tangent.cross(next_tangent);
    if turn.abs() < 1e-6 {
        return;
    }

    match style.join {
        LineJoin::Bevel => {}
        LineJoin::Round => {
            if let Some(Piece::Quadratic(_, _, last)) = out.last() {
                let pivot = *last - left_normal(prev_tangent) * distance;
                bridge_cusp_arc(out, pivot, prev_tangent, next_tangent, distance);
            }
        }
        LineJoin::Miter => {
            let half_angle = ((prev_tangent.dot(next_tangent)).max(-1.0).min(1.0)).acos() * 0.5;
            if half_angle.sin().max(1e-6) >= 1.0 / style.miter_limit.max(1.0) {
                if let (Some(Piece::Quadratic(_, _, last)), Some(v)) =
                    (out.last().copied(), intersect_offset_lines(out, prev_tangent, next_tangent, distance))
                {
                    out.push(Piece::Quadratic(last, v, v));
                }
            }
        }
    }
}

fn intersect_offset_lines(out: &[Piece], prev_tangent: Vector2F, next_tangent: Vector2F, distance: f32) -> Option<Vector2F> {
    let Piece::Quadratic(_, _, last) = *out.last()?;
    let denom = prev_tangent.cross(next_tangent);
    if denom.abs() < 1e-9 {
        return None;
    }
    let pivot = last - left_normal(prev_tangent) * distance;
    let n1 = left_normal(next_tangent) * distance;
    let diff = (pivot + n1) - last;
    let t = diff.cross(next_tangent) / denom;
    Some(last + prev_tangent * t)
}

/// Bridges a small turn with a round arc centered at `pivot`, spanning the exterior angle
/// between the two offset tangent directions (§4.4 round join, §4.6 arc primitive).
fn bridge_cusp_arc(out: &mut Vec<Piece>, pivot: Vector2F, prev_tangent: Vector2F, next_tangent: Vector2F, distance: f32) {
    let radius = distance.abs();
    if radius < 1e-9 {
        return;
    }
    let clockwise = distance < 0.0;
    let n0 = left_normal(prev_tangent);
    let n1 = left_normal(next_tangent);
    let start_angle = n0.y().atan2(n0.x());
    let mut end_angle = n1.y().atan2(n1.x());
    let mut sweep = end_angle - start_angle;
    if clockwise && sweep < 0.0 {
        sweep += std::f32::consts::PI * 2.0;
    } else if !clockwise && sweep > 0.0 {
        sweep -= std::f32::consts::PI * 2.0;
    }
    end_angle = start_angle + sweep;
    let _ = end_angle;

    for segment in arc_segments(pivot, radius, start_angle, sweep.abs(), sweep >= 0.0) {
        let curve = crate::curve::CubicCurve::new(segment.p0, segment.p1, segment.p2, segment.p3);
        let flat = crate::conversion::cubic_to_quadratic_path(curve, 0.05);
        for q in flat.curves() {
            out.push(Piece::Quadratic(q.p0, q.p1, q.p2));
        }
    }
}

/// Bridges an open path's end to the start of its opposite rail with a cap (§4.4): Butt
/// draws the straight closing edge directly, Square extends both rail ends by `half_width`
/// along `outward` first, Round sweeps a semicircular arc of radius `half_width` centered
/// on the path endpoint.
fn add_cap_segment(
    combined: &mut QuadraticPath,
    center: Vector2F,
    outward: Vector2F,
    cap: LineCap,
    half_width: f32,
    target: Vector2F,
) {
    match cap {
        LineCap::Butt => {
            combined.push_line(target);
        }
        LineCap::Square => {
            let from = *combined.points().last().unwrap();
            let extend = outward * half_width;
            combined.push_line(from + extend);
            combined.push_line(target + extend);
            combined.push_line(target);
        }
        LineCap::Round => {
            let from = *combined.points().last().unwrap();
            let start_vec = from - center;
            let start_angle = start_vec.y().atan2(start_vec.x());
            let clockwise = start_vec.cross(outward) > 0.0;
            for segment in arc_segments(center, half_width, start_angle, std::f32::consts::PI, clockwise) {
                let curve = crate::curve::CubicCurve::new(segment.p0, segment.p1, segment.p2, segment.p3);
                let flat = crate::conversion::cubic_to_quadratic_path(curve, 0.05);
                for q in flat.curves() {
                    combined.push_curve(q.p1, q.p2);
                }
            }
        }
    }
}

fn tangent_at_end(segment: Segment) -> Vector2F {
    match segment {
        Segment::Line(p0, p1) => (p1 - p0).normalize(),
        Segment::Quadratic(p0, p1, p2) => {
            let d = p2 - p1;
            if d.square_length() > 1e-12 { d.normalize() } else { (p2 - p0).normalize() }
        }
        Segment::Cubic(p0, _, p2, p3) => {
            let d = p3 - p2;
            if d.square_length() > 1e-12 { d.normalize() } else { (p3 - p0).normalize() }
        }
    }
}

fn tangent_at_start(segment: Segment) -> Vector2F {
    match segment {
        Segment::Line(p0, p1) => (p1 - p0).normalize(),
        Segment::Quadratic(p0, p1, p2) => {
            let d = p1 - p0;
            if d.square_length() > 1e-12 { d.normalize() } else { (p2 - p0).normalize() }
        }
        Segment::Cubic(p0, p1, _, p3) => {
            let d = p1 - p0;
            if d.square_length() > 1e-12 { d.normalize() } else { (p3 - p0).normalize() }
        }
    }
}

/// Flattens `path` to a line-segment stream within `tolerance` (§4.4): adaptive recursive
/// subdivision when estimated screen coverage is low, uniform stepping when high.
pub fn flatten_path(path: &QuadraticPath, clip: RectF, tolerance: f32) -> Vec<(Vector2F, Vector2F)> {
    let coverage = estimate_coverage(path, clip);
    let mut lines = Vec::new();

    for curve in path.curves() {
        if !curve.approx_bounding_rect().intersects(clip) && !clip.is_empty() {
            continue;
        }
        if coverage > 0.5 {
            flatten_uniform(&curve, tolerance, &mut lines);
        } else {
            flatten_adaptive(&curve, tolerance, 0, &mut lines);
        }
    }

    lines
}

fn estimate_coverage(path: &QuadraticPath, clip: RectF) -> f32 {
    if clip.is_empty() {
        return 0.0;
    }
    let bounds = path.bounding_rect();
    let clip_area = (clip.width() * clip.height()).max(1e-6);
    let path_area = (bounds.width() * bounds.height()).max(0.0);
    (path_area / clip_area).min(1.0)
}

const MAX_FLATTEN_DEPTH: u32 = 16;

fn flatten_adaptive(curve: &crate::curve::QuadraticCurve, tolerance: f32, depth: u32, out: &mut Vec<(Vector2F, Vector2F)>) {
    let chord = curve.p2 - curve.p0;
    let chord_len_sq = chord.square_length();
    let mid = curve.p0.lerp(curve.p2, 0.5);
    let deviation = chord.cross(curve.p0 - mid);
    let d = if chord_len_sq > 1e-12 { (deviation * deviation) / chord_len_sq } else { 0.0 };

    if d < tolerance * tolerance || depth >= MAX_FLATTEN_DEPTH {
        out.push((curve.p0, curve.p2));
        return;
    }

    let [left, right] = curve.split(0.5);
    flatten_adaptive(&left, tolerance, depth + 1, out);
    flatten_adaptive(&right, tolerance, depth + 1, out);
}

fn flatten_uniform(curve: &crate::curve::QuadraticCurve, tolerance: f32, out: &mut Vec<(Vector2F, Vector2F)>) {
    let second_derivative_len = curve.second_derivative().length().max(1e-6);
    let dt = (2.0 * tolerance / second_derivative_len).sqrt().max(1.0 / 128.0);
    let steps = (1.0 / dt).ceil().max(1.0) as usize;

    let mut prev = curve.p0;
    for i in 1..=steps {
        let t = (i as f32 / steps as f32).min(1.0);
        let p = curve.sample(t);
        out.push((prev, p));
        prev = p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_stroke_traces_closed_rectangle_with_empty_inner() {
        // S3: stroke move_to(0,0); line_to(10,0) at width=2, Butt cap, Miter join.
        let mut path = Path::new();
        path.move_to(Vector2F::new(0.0, 0.0));
        path.line_to(Vector2F::new(10.0, 0.0), false);

        let style = StrokeStyle { width: 2.0, cap: LineCap::Butt, join: LineJoin::Miter, miter_limit: 10.0 };
        let outline = stroke_path(&path, &style, 0.1);

        assert!(outline.inner.is_empty());
        assert!(!outline.outer.is_empty());

        let points = outline.outer.points();
        let first = points[0];
        let last = *points.last().unwrap();
        assert!((first.x() - 0.0).abs() < 1e-4 && (first.y() - (-1.0)).abs() < 1e-4);
        assert!((last.x() - first.x()).abs() < 1e-4 && (last.y() - first.y()).abs() < 1e-4);

        let bounds = outline.bounding_rect;
        assert!((bounds.min_x() - 0.0).abs() < 1e-4);
        assert!((bounds.max_x() - 10.0).abs() < 1e-4);
        assert!((bounds.min_y() - (-1.0)).abs() < 1e-4);
        assert!((bounds.max_y() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn flatten_respects_clip_disjoint_skip() {
        let mut quads = QuadraticPath::new();
        quads.move_to(Vector2F::new(0.0, 0.0));
        quads.push_curve(Vector2F::new(5.0, 10.0), Vector2F::new(10.0, 0.0));

        let far_clip = RectF::new(Vector2F::new(1000.0, 1000.0), Vector2F::new(10.0, 10.0));
        let lines = flatten_path(&quads, far_clip, 0.1);
        assert!(lines.is_empty());

        let covering_clip = RectF::new(Vector2F::new(-10.0, -10.0), Vector2F::new(30.0, 30.0));
        let lines = flatten_path(&quads, covering_clip, 0.1);
        assert!(!lines.is_empty());
    }
}
