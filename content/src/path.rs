// vgfx/content/src/path.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The path data model (§3, §4.1): a compact commands+points representation built by
//! move/line/quadratic/cubic/close, edited in place, and walked by forward/reverse
//! segment iterators.

use crate::command::{Command, CommandBuffer};
use crate::fit::fit_cubic;
use vgfx_geometry::transform2d::Transform2F;
use vgfx_geometry::util::is_almost_zero;
use vgfx_geometry::vector::Vector2F;

/// A transient tagged union yielded by path iterators; never stored, per §3.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Segment {
    Line(Vector2F, Vector2F),
    Quadratic(Vector2F, Vector2F, Vector2F),
    Cubic(Vector2F, Vector2F, Vector2F, Vector2F),
}

impl Segment {
    #[inline]
    pub fn from(self) -> Vector2F {
        match self {
            Segment::Line(p0, _) => p0,
            Segment::Quadratic(p0, ..) => p0,
            Segment::Cubic(p0, ..) => p0,
        }
    }

    #[inline]
    pub fn to(self) -> Vector2F {
        match self {
            Segment::Line(_, p1) => p1,
            Segment::Quadratic(_, _, p2) => p2,
            Segment::Cubic(_, _, _, p3) => p3,
        }
    }

    #[inline]
    pub fn command(self) -> Command {
        match self {
            Segment::Line(..) => Command::Line,
            Segment::Quadratic(..) => Command::Quadratic,
            Segment::Cubic(..) => Command::Cubic,
        }
    }

    pub fn reversed(self) -> Segment {
        match self {
            Segment::Line(p0, p1) => Segment::Line(p1, p0),
            Segment::Quadratic(p0, p1, p2) => Segment::Quadratic(p2, p1, p0),
            Segment::Cubic(p0, p1, p2, p3) => Segment::Cubic(p3, p2, p1, p0),
        }
    }

    pub fn transformed(self, transform: Transform2F) -> Segment {
        match self {
            Segment::Line(p0, p1) => Segment::Line(transform * p0, transform * p1),
            Segment::Quadratic(p0, p1, p2) => {
                Segment::Quadratic(transform * p0, transform * p1, transform * p2)
            }
            Segment::Cubic(p0, p1, p2, p3) => {
                Segment::Cubic(transform * p0, transform * p1, transform * p2, transform * p3)
            }
        }
    }

    /// Converts to a cubic by degree elevation, used by the offsetter (§4.5) which only
    /// ever operates on cubics.
    pub fn to_cubic(self) -> (Vector2F, Vector2F, Vector2F, Vector2F) {
        match self {
            Segment::Line(p0, p1) => (p0, p0.lerp(p1, 1.0 / 3.0), p0.lerp(p1, 2.0 / 3.0), p1),
            Segment::Quadratic(p0, p1, p2) => {
                (p0, p0.lerp(p1, 2.0 / 3.0), p1.lerp(p2, 1.0 / 3.0), p2)
            }
            Segment::Cubic(p0, p1, p2, p3) => (p0, p1, p2, p3),
        }
    }
}

/// Sentinel reserved point indices for the in/out auxiliary handles (§3 `VertexNode`).
pub const IN_HANDLE_INDEX: usize = usize::MAX - 1;
pub const OUT_HANDLE_INDEX: usize = usize::MAX;

/// The editing neighborhood of a control point (§3).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct VertexNode {
    pub vertex_index: usize,
    pub in_handle_index: Option<usize>,
    pub out_handle_index: Option<usize>,
    pub close_vertex: bool,
    pub in_command_index: Option<usize>,
    pub out_command_index: Option<usize>,
}

/// The central path entity (§3).
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    points: Vec<Vector2F>,
    commands: CommandBuffer,
    closed: bool,
    in_handle: Vector2F,
    out_handle: Vector2F,
}

impl Path {
    pub fn new() -> Path {
        Path::default()
    }

    #[inline]
    pub fn is_vacant(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Vector2F] {
        &self.points
    }

    #[inline]
    pub fn commands(&self) -> &CommandBuffer {
        &self.commands
    }

    #[inline]
    pub fn closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn in_handle(&self) -> Vector2F {
        self.in_handle
    }

    #[inline]
    pub fn out_handle(&self) -> Vector2F {
        self.out_handle
    }

    /// §4.1 `move_to`: requires an empty path.
    pub fn move_to(&mut self, p: Vector2F) {
        debug_assert!(self.is_vacant(), "move_to requires an empty path");
        self.points.push(p);
        self.commands.push(Command::Move);
        self.in_handle = p;
        self.out_handle = p;
    }

    /// §4.1 `line_to`.
    pub fn line_to(&mut self, p: Vector2F, reverse: bool) {
        debug_assert!(!self.is_vacant(), "line_to requires a non-vacant path");
        if reverse {
            self.points.insert(0, p);
            self.commands.insert_front(Command::Line);
        } else {
            self.points.push(p);
            self.commands.push(Command::Line);
        }
    }

    /// §4.1 `quadratic_to`.
    pub fn quadratic_to(&mut self, c: Vector2F, p: Vector2F, reverse: bool) {
        debug_assert!(!self.is_vacant(), "quadratic_to requires a non-vacant path");
        if reverse {
            self.points.insert(0, p);
            self.points.insert(1, c);
            self.commands.insert_front(Command::Quadratic);
        } else {
            self.points.push(c);
            self.points.push(p);
            self.commands.push(Command::Quadratic);
        }
    }

    /// §4.1 `cubic_to`.
    pub fn cubic_to(&mut self, c1: Vector2F, c2: Vector2F, p: Vector2F, reverse: bool) {
        debug_assert!(!self.is_vacant(), "cubic_to requires a non-vacant path");
        if reverse {
            self.points.insert(0, p);
            self.points.insert(1, c2);
            self.points.insert(2, c1);
            self.commands.insert_front(Command::Cubic);
        } else {
            self.points.push(c1);
            self.points.push(c2);
            self.points.push(p);
            self.commands.push(Command::Cubic);
        }
    }

    /// SVG-style endpoint arc (§4.6, §8 S2): appends cubic segments approximating the arc
    /// from the path's current point to `to`, supplemented from `wasm-src/geom/path.cpp`'s
    /// `arc_to`. A degenerate arc (zero radius, or start == end) falls back to a line.
    pub fn arc_to(&mut self, radius: Vector2F, x_rotation: f32, large_arc: bool, sweep: bool, to: Vector2F) {
        debug_assert!(!self.is_vacant(), "arc_to requires a non-vacant path");
        let from = *self.points.last().unwrap();
        let segments = crate::arc::endpoint_arc_to_cubics(from, radius, x_rotation, large_arc, sweep, to);

        if segments.is_empty() {
            self.line_to(to, false);
            return;
        }

        for segment in segments {
            self.cubic_to(segment.p1, segment.p2, segment.p3, false);
        }
    }

    /// §4.1 `close`: idempotent.
    pub fn close(&mut self) {
        if self.closed || self.is_vacant() {
            self.closed = true;
            return;
        }

        let first = self.points[0];
        let last = *self.points.last().unwrap();

        if (last - first).square_length() > 1e-12 {
            let handles_nondegenerate =
                self.out_handle != last && self.in_handle != first;
            if handles_nondegenerate {
                self.cubic_to(self.out_handle, self.in_handle, first, false);
            } else {
                self.line_to(first, false);
            }
        }

        self.closed = true;
    }

    /// §4.1 `translate`: a no-op if `delta` is ≈0.
    pub fn translate(&mut self, point_index: usize, delta: Vector2F) {
        if is_almost_zero(delta.x()) && is_almost_zero(delta.y()) {
            return;
        }
        self.points[point_index] = self.points[point_index] + delta;
    }

    /// §4.1 `transformed`: preserves command encoding byte-for-byte.
    pub fn transformed(&self, m: Transform2F) -> Path {
        Path {
            points: self.points.iter().map(|&p| m * p).collect(),
            commands: self.commands.clone(),
            closed: self.closed,
            in_handle: m * self.in_handle,
            out_handle: m * self.out_handle,
        }
    }

    /// Forward segment iterator (§4.1).
    pub fn iter(&self) -> Iter<'_> {
        Iter { path: self, command_index: 1, point_index: 1 }
    }

    /// Reverse segment iterator (§4.1).
    pub fn iter_rev(&self) -> ReverseIter<'_> {
        let command_count = self.commands.len();
        let point_count = self.points.len();
        ReverseIter { path: self, command_index: command_count, point_index: point_count }
    }

    /// Finds the command owning `point_index`, scanning from whichever end is nearer
    /// (§4.1: "O(n/2) via scan from the nearer end").
    fn command_containing_point(&self, point_index: usize) -> (usize, usize) {
        let command_count = self.commands.len();
        let point_count = self.points.len();

        if point_index * 2 <= point_count {
            let mut cursor = 1usize;
            for command_index in 1..command_count {
                let command = self.commands.get(command_index);
                let next_cursor = cursor + command.point_count();
                if point_index < next_cursor {
                    return (command_index, cursor - 1);
                }
                cursor = next_cursor;
            }
            (command_count.saturating_sub(1), cursor.saturating_sub(1))
        } else {
            let mut cursor = point_count;
            for command_index in (1..command_count).rev() {
                let command = self.commands.get(command_index);
                let start = cursor - command.point_count();
                if point_index >= start {
                    return (command_index, start - 1);
                }
                cursor = start;
            }
            (0, 0)
        }
    }

    /// §4.1 `node_at`: the editing neighborhood of a control point.
    pub fn node_at(&self, point_index: usize) -> VertexNode {
        let point_count = self.points.len();

        if point_index == 0 {
            let in_command_index =
                if self.closed { Some(self.commands.len() - 1) } else { None };
            return VertexNode {
                vertex_index: 0,
                in_handle_index: if self.closed { None } else { Some(IN_HANDLE_INDEX) },
                out_handle_index: if self.commands.len() > 1 { None } else { Some(OUT_HANDLE_INDEX) },
                close_vertex: self.closed,
                in_command_index,
                out_command_index: if self.commands.len() > 1 { Some(1) } else { None },
            };
        }

        let (command_index, _) = self.command_containing_point(point_index);
        let is_last_point = point_index == point_count - 1;

        VertexNode {
            vertex_index: point_index,
            in_handle_index: None,
            out_handle_index: if is_last_point && !self.closed { Some(OUT_HANDLE_INDEX) } else { None },
            close_vertex: is_last_point && self.closed,
            in_command_index: Some(command_index),
            out_command_index: if command_index + 1 < self.commands.len() {
                Some(command_index + 1)
            } else {
                None
            },
        }
    }

    /// §4.1 `split`: De Casteljau split at `t`, returns the index of the shared vertex.
    pub fn split(&mut self, segment_index: usize, t: f32) -> usize {
        let command_index = segment_index + 1;
        let (start_point, segment) = self.segment_at(command_index);

        let (left, right): (Vec<Command>, Vec<Vector2F>) = match segment {
            Segment::Line(p0, p1) => {
                let mid = p0.lerp(p1, t);
                (vec![Command::Line, Command::Line], vec![mid, p1])
            }
            Segment::Quadratic(p0, p1, p2) => {
                let curve = crate::curve::QuadraticCurve::new(p0, p1, p2);
                let [a, b] = curve.split(t);
                (vec![Command::Quadratic, Command::Quadratic], vec![a.p1, a.p2, b.p1, b.p2])
            }
            Segment::Cubic(p0, p1, p2, p3) => {
                let curve = crate::curve::CubicCurve::new(p0, p1, p2, p3);
                let [a, b] = curve.split(t);
                (
                    vec![Command::Cubic, Command::Cubic],
                    vec![a.p1, a.p2, a.p3, b.p1, b.p2, b.p3],
                )
            }
        };

        let end_point = start_point + segment.command().point_count();
        self.points.splice(start_point..end_point, right);
        self.commands.replace_one_with_many(command_index, &left);

        start_point + left[0].point_count() - 1
    }

    /// Returns the first point index of the segment at `command_index` and its inflated
    /// `Segment` value.
    fn segment_at(&self, command_index: usize) -> (usize, Segment) {
        let mut cursor = 1usize;
        for i in 1..command_index {
            cursor += self.commands.get(i).point_count();
        }
        let command = self.commands.get(command_index);
        let p0 = self.points[cursor - 1];

        let segment = match command {
            Command::Line => Segment::Line(p0, self.points[cursor]),
            Command::Quadratic => Segment::Quadratic(p0, self.points[cursor], self.points[cursor + 1]),
            Command::Cubic => Segment::Cubic(
                p0,
                self.points[cursor],
                self.points[cursor + 1],
                self.points[cursor + 2],
            ),
            Command::Move => unreachable!("segment_at called on a Move command"),
        };

        (cursor, segment)
    }

    /// §4.1 `to_line` / `to_quadratic` / `to_cubic`: degree-changing edits, renormalizing
    /// `reference_point` across the differing control count (supplemented from
    /// `wasm-src/geom/path.cpp`'s degree-change helpers).
    pub fn to_line(&mut self, command_index: usize, reference_point: &mut usize) {
        let (start_point, segment) = self.segment_at(command_index);
        let (p0, p1) = (segment.from(), segment.to());
        let removed = segment.command().point_count() - 1;

        self.points.splice(start_point..start_point + segment.command().point_count() - 1, vec![]);
        self.points[start_point - 1] = p0;
        let _ = p1;
        self.commands.set(command_index, Command::Line);

        if *reference_point > start_point {
            *reference_point = reference_point.saturating_sub(removed);
        }
    }

    pub fn to_quadratic(&mut self, command_index: usize, reference_point: &mut usize) {
        let (start_point, segment) = self.segment_at(command_index);
        let (p0, p1) = (segment.from(), segment.to());

        let new_points = match segment {
            Segment::Line(..) => {
                let control = p0.lerp(p1, 0.5);
                vec![control, p1]
            }
            Segment::Quadratic(_, c, _) => vec![c, p1],
            Segment::Cubic(_, c1, c2, _) => vec![c1.lerp(c2, 0.5), p1],
        };

        let old_count = segment.command().point_count();
        self.points.splice(start_point..start_point + old_count, new_points);
        self.commands.set(command_index, Command::Quadratic);

        if *reference_point > start_point {
            let delta = old_count as isize - 2;
            *reference_point = (*reference_point as isize - delta).max(0) as usize;
        }
    }

    pub fn to_cubic(&mut self, command_index: usize, reference_point: &mut usize) {
        let (start_point, segment) = self.segment_at(command_index);
        let (p0, p1) = (segment.from(), segment.to());

        let new_points = match segment {
            Segment::Line(..) => vec![p0.lerp(p1, 1.0 / 3.0), p0.lerp(p1, 2.0 / 3.0), p1],
            Segment::Quadratic(_, c, _) => vec![p0.lerp(c, 2.0 / 3.0), p1.lerp(c, 2.0 / 3.0), p1],
            Segment::Cubic(_, c1, c2, _) => vec![c1, c2, p1],
        };

        let old_count = segment.command().point_count();
        self.points.splice(start_point..start_point + old_count, new_points);
        self.commands.set(command_index, Command::Cubic);

        if *reference_point > start_point {
            let delta = old_count as isize - 3;
            *reference_point = (*reference_point as isize - delta).max(0) as usize;
        }
    }

    /// §4.1 `remove`: removes a vertex, refitting the two adjacent segments.
    ///
    /// When `keep_shape` is true, the combined curve is resampled at 21 points and
    /// refit to a single cubic (grounded on `wasm-src/algorithms/fit.cpp`'s chord-length
    /// fit, §4.7); otherwise the surviving controls are blended geometrically.
    pub fn remove(&mut self, point_index: usize, keep_shape: bool) {
        let node = self.node_at(point_index);
        let (in_command, out_command) = match (node.in_command_index, node.out_command_index) {
            (Some(a), Some(b)) => (a, b),
            _ => return,
        };

        let (in_start, in_segment) = self.segment_at(in_command);
        let (_out_start, out_segment) = self.segment_at(out_command);

        let p0 = in_segment.from();
        let p3 = out_segment.to();

        let replacement = if keep_shape {
            let mut samples = Vec::with_capacity(21);
            for i in 0..21 {
                let t = i as f32 / 20.0;
                samples.push(if t < 0.5 {
                    sample_segment(in_segment, t * 2.0)
                } else {
                    sample_segment(out_segment, (t - 0.5) * 2.0)
                });
            }
            fit_cubic(&samples, 1e-3).unwrap_or(crate::curve::CubicCurve::new(
                p0,
                p0.lerp(p3, 1.0 / 3.0),
                p0.lerp(p3, 2.0 / 3.0),
                p3,
            ))
        } else {
            let c1 = match in_segment {
                Segment::Cubic(_, c1, ..) => c1,
                Segment::Quadratic(p0, c, _) => p0.lerp(c, 2.0 / 3.0),
                Segment::Line(p0, p1) => p0.lerp(p1, 1.0 / 3.0),
            };
            let c2 = match out_segment {
                Segment::Cubic(.., c2, _) => c2,
                Segment::Quadratic(_, c, p1) => p1.lerp(c, 2.0 / 3.0),
                Segment::Line(p0, p1) => p0.lerp(p1, 2.0 / 3.0),
            };
            crate::curve::CubicCurve::new(p0, c1, c2, p3)
        };

        let out_end = in_start + in_segment.command().point_count()
            + out_segment.command().point_count();
        self.points.splice(in_start..out_end, vec![replacement.p1, replacement.p2, replacement.p3]);
        self.commands
            .replace_one_with_many(in_command, &[Command::Cubic]);
        self.commands.remove(out_command);
    }
}

fn sample_segment(segment: Segment, t: f32) -> Vector2F {
    match segment {
        Segment::Line(p0, p1) => p0.lerp(p1, t),
        Segment::Quadratic(p0, p1, p2) => crate::curve::QuadraticCurve::new(p0, p1, p2).sample(t),
        Segment::Cubic(p0, p1, p2, p3) => crate::curve::CubicCurve::new(p0, p1, p2, p3).sample(t),
    }
}

/// Forward iterator over `Path` segments (§4.1).
pub struct Iter<'a> {
    path: &'a Path,
    command_index: usize,
    point_index: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.command_index >= self.path.commands.len() {
            return None;
        }

        let command = self.path.commands.get(self.command_index);
        let p0 = self.path.points[self.point_index - 1];

        let segment = match command {
            Command::Line => Segment::Line(p0, self.path.points[self.point_index]),
            Command::Quadratic => Segment::Quadratic(
                p0,
                self.path.points[self.point_index],
                self.path.points[self.point_index + 1],
            ),
            Command::Cubic => Segment::Cubic(
                p0,
                self.path.points[self.point_index],
                self.path.points[self.point_index + 1],
                self.path.points[self.point_index + 2],
            ),
            Command::Move => unreachable!(),
        };

        self.point_index += command.point_count();
        self.command_index += 1;
        Some(segment)
    }
}

/// Reverse iterator over `Path` segments (§4.1).
pub struct ReverseIter<'a> {
    path: &'a Path,
    command_index: usize,
    point_index: usize,
}

impl<'a> Iterator for ReverseIter<'a> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.command_index <= 1 {
            return None;
        }

        self.command_index -= 1;
        let command = self.path.commands.get(self.command_index);
        self.point_index -= command.point_count();
        let p0 = self.path.points[self.point_index - 1];

        let segment = match command {
            Command::Line => Segment::Line(p0, self.path.points[self.point_index]),
            Command::Quadratic => Segment::Quadratic(
                p0,
                self.path.points[self.point_index],
                self.path.points[self.point_index + 1],
            ),
            Command::Cubic => Segment::Cubic(
                p0,
                self.path.points[self.point_index],
                self.path.points[self.point_index + 1],
                self.path.points[self.point_index + 2],
            ),
            Command::Move => unreachable!(),
        };

        Some(segment.reversed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_coherence() {
        let mut path = Path::new();
        path.move_to(Vector2F::new(0.0, 0.0));
        path.line_to(Vector2F::new(1.0, 0.0), false);
        path.line_to(Vector2F::new(1.0, 1.0), false);
        path.line_to(Vector2F::new(0.0, 1.0), false);
        path.close();

        let expected_points = 1 + 3 + 1; // move + 3 lines + close line
        assert_eq!(path.points().len(), expected_points);
        assert!(path.closed());
        assert_eq!(*path.points().last().unwrap(), path.points()[0]);
    }

    #[test]
    fn close_is_idempotent() {
        let mut path = Path::new();
        path.move_to(Vector2F::new(0.0, 0.0));
        path.line_to(Vector2F::new(1.0, 0.0), false);
        path.close();
        let after_first = path.clone();
        path.close();
        assert_eq!(path, after_first);
    }

    #[test]
    fn translate_zero_delta_is_noop() {
        let mut path = Path::new();
        path.move_to(Vector2F::new(0.0, 0.0));
        path.line_to(Vector2F::new(1.0, 0.0), false);
        let before = path.clone();
        path.translate(0, Vector2F::zero());
        assert_eq!(path, before);
    }

    #[test]
    fn iter_yields_one_segment_per_command() {
        let mut path = Path::new();
        path.move_to(Vector2F::new(0.0, 0.0));
        path.line_to(Vector2F::new(1.0, 0.0), false);
        path.quadratic_to(Vector2F::new(1.0, 1.0), Vector2F::new(2.0, 1.0), false);
        assert_eq!(path.iter().count(), 2);
    }
}
