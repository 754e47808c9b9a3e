// vgfx/renderer/src/classifier.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The tile/band classifier (§4.8): turns one filled path into a `Drawable` whose tile
//! records let a fragment shader answer "what is the fill contribution here?" with a
//! small, bounded number of curve evaluations.

use crate::drawable::{BandHeader, Drawable, PaintRange};
use crate::tile::{BandConfig, FillRecord, TileAttrs, TileRecord};
use crate::worker::ScratchAllocator;
use vgfx_color::ColorU;
use vgfx_content::curve::CubicCurve;
use vgfx_content::{CubicMultipath, FillRule};
use vgfx_geometry::rect::RectF;
use vgfx_geometry::vector::Vector2F;

/// Area, in squared device pixels, above which a Drawable degenerates to one whole-bounds
/// tile and per-pixel winding is left to the shader (§4.8 step 5).
const PER_PIXEL_WINDING_THRESHOLD: f32 = 64.0 * 64.0;

const UV_EPSILON: f32 = 1e-5;

#[derive(Clone, Copy, Debug)]
pub struct ClassifyRequest {
    pub bounds: RectF,
    pub viewport_zoom: f32,
    pub fill_rule: FillRule,
    pub color: ColorU,
    pub paint_kind: u8,
    pub paint_id: u16,
    pub paint_index: u8,
    pub band_config: BandConfig,
}

struct CurveUv {
    points: [Vector2F; 4],
    min: Vector2F,
    max: Vector2F,
}

/// Builds the Drawable for one path (§4.8). `path` may be a flattened cubic outline or the
/// raw cubic contour; both are walked the same way since both are `CubicMultipath`s.
pub fn classify(path: &CubicMultipath, request: &ClassifyRequest, scratch: &mut ScratchAllocator) -> Drawable {
    let mut drawable = Drawable::new();
    if request.bounds.is_empty() {
        return drawable;
    }
    drawable.bounding_rect = request.bounds;

    // Step 2: write every cubic into path-local UV space, recording per-curve bounds.
    let size = request.bounds.size();
    let origin = request.bounds.origin();
    let mut curves: Vec<CurveUv> = Vec::new();
    for sub in path.subpaths() {
        let count = if sub.len() < 4 { 0 } else { (sub.len() - 1) / 3 };
        for i in 0..count {
            let base = i * 3;
            let to_uv = |p: Vector2F| Vector2F::new(
                (p.x() - origin.x()) / size.x().max(1e-6),
                (p.y() - origin.y()) / size.y().max(1e-6),
            );
            let p0 = to_uv(sub[base]);
            let p1 = to_uv(sub[base + 1]);
            let p2 = to_uv(sub[base + 2]);
            let p3 = to_uv(sub[base + 3]);
            let min = p0.min(p1).min(p2).min(p3);
            let max = p0.max(p1).max(p2).max(p3);
            drawable.curves.push(p0);
            drawable.curves.push(p1);
            drawable.curves.push(p2);
            drawable.curves.push(p3);
            curves.push(CurveUv { points: [p0, p1, p2, p3], min, max });
        }
    }
    if curves.is_empty() {
        return drawable;
    }

    // Step 1: tile grid / band count.
    let device_width = size.x() * request.viewport_zoom;
    let device_height = size.y() * request.viewport_zoom;
    let bands = request.band_config.band_count_for(device_height);

    // Step 3: sort curve indices by descending max.x.
    scratch.reset();
    let order = &mut scratch.curve_order;
    order.extend(0..curves.len());
    order.sort_by(|&a, &b| curves[b].max.x().partial_cmp(&curves[a].max.x()).unwrap());

    // Step 4: per-band curve index lists.
    for band in 0..bands {
        let y0 = band as f32 / bands as f32;
        let y1 = (band + 1) as f32 / bands as f32;
        let offset = drawable.band_indices.len() as u32;
        for &idx in order.iter() {
            let curve = &curves[idx];
            if curve.min.y() == curve.max.y() {
                continue; // horizontal curves never contribute (§4.8 tie-break)
            }
            if curve.max.y() < y0 || curve.min.y() > y1 {
                continue;
            }
            drawable.band_indices.push(idx as u16);
        }
        drawable.band_headers.push(BandHeader {
            offset,
            count: drawable.band_indices.len() as u32 - offset,
        });
    }

    // Step 5: coverage gate — above threshold, one whole-bounds tile, shader does the rest.
    if device_width * device_height > PER_PIXEL_WINDING_THRESHOLD {
        drawable.tiles.push(TileRecord {
            rect: request.bounds,
            color: request.color,
            tex_coords: uv_corners(),
            attrs: TileAttrs {
                curve_offset: 0,
                paint_kind: request.paint_kind,
                band_offset: 0,
                band_count: bands as u8,
                fill_rule: request.fill_rule,
                skip: false,
                paint_index: request.paint_index,
            },
        });
        drawable.paints.push(PaintRange {
            tiles_end: drawable.tiles.len() as u32,
            fills_end: drawable.fills.len() as u32,
            paint_kind: request.paint_kind,
            paint_id: request.paint_id,
        });
        return drawable;
    }

    // Step 6: per-band span partition into boundary vs. filled/empty.
    for band in 0..bands {
        let y0 = band as f32 / bands as f32;
        let y1 = (band + 1) as f32 / bands as f32;
        let header = drawable.band_headers[band as usize];
        let band_curves: Vec<&CurveUv> = drawable.band_indices
            [header.offset as usize..(header.offset + header.count) as usize]
            .iter()
            .map(|&idx| &curves[idx as usize])
            .collect();

        scratch.x_breaks.clear();
        scratch.x_breaks.push(0.0);
        scratch.x_breaks.push(1.0);
        for curve in &band_curves {
            scratch.x_breaks.push(curve.min.x().max(0.0).min(1.0));
            scratch.x_breaks.push(curve.max.x().max(0.0).min(1.0));
        }
        scratch.x_breaks.sort_by(|a, b| a.partial_cmp(b).unwrap());
        scratch.x_breaks.dedup_by(|a, b| (*a - *b).abs() < UV_EPSILON);

        for pair in scratch.x_breaks.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if hi - lo < UV_EPSILON {
                continue;
            }
            let mid = (lo + hi) * 0.5;

            let straddles = band_curves
                .iter()
                .any(|c| c.min.x() < hi - UV_EPSILON && c.max.x() > lo + UV_EPSILON);

            let span_rect = uv_rect_to_local(lo, hi, y0, y1, origin, size);

            if straddles {
                log::trace!("classify: boundary tile band={} lo={} hi={}", band, lo, hi);
                drawable.tiles.push(TileRecord {
                    rect: span_rect,
                    color: request.color,
                    tex_coords: uv_corners(),
                    attrs: TileAttrs {
                        curve_offset: 0,
                        paint_kind: request.paint_kind,
                        band_offset: band,
                        band_count: 1,
                        fill_rule: request.fill_rule,
                        skip: false,
                        paint_index: request.paint_index,
                    },
                });
                continue;
            }

            let mid_y = (y0 + y1) * 0.5;
            let winding = winding_at(&band_curves, mid, mid_y);
            if request.fill_rule.is_inside(winding) {
                log::trace!("classify: fill span band={} lo={} hi={} winding={}", band, lo, hi, winding);
                drawable.fills.push(FillRecord {
                    rect: span_rect,
                    color: request.color,
                    paint_kind: request.paint_kind,
                    paint_index: request.paint_index,
                });
            }
        }
    }

    drawable.paints.push(PaintRange {
        tiles_end: drawable.tiles.len() as u32,
        fills_end: drawable.fills.len() as u32,
        paint_kind: request.paint_kind,
        paint_id: request.paint_id,
    });
    drawable
}

/// Signed winding at `(x, sample_y)` from the crossings of `curves` with the horizontal
/// row `sample_y`, sorted by x (§4.8 step 6). Tangent curves don't cross (tie-break).
/// `sample_y` is the band's interior midpoint, not its boundary, so an edge that ends
/// exactly on a band's top or bottom row is still counted as crossing that band.
fn winding_at(curves: &[&CurveUv], x: f32, sample_y: f32) -> i32 {
    let mut crossings: Vec<(f32, i32)> = Vec::new();
    for curve in curves {
        let (p0, p3) = (curve.points[0], curve.points[3]);
        if p0.y() == p3.y() {
            continue;
        }
        let (lower, upper, downward) = if p0.y() < p3.y() { (p0.y(), p3.y(), false) } else { (p3.y(), p0.y(), true) };
        if sample_y <= lower || sample_y >= upper {
            continue; // strictly inside only: tangent endpoints don't cross
        }
        let t = (sample_y - p0.y()) / (p3.y() - p0.y());
        let curve_shape =
            CubicCurve::new(curve.points[0], curve.points[1], curve.points[2], curve.points[3]);
        let crossing_x = curve_shape.sample(t.max(0.0).min(1.0)).x();
        crossings.push((crossing_x, if downward { -1 } else { 1 }));
    }
    crossings.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    crossings.iter().filter(|&&(cx, _)| cx < x).map(|&(_, dir)| dir).sum()
}

#[inline]
fn uv_corners() -> [Vector2F; 4] {
    [
        Vector2F::new(0.0, 0.0),
        Vector2F::new(1.0, 0.0),
        Vector2F::new(1.0, 1.0),
        Vector2F::new(0.0, 1.0),
    ]
}

#[inline]
fn uv_rect_to_local(lo: f32, hi: f32, y0: f32, y1: f32, origin: Vector2F, size: Vector2F) -> RectF {
    let min = Vector2F::new(origin.x() + lo * size.x(), origin.y() + y0 * size.y());
    let max = Vector2F::new(origin.x() + hi * size.x(), origin.y() + y1 * size.y());
    RectF::from_points(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgfx_content::CubicPath;

    fn unit_square() -> CubicMultipath {
        let mut outer = CubicPath::new();
        outer.move_to(Vector2F::new(0.0, 0.0));
        outer.push_line(Vector2F::new(0.0, 10.0));
        outer.push_line(Vector2F::new(10.0, 10.0));
        outer.push_line(Vector2F::new(10.0, 0.0));
        outer.push_line(Vector2F::new(0.0, 0.0));
        let mut multi = CubicMultipath::new();
        multi.push_subpath(&outer);
        multi
    }

    #[test]
    fn low_coverage_square_produces_one_filled_span() {
        let path = unit_square();
        let request = ClassifyRequest {
            bounds: RectF::from_points(Vector2F::new(0.0, 0.0), Vector2F::new(10.0, 10.0)),
            viewport_zoom: 1.0,
            fill_rule: FillRule::Winding,
            color: ColorU::black(),
            paint_kind: 0,
            paint_id: 0,
            paint_index: 0,
            band_config: BandConfig::default(),
        };
        let mut scratch = ScratchAllocator::new();
        let drawable = classify(&path, &request, &mut scratch);
        assert!(!drawable.fills.is_empty());
        assert!(drawable.tiles.is_empty());
    }

    #[test]
    fn high_coverage_collapses_to_single_tile() {
        let path = unit_square();
        let request = ClassifyRequest {
            bounds: RectF::from_points(Vector2F::new(0.0, 0.0), Vector2F::new(10.0, 10.0)),
            viewport_zoom: 100.0,
            fill_rule: FillRule::Winding,
            color: ColorU::black(),
            paint_kind: 0,
            paint_id: 0,
            paint_index: 0,
            band_config: BandConfig::default(),
        };
        let mut scratch = ScratchAllocator::new();
        let drawable = classify(&path, &request, &mut scratch);
        assert_eq!(drawable.tiles.len(), 1);
        assert!(drawable.fills.is_empty());
    }

    #[test]
    fn empty_bounds_yields_empty_drawable() {
        let path = unit_square();
        let request = ClassifyRequest {
            bounds: RectF::empty(),
            viewport_zoom: 1.0,
            fill_rule: FillRule::Winding,
            color: ColorU::black(),
            paint_kind: 0,
            paint_id: 0,
            paint_index: 0,
            band_config: BandConfig::default(),
        };
        let mut scratch = ScratchAllocator::new();
        let drawable = classify(&path, &request, &mut scratch);
        assert!(drawable.is_empty());
    }
}
