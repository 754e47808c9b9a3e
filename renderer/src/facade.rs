// vgfx/renderer/src/facade.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The renderer façade (§4.9): the entry point a scene hands draw requests to. It owns
//! the current batch, the frame's z-index counter and the paint/texture pool, and turns
//! `draw` calls into `Drawable`s that accumulate until a buffer capacity is hit, at which
//! point it flushes `RenderCommand::DrawFills`/`RenderCommand::DrawTiles`.
//!
//! Grounded on `renderer/src/builder.rs`'s per-frame scene build (batches fills until
//! `MAX_FILLS_PER_BATCH`, then flushes) and `renderer/src/paint.rs`'s `Palette`, which this
//! crate's `paint` module already generalizes into a paint atlas builder.

use hashbrown::HashMap;
use log::debug;

use crate::classifier::{classify, ClassifyRequest};
use crate::drawable::Drawable;
use crate::paint::{Palette, PaintAtlas};
use crate::tile::{BandConfig, FillRecord};
use crate::worker::ScratchAllocator;
use vgfx_color::ColorU;
use vgfx_content::builder::{stroke_path, StrokeStyle};
use vgfx_content::cubic_path::{CubicMultipath, CubicPath};
use vgfx_content::fill::FillRule;
use vgfx_content::paint::Paint;
use vgfx_content::path::Path;
use vgfx_content::quad_path::QuadraticPath;
use vgfx_geometry::rect::RectF;
use vgfx_geometry::transform2d::Transform2F;
use vgfx_geometry::vector::{Vector2F, Vector2I};
use vgfx_gpu::{BlendState, ClearOps, DepthFunc, DepthState, ProgramKind};

/// §6: the viewport a frame is rendered into.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub size: Vector2I,
    pub dpr: f32,
    pub position: Vector2F,
    pub zoom: f32,
    pub background: ColorU,
}

impl Default for Viewport {
    fn default() -> Viewport {
        Viewport {
            size: Vector2I::new(0, 0),
            dpr: 1.0,
            position: Vector2F::zero(),
            zoom: 1.0,
            background: ColorU::transparent_black(),
        }
    }
}

/// §4.9: "capped by buffer capacities (vertex, index, curve-texture, band-index)" — one
/// limit per GPU buffer a batch writes into.
#[derive(Clone, Copy, Debug)]
pub struct BatchCapacity {
    pub max_tiles: usize,
    pub max_fills: usize,
    pub max_curves: usize,
    pub max_band_indices: usize,
}

impl Default for BatchCapacity {
    fn default() -> BatchCapacity {
        BatchCapacity {
            max_tiles: 1 << 16,
            max_fills: 1 << 16,
            max_curves: 1 << 15,
            max_band_indices: 1 << 18,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FillOptions {
    pub paint: Paint,
    pub rule: FillRule,
}

#[derive(Clone, Debug)]
pub struct StrokeOptions {
    pub paint: Paint,
    pub style: StrokeStyle,
}

/// One `draw` call's worth of input (§6: "Paths, transforms, fills ..., strokes ...,
/// outline flags").
pub struct DrawRequest<'a> {
    pub path: &'a Path,
    pub transform: Transform2F,
    pub fill: Option<FillOptions>,
    pub stroke: Option<StrokeOptions>,
    /// Draws the raw path contour as a hairline, independent of `fill`/`stroke` — used by
    /// editing tools to show control-point geometry. A request that is outline-only is
    /// never cache-eligible (§4.9).
    pub outline: bool,
}

struct BatchedDrawable {
    drawable: Drawable,
    z_index: u32,
}

struct CacheEntry {
    transform: Transform2F,
    drawables: Vec<Drawable>,
}

/// One quad appended by the overlay primitives (§4.9), flushed in its own pass after the
/// main tile/fill batch.
#[derive(Clone, Copy, Debug)]
pub struct OverlayInstance {
    pub rect: RectF,
    pub color: ColorU,
    pub radius: f32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OverlayKind {
    Rect,
    Square,
    Circle,
}

/// The exchange format §6 describes: what the façade hands a GPU backend, not the backend
/// API itself. Grounded on `pathfinder_renderer::gpu_data::RenderCommand`'s command
/// sequence (`Start` / `UploadTexelData` / `DrawTiles` / `Finish`), trimmed to this core's
/// single atlas and single tile program. Blend/depth states follow §6 literally: opaque
/// fills get depth writes and no blending, tiles get src-over blending and no depth write.
pub enum RenderCommand {
    /// Emitted once by `begin_frame`: clears the background and announces the viewport.
    Start { clear_ops: ClearOps, viewport: Viewport },
    /// One atlas upload, emitted whenever the palette produces new paint texture data.
    UploadPaintAtlas(PaintAtlas),
    /// A flushed batch of opaque fill spans: depth writes on, blending disabled (§6).
    DrawFills { program: ProgramKind, depth: DepthState, entries: Vec<(Transform2F, u32, FillRecord)> },
    /// A flushed batch of per-pixel tile quads: premultiplied src-over, no depth write
    /// (§6). Each entry keeps its Drawable whole since tile attrs index its own
    /// `curves`/`band_indices` arrays.
    DrawTiles { program: ProgramKind, blend: BlendState, entries: Vec<(Transform2F, u32, Drawable)> },
    /// A flushed pass of UI overlay instances (ui_rect/ui_square/ui_circle), drawn after
    /// the main tile/fill pass (§4.9).
    DrawOverlay { kind: OverlayKind, program: ProgramKind, instances: Vec<OverlayInstance> },
    /// Emitted once by `end_frame`.
    Finish,
}

/// The renderer façade (§4.9). Owns the current batch, the z-index counter, the paint
/// palette and the Drawable cache; produces `RenderCommand`s a GPU backend consumes.
pub struct Renderer {
    viewport: Viewport,
    capacity: BatchCapacity,
    band_config: BandConfig,

    z_counter: u32,
    batch: Vec<BatchedDrawable>,
    batch_tiles: usize,
    batch_fills: usize,
    batch_curves: usize,
    batch_band_indices: usize,

    palette: Palette,
    cache: HashMap<u64, CacheEntry>,

    overlay_rects: Vec<OverlayInstance>,
    overlay_squares: Vec<OverlayInstance>,
    overlay_circles: Vec<OverlayInstance>,

    commands: Vec<RenderCommand>,
}

impl Renderer {
    pub fn new(capacity: BatchCapacity) -> Renderer {
        Renderer {
            viewport: Viewport::default(),
            capacity,
            band_config: BandConfig::default(),
            z_counter: 0,
            batch: Vec::new(),
            batch_tiles: 0,
            batch_fills: 0,
            batch_curves: 0,
            batch_band_indices: 0,
            palette: Palette::new(),
            cache: HashMap::new(),
            overlay_rects: Vec::new(),
            overlay_squares: Vec::new(),
            overlay_circles: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// §4.9 `begin_frame`: resets the z counter and batch, uploads the background clear.
    pub fn begin_frame(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.z_counter = 0;
        self.batch.clear();
        self.batch_tiles = 0;
        self.batch_fills = 0;
        self.batch_curves = 0;
        self.batch_band_indices = 0;
        self.overlay_rects.clear();
        self.overlay_squares.clear();
        self.overlay_circles.clear();
        self.commands.clear();
        let clear_ops = ClearOps { color: Some(viewport.background.to_f32()), depth: Some(1.0), stencil: None };
        self.commands.push(RenderCommand::Start { clear_ops, viewport });
    }

    /// §4.9 `draw`: assembles the Drawable(s) for `request`, replaying a cached build when
    /// `id` names a hit and the request isn't outline-only. Flushes first if appending
    /// would overrun any buffer capacity.
    pub fn draw(&mut self, id: Option<u64>, request: &DrawRequest) {
        let cache_eligible = request.fill.is_some() || request.stroke.is_some();

        if cache_eligible {
            if let Some(id) = id {
                if let Some(entry) = self.cache.get(&id) {
                    if entry.transform == request.transform {
                        debug!("draw: cache hit for id {}", id);
                        let drawables = entry.drawables.clone();
                        self.push_drawables(drawables);
                        return;
                    }
                }
            }
        }

        let transformed = request.path.transformed(request.transform);
        let mut built = Vec::with_capacity(2);

        if let Some(fill) = &request.fill {
            built.push(self.build_fill_drawable(&transformed, fill));
        }
        if let Some(stroke) = &request.stroke {
            built.push(self.build_stroke_drawable(&transformed, stroke));
        }
        if request.outline && request.fill.is_none() && request.stroke.is_none() {
            let hairline = StrokeOptions {
                paint: Paint::black(),
                style: StrokeStyle { width: 1.0 / self.viewport.zoom.max(1e-6), ..StrokeStyle::default() },
            };
            built.push(self.build_stroke_drawable(&transformed, &hairline));
        }

        if cache_eligible {
            if let Some(id) = id {
                self.cache.insert(
                    id,
                    CacheEntry { transform: request.transform, drawables: built.clone() },
                );
            }
        }

        self.push_drawables(built);
    }

    fn build_fill_drawable(&mut self, path: &Path, fill: &FillOptions) -> Drawable {
        let bounds = path_bounding_rect(path);
        let multipath = path_to_cubic_multipath(path);
        let paint_id = self.palette.push_paint(&fill.paint);
        let request = ClassifyRequest {
            bounds,
            viewport_zoom: self.viewport.zoom,
            fill_rule: fill.rule,
            color: solid_color_or_white(&fill.paint),
            paint_kind: paint_kind_of(&fill.paint),
            paint_id: paint_id.0,
            paint_index: 0,
            band_config: self.band_config,
        };
        let mut scratch = ScratchAllocator::new();
        classify(&multipath, &request, &mut scratch)
    }

    fn build_stroke_drawable(&mut self, path: &Path, stroke: &StrokeOptions) -> Drawable {
        let outline = stroke_path(path, &stroke.style, 0.1);
        let multipath = stroke_outline_to_cubic_multipath(&outline.outer, &outline.inner);
        let paint_id = self.palette.push_paint(&stroke.paint);
        let request = ClassifyRequest {
            bounds: outline.bounding_rect,
            viewport_zoom: self.viewport.zoom,
            fill_rule: FillRule::Winding,
            color: solid_color_or_white(&stroke.paint),
            paint_kind: paint_kind_of(&stroke.paint),
            paint_id: paint_id.0,
            paint_index: 0,
            band_config: self.band_config,
        };
        let mut scratch = ScratchAllocator::new();
        classify(&multipath, &request, &mut scratch)
    }

    fn push_drawables(&mut self, drawables: Vec<Drawable>) {
        for drawable in drawables {
            if drawable.is_empty() {
                continue;
            }
            let would_overflow = self.batch_tiles + drawable.tiles.len() > self.capacity.max_tiles
                || self.batch_fills + drawable.fills.len() > self.capacity.max_fills
                || self.batch_curves + drawable.curve_count() > self.capacity.max_curves
                || self.batch_band_indices + drawable.band_indices.len()
                    > self.capacity.max_band_indices;
            if would_overflow && !self.batch.is_empty() {
                self.flush();
            }
            self.batch_tiles += drawable.tiles.len();
            self.batch_fills += drawable.fills.len();
            self.batch_curves += drawable.curve_count();
            self.batch_band_indices += drawable.band_indices.len();
            let z_index = self.z_counter;
            self.z_counter += drawable.paints.len().max(1) as u32;
            self.batch.push(BatchedDrawable { drawable, z_index });
        }
    }

    /// Flushes the current batch as separate fill/tile `RenderCommand`s, per §4.9: "when
    /// the combined current batch would exceed any buffer capacity, emits a flush", and
    /// per §6: opaque fills and per-pixel tiles use distinct blend/depth states.
    fn flush(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        debug!("flush: {} drawables, {} tiles, {} fills", self.batch.len(), self.batch_tiles, self.batch_fills);

        let mut fill_entries: Vec<(Transform2F, u32, FillRecord)> = Vec::with_capacity(self.batch_fills);
        let mut tile_entries = Vec::with_capacity(self.batch.len());
        for entry in self.batch.drain(..) {
            for &fill in &entry.drawable.fills {
                fill_entries.push((Transform2F::default(), entry.z_index, fill));
            }
            tile_entries.push((Transform2F::default(), entry.z_index, entry.drawable));
        }

        if !fill_entries.is_empty() {
            self.commands.push(RenderCommand::DrawFills {
                program: ProgramKind::Fill,
                depth: DepthState { func: DepthFunc::Less, write: true },
                entries: fill_entries,
            });
        }
        if tile_entries.iter().any(|(_, _, drawable)| !drawable.tiles.is_empty()) {
            self.commands.push(RenderCommand::DrawTiles {
                program: ProgramKind::Tile,
                blend: BlendState::src_over(),
                entries: tile_entries,
            });
        }

        self.batch_tiles = 0;
        self.batch_fills = 0;
        self.batch_curves = 0;
        self.batch_band_indices = 0;
    }

    pub fn ui_rect(&mut self, rect: RectF, color: ColorU) {
        self.overlay_rects.push(OverlayInstance { rect, color, radius: 0.0 });
    }

    pub fn ui_square(&mut self, center: Vector2F, half_size: f32, color: ColorU) {
        let rect = RectF::new(center - Vector2F::splat(half_size), Vector2F::splat(half_size * 2.0));
        self.overlay_squares.push(OverlayInstance { rect, color, radius: 0.0 });
    }

    pub fn ui_circle(&mut self, center: Vector2F, radius: f32, color: ColorU) {
        let rect = RectF::new(center - Vector2F::splat(radius), Vector2F::splat(radius * 2.0));
        self.overlay_circles.push(OverlayInstance { rect, color, radius });
    }

    /// §4.9 `end_frame`: final flush, then the overlay passes, in that order.
    pub fn end_frame(&mut self) -> Vec<RenderCommand> {
        self.flush();
        if !self.overlay_rects.is_empty() {
            self.commands.push(RenderCommand::DrawOverlay {
                kind: OverlayKind::Rect,
                program: ProgramKind::Rect,
                instances: std::mem::take(&mut self.overlay_rects),
            });
        }
        if !self.overlay_squares.is_empty() {
            self.commands.push(RenderCommand::DrawOverlay {
                kind: OverlayKind::Square,
                program: ProgramKind::Rect,
                instances: std::mem::take(&mut self.overlay_squares),
            });
        }
        if !self.overlay_circles.is_empty() {
            self.commands.push(RenderCommand::DrawOverlay {
                kind: OverlayKind::Circle,
                program: ProgramKind::Circle,
                instances: std::mem::take(&mut self.overlay_circles),
            });
        }
        self.commands.push(RenderCommand::Finish);
        std::mem::take(&mut self.commands)
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn invalidate_cache(&mut self, id: u64) {
        self.cache.remove(&id);
    }
}

fn paint_kind_of(paint: &Paint) -> u8 {
    match paint {
        Paint::Color(_) => 0,
        Paint::Gradient(_) => 1,
        Paint::Pattern(_) => 2,
    }
}

fn solid_color_or_white(paint: &Paint) -> ColorU {
    match paint {
        Paint::Color(color) => *color,
        _ => ColorU::white(),
    }
}

fn path_bounding_rect(path: &Path) -> RectF {
    path.iter().fold(RectF::empty(), |acc, segment| {
        let (p0, p1, p2, p3) = segment.to_cubic();
        acc.union(RectF::from_vectors(&[p0, p1, p2, p3]))
    })
}

/// Elevates every segment of `path` to a cubic and writes it into one `CubicMultipath`
/// sub-contour, the form the classifier (§4.8) consumes.
fn path_to_cubic_multipath(path: &Path) -> CubicMultipath {
    let mut cubic = CubicPath::new();
    let mut first = true;
    for segment in path.iter() {
        let (p0, p1, p2, p3) = segment.to_cubic();
        if first {
            cubic.move_to(p0);
            first = false;
        }
        cubic.push_curve(p1, p2, p3);
    }
    let mut multi = CubicMultipath::new();
    if !cubic.is_empty() {
        multi.push_subpath(&cubic);
    }
    multi
}

/// Degree-elevates a quadratic curve's control point into the two cubic controls that
/// reproduce the same curve exactly: `c1 = p0 + 2/3*(p1-p0)`, `c2 = p2 + 2/3*(p1-p2)`.
fn quadratic_path_to_cubic(path: &QuadraticPath) -> CubicPath {
    let mut cubic = CubicPath::new();
    if path.is_empty() {
        return cubic;
    }
    cubic.move_to(path.points()[0]);
    for curve in path.curves() {
        let c1 = curve.p0 + (curve.p1 - curve.p0).scale(2.0 / 3.0);
        let c2 = curve.p2 + (curve.p1 - curve.p2).scale(2.0 / 3.0);
        cubic.push_curve(c1, c2, curve.p2);
    }
    cubic
}

fn stroke_outline_to_cubic_multipath(outer: &QuadraticPath, inner: &QuadraticPath) -> CubicMultipath {
    let mut multi = CubicMultipath::new();
    let outer_cubic = quadratic_path_to_cubic(outer);
    if !outer_cubic.is_empty() {
        multi.push_subpath(&outer_cubic);
    }
    let inner_cubic = quadratic_path_to_cubic(inner);
    if !inner_cubic.is_empty() {
        multi.push_subpath(&inner_cubic);
    }
    multi
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgfx_color::ColorU;

    fn unit_square_path() -> Path {
        let mut path = Path::new();
        path.move_to(Vector2F::new(0.0, 0.0));
        path.line_to(Vector2F::new(10.0, 0.0), false);
        path.line_to(Vector2F::new(10.0, 10.0), false);
        path.line_to(Vector2F::new(0.0, 10.0), false);
        path.close();
        path
    }

    #[test]
    fn begin_frame_resets_z_counter_and_batch() {
        let mut renderer = Renderer::new(BatchCapacity::default());
        let path = unit_square_path();
        renderer.begin_frame(Viewport { zoom: 1.0, ..Viewport::default() });
        renderer.draw(
            None,
            &DrawRequest {
                path: &path,
                transform: Transform2F::default(),
                fill: Some(FillOptions { paint: Paint::black(), rule: FillRule::Winding }),
                stroke: None,
                outline: false,
            },
        );
        assert_eq!(renderer.z_counter, 1);
        renderer.begin_frame(Viewport { zoom: 1.0, ..Viewport::default() });
        assert_eq!(renderer.z_counter, 0);
        assert!(renderer.batch.is_empty());
    }

    #[test]
    fn cached_draw_replays_without_rebuilding_on_matching_transform() {
        let mut renderer = Renderer::new(BatchCapacity::default());
        let path = unit_square_path();
        let request = DrawRequest {
            path: &path,
            transform: Transform2F::default(),
            fill: Some(FillOptions { paint: Paint::Color(ColorU::white()), rule: FillRule::Winding }),
            stroke: None,
            outline: false,
        };

        renderer.begin_frame(Viewport { zoom: 1.0, ..Viewport::default() });
        renderer.draw(Some(42), &request);
        assert_eq!(renderer.cache.len(), 1);

        renderer.begin_frame(Viewport { zoom: 1.0, ..Viewport::default() });
        renderer.draw(Some(42), &request);
        let commands = renderer.end_frame();
        assert!(commands.iter().any(|c| matches!(
            c,
            RenderCommand::DrawFills { entries, .. } if !entries.is_empty()
        ) || matches!(
            c,
            RenderCommand::DrawTiles { entries, .. } if !entries.is_empty()
        )));
    }

    #[test]
    fn end_frame_emits_overlay_pass_after_main_batch() {
        let mut renderer = Renderer::new(BatchCapacity::default());
        renderer.begin_frame(Viewport { zoom: 1.0, ..Viewport::default() });
        renderer.ui_rect(RectF::new(Vector2F::zero(), Vector2F::splat(4.0)), ColorU::white());
        let commands = renderer.end_frame();
        let overlay_index = commands.iter().position(|c| matches!(c, RenderCommand::DrawOverlay { .. }));
        let finish_index = commands.iter().position(|c| matches!(c, RenderCommand::Finish));
        assert!(overlay_index.is_some() && finish_index.is_some());
        assert!(overlay_index < finish_index);
    }

    #[test]
    fn flush_triggers_when_capacity_exceeded() {
        let mut renderer = Renderer::new(BatchCapacity {
            max_tiles: 1,
            max_fills: 1,
            max_curves: 1000,
            max_band_indices: 1000,
        });
        let path = unit_square_path();
        renderer.begin_frame(Viewport { zoom: 100.0, ..Viewport::default() });
        for i in 0..3 {
            renderer.draw(
                Some(i),
                &DrawRequest {
                    path: &path,
                    transform: Transform2F::from_translation(Vector2F::new(i as f32 * 20.0, 0.0)),
                    fill: Some(FillOptions { paint: Paint::black(), rule: FillRule::Winding }),
                    stroke: None,
                    outline: false,
                },
            );
        }
        let commands = renderer.end_frame();
        let batch_count = commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawFills { .. } | RenderCommand::DrawTiles { .. }))
            .count();
        assert!(batch_count >= 2, "expected capacity overflow to force multiple flushes");
    }
}
