// vgfx/renderer/src/paint.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Turns the paints a scene references into one shared texture atlas (§4.9): a `Palette`
//! deduplicates paints into `PaintId`s, then `build_paint_info` rasterizes each into a
//! shelf-packed atlas and records the UV transform a tile's fragment shader needs.

use hashbrown::HashMap;
use vgfx_color::ColorU;
use vgfx_content::gradient::GradientGeometry;
use vgfx_content::paint::Paint;
use vgfx_geometry::rect::{RectF, RectI};
use vgfx_geometry::transform2d::{Matrix2x2F, Transform2F};
use pathfinder_simd::default::F32x4;
use vgfx_geometry::vector::Vector2I;
use vgfx_resources::{ImageBuffer, ResourceId, ResourcePool};

const INITIAL_ATLAS_LENGTH: u32 = 1024;
const GRADIENT_TILE_LENGTH: u32 = 256;
const SOLID_COLOR_TILE_LENGTH: u32 = 16;
const MAX_SOLID_COLORS_PER_TILE: u32 = SOLID_COLOR_TILE_LENGTH * SOLID_COLOR_TILE_LENGTH;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PaintId(pub u16);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GradientId(pub u32);

/// Deduplicates paints as they're pushed during scene construction, the way a scene
/// builder pushes `Drawable`s (§4.9): identical paints collapse to one `PaintId`.
#[derive(Clone, Default)]
pub struct Palette {
    paints: Vec<Paint>,
    cache: HashMap<Paint, PaintId>,
}

impl Palette {
    #[inline]
    pub fn new() -> Palette {
        Palette::default()
    }

    pub fn push_paint(&mut self, paint: &Paint) -> PaintId {
        if let Some(&id) = self.cache.get(paint) {
            return id;
        }
        let id = PaintId(self.paints.len() as u16);
        self.cache.insert(paint.clone(), id);
        self.paints.push(paint.clone());
        id
    }

    #[inline]
    pub fn paints(&self) -> &[Paint] {
        &self.paints
    }

    pub fn build_paint_info(&self, view_box_size: Vector2I, resources: &dyn ResourcePool) -> PaintInfo {
        let mut allocator = TextureAllocator::new(INITIAL_ATLAS_LENGTH);
        let mut metadata = Vec::with_capacity(self.paints.len());
        let mut solid_color_tiles = SolidColorTileBuilder::new();

        for paint in &self.paints {
            let location = match paint {
                Paint::Color(_) => solid_color_tiles.allocate(&mut allocator),
                Paint::Gradient(_) => allocator
                    .allocate(Vector2I::splat(GRADIENT_TILE_LENGTH as i32))
                    .expect("paint atlas is out of room for a gradient tile"),
                Paint::Pattern(pattern) => allocator
                    .allocate(pattern.size)
                    .expect("paint atlas is out of room for a pattern image"),
            };
            metadata.push(PaintMetadata { tex_rect: location.rect, tex_transform: Transform2F::default(), is_opaque: paint.is_opaque() });
        }

        let atlas_length = allocator.size();
        let atlas_scale = allocator.scale();
        for (paint, meta) in self.paints.iter().zip(metadata.iter_mut()) {
            meta.tex_transform = match paint {
                Paint::Color(_) => {
                    let origin = rect_to_inset_uv(meta.tex_rect, atlas_length).origin();
                    Transform2F { matrix: Matrix2x2F(F32x4::default()), vector: origin }
                }
                Paint::Gradient(_) => {
                    let origin = rect_to_uv(meta.tex_rect, atlas_length).origin();
                    let scale = GRADIENT_TILE_LENGTH as f32 * atlas_scale;
                    Transform2F::from_translation(origin)
                        * Transform2F::from_scale(vgfx_geometry::vector::Vector2F::splat(scale) / view_box_size.to_f32())
                }
                Paint::Pattern(_) => {
                    let origin = rect_to_uv(meta.tex_rect, atlas_length).origin();
                    Transform2F::from_translation(origin) * Transform2F::from_uniform_scale(atlas_scale)
                }
            };
        }

        let mut texels = vec![ColorU::transparent_black(); atlas_length as usize * atlas_length as usize];
        for (paint, meta) in self.paints.iter().zip(metadata.iter()) {
            match paint {
                Paint::Color(color) => put_pixel(meta.tex_rect.origin(), *color, &mut texels, atlas_length),
                Paint::Gradient(gradient) => {
                    render_gradient(gradient, meta.tex_rect, &meta.tex_transform, &mut texels, atlas_length)
                }
                Paint::Pattern(pattern) => {
                    let fallback = ImageBuffer::fallback();
                    let image = resources.image_or_fallback(pattern.image, &fallback);
                    render_pattern(&image, meta.tex_rect, &mut texels, atlas_length);
                }
            }
        }

        PaintInfo { atlas: PaintAtlas { size: Vector2I::splat(atlas_length as i32), texels }, metadata }
    }
}

pub struct PaintInfo {
    pub atlas: PaintAtlas,
    /// Indexed by `PaintId`.
    pub metadata: Vec<PaintMetadata>,
}

/// The rasterized atlas texture itself, handed to the GPU backend as one upload.
pub struct PaintAtlas {
    pub size: Vector2I,
    pub texels: Vec<ColorU>,
}

#[derive(Clone, Copy, Debug)]
pub struct PaintMetadata {
    pub tex_rect: RectI,
    pub tex_transform: Transform2F,
    pub is_opaque: bool,
}

fn render_gradient(gradient: &vgfx_content::gradient::Gradient, tex_rect: RectI, tex_transform: &Transform2F, texels: &mut [ColorU], atlas_length: u32) {
    match *gradient.geometry() {
        GradientGeometry::Linear(line) => {
            let line = *tex_transform * line;
            for y in 0..(GRADIENT_TILE_LENGTH as i32) {
                for x in 0..(GRADIENT_TILE_LENGTH as i32) {
                    let point = tex_rect.origin() + Vector2I::new(x, y);
                    let vector = point.to_f32().scale(1.0 / atlas_length as f32) - line.from();
                    let t = line.vector().projection_coefficient(vector).max(0.0).min(1.0);
                    put_pixel(point, gradient.sample(t), texels, atlas_length);
                }
            }
        }
        GradientGeometry::Radial { line, start_radius, end_radius } => {
            let tex_transform_inv = tex_transform.inverse();
            let center = line.midpoint();
            for y in 0..(GRADIENT_TILE_LENGTH as i32) {
                for x in 0..(GRADIENT_TILE_LENGTH as i32) {
                    let point = tex_rect.origin() + Vector2I::new(x, y);
                    let vector = tex_transform_inv * point.to_f32().scale(1.0 / atlas_length as f32);
                    let t = ((vector - center).length().max(start_radius).min(end_radius)) / (end_radius - start_radius).max(1e-6);
                    put_pixel(point, gradient.sample(t), texels, atlas_length);
                }
            }
        }
    }
}

fn render_pattern(image: &ImageBuffer, tex_rect: RectI, texels: &mut [ColorU], atlas_length: u32) {
    for y in 0..image.size.y() {
        let dest_origin = tex_rect.origin() + Vector2I::new(0, y);
        let dest_index = paint_texel_index(dest_origin, atlas_length);
        for x in 0..image.size.x() {
            let src_index = (y as usize * image.size.x() as usize + x as usize) * image.channels as usize;
            let color = sample_image_texel(image, src_index);
            texels[dest_index + x as usize] = color;
        }
    }
}

fn sample_image_texel(image: &ImageBuffer, index: usize) -> ColorU {
    match image.channels {
        4 => ColorU::new(image.pixels[index], image.pixels[index + 1], image.pixels[index + 2], image.pixels[index + 3]),
        3 => ColorU::new(image.pixels[index], image.pixels[index + 1], image.pixels[index + 2], 255),
        1 => ColorU::new(image.pixels[index], image.pixels[index], image.pixels[index], 255),
        _ => ColorU::transparent_black(),
    }
}

#[inline]
fn paint_texel_index(position: Vector2I, atlas_length: u32) -> usize {
    position.y() as usize * atlas_length as usize + position.x() as usize
}

#[inline]
fn put_pixel(position: Vector2I, color: ColorU, texels: &mut [ColorU], atlas_length: u32) {
    texels[paint_texel_index(position, atlas_length)] = color;
}

#[inline]
fn rect_to_uv(rect: RectI, atlas_length: u32) -> RectF {
    rect.to_f32().scale(1.0 / atlas_length as f32)
}

#[inline]
fn rect_to_inset_uv(rect: RectI, atlas_length: u32) -> RectF {
    rect_to_uv(rect, atlas_length).contract(vgfx_geometry::vector::Vector2F::splat(0.5 / atlas_length as f32))
}

/// A shelf-packing allocator: rows are filled left to right and a new row opens once the
/// current one can't fit the next request, doubling the atlas when it runs out of rows.
struct TextureAllocator {
    length: u32,
    shelf_y: u32,
    shelf_height: u32,
    cursor_x: u32,
}

#[derive(Clone, Copy)]
struct TextureLocation {
    rect: RectI,
}

impl TextureAllocator {
    fn new(initial_length: u32) -> TextureAllocator {
        TextureAllocator { length: initial_length, shelf_y: 0, shelf_height: 0, cursor_x: 0 }
    }

    fn allocate(&mut self, requested: Vector2I) -> Option<TextureLocation> {
        let (w, h) = (requested.x() as u32, requested.y() as u32);
        if w > self.length || h > self.length {
            return None;
        }
        if self.cursor_x + w > self.length {
            self.shelf_y += self.shelf_height;
            self.cursor_x = 0;
            self.shelf_height = 0;
        }
        if self.shelf_y + h > self.length {
            return None; // atlas exhausted; callers size INITIAL_ATLAS_LENGTH generously
        }
        let origin = Vector2I::new(self.cursor_x as i32, self.shelf_y as i32);
        self.cursor_x += w;
        self.shelf_height = self.shelf_height.max(h);
        Some(TextureLocation { rect: RectI::new(origin, requested) })
    }

    #[inline]
    fn size(&self) -> u32 {
        self.length
    }

    #[inline]
    fn scale(&self) -> f32 {
        1.0 / self.length as f32
    }
}

/// Packs solid colors many-to-a-tile: a single shared atlas for every solid fill,
/// one texel per distinct color, so a solid fill never costs a full tile.
struct SolidColorTileBuilder(Option<SolidColorTileBuilderState>);

struct SolidColorTileBuilderState {
    tile_origin: Vector2I,
    next_index: u32,
}

impl SolidColorTileBuilder {
    fn new() -> SolidColorTileBuilder {
        SolidColorTileBuilder(None)
    }

    fn allocate(&mut self, allocator: &mut TextureAllocator) -> TextureLocation {
        if self.0.is_none() {
            let tile = allocator
                .allocate(Vector2I::splat(SOLID_COLOR_TILE_LENGTH as i32))
                .expect("paint atlas is out of room for a solid-color tile");
            self.0 = Some(SolidColorTileBuilderState { tile_origin: tile.rect.origin(), next_index: 0 });
        }

        let (location, tile_full) = {
            let state = self.0.as_mut().unwrap();
            let sub_origin = Vector2I::new(
                (state.next_index % SOLID_COLOR_TILE_LENGTH) as i32,
                (state.next_index / SOLID_COLOR_TILE_LENGTH) as i32,
            );
            let location = TextureLocation { rect: RectI::new(state.tile_origin + sub_origin, Vector2I::splat(1)) };
            state.next_index += 1;
            (location, state.next_index == MAX_SOLID_COLORS_PER_TILE)
        };

        if tile_full {
            self.0 = None;
        }
        location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgfx_resources::GlyphOutline;

    struct EmptyResources;
    impl ResourcePool for EmptyResources {
        fn glyph(&self, _id: ResourceId) -> Option<&GlyphOutline> {
            None
        }
        fn image(&self, _id: ResourceId) -> Option<&ImageBuffer> {
            None
        }
    }

    #[test]
    fn identical_colors_share_a_paint_id() {
        let mut palette = Palette::new();
        let a = palette.push_paint(&Paint::black());
        let b = palette.push_paint(&Paint::black());
        assert_eq!(a, b);
        assert_eq!(palette.paints().len(), 1);
    }

    #[test]
    fn build_paint_info_emits_one_metadata_per_paint() {
        let mut palette = Palette::new();
        palette.push_paint(&Paint::black());
        palette.push_paint(&Paint::Color(ColorU::white()));
        let info = palette.build_paint_info(Vector2I::new(800, 600), &EmptyResources);
        assert_eq!(info.metadata.len(), 2);
    }
}
