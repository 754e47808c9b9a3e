// vgfx/resources/src/lib.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Ingress types for already-decoded external data: glyph contours and image pixels.
//!
//! This crate never parses a font or image file — §6 places that responsibility on an
//! external collaborator. It only describes the shapes the core is willing to consume,
//! and the by-ID fallback behavior §7 requires when a lookup misses.

use vgfx_geometry::vector::Vector2I;

/// A decoded, already-shaped glyph outline: a flat array of quadratic Bézier points,
/// identical in layout to `vgfx_content::path::QuadraticPath`.
///
/// Text shaping itself is out of scope (spec.md §1 Non-goals); only the resulting
/// contour data crosses this boundary.
#[derive(Clone, Debug, Default)]
pub struct GlyphOutline {
    pub points: Vec<Vector2I>,
    pub advance: f32,
}

impl GlyphOutline {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 3
    }
}

/// A decoded image pixel buffer: explicit size and channel count, never a file format.
#[derive(Clone, Debug)]
pub struct ImageBuffer {
    pub size: Vector2I,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl ImageBuffer {
    pub fn new(size: Vector2I, channels: u8, pixels: Vec<u8>) -> ImageBuffer {
        debug_assert_eq!(pixels.len(), (size.x() * size.y()) as usize * channels as usize);
        ImageBuffer { size, channels, pixels }
    }

    /// A 1x1 opaque magenta buffer, returned by a resource pool in place of a missing
    /// texture (§7: "missing texture or font looked up by ID returns a 1x1 fallback").
    pub fn fallback() -> ImageBuffer {
        ImageBuffer { size: Vector2I::new(1, 1), channels: 4, pixels: vec![255, 0, 255, 255] }
    }
}

/// Opaque handle identifying an externally-owned font or image resource.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ResourceId(pub u32);

/// Looks resources up by ID, substituting the §7 fallback on a miss rather than failing.
pub trait ResourcePool {
    fn glyph(&self, id: ResourceId) -> Option<&GlyphOutline>;
    fn image(&self, id: ResourceId) -> Option<&ImageBuffer>;

    fn image_or_fallback(&self, id: ResourceId, fallback: &ImageBuffer) -> ImageBuffer {
        match self.image(id) {
            Some(image) => image.clone(),
            None => {
                log::warn!("resource {:?} missing, substituting fallback", id);
                fallback.clone()
            }
        }
    }
}
