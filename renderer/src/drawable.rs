// vgfx/renderer/src/drawable.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `Drawable` (§3): the assembled GPU payload for one drawn path, produced by the
//! tile/band classifier and replayed from the façade's cache on unchanged redraws.

use crate::tile::{FillRecord, TileRecord};
use vgfx_geometry::rect::RectF;
use vgfx_geometry::vector::Vector2F;

/// Associates a contiguous range of `tiles`/`fills` with the paint that colors it (§3).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PaintRange {
    pub tiles_end: u32,
    pub fills_end: u32,
    pub paint_kind: u8,
    pub paint_id: u16,
}

/// A per-band `(offset, count)` header into `Drawable::bands` (§3, §4.8 step 4).
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct BandHeader {
    pub offset: u32,
    pub count: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Drawable {
    pub tiles: Vec<TileRecord>,
    pub fills: Vec<FillRecord>,
    /// Four control points per cubic, in path-local UV space, consumed as a texture (§3).
    pub curves: Vec<Vector2F>,
    pub band_indices: Vec<u16>,
    pub band_headers: Vec<BandHeader>,
    pub bounding_rect: RectF,
    pub paints: Vec<PaintRange>,
}

impl Drawable {
    pub fn new() -> Drawable {
        Drawable::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.fills.is_empty()
    }

    #[inline]
    pub fn curve_count(&self) -> usize {
        self.curves.len() / 4
    }
}
