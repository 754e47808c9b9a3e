// vgfx/renderer/src/lib.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The tile/band classifier, GPU payload types, paint atlas and renderer façade: the
//! layer that turns a frame's worth of draw requests into batched GPU work.

pub mod classifier;
pub mod drawable;
pub mod facade;
pub mod paint;
pub mod tile;
pub mod worker;

pub use crate::classifier::{classify, ClassifyRequest};
pub use crate::drawable::{BandHeader, Drawable, PaintRange};
pub use crate::facade::{
    BatchCapacity, DrawRequest, FillOptions, OverlayKind, Renderer, RenderCommand, StrokeOptions,
    Viewport,
};
pub use crate::paint::{Palette, PaintAtlas, PaintId, PaintInfo, PaintMetadata};
pub use crate::tile::{BandConfig, FillRecord, TileAttrs, TileRecord, TILE_SIZE};
pub use crate::worker::{ScratchAllocator, WorkerPool};
