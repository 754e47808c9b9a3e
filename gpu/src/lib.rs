// vgfx/gpu/src/lib.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An abstract GPU device vocabulary, with no concrete backend.
//!
//! §6 places the concrete device (GL/Metal/WebGL/whatever) outside this core: the
//! renderer façade talks to an opaque `Device` implementation through this trait and the
//! render-state/uniform types below, exactly as `pathfinder_renderer` talks to
//! `pathfinder_gpu` without depending on `pathfinder_gl`.

use vgfx_color::ColorF;
use vgfx_geometry::rect::RectI;
use vgfx_geometry::vector::{Vector2I, Vector2F};
use vgfx_resources::ImageBuffer;

bitflags::bitflags! {
    /// How a texture is sampled: repeat vs. clamp on each axis, and filtering.
    pub struct TextureSamplingFlags: u8 {
        const REPEAT_U   = 0x01;
        const REPEAT_V   = 0x02;
        const NEAREST_MIN = 0x04;
        const NEAREST_MAG = 0x08;
    }
}

/// The pixel layout a texture is allocated with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TextureFormat {
    R8,
    RGBA8,
    RGBA16F,
}

/// A handle to a GPU-resident texture, opaque to everything above this crate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TextureId(pub u32);

/// A handle to a compiled shader program, one per `ProgramKind`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ProgramId(pub u32);

/// A handle to a GPU buffer (vertex, index, or generic storage).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BufferId(pub u32);

/// A handle to a framebuffer the device can render into.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FramebufferId(pub u32);

/// The distinct draw programs the renderer façade issues, one shader per tile-batch kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProgramKind {
    Fill,
    Tile,
    Line,
    Rect,
    Circle,
    Image,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
    DestAlpha,
    OneMinusDestAlpha,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BlendState {
    pub src_rgb_factor: BlendFactor,
    pub dest_rgb_factor: BlendFactor,
    pub src_alpha_factor: BlendFactor,
    pub dest_alpha_factor: BlendFactor,
}

impl BlendState {
    pub fn src_over() -> BlendState {
        BlendState {
            src_rgb_factor: BlendFactor::One,
            dest_rgb_factor: BlendFactor::OneMinusSrcAlpha,
            src_alpha_factor: BlendFactor::One,
            dest_alpha_factor: BlendFactor::OneMinusSrcAlpha,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DepthFunc {
    Less,
    Always,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DepthState {
    pub func: DepthFunc,
    pub write: bool,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum StencilFunc {
    Always,
    Equal,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct StencilState {
    pub func: StencilFunc,
    pub reference: u8,
    pub mask: u8,
    pub write: bool,
}

/// A uniform value bound to a program before a draw call.
#[derive(Clone, Debug)]
pub enum UniformData {
    Int(i32),
    Float(f32),
    Vec2(Vector2F),
    IVec2(Vector2I),
    Vec4([f32; 4]),
    Mat2([f32; 4]),
    TextureUnit(u32),
}

/// A named uniform binding, gathered into a `RenderState` before a draw call.
#[derive(Clone, Debug)]
pub struct UniformBinding {
    pub name: &'static str,
    pub data: UniformData,
}

/// A pending clear operation, issued at the start of a frame or a tile batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClearOps {
    pub color: Option<ColorF>,
    pub depth: Option<f32>,
    pub stencil: Option<u8>,
}

/// Everything a single draw call needs: which program, what to bind, how to blend.
#[derive(Clone, Debug)]
pub struct RenderState<'a> {
    pub target_framebuffer: Option<FramebufferId>,
    pub program: ProgramId,
    pub vertex_buffer: BufferId,
    pub textures: &'a [(u32, TextureId, TextureSamplingFlags)],
    pub uniforms: &'a [UniformBinding],
    pub viewport: RectI,
    pub blend: Option<BlendState>,
    pub depth: Option<DepthState>,
    pub stencil: Option<StencilState>,
    pub clear_ops: ClearOps,
}

/// The abstract device the renderer façade draws into. No implementation lives in this
/// core; a concrete GL/Metal/WebGL backend implements this trait outside the workspace
/// (spec.md §1 places the concrete device API out of scope).
pub trait Device {
    fn create_texture(&self, format: TextureFormat, size: Vector2I) -> TextureId;
    fn upload_texture(&self, texture: TextureId, image: &ImageBuffer);
    fn destroy_texture(&self, texture: TextureId);

    fn create_program(&self, kind: ProgramKind) -> ProgramId;
    fn create_buffer(&self) -> BufferId;
    fn upload_to_buffer(&self, buffer: BufferId, data: &[u8]);

    fn draw_arrays(&self, state: &RenderState, count: u32);
    fn draw_elements_instanced(&self, state: &RenderState, index_count: u32, instance_count: u32);

    fn begin_frame(&self);
    fn end_frame(&self);
}
