// vgfx/content/src/paint.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Paint kinds a fill or stroke can carry: solid color, gradient, or image pattern.
//! `vgfx_renderer::paint` turns these into texture-atlas entries; this crate only describes
//! the paint geometry, not where it lands on the GPU.

use crate::gradient::Gradient;
use crate::util;
use std::hash::{Hash, Hasher};
use vgfx_color::ColorU;
use vgfx_geometry::transform2d::Transform2F;
use vgfx_geometry::vector::Vector2I;
use vgfx_resources::ResourceId;

#[derive(Clone, PartialEq, Debug)]
pub enum Paint {
    Color(ColorU),
    Gradient(Gradient),
    Pattern(Pattern),
}

/// An already-decoded image, referenced by ID (§6: the core never parses image files),
/// repeated across the fill region under `transform`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Pattern {
    pub image: ResourceId,
    pub size: Vector2I,
    pub transform: Transform2F,
}

impl Eq for Paint {}

impl Hash for Paint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Paint::Color(color) => {
                0u8.hash(state);
                color.hash(state);
            }
            Paint::Gradient(gradient) => {
                1u8.hash(state);
                gradient.hash(state);
            }
            Paint::Pattern(pattern) => {
                2u8.hash(state);
                pattern.hash(state);
            }
        }
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.image.hash(state);
        self.size.x().hash(state);
        self.size.y().hash(state);
        util::hash_f32(self.transform.vector.x(), state);
        util::hash_f32(self.transform.vector.y(), state);
        util::hash_f32(self.transform.matrix.m11(), state);
        util::hash_f32(self.transform.matrix.m12(), state);
        util::hash_f32(self.transform.matrix.m21(), state);
        util::hash_f32(self.transform.matrix.m22(), state);
    }
}

impl Paint {
    #[inline]
    pub fn black() -> Paint {
        Paint::Color(ColorU::black())
    }

    #[inline]
    pub fn transparent_black() -> Paint {
        Paint::Color(ColorU::transparent_black())
    }

    pub fn is_opaque(&self) -> bool {
        match self {
            Paint::Color(color) => color.is_opaque(),
            Paint::Gradient(gradient) => gradient.stops().iter().all(|stop| stop.color.is_opaque()),
            Paint::Pattern(_) => false,
        }
    }

    pub fn is_fully_transparent(&self) -> bool {
        match self {
            Paint::Color(color) => color.is_fully_transparent(),
            Paint::Gradient(gradient) => {
                gradient.stops().iter().all(|stop| stop.color.is_fully_transparent())
            }
            Paint::Pattern(_) => false,
        }
    }

    #[inline]
    pub fn is_color(&self) -> bool {
        matches!(self, Paint::Color(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_color_opacity() {
        assert!(Paint::black().is_opaque());
        assert!(Paint::transparent_black().is_fully_transparent());
    }

    #[test]
    fn equal_patterns_hash_equal() {
        use std::collections::hash_map::DefaultHasher;

        let a = Paint::Pattern(Pattern {
            image: ResourceId(1),
            size: Vector2I::new(4, 4),
            transform: Transform2F::default(),
        });
        let b = a.clone();

        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }
}
