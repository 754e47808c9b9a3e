// vgfx/content/src/fill.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The fill rule (§3): how a winding number is resolved into inside/outside, shared by the
//! path data model's `winding_of` helpers and the tile classifier's per-pixel test.

/// Non-zero winding vs. even-odd, matching `pathfinder_content::fill::FillRule`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
    Winding,
    EvenOdd,
}

impl Default for FillRule {
    #[inline]
    fn default() -> FillRule {
        FillRule::Winding
    }
}

impl FillRule {
    /// Resolves a signed winding number to an inside/outside test (§4.2, §4.8).
    #[inline]
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::Winding => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_odd_treats_double_winding_as_outside() {
        assert!(!FillRule::EvenOdd.is_inside(2));
        assert!(FillRule::EvenOdd.is_inside(1));
    }

    #[test]
    fn winding_treats_any_nonzero_as_inside() {
        assert!(FillRule::Winding.is_inside(-3));
        assert!(!FillRule::Winding.is_inside(0));
    }
}
