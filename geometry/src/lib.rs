// vgfx/geometry/src/lib.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Basic linear algebra types shared by the path, content and renderer crates.

pub mod line_segment;
pub mod rect;
pub mod transform2d;
pub mod util;
pub mod vector;

#[cfg(test)]
mod tests {
    use super::rect::RectF;
    use super::transform2d::Transform2F;
    use super::vector::{vec2f, Vector2F};

    #[test]
    fn rect_union_and_intersection() {
        let a = RectF::new(vec2f(0.0, 0.0), vec2f(10.0, 10.0));
        let b = RectF::new(vec2f(5.0, 5.0), vec2f(10.0, 10.0));
        let u = a.union(b);
        assert_eq!(u.min_x(), 0.0);
        assert_eq!(u.max_x(), 15.0);
        let i = a.intersection(b).unwrap();
        assert_eq!(i.min_x(), 5.0);
        assert_eq!(i.max_x(), 10.0);
    }

    #[test]
    fn transform_round_trip() {
        let t = Transform2F::from_translation(vec2f(3.0, 4.0)) *
            Transform2F::from_rotation(0.4) *
            Transform2F::from_scale(vec2f(2.0, 0.5));
        let inv = t.inverse();
        let p = vec2f(7.0, -2.0);
        let round_tripped = inv * (t * p);
        assert!((round_tripped - p).length() < 1e-4);
    }

    #[test]
    fn vector_perp_is_orthogonal() {
        let v = Vector2F::new(3.0, 4.0);
        assert!(v.dot(v.perp()).abs() < 1e-6);
    }
}
