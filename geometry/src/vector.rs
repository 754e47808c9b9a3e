// vgfx/geometry/src/vector.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! 2D point/vector types, SIMD-backed.

use pathfinder_simd::default::{F32x2, I32x2};
use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vector2F(pub F32x2);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Vector2I(pub I32x2);

#[inline]
pub fn vec2f(x: f32, y: f32) -> Vector2F {
    Vector2F::new(x, y)
}

#[inline]
pub fn vec2i(x: i32, y: i32) -> Vector2I {
    Vector2I::new(x, y)
}

impl Vector2F {
    #[inline]
    pub fn new(x: f32, y: f32) -> Vector2F {
        Vector2F(F32x2::new(x, y))
    }

    #[inline]
    pub fn splat(x: f32) -> Vector2F {
        Vector2F(F32x2::splat(x))
    }

    #[inline]
    pub fn zero() -> Vector2F {
        Vector2F::splat(0.0)
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.0[0]
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.0[1]
    }

    #[inline]
    pub fn set_x(&mut self, x: f32) {
        self.0[0] = x;
    }

    #[inline]
    pub fn set_y(&mut self, y: f32) {
        self.0[1] = y;
    }

    #[inline]
    pub fn to_f64(self) -> Vector2D {
        Vector2D::new(self.x() as f64, self.y() as f64)
    }

    #[inline]
    pub fn to_i32(self) -> Vector2I {
        Vector2I::new(self.x() as i32, self.y() as i32)
    }

    #[inline]
    pub fn scale(self, factor: f32) -> Vector2F {
        self * Vector2F::splat(factor)
    }

    #[inline]
    pub fn scale_xy(self, factors: Vector2F) -> Vector2F {
        self * factors
    }

    #[inline]
    pub fn min(self, other: Vector2F) -> Vector2F {
        Vector2F::new(self.x().min(other.x()), self.y().min(other.y()))
    }

    #[inline]
    pub fn max(self, other: Vector2F) -> Vector2F {
        Vector2F::new(self.x().max(other.x()), self.y().max(other.y()))
    }

    #[inline]
    pub fn clamp(self, lo: Vector2F, hi: Vector2F) -> Vector2F {
        self.max(lo).min(hi)
    }

    #[inline]
    pub fn lerp(self, other: Vector2F, t: f32) -> Vector2F {
        self + (other - self).scale(t)
    }

    #[inline]
    pub fn dot(self, other: Vector2F) -> f32 {
        self.x() * other.x() + self.y() * other.y()
    }

    /// The z-component of the 3D cross product of `self` and `other` extended into the plane.
    #[inline]
    pub fn cross(self, other: Vector2F) -> f32 {
        self.x() * other.y() - self.y() * other.x()
    }

    #[inline]
    pub fn square_length(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.square_length().sqrt()
    }

    #[inline]
    pub fn normalize(self) -> Vector2F {
        let length = self.length();
        if length <= std::f32::EPSILON {
            Vector2F::zero()
        } else {
            self.scale(1.0 / length)
        }
    }

    /// A vector perpendicular to `self`, rotated 90° counterclockwise.
    #[inline]
    pub fn perp(self) -> Vector2F {
        Vector2F::new(-self.y(), self.x())
    }

    #[inline]
    pub fn yx(self) -> Vector2F {
        Vector2F::new(self.y(), self.x())
    }

    /// Projects `point` onto the (infinite) line through the origin in direction `self`,
    /// returning the parametric coefficient.
    #[inline]
    pub fn projection_coefficient(self, point: Vector2F) -> f32 {
        let square_length = self.square_length();
        if square_length <= std::f32::EPSILON {
            0.0
        } else {
            self.dot(point) / square_length
        }
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        self.x().is_nan() || self.y().is_nan()
    }
}

impl Add<Vector2F> for Vector2F {
    type Output = Vector2F;
    #[inline]
    fn add(self, other: Vector2F) -> Vector2F {
        Vector2F(self.0 + other.0)
    }
}

impl Sub<Vector2F> for Vector2F {
    type Output = Vector2F;
    #[inline]
    fn sub(self, other: Vector2F) -> Vector2F {
        Vector2F(self.0 - other.0)
    }
}

impl Mul<Vector2F> for Vector2F {
    type Output = Vector2F;
    #[inline]
    fn mul(self, other: Vector2F) -> Vector2F {
        Vector2F(self.0 * other.0)
    }
}

impl Div<Vector2F> for Vector2F {
    type Output = Vector2F;
    #[inline]
    fn div(self, other: Vector2F) -> Vector2F {
        Vector2F(self.0 / other.0)
    }
}

impl Neg for Vector2F {
    type Output = Vector2F;
    #[inline]
    fn neg(self) -> Vector2F {
        Vector2F::zero() - self
    }
}

impl Mul<f32> for Vector2F {
    type Output = Vector2F;
    #[inline]
    fn mul(self, scalar: f32) -> Vector2F {
        self.scale(scalar)
    }
}

impl Vector2I {
    #[inline]
    pub fn new(x: i32, y: i32) -> Vector2I {
        Vector2I(I32x2::new(x, y))
    }

    #[inline]
    pub fn splat(x: i32) -> Vector2I {
        Vector2I(I32x2::splat(x))
    }

    #[inline]
    pub fn zero() -> Vector2I {
        Vector2I::splat(0)
    }

    #[inline]
    pub fn x(self) -> i32 {
        self.0[0]
    }

    #[inline]
    pub fn y(self) -> i32 {
        self.0[1]
    }

    #[inline]
    pub fn to_f32(self) -> Vector2F {
        Vector2F::new(self.x() as f32, self.y() as f32)
    }

    #[inline]
    pub fn scale(self, factor: i32) -> Vector2I {
        self * Vector2I::splat(factor)
    }

    #[inline]
    pub fn scale_xy(self, factors: Vector2I) -> Vector2I {
        self * factors
    }

    #[inline]
    pub fn min(self, other: Vector2I) -> Vector2I {
        Vector2I::new(self.x().min(other.x()), self.y().min(other.y()))
    }

    #[inline]
    pub fn max(self, other: Vector2I) -> Vector2I {
        Vector2I::new(self.x().max(other.x()), self.y().max(other.y()))
    }
}

impl Add<Vector2I> for Vector2I {
    type Output = Vector2I;
    #[inline]
    fn add(self, other: Vector2I) -> Vector2I {
        Vector2I(self.0 + other.0)
    }
}

impl Sub<Vector2I> for Vector2I {
    type Output = Vector2I;
    #[inline]
    fn sub(self, other: Vector2I) -> Vector2I {
        Vector2I(self.0 - other.0)
    }
}

impl Mul<Vector2I> for Vector2I {
    type Output = Vector2I;
    #[inline]
    fn mul(self, other: Vector2I) -> Vector2I {
        Vector2I(self.0 * other.0)
    }
}

/// A 64-bit-coordinate point, used for the intermediate algebra mandated by §3: curve
/// storage is `f32`, but root solving and curve evaluation happen in `f64`.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    #[inline]
    pub fn new(x: f64, y: f64) -> Vector2D {
        Vector2D { x, y }
    }

    #[inline]
    pub fn zero() -> Vector2D {
        Vector2D::new(0.0, 0.0)
    }

    #[inline]
    pub fn x(self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(self) -> f64 {
        self.y
    }

    #[inline]
    pub fn to_f32(self) -> Vector2F {
        Vector2F::new(self.x as f32, self.y as f32)
    }

    #[inline]
    pub fn scale(self, factor: f64) -> Vector2D {
        Vector2D::new(self.x * factor, self.y * factor)
    }

    #[inline]
    pub fn dot(self, other: Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn cross(self, other: Vector2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn square_length(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.square_length().sqrt()
    }

    #[inline]
    pub fn normalize(self) -> Vector2D {
        let length = self.length();
        if length <= 1e-300 {
            Vector2D::zero()
        } else {
            self.scale(1.0 / length)
        }
    }

    #[inline]
    pub fn perp(self) -> Vector2D {
        Vector2D::new(-self.y, self.x)
    }

    #[inline]
    pub fn lerp(self, other: Vector2D, t: f64) -> Vector2D {
        self + (other - self).scale(t)
    }

    #[inline]
    pub fn midpoint(self, other: Vector2D) -> Vector2D {
        self.lerp(other, 0.5)
    }
}

impl Add<Vector2D> for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn add(self, other: Vector2D) -> Vector2D {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub<Vector2D> for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn sub(self, other: Vector2D) -> Vector2D {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn mul(self, scalar: f64) -> Vector2D {
        self.scale(scalar)
    }
}

impl Neg for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn neg(self) -> Vector2D {
        Vector2D::new(-self.x, -self.y)
    }
}
