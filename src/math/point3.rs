//! 3D affine point with an explicit homogeneous coordinate.

use super::consts::MAX_REAL;
use super::Vector3;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A position in 3D space.
///
/// `w` is 1 for true points. A projective transform may leave `w != 1`;
/// call [`Point3::homogenize`] before using such a point as a position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Point3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// Homogeneous coordinate.
    pub w: f32,
}

impl Default for Point3 {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Point3 {
    /// The origin (0, 0, 0).
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };
    /// Saturated sentinel returned by division by zero.
    pub const MAX: Self = Self { x: MAX_REAL, y: MAX_REAL, z: MAX_REAL, w: 1.0 };

    /// Create a new point with `w = 1`.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    /// Create from an array.
    #[inline]
    pub const fn from_array(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    /// The xyz components as an array.
    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Homogeneous 4-tuple.
    #[inline]
    pub const fn to_homogeneous(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Displacement of this point from the origin.
    #[inline]
    pub const fn to_vector(self) -> Vector3 {
        Vector3 { x: self.x, y: self.y, z: self.z }
    }

    /// The point reached from the origin by `v`.
    #[inline]
    pub const fn from_vector(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Set the xyz components, resetting `w` to 1.
    #[inline]
    pub fn set(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self.w = 1.0;
        self
    }

    /// Copy from another point.
    #[inline]
    pub fn copy(&mut self, p: &Point3) -> &mut Self {
        *self = *p;
        self
    }

    /// Divide through by `w` so that `w == 1`. A zero `w` leaves the point
    /// untouched and returns false.
    pub fn homogenize(&mut self) -> bool {
        if self.w == 0.0 {
            return false;
        }
        let inv_w = 1.0 / self.w;
        self.x *= inv_w;
        self.y *= inv_w;
        self.z *= inv_w;
        self.w = 1.0;
        true
    }

    /// Dot product of the xyz components with a vector, as used by plane
    /// equations.
    #[inline]
    pub fn dot(&self, v: &Vector3) -> f32 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Distance to another point.
    #[inline]
    pub fn distance_to(&self, other: &Point3) -> f32 {
        (*self - *other).length()
    }

    /// Squared distance to another point.
    #[inline]
    pub fn distance_to_squared(&self, other: &Point3) -> f32 {
        (*self - *other).length_squared()
    }

    /// Linear interpolation to another point.
    #[inline]
    pub fn lerp(&self, other: &Point3, t: f32) -> Self {
        *self + (*other - *self) * t
    }

    /// Check if approximately equal (xyz only).
    #[inline]
    pub fn approx_eq(&self, other: &Point3, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}

impl Add<Vector3> for Point3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Vector3) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
            w: self.w,
        }
    }
}

impl AddAssign<Vector3> for Point3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

/// Affine sum, used when averaging points.
impl Add for Point3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Point3) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Vector3;
    #[inline]
    fn sub(self, rhs: Point3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Sub<Vector3> for Point3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Vector3) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
            w: self.w,
        }
    }
}

impl SubAssign<Vector3> for Point3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Point3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
            w: self.w,
        }
    }
}

/// Division by zero yields the saturated sentinel [`Point3::MAX`].
impl Div<f32> for Point3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        if rhs != 0.0 {
            let inv = 1.0 / rhs;
            Self {
                x: self.x * inv,
                y: self.y * inv,
                z: self.z * inv,
                w: self.w,
            }
        } else {
            Self::MAX
        }
    }
}

impl Neg for Point3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }
}

impl From<[f32; 3]> for Point3 {
    fn from(a: [f32; 3]) -> Self {
        Self::from_array(a)
    }
}

impl From<glam::Vec3> for Point3 {
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Point3> for glam::Vec4 {
    fn from(p: Point3) -> Self {
        glam::Vec4::new(p.x, p.y, p.z, p.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_minus_point_is_vector() {
        let a = Point3::new(4.0, 5.0, 6.0);
        let b = Point3::new(1.0, 1.0, 1.0);
        let d: Vector3 = a - b;
        assert_eq!(d, Vector3::new(3.0, 4.0, 5.0));
        assert_eq!(b + d, a);
    }

    #[test]
    fn test_div_by_zero_saturates() {
        let p = Point3::new(1.0, 2.0, 3.0) / 0.0;
        assert_eq!(p, Point3::MAX);
        assert!(p.x.is_finite());
    }

    #[test]
    fn test_homogenize() {
        let mut p = Point3 { x: 2.0, y: 4.0, z: 6.0, w: 2.0 };
        assert!(p.homogenize());
        assert_eq!(p, Point3::new(1.0, 2.0, 3.0));

        let mut at_infinity = Point3 { x: 1.0, y: 0.0, z: 0.0, w: 0.0 };
        assert!(!at_infinity.homogenize());
        assert_eq!(at_infinity.w, 0.0);
    }

    #[test]
    fn test_vector_offsets_keep_w() {
        let p = Point3::ORIGIN + Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(p.w, 1.0);
        assert_eq!((p - Vector3::UNIT_X), Point3::ORIGIN);
    }
}
