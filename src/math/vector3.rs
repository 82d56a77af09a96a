//! 3D direction vector.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A direction or displacement in 3D space.
///
/// The homogeneous coordinate of a vector is always zero and is not stored;
/// [`Vector3::to_homogeneous`] supplies it when a 4-tuple is needed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Vector3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vector3 {
    /// Zero vector (0, 0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    /// One vector (1, 1, 1).
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };
    /// Unit X vector (1, 0, 0).
    pub const UNIT_X: Self = Self { x: 1.0, y: 0.0, z: 0.0 };
    /// Unit Y vector (0, 1, 0).
    pub const UNIT_Y: Self = Self { x: 0.0, y: 1.0, z: 0.0 };
    /// Unit Z vector (0, 0, 1).
    pub const UNIT_Z: Self = Self { x: 0.0, y: 0.0, z: 1.0 };

    /// Create a new Vector3.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Create a vector with all components set to the same value.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Create from an array.
    #[inline]
    pub const fn from_array(a: [f32; 3]) -> Self {
        Self { x: a[0], y: a[1], z: a[2] }
    }

    /// Convert to an array.
    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Homogeneous 4-tuple with `w = 0`.
    #[inline]
    pub const fn to_homogeneous(self) -> [f32; 4] {
        [self.x, self.y, self.z, 0.0]
    }

    /// Set the components of this vector.
    #[inline]
    pub fn set(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    /// Copy from another vector.
    #[inline]
    pub fn copy(&mut self, v: &Vector3) -> &mut Self {
        self.x = v.x;
        self.y = v.y;
        self.z = v.z;
        self
    }

    /// Get the length (magnitude) of the vector.
    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Get the squared length of the vector.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Normalize in place and return the length before normalization.
    ///
    /// A vector of exactly zero length is left as the zero vector.
    #[inline]
    pub fn normalize(&mut self) -> f32 {
        let len = self.length();
        if len > 0.0 {
            let inv_len = 1.0 / len;
            self.x *= inv_len;
            self.y *= inv_len;
            self.z *= inv_len;
        } else {
            *self = Self::ZERO;
        }
        len
    }

    /// Return a normalized copy of the vector.
    #[inline]
    pub fn normalized(&self) -> Self {
        let mut v = *self;
        v.normalize();
        v
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(&self, other: &Vector3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product with another vector.
    #[inline]
    pub fn cross(&self, other: &Vector3) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Normalized cross product.
    #[inline]
    pub fn unit_cross(&self, other: &Vector3) -> Self {
        self.cross(other).normalized()
    }

    /// Distance to another vector.
    #[inline]
    pub fn distance_to(&self, other: &Vector3) -> f32 {
        (*self - *other).length()
    }

    /// Linear interpolation to another vector.
    #[inline]
    pub fn lerp(&self, other: &Vector3, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Component-wise multiplication.
    #[inline]
    pub fn multiply(&self, other: &Vector3) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    /// Largest absolute component.
    #[inline]
    pub fn max_abs_component(&self) -> f32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    /// Check if approximately equal.
    #[inline]
    pub fn approx_eq(&self, other: &Vector3, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }

    /// Gram-Schmidt orthonormalization of three linearly independent vectors.
    ///
    /// `v0` is normalized, `v1` loses its `v0` component, `v2` loses its `v0`
    /// and `v1` components; each is normalized in turn.
    pub fn orthonormalize(v0: &mut Vector3, v1: &mut Vector3, v2: &mut Vector3) {
        v0.normalize();

        let dot0 = v0.dot(v1);
        *v1 -= *v0 * dot0;
        v1.normalize();

        let dot1 = v1.dot(v2);
        let dot0 = v0.dot(v2);
        *v2 -= *v0 * dot0 + *v1 * dot1;
        v2.normalize();
    }

    /// Build `u` and `v` so that `{u, v, w}` is a right-handed orthonormal
    /// basis. Only `w` is normalized; it must be nonzero.
    ///
    /// The branch on the larger of `|w.x|` and `|w.y|` keeps the divisor away
    /// from zero.
    pub fn generate_complement_basis(u: &mut Vector3, v: &mut Vector3, w: &mut Vector3) {
        w.normalize();

        if w.x.abs() >= w.y.abs() {
            // w.x or w.z is the largest magnitude component.
            let inv_length = 1.0 / (w.x * w.x + w.z * w.z).sqrt();
            u.set(-w.z * inv_length, 0.0, w.x * inv_length);
            v.set(w.y * u.z, w.z * u.x - w.x * u.z, -w.y * u.x);
        } else {
            // w.y or w.z is the largest magnitude component.
            let inv_length = 1.0 / (w.y * w.y + w.z * w.z).sqrt();
            u.set(0.0, w.z * inv_length, -w.y * inv_length);
            v.set(w.y * u.z - w.z * u.y, -w.x * u.z, w.x * u.y);
        }
    }

    /// Right-handed orthonormal basis `(u, v, w)` whose third axis is the
    /// direction of `direction`.
    pub fn generate_orthonormal_basis(direction: &Vector3) -> (Vector3, Vector3, Vector3) {
        let mut u = Vector3::ZERO;
        let mut v = Vector3::ZERO;
        let mut w = *direction;
        Self::generate_complement_basis(&mut u, &mut v, &mut w);
        (u, v, w)
    }
}

impl Add for Vector3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl AddAssign for Vector3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl SubAssign for Vector3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Mul<Vector3> for f32 {
    type Output = Vector3;
    #[inline]
    fn mul(self, rhs: Vector3) -> Vector3 {
        rhs * self
    }
}

impl MulAssign<f32> for Vector3 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

/// Division by zero yields [`Vector3::ZERO`] instead of infinities.
impl Div<f32> for Vector3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        if rhs != 0.0 {
            let inv = 1.0 / rhs;
            Self {
                x: self.x * inv,
                y: self.y * inv,
                z: self.z * inv,
            }
        } else {
            Self::ZERO
        }
    }
}

impl DivAssign<f32> for Vector3 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl Neg for Vector3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(a: [f32; 3]) -> Self {
        Self::from_array(a)
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross() {
        let result = Vector3::UNIT_X.cross(&Vector3::UNIT_Y);
        assert!(result.approx_eq(&Vector3::UNIT_Z, 1e-6));
    }

    #[test]
    fn test_normalize_returns_length() {
        let mut v = Vector3::new(3.0, 0.0, 4.0);
        let len = v.normalize();
        assert!((len - 5.0).abs() < 1e-6);
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero() {
        let mut v = Vector3::new(0.0, 0.0, 0.0);
        assert_eq!(v.normalize(), 0.0);
        assert_eq!(v, Vector3::ZERO);
    }

    #[test]
    fn test_div_by_zero_is_zero_vector() {
        let v = Vector3::new(1.0, -2.0, 3.0) / 0.0;
        assert_eq!(v, Vector3::ZERO);
        assert!(v.x.is_finite() && v.y.is_finite() && v.z.is_finite());

        let mut w = Vector3::ONE;
        w /= 0.0;
        assert_eq!(w, Vector3::ZERO);
    }

    #[test]
    fn test_operators_are_pure() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        let _ = a + b;
        let _ = a.cross(&b);
        let _ = a * 2.0;
        assert_eq!(a, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(b, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(a.dot(&b), 32.0);
    }

    #[test]
    fn test_orthonormalize() {
        let mut v0 = Vector3::new(1.0, 1.0, 0.0);
        let mut v1 = Vector3::new(1.0, 0.0, 1.0);
        let mut v2 = Vector3::new(0.3, 2.0, -1.0);
        Vector3::orthonormalize(&mut v0, &mut v1, &mut v2);

        for v in [v0, v1, v2] {
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
        assert!(v0.dot(&v1).abs() < 1e-5);
        assert!(v0.dot(&v2).abs() < 1e-5);
        assert!(v1.dot(&v2).abs() < 1e-5);
    }

    #[test]
    fn test_complement_basis() {
        for dir in [
            Vector3::new(0.0, 0.0, 2.0),
            Vector3::new(5.0, 1.0, 0.0),
            Vector3::new(0.1, -3.0, 0.2),
        ] {
            let mut u = Vector3::ZERO;
            let mut v = Vector3::ZERO;
            let mut w = dir;
            Vector3::generate_complement_basis(&mut u, &mut v, &mut w);

            assert!((w.length() - 1.0).abs() < 1e-5);
            assert!((u.length() - 1.0).abs() < 1e-5);
            assert!((v.length() - 1.0).abs() < 1e-5);
            assert!(u.dot(&v).abs() < 1e-5);
            assert!(u.dot(&w).abs() < 1e-5);
            assert!(v.dot(&w).abs() < 1e-5);
            // Right-handed: u x v = w.
            assert!(u.cross(&v).approx_eq(&w, 1e-5));
        }
    }

    #[test]
    fn test_orthonormal_basis_keeps_direction() {
        let (u, v, w) = Vector3::generate_orthonormal_basis(&Vector3::new(0.0, 4.0, 0.0));
        assert!(w.approx_eq(&Vector3::UNIT_Y, 1e-6));
        assert!(u.cross(&v).approx_eq(&w, 1e-5));
    }

    #[test]
    fn test_homogeneous_w_is_zero() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(v.to_homogeneous(), [1.0, 2.0, 3.0, 0.0]);
        assert_eq!((v * 3.0).to_homogeneous()[3], 0.0);
    }
}
