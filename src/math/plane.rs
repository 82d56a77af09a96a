//! Plane implementation.

use super::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A plane `dot(normal, X) = constant`.
///
/// As a homogeneous 4-tuple the plane is `(normal, -constant)`, so the signed
/// distance of a point is the tuple dotted with `(x, y, z, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Normal vector of the plane, unit length after [`Plane::normalize`].
    pub normal: Vector3,
    /// Plane constant `c` in `dot(N, X) = c`.
    pub constant: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Self::new(Vector3::UNIT_Z, 0.0)
    }
}

impl Plane {
    /// Create a new plane.
    #[inline]
    pub const fn new(normal: Vector3, constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Create a plane from a normal and a point on the plane.
    #[inline]
    pub fn from_point(normal: Vector3, point: &Point3) -> Self {
        Self {
            normal,
            constant: point.dot(&normal),
        }
    }

    /// Create a plane through three points. The normal is
    /// `unit_cross(p1 - p0, p2 - p0)`.
    pub fn from_points(p0: &Point3, p1: &Point3, p2: &Point3) -> Self {
        let edge1 = *p1 - *p0;
        let edge2 = *p2 - *p0;
        let normal = edge1.unit_cross(&edge2);
        Self::from_point(normal, p0)
    }

    /// Create from the homogeneous tuple `(a, b, c, d)` of `ax + by + cz + d = 0`.
    #[inline]
    pub fn from_tuple(tuple: [f32; 4]) -> Self {
        Self {
            normal: Vector3::new(tuple[0], tuple[1], tuple[2]),
            constant: -tuple[3],
        }
    }

    /// The homogeneous tuple `(N, -c)`.
    #[inline]
    pub fn tuple(&self) -> [f32; 4] {
        [self.normal.x, self.normal.y, self.normal.z, -self.constant]
    }

    /// Scale the plane so the normal has unit length. Returns the length of
    /// the normal before scaling; a zero normal is left untouched.
    pub fn normalize(&mut self) -> f32 {
        let length = self.normal.length();
        if length > 0.0 {
            let inv_len = 1.0 / length;
            self.normal *= inv_len;
            self.constant *= inv_len;
        }
        length
    }

    /// Signed distance from a point to the plane. Positive on the side the
    /// normal points to. Exact only for a normalized plane.
    #[inline]
    pub fn distance_to(&self, point: &Point3) -> f32 {
        point.dot(&self.normal) - self.constant
    }

    /// Which side of the plane a point lies on: +1 positive, -1 negative,
    /// 0 on the plane.
    #[inline]
    pub fn which_side(&self, point: &Point3) -> i32 {
        let distance = self.distance_to(point);
        if distance < 0.0 {
            -1
        } else if distance > 0.0 {
            1
        } else {
            0
        }
    }

    /// Get the projection of a point onto the plane.
    #[inline]
    pub fn project_point(&self, point: &Point3) -> Point3 {
        *point - self.normal * self.distance_to(point)
    }

    /// Check if approximately equal.
    #[inline]
    pub fn approx_eq(&self, other: &Plane, epsilon: f32) -> bool {
        self.normal.approx_eq(&other.normal, epsilon)
            && (self.constant - other.constant).abs() < epsilon
    }
}
