//! Bounding sphere used for world bounds and culling.

use super::consts::ZERO_TOLERANCE;
use super::{Plane, Point3};
use crate::scene::Transform;
use serde::{Deserialize, Serialize};

/// A bounding sphere defined by center and radius.
///
/// A zero radius marks an empty bound; growing an empty bound adopts the
/// other bound outright.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bound {
    /// Center of the sphere.
    pub center: Point3,
    /// Radius of the sphere.
    pub radius: f32,
}

impl Bound {
    /// Create a new bound.
    #[inline]
    pub const fn new(center: Point3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Bound of a point set: the centroid, with the radius reaching the
    /// farthest point. An empty slice gives an empty bound.
    pub fn compute_from_points(points: &[Point3]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let mut sum = Point3::new(0.0, 0.0, 0.0);
        for p in points {
            sum = sum + *p;
        }
        let center = sum / points.len() as f32;

        let mut max_dist_sq = 0.0_f32;
        for p in points {
            max_dist_sq = max_dist_sq.max(center.distance_to_squared(p));
        }

        Self {
            center,
            radius: max_dist_sq.sqrt(),
        }
    }

    /// Set center and radius.
    #[inline]
    pub fn set(&mut self, center: Point3, radius: f32) -> &mut Self {
        self.center = center;
        self.radius = radius;
        self
    }

    /// Copy from another bound.
    #[inline]
    pub fn copy(&mut self, b: &Bound) -> &mut Self {
        *self = *b;
        self
    }

    /// Check if the bound is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.radius == 0.0
    }

    /// Reset to an empty bound at the origin.
    #[inline]
    pub fn make_empty(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    /// Check if a point lies inside or on the sphere.
    #[inline]
    pub fn contains_point(&self, point: &Point3) -> bool {
        self.center.distance_to_squared(point) <= self.radius * self.radius
    }

    /// Check whether two spheres overlap.
    #[inline]
    pub fn test_intersection(&self, other: &Bound) -> bool {
        let radius_sum = self.radius + other.radius;
        self.center.distance_to_squared(&other.center) <= radius_sum * radius_sum
    }

    /// Side of `plane` the sphere lies on: +1 entirely on the positive side,
    /// -1 entirely on the negative side, 0 when it straddles the plane.
    pub fn which_side(&self, plane: &Plane) -> i32 {
        let distance = plane.distance_to(&self.center);
        if distance <= -self.radius {
            -1
        } else if distance >= self.radius {
            1
        } else {
            0
        }
    }

    /// Bound mapped by `transform`. The radius scales by the transform norm,
    /// so the result stays conservative for non-uniform scales.
    pub fn transform_by(&self, transform: &Transform) -> Self {
        Self {
            center: transform.transform_point(&self.center),
            radius: transform.norm() * self.radius,
        }
    }

    /// Grow to the smallest sphere containing both this bound and `other`.
    pub fn grow_to_contain(&mut self, other: &Bound) {
        if other.radius == 0.0 {
            return;
        }
        if self.radius == 0.0 {
            *self = *other;
            return;
        }

        let center_diff = other.center - self.center;
        let length_sqr = center_diff.length_squared();
        let radius_diff = other.radius - self.radius;

        // One sphere already encloses the other.
        if radius_diff * radius_diff >= length_sqr {
            if radius_diff >= 0.0 {
                *self = *other;
            }
            return;
        }

        let length = length_sqr.sqrt();
        if length > ZERO_TOLERANCE {
            let coeff = (length + radius_diff) / (2.0 * length);
            self.center += center_diff * coeff;
        }
        self.radius = 0.5 * (length + self.radius + other.radius);
    }

    /// Check if approximately equal.
    #[inline]
    pub fn approx_eq(&self, other: &Bound, epsilon: f32) -> bool {
        self.center.approx_eq(&other.center, epsilon)
            && (self.radius - other.radius).abs() < epsilon
    }
}
