//! Quaternion implementation for rotations and their interpolation.

use super::consts::{PI, ZERO_TOLERANCE};
use super::{scalar, Matrix3, Vector3};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, MulAssign, Neg, Sub};

/// A quaternion `w + x*i + y*j + z*k`.
///
/// Unit quaternions represent rotations. Unit length is only restored by an
/// explicit [`Quaternion::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Quaternion {
    /// W component (scalar).
    pub w: f32,
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// Identity quaternion (no rotation).
    pub const IDENTITY: Self = Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };
    /// Zero quaternion.
    pub const ZERO: Self = Self { w: 0.0, x: 0.0, y: 0.0, z: 0.0 };

    /// Create a new quaternion.
    #[inline]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Create from an array `[w, x, y, z]`.
    #[inline]
    pub const fn from_array(a: [f32; 4]) -> Self {
        Self { w: a[0], x: a[1], y: a[2], z: a[3] }
    }

    /// Convert to an array `[w, x, y, z]`.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Set the components.
    #[inline]
    pub fn set(&mut self, w: f32, x: f32, y: f32, z: f32) -> &mut Self {
        self.w = w;
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    /// Create a quaternion from axis-angle representation. The axis must be
    /// unit length.
    pub fn from_axis_angle(axis: &Vector3, angle: f32) -> Self {
        let half_angle = 0.5 * angle;
        let s = half_angle.sin();
        Self {
            w: half_angle.cos(),
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
        }
    }

    /// Axis and angle of the rotation. A quaternion with no vector part
    /// reports the x axis with a zero angle.
    pub fn to_axis_angle(&self) -> (Vector3, f32) {
        let sqr_length = self.x * self.x + self.y * self.y + self.z * self.z;
        if sqr_length > 0.0 {
            let angle = 2.0 * scalar::acos(self.w);
            let inv_length = scalar::inv_sqrt(sqr_length);
            (
                Vector3::new(self.x * inv_length, self.y * inv_length, self.z * inv_length),
                angle,
            )
        } else {
            (Vector3::UNIT_X, 0.0)
        }
    }

    /// Create from a rotation matrix.
    ///
    /// Shoemake's method: the trace branch when positive, otherwise the branch
    /// on the largest diagonal entry with cyclic indices `(i, j, k)`.
    pub fn from_rotation_matrix(rot: &Matrix3) -> Self {
        const NEXT: [usize; 3] = [1, 2, 0];

        let trace = rot.get(0, 0) + rot.get(1, 1) + rot.get(2, 2);

        if trace > 0.0 {
            let root = (trace + 1.0).sqrt();
            let w = 0.5 * root;
            let root = 0.5 / root;
            Self {
                w,
                x: (rot.get(2, 1) - rot.get(1, 2)) * root,
                y: (rot.get(0, 2) - rot.get(2, 0)) * root,
                z: (rot.get(1, 0) - rot.get(0, 1)) * root,
            }
        } else {
            let mut i = 0;
            if rot.get(1, 1) > rot.get(0, 0) {
                i = 1;
            }
            if rot.get(2, 2) > rot.get(i, i) {
                i = 2;
            }
            let j = NEXT[i];
            let k = NEXT[j];

            let root = (rot.get(i, i) - rot.get(j, j) - rot.get(k, k) + 1.0).sqrt();
            let mut v = [0.0_f32; 3];
            v[i] = 0.5 * root;
            let root = 0.5 / root;
            v[j] = (rot.get(j, i) + rot.get(i, j)) * root;
            v[k] = (rot.get(k, i) + rot.get(i, k)) * root;

            Self {
                w: (rot.get(k, j) - rot.get(j, k)) * root,
                x: v[0],
                y: v[1],
                z: v[2],
            }
        }
    }

    /// Rotation matrix of a unit quaternion.
    pub fn to_rotation_matrix(&self) -> Matrix3 {
        let two_x = 2.0 * self.x;
        let two_y = 2.0 * self.y;
        let two_z = 2.0 * self.z;
        let two_wx = two_x * self.w;
        let two_wy = two_y * self.w;
        let two_wz = two_z * self.w;
        let two_xx = two_x * self.x;
        let two_xy = two_y * self.x;
        let two_xz = two_z * self.x;
        let two_yy = two_y * self.y;
        let two_yz = two_z * self.y;
        let two_zz = two_z * self.z;

        Matrix3::new(
            1.0 - (two_yy + two_zz), two_xy - two_wz, two_xz + two_wy,
            two_xy + two_wz, 1.0 - (two_xx + two_zz), two_yz - two_wx,
            two_xz - two_wy, two_yz + two_wx, 1.0 - (two_xx + two_yy),
        )
    }

    /// Get the length of the quaternion.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Get the squared length.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Normalize in place and return the previous length. A length at or
    /// below [`ZERO_TOLERANCE`] zeroes the quaternion.
    pub fn normalize(&mut self) -> f32 {
        let length = self.length();
        if length > ZERO_TOLERANCE {
            let inv_length = 1.0 / length;
            self.w *= inv_length;
            self.x *= inv_length;
            self.y *= inv_length;
            self.z *= inv_length;
        } else {
            *self = Self::ZERO;
        }
        length
    }

    /// Return a normalized copy.
    #[inline]
    pub fn normalized(&self) -> Self {
        let mut q = *self;
        q.normalize();
        q
    }

    /// Conjugate (inverse for unit quaternions).
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Multiplicative inverse. The zero quaternion has none and yields zero.
    pub fn inverse(&self) -> Self {
        let norm = self.length_squared();
        if norm > 0.0 {
            let inv_norm = 1.0 / norm;
            Self {
                w: self.w * inv_norm,
                x: -self.x * inv_norm,
                y: -self.y * inv_norm,
                z: -self.z * inv_norm,
            }
        } else {
            Self::ZERO
        }
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, other: &Quaternion) -> f32 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Multiply by another quaternion (Hamilton product, not commutative).
    pub fn multiply(&self, other: &Quaternion) -> Self {
        Self {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y + self.y * other.w + self.z * other.x - self.x * other.z,
            z: self.w * other.z + self.z * other.w + self.x * other.y - self.y * other.x,
        }
    }

    /// Exponential of a quaternion with zero scalar part `(0, A*v)`, `v` unit.
    pub fn exp(&self) -> Self {
        let angle = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        let sn = angle.sin();

        let coeff = if sn.abs() >= ZERO_TOLERANCE { sn / angle } else { 1.0 };

        Self {
            w: angle.cos(),
            x: coeff * self.x,
            y: coeff * self.y,
            z: coeff * self.z,
        }
    }

    /// Logarithm of a unit quaternion `(cos A, sin A * v)`, giving `(0, A*v)`.
    pub fn log(&self) -> Self {
        let mut coeff = 1.0;
        if self.w.abs() < 1.0 {
            let angle = self.w.acos();
            let sn = angle.sin();
            if sn.abs() >= ZERO_TOLERANCE {
                coeff = angle / sn;
            }
        }

        Self {
            w: 0.0,
            x: coeff * self.x,
            y: coeff * self.y,
            z: coeff * self.z,
        }
    }

    /// Rotate a vector by this (unit) quaternion.
    pub fn rotate(&self, v: &Vector3) -> Vector3 {
        self.to_rotation_matrix().transform(v)
    }

    /// Spherical linear interpolation from `p` (at `t = 0`) to `q` (at
    /// `t = 1`). Endpoints are returned exactly. No shortest-path flip is
    /// applied; nearly identical inputs return `p`.
    pub fn slerp(t: f32, p: &Quaternion, q: &Quaternion) -> Self {
        if t == 0.0 {
            return *p;
        }
        if t == 1.0 {
            return *q;
        }

        let cs = p.dot(q);
        let angle = scalar::acos(cs);

        if angle.abs() < ZERO_TOLERANCE {
            return *p;
        }

        let inv_sn = 1.0 / angle.sin();
        let t_angle = t * angle;
        let coeff0 = (angle - t_angle).sin() * inv_sn;
        let coeff1 = t_angle.sin() * inv_sn;

        *p * coeff0 + *q * coeff1
    }

    /// Spherical interpolation that winds `extra_spins` additional half
    /// turns along the arc.
    pub fn slerp_extra_spins(t: f32, p: &Quaternion, q: &Quaternion, extra_spins: i32) -> Self {
        let cs = p.dot(q);
        let angle = scalar::acos(cs);

        if angle.abs() < ZERO_TOLERANCE {
            return *p;
        }

        let phase = PI * extra_spins as f32 * t;
        let inv_sn = 1.0 / angle.sin();
        let coeff0 = ((1.0 - t) * angle - phase).sin() * inv_sn;
        let coeff1 = (t * angle + phase).sin() * inv_sn;

        *p * coeff0 + *q * coeff1
    }

    /// SQUAD control point for `q1` given its neighbours `q0` and `q2`.
    pub fn intermediate(q0: &Quaternion, q1: &Quaternion, q2: &Quaternion) -> Self {
        let q1_inv = q1.conjugate();
        let p0 = q1_inv * *q0;
        let p2 = q1_inv * *q2;
        let arg = (p0.log() + p2.log()) * -0.25;
        *q1 * arg.exp()
    }

    /// Spherical quadrangle interpolation between `q0` and `q1` with control
    /// points `a0` and `a1`.
    pub fn squad(t: f32, q0: &Quaternion, a0: &Quaternion, a1: &Quaternion, q1: &Quaternion) -> Self {
        let slerp_t = 2.0 * t * (1.0 - t);
        let slerp_p = Self::slerp(t, q0, q1);
        let slerp_q = Self::slerp(t, a0, a1);
        Self::slerp(slerp_t, &slerp_p, &slerp_q)
    }

    /// Rotation taking unit vector `v1` to unit vector `v2`.
    pub fn align(v1: &Vector3, v2: &Vector3) -> Self {
        let mut bisector = *v1 + *v2;
        bisector.normalize();

        let cos_half_angle = v1.dot(&bisector);
        if cos_half_angle != 0.0 {
            let cross = v1.cross(&bisector);
            Self::new(cos_half_angle, cross.x, cross.y, cross.z)
        } else if v1.x.abs() >= v1.y.abs() {
            // Opposite vectors: rotate half a turn about any perpendicular.
            let inv_length = scalar::inv_sqrt(v1.x * v1.x + v1.z * v1.z);
            Self::new(0.0, -v1.z * inv_length, 0.0, v1.x * inv_length)
        } else {
            let inv_length = scalar::inv_sqrt(v1.y * v1.y + v1.z * v1.z);
            Self::new(0.0, 0.0, v1.z * inv_length, -v1.y * inv_length)
        }
    }

    /// Check if approximately equal.
    #[inline]
    pub fn approx_eq(&self, other: &Quaternion, epsilon: f32) -> bool {
        (self.w - other.w).abs() < epsilon
            && (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}

impl Add for Quaternion {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.w + rhs.w, self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Quaternion {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.w - rhs.w, self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Quaternion {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.w * rhs, self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Quaternion> for f32 {
    type Output = Quaternion;
    fn mul(self, rhs: Quaternion) -> Quaternion {
        rhs * self
    }
}

impl Mul for Quaternion {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl MulAssign for Quaternion {
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.multiply(&rhs);
    }
}

impl Mul<Vector3> for Quaternion {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        self.rotate(&rhs)
    }
}

impl From<glam::Quat> for Quaternion {
    fn from(q: glam::Quat) -> Self {
        Self::new(q.w, q.x, q.y, q.z)
    }
}

impl From<Quaternion> for glam::Quat {
    fn from(q: Quaternion) -> Self {
        glam::Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::consts::HALF_PI;

    fn same_rotation(a: &Quaternion, b: &Quaternion, epsilon: f32) -> bool {
        a.approx_eq(b, epsilon) || a.approx_eq(&-*b, epsilon)
    }

    fn samples() -> Vec<Quaternion> {
        vec![
            Quaternion::IDENTITY,
            Quaternion::from_axis_angle(&Vector3::UNIT_X, 0.7),
            Quaternion::from_axis_angle(&Vector3::new(1.0, 2.0, -1.0).normalized(), 2.1),
            // Half turns drive the trace negative and exercise each diagonal branch.
            Quaternion::from_axis_angle(&Vector3::UNIT_X, PI),
            Quaternion::from_axis_angle(&Vector3::UNIT_Y, PI),
            Quaternion::from_axis_angle(&Vector3::UNIT_Z, PI),
            Quaternion::from_axis_angle(&Vector3::new(0.2, -0.9, 0.4).normalized(), 3.0),
        ]
    }

    #[test]
    fn test_identity_rotation() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert!(Quaternion::IDENTITY.rotate(&v).approx_eq(&v, 1e-6));
    }

    #[test]
    fn test_rotation_matrix_round_trip() {
        for q in samples() {
            let back = Quaternion::from_rotation_matrix(&q.to_rotation_matrix());
            assert!(same_rotation(&back, &q, 1e-5), "{:?} -> {:?}", q, back);
        }
    }

    #[test]
    fn test_rotation_matrix_matches_axis_angle() {
        let axis = Vector3::new(1.0, 1.0, 0.0).normalized();
        let q = Quaternion::from_axis_angle(&axis, 0.9);
        let expected = Matrix3::from_axis_angle(&axis, 0.9);
        assert!(q.to_rotation_matrix().approx_eq(&expected, 1e-6));
    }

    #[test]
    fn test_rotate_matches_glam() {
        let q = Quaternion::from_axis_angle(&Vector3::new(0.0, 0.6, 0.8), 1.3);
        let v = Vector3::new(-2.0, 0.5, 4.0);
        let expected = glam::Quat::from(q) * glam::Vec3::new(v.x, v.y, v.z);
        assert!(q.rotate(&v).approx_eq(&Vector3::from(expected), 1e-5));
    }

    #[test]
    fn test_axis_angle_round_trip() {
        let axis = Vector3::new(0.0, 0.6, -0.8);
        let (a, angle) = Quaternion::from_axis_angle(&axis, 1.1).to_axis_angle();
        assert!(a.approx_eq(&axis, 1e-6));
        assert!((angle - 1.1).abs() < 1e-5);

        let (a, angle) = Quaternion::IDENTITY.to_axis_angle();
        assert_eq!(a, Vector3::UNIT_X);
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn test_inverse() {
        let q = Quaternion::new(1.0, 2.0, -1.0, 0.5);
        assert!((q * q.inverse()).approx_eq(&Quaternion::IDENTITY, 1e-6));
        assert_eq!(Quaternion::ZERO.inverse(), Quaternion::ZERO);
    }

    #[test]
    fn test_normalize_returns_length() {
        let mut q = Quaternion::new(0.0, 3.0, 0.0, 4.0);
        assert!((q.normalize() - 5.0).abs() < 1e-6);
        assert!((q.length() - 1.0).abs() < 1e-6);

        let mut tiny = Quaternion::new(1e-8, 0.0, 0.0, 0.0);
        tiny.normalize();
        assert_eq!(tiny, Quaternion::ZERO);
    }

    #[test]
    fn test_exp_log() {
        let q = Quaternion::from_axis_angle(&Vector3::UNIT_Z, 1.2);
        let log = q.log();
        assert_eq!(log.w, 0.0);
        assert!((log.z - 0.6).abs() < 1e-5);
        assert!(log.exp().approx_eq(&q, 1e-5));

        // Small angles take the unit-coefficient fallback.
        let tiny = Quaternion::new(0.0, 1e-8, 0.0, 0.0);
        assert!(tiny.exp().approx_eq(&Quaternion::new(1.0, 1e-8, 0.0, 0.0), 1e-7));
    }

    #[test]
    fn test_slerp_endpoints_are_exact() {
        let p = Quaternion::from_axis_angle(&Vector3::UNIT_Y, 0.3);
        let q = Quaternion::from_axis_angle(&Vector3::UNIT_X, 1.7);
        assert_eq!(Quaternion::slerp(0.0, &p, &q), p);
        assert_eq!(Quaternion::slerp(1.0, &p, &q), q);
    }

    #[test]
    fn test_slerp_stays_unit() {
        let p = Quaternion::from_axis_angle(&Vector3::UNIT_Y, 0.3);
        let q = Quaternion::from_axis_angle(&Vector3::new(1.0, 0.0, 1.0).normalized(), 2.5);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let r = Quaternion::slerp(t, &p, &q);
            assert!((r.length() - 1.0).abs() < 1e-5, "t = {t}");
        }
    }

    #[test]
    fn test_slerp_midpoint() {
        let p = Quaternion::IDENTITY;
        let q = Quaternion::from_axis_angle(&Vector3::UNIT_Z, HALF_PI);
        let mid = Quaternion::slerp(0.5, &p, &q);
        let expected = Quaternion::from_axis_angle(&Vector3::UNIT_Z, HALF_PI * 0.5);
        assert!(mid.approx_eq(&expected, 1e-5));
    }

    #[test]
    fn test_slerp_identical_inputs() {
        let p = Quaternion::from_axis_angle(&Vector3::UNIT_X, 0.4);
        assert!(Quaternion::slerp(0.5, &p, &p).approx_eq(&p, 1e-5));
    }

    #[test]
    fn test_slerp_extra_spins_endpoints() {
        let p = Quaternion::IDENTITY;
        let q = Quaternion::from_axis_angle(&Vector3::UNIT_Z, HALF_PI);
        let start = Quaternion::slerp_extra_spins(0.0, &p, &q, 1);
        assert!(start.approx_eq(&p, 1e-5));
        let end = Quaternion::slerp_extra_spins(1.0, &p, &q, 1);
        assert!(same_rotation(&end, &q, 1e-5));
    }

    #[test]
    fn test_squad_endpoints() {
        let q0 = Quaternion::IDENTITY;
        let q1 = Quaternion::from_axis_angle(&Vector3::UNIT_Y, 0.8);
        let q2 = Quaternion::from_axis_angle(&Vector3::UNIT_Y, 1.9);
        let a0 = Quaternion::intermediate(&q0, &q0, &q1);
        let a1 = Quaternion::intermediate(&q0, &q1, &q2);

        assert_eq!(Quaternion::squad(0.0, &q0, &a0, &a1, &q1), q0);
        assert_eq!(Quaternion::squad(1.0, &q0, &a0, &a1, &q1), q1);
    }

    #[test]
    fn test_intermediate_on_single_axis_is_key() {
        // Evenly spaced keys about one axis have no curvature to correct.
        let q0 = Quaternion::from_axis_angle(&Vector3::UNIT_Z, 0.0);
        let q1 = Quaternion::from_axis_angle(&Vector3::UNIT_Z, 0.5);
        let q2 = Quaternion::from_axis_angle(&Vector3::UNIT_Z, 1.0);
        assert!(Quaternion::intermediate(&q0, &q1, &q2).approx_eq(&q1, 1e-5));
    }

    #[test]
    fn test_align() {
        let v1 = Vector3::UNIT_X;
        let v2 = Vector3::new(0.0, 0.6, 0.8);
        let q = Quaternion::align(&v1, &v2);
        assert!(q.rotate(&v1).approx_eq(&v2, 1e-5));

        let opposite = Quaternion::align(&v1, &-v1);
        assert!(opposite.rotate(&v1).approx_eq(&-v1, 1e-5));
    }
}
