//! 4x4 Matrix implementation.

use super::{Matrix3, Point3, Vector3};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A 4x4 matrix stored in column-major order.
/// Holds homogeneous affine and projective transformations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Matrix4 {
    /// Matrix elements in column-major order.
    /// [m00, m10, m20, m30, m01, m11, m21, m31, m02, m12, m22, m32, m03, m13, m23, m33]
    pub elements: [f32; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        elements: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Zero matrix.
    pub const ZERO: Self = Self {
        elements: [0.0; 16],
    };

    /// Create a new Matrix4 from elements in row-major order.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m00: f32, m01: f32, m02: f32, m03: f32,
        m10: f32, m11: f32, m12: f32, m13: f32,
        m20: f32, m21: f32, m22: f32, m23: f32,
        m30: f32, m31: f32, m32: f32, m33: f32,
    ) -> Self {
        Self {
            elements: [
                m00, m10, m20, m30,
                m01, m11, m21, m31,
                m02, m12, m22, m32,
                m03, m13, m23, m33,
            ],
        }
    }

    /// Create from column-major array.
    #[inline]
    pub const fn from_cols_array(elements: [f32; 16]) -> Self {
        Self { elements }
    }

    /// Homogeneous matrix with linear block `m` and translation `t`.
    pub fn from_linear_translation(m: &Matrix3, t: &Vector3) -> Self {
        let e = &m.elements;
        Self {
            elements: [
                e[0], e[1], e[2], 0.0,
                e[3], e[4], e[5], 0.0,
                e[6], e[7], e[8], 0.0,
                t.x, t.y, t.z, 1.0,
            ],
        }
    }

    /// Create a translation matrix.
    pub fn from_translation(v: &Vector3) -> Self {
        Self::from_linear_translation(&Matrix3::IDENTITY, v)
    }

    /// Element at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.elements[row + 4 * col]
    }

    /// Set element at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> &mut Self {
        self.elements[row + 4 * col] = value;
        self
    }

    /// Upper-left 3x3 block.
    pub fn linear(&self) -> Matrix3 {
        let e = &self.elements;
        Matrix3::from_cols_array([
            e[0], e[1], e[2],
            e[4], e[5], e[6],
            e[8], e[9], e[10],
        ])
    }

    /// Extract the translation column.
    #[inline]
    pub fn translation(&self) -> Vector3 {
        Vector3 {
            x: self.elements[12],
            y: self.elements[13],
            z: self.elements[14],
        }
    }

    /// Multiply this matrix by another.
    pub fn multiply(&self, other: &Matrix4) -> Self {
        let a = &self.elements;
        let b = &other.elements;

        Self {
            elements: [
                a[0] * b[0] + a[4] * b[1] + a[8] * b[2] + a[12] * b[3],
                a[1] * b[0] + a[5] * b[1] + a[9] * b[2] + a[13] * b[3],
                a[2] * b[0] + a[6] * b[1] + a[10] * b[2] + a[14] * b[3],
                a[3] * b[0] + a[7] * b[1] + a[11] * b[2] + a[15] * b[3],

                a[0] * b[4] + a[4] * b[5] + a[8] * b[6] + a[12] * b[7],
                a[1] * b[4] + a[5] * b[5] + a[9] * b[6] + a[13] * b[7],
                a[2] * b[4] + a[6] * b[5] + a[10] * b[6] + a[14] * b[7],
                a[3] * b[4] + a[7] * b[5] + a[11] * b[6] + a[15] * b[7],

                a[0] * b[8] + a[4] * b[9] + a[8] * b[10] + a[12] * b[11],
                a[1] * b[8] + a[5] * b[9] + a[9] * b[10] + a[13] * b[11],
                a[2] * b[8] + a[6] * b[9] + a[10] * b[10] + a[14] * b[11],
                a[3] * b[8] + a[7] * b[9] + a[11] * b[10] + a[15] * b[11],

                a[0] * b[12] + a[4] * b[13] + a[8] * b[14] + a[12] * b[15],
                a[1] * b[12] + a[5] * b[13] + a[9] * b[14] + a[13] * b[15],
                a[2] * b[12] + a[6] * b[13] + a[10] * b[14] + a[14] * b[15],
                a[3] * b[12] + a[7] * b[13] + a[11] * b[14] + a[15] * b[15],
            ],
        }
    }

    /// `Mᵀ * other`.
    pub fn transpose_times(&self, other: &Matrix4) -> Self {
        self.transposed().multiply(other)
    }

    /// `M * otherᵀ`.
    pub fn times_transpose(&self, other: &Matrix4) -> Self {
        self.multiply(&other.transposed())
    }

    /// Multiply by a scalar.
    pub fn multiply_scalar(&self, s: f32) -> Self {
        let mut m = *self;
        for e in &mut m.elements {
            *e *= s;
        }
        m
    }

    /// Calculate the determinant by cofactor expansion.
    pub fn determinant(&self) -> f32 {
        let e = &self.elements;

        let n11 = e[0]; let n12 = e[4]; let n13 = e[8]; let n14 = e[12];
        let n21 = e[1]; let n22 = e[5]; let n23 = e[9]; let n24 = e[13];
        let n31 = e[2]; let n32 = e[6]; let n33 = e[10]; let n34 = e[14];
        let n41 = e[3]; let n42 = e[7]; let n43 = e[11]; let n44 = e[15];

        n41 * (n14 * n23 * n32 - n13 * n24 * n32 - n14 * n22 * n33 + n12 * n24 * n33 + n13 * n22 * n34 - n12 * n23 * n34)
            + n42 * (n11 * n23 * n34 - n11 * n24 * n33 + n14 * n21 * n33 - n13 * n21 * n34 + n13 * n24 * n31 - n14 * n23 * n31)
            + n43 * (n11 * n24 * n32 - n11 * n22 * n34 - n14 * n21 * n32 + n12 * n21 * n34 + n14 * n22 * n31 - n12 * n24 * n31)
            + n44 * (-n13 * n22 * n31 - n11 * n23 * n32 + n11 * n22 * n33 + n13 * n21 * n32 - n12 * n21 * n33 + n12 * n23 * n31)
    }

    /// Adjugate (transpose of the cofactor matrix), so that
    /// `M * adj(M) = det(M) * I`.
    pub fn adjoint(&self) -> Self {
        let e = &self.elements;

        let n11 = e[0]; let n12 = e[4]; let n13 = e[8]; let n14 = e[12];
        let n21 = e[1]; let n22 = e[5]; let n23 = e[9]; let n24 = e[13];
        let n31 = e[2]; let n32 = e[6]; let n33 = e[10]; let n34 = e[14];
        let n41 = e[3]; let n42 = e[7]; let n43 = e[11]; let n44 = e[15];

        Self {
            elements: [
                n23 * n34 * n42 - n24 * n33 * n42 + n24 * n32 * n43 - n22 * n34 * n43 - n23 * n32 * n44 + n22 * n33 * n44,
                n24 * n33 * n41 - n23 * n34 * n41 - n24 * n31 * n43 + n21 * n34 * n43 + n23 * n31 * n44 - n21 * n33 * n44,
                n22 * n34 * n41 - n24 * n32 * n41 + n24 * n31 * n42 - n21 * n34 * n42 - n22 * n31 * n44 + n21 * n32 * n44,
                n23 * n32 * n41 - n22 * n33 * n41 - n23 * n31 * n42 + n21 * n33 * n42 + n22 * n31 * n43 - n21 * n32 * n43,

                n14 * n33 * n42 - n13 * n34 * n42 - n14 * n32 * n43 + n12 * n34 * n43 + n13 * n32 * n44 - n12 * n33 * n44,
                n13 * n34 * n41 - n14 * n33 * n41 + n14 * n31 * n43 - n11 * n34 * n43 - n13 * n31 * n44 + n11 * n33 * n44,
                n14 * n32 * n41 - n12 * n34 * n41 - n14 * n31 * n42 + n11 * n34 * n42 + n12 * n31 * n44 - n11 * n32 * n44,
                n12 * n33 * n41 - n13 * n32 * n41 + n13 * n31 * n42 - n11 * n33 * n42 - n12 * n31 * n43 + n11 * n32 * n43,

                n13 * n24 * n42 - n14 * n23 * n42 + n14 * n22 * n43 - n12 * n24 * n43 - n13 * n22 * n44 + n12 * n23 * n44,
                n14 * n23 * n41 - n13 * n24 * n41 - n14 * n21 * n43 + n11 * n24 * n43 + n13 * n21 * n44 - n11 * n23 * n44,
                n12 * n24 * n41 - n14 * n22 * n41 + n14 * n21 * n42 - n11 * n24 * n42 - n12 * n21 * n44 + n11 * n22 * n44,
                n13 * n22 * n41 - n12 * n23 * n41 - n13 * n21 * n42 + n11 * n23 * n42 + n12 * n21 * n43 - n11 * n22 * n43,

                n14 * n23 * n32 - n13 * n24 * n32 - n14 * n22 * n33 + n12 * n24 * n33 + n13 * n22 * n34 - n12 * n23 * n34,
                n13 * n24 * n31 - n14 * n23 * n31 + n14 * n21 * n33 - n11 * n24 * n33 - n13 * n21 * n34 + n11 * n23 * n34,
                n14 * n22 * n31 - n12 * n24 * n31 - n14 * n21 * n32 + n11 * n24 * n32 + n12 * n21 * n34 - n11 * n22 * n34,
                n12 * n23 * n31 - n13 * n22 * n31 + n13 * n21 * n32 - n11 * n23 * n32 - n12 * n21 * n33 + n11 * n22 * n33,
            ],
        }
    }

    /// Inverse via the adjugate. A singular matrix logs a warning and yields
    /// [`Matrix4::ZERO`].
    pub fn inverse(&self) -> Self {
        let adj = self.adjoint();
        let e = &self.elements;

        // Expansion along the first column.
        let det = e[0] * adj.elements[0] + e[1] * adj.elements[4] + e[2] * adj.elements[8] + e[3] * adj.elements[12];

        if det == 0.0 {
            log::warn!("Matrix4::inverse: singular matrix, returning zero");
            return Self::ZERO;
        }

        adj.multiply_scalar(1.0 / det)
    }

    /// Transpose this matrix.
    pub fn transpose(&mut self) -> &mut Self {
        self.elements.swap(1, 4);
        self.elements.swap(2, 8);
        self.elements.swap(3, 12);
        self.elements.swap(6, 9);
        self.elements.swap(7, 13);
        self.elements.swap(11, 14);
        self
    }

    /// Return the transpose of this matrix.
    pub fn transposed(&self) -> Self {
        let mut m = *self;
        m.transpose();
        m
    }

    /// Transform a point. Translation is weighted by the point's `w`, and the
    /// resulting `w` is kept (not divided through).
    pub fn transform_point(&self, p: &Point3) -> Point3 {
        let e = &self.elements;
        Point3 {
            x: e[0] * p.x + e[4] * p.y + e[8] * p.z + e[12] * p.w,
            y: e[1] * p.x + e[5] * p.y + e[9] * p.z + e[13] * p.w,
            z: e[2] * p.x + e[6] * p.y + e[10] * p.z + e[14] * p.w,
            w: e[3] * p.x + e[7] * p.y + e[11] * p.z + e[15] * p.w,
        }
    }

    /// Transform a direction; translation does not apply.
    pub fn transform_vector(&self, v: &Vector3) -> Vector3 {
        let e = &self.elements;
        Vector3 {
            x: e[0] * v.x + e[4] * v.y + e[8] * v.z,
            y: e[1] * v.x + e[5] * v.y + e[9] * v.z,
            z: e[2] * v.x + e[6] * v.y + e[10] * v.z,
        }
    }

    /// Quadratic form `uᵀ * M * v` over homogeneous 4-tuples.
    pub fn qform(&self, u: &[f32; 4], v: &[f32; 4]) -> f32 {
        let mut sum = 0.0;
        for row in 0..4 {
            for col in 0..4 {
                sum += u[row] * self.get(row, col) * v[col];
            }
        }
        sum
    }

    /// Gram-Schmidt on columns 0..3 of the upper 3x3 block.
    pub fn ortho_normalize(&mut self) -> &mut Self {
        let mut linear = self.linear();
        linear.ortho_normalize();
        let l = &linear.elements;
        let e = &mut self.elements;
        e[0] = l[0]; e[1] = l[1]; e[2] = l[2];
        e[4] = l[3]; e[5] = l[4]; e[6] = l[5];
        e[8] = l[6]; e[9] = l[7]; e[10] = l[8];
        self
    }

    /// Perspective projection onto the plane through `origin` with unit
    /// `normal`, as seen from `eye`. The result is singular (rank 3).
    ///
    /// ```text
    ///     +-                                                   -+
    /// M = | Dot(N,E-P)*I - E*N^T    -(Dot(N,E-P)*I - E*N^T)*E    |
    ///     |        -N^T                      Dot(N,E)            |
    ///     +-                                                   -+
    /// ```
    pub fn make_perspective_projection(origin: &Point3, normal: &Vector3, eye: &Point3) -> Self {
        let dot_nd = normal.dot(&(*eye - *origin));
        let (e0, e1, e2) = (eye.x, eye.y, eye.z);
        let (n0, n1, n2) = (normal.x, normal.y, normal.z);

        let m00 = dot_nd - e0 * n0;
        let m01 = -e0 * n1;
        let m02 = -e0 * n2;
        let m03 = -(m00 * e0 + m01 * e1 + m02 * e2);

        let m10 = -e1 * n0;
        let m11 = dot_nd - e1 * n1;
        let m12 = -e1 * n2;
        let m13 = -(m10 * e0 + m11 * e1 + m12 * e2);

        let m20 = -e2 * n0;
        let m21 = -e2 * n1;
        let m22 = dot_nd - e2 * n2;
        let m23 = -(m20 * e0 + m21 * e1 + m22 * e2);

        Self::new(
            m00, m01, m02, m03,
            m10, m11, m12, m13,
            m20, m21, m22, m23,
            -n0, -n1, -n2, eye.dot(normal),
        )
    }

    /// Oblique (shadow) projection onto the plane through `origin` with unit
    /// `normal`, along `direction`.
    ///
    /// ```text
    ///     +-                           -+
    /// M = | D*N^T - Dot(N,D)*I  -Dot(N,P)*D |
    ///     |        0^T            -Dot(N,D) |
    ///     +-                           -+
    /// ```
    pub fn make_oblique_projection(origin: &Point3, normal: &Vector3, direction: &Vector3) -> Self {
        let dot_nd = normal.dot(direction);
        let dot_no = origin.dot(normal);
        let (d0, d1, d2) = (direction.x, direction.y, direction.z);
        let (n0, n1, n2) = (normal.x, normal.y, normal.z);

        Self::new(
            d0 * n0 - dot_nd, d0 * n1, d0 * n2, -dot_no * d0,
            d1 * n0, d1 * n1 - dot_nd, d1 * n2, -dot_no * d1,
            d2 * n0, d2 * n1, d2 * n2 - dot_nd, -dot_no * d2,
            0.0, 0.0, 0.0, -dot_nd,
        )
    }

    /// Reflection through the plane through `origin` with unit `normal`.
    ///
    /// ```text
    ///     +-                          -+
    /// M = | I - 2*N*N^T   2*Dot(N,P)*N |
    ///     |     0^T             1      |
    ///     +-                          -+
    /// ```
    pub fn make_reflection(origin: &Point3, normal: &Vector3) -> Self {
        let two_dot_no = 2.0 * origin.dot(normal);
        let (n0, n1, n2) = (normal.x, normal.y, normal.z);

        Self::new(
            1.0 - 2.0 * n0 * n0, -2.0 * n0 * n1, -2.0 * n0 * n2, two_dot_no * n0,
            -2.0 * n1 * n0, 1.0 - 2.0 * n1 * n1, -2.0 * n1 * n2, two_dot_no * n1,
            -2.0 * n2 * n0, -2.0 * n2 * n1, 1.0 - 2.0 * n2 * n2, two_dot_no * n2,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Check if approximately equal to another matrix.
    pub fn approx_eq(&self, other: &Matrix4, epsilon: f32) -> bool {
        self.elements.iter()
            .zip(other.elements.iter())
            .all(|(a, b)| (a - b).abs() < epsilon)
    }

    /// Raw bytes in column-major order, ready for a uniform buffer upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Convert to column-major 2D array (for GPU uniform buffers).
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let e = &self.elements;
        [
            [e[0], e[1], e[2], e[3]],
            [e[4], e[5], e[6], e[7]],
            [e[8], e[9], e[10], e[11]],
            [e[12], e[13], e[14], e[15]],
        ]
    }
}

impl std::ops::Mul for Matrix4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl std::ops::Mul<Point3> for Matrix4 {
    type Output = Point3;
    fn mul(self, rhs: Point3) -> Point3 {
        self.transform_point(&rhs)
    }
}

impl std::ops::Mul<Vector3> for Matrix4 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        self.transform_vector(&rhs)
    }
}

impl From<glam::Mat4> for Matrix4 {
    fn from(m: glam::Mat4) -> Self {
        Self {
            elements: m.to_cols_array(),
        }
    }
}

impl From<Matrix4> for glam::Mat4 {
    fn from(m: Matrix4) -> Self {
        glam::Mat4::from_cols_array(&m.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix4 {
        Matrix4::new(
            2.0, 0.5, -1.0, 3.0,
            0.0, 1.5, 0.25, -2.0,
            1.0, 0.0, 3.0, 0.5,
            0.1, 0.2, 0.0, 1.0,
        )
    }

    fn project(m: &Matrix4, p: &Point3) -> Point3 {
        let mut q = m.transform_point(p);
        assert!(q.homogenize());
        q
    }

    #[test]
    fn test_storage_layout() {
        let m = sample();
        assert_eq!(m.get(0, 3), 3.0);
        assert_eq!(m.elements[12], 3.0);
        assert_eq!(m.get(3, 1), 0.2);
    }

    #[test]
    fn test_translation_applies_to_points_only() {
        let m = Matrix4::from_translation(&Vector3::new(10.0, 20.0, 30.0));
        let p = m.transform_point(&Point3::ORIGIN);
        assert!(p.approx_eq(&Point3::new(10.0, 20.0, 30.0), 1e-6));
        assert_eq!(p.w, 1.0);
        let v = m.transform_vector(&Vector3::UNIT_X);
        assert_eq!(v, Vector3::UNIT_X);
    }

    #[test]
    fn test_inverse() {
        let m = sample();
        let result = m.multiply(&m.inverse());
        assert!(result.approx_eq(&Matrix4::IDENTITY, 1e-5));

        let expected: Matrix4 = glam::Mat4::from(m).inverse().into();
        assert!(m.inverse().approx_eq(&expected, 1e-5));
    }

    #[test]
    fn test_adjoint_and_determinant() {
        let m = sample();
        let det = m.determinant();
        assert!((det - glam::Mat4::from(m).determinant()).abs() < 1e-4);
        let scaled = m.multiply(&m.adjoint());
        assert!(scaled.approx_eq(&Matrix4::IDENTITY.multiply_scalar(det), 1e-4));
    }

    #[test]
    fn test_singular_inverse_is_zero() {
        let mut m = Matrix4::IDENTITY;
        m.set(2, 2, 0.0);
        assert_eq!(m.determinant(), 0.0);
        assert_eq!(m.inverse(), Matrix4::ZERO);
    }

    #[test]
    fn test_product_matches_glam() {
        let a = sample();
        let b = Matrix4::from_linear_translation(
            &Matrix3::from_axis_angle(&Vector3::UNIT_Y, 0.4),
            &Vector3::new(1.0, -1.0, 2.0),
        );
        let expected: Matrix4 = (glam::Mat4::from(a) * glam::Mat4::from(b)).into();
        assert!(a.multiply(&b).approx_eq(&expected, 1e-5));
        assert!(a.transpose_times(&b).approx_eq(&a.transposed().multiply(&b), 1e-6));
        assert!(a.times_transpose(&b).approx_eq(&a.multiply(&b.transposed()), 1e-6));
    }

    #[test]
    fn test_ortho_normalize_keeps_translation() {
        let mut m = Matrix4::from_linear_translation(
            &Matrix3::new(
                1.01, 0.02, 0.0,
                -0.01, 0.99, 0.03,
                0.0, -0.02, 1.0,
            ),
            &Vector3::new(4.0, 5.0, 6.0),
        );
        m.ortho_normalize();
        assert!(m.linear().is_orthonormal(1e-5));
        assert_eq!(m.translation(), Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_reflection() {
        let m = Matrix4::make_reflection(&Point3::new(0.0, 2.0, 0.0), &Vector3::UNIT_Y);
        let p = m.transform_point(&Point3::new(1.0, 5.0, -1.0));
        assert!(p.approx_eq(&Point3::new(1.0, -1.0, -1.0), 1e-6));
        assert!(m.multiply(&m).approx_eq(&Matrix4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_oblique_projection_lands_on_plane() {
        let origin = Point3::new(0.0, 1.0, 0.0);
        let normal = Vector3::UNIT_Y;
        let direction = Vector3::new(1.0, -1.0, 0.0);
        let m = Matrix4::make_oblique_projection(&origin, &normal, &direction);

        let p = project(&m, &Point3::new(0.0, 3.0, 0.0));
        assert!(p.approx_eq(&Point3::new(2.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_perspective_projection() {
        let origin = Point3::ORIGIN;
        let normal = Vector3::UNIT_Y;
        let eye = Point3::new(0.0, 4.0, 0.0);
        let m = Matrix4::make_perspective_projection(&origin, &normal, &eye);

        // Points on the plane are fixed.
        let on_plane = Point3::new(3.0, 0.0, -2.0);
        assert!(project(&m, &on_plane).approx_eq(&on_plane, 1e-5));

        // A point halfway to the eye projects twice as far out.
        let p = project(&m, &Point3::new(1.0, 2.0, 1.0));
        assert!(p.approx_eq(&Point3::new(2.0, 0.0, 2.0), 1e-5));

        assert!(m.determinant().abs() < 1e-3);
    }

    #[test]
    fn test_qform() {
        let m = sample();
        let u = [1.0, 0.0, 0.0, 0.0];
        let v = [0.0, 0.0, 0.0, 1.0];
        assert_eq!(m.qform(&u, &v), m.get(0, 3));
        let p = [1.0, 2.0, 3.0, 1.0];
        assert!((Matrix4::IDENTITY.qform(&p, &p) - 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_bytes_are_column_major() {
        let m = Matrix4::from_translation(&Vector3::new(7.0, 8.0, 9.0));
        let floats: &[f32] = bytemuck::cast_slice(m.as_bytes());
        assert_eq!(&floats[12..15], &[7.0, 8.0, 9.0]);
    }
}
