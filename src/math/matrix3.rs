//! 3x3 Matrix implementation.

use super::Vector3;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A 3x3 matrix stored in column-major order.
/// Holds the linear block (rotation, or general invertible map) of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Matrix3 {
    /// Matrix elements in column-major order.
    /// [m00, m10, m20, m01, m11, m21, m02, m12, m22]
    pub elements: [f32; 9],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        elements: [
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        ],
    };

    /// Zero matrix.
    pub const ZERO: Self = Self {
        elements: [0.0; 9],
    };

    /// Create a new Matrix3 from elements in row-major order.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m00: f32, m01: f32, m02: f32,
        m10: f32, m11: f32, m12: f32,
        m20: f32, m21: f32, m22: f32,
    ) -> Self {
        Self {
            elements: [
                m00, m10, m20,
                m01, m11, m21,
                m02, m12, m22,
            ],
        }
    }

    /// Create from column-major array.
    #[inline]
    pub const fn from_cols_array(elements: [f32; 9]) -> Self {
        Self { elements }
    }

    /// Create from three column vectors.
    #[inline]
    pub const fn from_columns(c0: Vector3, c1: Vector3, c2: Vector3) -> Self {
        Self {
            elements: [c0.x, c0.y, c0.z, c1.x, c1.y, c1.z, c2.x, c2.y, c2.z],
        }
    }

    /// Diagonal matrix.
    #[inline]
    pub const fn from_diagonal(d: Vector3) -> Self {
        Self::new(
            d.x, 0.0, 0.0,
            0.0, d.y, 0.0,
            0.0, 0.0, d.z,
        )
    }

    /// Rotation by `angle` radians about a unit `axis`.
    pub fn from_axis_angle(axis: &Vector3, angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        let t = 1.0 - c;
        let (x, y, z) = (axis.x, axis.y, axis.z);

        Self::new(
            t * x * x + c, t * x * y - s * z, t * x * z + s * y,
            t * x * y + s * z, t * y * y + c, t * y * z - s * x,
            t * x * z - s * y, t * y * z + s * x, t * z * z + c,
        )
    }

    /// Element at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.elements[row + 3 * col]
    }

    /// Set element at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> &mut Self {
        self.elements[row + 3 * col] = value;
        self
    }

    /// Column `col` as a vector.
    #[inline]
    pub fn column(&self, col: usize) -> Vector3 {
        let e = &self.elements;
        Vector3::new(e[3 * col], e[3 * col + 1], e[3 * col + 2])
    }

    /// Multiply this matrix by another.
    pub fn multiply(&self, other: &Matrix3) -> Self {
        let a = &self.elements;
        let b = &other.elements;

        Self {
            elements: [
                a[0] * b[0] + a[3] * b[1] + a[6] * b[2],
                a[1] * b[0] + a[4] * b[1] + a[7] * b[2],
                a[2] * b[0] + a[5] * b[1] + a[8] * b[2],

                a[0] * b[3] + a[3] * b[4] + a[6] * b[5],
                a[1] * b[3] + a[4] * b[4] + a[7] * b[5],
                a[2] * b[3] + a[5] * b[4] + a[8] * b[5],

                a[0] * b[6] + a[3] * b[7] + a[6] * b[8],
                a[1] * b[6] + a[4] * b[7] + a[7] * b[8],
                a[2] * b[6] + a[5] * b[7] + a[8] * b[8],
            ],
        }
    }

    /// `M * diag(d)`: scales column `i` by `d[i]`.
    pub fn times_diagonal(&self, d: &Vector3) -> Self {
        let e = &self.elements;
        Self {
            elements: [
                e[0] * d.x, e[1] * d.x, e[2] * d.x,
                e[3] * d.y, e[4] * d.y, e[5] * d.y,
                e[6] * d.z, e[7] * d.z, e[8] * d.z,
            ],
        }
    }

    /// `diag(d) * M`: scales row `i` by `d[i]`.
    pub fn diagonal_times(d: &Vector3, m: &Matrix3) -> Self {
        let e = &m.elements;
        Self {
            elements: [
                e[0] * d.x, e[1] * d.y, e[2] * d.z,
                e[3] * d.x, e[4] * d.y, e[5] * d.z,
                e[6] * d.x, e[7] * d.y, e[8] * d.z,
            ],
        }
    }

    /// Multiply by a scalar.
    pub fn multiply_scalar(&self, s: f32) -> Self {
        let mut m = *self;
        for e in &mut m.elements {
            *e *= s;
        }
        m
    }

    /// Transform a vector: `M * v`.
    #[inline]
    pub fn transform(&self, v: &Vector3) -> Vector3 {
        let e = &self.elements;
        Vector3 {
            x: e[0] * v.x + e[3] * v.y + e[6] * v.z,
            y: e[1] * v.x + e[4] * v.y + e[7] * v.z,
            z: e[2] * v.x + e[5] * v.y + e[8] * v.z,
        }
    }

    /// Calculate the determinant.
    pub fn determinant(&self) -> f32 {
        let e = &self.elements;
        e[0] * (e[4] * e[8] - e[5] * e[7])
            - e[3] * (e[1] * e[8] - e[2] * e[7])
            + e[6] * (e[1] * e[5] - e[2] * e[4])
    }

    /// Adjugate (transpose of the cofactor matrix).
    pub fn adjoint(&self) -> Self {
        let a00 = self.get(0, 0); let a01 = self.get(0, 1); let a02 = self.get(0, 2);
        let a10 = self.get(1, 0); let a11 = self.get(1, 1); let a12 = self.get(1, 2);
        let a20 = self.get(2, 0); let a21 = self.get(2, 1); let a22 = self.get(2, 2);

        Self::new(
            a11 * a22 - a12 * a21, a02 * a21 - a01 * a22, a01 * a12 - a02 * a11,
            a12 * a20 - a10 * a22, a00 * a22 - a02 * a20, a02 * a10 - a00 * a12,
            a10 * a21 - a11 * a20, a01 * a20 - a00 * a21, a00 * a11 - a01 * a10,
        )
    }

    /// Inverse via the adjugate. A singular matrix logs a warning and yields
    /// [`Matrix3::ZERO`].
    pub fn inverse(&self) -> Self {
        let adj = self.adjoint();
        // First row of the adjugate times first column of M.
        let det = self.get(0, 0) * adj.get(0, 0)
            + self.get(1, 0) * adj.get(0, 1)
            + self.get(2, 0) * adj.get(0, 2);

        if det == 0.0 {
            log::warn!("Matrix3::inverse: singular matrix (det = {det}), returning zero");
            return Self::ZERO;
        }

        adj.multiply_scalar(1.0 / det)
    }

    /// Transpose this matrix.
    pub fn transpose(&mut self) -> &mut Self {
        self.elements.swap(1, 3);
        self.elements.swap(2, 6);
        self.elements.swap(5, 7);
        self
    }

    /// Return the transpose of this matrix.
    pub fn transposed(&self) -> Self {
        let mut m = *self;
        m.transpose();
        m
    }

    /// Largest absolute row sum (the infinity norm).
    pub fn max_row_sum(&self) -> f32 {
        (0..3)
            .map(|r| self.get(r, 0).abs() + self.get(r, 1).abs() + self.get(r, 2).abs())
            .fold(0.0, f32::max)
    }

    /// Largest sum of absolute values over the columns.
    pub fn max_col_sum(&self) -> f32 {
        (0..3)
            .map(|c| self.get(0, c).abs() + self.get(1, c).abs() + self.get(2, c).abs())
            .fold(0.0, f32::max)
    }

    /// Gram-Schmidt on the columns, removing drift from a rotation matrix.
    pub fn ortho_normalize(&mut self) -> &mut Self {
        let mut c0 = self.column(0);
        let mut c1 = self.column(1);
        let mut c2 = self.column(2);
        Vector3::orthonormalize(&mut c0, &mut c1, &mut c2);
        *self = Self::from_columns(c0, c1, c2);
        self
    }

    /// Whether `Mᵀ M` is the identity within `epsilon`.
    pub fn is_orthonormal(&self, epsilon: f32) -> bool {
        let product = self.transposed().multiply(self);
        product.approx_eq(&Self::IDENTITY, epsilon)
    }

    /// Check if approximately equal to another matrix.
    pub fn approx_eq(&self, other: &Matrix3, epsilon: f32) -> bool {
        self.elements.iter()
            .zip(other.elements.iter())
            .all(|(a, b)| (a - b).abs() < epsilon)
    }
}

impl std::ops::Mul for Matrix3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl std::ops::Mul<Vector3> for Matrix3 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        self.transform(&rhs)
    }
}

impl From<glam::Mat3> for Matrix3 {
    fn from(m: glam::Mat3) -> Self {
        Self {
            elements: m.to_cols_array(),
        }
    }
}

impl From<Matrix3> for glam::Mat3 {
    fn from(m: Matrix3) -> Self {
        glam::Mat3::from_cols_array(&m.elements)
    }
}
