//! Affine transform `Y = M*X + T` with a cached homogeneous form.

use crate::math::{Matrix3, Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::ops::Mul;

/// Shape of the linear block of a [`Transform`].
///
/// The rotation-scale forms keep `M = R * diag(S)` factored so products and
/// inverses can skip the general 3x3 paths.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum TransformForm {
    /// The whole transform is the identity, translation included.
    #[default]
    Identity,
    /// Rotation with one scale shared by all axes.
    UniformScale {
        /// Rotation matrix.
        rotate: Matrix3,
        /// Scale factor.
        scale: f32,
    },
    /// Rotation with a scale per axis.
    NonUniformScale {
        /// Rotation matrix.
        rotate: Matrix3,
        /// Per-axis scale.
        scale: Vector3,
    },
    /// Arbitrary linear block.
    General {
        /// Linear block.
        matrix: Matrix3,
    },
}

/// Local or world transformation of a scene object.
///
/// The homogeneous matrix is rebuilt by every mutator. Its inverse is
/// computed on first read after a mutation and cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "TransformParts", into = "TransformParts")]
pub struct Transform {
    form: TransformForm,
    translate: Vector3,
    homogeneous: Matrix4,
    inverse: Cell<Matrix4>,
    inverse_dirty: Cell<bool>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        self.form == other.form && self.translate == other.translate
    }
}

impl Transform {
    /// Create a new identity transform.
    pub fn new() -> Self {
        Self {
            form: TransformForm::Identity,
            translate: Vector3::ZERO,
            homogeneous: Matrix4::IDENTITY,
            inverse: Cell::new(Matrix4::IDENTITY),
            inverse_dirty: Cell::new(false),
        }
    }

    /// Create a transform from its linear form and translation.
    pub fn from_parts(form: TransformForm, translate: Vector3) -> Self {
        let mut t = Self::new();
        t.form = form;
        if translate != Vector3::ZERO {
            t.set_translate(translate);
        } else {
            t.invalidate();
        }
        t
    }

    /// Create a pure translation.
    pub fn from_translation(translate: Vector3) -> Self {
        let mut t = Self::new();
        t.set_translate(translate);
        t
    }

    /// Linear form.
    #[inline]
    pub fn form(&self) -> &TransformForm {
        &self.form
    }

    /// True only for the identity form.
    #[inline]
    pub fn is_identity(&self) -> bool {
        matches!(self.form, TransformForm::Identity)
    }

    /// True when the linear block is a rotation times a diagonal scale.
    #[inline]
    pub fn is_rs_matrix(&self) -> bool {
        !matches!(self.form, TransformForm::General { .. })
    }

    /// True when the scale is shared by all axes.
    #[inline]
    pub fn is_uniform_scale(&self) -> bool {
        matches!(
            self.form,
            TransformForm::Identity | TransformForm::UniformScale { .. }
        )
    }

    /// Reset to the identity transform.
    pub fn make_identity(&mut self) {
        self.form = TransformForm::Identity;
        self.translate = Vector3::ZERO;
        self.invalidate();
    }

    /// Reset the scale to one, keeping the rotation.
    ///
    /// # Panics
    ///
    /// Panics if the transform is not in rotation-scale form.
    pub fn make_unit_scale(&mut self) {
        assert!(self.is_rs_matrix(), "make_unit_scale requires a rotation-scale transform");
        if self.is_identity() {
            return;
        }
        if let Some(rotate) = self.rs_rotate() {
            self.form = TransformForm::UniformScale { rotate, scale: 1.0 };
        }
        self.invalidate();
    }

    /// Set the rotation. A general transform becomes rotation-scale with
    /// unit scale.
    pub fn set_rotate(&mut self, rotate: Matrix3) {
        self.form = match self.form {
            TransformForm::Identity => TransformForm::UniformScale { rotate, scale: 1.0 },
            TransformForm::UniformScale { scale, .. } => TransformForm::UniformScale { rotate, scale },
            TransformForm::NonUniformScale { scale, .. } => {
                TransformForm::NonUniformScale { rotate, scale }
            }
            TransformForm::General { .. } => TransformForm::NonUniformScale {
                rotate,
                scale: Vector3::ONE,
            },
        };
        self.invalidate();
    }

    /// Set an arbitrary linear block.
    pub fn set_matrix(&mut self, matrix: Matrix3) {
        self.form = TransformForm::General { matrix };
        self.invalidate();
    }

    /// Set the translation.
    pub fn set_translate(&mut self, translate: Vector3) {
        if self.is_identity() {
            self.form = TransformForm::UniformScale {
                rotate: Matrix3::IDENTITY,
                scale: 1.0,
            };
        }
        self.translate = translate;
        self.invalidate();
    }

    /// Set a per-axis scale.
    ///
    /// # Panics
    ///
    /// Panics if the transform is not in rotation-scale form.
    pub fn set_scale(&mut self, scale: Vector3) {
        assert!(self.is_rs_matrix(), "set_scale requires a rotation-scale transform");
        if let Some(rotate) = self.rs_rotate() {
            self.form = TransformForm::NonUniformScale { rotate, scale };
        }
        self.invalidate();
    }

    /// Set a scale shared by all axes.
    ///
    /// # Panics
    ///
    /// Panics if the transform is not in rotation-scale form.
    pub fn set_uniform_scale(&mut self, scale: f32) {
        assert!(self.is_rs_matrix(), "set_uniform_scale requires a rotation-scale transform");
        if let Some(rotate) = self.rs_rotate() {
            self.form = TransformForm::UniformScale { rotate, scale };
        }
        self.invalidate();
    }

    /// Rotation of a rotation-scale transform.
    ///
    /// # Panics
    ///
    /// Panics on a general transform.
    pub fn rotate(&self) -> Matrix3 {
        match self.rs_rotate() {
            Some(rotate) => rotate,
            None => panic!("rotate requires a rotation-scale transform"),
        }
    }

    /// Per-axis scale of a rotation-scale transform.
    ///
    /// # Panics
    ///
    /// Panics on a general transform.
    pub fn scale(&self) -> Vector3 {
        match self.form {
            TransformForm::Identity => Vector3::ONE,
            TransformForm::UniformScale { scale, .. } => Vector3::splat(scale),
            TransformForm::NonUniformScale { scale, .. } => scale,
            TransformForm::General { .. } => panic!("scale requires a rotation-scale transform"),
        }
    }

    /// Shared scale of a uniformly scaled transform.
    ///
    /// # Panics
    ///
    /// Panics unless the transform is rotation-scale with uniform scale.
    pub fn uniform_scale(&self) -> f32 {
        match self.form {
            TransformForm::Identity => 1.0,
            TransformForm::UniformScale { scale, .. } => scale,
            _ => panic!("uniform_scale requires a uniformly scaled transform"),
        }
    }

    /// Linear block `M`, which is `R * diag(S)` for rotation-scale forms.
    pub fn matrix(&self) -> Matrix3 {
        match self.form {
            TransformForm::Identity => Matrix3::IDENTITY,
            TransformForm::UniformScale { rotate, scale } => rotate.multiply_scalar(scale),
            TransformForm::NonUniformScale { rotate, scale } => rotate.times_diagonal(&scale),
            TransformForm::General { matrix } => matrix,
        }
    }

    /// Translation.
    #[inline]
    pub fn translate(&self) -> Vector3 {
        self.translate
    }

    /// Upper bound on how much the transform stretches lengths: the largest
    /// absolute scale, or `sqrt(max_col_sum * max_row_sum)` of a general
    /// block, which bounds its spectral norm.
    pub fn norm(&self) -> f32 {
        match self.form {
            TransformForm::Identity => 1.0,
            TransformForm::UniformScale { scale, .. } => scale.abs(),
            TransformForm::NonUniformScale { scale, .. } => scale.max_abs_component(),
            TransformForm::General { matrix } => (matrix.max_row_sum() * matrix.max_col_sum()).sqrt(),
        }
    }

    /// Homogeneous 4x4 form.
    #[inline]
    pub fn to_matrix(&self) -> Matrix4 {
        self.homogeneous
    }

    /// Borrow the homogeneous 4x4 form.
    #[inline]
    pub fn homogeneous(&self) -> &Matrix4 {
        &self.homogeneous
    }

    /// Apply to a point.
    #[inline]
    pub fn transform_point(&self, p: &Point3) -> Point3 {
        self.homogeneous.transform_point(p)
    }

    /// Apply to a direction; translation does not apply.
    #[inline]
    pub fn transform_vector(&self, v: &Vector3) -> Vector3 {
        self.homogeneous.transform_vector(v)
    }

    /// Inverse of the homogeneous matrix, cached until the next mutation.
    pub fn inverse(&self) -> Matrix4 {
        if self.inverse_dirty.get() {
            self.inverse.set(self.compute_inverse());
            self.inverse_dirty.set(false);
        }
        self.inverse.get()
    }

    /// Inverse as a transform. Uniform scale keeps rotation-scale form;
    /// non-uniform and general transforms invert to a general block.
    pub fn inverse_transform(&self) -> Transform {
        let (form, inv_linear) = match self.form {
            TransformForm::Identity => return Transform::new(),
            TransformForm::UniformScale { rotate, scale } if scale != 0.0 => {
                let inv_rotate = rotate.transposed();
                let inv_scale = 1.0 / scale;
                (
                    TransformForm::UniformScale { rotate: inv_rotate, scale: inv_scale },
                    inv_rotate.multiply_scalar(inv_scale),
                )
            }
            _ => {
                let inv_matrix = self.matrix().inverse();
                (TransformForm::General { matrix: inv_matrix }, inv_matrix)
            }
        };

        Transform::from_parts(form, -inv_linear.transform(&self.translate))
    }

    /// Compose: `self * other` applies `other` first.
    pub fn multiply(&self, other: &Transform) -> Transform {
        if self.is_identity() {
            return other.clone();
        }
        if other.is_identity() {
            return self.clone();
        }

        if let (TransformForm::UniformScale { rotate: r1, scale: s1 }, Some(r2)) =
            (self.form, other.rs_rotate())
        {
            let rotate = r1.multiply(&r2);
            let translate = r1.transform(&other.translate) * s1 + self.translate;
            let form = match other.form {
                TransformForm::NonUniformScale { scale, .. } => {
                    TransformForm::NonUniformScale { rotate, scale: scale * s1 }
                }
                _ => TransformForm::UniformScale { rotate, scale: s1 * other.uniform_scale() },
            };
            return Transform::from_parts(form, translate);
        }

        let a = self.matrix();
        let b = other.matrix();
        Transform::from_parts(
            TransformForm::General { matrix: a.multiply(&b) },
            a.transform(&other.translate) + self.translate,
        )
    }

    fn rs_rotate(&self) -> Option<Matrix3> {
        match self.form {
            TransformForm::Identity => Some(Matrix3::IDENTITY),
            TransformForm::UniformScale { rotate, .. }
            | TransformForm::NonUniformScale { rotate, .. } => Some(rotate),
            TransformForm::General { .. } => None,
        }
    }

    fn invalidate(&mut self) {
        self.homogeneous = Matrix4::from_linear_translation(&self.matrix(), &self.translate);
        self.inverse_dirty.set(true);
    }

    fn compute_inverse(&self) -> Matrix4 {
        let inv_linear = match self.form {
            TransformForm::Identity => return Matrix4::IDENTITY,
            TransformForm::UniformScale { rotate, scale } => {
                if scale == 0.0 {
                    log::warn!("Transform::inverse: zero scale, returning zero block");
                    Matrix3::ZERO
                } else {
                    rotate.transposed().multiply_scalar(1.0 / scale)
                }
            }
            TransformForm::NonUniformScale { rotate, scale } => {
                let s01 = scale.x * scale.y;
                let s02 = scale.x * scale.z;
                let s12 = scale.y * scale.z;
                let s012 = s01 * scale.z;
                if s012 == 0.0 {
                    log::warn!("Transform::inverse: zero scale, returning zero block");
                    Matrix3::ZERO
                } else {
                    let inv_s012 = 1.0 / s012;
                    let inv_scale = Vector3::new(s12 * inv_s012, s02 * inv_s012, s01 * inv_s012);
                    // Row r of diag(1/S) * Rᵀ.
                    Matrix3::diagonal_times(&inv_scale, &rotate.transposed())
                }
            }
            TransformForm::General { matrix } => matrix.inverse(),
        };

        Matrix4::from_linear_translation(&inv_linear, &-inv_linear.transform(&self.translate))
    }
}

impl Mul for &Transform {
    type Output = Transform;
    fn mul(self, rhs: &Transform) -> Transform {
        self.multiply(rhs)
    }
}

impl Mul for Transform {
    type Output = Transform;
    fn mul(self, rhs: Transform) -> Transform {
        self.multiply(&rhs)
    }
}

/// Serialized shape of a [`Transform`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TransformParts {
    #[serde(default)]
    form: TransformForm,
    #[serde(default)]
    translate: Vector3,
}

impl From<TransformParts> for Transform {
    fn from(parts: TransformParts) -> Self {
        Transform::from_parts(parts.form, parts.translate)
    }
}

impl From<Transform> for TransformParts {
    fn from(t: Transform) -> Self {
        Self {
            form: t.form,
            translate: t.translate,
        }
    }
}
