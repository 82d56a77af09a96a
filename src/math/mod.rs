//! # Math Module
//!
//! Linear algebra for the scene graph: vectors, points, planes, 3x3 and 4x4
//! matrices, quaternions and bounding spheres.
//!
//! Matrices follow the column-vector convention `Y = M * X` and are stored
//! column-major, so element `(row, col)` lives at `row + N * col`.

pub mod scalar;
mod vector3;
mod point3;
mod plane;
mod matrix3;
mod matrix4;
mod quaternion;
mod bound;

pub use vector3::Vector3;
pub use point3::Point3;
pub use plane::Plane;
pub use matrix3::Matrix3;
pub use matrix4::Matrix4;
pub use quaternion::Quaternion;
pub use bound::Bound;
pub use scalar::{clamp, deg_to_rad, lerp, rad_to_deg, saturate};

/// Common math constants.
pub mod consts {
    /// Pi constant.
    pub const PI: f32 = std::f32::consts::PI;
    /// Two times Pi.
    pub const TWO_PI: f32 = PI * 2.0;
    /// Half of Pi.
    pub const HALF_PI: f32 = PI / 2.0;
    /// Degrees to radians conversion factor.
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    /// Radians to degrees conversion factor.
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    /// Threshold below which a length, angle or determinant counts as zero.
    pub const ZERO_TOLERANCE: f32 = 1e-6;
    /// Largest representable value, used for saturated sentinels.
    pub const MAX_REAL: f32 = f32::MAX;
}
