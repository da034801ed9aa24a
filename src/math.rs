//! Shared math aliases and tolerances.

use nalgebra::{Point3, Unit, Vector3};

pub type Point = Point3<f64>;
pub type Vec3 = Vector3<f64>;
/// Unit-length vector.
pub type Dir3 = Unit<Vector3<f64>>;

/// Determinant band for parallel rays and the minimum reported hit distance.
pub const EPSILON: f64 = 1.0e-6;

/// Allowed deviation from unit length for directions and normals.
pub const NORMALIZED_TOLERANCE: f64 = 1.0e-6;

/// Directions shorter than this cannot be normalized.
pub const MIN_DIRECTION_NORM: f64 = 1.0e-12;

#[inline]
pub fn is_normalized(v: &Vec3) -> bool {
    (v.norm() - 1.0).abs() < NORMALIZED_TOLERANCE
}
