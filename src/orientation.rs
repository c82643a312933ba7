//! Rotation-matrix derivation and orientation-angle extraction
//!
//! All rotation matrices here transform device-frame vectors into the world
//! frame (X = east, Y = magnetic north, Z = up). Orientation angles follow
//! the mobile sensor-stack convention: azimuth about the vertical axis,
//! pitch about the device X axis, roll about the device Y axis.

use nalgebra::{ComplexField, Matrix3, Quaternion, RealField, UnitQuaternion, Vector3};

use crate::math::Vector3Ext;
use crate::types::SampleError;

/// Gravity estimates with squared magnitude below 1% of standard gravity
/// squared are treated as free fall and define no usable vertical.
const FREE_FALL_GRAVITY_SQUARED: f32 = 0.01 * (9.81 * 9.81);

/// Minimum magnitude of the field x gravity cross product. Below this the
/// two vectors are near-parallel (free fall or strong magnetic interference)
/// and span no horizontal plane.
const MIN_HORIZONTAL_NORM: f32 = 0.1;

/// Minimum rotation-vector quaternion norm accepted for normalization
const MIN_ROTATION_NORM: f32 = 1e-6;

/// Orientation angles in radians extracted from a rotation matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationAngles {
    /// Rotation about the vertical axis, positive clockwise from north
    pub azimuth: f32,
    /// Rotation about the device X axis
    pub pitch: f32,
    /// Rotation about the device Y axis
    pub roll: f32,
}

/// Convert a raw rotation-vector sample into a rotation matrix
///
/// The sample carries the quaternion components `[x, y, z, w]`; a fifth
/// component (estimated heading accuracy) is accepted and ignored. The
/// quaternion is normalized, so slightly denormalized platform values are
/// tolerated.
///
/// # Errors
/// Rejects samples with an unsupported component count, non-finite
/// components, or a quaternion too close to zero to define an orientation.
pub fn rotation_from_vector(values: &[f32]) -> Result<Matrix3<f32>, SampleError> {
    let (x, y, z, w) = match *values {
        [x, y, z, w] | [x, y, z, w, _] => (x, y, z, w),
        _ => return Err(SampleError::WrongLength(values.len())),
    };
    if !(x.is_finite() && y.is_finite() && z.is_finite() && w.is_finite()) {
        return Err(SampleError::NonFinite);
    }

    let quaternion = UnitQuaternion::try_new(Quaternion::new(w, x, y, z), MIN_ROTATION_NORM)
        .ok_or(SampleError::ZeroRotation)?;

    Ok(quaternion.to_rotation_matrix().into_inner())
}

/// Derive the rotation and inclination matrices from a gravity and
/// geomagnetic estimate pair
///
/// Builds an orthonormal world basis from cross products: east as
/// `field x gravity`, north as `up x east`. Returns `None` when the pair is
/// degenerate (gravity below the free-fall guard, or field and gravity
/// near-parallel), in which case the caller skips one emission cycle.
///
/// The inclination matrix rotates about X by the magnetic dip angle; it is
/// derived alongside the rotation matrix but plays no part in heading
/// extraction.
pub fn rotation_and_inclination(
    gravity: Vector3<f32>,
    geomagnetic: Vector3<f32>,
) -> Option<(Matrix3<f32>, Matrix3<f32>)> {
    if gravity.norm_squared() < FREE_FALL_GRAVITY_SQUARED {
        return None;
    }

    let east = geomagnetic.cross(&gravity);
    let east_norm = Vector3Ext::magnitude(&east);
    if east_norm < MIN_HORIZONTAL_NORM {
        return None;
    }

    let east = east / east_norm;
    let up = gravity / Vector3Ext::magnitude(&gravity);
    let north = up.cross(&east);

    let rotation = Matrix3::new(
        east.x, east.y, east.z, //
        north.x, north.y, north.z, //
        up.x, up.y, up.z,
    );

    // Magnetic dip: project the field onto the north and up axes.
    let inv_field = 1.0 / Vector3Ext::magnitude(&geomagnetic);
    let cos_dip = geomagnetic.dot(&north) * inv_field;
    let sin_dip = geomagnetic.dot(&up) * inv_field;
    let inclination = Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, cos_dip, sin_dip, //
        0.0, -sin_dip, cos_dip,
    );

    Some((rotation, inclination))
}

/// Extract orientation angles from a device-to-world rotation matrix
pub fn orientation_angles(rotation: &Matrix3<f32>) -> OrientationAngles {
    OrientationAngles {
        azimuth: RealField::atan2(rotation[(0, 1)], rotation[(1, 1)]),
        pitch: ComplexField::asin(-rotation[(2, 1)]),
        roll: RealField::atan2(-rotation[(2, 0)], rotation[(2, 2)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::RAD_TO_DEG;
    use core::f32::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_identity_rotation_vector_faces_north() {
        let rotation = rotation_from_vector(&[0.0, 0.0, 0.0, 1.0]).unwrap();
        let angles = orientation_angles(&rotation);

        assert!(angles.azimuth.abs() < 1e-6);
        assert!(angles.pitch.abs() < 1e-6);
        assert!(angles.roll.abs() < 1e-6);
    }

    #[test]
    fn test_quarter_turn_east() {
        // Device yawed so its top points east: -90 degrees about the vertical.
        let rotation = rotation_from_vector(&[0.0, 0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2]).unwrap();
        let angles = orientation_angles(&rotation);

        assert!((angles.azimuth * RAD_TO_DEG - 90.0).abs() < 1e-3);
        assert!(angles.pitch.abs() < 1e-4);
        assert!(angles.roll.abs() < 1e-4);
    }

    #[test]
    fn test_fifth_component_ignored() {
        let four = rotation_from_vector(&[0.0, 0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2]).unwrap();
        let five =
            rotation_from_vector(&[0.0, 0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.25]).unwrap();
        assert_eq!(four, five);
    }

    #[test]
    fn test_malformed_rotation_vectors_rejected() {
        assert_eq!(
            rotation_from_vector(&[0.0, 0.0, 1.0]),
            Err(SampleError::WrongLength(3))
        );
        assert_eq!(
            rotation_from_vector(&[0.0; 6]),
            Err(SampleError::WrongLength(6))
        );
        assert_eq!(
            rotation_from_vector(&[0.0, f32::NAN, 0.0, 1.0]),
            Err(SampleError::NonFinite)
        );
        assert_eq!(
            rotation_from_vector(&[0.0, 0.0, 0.0, 0.0]),
            Err(SampleError::ZeroRotation)
        );
    }

    #[test]
    fn test_denormalized_quaternion_tolerated() {
        let scaled = rotation_from_vector(&[0.0, 0.0, -2.0 * FRAC_1_SQRT_2, 2.0 * FRAC_1_SQRT_2])
            .unwrap();
        let angles = orientation_angles(&scaled);
        assert!((angles.azimuth * RAD_TO_DEG - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_flat_device_facing_north() {
        let gravity = Vector3::new(0.0, 0.0, 9.81);
        let field = Vector3::new(0.0, 20.0, -40.0);

        let (rotation, _) = rotation_and_inclination(gravity, field).unwrap();
        let angles = orientation_angles(&rotation);
        assert!(angles.azimuth.abs() < 1e-5);
    }

    #[test]
    fn test_flat_device_facing_east() {
        let gravity = Vector3::new(0.0, 0.0, 9.81);
        let field = Vector3::new(-20.0, 0.0, -40.0);

        let (rotation, _) = rotation_and_inclination(gravity, field).unwrap();
        let angles = orientation_angles(&rotation);
        assert!((angles.azimuth * RAD_TO_DEG - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotation_matrix_is_orthonormal() {
        let gravity = Vector3::new(0.3, 9.5, 1.2);
        let field = Vector3::new(18.0, -4.0, -41.0);

        let (rotation, _) = rotation_and_inclination(gravity, field).unwrap();
        let product = rotation * rotation.transpose();
        let identity = Matrix3::<f32>::identity();

        for row in 0..3 {
            for col in 0..3 {
                assert!(
                    (product[(row, col)] - identity[(row, col)]).abs() < 1e-5,
                    "R * R^T deviates from identity at ({}, {})",
                    row,
                    col
                );
            }
        }
    }

    #[test]
    fn test_inclination_encodes_unit_dip() {
        let gravity = Vector3::new(0.0, 0.0, 9.81);
        let field = Vector3::new(0.0, 20.0, -40.0);

        let (_, inclination) = rotation_and_inclination(gravity, field).unwrap();
        let cos_dip = inclination[(1, 1)];
        let sin_dip = inclination[(1, 2)];
        assert!((cos_dip * cos_dip + sin_dip * sin_dip - 1.0).abs() < 1e-5);
        // Field points below the horizon, so the dip projection onto up is negative.
        assert!(sin_dip < 0.0);
    }

    #[test]
    fn test_free_fall_yields_no_rotation() {
        let field = Vector3::new(20.0, 0.0, 40.0);
        assert!(rotation_and_inclination(Vector3::zeros(), field).is_none());

        // 3% of standard gravity is still below the free-fall guard.
        let weightless = Vector3::new(0.0, 0.0, 0.3);
        assert!(rotation_and_inclination(weightless, field).is_none());
    }

    #[test]
    fn test_parallel_field_and_gravity_yield_no_rotation() {
        let gravity = Vector3::new(0.0, 0.0, 9.81);
        let parallel_field = Vector3::new(0.0, 0.0, -35.0);
        assert!(rotation_and_inclination(gravity, parallel_field).is_none());

        let zero_field = Vector3::zeros();
        assert!(rotation_and_inclination(gravity, zero_field).is_none());
    }
}
