//! Mathematical utilities and nalgebra extensions for the Fusion Compass library

use nalgebra::{ComplexField, Vector3};

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Normalize an angle in degrees into the compass range `[0, 360)`
///
/// # Example
/// ```
/// use fusion_compass::wrap_degrees;
///
/// assert_eq!(wrap_degrees(370.0), 10.0);
/// assert_eq!(wrap_degrees(-90.0), 270.0);
/// assert_eq!(wrap_degrees(360.0), 0.0);
/// ```
pub fn wrap_degrees(degrees: f32) -> f32 {
    (degrees % 360.0 + 360.0) % 360.0
}

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Calculate the magnitude of the vector
    fn magnitude(&self) -> f32;

    /// Normalize the vector, returning zero vector if magnitude is zero
    fn safe_normalize(&self) -> Vector3<f32>;
}

impl Vector3Ext for Vector3<f32> {
    fn magnitude(&self) -> f32 {
        ComplexField::sqrt(self.norm_squared())
    }

    fn safe_normalize(&self) -> Vector3<f32> {
        let mag = Vector3Ext::magnitude(self);
        if mag > 0.0 {
            *self / mag
        } else {
            Vector3::zeros()
        }
    }
}
