//! Exponential low-pass smoothing for raw tri-axis samples

use nalgebra::Vector3;

/// Exponentially smoothed tri-axis estimate
///
/// Applies `estimate = alpha * estimate + (1 - alpha) * raw` per axis on
/// every accepted sample. The estimate starts at zero and is never reset
/// during a session; downstream geometry guards reject the early ramp-up
/// while the estimate magnitude is still implausible.
#[derive(Debug, Clone, Copy)]
pub struct LowPass {
    /// History weight applied on each update
    alpha: f32,
    /// Current smoothed estimate
    estimate: Vector3<f32>,
}

impl LowPass {
    /// Create a filter with the given history weight
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            estimate: Vector3::zeros(),
        }
    }

    /// Fold a raw sample into the estimate and return the updated value
    pub fn update(&mut self, raw: Vector3<f32>) -> Vector3<f32> {
        self.estimate = self.estimate * self.alpha + raw * (1.0 - self.alpha);
        self.estimate
    }

    /// Current smoothed estimate
    pub fn value(&self) -> Vector3<f32> {
        self.estimate
    }

    /// History weight this filter was created with
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3Ext;

    #[test]
    fn test_starts_at_zero() {
        let filter = LowPass::new(0.97);
        assert_eq!(filter.value(), Vector3::zeros());
    }

    #[test]
    fn test_update_returns_current_estimate() {
        let mut filter = LowPass::new(0.97);
        let raw = Vector3::new(0.0, 9.8, 0.0);

        let first = filter.update(raw);
        assert_eq!(first, filter.value());
        // A single sample contributes only (1 - alpha) of its value.
        assert!((first.y - 0.03 * 9.8).abs() < 1e-5);
    }

    #[test]
    fn test_converges_geometrically_to_constant_input() {
        let mut filter = LowPass::new(0.97);
        let raw = Vector3::new(20.0, 0.0, 40.0);

        let mut previous_error = (filter.value() - raw).magnitude();
        for _ in 0..500 {
            filter.update(raw);
            let error = (filter.value() - raw).magnitude();
            assert!(error <= previous_error, "error must shrink monotonically");
            previous_error = error;
        }

        // 0.97^500 leaves a vanishing fraction of the initial error.
        assert!(previous_error < 1e-3);
    }

    #[test]
    fn test_direction_follows_input_from_first_sample() {
        let mut filter = LowPass::new(0.97);
        let raw = Vector3::new(3.0, -4.0, 12.0);

        filter.update(raw);
        let aligned = filter.value().safe_normalize().dot(&raw.safe_normalize());
        assert!((aligned - 1.0).abs() < 1e-6);
    }
}
