//! Per-mode fusion state machines
//!
//! One fuser variant exists per fusion mode; the session fixes the variant
//! at start and every raw sample flows through it. Fusers produce ungated
//! candidate headings; the session's change gate decides what is emitted.

use nalgebra::Vector3;

use crate::math::{RAD_TO_DEG, wrap_degrees};
use crate::orientation::{self, OrientationAngles};
use crate::smoothing::LowPass;
use crate::types::{FusionMode, SampleError, SensorKind};

/// Candidate heading pair produced by a fuser before gating
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    /// Magnetic heading in degrees, `[0, 360)`
    pub(crate) heading: f32,
    /// Roll-compensated heading for camera overlays, `[0, 360)`
    pub(crate) camera_heading: f32,
}

/// Fusion algorithm fixed at session start, one variant per mode
#[derive(Debug, Clone, Copy)]
pub(crate) enum Fuser {
    RotationVector(RotationVectorFuser),
    AccelerometerMagnetometer(AccelMagFuser),
}

impl Fuser {
    pub(crate) fn mode(&self) -> FusionMode {
        match self {
            Fuser::RotationVector(_) => FusionMode::RotationVector,
            Fuser::AccelerometerMagnetometer(_) => FusionMode::AccelerometerMagnetometer,
        }
    }

    /// Feed one raw sample; `Ok(Some)` carries an ungated candidate heading
    ///
    /// `Ok(None)` means the cycle produced no candidate (degenerate
    /// geometry); `Err` means the sample itself was rejected.
    pub(crate) fn ingest(
        &mut self,
        kind: SensorKind,
        values: &[f32],
    ) -> Result<Option<Candidate>, SampleError> {
        match self {
            Fuser::RotationVector(fuser) => fuser.ingest(kind, values),
            Fuser::AccelerometerMagnetometer(fuser) => fuser.ingest(kind, values),
        }
    }
}

/// Derives heading directly from platform-fused rotation vectors
///
/// No smoothing is applied; the platform sensor already fuses internally.
/// Only samples from the source sensor selected at session start are
/// accepted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RotationVectorFuser {
    source: SensorKind,
}

impl RotationVectorFuser {
    pub(crate) fn new(source: SensorKind) -> Self {
        Self { source }
    }

    pub(crate) fn source(&self) -> SensorKind {
        self.source
    }

    fn ingest(
        &mut self,
        kind: SensorKind,
        values: &[f32],
    ) -> Result<Option<Candidate>, SampleError> {
        if kind != self.source {
            return Err(SampleError::UnexpectedSensor(kind));
        }

        let rotation = orientation::rotation_from_vector(values)?;
        let OrientationAngles { azimuth, roll, .. } = orientation::orientation_angles(&rotation);

        let heading = wrap_degrees(azimuth * RAD_TO_DEG);
        // Subtracting roll compensates the heading for device tilt when the
        // reading drives a camera/AR overlay.
        let camera_heading = wrap_degrees((azimuth - roll) * RAD_TO_DEG);

        Ok(Some(Candidate {
            heading,
            camera_heading,
        }))
    }
}

/// Fuses low-pass filtered accelerometer and magnetometer samples
///
/// Both estimates are smoothed with the same history weight; a rotation
/// matrix is derived after every sample of either kind, so the heading
/// tracks whichever feed updated last.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AccelMagFuser {
    gravity: LowPass,
    geomagnetic: LowPass,
}

impl AccelMagFuser {
    pub(crate) fn new(alpha: f32) -> Self {
        Self {
            gravity: LowPass::new(alpha),
            geomagnetic: LowPass::new(alpha),
        }
    }

    fn ingest(
        &mut self,
        kind: SensorKind,
        values: &[f32],
    ) -> Result<Option<Candidate>, SampleError> {
        let raw = tri_axis(values)?;
        match kind {
            SensorKind::Accelerometer => {
                self.gravity.update(raw);
            }
            SensorKind::Magnetometer => {
                self.geomagnetic.update(raw);
            }
            other => return Err(SampleError::UnexpectedSensor(other)),
        }

        let Some((rotation, _inclination)) =
            orientation::rotation_and_inclination(self.gravity.value(), self.geomagnetic.value())
        else {
            // Degenerate estimate pair: skip this cycle, keep the smoothed
            // state for the next sample.
            return Ok(None);
        };

        let OrientationAngles { azimuth, .. } = orientation::orientation_angles(&rotation);
        let heading = wrap_degrees(azimuth * RAD_TO_DEG);

        // No tilt compensation in this mode; the camera heading mirrors the
        // magnetic heading.
        Ok(Some(Candidate {
            heading,
            camera_heading: heading,
        }))
    }
}

/// Validate a raw tri-axis sample
fn tri_axis(values: &[f32]) -> Result<Vector3<f32>, SampleError> {
    match *values {
        [x, y, z] if x.is_finite() && y.is_finite() && z.is_finite() => Ok(Vector3::new(x, y, z)),
        [_, _, _] => Err(SampleError::NonFinite),
        _ => Err(SampleError::WrongLength(values.len())),
    }
}
