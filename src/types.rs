//! Core types and settings for the Fusion Compass library

use thiserror::Error;

/// Raw sensor kinds the platform sensor stack can expose
///
/// `RotationVector` and `GeomagneticRotationVector` deliver platform-fused
/// orientation vectors; `Accelerometer` and `Magnetometer` deliver raw
/// tri-axis samples that this crate fuses itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Raw tri-axis accelerometer (m/s², includes gravity)
    Accelerometer,
    /// Raw tri-axis magnetometer (µT)
    Magnetometer,
    /// Platform-fused rotation vector
    RotationVector,
    /// Rotation vector fused without the gyroscope
    GeomagneticRotationVector,
}

/// Fusion strategy fixed once at session start
///
/// The strategy selector probes the host's capabilities in priority order
/// and the mode never changes for the lifetime of the session. Each emitted
/// [`CompassReading`] is tagged with the mode that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionMode {
    /// Heading derived from a platform-fused rotation vector
    RotationVector,
    /// Heading derived from low-pass filtered accelerometer + magnetometer
    AccelerometerMagnetometer,
    /// No usable sensor pair; the session emits a single terminal signal
    Unavailable,
}

/// Coarse confidence bucket reported by the platform sensor stack
///
/// Updated asynchronously through accuracy-changed notifications,
/// independently of heading updates; the value read at emission time may be
/// stale by one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccuracyLevel {
    /// Sensor is well calibrated
    High,
    /// Usable but degraded calibration
    Medium,
    /// Poor calibration, heading may drift
    Low,
    /// No accuracy report received
    #[default]
    Unknown,
}

impl AccuracyLevel {
    /// Map the bucket to the reported confidence cone half-angle in degrees
    ///
    /// These are fixed calibration placeholders, not measured error. An
    /// unknown bucket reports `-1.0`.
    ///
    /// # Example
    /// ```
    /// use fusion_compass::AccuracyLevel;
    ///
    /// assert_eq!(AccuracyLevel::High.cone_degrees(), 15.0);
    /// assert_eq!(AccuracyLevel::Medium.cone_degrees(), 30.0);
    /// assert_eq!(AccuracyLevel::Low.cone_degrees(), 45.0);
    /// assert_eq!(AccuracyLevel::Unknown.cone_degrees(), -1.0);
    /// ```
    pub fn cone_degrees(self) -> f32 {
        match self {
            AccuracyLevel::High => 15.0,
            AccuracyLevel::Medium => 30.0,
            AccuracyLevel::Low => 45.0,
            AccuracyLevel::Unknown => -1.0,
        }
    }
}

/// Sampling rate hint forwarded to [`SensorHost::register`](crate::SensorHost::register)
///
/// Mirrors the platform's standard delay buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingRate {
    /// As fast as the hardware can deliver
    Fastest,
    /// Suitable for games and live compasses (~50 Hz)
    #[default]
    Game,
    /// Suitable for user interface updates (~15 Hz)
    Ui,
    /// Default rate for orientation changes (~5 Hz)
    Normal,
}

impl SamplingRate {
    /// Requested sampling interval in microseconds
    pub fn interval_us(self) -> u32 {
        match self {
            SamplingRate::Fastest => 0,
            SamplingRate::Game => 20_000,
            SamplingRate::Ui => 66_667,
            SamplingRate::Normal => 200_000,
        }
    }
}

/// Compass session settings
///
/// # Example
/// ```
/// use fusion_compass::CompassSettings;
///
/// let settings = CompassSettings {
///     filter_threshold: 1.0, // only emit on whole-degree movement
///     ..Default::default()
/// };
/// assert_eq!(settings.smoothing_alpha, 0.97);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CompassSettings {
    /// Minimum heading movement in degrees required to emit a new reading
    ///
    /// Candidates closer than this to the last emitted heading are
    /// suppressed, preventing emission storms from sensor jitter.
    pub filter_threshold: f32,
    /// History weight of the accelerometer/magnetometer low-pass filter
    ///
    /// Each raw sample contributes `1 - alpha` to the smoothed estimate.
    /// Heavier weight on history suppresses linear-acceleration noise.
    pub smoothing_alpha: f32,
    /// Rate hint passed to the host when registering raw feeds
    pub sampling_rate: SamplingRate,
}

impl Default for CompassSettings {
    fn default() -> Self {
        Self {
            filter_threshold: 0.1,
            smoothing_alpha: 0.97,
            sampling_rate: SamplingRate::default(),
        }
    }
}

/// A gated compass emission
///
/// Immutable once constructed; readings are emitted, never stored by the
/// session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompassReading {
    /// Magnetic heading in degrees clockwise from north, `[0, 360)`
    pub heading: f32,
    /// Heading compensated for device roll, for camera/AR overlays
    ///
    /// Mirrors `heading` in accelerometer/magnetometer mode.
    pub camera_heading: f32,
    /// Confidence cone half-angle: 15, 30, 45, or -1 when unknown
    pub accuracy_degrees: f32,
    /// Fusion strategy that produced this reading
    pub mode: FusionMode,
}

/// Why a raw sample was rejected
///
/// Rejections are logged and swallowed by the session; the sample source is
/// a trusted platform layer, so a malformed sample skips one cycle and is
/// never surfaced to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SampleError {
    /// Unsupported component count for the sample's sensor kind
    #[error("unsupported component count {0}")]
    WrongLength(usize),
    /// A component was NaN or infinite
    #[error("non-finite component in raw sample")]
    NonFinite,
    /// Rotation vector too close to zero to define an orientation
    #[error("rotation vector has no usable direction")]
    ZeroRotation,
    /// Sample from a sensor the active mode does not consume
    #[error("sample from unselected sensor {0:?}")]
    UnexpectedSensor(SensorKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_mapping_is_pure() {
        // The mapping must not depend on call order or prior values.
        for _ in 0..3 {
            assert_eq!(AccuracyLevel::High.cone_degrees(), 15.0);
            assert_eq!(AccuracyLevel::Medium.cone_degrees(), 30.0);
            assert_eq!(AccuracyLevel::Low.cone_degrees(), 45.0);
            assert_eq!(AccuracyLevel::Unknown.cone_degrees(), -1.0);
        }
    }

    #[test]
    fn test_accuracy_default_is_unknown() {
        assert_eq!(AccuracyLevel::default(), AccuracyLevel::Unknown);
        assert_eq!(AccuracyLevel::default().cone_degrees(), -1.0);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = CompassSettings::default();
        assert_eq!(settings.filter_threshold, 0.1);
        assert_eq!(settings.smoothing_alpha, 0.97);
        assert_eq!(settings.sampling_rate, SamplingRate::Game);
    }

    #[test]
    fn test_sampling_rate_intervals_ordered() {
        assert_eq!(SamplingRate::Fastest.interval_us(), 0);
        assert!(SamplingRate::Game.interval_us() < SamplingRate::Ui.interval_us());
        assert!(SamplingRate::Ui.interval_us() < SamplingRate::Normal.interval_us());
    }
}
