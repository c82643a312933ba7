//! Compass session lifecycle: capability-driven strategy selection and
//! per-sample dispatch
//!
//! A session owns all mutable heading state, so independent sessions never
//! interfere. Raw samples and accuracy notifications are expected on a
//! serialized callback stream; every update method takes `&mut self`, which
//! makes the gate's read-compare-write atomic by construction. A host that
//! delivers callbacks concurrently must serialize access itself, e.g. by
//! wrapping the session in a mutex.

use log::{debug, info};

use crate::fuser::{AccelMagFuser, Fuser, RotationVectorFuser};
use crate::gate::ChangeGate;
use crate::types::{
    AccuracyLevel, CompassReading, CompassSettings, FusionMode, SamplingRate, SensorKind,
};

/// Capability and registration seam to the platform sensor stack
///
/// The core never talks to an operating system directly; platform glue
/// implements this trait and forwards raw samples into
/// [`CompassSession::handle_sample`] and accuracy notifications into
/// [`CompassSession::handle_accuracy`].
pub trait SensorHost {
    /// Whether the platform exposes a default sensor of the given kind
    fn has_sensor(&self, kind: SensorKind) -> bool;

    /// Subscribe to raw samples of `kind` at the given rate hint
    fn register(&mut self, kind: SensorKind, rate: SamplingRate);

    /// Cancel a previous [`register`](SensorHost::register) for `kind`
    fn unregister(&mut self, kind: SensorKind);
}

/// Fusion source chosen by the strategy selector
enum Selection {
    RotationVector(SensorKind),
    AccelerometerMagnetometer,
    Unavailable,
}

/// Probe capabilities in priority order: platform-fused rotation vectors
/// are preferred over raw accelerometer + magnetometer fusion.
fn select_source<H: SensorHost>(host: &H) -> Selection {
    if host.has_sensor(SensorKind::RotationVector) {
        Selection::RotationVector(SensorKind::RotationVector)
    } else if host.has_sensor(SensorKind::GeomagneticRotationVector) {
        Selection::RotationVector(SensorKind::GeomagneticRotationVector)
    } else if host.has_sensor(SensorKind::Accelerometer)
        && host.has_sensor(SensorKind::Magnetometer)
    {
        Selection::AccelerometerMagnetometer
    } else {
        Selection::Unavailable
    }
}

/// A single compass subscription
///
/// Created idle; [`start`](Self::start) fixes the fusion mode and registers
/// the raw feeds, [`handle_sample`](Self::handle_sample) turns raw samples
/// into gated readings, [`stop`](Self::stop) deregisters everything and
/// clears the session state.
///
/// # Example
/// ```
/// use fusion_compass::{CompassSession, FusionMode, SamplingRate, SensorHost, SensorKind};
///
/// struct NoSensors;
/// impl SensorHost for NoSensors {
///     fn has_sensor(&self, _kind: SensorKind) -> bool { false }
///     fn register(&mut self, _kind: SensorKind, _rate: SamplingRate) {}
///     fn unregister(&mut self, _kind: SensorKind) {}
/// }
///
/// let mut session = CompassSession::new(NoSensors);
/// assert_eq!(session.start(), FusionMode::Unavailable);
/// assert!(session.take_unavailable());
/// assert!(!session.take_unavailable()); // signalled exactly once
/// ```
pub struct CompassSession<H: SensorHost> {
    host: H,
    settings: CompassSettings,
    /// Mode fixed by `start`; `None` while idle
    mode: Option<FusionMode>,
    fuser: Option<Fuser>,
    gate: ChangeGate,
    accuracy: AccuracyLevel,
    unavailable_pending: bool,
}

impl<H: SensorHost> CompassSession<H> {
    /// Create an idle session with default settings
    pub fn new(host: H) -> Self {
        Self::with_settings(host, CompassSettings::default())
    }

    /// Create an idle session with the given settings
    pub fn with_settings(host: H, settings: CompassSettings) -> Self {
        Self {
            host,
            settings,
            mode: None,
            fuser: None,
            gate: ChangeGate::new(settings.filter_threshold),
            accuracy: AccuracyLevel::default(),
            unavailable_pending: false,
        }
    }

    /// Fix the fusion mode from the host's capabilities and register the
    /// raw feeds
    ///
    /// The mode is decided exactly once per session; calling `start` again
    /// returns the decided mode without touching registrations. When no
    /// usable sensor pair exists the session registers nothing and queues
    /// the terminal signal for [`take_unavailable`](Self::take_unavailable).
    pub fn start(&mut self) -> FusionMode {
        if let Some(mode) = self.mode {
            debug!("start called on an active session, keeping {mode:?}");
            return mode;
        }

        let mode = match select_source(&self.host) {
            Selection::RotationVector(source) => {
                self.host.register(source, self.settings.sampling_rate);
                self.fuser = Some(Fuser::RotationVector(RotationVectorFuser::new(source)));
                info!("compass session started in rotation-vector mode, source {source:?}");
                FusionMode::RotationVector
            }
            Selection::AccelerometerMagnetometer => {
                self.host
                    .register(SensorKind::Accelerometer, self.settings.sampling_rate);
                self.host
                    .register(SensorKind::Magnetometer, self.settings.sampling_rate);
                self.fuser = Some(Fuser::AccelerometerMagnetometer(AccelMagFuser::new(
                    self.settings.smoothing_alpha,
                )));
                info!("compass session started in accelerometer/magnetometer mode");
                FusionMode::AccelerometerMagnetometer
            }
            Selection::Unavailable => {
                self.unavailable_pending = true;
                info!("no usable heading sensors, compass unavailable");
                FusionMode::Unavailable
            }
        };

        self.mode = Some(mode);
        mode
    }

    /// Terminal "no sensor available" marker
    ///
    /// True exactly once after [`start`](Self::start) returned
    /// [`FusionMode::Unavailable`], so platform glue forwards a single
    /// null-equivalent event to the consumer.
    pub fn take_unavailable(&mut self) -> bool {
        core::mem::take(&mut self.unavailable_pending)
    }

    /// Feed one raw sample
    ///
    /// Returns a reading when the candidate heading clears the change gate.
    /// Malformed samples, samples from sensors the active mode does not
    /// consume, and degenerate-geometry cycles are logged and swallowed; the
    /// session never propagates them.
    pub fn handle_sample(&mut self, kind: SensorKind, values: &[f32]) -> Option<CompassReading> {
        let fuser = self.fuser.as_mut()?;

        let candidate = match fuser.ingest(kind, values) {
            Ok(Some(candidate)) => candidate,
            Ok(None) => {
                debug!("degenerate sensor geometry, skipping emission cycle");
                return None;
            }
            Err(err) => {
                debug!("ignoring raw {kind:?} sample: {err}");
                return None;
            }
        };

        if !self.gate.admit(candidate.heading) {
            return None;
        }

        Some(CompassReading {
            heading: candidate.heading,
            camera_heading: candidate.camera_heading,
            accuracy_degrees: self.accuracy.cone_degrees(),
            mode: fuser.mode(),
        })
    }

    /// Record an accuracy-changed notification
    ///
    /// Last write wins; the value is read at the next emission. Accuracy
    /// updates are not synchronized with heading updates, so a reading may
    /// carry a bucket that is stale by one notification.
    pub fn handle_accuracy(&mut self, kind: SensorKind, level: AccuracyLevel) {
        if self.fuser.is_none() {
            return;
        }
        if self.accuracy != level {
            debug!("{kind:?} accuracy changed to {level:?}");
        }
        self.accuracy = level;
    }

    /// Deregister every raw feed and clear the session state
    ///
    /// All feeds are deregistered before this returns; no reading is emitted
    /// afterwards. A later [`start`](Self::start) begins a fresh session
    /// with a fresh mode decision.
    pub fn stop(&mut self) {
        match self.fuser.take() {
            Some(Fuser::RotationVector(fuser)) => self.host.unregister(fuser.source()),
            Some(Fuser::AccelerometerMagnetometer(_)) => {
                self.host.unregister(SensorKind::Accelerometer);
                self.host.unregister(SensorKind::Magnetometer);
            }
            None => {}
        }

        if self.mode.take().is_some() {
            info!("compass session stopped");
        }
        self.gate = ChangeGate::new(self.settings.filter_threshold);
        self.accuracy = AccuracyLevel::default();
        self.unavailable_pending = false;
    }

    /// Mode fixed by [`start`](Self::start), if the session was started
    pub fn mode(&self) -> Option<FusionMode> {
        self.mode
    }

    /// Session settings
    pub fn settings(&self) -> CompassSettings {
        self.settings
    }

    /// The platform host this session drives
    pub fn host(&self) -> &H {
        &self.host
    }
}
