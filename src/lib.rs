#![no_std]

//! [![github]](https://github.com/wboayue/fusion-compass)&ensp;[![crates-io]](https://crates.io/crates/fusion-compass)&ensp;[![license]](https://opensource.org/licenses/MIT)
//!
//! [github]: https://img.shields.io/badge/github-8da0cb?style=for-the-badge&labelColor=555555&logo=github
//! [crates-io]: https://img.shields.io/badge/crates.io-fc8d62?style=for-the-badge&labelColor=555555&logo=rust
//! [license]: https://img.shields.io/badge/License-MIT-blue.svg?style=for-the-badge&labelColor=555555
//!
//! Fusion Compass - magnetic heading from raw motion-sensor samples
//!
//! This library fuses noisy, high-frequency motion-sensor samples into a
//! stable magnetic heading, emitted as gated compass readings. At session
//! start it probes the host's sensor capabilities once and fixes one of two
//! fusion strategies: heading extracted from a platform-fused rotation
//! vector, or heading derived from low-pass filtered accelerometer and
//! magnetometer samples. A change gate suppresses emissions that moved less
//! than a configurable threshold, and platform accuracy notifications are
//! mapped to a coarse confidence value carried on every reading.
//!
//! # Features
//!
//! - Capability-driven strategy selection with rotation-vector preference
//! - Exponential low-pass smoothing of raw accelerometer/magnetometer feeds
//! - Hysteresis gating against emission storms from sensor jitter
//! - Roll-compensated secondary heading for camera/AR overlays
//! - Confidence bucket mapping from platform accuracy notifications
//! - `#![no_std]` compatible for embedded and mobile targets
//!
//! # Quick Start
//!
//! ```rust
//! use fusion_compass::{CompassSession, FusionMode, SamplingRate, SensorHost, SensorKind};
//!
//! // Platform glue implements SensorHost; this stub offers a rotation vector.
//! struct Host;
//! impl SensorHost for Host {
//!     fn has_sensor(&self, kind: SensorKind) -> bool {
//!         kind == SensorKind::RotationVector
//!     }
//!     fn register(&mut self, _kind: SensorKind, _rate: SamplingRate) {}
//!     fn unregister(&mut self, _kind: SensorKind) {}
//! }
//!
//! let mut session = CompassSession::new(Host);
//! assert_eq!(session.start(), FusionMode::RotationVector);
//!
//! // One platform rotation-vector sample [x, y, z, w]: a quarter turn east.
//! let sample = [0.0, 0.0, -core::f32::consts::FRAC_1_SQRT_2, core::f32::consts::FRAC_1_SQRT_2];
//! let reading = session
//!     .handle_sample(SensorKind::RotationVector, &sample)
//!     .expect("first candidate always clears the gate");
//!
//! assert!((reading.heading - 90.0).abs() < 0.01);
//! session.stop();
//! ```
//!
//! For more documentation and examples, see: <https://github.com/wboayue/fusion-compass>

mod fuser;
mod gate;
mod math;
pub mod orientation;
mod session;
mod smoothing;
mod types;

// Re-export all public types and functions
pub use math::{DEG_TO_RAD, RAD_TO_DEG, Vector3Ext, wrap_degrees};
pub use orientation::{
    OrientationAngles, orientation_angles, rotation_and_inclination, rotation_from_vector,
};
pub use session::{CompassSession, SensorHost};
pub use types::*;
