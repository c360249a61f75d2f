//! Calibrated joystick access
//!
//! [`JoystickController`] sits between an input layer ([`JoystickBackend`])
//! and application code. It discovers connected joysticks, keeps a
//! calibration record per device, and turns raw axis readings into
//! calibrated values and 2D polar quantities: direction, strength, bucketed
//! indices and an emulated 8-way POV hat.
//!
//! The numeric pieces live in their own crates and are re-exported here:
//!
//! - [`joystick_calibration`]: calibration records and the single-axis
//!   transform.
//! - [`joystick_polar`]: direction/strength derivation and quantization.
//! - [`joystick_backend`]: the backend trait and an in-memory mock.
//!
//! The controller installs no tracing subscriber; it only emits events.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod controller;
pub mod error;
pub mod pair;

pub use config::{ControllerConfig, ControllerConfigBuilder, MAX_DEVICE_POOL};
pub use controller::{DiscoveryReport, JoystickController};
pub use error::{ControllerError, ControllerResult};
pub use pair::AxisPair;

pub use joystick_backend::{self, JoystickBackend, JoystickInfo};
pub use joystick_calibration::{
    self, AxisCalibration, AxisCalibrator, CalibrationField, DeviceCalibration, LogicalAxis,
};
pub use joystick_polar::{self, HatDirection, Inversion, Position2d};
