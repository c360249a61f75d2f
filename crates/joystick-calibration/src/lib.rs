//! Joystick axis calibration
//!
//! This crate owns the calibration side of the joystick controller:
//!
//! - [`AxisCalibration`]: zero offset, dead-zone and saturation bounds for a
//!   single logical axis, plus the transform from a raw reading to a
//!   normalized value in `[-100, 100]`.
//! - [`DeviceCalibration`]: one [`AxisCalibration`] per [`LogicalAxis`].
//! - [`CalibrationStore`]: fixed pool of device slots holding the records.
//! - [`AxisCalibrator`]: derives an [`AxisCalibration`] from recorded samples.
//!
//! # Example
//!
//! ```
//! use joystick_calibration::{AxisCalibration, CalibrationField};
//!
//! let mut calib = AxisCalibration::default();
//! calib.set(CalibrationField::MinPositive, 10.0);
//!
//! // Inside the dead zone
//! assert!(calib.apply(5.0).abs() < f32::EPSILON);
//! // Full deflection still saturates at 100
//! assert!((calib.apply(100.0) - 100.0).abs() < 1e-4);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod joystick;
pub mod store;
pub mod types;

pub use joystick::*;
pub use store::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("Device {0} has no calibration record")]
    DeviceNotFound(usize),

    #[error("Device index {device} is outside the pool of {pool} slots")]
    InvalidDevice { device: usize, pool: usize },

    #[error("Degenerate calibration: {side} range has zero width")]
    DegenerateCalibration { side: AxisSide },

    #[error("Unsupported calibration version {0}: maximum supported is {1}")]
    UnsupportedVersion(u32, u32),

    #[error("Calibration not complete")]
    NotComplete,
}

pub type CalibrationResult<T> = Result<T, CalibrationError>;
