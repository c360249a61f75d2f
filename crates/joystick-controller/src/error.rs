//! Controller error type.

use joystick_backend::BackendError;
use joystick_calibration::CalibrationError;
use joystick_polar::PolarError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Quantization error: {0}")]
    Polar(#[from] PolarError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ControllerResult<T> = Result<T, ControllerError>;
