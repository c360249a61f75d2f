//! Device backend abstraction for the joystick controller
//!
//! The controller never talks to an OS input API directly. Enumeration,
//! button and axis presence, and raw polling go through a
//! [`JoystickBackend`], which the caller injects. [`mock::MockJoystickBackend`]
//! is an in-memory implementation for tests and host prototyping.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod backend;
pub mod device_info;

pub use backend::*;
pub use device_info::*;

use thiserror::Error;

/// Number of joystick slots most platform input layers expose.
pub const MAX_JOYSTICKS: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Joystick {0} not found")]
    DeviceNotFound(usize),

    #[error("Joystick {0} disconnected")]
    Disconnected(usize),
}

pub type BackendResult<T> = Result<T, BackendError>;
