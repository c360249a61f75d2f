//! Prelude for the polar crate.
//!
//! This module re-exports the most commonly used types and functions.
//!
//! # Example
//!
//! ```
//! use joystick_polar::prelude::*;
//!
//! let right = Position2d::new(100.0, 0.0);
//! assert_eq!(pov_hat_direction(right, Inversion::NONE), HatDirection::Right);
//! ```

pub use crate::error::{PolarError, PolarResult};
pub use crate::polar::{Inversion, Position2d};
pub use crate::quantize::{
    HatDirection, direction_index, pov_hat, pov_hat_direction, strength_index,
};
