//! Polar derivation for joystick axis pairs
//!
//! Stateless functions that combine two calibrated axis values (each in
//! `[-100, 100]`) into polar quantities, and quantize those into discrete
//! buckets.
//!
//! # Overview
//!
//! - **Direction**: `atan2(x, -y) - π/2` radians; right is 0 and angles grow
//!   clockwise, so straight up is `-π/2`.
//! - **Heading**: direction plus a quarter turn; straight up is 0.
//! - **Strength**: Euclidean magnitude scaled to `[0, 1]`, saturating on the
//!   diagonals.
//! - **Direction index**: heading bucketed into evenly spaced segments,
//!   segment 0 centered on north, proceeding clockwise.
//! - **Strength index**: strength bucketed into evenly spaced steps.
//! - **POV hat**: an 8-way hat code (`-1` centered, `0..=7` clockwise from
//!   north) emulated from the analog pair.
//!
//! # Example
//!
//! ```
//! use joystick_polar::{Inversion, Position2d, direction_index, pov_hat};
//!
//! let up = Position2d::new(0.0, -100.0);
//! assert!((up.strength() - 1.0).abs() < f32::EPSILON);
//! assert_eq!(direction_index(up.direction(), 8)?, 0);
//! assert_eq!(pov_hat(up, Inversion::NONE), 0);
//!
//! assert_eq!(pov_hat(Position2d::ZERO, Inversion::NONE), -1);
//! # Ok::<(), joystick_polar::PolarError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod polar;
pub mod prelude;
pub mod quantize;

pub use error::{PolarError, PolarResult};
pub use polar::{Inversion, Position2d, STRENGTH_SCALE, direction, heading, strength};
pub use quantize::{
    HatDirection, POV_HAT_CENTERED, POV_HAT_SEGMENTS, direction_index, heading_index,
    pov_hat, pov_hat_direction, strength_index,
};
