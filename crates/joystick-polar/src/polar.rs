//! Direction and strength of an axis pair.

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Converts a magnitude in axis units (`±100` full scale) to `[0, 1]`.
pub const STRENGTH_SCALE: f32 = 0.01;

/// A pair of axis values, raw or calibrated.
///
/// `y` follows the joystick convention: negative is up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position2d {
    pub x: f32,
    pub y: f32,
}

impl Position2d {
    pub const ZERO: Position2d = Position2d { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Negates the components selected by `inversion`.
    pub fn inverted(self, inversion: Inversion) -> Self {
        Self {
            x: if inversion.x { -self.x } else { self.x },
            y: if inversion.y { -self.y } else { self.y },
        }
    }

    pub fn direction(self) -> f32 {
        direction(self.x, self.y)
    }

    pub fn heading(self) -> f32 {
        heading(self.x, self.y)
    }

    pub fn strength(self) -> f32 {
        strength(self.x, self.y)
    }
}

impl From<(f32, f32)> for Position2d {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Per-axis sign inversion applied before deriving direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Inversion {
    pub x: bool,
    pub y: bool,
}

impl Inversion {
    pub const NONE: Inversion = Inversion { x: false, y: false };
    pub const X: Inversion = Inversion { x: true, y: false };
    pub const Y: Inversion = Inversion { x: false, y: true };
    pub const BOTH: Inversion = Inversion { x: true, y: true };

    pub const fn new(x: bool, y: bool) -> Self {
        Self { x, y }
    }
}

/// Angle of the pair in radians, `atan2(x, -y) - π/2`.
///
/// Right is 0 and angles grow clockwise (up is `-π/2`, down is `π/2`). The
/// result lies in `(-3π/2, π/2]` and is not normalized further.
#[inline]
pub fn direction(x: f32, y: f32) -> f32 {
    x.atan2(-y) - FRAC_PI_2
}

/// [`direction`] rotated by a quarter turn so that up is 0.
#[inline]
pub fn heading(x: f32, y: f32) -> f32 {
    direction(x, y) + FRAC_PI_2
}

/// Magnitude of the pair scaled to `[0, 1]`.
///
/// A full deflection along one axis reaches 1; diagonals (up to `√2`)
/// saturate at 1. NaN components read as no deflection.
#[inline]
pub fn strength(x: f32, y: f32) -> f32 {
    let magnitude = x.hypot(y) * STRENGTH_SCALE;
    if magnitude.is_nan() {
        return 0.0;
    }
    magnitude.clamp(0.0, 1.0)
}
