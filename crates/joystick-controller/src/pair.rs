//! Named axis pairings.

use joystick_calibration::LogicalAxis;
use serde::{Deserialize, Serialize};

/// The stick pairs found on common gamepads.
///
/// Other combinations go through the `*_custom` controller calls, which
/// take the two axes explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisPair {
    /// Left stick.
    XY,
    /// Right stick.
    UV,
    /// D-pad reported as two axes.
    PovXY,
}

impl AxisPair {
    pub const ALL: [AxisPair; 3] = [AxisPair::XY, AxisPair::UV, AxisPair::PovXY];

    /// The `(x, y)` axes of the pair.
    pub const fn axes(self) -> (LogicalAxis, LogicalAxis) {
        match self {
            AxisPair::XY => (LogicalAxis::X, LogicalAxis::Y),
            AxisPair::UV => (LogicalAxis::U, LogicalAxis::V),
            AxisPair::PovXY => (LogicalAxis::PovX, LogicalAxis::PovY),
        }
    }
}
