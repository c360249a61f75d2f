//! Calibration type definitions

use crate::{CalibrationError, CalibrationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current [`DeviceCalibration`] schema version.
/// Increment this when the record layout changes incompatibly.
pub const CURRENT_CALIBRATION_VERSION: u32 = 1;

/// Magnitude of a fully deflected axis, both for raw readings and for
/// calibrated output.
pub const AXIS_RANGE: f32 = 100.0;

/// Backend-independent name of a joystick axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalAxis {
    X,
    Y,
    U,
    V,
    Z,
    R,
    PovX,
    PovY,
}

impl LogicalAxis {
    pub const COUNT: usize = 8;

    pub const ALL: [LogicalAxis; Self::COUNT] = [
        LogicalAxis::X,
        LogicalAxis::Y,
        LogicalAxis::U,
        LogicalAxis::V,
        LogicalAxis::Z,
        LogicalAxis::R,
        LogicalAxis::PovX,
        LogicalAxis::PovY,
    ];

    /// Position of this axis in [`LogicalAxis::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            LogicalAxis::X => "x",
            LogicalAxis::Y => "y",
            LogicalAxis::U => "u",
            LogicalAxis::V => "v",
            LogicalAxis::Z => "z",
            LogicalAxis::R => "r",
            LogicalAxis::PovX => "pov_x",
            LogicalAxis::PovY => "pov_y",
        }
    }
}

impl fmt::Display for LogicalAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the five scalar parameters of an [`AxisCalibration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationField {
    Zero,
    MinPositive,
    MaxPositive,
    MinNegative,
    MaxNegative,
}

impl CalibrationField {
    pub const ALL: [CalibrationField; 5] = [
        CalibrationField::Zero,
        CalibrationField::MinPositive,
        CalibrationField::MaxPositive,
        CalibrationField::MinNegative,
        CalibrationField::MaxNegative,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CalibrationField::Zero => "zero",
            CalibrationField::MinPositive => "min_positive",
            CalibrationField::MaxPositive => "max_positive",
            CalibrationField::MinNegative => "min_negative",
            CalibrationField::MaxNegative => "max_negative",
        }
    }

    /// Parses a field from its snake_case name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for CalibrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Half of an axis' travel relative to its zero point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    Positive,
    Negative,
}

impl AxisSide {
    /// Output of a fully deflected axis on this side.
    pub fn saturated(self) -> f32 {
        match self {
            AxisSide::Positive => AXIS_RANGE,
            AxisSide::Negative => -AXIS_RANGE,
        }
    }
}

impl fmt::Display for AxisSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisSide::Positive => f.write_str("positive"),
            AxisSide::Negative => f.write_str("negative"),
        }
    }
}

/// Axis calibration data
///
/// Maps a raw reading (convention `[-100, 100]`) to a normalized value in
/// `[-100, 100]`. The reading is first offset by `zero`; on each side of the
/// zero point, deflection below the `min_*` bound is a dead zone and
/// deflection between `min_*` and `max_*` is rescaled to the full range.
///
/// The bounds are stored as set by the caller and are never reordered or
/// validated on write. Positive bounds are offset by `-zero` and negative
/// bounds by `+zero` before use.
///
/// # Examples
///
/// ```
/// use joystick_calibration::AxisCalibration;
///
/// let calib = AxisCalibration::default().with_positive(10.0, 90.0);
///
/// assert!(calib.apply(5.0).abs() < f32::EPSILON);
/// assert!((calib.apply(50.0) - 50.0).abs() < 1e-4);
/// assert!((calib.apply(95.0) - 100.0).abs() < f32::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisCalibration {
    /// Raw reading treated as the rest position.
    pub zero: f32,
    /// Positive dead-zone threshold.
    pub min_positive: f32,
    /// Positive saturation point.
    pub max_positive: f32,
    /// Negative dead-zone threshold.
    pub min_negative: f32,
    /// Negative saturation point.
    pub max_negative: f32,
}

impl Default for AxisCalibration {
    fn default() -> Self {
        Self {
            zero: 0.0,
            min_positive: 0.0,
            max_positive: AXIS_RANGE,
            min_negative: 0.0,
            max_negative: -AXIS_RANGE,
        }
    }
}

enum Scaled {
    Value(f32),
    Degenerate(AxisSide),
}

impl AxisCalibration {
    pub fn with_zero(mut self, zero: f32) -> Self {
        self.zero = zero;
        self
    }

    /// Sets the positive dead-zone threshold and saturation point.
    pub fn with_positive(mut self, min: f32, max: f32) -> Self {
        self.min_positive = min;
        self.max_positive = max;
        self
    }

    /// Sets the negative dead-zone threshold and saturation point.
    pub fn with_negative(mut self, min: f32, max: f32) -> Self {
        self.min_negative = min;
        self.max_negative = max;
        self
    }

    pub fn get(&self, field: CalibrationField) -> f32 {
        match field {
            CalibrationField::Zero => self.zero,
            CalibrationField::MinPositive => self.min_positive,
            CalibrationField::MaxPositive => self.max_positive,
            CalibrationField::MinNegative => self.min_negative,
            CalibrationField::MaxNegative => self.max_negative,
        }
    }

    /// Stores `value` verbatim; no ordering between fields is enforced.
    pub fn set(&mut self, field: CalibrationField, value: f32) {
        let slot = match field {
            CalibrationField::Zero => &mut self.zero,
            CalibrationField::MinPositive => &mut self.min_positive,
            CalibrationField::MaxPositive => &mut self.max_positive,
            CalibrationField::MinNegative => &mut self.min_negative,
            CalibrationField::MaxNegative => &mut self.max_negative,
        };
        *slot = value;
    }

    /// Looks a field up by its snake_case name.
    ///
    /// Unknown names read as `0.0` rather than failing, so partially written
    /// key/value calibration data still loads.
    pub fn get_by_name(&self, name: &str) -> f32 {
        CalibrationField::from_name(name).map_or(0.0, |field| self.get(field))
    }

    /// Width of the rescaling range on `side`, after the zero offset.
    pub fn range_width(&self, side: AxisSide) -> f32 {
        match side {
            AxisSide::Positive => {
                (self.max_positive - self.zero) - (self.min_positive - self.zero)
            }
            AxisSide::Negative => {
                (self.max_negative + self.zero) - (self.min_negative + self.zero)
            }
        }
    }

    /// Checks that both sides have a usable rescaling range.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::DegenerateCalibration`] naming the first
    /// side whose range has zero (or non-finite) width.
    pub fn validate(&self) -> CalibrationResult<()> {
        for side in [AxisSide::Positive, AxisSide::Negative] {
            let width = self.range_width(side);
            if !width.is_finite() || width.abs() <= 0.0 {
                return Err(CalibrationError::DegenerateCalibration { side });
            }
        }
        Ok(())
    }

    /// Converts a raw reading to a calibrated value in `[-100, 100]`.
    ///
    /// A side with a zero-width range acts as a switch: any deflection past
    /// its dead-zone threshold saturates to `±100`. Never returns NaN.
    pub fn apply(&self, raw: f32) -> f32 {
        match self.scale(raw) {
            Scaled::Value(value) => value,
            Scaled::Degenerate(side) => side.saturated(),
        }
    }

    /// Like [`apply`](Self::apply), but reports a zero-width range instead of
    /// saturating.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::DegenerateCalibration`] when the reading
    /// falls on a side whose range cannot be rescaled.
    pub fn try_apply(&self, raw: f32) -> CalibrationResult<f32> {
        match self.scale(raw) {
            Scaled::Value(value) => Ok(value),
            Scaled::Degenerate(side) => Err(CalibrationError::DegenerateCalibration { side }),
        }
    }

    fn scale(&self, raw: f32) -> Scaled {
        let n = raw - self.zero;

        let (offset, scale, width, side) = if n > 0.0 {
            let min = self.min_positive - self.zero;
            let max = self.max_positive - self.zero;
            if n < min {
                return Scaled::Value(0.0);
            }
            (n - min, AXIS_RANGE, max - min, AxisSide::Positive)
        } else if n < 0.0 {
            let min = self.min_negative + self.zero;
            let max = self.max_negative + self.zero;
            if n > min {
                return Scaled::Value(0.0);
            }
            (n - min, -AXIS_RANGE, max - min, AxisSide::Negative)
        } else {
            // Exactly at rest, or NaN input.
            return Scaled::Value(0.0);
        };

        let value = offset * scale / width;
        if !value.is_finite() {
            return Scaled::Degenerate(side);
        }
        Scaled::Value(value.clamp(-AXIS_RANGE, AXIS_RANGE))
    }
}

/// Complete device calibration
///
/// Holds one [`AxisCalibration`] per [`LogicalAxis`], indexed by
/// [`LogicalAxis::index`], along with a schema version for records that
/// callers export and import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCalibration {
    /// Per-axis calibration data, in [`LogicalAxis::ALL`] order.
    pub axes: [AxisCalibration; LogicalAxis::COUNT],
    /// Schema version for forward-compatible serialization.
    pub version: u32,
}

impl Default for DeviceCalibration {
    fn default() -> Self {
        Self::with_defaults(AxisCalibration::default())
    }
}

impl DeviceCalibration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record with `defaults` on every axis.
    pub fn with_defaults(defaults: AxisCalibration) -> Self {
        Self {
            axes: [defaults; LogicalAxis::COUNT],
            version: CURRENT_CALIBRATION_VERSION,
        }
    }

    pub fn axis(&self, axis: LogicalAxis) -> &AxisCalibration {
        &self.axes[axis.index()]
    }

    pub fn axis_mut(&mut self, axis: LogicalAxis) -> &mut AxisCalibration {
        &mut self.axes[axis.index()]
    }

    pub fn field(&self, axis: LogicalAxis, field: CalibrationField) -> f32 {
        self.axis(axis).get(field)
    }

    pub fn set_field(&mut self, axis: LogicalAxis, field: CalibrationField, value: f32) {
        self.axis_mut(axis).set(field, value);
    }

    pub fn apply(&self, axis: LogicalAxis, raw: f32) -> f32 {
        self.axis(axis).apply(raw)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogicalAxis, &AxisCalibration)> {
        LogicalAxis::ALL.into_iter().zip(self.axes.iter())
    }

    /// Axes whose calibration fails [`AxisCalibration::validate`], with the
    /// offending side.
    pub fn degenerate_axes(&self) -> Vec<(LogicalAxis, AxisSide)> {
        self.iter()
            .filter_map(|(axis, calib)| match calib.validate() {
                Err(CalibrationError::DegenerateCalibration { side }) => Some((axis, side)),
                _ => None,
            })
            .collect()
    }
}
