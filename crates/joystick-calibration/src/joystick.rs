//! Sample-driven joystick axis calibration
//!
//! A calibration wizard records the axis while the stick is released (rest
//! samples) and while the user sweeps it through its full travel (travel
//! samples). [`AxisCalibrator::calibrate`] turns those into an
//! [`AxisCalibration`] that maps the rest position to 0, a dead zone around
//! it to 0, and the observed extremes to ±100.

use crate::{AxisCalibration, AxisSide, CalibrationError, CalibrationResult, LogicalAxis};

#[derive(Debug, Clone)]
pub struct AxisCalibrator {
    axis: LogicalAxis,
    rest: Vec<f32>,
    travel: Vec<f32>,
}

impl AxisCalibrator {
    pub fn new(axis: LogicalAxis) -> Self {
        Self {
            axis,
            rest: Vec::new(),
            travel: Vec::new(),
        }
    }

    pub fn axis(&self) -> LogicalAxis {
        self.axis
    }

    /// Records a reading taken with the stick released. Non-finite readings
    /// are ignored.
    pub fn add_rest_sample(&mut self, raw: f32) {
        if raw.is_finite() {
            self.rest.push(raw);
        }
    }

    /// Records a reading taken while sweeping the stick. Non-finite readings
    /// are ignored.
    pub fn add_travel_sample(&mut self, raw: f32) {
        if raw.is_finite() {
            self.travel.push(raw);
        }
    }

    pub fn rest_sample_count(&self) -> usize {
        self.rest.len()
    }

    pub fn travel_sample_count(&self) -> usize {
        self.travel.len()
    }

    /// Derives a calibration with a dead zone of `dead_zone` raw units on
    /// each side of the rest position.
    ///
    /// Negative bounds are stored with the doubled zero offset the transform
    /// expects (`min_negative' = min_negative + zero`).
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::NotComplete`] if either sample set is
    /// empty, or [`CalibrationError::DegenerateCalibration`] if the observed
    /// travel on a side does not extend past the dead zone.
    pub fn calibrate(&self, dead_zone: f32) -> CalibrationResult<AxisCalibration> {
        if self.rest.is_empty() || self.travel.is_empty() {
            return Err(CalibrationError::NotComplete);
        }

        let zero = self.rest.iter().sum::<f32>() / self.rest.len() as f32;
        let dead_zone = if dead_zone.is_finite() {
            dead_zone.abs()
        } else {
            0.0
        };

        let travel_max = self.travel.iter().copied().fold(zero, f32::max);
        let travel_min = self.travel.iter().copied().fold(zero, f32::min);

        if travel_max - zero <= dead_zone {
            return Err(CalibrationError::DegenerateCalibration {
                side: AxisSide::Positive,
            });
        }
        if zero - travel_min <= dead_zone {
            return Err(CalibrationError::DegenerateCalibration {
                side: AxisSide::Negative,
            });
        }

        Ok(AxisCalibration {
            zero,
            min_positive: zero + dead_zone,
            max_positive: travel_max,
            min_negative: -dead_zone - zero,
            max_negative: travel_min - 2.0 * zero,
        })
    }

    pub fn reset(&mut self) {
        self.rest.clear();
        self.travel.clear();
    }
}

/// One-shot helper around [`AxisCalibrator`].
///
/// # Errors
///
/// See [`AxisCalibrator::calibrate`].
pub fn calibrate_joystick_axis(
    axis: LogicalAxis,
    rest: &[f32],
    travel: &[f32],
    dead_zone: f32,
) -> CalibrationResult<AxisCalibration> {
    let mut calibrator = AxisCalibrator::new(axis);
    for raw in rest {
        calibrator.add_rest_sample(*raw);
    }
    for raw in travel {
        calibrator.add_travel_sample(*raw);
    }
    calibrator.calibrate(dead_zone)
}
