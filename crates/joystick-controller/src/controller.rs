//! The joystick controller facade.

use crate::{AxisPair, ControllerConfig, ControllerResult};
use joystick_backend::{JoystickBackend, JoystickInfo};
use joystick_calibration::{
    AxisCalibration, AxisCalibrator, CalibrationField, CalibrationStore, DeviceCalibration,
    LogicalAxis,
};
use joystick_polar::{
    Inversion, Position2d, direction, direction_index, pov_hat, strength, strength_index,
};
use tracing::{debug, info, trace, warn};

/// Outcome of a discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Slots connected after the pass.
    pub connected: Vec<usize>,
    /// Slots that received a fresh calibration record.
    pub added: Vec<usize>,
    /// Slots whose device vanished and whose record was dropped.
    pub removed: Vec<usize>,
    /// Slots whose device vanished but whose record was kept.
    pub retained: Vec<usize>,
}

/// Calibrated access to the joysticks behind a [`JoystickBackend`].
///
/// Raw reads go straight to the backend. Calibrated reads and everything
/// derived from them (direction, strength, indices, POV hat) go through the
/// per-device calibration registered at discovery.
///
/// ```
/// use joystick_backend::JoystickInfo;
/// use joystick_backend::backend::mock::{MockJoystick, MockJoystickBackend};
/// use joystick_calibration::LogicalAxis;
/// use joystick_controller::{AxisPair, JoystickController};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut backend = MockJoystickBackend::new();
/// backend.attach(0, MockJoystick::gamepad(JoystickInfo::new(0x045e, 0x028e), 10))?;
/// backend.set_axis(0, LogicalAxis::Y, -100.0)?;
///
/// let controller = JoystickController::new(backend)?;
/// assert_eq!(controller.connected_indices(), vec![0]);
/// assert_eq!(controller.axis_2d_pov_hat(0, AxisPair::XY, Default::default())?, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct JoystickController<B: JoystickBackend> {
    backend: B,
    store: CalibrationStore,
    config: ControllerConfig,
}

impl<B: JoystickBackend> JoystickController<B> {
    /// Creates a controller with the default configuration and runs
    /// discovery once.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to refresh.
    pub fn new(backend: B) -> ControllerResult<Self> {
        Self::with_config(backend, ControllerConfig::default())
    }

    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidConfig`] for an invalid `config`,
    /// or a backend error if the first refresh fails.
    ///
    /// [`ControllerError::InvalidConfig`]: crate::ControllerError::InvalidConfig
    pub fn with_config(backend: B, config: ControllerConfig) -> ControllerResult<Self> {
        config.validate()?;
        let mut controller = Self {
            backend,
            store: CalibrationStore::with_defaults(
                config.max_devices,
                config.default_calibration,
            ),
            config,
        };
        controller.rediscover()?;
        Ok(controller)
    }

    /// Refreshes the backend and reconciles calibration records with the
    /// connected devices.
    ///
    /// Newly connected slots get a default record; records of already known
    /// slots are kept as they are. Records of vanished devices are dropped
    /// unless [`ControllerConfig::retain_stale_calibration`] is set.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the refresh fails; calibration is left
    /// untouched in that case.
    pub fn rediscover(&mut self) -> ControllerResult<DiscoveryReport> {
        self.backend.refresh()?;

        let mut report = DiscoveryReport::default();
        for device in 0..self.pool_size() {
            let connected = self.backend.is_connected(device);
            let registered = self.store.is_registered(device);

            if connected {
                report.connected.push(device);
                if !registered {
                    self.store.register(device)?;
                    report.added.push(device);
                    debug!(
                        "Registered joystick {}: {}",
                        device,
                        self.backend
                            .device_info(device)
                            .map_or_else(|| "unknown".to_string(), |i| i.display_name())
                    );
                }
            } else if registered {
                if self.config.retain_stale_calibration {
                    report.retained.push(device);
                    debug!("Joystick {} disconnected, keeping calibration", device);
                } else {
                    self.store.unregister(device);
                    report.removed.push(device);
                    debug!("Joystick {} disconnected, calibration dropped", device);
                }
            }
        }

        info!(
            "Discovered {} joysticks ({} new, {} removed)",
            report.connected.len(),
            report.added.len(),
            report.removed.len()
        );
        Ok(report)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend, e.g. to feed a mock.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    fn pool_size(&self) -> usize {
        self.config.max_devices.min(self.backend.capacity())
    }

    // ---------------------------------------------------------------------
    // Device queries
    // ---------------------------------------------------------------------

    pub fn connected_count(&self) -> usize {
        (0..self.pool_size())
            .filter(|&device| self.backend.is_connected(device))
            .count()
    }

    /// Connected slots in ascending order.
    pub fn connected_indices(&self) -> Vec<usize> {
        (0..self.pool_size())
            .filter(|&device| self.backend.is_connected(device))
            .collect()
    }

    pub fn is_connected(&self, device: usize) -> bool {
        device < self.pool_size() && self.backend.is_connected(device)
    }

    pub fn button_count(&self, device: usize) -> usize {
        self.backend.button_count(device)
    }

    pub fn is_button_pressed(&self, device: usize, button: usize) -> bool {
        self.backend.is_button_pressed(device, button)
    }

    pub fn has_axis(&self, device: usize, axis: LogicalAxis) -> bool {
        self.backend.has_axis(device, B::map_axis(axis))
    }

    pub fn axis_count(&self, device: usize) -> usize {
        LogicalAxis::ALL
            .into_iter()
            .filter(|&axis| self.has_axis(device, axis))
            .count()
    }

    /// Axes the device reports, in [`LogicalAxis::ALL`] order.
    pub fn axes(&self, device: usize) -> Vec<LogicalAxis> {
        LogicalAxis::ALL
            .into_iter()
            .filter(|&axis| self.has_axis(device, axis))
            .collect()
    }

    pub fn device_info(&self, device: usize) -> Option<JoystickInfo> {
        self.backend.device_info(device)
    }

    // ---------------------------------------------------------------------
    // Raw and calibrated reads
    // ---------------------------------------------------------------------

    /// Backend reading without calibration.
    pub fn axis_position_raw(&self, device: usize, axis: LogicalAxis) -> f32 {
        self.backend.axis_position(device, B::map_axis(axis))
    }

    /// Calibrated reading in `[-100, 100]`.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn axis_position(&self, device: usize, axis: LogicalAxis) -> ControllerResult<f32> {
        let raw = self.axis_position_raw(device, axis);
        Ok(self.store.apply(device, axis, raw)?)
    }

    pub fn axis_2d_position_raw(&self, device: usize, pair: AxisPair) -> Position2d {
        let (x, y) = pair.axes();
        self.axis_2d_position_raw_custom(device, x, y)
    }

    pub fn axis_2d_position_raw_custom(
        &self,
        device: usize,
        x: LogicalAxis,
        y: LogicalAxis,
    ) -> Position2d {
        Position2d::new(
            self.axis_position_raw(device, x),
            self.axis_position_raw(device, y),
        )
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn axis_2d_position(
        &self,
        device: usize,
        pair: AxisPair,
    ) -> ControllerResult<Position2d> {
        let (x, y) = pair.axes();
        self.axis_2d_position_custom(device, x, y)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn axis_2d_position_custom(
        &self,
        device: usize,
        x: LogicalAxis,
        y: LogicalAxis,
    ) -> ControllerResult<Position2d> {
        let calibration = self.store.device(device)?;
        let raw = self.axis_2d_position_raw_custom(device, x, y);
        Ok(Position2d::new(
            calibration.apply(x, raw.x),
            calibration.apply(y, raw.y),
        ))
    }

    // ---------------------------------------------------------------------
    // Derived quantities
    // ---------------------------------------------------------------------

    /// Direction of the calibrated pair in radians; right is 0, clockwise.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn axis_2d_direction(
        &self,
        device: usize,
        pair: AxisPair,
        inversion: Inversion,
    ) -> ControllerResult<f32> {
        let (x, y) = pair.axes();
        self.axis_2d_direction_custom(device, x, y, inversion)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn axis_2d_direction_custom(
        &self,
        device: usize,
        x: LogicalAxis,
        y: LogicalAxis,
        inversion: Inversion,
    ) -> ControllerResult<f32> {
        let position = self.axis_2d_position_custom(device, x, y)?.inverted(inversion);
        Ok(direction(position.x, position.y))
    }

    /// Deflection of the calibrated pair in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn axis_2d_strength(&self, device: usize, pair: AxisPair) -> ControllerResult<f32> {
        let (x, y) = pair.axes();
        self.axis_2d_strength_custom(device, x, y)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn axis_2d_strength_custom(
        &self,
        device: usize,
        x: LogicalAxis,
        y: LogicalAxis,
    ) -> ControllerResult<f32> {
        let position = self.axis_2d_position_custom(device, x, y)?;
        Ok(strength(position.x, position.y))
    }

    /// Direction bucketed into `segments` segments, 0 centered on up.
    ///
    /// # Errors
    ///
    /// Returns [`PolarError::InvalidSegmentCount`](joystick_polar::PolarError)
    /// if `segments < 2`, or a calibration error for an unknown device.
    pub fn axis_2d_direction_index(
        &self,
        device: usize,
        pair: AxisPair,
        segments: usize,
        inversion: Inversion,
    ) -> ControllerResult<usize> {
        let (x, y) = pair.axes();
        self.axis_2d_direction_index_custom(device, x, y, segments, inversion)
    }

    /// # Errors
    ///
    /// See [`axis_2d_direction_index`](Self::axis_2d_direction_index).
    pub fn axis_2d_direction_index_custom(
        &self,
        device: usize,
        x: LogicalAxis,
        y: LogicalAxis,
        segments: usize,
        inversion: Inversion,
    ) -> ControllerResult<usize> {
        let angle = self.axis_2d_direction_custom(device, x, y, inversion)?;
        Ok(direction_index(angle, segments)?)
    }

    /// Strength bucketed into `steps` levels.
    ///
    /// # Errors
    ///
    /// Returns [`PolarError::InvalidStepCount`](joystick_polar::PolarError)
    /// if `steps < 2`, or a calibration error for an unknown device.
    pub fn axis_2d_strength_index(
        &self,
        device: usize,
        pair: AxisPair,
        steps: usize,
    ) -> ControllerResult<usize> {
        let (x, y) = pair.axes();
        self.axis_2d_strength_index_custom(device, x, y, steps)
    }

    /// # Errors
    ///
    /// See [`axis_2d_strength_index`](Self::axis_2d_strength_index).
    pub fn axis_2d_strength_index_custom(
        &self,
        device: usize,
        x: LogicalAxis,
        y: LogicalAxis,
        steps: usize,
    ) -> ControllerResult<usize> {
        let magnitude = self.axis_2d_strength_custom(device, x, y)?;
        Ok(strength_index(magnitude, steps)?)
    }

    /// 8-way hat code of the calibrated pair: `-1` centered, `0..=7`
    /// clockwise from up.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn axis_2d_pov_hat(
        &self,
        device: usize,
        pair: AxisPair,
        inversion: Inversion,
    ) -> ControllerResult<i32> {
        let (x, y) = pair.axes();
        self.axis_2d_pov_hat_custom(device, x, y, inversion)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn axis_2d_pov_hat_custom(
        &self,
        device: usize,
        x: LogicalAxis,
        y: LogicalAxis,
        inversion: Inversion,
    ) -> ControllerResult<i32> {
        let position = self.axis_2d_position_custom(device, x, y)?;
        Ok(pov_hat(position, inversion))
    }

    // ---------------------------------------------------------------------
    // Calibration access
    // ---------------------------------------------------------------------

    /// Stores one calibration field verbatim.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn set_calibration_field(
        &mut self,
        device: usize,
        axis: LogicalAxis,
        field: CalibrationField,
        value: f32,
    ) -> ControllerResult<()> {
        self.store.set_field(device, axis, field, value)?;
        trace!(device, %axis, %field, value, "Calibration field set");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn calibration_field(
        &self,
        device: usize,
        axis: LogicalAxis,
        field: CalibrationField,
    ) -> ControllerResult<f32> {
        Ok(self.store.field(device, axis, field)?)
    }

    /// Reads a field by its snake_case name; unknown names read as `0.0`.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn calibration_field_by_name(
        &self,
        device: usize,
        axis: LogicalAxis,
        name: &str,
    ) -> ControllerResult<f32> {
        Ok(self.store.field_by_name(device, axis, name)?)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn set_calibration_zero(
        &mut self,
        device: usize,
        axis: LogicalAxis,
        value: f32,
    ) -> ControllerResult<()> {
        self.set_calibration_field(device, axis, CalibrationField::Zero, value)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn set_calibration_min_positive(
        &mut self,
        device: usize,
        axis: LogicalAxis,
        value: f32,
    ) -> ControllerResult<()> {
        self.set_calibration_field(device, axis, CalibrationField::MinPositive, value)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn set_calibration_max_positive(
        &mut self,
        device: usize,
        axis: LogicalAxis,
        value: f32,
    ) -> ControllerResult<()> {
        self.set_calibration_field(device, axis, CalibrationField::MaxPositive, value)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn set_calibration_min_negative(
        &mut self,
        device: usize,
        axis: LogicalAxis,
        value: f32,
    ) -> ControllerResult<()> {
        self.set_calibration_field(device, axis, CalibrationField::MinNegative, value)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn set_calibration_max_negative(
        &mut self,
        device: usize,
        axis: LogicalAxis,
        value: f32,
    ) -> ControllerResult<()> {
        self.set_calibration_field(device, axis, CalibrationField::MaxNegative, value)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn calibration_zero(&self, device: usize, axis: LogicalAxis) -> ControllerResult<f32> {
        self.calibration_field(device, axis, CalibrationField::Zero)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn calibration_min_positive(
        &self,
        device: usize,
        axis: LogicalAxis,
    ) -> ControllerResult<f32> {
        self.calibration_field(device, axis, CalibrationField::MinPositive)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn calibration_max_positive(
        &self,
        device: usize,
        axis: LogicalAxis,
    ) -> ControllerResult<f32> {
        self.calibration_field(device, axis, CalibrationField::MaxPositive)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn calibration_min_negative(
        &self,
        device: usize,
        axis: LogicalAxis,
    ) -> ControllerResult<f32> {
        self.calibration_field(device, axis, CalibrationField::MinNegative)
    }

    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn calibration_max_negative(
        &self,
        device: usize,
        axis: LogicalAxis,
    ) -> ControllerResult<f32> {
        self.calibration_field(device, axis, CalibrationField::MaxNegative)
    }

    /// The full calibration record of a device, e.g. for export.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn device_calibration(&self, device: usize) -> ControllerResult<&DeviceCalibration> {
        Ok(self.store.device(device)?)
    }

    /// Installs a previously exported record for `device`.
    ///
    /// The slot does not need to be connected. Axes with a zero-width range
    /// are accepted (they saturate) but logged.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::UnsupportedVersion` for records from a
    /// newer schema, or `CalibrationError::InvalidDevice` outside the pool.
    pub fn import_calibration(
        &mut self,
        device: usize,
        calibration: DeviceCalibration,
    ) -> ControllerResult<()> {
        for (axis, side) in calibration.degenerate_axes() {
            warn!(
                "Imported calibration for joystick {} axis {} has a degenerate {} range",
                device, axis, side
            );
        }
        self.store.replace(device, calibration)?;
        debug!("Imported calibration for joystick {}", device);
        Ok(())
    }

    /// Restores the configured default calibration on every axis.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn reset_calibration(&mut self, device: usize) -> ControllerResult<()> {
        self.store.reset_device(device)?;
        debug!("Reset calibration for joystick {}", device);
        Ok(())
    }

    /// Restores the configured default calibration on one axis.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::DeviceNotFound` if `device` has no
    /// calibration record.
    pub fn reset_axis_calibration(
        &mut self,
        device: usize,
        axis: LogicalAxis,
    ) -> ControllerResult<()> {
        self.store.reset_axis(device, axis)?;
        debug!("Reset calibration for joystick {} axis {}", device, axis);
        Ok(())
    }

    /// Feeds the current raw reading of the calibrator's axis as a rest
    /// sample.
    pub fn record_rest_sample(&self, device: usize, calibrator: &mut AxisCalibrator) {
        calibrator.add_rest_sample(self.axis_position_raw(device, calibrator.axis()));
    }

    /// Feeds the current raw reading of the calibrator's axis as a travel
    /// sample.
    pub fn record_travel_sample(&self, device: usize, calibrator: &mut AxisCalibrator) {
        calibrator.add_travel_sample(self.axis_position_raw(device, calibrator.axis()));
    }

    /// Derives a calibration from the calibrator's samples and installs it
    /// on its axis. Returns the installed calibration.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::NotComplete` if either sample set is
    /// empty, `CalibrationError::DegenerateCalibration` if the travel never
    /// leaves the dead zone, or `CalibrationError::DeviceNotFound` if
    /// `device` has no calibration record.
    pub fn apply_calibrator(
        &mut self,
        device: usize,
        calibrator: &AxisCalibrator,
        dead_zone: f32,
    ) -> ControllerResult<AxisCalibration> {
        let axis = calibrator.axis();
        let calibration = calibrator.calibrate(dead_zone)?;
        *self.store.device_mut(device)?.axis_mut(axis) = calibration;
        debug!(
            "Calibrated joystick {} axis {} from {} rest and {} travel samples",
            device,
            axis,
            calibrator.rest_sample_count(),
            calibrator.travel_sample_count()
        );
        Ok(calibration)
    }
}
