//! Per-device calibration storage
//!
//! The store is a fixed pool of device slots indexed directly by device
//! index. A slot holds a [`DeviceCalibration`] once the device has been
//! registered at discovery time.

use crate::{
    AxisCalibration, CURRENT_CALIBRATION_VERSION, CalibrationError, CalibrationField,
    CalibrationResult, DeviceCalibration, LogicalAxis,
};

/// Default number of device slots, matching the usual joystick pool size.
pub const DEFAULT_DEVICE_SLOTS: usize = 8;

#[derive(Debug, Clone)]
pub struct CalibrationStore {
    slots: Vec<Option<DeviceCalibration>>,
    defaults: AxisCalibration,
}

impl Default for CalibrationStore {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_SLOTS)
    }
}

impl CalibrationStore {
    /// Creates a store with `slot_count` empty slots.
    pub fn new(slot_count: usize) -> Self {
        Self::with_defaults(slot_count, AxisCalibration::default())
    }

    /// Creates a store whose newly registered devices start with `defaults`
    /// on every axis.
    pub fn with_defaults(slot_count: usize, defaults: AxisCalibration) -> Self {
        Self {
            slots: vec![None; slot_count],
            defaults,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn defaults(&self) -> &AxisCalibration {
        &self.defaults
    }

    /// Creates a default record for `device`. An existing record is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::InvalidDevice`] if `device` is outside the
    /// slot pool.
    pub fn register(&mut self, device: usize) -> CalibrationResult<&mut DeviceCalibration> {
        let pool = self.slots.len();
        let defaults = self.defaults;
        let slot = self
            .slots
            .get_mut(device)
            .ok_or(CalibrationError::InvalidDevice { device, pool })?;
        Ok(slot.get_or_insert_with(|| DeviceCalibration::with_defaults(defaults)))
    }

    /// Removes and returns the record for `device`, if any.
    pub fn unregister(&mut self, device: usize) -> Option<DeviceCalibration> {
        self.slots.get_mut(device).and_then(Option::take)
    }

    pub fn is_registered(&self, device: usize) -> bool {
        matches!(self.slots.get(device), Some(Some(_)))
    }

    pub fn registered_devices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|_| index))
            .collect()
    }

    /// # Errors
    ///
    /// Returns [`CalibrationError::DeviceNotFound`] if `device` was never
    /// registered.
    pub fn device(&self, device: usize) -> CalibrationResult<&DeviceCalibration> {
        self.slots
            .get(device)
            .and_then(Option::as_ref)
            .ok_or(CalibrationError::DeviceNotFound(device))
    }

    /// # Errors
    ///
    /// Returns [`CalibrationError::DeviceNotFound`] if `device` was never
    /// registered.
    pub fn device_mut(&mut self, device: usize) -> CalibrationResult<&mut DeviceCalibration> {
        self.slots
            .get_mut(device)
            .and_then(Option::as_mut)
            .ok_or(CalibrationError::DeviceNotFound(device))
    }

    /// # Errors
    ///
    /// Returns [`CalibrationError::DeviceNotFound`] if `device` was never
    /// registered.
    pub fn axis(&self, device: usize, axis: LogicalAxis) -> CalibrationResult<&AxisCalibration> {
        Ok(self.device(device)?.axis(axis))
    }

    /// # Errors
    ///
    /// Returns [`CalibrationError::DeviceNotFound`] if `device` was never
    /// registered.
    pub fn field(
        &self,
        device: usize,
        axis: LogicalAxis,
        field: CalibrationField,
    ) -> CalibrationResult<f32> {
        Ok(self.device(device)?.field(axis, field))
    }

    /// Reads a field by snake_case name; unknown names read as `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::DeviceNotFound`] if `device` was never
    /// registered.
    pub fn field_by_name(
        &self,
        device: usize,
        axis: LogicalAxis,
        name: &str,
    ) -> CalibrationResult<f32> {
        Ok(self.axis(device, axis)?.get_by_name(name))
    }

    /// Stores `value` verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::DeviceNotFound`] if `device` was never
    /// registered.
    pub fn set_field(
        &mut self,
        device: usize,
        axis: LogicalAxis,
        field: CalibrationField,
        value: f32,
    ) -> CalibrationResult<()> {
        self.device_mut(device)?.set_field(axis, field, value);
        Ok(())
    }

    /// Installs a previously exported record, registering the slot if
    /// needed. Returns the record it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::UnsupportedVersion`] for records written
    /// by a newer schema, or [`CalibrationError::InvalidDevice`] if `device`
    /// is outside the slot pool.
    pub fn replace(
        &mut self,
        device: usize,
        mut calibration: DeviceCalibration,
    ) -> CalibrationResult<Option<DeviceCalibration>> {
        if calibration.version > CURRENT_CALIBRATION_VERSION {
            return Err(CalibrationError::UnsupportedVersion(
                calibration.version,
                CURRENT_CALIBRATION_VERSION,
            ));
        }
        calibration.version = CURRENT_CALIBRATION_VERSION;

        let pool = self.slots.len();
        let slot = self
            .slots
            .get_mut(device)
            .ok_or(CalibrationError::InvalidDevice { device, pool })?;
        Ok(slot.replace(calibration))
    }

    /// Restores the store defaults on one axis.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::DeviceNotFound`] if `device` was never
    /// registered.
    pub fn reset_axis(&mut self, device: usize, axis: LogicalAxis) -> CalibrationResult<()> {
        let defaults = self.defaults;
        *self.device_mut(device)?.axis_mut(axis) = defaults;
        Ok(())
    }

    /// Restores the store defaults on every axis of `device`.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::DeviceNotFound`] if `device` was never
    /// registered.
    pub fn reset_device(&mut self, device: usize) -> CalibrationResult<()> {
        let defaults = self.defaults;
        *self.device_mut(device)? = DeviceCalibration::with_defaults(defaults);
        Ok(())
    }

    /// Applies the stored calibration for `device`/`axis` to a raw reading.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::DeviceNotFound`] if `device` was never
    /// registered.
    pub fn apply(&self, device: usize, axis: LogicalAxis, raw: f32) -> CalibrationResult<f32> {
        Ok(self.axis(device, axis)?.apply(raw))
    }
}
