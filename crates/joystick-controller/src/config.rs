//! Controller configuration.

use crate::{ControllerError, ControllerResult};
use joystick_calibration::{AxisCalibration, CalibrationField, DEFAULT_DEVICE_SLOTS};
use serde::{Deserialize, Serialize};

/// Upper bound on `max_devices`.
pub const MAX_DEVICE_POOL: usize = 16;

/// Controller configuration.
///
/// Deserializes from any serde format; missing keys take their defaults and
/// unknown keys are rejected.
///
/// ```
/// use joystick_controller::ControllerConfig;
///
/// let config: ControllerConfig =
///     serde_json::from_str(r#"{ "retain_stale_calibration": true }"#).unwrap();
/// assert_eq!(config.max_devices, 8);
/// assert!(config.retain_stale_calibration);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Number of device slots scanned at discovery (1-16).
    ///
    /// Default: 8.
    pub max_devices: usize,

    /// Keep the calibration of a device that disappears on rediscovery, so
    /// it is still there when the device comes back in the same slot.
    ///
    /// Default: false.
    pub retain_stale_calibration: bool,

    /// Calibration given to every axis of a newly discovered device.
    pub default_calibration: AxisCalibration,
}

impl ControllerConfig {
    #[must_use]
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidConfig`] if `max_devices` is out of
    /// range or `default_calibration` has a non-finite field or a
    /// zero-width range.
    pub fn validate(&self) -> ControllerResult<()> {
        if !(1..=MAX_DEVICE_POOL).contains(&self.max_devices) {
            return Err(ControllerError::InvalidConfig(format!(
                "max_devices must be between 1 and {MAX_DEVICE_POOL}"
            )));
        }
        for field in CalibrationField::ALL {
            if !self.default_calibration.get(field).is_finite() {
                return Err(ControllerError::InvalidConfig(format!(
                    "default_calibration.{field} must be finite"
                )));
            }
        }
        self.default_calibration
            .validate()
            .map_err(|e| ControllerError::InvalidConfig(format!("default_calibration: {e}")))
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_devices: DEFAULT_DEVICE_SLOTS,
            retain_stale_calibration: false,
            default_calibration: AxisCalibration::default(),
        }
    }
}

/// Builder for [`ControllerConfig`].
#[derive(Debug, Default)]
pub struct ControllerConfigBuilder {
    config: ControllerConfig,
}

impl ControllerConfigBuilder {
    #[must_use]
    pub fn max_devices(mut self, count: usize) -> Self {
        self.config.max_devices = count;
        self
    }

    #[must_use]
    pub fn retain_stale_calibration(mut self, retain: bool) -> Self {
        self.config.retain_stale_calibration = retain;
        self
    }

    #[must_use]
    pub fn default_calibration(mut self, calibration: AxisCalibration) -> Self {
        self.config.default_calibration = calibration;
        self
    }

    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> ControllerResult<ControllerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
