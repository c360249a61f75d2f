//! Joystick backend trait

use crate::{BackendResult, JoystickInfo, MAX_JOYSTICKS};
use joystick_calibration::LogicalAxis;

/// Capabilities the controller needs from a platform input layer.
///
/// Devices are addressed by slot index in `0..capacity()`. Queries on a
/// slot with nothing attached return neutral values (`false`, `0`, `0.0`)
/// rather than errors, matching how platform joystick APIs behave.
pub trait JoystickBackend {
    /// The backend's own axis identifier.
    type Axis: Copy;

    /// Translates a logical axis into the backend's axis identifier.
    fn map_axis(axis: LogicalAxis) -> Self::Axis;

    /// Re-polls the device layer: connection state and current input.
    fn refresh(&mut self) -> BackendResult<()>;

    /// Number of device slots the backend exposes.
    fn capacity(&self) -> usize {
        MAX_JOYSTICKS
    }

    fn is_connected(&self, device: usize) -> bool;

    fn button_count(&self, device: usize) -> usize;

    fn has_axis(&self, device: usize, axis: Self::Axis) -> bool;

    fn is_button_pressed(&self, device: usize, button: usize) -> bool;

    /// Raw axis position, nominally in `[-100, 100]`.
    fn axis_position(&self, device: usize, axis: Self::Axis) -> f32;

    fn device_info(&self, device: usize) -> Option<JoystickInfo>;
}

pub mod mock {
    use super::*;
    use crate::BackendError;
    use tracing::trace;

    /// An in-memory joystick.
    #[derive(Debug, Clone, Default)]
    pub struct MockJoystick {
        info: JoystickInfo,
        axes: [Option<f32>; LogicalAxis::COUNT],
        buttons: Vec<bool>,
    }

    impl MockJoystick {
        pub fn new(info: JoystickInfo) -> Self {
            Self {
                info,
                ..Self::default()
            }
        }

        /// A gamepad with a left stick (X/Y), a right stick (U/V), a D-pad
        /// (PovX/PovY) and `buttons` buttons, all at rest.
        pub fn gamepad(info: JoystickInfo, buttons: usize) -> Self {
            Self::new(info)
                .with_axes(&[
                    LogicalAxis::X,
                    LogicalAxis::Y,
                    LogicalAxis::U,
                    LogicalAxis::V,
                    LogicalAxis::PovX,
                    LogicalAxis::PovY,
                ])
                .with_buttons(buttons)
        }

        pub fn with_axes(mut self, axes: &[LogicalAxis]) -> Self {
            for axis in axes {
                if let Some(slot) = self.axes.get_mut(axis.index()) {
                    *slot = Some(0.0);
                }
            }
            self
        }

        pub fn with_buttons(mut self, count: usize) -> Self {
            self.buttons = vec![false; count];
            self
        }

        pub fn info(&self) -> &JoystickInfo {
            &self.info
        }
    }

    /// In-memory [`JoystickBackend`].
    ///
    /// Attach and detach take effect on the next [`refresh`], like a real
    /// input layer that only notices hot-plugging when polled. Axis and
    /// button state is visible immediately.
    ///
    /// [`refresh`]: JoystickBackend::refresh
    #[derive(Debug, Clone)]
    pub struct MockJoystickBackend {
        devices: Vec<Option<MockJoystick>>,
        connected: Vec<bool>,
        refresh_count: usize,
        fail_next_refresh: Option<BackendError>,
    }

    impl MockJoystickBackend {
        pub fn new() -> Self {
            Self::with_capacity(MAX_JOYSTICKS)
        }

        pub fn with_capacity(capacity: usize) -> Self {
            Self {
                devices: vec![None; capacity],
                connected: vec![false; capacity],
                refresh_count: 0,
                fail_next_refresh: None,
            }
        }

        /// Plugs `joystick` into slot `device`, replacing whatever was there.
        ///
        /// # Errors
        ///
        /// Returns [`BackendError::DeviceNotFound`] if the slot does not exist.
        pub fn attach(&mut self, device: usize, joystick: MockJoystick) -> BackendResult<()> {
            let slot = self
                .devices
                .get_mut(device)
                .ok_or(BackendError::DeviceNotFound(device))?;
            *slot = Some(joystick);
            Ok(())
        }

        /// Unplugs slot `device`, returning the joystick that was there.
        pub fn detach(&mut self, device: usize) -> Option<MockJoystick> {
            self.devices.get_mut(device).and_then(Option::take)
        }

        /// Sets the raw position of an axis the joystick has.
        ///
        /// # Errors
        ///
        /// Returns [`BackendError::DeviceNotFound`] if nothing is attached
        /// to `device` or the joystick lacks `axis`.
        pub fn set_axis(
            &mut self,
            device: usize,
            axis: LogicalAxis,
            value: f32,
        ) -> BackendResult<()> {
            let position = self
                .joystick_mut(device)?
                .axes
                .get_mut(axis.index())
                .and_then(Option::as_mut)
                .ok_or(BackendError::DeviceNotFound(device))?;
            *position = value;
            Ok(())
        }

        /// # Errors
        ///
        /// Returns [`BackendError::DeviceNotFound`] if nothing is attached
        /// to `device` or `button` is out of range.
        pub fn set_button(
            &mut self,
            device: usize,
            button: usize,
            pressed: bool,
        ) -> BackendResult<()> {
            let state = self
                .joystick_mut(device)?
                .buttons
                .get_mut(button)
                .ok_or(BackendError::DeviceNotFound(device))?;
            *state = pressed;
            Ok(())
        }

        /// Makes the next [`JoystickBackend::refresh`] fail with `error`.
        pub fn fail_next_refresh(&mut self, error: BackendError) {
            self.fail_next_refresh = Some(error);
        }

        pub fn refresh_count(&self) -> usize {
            self.refresh_count
        }

        fn joystick(&self, device: usize) -> Option<&MockJoystick> {
            self.devices.get(device).and_then(Option::as_ref)
        }

        fn joystick_mut(&mut self, device: usize) -> BackendResult<&mut MockJoystick> {
            self.devices
                .get_mut(device)
                .and_then(Option::as_mut)
                .ok_or(BackendError::DeviceNotFound(device))
        }
    }

    impl Default for MockJoystickBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    impl JoystickBackend for MockJoystickBackend {
        type Axis = usize;

        fn map_axis(axis: LogicalAxis) -> usize {
            axis.index()
        }

        fn refresh(&mut self) -> BackendResult<()> {
            self.refresh_count += 1;
            if let Some(error) = self.fail_next_refresh.take() {
                return Err(error);
            }
            for (connected, device) in self.connected.iter_mut().zip(&self.devices) {
                *connected = device.is_some();
            }
            trace!(
                refresh = self.refresh_count,
                connected = self.connected.iter().filter(|c| **c).count(),
                "Mock backend refreshed"
            );
            Ok(())
        }

        fn capacity(&self) -> usize {
            self.devices.len()
        }

        fn is_connected(&self, device: usize) -> bool {
            self.connected.get(device).copied().unwrap_or(false)
        }

        fn button_count(&self, device: usize) -> usize {
            self.joystick(device).map_or(0, |j| j.buttons.len())
        }

        fn has_axis(&self, device: usize, axis: usize) -> bool {
            self.joystick(device)
                .and_then(|j| j.axes.get(axis).copied().flatten())
                .is_some()
        }

        fn is_button_pressed(&self, device: usize, button: usize) -> bool {
            self.joystick(device)
                .and_then(|j| j.buttons.get(button).copied())
                .unwrap_or(false)
        }

        fn axis_position(&self, device: usize, axis: usize) -> f32 {
            self.joystick(device)
                .and_then(|j| j.axes.get(axis).copied().flatten())
                .unwrap_or(0.0)
        }

        fn device_info(&self, device: usize) -> Option<JoystickInfo> {
            self.joystick(device).map(|j| j.info.clone())
        }
    }
}
