//! End-to-end tests for the joystick controller over the mock backend.

use joystick_backend::backend::mock::{MockJoystick, MockJoystickBackend};
use joystick_backend::{BackendError, JoystickInfo};
use joystick_calibration::{
    AxisCalibration, AxisCalibrator, CalibrationError, CalibrationField,
    CURRENT_CALIBRATION_VERSION, DeviceCalibration, LogicalAxis,
};
use joystick_controller::{
    AxisPair, ControllerConfig, ControllerError, ControllerResult, DiscoveryReport,
    JoystickController,
};
use joystick_polar::{HatDirection, Inversion};
use std::f32::consts::FRAC_PI_2;

const EPS: f32 = 1e-4;

type Controller = JoystickController<MockJoystickBackend>;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("joystick_controller=trace")
        .with_test_writer()
        .try_init()
        .ok();
}

fn pad(vendor_id: u16) -> MockJoystick {
    MockJoystick::gamepad(JoystickInfo::new(vendor_id, 0x0001).with_name("Test Pad"), 12)
}

fn controller_with(slots: &[usize]) -> ControllerResult<Controller> {
    controller_with_config(slots, ControllerConfig::default())
}

fn controller_with_config(
    slots: &[usize],
    config: ControllerConfig,
) -> ControllerResult<Controller> {
    init_tracing();
    let mut backend = MockJoystickBackend::new();
    for &slot in slots {
        backend.attach(slot, pad(0x1000 + slot as u16))?;
    }
    JoystickController::with_config(backend, config)
}

fn set_stick(controller: &mut Controller, device: usize, x: f32, y: f32) -> ControllerResult<()> {
    controller.backend_mut().set_axis(device, LogicalAxis::X, x)?;
    controller.backend_mut().set_axis(device, LogicalAxis::Y, y)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Calibrated single-axis reads
// ---------------------------------------------------------------------------

#[test]
fn default_calibration_reads_through() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    controller.backend_mut().set_axis(0, LogicalAxis::X, 50.0)?;
    assert!((controller.axis_position(0, LogicalAxis::X)? - 50.0).abs() < EPS);
    Ok(())
}

#[test]
fn dead_zone_reads_zero() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    controller.set_calibration_min_positive(0, LogicalAxis::X, 10.0)?;
    controller.set_calibration_max_positive(0, LogicalAxis::X, 100.0)?;
    controller.set_calibration_zero(0, LogicalAxis::X, 0.0)?;
    controller.backend_mut().set_axis(0, LogicalAxis::X, 5.0)?;
    assert!(controller.axis_position(0, LogicalAxis::X)?.abs() < EPS);
    Ok(())
}

#[test]
fn zero_offset_recenters_axis() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    controller.set_calibration_zero(0, LogicalAxis::Y, 10.0)?;
    controller.backend_mut().set_axis(0, LogicalAxis::Y, 10.0)?;
    assert!(controller.axis_position(0, LogicalAxis::Y)?.abs() < EPS);

    controller.backend_mut().set_axis(0, LogicalAxis::Y, 100.0)?;
    assert!((controller.axis_position(0, LogicalAxis::Y)? - 100.0).abs() < EPS);
    Ok(())
}

#[test]
fn output_is_clamped() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    controller.set_calibration_max_positive(0, LogicalAxis::U, 50.0)?;
    controller.backend_mut().set_axis(0, LogicalAxis::U, 80.0)?;
    assert!((controller.axis_position(0, LogicalAxis::U)? - 100.0).abs() < EPS);
    Ok(())
}

#[test]
fn degenerate_range_saturates() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    controller.set_calibration_min_positive(0, LogicalAxis::X, 40.0)?;
    controller.set_calibration_max_positive(0, LogicalAxis::X, 40.0)?;

    controller.backend_mut().set_axis(0, LogicalAxis::X, 20.0)?;
    assert!(controller.axis_position(0, LogicalAxis::X)?.abs() < EPS);

    controller.backend_mut().set_axis(0, LogicalAxis::X, 60.0)?;
    assert!((controller.axis_position(0, LogicalAxis::X)? - 100.0).abs() < EPS);
    Ok(())
}

#[test]
fn unknown_device_is_an_error() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    assert_eq!(
        controller.axis_position(1, LogicalAxis::X),
        Err(ControllerError::Calibration(CalibrationError::DeviceNotFound(1)))
    );
    assert_eq!(
        controller.set_calibration_zero(7, LogicalAxis::X, 1.0),
        Err(ControllerError::Calibration(CalibrationError::DeviceNotFound(7)))
    );
    assert!(controller.axis_2d_pov_hat(42, AxisPair::XY, Inversion::NONE).is_err());
    Ok(())
}

// ---------------------------------------------------------------------------
// 2D derivation
// ---------------------------------------------------------------------------

#[test]
fn stick_pointing_up() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    set_stick(&mut controller, 0, 0.0, -100.0)?;

    let direction = controller.axis_2d_direction(0, AxisPair::XY, Inversion::NONE)?;
    assert!((direction + FRAC_PI_2).abs() < EPS);
    assert_eq!(
        controller.axis_2d_direction_index(0, AxisPair::XY, 8, Inversion::NONE)?,
        0
    );
    assert!((controller.axis_2d_strength(0, AxisPair::XY)? - 1.0).abs() < EPS);
    assert_eq!(controller.axis_2d_pov_hat(0, AxisPair::XY, Inversion::NONE)?, 0);
    Ok(())
}

#[test]
fn stick_centered() -> ControllerResult<()> {
    let controller = controller_with(&[0])?;
    assert!(controller.axis_2d_strength(0, AxisPair::XY)?.abs() < EPS);
    assert_eq!(controller.axis_2d_strength_index(0, AxisPair::XY, 2)?, 0);
    assert_eq!(controller.axis_2d_pov_hat(0, AxisPair::XY, Inversion::NONE)?, -1);
    Ok(())
}

#[test]
fn half_strength_is_the_hat_threshold() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    set_stick(&mut controller, 0, 49.0, 0.0)?;
    assert_eq!(controller.axis_2d_pov_hat(0, AxisPair::XY, Inversion::NONE)?, -1);

    set_stick(&mut controller, 0, 50.0, 0.0)?;
    assert_eq!(controller.axis_2d_strength_index(0, AxisPair::XY, 2)?, 1);
    assert_eq!(controller.axis_2d_pov_hat(0, AxisPair::XY, Inversion::NONE)?, 2);
    Ok(())
}

#[test]
fn hat_walks_clockwise() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    let positions = [
        ((0.0, -100.0), HatDirection::Up),
        ((70.0, -70.0), HatDirection::UpRight),
        ((100.0, 0.0), HatDirection::Right),
        ((70.0, 70.0), HatDirection::DownRight),
        ((0.0, 100.0), HatDirection::Down),
        ((-70.0, 70.0), HatDirection::DownLeft),
        ((-100.0, 0.0), HatDirection::Left),
        ((-70.0, -70.0), HatDirection::UpLeft),
    ];
    for ((x, y), expected) in positions {
        set_stick(&mut controller, 0, x, y)?;
        let code = controller.axis_2d_pov_hat(0, AxisPair::XY, Inversion::NONE)?;
        assert_eq!(HatDirection::from_code(code), expected, "at ({x}, {y})");
    }
    Ok(())
}

#[test]
fn inversion_flips_direction_not_strength() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    set_stick(&mut controller, 0, 0.0, -100.0)?;

    assert_eq!(controller.axis_2d_pov_hat(0, AxisPair::XY, Inversion::Y)?, 4);
    assert_eq!(
        controller.axis_2d_direction_index(0, AxisPair::XY, 4, Inversion::BOTH)?,
        2
    );
    assert!((controller.axis_2d_strength(0, AxisPair::XY)? - 1.0).abs() < EPS);
    Ok(())
}

#[test]
fn named_and_custom_pairs_agree() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    controller.backend_mut().set_axis(0, LogicalAxis::U, -35.0)?;
    controller.backend_mut().set_axis(0, LogicalAxis::V, 60.0)?;

    let named = controller.axis_2d_position(0, AxisPair::UV)?;
    let custom = controller.axis_2d_position_custom(0, LogicalAxis::U, LogicalAxis::V)?;
    assert_eq!(named, custom);
    assert_eq!(
        controller.axis_2d_pov_hat(0, AxisPair::UV, Inversion::X)?,
        controller.axis_2d_pov_hat_custom(0, LogicalAxis::U, LogicalAxis::V, Inversion::X)?
    );
    assert_eq!(
        controller.axis_2d_strength_index(0, AxisPair::UV, 5)?,
        controller.axis_2d_strength_index_custom(0, LogicalAxis::U, LogicalAxis::V, 5)?
    );
    Ok(())
}

#[test]
fn custom_pair_mixes_sticks() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    controller.backend_mut().set_axis(0, LogicalAxis::X, 100.0)?;
    controller.backend_mut().set_axis(0, LogicalAxis::PovY, 0.0)?;

    let raw = controller.axis_2d_position_raw_custom(0, LogicalAxis::X, LogicalAxis::PovY);
    assert!((raw.x - 100.0).abs() < EPS);
    let index = controller.axis_2d_direction_index_custom(
        0,
        LogicalAxis::X,
        LogicalAxis::PovY,
        8,
        Inversion::NONE,
    )?;
    assert_eq!(index, 2);
    Ok(())
}

#[test]
fn derived_values_use_calibration() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    controller.set_calibration_min_positive(0, LogicalAxis::X, 60.0)?;
    set_stick(&mut controller, 0, 55.0, 0.0)?;

    assert!((controller.axis_2d_position_raw(0, AxisPair::XY).x - 55.0).abs() < EPS);
    assert!(controller.axis_2d_strength(0, AxisPair::XY)?.abs() < EPS);
    assert_eq!(controller.axis_2d_pov_hat(0, AxisPair::XY, Inversion::NONE)?, -1);
    Ok(())
}

#[test]
fn invalid_bucket_counts() -> ControllerResult<()> {
    let controller = controller_with(&[0])?;
    assert!(matches!(
        controller.axis_2d_direction_index(0, AxisPair::XY, 0, Inversion::NONE),
        Err(ControllerError::Polar(_))
    ));
    assert!(matches!(
        controller.axis_2d_strength_index(0, AxisPair::XY, 1),
        Err(ControllerError::Polar(_))
    ));
    Ok(())
}

// ---------------------------------------------------------------------------
// Device queries and discovery
// ---------------------------------------------------------------------------

#[test]
fn device_queries_follow_backend() -> ControllerResult<()> {
    let mut controller = controller_with(&[0, 2])?;
    assert_eq!(controller.connected_count(), 2);
    assert_eq!(controller.connected_indices(), vec![0, 2]);
    assert!(controller.is_connected(2));
    assert!(!controller.is_connected(1));

    assert_eq!(controller.button_count(2), 12);
    assert_eq!(controller.axis_count(2), 6);
    assert!(controller.has_axis(2, LogicalAxis::PovX));
    assert!(!controller.has_axis(2, LogicalAxis::Z));
    assert_eq!(
        controller.axes(2),
        vec![
            LogicalAxis::X,
            LogicalAxis::Y,
            LogicalAxis::U,
            LogicalAxis::V,
            LogicalAxis::PovX,
            LogicalAxis::PovY,
        ]
    );

    controller.backend_mut().set_button(2, 7, true)?;
    assert!(controller.is_button_pressed(2, 7));
    assert!(!controller.is_button_pressed(0, 7));

    let info = controller.device_info(2);
    assert_eq!(info.map(|i| i.vendor_id), Some(0x1002));
    Ok(())
}

#[test]
fn pool_limits_discovery() -> ControllerResult<()> {
    let config = ControllerConfig::builder().max_devices(2).build()?;
    let controller = controller_with_config(&[1, 5], config)?;
    assert_eq!(controller.connected_indices(), vec![1]);
    assert!(controller.device_calibration(5).is_err());
    Ok(())
}

#[test]
fn rediscover_tracks_hot_plug() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    controller.set_calibration_zero(0, LogicalAxis::X, 3.0)?;

    controller.backend_mut().attach(1, pad(0x2000))?;
    let report = controller.rediscover()?;
    assert_eq!(
        report,
        DiscoveryReport {
            connected: vec![0, 1],
            added: vec![1],
            removed: vec![],
            retained: vec![],
        }
    );
    // Existing records survive rediscovery.
    assert!((controller.calibration_zero(0, LogicalAxis::X)? - 3.0).abs() < EPS);

    controller.backend_mut().detach(0);
    let report = controller.rediscover()?;
    assert_eq!(report.removed, vec![0]);
    assert!(controller.device_calibration(0).is_err());

    controller.backend_mut().attach(0, pad(0x1000))?;
    controller.rediscover()?;
    assert!(controller.calibration_zero(0, LogicalAxis::X)?.abs() < EPS);
    Ok(())
}

#[test]
fn rediscover_can_retain_calibration() -> ControllerResult<()> {
    let config = ControllerConfig::builder()
        .retain_stale_calibration(true)
        .build()?;
    let mut controller = controller_with_config(&[0], config)?;
    controller.set_calibration_min_positive(0, LogicalAxis::Y, 12.0)?;

    controller.backend_mut().detach(0);
    let report = controller.rediscover()?;
    assert_eq!(report.retained, vec![0]);
    assert!(report.removed.is_empty());

    controller.backend_mut().attach(0, pad(0x1000))?;
    let report = controller.rediscover()?;
    assert!(report.added.is_empty());
    assert!((controller.calibration_min_positive(0, LogicalAxis::Y)? - 12.0).abs() < EPS);
    Ok(())
}

#[test]
fn failed_refresh_leaves_state_untouched() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    controller.backend_mut().detach(0);
    controller
        .backend_mut()
        .fail_next_refresh(BackendError::Disconnected(0));

    assert_eq!(
        controller.rediscover(),
        Err(ControllerError::Backend(BackendError::Disconnected(0)))
    );
    assert!(controller.device_calibration(0).is_ok());
    Ok(())
}

#[test]
fn construction_fails_on_refresh_error() {
    let mut backend = MockJoystickBackend::new();
    backend.fail_next_refresh(BackendError::DeviceNotFound(0));
    assert!(matches!(
        JoystickController::new(backend),
        Err(ControllerError::Backend(BackendError::DeviceNotFound(0)))
    ));
}

#[test]
fn construction_rejects_invalid_config() {
    let config = ControllerConfig {
        max_devices: 0,
        ..ControllerConfig::default()
    };
    assert!(matches!(
        JoystickController::with_config(MockJoystickBackend::new(), config),
        Err(ControllerError::InvalidConfig(_))
    ));
}

// ---------------------------------------------------------------------------
// Calibration management
// ---------------------------------------------------------------------------

#[test]
fn generic_field_access_round_trips() -> ControllerResult<()> {
    let mut controller = controller_with(&[3])?;
    let values = [0.125, 7.0, 93.5, -6.25, -88.0];
    for axis in LogicalAxis::ALL {
        for (field, value) in CalibrationField::ALL.into_iter().zip(values) {
            controller.set_calibration_field(3, axis, field, value)?;
        }
    }
    for axis in LogicalAxis::ALL {
        for (field, value) in CalibrationField::ALL.into_iter().zip(values) {
            let read = controller.calibration_field(3, axis, field)?;
            assert_eq!(read.to_bits(), value.to_bits(), "{axis}.{field}");
            let by_name = controller.calibration_field_by_name(3, axis, field.name())?;
            assert_eq!(by_name.to_bits(), value.to_bits());
        }
    }
    Ok(())
}

#[test]
fn configured_defaults_apply_to_new_devices() -> ControllerResult<()> {
    let defaults = AxisCalibration::default()
        .with_positive(8.0, 100.0)
        .with_negative(-8.0, -100.0);
    let config = ControllerConfig::builder()
        .default_calibration(defaults)
        .build()?;
    let mut controller = controller_with_config(&[0], config)?;

    controller.backend_mut().set_axis(0, LogicalAxis::X, -5.0)?;
    assert!(controller.axis_position(0, LogicalAxis::X)?.abs() < EPS);

    controller.set_calibration_min_negative(0, LogicalAxis::X, 0.0)?;
    controller.reset_calibration(0)?;
    assert!((controller.calibration_min_negative(0, LogicalAxis::X)? + 8.0).abs() < EPS);
    Ok(())
}

#[test]
fn reset_single_axis() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    controller.set_calibration_max_negative(0, LogicalAxis::R, -20.0)?;
    controller.set_calibration_max_negative(0, LogicalAxis::Z, -20.0)?;
    controller.reset_axis_calibration(0, LogicalAxis::R)?;

    assert!((controller.calibration_max_negative(0, LogicalAxis::R)? + 100.0).abs() < EPS);
    assert!((controller.calibration_max_negative(0, LogicalAxis::Z)? + 20.0).abs() < EPS);
    Ok(())
}

#[test]
fn export_and_import_through_json() -> Result<(), Box<dyn std::error::Error>> {
    let mut source = controller_with(&[0])?;
    source.set_calibration_zero(0, LogicalAxis::V, -2.5)?;
    source.set_calibration_min_positive(0, LogicalAxis::V, 4.0)?;
    let json = serde_json::to_string(source.device_calibration(0)?)?;

    let mut target = controller_with(&[1])?;
    let record: DeviceCalibration = serde_json::from_str(&json)?;
    target.import_calibration(1, record)?;

    assert_eq!(target.device_calibration(1)?, source.device_calibration(0)?);
    Ok(())
}

#[test]
fn import_rejects_newer_schema() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    let mut record = DeviceCalibration::new();
    record.version = CURRENT_CALIBRATION_VERSION + 1;
    assert_eq!(
        controller.import_calibration(0, record),
        Err(ControllerError::Calibration(CalibrationError::UnsupportedVersion(
            CURRENT_CALIBRATION_VERSION + 1,
            CURRENT_CALIBRATION_VERSION
        )))
    );
    Ok(())
}

#[test]
fn import_accepts_degenerate_axes() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    let mut record = DeviceCalibration::new();
    *record.axis_mut(LogicalAxis::PovX) = AxisCalibration::default().with_positive(1.0, 1.0);
    controller.import_calibration(0, record)?;

    controller.backend_mut().set_axis(0, LogicalAxis::PovX, 100.0)?;
    assert!((controller.axis_position(0, LogicalAxis::PovX)? - 100.0).abs() < EPS);
    Ok(())
}

#[test]
fn import_outside_pool_fails() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    assert_eq!(
        controller.import_calibration(8, DeviceCalibration::new()),
        Err(ControllerError::Calibration(CalibrationError::InvalidDevice {
            device: 8,
            pool: 8
        }))
    );
    Ok(())
}

#[test]
fn calibrator_session() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    let mut calibrator = AxisCalibrator::new(LogicalAxis::X);

    for raw in [3.0, 4.0, 5.0] {
        controller.backend_mut().set_axis(0, LogicalAxis::X, raw)?;
        controller.record_rest_sample(0, &mut calibrator);
    }
    for raw in [-90.0, -40.0, 20.0, 95.0] {
        controller.backend_mut().set_axis(0, LogicalAxis::X, raw)?;
        controller.record_travel_sample(0, &mut calibrator);
    }
    controller.apply_calibrator(0, &calibrator, 5.0)?;

    controller.backend_mut().set_axis(0, LogicalAxis::X, 4.0)?;
    assert!(controller.axis_position(0, LogicalAxis::X)?.abs() < EPS);
    controller.backend_mut().set_axis(0, LogicalAxis::X, 95.0)?;
    assert!((controller.axis_position(0, LogicalAxis::X)? - 100.0).abs() < EPS);
    controller.backend_mut().set_axis(0, LogicalAxis::X, -90.0)?;
    assert!((controller.axis_position(0, LogicalAxis::X)? + 100.0).abs() < EPS);
    Ok(())
}

#[test]
fn incomplete_calibrator_changes_nothing() -> ControllerResult<()> {
    let mut controller = controller_with(&[0])?;
    let calibrator = AxisCalibrator::new(LogicalAxis::Y);
    assert_eq!(
        controller.apply_calibrator(0, &calibrator, 2.0),
        Err(ControllerError::Calibration(CalibrationError::NotComplete))
    );
    assert_eq!(
        *controller.device_calibration(0)?.axis(LogicalAxis::Y),
        AxisCalibration::default()
    );
    Ok(())
}
