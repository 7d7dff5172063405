//! Extruder controller built from a TOML machine description.

use std::io::Write;

use extruder_common::config::MachineConfig;
use extruder_common::fixed::Position;
use extruder_common::hal::{AnalogChannel, Level, MemoryHal, Pin, QuadratureChannel};
use extruder_common::status::FaultFlags;
use extruder_control::{ControlError, ExtruderController};
use tempfile::NamedTempFile;

// ─── Helpers ────────────────────────────────────────────────────────

const MACHINE_TOML: &str = r#"
[shared]
service_name = "extruder"

[motor]
time_resolution_bits = 6

[motor.encoder]
a_pin = 3
b_pin = 2

[motor.drive]
topology = "dual_pwm_bridge"
pin_a = 10
pin_b = 9
enable_pin = 18

[motor.tuning]
p = 8
i = 0
d = 0

[[heaters]]
name = "extruder"
heater_pin = 11

[heaters.sensor]
kind = "thermocouple"
channel = 0

[heaters.heat_response]
grace_ms = 20000
rearm_delta = 5

[[heaters]]
name = "secondary"
heater_pin = 12

[heaters.sensor]
kind = "thermistor"
channel = 3
"#;

fn controller() -> ExtruderController {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(MACHINE_TOML.as_bytes()).unwrap();
    let config = MachineConfig::from_file(file.path()).unwrap();
    ExtruderController::new(&config).unwrap()
}

// ─── Tests ──────────────────────────────────────────────────────────

#[test]
fn builds_units_from_file() {
    let c = controller();
    assert_eq!(c.heaters().len(), 2);
    assert_eq!(c.heater_by_name("secondary").unwrap().channel(), AnalogChannel(3));
    assert!(c.heater_by_name("missing").is_none());
    assert!(c.status().faults.contains(FaultFlags::MACHINE_OFF));
}

#[test]
fn rejects_invalid_config() {
    let mut config: MachineConfig = toml::from_str(MACHINE_TOML).unwrap();
    config.heaters[1].heater_pin = Some(Pin(10));
    assert!(matches!(
        ExtruderController::new(&config),
        Err(ControlError::Config(_))
    ));
}

#[test]
fn end_to_end_motor_and_heater() {
    let mut hal = MemoryHal::new();
    let mut c = controller();
    c.turn_on(&mut hal);

    c.motor_mut().set_position_offset(Position::from_int(100));
    let extruder = c.heater_mut(0).unwrap();
    extruder.set_setpoint(50);
    let raw = extruder.sensor().celsius_to_sample(45);
    hal.set_analog(AnalogChannel(0), raw);
    let secondary = c.heater(1).unwrap();
    let raw = secondary.sensor().celsius_to_sample(25);
    hal.set_analog(AnalogChannel(3), raw);

    c.manage(&mut hal);

    // Inverted bridge, forward full scale: A fully driven, B released.
    assert_eq!((hal.duty(Pin(10)), hal.duty(Pin(9))), (0, 255));
    assert_eq!(hal.level(Pin(18)), Level::High);
    assert_eq!(hal.level(Pin(11)), Level::High);
    // Secondary setpoint is 0: nothing to do.
    assert_eq!(hal.level(Pin(12)), Level::Low);

    let status = c.status();
    assert!(status.heater_on);
    assert_eq!(status.faults, FaultFlags::empty());
}

#[test]
fn encoder_edges_reach_the_motor() {
    let mut hal = MemoryHal::new();
    let c = controller();
    hal.set_input(Pin(3), Level::High);
    c.on_encoder_edge(&hal, QuadratureChannel::A);
    hal.set_input(Pin(2), Level::High);
    c.on_encoder_edge(&hal, QuadratureChannel::B);
    assert_eq!(c.motor().measured().raw(), 2);
}

#[test]
fn heater_fault_shows_in_status_until_turn_on() {
    let mut hal = MemoryHal::new();
    let mut c = controller();
    c.turn_on(&mut hal);
    c.heater_mut(0).unwrap().set_setpoint(200);
    hal.set_analog(AnalogChannel(0), 0);
    c.manage(&mut hal);

    let status = c.status();
    assert!(status.faults.contains(FaultFlags::SENSOR_DISCONNECTED));
    assert!(status.faults.has_fatal());
    assert!(!status.heater_on);
    assert_eq!(hal.level(Pin(11)), Level::Low);

    c.turn_on(&mut hal);
    assert!(!c.status().faults.has_fatal());
}

#[test]
fn turn_off_releases_everything() {
    let mut hal = MemoryHal::new();
    let mut c = controller();
    c.turn_on(&mut hal);
    c.motor_mut().set_position_offset(Position::from_int(1));
    c.heater_mut(0).unwrap().set_setpoint(200);
    hal.set_analog(AnalogChannel(0), 100);
    c.manage(&mut hal);
    assert_eq!(hal.level(Pin(11)), Level::High);

    c.turn_off(&mut hal);
    assert_eq!((hal.duty(Pin(10)), hal.duty(Pin(9))), (255, 255));
    assert_eq!(hal.level(Pin(18)), Level::Low);
    assert_eq!(hal.level(Pin(11)), Level::Low);
    assert!(c.status().faults.contains(FaultFlags::MACHINE_OFF));
}
