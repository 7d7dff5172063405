//! Sticky fault latches: set once, cleared only by turn-on.

use extruder_common::hal::{AnalogChannel, Level, MemoryHal, Pin};
use extruder_common::status::FaultFlags;
use extruder_common::thermal::config::{HeatResponseConfig, HeaterConfig, SensorConfig};
use extruder_control::thermal::HeaterSupervisor;

const HEATER: Pin = Pin(11);
const COOLER: Pin = Pin(13);
const CH: AnalogChannel = AnalogChannel(0);

fn guarded(cooler: Option<Pin>) -> HeaterConfig {
    HeaterConfig {
        heat_response: HeatResponseConfig {
            grace_ms: 1_000,
            rearm_delta: 5,
            idle_bonus_ms: 0,
        },
        ..HeaterConfig::new(SensorConfig::Thermocouple { channel: CH }, Some(HEATER), cooler)
    }
}

fn step(hal: &mut MemoryHal, sup: &mut HeaterSupervisor, celsius: i32) {
    hal.set_analog(CH, sup.sensor().celsius_to_sample(celsius));
    sup.manage(hal);
    hal.advance_millis(100);
}

/// Heat a dead element at `setpoint` until the watchdog latches.
fn latch_invalid_response(hal: &mut MemoryHal, cooler: Option<Pin>) -> HeaterSupervisor {
    let mut sup = HeaterSupervisor::new(&guarded(cooler)).unwrap();
    sup.set_setpoint(200);
    sup.turn_on(hal);
    for _ in 0..20 {
        step(hal, &mut sup, 20);
    }
    assert!(sup.is_invalid_response());
    sup
}

#[test]
fn invalid_response_survives_recovered_temperature() {
    let mut hal = MemoryHal::new();
    let mut sup = latch_invalid_response(&mut hal, Some(COOLER));

    // Back inside the band and even above it: still latched, still off.
    for t in [199, 200, 201, 250, 150] {
        step(&mut hal, &mut sup, t);
        assert!(sup.is_invalid_response());
        assert_eq!(hal.level(HEATER), Level::Low);
        assert_eq!(hal.level(COOLER), Level::Low);
    }
    assert!(FaultFlags::from(sup.status()).contains(FaultFlags::HEATER_RESPONSE));
    assert!(FaultFlags::from(sup.status()).has_fatal());
}

#[test]
fn turn_on_clears_invalid_response() {
    let mut hal = MemoryHal::new();
    let mut sup = latch_invalid_response(&mut hal, None);
    sup.turn_on(&mut hal);
    assert!(!sup.is_invalid_response());
    assert!(sup.is_regulating());
    step(&mut hal, &mut sup, 20);
    assert_eq!(hal.level(HEATER), Level::High);
}

#[test]
fn turn_off_does_not_clear_latch() {
    let mut hal = MemoryHal::new();
    let mut sup = latch_invalid_response(&mut hal, None);
    sup.turn_off(&mut hal);
    assert!(sup.is_invalid_response());
    assert!(sup.status().machine_off);
}

#[test]
fn disconnected_sensor_latches_and_holds() {
    let mut hal = MemoryHal::new();
    let mut sup = HeaterSupervisor::new(&guarded(None)).unwrap();
    sup.set_setpoint(200);
    sup.turn_on(&mut hal);
    step(&mut hal, &mut sup, 20);
    assert_eq!(hal.level(HEATER), Level::High);

    // Thermocouple amplifier fault signature.
    hal.set_analog(CH, 0);
    sup.manage(&mut hal);
    hal.advance_millis(100);
    assert!(sup.is_sensor_disconnected());
    assert_eq!(hal.level(HEATER), Level::Low);

    for _ in 0..10 {
        step(&mut hal, &mut sup, 20);
        assert!(sup.is_sensor_disconnected());
        assert_eq!(hal.level(HEATER), Level::Low);
    }

    sup.turn_on(&mut hal);
    step(&mut hal, &mut sup, 20);
    assert!(!sup.is_sensor_disconnected());
    assert_eq!(hal.level(HEATER), Level::High);
}

#[test]
fn fault_during_machine_off_is_not_latched() {
    let mut hal = MemoryHal::new();
    let mut sup = HeaterSupervisor::new(&guarded(None)).unwrap();
    hal.set_analog(CH, 0);
    sup.manage(&mut hal);
    assert!(!sup.is_sensor_disconnected());
    assert!(!FaultFlags::from(sup.status()).has_fatal());
}
