//! Motor supervisor: PID loop, rate integrator, drive topologies, jam guard.

use extruder_common::fixed::Position;
use extruder_common::hal::{Level, MemoryHal, Pin};
use extruder_common::motor::config::{
    EncoderConfig, JamGuardConfig, MotorConfig, MotorDriveConfig, MotorTuning, PidGains,
};
use extruder_common::motor::state::{Direction, DriveCommand, MotorMode};
use extruder_control::control::tracking::TrackingLoop;
use extruder_control::motor::MotorSupervisor;

// ─── Helpers ────────────────────────────────────────────────────────

const PWM: Pin = Pin(10);
const DIR: Pin = Pin(9);
const BRIDGE_A: Pin = Pin(10);
const BRIDGE_B: Pin = Pin(9);
const ENABLE: Pin = Pin(18);
const TICK_US: u32 = 1_000_000 >> 6;

fn tuning(p: i32, i: i32, d: i32) -> MotorTuning {
    MotorTuning {
        gains: PidGains { p, i, d },
        integral_min: 0,
        integral_limit: 128,
        deadband: 0,
        min_output: 0,
    }
}

fn single_pwm(tuning: MotorTuning) -> MotorConfig {
    MotorConfig {
        time_resolution_bits: 6,
        velocity_frac_bits: 8,
        encoder: EncoderConfig {
            a_pin: Pin(3),
            b_pin: Pin(2),
        },
        drive: MotorDriveConfig::SinglePwmDirection {
            pwm_pin: PWM,
            dir_pin: DIR,
            invert_direction: false,
        },
        tuning,
        jam_guard: JamGuardConfig::default(),
    }
}

fn tick(hal: &mut MemoryHal, motor: &mut MotorSupervisor) {
    motor.manage(hal);
    hal.advance_micros(TICK_US);
}

// ─── End-to-End ─────────────────────────────────────────────────────

#[test]
fn position_offset_of_100_saturates_forward() {
    let mut hal = MemoryHal::new();
    let mut motor = MotorSupervisor::new(&single_pwm(tuning(8, 0, 0))).unwrap();
    motor.turn_on(&mut hal);

    assert!(motor.set_position_offset(Position::from_int(100)));
    assert_eq!(motor.setpoint().raw(), 102_400);
    tick(&mut hal, &mut motor);

    assert_eq!(motor.measured(), Position::ZERO);
    assert_eq!(motor.last_command(), DriveCommand::new(Direction::Forward, 255));
    assert_eq!(hal.duty(PWM), 255);
    assert_eq!(hal.level(DIR), Level::Low);
}

// ─── PID Properties ─────────────────────────────────────────────────

#[test]
fn p_only_pushes_forward_until_error_is_zero() {
    let mut lp = TrackingLoop::new(tuning(256, 0, 0), 14);
    let target = Position::from_raw(300);
    lp.hold(target);

    for measured in 0..300 {
        let out = lp.evaluate(Position::from_raw(measured)).unwrap();
        assert!(out.error > 0);
        assert_eq!(out.command.direction, Direction::Forward);
        assert!(out.command.magnitude > 0);
    }
    let out = lp.evaluate(target).unwrap();
    assert_eq!(out.error, 0);
    assert_eq!(out.command.magnitude, 0);
}

#[test]
fn integral_never_goes_negative() {
    let mut lp = TrackingLoop::new(tuning(0, 256, 0), 14);
    lp.hold(Position::ZERO);
    for measured in [-50, -10, 40, 1_000, 5_000, -20, 300, 300] {
        lp.evaluate(Position::from_raw(measured));
        assert!(lp.pid().integral() >= 0);
        assert!(lp.pid().integral() <= 128);
    }
}

#[test]
fn magnitude_clamps_for_any_error() {
    let mut lp = TrackingLoop::new(tuning(256 * 64, 256, 256), 14);
    lp.hold(Position::ZERO);
    for measured in [i32::MIN / 2, -1_000_000, -300, 300, 1_000_000, i32::MAX / 2] {
        let out = lp.evaluate(Position::from_raw(measured)).unwrap();
        assert_eq!(out.command.magnitude, 255, "measured {measured}");
        let expected = if measured < 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        assert_eq!(out.command.direction, expected);
    }
}

#[test]
fn deadband_and_floor_shape_the_command() {
    let mut hal = MemoryHal::new();
    let cfg = single_pwm(MotorTuning {
        deadband: 10,
        min_output: 60,
        ..tuning(256, 0, 0)
    });
    let mut motor = MotorSupervisor::new(&cfg).unwrap();
    motor.turn_on(&mut hal);

    motor.set_position(Position::from_raw(10));
    tick(&mut hal, &mut motor);
    assert!(motor.last_command().is_neutral());

    motor.set_position(Position::from_raw(11));
    tick(&mut hal, &mut motor);
    assert_eq!(motor.last_command(), DriveCommand::new(Direction::Forward, 60));
}

// ─── Speed Tracking ─────────────────────────────────────────────────

#[test]
fn velocity_advances_setpoint_without_drift() {
    let mut hal = MemoryHal::new();
    let mut motor = MotorSupervisor::new(&single_pwm(tuning(256, 0, 0))).unwrap();
    motor.turn_on(&mut hal);

    // 1024 counts/s with 8 fraction bits; 64 ticks per second.
    assert!(motor.set_velocity(1024 << 8));
    assert_eq!(motor.mode(), MotorMode::SpeedTracking);
    for _ in 0..64 {
        tick(&mut hal, &mut motor);
    }
    assert_eq!(motor.setpoint().raw(), 1024);

    // Odd velocity: the fractional remainder carries across ticks.
    motor.enter_speed_mode();
    motor.set_velocity(3);
    let start = motor.setpoint().raw();
    for _ in 0..(1 << 14) / 3 + 1 {
        tick(&mut hal, &mut motor);
    }
    assert_eq!(motor.setpoint().raw() - start, 1);
}

#[test]
fn re_entering_speed_mode_keeps_setpoint() {
    let mut hal = MemoryHal::new();
    let mut motor = MotorSupervisor::new(&single_pwm(tuning(256, 0, 0))).unwrap();
    motor.turn_on(&mut hal);
    motor.set_velocity(1024 << 8);
    for _ in 0..8 {
        tick(&mut hal, &mut motor);
    }
    let setpoint = motor.setpoint();
    motor.set_velocity(512 << 8);
    assert_eq!(motor.setpoint(), setpoint);
    assert_eq!(motor.velocity_command(), 512 << 8);
}

// ─── Drive Topologies ───────────────────────────────────────────────

#[test]
fn inverted_dual_bridge_drives_both_directions() {
    let mut hal = MemoryHal::new();
    let cfg = MotorConfig {
        drive: MotorDriveConfig::DualPwmBridge {
            pin_a: BRIDGE_A,
            pin_b: BRIDGE_B,
            enable_pin: Some(ENABLE),
            inverted_logic: true,
        },
        ..single_pwm(tuning(256, 0, 0))
    };
    let mut motor = MotorSupervisor::new(&cfg).unwrap();
    motor.turn_on(&mut hal);
    assert_eq!(hal.level(ENABLE), Level::High);
    assert_eq!((hal.duty(BRIDGE_A), hal.duty(BRIDGE_B)), (255, 255));

    motor.set_position(Position::from_raw(55));
    tick(&mut hal, &mut motor);
    assert_eq!((hal.duty(BRIDGE_A), hal.duty(BRIDGE_B)), (200, 255));

    motor.set_position(Position::from_raw(-55));
    tick(&mut hal, &mut motor);
    assert_eq!((hal.duty(BRIDGE_A), hal.duty(BRIDGE_B)), (255, 200));

    motor.turn_off(&mut hal);
    assert_eq!((hal.duty(BRIDGE_A), hal.duty(BRIDGE_B)), (255, 255));
    assert_eq!(hal.level(ENABLE), Level::Low);
}

#[test]
fn repeated_turn_off_is_harmless() {
    let mut hal = MemoryHal::new();
    let mut motor = MotorSupervisor::new(&single_pwm(tuning(256, 0, 0))).unwrap();
    motor.turn_on(&mut hal);
    motor.set_pwm(&mut hal, Direction::Forward, 90);
    motor.turn_off(&mut hal);
    motor.turn_off(&mut hal);
    assert_eq!(hal.duty(PWM), 0);
    assert!(motor.status().machine_off);
}

// ─── Jam Guard ──────────────────────────────────────────────────────

#[test]
fn sustained_error_latches_jam_until_turn_on() {
    let mut hal = MemoryHal::new();
    let cfg = MotorConfig {
        jam_guard: JamGuardConfig {
            enabled: true,
            distance: 128,
            sustain_ticks: 3,
        },
        ..single_pwm(tuning(256, 0, 0))
    };
    let mut motor = MotorSupervisor::new(&cfg).unwrap();
    motor.turn_on(&mut hal);
    motor.set_position(Position::from_int(10));

    tick(&mut hal, &mut motor);
    tick(&mut hal, &mut motor);
    assert!(!motor.is_jammed());
    assert_eq!(hal.duty(PWM), 255);

    tick(&mut hal, &mut motor);
    assert!(motor.is_jammed());
    assert!(motor.status().machine_off);
    assert_eq!(hal.duty(PWM), 0);
    assert_eq!(motor.mode(), MotorMode::Idle);

    assert!(!motor.set_position(Position::from_int(10)));
    for _ in 0..5 {
        tick(&mut hal, &mut motor);
    }
    assert_eq!(hal.duty(PWM), 0);

    motor.turn_on(&mut hal);
    assert!(!motor.is_jammed());
    assert!(motor.set_position(Position::from_int(10)));
}

#[test]
fn jam_guard_is_off_by_default() {
    let mut hal = MemoryHal::new();
    let mut motor = MotorSupervisor::new(&single_pwm(tuning(256, 0, 0))).unwrap();
    motor.turn_on(&mut hal);
    motor.set_position(Position::from_int(10));
    for _ in 0..100 {
        tick(&mut hal, &mut motor);
    }
    assert!(!motor.is_jammed());
    assert_eq!(hal.duty(PWM), 255);
}
