//! Heater supervisor regulation through the in-memory HAL.

use extruder_common::hal::{AnalogChannel, Level, MemoryHal, Pin};
use extruder_common::thermal::config::{HeatResponseConfig, HeaterConfig, SensorConfig};
use extruder_common::thermal::state::{TemperatureBand, ThermalPhase};
use extruder_control::thermal::HeaterSupervisor;

// ─── Helpers ────────────────────────────────────────────────────────

const HEATER: Pin = Pin(11);
const COOLER: Pin = Pin(13);
const CH: AnalogChannel = AnalogChannel(0);
const TICK_MS: u32 = 100;

fn heater_only(hysteresis: i32) -> HeaterConfig {
    HeaterConfig {
        hysteresis,
        ..HeaterConfig::new(SensorConfig::Thermocouple { channel: CH }, Some(HEATER), None)
    }
}

fn start(cfg: &HeaterConfig, hal: &mut MemoryHal, setpoint: i32) -> HeaterSupervisor {
    let mut sup = HeaterSupervisor::new(cfg).unwrap();
    sup.set_setpoint(setpoint);
    sup.turn_on(hal);
    sup
}

/// Present `celsius`, tick once, return the heater level.
fn step(hal: &mut MemoryHal, sup: &mut HeaterSupervisor, celsius: i32) -> Level {
    hal.set_analog(CH, sup.sensor().celsius_to_sample(celsius));
    sup.manage(hal);
    hal.advance_millis(TICK_MS);
    hal.level(HEATER)
}

// ─── Hysteresis ─────────────────────────────────────────────────────

#[test]
fn heater_only_band_sits_below_setpoint() {
    let mut hal = MemoryHal::new();
    let sup = start(&heater_only(5), &mut hal, 200);
    assert_eq!(sup.band(), TemperatureBand { low: 195, high: 200 });
}

#[test]
fn heater_only_hysteresis_at_200_with_5() {
    let mut hal = MemoryHal::new();
    let mut sup = start(&heater_only(5), &mut hal, 200);

    assert_eq!(step(&mut hal, &mut sup, 190), Level::High);
    // Inside (195, 200] the heater keeps its last state.
    for t in [196, 198, 200] {
        assert_eq!(step(&mut hal, &mut sup, t), Level::High, "rising through {t}");
    }
    assert_eq!(step(&mut hal, &mut sup, 201), Level::Low);
    for t in [200, 198, 196] {
        assert_eq!(step(&mut hal, &mut sup, t), Level::Low, "falling through {t}");
    }
    assert_eq!(step(&mut hal, &mut sup, 194), Level::High);
}

#[test]
fn heater_only_never_chatters_inside_band() {
    let mut hal = MemoryHal::new();
    let mut sup = start(&heater_only(5), &mut hal, 200);
    step(&mut hal, &mut sup, 150);
    let writes = hal.digital_writes(HEATER);
    let mut level = hal.level(HEATER);
    for t in [196, 199, 197, 200, 196, 198] {
        let now = step(&mut hal, &mut sup, t);
        assert_eq!(now, level);
        level = now;
    }
    // Writes happen every tick but never change the level.
    assert!(hal.digital_writes(HEATER) >= writes);
}

#[test]
fn setpoint_50_sequence_45_50_55() {
    let mut hal = MemoryHal::new();
    let cfg = HeaterConfig::new(SensorConfig::Thermocouple { channel: CH }, Some(HEATER), None);
    let mut sup = start(&cfg, &mut hal, 50);
    let levels: Vec<Level> = [45, 50, 55]
        .into_iter()
        .map(|t| step(&mut hal, &mut sup, t))
        .collect();
    assert_eq!(levels, [Level::High, Level::High, Level::Low]);
}

#[test]
fn dual_channel_band_is_symmetric() {
    let mut hal = MemoryHal::new();
    let cfg = HeaterConfig::new(
        SensorConfig::Thermocouple { channel: CH },
        Some(HEATER),
        Some(COOLER),
    );
    let mut sup = start(&cfg, &mut hal, 100);
    assert_eq!(sup.band(), TemperatureBand { low: 98, high: 102 });

    step(&mut hal, &mut sup, 98);
    assert_eq!(sup.phase(), ThermalPhase::Heating);
    step(&mut hal, &mut sup, 99);
    assert_eq!(sup.phase(), ThermalPhase::Idle);
    assert_eq!(hal.level(HEATER), Level::Low);
    step(&mut hal, &mut sup, 102);
    assert_eq!(sup.phase(), ThermalPhase::Idle);
    step(&mut hal, &mut sup, 103);
    assert_eq!(sup.phase(), ThermalPhase::Cooling);
    assert_eq!(hal.level(COOLER), Level::High);
}

#[test]
fn cooler_only_band_sits_above_setpoint() {
    let mut hal = MemoryHal::new();
    let cfg = HeaterConfig::new(SensorConfig::Thermocouple { channel: CH }, None, Some(COOLER));
    let mut sup = start(&cfg, &mut hal, 30);
    assert_eq!(sup.band(), TemperatureBand { low: 30, high: 32 });

    step(&mut hal, &mut sup, 40);
    assert_eq!(hal.level(COOLER), Level::High);
    step(&mut hal, &mut sup, 31);
    assert_eq!(hal.level(COOLER), Level::High);
    step(&mut hal, &mut sup, 30);
    assert_eq!(hal.level(COOLER), Level::Low);
    assert!(!sup.is_heating());
}

// ─── Heat Response ──────────────────────────────────────────────────

#[test]
fn responsive_heater_keeps_rearming() {
    let mut hal = MemoryHal::new();
    let cfg = HeaterConfig {
        heat_response: HeatResponseConfig {
            grace_ms: 1_000,
            rearm_delta: 5,
            idle_bonus_ms: 2_000,
        },
        ..heater_only(2)
    };
    let mut sup = start(&cfg, &mut hal, 200);

    // Rises 1 °C per tick: 5 °C per 500 ms, inside the 1 s grace.
    for t in 20..120 {
        assert_eq!(step(&mut hal, &mut sup, t), Level::High);
    }
    assert!(!sup.is_invalid_response());
    let checkpoint = sup.checkpoint().unwrap();
    assert!(checkpoint.expected > 115);
}

#[test]
fn idle_bonus_extends_first_checkpoint() {
    let mut hal = MemoryHal::new();
    let cfg = HeaterConfig {
        heat_response: HeatResponseConfig {
            grace_ms: 1_000,
            rearm_delta: 5,
            idle_bonus_ms: 2_000,
        },
        ..heater_only(2)
    };
    let mut sup = start(&cfg, &mut hal, 200);

    // Stuck for 2.5 s after starting: still within grace + bonus.
    for _ in 0..25 {
        step(&mut hal, &mut sup, 20);
    }
    assert!(!sup.is_invalid_response());
    for _ in 0..10 {
        step(&mut hal, &mut sup, 20);
    }
    assert!(sup.is_invalid_response());
    assert_eq!(hal.level(HEATER), Level::Low);
}

// ─── Oversampling ───────────────────────────────────────────────────

#[test]
fn reads_configured_sample_count_per_tick() {
    let mut hal = MemoryHal::new();
    let cfg = HeaterConfig {
        samples: 8,
        ..heater_only(2)
    };
    let mut sup = start(&cfg, &mut hal, 100);
    step(&mut hal, &mut sup, 50);
    assert_eq!(hal.analog_reads(), 8);
    assert_eq!(sup.temperature(), 50);
}
