//! Temperature linearizer over whole calibration tables.

use extruder_common::consts::ADC_MAX;
use extruder_common::thermal::config::{CalibrationTable, default_thermistor_table};
use extruder_control::sensor::{TemperatureSensor, ThermistorTable};

// ─── Helpers ────────────────────────────────────────────────────────

fn rising_table() -> CalibrationTable {
    [(100, 0), (300, 50), (600, 200), (900, 300), (1000, 420)]
        .into_iter()
        .collect()
}

fn sensor(points: CalibrationTable) -> TemperatureSensor {
    TemperatureSensor::ThermistorTable(ThermistorTable::new(points).unwrap())
}

// ─── Properties ─────────────────────────────────────────────────────

#[test]
fn exact_at_every_node() {
    for points in [rising_table(), default_thermistor_table()] {
        let s = sensor(points.clone());
        for &(raw, celsius) in &points {
            let reading = s.sample_to_celsius(raw);
            assert_eq!(reading.celsius, i32::from(celsius), "node raw={raw}");
            assert!(!reading.disconnected);
        }
    }
}

#[test]
fn rising_table_is_monotonic_between_nodes() {
    let points = rising_table();
    let s = sensor(points.clone());
    let first = points[0].0;
    let last = points[points.len() - 1].0;

    let mut prev = s.sample_to_celsius(first).celsius;
    for raw in first + 1..=last {
        let c = s.sample_to_celsius(raw).celsius;
        assert!(c >= prev, "raw {raw}: {c} < {prev}");
        prev = c;
    }
    for w in points.windows(2) {
        assert!(s.sample_to_celsius(w[1].0).celsius > s.sample_to_celsius(w[0].0).celsius);
    }
}

#[test]
fn reprap_table_falls_with_raw() {
    let points = default_thermistor_table();
    let s = sensor(points.clone());
    let mut prev = i32::MAX;
    for raw in points[0].0..=points[points.len() - 1].0 {
        let c = s.sample_to_celsius(raw).celsius;
        assert!(c <= prev);
        prev = c;
    }
}

#[test]
fn past_last_node_is_disconnected() {
    let s = sensor(rising_table());
    for raw in 1001..=ADC_MAX {
        let reading = s.sample_to_celsius(raw);
        assert!(reading.disconnected);
        assert_eq!(reading.celsius, 0);
    }
}

#[test]
fn thermocouple_covers_full_range() {
    let s = TemperatureSensor::ThermocoupleLinear;
    assert!(s.sample_to_celsius(0).disconnected);
    let mut prev = 0;
    for raw in 1..=ADC_MAX {
        let reading = s.sample_to_celsius(raw);
        assert!(!reading.disconnected);
        assert!(reading.celsius >= prev);
        assert!(reading.celsius <= 500);
        prev = reading.celsius;
    }
}
