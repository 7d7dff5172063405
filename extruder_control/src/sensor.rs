//! Temperature linearizer.
//!
//! Turns an oversampled raw converter value into whole degrees Celsius.
//! The sensor kind is a closed set chosen at construction:
//!
//! | Variant | Conversion | Implausible when |
//! |---------|------------|------------------|
//! | `ThermistorTable` | piecewise-linear table lookup | sample beyond the last node |
//! | `ThermocoupleLinear` | `(raw + 1) * 500 / 1024` | sample reads exactly 0 |
//!
//! Implausible samples are reported, not latched: the heater decides
//! whether a disconnected sensor is a fault.

pub mod table;

use extruder_common::consts::{ADC_MAX, THERMOCOUPLE_ADC_SPAN, THERMOCOUPLE_FULL_SCALE_C};
use extruder_common::hal::{AnalogChannel, AnalogInput};
use extruder_common::thermal::config::SensorConfig;

use crate::error::ControlError;

pub use table::ThermistorTable;

/// One linearized sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading {
    /// Temperature [°C]; 0 when the sample could not be resolved.
    pub celsius: i32,
    /// The sample carries the sensor's disconnection signature.
    pub disconnected: bool,
}

/// Temperature source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemperatureSensor {
    /// NTC thermistor through a calibration table.
    ThermistorTable(ThermistorTable),
    /// Thermocouple amplifier with a fixed linear scale.
    ThermocoupleLinear,
}

impl TemperatureSensor {
    /// Build from configuration.
    pub fn from_config(config: &SensorConfig) -> Result<Self, ControlError> {
        Ok(match config {
            SensorConfig::Thermistor { table, .. } => {
                Self::ThermistorTable(ThermistorTable::new(table.clone())?)
            }
            SensorConfig::Thermocouple { .. } => Self::ThermocoupleLinear,
        })
    }

    /// Convert one raw sample.
    pub fn sample_to_celsius(&self, raw: u16) -> SensorReading {
        match self {
            Self::ThermistorTable(table) => match table.interpolate(raw) {
                Some(celsius) => SensorReading {
                    celsius,
                    disconnected: false,
                },
                None => SensorReading {
                    celsius: 0,
                    disconnected: true,
                },
            },
            Self::ThermocoupleLinear => SensorReading {
                celsius: (i32::from(raw) + 1) * THERMOCOUPLE_FULL_SCALE_C / THERMOCOUPLE_ADC_SPAN,
                disconnected: raw == 0,
            },
        }
    }

    /// Raw sample that reads back as close as possible to `celsius`.
    ///
    /// Inverse of [`TemperatureSensor::sample_to_celsius`] for plant models
    /// and test fixtures; never returns a disconnection signature.
    pub fn celsius_to_sample(&self, celsius: i32) -> u16 {
        match self {
            Self::ThermistorTable(table) => {
                let mut best = (u32::MAX, 0u16);
                for raw in 0..=ADC_MAX {
                    if let Some(c) = table.interpolate(raw) {
                        let diff = c.abs_diff(celsius);
                        if diff < best.0 {
                            best = (diff, raw);
                        }
                    }
                }
                best.1
            }
            Self::ThermocoupleLinear => {
                let celsius = celsius.clamp(0, THERMOCOUPLE_FULL_SCALE_C);
                let raw = (celsius * THERMOCOUPLE_ADC_SPAN + THERMOCOUPLE_FULL_SCALE_C - 1)
                    / THERMOCOUPLE_FULL_SCALE_C
                    - 1;
                raw.clamp(1, i32::from(ADC_MAX)) as u16
            }
        }
    }
}

/// Arithmetic mean of `samples` back-to-back reads of `channel`.
///
/// `samples == 0` is treated as a single read.
pub fn oversample(hw: &mut impl AnalogInput, channel: AnalogChannel, samples: u8) -> u16 {
    let n = u32::from(samples.max(1));
    let sum: u32 = (0..n).map(|_| u32::from(hw.read_analog(channel))).sum();
    // Mean of u16 values always fits in u16.
    (sum / n) as u16
}
