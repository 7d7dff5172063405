//! Thermal plant.
//!
//! Lumped first-order model: the heater adds a fixed rate, the cooler
//! removes one, and the block loses heat to ambient in proportion to the
//! temperature difference. The temperature is presented back to the
//! controller as a raw sample through the channel's own sensor model.

use extruder_common::consts::ADC_MAX;
use extruder_control::sensor::TemperatureSensor;
use serde::{Deserialize, Serialize};

/// Thermal plant parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalPlantParams {
    /// Ambient temperature [°C].
    #[serde(default = "default_ambient")]
    pub ambient_c: f64,
    /// Rise rate with the heater fully on [°C/s].
    #[serde(default = "default_heating_rate")]
    pub heating_rate_c_per_s: f64,
    /// Fall rate with the cooler fully on [°C/s].
    #[serde(default = "default_cooling_rate")]
    pub cooling_rate_c_per_s: f64,
    /// Loss to ambient [1/s].
    #[serde(default = "default_loss")]
    pub loss_per_s: f64,
}

fn default_ambient() -> f64 {
    20.0
}
fn default_heating_rate() -> f64 {
    10.0
}
fn default_cooling_rate() -> f64 {
    4.0
}
fn default_loss() -> f64 {
    0.01
}

impl Default for ThermalPlantParams {
    fn default() -> Self {
        Self {
            ambient_c: default_ambient(),
            heating_rate_c_per_s: default_heating_rate(),
            cooling_rate_c_per_s: default_cooling_rate(),
            loss_per_s: default_loss(),
        }
    }
}

/// Simulated heater block with its temperature sensor.
#[derive(Debug, Clone)]
pub struct ThermalPlant {
    params: ThermalPlantParams,
    sensor: TemperatureSensor,
    temperature_c: f64,
    heater_dead: bool,
    sensor_disconnected: bool,
    cached: Option<(i32, u16)>,
}

impl ThermalPlant {
    /// Block at ambient.
    pub fn new(params: ThermalPlantParams, sensor: TemperatureSensor) -> Self {
        Self {
            temperature_c: params.ambient_c,
            params,
            sensor,
            heater_dead: false,
            sensor_disconnected: false,
            cached: None,
        }
    }

    /// Advance by `dt_s` with the given element states.
    pub fn update(&mut self, heating: bool, cooling: bool, dt_s: f64) {
        let mut rate = -self.params.loss_per_s * (self.temperature_c - self.params.ambient_c);
        if heating && !self.heater_dead {
            rate += self.params.heating_rate_c_per_s;
        }
        if cooling {
            rate -= self.params.cooling_rate_c_per_s;
        }
        self.temperature_c += rate * dt_s;
    }

    /// Raw sample the converter would read right now.
    pub fn sample(&mut self) -> u16 {
        if self.sensor_disconnected {
            return match self.sensor {
                TemperatureSensor::ThermocoupleLinear => 0,
                TemperatureSensor::ThermistorTable(_) => ADC_MAX,
            };
        }
        let celsius = self.temperature_c.round() as i32;
        match self.cached {
            Some((c, raw)) if c == celsius => raw,
            _ => {
                let raw = self.sensor.celsius_to_sample(celsius);
                self.cached = Some((celsius, raw));
                raw
            }
        }
    }

    // ─── Fault Injection ────────────────────────────────────────────

    /// Heating element stops producing heat.
    pub fn kill_heater(&mut self) {
        self.heater_dead = true;
    }

    /// Sensor presents its disconnection signature.
    pub fn disconnect_sensor(&mut self) {
        self.sensor_disconnected = true;
    }

    /// Undo all injected faults.
    pub fn repair(&mut self) {
        self.heater_dead = false;
        self.sensor_disconnected = false;
    }

    /// Force the block temperature.
    pub fn set_temperature(&mut self, celsius: f64) {
        self.temperature_c = celsius;
    }

    /// True block temperature [°C].
    pub fn temperature(&self) -> f64 {
        self.temperature_c
    }
}
