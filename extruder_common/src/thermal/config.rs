//! Thermal channel configuration.
//!
//! # TOML Example
//!
//! ```toml
//! [[heaters]]
//! name = "extruder"
//! heater_pin = 6
//! tick_period_ms = 100
//! hysteresis = 2
//!
//! [heaters.sensor]
//! kind = "thermocouple"
//! channel = 0
//!
//! [heaters.heat_response]
//! grace_ms = 50000
//! rearm_delta = 5
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::{
    HEAT_RESPONSE_REARM_DELTA_DEFAULT, HEATER_TICK_MS_DEFAULT, HYSTERESIS_DEFAULT,
    MAX_ANALOG_CHANNELS, MAX_CALIBRATION_POINTS, MAX_NAME_LEN, MAX_PINS, TEMPERATURE_SAMPLES,
};
use crate::hal::{AnalogChannel, Pin};

/// Thermistor calibration table: `(raw, celsius)` sorted by ascending raw.
pub type CalibrationTable = heapless::Vec<(u16, i16), MAX_CALIBRATION_POINTS>;

/// RepRap temperature sensor board table.
///
/// r0=6360, t0=100, r1=0, r2=1818, beta=3990, max adc=1023.
pub const REPRAP_THERMISTOR_TABLE: [(u16, i16); 20] = [
    (1, 1316),
    (54, 335),
    (107, 274),
    (160, 241),
    (213, 219),
    (266, 202),
    (319, 188),
    (372, 176),
    (425, 165),
    (478, 155),
    (531, 146),
    (584, 137),
    (637, 128),
    (690, 119),
    (743, 110),
    (796, 100),
    (849, 88),
    (902, 75),
    (955, 57),
    (1008, 20),
];

/// The default thermistor table as a [`CalibrationTable`].
pub fn default_thermistor_table() -> CalibrationTable {
    REPRAP_THERMISTOR_TABLE.iter().copied().collect()
}

// ─── Sensor ─────────────────────────────────────────────────────────

/// Temperature source of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorConfig {
    /// NTC thermistor linearized through a calibration table.
    Thermistor {
        /// Analog input.
        channel: AnalogChannel,
        /// Calibration table (defaults to the RepRap board table).
        #[serde(default = "default_thermistor_table")]
        table: CalibrationTable,
    },
    /// Thermocouple amplifier with a fixed linear scale.
    Thermocouple {
        /// Analog input.
        channel: AnalogChannel,
    },
}

impl SensorConfig {
    /// Analog input of the sensor.
    pub const fn channel(&self) -> AnalogChannel {
        match self {
            Self::Thermistor { channel, .. } | Self::Thermocouple { channel } => *channel,
        }
    }

    /// Validate the calibration table and channel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel().index() >= MAX_ANALOG_CHANNELS {
            return Err(ConfigError::ValidationError(format!(
                "sensor channel {} out of range [0, {})",
                self.channel().0,
                MAX_ANALOG_CHANNELS
            )));
        }
        if let Self::Thermistor { table, .. } = self {
            if table.len() < 2 {
                return Err(ConfigError::ValidationError(
                    "thermistor table needs at least 2 points".to_string(),
                ));
            }
            if table.windows(2).any(|w| w[1].0 <= w[0].0) {
                return Err(ConfigError::ValidationError(
                    "thermistor table raw values must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ─── Regulation ─────────────────────────────────────────────────────

/// Regulation policy of a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegulationMode {
    /// Bang-bang around a hysteresis band.
    #[default]
    Hysteresis,
    /// Software PWM executing externally supplied duties.
    DutyCommand,
}

/// Heat-response watchdog parameters.
///
/// The watchdog (and sensor-disconnect latching) is enabled when
/// `grace_ms > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatResponseConfig {
    /// Time allowed to rise by `rearm_delta` while heating [ms].
    #[serde(default)]
    pub grace_ms: u32,
    /// Temperature rise expected per checkpoint [°C].
    #[serde(default = "default_rearm_delta")]
    pub rearm_delta: i32,
    /// Extra time granted when heating starts from a non-heating phase [ms].
    #[serde(default)]
    pub idle_bonus_ms: u32,
}

fn default_rearm_delta() -> i32 {
    HEAT_RESPONSE_REARM_DELTA_DEFAULT
}

impl HeatResponseConfig {
    /// Whether the watchdog and sensor fault latching are active.
    #[inline]
    pub const fn is_enabled(&self) -> bool {
        self.grace_ms > 0
    }
}

// ─── Heater Config ──────────────────────────────────────────────────

/// Complete configuration of one thermal channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaterConfig {
    /// Channel name used in logs.
    #[serde(default)]
    pub name: heapless::String<MAX_NAME_LEN>,
    /// Temperature source.
    pub sensor: SensorConfig,
    /// Heating element output.
    #[serde(default)]
    pub heater_pin: Option<Pin>,
    /// Cooling element output.
    #[serde(default)]
    pub cooler_pin: Option<Pin>,
    /// Regulation policy.
    #[serde(default)]
    pub regulation: RegulationMode,
    /// Hysteresis half-width [°C].
    #[serde(default = "default_hysteresis")]
    pub hysteresis: i32,
    /// Control period [ms].
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u32,
    /// Toggle a lone actuator at half the tick rate inside the band.
    #[serde(default)]
    pub half_rate_toggle: bool,
    /// Raw reads averaged per sample.
    #[serde(default = "default_samples")]
    pub samples: u8,
    /// Heat-response watchdog.
    #[serde(default)]
    pub heat_response: HeatResponseConfig,
}

fn default_hysteresis() -> i32 {
    HYSTERESIS_DEFAULT
}
fn default_tick_period_ms() -> u32 {
    HEATER_TICK_MS_DEFAULT
}
fn default_samples() -> u8 {
    TEMPERATURE_SAMPLES
}

impl HeaterConfig {
    /// A hysteresis channel with defaults for everything but wiring.
    pub fn new(sensor: SensorConfig, heater_pin: Option<Pin>, cooler_pin: Option<Pin>) -> Self {
        Self {
            name: heapless::String::new(),
            sensor,
            heater_pin,
            cooler_pin,
            regulation: RegulationMode::default(),
            hysteresis: HYSTERESIS_DEFAULT,
            tick_period_ms: HEATER_TICK_MS_DEFAULT,
            half_rate_toggle: false,
            samples: TEMPERATURE_SAMPLES,
            heat_response: HeatResponseConfig {
                grace_ms: 0,
                rearm_delta: HEAT_RESPONSE_REARM_DELTA_DEFAULT,
                idle_bonus_ms: 0,
            },
        }
    }

    /// Validate parameter bounds and wiring.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sensor.validate()?;
        if self.heater_pin.is_none() && self.cooler_pin.is_none() {
            return Err(ConfigError::ValidationError(format!(
                "heater '{}' has neither heater_pin nor cooler_pin",
                self.name
            )));
        }
        if self.heater_pin.is_some() && self.heater_pin == self.cooler_pin {
            return Err(ConfigError::ValidationError(format!(
                "heater '{}' uses one pin for heating and cooling",
                self.name
            )));
        }
        for pin in [self.heater_pin, self.cooler_pin].into_iter().flatten() {
            if pin.index() >= MAX_PINS {
                return Err(ConfigError::ValidationError(format!(
                    "heater '{}' pin {} out of range [0, {})",
                    self.name, pin.0, MAX_PINS
                )));
            }
        }
        if self.hysteresis < 0 {
            return Err(ConfigError::ValidationError(format!(
                "heater '{}' hysteresis must not be negative",
                self.name
            )));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ValidationError(format!(
                "heater '{}' tick_period_ms must be > 0",
                self.name
            )));
        }
        if self.samples == 0 {
            return Err(ConfigError::ValidationError(format!(
                "heater '{}' samples must be > 0",
                self.name
            )));
        }
        if self.heat_response.is_enabled() && self.heat_response.rearm_delta <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "heater '{}' heat_response.rearm_delta must be > 0",
                self.name
            )));
        }
        Ok(())
    }
}
