//! Configuration loading traits and types.
//!
//! Every crate in the workspace loads its TOML configuration through
//! [`ConfigLoader`]; the controller's complete wiring and tuning lives in
//! [`MachineConfig`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use extruder_common::config::{ConfigError, MachineConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = MachineConfig::from_file(Path::new("extruder.toml"))?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::consts::MAX_HEATERS;
use crate::hal::Pin;
use crate::motor::config::MotorConfig;
use crate::thermal::config::HeaterConfig;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, per-tick tracing.
    Trace,
    /// Debug information useful during commissioning.
    Debug,
    /// Lifecycle transitions.
    #[default]
    Info,
    /// Fault latches.
    Warn,
    /// Serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by an `EnvFilter`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields shared across all applications.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "extruder-sim-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;
        debug!(path = %path.display(), bytes = content.len(), "configuration read");

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation: any serde-deserializable struct can be loaded.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

// ─── Machine Config ─────────────────────────────────────────────────

/// Complete controller configuration: one motor plus up to
/// [`MAX_HEATERS`] thermal channels.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "extruder"
///
/// [motor]
/// encoder = { a_pin = 3, b_pin = 2 }
/// drive = { topology = "single_pwm_direction", pwm_pin = 10, dir_pin = 9 }
///
/// [[heaters]]
/// heater_pin = 6
/// sensor = { kind = "thermocouple", channel = 0 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Shared service settings.
    pub shared: SharedConfig,
    /// Motor axis.
    pub motor: MotorConfig,
    /// Thermal channels.
    #[serde(default)]
    pub heaters: Vec<HeaterConfig>,
}

impl MachineConfig {
    /// Load and validate in one step.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section and cross-check pin usage between units.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.motor.validate()?;

        if self.heaters.len() > MAX_HEATERS {
            return Err(ConfigError::ValidationError(format!(
                "Too many heaters: {} (max {})",
                self.heaters.len(),
                MAX_HEATERS
            )));
        }

        let mut used: Vec<Pin> = self.motor.drive.pins().iter().copied().collect();
        used.push(self.motor.encoder.a_pin);
        used.push(self.motor.encoder.b_pin);
        let mut channels = Vec::with_capacity(self.heaters.len());

        for heater in &self.heaters {
            heater.validate()?;
            for pin in [heater.heater_pin, heater.cooler_pin].into_iter().flatten() {
                if used.contains(&pin) {
                    return Err(ConfigError::ValidationError(format!(
                        "pin {} of heater '{}' already in use",
                        pin.0, heater.name
                    )));
                }
                used.push(pin);
            }
            let channel = heater.sensor.channel();
            if channels.contains(&channel) {
                return Err(ConfigError::ValidationError(format!(
                    "analog channel {} used by more than one heater",
                    channel.0
                )));
            }
            channels.push(channel);
        }

        Ok(())
    }
}
