//! Construction errors.
//!
//! The periodic control path never fails: faults are sticky latches read
//! through status queries. Only building supervisors from configuration
//! can be refused.

use extruder_common::config::ConfigError;
use extruder_common::consts::MAX_HEATERS;
use thiserror::Error;

/// Error building a supervisor or controller from configuration.
#[derive(Debug, Clone, Error)]
pub enum ControlError {
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Thermistor table cannot be interpolated.
    #[error("invalid calibration table: {0}")]
    InvalidCalibrationTable(String),

    /// More thermal channels than the controller can hold.
    #[error("too many heaters: {0} (max {max})", max = MAX_HEATERS)]
    TooManyHeaters(usize),

    /// Thermal channel has neither a heater nor a cooler output.
    #[error("heater '{0}' has no actuator")]
    NoActuator(String),
}
