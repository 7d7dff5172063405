//! System-wide constants for the extruder controller workspace.
//!
//! Single source of truth for fixed-point widths, actuation limits and
//! default tunables. Imported by all crates; no duplication permitted.

use static_assertions::const_assert;

// ─── Fixed-Point Formats ────────────────────────────────────────────

/// Fractional bits of the encoder position format (one encoder count = 1 LSB).
pub const POSITION_FRAC_BITS: u32 = 10;

/// Default motor control rate as a power of two: `1 s >> 6` = 64 Hz.
pub const MOTOR_TIME_RESOLUTION_BITS: u8 = 6;

/// Default fractional bits of the velocity command.
pub const VELOCITY_FRAC_BITS: u8 = 8;

/// PID gains are multipliers scaled by `2^GAIN_SHIFT`.
pub const GAIN_SHIFT: u32 = 8;

/// Velocity feed-forward divisor (`velocity_command / 128`).
pub const FEED_FORWARD_DIVISOR: i32 = 128;

/// Upper bound for `time_resolution_bits + velocity_frac_bits`.
pub const MAX_RATE_SHIFT: u8 = 30;

// ─── Actuation ──────────────────────────────────────────────────────

/// Full-scale PWM duty.
pub const PWM_MAX: u8 = 255;

/// Default jam distance [encoder counts].
pub const JAM_DISTANCE_DEFAULT: i32 = 128;

/// Default number of consecutive ticks beyond the jam distance.
pub const JAM_SUSTAIN_TICKS_DEFAULT: u16 = 16;

// ─── Thermal ────────────────────────────────────────────────────────

/// Raw analog reads averaged into one temperature sample.
pub const TEMPERATURE_SAMPLES: u8 = 5;

/// Largest raw value produced by the 10-bit analog converter.
pub const ADC_MAX: u16 = 1023;

/// Thermocouple amplifier full scale [°C] over the converter span.
pub const THERMOCOUPLE_FULL_SCALE_C: i32 = 5 * 100;

/// Converter span used by the thermocouple scale.
pub const THERMOCOUPLE_ADC_SPAN: i32 = 1024;

/// Default heater control period [ms].
pub const HEATER_TICK_MS_DEFAULT: u32 = 100;

/// Default hysteresis [°C].
pub const HYSTERESIS_DEFAULT: i32 = 2;

/// Default heat-response re-arm delta [°C].
pub const HEAT_RESPONSE_REARM_DELTA_DEFAULT: i32 = 5;

// ─── Capacities ─────────────────────────────────────────────────────

/// Maximum heater channels per controller.
pub const MAX_HEATERS: usize = 2;

/// Maximum thermistor calibration points.
pub const MAX_CALIBRATION_POINTS: usize = 32;

/// Maximum length of a heater name.
pub const MAX_NAME_LEN: usize = 16;

/// Digital/PWM pin address space of the HAL.
pub const MAX_PINS: usize = 64;

/// Analog channel address space of the HAL.
pub const MAX_ANALOG_CHANNELS: usize = 16;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/extruder/extruder.toml";

const_assert!(MOTOR_TIME_RESOLUTION_BITS + VELOCITY_FRAC_BITS <= MAX_RATE_SHIFT);
const_assert!(POSITION_FRAC_BITS < 16);
const_assert!(MAX_HEATERS >= 1);
const_assert!(TEMPERATURE_SAMPLES > 0);
