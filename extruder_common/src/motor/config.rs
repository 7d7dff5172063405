//! Motor axis configuration.
//!
//! All types use `serde::Deserialize` for TOML loading; optional fields
//! carry `#[serde(default = ...)]` so older files keep loading.
//!
//! # TOML Example
//!
//! ```toml
//! [motor]
//! time_resolution_bits = 6
//! velocity_frac_bits = 8
//! encoder = { a_pin = 3, b_pin = 2 }
//!
//! [motor.drive]
//! topology = "dual_pwm_bridge"
//! pin_a = 10
//! pin_b = 9
//! enable_pin = 18
//!
//! [motor.tuning]
//! p = 11585
//! i = 0
//! d = 16
//! integral_limit = 0
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::{
    JAM_DISTANCE_DEFAULT, JAM_SUSTAIN_TICKS_DEFAULT, MAX_PINS, MAX_RATE_SHIFT,
    MOTOR_TIME_RESOLUTION_BITS, VELOCITY_FRAC_BITS,
};
use crate::hal::Pin;

// ─── Gains & Tuning ─────────────────────────────────────────────────

/// PID gains as multipliers scaled by `2^GAIN_SHIFT` (256 = ×1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain.
    pub p: i32,
    /// Integral gain (0 = disabled).
    pub i: i32,
    /// Derivative gain (0 = disabled).
    pub d: i32,
}

/// Full runtime-tunable loop parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorTuning {
    /// PID gains.
    #[serde(flatten)]
    pub gains: PidGains,
    /// Lower clamp of the integral state (default 0: one-sided anti-windup).
    #[serde(default)]
    pub integral_min: i32,
    /// Upper clamp of the integral state.
    #[serde(default = "default_integral_limit")]
    pub integral_limit: i32,
    /// Magnitudes at or below this value are commanded as zero.
    #[serde(default)]
    pub deadband: u8,
    /// Smallest non-zero magnitude handed to the drive.
    #[serde(default)]
    pub min_output: u8,
}

fn default_integral_limit() -> i32 {
    128
}

impl Default for MotorTuning {
    fn default() -> Self {
        Self {
            gains: PidGains {
                p: 8 << 8,
                i: 128,
                d: 256,
            },
            integral_min: 0,
            integral_limit: default_integral_limit(),
            deadband: 0,
            min_output: 0,
        }
    }
}

impl MotorTuning {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.integral_min > self.integral_limit {
            return Err(ConfigError::ValidationError(format!(
                "integral_min {} exceeds integral_limit {}",
                self.integral_min, self.integral_limit
            )));
        }
        Ok(())
    }
}

// ─── Jam Guard ──────────────────────────────────────────────────────

/// Jam detection: latch `Jammed` when `|error|` stays above `distance`
/// for `sustain_ticks` consecutive control ticks. Disabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JamGuardConfig {
    /// Guard active.
    #[serde(default)]
    pub enabled: bool,
    /// Tracking error threshold [encoder counts].
    #[serde(default = "default_jam_distance")]
    pub distance: i32,
    /// Consecutive ticks beyond `distance` before latching.
    #[serde(default = "default_jam_sustain_ticks")]
    pub sustain_ticks: u16,
}

fn default_jam_distance() -> i32 {
    JAM_DISTANCE_DEFAULT
}
fn default_jam_sustain_ticks() -> u16 {
    JAM_SUSTAIN_TICKS_DEFAULT
}

impl Default for JamGuardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            distance: JAM_DISTANCE_DEFAULT,
            sustain_ticks: JAM_SUSTAIN_TICKS_DEFAULT,
        }
    }
}

// ─── Hardware Wiring ────────────────────────────────────────────────

/// Quadrature encoder pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Channel A input.
    pub a_pin: Pin,
    /// Channel B input.
    pub b_pin: Pin,
}

/// H-bridge topology, chosen once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topology", rename_all = "snake_case")]
pub enum MotorDriveConfig {
    /// One PWM magnitude pin plus one direction pin.
    SinglePwmDirection {
        /// PWM magnitude output.
        pwm_pin: Pin,
        /// Direction output.
        dir_pin: Pin,
        /// Swap the direction polarity.
        #[serde(default)]
        invert_direction: bool,
    },
    /// Two PWM half-bridge inputs, no direction pin.
    DualPwmBridge {
        /// First bridge input.
        pin_a: Pin,
        /// Second bridge input.
        pin_b: Pin,
        /// Optional bridge enable output.
        #[serde(default)]
        enable_pin: Option<Pin>,
        /// Opto-isolated inputs: full scale means "not energized".
        #[serde(default = "default_inverted_logic")]
        inverted_logic: bool,
    },
}

fn default_inverted_logic() -> bool {
    true
}

impl MotorDriveConfig {
    /// Every output pin used by the topology.
    pub fn pins(&self) -> heapless::Vec<Pin, 3> {
        let mut pins = heapless::Vec::new();
        match *self {
            Self::SinglePwmDirection { pwm_pin, dir_pin, .. } => {
                let _ = pins.push(pwm_pin);
                let _ = pins.push(dir_pin);
            }
            Self::DualPwmBridge {
                pin_a,
                pin_b,
                enable_pin,
                ..
            } => {
                let _ = pins.push(pin_a);
                let _ = pins.push(pin_b);
                if let Some(en) = enable_pin {
                    let _ = pins.push(en);
                }
            }
        }
        pins
    }
}

// ─── Motor Config ───────────────────────────────────────────────────

/// Complete configuration of one motor axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorConfig {
    /// Control rate exponent: the loop runs at `2^bits` Hz.
    #[serde(default = "default_time_resolution_bits")]
    pub time_resolution_bits: u8,
    /// Fractional bits of the velocity command.
    #[serde(default = "default_velocity_frac_bits")]
    pub velocity_frac_bits: u8,
    /// Encoder wiring.
    pub encoder: EncoderConfig,
    /// Drive wiring and topology.
    pub drive: MotorDriveConfig,
    /// Initial loop tuning.
    #[serde(default)]
    pub tuning: MotorTuning,
    /// Jam guard.
    #[serde(default)]
    pub jam_guard: JamGuardConfig,
}

fn default_time_resolution_bits() -> u8 {
    MOTOR_TIME_RESOLUTION_BITS
}
fn default_velocity_frac_bits() -> u8 {
    VELOCITY_FRAC_BITS
}

impl MotorConfig {
    /// Control period in microseconds (`1 s >> time_resolution_bits`).
    #[inline]
    pub const fn tick_period_us(&self) -> u32 {
        1_000_000u32 >> self.time_resolution_bits
    }

    /// Combined shift of the velocity rate integrator.
    #[inline]
    pub const fn rate_shift(&self) -> u32 {
        self.time_resolution_bits as u32 + self.velocity_frac_bits as u32
    }

    /// Validate parameter bounds and wiring.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_resolution_bits == 0 || self.time_resolution_bits > 16 {
            return Err(ConfigError::ValidationError(format!(
                "time_resolution_bits {} out of range [1, 16]",
                self.time_resolution_bits
            )));
        }
        if u16::from(self.time_resolution_bits) + u16::from(self.velocity_frac_bits)
            > u16::from(MAX_RATE_SHIFT)
        {
            return Err(ConfigError::ValidationError(format!(
                "time_resolution_bits + velocity_frac_bits exceeds {}",
                MAX_RATE_SHIFT
            )));
        }
        if self.encoder.a_pin == self.encoder.b_pin {
            return Err(ConfigError::ValidationError(
                "encoder a_pin and b_pin must differ".to_string(),
            ));
        }
        for pin in [self.encoder.a_pin, self.encoder.b_pin] {
            if pin.index() >= MAX_PINS {
                return Err(ConfigError::ValidationError(format!(
                    "encoder pin {} out of range [0, {})",
                    pin.0, MAX_PINS
                )));
            }
        }

        let drive_pins = self.drive.pins();
        for (i, pin) in drive_pins.iter().enumerate() {
            if pin.index() >= MAX_PINS {
                return Err(ConfigError::ValidationError(format!(
                    "drive pin {} out of range [0, {})",
                    pin.0, MAX_PINS
                )));
            }
            if drive_pins[..i].contains(pin)
                || *pin == self.encoder.a_pin
                || *pin == self.encoder.b_pin
            {
                return Err(ConfigError::ValidationError(format!(
                    "pin {} assigned twice",
                    pin.0
                )));
            }
        }

        self.tuning.validate()?;

        if self.jam_guard.enabled && (self.jam_guard.distance <= 0 || self.jam_guard.sustain_ticks == 0) {
            return Err(ConfigError::ValidationError(
                "jam_guard requires distance > 0 and sustain_ticks > 0".to_string(),
            ));
        }
        Ok(())
    }
}
