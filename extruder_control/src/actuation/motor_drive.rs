//! H-bridge drive adapters.
//!
//! | Topology | Forward | Reverse | Neutral |
//! |----------|---------|---------|---------|
//! | `SinglePwmDirection` | dir = LOW, pwm = m | dir = HIGH, pwm = m | pwm = 0, dir = LOW |
//! | `DualPwmBridge` | a = lvl(m), b = lvl(0) | a = lvl(0), b = lvl(m) | a = b = lvl(0) |
//!
//! `invert_direction` swaps the direction level. With `inverted_logic`
//! (opto-isolated inputs), `lvl(m) = 255 − m`, so neutral is full scale.

use extruder_common::consts::PWM_MAX;
use extruder_common::hal::{DigitalOutput, Level, Pin, PwmOutput};
use extruder_common::motor::config::MotorDriveConfig;
use extruder_common::motor::state::{Direction, DriveCommand};

/// Drive topology with its pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorDrive {
    /// One PWM magnitude output plus a direction output.
    SinglePwmDirection {
        /// PWM magnitude output.
        pwm_pin: Pin,
        /// Direction output.
        dir_pin: Pin,
        /// Swap direction polarity.
        invert_direction: bool,
    },
    /// Two PWM half-bridge inputs, optional enable output.
    DualPwmBridge {
        /// First bridge input.
        pin_a: Pin,
        /// Second bridge input.
        pin_b: Pin,
        /// Bridge enable output.
        enable_pin: Option<Pin>,
        /// Full scale means "not energized".
        inverted_logic: bool,
    },
}

impl From<MotorDriveConfig> for MotorDrive {
    fn from(config: MotorDriveConfig) -> Self {
        match config {
            MotorDriveConfig::SinglePwmDirection {
                pwm_pin,
                dir_pin,
                invert_direction,
            } => Self::SinglePwmDirection {
                pwm_pin,
                dir_pin,
                invert_direction,
            },
            MotorDriveConfig::DualPwmBridge {
                pin_a,
                pin_b,
                enable_pin,
                inverted_logic,
            } => Self::DualPwmBridge {
                pin_a,
                pin_b,
                enable_pin,
                inverted_logic,
            },
        }
    }
}

#[inline]
const fn bridge_level(inverted_logic: bool, magnitude: u8) -> u8 {
    if inverted_logic { PWM_MAX - magnitude } else { magnitude }
}

impl MotorDrive {
    /// Apply a direction and magnitude.
    pub fn apply<H: DigitalOutput + PwmOutput>(&self, hw: &mut H, command: DriveCommand) {
        match *self {
            Self::SinglePwmDirection {
                pwm_pin,
                dir_pin,
                invert_direction,
            } => {
                let forward = command.direction == Direction::Forward;
                hw.set_digital(dir_pin, Level::from_bool(forward == invert_direction));
                hw.set_pwm(pwm_pin, command.magnitude);
            }
            Self::DualPwmBridge {
                pin_a,
                pin_b,
                inverted_logic,
                ..
            } => {
                let driven = bridge_level(inverted_logic, command.magnitude);
                let idle = bridge_level(inverted_logic, 0);
                let (a, b) = match command.direction {
                    Direction::Forward => (driven, idle),
                    Direction::Reverse => (idle, driven),
                };
                hw.set_pwm(pin_a, a);
                hw.set_pwm(pin_b, b);
            }
        }
    }

    /// Drive neutral and release the bridge enable.
    pub fn enable<H: DigitalOutput + PwmOutput>(&self, hw: &mut H) {
        self.neutral(hw);
        if let Self::DualPwmBridge {
            enable_pin: Some(en),
            ..
        } = *self
        {
            hw.set_digital(en, Level::High);
        }
    }

    /// Drive neutral and drop the bridge enable. Idempotent.
    pub fn disable<H: DigitalOutput + PwmOutput>(&self, hw: &mut H) {
        self.neutral(hw);
        if let Self::DualPwmBridge {
            enable_pin: Some(en),
            ..
        } = *self
        {
            hw.set_digital(en, Level::Low);
        }
    }

    fn neutral<H: DigitalOutput + PwmOutput>(&self, hw: &mut H) {
        match *self {
            Self::SinglePwmDirection {
                pwm_pin, dir_pin, ..
            } => {
                hw.set_pwm(pwm_pin, 0);
                hw.set_digital(dir_pin, Level::Low);
            }
            Self::DualPwmBridge {
                pin_a,
                pin_b,
                inverted_logic,
                ..
            } => {
                let idle = bridge_level(inverted_logic, 0);
                hw.set_pwm(pin_a, idle);
                hw.set_pwm(pin_b, idle);
            }
        }
    }

    /// Decode the command presented on the drive pins.
    ///
    /// Inverse of [`MotorDrive::apply`]; used by plant models and tests.
    pub fn decode(&self, levels: impl Fn(Pin) -> Level, duties: impl Fn(Pin) -> u8) -> DriveCommand {
        match *self {
            Self::SinglePwmDirection {
                pwm_pin,
                dir_pin,
                invert_direction,
            } => {
                let forward = levels(dir_pin).is_high() == invert_direction;
                let direction = if forward {
                    Direction::Forward
                } else {
                    Direction::Reverse
                };
                DriveCommand::new(direction, duties(pwm_pin))
            }
            Self::DualPwmBridge {
                pin_a,
                pin_b,
                enable_pin,
                inverted_logic,
            } => {
                if enable_pin.is_some_and(|en| !levels(en).is_high()) {
                    return DriveCommand::NEUTRAL;
                }
                let a = bridge_level(inverted_logic, duties(pin_a));
                let b = bridge_level(inverted_logic, duties(pin_b));
                if a >= b {
                    DriveCommand::new(Direction::Forward, a - b)
                } else {
                    DriveCommand::new(Direction::Reverse, b - a)
                }
            }
        }
    }
}
