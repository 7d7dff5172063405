//! HAL capability traits.
//!
//! The control core consumes hardware through five narrow capabilities
//! instead of compiled-in pin access:
//! - `AnalogInput` - raw converter samples
//! - `DigitalInput` / `DigitalOutput` - binary pins
//! - `PwmOutput` - 8-bit duty outputs
//! - `MonotonicClock` - wrapping microsecond / millisecond counters
//!
//! `Hardware` bundles all of them and is implemented automatically.
//!
//! # Timing Contracts
//!
//! | Operation | Blocking | Called from |
//! |-----------|----------|-------------|
//! | `read_digital()` | never | edge callback (interrupt) and ticks |
//! | `read_analog()` | bounded conversion time | thermal ticks |
//! | `set_digital()` / `set_pwm()` | never | ticks, lifecycle calls |
//! | `now_micros()` / `now_millis()` | never | ticks |

use super::types::{AnalogChannel, Level, Pin};

/// Raw analog sampling.
pub trait AnalogInput {
    /// Read one raw sample (e.g. 0..=1023 for a 10-bit converter).
    fn read_analog(&mut self, channel: AnalogChannel) -> u16;
}

/// Digital pin sampling.
///
/// Takes `&self` so an edge callback can sample the encoder pins while the
/// periodic path holds no exclusive borrow.
pub trait DigitalInput {
    /// Current level of `pin`.
    fn read_digital(&self, pin: Pin) -> Level;
}

/// Digital pin driving.
pub trait DigitalOutput {
    /// Drive `pin` to `level`.
    fn set_digital(&mut self, pin: Pin, level: Level);
}

/// 8-bit PWM driving.
pub trait PwmOutput {
    /// Set the duty of `pin` (0 = always low, 255 = always high).
    fn set_pwm(&mut self, pin: Pin, duty: u8);
}

/// Monotonic wrapping clocks.
///
/// Both counters wrap at `u32::MAX`; consumers compare them with
/// wraparound-safe signed differences.
pub trait MonotonicClock {
    /// Microseconds since an arbitrary epoch.
    fn now_micros(&self) -> u32;
    /// Milliseconds since an arbitrary epoch.
    fn now_millis(&self) -> u32;
}

/// Every capability the control core needs.
pub trait Hardware: AnalogInput + DigitalInput + DigitalOutput + PwmOutput + MonotonicClock {}

impl<T> Hardware for T where T: AnalogInput + DigitalInput + DigitalOutput + PwmOutput + MonotonicClock {}
