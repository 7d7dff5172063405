//! In-memory HAL for host-side testing and simulation.
//!
//! `MemoryHal` keeps every pin, duty and analog sample in fixed-size
//! arrays and owns a pair of wrapping clocks that only move when told to.
//! Inputs and outputs share one pin address space, as on the original
//! microcontroller: writing a pin and reading it back returns the written
//! level, and a simulated sensor drives an input with [`MemoryHal::set_input`].
//!
//! Out-of-range pins read `Low` / 0 and ignore writes.

use crate::consts::{MAX_ANALOG_CHANNELS, MAX_PINS};

use super::driver::{AnalogInput, DigitalInput, DigitalOutput, MonotonicClock, PwmOutput};
use super::types::{AnalogChannel, Level, Pin};

/// Fixed-size in-memory hardware image.
#[derive(Debug, Clone)]
pub struct MemoryHal {
    /// Pin levels (driven outputs or externally set inputs).
    levels: [Level; MAX_PINS],
    /// Last PWM duty per pin.
    duties: [u8; MAX_PINS],
    /// Raw analog samples per channel.
    analog: [u16; MAX_ANALOG_CHANNELS],
    /// Microsecond counter (wrapping).
    micros: u32,
    /// Millisecond counter (wrapping).
    millis: u32,
    /// Microseconds not yet carried into `millis`.
    sub_millis: u32,
    /// Number of `set_digital` calls per pin.
    digital_writes: [u32; MAX_PINS],
    /// Number of `set_pwm` calls per pin.
    pwm_writes: [u32; MAX_PINS],
    /// Number of `read_analog` calls.
    analog_reads: u32,
}

impl Default for MemoryHal {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHal {
    /// All pins low, all duties zero, clocks at zero.
    pub const fn new() -> Self {
        Self {
            levels: [Level::Low; MAX_PINS],
            duties: [0; MAX_PINS],
            analog: [0; MAX_ANALOG_CHANNELS],
            micros: 0,
            millis: 0,
            sub_millis: 0,
            digital_writes: [0; MAX_PINS],
            pwm_writes: [0; MAX_PINS],
            analog_reads: 0,
        }
    }

    // ─── Stimulus ───────────────────────────────────────────────────

    /// Drive an input pin from outside (sensor, encoder, switch).
    pub fn set_input(&mut self, pin: Pin, level: Level) {
        if let Some(slot) = self.levels.get_mut(pin.index()) {
            *slot = level;
        }
    }

    /// Present a raw sample on an analog channel.
    pub fn set_analog(&mut self, channel: AnalogChannel, raw: u16) {
        if let Some(slot) = self.analog.get_mut(channel.index()) {
            *slot = raw;
        }
    }

    /// Set both clocks explicitly (e.g. just before a rollover).
    pub fn set_clock(&mut self, micros: u32, millis: u32) {
        self.micros = micros;
        self.millis = millis;
        self.sub_millis = 0;
    }

    /// Advance both clocks by `us` microseconds.
    pub fn advance_micros(&mut self, us: u32) {
        self.micros = self.micros.wrapping_add(us);
        let total = u64::from(self.sub_millis) + u64::from(us);
        self.millis = self.millis.wrapping_add((total / 1000) as u32);
        self.sub_millis = (total % 1000) as u32;
    }

    /// Advance both clocks by `ms` milliseconds.
    pub fn advance_millis(&mut self, ms: u32) {
        self.micros = self.micros.wrapping_add(ms.wrapping_mul(1000));
        self.millis = self.millis.wrapping_add(ms);
    }

    // ─── Observation ────────────────────────────────────────────────

    /// Current level of a pin.
    pub fn level(&self, pin: Pin) -> Level {
        self.levels.get(pin.index()).copied().unwrap_or_default()
    }

    /// Last PWM duty written to a pin.
    pub fn duty(&self, pin: Pin) -> u8 {
        self.duties.get(pin.index()).copied().unwrap_or(0)
    }

    /// Raw sample currently presented on a channel.
    pub fn analog(&self, channel: AnalogChannel) -> u16 {
        self.analog.get(channel.index()).copied().unwrap_or(0)
    }

    /// Number of digital writes to a pin so far.
    pub fn digital_writes(&self, pin: Pin) -> u32 {
        self.digital_writes.get(pin.index()).copied().unwrap_or(0)
    }

    /// Number of PWM writes to a pin so far.
    pub fn pwm_writes(&self, pin: Pin) -> u32 {
        self.pwm_writes.get(pin.index()).copied().unwrap_or(0)
    }

    /// Number of analog reads so far.
    pub const fn analog_reads(&self) -> u32 {
        self.analog_reads
    }
}

impl AnalogInput for MemoryHal {
    fn read_analog(&mut self, channel: AnalogChannel) -> u16 {
        self.analog_reads = self.analog_reads.wrapping_add(1);
        self.analog(channel)
    }
}

impl DigitalInput for MemoryHal {
    fn read_digital(&self, pin: Pin) -> Level {
        self.level(pin)
    }
}

impl DigitalOutput for MemoryHal {
    fn set_digital(&mut self, pin: Pin, level: Level) {
        let i = pin.index();
        if let (Some(slot), Some(count)) = (self.levels.get_mut(i), self.digital_writes.get_mut(i)) {
            *slot = level;
            *count = count.wrapping_add(1);
        }
    }
}

impl PwmOutput for MemoryHal {
    fn set_pwm(&mut self, pin: Pin, duty: u8) {
        let i = pin.index();
        if let (Some(slot), Some(count)) = (self.duties.get_mut(i), self.pwm_writes.get_mut(i)) {
            *slot = duty;
            *count = count.wrapping_add(1);
        }
    }
}

impl MonotonicClock for MemoryHal {
    fn now_micros(&self) -> u32 {
        self.micros
    }

    fn now_millis(&self) -> u32 {
        self.millis
    }
}
