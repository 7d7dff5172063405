//! Quadrature encoder tracker.
//!
//! The edge callback may run in interrupt context while the motor tick
//! reads the position, so the accumulator is an atomic and every update is
//! one read-modify-write. No debouncing: the edge source is assumed clean.

use core::sync::atomic::{AtomicI32, Ordering};

use extruder_common::fixed::Position;
use extruder_common::hal::{DigitalInput, Level, Pin, QuadratureChannel};
use extruder_common::motor::config::EncoderConfig;

/// Direction of one transition given the levels sampled at the edge.
///
/// A-edge: `+1` when A and B differ. B-edge: `+1` when A and B match.
#[inline]
pub fn count_edge(channel: QuadratureChannel, a: Level, b: Level) -> i32 {
    let forward = match channel {
        QuadratureChannel::A => a != b,
        QuadratureChannel::B => a == b,
    };
    if forward { 1 } else { -1 }
}

/// Position accumulator fed by quadrature edges.
#[derive(Debug)]
pub struct EncoderTracker {
    a_pin: Pin,
    b_pin: Pin,
    position: AtomicI32,
}

impl EncoderTracker {
    /// Tracker at position zero.
    pub const fn new(config: EncoderConfig) -> Self {
        Self {
            a_pin: config.a_pin,
            b_pin: config.b_pin,
            position: AtomicI32::new(0),
        }
    }

    /// Handle one transition on `channel`.
    #[inline]
    pub fn on_edge(&self, hw: &impl DigitalInput, channel: QuadratureChannel) {
        let a = hw.read_digital(self.a_pin);
        let b = hw.read_digital(self.b_pin);
        if count_edge(channel, a, b) > 0 {
            self.position.fetch_add(1, Ordering::Relaxed);
        } else {
            self.position.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Current accumulated position.
    #[inline]
    pub fn position(&self) -> Position {
        Position::from_raw(self.position.load(Ordering::Relaxed))
    }

    /// Channel A input.
    pub const fn a_pin(&self) -> Pin {
        self.a_pin
    }

    /// Channel B input.
    pub const fn b_pin(&self) -> Pin {
        self.b_pin
    }
}
