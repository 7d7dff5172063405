//! Regulation policies.
//!
//! - Hysteresis bang-bang: demand derived from the band position, held
//!   inside the band by single-actuator channels.
//! - Duty command: a wrapping per-tick counter compared against externally
//!   supplied duties (software PWM with a 256-tick period).

use super::band::BandPosition;

/// Requested element states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actuation {
    /// Heater energized.
    pub heat: bool,
    /// Cooler energized.
    pub cool: bool,
}

impl Actuation {
    /// Both elements off.
    pub const OFF: Self = Self {
        heat: false,
        cool: false,
    };
}

/// Hysteresis demand for one tick.
///
/// A dual-actuator channel idles inside the band; a single-actuator
/// channel keeps `held`.
#[inline]
pub const fn hysteresis_demand(
    position: BandPosition,
    held: Actuation,
    has_heater: bool,
    has_cooler: bool,
) -> Actuation {
    match position {
        BandPosition::Below => Actuation {
            heat: has_heater,
            cool: false,
        },
        BandPosition::Above => Actuation {
            heat: false,
            cool: has_cooler,
        },
        BandPosition::Inside => {
            if has_heater && has_cooler {
                Actuation::OFF
            } else {
                held
            }
        }
    }
}

/// Software PWM phase counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftPwm {
    counter: u8,
}

impl SoftPwm {
    /// Restart the period.
    #[inline]
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Phase of the current tick; advances the counter.
    #[inline]
    pub fn advance(&mut self) -> u8 {
        let phase = self.counter;
        self.counter = self.counter.wrapping_add(1);
        phase
    }

    /// Output level of `duty` at `phase` (0 = always off).
    #[inline]
    pub const fn level(phase: u8, duty: u8) -> bool {
        phase < duty
    }

    /// Half-rate toggle: on at even phases.
    #[inline]
    pub const fn toggle(phase: u8) -> bool {
        phase & 1 == 0
    }
}
