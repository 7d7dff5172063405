//! Heater / cooler outputs.

use extruder_common::hal::{DigitalOutput, Level, Pin};

/// Independent binary heater and cooler outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThermalOutputs {
    heater: Option<Pin>,
    cooler: Option<Pin>,
}

impl ThermalOutputs {
    /// Outputs for the given pins (at least one should be present).
    pub const fn new(heater: Option<Pin>, cooler: Option<Pin>) -> Self {
        Self { heater, cooler }
    }

    /// Whether a heating element is wired.
    pub const fn has_heater(&self) -> bool {
        self.heater.is_some()
    }

    /// Whether a cooling element is wired.
    pub const fn has_cooler(&self) -> bool {
        self.cooler.is_some()
    }

    /// Drive both outputs. Requests for a missing element are ignored.
    pub fn apply(&self, hw: &mut impl DigitalOutput, heat: bool, cool: bool) {
        if let Some(pin) = self.heater {
            hw.set_digital(pin, Level::from_bool(heat));
        }
        if let Some(pin) = self.cooler {
            hw.set_digital(pin, Level::from_bool(cool));
        }
    }

    /// De-energize both outputs. Idempotent.
    pub fn disable(&self, hw: &mut impl DigitalOutput) {
        self.apply(hw, false, false);
    }
}
