//! Heater runtime state.

use serde::{Deserialize, Serialize};

/// Sticky heater latches.
///
/// `invalid_response` and `sensor_disconnected` are fatal: they survive
/// every tick until an explicit turn-on clears them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaterStatus {
    /// Channel switched off (intentional, not a fault).
    pub machine_off: bool,
    /// Heat-response watchdog tripped.
    pub invalid_response: bool,
    /// Sensor could not produce a plausible temperature.
    pub sensor_disconnected: bool,
}

impl HeaterStatus {
    /// Power-on state: off, no fault.
    pub const OFF: Self = Self {
        machine_off: true,
        invalid_response: false,
        sensor_disconnected: false,
    };

    /// Running state: no latch set.
    pub const CLEAR: Self = Self {
        machine_off: false,
        invalid_response: false,
        sensor_disconnected: false,
    };

    /// Whether any latch is set (actuation forbidden).
    #[inline]
    pub const fn is_blocked(&self) -> bool {
        self.machine_off || self.invalid_response || self.sensor_disconnected
    }
}

impl Default for HeaterStatus {
    fn default() -> Self {
        Self::OFF
    }
}

/// Regulation sub-state, derived every tick from the driven outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ThermalPhase {
    /// Heater energized.
    Heating = 0,
    /// Nothing energized.
    #[default]
    Idle = 1,
    /// Cooler energized.
    Cooling = 2,
}

/// Regulation band `[low, high]` around the setpoint [°C].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TemperatureBand {
    /// Heat at or below this temperature.
    pub low: i32,
    /// Stop heating / start cooling above this temperature.
    pub high: i32,
}

impl TemperatureBand {
    /// Strictly inside the hold region `(low, high]`.
    #[inline]
    pub const fn holds(&self, measured: i32) -> bool {
        measured > self.low && measured <= self.high
    }
}
