//! Hysteresis band derivation.
//!
//! The slack sits on the side of the actuator that exists: a heater gets
//! `setpoint − hysteresis` as its switch-on edge, a cooler gets
//! `setpoint + hysteresis`. Without the matching actuator the edge
//! collapses onto the setpoint.

use extruder_common::thermal::state::TemperatureBand;

/// Where a measurement falls relative to a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandPosition {
    /// `measured <= low`: heat.
    Below,
    /// `low < measured <= high`: hold.
    Inside,
    /// `measured > high`: stop heating / cool.
    Above,
}

/// Band for a channel with the given actuators.
#[inline]
pub const fn regulation_band(
    setpoint: i32,
    hysteresis: i32,
    has_heater: bool,
    has_cooler: bool,
) -> TemperatureBand {
    TemperatureBand {
        low: if has_heater { setpoint.saturating_sub(hysteresis) } else { setpoint },
        high: if has_cooler { setpoint.saturating_add(hysteresis) } else { setpoint },
    }
}

/// Classify a measurement.
#[inline]
pub const fn classify(band: &TemperatureBand, measured: i32) -> BandPosition {
    if measured <= band.low {
        BandPosition::Below
    } else if measured > band.high {
        BandPosition::Above
    } else {
        BandPosition::Inside
    }
}
