//! Compact fault summary exposed to the protocol layer.
//!
//! Supervisors keep their latches as explicit structs ([`MotorStatus`],
//! [`HeaterStatus`]); this module folds them into one byte the way the
//! status packet reports them.

use bitflags::bitflags;

use crate::motor::state::MotorStatus;
use crate::thermal::state::HeaterStatus;

bitflags! {
    /// Fault summary of one controller.
    ///
    /// FATAL flags (→ actuators de-energized until turn-on): SENSOR_DISCONNECTED,
    /// HEATER_RESPONSE, MOTOR_JAMMED.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FaultFlags: u8 {
        /// At least one unit is switched off (informational).
        const MACHINE_OFF         = 0x01;
        /// Temperature sensor unresolvable. **FATAL**.
        const SENSOR_DISCONNECTED = 0x02;
        /// Heating element not responding. **FATAL**.
        const HEATER_RESPONSE     = 0x04;
        /// Motor tracking error beyond the jam guard. **FATAL**.
        const MOTOR_JAMMED        = 0x08;
    }
}

impl FaultFlags {
    /// Mask of all FATAL flags.
    pub const FATAL_MASK: Self = Self::from_bits_truncate(
        Self::SENSOR_DISCONNECTED.bits()
            | Self::HEATER_RESPONSE.bits()
            | Self::MOTOR_JAMMED.bits(),
    );

    /// Returns true if any FATAL flag is set.
    #[inline]
    pub const fn has_fatal(&self) -> bool {
        self.intersects(Self::FATAL_MASK)
    }
}

impl Default for FaultFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<MotorStatus> for FaultFlags {
    fn from(status: MotorStatus) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::MACHINE_OFF, status.machine_off);
        flags.set(Self::MOTOR_JAMMED, status.jammed);
        flags
    }
}

impl From<HeaterStatus> for FaultFlags {
    fn from(status: HeaterStatus) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::MACHINE_OFF, status.machine_off);
        flags.set(Self::HEATER_RESPONSE, status.invalid_response);
        flags.set(Self::SENSOR_DISCONNECTED, status.sensor_disconnected);
        flags
    }
}
