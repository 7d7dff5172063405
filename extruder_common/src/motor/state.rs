//! Motor runtime state enums.
//!
//! Mode and status are kept apart: the mode says what the loop is tracking,
//! the status holds the sticky lifecycle/fault latches.

use serde::{Deserialize, Serialize};

/// What the position loop is currently tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MotorMode {
    /// No closed-loop tracking; the drive is left as last commanded.
    #[default]
    Idle = 0,
    /// Setpoint advances by the velocity command every tick.
    SpeedTracking = 1,
    /// Setpoint is fixed; the loop holds it.
    PositionTracking = 2,
}

impl MotorMode {
    /// Whether the loop evaluates PID in this mode.
    #[inline]
    pub const fn is_tracking(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Sticky motor latches.
///
/// Both bits are cleared only by an explicit turn-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorStatus {
    /// Motor switched off (intentional, not a fault).
    pub machine_off: bool,
    /// Tracking error exceeded the jam guard.
    pub jammed: bool,
}

impl MotorStatus {
    /// Power-on state: off, no fault.
    pub const OFF: Self = Self {
        machine_off: true,
        jammed: false,
    };

    /// Running state: no latch set.
    pub const CLEAR: Self = Self {
        machine_off: false,
        jammed: false,
    };

    /// Whether any latch is set.
    #[inline]
    pub const fn is_blocked(&self) -> bool {
        self.machine_off || self.jammed
    }
}

impl Default for MotorStatus {
    fn default() -> Self {
        Self::OFF
    }
}

/// Rotation direction of a drive command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Increasing encoder position.
    #[default]
    Forward,
    /// Decreasing encoder position.
    Reverse,
}

impl Direction {
    /// Direction of a signed controller output (zero counts as `Forward`).
    #[inline]
    pub const fn from_output(output: i32) -> Self {
        if output < 0 { Self::Reverse } else { Self::Forward }
    }
}

/// Abstract actuation command: direction plus 8-bit magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DriveCommand {
    /// Direction of rotation.
    pub direction: Direction,
    /// Magnitude, 0 = no drive, 255 = full scale.
    pub magnitude: u8,
}

impl DriveCommand {
    /// No drive.
    pub const NEUTRAL: Self = Self {
        direction: Direction::Forward,
        magnitude: 0,
    };

    /// Build a command.
    #[inline]
    pub const fn new(direction: Direction, magnitude: u8) -> Self {
        Self {
            direction,
            magnitude,
        }
    }

    /// Whether the command asks for no drive at all.
    #[inline]
    pub const fn is_neutral(&self) -> bool {
        self.magnitude == 0
    }
}
