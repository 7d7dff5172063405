//! HAL addressing and signal types.
//!
//! - `Pin` - Digital or PWM pin number
//! - `AnalogChannel` - Analog input channel number
//! - `Level` - Logic level of a digital signal
//! - `QuadratureChannel` - Which encoder channel produced an edge

use core::ops::Not;

use serde::{Deserialize, Serialize};

/// Digital / PWM pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin(pub u8);

impl Pin {
    /// Index into a pin-addressed table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Analog input channel number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalogChannel(pub u8);

impl AnalogChannel {
    /// Index into a channel-addressed table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Logic level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// De-asserted / 0 V.
    #[default]
    Low,
    /// Asserted / supply.
    High,
}

impl Level {
    /// `true` → `High`.
    #[inline]
    pub const fn from_bool(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }

    /// Whether the level is `High`.
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl Not for Level {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// Quadrature encoder channel that produced an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadratureChannel {
    /// Channel A.
    A,
    /// Channel B.
    B,
}
