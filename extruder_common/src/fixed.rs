//! Fixed-point encoder position.
//!
//! Positions are signed integers scaled by `2^POSITION_FRAC_BITS`; one
//! encoder transition moves the raw value by exactly one LSB. Arithmetic
//! wraps like the hardware counter it models.

use core::fmt;
use core::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::POSITION_FRAC_BITS;

/// Signed fixed-point position with `POSITION_FRAC_BITS` fractional bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(i32);

impl Position {
    /// Origin.
    pub const ZERO: Self = Self(0);

    /// Mask selecting the fractional bits.
    pub const FRAC_MASK: i32 = (1 << POSITION_FRAC_BITS) - 1;

    /// Wrap a raw count value.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Build from a whole number of units (`100` → raw `102400`).
    #[inline]
    pub const fn from_int(whole: i32) -> Self {
        Self(whole.wrapping_shl(POSITION_FRAC_BITS))
    }

    /// Raw count value.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer part (arithmetic shift, rounds toward −∞).
    #[inline]
    pub const fn whole(self) -> i32 {
        self.0 >> POSITION_FRAC_BITS
    }

    /// Fractional part in counts, always in `0..2^POSITION_FRAC_BITS`.
    #[inline]
    pub const fn fraction(self) -> i32 {
        self.0 & Self::FRAC_MASK
    }

    /// Offset by a signed number of counts.
    #[inline]
    pub const fn offset(self, counts: i32) -> Self {
        Self(self.0.wrapping_add(counts))
    }

    /// Signed distance `self − other` in counts.
    #[inline]
    pub const fn counts_from(self, other: Self) -> i32 {
        self.0.wrapping_sub(other.0)
    }
}

impl Add for Position {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Position {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = i64::from(self.0).unsigned_abs();
        let whole = magnitude >> POSITION_FRAC_BITS;
        let milli = ((magnitude & Self::FRAC_MASK as u64) * 1000) >> POSITION_FRAC_BITS;
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{whole}.{milli:03}")
    }
}
