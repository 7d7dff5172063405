//! Fixed-point rate integrator.
//!
//! Equivalent to `setpoint += velocity * dt` without a division: the
//! velocity is summed into an accumulator whose bits above `shift` are
//! whole counts and whose low bits carry the sub-count remainder.

/// Sub-count accumulator of the velocity command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateIntegrator {
    acc: i32,
}

impl RateIntegrator {
    /// Drop the carried remainder.
    #[inline]
    pub fn reset(&mut self) {
        self.acc = 0;
    }

    /// Carried remainder, always in `0..2^shift`.
    #[inline]
    pub const fn remainder(&self) -> i32 {
        self.acc
    }

    /// Add one tick of `velocity`; return the whole counts to add to the
    /// setpoint.
    #[inline]
    pub fn advance(&mut self, velocity: i32, shift: u32) -> i32 {
        self.acc = self.acc.wrapping_add(velocity);
        let whole = self.acc >> shift;
        self.acc &= (1i32 << shift) - 1;
        whole
    }
}
