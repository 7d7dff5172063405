//! Self-rate-limiting against wrapping hardware counters.
//!
//! Every `manage()` entry point owns a [`Deadline`] and returns early while
//! it has not been reached. Comparison is a signed difference so that
//! counter rollover is harmless; a satisfied check advances the deadline by
//! exactly one period, so a starved caller stretches the control period
//! instead of bursting.

/// Whether `now` is at or past `deadline` on a wrapping `u32` clock.
///
/// Valid while the two values are less than `2^31` ticks apart.
#[inline]
pub const fn reached(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// Periodic deadline on a wrapping clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    next: u32,
    period: u32,
}

impl Deadline {
    /// Deadline with the given period, due at clock value 0.
    pub const fn new(period: u32) -> Self {
        Self { next: 0, period }
    }

    /// Make the next poll at or after `now` fire.
    #[inline]
    pub fn reset(&mut self, now: u32) {
        self.next = now;
    }

    /// Fire at most once per call; advances by one period when it fires.
    #[inline]
    pub fn poll(&mut self, now: u32) -> bool {
        if !reached(now, self.next) {
            return false;
        }
        self.next = self.next.wrapping_add(self.period);
        true
    }

    /// Clock value of the next evaluation.
    pub const fn next(&self) -> u32 {
        self.next
    }

    /// Period between evaluations.
    pub const fn period(&self) -> u32 {
        self.period
    }
}
