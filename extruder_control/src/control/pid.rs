//! Fixed-point PID with a clamped integral.
//!
//! Gains are multipliers scaled by `2^GAIN_SHIFT` (256 = ×1). The integral
//! state is clamped to `[integral_min, integral_limit]`; the default lower
//! bound of 0 gives one-sided anti-windup. Zero `i` disables the integral
//! term, zero `d` the derivative term.

use extruder_common::consts::GAIN_SHIFT;
use extruder_common::motor::config::MotorTuning;
use static_assertions::const_assert;

// Scaled products are shifted within i64.
const_assert!(GAIN_SHIFT < 32);

/// Controller memory carried between ticks.
///
/// Must be reset (via [`PidState::reset`]) whenever the loop stops
/// tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PidState {
    /// Clamped error accumulator.
    integral: i32,
    /// Error of the previous tick.
    prev_error: i32,
}

impl PidState {
    /// Reset all internal state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Current integral state.
    #[inline]
    pub const fn integral(&self) -> i32 {
        self.integral
    }

    /// Error seen on the previous tick.
    #[inline]
    pub const fn prev_error(&self) -> i32 {
        self.prev_error
    }
}

#[inline]
fn scale(value: i64, gain: i32) -> i64 {
    value.saturating_mul(i64::from(gain)) >> GAIN_SHIFT
}

/// Compute one PID tick.
///
/// ```text
/// output = (e·p >> 8) + (clamp(Σe)·i >> 8) − ((e − e_prev)·d >> 8)
/// ```
///
/// Returns the unshaped signed output, saturated to `i32`.
#[inline]
pub fn pid_compute(state: &mut PidState, tuning: &MotorTuning, error: i32) -> i32 {
    let gains = tuning.gains;

    // ── P term ──────────────────────────────────────────────
    let p_term = scale(i64::from(error), gains.p);

    // ── I term ──────────────────────────────────────────────
    state.integral = state
        .integral
        .saturating_add(error)
        .clamp(tuning.integral_min, tuning.integral_limit);
    let i_term = scale(i64::from(state.integral), gains.i);

    // ── D term ──────────────────────────────────────────────
    let d_term = scale(i64::from(error) - i64::from(state.prev_error), gains.d);
    state.prev_error = error;

    let output = p_term + i_term - d_term;
    output.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use extruder_common::motor::config::PidGains;

    fn tuning(p: i32, i: i32, d: i32) -> MotorTuning {
        MotorTuning {
            gains: PidGains { p, i, d },
            integral_min: 0,
            integral_limit: 128,
            deadband: 0,
            min_output: 0,
        }
    }

    #[test]
    fn pure_proportional() {
        let mut s = PidState::default();
        assert_eq!(pid_compute(&mut s, &tuning(512, 0, 0), 10), 20);
        assert_eq!(pid_compute(&mut s, &tuning(512, 0, 0), -10), -20);
    }

    #[test]
    fn integral_clamps_to_bounds() {
        let mut s = PidState::default();
        let t = tuning(0, 256, 0);
        for _ in 0..10 {
            pid_compute(&mut s, &t, 50);
        }
        assert_eq!(s.integral(), 128);
        for _ in 0..10 {
            pid_compute(&mut s, &t, -500);
        }
        assert_eq!(s.integral(), 0);
    }

    #[test]
    fn integral_lower_bound_is_configurable() {
        let mut s = PidState::default();
        let t = MotorTuning {
            integral_min: -64,
            ..tuning(0, 256, 0)
        };
        assert_eq!(pid_compute(&mut s, &t, -500), -64);
    }

    #[test]
    fn derivative_opposes_error_change() {
        let mut s = PidState::default();
        let t = tuning(0, 0, 256);
        assert_eq!(pid_compute(&mut s, &t, 0), 0);
        assert_eq!(pid_compute(&mut s, &t, 10), -10);
        assert_eq!(s.prev_error(), 10);
    }

    #[test]
    fn extreme_derivative_swing_saturates() {
        let mut s = PidState::default();
        let t = tuning(0, 0, i32::MAX);
        pid_compute(&mut s, &t, i32::MIN);
        assert_eq!(pid_compute(&mut s, &t, i32::MAX), i32::MIN);
        assert_eq!(pid_compute(&mut s, &t, i32::MIN), i32::MAX);
    }

    #[test]
    fn huge_error_saturates_instead_of_overflowing() {
        let mut s = PidState::default();
        assert_eq!(pid_compute(&mut s, &tuning(1 << 20, 0, 0), i32::MAX), i32::MAX);
    }

    #[test]
    fn reset_clears_memory() {
        let mut s = PidState::default();
        pid_compute(&mut s, &tuning(256, 256, 256), 42);
        s.reset();
        assert_eq!(s, PidState::default());
    }
}
