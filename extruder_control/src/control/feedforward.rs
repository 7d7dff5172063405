//! Velocity feed-forward.

use extruder_common::consts::FEED_FORWARD_DIVISOR;
use static_assertions::const_assert;

const_assert!(FEED_FORWARD_DIVISOR > 0);

/// Feed-forward contribution of a velocity command (`v / 128`, truncating).
#[inline]
pub const fn velocity_feedforward(velocity_command: i32) -> i32 {
    velocity_command / FEED_FORWARD_DIVISOR
}
