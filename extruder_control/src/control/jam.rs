//! Jam guard.
//!
//! Trips when the tracking error stays beyond a distance for a number of
//! consecutive ticks. Disabled by default.

use extruder_common::motor::config::JamGuardConfig;

/// Consecutive-tick counter over the tracking error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JamGuard {
    config: JamGuardConfig,
    over: u16,
}

impl JamGuard {
    /// Guard with the given thresholds.
    pub const fn new(config: JamGuardConfig) -> Self {
        Self { config, over: 0 }
    }

    /// Feed one tick's error; `true` when the guard trips.
    #[inline]
    pub fn check(&mut self, error: i32) -> bool {
        if !self.config.enabled {
            return false;
        }
        if error.unsigned_abs() > self.config.distance.unsigned_abs() {
            self.over = self.over.saturating_add(1);
            self.over >= self.config.sustain_ticks
        } else {
            self.over = 0;
            false
        }
    }

    /// Forget the consecutive count.
    #[inline]
    pub fn reset(&mut self) {
        self.over = 0;
    }

    /// Current thresholds.
    pub const fn config(&self) -> &JamGuardConfig {
        &self.config
    }
}
