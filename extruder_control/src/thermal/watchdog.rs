//! Heat-response watchdog.
//!
//! While heat is demanded the watchdog holds a checkpoint: "reach
//! `expected` °C before `deadline`". Reaching it re-arms a new checkpoint
//! from the current temperature; missing it means the element is not
//! heating (open circuit, burnt out) and the caller latches the fault.
//! `idle_bonus_ms` extends the first checkpoint after a non-heating phase.

use extruder_common::thermal::config::HeatResponseConfig;

use crate::timing::reached;

/// Temperature that must be reached before a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Temperature to reach [°C].
    pub expected: i32,
    /// Millisecond clock value by which it must be reached.
    pub deadline: u32,
}

/// Watchdog state of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatResponseWatchdog {
    config: HeatResponseConfig,
    checkpoint: Option<Checkpoint>,
}

impl HeatResponseWatchdog {
    /// Disarmed watchdog.
    pub const fn new(config: HeatResponseConfig) -> Self {
        Self {
            config,
            checkpoint: None,
        }
    }

    /// Whether the watchdog (and sensor fault latching) is active.
    #[inline]
    pub const fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// Armed checkpoint, if any.
    pub const fn checkpoint(&self) -> Option<Checkpoint> {
        self.checkpoint
    }

    /// Whether the armed checkpoint has been missed.
    #[inline]
    pub fn expired(&self, measured: i32, now_ms: u32) -> bool {
        self.checkpoint
            .is_some_and(|c| reached(now_ms, c.deadline) && measured < c.expected)
    }

    /// Heat is demanded this tick: arm when unarmed, re-arm when the
    /// checkpoint temperature was reached.
    pub fn heating(&mut self, measured: i32, now_ms: u32, from_idle: bool) {
        if !self.is_enabled() {
            return;
        }
        let arm = match self.checkpoint {
            None => true,
            Some(c) => measured >= c.expected,
        };
        if arm {
            let mut grace = self.config.grace_ms;
            if from_idle {
                grace = grace.saturating_add(self.config.idle_bonus_ms);
            }
            self.checkpoint = Some(Checkpoint {
                expected: measured.saturating_add(self.config.rearm_delta),
                deadline: now_ms.wrapping_add(grace),
            });
        }
    }

    /// Heat no longer demanded.
    #[inline]
    pub fn disarm(&mut self) {
        self.checkpoint = None;
    }
}
