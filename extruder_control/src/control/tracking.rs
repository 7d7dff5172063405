//! Rate/position tracking loop.
//!
//! Holds the setpoint, the velocity command and the PID memory, and turns
//! one measured position into one shaped drive command per tick.
//!
//! ```text
//!            set_position / hold           track_velocity
//!   Idle ────────────────────▶ Position ─────────────────▶ Speed
//!     │                           ▲                          │
//!     └───────────── track_velocity ─────────────────────────┘
//!                  (setpoint := measured when entering Speed)
//! ```

use extruder_common::fixed::Position;
use extruder_common::motor::config::MotorTuning;
use extruder_common::motor::state::{DriveCommand, MotorMode};

use super::feedforward::velocity_feedforward;
use super::output::shape_output;
use super::pid::{PidState, pid_compute};
use super::setpoint::RateIntegrator;

/// Result of one tracking tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutput {
    /// `setpoint − measured` [counts].
    pub error: i32,
    /// Unshaped controller output (PID + feed-forward).
    pub output: i32,
    /// Shaped command for the drive.
    pub command: DriveCommand,
}

/// Tracking state of one motor axis.
#[derive(Debug, Clone, Copy)]
pub struct TrackingLoop {
    mode: MotorMode,
    setpoint: Position,
    rate: RateIntegrator,
    velocity: i32,
    rate_shift: u32,
    tuning: MotorTuning,
    pid: PidState,
}

impl TrackingLoop {
    /// Idle loop at the origin.
    pub fn new(tuning: MotorTuning, rate_shift: u32) -> Self {
        Self {
            mode: MotorMode::Idle,
            setpoint: Position::ZERO,
            rate: RateIntegrator::default(),
            velocity: 0,
            rate_shift,
            tuning,
            pid: PidState::default(),
        }
    }

    /// Stop tracking and pin the setpoint to `measured`.
    pub fn stop(&mut self, measured: Position) {
        self.mode = MotorMode::Idle;
        self.setpoint = measured;
        self.rate.reset();
        self.pid.reset();
    }

    /// Track a fixed target.
    pub fn hold(&mut self, target: Position) {
        self.setpoint = target;
        self.rate.reset();
        self.mode = MotorMode::PositionTracking;
    }

    /// Track a velocity; entering speed mode restarts from `measured`.
    pub fn track_velocity(&mut self, velocity: i32, measured: Position) {
        self.velocity = velocity;
        if self.mode != MotorMode::SpeedTracking {
            self.setpoint = measured;
        }
        self.mode = MotorMode::SpeedTracking;
    }

    /// Enter speed mode at the current velocity command from `measured`.
    pub fn restart_speed(&mut self, measured: Position) {
        self.setpoint = measured;
        self.rate.reset();
        self.mode = MotorMode::SpeedTracking;
    }

    /// Evaluate one tick. `None` while idle (PID memory is cleared).
    pub fn evaluate(&mut self, measured: Position) -> Option<TickOutput> {
        if !self.mode.is_tracking() {
            self.pid.reset();
            return None;
        }

        let speed = self.mode == MotorMode::SpeedTracking;
        if speed {
            let whole = self.rate.advance(self.velocity, self.rate_shift);
            self.setpoint = self.setpoint.offset(whole);
        }

        let error = self.setpoint.counts_from(measured);
        let mut output = pid_compute(&mut self.pid, &self.tuning, error);
        if speed {
            output = output.saturating_add(velocity_feedforward(self.velocity));
        }

        Some(TickOutput {
            error,
            output,
            command: shape_output(output, self.tuning.deadband, self.tuning.min_output),
        })
    }

    /// Clear PID memory without changing mode or setpoint.
    #[inline]
    pub fn reset_memory(&mut self) {
        self.pid.reset();
    }

    // ─── Accessors ──────────────────────────────────────────────────

    /// Current mode.
    pub const fn mode(&self) -> MotorMode {
        self.mode
    }

    /// Current setpoint.
    pub const fn setpoint(&self) -> Position {
        self.setpoint
    }

    /// Velocity command [counts/s, fixed-point].
    pub const fn velocity(&self) -> i32 {
        self.velocity
    }

    /// Active tuning.
    pub const fn tuning(&self) -> &MotorTuning {
        &self.tuning
    }

    /// Replace the tuning (PID memory is kept).
    pub fn set_tuning(&mut self, tuning: MotorTuning) {
        self.tuning = tuning;
    }

    /// PID memory.
    pub const fn pid(&self) -> &PidState {
        &self.pid
    }
}
