//! Motor supervisor: encoder + tracking loop + drive adapter.
//!
//! Lifecycle and latches:
//! - Constructed switched off (`MachineOff`).
//! - `turn_on` clears every latch, pins the setpoint to the measured
//!   position and leaves the loop `Idle`.
//! - `turn_off` drives neutral immediately and latches `MachineOff`.
//! - A tripped jam guard latches `Jammed` + `MachineOff` and drives neutral.
//!
//! Every command other than `turn_on` / `turn_off` is ignored while
//! `MachineOff` is set and reports so through its return value.

use extruder_common::fixed::Position;
use extruder_common::hal::{DigitalInput, DigitalOutput, MonotonicClock, PwmOutput, QuadratureChannel};
use extruder_common::motor::config::{MotorConfig, MotorTuning, PidGains};
use extruder_common::motor::state::{Direction, DriveCommand, MotorMode, MotorStatus};
use tracing::{debug, info, trace, warn};

use crate::actuation::MotorDrive;
use crate::control::jam::JamGuard;
use crate::control::tracking::TrackingLoop;
use crate::encoder::EncoderTracker;
use crate::error::ControlError;
use crate::timing::Deadline;

/// One motor axis.
#[derive(Debug)]
pub struct MotorSupervisor {
    encoder: EncoderTracker,
    drive: MotorDrive,
    tracking: TrackingLoop,
    jam: JamGuard,
    status: MotorStatus,
    gate: Deadline,
    time_resolution_bits: u8,
    last_measured: Position,
    measured_velocity: i32,
    last_command: DriveCommand,
}

impl MotorSupervisor {
    /// Build a switched-off axis from configuration.
    pub fn new(config: &MotorConfig) -> Result<Self, ControlError> {
        config.validate()?;
        Ok(Self {
            encoder: EncoderTracker::new(config.encoder),
            drive: MotorDrive::from(config.drive),
            tracking: TrackingLoop::new(config.tuning, config.rate_shift()),
            jam: JamGuard::new(config.jam_guard),
            status: MotorStatus::OFF,
            gate: Deadline::new(config.tick_period_us()),
            time_resolution_bits: config.time_resolution_bits,
            last_measured: Position::ZERO,
            measured_velocity: 0,
            last_command: DriveCommand::NEUTRAL,
        })
    }

    // ─── Lifecycle ──────────────────────────────────────────────────

    /// Clear latches, hold the current position idle, release the drive.
    pub fn turn_on<H: DigitalOutput + PwmOutput + MonotonicClock>(&mut self, hw: &mut H) {
        let measured = self.encoder.position();
        self.tracking.stop(measured);
        self.jam.reset();
        self.status = MotorStatus::CLEAR;
        self.last_measured = measured;
        self.measured_velocity = 0;
        self.last_command = DriveCommand::NEUTRAL;
        self.drive.enable(hw);
        self.gate.reset(hw.now_micros());
        info!(position = %measured, "motor on");
    }

    /// Drive neutral and latch MachineOff. Safe from any state.
    pub fn turn_off<H: DigitalOutput + PwmOutput>(&mut self, hw: &mut H) {
        self.drive.disable(hw);
        self.tracking.stop(self.encoder.position());
        self.last_command = DriveCommand::NEUTRAL;
        if !self.status.machine_off {
            info!("motor off");
        }
        self.status.machine_off = true;
    }

    // ─── Commands ───────────────────────────────────────────────────

    /// Track a velocity [counts/s with `velocity_frac_bits` fraction].
    pub fn set_velocity(&mut self, velocity: i32) -> bool {
        if self.status.machine_off {
            return false;
        }
        self.tracking.track_velocity(velocity, self.encoder.position());
        true
    }

    /// Hold `offset` away from the measured position.
    pub fn set_position_offset(&mut self, offset: Position) -> bool {
        if self.status.machine_off {
            return false;
        }
        self.tracking.hold(self.encoder.position() + offset);
        true
    }

    /// Hold an absolute position.
    pub fn set_position(&mut self, target: Position) -> bool {
        if self.status.machine_off {
            return false;
        }
        self.tracking.hold(target);
        true
    }

    /// Enter speed tracking at the current velocity command, restarting
    /// from the measured position.
    pub fn enter_speed_mode(&mut self) -> bool {
        if self.status.machine_off {
            return false;
        }
        self.tracking.restart_speed(self.encoder.position());
        true
    }

    /// Replace the PID gains.
    pub fn set_gains(&mut self, gains: PidGains) -> bool {
        if self.status.machine_off {
            return false;
        }
        let tuning = MotorTuning {
            gains,
            ..*self.tracking.tuning()
        };
        self.tracking.set_tuning(tuning);
        debug!(p = gains.p, i = gains.i, d = gains.d, "motor gains updated");
        true
    }

    /// Replace gains, integral bounds, deadband and floor in one step.
    /// Rejected when the bounds are inconsistent.
    pub fn set_tuning(&mut self, tuning: MotorTuning) -> bool {
        if self.status.machine_off || tuning.validate().is_err() {
            return false;
        }
        self.tracking.set_tuning(tuning);
        debug!(?tuning, "motor tuning updated");
        true
    }

    /// Open-loop drive: leave closed-loop tracking and apply the command
    /// immediately.
    pub fn set_pwm<H: DigitalOutput + PwmOutput>(
        &mut self,
        hw: &mut H,
        direction: Direction,
        magnitude: u8,
    ) -> bool {
        if self.status.machine_off {
            return false;
        }
        self.tracking.stop(self.encoder.position());
        let command = DriveCommand::new(direction, magnitude);
        self.drive.apply(hw, command);
        self.last_command = command;
        true
    }

    // ─── Edge Callback ──────────────────────────────────────────────

    /// Quadrature edge on `channel`. Callable from interrupt context.
    #[inline]
    pub fn on_edge(&self, hw: &impl DigitalInput, channel: QuadratureChannel) {
        self.encoder.on_edge(hw, channel);
    }

    // ─── Periodic Tick ──────────────────────────────────────────────

    /// Self-rate-limited tick at `2^time_resolution_bits` Hz.
    pub fn manage<H: DigitalOutput + PwmOutput + MonotonicClock>(&mut self, hw: &mut H) {
        if !self.gate.poll(hw.now_micros()) {
            return;
        }

        let measured = self.encoder.position();
        self.measured_velocity = measured
            .counts_from(self.last_measured)
            .saturating_mul(1 << self.time_resolution_bits);
        self.last_measured = measured;

        if self.status.is_blocked() {
            self.tracking.reset_memory();
            return;
        }

        let Some(tick) = self.tracking.evaluate(measured) else {
            return;
        };

        if self.jam.check(tick.error) {
            self.status.jammed = true;
            self.status.machine_off = true;
            self.tracking.stop(measured);
            self.drive.disable(hw);
            self.last_command = DriveCommand::NEUTRAL;
            warn!(error = tick.error, position = %measured, "motor jammed");
            return;
        }

        self.drive.apply(hw, tick.command);
        self.last_command = tick.command;
        trace!(
            error = tick.error,
            output = tick.output,
            magnitude = tick.command.magnitude,
            "motor tick"
        );
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// Measured position.
    pub fn measured(&self) -> Position {
        self.encoder.position()
    }

    /// Current setpoint.
    pub const fn setpoint(&self) -> Position {
        self.tracking.setpoint()
    }

    /// Tracking mode.
    pub const fn mode(&self) -> MotorMode {
        self.tracking.mode()
    }

    /// Whether the closed loop is tracking a target.
    pub const fn is_managed(&self) -> bool {
        self.tracking.mode().is_tracking()
    }

    /// Latches.
    pub const fn status(&self) -> MotorStatus {
        self.status
    }

    /// Jam latched.
    pub const fn is_jammed(&self) -> bool {
        self.status.jammed
    }

    /// Switched on and not jammed.
    pub const fn is_on(&self) -> bool {
        !self.status.is_blocked()
    }

    /// Velocity command.
    pub const fn velocity_command(&self) -> i32 {
        self.tracking.velocity()
    }

    /// Velocity estimated from the last tick's position delta [counts/s].
    pub const fn measured_velocity(&self) -> i32 {
        self.measured_velocity
    }

    /// Command last handed to the drive.
    pub const fn last_command(&self) -> DriveCommand {
        self.last_command
    }

    /// Active tuning.
    pub const fn tuning(&self) -> &MotorTuning {
        self.tracking.tuning()
    }

    /// Integral state of the PID.
    pub const fn integral(&self) -> i32 {
        self.tracking.pid().integral()
    }

    /// Drive topology.
    pub const fn drive(&self) -> &MotorDrive {
        &self.drive
    }

    /// Encoder tracker.
    pub const fn encoder(&self) -> &EncoderTracker {
        &self.encoder
    }
}
