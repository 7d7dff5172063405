//! # Extruder Control Core
//!
//! Closed-loop control of one extruder head: a quadrature-encoded motor
//! tracking a position or velocity setpoint with fixed-point PID, and one
//! or two thermal channels tracking a temperature setpoint with bang-bang
//! or software-PWM actuation guarded by a heat-response watchdog.
//!
//! ## Layers
//!
//! 1. **Linearizer** ([`sensor`]): raw sample → °C
//! 2. **Encoder** ([`encoder`]): quadrature edges → [`Position`](extruder_common::fixed::Position)
//! 3. **Control** ([`control`]): PID rate/position loop
//! 4. **Actuation** ([`actuation`]): abstract command → pin writes
//! 5. **Supervisors** ([`motor`], [`thermal`]): lifecycle, fault latches, self-rate-limited ticks
//! 6. **Controller** ([`controller`]): one motor + heaters from one config
//!
//! ## Cooperative Scheduling
//!
//! Nothing here blocks or allocates after construction. Every `manage()`
//! gates itself against a wrapping hardware clock, so the scheduler may
//! poll as fast as it likes. Only the encoder position is shared with
//! edge context, through a single atomic.

#![deny(clippy::disallowed_types)]

pub mod actuation;
pub mod control;
pub mod controller;
pub mod encoder;
pub mod error;
pub mod motor;
pub mod sensor;
pub mod thermal;
pub mod timing;

pub use controller::{ControllerStatus, ExtruderController};
pub use error::ControlError;
pub use motor::MotorSupervisor;
pub use thermal::HeaterSupervisor;
