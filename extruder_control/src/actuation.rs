//! Actuation adapters.
//!
//! Stateless translation from abstract commands to HAL primitive calls.
//! The topology is fixed at construction; adapters hold only pin identity.

pub mod motor_drive;
pub mod thermal_outputs;

pub use motor_drive::MotorDrive;
pub use thermal_outputs::ThermalOutputs;
