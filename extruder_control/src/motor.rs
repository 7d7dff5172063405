//! Motor supervisor.

pub mod supervisor;

pub use supervisor::MotorSupervisor;
