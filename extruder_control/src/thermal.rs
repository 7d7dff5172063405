//! Thermal supervisor.
//!
//! One heater channel: linearized temperature in, heater/cooler outputs
//! out, with sticky fault latches and the heat-response watchdog.

pub mod band;
pub mod policy;
pub mod supervisor;
pub mod watchdog;

pub use supervisor::HeaterSupervisor;
