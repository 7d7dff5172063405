//! Thermal channel shared types.
//!
//! Configuration (sensor, actuators, regulation policy, heat-response
//! watchdog) and the runtime status reported by the heater supervisor.

pub mod config;
pub mod state;
