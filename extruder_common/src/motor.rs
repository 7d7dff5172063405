//! Motor axis shared types.
//!
//! Configuration (pins, topology, tuning, jam guard) and the runtime
//! enums reported by the motor supervisor.

pub mod config;
pub mod state;
