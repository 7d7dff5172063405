//! Simulated extruder board.
//!
//! An in-memory HAL whose inputs are produced by plant models reacting to
//! the outputs the controller writes.

mod board;
mod physics;

pub use board::{PlantConfig, SimulatedBoard};
pub use physics::{MotorPlant, MotorPlantParams, ThermalPlant, ThermalPlantParams};
