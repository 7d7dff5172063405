//! Plant models driving the simulated board.

mod motor;
mod thermal;

pub use motor::{MotorPlant, MotorPlantParams};
pub use thermal::{ThermalPlant, ThermalPlantParams};
