//! # Extruder HAL Simulation
//!
//! Host-side stand-in for the extruder board: the control core runs
//! unchanged against an in-memory HAL whose inputs come from plant models.
//!
//! # Module Structure
//!
//! - [`core`] - SimulationRunner, the cooperative main loop
//! - [`drivers`] - board drivers (plant-model simulation)
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    extruder_hal (single crate)                │
//! │  ┌──────────────────────┐        ┌─────────────────────────┐  │
//! │  │  SimulationRunner    │──pins─►│  SimulatedBoard         │  │
//! │  │  (scheduler loop)    │◄─edges─│  MemoryHal + plants     │  │
//! │  └──────────┬───────────┘        └─────────────────────────┘  │
//! │             │ manage() / on_encoder_edge()                    │
//! │             ▼                                                 │
//! │  ┌──────────────────────┐                                     │
//! │  │ ExtruderController   │ (extruder_control)                  │
//! │  └──────────────────────┘                                     │
//! └───────────────────────────────────────────────────────────────┘
//! ```

pub mod core;
pub mod drivers;

pub use crate::core::{SimulationError, SimulationReport, SimulationRunner};
pub use crate::drivers::simulation::{PlantConfig, SimulatedBoard};
