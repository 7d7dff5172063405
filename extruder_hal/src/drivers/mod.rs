//! Board drivers.
//!
//! - [`simulation`] - plant-model board for development and testing

pub mod simulation;
