//! Extruder Common Library
//!
//! Shared constants, fixed-point types, HAL capability traits and
//! configuration for every crate of the extruder controller workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - System-wide constants
//! - [`fixed`] - Fixed-point encoder position
//! - [`hal`] - Hardware capability traits and the in-memory HAL
//! - [`motor`] - Motor configuration and runtime state types
//! - [`thermal`] - Heater configuration and runtime state types
//! - [`status`] - Fault summary bitflags
//! - [`config`] - Configuration loading traits and types

pub mod config;
pub mod consts;
pub mod fixed;
pub mod hal;
pub mod motor;
pub mod status;
pub mod thermal;
