//! Hardware abstraction capabilities consumed by the control core.
//!
//! The control core never touches hardware directly: every supervisor
//! receives an implementation of these traits per call. Real boards
//! implement them over their peripheral drivers; host tests and the
//! simulator use [`memory::MemoryHal`].

pub mod driver;
pub mod memory;
pub mod types;

pub use driver::{AnalogInput, DigitalInput, DigitalOutput, Hardware, MonotonicClock, PwmOutput};
pub use memory::MemoryHal;
pub use types::{AnalogChannel, Level, Pin, QuadratureChannel};
