//! Motor control algorithm.
//!
//! Fixed-point PID over encoder counts with a velocity rate integrator,
//! velocity feed-forward, output shaping and a jam guard. No floating
//! point anywhere in the tick.

pub mod feedforward;
pub mod jam;
pub mod output;
pub mod pid;
pub mod setpoint;
pub mod tracking;
