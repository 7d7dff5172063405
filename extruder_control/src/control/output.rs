//! Output shaping: signed controller output to a drive command.
//!
//! Direction follows the sign (zero is `Forward`), magnitude is `|output|`
//! saturated to 255. Magnitudes at or below the deadband become neutral;
//! anything above is lifted to at least `min_output`, so the actuator
//! never sits in the range where it hums without turning.

use extruder_common::consts::PWM_MAX;
use extruder_common::motor::state::{Direction, DriveCommand};

/// Shape a signed output.
#[inline]
pub fn shape_output(output: i32, deadband: u8, min_output: u8) -> DriveCommand {
    let direction = Direction::from_output(output);
    let magnitude = output.unsigned_abs().min(u32::from(PWM_MAX)) as u8;
    if magnitude <= deadband {
        return DriveCommand::NEUTRAL;
    }
    DriveCommand::new(direction, magnitude.max(min_output))
}
