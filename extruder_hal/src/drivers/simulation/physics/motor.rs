//! Motor plant.
//!
//! First-order speed response to the drive command read back from the
//! output pins, integrated into encoder counts and replayed as Gray-code
//! transitions on the two quadrature inputs.

use extruder_common::hal::{Level, QuadratureChannel};
use extruder_common::motor::state::{Direction, DriveCommand};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// (A, B) levels of the four quadrature states in forward order.
const GRAY: [(Level, Level); 4] = [
    (Level::Low, Level::Low),
    (Level::High, Level::Low),
    (Level::High, Level::High),
    (Level::Low, Level::High),
];

/// Motor plant parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorPlantParams {
    /// Steady-state speed at full command [counts/s].
    #[serde(default = "default_max_speed")]
    pub max_speed_cps: f64,
    /// Speed time constant [s].
    #[serde(default = "default_time_constant")]
    pub time_constant_s: f64,
}

fn default_max_speed() -> f64 {
    128.0
}
fn default_time_constant() -> f64 {
    0.05
}

impl Default for MotorPlantParams {
    fn default() -> Self {
        Self {
            max_speed_cps: default_max_speed(),
            time_constant_s: default_time_constant(),
        }
    }
}

/// Simulated motor with a quadrature encoder.
#[derive(Debug, Clone)]
pub struct MotorPlant {
    params: MotorPlantParams,
    speed_cps: f64,
    carry: f64,
    phase: usize,
    position: i64,
}

impl MotorPlant {
    /// Motor at rest in quadrature state (Low, Low).
    pub fn new(params: MotorPlantParams) -> Self {
        Self {
            params,
            speed_cps: 0.0,
            carry: 0.0,
            phase: 0,
            position: 0,
        }
    }

    /// Advance the speed model by `dt_s` under `command`; returns the
    /// signed number of encoder transitions to emit.
    pub fn update(&mut self, command: DriveCommand, dt_s: f64) -> i32 {
        let sign = match command.direction {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        };
        let target = sign * f64::from(command.magnitude) / 255.0 * self.params.max_speed_cps;
        let alpha = (dt_s / self.params.time_constant_s).min(1.0);
        self.speed_cps += (target - self.speed_cps) * alpha;

        self.carry += self.speed_cps * dt_s;
        let whole = self.carry.trunc();
        self.carry -= whole;
        trace!(speed = self.speed_cps, counts = whole, "motor plant");
        whole as i32
    }

    /// Move one quadrature state; returns the channel that toggled.
    pub fn advance(&mut self, forward: bool) -> QuadratureChannel {
        let from = self.phase;
        self.phase = if forward { (from + 1) % 4 } else { (from + 3) % 4 };
        self.position += if forward { 1 } else { -1 };
        if GRAY[from].0 != GRAY[self.phase].0 {
            QuadratureChannel::A
        } else {
            QuadratureChannel::B
        }
    }

    /// Current (A, B) levels.
    pub fn levels(&self) -> (Level, Level) {
        GRAY[self.phase]
    }

    /// Speed [counts/s].
    pub fn speed(&self) -> f64 {
        self.speed_cps
    }

    /// True shaft position [counts].
    pub fn position(&self) -> i64 {
        self.position
    }
}
