//! Extruder controller: one motor axis plus up to `MAX_HEATERS` thermal
//! channels built from a single [`MachineConfig`].
//!
//! The controller only composes. Each unit keeps its own deadline, so
//! [`ExtruderController::manage`] may be called as often as the scheduler
//! likes.
//!
//! ## Status
//! [`ExtruderController::status`] folds every unit's latches into one
//! [`FaultFlags`] byte plus a heater-on bit, the shape the protocol layer
//! reports upward.

use extruder_common::config::MachineConfig;
use extruder_common::consts::MAX_HEATERS;
use extruder_common::hal::{DigitalInput, Hardware, QuadratureChannel};
use extruder_common::status::FaultFlags;
use heapless::Vec;
use static_assertions::const_assert;
use tracing::info;

use crate::error::ControlError;
use crate::motor::MotorSupervisor;
use crate::thermal::HeaterSupervisor;

// Heater 0 always has a slot.
const_assert!(MAX_HEATERS >= 1);

/// Status summary of the whole controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStatus {
    /// Union of all unit latches.
    pub faults: FaultFlags,
    /// Any heater output currently energized.
    pub heater_on: bool,
}

/// Motor + heaters of one extruder head.
#[derive(Debug)]
pub struct ExtruderController {
    motor: MotorSupervisor,
    heaters: Vec<HeaterSupervisor, MAX_HEATERS>,
}

impl ExtruderController {
    /// Build every unit. All units start switched off.
    pub fn new(config: &MachineConfig) -> Result<Self, ControlError> {
        if config.heaters.len() > MAX_HEATERS {
            return Err(ControlError::TooManyHeaters(config.heaters.len()));
        }
        config.validate()?;

        let motor = MotorSupervisor::new(&config.motor)?;
        let mut heaters = Vec::new();
        for heater in &config.heaters {
            heaters
                .push(HeaterSupervisor::new(heater)?)
                .map_err(|_| ControlError::TooManyHeaters(config.heaters.len()))?;
        }

        info!(heaters = heaters.len(), "extruder controller built");
        Ok(Self { motor, heaters })
    }

    // ─── Lifecycle ──────────────────────────────────────────────────

    /// Switch every unit on, clearing all latches.
    pub fn turn_on<H: Hardware>(&mut self, hw: &mut H) {
        self.motor.turn_on(hw);
        for heater in &mut self.heaters {
            heater.turn_on(hw);
        }
    }

    /// Switch every unit off and de-energize all outputs.
    pub fn turn_off<H: Hardware>(&mut self, hw: &mut H) {
        self.motor.turn_off(hw);
        for heater in &mut self.heaters {
            heater.turn_off(hw);
        }
    }

    // ─── Scheduler Entry Points ─────────────────────────────────────

    /// Poll every unit once.
    pub fn manage<H: Hardware>(&mut self, hw: &mut H) {
        self.motor.manage(hw);
        for heater in &mut self.heaters {
            heater.manage(hw);
        }
    }

    /// Forward a quadrature edge to the motor's encoder.
    #[inline]
    pub fn on_encoder_edge(&self, hw: &impl DigitalInput, channel: QuadratureChannel) {
        self.motor.on_edge(hw, channel);
    }

    // ─── Accessors ──────────────────────────────────────────────────

    pub const fn motor(&self) -> &MotorSupervisor {
        &self.motor
    }

    pub fn motor_mut(&mut self) -> &mut MotorSupervisor {
        &mut self.motor
    }

    pub fn heaters(&self) -> &[HeaterSupervisor] {
        &self.heaters
    }

    pub fn heater(&self, index: usize) -> Option<&HeaterSupervisor> {
        self.heaters.get(index)
    }

    pub fn heater_mut(&mut self, index: usize) -> Option<&mut HeaterSupervisor> {
        self.heaters.get_mut(index)
    }

    /// Heater by configured name.
    pub fn heater_by_name(&self, name: &str) -> Option<&HeaterSupervisor> {
        self.heaters.iter().find(|h| h.name() == name)
    }

    /// Fold unit latches into one summary.
    pub fn status(&self) -> ControllerStatus {
        let faults = self
            .heaters
            .iter()
            .fold(FaultFlags::from(self.motor.status()), |acc, h| {
                acc | FaultFlags::from(h.status())
            });
        ControllerStatus {
            faults,
            heater_on: self.heaters.iter().any(HeaterSupervisor::is_heating),
        }
    }
}
