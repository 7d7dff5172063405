//! Simulated board: [`MemoryHal`] plus plant models.
//!
//! One [`SimulatedBoard::step`] reads the outputs the controller left on
//! the pins, advances every plant, replays encoder transitions one at a
//! time through the edge callback, presents fresh analog samples and
//! finally advances the clock.

use std::path::Path;

use extruder_common::config::{ConfigError, ConfigLoader, MachineConfig};
use extruder_common::hal::{AnalogChannel, MemoryHal, Pin, QuadratureChannel};
use extruder_common::motor::config::EncoderConfig;
use extruder_control::actuation::MotorDrive;
use extruder_control::error::ControlError;
use extruder_control::sensor::TemperatureSensor;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::physics::{MotorPlant, MotorPlantParams, ThermalPlant, ThermalPlantParams};

/// Plant parameters, read from an optional `[plant]` table of the machine
/// file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Motor plant.
    #[serde(default)]
    pub motor: MotorPlantParams,
    /// Every thermal block.
    #[serde(default)]
    pub thermal: ThermalPlantParams,
}

#[derive(Deserialize)]
struct PlantSection {
    #[serde(default)]
    plant: PlantConfig,
}

impl PlantConfig {
    /// Read the `[plant]` table of a machine file; defaults when absent.
    pub fn from_machine_file(path: &Path) -> Result<Self, ConfigError> {
        PlantSection::load(path).map(|s| s.plant)
    }
}

#[derive(Debug, Clone)]
struct ThermalSlot {
    plant: ThermalPlant,
    channel: AnalogChannel,
    heater_pin: Option<Pin>,
    cooler_pin: Option<Pin>,
}

/// Board wired like the machine description.
#[derive(Debug, Clone)]
pub struct SimulatedBoard {
    hal: MemoryHal,
    encoder: EncoderConfig,
    drive: MotorDrive,
    motor: MotorPlant,
    thermals: Vec<ThermalSlot>,
}

impl SimulatedBoard {
    /// Build plants for every unit in `machine` and present initial samples.
    pub fn new(machine: &MachineConfig, plant: &PlantConfig) -> Result<Self, ControlError> {
        let thermals = machine
            .heaters
            .iter()
            .map(|h| {
                Ok(ThermalSlot {
                    plant: ThermalPlant::new(plant.thermal, TemperatureSensor::from_config(&h.sensor)?),
                    channel: h.sensor.channel(),
                    heater_pin: h.heater_pin,
                    cooler_pin: h.cooler_pin,
                })
            })
            .collect::<Result<Vec<_>, ControlError>>()?;

        let mut board = Self {
            hal: MemoryHal::new(),
            encoder: machine.motor.encoder,
            drive: MotorDrive::from(machine.motor.drive),
            motor: MotorPlant::new(plant.motor),
            thermals,
        };
        board.present_samples();
        info!(thermal_blocks = board.thermals.len(), "simulated board ready");
        Ok(board)
    }

    /// Advance the board by `dt_us`, calling `on_edge` once per encoder
    /// transition with the pins already at their new levels.
    ///
    /// Returns the number of transitions emitted.
    pub fn step(
        &mut self,
        dt_us: u32,
        mut on_edge: impl FnMut(&MemoryHal, QuadratureChannel),
    ) -> u32 {
        let dt_s = f64::from(dt_us) * 1e-6;

        let hal = &self.hal;
        let command = self.drive.decode(|p| hal.level(p), |p| hal.duty(p));
        let counts = self.motor.update(command, dt_s);
        for _ in 0..counts.unsigned_abs() {
            let channel = self.motor.advance(counts > 0);
            let (a, b) = self.motor.levels();
            self.hal.set_input(self.encoder.a_pin, a);
            self.hal.set_input(self.encoder.b_pin, b);
            on_edge(&self.hal, channel);
        }

        for slot in &mut self.thermals {
            let heating = slot.heater_pin.is_some_and(|p| self.hal.level(p).is_high());
            let cooling = slot.cooler_pin.is_some_and(|p| self.hal.level(p).is_high());
            slot.plant.update(heating, cooling, dt_s);
        }
        self.present_samples();

        self.hal.advance_micros(dt_us);
        counts.unsigned_abs()
    }

    fn present_samples(&mut self) {
        for slot in &mut self.thermals {
            self.hal.set_analog(slot.channel, slot.plant.sample());
        }
    }

    // ─── Access ─────────────────────────────────────────────────────

    pub fn hal(&self) -> &MemoryHal {
        &self.hal
    }

    pub fn hal_mut(&mut self) -> &mut MemoryHal {
        &mut self.hal
    }

    pub fn motor(&self) -> &MotorPlant {
        &self.motor
    }

    /// Thermal block of heater `index`.
    pub fn thermal(&self, index: usize) -> Option<&ThermalPlant> {
        self.thermals.get(index).map(|s| &s.plant)
    }

    /// Mutable thermal block, for fault injection.
    pub fn thermal_mut(&mut self, index: usize) -> Option<&mut ThermalPlant> {
        let slot = self.thermals.get_mut(index)?;
        debug!(index, channel = slot.channel.0, "thermal block accessed for injection");
        Some(&mut slot.plant)
    }

    /// Number of thermal blocks.
    pub fn thermal_count(&self) -> usize {
        self.thermals.len()
    }
}
