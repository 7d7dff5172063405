//! Cooperative scheduler over the simulated board.
//!
//! The [`SimulationRunner`] plays the role of the firmware main loop: every
//! step it advances the board clock, hands each encoder transition to the
//! controller's edge callback, and polls `manage()`. Each unit gates itself,
//! so the step size only has to be finer than the fastest control period.

use std::path::Path;

use extruder_common::config::{ConfigError, MachineConfig};
use extruder_common::status::FaultFlags;
use extruder_control::error::ControlError;
use extruder_control::ExtruderController;
use thiserror::Error;
use tracing::{debug, info};

use crate::drivers::simulation::{PlantConfig, SimulatedBoard};

/// Simulated time between periodic summaries [ms].
const SUMMARY_INTERVAL_MS: u32 = 1_000;

/// Error setting up a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Machine or plant file rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Controller refused the configuration.
    #[error(transparent)]
    Control(#[from] ControlError),

    /// Step must be non-zero.
    #[error("step of {0} us is invalid")]
    InvalidStep(u32),
}

/// Scheduler statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Board steps executed.
    pub steps: u64,
    /// Encoder transitions dispatched.
    pub edges: u64,
    /// Most transitions seen in a single step.
    pub max_edges_per_step: u32,
}

/// One heater at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaterReport {
    /// Configured name.
    pub name: String,
    /// Last linearized temperature [°C].
    pub temperature: i32,
    /// Setpoint [°C].
    pub setpoint: i32,
}

/// Outcome of [`SimulationRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    /// Simulated time covered by this run [ms].
    pub elapsed_ms: u32,
    /// Scheduler statistics since construction.
    pub stats: RunStats,
    /// Encoder position [raw counts].
    pub motor_position: i32,
    /// Motor setpoint [raw counts].
    pub motor_setpoint: i32,
    /// Estimated motor speed [counts/s].
    pub motor_velocity: i32,
    /// Per-heater state.
    pub heaters: Vec<HeaterReport>,
    /// Controller fault summary.
    pub faults: FaultFlags,
    /// Steps during which any heater was energized.
    pub heater_on_steps: u64,
}

/// Controller + board + clock.
#[derive(Debug)]
pub struct SimulationRunner {
    controller: ExtruderController,
    board: SimulatedBoard,
    step_us: u32,
    stats: RunStats,
}

impl SimulationRunner {
    /// Build controller and board from one machine description.
    pub fn new(
        machine: &MachineConfig,
        plant: &PlantConfig,
        step_us: u32,
    ) -> Result<Self, SimulationError> {
        if step_us == 0 {
            return Err(SimulationError::InvalidStep(step_us));
        }
        let controller = ExtruderController::new(machine)?;
        let board = SimulatedBoard::new(machine, plant)?;
        info!(step_us, heaters = controller.heaters().len(), "simulation runner created");
        Ok(Self {
            controller,
            board,
            step_us,
            stats: RunStats::default(),
        })
    }

    /// Load the machine file (plus its optional `[plant]` table) and build.
    pub fn from_file(path: &Path, step_us: u32) -> Result<Self, SimulationError> {
        info!("Loading machine description from {:?}", path);
        let machine = MachineConfig::from_file(path)?;
        let plant = PlantConfig::from_machine_file(path)?;
        Self::new(&machine, &plant, step_us)
    }

    /// Switch every controller unit on.
    pub fn turn_on(&mut self) {
        self.controller.turn_on(self.board.hal_mut());
    }

    /// Switch every controller unit off.
    pub fn turn_off(&mut self) {
        self.controller.turn_off(self.board.hal_mut());
    }

    /// Advance one step: board, edges, then every `manage()`.
    pub fn step(&mut self) {
        let controller = &self.controller;
        let edges = self
            .board
            .step(self.step_us, |hal, channel| controller.on_encoder_edge(hal, channel));
        self.controller.manage(self.board.hal_mut());

        self.stats.steps += 1;
        self.stats.edges += u64::from(edges);
        self.stats.max_edges_per_step = self.stats.max_edges_per_step.max(edges);
    }

    /// Run for `duration_ms` of simulated time.
    pub fn run(&mut self, duration_ms: u32) -> SimulationReport {
        let duration_us = u64::from(duration_ms) * 1_000;
        let mut elapsed_us = 0u64;
        let mut next_summary_us = u64::from(SUMMARY_INTERVAL_MS) * 1_000;
        let mut heater_on_steps = 0u64;

        while elapsed_us < duration_us {
            self.step();
            elapsed_us += u64::from(self.step_us);
            if self.controller.status().heater_on {
                heater_on_steps += 1;
            }
            if elapsed_us >= next_summary_us {
                next_summary_us += u64::from(SUMMARY_INTERVAL_MS) * 1_000;
                self.log_summary(elapsed_us);
            }
        }

        let elapsed_ms = u32::try_from(elapsed_us / 1_000).unwrap_or(u32::MAX);
        info!(
            "Simulation stopped after {} steps ({} edges, max {} per step)",
            self.stats.steps, self.stats.edges, self.stats.max_edges_per_step
        );
        self.report(elapsed_ms, heater_on_steps)
    }

    fn log_summary(&self, elapsed_us: u64) {
        let motor = self.controller.motor();
        let temps: Vec<i32> = self
            .controller
            .heaters()
            .iter()
            .map(|h| h.temperature())
            .collect();
        debug!(
            t_ms = elapsed_us / 1_000,
            position = %motor.measured(),
            setpoint = %motor.setpoint(),
            velocity = motor.measured_velocity(),
            ?temps,
            faults = ?self.controller.status().faults,
            "simulation summary"
        );
    }

    fn report(&self, elapsed_ms: u32, heater_on_steps: u64) -> SimulationReport {
        let motor = self.controller.motor();
        SimulationReport {
            elapsed_ms,
            stats: self.stats,
            motor_position: motor.measured().raw(),
            motor_setpoint: motor.setpoint().raw(),
            motor_velocity: motor.measured_velocity(),
            heaters: self
                .controller
                .heaters()
                .iter()
                .map(|h| HeaterReport {
                    name: h.name().to_string(),
                    temperature: h.temperature(),
                    setpoint: h.setpoint(),
                })
                .collect(),
            faults: self.controller.status().faults,
            heater_on_steps,
        }
    }

    // ─── Access ─────────────────────────────────────────────────────

    pub fn controller(&self) -> &ExtruderController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ExtruderController {
        &mut self.controller
    }

    pub fn board(&self) -> &SimulatedBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut SimulatedBoard {
        &mut self.board
    }

    pub fn step_us(&self) -> u32 {
        self.step_us
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }
}
