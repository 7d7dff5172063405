//! # Extruder HAL Simulation Binary
//!
//! Runs the extruder control core against the simulated board for a fixed
//! span of simulated time and logs a report.
//!
//! # Usage
//!
//! ```bash
//! # Heat to 200 °C and extrude at 100 counts/s for 30 s
//! extruder_hal --config config/extruder.toml --setpoint 200 --velocity 100 --duration-ms 30000
//!
//! # Verbose JSON logs
//! extruder_hal --config config/extruder.toml -v --json
//! ```

use std::path::PathBuf;

use clap::Parser;
use extruder_common::config::{LogLevel, MachineConfig};
use extruder_common::consts::DEFAULT_CONFIG_PATH;
use extruder_hal::{PlantConfig, SimulationRunner};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Extruder HAL - closed-loop extruder controller on a simulated board
#[derive(Parser, Debug)]
#[command(name = "extruder_hal")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Closed-loop extruder controller on a simulated board")]
#[command(long_about = None)]
struct Args {
    /// Path to the machine description (extruder.toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Simulated time to run [ms]
    #[arg(short, long, default_value_t = 10_000)]
    duration_ms: u32,

    /// Scheduler step [us]
    #[arg(long, default_value_t = 1_000)]
    step_us: u32,

    /// Temperature setpoint for every heater [°C]
    #[arg(long)]
    setpoint: Option<i32>,

    /// Motor velocity [counts/s]
    #[arg(long, allow_hyphen_values = true)]
    velocity: Option<i32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("Simulation failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let machine = match MachineConfig::from_file(&args.config) {
        Ok(machine) => {
            setup_tracing(&args, machine.shared.log_level);
            machine
        }
        Err(e) => {
            setup_tracing(&args, LogLevel::default());
            return Err(e.into());
        }
    };

    info!(
        "Extruder HAL v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        machine.shared.service_name
    );

    let plant = PlantConfig::from_machine_file(&args.config)?;
    let mut runner = SimulationRunner::new(&machine, &plant, args.step_us)?;
    runner.turn_on();

    if let Some(setpoint) = args.setpoint {
        let controller = runner.controller_mut();
        for index in 0..controller.heaters().len() {
            if let Some(heater) = controller.heater_mut(index) {
                heater.set_setpoint(setpoint);
            }
        }
        info!(setpoint, "heater setpoints applied");
    }
    if let Some(velocity) = args.velocity {
        let command = velocity.saturating_mul(1 << machine.motor.velocity_frac_bits);
        if !runner.controller_mut().motor_mut().set_velocity(command) {
            warn!("motor rejected velocity command");
        }
    }

    let report = runner.run(args.duration_ms);
    runner.turn_off();

    info!(
        elapsed_ms = report.elapsed_ms,
        steps = report.stats.steps,
        edges = report.stats.edges,
        position = report.motor_position,
        setpoint = report.motor_setpoint,
        velocity = report.motor_velocity,
        faults = ?report.faults,
        "motor"
    );
    for heater in &report.heaters {
        info!(
            name = %heater.name,
            temperature = heater.temperature,
            setpoint = heater.setpoint,
            "heater"
        );
    }
    if report.faults.has_fatal() {
        warn!(faults = ?report.faults, "run ended with latched faults");
    }

    info!("Extruder HAL shutdown complete");
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        configured.as_str().parse().unwrap_or(Level::INFO)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
