//! Heater supervisor state machine.
//!
//! States: MachineOff ↔ Regulating. The regulating sub-state (Heating /
//! Idle / Cooling) is re-derived every tick from the driven outputs.
//!
//! Per tick, in this order:
//! 1. Read the oversampled, linearized temperature.
//! 2. Latch `sensor_disconnected` on an implausible sample (watchdog enabled).
//! 3. Any latch set → both outputs off, exit.
//! 4. Heat-response checkpoint missed → latch `invalid_response`, outputs off.
//! 5. Regulation policy drives the outputs.

use extruder_common::consts::MAX_NAME_LEN;
use extruder_common::hal::{AnalogChannel, AnalogInput, DigitalOutput, MonotonicClock};
use extruder_common::thermal::config::{HeaterConfig, RegulationMode};
use extruder_common::thermal::state::{HeaterStatus, TemperatureBand, ThermalPhase};
use tracing::{info, trace, warn};

use super::band::{BandPosition, classify, regulation_band};
use super::policy::{Actuation, SoftPwm, hysteresis_demand};
use super::watchdog::{Checkpoint, HeatResponseWatchdog};
use crate::actuation::ThermalOutputs;
use crate::error::ControlError;
use crate::sensor::{TemperatureSensor, oversample};
use crate::timing::Deadline;

/// One thermal channel.
#[derive(Debug, Clone)]
pub struct HeaterSupervisor {
    name: heapless::String<MAX_NAME_LEN>,
    sensor: TemperatureSensor,
    channel: AnalogChannel,
    samples: u8,
    outputs: ThermalOutputs,
    regulation: RegulationMode,
    hysteresis: i32,
    half_rate_toggle: bool,
    watchdog: HeatResponseWatchdog,
    gate: Deadline,
    status: HeaterStatus,
    setpoint: i32,
    band: TemperatureBand,
    temperature: i32,
    phase: ThermalPhase,
    demand: Actuation,
    heater_duty: u8,
    cooler_duty: u8,
    pwm: SoftPwm,
}

impl HeaterSupervisor {
    /// Build a switched-off channel from configuration.
    pub fn new(config: &HeaterConfig) -> Result<Self, ControlError> {
        if config.heater_pin.is_none() && config.cooler_pin.is_none() {
            return Err(ControlError::NoActuator(config.name.to_string()));
        }
        let sensor = TemperatureSensor::from_config(&config.sensor)?;
        config.validate()?;

        let outputs = ThermalOutputs::new(config.heater_pin, config.cooler_pin);
        Ok(Self {
            name: config.name.clone(),
            sensor,
            channel: config.sensor.channel(),
            samples: config.samples,
            outputs,
            regulation: config.regulation,
            hysteresis: config.hysteresis,
            half_rate_toggle: config.half_rate_toggle,
            watchdog: HeatResponseWatchdog::new(config.heat_response),
            gate: Deadline::new(config.tick_period_ms),
            status: HeaterStatus::OFF,
            setpoint: 0,
            band: regulation_band(0, config.hysteresis, outputs.has_heater(), outputs.has_cooler()),
            temperature: 0,
            phase: ThermalPhase::Idle,
            demand: Actuation::OFF,
            heater_duty: 0,
            cooler_duty: 0,
            pwm: SoftPwm::default(),
        })
    }

    // ─── Lifecycle ──────────────────────────────────────────────────

    /// Clear every latch and start regulating on the next `manage()`.
    pub fn turn_on<H: DigitalOutput + MonotonicClock>(&mut self, hw: &mut H) {
        self.outputs.disable(hw);
        self.status = HeaterStatus::CLEAR;
        self.phase = ThermalPhase::Idle;
        self.demand = Actuation::OFF;
        self.watchdog.disarm();
        self.pwm.reset();
        self.gate.reset(hw.now_millis());
        info!(heater = %self.name, setpoint = self.setpoint, "heater on");
    }

    /// De-energize immediately and latch MachineOff.
    pub fn turn_off(&mut self, hw: &mut impl DigitalOutput) {
        self.de_energize(hw);
        if !self.status.machine_off {
            info!(heater = %self.name, "heater off");
        }
        self.status.machine_off = true;
    }

    // ─── Commands ───────────────────────────────────────────────────

    /// Set the target temperature [°C].
    pub fn set_setpoint(&mut self, setpoint: i32) {
        self.setpoint = setpoint;
        self.band = regulation_band(
            setpoint,
            self.hysteresis,
            self.outputs.has_heater(),
            self.outputs.has_cooler(),
        );
    }

    /// Duties for the duty-command policy (0 = off, 255 = 255/256 of the
    /// period).
    pub fn set_duty(&mut self, heater: u8, cooler: u8) {
        self.heater_duty = heater;
        self.cooler_duty = cooler;
    }

    // ─── Periodic Tick ──────────────────────────────────────────────

    /// Self-rate-limited tick; a no-op until the period has elapsed.
    pub fn manage<H: AnalogInput + DigitalOutput + MonotonicClock>(&mut self, hw: &mut H) {
        let now = hw.now_millis();
        if !self.gate.poll(now) {
            return;
        }

        let raw = oversample(hw, self.channel, self.samples);
        let reading = self.sensor.sample_to_celsius(raw);
        self.temperature = reading.celsius;

        if reading.disconnected
            && self.watchdog.is_enabled()
            && !self.status.machine_off
            && !self.status.sensor_disconnected
        {
            self.status.sensor_disconnected = true;
            warn!(heater = %self.name, raw, "temperature sensor disconnected");
        }

        if self.status.is_blocked() {
            self.de_energize(hw);
            return;
        }

        let measured = reading.celsius;
        if self.regulation == RegulationMode::Hysteresis && self.watchdog.expired(measured, now) {
            self.status.invalid_response = true;
            warn!(
                heater = %self.name,
                measured,
                expected = self.watchdog.checkpoint().map_or(0, |c| c.expected),
                "heater not responding"
            );
            self.de_energize(hw);
            return;
        }

        let out = match self.regulation {
            RegulationMode::Hysteresis => self.regulate_hysteresis(measured, now),
            RegulationMode::DutyCommand => {
                let phase = self.pwm.advance();
                Actuation {
                    heat: SoftPwm::level(phase, self.heater_duty),
                    cool: SoftPwm::level(phase, self.cooler_duty),
                }
            }
        };
        let out = Actuation {
            heat: out.heat && self.outputs.has_heater(),
            cool: out.cool && self.outputs.has_cooler(),
        };

        self.outputs.apply(hw, out.heat, out.cool);
        self.phase = if out.heat {
            ThermalPhase::Heating
        } else if out.cool {
            ThermalPhase::Cooling
        } else {
            ThermalPhase::Idle
        };
        trace!(heater = %self.name, measured, phase = ?self.phase, "heater tick");
    }

    fn regulate_hysteresis(&mut self, measured: i32, now: u32) -> Actuation {
        let has_heater = self.outputs.has_heater();
        let has_cooler = self.outputs.has_cooler();
        let position = classify(&self.band, measured);
        let demand = hysteresis_demand(position, self.demand, has_heater, has_cooler);
        let phase = self.pwm.advance();
        let toggling =
            self.half_rate_toggle && position == BandPosition::Inside && has_heater != has_cooler;

        // The toggle holds the block inside the band, below any checkpoint.
        if demand.heat && !toggling {
            self.watchdog.heating(measured, now, !self.demand.heat);
        } else {
            self.watchdog.disarm();
        }
        self.demand = demand;

        if toggling {
            let on = SoftPwm::toggle(phase);
            return Actuation { heat: on, cool: on };
        }
        demand
    }

    fn de_energize(&mut self, hw: &mut impl DigitalOutput) {
        self.outputs.disable(hw);
        self.phase = ThermalPhase::Idle;
        self.demand = Actuation::OFF;
        self.watchdog.disarm();
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// Channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last measured temperature [°C].
    pub const fn temperature(&self) -> i32 {
        self.temperature
    }

    /// Target temperature [°C].
    pub const fn setpoint(&self) -> i32 {
        self.setpoint
    }

    /// Current hysteresis band.
    pub const fn band(&self) -> TemperatureBand {
        self.band
    }

    /// Regulation sub-state of the last tick.
    pub const fn phase(&self) -> ThermalPhase {
        self.phase
    }

    /// Heater output energized on the last tick.
    pub fn is_heating(&self) -> bool {
        self.phase == ThermalPhase::Heating
    }

    /// Cooler output energized on the last tick.
    pub fn is_cooling(&self) -> bool {
        self.phase == ThermalPhase::Cooling
    }

    /// Latches.
    pub const fn status(&self) -> HeaterStatus {
        self.status
    }

    /// Switched on and free of faults.
    pub const fn is_regulating(&self) -> bool {
        !self.status.is_blocked()
    }

    /// Heat-response fault latched.
    pub const fn is_invalid_response(&self) -> bool {
        self.status.invalid_response
    }

    /// Sensor fault latched.
    pub const fn is_sensor_disconnected(&self) -> bool {
        self.status.sensor_disconnected
    }

    /// Active regulation policy.
    pub const fn regulation(&self) -> RegulationMode {
        self.regulation
    }

    /// Duty-command values `(heater, cooler)`.
    pub const fn duty(&self) -> (u8, u8) {
        (self.heater_duty, self.cooler_duty)
    }

    /// Armed heat-response checkpoint.
    pub const fn checkpoint(&self) -> Option<Checkpoint> {
        self.watchdog.checkpoint()
    }

    /// Temperature source.
    pub const fn sensor(&self) -> &TemperatureSensor {
        &self.sensor
    }

    /// Analog input of the sensor.
    pub const fn channel(&self) -> AnalogChannel {
        self.channel
    }

    /// Actuator outputs.
    pub const fn outputs(&self) -> &ThermalOutputs {
        &self.outputs
    }
}
