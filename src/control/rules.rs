//! Decision rules: one reading plus the limits in, one [`ControlAction`] out.
//!
//! Axes are evaluated in a fixed order against a draft that starts from a
//! neutral baseline:
//!
//! ```text
//!  temperature ─▶ humidity ─▶ CO2 ─▶ ammonia ─▶ pressure ─▶ power
//! ```
//!
//! Numeric fields compose max()-style: once an axis has raised a value in
//! this cycle, no later axis lowers it.  The single alarm slot is
//! last-write-wins.  Power failure runs last and always forces heaters and
//! nebulizers off.  Every rule fires exactly at its threshold; only
//! pressure has a deadband.

use serde::{Deserialize, Serialize};

use crate::config::Limits;
use crate::sensors::Reading;

/// Curtain and inlet position before any rule fires (%).
pub const NEUTRAL_POSITION: f64 = 50.0;
/// Degrees beyond a temperature limit that escalate to an alarm.
pub const CRITICAL_TEMPERATURE_MARGIN: f64 = 5.0;
/// Fan floor when humidity is above its limit (%).
pub const HUMIDITY_HIGH_FAN: f64 = 80.0;
/// Fan ceiling when humidity is below its limit (%).
pub const HUMIDITY_LOW_FAN_CAP: f64 = 40.0;
/// Fan floor when CO2 is above its limit (%).
pub const CO2_HIGH_FAN: f64 = 50.0;
/// Curtain floor when ammonia is above its limit (%).
pub const AMMONIA_HIGH_CURTAIN: f64 = 50.0;
/// Pressure error (Pa) tolerated before the inlets are adjusted.
pub const PRESSURE_DEADBAND_PA: f64 = 2.0;
/// Inlet percent per Pa of pressure error.
pub const PRESSURE_GAIN: f64 = 2.0;
/// Fan floor while on battery (%).
pub const POWER_FAILURE_FAN: f64 = 60.0;

pub const POWER_FAILURE_ALARM: &str = "ALERT: System running on battery!";

/// Per-cycle decision result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlAction {
    /// Exhaust fan speed (%).
    pub fan_speed: f64,
    /// Curtain opening (%), 0 = closed.
    pub curtain_position: f64,
    /// Air inlet opening (%), 0 = closed.
    pub inlet_position: f64,
    pub heaters_on: bool,
    pub nebulizers_on: bool,
    pub alarm_message: Option<String>,
}

impl Default for ControlAction {
    /// The neutral baseline.
    fn default() -> Self {
        Self {
            fan_speed: 0.0,
            curtain_position: NEUTRAL_POSITION,
            inlet_position: NEUTRAL_POSITION,
            heaters_on: false,
            nebulizers_on: false,
            alarm_message: None,
        }
    }
}

/// Clamp to `[0, 100]`; NaN collapses to 0.
pub fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

/// Action under construction, remembering which fields an axis has
/// already raised this cycle.
struct Draft {
    action: ControlAction,
    fan_raised: bool,
    inlet_raised: bool,
}

impl Draft {
    fn raise_fan(&mut self, floor: f64) {
        self.action.fan_speed = self.action.fan_speed.max(floor);
        self.fan_raised = true;
    }

    fn raise_inlet(&mut self, floor: f64) {
        self.action.inlet_position = self.action.inlet_position.max(floor);
        self.inlet_raised = true;
    }

    fn alarm(&mut self, message: String) {
        self.action.alarm_message = Some(message);
    }
}

/// Compute the action for `reading` under `limits`.  Pure: no history, no
/// state carried between cycles.
pub fn evaluate(reading: &Reading, limits: &Limits) -> ControlAction {
    let mut d = Draft {
        action: ControlAction::default(),
        fan_raised: false,
        inlet_raised: false,
    };

    temperature(&mut d, reading, limits);
    humidity(&mut d, reading, limits);
    co2(&mut d, reading, limits);
    ammonia(&mut d, reading, limits);
    pressure(&mut d, reading, limits);
    power(&mut d, reading);

    let mut action = d.action;
    action.fan_speed = clamp_percent(action.fan_speed);
    action.curtain_position = clamp_percent(action.curtain_position);
    action.inlet_position = clamp_percent(action.inlet_position);
    action
}

fn temperature(d: &mut Draft, r: &Reading, limits: &Limits) {
    let t = r.temperature;
    if t > limits.temp_max {
        d.raise_fan(100.0);
        d.action.curtain_position = 100.0;
        if r.external_temperature < t {
            d.raise_inlet(100.0);
        }
        if t > limits.temp_max + CRITICAL_TEMPERATURE_MARGIN {
            d.alarm(format!("Critical high temperature: {t:?}°C"));
        }
    } else if t < limits.temp_min {
        d.action.heaters_on = true;
        d.action.curtain_position = 0.0;
        if t < limits.temp_min - CRITICAL_TEMPERATURE_MARGIN {
            d.alarm(format!("Critical low temperature: {t:?}°C"));
        }
    }
}

fn humidity(d: &mut Draft, r: &Reading, limits: &Limits) {
    if r.humidity > limits.humidity_max {
        d.raise_fan(HUMIDITY_HIGH_FAN);
    } else if r.humidity < limits.humidity_min {
        d.action.nebulizers_on = true;
        if !d.fan_raised {
            d.action.fan_speed = d.action.fan_speed.min(HUMIDITY_LOW_FAN_CAP);
        }
    }
}

fn co2(d: &mut Draft, r: &Reading, limits: &Limits) {
    if r.co2 > limits.co2_max {
        d.raise_fan(CO2_HIGH_FAN);
        d.alarm(format!("High CO2 level: {:?} ppm", r.co2));
    }
}

fn ammonia(d: &mut Draft, r: &Reading, limits: &Limits) {
    if r.ammonia > limits.ammonia_max {
        d.raise_fan(100.0);
        d.action.curtain_position = d.action.curtain_position.max(AMMONIA_HIGH_CURTAIN);
        d.alarm(format!("High ammonia level: {:?} ppm", r.ammonia));
    }
}

/// Positive error (suction above target) opens the inlets, negative error
/// closes them, proportionally to the error beyond the neutral position.
fn pressure(d: &mut Draft, r: &Reading, limits: &Limits) {
    let error = r.pressure - limits.pressure_target;
    if error.abs() <= PRESSURE_DEADBAND_PA || error.is_nan() {
        return;
    }
    let proposed = clamp_percent(NEUTRAL_POSITION + error * PRESSURE_GAIN);
    if error > 0.0 {
        d.raise_inlet(proposed);
    } else if !d.inlet_raised {
        d.action.inlet_position = d.action.inlet_position.min(proposed);
    }
}

fn power(d: &mut Draft, r: &Reading) {
    if !r.power_ok {
        d.alarm(POWER_FAILURE_ALARM.to_owned());
        d.raise_fan(POWER_FAILURE_FAN);
        d.action.heaters_on = false;
        d.action.nebulizers_on = false;
    }
}
