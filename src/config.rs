//! System configuration parameters
//!
//! Environmental limits the engine enforces, the actuator fleet layout, and
//! the polling settings of the surrounding driver.  Loading from storage is
//! the job of a [`ConfigPort`](crate::app::ports::ConfigPort) adapter.

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Thresholds consumed by the control engine.  Read-only for an engine's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Minimum acceptable indoor temperature (°C)
    pub temp_min: f64,
    /// Maximum acceptable indoor temperature (°C)
    pub temp_max: f64,
    /// Minimum relative humidity (%)
    pub humidity_min: f64,
    /// Maximum relative humidity (%)
    pub humidity_max: f64,
    /// Maximum CO2 concentration (ppm)
    pub co2_max: f64,
    /// Maximum ammonia concentration (ppm)
    pub ammonia_max: f64,
    /// Target static pressure (Pa)
    pub pressure_target: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            temp_min: 18.0,
            temp_max: 32.0,
            humidity_min: 50.0,
            humidity_max: 70.0,
            co2_max: 2000.0,
            ammonia_max: 25.0,
            pressure_target: 25.0,
        }
    }
}

impl Limits {
    /// Reject limits outside what the house sensors and actuators can
    /// meaningfully act on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-10.0 <= self.temp_min && self.temp_min <= self.temp_max && self.temp_max <= 50.0) {
            return Err(ConfigError::Invalid("temperature range must satisfy -10 <= min <= max <= 50"));
        }
        if !(0.0 <= self.humidity_min
            && self.humidity_min <= self.humidity_max
            && self.humidity_max <= 100.0)
        {
            return Err(ConfigError::Invalid("humidity range must satisfy 0 <= min <= max <= 100"));
        }
        if !(0.0..=5000.0).contains(&self.co2_max) {
            return Err(ConfigError::Invalid("co2_max must be within 0-5000 ppm"));
        }
        if !(0.0..=100.0).contains(&self.ammonia_max) {
            return Err(ConfigError::Invalid("ammonia_max must be within 0-100 ppm"));
        }
        if !(-50.0..=50.0).contains(&self.pressure_target) {
            return Err(ConfigError::Invalid("pressure_target must be within -50-50 Pa"));
        }
        Ok(())
    }
}

/// Number of physical units installed per actuator role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetLayout {
    pub exhaust_fans: u8,
    pub curtains: u8,
    pub inlets: u8,
    pub heaters: u8,
    pub nebulizers: u8,
    pub alarms: u8,
}

impl Default for FleetLayout {
    fn default() -> Self {
        Self {
            exhaust_fans: 4,
            curtains: 2,
            inlets: 4,
            heaters: 2,
            nebulizers: 2,
            // Main + backup siren
            alarms: 2,
        }
    }
}

impl FleetLayout {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            self.exhaust_fans,
            self.curtains,
            self.inlets,
            self.heaters,
            self.nebulizers,
            self.alarms,
        ];
        if counts.contains(&0) {
            return Err(ConfigError::Invalid("every actuator role needs at least one unit"));
        }
        Ok(())
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Control ---
    pub limits: Limits,
    pub fleet: FleetLayout,

    // --- Timing ---
    /// Seconds between sensor polls (driven externally)
    pub reading_interval_secs: u32,

    // --- Logging ---
    /// One of DEBUG, INFO, WARNING, ERROR, CRITICAL
    pub log_level: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            fleet: FleetLayout::default(),
            reading_interval_secs: 60,
            log_level: "INFO".to_owned(),
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()?;
        self.fleet.validate()?;
        if self.reading_interval_secs < 1 {
            return Err(ConfigError::Invalid("reading_interval_secs must be at least 1"));
        }
        if self.level_filter().is_none() {
            return Err(ConfigError::Invalid("log_level must be DEBUG, INFO, WARNING, ERROR or CRITICAL"));
        }
        Ok(())
    }

    /// Map the configured level name onto the `log` facade.  CRITICAL has
    /// no `log` counterpart and folds into `Error`.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        match self.log_level.as_str() {
            "DEBUG" => Some(LevelFilter::Debug),
            "INFO" => Some(LevelFilter::Info),
            "WARNING" => Some(LevelFilter::Warn),
            "ERROR" | "CRITICAL" => Some(LevelFilter::Error),
            _ => None,
        }
    }
}
