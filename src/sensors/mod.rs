//! Sensor data model: validated readings and the pre-validation snapshot.
//!
//! Acquisition itself lives outside the core (see
//! [`SensorPort`](crate::app::ports::SensorPort)).  An adapter fills a
//! [`Conditions`] with whatever it managed to read; only a complete one can
//! become a [`Reading`], and only a [`Reading`] reaches the engine.

pub mod history;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReadingError;

/// Physically plausible sensor ranges, inclusive.
pub const TEMPERATURE_RANGE_C: (f64, f64) = (-10.0, 50.0);
pub const EXTERNAL_TEMPERATURE_RANGE_C: (f64, f64) = (-20.0, 50.0);
pub const HUMIDITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);
pub const CO2_RANGE_PPM: (f64, f64) = (0.0, 5000.0);
pub const AMMONIA_RANGE_PPM: (f64, f64) = (0.0, 100.0);
pub const PRESSURE_RANGE_PA: (f64, f64) = (-50.0, 50.0);

/// One complete polling cycle's worth of sensor values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    /// Indoor temperature (°C).
    pub temperature: f64,
    /// Relative humidity (%).
    pub humidity: f64,
    /// CO2 concentration (ppm).
    pub co2: f64,
    /// Ammonia concentration (ppm).
    pub ammonia: f64,
    /// Static pressure (Pa).
    pub pressure: f64,
    /// Outdoor temperature (°C).
    pub external_temperature: f64,
    /// Mains power present; `false` means running on battery.
    pub power_ok: bool,
    /// Identifier of the sensor array that produced the reading.
    pub source_id: String,
}

impl Reading {
    /// Check every value against its sensor's plausible range and report
    /// the first one outside it.
    ///
    /// Implausible readings are still valid engine input; the engine clamps
    /// its outputs.  This is for the caller to flag sensor noise.
    pub fn check_plausible(&self) -> Result<(), ReadingError> {
        let fields = [
            ("temperature", self.temperature, TEMPERATURE_RANGE_C),
            ("external_temperature", self.external_temperature, EXTERNAL_TEMPERATURE_RANGE_C),
            ("humidity", self.humidity, HUMIDITY_RANGE_PCT),
            ("co2", self.co2, CO2_RANGE_PPM),
            ("ammonia", self.ammonia, AMMONIA_RANGE_PPM),
            ("pressure", self.pressure, PRESSURE_RANGE_PA),
        ];
        for (field, value, (lo, hi)) in fields {
            if !(lo..=hi).contains(&value) {
                return Err(ReadingError::Implausible { field, value });
            }
        }
        Ok(())
    }
}

/// Sensor snapshot where any individual read may have failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub co2: Option<f64>,
    pub ammonia: Option<f64>,
    pub pressure: Option<f64>,
    pub external_temperature: Option<f64>,
    pub power_ok: Option<bool>,
}

impl Conditions {
    /// Empty snapshot taken at `timestamp`.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// Name of the first absent field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.temperature.is_none() {
            Some("temperature")
        } else if self.humidity.is_none() {
            Some("humidity")
        } else if self.co2.is_none() {
            Some("co2")
        } else if self.ammonia.is_none() {
            Some("ammonia")
        } else if self.pressure.is_none() {
            Some("pressure")
        } else if self.external_temperature.is_none() {
            Some("external_temperature")
        } else if self.power_ok.is_none() {
            Some("power_ok")
        } else {
            None
        }
    }

    /// True when every field is present.
    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    /// Promote to a [`Reading`] attributed to `source_id`.
    pub fn into_reading(self, source_id: impl Into<String>) -> Result<Reading, ReadingError> {
        let missing = ReadingError::Incomplete;
        Ok(Reading {
            timestamp: self.timestamp,
            temperature: self.temperature.ok_or(missing("temperature"))?,
            humidity: self.humidity.ok_or(missing("humidity"))?,
            co2: self.co2.ok_or(missing("co2"))?,
            ammonia: self.ammonia.ok_or(missing("ammonia"))?,
            pressure: self.pressure.ok_or(missing("pressure"))?,
            external_temperature: self
                .external_temperature
                .ok_or(missing("external_temperature"))?,
            power_ok: self.power_ok.ok_or(missing("power_ok"))?,
            source_id: source_id.into(),
        })
    }
}

impl From<&Reading> for Conditions {
    fn from(r: &Reading) -> Self {
        Self {
            timestamp: r.timestamp,
            temperature: Some(r.temperature),
            humidity: Some(r.humidity),
            co2: Some(r.co2),
            ammonia: Some(r.ammonia),
            pressure: Some(r.pressure),
            external_temperature: Some(r.external_temperature),
            power_ok: Some(r.power_ok),
        }
    }
}
