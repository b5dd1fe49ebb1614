//! Unified error types for the aviary control core.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! application service can treat any failed cycle step the same way.
//! Every failure here is a local, synchronous validation failure raised
//! at the call site; nothing is retried internally.

use core::fmt;

use crate::actuators::DeviceType;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An actuator rejected a command.
    Actuator(ActuatorError),
    /// A sensor snapshot could not be turned into a usable reading.
    Reading(ReadingError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Reading(e) => write!(f, "reading: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorError {
    /// The command kind is not supported by the actuator's capability
    /// (a `SET` sent to an on/off device).
    InvalidCommand { device_type: DeviceType },
    /// A `SET` value outside `[0, 100]` (NaN included).
    OutOfRange { value: f64 },
    /// No actuator with this id exists in the fleet.
    UnknownDevice(String),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCommand { device_type } => {
                write!(f, "{device_type} only supports ON/OFF")
            }
            Self::OutOfRange { value } => write!(f, "value {value} outside 0-100"),
            Self::UnknownDevice(id) => write!(f, "unknown device {id}"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Reading errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ReadingError {
    /// A required field was absent from the sensor snapshot.
    Incomplete(&'static str),
    /// A field is outside the physically plausible range of its sensor.
    Implausible { field: &'static str, value: f64 },
}

impl fmt::Display for ReadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete(field) => write!(f, "incomplete reading, missing {field}"),
            Self::Implausible { field, value } => {
                write!(f, "{field} = {value} outside sensor range")
            }
        }
    }
}

impl From<ReadingError> for Error {
    fn from(e: ReadingError) -> Self {
        Self::Reading(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration validation and [`ConfigPort`](crate::app::ports::ConfigPort)
/// operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No stored configuration exists.
    NotFound,
    /// Stored configuration failed to deserialise.
    Corrupted,
    /// A field failed range validation.  The message names the field.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::Invalid(msg) => write!(f, "invalid: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
