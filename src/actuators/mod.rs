//! Actuator model: one controllable device and its command/status contract.
//!
//! Every role shares a single [`Actuator`] type; behaviour differs only by
//! the [`Capability`] its [`DeviceType`] carries:
//!
//! | Capability | Roles                          | Commands          |
//! |------------|--------------------------------|-------------------|
//! | Binary     | heater, nebulizer, alarm       | ON, OFF           |
//! | Variable   | exhaust fan, curtain, inlet    | ON, OFF, SET(v)   |
//!
//! There is no transition guard: any state can be commanded from any other.
//! The actuator is a software model; pushing its state to real hardware is
//! a driver's job.

pub mod controller;

use core::fmt;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ActuatorError;

/// Percent range accepted by `SET`.
pub const VALUE_MIN: f64 = 0.0;
pub const VALUE_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    ExhaustFan,
    Curtain,
    Inlet,
    Heater,
    Nebulizer,
    Alarm,
}

impl DeviceType {
    pub const fn capability(self) -> Capability {
        match self {
            Self::ExhaustFan | Self::Curtain | Self::Inlet => Capability::Variable,
            Self::Heater | Self::Nebulizer | Self::Alarm => Capability::Binary,
        }
    }

    /// Prefix used for fleet device ids (`FAN001`, `CUR002`, ...).
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::ExhaustFan => "FAN",
            Self::Curtain => "CUR",
            Self::Inlet => "INL",
            Self::Heater => "HTR",
            Self::Nebulizer => "NEB",
            Self::Alarm => "ALM",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExhaustFan => write!(f, "exhaust fan"),
            Self::Curtain => write!(f, "curtain"),
            Self::Inlet => write!(f, "inlet"),
            Self::Heater => write!(f, "heater"),
            Self::Nebulizer => write!(f, "nebulizer"),
            Self::Alarm => write!(f, "alarm"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// ON/OFF only.
    Binary,
    /// Continuous 0–100.
    Variable,
}

/// Reported condition of an actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceState {
    Off,
    On,
    /// Variable device held at an intermediate value.
    Partial,
    /// Driver reported a fault; see `error_message`.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeviceCommand {
    On,
    Off,
    /// Percent position/speed.  Variable devices only.
    Set(f64),
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "ON"),
            Self::Off => write!(f, "OFF"),
            Self::Set(v) => write!(f, "SET {v:.1}%"),
        }
    }
}

/// Externally observable snapshot of one actuator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub device_id: String,
    pub device_type: DeviceType,
    pub state: DeviceState,
    /// 0 when off, 100 when on, the commanded value when partial.  Alarms
    /// follow the same mapping but the number carries no meaning for them;
    /// they report through `message`.
    pub value: f64,
    /// Time of the last state change.
    pub timestamp: DateTime<Utc>,
    pub error_message: Option<String>,
    /// Alarm text; always `None` for non-alarm devices.
    pub message: Option<String>,
}

/// A single controllable device.
#[derive(Debug, Clone)]
pub struct Actuator {
    id: String,
    device_type: DeviceType,
    state: DeviceState,
    value: f64,
    error_message: Option<String>,
    message: Option<String>,
    updated_at: DateTime<Utc>,
}

impl Actuator {
    /// New actuator, initially OFF.
    pub fn new(id: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            id: id.into(),
            device_type,
            state: DeviceState::Off,
            value: VALUE_MIN,
            error_message: None,
            message: None,
            updated_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn capability(&self) -> Capability {
        self.device_type.capability()
    }

    /// Apply `command`.  Either the whole command takes effect or, on
    /// error, nothing changes.  Repeating a command yields an identical
    /// status.
    pub fn execute(&mut self, command: DeviceCommand) -> Result<DeviceStatus, ActuatorError> {
        let (state, value) = match command {
            DeviceCommand::Off => (DeviceState::Off, VALUE_MIN),
            DeviceCommand::On => (DeviceState::On, VALUE_MAX),
            DeviceCommand::Set(v) => {
                if self.capability() == Capability::Binary {
                    return Err(ActuatorError::InvalidCommand {
                        device_type: self.device_type,
                    });
                }
                if !(VALUE_MIN..=VALUE_MAX).contains(&v) {
                    return Err(ActuatorError::OutOfRange { value: v });
                }
                (DeviceState::Partial, v)
            }
        };

        if state != self.state
            || value.to_bits() != self.value.to_bits()
            || self.error_message.is_some()
        {
            self.state = state;
            self.value = value;
            self.error_message = None;
            self.touch();
        }
        Ok(self.status())
    }

    /// Non-mutating snapshot.
    pub fn status(&self) -> DeviceStatus {
        DeviceStatus {
            device_id: self.id.clone(),
            device_type: self.device_type,
            state: self.state,
            value: self.value,
            timestamp: self.updated_at,
            error_message: self.error_message.clone(),
            message: self.message.clone(),
        }
    }

    /// Attach alarm text.  Alarms only.
    pub fn set_message(&mut self, message: impl Into<String>) -> Result<(), ActuatorError> {
        self.require_alarm()?;
        let message = Some(message.into());
        if self.message != message {
            self.message = message;
            self.touch();
        }
        Ok(())
    }

    /// Remove alarm text.  Alarms only.
    pub fn clear_message(&mut self) -> Result<(), ActuatorError> {
        self.require_alarm()?;
        if self.message.take().is_some() {
            self.touch();
        }
        Ok(())
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Driver-side hook: the unit failed to follow its last command (e.g.
    /// no acknowledgement before a timeout).  Puts it in `Error` until the
    /// next successful command.
    pub fn report_fault(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("{} {} fault: {}", self.device_type, self.id, reason);
        self.state = DeviceState::Error;
        self.error_message = Some(reason);
        self.touch();
    }

    fn require_alarm(&self) -> Result<(), ActuatorError> {
        if self.device_type == DeviceType::Alarm {
            Ok(())
        } else {
            Err(ActuatorError::InvalidCommand {
                device_type: self.device_type,
            })
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
