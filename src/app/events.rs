//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, store readings and alarms,
//! refresh a display.

use crate::actuators::DeviceStatus;
use crate::actuators::controller::StatusReport;
use crate::config::Limits;
use crate::control::ControlAction;
use crate::error::{ActuatorError, ReadingError};
use crate::sensors::Reading;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started with this many actuators.
    Started { devices: usize },

    /// One control cycle completed.
    Cycle {
        reading: Reading,
        action: ControlAction,
        statuses: StatusReport,
    },

    /// The sensor snapshot was incomplete; no device was touched.
    ReadingRejected(ReadingError),

    /// A sensor value is outside its physical range.  The cycle still ran.
    ImplausibleReading(ReadingError),

    /// A new alarm message is showing.
    AlarmRaised(String),

    /// The alarm went quiet.
    AlarmCleared,

    /// A unit reported a fault and is in the error state.
    DeviceFault { device_id: String, reason: String },

    /// A manual command was applied.
    DeviceCommanded(DeviceStatus),

    /// A manual command was refused.
    CommandRejected {
        device_id: String,
        error: ActuatorError,
    },

    /// The engine now runs under new limits.
    LimitsUpdated(Limits),
}
