//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (operator
//! console, supervisory system, device drivers) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use crate::actuators::DeviceCommand;
use crate::config::Limits;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Manual override of a single unit.  Holds until the next cycle.
    Device { id: String, command: DeviceCommand },

    /// Silence and clear every alarm.
    ClearAlarms,

    /// Swap in new thresholds.  Validated before use.
    UpdateLimits(Limits),

    /// A driver could not confirm a command (no acknowledgement, stall).
    ReportFault { id: String, reason: String },
}
