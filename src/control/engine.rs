//! Control engine: owns the limits, the reading history and the fleet, and
//! turns each reading into device commands.
//!
//! ```text
//!  Reading ─▶ history.push ─▶ evaluate(reading, limits) ─▶ apply ─▶ statuses
//!                                      │
//!                                      └──▶ last_action
//! ```
//!
//! The engine performs no I/O and no scheduling.  Each call to
//! [`ControlEngine::process`] is one complete cycle.

use log::{debug, warn};

use super::rules::{ControlAction, evaluate};
use crate::actuators::controller::{DeviceController, StatusReport};
use crate::config::Limits;
use crate::error::Result;
use crate::sensors::history::{DEFAULT_HISTORY_CAPACITY, ReadingHistory};
use crate::sensors::{Conditions, Reading};

pub struct ControlEngine<const N: usize = DEFAULT_HISTORY_CAPACITY> {
    limits: Limits,
    history: ReadingHistory<N>,
    controller: DeviceController,
    last_action: Option<ControlAction>,
}

impl<const N: usize> Default for ControlEngine<N> {
    fn default() -> Self {
        Self::new(Limits::default(), DeviceController::default())
    }
}

impl<const N: usize> ControlEngine<N> {
    /// Engine with an empty history.  `limits` are fixed for the engine's
    /// lifetime; see [`with_limits`](Self::with_limits) to change them.
    pub fn new(limits: Limits, controller: DeviceController) -> Self {
        Self {
            limits,
            history: ReadingHistory::new(),
            controller,
            last_action: None,
        }
    }

    /// Replace this engine with one running under `limits`, carrying the
    /// fleet, the history and the last action over.
    pub fn with_limits(self, limits: Limits) -> Self {
        Self {
            limits,
            history: self.history,
            controller: self.controller,
            last_action: self.last_action,
        }
    }

    /// Run one cycle on a complete reading.
    pub fn process(&mut self, reading: Reading) -> StatusReport {
        let action = evaluate(&reading, &self.limits);
        self.history.push(reading);

        debug!(
            "action: fan={:.1}% curtain={:.1}% inlet={:.1}% heaters={} nebulizers={}",
            action.fan_speed,
            action.curtain_position,
            action.inlet_position,
            action.heaters_on,
            action.nebulizers_on,
        );
        if let Some(msg) = &action.alarm_message {
            warn!("alarm: {msg}");
        }

        let statuses = self.apply(&action);
        self.last_action = Some(action);
        statuses
    }

    /// Run one cycle on a raw sensor snapshot.
    ///
    /// An incomplete snapshot is rejected before anything is recorded or
    /// commanded.
    pub fn process_conditions(
        &mut self,
        conditions: Conditions,
        source_id: &str,
    ) -> Result<StatusReport> {
        let reading = conditions.into_reading(source_id)?;
        Ok(self.process(reading))
    }

    fn apply(&mut self, action: &ControlAction) -> StatusReport {
        let c = &mut self.controller;
        let mut report = c.set_fan_speeds(action.fan_speed);
        report.extend(c.set_curtain_positions(action.curtain_position));
        report.extend(c.set_inlet_positions(action.inlet_position));
        report.extend(c.set_heaters(action.heaters_on));
        report.extend(c.set_nebulizers(action.nebulizers_on));
        report.extend(match &action.alarm_message {
            Some(msg) => c.trigger_alarm(msg),
            None => c.clear_alarms(),
        });
        report
    }

    /// Action computed by the most recent cycle.
    pub fn last_action(&self) -> Option<&ControlAction> {
        self.last_action.as_ref()
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn history(&self) -> &ReadingHistory<N> {
        &self.history
    }

    pub fn controller(&self) -> &DeviceController {
        &self.controller
    }

    /// Mutable fleet access for manual commands between cycles.
    pub fn controller_mut(&mut self) -> &mut DeviceController {
        &mut self.controller
    }
}
