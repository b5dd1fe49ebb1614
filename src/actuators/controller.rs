//! Device controller: the actuator fleet grouped by role.
//!
//! Lets the engine reason about "all fans" instead of individual units.
//! Fleet operations have no atomicity: each unit in a role is commanded
//! independently, and a unit that rejects its command is logged and
//! reported with its unchanged status while its siblings proceed.

use log::{debug, error};

use super::{Actuator, DeviceCommand, DeviceStatus, DeviceType};
use crate::config::FleetLayout;
use crate::error::ActuatorError;

/// `(device_id, status)` pairs in fleet order.
pub type StatusReport = Vec<(String, DeviceStatus)>;

const ROLES: [DeviceType; 6] = [
    DeviceType::ExhaustFan,
    DeviceType::Curtain,
    DeviceType::Inlet,
    DeviceType::Heater,
    DeviceType::Nebulizer,
    DeviceType::Alarm,
];

/// Owns every actuator in the house.
pub struct DeviceController {
    fans: Vec<Actuator>,
    curtains: Vec<Actuator>,
    inlets: Vec<Actuator>,
    heaters: Vec<Actuator>,
    nebulizers: Vec<Actuator>,
    alarms: Vec<Actuator>,
}

impl Default for DeviceController {
    fn default() -> Self {
        Self::from_layout(&FleetLayout::default())
    }
}

impl DeviceController {
    /// Standard fleet: 4 fans, 2 curtains, 4 inlets, 2 heaters,
    /// 2 nebulizers, 2 alarms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fleet with ids `FAN001..`, `CUR001..`, and so on.
    pub fn from_layout(layout: &FleetLayout) -> Self {
        fn units(kind: DeviceType, count: u8) -> Vec<Actuator> {
            (1..=count)
                .map(|i| Actuator::new(format!("{}{:03}", kind.id_prefix(), i), kind))
                .collect()
        }
        Self {
            fans: units(DeviceType::ExhaustFan, layout.exhaust_fans),
            curtains: units(DeviceType::Curtain, layout.curtains),
            inlets: units(DeviceType::Inlet, layout.inlets),
            heaters: units(DeviceType::Heater, layout.heaters),
            nebulizers: units(DeviceType::Nebulizer, layout.nebulizers),
            alarms: units(DeviceType::Alarm, layout.alarms),
        }
    }

    // ── Fleet operations ──────────────────────────────────────

    pub fn set_fan_speeds(&mut self, speed: f64) -> StatusReport {
        self.command_role(DeviceType::ExhaustFan, DeviceCommand::Set(speed))
    }

    pub fn set_curtain_positions(&mut self, position: f64) -> StatusReport {
        self.command_role(DeviceType::Curtain, DeviceCommand::Set(position))
    }

    pub fn set_inlet_positions(&mut self, position: f64) -> StatusReport {
        self.command_role(DeviceType::Inlet, DeviceCommand::Set(position))
    }

    pub fn set_heaters(&mut self, on: bool) -> StatusReport {
        self.command_role(DeviceType::Heater, switch(on))
    }

    pub fn set_nebulizers(&mut self, on: bool) -> StatusReport {
        self.command_role(DeviceType::Nebulizer, switch(on))
    }

    /// Attach `message` to every alarm and switch them on.
    pub fn trigger_alarm(&mut self, message: &str) -> StatusReport {
        self.alarms
            .iter_mut()
            .map(|alarm| {
                let result = alarm
                    .set_message(message)
                    .and_then(|()| alarm.execute(DeviceCommand::On));
                settle(alarm, DeviceCommand::On, result)
            })
            .collect()
    }

    /// Remove alarm text and switch every alarm off.
    pub fn clear_alarms(&mut self) -> StatusReport {
        self.alarms
            .iter_mut()
            .map(|alarm| {
                let result = alarm
                    .clear_message()
                    .and_then(|()| alarm.execute(DeviceCommand::Off));
                settle(alarm, DeviceCommand::Off, result)
            })
            .collect()
    }

    // ── Addressed operations ──────────────────────────────────

    /// Command a single unit by id (manual override).
    pub fn execute(
        &mut self,
        device_id: &str,
        command: DeviceCommand,
    ) -> Result<DeviceStatus, ActuatorError> {
        let unit = self
            .find_mut(device_id)
            .ok_or_else(|| ActuatorError::UnknownDevice(device_id.to_owned()))?;
        match unit.execute(command) {
            Ok(status) => {
                debug!("{device_id}: {command}");
                Ok(status)
            }
            Err(e) => {
                error!("{device_id}: {command} rejected: {e}");
                Err(e)
            }
        }
    }

    /// Mark a unit as faulted (driver acknowledgement missing, etc.).
    pub fn report_fault(
        &mut self,
        device_id: &str,
        reason: impl Into<String>,
    ) -> Result<DeviceStatus, ActuatorError> {
        let unit = self
            .find_mut(device_id)
            .ok_or_else(|| ActuatorError::UnknownDevice(device_id.to_owned()))?;
        unit.report_fault(reason);
        Ok(unit.status())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self, device_id: &str) -> Option<DeviceStatus> {
        self.iter().find(|a| a.id() == device_id).map(Actuator::status)
    }

    pub fn all_statuses(&self) -> Vec<DeviceStatus> {
        self.iter().map(Actuator::status).collect()
    }

    pub fn device_ids(&self) -> Vec<&str> {
        self.iter().map(Actuator::id).collect()
    }

    /// Units installed for `role`.
    pub fn units(&self, role: DeviceType) -> &[Actuator] {
        match role {
            DeviceType::ExhaustFan => &self.fans,
            DeviceType::Curtain => &self.curtains,
            DeviceType::Inlet => &self.inlets,
            DeviceType::Heater => &self.heaters,
            DeviceType::Nebulizer => &self.nebulizers,
            DeviceType::Alarm => &self.alarms,
        }
    }

    /// Every unit, in role order.
    pub fn iter(&self) -> impl Iterator<Item = &Actuator> {
        ROLES.into_iter().flat_map(|role| self.units(role).iter())
    }

    // ── Internal ──────────────────────────────────────────────

    fn units_mut(&mut self, role: DeviceType) -> &mut Vec<Actuator> {
        match role {
            DeviceType::ExhaustFan => &mut self.fans,
            DeviceType::Curtain => &mut self.curtains,
            DeviceType::Inlet => &mut self.inlets,
            DeviceType::Heater => &mut self.heaters,
            DeviceType::Nebulizer => &mut self.nebulizers,
            DeviceType::Alarm => &mut self.alarms,
        }
    }

    fn find_mut(&mut self, device_id: &str) -> Option<&mut Actuator> {
        let prefix = ROLES
            .into_iter()
            .find(|role| device_id.starts_with(role.id_prefix()))?;
        self.units_mut(prefix).iter_mut().find(|a| a.id() == device_id)
    }

    fn command_role(&mut self, role: DeviceType, command: DeviceCommand) -> StatusReport {
        self.units_mut(role)
            .iter_mut()
            .map(|unit| {
                let result = unit.execute(command);
                settle(unit, command, result)
            })
            .collect()
    }
}

fn switch(on: bool) -> DeviceCommand {
    if on { DeviceCommand::On } else { DeviceCommand::Off }
}

/// Turn a per-unit outcome into a report entry.  Failures are logged and
/// reported with the unit's current status so the batch carries on.
fn settle(
    unit: &Actuator,
    command: DeviceCommand,
    result: Result<DeviceStatus, ActuatorError>,
) -> (String, DeviceStatus) {
    let status = match result {
        Ok(status) => {
            debug!("{}: {}", unit.id(), command);
            status
        }
        Err(e) => {
            error!("Failed to command {} {}: {}", unit.device_type(), unit.id(), e);
            unit.status()
        }
    };
    (unit.id().to_owned(), status)
}
