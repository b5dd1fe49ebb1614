//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the configuration and the control engine (which in
//! turn owns the fleet and the reading history).  It exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService       │
//!  ConfigPort ◀──▶│ Engine · Fleet · Hist. │
//!                 └────────────────────────┘
//! ```
//!
//! The service never schedules itself: an external driver calls
//! [`AppService::cycle`] every `reading_interval_secs`.

use log::{error, info, warn};

use crate::actuators::DeviceStatus;
use crate::actuators::controller::DeviceController;
use crate::config::SystemConfig;
use crate::control::{ControlAction, ControlEngine};
use crate::error::{ConfigError, Result};
use crate::sensors::history::{DEFAULT_HISTORY_CAPACITY, ReadingHistory};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ConfigPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates one house (or zone).
pub struct AppService<const N: usize = DEFAULT_HISTORY_CAPACITY> {
    config: SystemConfig,
    engine: ControlEngine<N>,
    cycle_count: u64,
    /// Alarm text currently showing, for raise/clear transitions.
    active_alarm: Option<String>,
}

impl<const N: usize> AppService<N> {
    /// Validate `config` and build the fleet and engine from it.
    pub fn new(config: SystemConfig) -> Result<Self> {
        config.validate()?;
        let controller = DeviceController::from_layout(&config.fleet);
        let engine = ControlEngine::new(config.limits, controller);
        Ok(Self {
            config,
            engine,
            cycle_count: 0,
            active_alarm: None,
        })
    }

    /// Build from stored configuration.  Nothing stored yet means defaults.
    pub fn from_store(store: &impl ConfigPort) -> Result<Self> {
        let config = match store.load() {
            Ok(config) => config,
            Err(ConfigError::NotFound) => {
                info!("No stored config, using defaults");
                SystemConfig::default()
            }
            Err(e) => {
                warn!("Config load failed: {}", e);
                return Err(e.into());
            }
        };
        Self::new(config)
    }

    /// Persist the live configuration (including runtime limit updates).
    pub fn save_config(&self, store: &impl ConfigPort) -> Result<()> {
        store.save(&self.config)?;
        info!("Config saved");
        Ok(())
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Apply the configured log level to the `log` facade and announce the
    /// fleet.  Installing a logger backend is up to the binary.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        if let Some(level) = self.config.level_filter() {
            log::set_max_level(level);
        }
        let devices = self.engine.controller().iter().count();
        sink.emit(&AppEvent::Started { devices });
        info!(
            "AppService started: {} devices, reading every {}s",
            devices, self.config.reading_interval_secs
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle: read sensors → engine → events.
    ///
    /// An incomplete snapshot is rejected and reported; devices keep their
    /// previous state and the error is returned so the driver can decide
    /// whether to retry.  Implausible values are reported but still
    /// processed.
    pub fn cycle(
        &mut self,
        sensors: &mut impl SensorPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        // 1. Read sensors via SensorPort
        let conditions = sensors.read_conditions();
        let reading = match conditions.into_reading(sensors.source_id()) {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Reading rejected: {}", e);
                sink.emit(&AppEvent::ReadingRejected(e.clone()));
                return Err(e.into());
            }
        };

        // 2. Flag sensor noise
        if let Err(e) = reading.check_plausible() {
            warn!("Implausible sensor value: {}", e);
            sink.emit(&AppEvent::ImplausibleReading(e));
        }

        // 3. Decide and apply
        let statuses = self.engine.process(reading.clone());
        self.cycle_count += 1;
        let action = self.engine.last_action().cloned().unwrap_or_default();

        // 4. Alarm transitions, then the cycle summary
        self.track_alarm(action.alarm_message.as_deref(), sink);
        sink.emit(&AppEvent::Cycle {
            reading,
            action,
            statuses,
        });
        Ok(())
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (operator console, supervisor, driver).
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) -> Result<()> {
        match cmd {
            AppCommand::Device { id, command } => {
                match self.engine.controller_mut().execute(&id, command) {
                    Ok(status) => {
                        info!("Manual {} on {}", command, id);
                        sink.emit(&AppEvent::DeviceCommanded(status));
                        Ok(())
                    }
                    Err(e) => {
                        sink.emit(&AppEvent::CommandRejected {
                            device_id: id,
                            error: e.clone(),
                        });
                        Err(e.into())
                    }
                }
            }
            AppCommand::ClearAlarms => {
                self.engine.controller_mut().clear_alarms();
                if self.active_alarm.take().is_some() {
                    info!("Alarms cleared by operator");
                    sink.emit(&AppEvent::AlarmCleared);
                }
                Ok(())
            }
            AppCommand::UpdateLimits(limits) => {
                if let Err(e) = limits.validate() {
                    warn!("Rejected limits update: {}", e);
                    return Err(e.into());
                }
                // Limits are fixed per engine; swap in a fresh one that
                // inherits fleet and history.
                self.engine = std::mem::take(&mut self.engine).with_limits(limits);
                self.config.limits = limits;
                info!("Limits updated at runtime");
                sink.emit(&AppEvent::LimitsUpdated(limits));
                Ok(())
            }
            AppCommand::ReportFault { id, reason } => {
                self.engine.controller_mut().report_fault(&id, reason.clone())?;
                let message = format!("Device fault {id}: {reason}");
                self.engine.controller_mut().trigger_alarm(&message);
                sink.emit(&AppEvent::DeviceFault {
                    device_id: id,
                    reason,
                });
                self.track_alarm(Some(&message), sink);
                Ok(())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Action computed by the most recent cycle.
    pub fn last_action(&self) -> Option<&ControlAction> {
        self.engine.last_action()
    }

    pub fn history(&self) -> &ReadingHistory<N> {
        self.engine.history()
    }

    pub fn device_statuses(&self) -> Vec<DeviceStatus> {
        self.engine.controller().all_statuses()
    }

    pub fn device_status(&self, device_id: &str) -> Option<DeviceStatus> {
        self.engine.controller().status(device_id)
    }

    /// Cycles that reached the engine since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Alarm text currently showing, if any.
    pub fn active_alarm(&self) -> Option<&str> {
        self.active_alarm.as_deref()
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn engine(&self) -> &ControlEngine<N> {
        &self.engine
    }

    // ── Internal ──────────────────────────────────────────────

    fn track_alarm(&mut self, current: Option<&str>, sink: &mut impl EventSink) {
        let previous = self.active_alarm.take();
        match (current, previous) {
            (Some(now), Some(prev)) if prev == now => self.active_alarm = Some(prev),
            (Some(now), _) => {
                error!("ALARM: {}", now);
                sink.emit(&AppEvent::AlarmRaised(now.to_owned()));
                self.active_alarm = Some(now.to_owned());
            }
            (None, Some(_)) => {
                info!("Alarm cleared");
                sink.emit(&AppEvent::AlarmCleared);
            }
            (None, None) => {}
        }
    }
}
