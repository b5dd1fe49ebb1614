//! Mock sensor array and event recorder for integration tests.
//!
//! The sensor mock replays a script of snapshots so tests can drive the
//! service through several cycles; the sink keeps every event for
//! assertions.

use std::collections::VecDeque;

use aviary_control::app::events::AppEvent;
use aviary_control::app::ports::{ConfigPort, EventSink, SensorPort};
use aviary_control::config::SystemConfig;
use aviary_control::error::ConfigError;
use aviary_control::sensors::Conditions;
use chrono::Utc;

// ── Snapshots ─────────────────────────────────────────────────

/// Every field present and inside the default limits.
pub fn nominal() -> Conditions {
    Conditions {
        temperature: Some(25.0),
        humidity: Some(60.0),
        co2: Some(800.0),
        ammonia: Some(10.0),
        pressure: Some(25.0),
        external_temperature: Some(30.0),
        power_ok: Some(true),
        ..Conditions::new(Utc::now())
    }
}

pub fn with_temperature(t: f64) -> Conditions {
    Conditions {
        temperature: Some(t),
        ..nominal()
    }
}

// ── MockSensors ───────────────────────────────────────────────

/// Replays `script` one snapshot per read, then repeats the last one.
pub struct MockSensors {
    source: String,
    script: VecDeque<Conditions>,
    last: Conditions,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockSensors {
    pub fn new(script: impl IntoIterator<Item = Conditions>) -> Self {
        Self {
            source: "SENS01".to_owned(),
            script: script.into_iter().collect(),
            last: nominal(),
            reads: 0,
        }
    }

    pub fn steady(conditions: Conditions) -> Self {
        Self::new([conditions])
    }

    pub fn push(&mut self, conditions: Conditions) {
        self.script.push_back(conditions);
    }
}

impl SensorPort for MockSensors {
    fn source_id(&self) -> &str {
        &self.source
    }

    fn read_conditions(&mut self) -> Conditions {
        self.reads += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        Conditions {
            timestamp: Utc::now(),
            ..self.last.clone()
        }
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alarms_raised(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::AlarmRaised(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn alarms_cleared(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::AlarmCleared))
            .count()
    }

    pub fn cycles(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Cycle { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── BrokenStore ───────────────────────────────────────────────

/// Config storage whose blob never decodes.
pub struct BrokenStore;

impl ConfigPort for BrokenStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        Err(ConfigError::Corrupted)
    }

    fn save(&self, _config: &SystemConfig) -> Result<(), ConfigError> {
        Err(ConfigError::Corrupted)
    }
}
