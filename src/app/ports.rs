//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensor arrays, event sinks, config storage) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the control core never touches hardware directly.

use crate::config::SystemConfig;
use crate::error::ConfigError;
use crate::sensors::Conditions;

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per polling cycle.
pub trait SensorPort {
    /// Identifier stamped on every reading from this array.
    fn source_id(&self) -> &str;

    /// Read every sensor.  Fields whose read failed are left `None`.
    fn read_conditions(&mut self) -> Conditions;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / storage / UI)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go (log, database, display).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting; invalid ranges are
/// rejected with [`ConfigError::Invalid`], not clamped.
pub trait ConfigPort {
    /// Load the stored configuration, or [`ConfigError::NotFound`] when
    /// nothing has been stored yet.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}
