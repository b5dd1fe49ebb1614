//! Application core: orchestration around the control engine, zero I/O.
//!
//! Sensors, event consumers and configuration storage are reached only
//! through the **port traits** in [`ports`], keeping this layer fully
//! testable without real hardware.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
