//! Aviary control library.
//!
//! Environmental control core for a poultry house: sensor readings in,
//! actuator commands out.  The pure decision rules live in [`control`];
//! [`app`] wraps them in a port-driven service for an external scheduler.

#![deny(unused_must_use)]

pub mod actuators;
pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod sensors;

pub use error::{Error, Result};
