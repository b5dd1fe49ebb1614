//! Environmental control: per-cycle rule evaluation and the engine that
//! applies it to the fleet.

pub mod engine;
pub mod rules;

pub use engine::ControlEngine;
pub use rules::{ControlAction, evaluate};
