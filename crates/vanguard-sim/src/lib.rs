//! Turn engine for VANGUARD.
//!
//! Resolves player orders, faction AI, point defense, torpedo flight and
//! end-of-turn systems against a `GameState`, producing an ordered trace
//! of intermediate states for the frontend.

pub mod boarding;
pub mod cloak;
pub mod combat;
pub mod config;
pub mod energy;
pub mod engine;
pub mod log;
pub mod outcome;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use vanguard_core as core;

pub use config::{SimConfig, StepDelays};
pub use engine::{StepKind, TurnEngine, TurnStep};
pub use outcome::{ActionOutcome, BeamOutcome, EnergyOutcome, TorpedoOutcome};
pub use scenario::ScenarioId;

#[cfg(test)]
mod tests;
