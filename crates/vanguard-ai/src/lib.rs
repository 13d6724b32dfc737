//! Faction AI for VANGUARD.
//!
//! Per-faction strategies decide stance, power, movement, fire and
//! last-resort moves for every computer-controlled ship. Decisions come
//! back as `TurnPlan`s; this crate never mutates game state.

pub mod context;
pub mod director;
pub mod doctrine;
pub mod factions;
pub mod pathfinding;
pub mod plan;
pub mod squadron;
pub mod strategy;

pub use vanguard_core as core;

pub use context::AiContext;
pub use director::Director;
pub use plan::{CloakCommand, DesperationMove, TurnPlan};
pub use squadron::AiSession;
pub use strategy::FactionStrategy;
