//! Spatial queries for VANGUARD sectors.
//!
//! Environment membership, the sensor model and threat scoring.
//! Everything here is read-only over a `SectorState`.

pub use vanguard_core as core;

pub mod environment;
pub mod threat;
pub mod visibility;

// Re-export key functions for convenience.
pub use environment::{
    in_bounds, is_asteroid_field, is_comm_blackout, is_deep_ion_storm, is_deep_nebula,
    is_ion_storm, is_nebula,
};
pub use threat::{calculate_threat_info, find_closest_target, is_hostile, threat_score};
pub use visibility::{can_see_entity, holds_lock, visible_hostiles, SensorProfile};
