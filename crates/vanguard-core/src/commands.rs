//! Player intentions for one turn.
//!
//! The setters (`red_alert`, `allocation`, ...) are applied before any
//! movement or fire so the rest of the turn sees the new configuration.

use serde::{Deserialize, Serialize};

use crate::components::EnergyAllocation;
use crate::enums::*;
use crate::types::{EntityId, Position};

/// Fire one weapon at one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireOrder {
    pub weapon_id: EntityId,
    pub target_id: EntityId,
    /// Subsystem to lock; `None` aims for the hull.
    pub subsystem: Option<Subsystem>,
}

/// Everything the player asked for this turn. Default is "do nothing".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTurnActions {
    /// Orders are resolved in sequence; each beam or torpedo costs energy.
    pub fire: Vec<FireOrder>,
    /// Cell to fly toward. Persists across turns until reached.
    pub navigation_target: Option<Position>,
    pub engage_cloak: bool,
    pub disengage_cloak: bool,
    pub undock: bool,

    pub red_alert: Option<bool>,
    pub allocation: Option<EnergyAllocation>,
    pub evasive: Option<bool>,
    pub point_defense: Option<bool>,
    pub repair_target: Option<RepairTarget>,
    /// Derelict to send a boarding party to.
    pub board: Option<EntityId>,
}

impl PlayerTurnActions {
    pub fn fire_at(weapon_id: &str, target_id: &str, subsystem: Option<Subsystem>) -> Self {
        Self {
            fire: vec![FireOrder {
                weapon_id: weapon_id.to_string(),
                target_id: target_id.to_string(),
                subsystem,
            }],
            ..Self::default()
        }
    }

    pub fn navigate(target: Position) -> Self {
        Self {
            navigation_target: Some(target),
            ..Self::default()
        }
    }
}
