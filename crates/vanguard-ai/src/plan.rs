//! Decision output of the faction AI.
//!
//! Strategies never touch the game state. They fill a `TurnPlan` which the
//! simulation applies in a fixed order: desperation, settings, movement,
//! beams, torpedo, cloak, capture.

use vanguard_core::commands::FireOrder;
use vanguard_core::components::EnergyAllocation;
use vanguard_core::enums::{RepairTarget, Stance};
use vanguard_core::types::{EntityId, Position};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CloakCommand {
    #[default]
    Hold,
    Engage,
    Disengage,
}

/// Last-resort outcomes, decided (including their rolls) by the strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum DesperationMove {
    /// Collide with the target; the rammer is destroyed.
    Ram { target_id: EntityId },
    /// Detonate, damaging every adjacent ship.
    SelfDestruct,
    /// Jump out of the sector. A failed attempt destroys the ship.
    Escape { succeeded: bool },
    /// Begin a retreat countdown.
    Retreat,
}

/// Everything one AI ship intends to do this turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnPlan {
    pub ship_id: EntityId,
    pub stance: Option<Stance>,
    pub allocation: Option<EnergyAllocation>,
    pub repair_target: Option<RepairTarget>,
    pub evasive: Option<bool>,
    pub point_defense: Option<bool>,
    /// Adjacent destination cell.
    pub movement: Option<Position>,
    pub beams: Vec<FireOrder>,
    pub torpedo: Option<FireOrder>,
    pub cloak: CloakCommand,
    /// Derelict to seize.
    pub capture: Option<EntityId>,
    pub desperation: Option<DesperationMove>,
    /// Set when a reactive action (emergency cloak) used the whole turn.
    pub consumed_turn: bool,
}

impl TurnPlan {
    pub fn new(ship_id: &str) -> Self {
        Self {
            ship_id: ship_id.to_string(),
            ..Self::default()
        }
    }

    /// True when the plan changes nothing.
    pub fn is_idle(&self) -> bool {
        *self == Self::new(&self.ship_id)
    }
}
