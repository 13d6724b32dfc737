//! Result values for in-turn actions.
//!
//! A failed action is not an error. It comes back with `success == false`
//! and the explanation in `logs`, and the turn carries on.

use vanguard_core::enums::Subsystem;

/// Success flag plus narrative for any resource-consuming action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionOutcome {
    pub success: bool,
    pub logs: Vec<String>,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            logs: vec![message.into()],
        }
    }

    pub fn silent_ok() -> Self {
        Self {
            success: true,
            logs: Vec::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            logs: vec![message.into()],
        }
    }
}

/// Outcome of drawing or generating energy.
pub type EnergyOutcome = ActionOutcome;

/// One beam shot, resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeamOutcome {
    pub hit: bool,
    pub hit_chance: f64,
    /// Damage after allocation, falloff and focus fire; before shields.
    pub damage: f64,
    pub leaked: f64,
    pub shield_damage: f64,
    pub hull_damage: f64,
    pub subsystem: Option<Subsystem>,
    pub subsystem_damage: f64,
    pub critical: bool,
    pub subsystem_destroyed: bool,
    pub target_destroyed: bool,
    pub logs: Vec<String>,
}

/// One torpedo impact, resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TorpedoOutcome {
    pub hit: bool,
    pub hit_chance: f64,
    /// Launch-to-impact distance used for the hit table.
    pub range: i32,
    pub bypass_damage: f64,
    pub shield_damage: f64,
    pub hull_damage: f64,
    pub plasma_burn: bool,
    pub target_destroyed: bool,
    pub logs: Vec<String>,
}
