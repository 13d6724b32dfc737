//! Cloak state machine: requests, the reliability roll and transitions.

use rand::Rng;

use vanguard_core::components::Ship;
use vanguard_core::constants::*;
use vanguard_core::enums::CloakState;
use vanguard_core::state::SectorState;
use vanguard_sector::{is_asteroid_field, is_nebula};

use crate::outcome::ActionOutcome;

/// Environment multiplier on cloak reliability at the ship's position.
pub fn environment_modifier(ship: &Ship, sector: &SectorState) -> f64 {
    if is_nebula(sector, &ship.position) {
        CLOAK_NEBULA_MODIFIER
    } else if is_asteroid_field(sector, &ship.position) {
        CLOAK_ASTEROID_MODIFIER
    } else {
        1.0
    }
}

/// (base - instability) x environment.
pub fn cloak_reliability(ship: &Ship, env_modifier: f64) -> f64 {
    ((ship.cloak.base_reliability - ship.cloak.instability) * env_modifier).clamp(0.0, 1.0)
}

/// Begin cloaking. Shields drop while the field forms.
pub fn request_engage(ship: &mut Ship) -> ActionOutcome {
    if !ship.cloak.equipped {
        return ActionOutcome::failed("No cloaking device installed.");
    }
    if ship.cloak.state != CloakState::Visible {
        return ActionOutcome::failed("Cloak is already active.");
    }
    if ship.cloak.cooldown > 0 {
        return ActionOutcome::failed(format!(
            "Cloak recharging ({} turn(s) remaining).",
            ship.cloak.cooldown
        ));
    }
    if ship.docked_with.is_some() {
        return ActionOutcome::failed("Cannot cloak while docked.");
    }
    ship.cloak.state = CloakState::Cloaking;
    ship.cloak.transition_turns = CLOAK_TRANSITION_TURNS;
    ship.shields.set(0.0);
    ship.point_defense_enabled = false;
    ActionOutcome::ok("Engaging cloaking device.")
}

pub fn request_disengage(ship: &mut Ship) -> ActionOutcome {
    if ship.cloak.state != CloakState::Cloaked {
        return ActionOutcome::failed("Cloak is not fully engaged.");
    }
    ship.cloak.state = CloakState::Decloaking;
    ship.cloak.transition_turns = CLOAK_TRANSITION_TURNS;
    ActionOutcome::ok("Disengaging cloak.")
}

/// Reliability roll for a ship that is cloaked or cloaking.
///
/// Failure drops the ship to Visible, starts the cooldown and keeps the
/// shields offline for the reactivation delay. A stable cloak sheds some
/// instability. Returns `None` when no roll was due.
pub fn roll_cloak<R: Rng + ?Sized>(
    ship: &mut Ship,
    env_modifier: f64,
    rng: &mut R,
) -> Option<ActionOutcome> {
    if !matches!(ship.cloak.state, CloakState::Cloaked | CloakState::Cloaking) {
        return None;
    }
    let reliability = cloak_reliability(ship, env_modifier);
    if rng.gen::<f64>() < reliability {
        if ship.cloak.state == CloakState::Cloaked {
            ship.cloak.instability = (ship.cloak.instability - CLOAK_INSTABILITY_DECAY).max(0.0);
        }
        return Some(ActionOutcome::silent_ok());
    }
    ship.cloak.state = CloakState::Visible;
    ship.cloak.transition_turns = 0;
    ship.cloak.instability = 0.0;
    ship.cloak.cooldown = CLOAK_FAILURE_COOLDOWN;
    ship.cloak.shield_reactivation_delay = CLOAK_SHIELD_REACTIVATION_DELAY;
    ship.shields.set(0.0);
    Some(ActionOutcome::failed(format!(
        "Cloak failure! Field collapsed (reliability {:.0}%).",
        reliability * 100.0
    )))
}

/// Count down transitions, cooldown and the shield lockout.
/// Returns the new state when a transition completed.
pub fn advance_cloak(ship: &mut Ship) -> Option<CloakState> {
    let cloak = &mut ship.cloak;
    cloak.cooldown = cloak.cooldown.saturating_sub(1);
    if cloak.shield_reactivation_delay > 0 {
        cloak.shield_reactivation_delay -= 1;
        ship.shields.set(0.0);
    }
    if !cloak.state.is_transitioning() {
        return None;
    }
    cloak.transition_turns = cloak.transition_turns.saturating_sub(1);
    if cloak.transition_turns > 0 {
        return None;
    }
    cloak.state = match cloak.state {
        CloakState::Cloaking => CloakState::Cloaked,
        _ => CloakState::Visible,
    };
    Some(cloak.state)
}
