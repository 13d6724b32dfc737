//! Player phase: settings, movement, fire, cloak and boarding orders.

use rand::Rng;

use vanguard_core::commands::PlayerTurnActions;
use vanguard_core::constants::*;
use vanguard_core::enums::LogCategory;
use vanguard_core::state::GameState;
use vanguard_core::types::move_one_step;
use vanguard_sector::in_bounds;

use crate::boarding::begin_boarding;
use crate::cloak::{request_disengage, request_engage};
use crate::combat::resolve_fire_order;
use crate::energy::consume_energy;
use crate::log::{event, ship_log, ship_logs};
use crate::systems::movement::enter_cell;

/// Resolve the player's orders for this turn.
pub fn run<R: Rng + ?Sized>(state: &mut GameState, actions: &PlayerTurnActions, rng: &mut R) {
    let player_id = state.player.ship_id.clone();
    if !state.player_ship().is_some_and(|s| s.can_act()) {
        return;
    }

    apply_settings(state, &player_id, actions);

    if let Some(target) = actions.navigation_target {
        state.player.navigation_target = Some(target);
    }
    navigate(state, &player_id);

    for order in &actions.fire {
        if !state.player_ship().is_some_and(|s| s.can_act()) {
            break;
        }
        resolve_fire_order(state, &player_id, order, rng);
    }

    if actions.engage_cloak || actions.disengage_cloak {
        if let Some(ship) = state.player_ship_mut() {
            let outcome = if actions.engage_cloak {
                request_engage(ship)
            } else {
                request_disengage(ship)
            };
            let line = format!("CLOAK: '{}' {:?}", ship.name, ship.cloak.state);
            ship_logs(state, &player_id, LogCategory::Systems, outcome.logs);
            if outcome.success {
                event(state, line);
            }
        }
    }

    if let Some(target_id) = &actions.board {
        let outcome = begin_boarding(state, &player_id, target_id, CAPTURE_REPAIR_TURNS);
        if outcome.success {
            event(state, format!("BOARD: '{player_id}' -> '{target_id}'"));
        }
        ship_logs(state, &player_id, LogCategory::Special, outcome.logs);
    }
}

fn apply_settings(state: &mut GameState, player_id: &str, actions: &PlayerTurnActions) {
    let mut messages = Vec::new();
    let Some(ship) = state.player_ship_mut() else {
        return;
    };
    if let Some(red_alert) = actions.red_alert {
        ship.red_alert = red_alert;
        messages.push(if red_alert { "Red alert! Shields up." } else { "Standing down from red alert." }.to_string());
    }
    if let Some(allocation) = actions.allocation {
        match allocation.validate() {
            Ok(a) => {
                ship.allocation = a;
                messages.push(format!(
                    "Power allocation: weapons {}%, shields {}%, engines {}%.",
                    a.weapons(),
                    a.shields(),
                    a.engines()
                ));
            }
            Err(e) => messages.push(format!("Allocation rejected: {e}.")),
        }
    }
    if let Some(evasive) = actions.evasive {
        ship.evasive = evasive;
    }
    if let Some(pd) = actions.point_defense {
        ship.point_defense_enabled = pd && !ship.subsystems.point_defense.is_empty();
    }
    if let Some(target) = actions.repair_target {
        ship.repair_target = Some(target);
        messages.push("Damage control teams reassigned.".to_string());
    }
    if actions.undock && ship.docked_with.take().is_some() {
        messages.push("Undocked.".to_string());
    }
    ship_logs(state, player_id, LogCategory::Systems, messages);
}

/// Fly toward the standing navigation target, one cell at a time.
fn navigate(state: &mut GameState, player_id: &str) {
    let Some(destination) = state.player.navigation_target else {
        return;
    };
    if !in_bounds(&state.sector, &destination) {
        state.player.navigation_target = None;
        ship_log(state, player_id, LogCategory::Movement, "Navigation target is outside the sector.");
        return;
    }
    let Some(ship) = state.player_ship() else {
        return;
    };
    let start = ship.position;
    let speed = if ship.red_alert {
        PLAYER_RED_ALERT_SPEED
    } else {
        PLAYER_SPEED
    };
    let name = ship.name.clone();

    for _ in 0..speed {
        let Some(ship) = state.player_ship() else {
            break;
        };
        if ship.position == destination {
            break;
        }
        if ship.docked_with.is_some() {
            ship_log(state, player_id, LogCategory::Movement, "Cannot move while docked.");
            break;
        }
        if ship.subsystems.engines.is_empty() || !ship.can_act() {
            ship_log(state, player_id, LogCategory::Movement, "Engines offline.");
            break;
        }
        let next = move_one_step(&ship.position, &destination);
        if state.sector.is_blocked(&next, player_id) {
            ship_log(
                state,
                player_id,
                LogCategory::Movement,
                format!("Course blocked at ({},{}).", next.x, next.y),
            );
            break;
        }
        let Some(ship) = state.player_ship_mut() else {
            break;
        };
        let paid = consume_energy(ship, MOVE_ENERGY_COST, "impulse");
        if !paid.success {
            ship_logs(state, player_id, LogCategory::Movement, paid.logs);
            break;
        }
        ship.position = next;
        enter_cell(state, player_id);
    }

    let Some(ship) = state.player_ship() else {
        return;
    };
    let end = ship.position;
    if end == destination {
        state.player.navigation_target = None;
    }
    if end != start {
        event(state, format!("MOVE: '{name}' from ({},{}) to ({},{})", start.x, start.y, end.x, end.y));
        ship_log(state, player_id, LogCategory::Movement, format!("Moved to ({},{}).", end.x, end.y));
    }
}
