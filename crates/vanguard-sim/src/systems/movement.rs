//! Cell entry effects and single-step AI movement.

use vanguard_core::constants::MOVE_ENERGY_COST;
use vanguard_core::enums::LogCategory;
use vanguard_core::events::CombatEffect;
use vanguard_core::state::GameState;
use vanguard_core::types::Position;
use vanguard_sector::in_bounds;

use crate::combat::mines::detonate_mine;
use crate::combat::report_destroyed;
use crate::energy::consume_energy;
use crate::log::{event, ship_log, ship_logs};

/// Trigger whatever waits in the ship's new cell. Mines detonate and are
/// removed regardless of whose they are.
pub fn enter_cell(state: &mut GameState, ship_id: &str) {
    let Some(position) = state.sector.ship(ship_id).map(|s| s.position) else {
        return;
    };
    let Some(index) = state.sector.mines.iter().position(|m| m.position == position) else {
        return;
    };
    let mine = state.sector.mines.remove(index);
    let Some(ship) = state.sector.ship_mut(ship_id) else {
        return;
    };
    let (shield_damage, hull_damage) = detonate_mine(&mine, ship);
    let destroyed = ship.is_destroyed();
    let name = ship.name.clone();
    state.combat_effects.push(CombatEffect::MineDetonation {
        mine_id: mine.id.clone(),
        position,
    });
    event(
        state,
        format!("MINE: '{name}' at ({},{}) shields={shield_damage:.0} hull={hull_damage:.0}", position.x, position.y),
    );
    ship_log(
        state,
        ship_id,
        LogCategory::Combat,
        format!("Mine detonation! Shields -{shield_damage:.0}, hull -{hull_damage:.0}."),
    );
    if destroyed {
        report_destroyed(state, ship_id);
    }
}

/// Move an AI ship one cell. Returns false when the move was refused.
pub fn step_ship(state: &mut GameState, ship_id: &str, to: Position) -> bool {
    let Some(ship) = state.sector.ship(ship_id) else {
        return false;
    };
    let from = ship.position;
    let refusal = if from.distance_to(&to) != 1 {
        Some("Helm: destination is not adjacent.")
    } else if !in_bounds(&state.sector, &to) || state.sector.is_blocked(&to, ship_id) {
        Some("Helm: course blocked.")
    } else if ship.subsystems.engines.is_empty() || ship.docked_with.is_some() {
        Some("Helm: engines unavailable.")
    } else {
        None
    };
    if let Some(reason) = refusal {
        ship_log(state, ship_id, LogCategory::Movement, reason);
        return false;
    }

    let Some(ship) = state.sector.ship_mut(ship_id) else {
        return false;
    };
    let paid = consume_energy(ship, MOVE_ENERGY_COST, "impulse");
    if !paid.success {
        ship_logs(state, ship_id, LogCategory::Movement, paid.logs);
        return false;
    }
    ship.position = to;
    let name = ship.name.clone();
    event(state, format!("MOVE: '{name}' from ({},{}) to ({},{})", from.x, from.y, to.x, to.y));
    enter_cell(state, ship_id);
    true
}
