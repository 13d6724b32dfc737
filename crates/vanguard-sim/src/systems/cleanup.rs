//! Cleanup system: remove wrecks and spent torpedoes, then check for the
//! end of the battle.
//!
//! The player's ship is never removed so the final state still shows it.

use tracing::info;

use vanguard_core::enums::{Allegiance, LogCategory};
use vanguard_core::state::GameState;

use crate::log::{event, system_log};

pub fn run(state: &mut GameState) {
    let player_id = state.player.ship_id.clone();
    state
        .sector
        .ships
        .retain(|s| !s.is_destroyed() || s.id == player_id);
    state.sector.torpedoes.retain(|t| !t.destroyed);

    // Locks on ships that are gone cannot continue next turn.
    let present: Vec<String> = state.sector.ships.iter().map(|s| s.id.clone()).collect();
    for ship in state.sector.ships.iter_mut() {
        if let Some(target) = &ship.targeting.target_id {
            if !present.contains(target) {
                ship.targeting.clear();
            }
        }
    }

    let hostiles = state
        .sector
        .ships
        .iter()
        .filter(|s| s.allegiance == Allegiance::Enemy && s.is_operational())
        .count();
    if let Some(cell) = state.quadrant_map.current_cell_mut() {
        cell.hostile_count = hostiles as u32;
        cell.explored = true;
    }

    check_victory(state, hostiles);
}

/// Defeat when the player ship is destroyed or abandoned; victory when no
/// operational enemy remains.
fn check_victory(state: &mut GameState, hostiles: usize) {
    if state.game_over {
        return;
    }
    let player_lost = state
        .player_ship()
        .map_or(true, |s| !s.is_operational());
    if player_lost {
        state.game_over = true;
        state.game_won = false;
        info!(turn = state.turn, "defeat");
        event(state, "GAME OVER: player ship lost");
        system_log(state, LogCategory::Info, "Your ship has been lost. Mission failed.");
    } else if hostiles == 0 {
        state.game_over = true;
        state.game_won = true;
        info!(turn = state.turn, "victory");
        event(state, "VICTORY: no hostile ships remain");
        system_log(state, LogCategory::Info, "All hostile ships eliminated. Victory!");
    }
}
