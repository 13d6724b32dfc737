//! AI phase: ask each faction strategy for a plan and carry it out.

use rand::RngCore;
use tracing::{debug, trace};

use vanguard_ai::{AiContext, AiSession, CloakCommand, Director, TurnPlan};
use vanguard_core::constants::AI_SPEED;
use vanguard_core::enums::{Allegiance, LogCategory};
use vanguard_core::state::GameState;
use vanguard_core::types::EntityId;

use crate::boarding::begin_boarding;
use crate::cloak::{request_disengage, request_engage};
use crate::combat::desperation::apply_desperation;
use crate::combat::{report_destroyed, resolve_fire_order};
use crate::log::{event, ship_log, ship_logs};
use crate::systems::movement::step_ship;

/// Non-player ships in allegiance order, stable within a group.
pub fn turn_order(state: &GameState) -> Vec<(Allegiance, EntityId)> {
    let mut order: Vec<(Allegiance, EntityId)> = state
        .sector
        .ships
        .iter()
        .filter(|s| s.id != state.player.ship_id && s.can_act())
        .map(|s| (s.allegiance, s.id.clone()))
        .collect();
    order.sort_by_key(|(a, _)| a.turn_order());
    order
}

/// Decide a plan for one ship. `None` if it can no longer act.
pub fn plan_for(
    state: &GameState,
    ship_id: &str,
    session: &AiSession,
    director: &Director,
    rng: &mut dyn RngCore,
) -> Option<TurnPlan> {
    let ship = state.sector.ship(ship_id).filter(|s| s.can_act())?;
    let ctx = AiContext::build(ship, &state.sector, state.turn, session);
    Some(director.strategy_for(ship.faction).process_turn(&ctx, rng))
}

/// Apply a plan in order: desperation, settings, movement, beams,
/// torpedo, cloak, capture.
pub fn apply_plan(state: &mut GameState, plan: &TurnPlan, rng: &mut dyn RngCore) {
    let id = plan.ship_id.as_str();

    if plan.is_idle() {
        trace!(ship = %id, "holding");
        return;
    }

    if let Some(mv) = &plan.desperation {
        let name = state.sector.ship(id).map(|s| s.name.clone()).unwrap_or_default();
        let already_destroyed = destroyed_ids(state);
        let outcome = apply_desperation(state, id, mv);
        event(state, format!("DESPERATION: '{name}' {mv:?}"));
        for message in outcome.logs {
            ship_log(state, id, LogCategory::Special, format!("{name}: {message}"));
        }
        for destroyed in destroyed_ids(state) {
            if !already_destroyed.contains(&destroyed) {
                report_destroyed(state, &destroyed);
            }
        }
        return;
    }

    apply_settings(state, plan);

    if plan.consumed_turn {
        debug!(ship = %id, "reactive action used the turn");
    } else if !move_and_fire(state, plan, rng) {
        return;
    }

    if plan.cloak != CloakCommand::Hold {
        if let Some(ship) = state.sector.ship_mut(id) {
            let outcome = match plan.cloak {
                CloakCommand::Engage => request_engage(ship),
                _ => request_disengage(ship),
            };
            let line = format!("CLOAK: '{}' {:?}", ship.name, ship.cloak.state);
            if outcome.success {
                event(state, line);
            }
            ship_logs(state, id, LogCategory::Systems, outcome.logs);
        }
    }

    if let Some(target_id) = &plan.capture {
        let outcome = begin_boarding(state, id, target_id, 0);
        if outcome.success {
            event(state, format!("BOARD: '{id}' -> '{target_id}'"));
        }
        ship_logs(state, id, LogCategory::Special, outcome.logs);
    }
}

/// Movement, then beams, then the torpedo. False once the ship can no
/// longer act.
fn move_and_fire(state: &mut GameState, plan: &TurnPlan, rng: &mut dyn RngCore) -> bool {
    let id = plan.ship_id.as_str();
    if let Some(to) = plan.movement {
        let reach = state.sector.ship(id).map(|s| s.position.distance_to(&to));
        if reach.is_some_and(|d| d <= AI_SPEED as i32) {
            step_ship(state, id, to);
        } else {
            debug!(ship = %id, ?to, "planned move beyond reach");
        }
    }
    for order in &plan.beams {
        if !state.sector.ship(id).is_some_and(|s| s.can_act()) {
            return false;
        }
        resolve_fire_order(state, id, order, rng);
    }
    if let Some(order) = &plan.torpedo {
        if state.sector.ship(id).is_some_and(|s| s.can_act()) {
            resolve_fire_order(state, id, order, rng);
        }
    }
    true
}

fn apply_settings(state: &mut GameState, plan: &TurnPlan) {
    let Some(ship) = state.sector.ship_mut(&plan.ship_id) else {
        return;
    };
    let mut messages = Vec::new();
    if let Some(stance) = plan.stance {
        if stance != ship.stance {
            messages.push(format!("Assumes a {stance:?} stance."));
        }
        ship.stance = stance;
    }
    if let Some(allocation) = plan.allocation {
        ship.allocation = allocation;
    }
    if let Some(repair) = plan.repair_target {
        ship.repair_target = Some(repair);
    }
    if let Some(evasive) = plan.evasive {
        ship.evasive = evasive;
    }
    if let Some(pd) = plan.point_defense {
        ship.point_defense_enabled = pd && !ship.subsystems.point_defense.is_empty();
        if ship.point_defense_enabled {
            messages.push("Point defense online.".to_string());
        }
    }
    debug!(ship = %plan.ship_id, stance = ?ship.stance, "ai settings applied");
    ship_logs(state, &plan.ship_id, LogCategory::Ai, messages);
}

/// Ships at zero hull that have not been removed yet.
fn destroyed_ids(state: &GameState) -> Vec<EntityId> {
    state
        .sector
        .ships
        .iter()
        .filter(|s| s.is_destroyed())
        .map(|s| s.id.clone())
        .collect()
}
