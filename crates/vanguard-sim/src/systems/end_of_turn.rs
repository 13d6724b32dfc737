//! End-of-turn systems.
//!
//! Per ship, in order: capture progress (a ship being restored does
//! nothing else), repairs, shield regeneration, the reactor cycle, the
//! cloak reliability roll, status effects, life support, cloak countdowns,
//! docking resupply and the retreat countdown. Then sensor memory and
//! threat summaries are refreshed for everyone.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::info;

use vanguard_core::components::{HiddenContact, StatusEffect};
use vanguard_core::constants::HIDDEN_CONTACT_MEMORY_TURNS;
use vanguard_core::enums::{CloakState, LogCategory};
use vanguard_core::events::CombatEffect;
use vanguard_core::state::GameState;
use vanguard_core::types::{EntityId, Position};
use vanguard_sector::{calculate_threat_info, visible_hostiles};

use crate::boarding::process_capture;
use crate::cloak::{advance_cloak, environment_modifier, roll_cloak};
use crate::combat::report_destroyed;
use crate::energy::{
    advance_life_support, apply_repairs, drain_life_support_reserves, process_energy,
    regenerate_shields, resupply,
};
use crate::log::{event, ship_log};

/// What happened to one ship, collected while it is borrowed.
#[derive(Default)]
struct ShipReport {
    logs: Vec<(LogCategory, String)>,
    events: Vec<String>,
    effects: Vec<CombatEffect>,
    destroyed: bool,
    departing: bool,
}

pub fn run<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let ids: Vec<EntityId> = state
        .sector
        .ships
        .iter()
        .filter(|s| !s.is_destroyed())
        .map(|s| s.id.clone())
        .collect();

    let mut departing = Vec::new();
    for id in &ids {
        let report = process_ship(state, id, rng);
        for (category, message) in report.logs {
            ship_log(state, id, category, message);
        }
        for line in report.events {
            event(state, line);
        }
        state.combat_effects.extend(report.effects);
        if report.destroyed {
            report_destroyed(state, id);
        }
        if report.departing {
            departing.push(id.clone());
        }
    }

    for id in departing {
        ship_log(state, &id, LogCategory::Movement, "Jumps to warp and leaves the sector.");
        event(state, format!("DEPARTED: '{id}'"));
        info!(turn = state.turn, ship = %id, "ship departed");
        state.sector.mark_departed(&id);
    }

    update_sensor_memory(state);
    expire_attackers(state);
}

fn process_ship<R: Rng + ?Sized>(state: &mut GameState, id: &str, rng: &mut R) -> ShipReport {
    let turn = state.turn;
    let mut report = ShipReport::default();
    let Some(env) = state
        .sector
        .ship(id)
        .map(|s| environment_modifier(s, &state.sector))
    else {
        return report;
    };
    let Some(ship) = state.sector.ship_mut(id) else {
        return report;
    };

    if ship.capture_info.is_some() {
        if let Some(message) = process_capture(ship, turn) {
            report.events.push(format!("CAPTURED: '{}' now {:?}", ship.name, ship.allegiance));
            report.logs.push((LogCategory::Special, message));
        }
        return report;
    }
    if ship.derelict {
        return report;
    }

    if let Some(message) = apply_repairs(ship) {
        report.logs.push((LogCategory::Systems, message));
    }
    regenerate_shields(ship);

    let reactor = process_energy(ship, rng);
    for message in reactor.outcome.logs {
        report.logs.push((LogCategory::Systems, message));
    }
    if reactor.crystals_used > 0 {
        report.events.push(format!(
            "DILITHIUM: '{}' used={} energy={:.0}",
            ship.name, reactor.crystals_used, ship.energy.current
        ));
    }

    if let Some(outcome) = roll_cloak(ship, env, rng) {
        if !outcome.success {
            report.effects.push(CombatEffect::CloakFlicker {
                ship_id: ship.id.clone(),
                position: ship.position,
                state: CloakState::Visible,
            });
            report.events.push(format!("CLOAK FAILURE: '{}'", ship.name));
        }
        for message in outcome.logs {
            report.logs.push((LogCategory::Systems, message));
        }
    }

    tick_status_effects(ship, &mut report);
    if ship.is_destroyed() {
        report.destroyed = true;
        return report;
    }

    let reserves_out = drain_life_support_reserves(ship);
    if advance_life_support(ship, reactor.starved || reserves_out) {
        info!(turn, ship = %ship.id, "crew abandons ship");
        report.events.push(format!("DERELICT: '{}'", ship.name));
        report
            .logs
            .push((LogCategory::Special, "Life support has failed. The crew abandons ship.".to_string()));
        return report;
    } else if let Some(elapsed) = ship.life_support_failure_turns {
        report
            .logs
            .push((LogCategory::Systems, format!("Life support failing ({elapsed} turn(s)).")));
    }

    if let Some(cloak_state) = advance_cloak(ship) {
        report.effects.push(CombatEffect::CloakFlicker {
            ship_id: ship.id.clone(),
            position: ship.position,
            state: cloak_state,
        });
        report.events.push(format!("CLOAK: '{}' {:?}", ship.name, cloak_state));
    }

    if ship.docked_with.is_some() {
        resupply(ship);
    }

    if let Some(remaining) = ship.retreat_countdown {
        let remaining = remaining.saturating_sub(1);
        ship.retreat_countdown = Some(remaining);
        report.departing = remaining == 0;
    }
    report
}

fn tick_status_effects(ship: &mut vanguard_core::components::Ship, report: &mut ShipReport) {
    let mut burned = 0.0;
    for effect in ship.status_effects.iter_mut() {
        match effect {
            StatusEffect::PlasmaBurn {
                damage,
                turns_remaining,
            } => {
                burned += *damage;
                *turns_remaining = turns_remaining.saturating_sub(1);
            }
        }
    }
    ship.status_effects.retain(|e| match e {
        StatusEffect::PlasmaBurn { turns_remaining, .. } => *turns_remaining > 0,
    });
    if burned > 0.0 {
        let dealt = ship.hull.sub(burned);
        report
            .logs
            .push((LogCategory::Combat, format!("Plasma fire burns the hull (-{dealt:.0}).")));
    }
}

/// Refresh contacts, lost-contact memory and threat summaries.
fn update_sensor_memory(state: &mut GameState) {
    let turn = state.turn;
    let sector = &state.sector;
    let live: BTreeSet<&str> = sector
        .ships
        .iter()
        .filter(|s| !s.is_destroyed())
        .map(|s| s.id.as_str())
        .collect();

    let mut updates = Vec::new();
    for (index, ship) in sector.ships.iter().enumerate() {
        if !ship.is_operational() {
            continue;
        }
        let visible = visible_hostiles(ship, sector);
        let threat = calculate_threat_info(ship, &visible);
        let now: Vec<EntityId> = visible.iter().map(|s| s.id.clone()).collect();
        let lost: Vec<(EntityId, Position)> = ship
            .transient
            .contacts
            .iter()
            .filter(|c| !now.contains(c))
            .filter_map(|c| sector.ship(c).filter(|s| !s.is_destroyed()).map(|s| (c.clone(), s.position)))
            .collect();
        let forget: Vec<EntityId> = ship
            .transient
            .hidden_enemies
            .iter()
            .filter(|h| !live.contains(h.id.as_str()))
            .map(|h| h.id.clone())
            .collect();
        updates.push((index, now, threat, lost, forget));
    }

    for (index, now, threat, lost, forget) in updates {
        let transient = &mut state.sector.ships[index].transient;
        transient.threat_info = Some(threat);
        transient.hidden_enemies.retain(|h| {
            !now.contains(&h.id)
                && !forget.contains(&h.id)
                && turn.saturating_sub(h.turn_lost) < HIDDEN_CONTACT_MEMORY_TURNS
        });
        for (id, last_known) in lost {
            if !transient.hidden_enemies.iter().any(|h| h.id == id) {
                transient.hidden_enemies.push(HiddenContact {
                    id,
                    last_known,
                    turn_lost: turn,
                });
            }
        }
        transient.contacts = now;
    }
}

/// Neutrals only stay provoked through the turn after an attack.
fn expire_attackers(state: &mut GameState) {
    let turn = state.turn;
    for ship in state.sector.ships.iter_mut() {
        let t = &mut ship.transient;
        if t.last_attacked_turn.map_or(true, |at| at < turn) {
            t.last_attacker_id = None;
            t.last_attacker_position = None;
            t.last_attacked_turn = None;
        }
    }
}
