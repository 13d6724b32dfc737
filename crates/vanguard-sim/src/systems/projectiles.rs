//! Projectile phase: torpedoes home on their targets.
//!
//! Each torpedo re-aims at its target's current cell before every step.
//! Entering the target's cell is an impact and ends the torpedo's flight.
//! A torpedo whose target is fully cloaked, dead or gone is lost, and one that
//! has flown its maximum distance burns out.

use rand::Rng;

use vanguard_core::constants::TORPEDO_MAX_TRAVEL;
use vanguard_core::enums::{CloakState, LogCategory};
use vanguard_core::events::CombatEffect;
use vanguard_core::state::GameState;

use crate::combat::report_destroyed;
use crate::combat::torpedo::apply_torpedo_damage;
use crate::log::{event, ship_logs, system_log};

/// Move every live torpedo. Returns true if any torpedo was in flight.
pub fn run<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> bool {
    let mut any = false;
    for index in 0..state.sector.torpedoes.len() {
        if state.sector.torpedoes[index].destroyed {
            continue;
        }
        any = true;
        fly(state, index, rng);
    }
    any
}

fn fly<R: Rng + ?Sized>(state: &mut GameState, index: usize, rng: &mut R) {
    let turn = state.turn;
    let speed = state.sector.torpedoes[index].speed;
    for _ in 0..speed {
        let torpedo = &state.sector.torpedoes[index];
        let target = state
            .sector
            .ship(&torpedo.target_id)
            .filter(|t| !t.is_destroyed() && t.cloak.state != CloakState::Cloaked);
        let Some(target_pos) = target.map(|t| t.position) else {
            let id = torpedo.id.clone();
            state.sector.torpedoes[index].destroyed = true;
            event(state, format!("TORPEDO LOST: '{id}' target lock broken"));
            system_log(state, LogCategory::Combat, "A torpedo loses its lock and self-destructs.");
            return;
        };

        let torpedo = &mut state.sector.torpedoes[index];
        let next = torpedo.position.step_toward(&target_pos);
        torpedo.position = next;
        torpedo.path.push(next);

        if next == target_pos {
            impact(state, index, turn, rng);
            return;
        }
        if state.sector.torpedoes[index].travelled() >= TORPEDO_MAX_TRAVEL {
            let id = state.sector.torpedoes[index].id.clone();
            state.sector.torpedoes[index].destroyed = true;
            event(state, format!("TORPEDO BURNOUT: '{id}'"));
            return;
        }
    }
}

fn impact<R: Rng + ?Sized>(state: &mut GameState, index: usize, turn: u32, rng: &mut R) {
    let sector = &mut state.sector;
    let torpedo = &mut sector.torpedoes[index];
    torpedo.destroyed = true;
    let Some(target) = sector.ships.iter_mut().find(|s| s.id == torpedo.target_id) else {
        return;
    };
    let outcome = apply_torpedo_damage(torpedo, target, turn, rng);
    let (torpedo_id, source_id, target_id) = (
        torpedo.id.clone(),
        torpedo.source_id.clone(),
        target.id.clone(),
    );
    let line = format!(
        "TORPEDO IMPACT: '{}' -> '{}' range={} {} hull={:.0}",
        torpedo.source_name,
        target.name,
        outcome.range,
        if outcome.hit { "HIT" } else { "MISS" },
        outcome.hull_damage
    );
    state.combat_effects.push(CombatEffect::TorpedoImpact {
        torpedo_id,
        target_id: target_id.clone(),
        position: torpedo.position,
        hit: outcome.hit,
    });
    event(state, line);
    ship_logs(state, &source_id, LogCategory::Combat, outcome.logs);
    if outcome.target_destroyed {
        report_destroyed(state, &target_id);
    }
}
