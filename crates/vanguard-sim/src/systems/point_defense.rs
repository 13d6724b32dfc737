//! Point-defense phase.
//!
//! Every ship with point defense enabled and a working PD subsystem gets
//! one shot at the most dangerous hostile torpedo within range 1. The hit
//! chance is the PD subsystem's health fraction and nothing else.

use rand::Rng;

use vanguard_core::components::{Ship, TorpedoProjectile};
use vanguard_core::constants::POINT_DEFENSE_RANGE;
use vanguard_core::enums::{LogCategory, Subsystem};
use vanguard_core::events::CombatEffect;
use vanguard_core::state::GameState;

use crate::log::{event, ship_log};

pub fn point_defense_hit_chance(ship: &Ship) -> f64 {
    ship.subsystems.fraction(Subsystem::PointDefense)
}

fn can_intercept(ship: &Ship) -> bool {
    ship.can_act()
        && ship.point_defense_enabled
        && !ship.subsystems.point_defense.is_empty()
        && !ship.cloak.state.is_concealed()
}

fn is_threat_to(torpedo: &TorpedoProjectile, ship: &Ship) -> bool {
    torpedo.source_id != ship.id
        && (torpedo.target_id == ship.id || ship.allegiance.is_hostile_to(torpedo.allegiance))
}

/// Index of the highest-damage hostile torpedo in reach. Ties keep the
/// earliest launched.
pub fn select_intercept(ship: &Ship, torpedoes: &[TorpedoProjectile]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, t) in torpedoes.iter().enumerate() {
        if t.destroyed
            || !is_threat_to(t, ship)
            || t.position.distance_to(&ship.position) > POINT_DEFENSE_RANGE
        {
            continue;
        }
        if best.map_or(true, |(_, d)| t.damage > d) {
            best = Some((i, t.damage));
        }
    }
    best.map(|(i, _)| i)
}

/// Run the phase. Returns the number of interception attempts.
pub fn run<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> usize {
    let defenders: Vec<String> = state
        .sector
        .ships
        .iter()
        .filter(|s| can_intercept(s))
        .map(|s| s.id.clone())
        .collect();

    let mut attempts = 0;
    for id in defenders {
        let Some(ship) = state.sector.ship(&id) else {
            continue;
        };
        let Some(index) = select_intercept(ship, &state.sector.torpedoes) else {
            continue;
        };
        let chance = point_defense_hit_chance(ship);
        let (name, from) = (ship.name.clone(), ship.position);
        let hit = rng.gen::<f64>() < chance;
        attempts += 1;

        let torpedo = &mut state.sector.torpedoes[index];
        if hit {
            torpedo.destroyed = true;
        }
        let (torpedo_id, to) = (torpedo.id.clone(), torpedo.position);
        state.combat_effects.push(CombatEffect::PointDefense {
            ship_id: id.clone(),
            torpedo_id: torpedo_id.clone(),
            from,
            to,
            hit,
        });
        event(
            state,
            format!(
                "POINT DEFENSE: '{name}' -> '{torpedo_id}' {}",
                if hit { "DESTROYED" } else { "MISSED" }
            ),
        );
        let message = if hit {
            format!("Point defense destroys an incoming torpedo ({:.0}% chance).", chance * 100.0)
        } else {
            format!("Point defense misses an incoming torpedo ({:.0}% chance).", chance * 100.0)
        };
        ship_log(state, &id, LogCategory::Combat, message);
    }
    attempts
}
