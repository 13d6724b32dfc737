//! Last-resort moves chosen by the faction AI.

use vanguard_ai::DesperationMove;
use vanguard_core::components::{EnergyAllocation, Ship};
use vanguard_core::constants::*;
use vanguard_core::events::CombatEffect;
use vanguard_core::state::GameState;

use crate::outcome::ActionOutcome;

/// Ram damage to `target`. A healthy shield soaks up to half the impact.
pub fn ram_damage(rammer: &Ship, target: &mut Ship) -> (f64, f64) {
    let impact = rammer.hull.max * RAM_DAMAGE_FRACTION;
    let shield_share = 0.5 * target.shield_fraction();
    let shield_damage = target.shields.sub(impact * shield_share);
    let hull_damage = target.hull.sub(impact - shield_damage);
    (shield_damage, hull_damage)
}

/// Splash from an exploding ship, absorbed by shields first.
pub fn splash_damage(ship: &mut Ship, amount: f64) -> f64 {
    let absorbed = ship.shields.sub(amount);
    ship.hull.sub(amount - absorbed)
}

/// Apply a desperation move for `ship_id`.
pub fn apply_desperation(state: &mut GameState, ship_id: &str, mv: &DesperationMove) -> ActionOutcome {
    let Some(position) = state.sector.ship(ship_id).map(|s| s.position) else {
        return ActionOutcome::failed("Ship no longer in the sector.");
    };
    match mv {
        DesperationMove::Ram { target_id } => {
            let Some((rammer, target)) = state.sector.pair_mut(ship_id, target_id) else {
                return ActionOutcome::failed("Ramming target lost.");
            };
            let (shield_damage, hull_damage) = ram_damage(rammer, target);
            rammer.hull.set(0.0);
            let message = format!(
                "{} rams {}! Shields -{:.0}, hull -{:.0}. {} is destroyed in the collision.",
                rammer.name, target.name, shield_damage, hull_damage, rammer.name
            );
            let effect = CombatEffect::Ram {
                rammer_id: rammer.id.clone(),
                target_id: target.id.clone(),
                position: target.position,
            };
            state.combat_effects.push(effect);
            ActionOutcome::ok(message)
        }
        DesperationMove::SelfDestruct => {
            let mut outcome = ActionOutcome::ok("Self-destruct sequence complete.");
            for other in state.sector.ships.iter_mut() {
                if other.id == ship_id {
                    other.hull.set(0.0);
                    continue;
                }
                if other.is_destroyed() || other.position.distance_to(&position) > 1 {
                    continue;
                }
                let dealt = splash_damage(other, SELF_DESTRUCT_DAMAGE);
                outcome
                    .logs
                    .push(format!("{} caught in the blast (hull -{dealt:.0}).", other.name));
            }
            state.combat_effects.push(CombatEffect::Explosion {
                ship_id: ship_id.to_string(),
                position,
            });
            outcome
        }
        DesperationMove::Escape { succeeded: true } => {
            state.sector.mark_departed(ship_id);
            ActionOutcome::ok("Goes to warp and escapes the sector.")
        }
        DesperationMove::Escape { succeeded: false } => {
            if let Some(ship) = state.sector.ship_mut(ship_id) {
                ship.hull.set(0.0);
            }
            state.combat_effects.push(CombatEffect::Explosion {
                ship_id: ship_id.to_string(),
                position,
            });
            ActionOutcome::failed("Escape attempt fails: warp core breach!")
        }
        DesperationMove::Retreat => match state.sector.ship_mut(ship_id) {
            Some(ship) if ship.retreat_countdown.is_none() => {
                ship.retreat_countdown = Some(RETREAT_TURNS);
                ship.allocation = EnergyAllocation::FULL_ENGINES;
                ActionOutcome::ok(format!("Breaking off, retreating in {RETREAT_TURNS} turns."))
            }
            _ => ActionOutcome::failed("Already retreating."),
        },
    }
}
