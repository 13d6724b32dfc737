//! Torpedo launch and impact.

use rand::Rng;

use vanguard_core::components::{Ship, StatusEffect, TorpedoLauncher, TorpedoProjectile};
use vanguard_core::constants::*;
use vanguard_core::enums::TorpedoType;
use vanguard_core::types::EntityId;

use crate::outcome::TorpedoOutcome;

/// Step table by launch-to-impact range plus the type modifier.
/// Anything beyond range 4 never hits.
pub fn torpedo_hit_chance(range: i32, torpedo_type: TorpedoType) -> f64 {
    let range = range.max(1) as usize;
    match TORPEDO_HIT_BY_RANGE.get(range - 1) {
        Some(base) => (base + torpedo_type.accuracy_modifier()).clamp(0.0, 1.0),
        None => 0.0,
    }
}

/// A projectile leaving `shooter`'s cell.
pub fn build_projectile(id: EntityId, shooter: &Ship, launcher: &TorpedoLauncher, target_id: &str) -> TorpedoProjectile {
    TorpedoProjectile {
        id,
        source_id: shooter.id.clone(),
        source_name: shooter.name.clone(),
        target_id: target_id.to_string(),
        allegiance: shooter.allegiance,
        faction: shooter.faction,
        position: shooter.position,
        path: vec![shooter.position],
        speed: launcher.speed,
        torpedo_type: launcher.torpedo_type,
        damage: launcher.damage,
        special: launcher.special,
        destroyed: false,
    }
}

/// Resolve a torpedo reaching its target.
///
/// Quantum warheads put a quarter of their yield straight onto the hull.
/// Shields soak the rest at four damage per point. Hull damage is rounded.
pub fn apply_torpedo_damage<R: Rng + ?Sized>(
    torpedo: &TorpedoProjectile,
    target: &mut Ship,
    turn: u32,
    rng: &mut R,
) -> TorpedoOutcome {
    let range = torpedo.launch_position().distance_to(&target.position);
    let hit_chance = torpedo_hit_chance(range, torpedo.torpedo_type);

    target.transient.last_attacker_id = Some(torpedo.source_id.clone());
    target.transient.last_attacker_position = Some(torpedo.launch_position());
    target.transient.last_attacked_turn = Some(turn);

    let mut outcome = TorpedoOutcome {
        hit_chance,
        range,
        ..TorpedoOutcome::default()
    };
    let name = torpedo.torpedo_type.name();
    if rng.gen::<f64>() >= hit_chance {
        outcome.logs.push(format!(
            "The {name} misses {} (range {range}, {:.0}% to hit).",
            target.name,
            hit_chance * 100.0
        ));
        return outcome;
    }
    outcome.hit = true;

    let bypass = if torpedo.torpedo_type == TorpedoType::Quantum {
        torpedo.damage * QUANTUM_BYPASS_FRACTION
    } else {
        0.0
    };
    let remaining = torpedo.damage - bypass;
    let absorbable = target.shields.current * TORPEDO_SHIELD_RATIO;
    let absorbed = remaining.min(absorbable);
    outcome.shield_damage = target.shields.sub(absorbed / TORPEDO_SHIELD_RATIO);
    outcome.bypass_damage = bypass;
    let hull_damage = (bypass + remaining - absorbed).round();
    outcome.hull_damage = target.hull.sub(hull_damage);

    if let Some(burn) = torpedo.special {
        target.status_effects.push(StatusEffect::PlasmaBurn {
            damage: burn.damage,
            turns_remaining: burn.turns,
        });
        outcome.plasma_burn = true;
    }
    if target.cloak.state.is_transitioning() {
        target.cloak.add_instability(CLOAK_INSTABILITY_TORPEDO);
    }
    outcome.target_destroyed = target.is_destroyed();

    outcome.logs.push(format!(
        "The {name} strikes {} (shields -{:.1}, hull -{:.0}).",
        target.name, outcome.shield_damage, outcome.hull_damage
    ));
    if outcome.plasma_burn {
        outcome.logs.push(format!("{} is burning with plasma fire.", target.name));
    }
    outcome
}
