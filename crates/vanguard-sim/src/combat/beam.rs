//! Beam weapon resolution.

use rand::Rng;

use vanguard_core::components::{BeamWeapon, Ship};
use vanguard_core::constants::*;
use vanguard_core::enums::{BeamKind, Faction, Subsystem};
use vanguard_core::state::SectorState;
use vanguard_sector::{is_asteroid_field, is_nebula};

use crate::outcome::BeamOutcome;

/// Geometry and terrain of one shot, read before the ships are borrowed
/// mutably.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireSolution {
    pub distance: i32,
    pub target_in_nebula: bool,
    pub target_in_asteroids: bool,
}

impl FireSolution {
    pub fn compute(sector: &SectorState, attacker: &Ship, target: &Ship) -> Self {
        Self {
            distance: attacker.position.distance_to(&target.position),
            target_in_nebula: is_nebula(sector, &target.position),
            target_in_asteroids: is_asteroid_field(sector, &target.position),
        }
    }
}

pub fn beam_hit_chance(attacker: &Ship, beam: &BeamWeapon, target: &Ship, solution: &FireSolution) -> f64 {
    let mut chance = BEAM_BASE_HIT_CHANCE;
    if beam.kind == BeamKind::Disruptor && attacker.faction != Faction::Romulan {
        chance *= DISRUPTOR_ACCURACY;
    }
    if solution.target_in_nebula {
        chance *= NEBULA_TARGET_ACCURACY;
    }
    if solution.target_in_asteroids {
        chance *= ASTEROID_TARGET_ACCURACY;
    }
    if target.evasive {
        chance *= EVASIVE_TARGET_ACCURACY;
    }
    if attacker.evasive {
        chance *= EVASIVE_ATTACKER_ACCURACY;
    }
    chance
}

/// Linear falloff from full damage at range 1 to the floor at max range.
pub fn range_modifier(distance: i32, max_range: i32) -> f64 {
    if max_range <= 1 || distance <= 1 {
        return 1.0;
    }
    (1.0 - (distance - 1) as f64 / (max_range - 1) as f64).max(RANGE_FALLOFF_FLOOR)
}

/// +25% per consecutive turn beyond the first, capped at +100%.
pub fn focus_fire_bonus(consecutive_turns: u32) -> f64 {
    (FOCUS_FIRE_STEP * consecutive_turns.saturating_sub(1) as f64).min(FOCUS_FIRE_CAP)
}

/// 5% at full shields, rising quadratically to 100% with shields gone.
pub fn shield_leak_chance(shield_fraction: f64) -> f64 {
    let missing = (1.0 - shield_fraction).clamp(0.0, 1.0);
    SHIELD_LEAK_FLOOR + missing * missing * SHIELD_LEAK_SCALE
}

/// Output before range falloff: allocation, crew, weapons health and
/// the point-defense trade-off.
pub fn base_beam_damage(attacker: &Ship, beam: &BeamWeapon) -> f64 {
    let mut damage = beam.base_damage
        * (attacker.allocation.weapons() as f64 / 100.0)
        * attacker.energy_modifier
        * attacker.subsystems.fraction(Subsystem::Weapons);
    if attacker.point_defense_enabled {
        damage *= POINT_DEFENSE_BEAM_PENALTY;
    }
    damage
}

/// Damage at `distance` before focus fire.
pub fn beam_damage(attacker: &Ship, beam: &BeamWeapon, distance: i32) -> f64 {
    base_beam_damage(attacker, beam) * range_modifier(distance, attacker.effective_beam_range(beam))
}

/// Resolve one beam shot. Energy has already been paid by the caller.
///
/// Critical hits on locked subsystems only apply when `critical_allowed`,
/// which the engine grants to the player ship alone.
#[allow(clippy::too_many_arguments)]
pub fn fire_beam_weapon<R: Rng + ?Sized>(
    attacker: &mut Ship,
    target: &mut Ship,
    beam: &BeamWeapon,
    subsystem: Option<Subsystem>,
    solution: &FireSolution,
    turn: u32,
    critical_allowed: bool,
    rng: &mut R,
) -> BeamOutcome {
    let consecutive = attacker.targeting.register_fire(&target.id, subsystem, turn);
    let hit_chance = beam_hit_chance(attacker, beam, target, solution);
    let mut damage = beam_damage(attacker, beam, solution.distance);
    if subsystem.is_some() {
        damage *= 1.0 + focus_fire_bonus(consecutive);
    }

    target.transient.last_attacker_id = Some(attacker.id.clone());
    target.transient.last_attacker_position = Some(attacker.position);
    target.transient.last_attacked_turn = Some(turn);

    let mut outcome = BeamOutcome {
        hit_chance,
        damage,
        subsystem,
        ..BeamOutcome::default()
    };

    if rng.gen::<f64>() >= hit_chance {
        outcome.logs.push(format!(
            "{} misses {} ({:.0}% to hit).",
            beam.name,
            target.name,
            hit_chance * 100.0
        ));
        return outcome;
    }
    outcome.hit = true;

    // Leakage bypasses shields; the rest is absorbed up to shield strength.
    let shields_down = target.shield_fraction() <= SHIELDS_DOWN_THRESHOLD;
    let leak_chance = shield_leak_chance(target.shield_fraction());
    let leaked = if rng.gen::<f64>() < leak_chance {
        damage * leak_chance
    } else {
        0.0
    };
    let remainder = damage - leaked;
    let absorbed = target.shields.sub(remainder);
    let breakthrough = remainder - absorbed;
    let penetrating = leaked + breakthrough;
    outcome.leaked = leaked;
    outcome.shield_damage = absorbed;

    let locked = subsystem.filter(|s| !target.subsystems.get(*s).is_empty());
    let (mut subsystem_damage, hull_damage) = match locked {
        Some(_) => {
            let share = if shields_down {
                SUBSYSTEM_DAMAGE_SHARE_SHIELDS_DOWN
            } else {
                SUBSYSTEM_DAMAGE_SHARE
            };
            (penetrating * share, penetrating * (1.0 - share))
        }
        None => (0.0, penetrating),
    };
    if let Some(s) = locked {
        if critical_allowed && consecutive >= CRITICAL_HIT_MIN_TURNS && subsystem_damage > 0.0 {
            subsystem_damage *= CRITICAL_HIT_MULTIPLIER;
            outcome.critical = true;
        }
        outcome.subsystem_damage = target.subsystems.get_mut(s).sub(subsystem_damage);
        outcome.subsystem_destroyed = target.subsystems.get(s).is_empty();
    }
    outcome.hull_damage = target.hull.sub(hull_damage);
    outcome.target_destroyed = target.is_destroyed();

    if target.cloak.state.is_transitioning() {
        target.cloak.add_instability(CLOAK_INSTABILITY_BEAM);
    }

    outcome.logs.push(format!(
        "{} hits {} for {:.1} (shields {:.1}, hull {:.1}{}).",
        beam.name,
        target.name,
        damage,
        outcome.shield_damage,
        outcome.hull_damage,
        match locked {
            Some(s) => format!(", {} {:.1}", s.name(), outcome.subsystem_damage),
            None => String::new(),
        }
    ));
    if leaked > 0.0 {
        outcome.logs.push(format!("Shield leak: {leaked:.1} bypasses the shields."));
    }
    if outcome.critical {
        outcome.logs.push("Critical hit on the locked subsystem!".to_string());
    }
    if outcome.subsystem_destroyed {
        if let Some(s) = locked {
            outcome.logs.push(format!("{}'s {} knocked out.", target.name, s.name()));
        }
    }
    outcome
}
