//! Reactor, dilithium, shields, repairs and life support.
//!
//! All functions act on a single ship. The end-of-turn system calls them in
//! a fixed order and turns their outcomes into log entries.

use rand::Rng;

use vanguard_core::components::Ship;
use vanguard_core::constants::*;
use vanguard_core::enums::{RepairTarget, Subsystem};

use crate::outcome::EnergyOutcome;

/// Draw `amount` from the ship's reactor. Nothing is drawn on failure.
pub fn consume_energy(ship: &mut Ship, amount: f64, purpose: &str) -> EnergyOutcome {
    if ship.energy.current + 1e-9 < amount {
        return EnergyOutcome::failed(format!(
            "Insufficient energy for {purpose} ({:.0} needed, {:.0} available).",
            amount, ship.energy.current
        ));
    }
    ship.energy.sub(amount);
    EnergyOutcome::silent_ok()
}

/// Engine output multiplier: 0.5 at no engine power, 2.0 at full.
pub fn engine_output_multiplier(ship: &Ship) -> f64 {
    0.5 + 1.5 * ship.allocation.engines() as f64 / 100.0
}

/// Reactor output for one turn.
pub fn energy_generation(ship: &Ship) -> f64 {
    ENERGY_BASE_GENERATION * engine_output_multiplier(ship) * ship.subsystems.fraction(Subsystem::Engines)
}

/// Fixed draw, per-subsystem draw and the situational surcharges.
pub fn energy_consumption(ship: &Ship) -> f64 {
    let mut total = ENERGY_BASE_CONSUMPTION
        + ENERGY_PER_SUBSYSTEM * ship.subsystems.operational_count() as f64;
    if ship.red_alert && !ship.shields.is_empty() {
        total += ENERGY_SHIELDS_ACTIVE_COST;
    }
    if ship.evasive {
        total += ENERGY_EVASIVE_COST;
    }
    if ship.point_defense_enabled {
        total += ENERGY_POINT_DEFENSE_COST;
    }
    if ship.repair_target.is_some() {
        total += ENERGY_REPAIR_COST;
    }
    if ship.cloak.state.is_concealed() {
        total += ENERGY_CLOAK_COST;
    }
    total
}

/// Energy restored by one dilithium crystal.
///
/// Scales linearly with engine health from 5% of max energy to 100%.
pub fn dilithium_recharge_per_crystal(ship: &Ship) -> f64 {
    let engine_health = ship.subsystems.fraction(Subsystem::Engines);
    ship.energy.max * (DILITHIUM_MIN_RECHARGE + (1.0 - DILITHIUM_MIN_RECHARGE) * engine_health)
}

/// Result of the end-of-turn reactor cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactorReport {
    pub generated: f64,
    pub consumed: f64,
    pub crystals_used: u32,
    pub incidental_damage: Option<(Subsystem, f64)>,
    /// Energy stayed negative with no dilithium left.
    pub starved: bool,
    pub outcome: EnergyOutcome,
}

/// Apply generation and consumption, burning dilithium to cover a deficit.
///
/// Each crystal adds 25% to the chance that the emergency recharge damages
/// a random undamaged subsystem for 5-10 points per crystal used.
pub fn process_energy<R: Rng + ?Sized>(ship: &mut Ship, rng: &mut R) -> ReactorReport {
    let generated = energy_generation(ship);
    let consumed = energy_consumption(ship);
    let mut projected = ship.energy.current + generated - consumed;
    let mut report = ReactorReport {
        generated,
        consumed,
        outcome: EnergyOutcome::silent_ok(),
        ..ReactorReport::default()
    };

    if projected < 0.0 {
        let per_crystal = dilithium_recharge_per_crystal(ship);
        while projected < 0.0 && ship.dilithium.current >= 1.0 {
            ship.dilithium.sub(1.0);
            projected += per_crystal;
            report.crystals_used += 1;
        }
        if report.crystals_used > 0 {
            let n = report.crystals_used as f64;
            report.outcome.logs.push(format!(
                "Emergency power: {} dilithium crystal(s) burned, {:.0} energy restored.",
                report.crystals_used,
                per_crystal * n
            ));
            let chance = (DILITHIUM_DAMAGE_CHANCE_PER_CRYSTAL * n).min(1.0);
            if rng.gen::<f64>() < chance {
                report.incidental_damage = incidental_damage(ship, n, rng);
                if let Some((subsystem, amount)) = report.incidental_damage {
                    report.outcome.logs.push(format!(
                        "Power surge damages {} ({:.0}).",
                        subsystem.name(),
                        amount
                    ));
                }
            }
        }
        if projected < 0.0 {
            report.starved = true;
            report.outcome.success = false;
            report
                .outcome
                .logs
                .push("Reactor exhausted and no dilithium remains.".to_string());
        }
    }

    ship.energy.set(projected);
    report
}

fn incidental_damage<R: Rng + ?Sized>(ship: &mut Ship, crystals: f64, rng: &mut R) -> Option<(Subsystem, f64)> {
    let undamaged: Vec<Subsystem> = ship
        .subsystems
        .iter()
        .filter(|(_, g)| g.is_full() && !g.is_empty())
        .map(|(s, _)| s)
        .collect();
    if undamaged.is_empty() {
        return None;
    }
    let subsystem = undamaged[rng.gen_range(0..undamaged.len())];
    let amount = rng.gen_range(DILITHIUM_DAMAGE_MIN..=DILITHIUM_DAMAGE_MAX) * crystals;
    let dealt = ship.subsystems.get_mut(subsystem).sub(amount);
    Some((subsystem, dealt))
}

/// Shield regeneration, red alert only.
///
/// A 33% shield allocation is the 1.0x baseline. Shields stay down while
/// the cloak is up or after a cloak failure.
pub fn regenerate_shields(ship: &mut Ship) -> f64 {
    if !ship.red_alert
        || ship.cloak.state.is_concealed()
        || ship.cloak.shield_reactivation_delay > 0
    {
        return 0.0;
    }
    let allocation = ship.allocation.shields() as f64 / SHIELD_REGEN_BASELINE_ALLOCATION;
    let amount = ship.shields.max
        * SHIELD_REGEN_FRACTION
        * allocation
        * ship.subsystems.fraction(Subsystem::Shields);
    ship.shields.add(amount)
}

/// Work the current repair order. The order clears once its gauge is full.
pub fn apply_repairs(ship: &mut Ship) -> Option<String> {
    let target = ship.repair_target?;
    let message = match target {
        RepairTarget::Hull => {
            let restored = ship.hull.add(ship.hull.max * REPAIR_HULL_FRACTION);
            if ship.hull.is_full() {
                ship.repair_target = None;
            }
            format!("Damage control restores {restored:.0} hull.")
        }
        RepairTarget::Subsystem(subsystem) => {
            let gauge = ship.subsystems.get_mut(subsystem);
            let restored = gauge.add(gauge.max * REPAIR_SUBSYSTEM_FRACTION);
            let done = gauge.is_full();
            if done {
                ship.repair_target = None;
            }
            format!("Damage control restores {restored:.0} to {}.", subsystem.name())
        }
    };
    Some(message)
}

/// Drain life-support reserves while the subsystem is down.
/// Returns true when the reserves are exhausted.
pub fn drain_life_support_reserves(ship: &mut Ship) -> bool {
    if ship.subsystems.life_support.is_empty() {
        ship.life_support_reserves.sub(LIFE_SUPPORT_RESERVE_DRAIN);
    }
    ship.life_support_reserves.is_empty()
}

/// Advance or reset the failure countdown. Returns true when the ship
/// has just been abandoned.
pub fn advance_life_support(ship: &mut Ship, failing: bool) -> bool {
    if !failing {
        ship.life_support_failure_turns = None;
        return false;
    }
    let elapsed = ship.life_support_failure_turns.map_or(1, |t| t + 1);
    ship.life_support_failure_turns = Some(elapsed);
    if elapsed >= LIFE_SUPPORT_FAILURE_TURNS {
        make_derelict(ship);
        return true;
    }
    false
}

/// Crew abandons ship: hull floored to 10%, shields and subsystems zeroed.
pub fn make_derelict(ship: &mut Ship) {
    let ceiling = ship.hull.max * DERELICT_HULL_FRACTION;
    if ship.hull.current > ceiling {
        ship.hull.set(ceiling);
    }
    ship.shields.set(0.0);
    ship.subsystems.zero_all();
    ship.derelict = true;
    ship.life_support_failure_turns = None;
    ship.red_alert = false;
    ship.evasive = false;
    ship.point_defense_enabled = false;
    ship.repair_target = None;
    ship.retreat_countdown = None;
    ship.targeting.clear();
}

/// Starbase resupply for a docked ship.
pub fn resupply(ship: &mut Ship) {
    ship.energy.set(ship.energy.max);
    ship.torpedoes.set(ship.torpedoes.max);
    ship.dilithium.set(ship.dilithium.max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use vanguard_core::components::EnergyAllocation;
    use vanguard_core::enums::{Allegiance, Faction};
    use vanguard_core::types::Position;

    fn ship() -> Ship {
        Ship::new("s", "Test", Faction::Federation, Allegiance::Player, Position::new(0, 0))
    }

    #[test]
    fn test_consume_energy_insufficient_is_noop() {
        let mut s = ship();
        s.energy.set(4.0);
        let outcome = consume_energy(&mut s, 10.0, "phaser");
        assert!(!outcome.success);
        assert_eq!(outcome.logs.len(), 1);
        assert_eq!(s.energy.current, 4.0);
    }

    #[test]
    fn test_generation_scales_with_engines() {
        let mut s = ship();
        s.allocation = EnergyAllocation::FULL_ENGINES;
        assert!((energy_generation(&s) - 50.0).abs() < 1e-9);
        s.subsystems.engines.set(10.0);
        assert!((energy_generation(&s) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_consumption_surcharges() {
        let mut s = ship();
        let base = energy_consumption(&s);
        assert_eq!(base, ENERGY_BASE_CONSUMPTION + 8.0 * ENERGY_PER_SUBSYSTEM);
        s.evasive = true;
        s.point_defense_enabled = true;
        assert_eq!(
            energy_consumption(&s),
            base + ENERGY_EVASIVE_COST + ENERGY_POINT_DEFENSE_COST
        );
    }

    #[test]
    fn test_starved_without_dilithium() {
        let mut s = ship();
        s.energy.set(0.0);
        s.dilithium.set(0.0);
        s.subsystems.engines.set(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = process_energy(&mut s, &mut rng);
        assert!(report.starved);
        assert!(!report.outcome.success);
        assert_eq!(s.energy.current, 0.0);
    }

    #[test]
    fn test_repairs_clear_when_full() {
        let mut s = ship();
        s.subsystems.weapons.set(19.0);
        s.repair_target = Some(RepairTarget::Subsystem(Subsystem::Weapons));
        assert!(apply_repairs(&mut s).is_some());
        assert!(s.subsystems.weapons.is_full());
        assert!(s.repair_target.is_none());
    }

    #[test]
    fn test_shield_regen_needs_red_alert() {
        let mut s = ship();
        s.shields.set(0.0);
        assert_eq!(regenerate_shields(&mut s), 0.0);
        s.red_alert = true;
        s.allocation = EnergyAllocation::new(34, 33, 33).unwrap();
        assert!((regenerate_shields(&mut s) - 5.0).abs() < 1e-9);
    }
}
