//! Combat resolution.
//!
//! The resolvers in the submodules work on borrowed ships and return
//! outcome values. `resolve_fire_order` is the shared entry point for
//! player and AI fire: it validates the order, pays the energy, resolves
//! the shot and records logs, effects and trace events.

pub mod beam;
pub mod desperation;
pub mod mines;
pub mod torpedo;

use rand::Rng;
use tracing::info;

use vanguard_core::commands::FireOrder;
use vanguard_core::components::Weapon;
use vanguard_core::constants::{BEAM_ENERGY_COST, TORPEDO_ENERGY_COST};
use vanguard_core::enums::LogCategory;
use vanguard_core::events::CombatEffect;
use vanguard_core::state::GameState;
use vanguard_sector::holds_lock;

use crate::energy::consume_energy;
use crate::log::{event, ship_log, ship_logs};
use crate::outcome::ActionOutcome;

use beam::{fire_beam_weapon, FireSolution};
use torpedo::build_projectile;

/// Validate and resolve one fire order. Failures log why and change nothing.
pub fn resolve_fire_order<R: Rng + ?Sized>(
    state: &mut GameState,
    shooter_id: &str,
    order: &FireOrder,
    rng: &mut R,
) -> ActionOutcome {
    let outcome = match check_fire_order(state, shooter_id, order) {
        Ok((weapon, solution)) => match weapon {
            Weapon::Beam(beam) => fire_beam(state, shooter_id, order, &beam, &solution, rng),
            Weapon::Torpedo(launcher) => launch_torpedo(state, shooter_id, order, &launcher),
        },
        Err(reason) => ActionOutcome::failed(reason),
    };
    if !outcome.success {
        ship_logs(state, shooter_id, LogCategory::Targeting, outcome.logs.clone());
    }
    outcome
}

fn check_fire_order(
    state: &GameState,
    shooter_id: &str,
    order: &FireOrder,
) -> Result<(Weapon, FireSolution), String> {
    let sector = &state.sector;
    let shooter = sector.ship(shooter_id).ok_or("Shooter not in sector.")?;
    if !shooter.weapons_online() {
        return Err("Weapons are offline.".to_string());
    }
    let weapon = shooter
        .weapon(&order.weapon_id)
        .ok_or_else(|| format!("No weapon '{}' aboard.", order.weapon_id))?;
    let target = sector
        .ship(&order.target_id)
        .filter(|t| !t.is_destroyed() && t.id != shooter.id)
        .ok_or_else(|| format!("Target '{}' not found.", order.target_id))?;
    if !holds_lock(shooter, target, sector, state.turn) {
        return Err(format!("No sensor lock on {}.", target.name));
    }
    let solution = FireSolution::compute(sector, shooter, target);
    if let Weapon::Beam(b) = weapon {
        let range = shooter.effective_beam_range(b);
        if solution.distance > range {
            return Err(format!(
                "{} out of range for {} ({} > {}).",
                target.name, b.name, solution.distance, range
            ));
        }
    }
    Ok((weapon.clone(), solution))
}

fn fire_beam<R: Rng + ?Sized>(
    state: &mut GameState,
    shooter_id: &str,
    order: &FireOrder,
    beam: &vanguard_core::components::BeamWeapon,
    solution: &FireSolution,
    rng: &mut R,
) -> ActionOutcome {
    let turn = state.turn;
    let critical_allowed = shooter_id == state.player.ship_id;
    let Some((shooter, target)) = state.sector.pair_mut(shooter_id, &order.target_id) else {
        return ActionOutcome::failed("Target lost.");
    };
    let paid = consume_energy(shooter, BEAM_ENERGY_COST, &beam.name);
    if !paid.success {
        return paid;
    }
    let result = fire_beam_weapon(
        shooter,
        target,
        beam,
        order.subsystem,
        solution,
        turn,
        critical_allowed,
        rng,
    );
    let effect = CombatEffect::Beam {
        source_id: shooter.id.clone(),
        target_id: target.id.clone(),
        from: shooter.position,
        to: target.position,
        kind: beam.kind,
        hit: result.hit,
    };
    let line = format!(
        "FIRE {}: '{}' -> '{}' {} dmg={:.1} hull={:.1}",
        format!("{:?}", beam.kind).to_uppercase(),
        shooter.name,
        target.name,
        if result.hit { "HIT" } else { "MISS" },
        result.damage,
        result.hull_damage
    );
    state.combat_effects.push(effect);
    event(state, line);
    ship_logs(state, shooter_id, LogCategory::Combat, result.logs.clone());
    if result.target_destroyed {
        report_destroyed(state, &order.target_id);
    }
    ActionOutcome {
        success: true,
        logs: result.logs,
    }
}

fn launch_torpedo(
    state: &mut GameState,
    shooter_id: &str,
    order: &FireOrder,
    launcher: &vanguard_core::components::TorpedoLauncher,
) -> ActionOutcome {
    let id = state.sector.next_id("torpedo");
    let Some(shooter) = state.sector.ship_mut(shooter_id) else {
        return ActionOutcome::failed("Shooter not in sector.");
    };
    if shooter.torpedoes.current < 1.0 {
        return ActionOutcome::failed("No torpedoes remaining.");
    }
    let paid = consume_energy(shooter, TORPEDO_ENERGY_COST, &launcher.name);
    if !paid.success {
        return paid;
    }
    shooter.torpedoes.sub(1.0);
    let projectile = build_projectile(id.clone(), shooter, launcher, &order.target_id);
    let line = format!(
        "LAUNCH {}: '{}' -> '{}' from ({},{})",
        launcher.torpedo_type.name().to_uppercase(),
        shooter.name,
        order.target_id,
        shooter.position.x,
        shooter.position.y
    );
    let message = format!("{} launched at {}.", launcher.name, order.target_id);
    state.combat_effects.push(CombatEffect::TorpedoLaunch {
        torpedo_id: id,
        source_id: shooter_id.to_string(),
        position: projectile.position,
    });
    state.sector.torpedoes.push(projectile);
    event(state, line);
    ship_log(state, shooter_id, LogCategory::Combat, message.clone());
    ActionOutcome::ok(message)
}

/// Log a ship's destruction. Removal happens during cleanup.
pub fn report_destroyed(state: &mut GameState, ship_id: &str) {
    let Some(ship) = state.sector.ship(ship_id) else {
        return;
    };
    let (name, position) = (ship.name.clone(), ship.position);
    info!(turn = state.turn, ship = %ship_id, "ship destroyed");
    state.combat_effects.push(CombatEffect::Explosion {
        ship_id: ship_id.to_string(),
        position,
    });
    event(state, format!("DESTROYED: '{name}' at ({},{})", position.x, position.y));
    ship_log(state, ship_id, LogCategory::Combat, format!("{name} has been destroyed!"));
}
