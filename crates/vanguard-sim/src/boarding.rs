//! Boarding parties and prize-crew restoration of derelicts.

use tracing::info;

use vanguard_core::components::{CaptureInfo, Ship};
use vanguard_core::constants::*;
use vanguard_core::enums::{Stance, Subsystem};
use vanguard_core::state::GameState;

use crate::outcome::ActionOutcome;

/// Send a boarding party from `captor_id` to the derelict `target_id`.
///
/// `turns_to_repair` is 4 for the player and 0 for opportunistic AI
/// captures, which then complete at the end of the same turn.
pub fn begin_boarding(
    state: &mut GameState,
    captor_id: &str,
    target_id: &str,
    turns_to_repair: u32,
) -> ActionOutcome {
    let turn = state.turn;
    let Some((captor, target)) = state.sector.pair_mut(captor_id, target_id) else {
        return ActionOutcome::failed("Boarding target not found.");
    };
    if !captor.can_act() {
        return ActionOutcome::failed("Ship cannot launch a boarding party.");
    }
    if !target.derelict || target.is_destroyed() {
        return ActionOutcome::failed(format!("{} is not a derelict.", target.name));
    }
    if target.capture_info.is_some() {
        return ActionOutcome::failed(format!("{} is already being boarded.", target.name));
    }
    if captor.position.distance_to(&target.position) > 1 {
        return ActionOutcome::failed(format!("{} is out of transporter range.", target.name));
    }
    if captor.security_teams.current < 1.0 {
        return ActionOutcome::failed("No security teams available.");
    }
    if captor.subsystems.transporter.is_empty() || captor.cloak.state.is_concealed() {
        return ActionOutcome::failed("Transporters are offline.");
    }

    captor.security_teams.sub(1.0);
    let dilithium_carried = captor.dilithium.sub(BOARDING_PARTY_DILITHIUM);
    target.capture_info = Some(CaptureInfo {
        captor_id: captor.id.clone(),
        captor_faction: captor.faction,
        captor_allegiance: captor.allegiance,
        captor_log_color: captor.log_color.clone(),
        repair_start_turn: turn,
        turns_to_repair,
        dilithium_carried,
    });
    info!(turn, captor = %captor.id, target = %target.id, "boarding party away");
    ActionOutcome::ok(format!(
        "Boarding party beams aboard {}. Restoration in {} turn(s).",
        target.name, turns_to_repair
    ))
}

/// Advance a prize crew's work. Returns a message when the ship changes
/// hands this turn.
pub fn process_capture(ship: &mut Ship, turn: u32) -> Option<String> {
    let info = ship.capture_info.as_ref()?;
    if turn.saturating_sub(info.repair_start_turn) < info.turns_to_repair {
        return None;
    }
    let info = ship.capture_info.take()?;

    ship.hull.raise_to_fraction(CAPTURE_RESTORE_FRACTION);
    for s in Subsystem::ALL {
        ship.subsystems.get_mut(s).raise_to_fraction(CAPTURE_RESTORE_FRACTION);
    }
    ship.energy.raise_to_fraction(CAPTURE_RESTORE_FRACTION);
    ship.life_support_reserves.set(ship.life_support_reserves.max);
    ship.dilithium.add(info.dilithium_carried);

    ship.faction = info.captor_faction;
    ship.allegiance = info.captor_allegiance;
    ship.log_color = info.captor_log_color;
    ship.derelict = false;
    ship.life_support_failure_turns = None;
    ship.stance = Stance::default();
    ship.targeting.clear();
    ship.transient = Default::default();

    info!(turn, ship = %ship.id, captor = %info.captor_id, "derelict captured");
    Some(format!("{} restored to service under new colours.", ship.name))
}
