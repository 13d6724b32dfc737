//! The per-faction strategy interface and the behaviour most factions share.

use rand::{Rng, RngCore};
use tracing::debug;
use vanguard_core::commands::FireOrder;
use vanguard_core::components::Ship;
use vanguard_core::constants::{
    DESPERATION_HULL_THRESHOLD, DESPERATION_RANGE, SHIELDS_DOWN_THRESHOLD,
    TORPEDO_MAX_LAUNCH_RANGE,
};
use vanguard_core::enums::{Stance, Subsystem};
use vanguard_core::types::Position;

use crate::context::AiContext;
use crate::doctrine::{
    allocation_for, torpedo_launch_chance, DesperationKind, DoctrineProfile,
    TORPEDO_SHIELDS_DOWN_BONUS,
};
use crate::pathfinding::{best_move, is_passable};
use crate::plan::{CloakCommand, DesperationMove, TurnPlan};

/// Decision logic for one faction.
///
/// `process_turn` runs desperation first, then the torpedo-threat reaction,
/// then the main turn. A reaction that consumes the turn stops there.
pub trait FactionStrategy {
    fn doctrine(&self) -> DoctrineProfile;

    fn determine_stance(&self, ctx: &AiContext, target: Option<&Ship>) -> Stance {
        standard_stance(ctx, target)
    }

    fn determine_subsystem_target(&self, ctx: &AiContext, target: &Ship) -> Option<Subsystem>;

    /// React to inbound torpedoes. Returns true when the turn is spent.
    fn handle_torpedo_threat(
        &self,
        ctx: &AiContext,
        plan: &mut TurnPlan,
        _rng: &mut dyn RngCore,
    ) -> bool {
        enable_point_defense(ctx, plan);
        false
    }

    fn execute_main_turn_logic(&self, ctx: &AiContext, plan: &mut TurnPlan, rng: &mut dyn RngCore) {
        standard_main_turn(self, ctx, plan, rng);
    }

    fn process_desperation_move(
        &self,
        ctx: &AiContext,
        rng: &mut dyn RngCore,
    ) -> Option<DesperationMove> {
        standard_desperation(&self.doctrine(), ctx, rng)
    }

    fn process_turn(&self, ctx: &AiContext, rng: &mut dyn RngCore) -> TurnPlan {
        let mut plan = TurnPlan::new(&ctx.ship.id);
        if let Some(mv) = self.process_desperation_move(ctx, rng) {
            debug!(ship = %ctx.ship.id, ?mv, "desperation move");
            plan.desperation = Some(mv);
            return plan;
        }
        if self.handle_torpedo_threat(ctx, &mut plan, rng) {
            plan.consumed_turn = true;
            return plan;
        }
        self.execute_main_turn_logic(ctx, &mut plan, rng);
        plan
    }
}

/// Default stance rules.
///
/// Heavy hull damage forces Defensive. With nothing to shoot at, a damaged
/// ship recovers and an undamaged one hunts its last lost contact.
pub fn standard_stance(ctx: &AiContext, target: Option<&Ship>) -> Stance {
    let ship = ctx.ship;
    if ship.hull_fraction() < 0.25 || ship.retreat_countdown.is_some() {
        return Stance::Defensive;
    }
    let Some(target) = target else {
        return idle_stance(ship);
    };
    let target_vulnerable =
        target.shield_fraction() <= SHIELDS_DOWN_THRESHOLD || target.hull_fraction() < 0.5;
    if target_vulnerable && ship.hull_fraction() > 0.5 {
        Stance::Aggressive
    } else if ship.shield_fraction() < 0.3 {
        Stance::Defensive
    } else {
        Stance::Balanced
    }
}

/// Stance with no visible target.
pub fn idle_stance(ship: &Ship) -> Stance {
    if ship.is_damaged() {
        Stance::Recovery
    } else if !ship.transient.hidden_enemies.is_empty() {
        Stance::Seeking
    } else {
        Stance::Balanced
    }
}

/// Enable point defense while torpedoes are inbound, disable it otherwise.
pub fn enable_point_defense(ctx: &AiContext, plan: &mut TurnPlan) {
    let wanted = !ctx.incoming_torpedoes.is_empty() && !ctx.ship.subsystems.point_defense.is_empty();
    if wanted != ctx.ship.point_defense_enabled {
        plan.point_defense = Some(wanted);
    }
}

/// The first subsystem in `order` the target still has running.
pub fn first_operational(target: &Ship, order: &[Subsystem]) -> Option<Subsystem> {
    order
        .iter()
        .copied()
        .find(|s| !target.subsystems.get(*s).is_empty())
}

/// Shared main-turn behaviour: stance, power, repairs, movement, fire,
/// cloak discipline and opportunistic capture.
pub fn standard_main_turn<S: FactionStrategy + ?Sized>(
    strategy: &S,
    ctx: &AiContext,
    plan: &mut TurnPlan,
    rng: &mut dyn RngCore,
) {
    let ship = ctx.ship;
    let doctrine = strategy.doctrine();
    let target = ctx.primary_target();
    let stance = strategy.determine_stance(ctx, target);
    plan.stance = Some(stance);

    let allocation = allocation_for(stance);
    if allocation != ship.allocation {
        plan.allocation = Some(allocation);
    }
    plan.evasive = Some(stance == Stance::Defensive);
    if matches!(stance, Stance::Recovery | Stance::Defensive) && ship.repair_target.is_none() {
        plan.repair_target = ship.most_urgent_repair();
    }

    // A boarding opportunity pins the ship in place.
    if doctrine.captures_derelicts {
        plan.capture = find_capture(ctx, ship.position);
    }
    if plan.capture.is_none() {
        plan.movement = plan_movement(ctx, stance, target);
    }
    let from = plan.movement.unwrap_or(ship.position);

    if let Some(target) = target {
        plan_fire(strategy, ctx, plan, stance, target, from, rng);
    }

    if doctrine.uses_cloak && ship.cloak.equipped {
        plan.cloak = cloak_discipline(ctx, stance, target, from);
    }

    debug!(
        ship = %ship.id,
        ?stance,
        target = target.map(|t| t.id.as_str()).unwrap_or("-"),
        beams = plan.beams.len(),
        torpedo = plan.torpedo.is_some(),
        "ai plan"
    );
}

fn plan_movement(ctx: &AiContext, stance: Stance, target: Option<&Ship>) -> Option<Position> {
    let ship = ctx.ship;
    if ship.docked_with.is_some() || ship.subsystems.engines.is_empty() {
        return None;
    }
    if stance == Stance::Seeking {
        let contact = ship
            .transient
            .hidden_enemies
            .iter()
            .max_by_key(|c| c.turn_lost)?;
        let step = ship.position.step_toward(&contact.last_known);
        return (step != ship.position && is_passable(ship, ctx.sector, &step)).then_some(step);
    }
    best_move(ctx, stance, target)
}

fn plan_fire<S: FactionStrategy + ?Sized>(
    strategy: &S,
    ctx: &AiContext,
    plan: &mut TurnPlan,
    stance: Stance,
    target: &Ship,
    from: Position,
    rng: &mut dyn RngCore,
) {
    let ship = ctx.ship;
    if !ship.weapons_online() {
        return;
    }
    let distance = from.distance_to(&target.position);
    let subsystem = strategy.determine_subsystem_target(ctx, target);

    for beam in ship.beam_weapons() {
        if distance <= ship.effective_beam_range(beam) {
            plan.beams.push(FireOrder {
                weapon_id: beam.id.clone(),
                target_id: target.id.clone(),
                subsystem,
            });
        }
    }

    if ship.torpedoes.is_empty() || distance > TORPEDO_MAX_LAUNCH_RANGE {
        return;
    }
    let Some(launcher) = ship.torpedo_launchers().next() else {
        return;
    };
    let mut chance = torpedo_launch_chance(stance);
    if target.shield_fraction() <= SHIELDS_DOWN_THRESHOLD {
        chance += TORPEDO_SHIELDS_DOWN_BONUS;
    }
    if chance > 0.0 && rng.gen::<f64>() < chance {
        plan.torpedo = Some(FireOrder {
            weapon_id: launcher.id.clone(),
            target_id: target.id.clone(),
            subsystem: None,
        });
    }
}

/// Cloak when nothing is in reach, decloak once the prey is close enough
/// that the two-turn transition ends inside beam range.
fn cloak_discipline(
    ctx: &AiContext,
    stance: Stance,
    target: Option<&Ship>,
    from: Position,
) -> CloakCommand {
    use vanguard_core::enums::CloakState;

    let ship = ctx.ship;
    let reach = ship.max_beam_range();
    match ship.cloak.state {
        CloakState::Visible => {
            let out_of_reach = target.map_or(true, |t| from.distance_to(&t.position) > reach + 1);
            if ship.cloak.can_engage() && out_of_reach && stance != Stance::Recovery {
                CloakCommand::Engage
            } else {
                CloakCommand::Hold
            }
        }
        CloakState::Cloaked => match target {
            Some(t) if from.distance_to(&t.position) <= reach + 2 => CloakCommand::Disengage,
            _ => CloakCommand::Hold,
        },
        CloakState::Cloaking | CloakState::Decloaking => CloakCommand::Hold,
    }
}

/// An adjacent derelict of another allegiance nobody is already boarding.
fn find_capture(ctx: &AiContext, from: Position) -> Option<vanguard_core::types::EntityId> {
    let ship = ctx.ship;
    if ship.security_teams.is_empty() || ship.subsystems.transporter.is_empty() {
        return None;
    }
    ctx.sector
        .ships
        .iter()
        .find(|s| {
            s.derelict
                && !s.is_destroyed()
                && s.capture_info.is_none()
                && s.allegiance != ship.allegiance
                && from.distance_to(&s.position) <= 1
        })
        .map(|s| s.id.clone())
}

/// Probability of a desperation move at the given hull fraction.
pub fn desperation_chance(hull_fraction: f64) -> f64 {
    ((DESPERATION_HULL_THRESHOLD - hull_fraction) / DESPERATION_HULL_THRESHOLD).clamp(0.0, 1.0)
}

/// Roll for a desperation move per the faction's doctrine.
pub fn standard_desperation(
    doctrine: &DoctrineProfile,
    ctx: &AiContext,
    rng: &mut dyn RngCore,
) -> Option<DesperationMove> {
    let ship = ctx.ship;
    if doctrine.desperation == DesperationKind::None
        || ship.hull_fraction() >= DESPERATION_HULL_THRESHOLD
    {
        return None;
    }
    let enemy = ctx.nearest_hostile_within(DESPERATION_RANGE)?;
    if rng.gen::<f64>() >= desperation_chance(ship.hull_fraction()) {
        return None;
    }
    match doctrine.desperation {
        DesperationKind::Ram => Some(DesperationMove::Ram {
            target_id: enemy.id.clone(),
        }),
        DesperationKind::SelfDestruct => Some(DesperationMove::SelfDestruct),
        DesperationKind::Escape => {
            let succeeded = rng.gen::<f64>() >= doctrine.escape_failure;
            Some(DesperationMove::Escape { succeeded })
        }
        DesperationKind::Retreat if ship.retreat_countdown.is_none() => {
            Some(DesperationMove::Retreat)
        }
        DesperationKind::Retreat | DesperationKind::None => None,
    }
}
