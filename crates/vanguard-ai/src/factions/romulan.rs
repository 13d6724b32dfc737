use rand::RngCore;
use tracing::debug;
use vanguard_core::components::Ship;
use vanguard_core::enums::{CloakState, Faction, Stance, Subsystem};

use crate::context::AiContext;
use crate::doctrine::{get_doctrine, DoctrineProfile};
use crate::plan::{CloakCommand, TurnPlan};
use crate::strategy::{enable_point_defense, standard_stance, FactionStrategy};

/// Emergency cloak trigger distance for an inbound torpedo.
const EMERGENCY_CLOAK_RANGE: i32 = 2;

/// Ambushers. Stalk under cloak, decloak at striking distance, cripple
/// engines so the prey can't escape, and vanish when torpedoes close in.
#[derive(Debug, Default)]
pub struct RomulanStrategy;

impl FactionStrategy for RomulanStrategy {
    fn doctrine(&self) -> DoctrineProfile {
        get_doctrine(Faction::Romulan)
    }

    fn determine_stance(&self, ctx: &AiContext, target: Option<&Ship>) -> Stance {
        let ship = ctx.ship;
        if ship.hull_fraction() < 0.25 {
            return Stance::Defensive;
        }
        match (ship.cloak.state, target) {
            (CloakState::Cloaked | CloakState::Cloaking, Some(t)) => {
                if ctx.distance_to(t) > ship.max_beam_range() {
                    Stance::Prowling
                } else {
                    Stance::Preparing
                }
            }
            (CloakState::Cloaked | CloakState::Cloaking, None) => Stance::Prowling,
            _ => standard_stance(ctx, target),
        }
    }

    fn determine_subsystem_target(&self, _ctx: &AiContext, target: &Ship) -> Option<Subsystem> {
        (!target.subsystems.engines.is_empty()).then_some(Subsystem::Engines)
    }

    fn handle_torpedo_threat(
        &self,
        ctx: &AiContext,
        plan: &mut TurnPlan,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let ship = ctx.ship;
        let close = ctx
            .incoming_torpedoes
            .iter()
            .any(|t| t.position.distance_to(&ship.position) <= EMERGENCY_CLOAK_RANGE);
        if close && ship.cloak.can_engage() {
            debug!(ship = %ship.id, "emergency cloak");
            plan.cloak = CloakCommand::Engage;
            return true;
        }
        enable_point_defense(ctx, plan);
        false
    }
}
