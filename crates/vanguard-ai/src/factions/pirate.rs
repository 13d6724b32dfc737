use vanguard_core::components::Ship;
use vanguard_core::enums::{Faction, Stance, Subsystem};

use super::shields_down;
use crate::context::AiContext;
use crate::doctrine::{get_doctrine, DoctrineProfile, CRIPPLE_ORDER, RAID_ORDER};
use crate::strategy::{first_operational, standard_stance, FactionStrategy};

/// Raiders: pile onto weak prey, back off from a fair fight, and go out
/// with a bang.
#[derive(Debug, Default)]
pub struct PirateStrategy;

impl FactionStrategy for PirateStrategy {
    fn doctrine(&self) -> DoctrineProfile {
        get_doctrine(Faction::Pirate)
    }

    fn determine_stance(&self, ctx: &AiContext, target: Option<&Ship>) -> Stance {
        let stance = standard_stance(ctx, target);
        match target {
            Some(t) if stance == Stance::Balanced && t.hull_fraction() < 0.5 => Stance::Aggressive,
            Some(_) if stance == Stance::Balanced && ctx.ship.shield_fraction() < 0.5 => {
                Stance::Defensive
            }
            _ => stance,
        }
    }

    /// With shields down, cripple: engines then weapons. Otherwise go for
    /// the transporter so the prize can't be defended.
    fn determine_subsystem_target(&self, _ctx: &AiContext, target: &Ship) -> Option<Subsystem> {
        if shields_down(target) {
            first_operational(target, &CRIPPLE_ORDER)
        } else {
            first_operational(target, &RAID_ORDER)
        }
    }
}
