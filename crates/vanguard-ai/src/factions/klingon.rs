use vanguard_core::components::Ship;
use vanguard_core::enums::{Faction, Stance, Subsystem};

use crate::context::AiContext;
use crate::doctrine::{get_doctrine, DoctrineProfile};
use crate::strategy::{idle_stance, FactionStrategy};

/// Closes and fights. Only a shattered hull makes it defensive, and a
/// cornered Klingon rams.
#[derive(Debug, Default)]
pub struct KlingonStrategy;

impl FactionStrategy for KlingonStrategy {
    fn doctrine(&self) -> DoctrineProfile {
        get_doctrine(Faction::Klingon)
    }

    fn determine_stance(&self, ctx: &AiContext, target: Option<&Ship>) -> Stance {
        if ctx.ship.hull_fraction() < 0.25 {
            return Stance::Defensive;
        }
        match target {
            Some(_) => Stance::Aggressive,
            None => idle_stance(ctx.ship),
        }
    }

    fn determine_subsystem_target(&self, _ctx: &AiContext, target: &Ship) -> Option<Subsystem> {
        (!target.subsystems.weapons.is_empty()).then_some(Subsystem::Weapons)
    }
}
