use vanguard_core::components::Ship;
use vanguard_core::enums::{Faction, Stance, Subsystem};

use crate::context::AiContext;
use crate::doctrine::{get_doctrine, DoctrineProfile};
use crate::strategy::{idle_stance, FactionStrategy};

/// Traders and freelancers. They defend themselves and leave when hurt.
#[derive(Debug, Default)]
pub struct IndependentStrategy;

impl FactionStrategy for IndependentStrategy {
    fn doctrine(&self) -> DoctrineProfile {
        get_doctrine(Faction::Independent)
    }

    fn determine_stance(&self, ctx: &AiContext, target: Option<&Ship>) -> Stance {
        match target {
            None => idle_stance(ctx.ship),
            Some(_) if ctx.ship.hull_fraction() > 0.6 => Stance::Balanced,
            Some(_) => Stance::Defensive,
        }
    }

    fn determine_subsystem_target(&self, _ctx: &AiContext, _target: &Ship) -> Option<Subsystem> {
        None
    }
}
