use vanguard_core::components::Ship;
use vanguard_core::enums::{Faction, Subsystem};

use crate::context::AiContext;
use crate::doctrine::{get_doctrine, DoctrineProfile};
use crate::strategy::FactionStrategy;

/// Disables rather than destroys: weapons first, engines once the
/// target is badly hurt so it cannot run. Retreats when cornered.
#[derive(Debug, Default)]
pub struct FederationStrategy;

impl FactionStrategy for FederationStrategy {
    fn doctrine(&self) -> DoctrineProfile {
        get_doctrine(Faction::Federation)
    }

    fn determine_subsystem_target(&self, _ctx: &AiContext, target: &Ship) -> Option<Subsystem> {
        if target.hull_fraction() < 0.5 {
            Some(Subsystem::Engines)
        } else {
            Some(Subsystem::Weapons)
        }
    }
}
