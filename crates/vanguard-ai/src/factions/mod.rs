//! Concrete faction strategies.

mod federation;
mod independent;
mod klingon;
mod pirate;
mod romulan;

pub use federation::FederationStrategy;
pub use independent::IndependentStrategy;
pub use klingon::KlingonStrategy;
pub use pirate::PirateStrategy;
pub use romulan::RomulanStrategy;

use vanguard_core::components::Ship;
use vanguard_core::constants::SHIELDS_DOWN_THRESHOLD;
use vanguard_core::enums::{Faction, Subsystem};

use crate::context::AiContext;
use crate::doctrine::{get_doctrine, DoctrineProfile};
use crate::strategy::FactionStrategy;

/// Fallback for factions without a registered strategy.
#[derive(Debug, Default)]
pub struct DefaultStrategy;

impl FactionStrategy for DefaultStrategy {
    fn doctrine(&self) -> DoctrineProfile {
        get_doctrine(Faction::Unaligned)
    }

    /// Go for weapons once the target's shields are half gone.
    fn determine_subsystem_target(&self, _ctx: &AiContext, target: &Ship) -> Option<Subsystem> {
        (target.shield_fraction() <= 0.5 && !target.subsystems.weapons.is_empty())
            .then_some(Subsystem::Weapons)
    }
}

pub(crate) fn shields_down(target: &Ship) -> bool {
    target.shield_fraction() <= SHIELDS_DOWN_THRESHOLD
}
