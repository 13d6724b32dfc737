//! Faction doctrine profiles.
//!
//! Consolidates per-faction parameters and the stance tables shared by
//! every strategy.

use vanguard_core::components::EnergyAllocation;
use vanguard_core::enums::{Faction, Stance, Subsystem};

/// How a faction reacts when cornered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesperationKind {
    Ram,
    SelfDestruct,
    /// Jump out of the sector; may fail per `escape_failure`.
    Escape,
    Retreat,
    None,
}

/// Behavioral profile for a faction.
#[derive(Debug, Clone, Copy)]
pub struct DoctrineProfile {
    pub desperation: DesperationKind,
    /// Chance an escape attempt fails and destroys the ship.
    pub escape_failure: f64,
    /// Boards adjacent derelicts when possible.
    pub captures_derelicts: bool,
    /// Will use a cloaking device tactically if fitted.
    pub uses_cloak: bool,
    /// Emergency-cloaks against inbound torpedoes.
    pub cloaks_against_torpedoes: bool,
}

/// Get the doctrine for a given faction.
pub fn get_doctrine(faction: Faction) -> DoctrineProfile {
    use vanguard_core::constants::ROMULAN_ESCAPE_FAILURE;

    match faction {
        Faction::Federation => DoctrineProfile {
            desperation: DesperationKind::Retreat,
            escape_failure: 0.0,
            captures_derelicts: true,
            uses_cloak: false,
            cloaks_against_torpedoes: false,
        },
        Faction::Klingon => DoctrineProfile {
            desperation: DesperationKind::Ram,
            escape_failure: 0.0,
            captures_derelicts: true,
            uses_cloak: false,
            cloaks_against_torpedoes: false,
        },
        Faction::Romulan => DoctrineProfile {
            desperation: DesperationKind::Escape,
            escape_failure: ROMULAN_ESCAPE_FAILURE,
            captures_derelicts: false,
            uses_cloak: true,
            cloaks_against_torpedoes: true,
        },
        Faction::Pirate => DoctrineProfile {
            desperation: DesperationKind::SelfDestruct,
            escape_failure: 0.0,
            captures_derelicts: true,
            uses_cloak: false,
            cloaks_against_torpedoes: false,
        },
        Faction::Independent => DoctrineProfile {
            desperation: DesperationKind::Escape,
            escape_failure: 0.0,
            captures_derelicts: false,
            uses_cloak: false,
            cloaks_against_torpedoes: false,
        },
        Faction::Unaligned => DoctrineProfile {
            desperation: DesperationKind::None,
            escape_failure: 0.0,
            captures_derelicts: false,
            uses_cloak: false,
            cloaks_against_torpedoes: false,
        },
    }
}

/// Reactor split for each stance.
pub fn allocation_for(stance: Stance) -> EnergyAllocation {
    match stance {
        Stance::Aggressive => EnergyAllocation::AGGRESSIVE,
        Stance::Defensive => EnergyAllocation::DEFENSIVE,
        Stance::Balanced => EnergyAllocation::BALANCED,
        Stance::Recovery => EnergyAllocation::FULL_ENGINES,
        Stance::Seeking => EnergyAllocation::SEEKING,
        Stance::Prowling => EnergyAllocation::PROWLING,
        Stance::Preparing => EnergyAllocation::PREPARING,
    }
}

/// Base chance per turn of launching a torpedo.
pub fn torpedo_launch_chance(stance: Stance) -> f64 {
    match stance {
        Stance::Aggressive => 0.6,
        Stance::Balanced | Stance::Preparing => 0.35,
        Stance::Defensive => 0.15,
        Stance::Recovery | Stance::Seeking | Stance::Prowling => 0.0,
    }
}

/// Extra launch chance against a target whose shields are down.
pub const TORPEDO_SHIELDS_DOWN_BONUS: f64 = 0.25;

/// Subsystem preference lists used by the doctrines.
pub const CRIPPLE_ORDER: [Subsystem; 2] = [Subsystem::Engines, Subsystem::Weapons];
pub const RAID_ORDER: [Subsystem; 2] = [Subsystem::Transporter, Subsystem::Weapons];
