//! Ship templates for setting up a sector.
//!
//! Each template layers hull, shields, weapons and cloak on top of the
//! generic `Ship::new` hull.

use vanguard_core::components::*;
use vanguard_core::enums::*;
use vanguard_core::types::{Gauge, Position};

/// Known ship classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipTemplate {
    FederationCruiser,
    FederationFrigate,
    KlingonBirdOfPrey,
    KlingonBattlecruiser,
    RomulanWarbird,
    PirateRaider,
    IndependentFreighter,
}

impl ShipTemplate {
    pub fn faction(&self) -> Faction {
        match self {
            ShipTemplate::FederationCruiser | ShipTemplate::FederationFrigate => Faction::Federation,
            ShipTemplate::KlingonBirdOfPrey | ShipTemplate::KlingonBattlecruiser => Faction::Klingon,
            ShipTemplate::RomulanWarbird => Faction::Romulan,
            ShipTemplate::PirateRaider => Faction::Pirate,
            ShipTemplate::IndependentFreighter => Faction::Independent,
        }
    }

    /// Build a ship of this class.
    pub fn spawn(&self, id: &str, name: &str, allegiance: Allegiance, position: Position) -> Ship {
        let mut ship = Ship::new(id, name, self.faction(), allegiance, position);
        match self {
            ShipTemplate::FederationCruiser => {
                set_hull(&mut ship, 120.0, 80.0);
                ship.energy = Gauge::full(120.0);
                ship.dilithium = Gauge::full(6.0);
                ship.torpedoes = Gauge::full(10.0);
                ship.security_teams = Gauge::full(4.0);
                ship.allocation = EnergyAllocation::BALANCED;
                ship.weapons.push(beam(id, "phaser", "Phaser Array", BeamKind::Phaser, 20.0, 6));
                ship.weapons.push(launcher(id, "Photon Launcher", TorpedoType::Photon, 40.0, 3, None));
            }
            ShipTemplate::FederationFrigate => {
                set_hull(&mut ship, 80.0, 50.0);
                ship.torpedoes = Gauge::full(6.0);
                ship.weapons.push(beam(id, "phaser", "Phaser Bank", BeamKind::Phaser, 15.0, 5));
                ship.weapons.push(launcher(id, "Quantum Launcher", TorpedoType::Quantum, 35.0, 3, None));
            }
            ShipTemplate::KlingonBirdOfPrey => {
                set_hull(&mut ship, 80.0, 40.0);
                ship.torpedoes = Gauge::full(4.0);
                ship.energy_modifier = 1.1;
                ship.weapons.push(beam(id, "disruptor", "Disruptor Cannon", BeamKind::Disruptor, 18.0, 4));
                ship.weapons.push(launcher(id, "Photon Launcher", TorpedoType::Photon, 35.0, 3, None));
                ship.cloak = CloakSystem::with_reliability(0.85);
            }
            ShipTemplate::KlingonBattlecruiser => {
                set_hull(&mut ship, 140.0, 70.0);
                ship.energy = Gauge::full(120.0);
                ship.torpedoes = Gauge::full(6.0);
                ship.security_teams = Gauge::full(4.0);
                ship.weapons.push(beam(id, "disruptor-fore", "Forward Disruptors", BeamKind::Disruptor, 20.0, 5));
                ship.weapons.push(beam(id, "disruptor-aft", "Aft Disruptor", BeamKind::Disruptor, 12.0, 3));
                ship.weapons.push(launcher(id, "Heavy Photon Launcher", TorpedoType::HeavyPhoton, 55.0, 2, None));
            }
            ShipTemplate::RomulanWarbird => {
                set_hull(&mut ship, 150.0, 90.0);
                ship.energy = Gauge::full(140.0);
                ship.torpedoes = Gauge::full(4.0);
                ship.weapons.push(beam(id, "disruptor", "Disruptor Array", BeamKind::Disruptor, 22.0, 5));
                ship.weapons.push(launcher(
                    id,
                    "Plasma Launcher",
                    TorpedoType::Plasma,
                    60.0,
                    2,
                    Some(PlasmaBurn { damage: 5.0, turns: 3 }),
                ));
                ship.cloak = CloakSystem::with_reliability(0.9);
            }
            ShipTemplate::PirateRaider => {
                set_hull(&mut ship, 70.0, 30.0);
                ship.torpedoes = Gauge::full(3.0);
                ship.security_teams = Gauge::full(3.0);
                ship.energy_modifier = 0.9;
                ship.weapons.push(beam(id, "disruptor", "Salvaged Disruptor", BeamKind::Disruptor, 14.0, 4));
                ship.weapons.push(launcher(id, "Photon Launcher", TorpedoType::Photon, 30.0, 3, None));
            }
            ShipTemplate::IndependentFreighter => {
                set_hull(&mut ship, 90.0, 30.0);
                ship.subsystems = Subsystems::uniform(15.0);
                ship.weapons.push(beam(id, "phaser", "Defence Phaser", BeamKind::Phaser, 8.0, 3));
            }
        }
        ship
    }
}

fn set_hull(ship: &mut Ship, hull: f64, shields: f64) {
    ship.hull = Gauge::full(hull);
    ship.shields = Gauge::full(shields);
}

fn beam(ship_id: &str, slot: &str, name: &str, kind: BeamKind, base_damage: f64, range: i32) -> Weapon {
    Weapon::Beam(BeamWeapon {
        id: format!("{ship_id}-{slot}"),
        name: name.to_string(),
        kind,
        base_damage,
        range,
    })
}

fn launcher(
    ship_id: &str,
    name: &str,
    torpedo_type: TorpedoType,
    damage: f64,
    speed: u32,
    special: Option<PlasmaBurn>,
) -> Weapon {
    Weapon::Torpedo(TorpedoLauncher {
        id: format!("{ship_id}-torpedo"),
        name: name.to_string(),
        torpedo_type,
        damage,
        speed,
        special,
    })
}
