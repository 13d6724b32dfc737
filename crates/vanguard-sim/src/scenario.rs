//! Scenario definitions: hardcoded starting sectors.

use vanguard_core::components::{AsteroidField, Mine, Planet, Starbase};
use vanguard_core::enums::{Allegiance, Faction};
use vanguard_core::state::{GameState, SectorState};
use vanguard_core::types::Position;
use vanguard_core::{GameError, GameResult};
use vanguard_sector::environment::fill_nebula;

use crate::world_setup::ShipTemplate;

/// Id of the player's ship in every built-in scenario.
pub const PLAYER_SHIP_ID: &str = "enterprise";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    BorderSkirmish,
    NebulaAmbush,
    PirateRaid,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 3] = [
        ScenarioId::BorderSkirmish,
        ScenarioId::NebulaAmbush,
        ScenarioId::PirateRaid,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::BorderSkirmish => "border_skirmish",
            ScenarioId::NebulaAmbush => "nebula_ambush",
            ScenarioId::PirateRaid => "pirate_raid",
        }
    }

    pub fn from_name(name: &str) -> GameResult<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| GameError::UnknownScenario(name.to_string()))
    }

    pub fn build(&self) -> GameResult<GameState> {
        let sector = match self {
            ScenarioId::BorderSkirmish => border_skirmish(),
            ScenarioId::NebulaAmbush => nebula_ambush(),
            ScenarioId::PirateRaid => pirate_raid(),
        };
        let mut state = GameState::new(PLAYER_SHIP_ID, sector)?;
        let hostiles = state.sector.ships_of(Allegiance::Enemy).count() as u32;
        if let Some(cell) = state.quadrant_map.current_cell_mut() {
            cell.hostile_count = hostiles;
        }
        Ok(state)
    }
}

/// Build a scenario by name.
pub fn by_name(name: &str) -> GameResult<GameState> {
    ScenarioId::from_name(name)?.build()
}

fn player_ship() -> vanguard_core::components::Ship {
    ShipTemplate::FederationCruiser.spawn(
        PLAYER_SHIP_ID,
        "USS Enterprise",
        Allegiance::Player,
        Position::new(1, 5),
    )
}

/// Border Skirmish: a Klingon patrol of three against the player and one
/// escort, with a neutral freighter caught in between.
fn border_skirmish() -> SectorState {
    let mut sector = SectorState::default();
    sector.ships.push(player_ship());
    sector.ships.push(ShipTemplate::FederationFrigate.spawn(
        "lexington",
        "USS Lexington",
        Allegiance::Ally,
        Position::new(1, 2),
    ));
    sector.ships.push(ShipTemplate::KlingonBirdOfPrey.spawn(
        "korinar",
        "IKS Korinar",
        Allegiance::Enemy,
        Position::new(9, 2),
    ));
    sector.ships.push(ShipTemplate::KlingonBattlecruiser.spawn(
        "gorkon",
        "IKS Gorkon",
        Allegiance::Enemy,
        Position::new(10, 5),
    ));
    sector.ships.push(ShipTemplate::KlingonBirdOfPrey.spawn(
        "ktinga",
        "IKS K'Tinga",
        Allegiance::Enemy,
        Position::new(9, 8),
    ));
    sector.ships.push(ShipTemplate::IndependentFreighter.spawn(
        "mercator",
        "SS Mercator",
        Allegiance::Neutral,
        Position::new(6, 9),
    ));
    sector.planets.push(Planet {
        id: "planet-1".into(),
        name: "Khitomer IV".into(),
        position: Position::new(6, 1),
    });
    sector.asteroid_fields.push(AsteroidField {
        id: "asteroids-1".into(),
        cells: vec![
            Position::new(5, 6),
            Position::new(6, 6),
            Position::new(5, 7),
            Position::new(6, 7),
        ],
    });
    sector.refresh_flags();
    sector
}

/// Nebula Ambush: a cloaked Romulan warbird waits in a nebula, its
/// approach seeded with a mine only Romulan sensors can see.
fn nebula_ambush() -> SectorState {
    let mut sector = SectorState::default();
    sector.ships.push(player_ship());
    let mut warbird = ShipTemplate::RomulanWarbird.spawn(
        "valdore",
        "IRW Valdore",
        Allegiance::Enemy,
        Position::new(8, 4),
    );
    warbird.cloak.state = vanguard_core::enums::CloakState::Cloaked;
    warbird.shields.set(0.0);
    sector.ships.push(warbird);
    fill_nebula(&mut sector, Position::new(6, 2), Position::new(10, 7));
    sector.mines.push(Mine {
        id: "mine-1".into(),
        position: Position::new(4, 5),
        damage: 25.0,
        faction: Faction::Romulan,
        visible_to: vec![Faction::Romulan],
    });
    sector.refresh_flags();
    sector
}

/// Pirate Raid: raiders close on a starbase. A crippled freighter drifts
/// nearby, ripe for boarding.
fn pirate_raid() -> SectorState {
    let mut sector = SectorState::default();
    let mut player = player_ship();
    player.position = Position::new(2, 2);
    sector.ships.push(player);
    sector.starbases.push(Starbase {
        id: "starbase-1".into(),
        name: "Deep Space K-7".into(),
        position: Position::new(1, 1),
        allegiance: Allegiance::Player,
    });
    for (id, name, pos) in [
        ("raider-1", "Orion Marauder", Position::new(8, 2)),
        ("raider-2", "Orion Corsair", Position::new(9, 5)),
        ("raider-3", "Orion Reaver", Position::new(8, 8)),
    ] {
        sector
            .ships
            .push(ShipTemplate::PirateRaider.spawn(id, name, Allegiance::Enemy, pos));
    }
    let mut hulk = ShipTemplate::IndependentFreighter.spawn(
        "drifter",
        "SS Drifter",
        Allegiance::Neutral,
        Position::new(5, 5),
    );
    crate::energy::make_derelict(&mut hulk);
    sector.ships.push(hulk);
    sector.refresh_flags();
    sector
}
