//! Sector and game state: the complete serializable world.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::components::*;
use crate::constants::{QUADRANT_SIZE, SECTOR_HEIGHT, SECTOR_WIDTH};
use crate::enums::*;
use crate::error::{GameError, GameResult};
use crate::events::{CombatEffect, LogEntry};
use crate::types::{EntityId, GridSize, Position};

/// Summary flags for the sector's environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentFlags {
    pub has_nebula: bool,
    pub has_ion_storm: bool,
    pub has_asteroids: bool,
}

/// Everything inside one tactical sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorState {
    pub size: GridSize,
    pub ships: Vec<Ship>,
    pub torpedoes: Vec<TorpedoProjectile>,
    pub planets: Vec<Planet>,
    pub starbases: Vec<Starbase>,
    pub asteroid_fields: Vec<AsteroidField>,
    pub mines: Vec<Mine>,
    pub beacons: Vec<Beacon>,
    pub nebula_cells: BTreeSet<Position>,
    pub ion_storm_cells: BTreeSet<Position>,
    pub flags: EnvironmentFlags,
    /// Ships that escaped or retreated out of the sector.
    pub departed: Vec<EntityId>,
    /// Serial for generated entity ids.
    pub next_serial: u64,
}

impl Default for SectorState {
    fn default() -> Self {
        Self::new(GridSize::new(SECTOR_WIDTH, SECTOR_HEIGHT))
    }
}

impl SectorState {
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            ships: Vec::new(),
            torpedoes: Vec::new(),
            planets: Vec::new(),
            starbases: Vec::new(),
            asteroid_fields: Vec::new(),
            mines: Vec::new(),
            beacons: Vec::new(),
            nebula_cells: BTreeSet::new(),
            ion_storm_cells: BTreeSet::new(),
            flags: EnvironmentFlags::default(),
            departed: Vec::new(),
            next_serial: 1,
        }
    }

    /// Recompute the summary flags from the cell sets.
    pub fn refresh_flags(&mut self) {
        self.flags = EnvironmentFlags {
            has_nebula: !self.nebula_cells.is_empty(),
            has_ion_storm: !self.ion_storm_cells.is_empty(),
            has_asteroids: self.asteroid_fields.iter().any(|f| !f.cells.is_empty()),
        };
    }

    /// Generate a unique id with the given prefix.
    pub fn next_id(&mut self, prefix: &str) -> EntityId {
        let id = format!("{prefix}-{}", self.next_serial);
        self.next_serial += 1;
        id
    }

    pub fn ship(&self, id: &str) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id == id)
    }

    pub fn ship_mut(&mut self, id: &str) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| s.id == id)
    }

    pub fn ship_index(&self, id: &str) -> Option<usize> {
        self.ships.iter().position(|s| s.id == id)
    }

    /// Two distinct ships borrowed mutably at once.
    pub fn pair_mut(&mut self, a: &str, b: &str) -> Option<(&mut Ship, &mut Ship)> {
        let ia = self.ship_index(a)?;
        let ib = self.ship_index(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.ships.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.ships.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    /// The live (not destroyed) ship occupying `pos`, if any.
    pub fn ship_at(&self, pos: &Position) -> Option<&Ship> {
        self.ships
            .iter()
            .find(|s| s.position == *pos && !s.is_destroyed())
    }

    pub fn mine_at(&self, pos: &Position) -> Option<&Mine> {
        self.mines.iter().find(|m| m.position == *pos)
    }

    pub fn is_asteroid_cell(&self, pos: &Position) -> bool {
        self.asteroid_fields.iter().any(|f| f.cells.contains(pos))
    }

    /// Cells a ship can never enter: other live ships, planets, starbases.
    pub fn is_blocked(&self, pos: &Position, mover_id: &str) -> bool {
        self.ships
            .iter()
            .any(|s| s.id != mover_id && s.position == *pos && !s.is_destroyed())
            || self.planets.iter().any(|p| p.position == *pos)
            || self.starbases.iter().any(|b| b.position == *pos)
    }

    /// Live ships of the given allegiance.
    pub fn ships_of(&self, allegiance: Allegiance) -> impl Iterator<Item = &Ship> + '_ {
        self.ships
            .iter()
            .filter(move |s| s.allegiance == allegiance && !s.is_destroyed())
    }

    pub fn mark_departed(&mut self, id: &str) {
        if let Some(idx) = self.ship_index(id) {
            self.ships.remove(idx);
            self.departed.push(id.to_string());
        }
    }
}

/// One cell of the strategic map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuadrantCell {
    pub explored: bool,
    pub controlling_faction: Option<Faction>,
    pub hostile_count: u32,
}

/// Strategic grid of sectors, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadrantMap {
    pub size: GridSize,
    pub cells: Vec<QuadrantCell>,
    /// Sector the player is currently in.
    pub current: Position,
}

impl Default for QuadrantMap {
    fn default() -> Self {
        let size = GridSize::new(QUADRANT_SIZE, QUADRANT_SIZE);
        let mut map = Self {
            size,
            cells: vec![QuadrantCell::default(); (size.width * size.height) as usize],
            current: Position::default(),
        };
        if let Some(cell) = map.get_mut(&Position::default()) {
            cell.explored = true;
        }
        map
    }
}

impl QuadrantMap {
    fn index(&self, pos: &Position) -> Option<usize> {
        self.size
            .contains(pos)
            .then(|| (pos.y * self.size.width + pos.x) as usize)
    }

    pub fn get(&self, pos: &Position) -> Option<&QuadrantCell> {
        self.index(pos).and_then(|i| self.cells.get(i))
    }

    pub fn get_mut(&mut self, pos: &Position) -> Option<&mut QuadrantCell> {
        self.index(pos).and_then(move |i| self.cells.get_mut(i))
    }

    pub fn current_cell_mut(&mut self) -> Option<&mut QuadrantCell> {
        let current = self.current;
        self.get_mut(&current)
    }
}

/// Player-side bookkeeping that outlives a single turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub ship_id: EntityId,
    /// Standing navigation order; cleared on arrival.
    pub navigation_target: Option<Position>,
}

/// The complete game, round-trippable through JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub turn: u32,
    pub player: PlayerState,
    pub sector: SectorState,
    pub quadrant_map: QuadrantMap,
    pub combat_effects: Vec<CombatEffect>,
    pub logs: Vec<LogEntry>,
    /// Machine-readable trace of this turn's resolved actions.
    pub turn_events: Vec<String>,
    pub game_over: bool,
    pub game_won: bool,
}

impl GameState {
    pub fn new(player_ship_id: &str, sector: SectorState) -> GameResult<Self> {
        if sector.ship(player_ship_id).is_none() {
            return Err(GameError::MissingPlayerShip(player_ship_id.to_string()));
        }
        Ok(Self {
            turn: 1,
            player: PlayerState {
                ship_id: player_ship_id.to_string(),
                navigation_target: None,
            },
            sector,
            quadrant_map: QuadrantMap::default(),
            combat_effects: Vec::new(),
            logs: Vec::new(),
            turn_events: Vec::new(),
            game_over: false,
            game_won: false,
        })
    }

    pub fn player_ship(&self) -> Option<&Ship> {
        self.sector.ship(&self.player.ship_id)
    }

    pub fn player_ship_mut(&mut self) -> Option<&mut Ship> {
        let id = self.player.ship_id.clone();
        self.sector.ship_mut(&id)
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> GameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a saved state. The player ship must be present and every
    /// allocation must sum to 100.
    pub fn from_json(json: &str) -> GameResult<Self> {
        let state: GameState = serde_json::from_str(json)?;
        if state.player_ship().is_none() {
            return Err(GameError::MissingPlayerShip(state.player.ship_id));
        }
        for ship in &state.sector.ships {
            ship.allocation.validate()?;
        }
        Ok(state)
    }
}
