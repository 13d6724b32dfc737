//! Environment membership queries.
//!
//! Nebulae and ion storms are plain cell sets. A "deep" cell is one whose
//! full 3x3 neighbourhood lies inside the sector and inside the set, so
//! edge and corner cells are never deep.

use std::collections::BTreeSet;

use vanguard_core::constants::COMM_BLACKOUT_RADIUS;
use vanguard_core::state::SectorState;
use vanguard_core::types::{GridSize, Position};

pub fn in_bounds(sector: &SectorState, pos: &Position) -> bool {
    sector.size.contains(pos)
}

pub fn is_nebula(sector: &SectorState, pos: &Position) -> bool {
    sector.nebula_cells.contains(pos)
}

pub fn is_ion_storm(sector: &SectorState, pos: &Position) -> bool {
    sector.ion_storm_cells.contains(pos)
}

pub fn is_asteroid_field(sector: &SectorState, pos: &Position) -> bool {
    sector.is_asteroid_cell(pos)
}

pub fn is_deep_nebula(sector: &SectorState, pos: &Position) -> bool {
    is_deep(&sector.nebula_cells, sector.size, pos)
}

pub fn is_deep_ion_storm(sector: &SectorState, pos: &Position) -> bool {
    is_deep(&sector.ion_storm_cells, sector.size, pos)
}

fn is_deep(cells: &BTreeSet<Position>, size: GridSize, pos: &Position) -> bool {
    cells.contains(pos) && pos.neighbors().all(|n| size.contains(&n) && cells.contains(&n))
}

/// True when every cell within Chebyshev distance 2 is nebula (a 5x5 core).
pub fn is_comm_blackout(sector: &SectorState, pos: &Position) -> bool {
    let r = COMM_BLACKOUT_RADIUS;
    (-r..=r).all(|dy| {
        (-r..=r).all(|dx| {
            let cell = Position::new(pos.x + dx, pos.y + dy);
            in_bounds(sector, &cell) && is_nebula(sector, &cell)
        })
    })
}

/// Fill a rectangle of nebula cells, clipped to the sector.
pub fn fill_nebula(sector: &mut SectorState, min: Position, max: Position) {
    for y in min.y..=max.y {
        for x in min.x..=max.x {
            let cell = Position::new(x, y);
            if sector.size.contains(&cell) {
                sector.nebula_cells.insert(cell);
            }
        }
    }
    sector.refresh_flags();
}
