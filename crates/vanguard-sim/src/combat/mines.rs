//! Mine detonation.

use vanguard_core::components::{Mine, Ship};

/// Shield and hull damage dealt by a mine to the ship entering its cell.
/// Shields absorb point for point.
pub fn detonate_mine(mine: &Mine, ship: &mut Ship) -> (f64, f64) {
    let shield_damage = ship.shields.sub(mine.damage);
    let hull_damage = ship.hull.sub(mine.damage - shield_damage);
    (shield_damage, hull_damage)
}
