//! Move scoring over the 8 adjacent cells.
//!
//! Each candidate gets three components: threat pressure from visible
//! enemies, centrality (distance from the sector edges) and cover. The
//! stance decides how they combine. Ties keep the first candidate in
//! neighbour order.

use tracing::trace;
use vanguard_core::components::Ship;
use vanguard_core::constants::RANGE_FALLOFF_FLOOR;
use vanguard_core::enums::Stance;
use vanguard_core::state::SectorState;
use vanguard_core::types::Position;
use vanguard_sector::visibility::can_see_entity;
use vanguard_sector::{in_bounds, is_asteroid_field, is_deep_nebula, is_nebula, threat_score};

use crate::context::AiContext;

/// Per-cell breakdown, exposed for tests and tracing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveScore {
    pub position: Position,
    pub threat: f64,
    pub centrality: f64,
    pub cover: f64,
    pub total: f64,
}

/// Fraction of full damage a beam of `range` does at `distance`.
/// Zero beyond range.
pub fn weapon_effectiveness(range: i32, distance: i32) -> f64 {
    if range <= 0 || distance > range {
        return 0.0;
    }
    if range == 1 {
        return 1.0;
    }
    let d = distance.max(1) as f64;
    (1.0 - (d - 1.0) / (range as f64 - 1.0)).max(RANGE_FALLOFF_FLOOR)
}

/// Preferred engagement distance against `target`.
///
/// Out-ranging: the closest distance where the enemy is at or below 20%
/// effectiveness while we stay at 40% or better. Out-ranged: close to 2.
/// Matched: hold at 3.
pub fn optimal_range(ship: &Ship, target: &Ship) -> i32 {
    let own = ship.max_beam_range();
    let enemy = target.max_beam_range();
    if own > enemy {
        (1..=own)
            .find(|&d| weapon_effectiveness(enemy, d) <= 0.2 && weapon_effectiveness(own, d) >= 0.4)
            .unwrap_or_else(|| (enemy + 1).min(own))
    } else if own < enemy {
        2
    } else {
        3
    }
}

/// Centrality in [0, 1]: product of the distances to the nearest
/// horizontal and vertical edges, normalised by the sector maximum.
pub fn centrality(sector: &SectorState, pos: &Position) -> f64 {
    let w = sector.size.width;
    let h = sector.size.height;
    let ex = pos.x.min(w - 1 - pos.x).max(0) as f64;
    let ey = pos.y.min(h - 1 - pos.y).max(0) as f64;
    let max = (((w - 1) / 2).max(1) * ((h - 1) / 2).max(1)) as f64;
    (ex * ey / max).min(1.0)
}

pub fn cover(sector: &SectorState, pos: &Position) -> f64 {
    if is_deep_nebula(sector, pos) {
        1.0
    } else if is_nebula(sector, pos) || is_asteroid_field(sector, pos) {
        0.5
    } else {
        0.0
    }
}

/// A cell the ship may enter: in bounds, unoccupied, no mine it can see.
pub fn is_passable(ship: &Ship, sector: &SectorState, pos: &Position) -> bool {
    in_bounds(sector, pos)
        && !sector.is_blocked(pos, &ship.id)
        && !sector
            .mines
            .iter()
            .any(|m| m.position == *pos && can_see_entity(ship, m, sector))
}

/// Score every passable neighbour for `stance`.
pub fn score_moves(ctx: &AiContext, stance: Stance, target: Option<&Ship>) -> Vec<MoveScore> {
    let ship = ctx.ship;
    let sector = ctx.sector;
    let optimal = target.map(|t| (t, optimal_range(ship, t)));

    ship.position
        .neighbors()
        .filter(|p| is_passable(ship, sector, p))
        .map(|p| {
            let threat: f64 = ctx
                .visible_targets
                .iter()
                .map(|e| threat_score(&p, &e.position))
                .sum();
            let centrality = centrality(sector, &p);
            let cover = cover(sector, &p);
            let total = match stance {
                Stance::Defensive | Stance::Recovery => -10.0 * threat + 2.0 * centrality + 3.0 * cover,
                Stance::Aggressive | Stance::Seeking => 10.0 * threat + centrality + 1.5 * cover,
                _ => match optimal {
                    Some((t, opt)) => {
                        let d = p.distance_to(&t.position);
                        -5.0 * (d - opt).abs() as f64 + 2.0 * cover + 0.5 * centrality
                    }
                    None => 2.0 * cover + 0.5 * centrality,
                },
            };
            MoveScore {
                position: p,
                threat,
                centrality,
                cover,
                total,
            }
        })
        .collect()
}

/// Highest-scoring cell; `None` when boxed in.
///
/// A balanced ship already sitting at its optimal range holds position.
pub fn best_move(ctx: &AiContext, stance: Stance, target: Option<&Ship>) -> Option<Position> {
    if matches!(stance, Stance::Balanced | Stance::Preparing | Stance::Prowling) {
        if let Some(t) = target {
            if ctx.distance_to(t) == optimal_range(ctx.ship, t) {
                return None;
            }
        }
    }
    let scores = score_moves(ctx, stance, target);
    let best = scores.iter().fold(None::<&MoveScore>, |best, s| match best {
        Some(b) if b.total >= s.total => Some(b),
        _ => Some(s),
    })?;
    trace!(
        ship = %ctx.ship.id,
        ?stance,
        x = best.position.x,
        y = best.position.y,
        score = best.total,
        candidates = scores.len(),
        "move scored"
    );
    Some(best.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::squadron::AiSession;
    use vanguard_core::components::{BeamWeapon, Weapon};
    use vanguard_core::enums::{Allegiance, BeamKind, Faction};
    use vanguard_sector::environment::fill_nebula;

    fn armed(id: &str, allegiance: Allegiance, x: i32, y: i32, range: i32) -> Ship {
        let mut s = Ship::new(id, id, Faction::Klingon, allegiance, Position::new(x, y));
        s.weapons.push(Weapon::Beam(BeamWeapon {
            id: format!("{id}-beam"),
            name: "Disruptor".into(),
            kind: BeamKind::Disruptor,
            base_damage: 15.0,
            range,
        }));
        if allegiance == Allegiance::Player {
            s.faction = Faction::Federation;
        }
        s
    }

    #[test]
    fn test_weapon_effectiveness_falloff() {
        assert_eq!(weapon_effectiveness(6, 1), 1.0);
        assert!((weapon_effectiveness(6, 3) - 0.6).abs() < 1e-12);
        assert_eq!(weapon_effectiveness(6, 6), 0.2);
        assert_eq!(weapon_effectiveness(6, 7), 0.0);
    }

    #[test]
    fn test_optimal_range_cases() {
        let long = armed("a", Allegiance::Enemy, 0, 0, 8);
        let short = armed("b", Allegiance::Player, 5, 5, 4);
        // Enemy drops to the floor at its max range 4; ours is 1-3/7 there.
        assert_eq!(optimal_range(&long, &short), 4);
        assert_eq!(optimal_range(&short, &long), 2);
        assert_eq!(optimal_range(&short, &short.clone()), 3);
    }

    #[test]
    fn test_centrality_edges_and_centre() {
        let sector = SectorState::default();
        assert_eq!(centrality(&sector, &Position::new(0, 5)), 0.0);
        assert_eq!(centrality(&sector, &Position::new(5, 4)), 1.0);
        assert!(centrality(&sector, &Position::new(2, 2)) < centrality(&sector, &Position::new(4, 3)));
    }

    #[test]
    fn test_cover_values() {
        let mut sector = SectorState::default();
        fill_nebula(&mut sector, Position::new(3, 3), Position::new(5, 5));
        assert_eq!(cover(&sector, &Position::new(4, 4)), 1.0);
        assert_eq!(cover(&sector, &Position::new(3, 3)), 0.5);
        assert_eq!(cover(&sector, &Position::new(8, 8)), 0.0);
    }

    #[test]
    fn test_defensive_moves_away_aggressive_moves_closer() {
        let mut sector = SectorState::default();
        sector.ships.push(armed("k", Allegiance::Enemy, 5, 5, 4));
        sector.ships.push(armed("p", Allegiance::Player, 8, 5, 4));
        let session = AiSession::default();
        let me = sector.ship("k").unwrap();
        let ctx = AiContext::build(me, &sector, 1, &session);
        let target = ctx.primary_target();
        let away = best_move(&ctx, Stance::Defensive, target).unwrap();
        let toward = best_move(&ctx, Stance::Aggressive, target).unwrap();
        let p = Position::new(8, 5);
        assert!(away.distance_to(&p) > 3);
        assert!(toward.distance_to(&p) < 3);
    }

    #[test]
    fn test_boxed_in_has_no_move() {
        let mut sector = SectorState::default();
        sector.ships.push(armed("k", Allegiance::Enemy, 0, 0, 4));
        sector.ships.push(armed("a", Allegiance::Enemy, 1, 0, 4));
        sector.ships.push(armed("b", Allegiance::Enemy, 0, 1, 4));
        sector.ships.push(armed("c", Allegiance::Enemy, 1, 1, 4));
        let session = AiSession::default();
        let me = sector.ship("k").unwrap();
        let ctx = AiContext::build(me, &sector, 1, &session);
        assert!(best_move(&ctx, Stance::Aggressive, None).is_none());
    }

    #[test]
    fn test_balanced_holds_at_optimal_range() {
        let mut sector = SectorState::default();
        sector.ships.push(armed("k", Allegiance::Enemy, 2, 5, 4));
        sector.ships.push(armed("p", Allegiance::Player, 5, 5, 4));
        let session = AiSession::default();
        let me = sector.ship("k").unwrap();
        let ctx = AiContext::build(me, &sector, 1, &session);
        let target = ctx.primary_target();
        assert!(best_move(&ctx, Stance::Balanced, target).is_none());
    }

    #[test]
    fn test_balanced_closes_to_optimal_range() {
        let mut sector = SectorState::default();
        sector.ships.push(armed("k", Allegiance::Enemy, 0, 5, 4));
        sector.ships.push(armed("p", Allegiance::Player, 6, 5, 4));
        let session = AiSession::default();
        let me = sector.ship("k").unwrap();
        let ctx = AiContext::build(me, &sector, 1, &session);
        let target = ctx.primary_target();
        let step = best_move(&ctx, Stance::Balanced, target).unwrap();
        assert_eq!(step.distance_to(&Position::new(6, 5)), 5);
    }
}
