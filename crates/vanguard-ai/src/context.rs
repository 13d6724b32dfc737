//! Read-only view of the world for one AI ship's decision.

use vanguard_core::components::{Ship, TorpedoProjectile};
use vanguard_core::state::SectorState;
use vanguard_core::types::EntityId;
use vanguard_sector::{find_closest_target, is_comm_blackout, visible_hostiles};

use crate::squadron::AiSession;

/// Input to a faction strategy for a single ship.
pub struct AiContext<'a> {
    pub ship: &'a Ship,
    pub sector: &'a SectorState,
    pub turn: u32,
    /// Hostiles on sensors, including those shared by squadron mates.
    pub visible_targets: Vec<&'a Ship>,
    /// Squadron-wide priority target, if this ship can hear it.
    pub squadron_target: Option<EntityId>,
    pub has_comms: bool,
    /// Hostile torpedoes homing on this ship.
    pub incoming_torpedoes: Vec<&'a TorpedoProjectile>,
}

impl<'a> AiContext<'a> {
    pub fn build(ship: &'a Ship, sector: &'a SectorState, turn: u32, session: &AiSession) -> Self {
        let has_comms = !is_comm_blackout(sector, &ship.position);
        let visible_targets = visible_hostiles(ship, sector);
        let squadron_target = if has_comms {
            session.squadron_target(ship.allegiance).cloned()
        } else {
            None
        };
        let incoming_torpedoes = sector
            .torpedoes
            .iter()
            .filter(|t| !t.destroyed && t.target_id == ship.id && t.source_id != ship.id)
            .collect();
        Self {
            ship,
            sector,
            turn,
            visible_targets,
            squadron_target,
            has_comms,
            incoming_torpedoes,
        }
    }

    /// The squadron's pick when visible, else the nearest visible hostile.
    pub fn primary_target(&self) -> Option<&'a Ship> {
        if let Some(id) = &self.squadron_target {
            if let Some(t) = self.visible_targets.iter().find(|t| &t.id == id) {
                return Some(*t);
            }
        }
        find_closest_target(self.ship, self.visible_targets.iter().copied())
    }

    pub fn distance_to(&self, other: &Ship) -> i32 {
        self.ship.position.distance_to(&other.position)
    }

    /// Nearest visible hostile within `range`, if any.
    pub fn nearest_hostile_within(&self, range: i32) -> Option<&'a Ship> {
        find_closest_target(self.ship, self.visible_targets.iter().copied())
            .filter(|t| self.distance_to(t) <= range)
    }
}
