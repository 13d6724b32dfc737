//! Squadron-level target coordination.
//!
//! Ships of one allegiance that can talk to each other vote on a single
//! priority target once per turn. Every target a squadron has picked keeps a
//! persistence bonus that decays each vote, so the vote favours recent picks
//! until they drop off sensors, die, or the bonus runs out.

use std::collections::BTreeMap;

use tracing::{debug, trace};
use vanguard_core::components::Ship;
use vanguard_core::constants::{PERSISTENCE_BONUS_DECAY, PERSISTENCE_BONUS_INITIAL};
use vanguard_core::enums::Allegiance;
use vanguard_core::state::SectorState;
use vanguard_core::types::EntityId;
use vanguard_sector::{is_comm_blackout, visible_hostiles};

/// AI memory that outlives a single turn. One per simulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiSession {
    /// Persistence bonus per squadron, per target it has picked before.
    bonuses: BTreeMap<Allegiance, BTreeMap<EntityId, f64>>,
    current: BTreeMap<Allegiance, EntityId>,
}

impl AiSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// This turn's priority target for `allegiance`.
    pub fn squadron_target(&self, allegiance: Allegiance) -> Option<&EntityId> {
        self.current.get(&allegiance)
    }

    /// Remaining persistence bonus `allegiance` holds for `target_id`.
    pub fn bonus(&self, allegiance: Allegiance, target_id: &str) -> f64 {
        self.bonuses
            .get(&allegiance)
            .and_then(|b| b.get(target_id))
            .copied()
            .unwrap_or(0.0)
    }

    /// Run the vote for `allegiance` and remember the result.
    pub fn coordinate(&mut self, allegiance: Allegiance, sector: &SectorState) -> Option<EntityId> {
        self.current.remove(&allegiance);

        let members: Vec<&Ship> = sector
            .ships
            .iter()
            .filter(|s| {
                s.allegiance == allegiance
                    && s.can_act()
                    && !is_comm_blackout(sector, &s.position)
            })
            .collect();
        let Some(first) = members.first() else {
            self.bonuses.remove(&allegiance);
            return None;
        };
        // Members all have comms, so any one of them sees the shared picture.
        let candidates = visible_hostiles(first, sector);

        let bonuses = self.bonuses.entry(allegiance).or_default();
        bonuses.retain(|target_id, bonus| {
            *bonus -= PERSISTENCE_BONUS_DECAY;
            let on_sensors = candidates.iter().any(|c| &c.id == target_id);
            if !on_sensors {
                trace!(?allegiance, target = %target_id, "squadron focus lost");
            }
            on_sensors && *bonus > 0.0
        });

        let mut best: Option<(&Ship, f64)> = None;
        for candidate in &candidates {
            let bonus = bonuses.get(&candidate.id).copied().unwrap_or(0.0);
            let score = target_score(candidate, &members) + bonus;
            trace!(?allegiance, target = %candidate.id, score, "squadron candidate");
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((*candidate, score));
            }
        }

        let (chosen, score) = best?;
        debug!(?allegiance, target = %chosen.id, score, "squadron target selected");
        bonuses.insert(chosen.id.clone(), PERSISTENCE_BONUS_INITIAL);
        self.current.insert(allegiance, chosen.id.clone());
        Some(chosen.id.clone())
    }

    /// Forget this turn's votes. Persistence memory is kept.
    pub fn end_turn(&mut self) {
        self.current.clear();
    }
}

/// Score without persistence: damage already dealt, weak shields, the
/// target's own firepower, and how far the squadron has to fly.
pub fn target_score(target: &Ship, squadron: &[&Ship]) -> f64 {
    let damage_dealt = (1.0 - target.hull_fraction()) * 100.0;
    let shield_vulnerability = (1.0 - target.shield_fraction()) * 100.0;
    let threat = target.firepower();
    let avg_distance = if squadron.is_empty() {
        0.0
    } else {
        squadron
            .iter()
            .map(|s| s.position.distance_to(&target.position) as f64)
            .sum::<f64>()
            / squadron.len() as f64
    };
    damage_dealt + 0.8 * shield_vulnerability + 0.5 * threat - 10.0 * avg_distance
}
