//! Sensor model.
//!
//! Nebulae act as fog: an observer inside one sees only adjacent contacts,
//! and anything in a deep nebula cell is invisible to other factions.
//! Cloaked and mid-transition ships are never visible to other factions,
//! though a lock taken before a transition began survives it.

use vanguard_core::components::{Mine, Ship, TorpedoProjectile};
use vanguard_core::enums::Faction;
use vanguard_core::state::SectorState;
use vanguard_core::types::Position;

use crate::environment::{is_comm_blackout, is_deep_nebula, is_nebula};
use crate::threat::is_hostile;

/// Anything a ship's sensors can try to resolve.
pub trait SensorProfile {
    fn sensor_id(&self) -> &str;
    fn sensor_faction(&self) -> Faction;
    fn sensor_position(&self) -> Position;

    /// Cloaked or in a cloak transition.
    fn is_concealed(&self) -> bool {
        false
    }

    /// Faction-level detection filter applied before the environment.
    fn detectable_by(&self, _faction: Faction) -> bool {
        true
    }
}

impl SensorProfile for Ship {
    fn sensor_id(&self) -> &str {
        &self.id
    }
    fn sensor_faction(&self) -> Faction {
        self.faction
    }
    fn sensor_position(&self) -> Position {
        self.position
    }
    fn is_concealed(&self) -> bool {
        self.cloak.state.is_concealed()
    }
}

impl SensorProfile for TorpedoProjectile {
    fn sensor_id(&self) -> &str {
        &self.id
    }
    fn sensor_faction(&self) -> Faction {
        self.faction
    }
    fn sensor_position(&self) -> Position {
        self.position
    }
}

impl SensorProfile for Mine {
    fn sensor_id(&self) -> &str {
        &self.id
    }
    fn sensor_faction(&self) -> Faction {
        self.faction
    }
    fn sensor_position(&self) -> Position {
        self.position
    }
    fn detectable_by(&self, faction: Faction) -> bool {
        self.is_visible_to(faction)
    }
}

/// Whether `observer` can currently sense `target`.
pub fn can_see_entity<T: SensorProfile + ?Sized>(
    observer: &Ship,
    target: &T,
    sector: &SectorState,
) -> bool {
    if target.sensor_id() == observer.id || target.sensor_faction() == observer.faction {
        return true;
    }
    if !target.detectable_by(observer.faction) || target.is_concealed() {
        return false;
    }
    environment_allows(observer, &target.sensor_position(), sector)
}

/// Whether `observer` may keep firing on `target` this turn.
///
/// Sensors are enough on their own. A ship caught mid cloak transition also
/// stays targetable by whoever fired on it this turn or last, as long as the
/// fog would not hide it anyway.
pub fn holds_lock(observer: &Ship, target: &Ship, sector: &SectorState, turn: u32) -> bool {
    if can_see_entity(observer, target, sector) {
        return true;
    }
    let locked = observer.targeting.target_id.as_deref() == Some(target.id.as_str())
        && observer
            .targeting
            .last_fired_turn
            .is_some_and(|last| last + 1 >= turn);
    locked
        && target.cloak.state.is_transitioning()
        && environment_allows(observer, &target.position, sector)
}

fn environment_allows(observer: &Ship, target_pos: &Position, sector: &SectorState) -> bool {
    if is_deep_nebula(sector, target_pos) {
        return false;
    }
    if is_nebula(sector, &observer.position) {
        return observer.position.distance_to(target_pos) <= 1;
    }
    true
}

/// Hostile live ships that `observer` can see, directly or through
/// same-allegiance ships it can talk to. Both ends of a shared link must
/// be outside a comm blackout. Sector order is preserved.
pub fn visible_hostiles<'a>(observer: &Ship, sector: &'a SectorState) -> Vec<&'a Ship> {
    let observer_has_comms = !is_comm_blackout(sector, &observer.position);
    let relays: Vec<&Ship> = if observer_has_comms {
        sector
            .ships
            .iter()
            .filter(|s| {
                s.id != observer.id
                    && s.allegiance == observer.allegiance
                    && s.is_operational()
                    && !is_comm_blackout(sector, &s.position)
            })
            .collect()
    } else {
        Vec::new()
    };

    sector
        .ships
        .iter()
        .filter(|t| t.is_operational() && is_hostile(observer, t))
        .filter(|t| {
            can_see_entity(observer, *t, sector)
                || relays.iter().any(|r| can_see_entity(r, *t, sector))
        })
        .collect()
}
