//! Hostility and threat scoring.

use vanguard_core::components::{Ship, ThreatContributor, ThreatInfo};
use vanguard_core::constants::THREAT_TOP_CONTRIBUTORS;
use vanguard_core::enums::Allegiance;
use vanguard_core::types::Position;

/// Whether `a` treats `b` as a legitimate target.
///
/// Allegiance decides for player, ally and enemy ships. Neutrals only
/// become targets (or attackers) after an exchange of fire recorded in
/// `last_attacker_id`.
pub fn is_hostile(a: &Ship, b: &Ship) -> bool {
    if a.id == b.id || a.allegiance.is_friendly_to(b.allegiance) {
        return false;
    }
    if a.allegiance.is_hostile_to(b.allegiance) {
        return true;
    }
    let involves_neutral = a.allegiance == Allegiance::Neutral || b.allegiance == Allegiance::Neutral;
    involves_neutral
        && (a.transient.last_attacker_id.as_deref() == Some(b.id.as_str())
            || b.transient.last_attacker_id.as_deref() == Some(a.id.as_str()))
}

/// Inverse-square threat of something at `to` as seen from `from`.
pub fn threat_score(from: &Position, to: &Position) -> f64 {
    let d = from.distance_to(to) as f64;
    1.0 / (d * d + 1.0)
}

/// Nearest candidate by Chebyshev distance, excluding `source` itself.
/// Ties keep the earliest candidate.
pub fn find_closest_target<'a, I>(source: &Ship, candidates: I) -> Option<&'a Ship>
where
    I: IntoIterator<Item = &'a Ship>,
{
    candidates
        .into_iter()
        .filter(|c| c.id != source.id)
        .fold(None, |best: Option<&'a Ship>, c| match best {
            Some(b) if b.position.distance_to(&source.position)
                <= c.position.distance_to(&source.position) =>
            {
                Some(b)
            }
            _ => Some(c),
        })
}

/// Threat summary: total pressure and the top contributors.
pub fn calculate_threat_info(ship: &Ship, threats: &[&Ship]) -> ThreatInfo {
    let mut scored: Vec<(&Ship, f64)> = threats
        .iter()
        .map(|t| (*t, threat_score(&ship.position, &t.position)))
        .collect();
    let total = scored.iter().map(|(_, s)| s).sum();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    let contributors = scored
        .into_iter()
        .take(THREAT_TOP_CONTRIBUTORS)
        .map(|(t, s)| ThreatContributor {
            id: t.id.clone(),
            name: t.name.clone(),
            score: (s * 100.0).round() / 100.0,
        })
        .collect();
    ThreatInfo {
        total,
        contributors,
    }
}
