//! Entity components: ships, projectiles and the static furniture of a sector.
//!
//! These are plain data structs. Helpers here only read or clamp their own
//! fields; rules that touch more than one entity live in the engine.

use serde::{Deserialize, Serialize};

use crate::constants::{CLOAK_INSTABILITY_MAX, POINT_DEFENSE_RANGE_PENALTY};
use crate::enums::*;
use crate::error::{GameError, GameResult};
use crate::types::{EntityId, Gauge, Position};

/// Health of every ship subsystem. The key set is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsystems {
    pub weapons: Gauge,
    pub engines: Gauge,
    pub shields: Gauge,
    pub transporter: Gauge,
    pub point_defense: Gauge,
    pub computer: Gauge,
    pub life_support: Gauge,
    pub shuttlecraft: Gauge,
}

impl Subsystems {
    /// All subsystems at full health with the same maximum.
    pub fn uniform(max: f64) -> Self {
        Self {
            weapons: Gauge::full(max),
            engines: Gauge::full(max),
            shields: Gauge::full(max),
            transporter: Gauge::full(max),
            point_defense: Gauge::full(max),
            computer: Gauge::full(max),
            life_support: Gauge::full(max),
            shuttlecraft: Gauge::full(max),
        }
    }

    pub fn get(&self, subsystem: Subsystem) -> &Gauge {
        match subsystem {
            Subsystem::Weapons => &self.weapons,
            Subsystem::Engines => &self.engines,
            Subsystem::Shields => &self.shields,
            Subsystem::Transporter => &self.transporter,
            Subsystem::PointDefense => &self.point_defense,
            Subsystem::Computer => &self.computer,
            Subsystem::LifeSupport => &self.life_support,
            Subsystem::Shuttlecraft => &self.shuttlecraft,
        }
    }

    pub fn get_mut(&mut self, subsystem: Subsystem) -> &mut Gauge {
        match subsystem {
            Subsystem::Weapons => &mut self.weapons,
            Subsystem::Engines => &mut self.engines,
            Subsystem::Shields => &mut self.shields,
            Subsystem::Transporter => &mut self.transporter,
            Subsystem::PointDefense => &mut self.point_defense,
            Subsystem::Computer => &mut self.computer,
            Subsystem::LifeSupport => &mut self.life_support,
            Subsystem::Shuttlecraft => &mut self.shuttlecraft,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subsystem, &Gauge)> + '_ {
        Subsystem::ALL.iter().map(move |s| (*s, self.get(*s)))
    }

    /// Health fraction of one subsystem.
    pub fn fraction(&self, subsystem: Subsystem) -> f64 {
        self.get(subsystem).fraction()
    }

    /// Number of subsystems still above zero.
    pub fn operational_count(&self) -> usize {
        self.iter().filter(|(_, g)| !g.is_empty()).count()
    }

    /// The subsystem with the lowest health fraction, if any is damaged.
    pub fn most_damaged(&self) -> Option<(Subsystem, f64)> {
        self.iter()
            .filter(|(_, g)| !g.is_full())
            .map(|(s, g)| (s, g.fraction()))
            .fold(None, |best, (s, f)| match best {
                Some((_, bf)) if bf <= f => best,
                _ => Some((s, f)),
            })
    }

    pub fn zero_all(&mut self) {
        for s in Subsystem::ALL {
            self.get_mut(s).set(0.0);
        }
    }
}

/// Reactor output split. The three percentages always sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyAllocation {
    weapons: u32,
    shields: u32,
    engines: u32,
}

impl EnergyAllocation {
    pub fn new(weapons: u32, shields: u32, engines: u32) -> GameResult<Self> {
        if weapons + shields + engines != 100 {
            return Err(GameError::InvalidAllocation {
                weapons,
                shields,
                engines,
            });
        }
        Ok(Self {
            weapons,
            shields,
            engines,
        })
    }

    /// Const constructor for presets known to sum to 100.
    pub(crate) const fn preset(weapons: u32, shields: u32, engines: u32) -> Self {
        Self {
            weapons,
            shields,
            engines,
        }
    }

    pub const BALANCED: EnergyAllocation = EnergyAllocation::preset(40, 30, 30);
    pub const AGGRESSIVE: EnergyAllocation = EnergyAllocation::preset(60, 20, 20);
    pub const DEFENSIVE: EnergyAllocation = EnergyAllocation::preset(20, 50, 30);
    pub const FULL_ENGINES: EnergyAllocation = EnergyAllocation::preset(0, 0, 100);
    pub const SEEKING: EnergyAllocation = EnergyAllocation::preset(30, 30, 40);
    pub const PROWLING: EnergyAllocation = EnergyAllocation::preset(30, 20, 50);
    pub const PREPARING: EnergyAllocation = EnergyAllocation::preset(70, 10, 20);

    /// Re-check a value that arrived through deserialization.
    pub fn validate(self) -> GameResult<Self> {
        Self::new(self.weapons, self.shields, self.engines)
    }

    pub fn weapons(&self) -> u32 {
        self.weapons
    }

    pub fn shields(&self) -> u32 {
        self.shields
    }

    pub fn engines(&self) -> u32 {
        self.engines
    }
}

impl Default for EnergyAllocation {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// Cloaking device state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloakSystem {
    pub equipped: bool,
    pub state: CloakState,
    /// Turns left in Cloaking/Decloaking.
    pub transition_turns: u32,
    /// Chance per turn that the field holds, before instability.
    pub base_reliability: f64,
    /// Accumulated penalty from hits taken mid-transition.
    pub instability: f64,
    /// Turns before the cloak may be engaged again.
    pub cooldown: u32,
    /// Turns before shields may come back after a failure.
    pub shield_reactivation_delay: u32,
}

impl CloakSystem {
    pub fn none() -> Self {
        Self {
            equipped: false,
            state: CloakState::Visible,
            transition_turns: 0,
            base_reliability: 0.0,
            instability: 0.0,
            cooldown: 0,
            shield_reactivation_delay: 0,
        }
    }

    pub fn with_reliability(base_reliability: f64) -> Self {
        Self {
            equipped: true,
            base_reliability,
            ..Self::none()
        }
    }

    pub fn add_instability(&mut self, amount: f64) {
        self.instability = (self.instability + amount).min(CLOAK_INSTABILITY_MAX);
    }

    /// Whether an engage order would be accepted right now.
    pub fn can_engage(&self) -> bool {
        self.equipped && self.state == CloakState::Visible && self.cooldown == 0
    }
}

impl Default for CloakSystem {
    fn default() -> Self {
        Self::none()
    }
}

/// Damage-over-time warhead payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlasmaBurn {
    pub damage: f64,
    pub turns: u32,
}

/// Timed effects ticking at end of turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatusEffect {
    PlasmaBurn { damage: f64, turns_remaining: u32 },
}

/// Weapon lock continuity, feeding the focus-fire bonus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetingState {
    pub target_id: Option<EntityId>,
    pub subsystem: Option<Subsystem>,
    /// Consecutive turns this exact target/subsystem pair has been fired on.
    pub consecutive_turns: u32,
    pub last_fired_turn: Option<u32>,
}

impl TargetingState {
    /// Record a shot and return the updated consecutive-turn count.
    ///
    /// The count grows only when the same target and subsystem were fired on
    /// the immediately preceding turn. Repeat shots within a turn keep it.
    pub fn register_fire(
        &mut self,
        target_id: &str,
        subsystem: Option<Subsystem>,
        turn: u32,
    ) -> u32 {
        let same_lock =
            self.target_id.as_deref() == Some(target_id) && self.subsystem == subsystem;
        match (same_lock, self.last_fired_turn) {
            (true, Some(last)) if last == turn => {}
            (true, Some(last)) if last + 1 == turn => self.consecutive_turns += 1,
            _ => self.consecutive_turns = 1,
        }
        self.target_id = Some(target_id.to_string());
        self.subsystem = subsystem;
        self.last_fired_turn = Some(turn);
        self.consecutive_turns
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One contributor to a ship's threat summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatContributor {
    pub id: EntityId,
    pub name: String,
    /// Rounded to two decimals for display.
    pub score: f64,
}

/// Inverse-square threat pressure on a ship.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatInfo {
    pub total: f64,
    pub contributors: Vec<ThreatContributor>,
}

/// A hostile that dropped off sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenContact {
    pub id: EntityId,
    pub last_known: Position,
    pub turn_lost: u32,
}

/// Recomputed every turn; never meaningful across saves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransientState {
    pub threat_info: Option<ThreatInfo>,
    pub last_attacker_id: Option<EntityId>,
    pub last_attacker_position: Option<Position>,
    /// Turn of the last attack, so neutrals only retaliate briefly.
    pub last_attacked_turn: Option<u32>,
    /// Hostiles on sensors at the end of the previous turn.
    pub contacts: Vec<EntityId>,
    pub hidden_enemies: Vec<HiddenContact>,
}

/// Multi-turn prize-crew restoration of a captured derelict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureInfo {
    pub captor_id: EntityId,
    pub captor_faction: Faction,
    pub captor_allegiance: Allegiance,
    pub captor_log_color: String,
    pub repair_start_turn: u32,
    /// 0 for opportunistic AI captures, which complete the same turn.
    pub turns_to_repair: u32,
    pub dilithium_carried: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamWeapon {
    pub id: EntityId,
    pub name: String,
    pub kind: BeamKind,
    pub base_damage: f64,
    pub range: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorpedoLauncher {
    pub id: EntityId,
    pub name: String,
    pub torpedo_type: TorpedoType,
    pub damage: f64,
    /// Cells per turn.
    pub speed: u32,
    pub special: Option<PlasmaBurn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Weapon {
    Beam(BeamWeapon),
    Torpedo(TorpedoLauncher),
}

impl Weapon {
    pub fn id(&self) -> &str {
        match self {
            Weapon::Beam(b) => &b.id,
            Weapon::Torpedo(t) => &t.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Weapon::Beam(b) => &b.name,
            Weapon::Torpedo(t) => &t.name,
        }
    }
}

/// The principal mutable entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub id: EntityId,
    pub name: String,
    pub faction: Faction,
    pub allegiance: Allegiance,
    pub log_color: String,
    pub position: Position,

    pub hull: Gauge,
    pub shields: Gauge,
    pub subsystems: Subsystems,

    pub energy: Gauge,
    pub dilithium: Gauge,
    pub torpedoes: Gauge,
    pub security_teams: Gauge,
    pub crew_morale: Gauge,
    pub life_support_reserves: Gauge,
    pub allocation: EnergyAllocation,
    /// Crew/reactor quality multiplier on beam output.
    pub energy_modifier: f64,

    pub weapons: Vec<Weapon>,
    pub cloak: CloakSystem,
    pub status_effects: Vec<StatusEffect>,
    pub targeting: TargetingState,
    pub repair_target: Option<RepairTarget>,
    pub stance: Stance,

    pub red_alert: bool,
    pub evasive: bool,
    pub point_defense_enabled: bool,
    pub docked_with: Option<EntityId>,
    /// Turns until a retreating ship jumps out.
    pub retreat_countdown: Option<u32>,

    /// Turns elapsed since life support failed.
    pub life_support_failure_turns: Option<u32>,
    pub derelict: bool,
    pub capture_info: Option<CaptureInfo>,

    #[serde(default)]
    pub transient: TransientState,
}

impl Ship {
    /// A generic unarmed hull; templates layer weapons and stats on top.
    pub fn new(
        id: &str,
        name: &str,
        faction: Faction,
        allegiance: Allegiance,
        position: Position,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            faction,
            allegiance,
            log_color: faction.log_color().to_string(),
            position,
            hull: Gauge::full(100.0),
            shields: Gauge::full(50.0),
            subsystems: Subsystems::uniform(20.0),
            energy: Gauge::full(100.0),
            dilithium: Gauge::full(5.0),
            torpedoes: Gauge::full(0.0),
            security_teams: Gauge::full(2.0),
            crew_morale: Gauge::full(100.0),
            life_support_reserves: Gauge::full(10.0),
            allocation: EnergyAllocation::default(),
            energy_modifier: 1.0,
            weapons: Vec::new(),
            cloak: CloakSystem::none(),
            status_effects: Vec::new(),
            targeting: TargetingState::default(),
            repair_target: None,
            stance: Stance::default(),
            red_alert: false,
            evasive: false,
            point_defense_enabled: false,
            docked_with: None,
            retreat_countdown: None,
            life_support_failure_turns: None,
            derelict: false,
            capture_info: None,
            transient: TransientState::default(),
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.hull.current <= 0.0
    }

    /// Alive and crewed.
    pub fn is_operational(&self) -> bool {
        !self.is_destroyed() && !self.derelict
    }

    /// May take actions this turn.
    pub fn can_act(&self) -> bool {
        self.is_operational() && self.capture_info.is_none()
    }

    /// Weapons are offline while the cloak is up or changing.
    pub fn weapons_online(&self) -> bool {
        self.can_act()
            && !self.cloak.state.is_concealed()
            && !self.subsystems.weapons.is_empty()
            && self.docked_with.is_none()
    }

    pub fn hull_fraction(&self) -> f64 {
        self.hull.fraction()
    }

    pub fn shield_fraction(&self) -> f64 {
        self.shields.fraction()
    }

    pub fn weapon(&self, weapon_id: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.id() == weapon_id)
    }

    pub fn beam_weapons(&self) -> impl Iterator<Item = &BeamWeapon> + '_ {
        self.weapons.iter().filter_map(|w| match w {
            Weapon::Beam(b) => Some(b),
            Weapon::Torpedo(_) => None,
        })
    }

    pub fn torpedo_launchers(&self) -> impl Iterator<Item = &TorpedoLauncher> + '_ {
        self.weapons.iter().filter_map(|w| match w {
            Weapon::Torpedo(t) => Some(t),
            Weapon::Beam(_) => None,
        })
    }

    /// Beam range after the point-defense penalty.
    pub fn effective_beam_range(&self, beam: &BeamWeapon) -> i32 {
        if self.point_defense_enabled {
            (beam.range - POINT_DEFENSE_RANGE_PENALTY).max(1)
        } else {
            beam.range
        }
    }

    /// Longest nominal beam range, 0 if the ship has no beams.
    pub fn max_beam_range(&self) -> i32 {
        self.beam_weapons().map(|b| b.range).max().unwrap_or(0)
    }

    /// Sum of beam base damage; a crude measure of how dangerous a ship is.
    pub fn firepower(&self) -> f64 {
        self.beam_weapons().map(|b| b.base_damage).sum::<f64>()
            + self.torpedo_launchers().map(|t| t.damage).sum::<f64>() * 0.5
    }

    /// True when hull, shields or any subsystem is meaningfully below max.
    pub fn is_damaged(&self) -> bool {
        self.hull_fraction() < 0.9
            || self.shield_fraction() < 0.5
            || self.subsystems.iter().any(|(_, g)| g.fraction() < 0.9)
    }

    /// Hull or the worst subsystem, whichever is proportionally worse.
    pub fn most_urgent_repair(&self) -> Option<RepairTarget> {
        let hull = self.hull_fraction();
        match self.subsystems.most_damaged() {
            Some((s, f)) if f < hull => Some(RepairTarget::Subsystem(s)),
            _ if hull < 1.0 => Some(RepairTarget::Hull),
            Some((s, _)) => Some(RepairTarget::Subsystem(s)),
            None => None,
        }
    }
}

/// A torpedo in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorpedoProjectile {
    pub id: EntityId,
    pub source_id: EntityId,
    pub source_name: String,
    pub target_id: EntityId,
    pub allegiance: Allegiance,
    pub faction: Faction,
    pub position: Position,
    /// Every cell visited, launch cell first.
    pub path: Vec<Position>,
    pub speed: u32,
    pub torpedo_type: TorpedoType,
    pub damage: f64,
    pub special: Option<PlasmaBurn>,
    pub destroyed: bool,
}

impl TorpedoProjectile {
    pub fn launch_position(&self) -> Position {
        self.path.first().copied().unwrap_or(self.position)
    }

    /// Cells travelled since launch.
    pub fn travelled(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Stationary explosive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mine {
    pub id: EntityId,
    pub position: Position,
    pub damage: f64,
    pub faction: Faction,
    /// Factions whose sensors can see this mine.
    pub visible_to: Vec<Faction>,
}

impl Mine {
    pub fn is_visible_to(&self, faction: Faction) -> bool {
        self.faction == faction || self.visible_to.contains(&faction)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Starbase {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
    pub allegiance: Allegiance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidField {
    pub id: EntityId,
    pub cells: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    pub id: EntityId,
    pub position: Position,
    pub message: String,
}
