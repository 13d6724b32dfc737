//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which side a ship fights for. Distinct from its faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Allegiance {
    Player,
    Ally,
    Neutral,
    Enemy,
}

impl Allegiance {
    /// Processing order within a turn: player, ally, neutral, enemy.
    pub fn turn_order(&self) -> u8 {
        match self {
            Allegiance::Player => 0,
            Allegiance::Ally => 1,
            Allegiance::Neutral => 2,
            Allegiance::Enemy => 3,
        }
    }

    /// Player and ally fight together against the enemy. Neutrals are
    /// nobody's target by default.
    pub fn is_hostile_to(&self, other: Allegiance) -> bool {
        use Allegiance::*;
        matches!(
            (self, other),
            (Player, Enemy) | (Ally, Enemy) | (Enemy, Player) | (Enemy, Ally)
        )
    }

    pub fn is_friendly_to(&self, other: Allegiance) -> bool {
        use Allegiance::*;
        self == &other || matches!((self, other), (Player, Ally) | (Ally, Player))
    }

    pub const ALL: [Allegiance; 4] = [
        Allegiance::Player,
        Allegiance::Ally,
        Allegiance::Neutral,
        Allegiance::Enemy,
    ];
}

/// Cultural identity of a ship; selects its AI doctrine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    Federation,
    Klingon,
    Romulan,
    Pirate,
    Independent,
    /// Unregistered vessels (freighters, unknown contacts). Uses the fallback doctrine.
    Unaligned,
}

impl Faction {
    pub fn name(&self) -> &'static str {
        match self {
            Faction::Federation => "Federation",
            Faction::Klingon => "Klingon",
            Faction::Romulan => "Romulan",
            Faction::Pirate => "Pirate",
            Faction::Independent => "Independent",
            Faction::Unaligned => "Unaligned",
        }
    }

    /// Default log colour for entries sourced from this faction.
    pub fn log_color(&self) -> &'static str {
        match self {
            Faction::Federation => "#4fc3f7",
            Faction::Klingon => "#e53935",
            Faction::Romulan => "#66bb6a",
            Faction::Pirate => "#ffb300",
            Faction::Independent => "#b0bec5",
            Faction::Unaligned => "#9e9e9e",
        }
    }
}

/// Damageable ship subsystems. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subsystem {
    Weapons,
    Engines,
    Shields,
    Transporter,
    PointDefense,
    Computer,
    LifeSupport,
    Shuttlecraft,
}

impl Subsystem {
    pub const ALL: [Subsystem; 8] = [
        Subsystem::Weapons,
        Subsystem::Engines,
        Subsystem::Shields,
        Subsystem::Transporter,
        Subsystem::PointDefense,
        Subsystem::Computer,
        Subsystem::LifeSupport,
        Subsystem::Shuttlecraft,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Subsystem::Weapons => "weapons",
            Subsystem::Engines => "engines",
            Subsystem::Shields => "shields",
            Subsystem::Transporter => "transporter",
            Subsystem::PointDefense => "point defense",
            Subsystem::Computer => "computer",
            Subsystem::LifeSupport => "life support",
            Subsystem::Shuttlecraft => "shuttlecraft",
        }
    }
}

/// Beam weapon families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamKind {
    Phaser,
    /// Slightly less accurate unless fitted to a Romulan hull.
    Disruptor,
    PlasmaCannon,
}

/// Torpedo warhead types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TorpedoType {
    Photon,
    Quantum,
    Plasma,
    HeavyPlasma,
    HeavyPhoton,
}

impl TorpedoType {
    /// Additive modifier to the range-based hit chance.
    pub fn accuracy_modifier(&self) -> f64 {
        match self {
            TorpedoType::Photon => 0.0,
            TorpedoType::Quantum => 0.15,
            TorpedoType::Plasma => -0.10,
            TorpedoType::HeavyPlasma => -0.15,
            TorpedoType::HeavyPhoton => -0.20,
        }
    }

    pub fn is_plasma(&self) -> bool {
        matches!(self, TorpedoType::Plasma | TorpedoType::HeavyPlasma)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TorpedoType::Photon => "photon torpedo",
            TorpedoType::Quantum => "quantum torpedo",
            TorpedoType::Plasma => "plasma torpedo",
            TorpedoType::HeavyPlasma => "heavy plasma torpedo",
            TorpedoType::HeavyPhoton => "heavy photon torpedo",
        }
    }
}

/// Per-turn tactical posture of an AI ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stance {
    Aggressive,
    Defensive,
    #[default]
    Balanced,
    Recovery,
    /// No contact, hunting the last known position of a lost enemy.
    Seeking,
    /// Cloaked and stalking.
    Prowling,
    /// Holding position to build up for a strike.
    Preparing,
}

/// Cloak state machine: Visible -> Cloaking -> Cloaked -> Decloaking -> Visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloakState {
    #[default]
    Visible,
    Cloaking,
    Cloaked,
    Decloaking,
}

impl CloakState {
    /// Cloaking, cloaked or decloaking: sensors cannot resolve the ship.
    pub fn is_concealed(&self) -> bool {
        !matches!(self, CloakState::Visible)
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self, CloakState::Cloaking | CloakState::Decloaking)
    }
}

/// What the damage-control teams are working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "subsystem")]
pub enum RepairTarget {
    Hull,
    Subsystem(Subsystem),
}

/// Log entry category, used by the presentation layer for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogCategory {
    Combat,
    Movement,
    Systems,
    Targeting,
    Ai,
    Special,
    Info,
}
