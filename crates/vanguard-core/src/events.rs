//! Structured log entries and animation cues emitted during a turn.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, Position};

/// A narrative log line attributed to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub source_id: EntityId,
    pub source_name: String,
    pub faction: Faction,
    pub message: String,
    pub category: LogCategory,
    pub color: String,
    pub is_player_source: bool,
    pub turn: u32,
}

/// Visual cues for the presentation layer. Cleared at the start of every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEffect {
    Beam {
        source_id: EntityId,
        target_id: EntityId,
        from: Position,
        to: Position,
        kind: BeamKind,
        hit: bool,
    },
    TorpedoLaunch {
        torpedo_id: EntityId,
        source_id: EntityId,
        position: Position,
    },
    TorpedoImpact {
        torpedo_id: EntityId,
        target_id: EntityId,
        position: Position,
        hit: bool,
    },
    PointDefense {
        ship_id: EntityId,
        torpedo_id: EntityId,
        from: Position,
        to: Position,
        hit: bool,
    },
    MineDetonation {
        mine_id: EntityId,
        position: Position,
    },
    Explosion {
        ship_id: EntityId,
        position: Position,
    },
    Ram {
        rammer_id: EntityId,
        target_id: EntityId,
        position: Position,
    },
    /// Cloak field flickers, engages or collapses.
    CloakFlicker {
        ship_id: EntityId,
        position: Position,
        state: CloakState,
    },
}
