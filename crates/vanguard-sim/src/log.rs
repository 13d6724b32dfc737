//! Narrative log and turn-event trace.
//!
//! Every resolved action leaves a `LogEntry` for the player and a terse
//! `turn_events` line for replay tooling. Event lines are mirrored to
//! `tracing` at debug level.

use tracing::debug;

use vanguard_core::components::Ship;
use vanguard_core::enums::{Faction, LogCategory};
use vanguard_core::events::LogEntry;
use vanguard_core::state::GameState;

const SYSTEM_SOURCE_ID: &str = "sector";
const SYSTEM_COLOR: &str = "#9ca3af";

/// Attribution for a log line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSource {
    pub id: String,
    pub name: String,
    pub faction: Faction,
    pub color: String,
    pub is_player: bool,
}

impl LogSource {
    pub fn from_ship(ship: &Ship, player_id: &str) -> Self {
        Self {
            id: ship.id.clone(),
            name: ship.name.clone(),
            faction: ship.faction,
            color: ship.log_color.clone(),
            is_player: ship.id == player_id,
        }
    }

    /// Environment and engine messages.
    pub fn system() -> Self {
        Self {
            id: SYSTEM_SOURCE_ID.to_string(),
            name: "Sector".to_string(),
            faction: Faction::Unaligned,
            color: SYSTEM_COLOR.to_string(),
            is_player: false,
        }
    }
}

pub fn push_log(
    state: &mut GameState,
    source: LogSource,
    category: LogCategory,
    message: impl Into<String>,
) {
    let turn = state.turn;
    state.logs.push(LogEntry {
        source_id: source.id,
        source_name: source.name,
        faction: source.faction,
        message: message.into(),
        category,
        color: source.color,
        is_player_source: source.is_player,
        turn,
    });
}

/// Log attributed to a ship. Falls back to the sector when the ship is gone.
pub fn ship_log(state: &mut GameState, ship_id: &str, category: LogCategory, message: impl Into<String>) {
    let source = state
        .sector
        .ship(ship_id)
        .map(|s| LogSource::from_ship(s, &state.player.ship_id))
        .unwrap_or_else(LogSource::system);
    push_log(state, source, category, message);
}

/// Several lines from one ship, e.g. the `logs` of an outcome.
pub fn ship_logs(state: &mut GameState, ship_id: &str, category: LogCategory, messages: Vec<String>) {
    for message in messages {
        ship_log(state, ship_id, category, message);
    }
}

pub fn system_log(state: &mut GameState, category: LogCategory, message: impl Into<String>) {
    push_log(state, LogSource::system(), category, message);
}

/// Append a machine-readable trace line.
pub fn event(state: &mut GameState, line: impl Into<String>) {
    let line = line.into();
    debug!(turn = state.turn, "{line}");
    state.turn_events.push(line);
}
