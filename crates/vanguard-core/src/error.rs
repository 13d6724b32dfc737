//! Errors raised at the API boundary.
//!
//! In-turn failures (no energy, blocked move, destroyed weapon) are not
//! errors: they come back as outcome values with a log entry.

use thiserror::Error;

use crate::types::EntityId;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("player ship {0} is not present in the sector")]
    MissingPlayerShip(EntityId),
    #[error("energy allocation must sum to 100 (weapons {weapons}, shields {shields}, engines {engines})")]
    InvalidAllocation {
        weapons: u32,
        shields: u32,
        engines: u32,
    },
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
    #[error("state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results using GameError.
pub type GameResult<T> = Result<T, GameError>;
