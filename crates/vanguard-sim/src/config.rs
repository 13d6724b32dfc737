//! Engine configuration.

use serde::{Deserialize, Serialize};

use vanguard_core::constants::*;
use vanguard_core::GameResult;

/// Animation delay attached to each kind of step, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepDelays {
    pub player: u64,
    pub ai_ship: u64,
    pub point_defense: u64,
    pub projectiles: u64,
    pub end_of_turn: u64,
    #[serde(rename = "final")]
    pub final_state: u64,
}

impl Default for StepDelays {
    fn default() -> Self {
        Self {
            player: STEP_DELAY_PLAYER_MS,
            ai_ship: STEP_DELAY_AI_MS,
            point_defense: STEP_DELAY_POINT_DEFENSE_MS,
            projectiles: STEP_DELAY_PROJECTILE_MS,
            end_of_turn: STEP_DELAY_END_OF_TURN_MS,
            final_state: 0,
        }
    }
}

/// Configuration for the turn engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Prior turns kept for step-back.
    pub history_limit: usize,
    pub step_delays: StepDelays,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            history_limit: 20,
            step_delays: StepDelays::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
