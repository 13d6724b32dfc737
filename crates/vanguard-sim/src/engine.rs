//! Turn engine: the core of the game.
//!
//! `TurnEngine` owns the current `GameState`, the AI session, the faction
//! director and the seeded RNG. `end_turn` resolves one turn on a working
//! copy and returns the ordered list of intermediate states for replay.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use vanguard_ai::{AiSession, Director};
use vanguard_core::commands::PlayerTurnActions;
use vanguard_core::state::GameState;
use vanguard_core::types::EntityId;

use crate::config::SimConfig;
use crate::log::event;
use crate::systems;

/// What a step shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "ship_id")]
pub enum StepKind {
    Player,
    AiShip(EntityId),
    PointDefense,
    Projectiles,
    EndOfTurn,
    Final,
}

/// One replayable intermediate state of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnStep {
    pub kind: StepKind,
    pub state: GameState,
    pub delay_ms: u64,
}

/// Everything needed to rewind one turn exactly.
#[derive(Debug, Clone)]
struct Snapshot {
    state: GameState,
    session: AiSession,
    rng: ChaCha8Rng,
}

/// The turn engine. Owns the game state and all turn-spanning memory.
pub struct TurnEngine {
    state: GameState,
    session: AiSession,
    director: Director,
    rng: ChaCha8Rng,
    config: SimConfig,
    history: VecDeque<Snapshot>,
}

impl TurnEngine {
    pub fn new(state: GameState, config: SimConfig) -> Self {
        Self::with_director(state, config, Director::default())
    }

    /// Engine with a custom strategy registry.
    pub fn with_director(state: GameState, config: SimConfig, director: Director) -> Self {
        Self {
            state,
            session: AiSession::new(),
            director,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            history: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn session(&self) -> &AiSession {
        &self.session
    }

    /// Turns available to `step_back`.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Resolve one turn and return its steps. The last step is the new
    /// current state. A finished game returns a single unchanged step.
    pub fn end_turn(&mut self, actions: &PlayerTurnActions) -> Vec<TurnStep> {
        if self.state.game_over {
            return vec![self.step(StepKind::Final, &self.state, self.config.step_delays.final_state)];
        }

        self.remember();
        let mut working = self.state.clone();
        let steps = self.run_phases(&mut working, actions);
        self.state = working;
        steps
    }

    /// Resolve one turn and return only the final state.
    pub fn resolve_turn(&mut self, actions: &PlayerTurnActions) -> &GameState {
        self.end_turn(actions);
        &self.state
    }

    /// Restore the state before the last turn. Returns false with no history.
    pub fn step_back(&mut self) -> bool {
        let Some(snapshot) = self.history.pop_back() else {
            return false;
        };
        self.state = snapshot.state;
        self.session = snapshot.session;
        self.rng = snapshot.rng;
        info!(turn = self.state.turn, "stepped back");
        true
    }

    fn remember(&mut self) {
        if self.config.history_limit == 0 {
            return;
        }
        self.history.push_back(Snapshot {
            state: self.state.clone(),
            session: self.session.clone(),
            rng: self.rng.clone(),
        });
        while self.history.len() > self.config.history_limit {
            self.history.pop_front();
        }
    }

    fn step(&self, kind: StepKind, state: &GameState, delay_ms: u64) -> TurnStep {
        TurnStep {
            kind,
            state: state.clone(),
            delay_ms,
        }
    }

    /// Run all phases in order on the working copy.
    fn run_phases(&mut self, state: &mut GameState, actions: &PlayerTurnActions) -> Vec<TurnStep> {
        let delays = self.config.step_delays;
        let mut steps = Vec::new();
        info!(turn = state.turn, "turn begins");

        // 1. Reset per-turn transients
        state.combat_effects.clear();
        state.turn_events.clear();
        event(state, format!("TURN {}", state.turn));

        // 2. Player orders
        systems::player::run(state, actions, &mut self.rng);
        steps.push(self.step(StepKind::Player, state, delays.player));

        // 3. AI ships in allegiance order, one squadron vote per allegiance
        let mut voted = Vec::new();
        for (allegiance, ship_id) in systems::ai_turn::turn_order(state) {
            if !voted.contains(&allegiance) {
                self.session.coordinate(allegiance, &state.sector);
                voted.push(allegiance);
            }
            let Some(plan) = systems::ai_turn::plan_for(
                state,
                &ship_id,
                &self.session,
                &self.director,
                &mut self.rng,
            ) else {
                continue;
            };
            systems::ai_turn::apply_plan(state, &plan, &mut self.rng);
            steps.push(self.step(StepKind::AiShip(ship_id), state, delays.ai_ship));
        }

        // 4. Point defense
        if systems::point_defense::run(state, &mut self.rng) > 0 {
            steps.push(self.step(StepKind::PointDefense, state, delays.point_defense));
        }

        // 5. Torpedo flight
        if systems::projectiles::run(state, &mut self.rng) {
            steps.push(self.step(StepKind::Projectiles, state, delays.projectiles));
        }

        // 6. End-of-turn systems
        systems::end_of_turn::run(state, &mut self.rng);
        steps.push(self.step(StepKind::EndOfTurn, state, delays.end_of_turn));

        // 7. Cleanup and victory check
        systems::cleanup::run(state);
        self.session.end_turn();
        state.turn += 1;
        steps.push(self.step(StepKind::Final, state, delays.final_state));
        steps
    }
}
