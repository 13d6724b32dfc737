//! Turn phases.
//!
//! Each phase is a function over `&mut GameState` called by the engine in a
//! fixed order. Phases hold no state of their own; everything lives in the
//! game state, the AI session or the engine's RNG.

pub mod ai_turn;
pub mod cleanup;
pub mod end_of_turn;
pub mod movement;
pub mod player;
pub mod point_defense;
pub mod projectiles;
