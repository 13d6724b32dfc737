//! Core types and definitions for the VANGUARD turn engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, commands, state, events, errors and constants.
//! It holds no engine logic and no randomness.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::{GameError, GameResult};
