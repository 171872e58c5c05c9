//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - No randomness
//! - Stable keeper order
//! - No rendering, audio, logging or platform dependencies

pub mod arena;
pub mod autopilot;
pub mod difficulty;
pub mod state;
pub mod tick;

pub use arena::{Arena, ObstacleGrid, REFERENCE_TREES};
pub use difficulty::{Difficulty, DifficultyProfile, UnknownDifficulty};
pub use state::{GameEvent, Phase, RunConfig, RunOutcome, SimState};
pub use tick::{MovementIntent, StepError, TickResult, step, tick};
