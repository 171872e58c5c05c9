//! Run state and core simulation types
//!
//! `SimState` is replaced wholesale every tick; readers only ever see a
//! complete snapshot.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use crate::consts::*;

/// Lifecycle of one run. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    Running,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Settings chosen before the run starts, immutable afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunConfig {
    pub difficulty: Difficulty,
    pub night_mode: bool,
}

/// Terminal-outcome event, emitted exactly once per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub survived: bool,
    pub elapsed_seconds: f64,
    pub max_detection_reached: f32,
    pub difficulty: Difficulty,
    pub night_mode: bool,
}

/// Notable transitions within a tick, for the audio/HUD collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player entered cover this tick
    Hid,
    /// Detection crossed the danger threshold upward
    Danger,
    Caught,
    Escaped,
}

/// Complete run state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub player_pos: Vec2,
    /// Stable order for rendering
    pub keeper_positions: Vec<Vec2>,
    pub hidden: bool,
    /// In [0, 100]
    pub detection_level: f32,
    /// High-water mark of `detection_level`
    pub max_detection_reached: f32,
    /// Ticks processed while running
    pub ticks: u64,
    /// Elapsed run time; exactly `ticks * tick duration`
    pub elapsed: Duration,
    pub phase: Phase,
    pub config: RunConfig,
}

impl SimState {
    /// Fresh, not yet started run with everyone at their start corners
    pub fn new(config: RunConfig) -> Self {
        let starts = [KEEPER_START, SECOND_KEEPER_START];
        let keeper_positions = starts
            .iter()
            .take(config.difficulty.keeper_count())
            .map(|&(x, y)| Vec2::new(x, y))
            .collect();
        Self {
            player_pos: Vec2::new(PLAYER_START.0, PLAYER_START.1),
            keeper_positions,
            hidden: false,
            detection_level: 0.0,
            max_detection_reached: 0.0,
            ticks: 0,
            elapsed: Duration::ZERO,
            phase: Phase::NotStarted,
            config,
        }
    }

    /// Start a run: `NotStarted -> Running`. Any other phase is returned as-is.
    pub fn start(mut self) -> Self {
        if self.phase == Phase::NotStarted {
            self.phase = Phase::Running;
        }
        self
    }

    /// Shorthand for `SimState::new(config).start()`
    pub fn start_run(config: RunConfig) -> Self {
        Self::new(config).start()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn night_mode(&self) -> bool {
        self.config.night_mode
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn player_center(&self) -> Vec2 {
        crate::sprite_center(self.player_pos, PLAYER_SIZE)
    }

    /// Distance from the player to the closest keeper
    pub fn nearest_keeper_distance(&self) -> Option<f32> {
        self.keeper_positions
            .iter()
            .map(|k| self.player_pos.distance(*k))
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Outcome event for a terminal state
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.phase.is_terminal().then(|| RunOutcome {
            survived: self.phase == Phase::Won,
            elapsed_seconds: self.elapsed_seconds(),
            max_detection_reached: self.max_detection_reached,
            difficulty: self.config.difficulty,
            night_mode: self.config.night_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_layout() {
        let state = SimState::new(RunConfig::default());
        assert_eq!(state.phase, Phase::NotStarted);
        assert_eq!(state.player_pos, Vec2::new(50.0, 50.0));
        assert_eq!(state.keeper_positions, vec![Vec2::new(700.0, 500.0)]);
        assert_eq!(state.detection_level, 0.0);
        assert_eq!(state.elapsed, Duration::ZERO);
        assert!(state.outcome().is_none());
    }

    #[test]
    fn test_hardcore_spawns_two_keepers() {
        let state = SimState::start_run(RunConfig {
            difficulty: Difficulty::Hardcore,
            night_mode: true,
        });
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.keeper_positions.len(), 2);
    }

    #[test]
    fn test_start_does_not_revive_terminal_state() {
        let mut state = SimState::start_run(RunConfig::default());
        state.phase = Phase::Lost;
        assert_eq!(state.start().phase, Phase::Lost);
    }

    #[test]
    fn test_outcome_for_terminal_state() {
        let mut state = SimState::start_run(RunConfig::default());
        state.phase = Phase::Won;
        state.elapsed = Duration::from_millis(61_500);
        state.max_detection_reached = 12.0;
        let outcome = state.outcome().unwrap();
        assert!(outcome.survived);
        assert_eq!(outcome.elapsed_seconds, 61.5);
        assert_eq!(outcome.difficulty, Difficulty::Normal);
    }
}
