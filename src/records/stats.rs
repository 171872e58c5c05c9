//! Lifetime player statistics

use serde::{Deserialize, Serialize};

use crate::sim::{Difficulty, RunOutcome};

/// Max detection below this makes a won run "perfect"
pub const PERFECT_RUN_DETECTION: f32 = 10.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub games_played: u32,
    pub games_won: u32,
    /// Seconds across all runs
    pub total_time: f64,
    /// Longest won run in seconds (0 = none yet)
    pub best_time: f64,
    pub easy_wins: u32,
    pub normal_wins: u32,
    pub hard_wins: u32,
    pub nightmare_wins: u32,
    pub hardcore_wins: u32,
    pub night_wins: u32,
    pub perfect_runs: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl PlayerStats {
    pub fn record(&mut self, outcome: &RunOutcome) {
        let won = outcome.survived;
        let time = outcome.elapsed_seconds;

        self.games_played += 1;
        self.total_time += time;

        if won {
            self.games_won += 1;
            if self.best_time == 0.0 || time > self.best_time {
                self.best_time = time;
            }
            *self.wins_mut(outcome.difficulty) += 1;
            if outcome.night_mode {
                self.night_wins += 1;
            }
            if outcome.max_detection_reached < PERFECT_RUN_DETECTION {
                self.perfect_runs += 1;
            }
            self.current_streak += 1;
        } else {
            self.current_streak = 0;
        }
        self.best_streak = self.best_streak.max(self.current_streak);
    }

    pub fn wins(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy_wins,
            Difficulty::Normal => self.normal_wins,
            Difficulty::Hard => self.hard_wins,
            Difficulty::Nightmare => self.nightmare_wins,
            Difficulty::Hardcore => self.hardcore_wins,
        }
    }

    fn wins_mut(&mut self, difficulty: Difficulty) -> &mut u32 {
        match difficulty {
            Difficulty::Easy => &mut self.easy_wins,
            Difficulty::Normal => &mut self.normal_wins,
            Difficulty::Hard => &mut self.hard_wins,
            Difficulty::Nightmare => &mut self.nightmare_wins,
            Difficulty::Hardcore => &mut self.hardcore_wins,
        }
    }

    /// Percentage of runs won
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64 * 100.0
        }
    }
}
