//! Run history, newest first

use serde::{Deserialize, Serialize};

use crate::sim::{Difficulty, RunOutcome};

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub difficulty: Difficulty,
    pub night_mode: bool,
    /// Seconds survived
    pub time: f64,
    pub survived: bool,
    /// Unix timestamp (ms)
    pub timestamp: f64,
    pub max_detection: f32,
}

impl GameRecord {
    pub fn from_outcome(outcome: &RunOutcome, timestamp: f64) -> Self {
        Self {
            difficulty: outcome.difficulty,
            night_mode: outcome.night_mode,
            time: outcome.elapsed_seconds,
            survived: outcome.survived,
            timestamp,
            max_detection: outcome.max_detection_reached,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub entries: Vec<GameRecord>,
}

impl History {
    pub fn push(&mut self, record: GameRecord) {
        self.entries.insert(0, record);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn latest(&self) -> Option<&GameRecord> {
        self.entries.first()
    }
}
