//! Difficulty tiers and their static tuning table

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Named difficulty tier, fixed for the duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
    Hardcore,
}

/// Tunable constants for one tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Keeper displacement per tick while pursuing
    pub keeper_speed: f32,
    /// Detection meter growth per exposed tick
    pub detection_rate: f32,
    /// Time the player must survive to win
    pub survive_duration: Duration,
    /// Player's sight radius in night mode (renderer only, never gameplay)
    pub vision_radius: f32,
}

/// Unknown difficulty tag (closed table, always a caller bug)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty: {0:?}")]
pub struct UnknownDifficulty(pub String);

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Nightmare,
        Difficulty::Hardcore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Nightmare => "nightmare",
            Difficulty::Hardcore => "hardcore",
        }
    }

    pub fn profile(&self) -> DifficultyProfile {
        let (keeper_speed, detection_rate, survive_secs, vision_radius) = match self {
            Difficulty::Easy => (1.0, 1.0, 45, 250.0),
            Difficulty::Normal => (1.5, 2.0, 60, 200.0),
            Difficulty::Hard => (2.0, 3.0, 75, 150.0),
            Difficulty::Nightmare => (2.5, 4.0, 90, 120.0),
            Difficulty::Hardcore => (2.2, 3.5, 120, 140.0),
        };
        DifficultyProfile {
            keeper_speed,
            detection_rate,
            survive_duration: Duration::from_secs(survive_secs),
            vision_radius,
        }
    }

    /// Score multiplier for a won run
    pub fn score_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Normal => 2.0,
            Difficulty::Hard => 3.0,
            Difficulty::Nightmare => 4.0,
            Difficulty::Hardcore => 5.0,
        }
    }

    /// Number of keepers hunting the player
    pub fn keeper_count(&self) -> usize {
        match self {
            Difficulty::Hardcore => 2,
            _ => 1,
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            "nightmare" => Ok(Difficulty::Nightmare),
            "hardcore" => Ok(Difficulty::Hardcore),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DifficultyProfile {
    /// Reject non-finite or negative tuning values
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.keeper_speed.is_finite() || self.keeper_speed < 0.0 {
            return Err("keeper_speed must be finite and non-negative");
        }
        if !self.detection_rate.is_finite() || self.detection_rate < 0.0 {
            return Err("detection_rate must be finite and non-negative");
        }
        if !self.vision_radius.is_finite() || self.vision_radius < 0.0 {
            return Err("vision_radius must be finite and non-negative");
        }
        Ok(())
    }
}
