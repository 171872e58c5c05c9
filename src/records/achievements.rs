//! Achievements unlocked from lifetime stats
//!
//! Unlocks are sticky: once earned they stay even if the stat that earned
//! them would no longer qualify.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::stats::PlayerStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstWin,
    Veteran,
    Master,
    Speedrunner,
    Survivor,
    EasyMaster,
    NormalMaster,
    HardMaster,
    NightmareMaster,
    HardcoreMaster,
    NightOwl,
    Ghost,
    Unstoppable,
}

impl AchievementId {
    pub const ALL: [AchievementId; 13] = [
        AchievementId::FirstWin,
        AchievementId::Veteran,
        AchievementId::Master,
        AchievementId::Speedrunner,
        AchievementId::Survivor,
        AchievementId::EasyMaster,
        AchievementId::NormalMaster,
        AchievementId::HardMaster,
        AchievementId::NightmareMaster,
        AchievementId::HardcoreMaster,
        AchievementId::NightOwl,
        AchievementId::Ghost,
        AchievementId::Unstoppable,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AchievementId::FirstWin => "First Win",
            AchievementId::Veteran => "Veteran",
            AchievementId::Master => "Master",
            AchievementId::Speedrunner => "Speedrunner",
            AchievementId::Survivor => "Survivor",
            AchievementId::EasyMaster => "Rookie",
            AchievementId::NormalMaster => "Seasoned",
            AchievementId::HardMaster => "Pro",
            AchievementId::NightmareMaster => "Legend",
            AchievementId::HardcoreMaster => "Madman",
            AchievementId::NightOwl => "Night Owl",
            AchievementId::Ghost => "Ghost",
            AchievementId::Unstoppable => "Unstoppable",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AchievementId::FirstWin => "Win your first game",
            AchievementId::Veteran => "Play 10 games",
            AchievementId::Master => "Win 5 games",
            AchievementId::Speedrunner => "Win a run lasting 45 seconds or less",
            AchievementId::Survivor => "Last 90 seconds",
            AchievementId::EasyMaster => "Win on easy",
            AchievementId::NormalMaster => "Win on normal",
            AchievementId::HardMaster => "Win on hard",
            AchievementId::NightmareMaster => "Win on nightmare",
            AchievementId::HardcoreMaster => "Win on hardcore",
            AchievementId::NightOwl => "Win at night",
            AchievementId::Ghost => "Win without being noticed",
            AchievementId::Unstoppable => "Win 3 times on hard or nightmare",
        }
    }

    pub fn is_earned(&self, s: &PlayerStats) -> bool {
        match self {
            AchievementId::FirstWin => s.games_won >= 1,
            AchievementId::Veteran => s.games_played >= 10,
            AchievementId::Master => s.games_won >= 5,
            AchievementId::Speedrunner => s.best_time > 0.0 && s.best_time <= 45.0,
            AchievementId::Survivor => s.best_time >= 90.0,
            AchievementId::EasyMaster => s.easy_wins >= 1,
            AchievementId::NormalMaster => s.normal_wins >= 1,
            AchievementId::HardMaster => s.hard_wins >= 1,
            AchievementId::NightmareMaster => s.nightmare_wins >= 1,
            AchievementId::HardcoreMaster => s.hardcore_wins >= 1,
            AchievementId::NightOwl => s.night_wins >= 1,
            AchievementId::Ghost => s.perfect_runs >= 1,
            AchievementId::Unstoppable => s.hard_wins + s.nightmare_wins >= 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Achievements {
    pub unlocked: BTreeSet<AchievementId>,
}

impl Achievements {
    /// Unlock everything `stats` now qualifies for; returns the new ones
    pub fn update(&mut self, stats: &PlayerStats) -> Vec<AchievementId> {
        let mut fresh = Vec::new();
        for id in AchievementId::ALL {
            if !self.unlocked.contains(&id) && id.is_earned(stats) {
                self.unlocked.insert(id);
                fresh.push(id);
            }
        }
        fresh
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.contains(&id)
    }

    pub fn count(&self) -> usize {
        self.unlocked.len()
    }
}
