//! Outcome recorder
//!
//! Consumes the terminal-outcome event of each run and keeps the player's
//! history, stats, achievements and leaderboard. Persistence failures are
//! logged and never reach back into the run that produced the outcome.

pub mod achievements;
pub mod history;
pub mod leaderboard;
pub mod stats;

pub use achievements::{AchievementId, Achievements};
pub use history::{GameRecord, History};
pub use leaderboard::{Leaderboard, LeaderboardEntry, PendingScore};
pub use stats::PlayerStats;

use crate::score::score;
use crate::sim::RunOutcome;
use crate::storage::{PersistError, Storage, load_or_default, save_json};

/// Anything that wants the terminal-outcome event
pub trait OutcomeSink {
    fn on_outcome(&mut self, outcome: &RunOutcome);
}

impl<T: OutcomeSink + ?Sized> OutcomeSink for &mut T {
    fn on_outcome(&mut self, outcome: &RunOutcome) {
        (**self).on_outcome(outcome);
    }
}

impl OutcomeSink for Vec<RunOutcome> {
    fn on_outcome(&mut self, outcome: &RunOutcome) {
        self.push(*outcome);
    }
}

impl OutcomeSink for () {
    fn on_outcome(&mut self, _outcome: &RunOutcome) {}
}

/// What recording one outcome produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordReport {
    /// Only for won runs
    pub score: Option<u64>,
    pub unlocked: Vec<AchievementId>,
}

/// Everything persisted about the player
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub stats: PlayerStats,
    pub history: History,
    pub achievements: Achievements,
    pub leaderboard: Leaderboard,
    pub pending: Option<PendingScore>,
}

impl Profile {
    const STATS_KEY: &'static str = "forest_keeper_stats";
    const HISTORY_KEY: &'static str = "forest_keeper_history";
    const ACHIEVEMENTS_KEY: &'static str = "forest_keeper_achievements";
    const LEADERBOARD_KEY: &'static str = "forest_keeper_leaderboard";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &RunOutcome, timestamp: f64) -> RecordReport {
        self.history.push(GameRecord::from_outcome(outcome, timestamp));
        self.stats.record(outcome);

        // A loss leaves an unsubmitted win waiting for its name
        let score = score(outcome);
        if let Some(score) = score {
            self.pending = Some(PendingScore {
                time: outcome.elapsed_seconds,
                difficulty: outcome.difficulty,
                night_mode: outcome.night_mode,
                score,
            });
        }

        let unlocked = self.achievements.update(&self.stats);
        RecordReport { score, unlocked }
    }

    /// Move the pending score onto the leaderboard under `player_name`
    pub fn submit(&mut self, player_name: &str, timestamp: f64) -> Option<usize> {
        let pending = self.pending.take()?;
        let rank = self.leaderboard.add(pending.into_entry(player_name, timestamp));
        if let Some(rank) = rank {
            log::info!("{} scored {} (rank {})", player_name, pending.score, rank);
        }
        rank
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        let profile = Self {
            stats: load_or_default(storage, Self::STATS_KEY),
            history: load_or_default(storage, Self::HISTORY_KEY),
            achievements: load_or_default(storage, Self::ACHIEVEMENTS_KEY),
            leaderboard: load_or_default(storage, Self::LEADERBOARD_KEY),
            pending: None,
        };
        log::info!(
            "Loaded profile: {} games, {} leaderboard entries",
            profile.stats.games_played,
            profile.leaderboard.entries.len()
        );
        profile
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<(), PersistError> {
        save_json(storage, Self::STATS_KEY, &self.stats)?;
        save_json(storage, Self::HISTORY_KEY, &self.history)?;
        save_json(storage, Self::ACHIEVEMENTS_KEY, &self.achievements)?;
        save_json(storage, Self::LEADERBOARD_KEY, &self.leaderboard)?;
        Ok(())
    }
}

/// Records outcomes into a `Profile` and persists it after each run
pub struct PersistentRecorder<S: Storage> {
    profile: Profile,
    storage: S,
    last_report: Option<RecordReport>,
}

impl<S: Storage> PersistentRecorder<S> {
    pub fn new(storage: S) -> Self {
        let profile = Profile::load(&storage);
        Self {
            profile,
            storage,
            last_report: None,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn last_report(&self) -> Option<&RecordReport> {
        self.last_report.as_ref()
    }

    pub fn submit(&mut self, player_name: &str) -> Option<usize> {
        let rank = self.profile.submit(player_name, now_ms());
        self.persist();
        rank
    }

    pub fn clear_history(&mut self) {
        self.profile.clear_history();
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(e) = self.profile.save(&mut self.storage) {
            log::warn!("Failed to save profile: {}", e);
        }
    }
}

impl<S: Storage> OutcomeSink for PersistentRecorder<S> {
    fn on_outcome(&mut self, outcome: &RunOutcome) {
        let report = self.profile.record(outcome, now_ms());
        for id in &report.unlocked {
            log::info!("Achievement unlocked: {}", id.title());
        }
        self.last_report = Some(report);
        self.persist();
    }
}

/// Wall-clock Unix time in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}
