//! Score leaderboard
//!
//! Top 100 won runs, sorted by score descending. Ties keep insertion order.

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// Maximum number of entries to keep
pub const MAX_LEADERBOARD_ENTRIES: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub night_mode: bool,
    /// Seconds survived
    pub time: f64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
    pub score: u64,
}

/// Score of a won run waiting for the player to enter a name
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingScore {
    pub time: f64,
    pub difficulty: Difficulty,
    pub night_mode: bool,
    pub score: u64,
}

impl PendingScore {
    pub fn into_entry(self, player_name: &str, timestamp: f64) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: player_name.to_string(),
            difficulty: self.difficulty,
            night_mode: self.night_mode,
            time: self.time,
            timestamp,
            score: self.score,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Index a score would be inserted at, after any equal scores.
    /// None once that index falls off the end of a full board.
    fn slot(&self, score: u64) -> Option<usize> {
        let index = self.entries.partition_point(|e| e.score >= score);
        (index < MAX_LEADERBOARD_ENTRIES).then_some(index)
    }

    pub fn qualifies(&self, score: u64) -> bool {
        self.slot(score).is_some()
    }

    /// 1-based rank a score would take
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        self.slot(score).map(|index| index + 1)
    }

    /// Insert an entry and return its 1-based rank
    pub fn add(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let index = self.slot(entry.score)?;
        self.entries.insert(index, entry);
        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);
        Some(index + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Entries for one tier, in board order
    pub fn filtered(&self, difficulty: Difficulty) -> impl Iterator<Item = &LeaderboardEntry> {
        self.entries.iter().filter(move |e| e.difficulty == difficulty)
    }
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn relative_date(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 1000.0 / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: name.to_string(),
            difficulty: Difficulty::Normal,
            night_mode: false,
            time: 60.0,
            timestamp: 0.0,
            score,
        }
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add(entry("a", 100)), Some(1));
        assert_eq!(board.add(entry("b", 300)), Some(1));
        assert_eq!(board.add(entry("c", 100)), Some(3));
        let names: Vec<_> = board.entries.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert_eq!(board.top_score(), Some(300));
    }

    #[test]
    fn test_capped_at_max() {
        let mut board = Leaderboard::new();
        for i in 0..MAX_LEADERBOARD_ENTRIES as u64 {
            board.add(entry("p", 1000 + i));
        }
        assert!(!board.qualifies(1000));
        assert_eq!(board.potential_rank(1000), None);
        assert_eq!(board.potential_rank(1001), Some(MAX_LEADERBOARD_ENTRIES));
        assert_eq!(board.add(entry("late", 500)), None);
        assert_eq!(board.potential_rank(5000), Some(1));
        assert_eq!(board.add(entry("best", 5000)), Some(1));
        assert_eq!(board.entries.len(), MAX_LEADERBOARD_ENTRIES);
        assert_eq!(board.entries.last().unwrap().score, 1001);
    }

    #[test]
    fn test_filter_by_difficulty() {
        let mut board = Leaderboard::new();
        board.add(entry("n", 10));
        let mut hard = entry("h", 20);
        hard.difficulty = Difficulty::Hard;
        board.add(hard);
        assert_eq!(board.filtered(Difficulty::Hard).count(), 1);
        assert_eq!(board.filtered(Difficulty::Easy).count(), 0);
    }

    #[test]
    fn test_relative_date() {
        let now = 10.0 * 86_400_000.0;
        assert_eq!(relative_date(now - 5_000.0, now), "Just now");
        assert_eq!(relative_date(now - 61_000.0, now), "1 min ago");
        assert_eq!(relative_date(now - 3.0 * 3_600_000.0, now), "3 hours ago");
        assert_eq!(relative_date(now - 86_400_000.0, now), "Yesterday");
        assert_eq!(relative_date(now - 9.0 * 86_400_000.0, now), "9 days ago");
    }
}
