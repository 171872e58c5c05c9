//! Player preferences
//!
//! Persisted separately from the profile. The run configuration is read
//! from here before a run starts and is frozen for its duration.

use serde::{Deserialize, Serialize};

use crate::sim::{Difficulty, RunConfig};
use crate::storage::{PersistError, Storage, load_or_default, save_json};

/// Longest accepted leaderboard name
pub const MAX_NAME_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Run ===
    pub difficulty: Difficulty,
    pub night_mode: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,

    // === Leaderboard ===
    /// Last name entered, prefilled next time
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            night_mode: false,
            master_volume: 0.8,
            muted: false,
            player_name: String::new(),
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "forest_keeper_settings";

    /// Configuration for the next run
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            difficulty: self.difficulty,
            night_mode: self.night_mode,
        }
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = if vol.is_finite() { vol.clamp(0.0, 1.0) } else { 0.0 };
    }

    /// Volume actually applied (respects mute)
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Trimmed, length-capped name; None if blank
    pub fn set_player_name(&mut self, name: &str) -> Option<&str> {
        let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
        if name.is_empty() {
            return None;
        }
        self.player_name = name;
        Some(&self.player_name)
    }

    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        load_or_default(storage, Self::STORAGE_KEY)
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<(), PersistError> {
        save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_run_config_from_settings() {
        let settings = Settings {
            difficulty: Difficulty::Nightmare,
            night_mode: true,
            ..Default::default()
        };
        assert_eq!(
            settings.run_config(),
            RunConfig {
                difficulty: Difficulty::Nightmare,
                night_mode: true
            }
        );
    }

    #[test]
    fn test_volume_clamped_and_muted() {
        let mut settings = Settings::default();
        settings.set_master_volume(3.0);
        assert_eq!(settings.effective_volume(), 1.0);
        settings.set_master_volume(f32::NAN);
        assert_eq!(settings.master_volume, 0.0);
        settings.set_master_volume(0.5);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_player_name_rules() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_player_name("   "), None);
        assert_eq!(settings.set_player_name("  Дима  "), Some("Дима"));
        let long = "x".repeat(40);
        assert_eq!(settings.set_player_name(&long).map(str::len), Some(MAX_NAME_LEN));
    }

    #[test]
    fn test_save_and_load() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            difficulty: Difficulty::Hardcore,
            ..Default::default()
        };
        settings.save(&mut storage).unwrap();
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_unknown_difficulty_in_storage_falls_back() {
        let mut storage = MemoryStorage::new();
        storage
            .set("forest_keeper_settings", r#"{"difficulty":"insane"}"#)
            .unwrap();
        assert_eq!(Settings::load(&storage), Settings::default());
    }
}
