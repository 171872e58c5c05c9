//! Forest Keeper - a real-time 2D stealth-evasion game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, hiding, pursuit, detection)
//! - `driver`: Fixed-interval scheduler that feeds the simulation
//! - `input`: Keyboard/touch reduction into a movement intent
//! - `records`: Outcome recorder (history, stats, achievements, leaderboard)
//! - `audio`: Cue sinks for the sound collaborator

pub mod audio;
pub mod driver;
pub mod input;
pub mod records;
pub mod score;
pub mod settings;
pub mod sim;
pub mod storage;

pub use driver::RunDriver;
pub use input::{InputAggregator, SharedIntent};
pub use score::score;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Fixed simulation timestep (50 ms, 20 Hz)
    pub const TICK: Duration = Duration::from_millis(50);
    /// Maximum ticks per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Sprite sizes (positions are the sprite's top-left corner)
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const KEEPER_SIZE: f32 = 24.0;

    /// Player displacement per axis per tick
    pub const BASE_MOVE_SPEED: f32 = 3.0;

    /// Player center must be strictly closer than this to a tree to hide
    pub const TREE_HIDE_RANGE: f32 = 30.0;
    /// Keeper notices the player inside this range (independent of difficulty)
    pub const BASE_DETECTION_RANGE: f32 = 150.0;
    /// Keeper stops advancing at or inside this range
    pub const KEEPER_DEADZONE: f32 = 50.0;
    /// Keeper closer than this ends the run
    pub const CATCH_RADIUS: f32 = 40.0;

    /// Detection meter bounds and decay per unexposed tick
    pub const DETECTION_MAX: f32 = 100.0;
    pub const DETECTION_DECAY: f32 = 1.0;
    /// Detection level that triggers the danger cue when crossed upward
    pub const DANGER_THRESHOLD: f32 = 70.0;

    /// Start corners
    pub const PLAYER_START: (f32, f32) = (50.0, 50.0);
    pub const KEEPER_START: (f32, f32) = (700.0, 500.0);
    pub const SECOND_KEEPER_START: (f32, f32) = (700.0, 50.0);
}

/// Clamp a sprite's top-left corner so the whole sprite stays inside the arena
#[inline]
pub fn clamp_to_arena(pos: Vec2, size: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, (width - size).max(0.0)),
        pos.y.clamp(0.0, (height - size).max(0.0)),
    )
}

/// Center of a square sprite given its top-left corner
#[inline]
pub fn sprite_center(pos: Vec2, size: f32) -> Vec2 {
    pos + Vec2::splat(size / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_keeps_sprite_inside() {
        let p = clamp_to_arena(Vec2::new(-5.0, 700.0), 20.0, 800.0, 600.0);
        assert_eq!(p, Vec2::new(0.0, 580.0));
    }

    #[test]
    fn test_sprite_center() {
        assert_eq!(sprite_center(Vec2::new(50.0, 50.0), 20.0), Vec2::new(60.0, 60.0));
    }
}
