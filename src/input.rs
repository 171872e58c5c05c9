//! Input reduction: raw key and touch events into a `MovementIntent`
//!
//! Events arrive at arbitrary times; the driver samples the published
//! snapshot once at the start of each tick.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use glam::Vec2;

use crate::sim::MovementIntent;

/// Touch drag must exceed this total length before it steers
pub const TOUCH_DEADZONE: f32 = 15.0;
/// Per-axis drag needed to set that axis's direction
pub const TOUCH_AXIS_THRESHOLD: f32 = 10.0;

/// Movement direction a key maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a key name (`KeyboardEvent.key`) to a direction.
    /// WASD, the Cyrillic ЦФЫВ layout equivalents and the arrow keys.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" | "ц" | "arrowup" | "up" => Some(Direction::Up),
            "s" | "ы" | "arrowdown" | "down" => Some(Direction::Down),
            "a" | "ф" | "arrowleft" | "left" => Some(Direction::Left),
            "d" | "в" | "arrowright" | "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Single-writer/single-reader intent snapshot, replaced atomically
#[derive(Debug, Clone, Default)]
pub struct SharedIntent(Arc<AtomicU8>);

impl SharedIntent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, intent: MovementIntent) {
        self.0.store(intent.bits(), Ordering::Release);
    }

    pub fn load(&self) -> MovementIntent {
        MovementIntent::from_bits(self.0.load(Ordering::Acquire))
    }
}

#[derive(Debug, Clone, Copy)]
struct TouchDrag {
    start: Vec2,
    current: Vec2,
}

/// Holds the current key/touch state and publishes the combined intent
#[derive(Debug, Default)]
pub struct InputAggregator {
    held: HashSet<String>,
    touch: Option<TouchDrag>,
    touch_intent: MovementIntent,
    shared: SharedIntent,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregator publishing into an existing handle
    pub fn with_shared(shared: SharedIntent) -> Self {
        Self {
            shared,
            ..Self::default()
        }
    }

    /// Handle for the reader side
    pub fn shared(&self) -> SharedIntent {
        self.shared.clone()
    }

    pub fn key_down(&mut self, key: &str) {
        if Direction::from_key(key).is_some() {
            self.held.insert(key.to_lowercase());
            self.publish();
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if self.held.remove(&key.to_lowercase()) {
            self.publish();
        }
    }

    /// Drop all held keys (e.g. window lost focus)
    pub fn release_all(&mut self) {
        self.held.clear();
        self.touch = None;
        self.touch_intent = MovementIntent::NONE;
        self.publish();
    }

    /// Positions are in arena coordinates
    pub fn touch_start(&mut self, pos: Vec2) {
        self.touch = Some(TouchDrag {
            start: pos,
            current: pos,
        });
        self.touch_intent = MovementIntent::NONE;
        self.publish();
    }

    pub fn touch_move(&mut self, pos: Vec2) {
        let Some(drag) = self.touch.as_mut() else {
            return;
        };
        drag.current = pos;
        let d = drag.current - drag.start;

        self.touch_intent = if d.length() > TOUCH_DEADZONE {
            MovementIntent {
                up: d.y < -TOUCH_AXIS_THRESHOLD,
                down: d.y > TOUCH_AXIS_THRESHOLD,
                left: d.x < -TOUCH_AXIS_THRESHOLD,
                right: d.x > TOUCH_AXIS_THRESHOLD,
            }
        } else {
            MovementIntent::NONE
        };
        self.publish();
    }

    pub fn touch_end(&mut self) {
        self.touch = None;
        self.touch_intent = MovementIntent::NONE;
        self.publish();
    }

    /// Start and current point of an active drag (for drawing the joystick)
    pub fn touch_joystick(&self) -> Option<(Vec2, Vec2)> {
        self.touch.map(|t| (t.start, t.current))
    }

    /// Combined keyboard and touch intent
    pub fn intent(&self) -> MovementIntent {
        let mut keys = MovementIntent::NONE;
        for dir in self.held.iter().filter_map(|k| Direction::from_key(k)) {
            match dir {
                Direction::Up => keys.up = true,
                Direction::Down => keys.down = true,
                Direction::Left => keys.left = true,
                Direction::Right => keys.right = true,
            }
        }
        keys.union(self.touch_intent)
    }

    fn publish(&self) {
        self.shared.store(self.intent());
    }
}
