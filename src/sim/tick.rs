//! Fixed timestep simulation tick
//!
//! `step` is a pure transition: it reads the previous state and returns a
//! whole new one, so a tick is either fully applied or not at all.
//!
//! Per-tick order:
//!   1. Player displacement (per-axis, unnormalized) and clamp
//!   2. Hide test against the nearest obstacle
//!   3. Keeper pursuit (frozen while hidden or inside the deadzone)
//!   4. Detection growth/decay (any exposed keeper drives growth)
//!   5. High-water mark
//!   6. Terminal evaluation (loss before win)
//!   7. Clock advance

use std::time::Duration;

use glam::Vec2;

use super::arena::Arena;
use super::difficulty::DifficultyProfile;
use super::state::{GameEvent, Phase, RunOutcome, SimState};
use crate::consts::*;
use crate::{clamp_to_arena, sprite_center};

/// Directions held for a single tick. Bits are independent; diagonals are
/// allowed and not normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MovementIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementIntent {
    pub const NONE: MovementIntent = MovementIntent {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    const UP: u8 = 1;
    const DOWN: u8 = 2;
    const LEFT: u8 = 4;
    const RIGHT: u8 = 8;

    /// Pack into a bitmask (for atomic handoff)
    pub fn bits(&self) -> u8 {
        let mut b = 0;
        if self.up {
            b |= Self::UP;
        }
        if self.down {
            b |= Self::DOWN;
        }
        if self.left {
            b |= Self::LEFT;
        }
        if self.right {
            b |= Self::RIGHT;
        }
        b
    }

    pub fn from_bits(bits: u8) -> Self {
        Self {
            up: bits & Self::UP != 0,
            down: bits & Self::DOWN != 0,
            left: bits & Self::LEFT != 0,
            right: bits & Self::RIGHT != 0,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Merge two intents (a direction is held if either holds it)
    pub fn union(self, other: MovementIntent) -> Self {
        Self::from_bits(self.bits() | other.bits())
    }

    /// Raw displacement for one tick, screen coordinates (y grows downward)
    pub fn displacement(&self, speed: f32) -> Vec2 {
        let mut d = Vec2::ZERO;
        if self.up {
            d.y -= speed;
        }
        if self.down {
            d.y += speed;
        }
        if self.left {
            d.x -= speed;
        }
        if self.right {
            d.x += speed;
        }
        d
    }
}

/// Contract violations when driving the step engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("step called while phase is {0:?}")]
    NotRunning(Phase),

    #[error("invalid difficulty profile: {0}")]
    InvalidProfile(&'static str),

    #[error("tick duration must be non-zero")]
    ZeroTick,
}

/// Everything one tick produced
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub state: SimState,
    /// Player had a direction held (audio collaborator only)
    pub moved: bool,
    pub events: Vec<GameEvent>,
    /// Set only on the tick that entered `Won` or `Lost`
    pub outcome: Option<RunOutcome>,
}

/// Advance the run by one fixed tick
pub fn step(
    state: &SimState,
    intent: MovementIntent,
    profile: &DifficultyProfile,
    arena: &Arena,
    dt: Duration,
) -> Result<TickResult, StepError> {
    if state.phase != Phase::Running {
        return Err(StepError::NotRunning(state.phase));
    }
    if dt.is_zero() {
        return Err(StepError::ZeroTick);
    }
    profile.validate().map_err(StepError::InvalidProfile)?;

    let mut next = state.clone();
    let mut events = Vec::new();

    // 1. Player displacement
    let moved = intent.any();
    next.player_pos = clamp_to_arena(
        state.player_pos + intent.displacement(BASE_MOVE_SPEED),
        PLAYER_SIZE,
        arena.width,
        arena.height,
    );

    // 2. Hide test
    next.hidden = arena.is_hidden(sprite_center(next.player_pos, PLAYER_SIZE));
    if next.hidden && !state.hidden {
        events.push(GameEvent::Hid);
    }

    // 3. Pursuit; distances are measured before the keeper moves
    let mut exposed = false;
    let mut caught = false;
    for keeper in next.keeper_positions.iter_mut() {
        let to_player = next.player_pos - *keeper;
        let distance = to_player.length();

        if !next.hidden && distance > KEEPER_DEADZONE {
            *keeper = clamp_to_arena(
                *keeper + to_player / distance * profile.keeper_speed,
                KEEPER_SIZE,
                arena.width,
                arena.height,
            );
        }

        if !next.hidden && distance < BASE_DETECTION_RANGE {
            exposed = true;
        }
        if distance < CATCH_RADIUS {
            caught = true;
        }
    }

    // 4. Detection meter
    next.detection_level = if exposed {
        (state.detection_level + profile.detection_rate).min(DETECTION_MAX)
    } else {
        (state.detection_level - DETECTION_DECAY).max(0.0)
    };
    if next.detection_level > DANGER_THRESHOLD && state.detection_level <= DANGER_THRESHOLD {
        events.push(GameEvent::Danger);
    }

    // 5. High-water mark
    next.max_detection_reached = state.max_detection_reached.max(next.detection_level);

    // 6/7. Terminal evaluation against the clock at the end of this tick
    next.ticks = state.ticks + 1;
    next.elapsed = state.elapsed + dt;

    let lost = next.detection_level >= DETECTION_MAX || caught;
    let won = !lost && next.elapsed >= profile.survive_duration;
    if lost {
        next.phase = Phase::Lost;
        events.push(GameEvent::Caught);
    } else if won {
        next.phase = Phase::Won;
        events.push(GameEvent::Escaped);
    }

    let outcome = next.outcome();
    Ok(TickResult {
        state: next,
        moved,
        events,
        outcome,
    })
}

/// `step` with the run's own difficulty profile and the reference tick
pub fn tick(
    state: &SimState,
    intent: MovementIntent,
    arena: &Arena,
) -> Result<TickResult, StepError> {
    step(state, intent, &state.difficulty().profile(), arena, TICK)
}
