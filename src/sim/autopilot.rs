//! Demo mode: the computer plays the player
//!
//! Greedy and stateless. When a keeper is close enough to notice, run for
//! the nearest tree; otherwise drift away from the nearest keeper.

use glam::Vec2;

use super::arena::Arena;
use super::state::SimState;
use super::tick::MovementIntent;
use crate::consts::*;

/// Axis offsets smaller than this don't set a direction bit
const AXIS_SLACK: f32 = 1.5;

/// Pick an intent for the next tick
pub fn intent_for(state: &SimState, arena: &Arena) -> MovementIntent {
    let center = state.player_center();

    let threatened = state
        .nearest_keeper_distance()
        .is_some_and(|d| d < BASE_DETECTION_RANGE + KEEPER_DEADZONE);

    if threatened {
        if let Some(tree) = arena.nearest_obstacle(center) {
            // Already in cover: hold still so pursuit stays frozen
            if tree.distance(center) < TREE_HIDE_RANGE * 0.5 {
                return MovementIntent::NONE;
            }
            return toward(center, tree);
        }
    }

    let Some(keeper) = state
        .keeper_positions
        .iter()
        .copied()
        .min_by(|a, b| {
            a.distance_squared(state.player_pos)
                .total_cmp(&b.distance_squared(state.player_pos))
        })
    else {
        return MovementIntent::NONE;
    };

    // Flee; walls are handled by the step engine's clamp
    let away = state.player_pos + (state.player_pos - keeper);
    toward(state.player_pos, away)
}

fn toward(from: Vec2, to: Vec2) -> MovementIntent {
    let d = to - from;
    MovementIntent {
        up: d.y < -AXIS_SLACK,
        down: d.y > AXIS_SLACK,
        left: d.x < -AXIS_SLACK,
        right: d.x > AXIS_SLACK,
    }
}
