//! Score for a won run

use crate::sim::RunOutcome;

/// `floor(time * 10 * difficulty * mode * stealth)`; `None` for losses
pub fn score(outcome: &RunOutcome) -> Option<u64> {
    if !outcome.survived {
        return None;
    }
    let mode_bonus = if outcome.night_mode { 1.5 } else { 1.0 };
    let stealth_bonus = stealth_bonus(outcome.max_detection_reached);
    let raw = outcome.elapsed_seconds
        * 10.0
        * outcome.difficulty.score_multiplier()
        * mode_bonus
        * stealth_bonus;
    Some(raw.max(0.0).floor() as u64)
}

pub fn stealth_bonus(max_detection: f32) -> f64 {
    if max_detection < 10.0 {
        2.0
    } else if max_detection < 30.0 {
        1.5
    } else {
        1.0
    }
}
