//! Fixed-interval run driver
//!
//! Owns the single writable `SimState` of a run and feeds it to the step
//! engine once per tick. Intent is sampled from the shared snapshot at the
//! start of each tick, never mid-tick.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioCue, AudioCueSink};
use crate::consts::{MAX_SUBSTEPS, TICK};
use crate::input::SharedIntent;
use crate::records::OutcomeSink;
use crate::sim::{Arena, DifficultyProfile, GameEvent, RunConfig, RunOutcome, SimState, step};

/// Chance a moving tick plays a footstep
const STEP_CUE_CHANCE: f32 = 0.3;

pub struct RunDriver<A: AudioCueSink, O: OutcomeSink> {
    state: SimState,
    arena: Arena,
    profile: DifficultyProfile,
    intent: SharedIntent,
    cues: A,
    outcomes: O,
    tick: Duration,
    accumulator: Duration,
    rng: Pcg32,
    stopped: bool,
    outcome: Option<RunOutcome>,
}

impl<A: AudioCueSink, O: OutcomeSink> RunDriver<A, O> {
    /// Start a fresh run
    pub fn new(config: RunConfig, arena: Arena, intent: SharedIntent, cues: A, outcomes: O) -> Self {
        log::info!(
            "Run started: difficulty={} night_mode={}",
            config.difficulty,
            config.night_mode
        );
        Self::from_state(SimState::new(config), arena, intent, cues, outcomes)
    }

    /// Drive an existing state. A terminal state yields a stopped driver.
    pub fn from_state(
        state: SimState,
        arena: Arena,
        intent: SharedIntent,
        cues: A,
        outcomes: O,
    ) -> Self {
        let state = state.start();
        let stopped = !state.is_running();
        Self {
            profile: state.difficulty().profile(),
            state,
            arena,
            intent,
            cues,
            outcomes,
            tick: TICK,
            accumulator: Duration::ZERO,
            rng: Pcg32::seed_from_u64(0),
            stopped,
            outcome: None,
        }
    }

    /// Override the tick interval (zero is ignored)
    pub fn with_tick(mut self, tick: Duration) -> Self {
        if tick.is_zero() {
            log::warn!("Ignoring zero tick interval");
        } else {
            self.tick = tick;
        }
        self
    }

    /// Override the difficulty profile (invalid profiles are ignored)
    pub fn with_profile(mut self, profile: DifficultyProfile) -> Self {
        match profile.validate() {
            Ok(()) => self.profile = profile,
            Err(e) => log::warn!("Ignoring difficulty profile: {}", e),
        }
        self
    }

    /// Seed the cosmetic RNG (footstep sampling)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn cues(&self) -> &A {
        &self.cues
    }

    pub fn outcomes(&self) -> &O {
        &self.outcomes
    }

    pub fn outcomes_mut(&mut self) -> &mut O {
        &mut self.outcomes
    }

    /// Stop ticking. Safe to call any number of times.
    pub fn stop(&mut self) {
        if !self.stopped {
            log::debug!("Driver stopped after {} ticks", self.state.ticks);
        }
        self.stopped = true;
        self.accumulator = Duration::ZERO;
    }

    /// Feed wall-clock time; runs whole ticks and returns how many ran
    pub fn advance(&mut self, frame_dt: Duration) -> u32 {
        if self.stopped {
            return 0;
        }
        self.accumulator = self.accumulator.saturating_add(frame_dt);

        let mut substeps = 0;
        while self.accumulator >= self.tick && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.tick;
            if !self.tick_once() {
                break;
            }
            substeps += 1;
        }

        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS && self.accumulator >= self.tick {
            self.accumulator = Duration::ZERO;
        }
        substeps
    }

    /// Run exactly one tick; false if the driver is stopped
    pub fn tick_once(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        let intent = self.intent.load();

        let result = match step(&self.state, intent, &self.profile, &self.arena, self.tick) {
            Ok(result) => result,
            Err(e) => {
                if cfg!(debug_assertions) {
                    panic!("step contract violated: {e}");
                }
                log::warn!("Tick rejected: {}", e);
                self.stop();
                return false;
            }
        };

        self.state = result.state;

        if result.moved && self.rng.random::<f32>() < STEP_CUE_CHANCE {
            self.cues.play(AudioCue::Step);
        }
        for event in &result.events {
            self.cues.play(match event {
                GameEvent::Hid => AudioCue::Hide,
                GameEvent::Danger => AudioCue::Danger,
                GameEvent::Caught => AudioCue::Caught,
                GameEvent::Escaped => AudioCue::Escape,
            });
        }

        if let Some(outcome) = result.outcome {
            log::info!(
                "Run {}: {:.2}s, max detection {:.1}",
                if outcome.survived { "won" } else { "lost" },
                outcome.elapsed_seconds,
                outcome.max_detection_reached
            );
            self.outcome = Some(outcome);
            self.outcomes.on_outcome(&outcome);
            self.stop();
        }
        true
    }

    /// Tick until the run ends. `before_tick` sees the state each tick will
    /// start from (e.g. to publish an autopilot intent). With `realtime`,
    /// ticks are paced at the tick interval.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run_blocking(&mut self, realtime: bool, mut before_tick: impl FnMut(&SimState)) {
        let mut next_deadline = std::time::Instant::now();
        while !self.stopped {
            before_tick(&self.state);
            self.tick_once();
            if realtime {
                next_deadline += self.tick;
                let now = std::time::Instant::now();
                if next_deadline > now {
                    std::thread::sleep(next_deadline - now);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullCueSink;
    use crate::sim::{Difficulty, MovementIntent, Phase};
    use glam::Vec2;

    #[derive(Default)]
    struct RecordingSink(Vec<AudioCue>);

    impl AudioCueSink for RecordingSink {
        fn play(&mut self, cue: AudioCue) {
            self.0.push(cue);
        }
    }

    fn driver() -> RunDriver<RecordingSink, Vec<RunOutcome>> {
        RunDriver::new(
            RunConfig::default(),
            Arena::reference(),
            SharedIntent::new(),
            RecordingSink::default(),
            Vec::new(),
        )
    }

    fn about_to_be_caught() -> SimState {
        let mut state = SimState::start_run(RunConfig::default());
        state.player_pos = Vec2::new(300.0, 300.0);
        state.keeper_positions = vec![Vec2::new(320.0, 300.0)];
        state
    }

    #[test]
    fn test_new_driver_is_running() {
        let d = driver();
        assert_eq!(d.state().phase, Phase::Running);
        assert!(!d.is_stopped());
        assert_eq!(d.tick_interval(), TICK);
    }

    #[test]
    fn test_intent_sampled_at_tick_start() {
        let intent = SharedIntent::new();
        let mut d = RunDriver::new(
            RunConfig::default(),
            Arena::open(),
            intent.clone(),
            NullCueSink,
            (),
        );
        intent.store(MovementIntent {
            right: true,
            ..Default::default()
        });
        assert!(d.tick_once());
        assert_eq!(d.state().player_pos, Vec2::new(53.0, 50.0));

        intent.store(MovementIntent::NONE);
        assert!(d.tick_once());
        assert_eq!(d.state().player_pos, Vec2::new(53.0, 50.0));
    }

    #[test]
    fn test_advance_accumulates_partial_ticks() {
        let mut d = driver();
        assert_eq!(d.advance(Duration::from_millis(120)), 2);
        assert_eq!(d.advance(Duration::from_millis(30)), 1);
        assert_eq!(d.advance(Duration::from_millis(10)), 0);
        assert_eq!(d.state().ticks, 3);
        assert_eq!(d.state().elapsed, Duration::from_millis(150));
    }

    #[test]
    fn test_advance_caps_substeps_and_drops_backlog() {
        let mut d = driver();
        assert_eq!(d.advance(Duration::from_secs(1)), MAX_SUBSTEPS);
        assert_eq!(d.advance(Duration::ZERO), 0);
    }

    #[test]
    fn test_huge_frame_time_does_not_overflow() {
        let mut d = driver();
        assert_eq!(d.advance(Duration::MAX), MAX_SUBSTEPS);
        assert_eq!(d.advance(Duration::MAX), MAX_SUBSTEPS);
        assert_eq!(d.state().ticks, 2 * MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_custom_tick_interval() {
        let mut d = driver().with_tick(Duration::from_millis(100)).with_tick(Duration::ZERO);
        assert_eq!(d.advance(Duration::from_millis(250)), 2);
        assert_eq!(d.state().elapsed, Duration::from_millis(200));
    }

    #[test]
    fn test_outcome_dispatched_exactly_once() {
        let mut d = RunDriver::from_state(
            about_to_be_caught(),
            Arena::open(),
            SharedIntent::new(),
            RecordingSink::default(),
            Vec::new(),
        );
        assert!(d.tick_once());
        assert_eq!(d.state().phase, Phase::Lost);
        assert!(d.is_stopped());
        assert_eq!(d.outcomes().len(), 1);
        assert!(!d.outcomes()[0].survived);
        assert_eq!(d.cues().0.last(), Some(&AudioCue::Caught));

        let frozen = d.state().clone();
        assert!(!d.tick_once());
        assert_eq!(d.advance(Duration::from_secs(5)), 0);
        d.stop();
        d.stop();
        assert_eq!(d.state(), &frozen);
        assert_eq!(d.outcomes().len(), 1);
    }

    #[test]
    fn test_terminal_state_gives_stopped_driver() {
        let mut state = about_to_be_caught();
        state.phase = Phase::Won;
        let mut d = RunDriver::from_state(state, Arena::open(), SharedIntent::new(), NullCueSink, ());
        assert!(d.is_stopped());
        assert!(!d.tick_once());
    }

    #[test]
    fn test_stop_before_end_leaves_whole_state() {
        let mut d = driver();
        d.advance(Duration::from_millis(100));
        d.stop();
        let snapshot = d.state().clone();
        assert_eq!(d.advance(Duration::from_millis(500)), 0);
        assert_eq!(d.state(), &snapshot);
        assert!(d.outcome().is_none());
    }

    #[test]
    fn test_hide_cue() {
        let intent = SharedIntent::new();
        let mut state = SimState::start_run(RunConfig::default());
        // One step right puts the player's center on the (150, 100) tree
        state.player_pos = Vec2::new(137.0, 90.0);
        let mut d = RunDriver::from_state(
            state,
            Arena::reference(),
            intent.clone(),
            RecordingSink::default(),
            Vec::new(),
        );
        intent.store(MovementIntent {
            right: true,
            ..Default::default()
        });
        d.tick_once();
        assert!(d.state().hidden);
        assert!(d.cues().0.contains(&AudioCue::Hide));
    }

    #[test]
    fn test_profile_override_and_win() {
        let profile = DifficultyProfile {
            keeper_speed: 0.0,
            survive_duration: Duration::from_millis(500),
            ..Difficulty::Easy.profile()
        };
        let mut d = RunDriver::new(
            RunConfig {
                difficulty: Difficulty::Easy,
                night_mode: true,
            },
            Arena::reference(),
            SharedIntent::new(),
            RecordingSink::default(),
            Vec::new(),
        )
        .with_profile(profile);

        d.run_blocking(false, |_| {});
        let outcome = d.outcome().copied().unwrap();
        assert!(outcome.survived);
        assert!(outcome.night_mode);
        assert_eq!(d.state().ticks, 10);
        assert_eq!(d.cues().0.last(), Some(&AudioCue::Escape));
    }

    #[test]
    fn test_step_cues_are_sampled() {
        let intent = SharedIntent::new();
        intent.store(MovementIntent {
            up: true,
            ..Default::default()
        });
        let mut state = SimState::start_run(RunConfig::default());
        state.keeper_positions.clear();
        let mut d = RunDriver::from_state(
            state,
            Arena::open(),
            intent,
            RecordingSink::default(),
            Vec::new(),
        )
        .with_seed(7);
        for _ in 0..200 {
            d.tick_once();
        }
        let steps = d.cues().0.iter().filter(|c| **c == AudioCue::Step).count();
        assert!(steps > 20 && steps < 120, "{steps} footsteps");
    }
}
