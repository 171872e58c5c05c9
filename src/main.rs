//! Forest Keeper entry point
//!
//! The native binary is a headless runner: the autopilot plays one or more
//! runs, outcomes are recorded into a profile on disk, and a summary is
//! printed. Rendering and the browser front-end live outside this crate.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;

    use forest_keeper::audio::LogCueSink;
    use forest_keeper::records::PersistentRecorder;
    use forest_keeper::sim::{Arena, Difficulty, RunConfig, autopilot};
    use forest_keeper::storage::FileStorage;
    use forest_keeper::{RunDriver, Settings, SharedIntent};

    /// Forest Keeper - hide behind trees and outlast the keeper
    #[derive(Parser, Debug)]
    #[command(name = "forest-keeper")]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Difficulty: easy, normal, hard, nightmare or hardcore (default: saved setting)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Play at night (saved for later runs)
        #[arg(short, long, conflicts_with = "day")]
        night: bool,

        /// Play by day (saved for later runs)
        #[arg(long)]
        day: bool,

        /// Number of runs to play
        #[arg(short, long, default_value = "1")]
        runs: u32,

        /// Seed for cosmetic randomness
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Pace ticks in real time instead of as fast as possible
        #[arg(long)]
        realtime: bool,

        /// Directory holding settings and the player profile
        #[arg(long, default_value = ".forest-keeper")]
        data_dir: PathBuf,

        /// Leaderboard name for won runs (default: saved name or "Autopilot")
        #[arg(long)]
        name: Option<String>,
    }

    impl Args {
        /// Night mode requested on the command line, if any
        fn night_mode(&self) -> Option<bool> {
            if self.night {
                Some(true)
            } else if self.day {
                Some(false)
            } else {
                None
            }
        }

        /// Override saved settings with whatever was passed
        fn apply(&self, settings: &mut Settings) {
            if let Some(difficulty) = self.difficulty {
                settings.difficulty = difficulty;
            }
            if let Some(night_mode) = self.night_mode() {
                settings.night_mode = night_mode;
            }
            if let Some(name) = &self.name {
                settings.set_player_name(name);
            }
        }
    }

    pub fn run() -> ExitCode {
        let args = Args::parse();

        let mut storage = match FileStorage::new(&args.data_dir) {
            Ok(s) => s,
            Err(e) => {
                log::error!("Cannot open {}: {}", args.data_dir.display(), e);
                return ExitCode::FAILURE;
            }
        };

        let mut settings = Settings::load(&storage);
        args.apply(&mut settings);
        if let Err(e) = settings.save(&mut storage) {
            log::warn!("Failed to save settings: {}", e);
        }

        let name = if settings.player_name.is_empty() {
            "Autopilot".to_string()
        } else {
            settings.player_name.clone()
        };
        let config: RunConfig = settings.run_config();
        let arena = Arena::reference();
        let mut recorder = PersistentRecorder::new(storage.clone());

        for run in 0..args.runs {
            let intent = SharedIntent::new();
            let mut driver = RunDriver::new(
                config,
                arena.clone(),
                intent.clone(),
                LogCueSink,
                &mut recorder,
            )
            .with_seed(args.seed.wrapping_add(run as u64));

            driver.run_blocking(args.realtime, |state| {
                intent.store(autopilot::intent_for(state, &arena));
            });

            let Some(outcome) = driver.outcome().copied() else {
                log::error!("Run {} ended without an outcome", run + 1);
                return ExitCode::FAILURE;
            };
            drop(driver);

            let verdict = if outcome.survived { "ESCAPED" } else { "CAUGHT" };
            println!(
                "run {:>3}: {:<7} {:>6.2}s  max detection {:>5.1}",
                run + 1,
                verdict,
                outcome.elapsed_seconds,
                outcome.max_detection_reached
            );

            if let Some(score) = recorder.last_report().and_then(|r| r.score) {
                match recorder.submit(&name) {
                    Some(rank) => println!("         score {} - leaderboard rank {}", score, rank),
                    None => println!("         score {}", score),
                }
            }
            if let Some(report) = recorder.last_report() {
                for id in &report.unlocked {
                    println!("         achievement: {} - {}", id.title(), id.description());
                }
            }
        }

        let stats = &recorder.profile().stats;
        println!(
            "\n{} games, {} won ({:.0}%), best streak {}",
            stats.games_played,
            stats.games_won,
            stats.win_rate(),
            stats.best_streak
        );
        ExitCode::SUCCESS
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Forest Keeper (headless) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm artifact; the front-end drives it
}
