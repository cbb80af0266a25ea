//! Zone Snake headless runner
//!
//! Plays one game on the simulated 60 Hz frame clock, steered by the demo
//! autopilot, and reports the result.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use zone_snake::audio::AudioManager;
    use zone_snake::consts::FIXED_STEP_MS;
    use zone_snake::highscores::{HighScores, ScoreSink};
    use zone_snake::sim::choose_direction;
    use zone_snake::{GameConfig, GridPreset, Session, SpeedPreset};

    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// JSON config file; command-line flags override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Speed preset (slow, normal, fast)
        #[arg(long)]
        speed: Option<String>,

        /// Grid preset (small, medium, large)
        #[arg(long)]
        grid: Option<String>,

        /// Frames to simulate at 60 Hz before giving up
        #[arg(short, long, default_value_t = 36_000)]
        frames: u32,

        /// Keep heading right instead of letting the autopilot steer
        #[arg(long)]
        no_autopilot: bool,

        /// Leaderboard file to update with the final score
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    }

    /// Leaderboard that writes itself back to disk on every recorded game
    struct ScoreFile {
        path: PathBuf,
        scores: HighScores,
    }

    impl ScoreSink for ScoreFile {
        fn record_final_score(&mut self, score: u64, level: usize, timestamp: f64) {
            self.scores.record_final_score(score, level, timestamp);
            if let Err(e) = self.scores.save(&self.path) {
                log::warn!("Could not save high scores: {e}");
            }
        }
    }

    fn build_config(args: &Args) -> Result<GameConfig> {
        let mut config = match &args.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => GameConfig::default(),
        };
        if let Some(seed) = args.seed {
            config.seed = seed;
        }
        if let Some(speed) = &args.speed {
            let Some(preset) = SpeedPreset::from_str(speed) else {
                bail!("unknown speed preset '{speed}'");
            };
            config.speed = preset;
        }
        if let Some(grid) = &args.grid {
            let Some(preset) = GridPreset::from_str(grid) else {
                bail!("unknown grid preset '{grid}'");
            };
            config.grid = preset;
            config.tile_count = None;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();
        let config = build_config(&args)?;
        log::info!(
            "Zone Snake (headless) seed {}, {} speed, {}x{} board",
            config.seed,
            config.speed.as_str(),
            config.tile_count(),
            config.tile_count()
        );

        let mut session = Session::new(config).with_audio(Box::new(AudioManager::new()));
        if let Some(path) = &args.scores {
            let scores = HighScores::load(path)?;
            session = session.with_score_sink(Box::new(ScoreFile {
                path: path.clone(),
                scores,
            }));
        }

        let mut now = 0.0;
        for _ in 0..args.frames {
            if !args.no_autopilot {
                if let Some(dir) = choose_direction(session.state()) {
                    session.set_direction(dir.vector());
                }
            }
            let snap = session.frame(now);
            if snap.game_over {
                break;
            }
            now += FIXED_STEP_MS;
        }

        let snap = session.snapshot();
        let state = session.state();
        log::info!(
            "{} | score {} | {} moves | {} foods | {} power-ups | {:.1}s",
            snap.status_line(),
            snap.score,
            snap.move_count,
            state.foods_eaten,
            state.power_ups_collected,
            now / 1000.0
        );
        match snap.death_cause {
            Some(cause) => println!("Game over ({cause:?}) with {} points", snap.score),
            None => println!(
                "Still alive after {} frames with {} points",
                args.frames, snap.score
            ),
        }

        if args.json {
            println!("{}", snap.to_json()?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web
}
