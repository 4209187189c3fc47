//! Dodge Shot entry point
//!
//! Runs the simulation headless with the autopilot at the wheel, using a
//! fixed-timestep accumulator loop.

use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use dodge_shot::sim::{GameEvent, GameState, autopilot_input, tick};
use dodge_shot::{HighScoreStore, Settings};

/// Maximum ticks per frame to prevent spiral of death
const MAX_SUBSTEPS: u32 = 8;
/// Pending high scores are written at most this often (about once a second)
const SAVE_INTERVAL_TICKS: u64 = 33;

/// Game instance holding all state
struct Game {
    state: GameState,
    rng: Pcg32,
    store: HighScoreStore,
    /// High score waiting to be written
    pending_save: Option<u32>,
    ticks: u64,
    runs_finished: u32,
    best_run: u32,
}

impl Game {
    fn new(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(clock_seed);
        log::info!("Seed {}", seed);
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut store = HighScoreStore::new(&settings.high_score_path);
        let high_score = store.load().unwrap_or(0);

        Self {
            state: GameState::new(settings.arena(), high_score, &mut rng),
            rng,
            store,
            pending_save: None,
            ticks: 0,
            runs_finished: 0,
            best_run: 0,
        }
    }

    /// Run one simulation tick
    fn update(&mut self) {
        let input = autopilot_input(&self.state);
        tick(&mut self.state, &input, &mut self.rng);
        self.ticks += 1;

        for event in self.state.drain_events() {
            match event {
                GameEvent::NewHighScore(score) => self.pending_save = Some(score),
                GameEvent::GameOver { score } => {
                    self.runs_finished += 1;
                    self.best_run = self.best_run.max(score);
                    self.flush_high_score();
                }
                GameEvent::ShieldGranted => log::debug!("Shield up at {}", self.state.score),
                _ => {}
            }
        }

        if self.ticks % SAVE_INTERVAL_TICKS == 0 {
            self.flush_high_score();
        }
    }

    fn flush_high_score(&mut self) {
        if let Some(score) = self.pending_save.take() {
            self.store.save(score);
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dodge Shot (headless) starting...");

    let settings = Settings::load(Path::new(Settings::FILE_NAME));
    let mut game = Game::new(&settings);

    let step = Duration::from_millis(settings.tick_interval_ms);
    let mut accumulator = Duration::ZERO;
    let mut last = Instant::now();

    while game.ticks < settings.demo_ticks && !game.state.quit_requested {
        if settings.realtime {
            let now = Instant::now();
            accumulator += now - last;
            last = now;

            let mut substeps = 0;
            while accumulator >= step && substeps < MAX_SUBSTEPS {
                game.update();
                accumulator -= step;
                substeps += 1;
            }
            // Drop time we could not catch up on
            if substeps == MAX_SUBSTEPS {
                accumulator = Duration::ZERO;
            }
            std::thread::sleep(step.saturating_sub(accumulator));
        } else {
            game.update();
        }
    }
    game.flush_high_score();

    let snapshot = game.state.snapshot();
    println!(
        "{} ticks, {} runs finished, best run {}, current score {}, high score {}",
        game.ticks, game.runs_finished, game.best_run, snapshot.score, snapshot.high_score
    );
}
