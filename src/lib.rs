//! Dodge Shot - A fixed-timestep arcade shooter/dodger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, collisions, progression, game state)
//! - `highscore`: Single-integer high score persistence
//! - `settings`: JSON configuration
//! - `error`: Errors for the persistence boundary

pub mod error;
pub mod highscore;
pub mod settings;
pub mod sim;

pub use error::{PersistenceError, PersistenceResult};
pub use highscore::HighScoreStore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation interval (~33 Hz)
    pub const TICK_INTERVAL_MS: u64 = 30;

    /// Default arena dimensions (pixels)
    pub const ARENA_WIDTH: i32 = 800;
    pub const ARENA_HEIGHT: i32 = 600;
    /// Obstacles spawn at least this far from the arena edges
    pub const SPAWN_MARGIN: i32 = 50;

    /// Player defaults
    pub const PLAYER_RADIUS: i32 = 15;
    pub const PLAYER_SPEED: i32 = 5;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: i32 = 30;
    pub const OBSTACLE_HEIGHT: i32 = 20;
    /// Base per-axis speed cap, multiplied by `1 + score / 1000`
    pub const OBSTACLE_BASE_SPEED_CAP: i32 = 3;
    /// Freshly rolled speeds are 1..=3 on each axis
    pub const OBSTACLE_MAX_ROLL_SPEED: i32 = 3;
    /// Hits needed to destroy an obstacle
    pub const OBSTACLE_HITS_TO_DESTROY: u8 = 2;

    /// Bullets
    pub const BULLET_RADIUS: i32 = 6;
    pub const BULLET_SPEED: f32 = 12.0;
    pub const ENEMY_BULLET_RADIUS: i32 = 6;
    pub const ENEMY_BULLET_SPEED: f32 = 8.0;
    /// Direction vectors shorter than this are not normalized
    pub const MIN_AIM_DISTANCE: f32 = 0.1;

    /// Pool capacities
    pub const MAX_OBSTACLES: usize = 20;
    pub const MAX_PLAYER_BULLETS: usize = 3;
    pub const MAX_ENEMY_BULLETS: usize = 64;

    /// Obstacle population rules
    pub const INITIAL_OBSTACLES: usize = 10;
    pub const MIN_ACTIVE_OBSTACLES: usize = 2;
    pub const EXPANSION_START_SCORE: u32 = 2000;
    pub const EXPANSION_STEP: u32 = 500;
    pub const SPEED_STEP_SCORE: u32 = 1000;
    /// Redirection fires when `roll(0..1000) < score / REDIRECT_SCORE_DIVISOR`
    pub const REDIRECT_SCORE_DIVISOR: u32 = 100;
    pub const REDIRECT_ROLL_RANGE: u32 = 1000;
    /// Chance (1 in N) for each obstacle once redirection fires
    pub const REDIRECT_PER_OBSTACLE_ODDS: u32 = 10;

    /// Player fire rules
    pub const MULTI_SHOT_SCORE: u32 = 5000;
    pub const MULTI_SHOT_TARGETS: usize = 3;
    pub const FIRE_CAP_SCORE: u32 = 10000;

    /// Enemy fire
    pub const ENEMY_FIRE_INTERVAL: u32 = 500;
    pub const ENEMY_FIRE_SHOOTERS: usize = 2;
    pub const LETHAL_PLAYER_HITS: u32 = 20;

    /// Late-game barrage
    pub const BARRAGE_START_SCORE: u32 = 15000;
    pub const BARRAGE_INTERVAL: u32 = 400;
    pub const BARRAGE_SHOOTERS: usize = 4;

    /// Shield
    pub const SHIELD_SCORE_STEP: u32 = 500;
    pub const SHIELD_DURATION_TICKS: u32 = 200;
}
