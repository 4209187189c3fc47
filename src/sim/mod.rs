//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one step per `tick` call)
//! - Randomness only through the caller-supplied RNG
//! - Stable iteration order (by slot index)
//! - No rendering, file or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod pool;
pub mod progression;
pub mod state;
pub mod targeting;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{bullet_rect_collision, circle_circle_collision, circle_rect_collision};
pub use pool::{Pool, Slot};
pub use state::{
    Arena, Bullet, EnemyBullet, GameEvent, GamePhase, GameState, Obstacle, ObstacleRect, Player,
    PlayerBullet, Shield, Snapshot,
};
pub use targeting::{Target, fire, nearest_targets};
pub use tick::{TickInput, step, tick};
