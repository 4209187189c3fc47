//! Game state and core simulation types
//!
//! All mutable gameplay state lives in [`GameState`]; the tick and the input
//! handler are the only writers.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::{Pool, Slot};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Run ended; waits for a restart
    GameOver,
}

/// Something notable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score passed the stored high score; holds the new value
    NewHighScore(u32),
    ShieldGranted,
    /// Obstacle in this slot took its second hit
    ObstacleDestroyed(usize),
    /// Enemy bullet hit the unshielded player
    PlayerHit,
    /// Every obstacle slot was refilled
    Repopulated,
    GameOver { score: u32 },
}

/// Rectangular play field with the origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.width / 2, self.height / 2)
    }

    /// Whether a point lies inside the arena (edges included)
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= 0 && p.x <= self.width && p.y >= 0 && p.y <= self.height
    }

    /// Clamp a circle centre so the whole circle stays inside
    pub fn clamp_circle(&self, pos: IVec2, radius: i32) -> IVec2 {
        IVec2::new(
            pos.x.max(radius).min(self.width - radius),
            pos.y.max(radius).min(self.height - radius),
        )
    }

    /// Random top-left corner for a freshly spawned obstacle
    pub fn random_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> IVec2 {
        let max_x = (self.width - SPAWN_MARGIN).max(SPAWN_MARGIN + 1);
        let max_y = (self.height - SPAWN_MARGIN).max(SPAWN_MARGIN + 1);
        IVec2::new(
            rng.random_range(SPAWN_MARGIN..max_x),
            rng.random_range(SPAWN_MARGIN..max_y),
        )
    }
}

/// The player-controlled circle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: IVec2,
    pub radius: i32,
}

impl Player {
    pub fn new(pos: IVec2) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
        }
    }
}

/// A moving rectangular hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: IVec2,
    pub size: IVec2,
    /// Per-tick displacement
    pub vel: IVec2,
    pub active: bool,
    /// Bullet hits taken; the obstacle is destroyed on the second
    pub hits: u8,
}

impl Default for Obstacle {
    fn default() -> Self {
        Self {
            pos: IVec2::ZERO,
            size: IVec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            vel: IVec2::ZERO,
            active: false,
            hits: 0,
        }
    }
}

impl Slot for Obstacle {
    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Obstacle {
    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    /// Bring the obstacle to life at a random spot with a random velocity
    pub fn respawn<R: Rng + ?Sized>(&mut self, arena: &Arena, rng: &mut R) {
        self.pos = arena.random_spawn(rng);
        self.roll_velocity(rng);
        self.hits = 0;
        self.active = true;
    }

    /// Pick a fresh velocity: magnitude 1..=3 per axis with a random sign
    pub fn roll_velocity<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut axis = || {
            let speed = rng.random_range(1..=OBSTACLE_MAX_ROLL_SPEED);
            if rng.random_bool(0.5) { -speed } else { speed }
        };
        self.vel = IVec2::new(axis(), axis());
    }

    /// Move by one tick and bounce off the arena walls
    pub fn advance(&mut self, arena: &Arena) {
        self.pos += self.vel;
        if self.pos.x < 0 || self.pos.x + self.size.x > arena.width {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0 || self.pos.y + self.size.y > arena.height {
            self.vel.y = -self.vel.y;
        }
    }

    /// Register a bullet hit. Returns true if this destroyed the obstacle.
    pub fn register_hit(&mut self) -> bool {
        self.hits += 1;
        if self.hits >= OBSTACLE_HITS_TO_DESTROY {
            self.active = false;
            self.hits = 0;
            return true;
        }
        false
    }
}

/// A straight-flying projectile (player or enemy)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: IVec2,
    /// Unit direction
    pub dir: Vec2,
    pub active: bool,
}

/// Bullet fired by the player toward an obstacle
pub type PlayerBullet = Bullet;
/// Bullet fired by an obstacle toward the player
pub type EnemyBullet = Bullet;

impl Slot for Bullet {
    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Bullet {
    /// Bullet at `from` heading toward `to`.
    ///
    /// Returns `None` if the points are too close to define a direction.
    pub fn aimed(from: IVec2, to: IVec2) -> Option<Self> {
        let delta = (to - from).as_vec2();
        let len = delta.length();
        if len <= MIN_AIM_DISTANCE {
            return None;
        }
        Some(Self {
            pos: from,
            dir: delta / len,
            active: true,
        })
    }

    /// Move by `speed` pixels along the direction (truncating toward zero)
    pub fn advance(&mut self, speed: f32) {
        self.pos = (self.pos.as_vec2() + self.dir * speed).as_ivec2();
    }
}

/// Temporary invulnerability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shield {
    pub on: bool,
    pub frames_remaining: u32,
}

impl Shield {
    /// Turn the shield on, restarting the countdown if already on
    pub fn grant(&mut self) {
        self.on = true;
        self.frames_remaining = SHIELD_DURATION_TICKS;
    }

    /// Count down one tick, switching off at zero
    pub fn tick(&mut self) {
        if !self.on {
            return;
        }
        self.frames_remaining = self.frames_remaining.saturating_sub(1);
        if self.frames_remaining == 0 {
            self.on = false;
        }
    }
}

/// Complete game state (deterministic given the same RNG stream and inputs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub arena: Arena,
    pub player: Player,
    pub obstacles: Pool<Obstacle>,
    /// Obstacle slots eligible for activity; grows with score, never shrinks
    pub obstacle_count: usize,
    pub player_bullets: Pool<PlayerBullet>,
    pub enemy_bullets: Pool<EnemyBullet>,
    pub score: u32,
    pub high_score: u32,
    pub shield: Shield,
    /// Score at the last shield threshold check
    pub last_protection_score: u32,
    /// Ticks since the last regular enemy volley
    pub enemy_fire_counter: u32,
    /// Ticks since the last late-game barrage
    pub barrage_counter: u32,
    /// Unshielded enemy bullet hits this run
    pub player_hits: u32,
    pub phase: GamePhase,
    /// Set by the quit input; the driver stops once it sees this
    pub quit_requested: bool,
    /// Simulation tick counter (for the current run)
    pub time_ticks: u64,
    /// Events produced since the driver last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game in the given arena
    pub fn new<R: Rng + ?Sized>(arena: Arena, high_score: u32, rng: &mut R) -> Self {
        let mut state = Self {
            arena,
            player: Player::new(arena.center()),
            obstacles: Pool::new(MAX_OBSTACLES),
            obstacle_count: INITIAL_OBSTACLES,
            player_bullets: Pool::new(MAX_PLAYER_BULLETS),
            enemy_bullets: Pool::new(MAX_ENEMY_BULLETS),
            score: 0,
            high_score,
            shield: Shield::default(),
            last_protection_score: 0,
            enemy_fire_counter: 0,
            barrage_counter: 0,
            player_hits: 0,
            phase: GamePhase::Running,
            quit_requested: false,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.reset(rng);
        state
    }

    /// Reinitialize in place for a new run. The high score is kept.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.player = Player::new(self.arena.center());

        self.obstacle_count = INITIAL_OBSTACLES;
        let arena = self.arena;
        for (i, obstacle) in self.obstacles.iter_mut().enumerate() {
            if i < INITIAL_OBSTACLES {
                obstacle.respawn(&arena, rng);
            } else {
                obstacle.active = false;
                obstacle.hits = 0;
            }
        }

        self.player_bullets.release_all();
        self.enemy_bullets.release_all();

        self.score = 0;
        self.shield = Shield::default();
        self.last_protection_score = 0;
        self.enemy_fire_counter = 0;
        self.barrage_counter = 0;
        self.player_hits = 0;
        self.phase = GamePhase::Running;
        self.quit_requested = false;
        self.time_ticks = 0;
        self.events.clear();
    }

    /// Obstacle slots that may currently be active
    pub fn eligible_obstacles(&self) -> &[Obstacle] {
        &self.obstacles.as_slice()[..self.obstacle_count]
    }

    pub fn active_obstacle_count(&self) -> usize {
        self.eligible_obstacles().iter().filter(|o| o.active).count()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Enter GameOver and record the final score
    pub fn end_run(&mut self) {
        if self.phase != GamePhase::GameOver {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver { score: self.score });
            log::info!("Game over, final score {}", self.score);
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for presentation
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            arena: self.arena,
            player: self.player.pos,
            player_radius: self.player.radius,
            shield_on: self.shield.on,
            shield_frames_remaining: self.shield.frames_remaining,
            obstacles: self
                .eligible_obstacles()
                .iter()
                .filter(|o| o.active)
                .map(|o| ObstacleRect {
                    pos: o.pos,
                    size: o.size,
                })
                .collect(),
            player_bullets: self.player_bullets.iter_active().map(|(_, b)| b.pos).collect(),
            enemy_bullets: self.enemy_bullets.iter_active().map(|(_, b)| b.pos).collect(),
            score: self.score,
            high_score: self.high_score,
            player_hits: self.player_hits,
            paused: self.phase == GamePhase::Paused,
            game_over: self.is_over(),
            final_score: self.is_over().then_some(self.score),
        }
    }
}

/// Active obstacle as drawn on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleRect {
    pub pos: IVec2,
    pub size: IVec2,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub arena: Arena,
    pub player: IVec2,
    pub player_radius: i32,
    pub shield_on: bool,
    pub shield_frames_remaining: u32,
    pub obstacles: Vec<ObstacleRect>,
    pub player_bullets: Vec<IVec2>,
    pub enemy_bullets: Vec<IVec2>,
    pub score: u32,
    pub high_score: u32,
    pub player_hits: u32,
    pub paused: bool,
    pub game_over: bool,
    pub final_score: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_game_layout() {
        let mut rng = Pcg32::seed_from_u64(1);
        let state = GameState::new(Arena::default(), 42, &mut rng);
        assert_eq!(state.player.pos, IVec2::new(400, 300));
        assert_eq!(state.obstacle_count, INITIAL_OBSTACLES);
        assert_eq!(state.obstacles.active_count(), INITIAL_OBSTACLES);
        assert_eq!(state.player_bullets.active_count(), 0);
        assert_eq!(state.enemy_bullets.active_count(), 0);
        assert_eq!(state.high_score, 42);
        assert_eq!(state.phase, GamePhase::Running);
        for (i, o) in state.obstacles.iter().enumerate() {
            assert_eq!(o.active, i < INITIAL_OBSTACLES);
        }
    }

    #[test]
    fn test_spawn_within_margins() {
        let mut rng = Pcg32::seed_from_u64(7);
        let arena = Arena::default();
        let mut o = Obstacle::default();
        for _ in 0..500 {
            o.respawn(&arena, &mut rng);
            assert!((50..750).contains(&o.pos.x));
            assert!((50..550).contains(&o.pos.y));
            assert!((1..=3).contains(&o.vel.x.abs()));
            assert!((1..=3).contains(&o.vel.y.abs()));
            assert_eq!(o.hits, 0);
        }
    }

    #[test]
    fn test_obstacle_bounces() {
        let arena = Arena::default();
        let mut o = Obstacle {
            pos: IVec2::new(1, 300),
            vel: IVec2::new(-2, 0),
            active: true,
            ..Default::default()
        };
        o.advance(&arena);
        assert_eq!(o.pos.x, -1);
        assert_eq!(o.vel.x, 2);

        let mut o = Obstacle {
            pos: IVec2::new(400, 578),
            vel: IVec2::new(0, 3),
            active: true,
            ..Default::default()
        };
        o.advance(&arena);
        assert_eq!(o.vel.y, -3);
    }

    #[test]
    fn test_register_hit_destroys_on_second() {
        let mut o = Obstacle {
            active: true,
            ..Default::default()
        };
        assert!(!o.register_hit());
        assert_eq!(o.hits, 1);
        assert!(o.active);
        assert!(o.register_hit());
        assert_eq!(o.hits, 0);
        assert!(!o.active);
    }

    #[test]
    fn test_bullet_aimed_degenerate() {
        assert!(Bullet::aimed(IVec2::new(5, 5), IVec2::new(5, 5)).is_none());
        let b = Bullet::aimed(IVec2::ZERO, IVec2::new(3, 4)).unwrap();
        assert!((b.dir.length() - 1.0).abs() < 1e-6);
        assert!((b.dir.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_bullet_advance_truncates() {
        let mut b = Bullet {
            pos: IVec2::new(10, 10),
            dir: Vec2::new(0.6, -0.8),
            active: true,
        };
        b.advance(12.0);
        // 10 + 7.2 -> 17, 10 - 9.6 -> 0.4 -> 0
        assert_eq!(b.pos, IVec2::new(17, 0));
    }

    #[test]
    fn test_shield_grant_resets_countdown() {
        let mut shield = Shield::default();
        shield.grant();
        for _ in 0..50 {
            shield.tick();
        }
        assert_eq!(shield.frames_remaining, SHIELD_DURATION_TICKS - 50);
        shield.grant();
        assert!(shield.on);
        assert_eq!(shield.frames_remaining, SHIELD_DURATION_TICKS);
    }

    #[test]
    fn test_arena_clamp() {
        let arena = Arena::default();
        assert_eq!(arena.clamp_circle(IVec2::new(-20, 700), 15), IVec2::new(15, 585));
        assert_eq!(arena.clamp_circle(IVec2::new(400, 300), 15), IVec2::new(400, 300));
    }

    #[test]
    fn test_snapshot_reports_game_over() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = GameState::new(Arena::default(), 0, &mut rng);
        state.score = 77;
        state.end_run();
        let snap = state.snapshot();
        assert!(snap.game_over);
        assert_eq!(snap.final_score, Some(77));
        assert_eq!(snap.obstacles.len(), INITIAL_OBSTACLES);
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver { score: 77 }]);
        assert!(state.events.is_empty());
    }
}
