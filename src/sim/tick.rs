//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by exactly one step per call.
//! The caller owns the clock; nothing here knows about wall time.

use glam::IVec2;
use rand::Rng;

use super::collision::{bullet_rect_collision, circle_circle_collision, circle_rect_collision};
use super::progression;
use super::state::{GameEvent, GamePhase, GameState};
use super::targeting;
use crate::consts::*;

/// Input commands for a single tick
///
/// Direction flags are held keys and move the player every tick. The other
/// flags are edge events and should be cleared by the caller after one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire at the nearest obstacle(s)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// End the run and stop the game
    pub quit: bool,
    /// Start a new run after game over
    pub restart: bool,
}

impl TickInput {
    /// Net movement direction from the held keys
    pub fn direction(&self) -> IVec2 {
        IVec2::new(
            self.right as i32 - self.left as i32,
            self.down as i32 - self.up as i32,
        )
    }
}

/// Handle input, then advance the game state by one fixed timestep
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, input: &TickInput, rng: &mut R) {
    if input.quit && !state.quit_requested {
        state.quit_requested = true;
        state.end_run();
        return;
    }

    if input.restart && state.is_over() {
        state.reset(rng);
        log::info!("Restarted");
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Running,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Running {
        return;
    }

    move_player(state, input.direction());
    if input.fire {
        targeting::fire(state);
    }

    step(state, rng);
}

/// Move the player by one tick of held input, keeping it inside the arena
pub fn move_player(state: &mut GameState, direction: IVec2) {
    let pos = state.player.pos + direction * PLAYER_SPEED;
    state.player.pos = state.arena.clamp_circle(pos, state.player.radius);
}

/// Run one simulation step in the fixed order the rules depend on.
///
/// A fatal collision only stops the loop it happened in. The rest of the
/// tick still runs (including the score increment) and the run ends after
/// step 9.
pub fn step<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    if state.phase != GamePhase::Running {
        return;
    }
    state.time_ticks += 1;

    // 1. Population and speed rules
    progression::ensure_minimum_presence(state, rng);
    progression::expand_for_score(state, rng);
    progression::clamp_speeds(state);
    progression::maybe_redirect(state, rng);

    // 2. Obstacles
    let mut fatal = move_obstacles(state);

    // 3. Player bullets
    move_player_bullets(state);

    // 4. Everything destroyed
    progression::repopulate_if_empty(state, rng);

    // 5-6. Enemy fire
    progression::enemy_fire(state);
    fatal |= move_enemy_bullets(state);

    // 7. Score
    state.score += 1;
    if state.score > state.high_score {
        state.high_score = state.score;
        state.events.push(GameEvent::NewHighScore(state.score));
    }

    // 8. Shield
    progression::apply_shield_threshold(state);
    state.shield.tick();

    // 9. Late-game barrage
    progression::late_game_barrage(state);

    if fatal {
        state.end_run();
    }
}

/// Move obstacles and test them against the player.
///
/// Returns true if an unshielded collision ended the run. Obstacles after the
/// colliding one do not move this tick.
fn move_obstacles(state: &mut GameState) -> bool {
    let arena = state.arena;
    let player = state.player.pos;
    let radius = state.player.radius;
    let shielded = state.shield.on;
    let count = state.obstacle_count;

    for obstacle in state.obstacles.as_mut_slice()[..count].iter_mut() {
        if !obstacle.active {
            continue;
        }
        obstacle.advance(&arena);
        if circle_rect_collision(player, radius, obstacle.pos, obstacle.size) && !shielded {
            return true;
        }
    }
    false
}

/// Move player bullets, retire those leaving the arena and resolve hits
fn move_player_bullets(state: &mut GameState) {
    let speed = if state.score >= MULTI_SHOT_SCORE {
        BULLET_SPEED * 2.0
    } else {
        BULLET_SPEED
    };
    let count = state.obstacle_count;

    for b in 0..state.player_bullets.capacity() {
        let bullet = &mut state.player_bullets[b];
        if !bullet.active {
            continue;
        }
        bullet.advance(speed);
        if !state.arena.contains(bullet.pos) {
            bullet.active = false;
            continue;
        }
        let pos = bullet.pos;

        let hit = state.obstacles.as_slice()[..count]
            .iter()
            .position(|o| o.active && bullet_rect_collision(pos, BULLET_RADIUS, o.pos, o.size));
        if let Some(i) = hit {
            state.player_bullets.release(b);
            if state.obstacles[i].register_hit() {
                state.events.push(GameEvent::ObstacleDestroyed(i));
            }
        }
    }
}

/// Move enemy bullets and test them against the player.
///
/// Returns true if the player took the last hit it could survive.
fn move_enemy_bullets(state: &mut GameState) -> bool {
    for b in 0..state.enemy_bullets.capacity() {
        let bullet = &mut state.enemy_bullets[b];
        if !bullet.active {
            continue;
        }
        bullet.advance(ENEMY_BULLET_SPEED);
        if !state.arena.contains(bullet.pos) {
            bullet.active = false;
            continue;
        }
        let pos = bullet.pos;

        if !circle_circle_collision(pos, ENEMY_BULLET_RADIUS, state.player.pos, state.player.radius) {
            continue;
        }
        state.enemy_bullets.release(b);
        if state.shield.on {
            continue;
        }
        state.player_hits += 1;
        state.events.push(GameEvent::PlayerHit);
        if state.player_hits >= LETHAL_PLAYER_HITS {
            return true;
        }
    }
    false
}
