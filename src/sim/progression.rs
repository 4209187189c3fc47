//! Score-driven difficulty rules
//!
//! Each rule is independent and safe to evaluate every tick; a rule whose
//! condition does not hold leaves the state untouched.

use glam::IVec2;
use rand::Rng;

use super::state::{Bullet, GameEvent, GameState};
use crate::consts::*;

/// Activate slots `from..to`, raising `obstacle_count` to `to`
fn activate_range<R: Rng + ?Sized>(state: &mut GameState, from: usize, to: usize, rng: &mut R) {
    let arena = state.arena;
    for obstacle in &mut state.obstacles.as_mut_slice()[from..to] {
        obstacle.respawn(&arena, rng);
    }
    state.obstacle_count = state.obstacle_count.max(to);
}

/// Refill to the initial obstacle count when almost nothing is left.
///
/// Only applies while `obstacle_count` is below the initial count.
pub fn ensure_minimum_presence<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> bool {
    if state.active_obstacle_count() >= MIN_ACTIVE_OBSTACLES
        || state.obstacle_count >= INITIAL_OBSTACLES
    {
        return false;
    }
    let from = state.obstacle_count;
    activate_range(state, from, INITIAL_OBSTACLES, rng);
    true
}

/// Open every remaining slot at 2000 points and each 500 after
pub fn expand_for_score<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> bool {
    let on_step = state.score >= EXPANSION_START_SCORE
        && (state.score - EXPANSION_START_SCORE) % EXPANSION_STEP == 0;
    if !on_step || state.obstacle_count >= MAX_OBSTACLES {
        return false;
    }
    let from = state.obstacle_count;
    activate_range(state, from, MAX_OBSTACLES, rng);
    true
}

/// Per-axis obstacle speed limit at this score
pub fn speed_cap(score: u32) -> i32 {
    OBSTACLE_BASE_SPEED_CAP * (1 + (score / SPEED_STEP_SCORE) as i32)
}

/// Clamp every active obstacle's velocity into the band for the current score
pub fn clamp_speeds(state: &mut GameState) {
    let cap = speed_cap(state.score);
    let count = state.obstacle_count;
    for obstacle in state.obstacles.as_mut_slice()[..count].iter_mut().filter(|o| o.active) {
        obstacle.vel = obstacle.vel.clamp(IVec2::splat(-cap), IVec2::splat(cap));
    }
}

/// Occasionally re-roll obstacle velocities. Returns how many changed course.
///
/// The chance of a redirect pass grows with score; within a pass each active
/// obstacle has a 1 in 10 chance of a new velocity.
pub fn maybe_redirect<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> usize {
    let threshold = state.score / REDIRECT_SCORE_DIVISOR;
    if rng.random_range(0..REDIRECT_ROLL_RANGE) >= threshold {
        return 0;
    }
    let count = state.obstacle_count;
    let mut redirected = 0;
    for obstacle in state.obstacles.as_mut_slice()[..count].iter_mut().filter(|o| o.active) {
        if rng.random_ratio(1, REDIRECT_PER_OBSTACLE_ODDS) {
            obstacle.roll_velocity(rng);
            redirected += 1;
        }
    }
    redirected
}

/// Reset the whole pool: every slot active, fresh positions and velocities
pub fn repopulate<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    state.obstacle_count = MAX_OBSTACLES;
    let arena = state.arena;
    for obstacle in state.obstacles.iter_mut() {
        obstacle.respawn(&arena, rng);
    }
    state.events.push(GameEvent::Repopulated);
    log::debug!("All obstacles cleared at score {}, repopulating", state.score);
}

/// Repopulate if no obstacle is left alive
pub fn repopulate_if_empty<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> bool {
    if state.active_obstacle_count() > 0 {
        return false;
    }
    repopulate(state, rng);
    true
}

/// Grant the shield once per 500-point boundary crossed since the last check
pub fn apply_shield_threshold(state: &mut GameState) -> bool {
    let crossed = state.score / SHIELD_SCORE_STEP > state.last_protection_score / SHIELD_SCORE_STEP;
    if crossed {
        state.shield.grant();
        state.events.push(GameEvent::ShieldGranted);
        log::debug!("Shield granted at score {}", state.score);
    }
    state.last_protection_score = state.score;
    crossed
}

/// Up to `shooters` active obstacles, in slot order, each fire one bullet at
/// the player. An obstacle counts as a shooter even if no slot was free.
pub fn fire_from_obstacles(state: &mut GameState, shooters: usize) -> usize {
    let target = state.player.pos;
    let count = state.obstacle_count;
    let mut processed = 0;
    let mut spawned = 0;
    for i in 0..count {
        if !state.obstacles[i].active {
            continue;
        }
        if processed >= shooters {
            break;
        }
        let origin = state.obstacles[i].center();
        if let Some(bullet) = Bullet::aimed(origin, target) {
            if state.enemy_bullets.spawn(bullet).is_some() {
                spawned += 1;
            }
        }
        processed += 1;
    }
    spawned
}

/// Regular enemy volley every 500 ticks
pub fn enemy_fire(state: &mut GameState) -> usize {
    state.enemy_fire_counter += 1;
    if state.enemy_fire_counter < ENEMY_FIRE_INTERVAL {
        return 0;
    }
    state.enemy_fire_counter = 0;
    fire_from_obstacles(state, ENEMY_FIRE_SHOOTERS)
}

/// From 15000 points on, a bigger volley every 400 ticks.
///
/// The counter only accumulates while the score is at or above the threshold
/// and is cleared on any tick below it.
pub fn late_game_barrage(state: &mut GameState) -> usize {
    if state.score < BARRAGE_START_SCORE {
        state.barrage_counter = 0;
        return 0;
    }
    state.barrage_counter += 1;
    if state.barrage_counter < BARRAGE_INTERVAL {
        return 0;
    }
    state.barrage_counter = 0;
    fire_from_obstacles(state, BARRAGE_SHOOTERS)
}
