//! Idle/demo mode - a simple AI that produces input for the headless driver

use glam::IVec2;

use super::state::GameState;
use super::tick::TickInput;
use super::targeting::nearest_targets;
use crate::consts::*;

/// Obstacles closer than this (squared, centre to centre) are dodged
const DANGER_DIST_SQ: i32 = 90 * 90;
/// Don't bother drifting back when this close to the centre
const CENTER_SLACK: i32 = 40;

/// Decide the input for the next tick
///
/// Steers away from the nearest obstacle when it gets close, otherwise drifts
/// back toward the arena centre. Fires whenever a bullet slot is free and
/// restarts after game over.
pub fn autopilot_input(state: &GameState) -> TickInput {
    let mut input = TickInput::default();

    // A quit run stays over; the driver is about to stop
    if state.is_over() {
        input.restart = !state.quit_requested;
        return input;
    }

    let player = state.player.pos;
    let targets = nearest_targets(player, state.eligible_obstacles());

    let steer = match targets.first() {
        Some(t) if t.dist_sq < DANGER_DIST_SQ => {
            let away = player - state.obstacles[t.index].center();
            // Directly on top: pick any way out
            if away == IVec2::ZERO { IVec2::X } else { away.signum() }
        }
        _ => {
            let to_center = state.arena.center() - player;
            IVec2::new(
                if to_center.x.abs() > CENTER_SLACK { to_center.x.signum() } else { 0 },
                if to_center.y.abs() > CENTER_SLACK { to_center.y.signum() } else { 0 },
            )
        }
    };
    input.left = steer.x < 0;
    input.right = steer.x > 0;
    input.up = steer.y < 0;
    input.down = steer.y > 0;

    input.fire =
        !targets.is_empty() && state.score < FIRE_CAP_SCORE && state.player_bullets.has_free();

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Arena;
    use crate::sim::tick::tick;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_dodges_nearby_obstacle() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = GameState::new(Arena::default(), 0, &mut rng);
        for o in state.obstacles.iter_mut() {
            o.pos = IVec2::new(10, 10);
        }
        // Obstacle centred just up-left of the player
        state.obstacles[0].pos = IVec2::new(335, 240);
        let input = autopilot_input(&state);
        assert!(input.right && input.down);
        assert!(!input.left && !input.up);
        assert!(input.fire);
    }

    #[test]
    fn test_restarts_after_game_over() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut state = GameState::new(Arena::default(), 0, &mut rng);
        state.end_run();
        assert!(autopilot_input(&state).restart);
        state.quit_requested = true;
        assert!(!autopilot_input(&state).restart);
    }

    #[test]
    fn test_demo_run_stays_consistent() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut state = GameState::new(Arena::default(), 0, &mut rng);
        for _ in 0..3000 {
            let input = autopilot_input(&state);
            tick(&mut state, &input, &mut rng);
            assert!(state.obstacle_count <= MAX_OBSTACLES);
            assert!(state.player_bullets.active_count() <= MAX_PLAYER_BULLETS);
        }
        assert!(state.high_score > 0);
    }
}
