//! Player fire: pick the nearest obstacles and aim a bullet at each

use glam::IVec2;

use super::state::{Bullet, GameState, Obstacle};
use crate::consts::*;

/// A candidate target and its squared distance to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub index: usize,
    pub dist_sq: i32,
}

/// How many bullets a single fire request may spawn at this score
pub fn shots_for_score(score: u32) -> usize {
    if score >= MULTI_SHOT_SCORE {
        MULTI_SHOT_TARGETS
    } else {
        1
    }
}

/// Active obstacles ordered by squared distance to `player`.
///
/// The sort is stable, so equal distances keep slot order.
pub fn nearest_targets(player: IVec2, obstacles: &[Obstacle]) -> Vec<Target> {
    let mut targets: Vec<Target> = obstacles
        .iter()
        .enumerate()
        .filter(|(_, o)| o.active)
        .map(|(index, o)| Target {
            index,
            dist_sq: (o.center() - player).length_squared(),
        })
        .collect();
    targets.sort_by_key(|t| t.dist_sq);
    targets
}

/// Handle a fire request. Returns the number of bullets spawned.
///
/// Requests at or above the score cap, or with no free bullet slot, do
/// nothing. Targets sitting on top of the player are skipped without using a
/// slot and the next nearest one is tried instead.
pub fn fire(state: &mut GameState) -> usize {
    if state.score >= FIRE_CAP_SCORE || !state.player_bullets.has_free() {
        return 0;
    }

    let origin = state.player.pos;
    let wanted = shots_for_score(state.score);
    let mut fired = 0;

    for target in nearest_targets(origin, state.eligible_obstacles()) {
        if fired >= wanted || !state.player_bullets.has_free() {
            break;
        }
        let aim = state.obstacles[target.index].center();
        let Some(bullet) = Bullet::aimed(origin, aim) else {
            continue;
        };
        if state.player_bullets.spawn(bullet).is_some() {
            fired += 1;
        }
    }

    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Arena;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Fresh game with only the given obstacle centres active
    fn game_with_targets(centres: &[IVec2]) -> GameState {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut state = GameState::new(Arena::default(), 0, &mut rng);
        for o in state.obstacles.iter_mut() {
            o.active = false;
        }
        for (i, c) in centres.iter().enumerate() {
            let o = &mut state.obstacles[i];
            o.pos = *c - o.size / 2;
            o.active = true;
        }
        state
    }

    fn player_pos() -> IVec2 {
        IVec2::new(400, 300)
    }

    #[test]
    fn test_single_shot_at_nearest() {
        let p = player_pos();
        let mut state = game_with_targets(&[
            p + IVec2::new(0, 30),
            p + IVec2::new(10, 0),
            p + IVec2::new(-20, 0),
        ]);
        assert_eq!(fire(&mut state), 1);
        let (_, bullet) = state.player_bullets.iter_active().next().unwrap();
        assert!((bullet.dir.x - 1.0).abs() < 1e-6);
        assert!(bullet.dir.y.abs() < 1e-6);
        assert_eq!(bullet.pos, p);
    }

    #[test]
    fn test_multi_shot_in_distance_order() {
        let p = player_pos();
        let mut state = game_with_targets(&[
            p + IVec2::new(0, 30),
            p + IVec2::new(10, 0),
            p + IVec2::new(-20, 0),
        ]);
        state.score = 5000;
        assert_eq!(fire(&mut state), 3);
        let dirs: Vec<_> = state.player_bullets.iter().map(|b| b.dir).collect();
        // Slots fill in order: distance 10 (right), 20 (left), 30 (down)
        assert!((dirs[0].x - 1.0).abs() < 1e-6);
        assert!((dirs[1].x + 1.0).abs() < 1e-6);
        assert!((dirs[2].y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_multi_shot_limited_by_targets() {
        let p = player_pos();
        let mut state = game_with_targets(&[p + IVec2::new(50, 0)]);
        state.score = 6000;
        assert_eq!(fire(&mut state), 1);
        assert_eq!(state.player_bullets.active_count(), 1);
    }

    #[test]
    fn test_fire_cap() {
        let p = player_pos();
        let mut state = game_with_targets(&[p + IVec2::new(50, 0)]);
        state.score = 9999;
        assert_eq!(fire(&mut state), 1);

        let mut state = game_with_targets(&[p + IVec2::new(50, 0)]);
        state.score = 10000;
        assert_eq!(fire(&mut state), 0);
        assert_eq!(state.player_bullets.active_count(), 0);
    }

    #[test]
    fn test_no_free_slot() {
        let p = player_pos();
        let mut state = game_with_targets(&[p + IVec2::new(50, 0)]);
        for _ in 0..MAX_PLAYER_BULLETS {
            assert_eq!(fire(&mut state), 1);
        }
        assert_eq!(fire(&mut state), 0);
    }

    #[test]
    fn test_tie_breaks_by_slot_index() {
        let p = player_pos();
        let targets = nearest_targets(
            p,
            game_with_targets(&[p + IVec2::new(0, 40), p + IVec2::new(40, 0)]).eligible_obstacles(),
        );
        assert_eq!(targets[0].index, 0);
        assert_eq!(targets[1].index, 1);
        assert_eq!(targets[0].dist_sq, targets[1].dist_sq);

        let mut state = game_with_targets(&[p + IVec2::new(0, 40), p + IVec2::new(40, 0)]);
        fire(&mut state);
        let (_, bullet) = state.player_bullets.iter_active().next().unwrap();
        assert!((bullet.dir.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_coincident_target_skipped() {
        let p = player_pos();
        let mut state = game_with_targets(&[p, p + IVec2::new(0, 60)]);
        assert_eq!(fire(&mut state), 1);
        assert_eq!(state.player_bullets.active_count(), 1);
        let (_, bullet) = state.player_bullets.iter_active().next().unwrap();
        assert!((bullet.dir.y - 1.0).abs() < 1e-6);
    }
}
