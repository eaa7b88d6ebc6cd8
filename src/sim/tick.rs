//! Per-frame simulation step
//!
//! Advances the in-flight projectile, resolves collisions, and drives the
//! idle → firing → won/lost state machine. Time is in milliseconds.

use super::collision::{bounce_off_walls, first_hit, reflect_from_block};
use super::damage::{apply_damage, has_won};
use super::state::{
    Block, GameEvent, GameState, GameStatus, MESSAGE_OUT_OF_PROJECTILES, MESSAGE_STAGE_CLEARED,
    Projectile, ShotEnd,
};
use crate::consts::{MAX_FRAME_DT_MS, MAX_STAGE};
use crate::tuning::Tuning;

/// Turns animation-frame timestamps into simulation deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    /// Milliseconds since the previous frame; zero on the first frame after a reset.
    ///
    /// Capped at `MAX_FRAME_DT_MS`, so after a stall the projectile TTL and the
    /// stage-clear delay run behind wall-clock time.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let prev = self.last_ms.unwrap_or(now_ms);
        self.last_ms = Some(now_ms);
        ((now_ms - prev) as f32).clamp(0.0, MAX_FRAME_DT_MS)
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// What happened to the projectile during one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    /// Block struck this step, with its hp afterwards (0 = destroyed)
    pub hit: Option<(String, u32)>,
    /// Set when the shot is over
    pub ended: Option<ShotEnd>,
}

/// Advance one projectile by `dt` ms against the walls and `blocks`.
///
/// Only the first overlapping block in collection order is struck.
pub fn step_projectile(
    p: &mut Projectile,
    blocks: &mut Vec<Block>,
    dt: f32,
    tuning: &Tuning,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    p.ttl_ms -= dt;
    p.pos += p.vel * dt;

    p.bounces += bounce_off_walls(&mut p.pos, &mut p.vel, p.radius, tuning.width);

    let hit = first_hit(p.pos, p.radius, blocks).map(|(b, result)| (b.clone(), result));
    if let Some((block, result)) = hit {
        *blocks = apply_damage(blocks, &block.id, p.damage);
        let hp = blocks
            .iter()
            .find(|b| b.id == block.id)
            .map_or(0, |b| b.hp);
        reflect_from_block(p, &block, &result);
        p.bounces += 1;
        outcome.hit = Some((block.id, hp));
    }

    outcome.ended = if p.ttl_ms <= 0.0 {
        Some(ShotEnd::Expired)
    } else if p.bounces > tuning.max_bounces {
        Some(ShotEnd::BounceLimit)
    } else if p.pos.y - p.radius > tuning.height {
        Some(ShotEnd::ExitedBottom)
    } else {
        None
    };

    outcome
}

/// Advance the game by `dt` milliseconds
pub fn tick(state: &mut GameState, dt: f32) {
    match state.status {
        GameStatus::Firing => tick_firing(state, dt),
        GameStatus::Won => {
            state.clear_timer_ms -= dt;
            if state.clear_timer_ms <= 0.0 {
                let next = state.stage.saturating_add(1).min(MAX_STAGE);
                state.load_stage(next);
            }
        }
        GameStatus::Idle | GameStatus::Lost => {}
    }
}

fn tick_firing(state: &mut GameState, dt: f32) {
    let Some(mut projectile) = state.projectile.take() else {
        // Firing with nothing in flight; settle the shot
        end_shot(state, ShotEnd::Expired);
        return;
    };

    let tuning = state.tuning;
    let outcome = step_projectile(&mut projectile, &mut state.blocks, dt, &tuning);

    if let Some((block_id, hp)) = outcome.hit {
        if hp == 0 {
            log::debug!("Block {} destroyed", block_id);
            state.push_event(GameEvent::BlockDestroyed { block_id });
        } else {
            log::debug!("Block {} hit, {} hp left", block_id, hp);
            state.push_event(GameEvent::BlockHit { block_id, hp });
        }
    }

    match outcome.ended {
        Some(reason) => end_shot(state, reason),
        None => state.projectile = Some(projectile),
    }
}

fn end_shot(state: &mut GameState, reason: ShotEnd) {
    state.projectile = None;
    state.push_event(GameEvent::ShotEnded { reason });

    if has_won(&state.blocks) {
        log::info!("Stage {} cleared", state.stage);
        state.status = GameStatus::Won;
        state.message = Some(MESSAGE_STAGE_CLEARED.to_string());
        state.clear_timer_ms = state.tuning.stage_clear_delay_ms;
        state.push_event(GameEvent::StageCleared { stage: state.stage });
    } else if state.queue.is_empty() {
        log::info!(
            "Stage {} lost with {} blocks left",
            state.stage,
            state.blocks.len()
        );
        state.status = GameStatus::Lost;
        state.message = Some(MESSAGE_OUT_OF_PROJECTILES.to_string());
        state.push_event(GameEvent::OutOfProjectiles { stage: state.stage });
    } else {
        log::debug!("Shot ended ({:?}), {} left", reason, state.queue.len());
        state.status = GameStatus::Idle;
    }
}

impl GameState {
    /// Advance to the animation-frame timestamp `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        let dt = self.clock.delta(now_ms);
        tick(self, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn block(id: &str, pos: Vec2, hp: u32) -> Block {
        Block {
            id: id.to_string(),
            pos,
            size: Vec2::new(80.0, 48.0),
            hp,
            max_hp: hp,
            is_boss: false,
        }
    }

    fn projectile(pos: Vec2, vel: Vec2) -> Projectile {
        Projectile {
            pos,
            vel,
            radius: 8.0,
            damage: 1,
            bounces: 0,
            ttl_ms: 7000.0,
        }
    }

    /// Game with a single block and a projectile already in flight
    fn firing_state(blocks: Vec<Block>, queue_len: usize, p: Projectile) -> GameState {
        let mut state = GameState::new(1, Tuning::default());
        state.blocks = blocks;
        state.queue.truncate(queue_len);
        state.projectile = Some(p);
        state.status = GameStatus::Firing;
        state.drain_events();
        state
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.delta(1000.0), 0.0);
        assert_eq!(clock.delta(1016.0), 16.0);
        // Long stalls are capped
        assert_eq!(clock.delta(5000.0), MAX_FRAME_DT_MS);
        clock.reset();
        assert_eq!(clock.delta(6000.0), 0.0);
    }

    #[test]
    fn test_stalled_frame_only_spends_capped_ttl() {
        let mut state = GameState::new(1, Tuning::default());
        state.pointer_down(Vec2::new(180.0, 300.0));
        state.pointer_up();
        state.frame(1000.0);
        state.frame(6000.0);
        let p = state.projectile.as_ref().unwrap();
        assert_eq!(p.ttl_ms, state.tuning.ttl_ms - MAX_FRAME_DT_MS);
    }

    #[test]
    fn test_first_frame_of_shot_does_not_move() {
        let mut state = GameState::new(1, Tuning::default());
        state.frame(100.0);
        state.frame(116.0);
        state.pointer_down(Vec2::new(180.0, 300.0));
        assert!(state.pointer_up());
        let before = state.projectile.clone().unwrap();

        state.frame(5000.0);
        assert_eq!(state.projectile.as_ref().unwrap().pos, before.pos);
        state.frame(5016.0);
        let after = state.projectile.as_ref().unwrap();
        assert!(after.pos.y < before.pos.y);
        assert_eq!(after.ttl_ms, 7000.0 - 16.0);
    }

    #[test]
    fn test_step_moves_by_velocity() {
        let mut p = projectile(Vec2::new(180.0, 400.0), Vec2::new(0.1, -0.2));
        let mut blocks = Vec::new();
        let out = step_projectile(&mut p, &mut blocks, 10.0, &Tuning::default());
        assert_eq!(out, StepOutcome::default());
        assert!((p.pos - Vec2::new(181.0, 398.0)).length() < 1e-4);
        assert_eq!(p.ttl_ms, 6990.0);
    }

    #[test]
    fn test_block_hit_damages_and_reflects() {
        let mut blocks = vec![block("b", Vec2::new(100.0, 100.0), 2)];
        let mut p = projectile(Vec2::new(140.0, 160.0), Vec2::new(0.0, -0.35));
        let out = step_projectile(&mut p, &mut blocks, 16.0, &Tuning::default());

        assert_eq!(out.hit, Some(("b".to_string(), 1)));
        assert_eq!(out.ended, None);
        assert_eq!(blocks[0].hp, 1);
        assert_eq!(p.vel.y, 0.35);
        assert_eq!(p.pos.y, 148.0 + 8.0);
        assert_eq!(p.bounces, 1);
    }

    #[test]
    fn test_only_first_block_in_order_is_struck() {
        let mut blocks = vec![
            block("upper", Vec2::new(100.0, 60.0), 3),
            block("lower", Vec2::new(100.0, 100.0), 3),
        ];
        // Overlaps both blocks at once
        let mut p = projectile(Vec2::new(140.0, 104.0), Vec2::new(0.0, 0.0));
        let out = step_projectile(&mut p, &mut blocks, 0.0, &Tuning::default());
        assert_eq!(out.hit.map(|(id, _)| id), Some("upper".to_string()));
        assert_eq!(blocks[0].hp, 2);
        assert_eq!(blocks[1].hp, 3);
    }

    #[test]
    fn test_eleventh_bounce_ends_shot() {
        let mut p = projectile(Vec2::new(180.0, 9.0), Vec2::new(0.0, -0.35));
        p.bounces = 10;
        let mut blocks = vec![block("far", Vec2::new(0.0, 300.0), 5)];
        let out = step_projectile(&mut p, &mut blocks, 16.0, &Tuning::default());
        assert_eq!(p.bounces, 11);
        assert!(p.ttl_ms > 0.0);
        assert_eq!(out.ended, Some(ShotEnd::BounceLimit));
    }

    #[test]
    fn test_bottom_exit_ends_shot() {
        let mut p = projectile(Vec2::new(180.0, 465.0), Vec2::new(0.0, 0.35));
        let mut blocks = Vec::new();
        let out = step_projectile(&mut p, &mut blocks, 16.0, &Tuning::default());
        assert_eq!(out.ended, Some(ShotEnd::ExitedBottom));
    }

    #[test]
    fn test_clearing_last_block_wins_then_loads_next_stage() {
        let last = block("last", Vec2::new(100.0, 100.0), 1);
        let p = projectile(Vec2::new(140.0, 160.0), Vec2::new(0.0, -0.35));
        let mut state = firing_state(vec![last], 2, p);

        tick(&mut state, 16.0);
        assert!(state.blocks.is_empty());
        // Still in flight: the shot must end before the stage is won
        assert_eq!(state.status, GameStatus::Firing);

        // Fly out through the bottom
        for _ in 0..200 {
            if state.status != GameStatus::Firing {
                break;
            }
            tick(&mut state, 16.0);
        }
        assert_eq!(state.status, GameStatus::Won);
        assert!(state.projectile.is_none());
        assert_eq!(state.message.as_deref(), Some(MESSAGE_STAGE_CLEARED));

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::BlockDestroyed {
            block_id: "last".into()
        }));
        assert!(events.contains(&GameEvent::StageCleared { stage: 1 }));

        tick(&mut state, 300.0);
        assert_eq!(state.status, GameStatus::Won);
        assert_eq!(state.stage, 1);

        tick(&mut state, 400.0);
        assert_eq!(state.status, GameStatus::Idle);
        assert_eq!(state.stage, 2);
        assert_eq!(state.blocks.len(), 16);
        assert_eq!(state.queue.len(), 4);
        assert!(state.message.is_none());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::StageStarted { stage: 2 }]
        );
    }

    #[test]
    fn test_clearing_final_stage_stays_on_final_stage() {
        let last = block("last", Vec2::new(100.0, 100.0), 1);
        let p = projectile(Vec2::new(140.0, 160.0), Vec2::new(0.0, -0.35));
        let mut state = firing_state(vec![last], 1, p);
        state.stage = MAX_STAGE;

        for _ in 0..200 {
            if state.status != GameStatus::Firing {
                break;
            }
            tick(&mut state, 16.0);
        }
        assert_eq!(state.status, GameStatus::Won);

        tick(&mut state, 700.0);
        assert_eq!(state.status, GameStatus::Idle);
        assert_eq!(state.stage, MAX_STAGE);
    }

    #[test]
    fn test_ttl_out_with_empty_queue_loses() {
        let far = block("far", Vec2::new(0.0, 0.0), 5);
        let mut p = projectile(Vec2::new(180.0, 300.0), Vec2::ZERO);
        p.ttl_ms = 10.0;
        let mut state = firing_state(vec![far], 0, p);

        tick(&mut state, 16.0);
        assert_eq!(state.status, GameStatus::Lost);
        assert!(state.projectile.is_none());
        assert_eq!(state.message.as_deref(), Some(MESSAGE_OUT_OF_PROJECTILES));
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::ShotEnded {
                    reason: ShotEnd::Expired
                },
                GameEvent::OutOfProjectiles { stage: 1 },
            ]
        );

        // Lost is terminal until a retry
        tick(&mut state, 1000.0);
        assert_eq!(state.status, GameStatus::Lost);
        assert!(state.retry());
        assert_eq!(state.status, GameStatus::Idle);
    }

    #[test]
    fn test_ttl_out_with_queue_left_returns_to_idle() {
        let far = block("far", Vec2::new(0.0, 0.0), 5);
        let mut p = projectile(Vec2::new(180.0, 300.0), Vec2::ZERO);
        p.ttl_ms = 10.0;
        let mut state = firing_state(vec![far], 2, p);

        tick(&mut state, 16.0);
        assert_eq!(state.status, GameStatus::Idle);
        assert_eq!(state.queue.len(), 2);
        assert!(state.message.is_none());
    }

    #[test]
    fn test_full_stage_is_deterministic() {
        let run = || {
            let mut state = GameState::new(1, Tuning::default());
            let mut t = 0.0;
            for x in [60.0, 180.0, 300.0, 120.0] {
                state.pointer_down(Vec2::new(x, 300.0));
                state.pointer_move(Vec2::new(x + 40.0, 290.0));
                state.pointer_up();
                while state.status == GameStatus::Firing {
                    t += 16.0;
                    state.frame(t);
                }
            }
            state.snapshot()
        };
        assert_eq!(run(), run());
    }
}
