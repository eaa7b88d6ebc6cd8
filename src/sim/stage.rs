//! Stage generation
//!
//! Layouts are a pure function of the stage number: reloading a stage always
//! yields the same blocks and a full queue.

use glam::Vec2;

use super::state::{Block, GameSnapshot, GameStatus, ProjectileKind, ProjectileSpec};
use crate::consts::*;
use crate::tuning::Tuning;

/// Every stage starts with these, in firing order
fn base_queue() -> Vec<ProjectileSpec> {
    vec![
        ProjectileSpec::new("p-normal-1", ProjectileKind::Normal, 1),
        ProjectileSpec::new("p-bomb-1", ProjectileKind::Bomb, 5),
        ProjectileSpec::new("p-normal-2", ProjectileKind::Normal, 1),
        ProjectileSpec::new("p-split-1", ProjectileKind::Splitter, 2),
    ]
}

#[inline]
pub fn is_boss_stage(stage: u32) -> bool {
    stage.is_multiple_of(BOSS_STAGE_INTERVAL)
}

/// Generate `stage` on the default playfield
pub fn generate_stage(stage: u32) -> GameSnapshot {
    generate_stage_with(stage, &Tuning::default())
}

/// Generate the blocks and projectile queue for `stage`
pub fn generate_stage_with(stage: u32, tuning: &Tuning) -> GameSnapshot {
    let boss = is_boss_stage(stage);
    let blocks = if boss {
        generate_boss(stage, tuning)
    } else {
        generate_grid(stage, tuning)
    };

    // One extra projectile every three stages, alternating normal/splitter
    let extra = (stage.min(MAX_STAGE) / 3) as usize;
    let mut queue = base_queue();
    queue.extend((0..extra).map(|i| {
        let (kind, damage) = if i % 2 == 0 {
            (ProjectileKind::Normal, 1)
        } else {
            (ProjectileKind::Splitter, 2)
        };
        ProjectileSpec::new(format!("p-extra-{stage}-{i}"), kind, damage)
    }));

    let boss_hp = if boss {
        blocks.first().map(|b| b.hp)
    } else {
        None
    };

    GameSnapshot {
        stage,
        blocks,
        queue,
        status: GameStatus::Idle,
        boss_hp,
    }
}

/// Width of one grid column for the given playfield width
pub fn grid_block_width(width: f32) -> f32 {
    (width - BLOCK_PADDING * (BLOCK_COLS as f32 + 1.0)) / BLOCK_COLS as f32
}

fn generate_grid(stage: u32, tuning: &Tuning) -> Vec<Block> {
    let difficulty = stage.saturating_sub(1) / 2;
    let width = grid_block_width(tuning.width);

    let mut blocks = Vec::with_capacity(BLOCK_ROWS * BLOCK_COLS);
    for row in 0..BLOCK_ROWS {
        // Lower rows are tougher
        let hp = 2 + row as u32 + difficulty;
        for col in 0..BLOCK_COLS {
            let x = BLOCK_PADDING + col as f32 * (width + BLOCK_PADDING);
            let y = BLOCK_PADDING + row as f32 * (BLOCK_HEIGHT + BLOCK_PADDING);
            blocks.push(Block {
                id: format!("b-{stage}-{row}-{col}"),
                pos: Vec2::new(x, y),
                size: Vec2::new(width, BLOCK_HEIGHT),
                hp,
                max_hp: hp,
                is_boss: false,
            });
        }
    }
    blocks
}

fn generate_boss(stage: u32, tuning: &Tuning) -> Vec<Block> {
    let hp = stage.saturating_mul(5).saturating_add(50);
    let width = tuning.width * BOSS_WIDTH_FRACTION;
    vec![Block {
        id: format!("boss-{stage}"),
        pos: Vec2::new((tuning.width - width) / 2.0, BOSS_Y),
        size: Vec2::new(width, BOSS_HEIGHT),
        hp,
        max_hp: hp,
        is_boss: true,
    }]
}

/// Exchange the queue head with entry `idx`. Out-of-range or zero `idx` is a no-op.
pub fn swap_front(queue: &[ProjectileSpec], idx: usize) -> Vec<ProjectileSpec> {
    let mut copy = queue.to_vec();
    if idx > 0 && idx < copy.len() {
        copy.swap(0, idx);
    }
    copy
}
