//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame deltas only
//! - No RNG
//! - Stable iteration order (block generation order)
//! - No rendering or platform dependencies

pub mod aim;
pub mod collision;
pub mod damage;
pub mod stage;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use aim::{Aim, PointerInput, clamp_drag_point};
pub use collision::{CollisionResult, ball_block_collision, bounce_off_walls, reflect_from_block};
pub use damage::{apply_damage, has_won};
pub use stage::{generate_stage, generate_stage_with, is_boss_stage, swap_front};
pub use state::{
    Block, GameEvent, GameSnapshot, GameState, GameStatus, Projectile, ProjectileKind,
    ProjectileSpec, ShotEnd,
};
pub use tick::{FrameClock, StepOutcome, step_projectile, tick};
pub use trajectory::simulate_trajectory;
