//! Queue Breaker - A slingshot block breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (stage generation, physics, game state)
//! - `renderer`: Canvas 2D drawing
//! - `platform`: Browser frame loop and pointer mapping
//! - `persistence`: Stage progress in a key-value store
//! - `tuning`: Data-driven game balance

pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical canvas dimensions (playfield units)
    pub const CANVAS_WIDTH: f32 = 360.0;
    pub const CANVAS_HEIGHT: f32 = 460.0;

    /// Launch line sits this far above the bottom edge
    pub const LAUNCH_LINE_OFFSET: f32 = 20.0;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 0.35; // px per ms
    pub const PROJECTILE_RADIUS: f32 = 8.0;
    pub const PROJECTILE_TTL_MS: f32 = 7000.0;
    /// Shot ends once the bounce count exceeds this
    pub const MAX_BOUNCES: u32 = 10;

    /// Block grid layout
    pub const BLOCK_COLS: usize = 4;
    pub const BLOCK_ROWS: usize = 4;
    pub const BLOCK_PADDING: f32 = 8.0;
    pub const BLOCK_HEIGHT: f32 = 48.0;

    /// Boss layout
    pub const BOSS_STAGE_INTERVAL: u32 = 10;
    pub const BOSS_WIDTH_FRACTION: f32 = 0.7;
    pub const BOSS_HEIGHT: f32 = 80.0;
    pub const BOSS_Y: f32 = 40.0;

    /// Highest stage the game advances to or restores from storage
    pub const MAX_STAGE: u32 = 9999;

    /// Delay between clearing a stage and loading the next one
    pub const STAGE_CLEAR_DELAY_MS: f32 = 700.0;

    /// Trajectory preview sampling
    pub const PREVIEW_STEP_MS: f32 = 16.0;
    pub const PREVIEW_MAX_STEPS: usize = 80;

    /// Aim limits: keep at least this far (radians) off the horizon
    pub const AIM_MARGIN: f32 = 0.2;
    /// Horizontal inset for the launch origin
    pub const ORIGIN_INSET: f32 = 12.0;
    /// Vertical drag window above the launch line
    pub const DRAG_MIN_RISE: f32 = 20.0;
    pub const DRAG_MAX_RISE: f32 = 160.0;

    /// Largest frame delta fed to the simulation (ms)
    pub const MAX_FRAME_DT_MS: f32 = 100.0;
}

/// Clamp that never panics; when `min > max` the result is `max`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}
