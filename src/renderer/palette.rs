//! Colors and small layout helpers shared by the canvas renderer and HUD

use crate::clamp;
use crate::sim::{Block, ProjectileKind};

pub const BACKGROUND_TOP: &str = "#141c37";
pub const BACKGROUND_BOTTOM: &str = "#0b1021";
pub const BLOCK_FILL: &str = "#3f6bff";
pub const BOSS_FILL: &str = "#f36c6c";
pub const BLOCK_ALPHA: f64 = 0.9;
pub const BLOCK_TEXT: &str = "#0b1021";
pub const BLOCK_FONT: &str = "bold 16px Arial";
pub const BOSS_BAR_TRACK: &str = "#1f294b";
pub const BOSS_BAR_FILL: &str = "#f36c6c";
pub const BOSS_BAR_HEIGHT: f32 = 10.0;
/// Gap between the bar's top edge and the boss block's top edge
pub const BOSS_BAR_OFFSET: f32 = 14.0;
pub const PROJECTILE_FILL: &str = "#f2c94c";
pub const LAUNCH_LINE: &str = "#243060";
pub const LAUNCH_LINE_WIDTH: f64 = 2.4;
pub const PREVIEW_DOT: &str = "#8aa1ff";
pub const PREVIEW_DOT_RADIUS: f64 = 2.5;
pub const ORIGIN_MARKER: &str = "#6b7cff";
pub const ORIGIN_MARKER_RADIUS: f64 = 6.0;

pub fn block_fill(block: &Block) -> &'static str {
    if block.is_boss { BOSS_FILL } else { BLOCK_FILL }
}

/// CSS background for the "next orb" badge
pub fn orb_paint(kind: ProjectileKind) -> &'static str {
    match kind {
        ProjectileKind::Bomb => "radial-gradient(circle at 30% 30%, #ffefa0, #f36c6c 55%, #b53d3d)",
        ProjectileKind::Splitter => {
            "radial-gradient(circle at 30% 30%, #b8f3ff, #6b7cff 55%, #2b3a7a)"
        }
        ProjectileKind::Normal => {
            "radial-gradient(circle at 30% 30%, #f7fbff, #8aa1ff 55%, #3a4b99)"
        }
    }
}

/// Preview dots fade along the path, never below 0.2
pub fn preview_alpha(index: usize, len: usize) -> f32 {
    if len == 0 {
        return 1.0;
    }
    clamp(1.0 - index as f32 / len as f32, 0.2, 1.0)
}

/// Boss health bar as `(x, y, full_width, filled_width)`
pub fn boss_bar(block: &Block) -> (f32, f32, f32, f32) {
    let width = block.size.x;
    (
        block.pos.x,
        block.pos.y - BOSS_BAR_OFFSET,
        width,
        width * block.hp_ratio(),
    )
}
