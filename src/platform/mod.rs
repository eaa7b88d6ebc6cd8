//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (requestAnimationFrame on web, with cancellation)
//! - Pointer coordinates (CSS pixels → logical canvas units)
//! - Page lifecycle (when `pagehide` ends the frame loop)

use glam::Vec2;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Map a pointer offset in CSS pixels to logical canvas units.
///
/// The canvas is drawn at a fixed logical size and scaled by CSS, so the
/// offset is rescaled by `logical / displayed`. A zero-sized display leaves
/// the point unscaled.
pub fn to_logical(offset: Vec2, displayed: Vec2, logical: Vec2) -> Vec2 {
    let scale = Vec2::new(
        if displayed.x > 0.0 {
            logical.x / displayed.x
        } else {
            1.0
        },
        if displayed.y > 0.0 {
            logical.y / displayed.y
        } else {
            1.0
        },
    );
    offset * scale
}

/// Whether a `pagehide` should stop the frame loop. Pages kept in the
/// back/forward cache (`persisted`) resume with their loop intact.
#[inline]
pub fn ends_frame_loop(persisted: bool) -> bool {
    !persisted
}
