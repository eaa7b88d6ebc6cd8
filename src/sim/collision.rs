//! Collision detection and response for a circle against the playfield
//!
//! Walls are the left, right and top edges; the bottom is open. Blocks are
//! axis-aligned rectangles resolved by penetration axis.

use glam::Vec2;

use super::state::{Block, Projectile};
use crate::clamp;

/// Result of a circle/rectangle check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Circle center minus the nearest point on the rectangle
    pub offset: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            offset: Vec2::ZERO,
        }
    }
}

/// Nearest point on the block to `p`
#[inline]
pub fn closest_point(p: Vec2, block: &Block) -> Vec2 {
    let (min, max) = (block.min(), block.max());
    Vec2::new(clamp(p.x, min.x, max.x), clamp(p.y, min.y, max.y))
}

/// Closest-point circle/rectangle test. Touching counts as a hit.
pub fn ball_block_collision(center: Vec2, radius: f32, block: &Block) -> CollisionResult {
    let point = closest_point(center, block);
    let offset = center - point;
    if offset.length_squared() <= radius * radius {
        CollisionResult { hit: true, offset }
    } else {
        CollisionResult::miss()
    }
}

/// First block overlapping the circle, in collection order (not nearest)
pub fn first_hit(center: Vec2, radius: f32, blocks: &[Block]) -> Option<(&Block, CollisionResult)> {
    blocks.iter().find_map(|b| {
        let result = ball_block_collision(center, radius, b);
        result.hit.then_some((b, result))
    })
}

/// Sign of `v`, or `fallback` when `v` is exactly zero
#[inline]
fn sign_or(v: f32, fallback: f32) -> f32 {
    if v == 0.0 { fallback } else { v.signum() }
}

/// Bounce a projectile off a block it overlaps, given the collision found at
/// the projectile's current position.
///
/// The axis with the larger offset from the nearest point decides the face:
/// that velocity component flips and the projectile is pushed just outside
/// the face. Equal offsets (corners, or a center inside the block) flip both
/// components without moving the projectile.
pub fn reflect_from_block(p: &mut Projectile, block: &Block, hit: &CollisionResult) {
    let d = hit.offset;
    let (abs_dx, abs_dy) = (d.x.abs(), d.y.abs());
    let (min, max) = (block.min(), block.max());

    if abs_dx > abs_dy {
        let dir = sign_or(d.x, sign_or(p.vel.x, 1.0));
        p.vel.x = -p.vel.x;
        p.pos.x = if dir > 0.0 {
            max.x + p.radius
        } else {
            min.x - p.radius
        };
    } else if abs_dy > abs_dx {
        let dir = sign_or(d.y, sign_or(p.vel.y, 1.0));
        p.vel.y = -p.vel.y;
        p.pos.y = if dir > 0.0 {
            max.y + p.radius
        } else {
            min.y - p.radius
        };
    } else {
        p.vel = -p.vel;
    }
}

/// Reflect off the left/right/top edges of a playfield `width` wide.
///
/// Returns the number of bounces (0..=2). Position is clamped back inside.
pub fn bounce_off_walls(pos: &mut Vec2, vel: &mut Vec2, radius: f32, width: f32) -> u32 {
    let mut bounces = 0;
    if pos.x - radius < 0.0 || pos.x + radius > width {
        vel.x = -vel.x;
        pos.x = clamp(pos.x, radius, width - radius);
        bounces += 1;
    }
    if pos.y - radius < 0.0 {
        vel.y = -vel.y;
        pos.y = radius;
        bounces += 1;
    }
    bounces
}
