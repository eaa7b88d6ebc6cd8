//! Aim preview
//!
//! Samples the path a shot would take from the launch point, reflecting off
//! the side and top walls like the live stepper. Blocks are ignored.

use glam::Vec2;

use super::collision::bounce_off_walls;
use crate::tuning::Tuning;

/// Preview points for a shot at `angle` launched from `origin_x`.
///
/// Sampling stops after `preview_max_steps` points or once the path leaves
/// through the bottom edge (that exiting point is the last one returned).
pub fn simulate_trajectory(angle: f32, origin_x: f32, tuning: &Tuning) -> Vec<Vec2> {
    let radius = tuning.radius;
    let dt = tuning.preview_step_ms;
    let mut pos = Vec2::new(origin_x, tuning.launch_y());
    let mut vel = Vec2::from_angle(angle) * tuning.speed;

    let mut points = Vec::with_capacity(tuning.preview_max_steps);
    for _ in 0..tuning.preview_max_steps {
        pos += vel * dt;
        bounce_off_walls(&mut pos, &mut vel, radius, tuning.width);
        points.push(pos);

        if pos.y - radius > tuning.height {
            break;
        }
    }
    points
}
