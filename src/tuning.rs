//! Gameplay tuning
//!
//! Defaults mirror `consts`; a page may override them with a JSON blob.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Data-driven knobs shared by stage generation, physics and the preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Logical playfield width in pixels.
    pub width: f32,
    /// Logical playfield height in pixels.
    pub height: f32,

    /// Projectile speed in pixels per millisecond.
    pub speed: f32,
    /// Projectile radius in pixels.
    pub radius: f32,
    /// Time-to-live of a shot in milliseconds.
    pub ttl_ms: f32,
    /// A shot ends once its bounce count exceeds this.
    pub max_bounces: u32,

    /// Delay between a cleared stage and the next one.
    pub stage_clear_delay_ms: f32,

    /// Preview sampling interval.
    pub preview_step_ms: f32,
    /// Preview sample cap.
    pub preview_max_steps: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            speed: PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            ttl_ms: PROJECTILE_TTL_MS,
            max_bounces: MAX_BOUNCES,
            stage_clear_delay_ms: STAGE_CLEAR_DELAY_MS,
            preview_step_ms: PREVIEW_STEP_MS,
            preview_max_steps: PREVIEW_MAX_STEPS,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Y coordinate of the launch line
    #[inline]
    pub fn launch_line_y(&self) -> f32 {
        self.height - LAUNCH_LINE_OFFSET
    }

    /// Y coordinate of a projectile resting on the launch line
    #[inline]
    pub fn launch_y(&self) -> f32 {
        self.launch_line_y() - self.radius - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_consts() {
        let t = Tuning::default();
        assert_eq!(t.width, 360.0);
        assert_eq!(t.height, 460.0);
        assert_eq!(t.launch_line_y(), 440.0);
        assert_eq!(t.launch_y(), 431.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{"speed": 0.5, "max_bounces": 3}"#).unwrap();
        assert_eq!(t.speed, 0.5);
        assert_eq!(t.max_bounces, 3);
        assert_eq!(t.radius, PROJECTILE_RADIUS);
        assert_eq!(t.ttl_ms, PROJECTILE_TTL_MS);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("not json").is_err());
    }
}
