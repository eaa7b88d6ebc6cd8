//! Slingshot aiming
//!
//! Pointer-down picks the launch origin on the launch line, dragging sets the
//! angle, pointer-up fires the head of the queue.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

use super::state::{GameEvent, GameState, GameStatus, Projectile};
use super::trajectory::simulate_trajectory;
use crate::clamp;
use crate::consts::*;
use crate::tuning::Tuning;

/// Pointer input in logical canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(Vec2),
    Move(Vec2),
    Up,
    /// Pointer left the canvas or the gesture was cancelled
    Leave,
}

/// Aim state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    /// Launch origin on the launch line
    pub origin_x: f32,
    /// Launch angle in radians (screen space, negative is up)
    pub angle: f32,
    pub dragging: bool,
    /// Preview path while dragging
    #[serde(skip)]
    pub preview: Vec<Vec2>,
}

impl Aim {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            origin_x: tuning.width / 2.0,
            angle: -FRAC_PI_2,
            dragging: false,
            preview: Vec::new(),
        }
    }

    /// Launch point for the next shot
    pub fn launch_point(&self, tuning: &Tuning) -> Vec2 {
        Vec2::new(self.origin_x, tuning.launch_y())
    }

    /// Point the slingshot from the origin toward `target`
    fn update(&mut self, target: Vec2, tuning: &Tuning) {
        let raw = (target.y - tuning.launch_line_y()).atan2(target.x - self.origin_x);
        // Keep shots upward
        self.angle = clamp(raw, -PI + AIM_MARGIN, -AIM_MARGIN);
        self.preview = simulate_trajectory(self.angle, self.origin_x, tuning);
    }

    fn release(&mut self) {
        self.dragging = false;
        self.preview.clear();
    }
}

/// Clamp a pointer into the drag window above the launch line
pub fn clamp_drag_point(p: Vec2, tuning: &Tuning) -> Vec2 {
    let line_y = tuning.launch_line_y();
    Vec2::new(
        clamp(p.x, ORIGIN_INSET, tuning.width - ORIGIN_INSET),
        clamp(p.y, line_y - DRAG_MAX_RISE, line_y - DRAG_MIN_RISE),
    )
}

impl GameState {
    /// Route one pointer event. Returns true if it launched a shot.
    pub fn handle_pointer(&mut self, input: PointerInput) -> bool {
        match input {
            PointerInput::Down(p) => {
                self.pointer_down(p);
                false
            }
            PointerInput::Move(p) => {
                self.pointer_move(p);
                false
            }
            PointerInput::Up => self.pointer_up(),
            PointerInput::Leave => {
                self.pointer_leave();
                false
            }
        }
    }

    /// Start aiming. The pointer's x becomes the launch origin.
    pub fn pointer_down(&mut self, p: Vec2) {
        if matches!(self.status, GameStatus::Firing | GameStatus::Won) {
            return;
        }
        let p = clamp_drag_point(p, &self.tuning);
        self.aim.origin_x = p.x;
        self.aim.dragging = true;
        self.aim.update(p, &self.tuning);
    }

    /// Re-aim while dragging; the origin stays put
    pub fn pointer_move(&mut self, p: Vec2) {
        if !self.aim.dragging {
            return;
        }
        let p = clamp_drag_point(p, &self.tuning);
        self.aim.update(p, &self.tuning);
    }

    /// Release the slingshot, firing the queue head if possible
    pub fn pointer_up(&mut self) -> bool {
        if !self.aim.dragging {
            return false;
        }
        self.aim.release();
        if self.status != GameStatus::Idle || self.queue.is_empty() {
            return false;
        }
        self.launch();
        true
    }

    /// Abandon the drag without firing
    pub fn pointer_leave(&mut self) {
        if self.aim.dragging {
            self.aim.release();
        }
    }

    fn launch(&mut self) {
        let spec = self.queue.remove(0);
        let origin = self.aim.launch_point(&self.tuning);
        self.projectile = Some(Projectile::launch(
            origin,
            self.aim.angle,
            spec.damage,
            &self.tuning,
        ));
        self.status = GameStatus::Firing;
        self.message = None;
        // First frame of a shot advances by zero
        self.clock.reset();

        log::info!(
            "Fired {} ({}, dmg {}) at {:.2} rad from x={:.0}",
            spec.id,
            spec.kind.as_str(),
            spec.damage,
            self.aim.angle,
            origin.x
        );
        self.push_event(GameEvent::ShotStarted {
            projectile_id: spec.id,
            kind: spec.kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ProjectileKind;

    fn state() -> GameState {
        let mut s = GameState::new(1, Tuning::default());
        s.drain_events();
        s
    }

    #[test]
    fn test_clamp_drag_point() {
        let t = Tuning::default();
        assert_eq!(
            clamp_drag_point(Vec2::new(0.0, 0.0), &t),
            Vec2::new(12.0, 280.0)
        );
        assert_eq!(
            clamp_drag_point(Vec2::new(500.0, 460.0), &t),
            Vec2::new(348.0, 420.0)
        );
        assert_eq!(
            clamp_drag_point(Vec2::new(100.0, 300.0), &t),
            Vec2::new(100.0, 300.0)
        );
    }

    #[test]
    fn test_pointer_down_sets_origin_and_preview() {
        let mut s = state();
        s.pointer_down(Vec2::new(5.0, 300.0));
        assert!(s.aim.dragging);
        assert_eq!(s.aim.origin_x, 12.0);
        // Drag point sits straight above the origin
        assert!((s.aim.angle + FRAC_PI_2).abs() < 1e-6);
        assert!(!s.aim.preview.is_empty());
    }

    #[test]
    fn test_angle_is_clamped_upward() {
        let mut s = state();
        s.pointer_down(Vec2::new(180.0, 400.0));
        // Far to the right and as low as allowed: nearly horizontal
        s.pointer_move(Vec2::new(10_000.0, 420.0));
        assert!(s.aim.angle <= -AIM_MARGIN);
        assert!(s.aim.angle >= -PI + AIM_MARGIN);
        assert_eq!(s.aim.origin_x, 180.0);
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut s = state();
        let before = s.aim.clone();
        s.pointer_move(Vec2::new(50.0, 300.0));
        assert_eq!(s.aim, before);
    }

    #[test]
    fn test_pointer_up_fires_queue_head() {
        let mut s = state();
        s.pointer_down(Vec2::new(100.0, 300.0));
        assert!(s.pointer_up());

        assert_eq!(s.status, GameStatus::Firing);
        assert_eq!(s.queue.len(), 3);
        assert!(!s.aim.dragging);
        assert!(s.aim.preview.is_empty());

        let p = s.projectile.as_ref().unwrap();
        assert_eq!(p.pos, Vec2::new(100.0, 431.0));
        assert_eq!(p.damage, 1);
        assert_eq!(p.bounces, 0);
        assert_eq!(p.ttl_ms, 7000.0);
        assert!((p.vel.length() - 0.35).abs() < 1e-6);
        assert!(p.vel.y < 0.0);

        assert_eq!(
            s.drain_events(),
            vec![GameEvent::ShotStarted {
                projectile_id: "p-normal-1".into(),
                kind: ProjectileKind::Normal,
            }]
        );
    }

    #[test]
    fn test_no_input_while_firing() {
        let mut s = state();
        s.pointer_down(Vec2::new(100.0, 300.0));
        s.pointer_up();
        s.pointer_down(Vec2::new(200.0, 300.0));
        assert!(!s.aim.dragging);
        assert!(!s.pointer_up());
        assert_eq!(s.queue.len(), 3);
    }

    #[test]
    fn test_leave_cancels_without_firing() {
        let mut s = state();
        assert!(!s.handle_pointer(PointerInput::Down(Vec2::new(100.0, 300.0))));
        s.handle_pointer(PointerInput::Leave);
        assert!(!s.aim.dragging);
        assert!(!s.handle_pointer(PointerInput::Up));
        assert_eq!(s.status, GameStatus::Idle);
        assert_eq!(s.queue.len(), 4);
    }

    #[test]
    fn test_empty_queue_does_not_fire() {
        let mut s = state();
        s.queue.clear();
        s.pointer_down(Vec2::new(100.0, 300.0));
        assert!(!s.pointer_up());
        assert!(s.projectile.is_none());
    }
}
