//! Game state and core simulation types
//!
//! Everything the frame loop owns lives in `GameState`; rendering reads it,
//! `tick` mutates it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aim::Aim;
use super::stage::{generate_stage_with, swap_front};
use super::tick::FrameClock;
use crate::tuning::Tuning;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Waiting for the player to aim and launch
    #[default]
    Idle,
    /// Exactly one projectile in flight
    Firing,
    /// All blocks cleared, next stage pending
    Won,
    /// Queue exhausted with blocks remaining
    Lost,
}

/// A destructible axis-aligned block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    #[serde(default)]
    pub is_boss: bool,
}

impl Block {
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Remaining health as a fraction of full health
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }
}

/// Projectile kinds. Only the damage assigned at generation differs between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectileKind {
    Normal,
    Bomb,
    Splitter,
}

impl ProjectileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectileKind::Normal => "normal",
            ProjectileKind::Bomb => "bomb",
            ProjectileKind::Splitter => "splitter",
        }
    }
}

/// A queued, not-yet-fired projectile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub id: String,
    pub kind: ProjectileKind,
    pub damage: u32,
}

impl ProjectileSpec {
    pub fn new(id: impl Into<String>, kind: ProjectileKind, damage: u32) -> Self {
        Self {
            id: id.into(),
            kind,
            damage,
        }
    }
}

/// The single projectile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Pixels per millisecond
    pub vel: Vec2,
    pub radius: f32,
    pub damage: u32,
    pub bounces: u32,
    pub ttl_ms: f32,
}

impl Projectile {
    /// Launch from `origin` along `angle` (radians, screen space: negative is up)
    pub fn launch(origin: Vec2, angle: f32, damage: u32, tuning: &Tuning) -> Self {
        Self {
            pos: origin,
            vel: Vec2::from_angle(angle) * tuning.speed,
            radius: tuning.radius,
            damage,
            bounces: 0,
            ttl_ms: tuning.ttl_ms,
        }
    }
}

/// Stage layout as produced by the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub stage: u32,
    pub blocks: Vec<Block>,
    pub queue: Vec<ProjectileSpec>,
    pub status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss_hp: Option<u32>,
}

/// Why a shot stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotEnd {
    /// Time-to-live ran out
    Expired,
    /// Bounce count went past the cap
    BounceLimit,
    /// Fell out through the bottom edge
    ExitedBottom,
}

/// Notable things that happened during a frame, drained by the host loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StageStarted { stage: u32 },
    ShotStarted { projectile_id: String, kind: ProjectileKind },
    BlockHit { block_id: String, hp: u32 },
    BlockDestroyed { block_id: String },
    ShotEnded { reason: ShotEnd },
    StageCleared { stage: u32 },
    OutOfProjectiles { stage: u32 },
}

pub const MESSAGE_STAGE_CLEARED: &str = "Stage cleared! Loading next...";
pub const MESSAGE_OUT_OF_PROJECTILES: &str = "Out of projectiles. Retry the stage.";

/// Complete game state, owned by the frame loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub stage: u32,
    /// Active blocks, in generation order
    pub blocks: Vec<Block>,
    /// Remaining projectiles; the head fires next
    pub queue: Vec<ProjectileSpec>,
    pub status: GameStatus,
    /// In-flight projectile (`Some` only while firing)
    pub projectile: Option<Projectile>,
    pub aim: Aim,
    /// HUD banner text
    pub message: Option<String>,
    /// Countdown until the next stage loads (only meaningful while won)
    pub clear_timer_ms: f32,
    #[serde(skip)]
    pub clock: FrameClock,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a game positioned at the start of `stage`
    pub fn new(stage: u32, tuning: Tuning) -> Self {
        let mut state = Self {
            tuning,
            stage,
            blocks: Vec::new(),
            queue: Vec::new(),
            status: GameStatus::Idle,
            projectile: None,
            aim: Aim::new(&tuning),
            message: None,
            clear_timer_ms: 0.0,
            clock: FrameClock::default(),
            events: Vec::new(),
        };
        state.load_stage(stage);
        state
    }

    /// Replace blocks and queue with a fresh layout for `stage`
    pub fn load_stage(&mut self, stage: u32) {
        let snapshot = generate_stage_with(stage, &self.tuning);
        self.stage = snapshot.stage;
        self.blocks = snapshot.blocks;
        self.queue = snapshot.queue;
        self.status = snapshot.status;
        self.projectile = None;
        self.message = None;
        self.clear_timer_ms = 0.0;
        log::info!(
            "Stage {}: {} blocks, {} projectiles",
            stage,
            self.blocks.len(),
            self.queue.len()
        );
        self.events.push(GameEvent::StageStarted { stage });
    }

    /// Start the current stage over (only after a loss)
    pub fn retry(&mut self) -> bool {
        if self.status != GameStatus::Lost {
            return false;
        }
        log::info!("Retrying stage {}", self.stage);
        self.load_stage(self.stage);
        true
    }

    /// Move queue entry `idx` to the front (not while a shot is in flight)
    pub fn promote_projectile(&mut self, idx: usize) -> bool {
        if self.status == GameStatus::Firing || idx == 0 || idx >= self.queue.len() {
            return false;
        }
        self.queue = swap_front(&self.queue, idx);
        true
    }

    /// Hit points of the live boss block, if this stage has one
    pub fn boss_hp(&self) -> Option<u32> {
        self.blocks.iter().find(|b| b.is_boss).map(|b| b.hp)
    }

    /// Next projectile to fire
    pub fn next_projectile(&self) -> Option<&ProjectileSpec> {
        self.queue.first()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            stage: self.stage,
            blocks: self.blocks.clone(),
            queue: self.queue.clone(),
            status: self.status,
            boss_hp: self.boss_hp(),
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_idle_with_stage_event() {
        let mut state = GameState::new(3, Tuning::default());
        assert_eq!(state.stage, 3);
        assert_eq!(state.status, GameStatus::Idle);
        assert_eq!(state.blocks.len(), 16);
        assert_eq!(state.queue.len(), 5);
        assert!(state.projectile.is_none());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::StageStarted { stage: 3 }]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_boss_hp_tracks_live_block() {
        let mut state = GameState::new(10, Tuning::default());
        assert_eq!(state.boss_hp(), Some(100));
        state.blocks[0].hp = 42;
        assert_eq!(state.snapshot().boss_hp, Some(42));

        let state = GameState::new(9, Tuning::default());
        assert_eq!(state.boss_hp(), None);
    }

    #[test]
    fn test_retry_only_after_loss() {
        let mut state = GameState::new(2, Tuning::default());
        assert!(!state.retry());

        state.queue.clear();
        state.blocks[0].hp = 1;
        state.status = GameStatus::Lost;
        assert!(state.retry());
        assert_eq!(state.status, GameStatus::Idle);
        assert_eq!(state.queue.len(), 4);
        assert_eq!(state.blocks[0].hp, state.blocks[0].max_hp);
    }

    #[test]
    fn test_promote_projectile() {
        let mut state = GameState::new(1, Tuning::default());
        assert!(state.promote_projectile(1));
        assert_eq!(state.next_projectile().map(|p| p.kind), Some(ProjectileKind::Bomb));
        assert!(!state.promote_projectile(0));
        assert!(!state.promote_projectile(99));

        state.status = GameStatus::Firing;
        assert!(!state.promote_projectile(2));
    }

    #[test]
    fn test_hp_ratio() {
        let block = Block {
            id: "b".into(),
            pos: Vec2::ZERO,
            size: Vec2::new(10.0, 10.0),
            hp: 1,
            max_hp: 4,
            is_boss: false,
        };
        assert_eq!(block.hp_ratio(), 0.25);
        assert_eq!(block.max(), Vec2::new(10.0, 10.0));
        assert_eq!(block.center(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&GameStatus::Firing).unwrap();
        assert_eq!(json, "\"firing\"");
    }
}
