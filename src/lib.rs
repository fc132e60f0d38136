//! Word Tanks - a vocabulary tank arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arena, physics, collisions, enemy AI, level state)
//! - `input`: Keyboard/touch normalization into per-tick intents
//! - `content`: Word list and quiz collaborator boundary
//! - `session`: Screen flow around the simulation (loading, quiz, game over)
//! - `highscores`: Single persisted high score
//! - `settings`: Data-driven configuration
//! - `platform`: Browser/native platform helpers

pub mod content;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use session::{Screen, Session};
pub use settings::{EffectsQuality, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// All speeds and timers are per tick (one tick per rendered frame, ~60 Hz).
pub mod consts {
    /// Nominal tick rate used to convert wall-clock intervals into ticks
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default tile edge in pixels (tanks are one tile square)
    pub const DEFAULT_TILE: f32 = 32.0;
    pub const MIN_TILE: f32 = 20.0;
    pub const MAX_TILE: f32 = 48.0;

    /// Player tank
    pub const PLAYER_SPEED: f32 = 2.0;
    pub const PLAYER_FIRE_COOLDOWN: u32 = 20;
    pub const START_LIVES: u8 = 3;

    /// Enemy tanks
    pub const ENEMY_BASE_SPEED: f32 = 1.0;
    pub const ENEMY_SPEED_PER_LEVEL: f32 = 0.15;
    pub const ENEMY_MAX_SPEED: f32 = 2.0;
    pub const ENEMY_FIRE_COOLDOWN_MIN: u32 = 80;
    pub const ENEMY_FIRE_COOLDOWN_MAX: u32 = 140;
    pub const ENEMY_SPAWN_THRESHOLD: u32 = 300;
    pub const MAX_LIVE_ENEMIES: usize = 3;
    pub const BASE_ENEMY_BUDGET: u32 = 5;

    /// Bullets
    pub const BULLET_SPEED: f32 = 5.0;
    pub const BULLET_SIZE: f32 = 6.0;
    /// Extra reach (pixels) when testing a bullet against a tank
    pub const HIT_TOLERANCE: f32 = 2.0;

    /// Arena generation
    pub const BRICK_PADDING: f32 = 8.0;
    pub const PLACEMENT_ATTEMPTS: u32 = 300;
    pub const HORIZONTAL_CHANCE: f64 = 0.35;
    /// Rows kept free of bricks above the bottom edge (base + player lane)
    pub const BOTTOM_RESERVE_TILES: f32 = 5.0;
    pub const FONT_TILE_RATIO: f32 = 0.5;
    pub const GLYPH_WIDTH_RATIO: f32 = 0.62;
    pub const BRICK_INNER_PAD: f32 = 6.0;

    /// Base and shield
    pub const BASE_TILES: f32 = 1.5;
    pub const SHIELD_LAYERS: u8 = 3;
    pub const SHIELD_RADIUS_TILES: f32 = 1.8;

    /// Scoring
    pub const SCORE_BRICK: u64 = 100;
    pub const SCORE_ENEMY: u64 = 200;
    pub const SCORE_QUIZ_ANSWER: u64 = 50;

    /// Touch auto-fire interval (250 ms)
    pub const AUTO_FIRE_INTERVAL_TICKS: u32 = TICKS_PER_SECOND / 4;
    /// Minimum drag distance before a touch counts as a direction
    pub const TOUCH_DEAD_ZONE: f32 = 12.0;

    /// Reward captions
    pub const CAPTION_RISE_SPEED: f32 = 1.5;
    /// Fraction of the arena height a caption travels before the next may start
    pub const CAPTION_READY_FRACTION: f32 = 0.75;
    pub const CAPTION_DEFINITION_CHARS: usize = 48;

    /// Default content sizes
    pub const WORDS_PER_LEVEL: usize = 15;
    pub const QUIZ_QUESTIONS: usize = 5;
}

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn square(min: Vec2, edge: f32) -> Self {
        Self {
            min,
            size: Vec2::splat(edge),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Grow by `pad` on every side
    #[inline]
    pub fn padded(&self, pad: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(pad),
            size: self.size + Vec2::splat(pad * 2.0),
        }
    }

    /// Strict overlap: touching edges do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    /// True if fully inside `outer` (edges may touch)
    #[inline]
    pub fn inside(&self, outer: &Rect) -> bool {
        let a_max = self.max();
        let b_max = outer.max();
        self.min.x >= outer.min.x && self.min.y >= outer.min.y && a_max.x <= b_max.x && a_max.y <= b_max.y
    }
}
