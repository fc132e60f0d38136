//! Game state and core simulation types
//!
//! Everything a tick mutates lives in [`GameState`]; the tick function is its
//! sole mutator. Presentation reads it back through [`Snapshot`].

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{ArenaConfig, generate_arena};
use super::collision::{Mover, can_move};
use super::effects::Effects;
use crate::Rect;
use crate::consts::*;
use crate::content::WordPair;

/// Cardinal facing (screen space, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Unit step for this direction
    #[inline]
    pub fn delta(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
        }
    }

    /// 90° clockwise
    pub fn turn_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// 90° counter-clockwise
    pub fn turn_left(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }
}

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Combat ongoing
    Active,
    /// All bricks destroyed and every budgeted enemy killed
    LevelComplete,
    /// Lives exhausted or base destroyed
    GameOver,
}

/// A tank body shared by the player and enemies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    /// Top-left corner of the bounding square
    pub pos: Vec2,
    pub facing: Direction,
    /// Pixels per tick
    pub speed: f32,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
}

impl Tank {
    pub fn new(pos: Vec2, facing: Direction, speed: f32) -> Self {
        Self {
            pos,
            facing,
            speed,
            fire_cooldown: 0,
        }
    }

    pub fn rect(&self, size: f32) -> Rect {
        Rect::square(self.pos, size)
    }

    pub fn center(&self, size: f32) -> Vec2 {
        self.pos + Vec2::splat(size * 0.5)
    }

    /// Position one step ahead in `dir`
    pub fn step(&self, dir: Direction) -> Vec2 {
        self.pos + dir.delta() * self.speed
    }

    /// Muzzle point where a shot leaves the hull
    pub fn muzzle(&self, size: f32) -> Vec2 {
        self.center(size) + self.facing.delta() * (size * 0.5)
    }
}

/// Cosmetic enemy variety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Scout,
    Trooper,
    Brute,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Scout, EnemyKind::Trooper, EnemyKind::Brute];
}

/// An enemy tank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub tank: Tank,
    pub kind: EnemyKind,
    pub health: u8,
}

/// A bullet in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    /// Center point
    pub pos: Vec2,
    pub dir: Direction,
    pub speed: f32,
    /// Fired by the player
    pub friendly: bool,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos - Vec2::splat(BULLET_SIZE * 0.5), BULLET_SIZE)
    }
}

/// Glyph layout of a brick's term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A destructible brick carrying a vocabulary term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordBrick {
    pub id: u32,
    pub rect: Rect,
    pub orientation: Orientation,
    pub term: String,
    pub definition: String,
    pub health: u8,
    /// Display color (0xRRGGBB)
    pub color: u32,
}

impl WordBrick {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// The defended base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub rect: Rect,
    pub destroyed: bool,
}

/// Something that happened during a tick, for sounds and animations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerFired,
    EnemyFired { id: u32 },
    EnemySpawned { id: u32 },
    EnemyKilled { id: u32 },
    BrickHit { id: u32 },
    BrickDestroyed { id: u32, term: String },
    ShieldHit { remaining: u8 },
    BaseDestroyed,
    PlayerHit { lives: u8 },
    LevelComplete,
    GameOver,
    Paused,
    Resumed,
}

/// Read-only per-tick view for HUD and overlays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level: u32,
    pub score: u64,
    pub lives: u8,
    pub words_destroyed: u32,
    pub total_words: u32,
    pub enemies_left: u32,
    pub enemies_total: u32,
    pub shield: u8,
    pub phase: GamePhase,
    pub paused: bool,
    pub caption: Option<String>,
}

/// Complete level state (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub config: ArenaConfig,
    /// 1-based level number
    pub level: u32,
    /// Cumulative across levels, never decreases
    pub score: u64,
    pub lives: u8,
    pub words_destroyed: u32,
    /// Bricks actually placed this level
    pub total_words: u32,
    /// Enemies not yet killed this level (HUD counter)
    pub enemies_left: u32,
    /// Remaining spawn budget
    pub enemies_total: u32,
    pub phase: GamePhase,
    pub paused: bool,
    pub time_ticks: u64,
    pub spawn_timer: u32,
    pub player: Tank,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub bricks: Vec<WordBrick>,
    pub base: Base,
    /// Remaining shield layers (0..=3)
    pub shield: u8,
    /// Cosmetic layer (particles, captions)
    pub effects: Effects,
    /// Events recorded during the last tick
    pub events: Vec<GameEvent>,
    /// Enemy budget before level scaling
    pub enemy_budget: u32,
    /// Player is off the field waiting for a clear spawn point
    pub respawn_pending: bool,
    next_id: u32,
}

impl GameState {
    /// Start a run at level 1 with the given words
    pub fn new(config: ArenaConfig, words: &[WordPair], seed: u64) -> Self {
        Self::with_tuning(config, words, seed, BASE_ENEMY_BUDGET, Effects::default().max_particles)
    }

    /// Like [`GameState::new`] with a custom level-1 enemy budget and particle cap
    pub fn with_tuning(
        config: ArenaConfig,
        words: &[WordPair],
        seed: u64,
        enemy_budget: u32,
        max_particles: usize,
    ) -> Self {
        let base = Base {
            rect: config.base_rect(),
            destroyed: false,
        };
        let player = Tank::new(config.player_spawn(), Direction::Up, PLAYER_SPEED);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            level: 1,
            score: 0,
            lives: START_LIVES,
            words_destroyed: 0,
            total_words: 0,
            enemies_left: 0,
            enemies_total: 0,
            phase: GamePhase::Active,
            paused: false,
            time_ticks: 0,
            spawn_timer: 0,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            bricks: Vec::new(),
            base,
            shield: SHIELD_LAYERS,
            effects: Effects {
                max_particles,
                ..Effects::default()
            },
            events: Vec::new(),
            enemy_budget,
            respawn_pending: false,
            next_id: 1,
        };
        state.start_level(words);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rebuild the arena and every entity collection for the current level.
    /// Score and level number are kept.
    pub fn start_level(&mut self, words: &[WordPair]) {
        let mut shuffled = words.to_vec();
        shuffled.shuffle(&mut self.rng);
        let arena_seed: u64 = self.rng.random();
        let arena = generate_arena(&shuffled, &self.config, arena_seed);

        self.bricks = arena
            .bricks
            .into_iter()
            .map(|mut brick| {
                brick.id = self.next_entity_id();
                brick
            })
            .collect();
        self.base = arena.base;
        self.total_words = self.bricks.len() as u32;
        self.words_destroyed = 0;

        let budget = self.enemy_budget + self.level.saturating_sub(1);
        self.enemies_total = budget;
        self.enemies_left = budget;

        self.lives = START_LIVES;
        self.shield = SHIELD_LAYERS;
        self.phase = GamePhase::Active;
        self.paused = false;
        self.spawn_timer = 0;
        self.respawn_pending = false;
        self.player = Tank::new(self.config.player_spawn(), Direction::Up, PLAYER_SPEED);
        self.enemies.clear();
        self.bullets.clear();
        self.effects.clear();
        self.events.clear();

        log::info!(
            "Level {}: {}/{} words placed, {} enemies budgeted",
            self.level,
            self.total_words,
            words.len(),
            budget
        );
    }

    /// Move on to the next level with a fresh word set
    pub fn advance_level(&mut self, words: &[WordPair]) {
        self.level += 1;
        self.start_level(words);
    }

    /// Award points (the only way score changes)
    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Launch a bullet from `origin` heading `dir`
    pub fn spawn_bullet(&mut self, origin: Vec2, dir: Direction, friendly: bool) -> u32 {
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos: origin,
            dir,
            speed: BULLET_SPEED,
            friendly,
        });
        id
    }

    /// Put the player back on the spawn point facing up. While an enemy
    /// sits on the spawn point the respawn is held; returns false then.
    pub fn respawn_player(&mut self) -> bool {
        let spawn = self.config.player_spawn();
        if !can_move(self, spawn, Mover::Player) {
            if !self.respawn_pending {
                log::debug!("Player spawn blocked, holding respawn");
            }
            self.respawn_pending = true;
            return false;
        }
        self.player.pos = spawn;
        self.player.facing = Direction::Up;
        self.player.fire_cooldown = 0;
        self.respawn_pending = false;
        true
    }

    /// False while a respawn is held: the player can neither act, block
    /// nor be hit
    pub fn player_on_field(&self) -> bool {
        !self.respawn_pending
    }

    /// Speed for enemies spawned at the current level
    pub fn enemy_speed(&self) -> f32 {
        (ENEMY_BASE_SPEED + ENEMY_SPEED_PER_LEVEL * self.level.saturating_sub(1) as f32)
            .min(ENEMY_MAX_SPEED)
    }

    /// Level-complete guard: every placed word destroyed, spawn budget
    /// spent and no enemy alive.
    pub fn level_cleared(&self) -> bool {
        self.words_destroyed >= self.total_words && self.enemies_total == 0 && self.enemies.is_empty()
    }

    pub fn live_bricks(&self) -> impl Iterator<Item = &WordBrick> {
        self.bricks.iter().filter(|b| b.is_alive())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level: self.level,
            score: self.score,
            lives: self.lives,
            words_destroyed: self.words_destroyed,
            total_words: self.total_words,
            enemies_left: self.enemies_left,
            enemies_total: self.enemies_total,
            shield: self.shield,
            phase: self.phase,
            paused: self.paused,
            caption: self.effects.captions.active_text().map(str::to_owned),
        }
    }
}
