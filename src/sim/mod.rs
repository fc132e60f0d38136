//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only (cosmetic effects hash the tick counter instead)
//! - Stable iteration order (insertion order, by entity ID)
//! - No rendering, content fetching or platform dependencies

pub mod ai;
pub mod arena;
pub mod collision;
pub mod effects;
pub mod state;
pub mod tick;

pub use ai::{choose_turn, update_enemies, update_spawner};
pub use arena::{Arena, ArenaConfig, generate_arena};
pub use collision::{Mover, advance_bullets, apply_move, can_move, try_move};
pub use effects::{Caption, CaptionQueue, Effects, Particle};
pub use state::{
    Base, Bullet, Direction, Enemy, EnemyKind, GameEvent, GamePhase, GameState, Orientation,
    Snapshot, Tank, WordBrick,
};
pub use tick::{TickInput, tick};
