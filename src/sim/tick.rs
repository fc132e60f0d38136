//! Per-frame simulation tick
//!
//! One tick runs the phases in a fixed order: player input and movement,
//! enemy AI, spawner, bullets, level-state check, effects.

use serde::{Deserialize, Serialize};

use super::ai::{update_enemies, update_spawner};
use super::collision::{Mover, advance_bullets, try_move};
use super::state::{Direction, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Normalized intents for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Drive (and face) this way
    pub direction: Option<Direction>,
    /// Fire if the cooldown allows
    pub fire: bool,
    /// Pause toggle (edge, not level)
    pub pause: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    if state.phase != GamePhase::Active {
        return;
    }

    // A toggle tick only toggles, so pausing twice leaves the world untouched
    if input.pause {
        state.paused = !state.paused;
        state.events.push(if state.paused {
            GameEvent::Paused
        } else {
            GameEvent::Resumed
        });
        log::debug!("Paused: {}", state.paused);
        return;
    }
    if state.paused {
        return;
    }

    state.time_ticks += 1;

    update_player(state, input);
    update_enemies(state);
    update_spawner(state);
    advance_bullets(state);
    check_level_state(state);

    let height = state.config.height;
    state.effects.update(height);
}

fn update_player(state: &mut GameState, input: &TickInput) {
    if state.respawn_pending && !state.respawn_player() {
        return;
    }
    state.player.fire_cooldown = state.player.fire_cooldown.saturating_sub(1);

    if let Some(dir) = input.direction {
        state.player.facing = dir;
        try_move(state, Mover::Player, dir);
    }

    if input.fire && state.player.fire_cooldown == 0 {
        let size = state.config.tank_size();
        let muzzle = state.player.muzzle(size);
        let facing = state.player.facing;
        state.spawn_bullet(muzzle, facing, true);
        state.player.fire_cooldown = PLAYER_FIRE_COOLDOWN;
        state.events.push(GameEvent::PlayerFired);
    }
}

/// Promote a cleared level. Game over is set where it happens (base or
/// last life), so only the win condition is checked here.
fn check_level_state(state: &mut GameState) {
    if state.phase == GamePhase::Active && state.level_cleared() {
        state.phase = GamePhase::LevelComplete;
        log::info!(
            "Level {} complete: {} words, score {}",
            state.level,
            state.total_words,
            state.score
        );
        state.events.push(GameEvent::LevelComplete);
    }
}
