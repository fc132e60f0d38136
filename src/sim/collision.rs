//! Collision checks and bullet resolution
//!
//! Tanks use a pre-move feasibility test: a blocked tank simply stays put,
//! there is no sliding or push-back. Bullets resolve against the first
//! matching target in a fixed order and are consumed by it.

use glam::Vec2;

use super::effects::reward_caption;
use super::state::{Bullet, Direction, GameEvent, GamePhase, GameState, Tank};
use crate::Rect;
use crate::consts::*;

/// Which tank is asking to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mover {
    Player,
    Enemy(u32),
}

/// Would a tank's square at `target` be legal?
///
/// Rejects leaving the arena, overlapping a live brick, overlapping the base
/// footprint, or overlapping another tank. The player only checks enemies;
/// enemies check the player and every other enemy.
pub fn can_move(state: &GameState, target: Vec2, mover: Mover) -> bool {
    let size = state.config.tank_size();
    let rect = Rect::square(target, size);

    if !rect.inside(&state.config.bounds()) {
        return false;
    }
    if state.live_bricks().any(|b| b.rect.intersects(&rect)) {
        return false;
    }
    if state.base.rect.intersects(&rect) {
        return false;
    }

    match mover {
        Mover::Player => !state
            .enemies
            .iter()
            .any(|e| e.tank.rect(size).intersects(&rect)),
        Mover::Enemy(id) => {
            let player_blocks =
                state.player_on_field() && state.player.rect(size).intersects(&rect);
            !player_blocks
                && !state
                    .enemies
                    .iter()
                    .filter(|e| e.id != id)
                    .any(|e| e.tank.rect(size).intersects(&rect))
        }
    }
}

fn tank_mut(state: &mut GameState, mover: Mover) -> Option<&mut Tank> {
    match mover {
        Mover::Player => Some(&mut state.player),
        Mover::Enemy(id) => state
            .enemies
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.tank),
    }
}

/// Commit a move that already passed [`can_move`]
pub fn apply_move(state: &mut GameState, mover: Mover, target: Vec2) {
    if let Some(tank) = tank_mut(state, mover) {
        tank.pos = target;
    }
}

/// Step a tank one tick in `dir`; returns false (and leaves it in place)
/// when blocked
pub fn try_move(state: &mut GameState, mover: Mover, dir: Direction) -> bool {
    let target = match mover {
        Mover::Player => state.player.step(dir),
        Mover::Enemy(id) => match state.enemies.iter().find(|e| e.id == id) {
            Some(enemy) => enemy.tank.step(dir),
            None => return false,
        },
    };
    if can_move(state, target, mover) {
        apply_move(state, mover, target);
        true
    } else {
        false
    }
}

/// Bullet center within half a tank plus tolerance on both axes
pub fn bullet_hits_tank(bullet: &Bullet, tank: &Tank, size: f32) -> bool {
    let reach = size * 0.5 + HIT_TOLERANCE;
    let d = (bullet.pos - tank.center(size)).abs();
    d.x < reach && d.y < reach
}

/// Bullet center within the shield radius around the base center
pub fn within_shield(pos: Vec2, base: &Rect, radius: f32) -> bool {
    pos.distance(base.center()) <= radius
}

/// Outcome of resolving one bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BulletFate {
    Keep,
    Consumed,
}

/// Move every bullet one tick and resolve hits.
///
/// Per bullet, first match wins: out of bounds, brick, shield, base,
/// enemy (friendly only), player (hostile only).
pub fn advance_bullets(state: &mut GameState) {
    let mut bullets = std::mem::take(&mut state.bullets);
    bullets.retain_mut(|bullet| {
        bullet.pos += bullet.dir.delta() * bullet.speed;
        resolve_bullet(state, bullet) == BulletFate::Keep
    });
    // Nothing spawns bullets during resolution, but keep any that did
    bullets.append(&mut state.bullets);
    state.bullets = bullets;
}

fn resolve_bullet(state: &mut GameState, bullet: &Bullet) -> BulletFate {
    let bounds = state.config.bounds();
    let p = bullet.pos;
    if p.x < bounds.min.x || p.y < bounds.min.y || p.x > bounds.max().x || p.y > bounds.max().y {
        return BulletFate::Consumed;
    }

    // The round already ended this tick; leave the rest in flight
    if state.phase != GamePhase::Active {
        return BulletFate::Keep;
    }

    let rect = bullet.rect();
    let salt = state.time_ticks.wrapping_add(bullet.id as u64);

    // Bricks stop every bullet; only the player's can damage them
    if let Some(brick) = state
        .bricks
        .iter_mut()
        .find(|b| b.is_alive() && b.rect.intersects(&rect))
    {
        if bullet.friendly {
            brick.health = brick.health.saturating_sub(1);
            let id = brick.id;
            if brick.is_alive() {
                state.events.push(GameEvent::BrickHit { id });
            } else {
                let term = brick.term.clone();
                let caption = reward_caption(&brick.term, &brick.definition);
                let (center, color) = (brick.rect.center(), brick.color);
                state.award(SCORE_BRICK);
                state.words_destroyed += 1;
                state.effects.captions.push(caption);
                state.effects.burst(center, color, 14, salt);
                log::debug!("Brick '{}' destroyed", term);
                state.events.push(GameEvent::BrickDestroyed { id, term });
            }
        }
        return BulletFate::Consumed;
    }

    if !bullet.friendly && state.shield > 0 {
        let radius = state.config.shield_radius();
        if within_shield(p, &state.base.rect, radius) {
            state.shield -= 1;
            state.events.push(GameEvent::ShieldHit {
                remaining: state.shield,
            });
            state.effects.burst(p, 0x5DADE2, 6, salt);
            return BulletFate::Consumed;
        }
    }

    // Any bullet reaching the base ends the round, the player's included
    if state.base.rect.intersects(&rect) {
        state.base.destroyed = true;
        state.phase = GamePhase::GameOver;
        state.effects.burst(state.base.rect.center(), 0xFF5722, 24, salt);
        log::info!(
            "Base destroyed by {} bullet",
            if bullet.friendly { "friendly" } else { "hostile" }
        );
        state.events.push(GameEvent::BaseDestroyed);
        state.events.push(GameEvent::GameOver);
        return BulletFate::Consumed;
    }

    let size = state.config.tank_size();
    if bullet.friendly {
        if let Some(idx) = state
            .enemies
            .iter()
            .position(|e| bullet_hits_tank(bullet, &e.tank, size))
        {
            let enemy = &mut state.enemies[idx];
            enemy.health = enemy.health.saturating_sub(1);
            if enemy.health == 0 {
                let enemy = state.enemies.remove(idx);
                state.award(SCORE_ENEMY);
                state.enemies_left = state.enemies_left.saturating_sub(1);
                state.effects.burst(enemy.tank.center(size), 0xFFC107, 18, salt);
                log::debug!("Enemy {} destroyed", enemy.id);
                state.events.push(GameEvent::EnemyKilled { id: enemy.id });
            }
            return BulletFate::Consumed;
        }
    } else if state.player_on_field() && bullet_hits_tank(bullet, &state.player, size) {
        state.lives = state.lives.saturating_sub(1);
        state.effects.burst(state.player.center(size), 0x4CAF50, 18, salt);
        state.events.push(GameEvent::PlayerHit { lives: state.lives });
        if state.lives == 0 {
            state.phase = GamePhase::GameOver;
            log::info!("Out of lives at score {}", state.score);
            state.events.push(GameEvent::GameOver);
        } else {
            state.respawn_player();
        }
        return BulletFate::Consumed;
    }

    BulletFate::Keep
}
