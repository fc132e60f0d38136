//! Enemy controller and spawner
//!
//! Enemies wander rather than chase: each one drives straight ahead in its
//! facing, turns 90° when blocked, and fires on a randomized cooldown.

use rand::Rng;

use super::collision::{Mover, can_move, try_move};
use super::state::{Direction, Enemy, EnemyKind, GameEvent, GameState, Tank};
use crate::consts::*;

/// Randomized enemy fire cooldown
fn roll_fire_cooldown<R: Rng>(rng: &mut R) -> u32 {
    rng.random_range(ENEMY_FIRE_COOLDOWN_MIN..=ENEMY_FIRE_COOLDOWN_MAX)
}

/// Advance every enemy by one tick: fire, then move or turn
pub fn update_enemies(state: &mut GameState) {
    let size = state.config.tank_size();
    let ids: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();

    for id in ids {
        let Some(idx) = state.enemies.iter().position(|e| e.id == id) else {
            continue;
        };

        let tank = &mut state.enemies[idx].tank;
        tank.fire_cooldown = tank.fire_cooldown.saturating_sub(1);
        if tank.fire_cooldown == 0 {
            let (muzzle, facing) = (tank.muzzle(size), tank.facing);
            state.enemies[idx].tank.fire_cooldown = roll_fire_cooldown(&mut state.rng);
            state.spawn_bullet(muzzle, facing, false);
            state.events.push(GameEvent::EnemyFired { id });
        }

        let facing = state.enemies[idx].tank.facing;
        if !try_move(state, Mover::Enemy(id), facing) {
            let turned = choose_turn(state, idx);
            state.enemies[idx].tank.facing = turned;
        }
    }
}

/// Pick a new facing for a blocked enemy.
///
/// Only the two 90° turns are considered, never a reversal. One clear option
/// is taken outright; two are decided by a coin flip; none keeps the facing.
pub fn choose_turn(state: &mut GameState, idx: usize) -> Direction {
    let enemy = &state.enemies[idx];
    let facing = enemy.tank.facing;
    let left = facing.turn_left();
    let right = facing.turn_right();
    let left_clear = can_move(state, enemy.tank.step(left), Mover::Enemy(enemy.id));
    let right_clear = can_move(state, enemy.tank.step(right), Mover::Enemy(enemy.id));

    match (left_clear, right_clear) {
        (true, false) => left,
        (false, true) => right,
        (true, true) => {
            if state.rng.random_bool(0.5) {
                left
            } else {
                right
            }
        }
        (false, false) => facing,
    }
}

/// Count up toward the next spawn and introduce an enemy when allowed.
///
/// Fires once the timer passes the threshold with a free slot and budget
/// left. An occupied spawn point skips the cycle; the timer restarts either
/// way.
pub fn update_spawner(state: &mut GameState) {
    state.spawn_timer = state.spawn_timer.saturating_add(1);
    if state.spawn_timer <= ENEMY_SPAWN_THRESHOLD
        || state.enemies.len() >= MAX_LIVE_ENEMIES
        || state.enemies_total == 0
    {
        return;
    }
    state.spawn_timer = 0;

    let size = state.config.tank_size();
    let spawns = state.config.enemy_spawns();
    let point = spawns[state.rng.random_range(0..spawns.len())];
    let spawn_center = point + glam::Vec2::splat(size * 0.5);
    let clearance = size * 1.5;

    let occupied = state
        .enemies
        .iter()
        .map(|e| &e.tank)
        .chain(state.player_on_field().then_some(&state.player))
        .any(|t| t.center(size).distance(spawn_center) < clearance);
    if occupied {
        log::debug!("Spawn point ({}, {}) occupied, skipping", point.x, point.y);
        return;
    }

    let kind = EnemyKind::ALL[state.rng.random_range(0..EnemyKind::ALL.len())];
    let mut tank = Tank::new(point, Direction::Down, state.enemy_speed());
    tank.fire_cooldown = roll_fire_cooldown(&mut state.rng);

    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        tank,
        kind,
        health: 1,
    });
    state.enemies_total -= 1;
    log::debug!(
        "Enemy {} ({:?}) spawned, {} left in budget",
        id,
        kind,
        state.enemies_total
    );
    state.events.push(GameEvent::EnemySpawned { id });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;
    use crate::sim::arena::ArenaConfig;
    use crate::sim::state::{Orientation, WordBrick};
    use glam::Vec2;

    fn empty_state() -> GameState {
        GameState::new(ArenaConfig::default(), &[], 9)
    }

    fn add_enemy(state: &mut GameState, pos: Vec2, facing: Direction) -> u32 {
        let id = state.next_entity_id();
        let mut tank = Tank::new(pos, facing, 1.0);
        tank.fire_cooldown = 1000;
        state.enemies.push(Enemy {
            id,
            tank,
            kind: EnemyKind::Trooper,
            health: 1,
        });
        id
    }

    fn add_brick(state: &mut GameState, rect: Rect) {
        let id = state.next_entity_id();
        state.bricks.push(WordBrick {
            id,
            rect,
            orientation: Orientation::Vertical,
            term: "obstacle".into(),
            definition: "in the way".into(),
            health: 1,
            color: 0,
        });
    }

    #[test]
    fn test_enemy_drives_forward() {
        let mut state = empty_state();
        add_enemy(&mut state, Vec2::new(100.0, 100.0), Direction::Down);
        update_enemies(&mut state);
        assert_eq!(state.enemies[0].tank.pos, Vec2::new(100.0, 101.0));
        assert_eq!(state.enemies[0].tank.facing, Direction::Down);
    }

    #[test]
    fn test_blocked_enemy_takes_only_clear_turn() {
        let mut state = empty_state();
        // Against the left wall facing up; brick directly above
        add_enemy(&mut state, Vec2::new(0.0, 200.0), Direction::Up);
        add_brick(&mut state, Rect::new(0.0, 168.0, 60.0, 32.0));

        update_enemies(&mut state);
        assert_eq!(state.enemies[0].tank.pos, Vec2::new(0.0, 200.0));
        assert_eq!(state.enemies[0].tank.facing, Direction::Right);
    }

    #[test]
    fn test_boxed_in_enemy_keeps_facing() {
        let mut state = empty_state();
        // Top-left corner facing up: up and left both leave the arena, right is a brick
        add_enemy(&mut state, Vec2::new(0.0, 0.0), Direction::Up);
        add_brick(&mut state, Rect::new(32.0, 0.0, 20.0, 40.0));

        update_enemies(&mut state);
        assert_eq!(state.enemies[0].tank.facing, Direction::Up);
        assert_eq!(state.enemies[0].tank.pos, Vec2::ZERO);
    }

    #[test]
    fn test_open_turns_never_reverse() {
        for seed in 0..20 {
            let mut state = GameState::new(ArenaConfig::default(), &[], seed);
            add_enemy(&mut state, Vec2::new(300.0, 200.0), Direction::Up);
            add_brick(&mut state, Rect::new(300.0, 180.0, 32.0, 20.0));
            update_enemies(&mut state);
            let facing = state.enemies[0].tank.facing;
            assert!(facing == Direction::Left || facing == Direction::Right);
        }
    }

    #[test]
    fn test_enemy_fires_when_cooldown_expires() {
        let mut state = empty_state();
        let id = add_enemy(&mut state, Vec2::new(300.0, 100.0), Direction::Down);
        state.enemies[0].tank.fire_cooldown = 1;

        update_enemies(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert!(!state.bullets[0].friendly);
        assert_eq!(state.bullets[0].dir, Direction::Down);
        let cooldown = state.enemies[0].tank.fire_cooldown;
        assert!((ENEMY_FIRE_COOLDOWN_MIN..=ENEMY_FIRE_COOLDOWN_MAX).contains(&cooldown));
        assert!(state.events.contains(&GameEvent::EnemyFired { id }));
    }

    #[test]
    fn test_spawner_waits_for_threshold() {
        let mut state = empty_state();
        for _ in 0..ENEMY_SPAWN_THRESHOLD {
            update_spawner(&mut state);
        }
        assert!(state.enemies.is_empty());
        update_spawner(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies_total, BASE_ENEMY_BUDGET - 1);
        assert_eq!(state.spawn_timer, 0);
        let pos = state.enemies[0].tank.pos;
        assert!(state.config.enemy_spawns().contains(&pos));
    }

    #[test]
    fn test_spawner_respects_cap_and_budget() {
        let mut state = empty_state();
        for i in 0..MAX_LIVE_ENEMIES {
            add_enemy(&mut state, Vec2::new(100.0 + i as f32 * 50.0, 300.0), Direction::Down);
        }
        state.spawn_timer = ENEMY_SPAWN_THRESHOLD;
        update_spawner(&mut state);
        assert_eq!(state.enemies.len(), MAX_LIVE_ENEMIES);

        state.enemies.clear();
        state.enemies_total = 0;
        update_spawner(&mut state);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_spawn_timer_saturates_while_blocked() {
        let mut state = empty_state();
        state.enemies_total = 0;
        state.spawn_timer = u32::MAX;
        update_spawner(&mut state);
        assert_eq!(state.spawn_timer, u32::MAX);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_spawner_skips_occupied_point() {
        let mut state = empty_state();
        for point in state.config.enemy_spawns() {
            add_enemy(&mut state, point, Direction::Down);
        }
        state.enemies.truncate(2);
        // Block the third point with the player instead
        state.player.pos = state.config.enemy_spawns()[2];
        state.spawn_timer = ENEMY_SPAWN_THRESHOLD;

        update_spawner(&mut state);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.enemies_total, BASE_ENEMY_BUDGET);
        assert_eq!(state.spawn_timer, 0);
    }
}
