//! Input normalization
//!
//! Turns raw key and touch events into one [`TickInput`] per frame. The host
//! forwards events as they arrive and calls [`InputNormalizer::next_frame`]
//! once per tick.

use glam::Vec2;

use crate::consts::{AUTO_FIRE_INTERVAL_TICKS, TOUCH_DEAD_ZONE};
use crate::sim::{Direction, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Pause,
    Exit,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value (arrows, WASD, space, p, escape)
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Fire),
            "p" | "P" => Some(Key::Pause),
            "Escape" => Some(Key::Exit),
            _ => None,
        }
    }

    fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// What the host should do this frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameIntent {
    pub tick: TickInput,
    /// Escape pressed: leave the game screen
    pub exit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Touch {
    origin: Vec2,
    current: Vec2,
    /// Ticks until the next auto-fire shot
    fire_timer: u32,
}

/// Accumulates raw events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputNormalizer {
    /// Held direction keys, most recent last
    held: Vec<Direction>,
    fire_held: bool,
    /// Fire pressed and released within one frame still counts
    fire_tapped: bool,
    pause_pending: bool,
    exit_pending: bool,
    touch: Option<Touch>,
}

impl InputNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if let Some(dir) = key.direction() {
            self.held.retain(|d| *d != dir);
            self.held.push(dir);
            return;
        }
        match key {
            Key::Fire => {
                self.fire_held = true;
                self.fire_tapped = true;
            }
            Key::Pause => self.pause_pending = true,
            Key::Exit => self.exit_pending = true,
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if let Some(dir) = key.direction() {
            self.held.retain(|d| *d != dir);
        } else if key == Key::Fire {
            self.fire_held = false;
        }
    }

    /// A finger went down: start tracking the drag and the auto-fire timer
    pub fn touch_start(&mut self, x: f32, y: f32) {
        let p = Vec2::new(x, y);
        self.touch = Some(Touch {
            origin: p,
            current: p,
            fire_timer: 0,
        });
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        if let Some(touch) = &mut self.touch {
            touch.current = Vec2::new(x, y);
        }
    }

    /// Finger lifted: stops movement and auto-fire
    pub fn touch_end(&mut self) {
        self.touch = None;
    }

    /// Drop every held key, pending toggle and touch (leaving the screen)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn auto_fire_active(&self) -> bool {
        self.touch.is_some()
    }

    fn touch_direction(touch: &Touch) -> Option<Direction> {
        let drag = touch.current - touch.origin;
        if drag.length() < TOUCH_DEAD_ZONE {
            return None;
        }
        // Dominant axis picks the facing
        Some(if drag.x.abs() > drag.y.abs() {
            if drag.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if drag.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }

    /// Produce this frame's intents and consume one-shot events
    pub fn next_frame(&mut self) -> FrameIntent {
        let mut direction = self.held.last().copied();
        let mut fire = self.fire_held || self.fire_tapped;

        if let Some(touch) = &mut self.touch {
            if direction.is_none() {
                direction = Self::touch_direction(touch);
            }
            if touch.fire_timer == 0 {
                fire = true;
                touch.fire_timer = AUTO_FIRE_INTERVAL_TICKS;
            }
            touch.fire_timer -= 1;
        }

        let intent = FrameIntent {
            tick: TickInput {
                direction,
                fire,
                pause: self.pause_pending,
            },
            exit: self.exit_pending,
        };
        self.fire_tapped = false;
        self.pause_pending = false;
        self.exit_pending = false;
        intent
    }
}
