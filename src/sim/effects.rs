//! Cosmetic effects: particle bursts and reward captions
//!
//! Nothing here feeds back into gameplay. Particles use a hash of the tick
//! counter instead of the simulation RNG so turning effects off never changes
//! a run.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// A caption rising from the bottom of the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    pub y: f32,
    pub start_y: f32,
    /// Travel after which the next caption may start
    pub ready_after: f32,
}

impl Caption {
    pub fn traveled(&self) -> f32 {
        self.start_y - self.y
    }
}

/// FIFO of reward captions, shown one at a time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionQueue {
    pending: VecDeque<String>,
    active: Option<Caption>,
}

impl CaptionQueue {
    pub fn push(&mut self, text: String) {
        self.pending.push_back(text);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn active(&self) -> Option<&Caption> {
        self.active.as_ref()
    }

    pub fn active_text(&self) -> Option<&str> {
        self.active.as_ref().map(|c| c.text.as_str())
    }

    /// True when nothing is showing or the current caption has risen far enough
    pub fn ready_for_next(&self) -> bool {
        self.active
            .as_ref()
            .is_none_or(|c| c.traveled() >= c.ready_after)
    }

    /// Advance one frame for an arena of `height` pixels
    pub fn advance(&mut self, height: f32) {
        if let Some(caption) = &mut self.active {
            caption.y -= CAPTION_RISE_SPEED;
            if caption.y < 0.0 {
                self.active = None;
            }
        }

        if self.ready_for_next() {
            if let Some(text) = self.pending.pop_front() {
                self.active = Some(Caption {
                    text,
                    y: height,
                    start_y: height,
                    ready_after: height * CAPTION_READY_FRACTION,
                });
            }
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.active = None;
    }
}

/// Trim a definition for a caption, cutting on a char boundary
pub fn short_definition(definition: &str, max_chars: usize) -> String {
    let trimmed = definition.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

/// Caption text for a destroyed brick
pub fn reward_caption(term: &str, definition: &str) -> String {
    format!(
        "{}: {}",
        term,
        short_definition(definition, CAPTION_DEFINITION_CHARS)
    )
}

/// Particles and captions for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub captions: CaptionQueue,
    /// Particle cap (0 disables bursts)
    pub max_particles: usize,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            captions: CaptionQueue::default(),
            max_particles: 256,
        }
    }
}

impl Effects {
    /// Radial burst at `pos`
    pub fn burst(&mut self, pos: Vec2, color: u32, count: u32, salt: u64) {
        if self.max_particles == 0 {
            return;
        }
        for j in 0..count {
            let hash = (salt as u32)
                .wrapping_mul(2654435761)
                .wrapping_add(j.wrapping_mul(7919));
            let rand1 = (hash % 1000) as f32 / 1000.0;
            let rand2 = ((hash >> 10) % 1000) as f32 / 1000.0;
            let rand3 = ((hash >> 20) % 1000) as f32 / 1000.0;

            let angle = std::f32::consts::TAU * (j as f32 + rand1) / count as f32;
            let dir = Vec2::new(angle.cos(), angle.sin());
            self.particles.push(Particle {
                pos,
                vel: dir * (1.0 + rand2 * 2.5),
                color,
                life: 0.6 + rand3 * 0.4,
                size: 2.0 + rand1 * 3.0,
            });
        }
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Advance particles and captions one frame
    pub fn update(&mut self, arena_height: f32) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.vel *= 0.94;
            particle.life -= 0.03;
            particle.size *= 0.99;
        }
        self.particles.retain(|p| p.life > 0.0);
        self.captions.advance(arena_height);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.captions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captions_show_one_at_a_time() {
        let mut queue = CaptionQueue::default();
        queue.push("alpha".into());
        queue.push("beta".into());

        queue.advance(100.0);
        assert_eq!(queue.active_text(), Some("alpha"));
        assert_eq!(queue.pending_len(), 1);
        assert!(!queue.ready_for_next());

        // 75 px at 1.5 px/frame = 50 frames to become ready
        for _ in 0..49 {
            queue.advance(100.0);
            assert_eq!(queue.active_text(), Some("alpha"));
        }
        assert!(!queue.ready_for_next());
        queue.advance(100.0);
        assert_eq!(queue.active_text(), Some("beta"));
        assert_eq!(queue.pending_len(), 0);
    }

    #[test]
    fn test_last_caption_rises_off_screen() {
        let mut queue = CaptionQueue::default();
        queue.push("only".into());
        queue.advance(30.0);
        for _ in 0..25 {
            queue.advance(30.0);
        }
        assert!(queue.active().is_none());
        assert!(queue.ready_for_next());
    }

    #[test]
    fn test_short_definition() {
        assert_eq!(short_definition("  brief  ", 10), "brief");
        let long = short_definition("a very long definition indeed", 10);
        assert_eq!(long.chars().count(), 10);
        assert!(long.ends_with('…'));
        assert_eq!(reward_caption("Term", "def"), "Term: def");
    }

    #[test]
    fn test_burst_respects_cap_and_fades() {
        let mut effects = Effects {
            max_particles: 10,
            ..Default::default()
        };
        effects.burst(Vec2::ZERO, 0xffffff, 16, 3);
        assert_eq!(effects.particles.len(), 10);
        for _ in 0..40 {
            effects.update(100.0);
        }
        assert!(effects.particles.is_empty());

        effects.max_particles = 0;
        effects.burst(Vec2::ZERO, 0xffffff, 16, 3);
        assert!(effects.particles.is_empty());
    }
}
