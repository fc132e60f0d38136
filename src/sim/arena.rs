//! Arena generation
//!
//! Lays out one level: word bricks scattered by bounded random placement,
//! plus the fixed base near the bottom center.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Base, Orientation, WordBrick};
use crate::Rect;
use crate::consts::*;
use crate::content::WordPair;

/// Brick colors (0xRRGGBB)
pub const BRICK_PALETTE: [u32; 8] = [
    0xE74C3C, 0x3498DB, 0x2ECC71, 0xF1C40F, 0x9B59B6, 0xE67E22, 0x1ABC9C, 0xEC407A,
];

/// Explicit arena geometry (no ambient viewport globals)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    /// Tile edge; tanks are one tile square
    pub tile: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            tile: DEFAULT_TILE,
        }
    }
}

impl ArenaConfig {
    /// Derive the tile from a viewport so roughly 16 tiles span the short side
    pub fn from_viewport(width: f32, height: f32) -> Self {
        let tile = (width.min(height) / 16.0).clamp(MIN_TILE, MAX_TILE).floor();
        Self { width, height, tile }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn tank_size(&self) -> f32 {
        self.tile
    }

    /// Gap kept between bricks and the arena border
    pub fn margin(&self) -> f32 {
        self.tile * 0.5
    }

    pub fn base_rect(&self) -> Rect {
        let size = self.tile * BASE_TILES;
        Rect::new(
            self.width * 0.5 - size * 0.5,
            self.height - size - self.margin(),
            size,
            size,
        )
    }

    pub fn shield_radius(&self) -> f32 {
        self.tile * SHIELD_RADIUS_TILES
    }

    /// Player spawn: centered in the lane above the base
    pub fn player_spawn(&self) -> Vec2 {
        let base = self.base_rect();
        Vec2::new(self.width * 0.5 - self.tile * 0.5, base.min.y - self.tile * 2.0)
    }

    /// Three fixed enemy spawn points along the top edge
    pub fn enemy_spawns(&self) -> [Vec2; 3] {
        let m = self.margin();
        [
            Vec2::new(m, m),
            Vec2::new(self.width * 0.5 - self.tile * 0.5, m),
            Vec2::new(self.width - m - self.tile, m),
        ]
    }

    /// Region bricks may occupy: inside the border margin, below the enemy
    /// spawn row, above the reserved bottom rows.
    pub fn brick_zone(&self) -> Rect {
        let m = self.margin();
        let top = m * 2.0 + self.tile;
        let bottom = self.height - self.tile * BOTTOM_RESERVE_TILES;
        Rect::new(m, top, (self.width - m * 2.0).max(0.0), (bottom - top).max(0.0))
    }

    pub fn font_size(&self) -> f32 {
        self.tile * FONT_TILE_RATIO
    }

    /// Estimated brick footprint for a term in the given orientation
    pub fn brick_size(&self, term: &str, orientation: Orientation) -> Vec2 {
        let glyphs = term.chars().count().max(1) as f32;
        let font = self.font_size();
        match orientation {
            Orientation::Horizontal => Vec2::new(
                glyphs * font * GLYPH_WIDTH_RATIO + BRICK_INNER_PAD * 2.0,
                font + BRICK_INNER_PAD * 2.0,
            ),
            Orientation::Vertical => Vec2::new(
                font + BRICK_INNER_PAD * 2.0,
                glyphs * font + BRICK_INNER_PAD * 2.0,
            ),
        }
    }
}

/// Result of laying out one level
#[derive(Debug, Clone)]
pub struct Arena {
    /// Placed bricks (ids are assigned by the caller)
    pub bricks: Vec<WordBrick>,
    pub base: Base,
    /// Placement attempts consumed out of the shared budget
    pub attempts_used: u32,
}

/// Random orientation with the documented 35/65 horizontal/vertical bias
pub fn pick_orientation<R: Rng>(rng: &mut R) -> Orientation {
    if rng.random::<f64>() < HORIZONTAL_CHANCE {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}

/// Place up to `words.len()` bricks without padded overlap.
///
/// The attempt budget is shared across all words, not per word. When it runs
/// out the remaining words are dropped and the level plays with fewer bricks.
pub fn generate_arena(words: &[WordPair], config: &ArenaConfig, seed: u64) -> Arena {
    let mut rng = Pcg32::seed_from_u64(seed);
    let zone = config.brick_zone();
    let zone_max = zone.max();
    let mut bricks: Vec<WordBrick> = Vec::with_capacity(words.len());
    let mut attempts = 0u32;

    'words: for word in words {
        let orientation = pick_orientation(&mut rng);
        let size = config.brick_size(&word.primary, orientation);

        while attempts < PLACEMENT_ATTEMPTS {
            attempts += 1;

            let max_x = zone_max.x - size.x;
            let max_y = zone_max.y - size.y;
            if max_x < zone.min.x || max_y < zone.min.y {
                // Too large for the zone in this orientation
                continue;
            }

            let x = rng.random_range(zone.min.x..=max_x);
            let y = rng.random_range(zone.min.y..=max_y);
            let rect = Rect::new(x, y, size.x, size.y);
            let padded = rect.padded(BRICK_PADDING);

            if bricks.iter().any(|b| b.rect.padded(BRICK_PADDING).intersects(&padded)) {
                continue;
            }

            let color = BRICK_PALETTE[rng.random_range(0..BRICK_PALETTE.len())];
            bricks.push(WordBrick {
                id: 0,
                rect,
                orientation,
                term: word.primary.clone(),
                definition: word.definition.clone(),
                health: 1,
                color,
            });
            continue 'words;
        }

        break;
    }

    if bricks.len() < words.len() {
        log::warn!(
            "Arena placement budget exhausted: placed {}/{} words",
            bricks.len(),
            words.len()
        );
    }
    log::debug!(
        "Arena {}x{} tile {}: {} bricks in {} attempts",
        config.width,
        config.height,
        config.tile,
        bricks.len(),
        attempts
    );

    Arena {
        bricks,
        base: Base {
            rect: config.base_rect(),
            destroyed: false,
        },
        attempts_used: attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::OfflineContent;

    fn words() -> Vec<WordPair> {
        OfflineContent::default().words()
    }

    #[test]
    fn test_empty_word_list() {
        let arena = generate_arena(&[], &ArenaConfig::default(), 1);
        assert!(arena.bricks.is_empty());
        assert_eq!(arena.attempts_used, 0);
        assert!(!arena.base.destroyed);
    }

    #[test]
    fn test_cramped_arena_degrades() {
        let config = ArenaConfig {
            width: 240.0,
            height: 320.0,
            tile: 24.0,
        };
        let words = words();
        let arena = generate_arena(&words, &config, 3);
        assert!(arena.bricks.len() < words.len());
        assert_eq!(arena.attempts_used, PLACEMENT_ATTEMPTS);
    }

    #[test]
    fn test_base_and_spawn_lane_clear() {
        let config = ArenaConfig::default();
        let arena = generate_arena(&words(), &config, 11);
        let spawn = Rect::square(config.player_spawn(), config.tank_size());
        assert!(!spawn.intersects(&arena.base.rect));
        for brick in &arena.bricks {
            assert!(!brick.rect.intersects(&arena.base.rect));
            assert!(!brick.rect.intersects(&spawn));
            for point in config.enemy_spawns() {
                assert!(!brick.rect.intersects(&Rect::square(point, config.tank_size())));
            }
        }
    }

    #[test]
    fn test_base_is_bottom_center() {
        let config = ArenaConfig::default();
        let base = config.base_rect();
        assert!((base.center().x - config.width / 2.0).abs() < 0.001);
        assert!(base.max().y <= config.height);
        assert!(base.min.y > config.height - config.tile * BOTTOM_RESERVE_TILES);
    }

    #[test]
    fn test_orientation_bias() {
        let mut rng = Pcg32::seed_from_u64(5);
        let draws = 20_000;
        let horizontal = (0..draws)
            .filter(|_| pick_orientation(&mut rng) == Orientation::Horizontal)
            .count();
        let ratio = horizontal as f64 / draws as f64;
        assert!((0.33..0.37).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn test_vertical_brick_is_taller() {
        let config = ArenaConfig::default();
        let v = config.brick_size("lexicon", Orientation::Vertical);
        let h = config.brick_size("lexicon", Orientation::Horizontal);
        assert!(v.y > v.x);
        assert!(h.x > h.y);
    }

    #[test]
    fn test_from_viewport_clamps_tile() {
        assert_eq!(ArenaConfig::from_viewport(200.0, 200.0).tile, MIN_TILE);
        assert_eq!(ArenaConfig::from_viewport(4000.0, 3000.0).tile, MAX_TILE);
        assert_eq!(ArenaConfig::from_viewport(1024.0, 512.0).tile, 32.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn placed_bricks_never_overlap(
                seed in 0u64..5000,
                width in 320.0f32..1600.0,
                height in 320.0f32..1200.0,
            ) {
                let config = ArenaConfig::from_viewport(width, height);
                let words = words();
                let arena = generate_arena(&words, &config, seed);
                let zone = config.brick_zone();

                prop_assert!(arena.bricks.len() <= words.len());
                prop_assert!(arena.attempts_used <= PLACEMENT_ATTEMPTS);
                for (i, a) in arena.bricks.iter().enumerate() {
                    prop_assert!(a.rect.inside(&zone));
                    for b in arena.bricks.iter().skip(i + 1) {
                        prop_assert!(
                            !a.rect.padded(BRICK_PADDING).intersects(&b.rect.padded(BRICK_PADDING))
                        );
                    }
                }
            }
        }
    }
}
