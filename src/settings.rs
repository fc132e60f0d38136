//! Game settings and preferences
//!
//! Loaded from a JSON file natively and from LocalStorage on the web; any
//! missing field takes its default.

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_ENEMY_BUDGET, MIN_TILE};
use crate::sim::ArenaConfig;

/// Errors from loading or validating settings
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Effects quality levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EffectsQuality {
    Off,
    Low,
    #[default]
    High,
}

impl EffectsQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectsQuality::Off => "Off",
            EffectsQuality::Low => "Low",
            EffectsQuality::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(EffectsQuality::Off),
            "low" => Some(EffectsQuality::Low),
            "high" => Some(EffectsQuality::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            EffectsQuality::Off => 0,
            EffectsQuality::Low => 64,
            EffectsQuality::High => 256,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Arena geometry
    pub arena: ArenaConfig,
    /// Topic sent to the content generator
    pub topic: String,
    /// Fixed run seed (random when absent)
    pub seed: Option<u64>,
    /// Enemies budgeted on level 1 (one more per later level)
    pub enemy_budget: u32,
    pub effects: EffectsQuality,
    /// Reduced motion (no particle bursts)
    pub reduced_motion: bool,
    /// Where the native build keeps the high score
    pub high_score_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            topic: "English vocabulary".to_string(),
            seed: None,
            enemy_budget: BASE_ENEMY_BUDGET,
            effects: EffectsQuality::High,
            reduced_motion: false,
            high_score_path: "word_tanks_high_score.json".to_string(),
        }
    }
}

impl Settings {
    /// Effective particle cap (respects reduced_motion)
    pub fn max_particles(&self) -> usize {
        if self.reduced_motion {
            0
        } else {
            self.effects.max_particles()
        }
    }

    /// Reject geometry the arena generator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.arena;
        if !(a.width > 0.0 && a.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "arena must be positive, got {}x{}",
                a.width, a.height
            )));
        }
        if a.tile < MIN_TILE {
            return Err(ConfigError::Invalid(format!(
                "tile {} below minimum {}",
                a.tile, MIN_TILE
            )));
        }
        // Enemy spawn row, brick zone and bottom reserve must all fit
        if a.brick_zone().size.y <= 0.0 || a.brick_zone().size.x <= a.tile {
            return Err(ConfigError::Invalid(format!(
                "tile {} leaves no room in a {}x{} arena",
                a.tile, a.width, a.height
            )));
        }
        if self.topic.trim().is_empty() {
            return Err(ConfigError::Invalid("topic is empty".into()));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "word_tanks_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{"topic":"astronomy","seed":12,"effects":"Low"}"#).unwrap();
        assert_eq!(settings.topic, "astronomy");
        assert_eq!(settings.seed, Some(12));
        assert_eq!(settings.effects, EffectsQuality::Low);
        assert_eq!(settings.arena, ArenaConfig::default());
        assert_eq!(settings.enemy_budget, BASE_ENEMY_BUDGET);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let json = r#"{"arena":{"width":200.0,"height":150.0,"tile":32.0}}"#;
        assert!(matches!(Settings::from_json(json), Err(ConfigError::Invalid(_))));
        let json = r#"{"arena":{"width":0.0,"height":600.0,"tile":32.0}}"#;
        assert!(matches!(Settings::from_json(json), Err(ConfigError::Invalid(_))));
        assert!(matches!(Settings::from_json("[1,2]"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_particle_cap() {
        let mut settings = Settings::default();
        assert_eq!(settings.max_particles(), 256);
        settings.reduced_motion = true;
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(EffectsQuality::parse("LOW"), Some(EffectsQuality::Low));
        assert_eq!(EffectsQuality::Off.as_str(), "Off");
    }
}
