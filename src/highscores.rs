//! High score persistence
//!
//! A single best score, read at startup and written whenever a level-complete
//! or game-over transition beats it. Stored as JSON in a file natively and in
//! LocalStorage on the web.

use serde::{Deserialize, Serialize};

/// Errors from the high-score store
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Unavailable,
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Json(e) => write!(f, "Serialization error: {}", e),
            StoreError::Unavailable => write!(f, "storage unavailable"),
        }
    }
}

impl std::error::Error for StoreError {}

/// The persisted record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Check if a score beats the stored one
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Keep `score` if it is a new best; returns true when it was
    pub fn record(&mut self, score: u64) -> bool {
        if self.qualifies(score) {
            self.best = score;
            true
        } else {
            false
        }
    }
}

/// Backend for the single named high-score value
pub trait ScoreStore {
    fn load(&self) -> Result<HighScore, StoreError>;
    fn save(&mut self, score: &HighScore) -> Result<(), StoreError>;
}

/// Load, falling back to zero when the store is empty or unreadable
pub fn load_or_default(store: &dyn ScoreStore) -> HighScore {
    match store.load() {
        Ok(score) => {
            log::info!("Loaded high score {}", score.best);
            score
        }
        Err(e) => {
            log::warn!("No high score loaded ({}), starting fresh", e);
            HighScore::default()
        }
    }
}

/// In-memory store (tests, headless runs without persistence)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<HighScore>,
    pub saves: u32,
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<HighScore, StoreError> {
        Ok(self.value.unwrap_or_default())
    }

    fn save(&mut self, score: &HighScore) -> Result<(), StoreError> {
        self.value = Some(*score);
        self.saves += 1;
        Ok(())
    }
}

/// JSON file store
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileStore {
    fn load(&self) -> Result<HighScore, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HighScore::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, score: &HighScore) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string(score)?)?;
        log::info!("High score {} saved to {}", score.best, self.path.display());
        Ok(())
    }
}

/// LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "word_tanks_high_score";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<HighScore, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Ok(serde_json::from_str(&json)?),
            Ok(None) => Ok(HighScore::default()),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn save(&mut self, score: &HighScore) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(score)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable)?;
        log::info!("High score {} saved", score.best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_keeps_improvements() {
        let mut hs = HighScore::default();
        assert!(!hs.record(0));
        assert!(hs.record(500));
        assert!(!hs.record(500));
        assert!(!hs.record(100));
        assert!(hs.record(501));
        assert_eq!(hs.best, 501);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::default();
        assert_eq!(load_or_default(&store).best, 0);
        store.save(&HighScore { best: 900 }).unwrap();
        assert_eq!(store.load().unwrap().best, 900);
        assert_eq!(store.saves, 1);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_missing_and_corrupt() {
        let dir = std::env::temp_dir().join(format!("word-tanks-hs-{}", std::process::id()));
        let path = dir.join("high_score.json");
        let _ = std::fs::remove_dir_all(&dir);

        let mut store = FileStore::new(&path);
        assert_eq!(store.load().unwrap().best, 0);
        store.save(&HighScore { best: 4200 }).unwrap();
        assert_eq!(FileStore::new(&path).load().unwrap().best, 4200);

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
        assert_eq!(load_or_default(&store).best, 0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
