//! High score persistence
//!
//! The best score is stored as a single big-endian `u32` (4 bytes). A missing
//! or damaged file means "no high score yet"; failed saves are logged and
//! otherwise ignored.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, PersistenceResult};

/// Default file name, relative to the working directory
pub const DEFAULT_HIGH_SCORE_FILE: &str = "highscore.dat";

/// File-backed store for the single high score value
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
    /// Last value successfully written (or read), to skip redundant writes
    last_saved: Option<u32>,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_saved: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored high score
    pub fn try_load(&mut self) -> PersistenceResult<u32> {
        let data = fs::read(&self.path)?;
        let bytes: [u8; 4] = data
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| PersistenceError::Corrupt {
                path: self.path.clone(),
                len: data.len(),
            })?;
        let score = u32::from_be_bytes(bytes);
        self.last_saved = Some(score);
        Ok(score)
    }

    /// Read the stored high score, or `None` if absent or unreadable
    pub fn load(&mut self) -> Option<u32> {
        match self.try_load() {
            Ok(score) => {
                log::info!("Loaded high score {} from {}", score, self.path.display());
                Some(score)
            }
            Err(e) if e.is_not_found() => {
                log::info!("No high score file at {}, starting fresh", self.path.display());
                None
            }
            Err(e) => {
                log::warn!("Failed to load high score file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Overwrite the stored value (tmp file, then rename over the old one)
    pub fn try_save(&mut self, score: u32) -> PersistenceResult<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, score.to_be_bytes())?;
        fs::rename(&tmp, &self.path)?;
        self.last_saved = Some(score);
        Ok(())
    }

    /// Save if the value changed since the last write; failures are logged
    pub fn save(&mut self, score: u32) {
        if self.last_saved == Some(score) {
            return;
        }
        if let Err(e) = self.try_save(score) {
            log::warn!("Failed to save high score file {}: {}", self.path.display(), e);
        }
    }
}

impl Default for HighScoreStore {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_SCORE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dodge_shot_{}_{}.dat", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_is_none() {
        let mut store = HighScoreStore::new(temp_path("missing"));
        assert!(store.load().is_none());
        assert!(store.try_load().unwrap_err().is_not_found());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut store = HighScoreStore::new(&path);
        store.save(12345);
        assert_eq!(fs::read(&path).unwrap(), vec![0, 0, 0x30, 0x39]);

        let mut reloaded = HighScoreStore::new(&path);
        assert_eq!(reloaded.load(), Some(12345));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_short_file_is_corrupt() {
        let path = temp_path("short");
        fs::write(&path, [1u8, 2]).unwrap();
        let mut store = HighScoreStore::new(&path);
        assert!(matches!(
            store.try_load(),
            Err(PersistenceError::Corrupt { len: 2, .. })
        ));
        assert!(store.load().is_none());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_unwritable_path_is_not_fatal() {
        let dir = temp_path("no_such_dir");
        let mut store = HighScoreStore::new(dir.join("nested").join("highscore.dat"));
        store.save(10);
        assert!(store.try_save(10).is_err());
    }
}
