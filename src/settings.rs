//! Game settings
//!
//! Persisted as JSON next to the high score file. Missing fields fall back to
//! their defaults, so older files keep loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, TICK_INTERVAL_MS};
use crate::error::PersistenceResult;
use crate::highscore::DEFAULT_HIGH_SCORE_FILE;
use crate::sim::Arena;

/// Smallest arena the spawn and clamp rules still make sense in
const MIN_ARENA_SIZE: i32 = 200;
/// Largest arena whose squared distances still fit in an `i32`
const MAX_ARENA_SIZE: i32 = 4096;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: i32,
    pub arena_height: i32,

    // === Timing ===
    /// Milliseconds between simulation ticks
    pub tick_interval_ms: u64,

    // === Persistence ===
    pub high_score_path: String,

    // === Demo driver ===
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Ticks the headless demo runs for
    pub demo_ticks: u64,
    /// Pace ticks at `tick_interval_ms` instead of running flat out
    pub realtime: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            tick_interval_ms: TICK_INTERVAL_MS,
            high_score_path: DEFAULT_HIGH_SCORE_FILE.to_string(),
            seed: None,
            demo_ticks: 20_000,
            realtime: false,
        }
    }
}

impl Settings {
    /// Settings file name, relative to the working directory
    pub const FILE_NAME: &'static str = "dodge_shot_settings.json";

    /// Copy with out-of-range values pulled back to usable ones
    pub fn validated(&self) -> Self {
        Self {
            arena_width: self.arena_width.clamp(MIN_ARENA_SIZE, MAX_ARENA_SIZE),
            arena_height: self.arena_height.clamp(MIN_ARENA_SIZE, MAX_ARENA_SIZE),
            tick_interval_ms: self.tick_interval_ms.max(1),
            ..self.clone()
        }
    }

    /// Arena the simulation runs in
    pub fn arena(&self) -> Arena {
        let s = self.validated();
        Arena::new(s.arena_width, s.arena_height)
    }

    pub fn try_load(path: &Path) -> PersistenceResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.validated()
            }
            Err(e) if e.is_not_found() => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn try_save(&self, path: &Path) -> PersistenceResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Save settings; failures are logged
    pub fn save(&self, path: &Path) {
        match self.try_save(path) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings to {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dodge_shot_settings_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.arena_width, ARENA_WIDTH);
        assert_eq!(settings.high_score_path, "highscore.dat");
    }

    #[test]
    fn test_validated_clamps() {
        let settings = Settings {
            arena_width: 10,
            tick_interval_ms: 0,
            ..Default::default()
        };
        let v = settings.validated();
        assert_eq!(v.arena_width, 200);
        assert_eq!(v.arena_height, ARENA_HEIGHT);
        assert_eq!(v.tick_interval_ms, 1);
        assert_eq!(settings.arena(), Arena::new(200, ARENA_HEIGHT));
    }

    #[test]
    fn test_validated_caps_huge_arena() {
        let settings = Settings {
            arena_width: 50_000,
            arena_height: i32::MAX,
            ..Default::default()
        };
        let arena = settings.arena();
        assert_eq!(arena, Arena::new(4096, 4096));
        // Corner to corner still fits in i32
        let far = IVec2::new(arena.width, arena.height);
        assert_eq!(far.length_squared(), 2 * 4096 * 4096);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let settings = Settings {
            seed: Some(42),
            demo_ticks: 10,
            ..Default::default()
        };
        settings.save(&path);
        assert_eq!(Settings::load(&path), settings);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        let path = temp_path("garbage");
        fs::write(&path, "not json").unwrap();
        assert!(Settings::try_load(&path).is_err());
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = fs::remove_file(path);
    }
}
