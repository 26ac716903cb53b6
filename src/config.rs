//! Game configuration.  Loaded from `quick_draw.ron` at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::difficulty::{DEFAULT_INTERVAL, DEFAULT_SCALE, MIN_INTERVAL};
use crate::entities::Arena;
use crate::items::{DEFAULT_ITEM_INTERVAL, DEFAULT_MAX_ITEMS};
use crate::spawner::{DEFAULT_MAX_ENEMIES, DEFAULT_SPAWN_INTERVAL};

const CONFIG_FILE: &str = "quick_draw.ron";

/// Interval and population cap for one spawner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub interval: f32,
    pub capacity: usize,
}

/// Tunables for a session.  Every field falls back to the built-in default
/// when missing from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Target simulation rate in frames per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Fixed RNG seed for replayable sessions; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_arena_width")]
    pub arena_width: f32,
    #[serde(default = "default_arena_height")]
    pub arena_height: f32,
    /// Seconds per difficulty level.
    #[serde(default = "default_difficulty_interval")]
    pub difficulty_interval: f32,
    /// Multiplier growth per level; must exceed 1.
    #[serde(default = "default_difficulty_scale")]
    pub difficulty_scale: f32,
    #[serde(default = "default_enemy_spawn")]
    pub enemy_spawn: SpawnConfig,
    #[serde(default = "default_item_spawn")]
    pub item_spawn: SpawnConfig,
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,
}

fn default_frame_rate() -> u32 {
    60
}
fn default_arena_width() -> f32 {
    1200.0
}
fn default_arena_height() -> f32 {
    700.0
}
fn default_difficulty_interval() -> f32 {
    DEFAULT_INTERVAL
}
fn default_difficulty_scale() -> f32 {
    DEFAULT_SCALE
}
fn default_enemy_spawn() -> SpawnConfig {
    SpawnConfig {
        interval: DEFAULT_SPAWN_INTERVAL,
        capacity: DEFAULT_MAX_ENEMIES,
    }
}
fn default_item_spawn() -> SpawnConfig {
    SpawnConfig {
        interval: DEFAULT_ITEM_INTERVAL,
        capacity: DEFAULT_MAX_ITEMS,
    }
}
fn default_save_path() -> PathBuf {
    PathBuf::from("savegame.ron")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            seed: None,
            arena_width: default_arena_width(),
            arena_height: default_arena_height(),
            difficulty_interval: default_difficulty_interval(),
            difficulty_scale: default_difficulty_scale(),
            enemy_spawn: default_enemy_spawn(),
            item_spawn: default_item_spawn(),
            save_path: default_save_path(),
        }
    }
}

impl GameConfig {
    /// Load config from `quick_draw.ron`.  If the file is missing or invalid,
    /// returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Like [`GameConfig::load`], but writes the defaults out on first run so
    /// there is a file to edit.
    pub fn load_or_init() -> Self {
        if config_path().exists() {
            return Self::load();
        }
        let config = Self::default();
        config.save();
        config
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(data) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match Self::parse(&data) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Parse and sanity-check RON text.
    pub fn parse(data: &str) -> Result<Self, String> {
        let config: Self = ron::from_str(data).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.frame_rate == 0 {
            return Err("frame_rate must be positive".into());
        }
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err("arena dimensions must be positive".into());
        }
        if !(self.difficulty_interval >= MIN_INTERVAL) {
            return Err(format!("difficulty_interval must be at least {} s", MIN_INTERVAL));
        }
        if !(self.difficulty_scale > 1.0) {
            return Err("difficulty_scale must be greater than 1".into());
        }
        if !(self.enemy_spawn.interval >= 0.0 && self.item_spawn.interval >= 0.0) {
            return Err("spawn intervals must not be negative".into());
        }
        Ok(())
    }

    /// Save current config to `quick_draw.ron`.  Logs on error.
    pub fn save(&self) {
        let path = config_path();
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not encode config: {}", e),
        }
    }

    /// The arena in world units, anchored at the origin.
    pub fn arena(&self) -> Arena {
        Arena::new(0.0, 0.0, self.arena_width, self.arena_height)
    }

    /// Seconds per frame at the configured rate.
    pub fn frame_seconds(&self) -> f32 {
        1.0 / self.frame_rate as f32
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE)
}
