//! Game configuration and presets
//!
//! Loaded once at startup and handed to `GameState::new`.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Move cadence preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedPreset {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPreset::Slow => "Slow",
            SpeedPreset::Normal => "Normal",
            SpeedPreset::Fast => "Fast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(SpeedPreset::Slow),
            "normal" | "norm" => Some(SpeedPreset::Normal),
            "fast" => Some(SpeedPreset::Fast),
            _ => None,
        }
    }

    /// Starting milliseconds between moves
    pub fn move_interval_ms(&self) -> f64 {
        match self {
            SpeedPreset::Slow => 200.0,
            SpeedPreset::Normal => 150.0,
            SpeedPreset::Fast => 100.0,
        }
    }

    /// Scale applied to the per-level move intervals
    pub fn interval_scale(&self) -> f64 {
        self.move_interval_ms() / START_GAME_SPEED_MS
    }
}

/// Board size preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GridPreset {
    Small,
    #[default]
    Medium,
    Large,
}

impl GridPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridPreset::Small => "Small",
            GridPreset::Medium => "Medium",
            GridPreset::Large => "Large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(GridPreset::Small),
            "medium" | "med" => Some(GridPreset::Medium),
            "large" => Some(GridPreset::Large),
            _ => None,
        }
    }

    /// Tiles per side
    pub fn tile_count(&self) -> i32 {
        match self {
            GridPreset::Small => 16,
            GridPreset::Medium => DEFAULT_TILE_COUNT,
            GridPreset::Large => 25,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Move cadence preset
    pub speed: SpeedPreset,
    /// Board size preset
    pub grid: GridPreset,
    /// Explicit tile count, overrides `grid` when set
    pub tile_count: Option<i32>,
    /// Zone lifetime at level 0
    pub zone_duration_ms: f64,
    /// Starting zone difficulty (scales the random pattern)
    pub difficulty: f64,
    /// Sound cues on/off
    pub sound_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            speed: SpeedPreset::Normal,
            grid: GridPreset::Medium,
            tile_count: None,
            zone_duration_ms: ZONE_BASE_DURATION_MS,
            difficulty: START_DIFFICULTY,
            sound_enabled: true,
        }
    }
}

impl GameConfig {
    /// Default config with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Tiles per side
    pub fn tile_count(&self) -> i32 {
        self.tile_count.unwrap_or_else(|| self.grid.tile_count())
    }

    /// Snake spawn cell (board centre)
    pub fn start_cell(&self) -> IVec2 {
        IVec2::splat(self.tile_count() / 2)
    }

    /// Scale applied to per-level zone durations
    pub fn zone_duration_scale(&self) -> f64 {
        self.zone_duration_ms / ZONE_BASE_DURATION_MS
    }

    /// Reject configs the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tiles = self.tile_count();
        if tiles < 5 {
            return Err(ConfigError::Invalid(format!(
                "tile count {tiles} is below the minimum of 5"
            )));
        }
        if !(self.zone_duration_ms.is_finite() && self.zone_duration_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "zone duration {} must be positive",
                self.zone_duration_ms
            )));
        }
        if !(0.0..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(ConfigError::Invalid(format!(
                "difficulty {} outside 0..={MAX_DIFFICULTY}",
                self.difficulty
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
