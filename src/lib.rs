//! Zone Snake - a grid snake whose retreating tail leaves forbidden zones behind
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, zones, power-ups, food, scoring)
//! - `clock`: Fixed-timestep accumulator
//! - `session`: Frame driver that paces moves and fans out events
//! - `config`: Game configuration and presets
//! - `audio`: Fire-and-forget sound cues
//! - `highscores`: Leaderboard notified on game over

pub mod audio;
pub mod clock;
pub mod config;
pub mod error;
pub mod highscores;
pub mod session;
pub mod sim;

pub use clock::SimulationClock;
pub use config::{GameConfig, GridPreset, SpeedPreset};
pub use error::{ConfigError, SimError, StoreError};
pub use highscores::HighScores;
pub use session::Session;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    use glam::IVec2;

    /// Fixed simulation timestep (60 Hz)
    pub const FIXED_STEP_MS: f64 = 1000.0 / 60.0;
    /// Longest frame delta accepted before clamping (tab stalls, debugger pauses)
    pub const MAX_FRAME_DELTA_MS: f64 = 200.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 5;

    /// Default board is 20x20 tiles
    pub const DEFAULT_TILE_COUNT: i32 = 20;
    /// Direction of travel at game start
    pub const START_DIRECTION: IVec2 = IVec2::new(1, 0);

    /// Starting move interval (ms per move) and its floor
    pub const START_GAME_SPEED_MS: f64 = 150.0;
    pub const MIN_GAME_SPEED_MS: f64 = 70.0;
    /// Starting zone difficulty and its cap
    pub const START_DIFFICULTY: f64 = 0.8;
    pub const MAX_DIFFICULTY: f64 = 2.5;

    /// Every this many points the legacy speed-up kicks in
    pub const SPEEDUP_SCORE_STEP: u64 = 60;
    pub const SPEEDUP_MS: f64 = 4.0;
    pub const DIFFICULTY_STEP: f64 = 0.15;

    /// Zone lifetime at level 0
    pub const ZONE_BASE_DURATION_MS: f64 = 3500.0;
    pub const ZONE_INITIAL_OPACITY: f32 = 0.6;
    /// Zones count as "new" (render flash) for this long
    pub const ZONE_NEW_MS: f64 = 200.0;
    /// Warning pulse starts at this fraction of the effective duration
    pub const ZONE_PULSE_START: f64 = 0.7;
    pub const ZONE_PULSE_PERIOD_MS: f64 = 500.0;
    /// Normal zones only kill above this opacity
    pub const ZONE_LETHAL_OPACITY: f32 = 0.3;
    pub const HIGH_DANGER_DURATION_FACTOR: f64 = 1.5;
    /// Zones are only dropped once the snake is longer than this
    pub const ZONE_MIN_SNAKE_LEN: usize = 3;

    /// Combo decays if no food is eaten within this window
    pub const COMBO_WINDOW_MS: f64 = 5000.0;
    pub const COMBO_STEP: f64 = 0.1;
    pub const COMBO_MAX_BONUS: f64 = 1.0;

    /// Power-up spawning
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.01;
    pub const MAX_PICKUPS: usize = 3;
    pub const MIN_FREE_CELLS_FOR_SPAWN: usize = 10;

    /// Power-up effect tuning
    pub const CLEAR_PATH_RADIUS: i32 = 5;
    pub const SLOW_DECAY_FACTOR: f64 = 0.5;
    pub const SHRINK_FLOOR: usize = 3;
    pub const MAGNET_RADIUS: i32 = 4;
    pub const SPEED_BOOST_SCALE: f32 = 1.5;

    /// Head positions kept for trail rendering
    pub const TRAIL_LENGTH: usize = 10;
    /// Extra trail once the random zone pattern is reached
    pub const TRAIL_BONUS: usize = 5;
}

/// Manhattan (taxicab) distance between two cells
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a - b).abs().element_sum()
}

/// True if the cell lies on a `tile_count` x `tile_count` board
#[inline]
pub fn in_bounds(cell: IVec2, tile_count: i32) -> bool {
    cell.x >= 0 && cell.y >= 0 && cell.x < tile_count && cell.y < tile_count
}
