//! Error types
//!
//! Simulation errors are recovered inside the core and never escape `update`;
//! they exist so the recovery paths are explicit and loggable.

use thiserror::Error;

/// Recoverable conditions inside the simulation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// No free cell left for food or power-up placement
    #[error("no free cell on a {tile_count}x{tile_count} board")]
    BoardSaturated { tile_count: i32 },

    /// Reversal or non-unit direction request
    #[error("direction ({x}, {y}) rejected")]
    InvalidDirection { x: i32, y: i32 },

    /// `update` called after the snake died
    #[error("update after game over")]
    PostTerminalUpdate,
}

/// Errors raised while loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File system errors
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Values outside the playable range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while reading or writing the leaderboard
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("leaderboard file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("leaderboard JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
