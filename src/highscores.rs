//! High score leaderboard
//!
//! Top 10 runs by score, kept sorted descending. The session notifies a
//! `ScoreSink` once per finished game; the leaderboard is the default sink
//! and can be saved to and loaded from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Receives the final score of each finished game
pub trait ScoreSink {
    /// `level` is zero-based; `timestamp` is in ms on the caller's clock
    fn record_final_score(&mut self, score: u64, level: usize, timestamp: f64);
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Zero-based level reached
    pub level: usize,
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Insert a run. Returns the 1-based rank, or `None` if it missed the board.
    ///
    /// Ties rank below earlier runs with the same score.
    pub fn add_score(&mut self, score: u64, level: usize, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            pos,
            HighScoreEntry {
                score,
                level,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a leaderboard, re-sorting and trimming whatever was stored
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    /// Load from disk; a missing file is an empty board
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            log::info!("No high scores at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let scores = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ScoreSink for HighScores {
    fn record_final_score(&mut self, score: u64, level: usize, timestamp: f64) {
        match self.add_score(score, level, timestamp) {
            Some(rank) => log::info!("New high score #{rank}: {score}"),
            None => log::debug!("Score {score} missed the leaderboard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_descending_and_trimmed() {
        let mut scores = HighScores::new();
        for s in [50, 300, 120, 10, 90, 200, 60, 70, 80, 40, 30] {
            scores.add_score(s, 0, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(300));
        assert!(scores.entries.windows(2).all(|w| w[0].score >= w[1].score));
        // 10 fell off the bottom
        assert!(scores.entries.iter().all(|e| e.score != 10));
    }

    #[test]
    fn test_rank_and_qualification() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(100, 1, 0.0), Some(1));
        assert_eq!(scores.add_score(150, 2, 0.0), Some(1));
        assert_eq!(scores.add_score(100, 1, 5.0), Some(3));
        for _ in 0..7 {
            scores.add_score(500, 4, 0.0);
        }
        assert!(!scores.qualifies(100));
        assert_eq!(scores.add_score(90, 0, 0.0), None);
    }

    #[test]
    fn test_sink_records_final_score() {
        let mut scores = HighScores::new();
        scores.record_final_score(240, 2, 1234.0);
        assert_eq!(
            scores.entries,
            vec![HighScoreEntry {
                score: 240,
                level: 2,
                timestamp: 1234.0
            }]
        );
    }

    #[test]
    fn test_json_reload_sorts() {
        let json = r#"{"entries":[
            {"score":10,"level":0,"timestamp":1.0},
            {"score":90,"level":1,"timestamp":2.0}
        ]}"#;
        let scores = HighScores::from_json(json).unwrap();
        assert_eq!(scores.top_score(), Some(90));

        let again = HighScores::from_json(&scores.to_json().unwrap()).unwrap();
        assert_eq!(again, scores);
        assert!(HighScores::from_json("not json").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let path =
            std::env::temp_dir().join(format!("zone_snake_scores_{}.json", std::process::id()));
        let mut scores = HighScores::new();
        scores.add_score(77, 1, 9.0);
        scores.save(&path).unwrap();
        assert_eq!(HighScores::load(&path).unwrap(), scores);
        std::fs::remove_file(&path).unwrap();
        assert!(HighScores::load(&path).unwrap().is_empty());
    }
}
