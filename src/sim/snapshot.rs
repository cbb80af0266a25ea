//! Owned read-only copy of the game state for renderers and UI

use serde::{Deserialize, Serialize};

use super::state::{
    ActivePowerUp, Cell, ComboState, DeathCause, Direction, Food, GameState, PowerUp, TrailPoint,
    Zone, ZonePattern,
};

/// Everything a renderer needs for one frame.
///
/// Holds no references into `GameState`, so later updates never leak into a
/// snapshot a renderer is still drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tile_count: i32,
    /// Head first
    pub snake: Vec<Cell>,
    pub direction: Direction,
    pub food: Food,
    pub zones: Vec<Zone>,
    pub power_ups: Vec<PowerUp>,
    pub active_power_ups: Vec<ActivePowerUp>,
    pub score: u64,
    pub level: usize,
    pub level_name: String,
    pub zone_pattern: ZonePattern,
    pub game_speed: f64,
    pub difficulty: f64,
    pub combo: ComboState,
    pub move_count: u64,
    pub game_over: bool,
    pub death_cause: Option<DeathCause>,
    pub trail: Vec<TrailPoint>,
    pub power_ups_collected: u32,
    pub foods_eaten: u32,
    pub sim_time_ms: f64,
}

impl Snapshot {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            tile_count: state.tile_count,
            snake: state.snake.iter().copied().collect(),
            direction: state.direction,
            food: state.food,
            zones: state.zones.clone(),
            power_ups: state.power_ups.clone(),
            active_power_ups: state.active_power_ups.clone(),
            score: state.score,
            level: state.level,
            level_name: state.level_name().to_string(),
            zone_pattern: state.zone_pattern,
            game_speed: state.game_speed,
            difficulty: state.difficulty,
            combo: state.combo,
            move_count: state.move_count,
            game_over: state.game_over,
            death_cause: state.death_cause,
            trail: state.trail.iter().copied().collect(),
            power_ups_collected: state.power_ups_collected,
            foods_eaten: state.foods_eaten,
            sim_time_ms: state.sim_time_ms,
        }
    }

    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    /// Human-readable status line, e.g. "Level 2: Getting Serious - continuous"
    pub fn status_line(&self) -> String {
        format!(
            "Level {}: {} - {}",
            self.level + 1,
            self.level_name,
            self.zone_pattern.as_str()
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::sim::state::GameState;

    #[test]
    fn test_snapshot_is_detached_from_state() {
        let mut state = GameState::new(GameConfig::with_seed(8));
        let snap = state.snapshot();
        state.score = 999;
        let next = state.head() + glam::IVec2::X;
        state.snake.push_front(next);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.snake.len(), 1);
        assert_eq!(snap.status_line(), "Level 1: Warm Up - alternate");
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(GameConfig::with_seed(8));
        let json = state.snapshot().to_json().unwrap();
        assert!(json.contains("\"score\":0"));
        assert!(json.contains("\"level_name\":\"Warm Up\""));
    }
}
