//! Per-move update
//!
//! One call advances the game by exactly one snake move. Order matters:
//! zones age first, then power-up timers and pickups, then the head moves
//! and collisions are resolved before the tail is popped.

use super::collision::{self, Overrides};
use super::powerups;
use super::state::{
    ComboState, GameEvent, GameState, LEVELS, PowerUpKind, TrailPoint, ZonePattern,
    level_for_score,
};
use super::zones;
use crate::consts::*;
use crate::error::SimError;
use crate::manhattan;

impl GameState {
    /// Advance one move, failing once the game is over
    pub fn try_update(&mut self, now: f64, step_ms: f64) -> Result<(), SimError> {
        tick(self, now, step_ms)
    }

    /// Advance one move; a finished game is left untouched
    pub fn update(&mut self, now: f64, step_ms: f64) {
        if let Err(e) = self.try_update(now, step_ms) {
            log::trace!("{e}");
        }
    }
}

/// Advance the game by one move at time `now`, covering `step_ms` of sim time
pub fn tick(state: &mut GameState, now: f64, step_ms: f64) -> Result<(), SimError> {
    if state.game_over {
        return Err(SimError::PostTerminalUpdate);
    }
    state.events.clear();
    state.sim_time_ms += step_ms;

    // Expired zones must be gone before the head can touch them
    zones::update_zones(&mut state.zones, now);

    powerups::expire(&mut state.active_power_ups, now);
    if state.combo.has_lapsed(now) {
        log::trace!("Combo of {} lapsed", state.combo.count);
        state.combo = ComboState::default();
    }
    let head = state.head();
    powerups::collect(state, head, now);
    powerups::try_spawn(state);
    // Slow decay may have shortened lifetimes; re-age before anything can hit them
    zones::update_zones(&mut state.zones, now);

    if let Some(direction) = state.pending_direction.take() {
        state.direction = direction;
    }
    if state.direction.is_idle() {
        return Ok(());
    }

    let new_head = collision::next_head(
        state.head(),
        state.direction,
        state.is_power_up_active(PowerUpKind::SpeedBoost),
    );
    state.snake.push_front(new_head);

    let overrides = Overrides {
        phase_through: state.is_power_up_active(PowerUpKind::PhaseThrough),
        invulnerable: state.is_power_up_active(PowerUpKind::Invulnerability),
    };
    if let Some(cause) = collision::resolve(
        &state.snake,
        &state.zones,
        state.tile_count,
        state.direction,
        overrides,
    ) {
        state.game_over = true;
        state.death_cause = Some(cause);
        state.events.push(GameEvent::Died(cause));
        log::info!(
            "Game over ({cause:?}) at {new_head}: score {}, level {}",
            state.score,
            state.level + 1
        );
        return Ok(());
    }

    record_trail(state, now);
    pull_food(state);

    if state.head() == state.food.cell {
        eat(state, now);
    } else if let Some(tail) = state.snake.pop_back() {
        if state.snake.len() > ZONE_MIN_SNAKE_LEN {
            zones::create_zone(
                &mut state.zones,
                tail,
                now,
                state.move_count,
                state.zone_pattern,
                state.difficulty,
                state.zone_duration,
                state.rng.as_mut(),
            );
        }
    }

    state.move_count += 1;
    Ok(())
}

fn record_trail(state: &mut GameState, now: f64) {
    let cell = state.head();
    state.trail.push_front(TrailPoint { cell, time: now });
    state.trail.truncate(state.max_trail_length);
}

/// Slide nearby food one cell toward the head while the magnet runs
fn pull_food(state: &mut GameState) {
    if !state.is_power_up_active(PowerUpKind::Magnet) {
        return;
    }
    let head = state.head();
    let food = state.food.cell;
    let distance = manhattan(head, food);
    if distance == 0 || distance > MAGNET_RADIUS {
        return;
    }

    let target = food + collision::step_toward(food, head);
    let blocked = target != head
        && (state.snake.contains(&target)
            || zones::zone_at(&state.zones, target).is_some()
            || state.power_ups.iter().any(|p| p.cell == target));
    if !blocked {
        state.food.cell = target;
    }
}

/// Score the food under the head, grow, and re-place it
fn eat(state: &mut GameState, now: f64) {
    let tier = state.food.tier;
    state.combo.register_food(now);
    let boost = if state.is_power_up_active(PowerUpKind::ScoreBoost) {
        2.0
    } else {
        1.0
    };
    let points = (tier.points() as f64 * boost * state.combo.multiplier).floor() as u64;
    state.score += points;
    state.foods_eaten += 1;
    state.events.push(GameEvent::Ate { tier, points });
    log::debug!(
        "Ate {} food for {points} (combo x{:.1})",
        tier.as_str(),
        state.combo.multiplier
    );

    state.place_food();

    if !advance_level(state) {
        apply_score_speedup(state);
    }
}

/// Move to the level the score has reached. Returns true on a level-up.
///
/// A level-up also consumes the pending score milestone so the speed is
/// adjusted only once.
pub fn advance_level(state: &mut GameState) -> bool {
    let target = level_for_score(state.score);
    if target <= state.level {
        return false;
    }
    let stage = LEVELS[target];
    state.level = target;
    state.zone_pattern = stage.pattern;
    state.zone_duration = stage.zone_duration_ms * state.config.zone_duration_scale();
    state.game_speed = state
        .game_speed
        .min(stage.speed_ms * state.config.speed.interval_scale());
    if stage.pattern == ZonePattern::Random {
        state.max_trail_length = TRAIL_LENGTH + TRAIL_BONUS;
    }
    state.speedup_milestones = state.score / SPEEDUP_SCORE_STEP;
    state.events.push(GameEvent::LevelUp { level: target });
    log::info!(
        "Level {}: {} ({} zones)",
        target + 1,
        stage.name,
        stage.pattern.as_str()
    );
    true
}

/// Every 60 points shave the move interval and raise zone difficulty
fn apply_score_speedup(state: &mut GameState) {
    let milestones = state.score / SPEEDUP_SCORE_STEP;
    if milestones <= state.speedup_milestones {
        return;
    }
    state.speedup_milestones = milestones;
    if state.game_speed > MIN_GAME_SPEED_MS {
        state.game_speed = (state.game_speed - SPEEDUP_MS).max(MIN_GAME_SPEED_MS);
        state.difficulty = (state.difficulty + DIFFICULTY_STEP).min(MAX_DIFFICULTY);
        log::debug!(
            "Speed-up: {:.0} ms per move, difficulty {:.2}",
            state.game_speed,
            state.difficulty
        );
    }
}
