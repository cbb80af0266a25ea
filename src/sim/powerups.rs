//! Power-up spawning, collection and timed effects
//!
//! Same-kind pickups stack as independent timers: each expires on its own
//! schedule and a kind counts as active while any of its timers runs.

use rand::{Rng, RngCore};

use super::grid::Board;
use super::state::{ActivePowerUp, Cell, GameEvent, GameState, PowerUp, PowerUpKind};
use super::zones;
use crate::consts::*;

/// Spawn weights nudged by board conditions
pub fn spawn_weights(
    snake_len: usize,
    zone_count: usize,
    level: usize,
) -> [(PowerUpKind, f64); 8] {
    PowerUpKind::ALL.map(|kind| {
        let mut weight = kind.rarity().base_weight();
        match kind {
            // Long snakes need a way out
            PowerUpKind::Shrink if snake_len >= 10 => weight *= 2.0,
            PowerUpKind::ClearPath | PowerUpKind::PhaseThrough if zone_count >= 10 => {
                weight *= 1.5
            }
            PowerUpKind::Invulnerability if level >= 3 => weight *= 2.0,
            _ => {}
        }
        (kind, weight)
    })
}

/// Weighted kind draw
pub fn roll_kind(weights: &[(PowerUpKind, f64)], rng: &mut dyn RngCore) -> PowerUpKind {
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random::<f64>() * total;
    for &(kind, weight) in weights {
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    weights
        .last()
        .map(|&(kind, _)| kind)
        .unwrap_or(PowerUpKind::ScoreBoost)
}

/// Maybe spawn one more pickup this tick.
///
/// Capped at `MAX_PICKUPS`, 1% chance per tick, skipped when fewer than
/// `MIN_FREE_CELLS_FOR_SPAWN` cells are free.
pub fn try_spawn(state: &mut GameState) -> Option<PowerUp> {
    if state.power_ups.len() >= MAX_PICKUPS {
        return None;
    }
    if state.rng().random::<f64>() >= POWERUP_SPAWN_CHANCE {
        return None;
    }

    let free = Board {
        tile_count: state.tile_count,
        snake: &state.snake,
        zones: &state.zones,
        power_ups: &state.power_ups,
        food: Some(state.food.cell),
    }
    .free_cells();
    if free.len() < MIN_FREE_CELLS_FOR_SPAWN {
        log::trace!("Power-up spawn skipped, {} free cells", free.len());
        return None;
    }

    let weights = spawn_weights(state.snake.len(), state.zones.len(), state.level);
    let rng = state.rng();
    let cell = free[rng.random_range(0..free.len())];
    let kind = roll_kind(&weights, rng);
    let pickup = PowerUp::new(cell, kind);
    log::debug!("Spawned {kind:?} at {cell}");
    state.power_ups.push(pickup);
    Some(pickup)
}

/// Collect every pickup lying on `cell` and apply its effect
pub fn collect(state: &mut GameState, cell: Cell, now: f64) -> Vec<PowerUpKind> {
    let mut collected = Vec::new();
    state.power_ups.retain(|p| {
        if p.cell == cell {
            collected.push(*p);
            false
        } else {
            true
        }
    });

    for pickup in &collected {
        apply(state, pickup, now);
    }
    collected.into_iter().map(|p| p.kind).collect()
}

/// Start the timer and run any one-shot effect
fn apply(state: &mut GameState, pickup: &PowerUp, now: f64) {
    if pickup.duration > 0.0 {
        state.active_power_ups.push(ActivePowerUp {
            kind: pickup.kind,
            start_time: now,
            duration: pickup.duration,
            active: true,
        });
    }

    match pickup.kind {
        PowerUpKind::ClearPath => {
            let head = state.head();
            let cleared = zones::clear_zones_in_area(&mut state.zones, head, CLEAR_PATH_RADIUS);
            log::debug!("Clear path removed {cleared} zones");
        }
        PowerUpKind::SlowDecay => zones::accelerate_decay(&mut state.zones, SLOW_DECAY_FACTOR),
        PowerUpKind::Shrink => {
            let target = (state.snake.len() / 2).max(SHRINK_FLOOR);
            state.snake.truncate(target);
        }
        // Timed effects are queried through `is_power_up_active`
        PowerUpKind::ScoreBoost
        | PowerUpKind::PhaseThrough
        | PowerUpKind::SpeedBoost
        | PowerUpKind::Magnet
        | PowerUpKind::Invulnerability => {}
    }

    state.power_ups_collected += 1;
    state.events.push(GameEvent::PowerUp(pickup.kind));
    log::debug!("{} ({:?})", pickup.kind.label(), pickup.kind.rarity());
}

/// Drop every timer whose elapsed time reached its duration
pub fn expire(active: &mut Vec<ActivePowerUp>, now: f64) -> usize {
    let before = active.len();
    active.retain_mut(|p| {
        if p.is_expired(now) {
            p.active = false;
            false
        } else {
            true
        }
    });
    before - active.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::{DangerLevel, Zone};
    use std::collections::VecDeque;

    fn state_with_snake(len: i32) -> GameState {
        let mut state = GameState::new(GameConfig::with_seed(11));
        state.snake = (0..len).map(|i| Cell::new(10, 2 + i)).collect::<VecDeque<_>>();
        state
    }

    #[test]
    fn test_shrink_halves_snake() {
        let mut state = state_with_snake(10);
        state.power_ups.push(PowerUp::new(Cell::new(10, 2), PowerUpKind::Shrink));
        let kinds = collect(&mut state, Cell::new(10, 2), 0.0);
        assert_eq!(kinds, vec![PowerUpKind::Shrink]);
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.head(), Cell::new(10, 2));
        // Instantaneous: no timer
        assert!(state.active_power_ups.is_empty());
    }

    #[test]
    fn test_shrink_respects_floor() {
        let mut state = state_with_snake(4);
        state.power_ups.push(PowerUp::new(Cell::new(10, 2), PowerUpKind::Shrink));
        collect(&mut state, Cell::new(10, 2), 0.0);
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_clear_path_removes_nearby_zones() {
        let mut state = state_with_snake(1);
        state.zones = vec![
            Zone::new(Cell::new(12, 4), 0.0, 3500.0, DangerLevel::High),
            Zone::new(Cell::new(19, 19), 0.0, 3500.0, DangerLevel::Normal),
        ];
        state.power_ups.push(PowerUp::new(Cell::new(10, 2), PowerUpKind::ClearPath));
        collect(&mut state, Cell::new(10, 2), 100.0);
        assert_eq!(state.zones.len(), 1);
        assert_eq!(state.zones[0].cell, Cell::new(19, 19));
        assert!(state.is_power_up_active(PowerUpKind::ClearPath));
    }

    #[test]
    fn test_slow_decay_halves_zone_durations() {
        let mut state = state_with_snake(1);
        state.zones = vec![Zone::new(Cell::new(1, 1), 0.0, 3500.0, DangerLevel::Normal)];
        state.power_ups.push(PowerUp::new(Cell::new(10, 2), PowerUpKind::SlowDecay));
        collect(&mut state, Cell::new(10, 2), 0.0);
        assert!((state.zones[0].duration - 1750.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_kind_timers_are_independent() {
        let mut state = state_with_snake(1);
        state.power_ups.push(PowerUp::new(Cell::new(10, 2), PowerUpKind::PhaseThrough));
        collect(&mut state, Cell::new(10, 2), 0.0);
        state.power_ups.push(PowerUp::new(Cell::new(10, 2), PowerUpKind::PhaseThrough));
        collect(&mut state, Cell::new(10, 2), 2000.0);
        assert_eq!(state.active_power_ups.len(), 2);

        // First timer ends at 3000, second keeps the effect alive
        assert_eq!(expire(&mut state.active_power_ups, 3000.0), 1);
        assert!(state.is_power_up_active(PowerUpKind::PhaseThrough));

        assert_eq!(expire(&mut state.active_power_ups, 5000.0), 1);
        assert!(!state.is_power_up_active(PowerUpKind::PhaseThrough));
    }

    #[test]
    fn test_only_pickups_on_cell_are_collected() {
        let mut state = state_with_snake(1);
        state.power_ups = vec![
            PowerUp::new(Cell::new(10, 2), PowerUpKind::Magnet),
            PowerUp::new(Cell::new(0, 0), PowerUpKind::ScoreBoost),
        ];
        collect(&mut state, Cell::new(10, 2), 0.0);
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups_collected, 1);
        assert_eq!(state.events, vec![GameEvent::PowerUp(PowerUpKind::Magnet)]);
    }

    #[test]
    fn test_spawn_respects_cap_and_board() {
        let mut state = state_with_snake(1);
        for _ in 0..20_000 {
            try_spawn(&mut state);
        }
        assert_eq!(state.power_ups.len(), MAX_PICKUPS);
        for p in &state.power_ups {
            assert!(!state.snake.contains(&p.cell));
            assert_ne!(p.cell, state.food.cell);
        }
    }

    #[test]
    fn test_spawn_skipped_on_crowded_board() {
        let mut state = GameState::new(GameConfig {
            tile_count: Some(5),
            ..GameConfig::with_seed(2)
        });
        // 5x5 board: fill all but a few cells with zones
        state.zones = (0..5)
            .flat_map(|x| (0..4).map(move |y| Cell::new(x, y)))
            .map(|c| Zone::new(c, 0.0, 3500.0, DangerLevel::Normal))
            .collect();
        for _ in 0..5_000 {
            assert!(try_spawn(&mut state).is_none());
        }
    }

    #[test]
    fn test_weights_nudged_by_board() {
        let calm = spawn_weights(3, 0, 0);
        let busy = spawn_weights(12, 15, 3);
        let w = |table: &[(PowerUpKind, f64)], kind| {
            table.iter().find(|(k, _)| *k == kind).map(|(_, w)| *w).unwrap()
        };
        assert_eq!(w(&busy[..], PowerUpKind::Shrink), 2.0 * w(&calm[..], PowerUpKind::Shrink));
        assert_eq!(
            w(&busy[..], PowerUpKind::ClearPath),
            1.5 * w(&calm[..], PowerUpKind::ClearPath)
        );
        assert_eq!(w(&busy[..], PowerUpKind::SpeedBoost), w(&calm[..], PowerUpKind::SpeedBoost));
        assert!(w(&calm[..], PowerUpKind::ScoreBoost) > w(&calm[..], PowerUpKind::Invulnerability));
    }
}
