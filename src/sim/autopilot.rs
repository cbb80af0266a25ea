//! Demo-mode AI that steers the snake
//!
//! Greedy: heads for the nearest pickup when one is close, otherwise the
//! food, never choosing a move that is immediately fatal. Ties go to the
//! move with more open neighbours so the snake does not box itself in.

use super::collision::{self, Overrides};
use super::state::{Cell, Direction, GameState, PowerUpKind};
use crate::manhattan;

/// Pickups farther than this are ignored in favour of food
const PICKUP_DETOUR: i32 = 6;

/// Pick the next direction, or `None` when every move is fatal
pub fn choose_direction(state: &GameState) -> Option<Direction> {
    if state.game_over {
        return None;
    }
    let head = state.head();
    let target = target_cell(state, head);
    let overrides = Overrides {
        phase_through: state.is_power_up_active(PowerUpKind::PhaseThrough),
        invulnerable: state.is_power_up_active(PowerUpKind::Invulnerability),
    };
    let boosted = state.is_power_up_active(PowerUpKind::SpeedBoost);

    Direction::MOVES
        .into_iter()
        .filter(|&dir| dir != state.direction.opposite())
        .filter_map(|dir| {
            let cell = collision::next_head(head, dir, boosted);
            let deadly = collision::is_deadly(
                cell,
                &state.snake,
                &state.zones,
                state.tile_count,
                overrides,
            );
            (!deadly).then(|| {
                (
                    dir,
                    manhattan(cell, target),
                    open_neighbours(state, cell, overrides),
                )
            })
        })
        .min_by(|a, b| a.1.cmp(&b.1).then(b.2.cmp(&a.2)))
        .map(|(dir, _, _)| dir)
}

fn target_cell(state: &GameState, head: Cell) -> Cell {
    state
        .power_ups
        .iter()
        .map(|p| p.cell)
        .filter(|&cell| manhattan(cell, head) <= PICKUP_DETOUR)
        .min_by_key(|&cell| manhattan(cell, head))
        .unwrap_or(state.food.cell)
}

fn open_neighbours(state: &GameState, cell: Cell, overrides: Overrides) -> usize {
    Direction::MOVES
        .iter()
        .filter(|dir| {
            !collision::is_deadly(
                cell + dir.vector(),
                &state.snake,
                &state.zones,
                state.tile_count,
                overrides,
            )
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::{DangerLevel, PowerUp, Zone};

    fn game(snake: &[(i32, i32)], food: (i32, i32)) -> GameState {
        let mut state = GameState::new(GameConfig::with_seed(3));
        state.snake = snake.iter().map(|&(x, y)| Cell::new(x, y)).collect();
        state.food.cell = Cell::new(food.0, food.1);
        state
    }

    #[test]
    fn test_heads_for_food() {
        let state = game(&[(10, 10)], (10, 4));
        assert_eq!(choose_direction(&state), Some(Direction::Up));
    }

    #[test]
    fn test_never_reverses() {
        // Food straight behind
        let state = game(&[(10, 10), (9, 10)], (2, 10));
        let dir = choose_direction(&state);
        assert!(dir.is_some());
        assert_ne!(dir, Some(Direction::Left));
    }

    #[test]
    fn test_avoids_wall_and_zone() {
        let mut state = game(&[(19, 0)], (19, 5));
        state.zones = vec![Zone::new(Cell::new(19, 1), 0.0, 3500.0, DangerLevel::High)];
        // Boxed in: wall up and right, zone below, left would reverse
        assert_eq!(choose_direction(&state), None);

        state.direction = Direction::Down;
        assert_eq!(choose_direction(&state), Some(Direction::Left));
    }

    #[test]
    fn test_prefers_close_pickup() {
        let mut state = game(&[(10, 10)], (10, 18));
        state.power_ups = vec![PowerUp::new(Cell::new(10, 7), PowerUpKind::Magnet)];
        assert_eq!(choose_direction(&state), Some(Direction::Up));
    }

    #[test]
    fn test_finished_game_has_no_move() {
        let mut state = game(&[(10, 10)], (12, 10));
        state.game_over = true;
        assert_eq!(choose_direction(&state), None);
    }
}
