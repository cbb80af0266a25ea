//! Board occupancy scans shared by food and power-up placement

use std::collections::VecDeque;

use rand::{Rng, RngCore};

use super::state::{Cell, PowerUp, Zone};
use crate::error::SimError;
use crate::in_bounds;

/// Borrowed view of everything that can block a cell
#[derive(Debug, Clone, Copy)]
pub struct Board<'a> {
    pub tile_count: i32,
    pub snake: &'a VecDeque<Cell>,
    pub zones: &'a [Zone],
    pub power_ups: &'a [PowerUp],
    /// Current food, when it should block placement
    pub food: Option<Cell>,
}

impl Board<'_> {
    /// Flat occupancy grid, row-major
    pub fn occupancy(&self) -> Occupancy {
        let mut grid = Occupancy::new(self.tile_count);
        for &segment in self.snake {
            grid.mark(segment);
        }
        for zone in self.zones {
            grid.mark(zone.cell);
        }
        for pickup in self.power_ups {
            grid.mark(pickup.cell);
        }
        if let Some(food) = self.food {
            grid.mark(food);
        }
        grid
    }

    /// All cells not blocked by anything on the board
    pub fn free_cells(&self) -> Vec<Cell> {
        self.occupancy().free_cells()
    }

    /// Uniformly pick one free cell
    pub fn pick_free_cell(&self, rng: &mut dyn RngCore) -> Result<Cell, SimError> {
        let free = self.free_cells();
        if free.is_empty() {
            return Err(SimError::BoardSaturated {
                tile_count: self.tile_count,
            });
        }
        Ok(free[rng.random_range(0..free.len())])
    }

    /// True if the cell is inside the board and not covered by the snake
    pub fn off_snake(&self, cell: Cell) -> bool {
        in_bounds(cell, self.tile_count) && !self.snake.contains(&cell)
    }
}

/// Which cells of the board are taken
#[derive(Debug, Clone)]
pub struct Occupancy {
    tile_count: i32,
    cells: Vec<bool>,
}

impl Occupancy {
    pub fn new(tile_count: i32) -> Self {
        let side = tile_count.max(0) as usize;
        Self {
            tile_count,
            cells: vec![false; side * side],
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        in_bounds(cell, self.tile_count)
            .then(|| (cell.y * self.tile_count + cell.x) as usize)
    }

    /// Mark a cell taken; off-board cells are ignored
    pub fn mark(&mut self, cell: Cell) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = true;
        }
    }

    pub fn is_taken(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.cells[i])
    }

    pub fn free_count(&self) -> usize {
        self.cells.iter().filter(|&&taken| !taken).count()
    }

    /// Free cells in row-major order
    pub fn free_cells(&self) -> Vec<Cell> {
        let mut free = Vec::with_capacity(self.free_count());
        for y in 0..self.tile_count {
            for x in 0..self.tile_count {
                let cell = Cell::new(x, y);
                if !self.is_taken(cell) {
                    free.push(cell);
                }
            }
        }
        free
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{DangerLevel, PowerUpKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_occupancy_excludes_every_blocker() {
        let snake = VecDeque::from([Cell::new(0, 0), Cell::new(1, 0)]);
        let zones = vec![Zone::new(Cell::new(2, 0), 0.0, 1000.0, DangerLevel::Normal)];
        let power_ups = vec![PowerUp::new(Cell::new(3, 0), PowerUpKind::Magnet)];
        let board = Board {
            tile_count: 5,
            snake: &snake,
            zones: &zones,
            power_ups: &power_ups,
            food: Some(Cell::new(4, 0)),
        };
        let free = board.free_cells();
        assert_eq!(free.len(), 20);
        assert!(free.iter().all(|c| c.y > 0));
    }

    #[test]
    fn test_off_board_marks_ignored() {
        let mut grid = Occupancy::new(3);
        grid.mark(Cell::new(-1, 0));
        grid.mark(Cell::new(3, 3));
        assert_eq!(grid.free_count(), 9);
        assert!(!grid.is_taken(Cell::new(-1, 0)));
    }

    #[test]
    fn test_saturated_board_reports_error() {
        let snake: VecDeque<Cell> = (0..4).map(|i| Cell::new(i % 2, i / 2)).collect();
        let board = Board {
            tile_count: 2,
            snake: &snake,
            zones: &[],
            power_ups: &[],
            food: None,
        };
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(
            board.pick_free_cell(&mut rng),
            Err(SimError::BoardSaturated { tile_count: 2 })
        );
    }
}
