//! Food placement and tier rolls

use rand::{Rng, RngCore};

use super::grid::Board;
use super::state::{Cell, Food, FoodTier};

/// Tier weights for the given level.
///
/// Rarer tiers gain weight as the level rises while Normal loses it; each
/// weight is clamped so the table never sums far from 1.
pub fn tier_weights(level: usize) -> [(FoodTier, f64); 4] {
    let l = level as f64;
    [
        (
            FoodTier::Normal,
            (FoodTier::Normal.base_weight() - 0.05 * l).max(0.40),
        ),
        (
            FoodTier::Bonus,
            (FoodTier::Bonus.base_weight() + 0.025 * l).min(0.30),
        ),
        (
            FoodTier::Super,
            (FoodTier::Super.base_weight() + 0.015 * l).min(0.20),
        ),
        (
            FoodTier::Epic,
            (FoodTier::Epic.base_weight() + 0.01 * l).min(0.10),
        ),
    ]
}

/// Weighted tier draw
pub fn roll_tier(level: usize, rng: &mut dyn RngCore) -> FoodTier {
    let weights = tier_weights(level);
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random::<f64>() * total;
    for (tier, weight) in weights {
        if roll < weight {
            return tier;
        }
        roll -= weight;
    }
    FoodTier::Normal
}

/// Place food on a uniformly chosen free cell.
///
/// On a saturated board falls back to any cell off the snake, accepting
/// overlap with zones and pickups. Never fails.
pub fn place_food(board: &Board<'_>, level: usize, rng: &mut dyn RngCore) -> Food {
    let cell = match board.pick_free_cell(rng) {
        Ok(cell) => cell,
        Err(e) => {
            log::debug!("{e}, falling back to any cell off the snake");
            fallback_cell(board, rng)
        }
    };
    let tier = roll_tier(level, rng);
    Food { cell, tier }
}

fn fallback_cell(board: &Board<'_>, rng: &mut dyn RngCore) -> Cell {
    let mut candidates = Vec::new();
    for y in 0..board.tile_count {
        for x in 0..board.tile_count {
            let cell = Cell::new(x, y);
            if board.off_snake(cell) {
                candidates.push(cell);
            }
        }
    }
    if candidates.is_empty() {
        // Snake covers the whole board; any cell will do
        let side = board.tile_count.max(1);
        return Cell::new(rng.random_range(0..side), rng.random_range(0..side));
    }
    candidates[rng.random_range(0..candidates.len())]
}
