//! Movement and collision resolution
//!
//! Checks run after the head has moved and before the tail is popped, in a
//! fixed order: wall, self, zone.

use std::collections::VecDeque;

use glam::IVec2;

use super::state::{Cell, DeathCause, Direction, Zone};
use super::zones::zone_at;
use crate::consts::SPEED_BOOST_SCALE;
use crate::in_bounds;

/// Rule overrides granted by active power-ups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub phase_through: bool,
    pub invulnerable: bool,
}

impl Overrides {
    /// Zones are harmless under either effect
    pub fn ignores_zones(&self) -> bool {
        self.phase_through || self.invulnerable
    }
}

/// Head position after one move.
///
/// Speed boost scales the step by 1.5 and rounds to the nearest cell, so a
/// boosted snake jumps two cells per move.
pub fn next_head(head: Cell, direction: Direction, speed_boost: bool) -> Cell {
    let step = direction.vector();
    if speed_boost {
        head + (step.as_vec2() * SPEED_BOOST_SCALE).round().as_ivec2()
    } else {
        head + step
    }
}

/// Check the freshly moved head; `None` means the snake survives
pub fn resolve(
    snake: &VecDeque<Cell>,
    zones: &[Zone],
    tile_count: i32,
    direction: Direction,
    overrides: Overrides,
) -> Option<DeathCause> {
    // Idle snake never collides
    if direction.is_idle() {
        return None;
    }
    let head = *snake.front()?;

    if !in_bounds(head, tile_count) {
        return Some(DeathCause::Wall);
    }

    if snake.iter().skip(1).any(|&segment| segment == head) {
        return Some(DeathCause::SelfHit);
    }

    if !overrides.ignores_zones() && zone_at(zones, head).is_some_and(Zone::is_lethal) {
        return Some(DeathCause::Zone);
    }

    None
}

/// True if moving onto `cell` would be fatal (used by the autopilot)
pub fn is_deadly(
    cell: Cell,
    snake: &VecDeque<Cell>,
    zones: &[Zone],
    tile_count: i32,
    overrides: Overrides,
) -> bool {
    !in_bounds(cell, tile_count)
        || snake.contains(&cell)
        || (!overrides.ignores_zones() && zone_at(zones, cell).is_some_and(Zone::is_lethal))
}

/// Unit vector toward `to`, moving along the dominant axis
pub fn step_toward(from: Cell, to: Cell) -> IVec2 {
    let delta = to - from;
    if delta.x.abs() >= delta.y.abs() {
        IVec2::new(delta.x.signum(), 0)
    } else {
        IVec2::new(0, delta.y.signum())
    }
}
