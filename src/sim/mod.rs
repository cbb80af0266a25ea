//! Deterministic simulation module
//!
//! All gameplay rules live here. Given the same seed, config, direction
//! requests and timestamps, a game plays out identically:
//! - One `update` call is one snake move
//! - Randomness only through the injected source
//! - Row-major board scans and stable collection order
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod food;
pub mod grid;
pub mod powerups;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod zones;

pub use autopilot::choose_direction;
pub use collision::{Overrides, next_head, resolve};
pub use grid::{Board, Occupancy};
pub use snapshot::Snapshot;
pub use state::{
    ActivePowerUp, Cell, ComboState, DangerLevel, DeathCause, Direction, Food, FoodTier,
    GameEvent, GameState, LEVELS, LevelSpec, PowerUp, PowerUpKind, Rarity, TrailPoint, Zone,
    ZonePattern, level_for_score,
};
pub use tick::tick;

#[cfg(test)]
pub(crate) mod testing {
    use rand::RngCore;

    /// Random source stuck near the top of its range: every chance roll
    /// fails and every weighted draw lands on the last entry. The low bits
    /// still move so rejection samplers terminate.
    #[derive(Default)]
    pub struct NoLuck(u32);

    impl RngCore for NoLuck {
        fn next_u32(&mut self) -> u32 {
            self.0 = self.0.wrapping_add(0x9E37);
            0xFFFF_0000 | (self.0 & 0xFFFF)
        }

        fn next_u64(&mut self) -> u64 {
            (u64::from(u32::MAX) << 32) | u64::from(self.next_u32())
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(4) {
                let bytes = self.next_u32().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }
}
