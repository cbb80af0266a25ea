//! Forbidden-zone placement and decay
//!
//! Zones are dropped where the tail just left, fade linearly over their
//! lifetime, pulse as a warning near the end and vanish once expired.

use rand::{Rng, RngCore};

use super::state::{Cell, DangerLevel, Zone, ZonePattern};
use crate::consts::*;
use crate::manhattan;

/// Decide whether the pattern drops a zone on this move, and how dangerous.
///
/// The random pattern always consumes two draws so the stream stays aligned
/// whatever the outcome.
pub fn roll_zone(
    pattern: ZonePattern,
    move_count: u64,
    difficulty: f64,
    rng: &mut dyn RngCore,
) -> Option<DangerLevel> {
    match pattern {
        ZonePattern::Alternate => move_count.is_multiple_of(4).then_some(DangerLevel::Normal),
        ZonePattern::Continuous => move_count.is_multiple_of(3).then(|| {
            if move_count.is_multiple_of(15) {
                DangerLevel::High
            } else {
                DangerLevel::Normal
            }
        }),
        ZonePattern::Random => {
            let create = rng.random::<f64>() < 0.3 * difficulty;
            let high = rng.random::<f64>() < 0.2;
            create.then_some(if high {
                DangerLevel::High
            } else {
                DangerLevel::Normal
            })
        }
    }
}

/// Possibly drop a zone at the cell the tail vacated.
///
/// Returns true if a zone was added. A cell holds at most one zone.
#[allow(clippy::too_many_arguments)]
pub fn create_zone(
    zones: &mut Vec<Zone>,
    cell: Cell,
    now: f64,
    move_count: u64,
    pattern: ZonePattern,
    difficulty: f64,
    base_duration: f64,
    rng: &mut dyn RngCore,
) -> bool {
    let Some(danger) = roll_zone(pattern, move_count, difficulty, rng) else {
        return false;
    };
    if zone_at(zones, cell).is_some() {
        return false;
    }
    log::trace!("Zone at {cell} ({danger:?})");
    zones.push(Zone::new(cell, now, base_duration, danger));
    true
}

/// Age every zone, fade it, and drop the expired ones.
///
/// Must run before movement so a zone that just expired cannot kill.
pub fn update_zones(zones: &mut Vec<Zone>, now: f64) {
    zones.retain_mut(|zone| {
        let age = (now - zone.created_at).max(0.0);
        let lifetime = zone.effective_duration();
        if age >= lifetime {
            return false;
        }
        if zone.is_new && age > ZONE_NEW_MS {
            zone.is_new = false;
        }
        zone.opacity = zone_opacity(age, lifetime);
        true
    });
}

/// Linear fade from the initial opacity, pulsing once past the warning mark
pub fn zone_opacity(age: f64, lifetime: f64) -> f32 {
    let mut opacity = ZONE_INITIAL_OPACITY as f64 * (1.0 - age / lifetime);
    if age > lifetime * ZONE_PULSE_START {
        let phase = (age % ZONE_PULSE_PERIOD_MS) / ZONE_PULSE_PERIOD_MS;
        opacity *= 0.7 + 0.3 * (phase * std::f64::consts::TAU).sin();
    }
    opacity.max(0.0) as f32
}

/// Remove zones within Manhattan `radius` of `center`; returns how many went
pub fn clear_zones_in_area(zones: &mut Vec<Zone>, center: Cell, radius: i32) -> usize {
    let before = zones.len();
    zones.retain(|zone| manhattan(zone.cell, center) > radius);
    before - zones.len()
}

/// Scale the lifetime of every live zone (`factor < 1` speeds decay)
pub fn accelerate_decay(zones: &mut [Zone], factor: f64) {
    for zone in zones {
        zone.duration *= factor;
    }
}

pub fn zone_at(zones: &[Zone], cell: Cell) -> Option<&Zone> {
    zones.iter().find(|zone| zone.cell == cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn normal_zone(x: i32, y: i32, created_at: f64) -> Zone {
        Zone::new(Cell::new(x, y), created_at, 1000.0, DangerLevel::Normal)
    }

    #[test]
    fn test_alternate_pattern_every_fourth_move() {
        let mut rng = Pcg32::seed_from_u64(1);
        let created: Vec<u64> = (0..12)
            .filter(|&m| roll_zone(ZonePattern::Alternate, m, 1.0, &mut rng).is_some())
            .collect();
        assert_eq!(created, vec![0, 4, 8]);
    }

    #[test]
    fn test_continuous_pattern_marks_high_danger() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(
            roll_zone(ZonePattern::Continuous, 15, 1.0, &mut rng),
            Some(DangerLevel::High)
        );
        assert_eq!(
            roll_zone(ZonePattern::Continuous, 9, 1.0, &mut rng),
            Some(DangerLevel::Normal)
        );
        assert_eq!(roll_zone(ZonePattern::Continuous, 10, 1.0, &mut rng), None);
    }

    #[test]
    fn test_random_pattern_scales_with_difficulty() {
        let mut rng = Pcg32::seed_from_u64(5);
        let never = (0..500)
            .filter(|&m| roll_zone(ZonePattern::Random, m, 0.0, &mut rng).is_some())
            .count();
        assert_eq!(never, 0);

        let hits = (0..10_000)
            .filter(|&m| roll_zone(ZonePattern::Random, m, 2.0, &mut rng).is_some())
            .count();
        assert!((5500..6500).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn test_duplicate_cell_is_noop() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut zones = Vec::new();
        let cell = Cell::new(3, 3);
        let pattern = ZonePattern::Alternate;
        assert!(create_zone(&mut zones, cell, 0.0, 0, pattern, 1.0, 3500.0, &mut rng));
        assert!(!create_zone(&mut zones, cell, 10.0, 4, pattern, 1.0, 3500.0, &mut rng));
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].opacity, ZONE_INITIAL_OPACITY);
        assert!(zones[0].is_new);
    }

    #[test]
    fn test_zones_fade_and_expire() {
        let mut zones = vec![normal_zone(1, 1, 0.0)];
        update_zones(&mut zones, 500.0);
        assert_eq!(zones.len(), 1);
        assert!((zones[0].opacity - 0.3).abs() < 1e-6);
        assert!(!zones[0].is_new);

        update_zones(&mut zones, 1000.0);
        assert!(zones.is_empty());
    }

    #[test]
    fn test_high_danger_outlives_normal() {
        let mut zones = vec![
            normal_zone(1, 1, 0.0),
            Zone::new(Cell::new(2, 2), 0.0, 1000.0, DangerLevel::High),
        ];
        update_zones(&mut zones, 1200.0);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].danger, DangerLevel::High);
    }

    #[test]
    fn test_pulse_stays_below_linear_fade() {
        for age in (710..1000).step_by(7) {
            let age = age as f64;
            let linear = 0.6 * (1.0 - age / 1000.0);
            let pulsed = zone_opacity(age, 1000.0) as f64;
            assert!(pulsed <= linear + 1e-6);
            assert!(pulsed >= 0.4 * linear - 1e-6);
        }
    }

    #[test]
    fn test_clear_area_uses_manhattan_radius() {
        let mut zones = vec![
            normal_zone(5, 5, 0.0),
            normal_zone(8, 7, 0.0),  // distance 5
            normal_zone(8, 8, 0.0),  // distance 6
            normal_zone(0, 5, 0.0),  // distance 5
        ];
        let removed = clear_zones_in_area(&mut zones, Cell::new(5, 5), 5);
        assert_eq!(removed, 3);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].cell, Cell::new(8, 8));
    }

    #[test]
    fn test_accelerate_decay_shortens_lifetime() {
        let mut zones = vec![normal_zone(1, 1, 0.0)];
        accelerate_decay(&mut zones, 0.5);
        assert!((zones[0].duration - 500.0).abs() < 1e-9);
        update_zones(&mut zones, 600.0);
        assert!(zones.is_empty());
    }
}
