//! Fixed-timestep accumulator
//!
//! Turns irregular frame timestamps into a steady stream of 60 Hz ticks so
//! simulation speed never depends on display frame rate.

use crate::consts::{FIXED_STEP_MS, MAX_FRAME_DELTA_MS, MAX_TICKS_PER_FRAME};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    pub step_ms: f64,
    /// Longest frame delta accepted before clamping
    pub max_frame_ms: f64,
    /// Ticks allowed per frame before leftover time is dropped
    pub max_ticks: u32,
    accumulator: f64,
    last_time: Option<f64>,
    /// Simulation timeline, advanced by `step_ms` per tick
    time: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationClock {
    pub fn new() -> Self {
        Self {
            step_ms: FIXED_STEP_MS,
            max_frame_ms: MAX_FRAME_DELTA_MS,
            max_ticks: MAX_TICKS_PER_FRAME,
            accumulator: 0.0,
            last_time: None,
            time: 0.0,
        }
    }

    /// Feed one frame timestamp and run every tick it pays for.
    ///
    /// `on_tick` receives the tick's time on the simulation timeline.
    /// Returns the number of ticks run. The very first frame counts as a
    /// single step, like a freshly started loop.
    pub fn advance(&mut self, now: f64, mut on_tick: impl FnMut(f64)) -> u32 {
        let delta = match self.last_time {
            Some(last) => (now - last).clamp(0.0, self.max_frame_ms),
            None => {
                self.time = now - self.step_ms;
                self.step_ms
            }
        };
        self.last_time = Some(now);
        self.accumulator += delta;

        let mut ticks = 0;
        while self.accumulator >= self.step_ms && ticks < self.max_ticks {
            self.accumulator -= self.step_ms;
            self.time += self.step_ms;
            on_tick(self.time);
            ticks += 1;
        }

        // Overloaded: drop the backlog instead of spiralling
        if ticks == self.max_ticks {
            if self.accumulator >= self.step_ms {
                log::trace!("Dropping {:.1} ms of backlog", self.accumulator);
            }
            self.accumulator = 0.0;
            self.time = now;
        }
        ticks
    }

    /// Forget elapsed wall time, e.g. when resuming from pause
    pub fn rebase(&mut self, now: f64) {
        self.last_time = Some(now);
        self.accumulator = 0.0;
        self.time = now;
    }

    /// Time of the most recent tick
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Unspent time carried into the next frame
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(clock: &mut SimulationClock, now: f64) -> u32 {
        clock.advance(now, |_| {})
    }

    #[test]
    fn test_first_frame_runs_one_tick() {
        let mut clock = SimulationClock::new();
        let mut times = Vec::new();
        assert_eq!(clock.advance(1000.0, |t| times.push(t)), 1);
        assert_eq!(times.len(), 1);
        assert!((times[0] - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_steady_frames_run_one_tick_each() {
        let mut clock = SimulationClock::new();
        ticks(&mut clock, 0.0);
        let mut total = 0;
        for i in 1..=60 {
            total += ticks(&mut clock, i as f64 * FIXED_STEP_MS);
        }
        // Rounding may defer the last tick to the next frame
        assert!((59..=60).contains(&total), "total = {total}");
    }

    #[test]
    fn test_slow_frames_catch_up() {
        let mut clock = SimulationClock::new();
        ticks(&mut clock, 0.0);
        // 30 Hz display: two ticks per frame on average
        let mut total = 0;
        for i in 1..=30 {
            total += ticks(&mut clock, i as f64 * 2.0 * FIXED_STEP_MS);
        }
        assert!((59..=60).contains(&total), "total = {total}");
    }

    #[test]
    fn test_stall_is_clamped_and_capped() {
        let mut clock = SimulationClock::new();
        ticks(&mut clock, 0.0);
        assert_eq!(ticks(&mut clock, 10_000.0), MAX_TICKS_PER_FRAME);
        // Backlog was discarded
        assert_eq!(clock.accumulator(), 0.0);
        assert_eq!(clock.time(), 10_000.0);
        assert_eq!(ticks(&mut clock, 10_020.0), 1);
    }

    #[test]
    fn test_rebase_skips_paused_time() {
        let mut clock = SimulationClock::new();
        ticks(&mut clock, 0.0);
        clock.rebase(60_000.0);
        assert_eq!(ticks(&mut clock, 60_000.0 + 5.0), 0);
        assert_eq!(ticks(&mut clock, 60_020.0), 1);
    }

    #[test]
    fn test_backwards_timestamp_is_ignored() {
        let mut clock = SimulationClock::new();
        ticks(&mut clock, 500.0);
        assert_eq!(ticks(&mut clock, 400.0), 0);
    }
}
