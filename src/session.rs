//! Frame driver
//!
//! Owns the game, the fixed-step clock and the outbound collaborators. Each
//! frame it runs the 60 Hz ticks the clock grants, moves the snake once every
//! `game_speed` ms of accumulated ticks, turns game events into sound cues
//! and reports the final score exactly once.

use glam::IVec2;

use crate::audio::{AudioSink, SoundCue};
use crate::clock::SimulationClock;
use crate::config::GameConfig;
use crate::highscores::ScoreSink;
use crate::sim::{GameState, Snapshot};

pub struct Session {
    state: GameState,
    clock: SimulationClock,
    /// Tick time banked toward the next move
    move_accumulator: f64,
    paused: bool,
    audio: Option<Box<dyn AudioSink>>,
    scores: Option<Box<dyn ScoreSink>>,
    /// Final score already handed to the score sink
    reported: bool,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self::with_state(GameState::new(config))
    }

    pub fn with_state(state: GameState) -> Self {
        Self {
            state,
            clock: SimulationClock::new(),
            move_accumulator: 0.0,
            paused: false,
            audio: None,
            scores: None,
            reported: false,
        }
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn with_score_sink(mut self, scores: Box<dyn ScoreSink>) -> Self {
        self.scores = Some(scores);
        self
    }

    /// Run one display frame at wall time `now` and return what to draw
    pub fn frame(&mut self, now: f64) -> Snapshot {
        if !self.paused {
            let mut tick_times = Vec::with_capacity(self.clock.max_ticks as usize);
            self.clock.advance(now, |t| tick_times.push(t));
            for t in tick_times {
                self.on_tick(t);
            }
        }
        self.state.snapshot()
    }

    fn on_tick(&mut self, now: f64) {
        if self.state.game_over {
            return;
        }
        self.move_accumulator += self.clock.step_ms;
        let interval = self.state.game_speed;
        if self.move_accumulator < interval {
            return;
        }
        self.move_accumulator -= interval;

        self.state.update(now, interval);
        self.dispatch_events();

        if self.state.game_over && !self.reported {
            self.reported = true;
            if let Some(scores) = self.scores.as_mut() {
                scores.record_final_score(self.state.score, self.state.level, now);
            }
        }
    }

    fn dispatch_events(&mut self) {
        if !self.state.config.sound_enabled {
            return;
        }
        let Some(audio) = self.audio.as_mut() else {
            return;
        };
        for event in &self.state.events {
            audio.play(SoundCue::for_event(event));
        }
    }

    /// Queue a direction change for the next move
    pub fn set_direction(&mut self, v: IVec2) {
        self.state.set_direction(v);
    }

    /// Start a fresh game at wall time `now`
    pub fn reset(&mut self, now: f64) {
        self.state.reset();
        self.move_accumulator = 0.0;
        self.reported = false;
        self.paused = false;
        self.clock.rebase(now);
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Paused");
        }
    }

    /// Resume without replaying the time spent paused
    pub fn resume(&mut self, now: f64) {
        if self.paused {
            self.paused = false;
            self.clock.rebase(now);
            log::info!("Resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }
}
