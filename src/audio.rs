//! Sound cues
//!
//! The simulation never plays audio itself. The session maps game events to
//! cues and hands them to an `AudioSink`, fire-and-forget. Each cue carries a
//! procedural note sequence so any backend can synthesize it without files.

use crate::sim::GameEvent;

/// Oscillator shape for a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

/// One synthesized note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub frequency_hz: f32,
    pub duration_s: f32,
    pub waveform: Waveform,
    /// Glide target over the note's duration
    pub ramp_to_hz: Option<f32>,
}

const fn note(frequency_hz: f32, duration_s: f32, waveform: Waveform) -> Note {
    Note {
        frequency_hz,
        duration_s,
        waveform,
        ramp_to_hz: None,
    }
}

const EAT: [Note; 1] = [Note {
    frequency_hz: 440.0,
    duration_s: 0.1,
    waveform: Waveform::Sine,
    ramp_to_hz: Some(880.0),
}];

const EAT_SPECIAL: [Note; 1] = [Note {
    frequency_hz: 660.0,
    duration_s: 0.15,
    waveform: Waveform::Triangle,
    ramp_to_hz: Some(1320.0),
}];

// Rising C major arpeggio
const POWER_UP: [Note; 3] = [
    note(523.25, 0.08, Waveform::Sine),
    note(659.25, 0.08, Waveform::Sine),
    note(783.99, 0.16, Waveform::Sine),
];

const LEVEL_UP: [Note; 4] = [
    note(523.25, 0.1, Waveform::Triangle),
    note(659.25, 0.1, Waveform::Triangle),
    note(783.99, 0.1, Waveform::Triangle),
    note(1046.5, 0.3, Waveform::Triangle),
];

const DEATH: [Note; 6] = [
    note(830.0, 0.08, Waveform::Sawtooth),
    note(784.0, 0.08, Waveform::Sawtooth),
    note(740.0, 0.08, Waveform::Sawtooth),
    note(698.0, 0.08, Waveform::Sawtooth),
    note(622.0, 0.08, Waveform::Sawtooth),
    note(440.0, 0.3, Waveform::Sawtooth),
];

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Normal food eaten
    Eat,
    /// Bonus, super or epic food eaten
    EatSpecial,
    PowerUp,
    LevelUp,
    Death,
}

impl SoundCue {
    pub fn as_str(self) -> &'static str {
        match self {
            SoundCue::Eat => "eat",
            SoundCue::EatSpecial => "eatSpecial",
            SoundCue::PowerUp => "powerUp",
            SoundCue::LevelUp => "levelUp",
            SoundCue::Death => "death",
        }
    }

    /// Cue for a game event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::Ate { tier, .. } if tier.is_special() => SoundCue::EatSpecial,
            GameEvent::Ate { .. } => SoundCue::Eat,
            GameEvent::PowerUp(_) => SoundCue::PowerUp,
            GameEvent::LevelUp { .. } => SoundCue::LevelUp,
            GameEvent::Died(_) => SoundCue::Death,
        }
    }

    pub fn notes(self) -> &'static [Note] {
        match self {
            SoundCue::Eat => &EAT,
            SoundCue::EatSpecial => &EAT_SPECIAL,
            SoundCue::PowerUp => &POWER_UP,
            SoundCue::LevelUp => &LEVEL_UP,
            SoundCue::Death => &DEATH,
        }
    }

    /// Peak gain before master volume
    pub fn gain(self) -> f32 {
        match self {
            SoundCue::Eat | SoundCue::Death => 0.2,
            SoundCue::EatSpecial | SoundCue::PowerUp => 0.3,
            SoundCue::LevelUp => 0.4,
        }
    }

    /// Total playback length in seconds
    pub fn duration_s(self) -> f32 {
        self.notes().iter().map(|n| n.duration_s).sum()
    }
}

/// Where sound cues go. Implementations must not block.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Volume-aware audio front end for headless runs: cues are logged
/// instead of synthesized.
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    played: u32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cues actually sounded (muted cues are not counted)
    pub fn played(&self) -> u32 {
        self.played
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        log::debug!(
            "Sound {} ({} notes, {:.2}s, gain {:.2})",
            cue.as_str(),
            cue.notes().len(),
            cue.duration_s(),
            cue.gain() * vol
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{DeathCause, FoodTier, PowerUpKind};

    #[test]
    fn test_event_cues() {
        let ate = |tier| GameEvent::Ate { tier, points: 10 };
        assert_eq!(SoundCue::for_event(&ate(FoodTier::Normal)), SoundCue::Eat);
        assert_eq!(SoundCue::for_event(&ate(FoodTier::Epic)), SoundCue::EatSpecial);
        assert_eq!(
            SoundCue::for_event(&GameEvent::PowerUp(PowerUpKind::Magnet)),
            SoundCue::PowerUp
        );
        assert_eq!(
            SoundCue::for_event(&GameEvent::Died(DeathCause::Zone)),
            SoundCue::Death
        );
    }

    #[test]
    fn test_muted_manager_stays_silent() {
        let mut audio = AudioManager::new();
        audio.play(SoundCue::LevelUp);
        audio.set_muted(true);
        audio.play(SoundCue::Death);
        assert_eq!(audio.played(), 1);
    }

    #[test]
    fn test_fanfare_lengths() {
        assert!((SoundCue::LevelUp.duration_s() - 0.6).abs() < 1e-6);
        assert_eq!(SoundCue::Death.notes().len(), 6);
        assert_eq!(SoundCue::Eat.notes()[0].ramp_to_hz, Some(880.0));
    }
}
