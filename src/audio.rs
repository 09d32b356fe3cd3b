//! Sound cues for the audio collaborator
//!
//! The simulation never plays audio itself. It emits `GameEvent`s; this module
//! turns them into short procedural tones (oscillator type, pitch, length,
//! gain) that a platform backend can synthesize.

use crate::settings::Settings;
use crate::sim::{BulletOwner, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Enemy destroyed
    Explosion,
    /// Player damaged or pickup collected
    Hit,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single decaying beep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    /// Seconds until the gain envelope reaches silence
    pub duration: f32,
    pub waveform: Waveform,
    pub gain: f32,
}

impl SoundEffect {
    /// Base tone at full volume
    pub fn tone(self) -> Tone {
        match self {
            SoundEffect::Shoot => Tone {
                freq: 740.0,
                duration: 0.05,
                waveform: Waveform::Square,
                gain: 0.03,
            },
            SoundEffect::Explosion => Tone {
                freq: 120.0,
                duration: 0.2,
                waveform: Waveform::Sawtooth,
                gain: 0.06,
            },
            SoundEffect::Hit => Tone {
                freq: 300.0,
                duration: 0.08,
                waveform: Waveform::Triangle,
                gain: 0.05,
            },
        }
    }

    /// Cue for an event, if it makes a sound
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shoot { owner: BulletOwner::Player, .. } => Some(SoundEffect::Shoot),
            GameEvent::EnemyDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::PlayerHit { .. } | GameEvent::PowerupPickup { .. } => Some(SoundEffect::Hit),
            _ => None,
        }
    }
}

/// Volume state shared by every cue
#[derive(Debug, Clone)]
pub struct AudioMixer {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioMixer {
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
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

    /// Mute/unmute all audio
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

    /// Tones to play for one step's events, scaled by the current volume
    pub fn cues(&self, events: &[GameEvent]) -> Vec<(SoundEffect, Tone)> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return Vec::new();
        }
        events
            .iter()
            .filter_map(SoundEffect::for_event)
            .map(|effect| {
                let mut tone = effect.tone();
                tone.gain *= vol;
                (effect, tone)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EnemyVariant, ParticleColor};
    use glam::Vec2;

    #[test]
    fn test_cues_for_events() {
        let events = vec![
            GameEvent::Shoot { pos: Vec2::ZERO, owner: BulletOwner::Player },
            GameEvent::Shoot { pos: Vec2::ZERO, owner: BulletOwner::Enemy },
            GameEvent::Explosion { pos: Vec2::ZERO, color: ParticleColor::Enemy },
            GameEvent::EnemyDestroyed { pos: Vec2::ZERO, variant: EnemyVariant::Scout },
            GameEvent::ScoreChanged { score: 10 },
            GameEvent::PlayerHit { pos: Vec2::ZERO },
        ];
        let mixer = AudioMixer::new();
        let effects: Vec<_> = mixer.cues(&events).into_iter().map(|(e, _)| e).collect();
        assert_eq!(effects, vec![SoundEffect::Shoot, SoundEffect::Explosion, SoundEffect::Hit]);
    }

    #[test]
    fn test_muted_mixer_is_silent() {
        let mut mixer = AudioMixer::new();
        mixer.set_muted(true);
        let events = [GameEvent::PlayerHit { pos: Vec2::ZERO }];
        assert!(mixer.cues(&events).is_empty());
    }

    #[test]
    fn test_gain_scaled_by_volume() {
        let mut mixer = AudioMixer::new();
        mixer.set_master_volume(0.5);
        mixer.set_sfx_volume(2.0); // clamped to 1.0
        let events = [GameEvent::EnemyDestroyed { pos: Vec2::ZERO, variant: EnemyVariant::Heavy }];
        let cues = mixer.cues(&events);
        assert_eq!(cues.len(), 1);
        assert!((cues[0].1.gain - 0.03).abs() < 1e-6);
        assert_eq!(cues[0].1.waveform, Waveform::Sawtooth);
    }

    #[test]
    fn test_mixer_defaults_follow_settings() {
        let defaults = Settings::default();
        let mixer = AudioMixer::new();
        assert_eq!(mixer.effective_volume(), defaults.master_volume * defaults.sfx_volume);

        let loud = Settings {
            master_volume: 1.5,
            muted: true,
            ..Settings::default()
        };
        let mixer = AudioMixer::from_settings(&loud);
        assert_eq!(mixer.master_volume, 1.0);
        assert_eq!(mixer.effective_volume(), 0.0);
    }
}
