#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{midi_note_to_freq, OscillatorWaveform, ToneEnvelope};

/// What a tone sounds like, independent of when it plays.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    /// Pitch in Hz
    pub frequency: f32,
    /// Length of the tone in seconds
    pub duration: f32,
    pub waveform: OscillatorWaveform,
    pub envelope: ToneEnvelope,
}

impl ToneSpec {
    /// Short 880 Hz beep, 0.5 gain decaying exponentially over 50ms.
    pub fn metronome_click() -> Self {
        Self {
            frequency: 880.0,
            duration: 0.05,
            waveform: OscillatorWaveform::Sine,
            envelope: ToneEnvelope::Exponential {
                peak: 0.5,
                floor: 0.0001,
            },
        }
    }

    /// One second sawtooth at the note's pitch with a soft swell.
    pub fn pitch(midi_note: u8) -> Self {
        Self {
            frequency: midi_note_to_freq(midi_note),
            duration: 1.0,
            waveform: OscillatorWaveform::Saw,
            envelope: ToneEnvelope::AttackRelease {
                peak: 0.2,
                attack: 0.1,
            },
        }
    }

    /// Anchor this tone to a clock time.
    pub fn at(self, start: f64) -> ScheduledTone {
        ScheduledTone { start, spec: self }
    }
}

/// A play-at-T request handed to an audio clock.
///
/// The tone starts at `start` (clock-domain seconds) and stops at
/// `start + spec.duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTone {
    pub start: f64,
    pub spec: ToneSpec,
}

impl ScheduledTone {
    pub fn end(&self) -> f64 {
        self.start + self.spec.duration as f64
    }
}
