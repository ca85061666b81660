#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::TAU;

/*
Phase-Accumulating Oscillator
=============================

The oscillator keeps a normalized phase in [0, 1) and advances it by
`frequency / sample_rate` every sample. Each waveform is a pure function of
that phase, so switching frequency mid-tone never produces a discontinuity in
the phase itself.

  phase   0.0 ─────────────────────────────→ 1.0 (wraps)

  Sine      sin(2π · phase)
  Saw       2 · phase - 1            (ramp -1 → +1, then jump)
  Square    +1 for phase < 0.5, else -1
  Triangle  1 - 4 · |phase - 0.5|    (-1 → +1 → -1)

The metronome click is a sine (a pure beep that cuts through a mix). The pitch
trainer uses a sawtooth so the ear gets every harmonic of the target note.

No band-limiting is applied. The tones are short and quiet enough that the
aliasing of a naive saw is not a practical concern for ear training.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    Square,
    Triangle,
}

impl OscillatorWaveform {
    /// Evaluate the waveform at a normalized phase in [0, 1).
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            OscillatorWaveform::Sine => (TAU * phase).sin(),
            OscillatorWaveform::Saw => 2.0 * phase - 1.0,
            OscillatorWaveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            OscillatorWaveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    /// Produce one sample and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let value = self.waveform.sample(self.phase);
        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();
        value
    }

    pub fn render(&mut self, destination: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in destination.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }
}
