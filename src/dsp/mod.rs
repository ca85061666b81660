//! Low-level DSP primitives used to render scheduled tones.
//!
//! These components are allocation-free and realtime-safe, so the audio
//! callback can evaluate them directly. They stay focused on the signal math;
//! deciding *when* a tone plays is the scheduler's job.

/// One-shot envelopes shaping a tone over its fixed duration.
pub mod envelope;
/// Oscillator waveforms.
pub mod oscillator;

pub use envelope::ToneEnvelope;
pub use oscillator::{OscillatorBlock, OscillatorWaveform};

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_note_to_freq() {
        assert!((midi_note_to_freq(69) - 440.0).abs() < 1e-3);
        assert!((midi_note_to_freq(81) - 880.0).abs() < 1e-3);
        assert!((midi_note_to_freq(60) - 261.626).abs() < 1e-2);
        assert!((midi_note_to_freq(48) - 130.813).abs() < 1e-2);
    }
}
